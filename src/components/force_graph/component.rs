use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::ForceGraphState;
use crate::engine::{
	CancellationToken, EngineError, Frame, GraphData, GraphNode, Surface, Viewport,
};

/// Seconds per frame fed to the eased highlight.
const FRAME_DT: f64 = 0.016;

/// The `<canvas>` as the engine's drawing surface.
pub(super) struct CanvasSurface {
	canvas: HtmlCanvasElement,
	pub ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// `None` when the browser refuses a 2D context.
	pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()?
			.dyn_into::<CanvasRenderingContext2d>()
			.ok()?;
		Some(Self {
			canvas: canvas.clone(),
			ctx,
		})
	}
}

impl Surface for CanvasSurface {
	fn viewport(&self) -> Viewport {
		Viewport::new(self.canvas.width() as f64, self.canvas.height() as f64)
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback| v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback);
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

/// Sizes the canvas to the window or its parent and returns the size.
fn fit_canvas(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let (w, h) = if fullscreen {
		window_size(window)
	} else {
		(
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.filter(|w| *w > 0.0)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.filter(|h| *h > 0.0)
					.unwrap_or(600.0)
			}),
		)
	};
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	(w, h)
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Keeps the canvas sized to the window while `token` is live. The returned
/// listener stays registered until it is handed to [`Teardown`].
fn follow_window_resize(
	window: &Window,
	canvas: HtmlCanvasElement,
	token: CancellationToken,
	mut on_resize: impl FnMut(f64, f64) + 'static,
) -> Closure<dyn FnMut()> {
	let cb = Closure::<dyn FnMut()>::new(move || {
		if token.is_cancelled() {
			return;
		}
		let Some(win) = web_sys::window() else {
			return;
		};
		let (nw, nh) = window_size(&win);
		canvas.set_width(nw as u32);
		canvas.set_height(nh as u32);
		on_resize(nw, nh);
	});
	let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	cb
}

/// Self-rescheduling `requestAnimationFrame` loop that ends once `token` is
/// cancelled or a frame reports [`Frame::Cancelled`]. `pending` holds the id
/// of the next requested frame (0 when none) so teardown can cancel it.
///
/// The callback refers to itself; the returned slot is what breaks the cycle.
fn run_frame_loop(
	token: CancellationToken,
	pending: Arc<AtomicI32>,
	mut on_frame: impl FnMut() -> Frame + 'static,
) -> FrameCallback {
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let animate_inner = animate.clone();
	let pending_inner = pending.clone();
	*animate.borrow_mut() = Some(Closure::new(move || {
		pending_inner.store(0, Ordering::Release);
		if token.is_cancelled() || on_frame() == Frame::Cancelled {
			return;
		}
		request_frame(&animate_inner, &pending_inner);
	}));
	request_frame(&animate, &pending);
	animate
}

fn request_frame(animate: &FrameCallback, pending: &AtomicI32) {
	if let (Some(window), Some(cb)) = (web_sys::window(), animate.borrow().as_ref()) {
		if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			pending.store(id, Ordering::Release);
		}
	}
}

fn cancel_pending_frame(pending: &AtomicI32) {
	let id = pending.swap(0, Ordering::AcqRel);
	if id != 0 {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(id);
		}
	}
}

/// Cancels the scheduler and any frame still queued as soon as the owner is
/// cleaned up (unmount, or the data signal changing).
fn cancel_on_cleanup(token: CancellationToken, pending: Arc<AtomicI32>) {
	on_cleanup(move || {
		token.cancel();
		cancel_pending_frame(&pending);
	});
}

/// Everything one running view leaves registered with the browser. Dropping
/// it stops the scheduler, cancels the queued frame, unhooks the resize
/// listener and frees the frame callback.
struct Teardown {
	token: CancellationToken,
	pending: Arc<AtomicI32>,
	animate: FrameCallback,
	resize: Option<Closure<dyn FnMut()>>,
}

impl Drop for Teardown {
	fn drop(&mut self) {
		self.token.cancel();
		cancel_pending_frame(&self.pending);
		if let (Some(window), Some(cb)) = (web_sys::window(), self.resize.take()) {
			let _ =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		self.animate.borrow_mut().take();
	}
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// A view state the shared canvas body can drive.
pub(super) trait CanvasSession: 'static {
	const LABEL: &'static str;

	fn open(data: &GraphData, width: f64, height: f64) -> Self;
	fn start(&mut self, surface: &CanvasSurface) -> Result<(), EngineError>;
	fn token(&self) -> Option<CancellationToken>;
	fn tick(&mut self, dt: f64) -> Frame;
	fn paint(&self, ctx: &CanvasRenderingContext2d);
	fn resize(&mut self, width: f64, height: f64);
	fn pointer_down(&mut self, x: f64, y: f64) -> Option<GraphNode>;
	fn pointer_move(&mut self, x: f64, y: f64);
	fn pointer_up(&mut self);
	fn pointer_leave(&mut self);
	fn wheel(&mut self, x: f64, y: f64, delta_y: f64);
}

impl CanvasSession for ForceGraphState {
	const LABEL: &'static str = "graph canvas";

	fn open(data: &GraphData, width: f64, height: f64) -> Self {
		ForceGraphState::new(data, width, height)
	}

	fn start(&mut self, surface: &CanvasSurface) -> Result<(), EngineError> {
		ForceGraphState::start(self, Some(surface))
	}

	fn token(&self) -> Option<CancellationToken> {
		self.scheduler.as_ref().map(|s| s.token())
	}

	fn tick(&mut self, dt: f64) -> Frame {
		ForceGraphState::tick(self, dt)
	}

	fn paint(&self, ctx: &CanvasRenderingContext2d) {
		render::render(self, ctx);
	}

	fn resize(&mut self, width: f64, height: f64) {
		ForceGraphState::resize(self, width, height);
	}

	fn pointer_down(&mut self, x: f64, y: f64) -> Option<GraphNode> {
		ForceGraphState::pointer_down(self, x, y)
	}

	fn pointer_move(&mut self, x: f64, y: f64) {
		ForceGraphState::pointer_move(self, x, y);
	}

	fn pointer_up(&mut self) {
		ForceGraphState::pointer_up(self);
	}

	fn pointer_leave(&mut self) {
		ForceGraphState::pointer_leave(self);
	}

	fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		self.transform.zoom_at(x, y, delta_y);
	}
}

/// Canvas element, render loop and pointer wiring shared by both views.
///
/// Every change of `data` tears the previous session down (through the
/// effect's cleanup) and lays out a fresh one.
pub(super) fn graph_canvas<S: CanvasSession>(
	data: Signal<GraphData>,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
	on_select: Option<Callback<GraphNode>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<S>>> = Rc::new(RefCell::new(None));
	let state_init = state.clone();

	// the previous run's teardown arrives as the effect's last value
	Effect::new(move |previous: Option<Option<Teardown>>| {
		drop(previous);
		let graph = data.get();
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let window = web_sys::window()?;

		let (w, h) = fit_canvas(&canvas, &window, fullscreen, width, height);
		let mut session = S::open(&graph, w, h);
		let Some(surface) = CanvasSurface::new(&canvas) else {
			warn!("{} not started: {}", S::LABEL, EngineError::SurfaceUnavailable);
			*state_init.borrow_mut() = Some(session);
			return None;
		};
		if let Err(err) = session.start(&surface) {
			warn!("{} not started: {err}", S::LABEL);
			*state_init.borrow_mut() = Some(session);
			return None;
		}
		let token = session.token().unwrap_or_default();
		*state_init.borrow_mut() = Some(session);

		let pending = Arc::new(AtomicI32::new(0));
		cancel_on_cleanup(token.clone(), pending.clone());

		let resize = fullscreen.then(|| {
			let state_resize = state_init.clone();
			follow_window_resize(&window, canvas.clone(), token.clone(), move |nw, nh| {
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			})
		});

		let state_anim = state_init.clone();
		let animate = run_frame_loop(token.clone(), pending.clone(), move || {
			let mut guard = state_anim.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return Frame::Cancelled;
			};
			let frame = s.tick(FRAME_DT);
			if frame == Frame::Render {
				s.paint(&surface.ctx);
			}
			frame
		});

		Some(Teardown {
			token,
			pending,
			animate,
			resize,
		})
	});

	let position = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		Some(pointer_position(&canvas, ev))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = position(&ev) else {
			return;
		};
		// the borrow ends before the callback runs
		let picked = match *state_md.borrow_mut() {
			Some(ref mut s) => s.pointer_down(x, y),
			None => None,
		};
		if let (Some(node), Some(cb)) = (picked, on_select) {
			cb.run(node);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = position(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = position(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

/// Continuously animated 2D layout. Drag nodes to pin them, drag the
/// background to pan, scroll to zoom.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_select: Option<Callback<GraphNode>>,
) -> impl IntoView {
	graph_canvas::<ForceGraphState>(data, fullscreen, width, height, on_select)
}
