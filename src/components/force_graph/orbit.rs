use leptos::prelude::*;
use web_sys::CanvasRenderingContext2d;

use super::component::{CanvasSession, CanvasSurface, graph_canvas};
use super::render;
use super::state::OrbitState;
use crate::engine::{CancellationToken, EngineError, Frame, GraphData, GraphNode};

impl CanvasSession for OrbitState {
	const LABEL: &'static str = "orbit view";

	fn open(data: &GraphData, width: f64, height: f64) -> Self {
		OrbitState::new(data, width, height)
	}

	// the whole pre-layout runs here, before the first frame
	fn start(&mut self, surface: &CanvasSurface) -> Result<(), EngineError> {
		OrbitState::start(self, Some(surface))
	}

	fn token(&self) -> Option<CancellationToken> {
		self.scheduler.as_ref().map(|s| s.token())
	}

	fn tick(&mut self, dt: f64) -> Frame {
		OrbitState::tick(self, dt)
	}

	fn paint(&self, ctx: &CanvasRenderingContext2d) {
		render::render_orbit(self, ctx);
	}

	fn resize(&mut self, width: f64, height: f64) {
		OrbitState::resize(self, width, height);
	}

	fn pointer_down(&mut self, x: f64, y: f64) -> Option<GraphNode> {
		OrbitState::pointer_down(self, x, y)
	}

	fn pointer_move(&mut self, x: f64, y: f64) {
		OrbitState::pointer_move(self, x, y);
	}

	fn pointer_up(&mut self) {
		OrbitState::pointer_up(self);
	}

	fn pointer_leave(&mut self) {
		OrbitState::pointer_up(self);
	}

	fn wheel(&mut self, _x: f64, _y: f64, delta_y: f64) {
		self.camera.zoom(delta_y);
	}
}

/// 3D layout computed once up front, then shown through a slowly orbiting
/// camera. Click a node to select it, drag the background to turn the
/// camera, scroll to move it closer or further.
#[component]
pub fn ForceGraphOrbit(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_select: Option<Callback<GraphNode>>,
) -> impl IntoView {
	graph_canvas::<OrbitState>(data, fullscreen, width, height, on_select)
}
