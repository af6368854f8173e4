use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::engine::{
	EngineError, Frame, GraphData, GraphNode, Mode, Scheduler, Simulation, SimulationConfig,
	Surface, Vec2, Vec3, Viewport, hit_test,
};

/// Opacity of nodes and edges outside the current selection.
pub const DIMMED_ALPHA: f64 = 0.3;

fn browser_rng() -> SmallRng {
	SmallRng::seed_from_u64((js_sys::Math::random() * u64::MAX as f64) as u64)
}

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Wheel zoom anchored at the pointer, clamped to 0.1x..10x.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Background drag: pans the 2D view, orbits the 3D camera.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub origin_a: f64,
	pub origin_b: f64,
}

/// Eased 0..1 strength of the selection highlight.
#[derive(Clone, Debug, Default)]
pub struct Emphasis {
	pub t: f64,
}

impl Emphasis {
	pub fn advance(&mut self, active: bool, dt: f64) {
		let (target, speed) = if active { (1.0, 6.0) } else { (0.0, 4.0) };
		self.t += (target - self.t) * (speed * dt).min(1.0);
		if !active && self.t < 0.01 {
			self.t = 0.0;
		}
	}

	/// Alpha for something outside the selection.
	pub fn dimmed_alpha(&self) -> f64 {
		let t = ease_out_cubic(self.t);
		1.0 - (1.0 - DIMMED_ALPHA) * t
	}
}

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Node payload for the selection callback.
fn source_node<V>(source: &GraphData, sim: &Simulation<V>, idx: usize) -> Option<GraphNode>
where
	V: crate::engine::Vector,
{
	let id = &sim.graph().node(idx)?.id;
	source.node(id).cloned()
}

/// 2D canvas session: continuous layout under a pan/zoom transform.
pub struct ForceGraphState {
	pub sim: Simulation<Vec2>,
	pub scheduler: Option<Scheduler>,
	pub source: GraphData,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub emphasis: Emphasis,
	pub width: f64,
	pub height: f64,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut rng = browser_rng();
		Self {
			sim: Simulation::new(data, Viewport::new(width, height), SimulationConfig::planar(), &mut rng),
			scheduler: None,
			source: data.clone(),
			transform: ViewTransform::default(),
			pan: PanState::default(),
			emphasis: Emphasis::default(),
			width,
			height,
		}
	}

	pub fn start<S: Surface + ?Sized>(&mut self, surface: Option<&S>) -> Result<(), EngineError> {
		self.scheduler = Some(Scheduler::start(Mode::Continuous, &mut self.sim, surface)?);
		Ok(())
	}

	pub fn tick(&mut self, dt: f64) -> Frame {
		let Some(scheduler) = self.scheduler.as_mut() else {
			return Frame::Cancelled;
		};
		let frame = scheduler.tick(&mut self.sim);
		self.emphasis
			.advance(self.sim.interaction().selected().is_some(), dt);
		frame
	}

	/// A hit grabs the node; a miss clears the selection and pans.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> Option<GraphNode> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		match self.sim.pointer_down(gx, gy) {
			Some(idx) => source_node(&self.source, &self.sim, idx),
			None => {
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					origin_a: self.transform.x,
					origin_b: self.transform.y,
				};
				None
			}
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.sim.interaction().dragging().is_some() {
			let (gx, gy) = self.transform.screen_to_graph(sx, sy);
			self.sim.pointer_move(gx, gy);
		} else if self.pan.active {
			self.transform.x = self.pan.origin_a + (sx - self.pan.start_x);
			self.transform.y = self.pan.origin_b + (sy - self.pan.start_y);
		}
	}

	pub fn pointer_up(&mut self) {
		self.sim.pointer_up();
		self.pan.active = false;
	}

	pub fn pointer_leave(&mut self) {
		self.sim.pointer_leave();
		self.pan.active = false;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.resize(Viewport::new(width, height));
	}
}

/// A node projected onto the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	/// Pixels per scene unit at this depth.
	pub scale: f64,
	pub depth: f64,
}

/// Perspective camera circling the origin.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
	pub yaw: f64,
	pub pitch: f64,
	pub distance: f64,
	/// Vertical field of view, radians.
	pub fov: f64,
	/// Idle rotation, radians per second.
	pub spin: f64,
}

impl Default for OrbitCamera {
	fn default() -> Self {
		Self {
			yaw: 0.0,
			pitch: 0.0,
			distance: 400.0,
			fov: 75f64.to_radians(),
			spin: 0.15,
		}
	}
}

impl OrbitCamera {
	const NEAR: f64 = 0.1;

	pub fn project(&self, p: Vec3, width: f64, height: f64) -> Option<Projected> {
		let (sy, cy) = self.yaw.sin_cos();
		let (sp, cp) = self.pitch.sin_cos();
		let x = p.x * cy - p.z * sy;
		let z = p.x * sy + p.z * cy;
		let y = p.y * cp - z * sp;
		let z = p.y * sp + z * cp;

		let depth = self.distance - z;
		if depth <= Self::NEAR {
			return None;
		}
		let focal = (height / 2.0) / (self.fov / 2.0).tan();
		let scale = focal / depth;
		Some(Projected {
			x: width / 2.0 + x * scale,
			y: height / 2.0 - y * scale,
			scale,
			depth,
		})
	}

	pub fn zoom(&mut self, delta_y: f64) {
		let factor = if delta_y > 0.0 { 1.1 } else { 0.9 };
		self.distance = (self.distance * factor).clamp(150.0, 2000.0);
	}
}

/// 3D session: one batch pre-layout, then an idle orbit.
pub struct OrbitState {
	pub sim: Simulation<Vec3>,
	pub scheduler: Option<Scheduler>,
	pub source: GraphData,
	pub camera: OrbitCamera,
	pub pan: PanState,
	pub emphasis: Emphasis,
	pub width: f64,
	pub height: f64,
}

impl OrbitState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut rng = browser_rng();
		Self {
			sim: Simulation::new(data, Viewport::new(width, height), SimulationConfig::spatial(), &mut rng),
			scheduler: None,
			source: data.clone(),
			camera: OrbitCamera::default(),
			pan: PanState::default(),
			emphasis: Emphasis::default(),
			width,
			height,
		}
	}

	pub fn start<S: Surface + ?Sized>(&mut self, surface: Option<&S>) -> Result<(), EngineError> {
		self.scheduler = Some(Scheduler::start(Mode::Batch, &mut self.sim, surface)?);
		Ok(())
	}

	pub fn tick(&mut self, dt: f64) -> Frame {
		let Some(scheduler) = self.scheduler.as_mut() else {
			return Frame::Cancelled;
		};
		let frame = scheduler.tick(&mut self.sim);
		if !self.pan.active {
			self.camera.yaw += self.camera.spin * dt;
		}
		self.emphasis
			.advance(self.sim.interaction().selected().is_some(), dt);
		frame
	}

	/// Projected nodes, in node order.
	pub fn projected(&self) -> Vec<Option<Projected>> {
		self.sim
			.graph()
			.nodes()
			.iter()
			.map(|n| self.camera.project(n.position, self.width, self.height))
			.collect()
	}

	/// Screen-space pick over the projected circles.
	pub fn pick(&self, sx: f64, sy: f64) -> Option<usize> {
		let nodes = self.sim.graph().nodes();
		let circles = self.projected().into_iter().zip(nodes).map(|(p, n)| match p {
			Some(p) => (p.x, p.y, n.radius * p.scale),
			None => (f64::NAN, f64::NAN, 0.0),
		});
		hit_test(circles, sx, sy)
	}

	/// Clicking a node selects it; anywhere else clears the selection and
	/// starts turning the camera.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) -> Option<GraphNode> {
		let hit = self.pick(sx, sy);
		self.sim.select(hit);
		match hit {
			Some(idx) => source_node(&self.source, &self.sim, idx),
			None => {
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					origin_a: self.camera.yaw,
					origin_b: self.camera.pitch,
				};
				None
			}
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.pan.active {
			self.camera.yaw = self.pan.origin_a + (sx - self.pan.start_x) * 0.01;
			self.camera.pitch = (self.pan.origin_b + (sy - self.pan.start_y) * 0.01).clamp(-1.4, 1.4);
		}
	}

	pub fn pointer_up(&mut self) {
		self.pan.active = false;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.resize(Viewport::new(width, height));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::Vector;

	#[test]
	fn zoom_keeps_the_pointer_fixed() {
		let mut t = ViewTransform::default();
		let before = t.screen_to_graph(200.0, 150.0);
		t.zoom_at(200.0, 150.0, -1.0);
		let after = t.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		assert!((t.k - 1.1).abs() < 1e-12);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut t = ViewTransform::default();
		for _ in 0..100 {
			t.zoom_at(0.0, 0.0, 1.0);
		}
		assert_eq!(t.k, 0.1);
	}

	#[test]
	fn emphasis_eases_in_and_snaps_out() {
		let mut e = Emphasis::default();
		e.advance(true, 0.016);
		assert!(e.t > 0.0 && e.t < 1.0);
		for _ in 0..200 {
			e.advance(true, 0.016);
		}
		assert!((e.dimmed_alpha() - DIMMED_ALPHA).abs() < 1e-6);
		for _ in 0..200 {
			e.advance(false, 0.016);
		}
		assert_eq!(e.t, 0.0);
		assert_eq!(e.dimmed_alpha(), 1.0);
	}

	#[test]
	fn origin_projects_to_screen_center() {
		let camera = OrbitCamera::default();
		let p = camera.project(Vec3::zero(), 800.0, 600.0).unwrap();
		assert!((p.x - 400.0).abs() < 1e-9 && (p.y - 300.0).abs() < 1e-9);
		assert_eq!(p.depth, 400.0);
	}

	#[test]
	fn nearer_points_look_bigger() {
		let camera = OrbitCamera::default();
		let near = camera.project(Vec3::new(0.0, 0.0, 100.0), 800.0, 600.0).unwrap();
		let far = camera.project(Vec3::new(0.0, 0.0, -100.0), 800.0, 600.0).unwrap();
		assert!(near.scale > far.scale);
		assert!(near.depth < far.depth);
	}

	#[test]
	fn behind_the_camera_is_not_drawn() {
		let camera = OrbitCamera::default();
		assert_eq!(camera.project(Vec3::new(0.0, 0.0, 500.0), 800.0, 600.0), None);
	}

	#[test]
	fn yaw_rotates_around_the_vertical_axis() {
		let camera = OrbitCamera {
			yaw: std::f64::consts::FRAC_PI_2,
			..OrbitCamera::default()
		};
		// +x swings onto the depth axis and lands on the screen center
		let p = camera.project(Vec3::new(100.0, 0.0, 0.0), 800.0, 600.0).unwrap();
		assert!((p.x - 400.0).abs() < 1e-9);
		assert!((p.depth - 300.0).abs() < 1e-9);
	}
}
