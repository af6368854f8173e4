//! Drives a [`Simulation`] from a host's frame callbacks.
//!
//! The host owns the actual frame loop (`requestAnimationFrame` in the
//! browser). It calls [`Scheduler::tick`] once per frame and stops
//! rescheduling as soon as a tick reports [`Frame::Cancelled`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use super::error::EngineError;
use super::graph::Viewport;
use super::simulation::Simulation;
use super::vector::Vector;

/// A drawing surface able to report its size.
pub trait Surface {
	/// Current size of the surface.
	fn viewport(&self) -> Viewport;
}

impl Surface for Viewport {
	fn viewport(&self) -> Viewport {
		*self
	}
}

/// How a [`Scheduler`] spends its frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	/// One solver step per frame, for as long as the view lives.
	Continuous,
	/// A fixed pre-layout before the first frame, then render-only frames.
	Batch,
}

/// Shared cancellation flag. Clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
	/// A live token.
	pub fn new() -> Self {
		Self::default()
	}

	/// Cancels every clone of this token.
	pub fn cancel(&self) {
		self.0.store(true, Ordering::Release);
	}

	/// Whether any clone was cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}
}

/// What the host should do with the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame {
	/// Paint the current positions and request another frame.
	Render,
	/// Stop; do not reschedule.
	Cancelled,
}

/// Per-view driver created by [`Scheduler::start`].
#[derive(Debug)]
pub struct Scheduler {
	mode: Mode,
	token: CancellationToken,
	frames: u64,
}

impl Scheduler {
	/// Starts driving `sim`.
	///
	/// Without a surface nothing starts and the simulation is left as it was.
	/// In batch mode the whole pre-layout runs here, before returning.
	pub fn start<V, S>(
		mode: Mode,
		sim: &mut Simulation<V>,
		surface: Option<&S>,
	) -> Result<Self, EngineError>
	where
		V: Vector,
		S: Surface + ?Sized,
	{
		let Some(surface) = surface else {
			warn!("no drawing surface, deferring {mode:?} layout");
			return Err(EngineError::SurfaceUnavailable);
		};
		sim.resize(surface.viewport());
		if mode == Mode::Batch {
			let iterations = sim.config().iterations;
			sim.pre_layout(iterations);
		}
		debug!("scheduler started in {mode:?} mode");
		Ok(Self {
			mode,
			token: CancellationToken::new(),
			frames: 0,
		})
	}

	/// Mode chosen at start.
	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// A handle the host can cancel from teardown code.
	pub fn token(&self) -> CancellationToken {
		self.token.clone()
	}

	/// False once cancelled.
	pub fn is_running(&self) -> bool {
		!self.token.is_cancelled()
	}

	/// Frames rendered so far.
	pub fn frames(&self) -> u64 {
		self.frames
	}

	/// Work for one frame. Checks cancellation before touching the simulation.
	pub fn tick<V: Vector>(&mut self, sim: &mut Simulation<V>) -> Frame {
		if self.token.is_cancelled() {
			return Frame::Cancelled;
		}
		if self.mode == Mode::Continuous {
			sim.step();
		}
		self.frames += 1;
		Frame::Render
	}

	/// Cancels the token; later ticks do nothing.
	pub fn stop(&self) {
		if !self.token.is_cancelled() {
			debug!("scheduler stopped after {} frames", self.frames);
		}
		self.token.cancel();
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::engine::config::SimulationConfig;
	use crate::engine::types::GraphData;
	use crate::engine::vector::{Vec2, Vec3};

	fn session<V: Vector>(config: SimulationConfig) -> Simulation<V> {
		let mut rng = SmallRng::seed_from_u64(21);
		Simulation::new(&GraphData::sample().unwrap(), Viewport::default(), config, &mut rng)
	}

	fn positions<V: Vector>(sim: &Simulation<V>) -> Vec<V> {
		sim.graph().nodes().iter().map(|n| n.position).collect()
	}

	#[test]
	fn missing_surface_does_not_start() {
		let mut sim: Simulation<Vec2> = session(SimulationConfig::planar());
		let before = positions(&sim);

		let err = Scheduler::start::<_, Viewport>(Mode::Batch, &mut sim, None).unwrap_err();
		assert_eq!(err, EngineError::SurfaceUnavailable);
		assert_eq!(positions(&sim), before);
		assert_eq!(sim.steps(), 0);

		// retry once a surface shows up
		let surface = Viewport::new(640.0, 480.0);
		assert!(Scheduler::start(Mode::Continuous, &mut sim, Some(&surface)).is_ok());
		assert_eq!(sim.graph().viewport(), surface);
	}

	#[test]
	fn continuous_mode_steps_every_frame() {
		let mut sim: Simulation<Vec2> = session(SimulationConfig::planar());
		let mut scheduler =
			Scheduler::start(Mode::Continuous, &mut sim, Some(&Viewport::default())).unwrap();
		assert_eq!(sim.steps(), 0);

		for _ in 0..3 {
			assert_eq!(scheduler.tick(&mut sim), Frame::Render);
		}
		assert_eq!(sim.steps(), 3);
		assert_eq!(scheduler.frames(), 3);
	}

	#[test]
	fn batch_mode_lays_out_then_only_renders() {
		let mut sim: Simulation<Vec3> = session(SimulationConfig::spatial());
		let mut scheduler =
			Scheduler::start(Mode::Batch, &mut sim, Some(&Viewport::default())).unwrap();
		assert_eq!(sim.steps(), 100);

		let settled = positions(&sim);
		for _ in 0..10 {
			assert_eq!(scheduler.tick(&mut sim), Frame::Render);
		}
		assert_eq!(positions(&sim), settled);
		assert_eq!(sim.steps(), 100);
	}

	#[test]
	fn stop_cancels_all_future_ticks() {
		let mut sim: Simulation<Vec2> = session(SimulationConfig::planar());
		let mut scheduler =
			Scheduler::start(Mode::Continuous, &mut sim, Some(&Viewport::default())).unwrap();
		let token = scheduler.token();
		scheduler.tick(&mut sim);

		token.cancel();
		assert!(!scheduler.is_running());
		let frozen = positions(&sim);
		for _ in 0..5 {
			assert_eq!(scheduler.tick(&mut sim), Frame::Cancelled);
		}
		assert_eq!(positions(&sim), frozen);
		assert_eq!(sim.steps(), 1);

		scheduler.stop();
		assert_eq!(scheduler.tick(&mut sim), Frame::Cancelled);
	}

	#[test]
	fn empty_graph_runs_without_error() {
		let mut rng = SmallRng::seed_from_u64(22);
		let mut sim: Simulation<Vec2> = Simulation::new(
			&GraphData::default(),
			Viewport::default(),
			SimulationConfig::planar(),
			&mut rng,
		);
		let mut scheduler =
			Scheduler::start(Mode::Continuous, &mut sim, Some(&Viewport::default())).unwrap();
		assert_eq!(scheduler.tick(&mut sim), Frame::Render);
		assert!(sim.graph().is_empty());
	}
}
