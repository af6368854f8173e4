//! One visualization session: graph, parameters and pointer state together.

use log::info;
use rand::Rng;

use super::clamp::clamp;
use super::config::SimulationConfig;
use super::graph::{Graph, Viewport};
use super::interaction::{Interaction, pick};
use super::solver;
use super::types::GraphData;
use super::vector::Vector;

/// A loaded graph with its parameters and pointer state.
pub struct Simulation<V> {
	graph: Graph<V>,
	config: SimulationConfig,
	interaction: Interaction,
	steps: u64,
}

impl<V: Vector> Simulation<V> {
	/// Loads `data` and jitters the nodes around the viewport center.
	pub fn new<R: Rng + ?Sized>(
		data: &GraphData,
		viewport: Viewport,
		config: SimulationConfig,
		rng: &mut R,
	) -> Self {
		let graph = Graph::load(data, viewport, &config, rng);
		info!(
			"loaded {:?}: {} nodes, {} edges ({}D)",
			data.topic,
			graph.len(),
			graph.edges().len(),
			V::DIM
		);
		Self {
			graph,
			config,
			interaction: Interaction::default(),
			steps: 0,
		}
	}

	/// Replaces the whole graph; nothing of the previous session survives.
	pub fn reload<R: Rng + ?Sized>(&mut self, data: &GraphData, rng: &mut R) {
		let viewport = self.graph.viewport();
		*self = Self::new(data, viewport, self.config.clone(), rng);
	}

	/// Positions and edges for the renderer.
	pub fn graph(&self) -> &Graph<V> {
		&self.graph
	}

	/// Parameters the session was loaded with.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Selected and dragged node.
	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	/// Steps taken since load.
	pub fn steps(&self) -> u64 {
		self.steps
	}

	/// One solver step, followed by the clamp when the config carries bounds.
	pub fn step(&mut self) {
		solver::step(&mut self.graph, &self.config, self.config.time_scale);
		if let Some(bounds) = &self.config.bounds {
			clamp(&mut self.graph, bounds);
		}
		self.steps += 1;
	}

	/// Runs `iterations` steps back to back.
	pub fn pre_layout(&mut self, iterations: usize) {
		for _ in 0..iterations {
			self.step();
		}
		info!(
			"pre-layout done after {iterations} steps, energy {:.3}",
			self.graph.kinetic_energy()
		);
	}

	/// Follows a surface resize.
	pub fn resize(&mut self, viewport: Viewport) {
		self.graph.set_viewport(viewport);
	}

	/// Node under `(x, y)`, if any.
	pub fn pick(&self, x: f64, y: f64) -> Option<usize> {
		pick(&self.graph, x, y)
	}

	/// Sets or clears the selection.
	pub fn select(&mut self, idx: Option<usize>) {
		self.interaction.select(idx);
	}

	/// Pins `idx` under the pointer.
	pub fn begin_drag(&mut self, idx: usize) {
		self.interaction.begin_drag(&mut self.graph, idx);
	}

	/// Moves the pinned node to `(x, y)`.
	pub fn update_drag(&mut self, idx: usize, x: f64, y: f64) {
		self.interaction.update_drag(&mut self.graph, idx, x, y);
	}

	/// Releases the pinned node.
	pub fn end_drag(&mut self) {
		self.interaction.end_drag(&mut self.graph);
	}

	/// Picks under the pointer; a hit is selected and starts a drag, a miss
	/// clears the selection.
	pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<usize> {
		let hit = self.pick(x, y);
		self.select(hit);
		if let Some(idx) = hit {
			self.begin_drag(idx);
		}
		hit
	}

	/// Moves the held node to the pointer.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.interaction.dragging() {
			self.update_drag(idx, x, y);
		}
	}

	/// Ends any drag; the selection stays.
	pub fn pointer_up(&mut self) {
		self.end_drag();
	}

	/// Same as releasing the button.
	pub fn pointer_leave(&mut self) {
		self.end_drag();
	}
}
