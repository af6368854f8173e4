//! Simulation parameters.

/// Bounding sphere used to keep a batch layout from diverging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Distance from the center no node may exceed.
	pub max_radius: f64,
	/// Extra margin between a node's rim and the sphere.
	pub padding: f64,
}

impl Default for Bounds {
	fn default() -> Self {
		Self {
			max_radius: 150.0,
			padding: 20.0,
		}
	}
}

/// Force coefficients and integration settings.
///
/// `Default` is the planar (2D, continuous) model; [`SimulationConfig::spatial`]
/// is the 3D batch preset.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Pull of every node toward the viewport center.
	pub center_strength: f64,
	/// Rest length of an edge.
	pub link_distance: f64,
	/// Spring coefficient of every edge.
	pub link_strength: f64,
	/// Numerator of the inverse-square pair repulsion.
	pub repulsion: f64,
	/// Per-step velocity multiplier, below 1.
	pub damping: f64,
	/// Fraction of the velocity applied to the position each step.
	pub time_scale: f64,
	/// Step count of a batch pre-layout.
	pub iterations: usize,
	/// Width of the uniform window initial positions are jittered in.
	pub initial_spread: f64,
	/// Radius of a node with zero weight.
	pub node_radius_base: f64,
	/// Clamp applied after each step, if any.
	pub bounds: Option<Bounds>,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			center_strength: 0.02,
			link_distance: 150.0,
			link_strength: 0.1,
			repulsion: 2000.0,
			damping: 0.9,
			time_scale: 0.3,
			iterations: 100,
			initial_spread: 150.0,
			node_radius_base: 8.0,
			bounds: None,
		}
	}
}

impl SimulationConfig {
	/// 2D continuous preset, same as `Default`.
	pub fn planar() -> Self {
		Self::default()
	}

	/// 3D batch preset: shorter links, a wider start and the bounding sphere.
	pub fn spatial() -> Self {
		Self {
			link_distance: 120.0,
			initial_spread: 200.0,
			bounds: Some(Bounds::default()),
			..Self::default()
		}
	}

	/// Rendered and picked radius for a node of `weight` hours.
	pub fn radius_for(&self, weight: f64) -> f64 {
		self.node_radius_base + weight / 2.0
	}

	/// Sets the pre-layout step count.
	pub fn with_iterations(mut self, iterations: usize) -> Self {
		self.iterations = iterations;
		self
	}

	/// Sets or removes the bounding sphere.
	pub fn with_bounds(mut self, bounds: Option<Bounds>) -> Self {
		self.bounds = bounds;
		self
	}

	/// Sets the per-step velocity multiplier.
	pub fn with_damping(mut self, damping: f64) -> Self {
		self.damping = damping;
		self
	}

	/// Disables every force term, leaving only damped integration.
	pub fn inert(self) -> Self {
		Self {
			center_strength: 0.0,
			link_strength: 0.0,
			repulsion: 0.0,
			..self
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spatial_preset_only_changes_layout_shape() {
		let planar = SimulationConfig::planar();
		let spatial = SimulationConfig::spatial();
		assert_eq!(spatial.link_distance, 120.0);
		assert_eq!(spatial.bounds, Some(Bounds { max_radius: 150.0, padding: 20.0 }));
		assert_eq!(spatial.repulsion, planar.repulsion);
		assert_eq!(spatial.damping, planar.damping);
		assert_eq!(planar.bounds, None);
	}

	#[test]
	fn radius_grows_with_weight() {
		let config = SimulationConfig::default();
		assert_eq!(config.radius_for(0.0), 8.0);
		assert_eq!(config.radius_for(12.0), 14.0);
	}
}
