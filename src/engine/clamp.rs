//! Bounding-sphere constraint for batch layouts.

use super::config::Bounds;
use super::graph::Graph;
use super::vector::Vector;

/// Relative slack below which a node already counts as on the sphere.
const TOLERANCE: f64 = 1e-9;

/// Pulls every node back inside `bounds`, measured from the graph center
/// (the origin for 3D layouts). A node whose rim would cross the sphere is
/// moved radially onto the limit; nodes inside are left alone, and so are
/// pinned nodes, which only a drag may move.
pub fn clamp<V: Vector>(graph: &mut Graph<V>, bounds: &Bounds) {
	let center = graph.center();
	for node in graph.nodes_mut().iter_mut().filter(|n| !n.pinned) {
		let limit = (bounds.max_radius - node.radius - bounds.padding).max(0.0);
		let offset = node.position - center;
		let dist = offset.length();
		if dist > limit + TOLERANCE * limit.max(1.0) {
			node.position = center + offset * (limit / dist);
		}
	}
}
