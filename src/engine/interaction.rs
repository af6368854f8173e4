//! Pointer picking, drag pinning and selection emphasis.

use log::debug;

use super::graph::{Edge, Graph};
use super::vector::Vector;

/// Index of the first circle `(cx, cy, radius)` strictly containing `(x, y)`.
pub fn hit_test<I>(circles: I, x: f64, y: f64) -> Option<usize>
where
	I: IntoIterator<Item = (f64, f64, f64)>,
{
	circles.into_iter().position(|(cx, cy, r)| {
		let (dx, dy) = (cx - x, cy - y);
		(dx * dx + dy * dy).sqrt() < r
	})
}

/// Node under the pointer, by planar position and radius.
pub fn pick<V: Vector>(graph: &Graph<V>, x: f64, y: f64) -> Option<usize> {
	hit_test(
		graph.nodes().iter().map(|n| {
			let (cx, cy) = n.position.planar();
			(cx, cy, n.radius)
		}),
		x,
		y,
	)
}

/// Drag and selection state for one graph.
///
/// Dragging pins a node so the solver leaves it alone; selecting only
/// changes what a renderer emphasizes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interaction {
	dragging: Option<usize>,
	selected: Option<usize>,
}

impl Interaction {
	/// Node currently held by the pointer.
	pub fn dragging(&self) -> Option<usize> {
		self.dragging
	}

	/// Node last clicked, kept after the drag ends.
	pub fn selected(&self) -> Option<usize> {
		self.selected
	}

	/// Pins `idx` and stops it dead.
	pub fn begin_drag<V: Vector>(&mut self, graph: &mut Graph<V>, idx: usize) {
		self.end_drag(graph);
		if let Some(node) = graph.node_mut(idx) {
			node.pinned = true;
			node.velocity = V::zero();
			self.dragging = Some(idx);
			debug!("drag start on {}", node.id);
		}
	}

	/// Moves the dragged node to the pointer; ignored for any other node.
	pub fn update_drag<V: Vector>(&mut self, graph: &mut Graph<V>, idx: usize, x: f64, y: f64) {
		if self.dragging != Some(idx) {
			return;
		}
		if let Some(node) = graph.node_mut(idx) {
			node.position = node.position.with_planar(x, y);
			node.velocity = V::zero();
		}
	}

	/// Unpins the held node, if any.
	pub fn end_drag<V: Vector>(&mut self, graph: &mut Graph<V>) {
		if let Some(idx) = self.dragging.take() {
			if let Some(node) = graph.node_mut(idx) {
				node.pinned = false;
			}
		}
	}

	/// Changes emphasis only; positions are untouched.
	pub fn select(&mut self, idx: Option<usize>) {
		self.selected = idx;
	}

	/// Whether a node is drawn at full strength: everything when nothing is
	/// selected, otherwise the selection and its neighbors.
	pub fn is_emphasized<V: Vector>(&self, graph: &Graph<V>, idx: usize) -> bool {
		match self.selected {
			None => true,
			Some(sel) => sel == idx || graph.neighbors(sel).any(|n| n == idx),
		}
	}

	/// Whether `edge` touches the selected node.
	pub fn is_edge_emphasized(&self, edge: &Edge) -> bool {
		self.selected.is_some_and(|sel| edge.touches(sel))
	}
}
