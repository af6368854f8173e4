//! Live simulation state: a flat arena of nodes plus index-based edges.

use std::collections::HashMap;

use log::{debug, warn};
use rand::Rng;

use super::config::SimulationConfig;
use super::types::{Category, GraphData};
use super::vector::Vector;

/// Size of the drawing surface in node coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in node units.
	pub width: f64,
	/// Height in node units.
	pub height: f64,
}

impl Viewport {
	/// Size from width and height.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(800.0, 600.0)
	}
}

/// One laid-out node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<V> {
	/// Id from the description.
	pub id: String,
	/// Text drawn under the node.
	pub label: String,
	/// Picks the fill colour.
	pub category: Category,
	/// Estimated hours.
	pub weight: f64,
	/// Derived from `weight`; used for drawing and picking.
	pub radius: f64,
	/// Current position.
	pub position: V,
	/// Velocity carried into the next step.
	pub velocity: V,
	/// Held by a drag; excluded from integration.
	pub pinned: bool,
}

/// An edge resolved to indices into [`Graph::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
}

impl Edge {
	/// Whether `idx` is either endpoint.
	pub fn touches(&self, idx: usize) -> bool {
		self.source == idx || self.target == idx
	}
}

/// Nodes and resolved edges of one session, plus the center-force target.
#[derive(Clone, Debug)]
pub struct Graph<V> {
	nodes: Vec<Node<V>>,
	edges: Vec<Edge>,
	center: V,
	viewport: Viewport,
}

impl<V: Vector> Graph<V> {
	/// Builds the live graph for one visualization session.
	///
	/// Nodes start at the center plus uniform jitter so no two share a
	/// position; edges naming an unknown node are dropped without error.
	pub fn load<R: Rng + ?Sized>(
		data: &GraphData,
		viewport: Viewport,
		config: &SimulationConfig,
		rng: &mut R,
	) -> Self {
		let center = V::viewport_center(viewport.width, viewport.height);
		let half = config.initial_spread / 2.0;
		let mut id_to_idx = HashMap::new();
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for node in &data.nodes {
			if id_to_idx.contains_key(&node.id) {
				warn!("duplicate node id {:?}, keeping the first", node.id);
				continue;
			}
			id_to_idx.insert(node.id.clone(), nodes.len());
			nodes.push(Node {
				id: node.id.clone(),
				label: node.label.clone(),
				category: node.category,
				weight: node.weight,
				radius: config.radius_for(node.weight),
				position: center + V::jitter(rng, half),
				velocity: V::zero(),
				pinned: false,
			});
		}

		let edges = data
			.edges
			.iter()
			.filter_map(|link| {
				match (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
					(Some(&source), Some(&target)) => Some(Edge { source, target }),
					_ => {
						debug!("dropping edge {} -> {}", link.source, link.target);
						None
					}
				}
			})
			.collect();

		Self {
			nodes,
			edges,
			center,
			viewport,
		}
	}

	/// Assembles a graph from already-positioned parts.
	///
	/// Edges with an out-of-range endpoint are dropped, matching [`Graph::load`].
	pub fn from_parts(nodes: Vec<Node<V>>, edges: Vec<Edge>, viewport: Viewport) -> Self {
		let edges = edges
			.into_iter()
			.filter(|e| e.source < nodes.len() && e.target < nodes.len())
			.collect();
		Self {
			nodes,
			edges,
			center: V::viewport_center(viewport.width, viewport.height),
			viewport,
		}
	}

	/// Nodes in arena order.
	pub fn nodes(&self) -> &[Node<V>] {
		&self.nodes
	}

	/// Mutable access for the solver and the clamp.
	pub fn nodes_mut(&mut self) -> &mut [Node<V>] {
		&mut self.nodes
	}

	/// Node at `idx`.
	pub fn node(&self, idx: usize) -> Option<&Node<V>> {
		self.nodes.get(idx)
	}

	/// Mutable node at `idx`.
	pub fn node_mut(&mut self, idx: usize) -> Option<&mut Node<V>> {
		self.nodes.get_mut(idx)
	}

	/// Edges whose endpoints both resolved.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Node count.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True for a graph without nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Target of the center force.
	pub fn center(&self) -> V {
		self.center
	}

	/// Size of the surface the graph is laid out for.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Follows a surface resize; only the center target moves.
	pub fn set_viewport(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		self.center = V::viewport_center(viewport.width, viewport.height);
	}

	/// Arena index of the node with `id`.
	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.id == id)
	}

	/// Nodes sharing an edge with `idx`, in edge order.
	pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
		self.edges.iter().filter_map(move |e| {
			if e.source == idx {
				Some(e.target)
			} else if e.target == idx {
				Some(e.source)
			} else {
				None
			}
		})
	}

	/// Sum of squared speeds.
	pub fn kinetic_energy(&self) -> f64 {
		self.nodes.iter().map(|n| n.velocity.length_squared()).sum()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::engine::types::{GraphEdge, GraphNode};
	use crate::engine::vector::{Vec2, Vec3};

	fn node(id: &str, weight: f64) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_uppercase(),
			category: Category::Core,
			weight,
			description: String::new(),
			difficulty: None,
		}
	}

	fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			source: source.into(),
			target: target.into(),
		}
	}

	#[test]
	fn load_jitters_around_the_center() {
		let data = GraphData::sample().unwrap();
		let mut rng = SmallRng::seed_from_u64(1);
		let graph: Graph<Vec2> =
			Graph::load(&data, Viewport::new(800.0, 600.0), &SimulationConfig::default(), &mut rng);

		assert_eq!(graph.len(), 13);
		assert_eq!(graph.center(), Vec2::new(400.0, 300.0));
		for n in graph.nodes() {
			assert!((325.0..475.0).contains(&n.position.x));
			assert!((225.0..375.0).contains(&n.position.y));
			assert_eq!(n.velocity, Vec2::zero());
			assert!(!n.pinned);
			assert_eq!(n.radius, 8.0 + n.weight / 2.0);
		}
	}

	#[test]
	fn spatial_load_centers_on_origin() {
		let data = GraphData::sample().unwrap();
		let mut rng = SmallRng::seed_from_u64(2);
		let graph: Graph<Vec3> =
			Graph::load(&data, Viewport::new(1024.0, 768.0), &SimulationConfig::spatial(), &mut rng);

		assert_eq!(graph.center(), Vec3::zero());
		for n in graph.nodes() {
			for c in [n.position.x, n.position.y, n.position.z] {
				assert!((-100.0..100.0).contains(&c));
			}
		}
	}

	#[test]
	fn dangling_edges_are_omitted() {
		let data = GraphData {
			topic: String::new(),
			nodes: vec![node("a", 1.0), node("b", 2.0)],
			edges: vec![edge("a", "b"), edge("a", "ghost"), edge("ghost", "b")],
		};
		let mut rng = SmallRng::seed_from_u64(3);
		let graph: Graph<Vec2> =
			Graph::load(&data, Viewport::default(), &SimulationConfig::default(), &mut rng);

		assert_eq!(graph.edges(), &[Edge { source: 0, target: 1 }]);
	}

	#[test]
	fn duplicate_ids_keep_first_node() {
		let data = GraphData {
			topic: String::new(),
			nodes: vec![node("a", 1.0), node("a", 9.0), node("b", 2.0)],
			edges: vec![edge("a", "b")],
		};
		let mut rng = SmallRng::seed_from_u64(4);
		let graph: Graph<Vec2> =
			Graph::load(&data, Viewport::default(), &SimulationConfig::default(), &mut rng);

		assert_eq!(graph.len(), 2);
		assert_eq!(graph.nodes()[0].weight, 1.0);
		assert_eq!(graph.edges(), &[Edge { source: 0, target: 1 }]);
	}

	#[test]
	fn neighbors_follow_both_directions() {
		let data = GraphData::sample().unwrap();
		let mut rng = SmallRng::seed_from_u64(5);
		let graph: Graph<Vec2> =
			Graph::load(&data, Viewport::default(), &SimulationConfig::default(), &mut rng);

		let boundaries = graph.node_index("boundaries").unwrap();
		let mut ids: Vec<&str> = graph
			.neighbors(boundaries)
			.map(|i| graph.nodes()[i].id.as_str())
			.collect();
		ids.sort_unstable();
		assert_eq!(ids, ["client-components", "composition", "server-components"]);
	}

	#[test]
	fn incident_edges_are_the_ones_touching_the_node() {
		let data = GraphData::sample().unwrap();
		let mut rng = SmallRng::seed_from_u64(6);
		let graph: Graph<Vec2> =
			Graph::load(&data, Viewport::default(), &SimulationConfig::default(), &mut rng);

		let boundaries = graph.node_index("boundaries").unwrap();
		let incident = graph.edges().iter().filter(|e| e.touches(boundaries)).count();
		assert_eq!(incident, graph.neighbors(boundaries).count());
		assert!(!Edge { source: 0, target: 1 }.touches(2));
	}

	#[test]
	fn resize_moves_only_the_center() {
		let data = GraphData::sample().unwrap();
		let mut rng = SmallRng::seed_from_u64(6);
		let mut graph: Graph<Vec2> =
			Graph::load(&data, Viewport::default(), &SimulationConfig::default(), &mut rng);
		let before: Vec<Vec2> = graph.nodes().iter().map(|n| n.position).collect();

		graph.set_viewport(Viewport::new(1200.0, 900.0));
		assert_eq!(graph.center(), Vec2::new(600.0, 450.0));
		let after: Vec<Vec2> = graph.nodes().iter().map(|n| n.position).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn empty_graph_is_valid() {
		let mut rng = SmallRng::seed_from_u64(7);
		let graph: Graph<Vec2> = Graph::load(
			&GraphData::default(),
			Viewport::default(),
			&SimulationConfig::default(),
			&mut rng,
		);
		assert!(graph.is_empty());
		assert_eq!(graph.kinetic_energy(), 0.0);
	}
}
