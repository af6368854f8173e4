//! Center, link and repulsion forces plus damped integration.
//!
//! Forces accumulate into node velocities; only [`integrate`] moves
//! positions. The phases read what earlier phases wrote, so [`step`] always
//! runs them in the same order.

use super::config::SimulationConfig;
use super::graph::Graph;
use super::vector::Vector;

/// Distance substituted for coincident points so the unit direction stays finite.
const COINCIDENT_DISTANCE: f64 = 1.0;

/// Offset `to - from`, its length, and the guarded length used for division.
fn separation<V: Vector>(from: V, to: V) -> (V, f64) {
	let delta = to - from;
	let dist = delta.length();
	if dist == 0.0 {
		(delta, COINCIDENT_DISTANCE)
	} else {
		(delta, dist)
	}
}

/// Advances the simulation by one step.
pub fn step<V: Vector>(graph: &mut Graph<V>, config: &SimulationConfig, dt_scale: f64) {
	apply_center(graph, config);
	apply_links(graph, config);
	apply_repulsion(graph, config);
	integrate(graph, config, dt_scale);
}

/// Pulls every node toward the graph center.
pub fn apply_center<V: Vector>(graph: &mut Graph<V>, config: &SimulationConfig) {
	let center = graph.center();
	for node in graph.nodes_mut() {
		node.velocity += (center - node.position) * config.center_strength;
	}
}

/// Springs along every edge: endpoints farther apart than
/// `link_distance` are pulled together, closer ones pushed apart.
pub fn apply_links<V: Vector>(graph: &mut Graph<V>, config: &SimulationConfig) {
	for i in 0..graph.edges().len() {
		let edge = graph.edges()[i];
		let nodes = graph.nodes_mut();
		let (delta, dist) = separation(nodes[edge.source].position, nodes[edge.target].position);
		let force = (dist - config.link_distance) * config.link_strength;
		let f = delta * (force / dist);

		nodes[edge.source].velocity += f;
		nodes[edge.target].velocity -= f;
	}
}

/// Force `b` receives from `a`; `a` receives the exact negation.
pub fn repulsion_between<V: Vector>(a: V, b: V, config: &SimulationConfig) -> V {
	let (delta, dist) = separation(a, b);
	let force = config.repulsion / (dist * dist);
	delta * (force / dist)
}

/// Inverse-square push between every pair, applied equal and opposite.
pub fn apply_repulsion<V: Vector>(graph: &mut Graph<V>, config: &SimulationConfig) {
	let nodes = graph.nodes_mut();
	for i in 0..nodes.len() {
		for j in (i + 1)..nodes.len() {
			let f = repulsion_between(nodes[i].position, nodes[j].position, config);
			nodes[i].velocity -= f;
			nodes[j].velocity += f;
		}
	}
}

/// Moves free nodes along their velocity and damps it. Pinned nodes keep
/// their position and come to rest.
pub fn integrate<V: Vector>(graph: &mut Graph<V>, config: &SimulationConfig, dt_scale: f64) {
	for node in graph.nodes_mut() {
		if node.pinned {
			node.velocity = V::zero();
			continue;
		}
		node.position += node.velocity * dt_scale;
		node.velocity *= config.damping;
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::engine::graph::{Edge, Node, Viewport};
	use crate::engine::types::{Category, GraphData};
	use crate::engine::vector::{Vec2, Vec3};

	fn free_node<V: Vector>(id: &str, position: V) -> Node<V> {
		Node {
			id: id.into(),
			label: id.into(),
			category: Category::Core,
			weight: 0.0,
			radius: 8.0,
			position,
			velocity: V::zero(),
			pinned: false,
		}
	}

	fn pair(a: Vec2, b: Vec2, linked: bool) -> Graph<Vec2> {
		let edges = if linked {
			vec![Edge { source: 0, target: 1 }]
		} else {
			Vec::new()
		};
		Graph::from_parts(
			vec![free_node("a", a), free_node("b", b)],
			edges,
			Viewport::new(800.0, 600.0),
		)
	}

	fn distance(graph: &Graph<Vec2>) -> f64 {
		(graph.nodes()[1].position - graph.nodes()[0].position).length()
	}

	#[test]
	fn short_link_pushes_nodes_apart() {
		let config = SimulationConfig::default();
		let mut graph = pair(Vec2::new(395.0, 300.0), Vec2::new(405.0, 300.0), true);

		step(&mut graph, &config, config.time_scale);

		// center +-0.1, link -+14, repulsion -+20 => speed 33.9, moved 10.17 each
		let a = &graph.nodes()[0];
		let b = &graph.nodes()[1];
		assert!((a.position.x - 384.83).abs() < 1e-9, "{:?}", a.position);
		assert!((b.position.x - 415.17).abs() < 1e-9, "{:?}", b.position);
		assert!((distance(&graph) - 30.34).abs() < 1e-9);
		assert!((a.velocity.x + 30.51).abs() < 1e-9);
		assert!((b.velocity.x - 30.51).abs() < 1e-9);
	}

	#[test]
	fn long_link_pulls_nodes_together() {
		let config = SimulationConfig {
			repulsion: 0.0,
			center_strength: 0.0,
			..SimulationConfig::default()
		};
		let mut graph = pair(Vec2::new(100.0, 300.0), Vec2::new(500.0, 300.0), true);

		apply_links(&mut graph, &config);
		assert_eq!(graph.nodes()[0].velocity, Vec2::new(25.0, 0.0));
		assert_eq!(graph.nodes()[1].velocity, Vec2::new(-25.0, 0.0));
	}

	#[test]
	fn coincident_nodes_stay_finite() {
		let config = SimulationConfig::default();
		let mut graph = pair(Vec2::new(400.0, 300.0), Vec2::new(400.0, 300.0), true);

		step(&mut graph, &config, config.time_scale);
		for n in graph.nodes() {
			assert!(n.position.x.is_finite() && n.position.y.is_finite());
			assert!(n.velocity.x.is_finite() && n.velocity.y.is_finite());
		}
	}

	#[test]
	fn center_force_pulls_toward_viewport_center() {
		let config = SimulationConfig::default();
		let mut graph = pair(Vec2::new(300.0, 200.0), Vec2::new(500.0, 400.0), false);

		apply_center(&mut graph, &config);
		assert_eq!(graph.nodes()[0].velocity, Vec2::new(2.0, 2.0));
		assert_eq!(graph.nodes()[1].velocity, Vec2::new(-2.0, -2.0));
	}

	#[test]
	fn pinned_node_does_not_move() {
		let config = SimulationConfig::default();
		let mut graph = pair(Vec2::new(380.0, 300.0), Vec2::new(420.0, 300.0), true);
		graph.nodes_mut()[0].pinned = true;
		let held = graph.nodes()[0].position;

		for _ in 0..25 {
			step(&mut graph, &config, config.time_scale);
			assert_eq!(graph.nodes()[0].position, held);
			assert_eq!(graph.nodes()[0].velocity, Vec2::zero());
		}
		assert_ne!(graph.nodes()[1].position, Vec2::new(420.0, 300.0));
	}

	#[test]
	fn damping_alone_dissipates_energy() {
		let config = SimulationConfig::default().inert();
		let mut graph = pair(Vec2::new(100.0, 100.0), Vec2::new(700.0, 500.0), true);
		graph.nodes_mut()[0].velocity = Vec2::new(40.0, -12.0);
		graph.nodes_mut()[1].velocity = Vec2::new(-3.0, 25.0);

		let mut last = graph.kinetic_energy();
		for _ in 0..100 {
			step(&mut graph, &config, config.time_scale);
			let energy = graph.kinetic_energy();
			assert!(energy <= last);
			last = energy;
		}
		assert!(last < 1e-5);
	}

	#[test]
	fn sample_graph_settles_within_batch_budget() {
		let config = SimulationConfig::default();
		let data = GraphData::sample().unwrap();

		for seed in 0..8 {
			let mut rng = SmallRng::seed_from_u64(seed);
			let mut graph: Graph<Vec2> =
				Graph::load(&data, Viewport::new(800.0, 600.0), &config, &mut rng);

			let mut peak: f64 = 0.0;
			for _ in 0..config.iterations {
				step(&mut graph, &config, config.time_scale);
				peak = peak.max(graph.kinetic_energy());
			}
			let settled = graph.kinetic_energy();
			assert!(
				settled < peak * 0.02,
				"seed {seed}: energy {settled} vs peak {peak}"
			);
		}
	}

	#[test]
	fn empty_graph_steps_are_noops() {
		let config = SimulationConfig::default();
		let mut graph: Graph<Vec3> = Graph::from_parts(Vec::new(), Vec::new(), Viewport::default());
		step(&mut graph, &config, config.time_scale);
		assert!(graph.is_empty());
	}

	fn coord() -> impl Strategy<Value = f64> {
		-500.0..500.0f64
	}

	proptest! {
		#[test]
		fn repulsion_is_antisymmetric(
			ax in coord(), ay in coord(), az in coord(),
			bx in coord(), by in coord(), bz in coord(),
		) {
			let config = SimulationConfig::default();
			let mut graph = Graph::from_parts(
				vec![free_node("a", Vec3::new(ax, ay, az)), free_node("b", Vec3::new(bx, by, bz))],
				Vec::new(),
				Viewport::default(),
			);

			apply_repulsion(&mut graph, &config);
			let sum = graph.nodes()[0].velocity + graph.nodes()[1].velocity;
			prop_assert_eq!(sum, Vec3::zero());
		}

		#[test]
		fn pinned_invariant_holds_for_any_pin(pin in 0usize..13, seed in any::<u64>()) {
			let config = SimulationConfig::default();
			let data = GraphData::sample().unwrap();
			let mut rng = SmallRng::seed_from_u64(seed);
			let mut graph: Graph<Vec2> =
				Graph::load(&data, Viewport::default(), &config, &mut rng);
			graph.nodes_mut()[pin].pinned = true;
			let held = graph.nodes()[pin].position;

			for _ in 0..10 {
				step(&mut graph, &config, config.time_scale);
			}
			prop_assert_eq!(graph.nodes()[pin].position, held);
			prop_assert_eq!(graph.nodes()[pin].velocity, Vec2::zero());
		}
	}
}
