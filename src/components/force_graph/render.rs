use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, OrbitState, Projected};
use crate::engine::{Interaction, Node, Simulation, Vector};

const BACKGROUND: &str = "#1a1a2e";
const EDGE_RGB: &str = "100, 180, 255";

fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
}

/// Alpha of a node or edge given whether it belongs to the selection.
fn alpha_for(emphasized: bool, dimmed: f64) -> f64 {
	if emphasized { 1.0 } else { dimmed }
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	clear(ctx, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let k = state.transform.k;
	let dimmed = state.emphasis.dimmed_alpha();
	let sim = &state.sim;
	let nodes = sim.graph().nodes();

	for edge in sim.graph().edges() {
		let (x1, y1) = nodes[edge.source].position.planar();
		let (x2, y2) = nodes[edge.target].position.planar();
		let emphasized = sim.interaction().is_edge_emphasized(edge);
		draw_edge(ctx, (x1, y1), (x2, y2), emphasized, dimmed, 1.0 / k);
	}

	for (idx, node) in nodes.iter().enumerate() {
		let (x, y) = node.position.planar();
		draw_node(ctx, sim, idx, node, (x, y), node.radius, dimmed, 1.0 / k);
	}
	ctx.restore();
}

pub fn render_orbit(state: &OrbitState, ctx: &CanvasRenderingContext2d) {
	clear(ctx, state.width, state.height);

	let dimmed = state.emphasis.dimmed_alpha();
	let sim = &state.sim;
	let nodes = sim.graph().nodes();
	let projected = state.projected();

	for edge in sim.graph().edges() {
		if let (Some(a), Some(b)) = (projected[edge.source], projected[edge.target]) {
			let emphasized = sim.interaction().is_edge_emphasized(edge);
			draw_edge(ctx, (a.x, a.y), (b.x, b.y), emphasized, dimmed, 1.0);
		}
	}

	// far to near so closer spheres cover farther ones
	let mut order: Vec<(usize, Projected)> = projected
		.iter()
		.enumerate()
		.filter_map(|(i, p)| p.map(|p| (i, p)))
		.collect();
	order.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

	for (idx, p) in order {
		let node = &nodes[idx];
		draw_node(ctx, sim, idx, node, (p.x, p.y), node.radius * p.scale, dimmed, 1.0);
	}
}

fn draw_edge(
	ctx: &CanvasRenderingContext2d,
	(x1, y1): (f64, f64),
	(x2, y2): (f64, f64),
	emphasized: bool,
	dimmed: f64,
	px: f64,
) {
	let (alpha, width) = if emphasized {
		(0.9, 3.0 * px)
	} else {
		(0.35 * dimmed, 2.0 * px)
	};
	ctx.set_stroke_style_str(&format!("rgba({EDGE_RGB}, {alpha})"));
	ctx.set_line_width(width);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.stroke();
}

#[allow(clippy::too_many_arguments)]
fn draw_node<V: Vector>(
	ctx: &CanvasRenderingContext2d,
	sim: &Simulation<V>,
	idx: usize,
	node: &Node<V>,
	(x, y): (f64, f64),
	radius: f64,
	dimmed: f64,
	px: f64,
) {
	let interaction: &Interaction = sim.interaction();
	let alpha = alpha_for(interaction.is_emphasized(sim.graph(), idx), dimmed);

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(node.category.color());
	ctx.fill();

	if interaction.selected() == Some(idx) || interaction.dragging() == Some(idx) {
		ctx.set_stroke_style_str("white");
		ctx.set_line_width(3.0 * px);
		ctx.stroke();
	}

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
	ctx.set_font(&format!("{}px system-ui", 12.0 * px));
	ctx.set_text_align("center");
	ctx.set_text_baseline("top");
	let _ = ctx.fill_text(&node.label, x, y + radius + 5.0 * px);
	ctx.set_global_alpha(1.0);
}
