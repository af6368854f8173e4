use leptos::prelude::*;
use log::error;

use crate::components::force_graph::{ForceGraphCanvas, ForceGraphOrbit};
use crate::engine::{Category, GraphData, GraphNode};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	match GraphData::sample() {
		Ok(data) => view! { <GraphExplorer data=data /> }.into_any(),
		Err(err) => {
			error!("sample graph rejected: {err}");
			view! {
				<div class="graph-error">
					<h1>"Uh oh! Something went wrong!"</h1>
					<p>{err.to_string()}</p>
				</div>
			}
			.into_any()
		}
	}
}

/// Graph view with its header, legend and details panel.
#[component]
fn GraphExplorer(data: GraphData) -> impl IntoView {
	let stats = data.stats();
	let topic = data.topic.clone();
	let graph_data = Signal::derive(move || data.clone());

	let (spatial, set_spatial) = signal(false);
	let (selected, set_selected) = signal(None::<GraphNode>);
	let on_select = Callback::new(move |node: GraphNode| set_selected.set(Some(node)));

	let legend = Category::ALL
		.iter()
		.map(|category| {
			view! {
				<li>
					<span class="swatch" style=format!("background: {}", category.color())></span>
					{category.name()}
				</li>
			}
		})
		.collect_view();

	view! {
		<div class="fullscreen-graph">
			<Show
				when=move || spatial.get()
				fallback=move || {
					view! { <ForceGraphCanvas data=graph_data fullscreen=true on_select=on_select /> }
				}
			>
				<ForceGraphOrbit data=graph_data fullscreen=true on_select=on_select />
			</Show>

			<div class="graph-overlay">
				<h1>{topic}</h1>
				<p class="counters">
					{format!(
						"{} concepts · {} connections · {}h total",
						stats.node_count,
						stats.edge_count,
						stats.total_weight,
					)}
				</p>
				<button on:click=move |_| {
					set_selected.set(None);
					set_spatial.update(|s| *s = !*s);
				}>{move || if spatial.get() { "2D view" } else { "3D view" }}</button>
				<ul class="legend">{legend}</ul>
				<p class="subtitle">
					{move || {
						if spatial.get() {
							"Click a node for details. Drag to orbit. Scroll to zoom."
						} else {
							"Drag nodes to reposition. Scroll to zoom. Drag background to pan."
						}
					}}
				</p>
			</div>

			{move || {
				selected
					.get()
					.map(|node| {
						view! {
							<aside class="node-details">
								<h2>{node.label.clone()}</h2>
								<p class="category" style=format!("color: {}", node.category.color())>
									{node.category.name()}
								</p>
								{node.difficulty.map(|d| view! { <p>"Difficulty: " {d.name()}</p> })}
								<p>{format!("{}h estimated", node.weight)}</p>
								<p>{node.description.clone()}</p>
								<button on:click=move |_| set_selected.set(None)>"Close"</button>
							</aside>
						}
					})
			}}
		</div>
	}
}
