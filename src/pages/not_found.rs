use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="graph-error">
			<h1>"Nothing here"</h1>
			<a href="/">"Back to the graph"</a>
		</div>
	}
}
