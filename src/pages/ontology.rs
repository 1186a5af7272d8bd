//! Ontology graph view: fetch on mount, then hand the snapshot to the
//! force-directed canvas.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::components::banner::{ErrorBanner, LoadingIndicator};
use crate::components::ontology_graph::OntologyGraphCanvas;
use crate::model::GraphNode;
use crate::store::AppStore;

/// Force-directed view of the fetched ontology graph.
#[component]
pub fn Ontology() -> impl IntoView {
	let store = expect_context::<AppStore>();
	let api = expect_context::<ApiClient>();
	let selected: RwSignal<Option<GraphNode>> = RwSignal::new(None);

	{
		let api = api.clone();
		spawn_local(async move {
			// A failure is recorded in the store; the graph simply does not
			// initialize without data.
			let _ = store.refresh_ontology(&api).await;
		});
	}

	let on_reload = move |_| {
		let api = api.clone();
		spawn_local(async move {
			let _ = store.refresh_ontology(&api).await;
		});
	};

	view! {
		<section class="page ontology-page">
			<header class="page-header">
				<h1>"Ontology"</h1>
				<button class="reload" on:click=on_reload>"Reload"</button>
			</header>
			<ErrorBanner />
			<LoadingIndicator />
			{move || {
				if !store.ontology.get().nodes.is_empty() {
					view! {
						<div class="graph-container">
							<OntologyGraphCanvas snapshot=store.ontology selected=selected />
							<div class="graph-overlay">
								<p class="subtitle">
									"Click a node for details. Drag to reposition, scroll to zoom, drag the background to pan."
								</p>
							</div>
							<SelectedNodePanel selected=selected />
						</div>
					}
					.into_any()
				} else if store.loading.get() || store.error.get().is_some() {
					().into_any()
				} else {
					view! { <p class="empty-state">"No ontology classes to display."</p> }
						.into_any()
				}
			}}
		</section>
	}
}

/// Details of the node selected in the canvas.
#[component]
fn SelectedNodePanel(selected: RwSignal<Option<GraphNode>>) -> impl IntoView {
	view! {
		<Show when=move || selected.get().is_some()>
			<aside class="node-details">
				{move || {
					selected
						.get()
						.map(|node| {
							view! {
								<h2>{node.name}</h2>
								<dl>
									<dt>"Id"</dt>
									<dd>{node.id}</dd>
									<dt>"Type"</dt>
									<dd>{node.kind}</dd>
								</dl>
							}
						})
				}}
			</aside>
		</Show>
	}
}
