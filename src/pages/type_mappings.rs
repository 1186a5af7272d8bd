//! Type mapping list view.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::components::banner::{ErrorBanner, LoadingIndicator};
use crate::model::TypeMapping;
use crate::store::AppStore;

/// Table of source-to-target type mappings.
#[component]
pub fn TypeMappings() -> impl IntoView {
	let store = expect_context::<AppStore>();
	let api = expect_context::<ApiClient>();

	{
		let api = api.clone();
		spawn_local(async move {
			let _ = store.refresh_type_mappings(&api).await;
		});
	}

	let on_reload = move |_| {
		let api = api.clone();
		spawn_local(async move {
			let _ = store.refresh_type_mappings(&api).await;
		});
	};

	view! {
		<section class="page">
			<header class="page-header">
				<h1>"Type Mappings"</h1>
				<button class="reload" on:click=on_reload>"Reload"</button>
			</header>
			<ErrorBanner />
			<LoadingIndicator />
			<table class="records">
				<thead>
					<tr>
						<th>"Id"</th>
						<th>"Source Type"</th>
						<th>"Target Type"</th>
						<th>"Rules"</th>
					</tr>
				</thead>
				<tbody>
					<For
						each=move || store.type_mappings.get()
						key=|mapping| mapping.id.clone()
						children=move |mapping: TypeMapping| {
							let rules = mapping.rules_summary();
							view! {
								<tr>
									<td>{mapping.id}</td>
									<td>{mapping.source_type}</td>
									<td>{mapping.target_type}</td>
									<td>{rules}</td>
								</tr>
							}
						}
					/>
				</tbody>
			</table>
		</section>
	}
}
