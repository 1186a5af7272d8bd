//! Data source list view.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::components::banner::{ErrorBanner, LoadingIndicator};
use crate::model::DataSource;
use crate::store::AppStore;

/// Table of configured data sources.
#[component]
pub fn DataSources() -> impl IntoView {
	let store = expect_context::<AppStore>();
	let api = expect_context::<ApiClient>();

	{
		let api = api.clone();
		spawn_local(async move {
			let _ = store.refresh_data_sources(&api).await;
		});
	}

	let on_reload = move |_| {
		let api = api.clone();
		spawn_local(async move {
			let _ = store.refresh_data_sources(&api).await;
		});
	};

	view! {
		<section class="page">
			<header class="page-header">
				<h1>"Data Sources"</h1>
				<button class="reload" on:click=on_reload>"Reload"</button>
			</header>
			<ErrorBanner />
			<LoadingIndicator />
			<table class="records">
				<thead>
					<tr>
						<th>"Id"</th>
						<th>"Name"</th>
						<th>"Type"</th>
						<th>"Status"</th>
					</tr>
				</thead>
				<tbody>
					<For
						each=move || store.data_sources.get()
						key=|source| source.id.clone()
						children=move |source: DataSource| {
							view! {
								<tr>
									<td>{source.id}</td>
									<td>{source.name}</td>
									<td>{source.kind}</td>
									<td>{source.status}</td>
								</tr>
							}
						}
					/>
				</tbody>
			</table>
		</section>
	}
}
