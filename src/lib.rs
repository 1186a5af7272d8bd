//! Leptos client-side app wiring and routes.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod api;
mod components;
mod config;
mod model;
mod pages;
mod store;

pub use config::Config;

use crate::api::ApiClient;
use crate::components::nav::NavBar;
use crate::pages::data_sources::DataSources;
use crate::pages::not_found::NotFound;
use crate::pages::ontology::Ontology;
use crate::pages::type_mappings::TypeMappings;
use crate::store::AppStore;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// App router: ontology graph, data sources, type mappings, and a 404
/// fallback. The store and the API client are provided through context so
/// every view reads the same state.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let store = AppStore::new();
	provide_context(store);
	provide_context(ApiClient::new(Config::from_env()));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Deep Lynx Dashboard" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<NavBar />
			<main>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Ontology />
					<Route path=path!("/datasources") view=DataSources />
					<Route path=path!("/typemappings") view=TypeMappings />
				</Routes>
			</main>
		</Router>
	}
}
