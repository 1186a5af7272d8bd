//! Top navigation between the dashboard views.

use leptos::prelude::*;
use leptos_router::components::A;

/// Links to the three dashboard views.
#[component]
pub fn NavBar() -> impl IntoView {
	view! {
		<nav class="navbar">
			<span class="brand">"Deep Lynx Dashboard"</span>
			<A href="/">"Ontology"</A>
			<A href="/datasources">"Data Sources"</A>
			<A href="/typemappings">"Type Mappings"</A>
		</nav>
	}
}
