//! 404 fallback.

use leptos::prelude::*;
use leptos_router::components::A;

/// Shown for any unmatched route.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<section class="page">
			<h1>"Page not found"</h1>
			<p>
				<A href="/">"Back to the ontology view"</A>
			</p>
		</section>
	}
}
