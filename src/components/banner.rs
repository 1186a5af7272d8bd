//! Error banner and loading indicator fed by the store.

use leptos::prelude::*;

use crate::store::AppStore;

/// Dismissable banner showing the store's current error, if any.
#[component]
pub fn ErrorBanner() -> impl IntoView {
	let store = expect_context::<AppStore>();

	view! {
		<Show when=move || store.error.get().is_some()>
			<div class="error-banner" role="alert">
				<span>{move || store.error.get().unwrap_or_default()}</span>
				<button on:click=move |_| store.dismiss_error()>"Dismiss"</button>
			</div>
		</Show>
	}
}

/// Shown while a fetch is in flight.
#[component]
pub fn LoadingIndicator() -> impl IntoView {
	let store = expect_context::<AppStore>();

	view! {
		<Show when=move || store.loading.get()>
			<div class="loading-indicator">"Loading..."</div>
		</Show>
	}
}
