//! Application state: one explicit store object provided through context.

use leptos::prelude::*;

use crate::api::{ApiClient, FetchError};
use crate::model::{DataSource, GraphSnapshot, TypeMapping};

/// Typed state shared by every view. Created once in `App` and handed to
/// components through context; reads go through the public signals, writes
/// through the action methods below.
#[derive(Clone, Copy)]
pub struct AppStore {
	/// Last fetched ontology snapshot, already sanitized.
	pub ontology: RwSignal<GraphSnapshot>,
	/// Last fetched data source list.
	pub data_sources: RwSignal<Vec<DataSource>>,
	/// Last fetched type mapping list.
	pub type_mappings: RwSignal<Vec<TypeMapping>>,
	/// Current error message, if the most recent fetch failed.
	pub error: RwSignal<Option<String>>,
	/// Whether a fetch is in flight.
	pub loading: RwSignal<bool>,
}

impl AppStore {
	/// Fresh store with no data loaded.
	pub fn new() -> Self {
		Self {
			ontology: RwSignal::new(GraphSnapshot::default()),
			data_sources: RwSignal::new(Vec::new()),
			type_mappings: RwSignal::new(Vec::new()),
			error: RwSignal::new(None),
			loading: RwSignal::new(false),
		}
	}

	/// Fetch the ontology graph and replace the stored snapshot wholesale.
	/// Failures are recorded as state; the `Result` lets the caller skip
	/// dependent work, it never carries anything the store has not seen.
	pub async fn refresh_ontology(self, api: &ApiClient) -> Result<(), FetchError> {
		self.loading.set(true);
		let result = api.get_ontology().await;
		self.loading.set(false);
		match result {
			Ok(snapshot) => {
				self.apply_ontology(snapshot);
				Ok(())
			}
			Err(err) => {
				self.record_failure(&err);
				Err(err)
			}
		}
	}

	/// Fetch and replace the data source list.
	pub async fn refresh_data_sources(self, api: &ApiClient) -> Result<(), FetchError> {
		self.loading.set(true);
		let result = api.get_data_sources().await;
		self.loading.set(false);
		match result {
			Ok(sources) => {
				self.apply_data_sources(sources);
				Ok(())
			}
			Err(err) => {
				self.record_failure(&err);
				Err(err)
			}
		}
	}

	/// Fetch and replace the type mapping list.
	pub async fn refresh_type_mappings(self, api: &ApiClient) -> Result<(), FetchError> {
		self.loading.set(true);
		let result = api.get_type_mappings().await;
		self.loading.set(false);
		match result {
			Ok(mappings) => {
				self.apply_type_mappings(mappings);
				Ok(())
			}
			Err(err) => {
				self.record_failure(&err);
				Err(err)
			}
		}
	}

	/// Drop the current error message.
	pub fn dismiss_error(&self) {
		self.error.set(None);
	}

	fn apply_ontology(&self, snapshot: GraphSnapshot) {
		self.ontology.set(snapshot.sanitize());
		self.error.set(None);
	}

	fn apply_data_sources(&self, sources: Vec<DataSource>) {
		self.data_sources.set(sources);
		self.error.set(None);
	}

	fn apply_type_mappings(&self, mappings: Vec<TypeMapping>) {
		self.type_mappings.set(mappings);
		self.error.set(None);
	}

	fn record_failure(&self, err: &FetchError) {
		self.error.set(Some(err.to_string()));
	}
}

impl Default for AppStore {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use leptos::reactive::owner::Owner;

	use super::*;
	use crate::model::{GraphEdge, GraphNode};

	fn with_owner(test: impl FnOnce()) {
		let owner = Owner::new();
		owner.set();
		test();
	}

	fn snapshot_with_dangling_edge() -> GraphSnapshot {
		GraphSnapshot {
			nodes: vec![GraphNode {
				id: "a".into(),
				name: "A".into(),
				kind: "T".into(),
			}],
			relationships: vec![GraphEdge {
				source: "a".into(),
				target: "ghost".into(),
			}],
		}
	}

	#[test]
	fn applying_a_snapshot_sanitizes_and_clears_the_error() {
		with_owner(|| {
			let store = AppStore::new();
			store.error.set(Some("old failure".into()));

			store.apply_ontology(snapshot_with_dangling_edge());

			let held = store.ontology.get_untracked();
			assert_eq!(held.nodes.len(), 1);
			assert!(held.relationships.is_empty());
			assert!(store.error.get_untracked().is_none());
		});
	}

	#[test]
	fn failures_are_recorded_as_state() {
		with_owner(|| {
			let store = AppStore::new();
			store.record_failure(&FetchError::Status {
				status: 500,
				detail: "db down".into(),
			});
			assert_eq!(store.error.get_untracked().as_deref(), Some("db down"));
		});
	}

	#[test]
	fn dismissing_clears_the_error() {
		with_owner(|| {
			let store = AppStore::new();
			store.record_failure(&FetchError::Transport("connection refused".into()));
			store.dismiss_error();
			assert!(store.error.get_untracked().is_none());
		});
	}
}
