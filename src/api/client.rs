//! Thin GET wrapper over the backend with defensive payload handling.

use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::FetchError;
use crate::config::Config;
use crate::model::{DataSource, GraphSnapshot, TypeMapping};

/// HTTP client bound to one backend base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
	http: reqwest::Client,
}

impl ApiClient {
	/// Build a client for the configured backend.
	pub fn new(config: Config) -> Self {
		Self {
			base_url: config.base_url,
			http: reqwest::Client::new(),
		}
	}

	/// Fetch the ontology graph. `nodes` and `relationships` are coerced to
	/// empty sequences when absent or not sequence-typed, so downstream code
	/// never sees a malformed snapshot.
	pub async fn get_ontology(&self) -> Result<GraphSnapshot, FetchError> {
		let body = self.get_json("/ontology").await?;
		let snapshot = coerce_snapshot(body);
		debug!(
			"ontology: {} node(s), {} relationship(s)",
			snapshot.nodes.len(),
			snapshot.relationships.len()
		);
		Ok(snapshot)
	}

	/// Fetch the configured data sources.
	pub async fn get_data_sources(&self) -> Result<Vec<DataSource>, FetchError> {
		let body = self.get_json("/datasources").await?;
		let sources: Vec<DataSource> =
			serde_json::from_value(body).map_err(|e| FetchError::Decode(e.to_string()))?;
		debug!("datasources: {} record(s)", sources.len());
		Ok(sources)
	}

	/// Fetch the configured type mappings.
	pub async fn get_type_mappings(&self) -> Result<Vec<TypeMapping>, FetchError> {
		let body = self.get_json("/typemappings").await?;
		let mappings: Vec<TypeMapping> =
			serde_json::from_value(body).map_err(|e| FetchError::Decode(e.to_string()))?;
		debug!("typemappings: {} record(s)", mappings.len());
		Ok(mappings)
	}

	async fn get_json(&self, path: &str) -> Result<Value, FetchError> {
		let url = format!("{}{}", self.base_url, path);
		debug!("GET {url}");

		let response = self
			.http
			.get(&url)
			.header(ACCEPT, "application/json")
			.header(CONTENT_TYPE, "application/json")
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.json::<Value>().await.ok();
			let detail = detail_from_body(body.as_ref(), status);
			warn!("GET {url} -> {status}: {detail}");
			return Err(FetchError::Status {
				status: status.as_u16(),
				detail,
			});
		}

		debug!("GET {url} -> {status}");
		Ok(response.json::<Value>().await?)
	}
}

/// Pull the human-readable message out of an error payload: the server's
/// `detail` field when the body carries one, else the status reason.
fn detail_from_body(body: Option<&Value>, status: StatusCode) -> String {
	body.and_then(|v| v.get("detail"))
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or_else(|| {
			status
				.canonical_reason()
				.unwrap_or("request failed")
				.to_string()
		})
}

/// Shape an arbitrary `/ontology` body into a snapshot, treating anything
/// that is not an object with sequence-typed fields as empty.
fn coerce_snapshot(body: Value) -> GraphSnapshot {
	let Value::Object(mut fields) = body else {
		warn!("ontology response is not an object, treating as empty");
		return GraphSnapshot::default();
	};
	GraphSnapshot {
		nodes: coerce_sequence(fields.remove("nodes"), "nodes"),
		relationships: coerce_sequence(fields.remove("relationships"), "relationships"),
	}
}

fn coerce_sequence<T: DeserializeOwned>(value: Option<Value>, field: &str) -> Vec<T> {
	match value {
		Some(Value::Array(items)) => items
			.into_iter()
			.filter_map(|item| match serde_json::from_value(item) {
				Ok(parsed) => Some(parsed),
				Err(err) => {
					warn!("skipping malformed `{field}` entry: {err}");
					None
				}
			})
			.collect(),
		Some(_) => {
			warn!("`{field}` is not a sequence, treating as empty");
			Vec::new()
		}
		None => Vec::new(),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::model::GraphNode;

	#[test]
	fn missing_fields_coerce_to_empty_snapshot() {
		let snapshot = coerce_snapshot(json!({}));
		assert!(snapshot.nodes.is_empty());
		assert!(snapshot.relationships.is_empty());
	}

	#[test]
	fn non_sequence_fields_coerce_to_empty() {
		let snapshot = coerce_snapshot(json!({"nodes": 5, "relationships": "oops"}));
		assert!(snapshot.is_empty());
		assert!(snapshot.relationships.is_empty());
	}

	#[test]
	fn non_object_body_coerces_to_empty() {
		assert!(coerce_snapshot(json!([1, 2, 3])).is_empty());
	}

	#[test]
	fn well_formed_body_parses_fully() {
		let snapshot = coerce_snapshot(json!({
			"nodes": [{"id": "a", "name": "A", "type": "T"}],
			"relationships": []
		}));
		assert_eq!(snapshot.nodes.len(), 1);
		assert_eq!(snapshot.nodes[0].name, "A");
		assert!(snapshot.relationships.is_empty());
	}

	#[test]
	fn malformed_entries_are_skipped_not_fatal() {
		let nodes: Vec<GraphNode> = coerce_sequence(
			Some(json!([
				{"id": "a", "name": "A", "type": "T"},
				{"name": "missing id"},
				{"id": "b"}
			])),
			"nodes",
		);
		let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "b"]);
	}

	#[test]
	fn detail_field_wins_over_status_reason() {
		let body = json!({"detail": "db down"});
		assert_eq!(
			detail_from_body(Some(&body), StatusCode::INTERNAL_SERVER_ERROR),
			"db down"
		);
	}

	#[test]
	fn status_reason_used_when_detail_missing() {
		assert_eq!(
			detail_from_body(None, StatusCode::INTERNAL_SERVER_ERROR),
			"Internal Server Error"
		);
		assert_eq!(
			detail_from_body(Some(&json!({"error": "other"})), StatusCode::NOT_FOUND),
			"Not Found"
		);
	}
}
