//! Wire types shared by the fetch gateway, the store, and the views.

use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Deserializer};

/// A single ontology class as returned by the backend.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	#[serde(deserialize_with = "id_string")]
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(rename = "type", default)]
	pub kind: String,
}

/// A directed relationship between two ontology classes, referenced by node id.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphEdge {
	#[serde(deserialize_with = "id_string")]
	pub source: String,
	#[serde(deserialize_with = "id_string")]
	pub target: String,
}

/// One complete fetched ontology graph. A new snapshot replaces any prior one
/// wholesale; there is no incremental merge.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphSnapshot {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub relationships: Vec<GraphEdge>,
}

impl GraphSnapshot {
	/// Ingestion step: drop every relationship whose endpoints do not both
	/// resolve to a node id present in this snapshot. Such edges must never
	/// reach the renderer.
	pub fn sanitize(mut self) -> Self {
		let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
		let before = self.relationships.len();
		self.relationships
			.retain(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()));
		let dropped = before - self.relationships.len();
		if dropped > 0 {
			warn!("dropped {dropped} relationship(s) referencing nodes missing from the snapshot");
		}
		self
	}

	/// Zero nodes is a valid, renderable state that shows nothing.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// A configured data source.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DataSource {
	#[serde(deserialize_with = "id_string")]
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(rename = "type", default)]
	pub kind: String,
	#[serde(default)]
	pub status: String,
}

/// One field-level transformation inside a type mapping.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRule {
	#[serde(default)]
	pub source_field: String,
	#[serde(default)]
	pub target_field: String,
	#[serde(default)]
	pub transformation_type: String,
}

/// A source-to-target type mapping with its transformation rules.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMapping {
	#[serde(deserialize_with = "id_string")]
	pub id: String,
	#[serde(default)]
	pub source_type: String,
	#[serde(default)]
	pub target_type: String,
	#[serde(default)]
	pub rules: Vec<MappingRule>,
}

impl TypeMapping {
	/// Compact one-line rendering of the rules for the list view.
	pub fn rules_summary(&self) -> String {
		if self.rules.is_empty() {
			return "no rules".into();
		}
		self.rules
			.iter()
			.map(|r| format!("{} -> {}", r.source_field, r.target_field))
			.collect::<Vec<_>>()
			.join(", ")
	}
}

/// The backend is inconsistent about whether ids are strings or numbers;
/// accept both and normalize to a string.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Text(String),
		Int(i64),
		Uint(u64),
	}

	Ok(match Raw::deserialize(deserializer)? {
		Raw::Text(s) => s,
		Raw::Int(n) => n.to_string(),
		Raw::Uint(n) => n.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: id.to_uppercase(),
			kind: "Class".into(),
		}
	}

	fn edge(source: &str, target: &str) -> GraphEdge {
		GraphEdge {
			source: source.into(),
			target: target.into(),
		}
	}

	#[test]
	fn sanitize_drops_dangling_edges_and_keeps_order() {
		let snapshot = GraphSnapshot {
			nodes: vec![node("a"), node("b"), node("c")],
			relationships: vec![edge("a", "b"), edge("a", "ghost"), edge("b", "c")],
		}
		.sanitize();

		assert_eq!(snapshot.relationships, vec![edge("a", "b"), edge("b", "c")]);
	}

	#[test]
	fn sanitize_keeps_valid_snapshot_intact() {
		let snapshot = GraphSnapshot {
			nodes: vec![node("a"), node("b")],
			relationships: vec![edge("b", "a")],
		};
		assert_eq!(snapshot.clone().sanitize(), snapshot);
	}

	#[test]
	fn node_wire_format_maps_type_to_kind() {
		let parsed: GraphNode =
			serde_json::from_value(serde_json::json!({"id": "a", "name": "A", "type": "T"}))
				.unwrap();
		assert_eq!(parsed.id, "a");
		assert_eq!(parsed.name, "A");
		assert_eq!(parsed.kind, "T");
	}

	#[test]
	fn numeric_ids_are_normalized_to_strings() {
		let parsed: DataSource = serde_json::from_value(
			serde_json::json!({"id": 1, "name": "S1", "type": "csv", "status": "active"}),
		)
		.unwrap();
		assert_eq!(parsed.id, "1");
		assert_eq!(parsed.kind, "csv");
	}

	#[test]
	fn type_mapping_rules_default_to_empty() {
		let parsed: TypeMapping = serde_json::from_value(
			serde_json::json!({"id": "m1", "sourceType": "csv", "targetType": "Class"}),
		)
		.unwrap();
		assert!(parsed.rules.is_empty());
		assert_eq!(parsed.rules_summary(), "no rules");
	}

	#[test]
	fn rules_summary_lists_field_pairs() {
		let parsed: TypeMapping = serde_json::from_value(serde_json::json!({
			"id": "m1",
			"sourceType": "csv",
			"targetType": "Class",
			"rules": [
				{"sourceField": "col_a", "targetField": "name", "transformationType": "direct"},
				{"sourceField": "col_b", "targetField": "mass", "transformationType": "custom"}
			]
		}))
		.unwrap();
		assert_eq!(parsed.rules_summary(), "col_a -> name, col_b -> mass");
	}
}
