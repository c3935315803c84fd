//! Persisted workflow documents
//!
//! The document is a pure projection of the store:
//! `{nodes: [{id, type, position: {x, y}, data}], edges: [{id, source, target,
//! sourceHandle, targetHandle}]}`. A node's subtype travels inside `data`
//! under the `type` key. Loading is the inverse and refuses documents that
//! would break store invariants.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::{GraphError, Result};
use crate::store::GraphStore;
use crate::types::{field, Edge, Fields, Node, NodeId, NodeKind, Position};
use crate::validation::validate_document;

/// A node as persisted in a workflow document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: NodeId,
    /// Node kind, serialized as `type`
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    /// Node fields plus the subtype under `type`
    #[serde(default)]
    pub data: Fields,
}

impl DocumentNode {
    /// Project a stored node
    pub fn from_node(node: &Node) -> Self {
        let mut data = node.fields.clone();
        data.insert(field::TYPE.to_string(), Value::String(node.subtype.clone()));
        Self {
            id: node.id.clone(),
            kind: node.kind,
            position: node.position,
            data,
        }
    }

    /// Rebuild the stored node
    pub fn to_node(&self) -> Node {
        let mut fields = self.data.clone();
        let subtype = match fields.remove(field::TYPE) {
            Some(Value::String(subtype)) => subtype,
            _ => String::new(),
        };
        Node::new(self.id.clone(), self.kind, subtype, self.position).with_fields(fields)
    }
}

/// A complete persisted workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub nodes: Vec<DocumentNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl WorkflowDocument {
    /// Project the store's current graph
    ///
    /// Deterministic: node and edge order follow insertion order, and field
    /// maps serialize with sorted keys.
    pub fn from_store(store: &GraphStore) -> Self {
        Self {
            nodes: store.list_nodes().iter().map(DocumentNode::from_node).collect(),
            edges: store.list_edges().to_vec(),
        }
    }

    /// Rebuild a store from this document
    ///
    /// Fails with `InvalidDocument` listing every problem if any edge dangles
    /// or any node or edge id repeats.
    pub fn to_store(&self) -> Result<GraphStore> {
        let errors = validate_document(self);
        if !errors.is_empty() {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GraphError::InvalidDocument(message));
        }

        let mut store = GraphStore::new();
        for node in &self.nodes {
            store.insert_node(node.to_node())?;
        }
        for edge in &self.edges {
            store.insert_edge(edge.clone())?;
        }
        Ok(store)
    }

    pub fn find_node(&self, id: &str) -> Option<&DocumentNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Compact JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Pretty JSON with two-space indentation
    pub fn to_json_pretty(&self) -> Result<String> {
        self.to_json_indented(2)
    }

    /// Pretty JSON with a custom indentation width
    pub fn to_json_indented(&self, indent: usize) -> Result<String> {
        let indent = " ".repeat(indent);
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| {
            GraphError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Parse a document; structural validity is checked on `to_store`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write pretty JSON to a file, creating parent directories
    pub fn save_to_path(&self, path: impl AsRef<Path>, indent: usize) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = self.to_json_indented(indent)?;
        std::fs::write(path, content)?;
        log::info!(
            "Saved workflow ({} nodes, {} edges) to {:?}",
            self.nodes.len(),
            self.edges.len(),
            path
        );
        Ok(())
    }

    /// Read a document from a JSON file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let document = Self::from_json(&content)?;
        log::debug!("Read workflow document from {:?}", path);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocumentBuilder;
    use serde_json::json;

    fn sample_store() -> GraphStore {
        let mut store = GraphStore::new();
        store
            .insert_node(
                Node::new("n1", NodeKind::Trigger, "manual", (100.0, 50.0))
                    .with_field("label", "Manual Trigger"),
            )
            .unwrap();
        store
            .insert_node(
                Node::new("n2", NodeKind::Action, "script", (300.0, 50.0))
                    .with_field("label", "Run Script")
                    .with_field("executionMode", "local"),
            )
            .unwrap();
        store.insert_edge(Edge::new("e1", "n1", "n2")).unwrap();
        store
    }

    #[test]
    fn test_document_wire_format() {
        let document = WorkflowDocument::from_store(&sample_store());

        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            json!({
                "nodes": [
                    {
                        "id": "n1",
                        "type": "trigger",
                        "position": {"x": 100.0, "y": 50.0},
                        "data": {"label": "Manual Trigger", "type": "manual"}
                    },
                    {
                        "id": "n2",
                        "type": "action",
                        "position": {"x": 300.0, "y": 50.0},
                        "data": {"executionMode": "local", "label": "Run Script", "type": "script"}
                    }
                ],
                "edges": [
                    {"id": "e1", "source": "n1", "target": "n2", "sourceHandle": null, "targetHandle": null}
                ]
            })
        );
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let store = sample_store();
        let first = WorkflowDocument::from_store(&store).to_json().unwrap();
        let second = WorkflowDocument::from_store(&store).to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_store_round_trip() {
        let store = sample_store();
        let document = WorkflowDocument::from_store(&store);
        let restored = document.to_store().unwrap();

        assert_eq!(restored.list_nodes(), store.list_nodes());
        assert_eq!(restored.list_edges(), store.list_edges());
    }

    #[test]
    fn test_load_rejects_dangling_edge() {
        let document = DocumentBuilder::new()
            .add_trigger("n1", "manual", (0.0, 0.0))
            .add_edge_with_id("e1", "n1", "gone")
            .build();

        let err = document.to_store().unwrap_err();
        assert!(matches!(&err, GraphError::InvalidDocument(msg) if msg.contains("gone")));
    }

    #[test]
    fn test_load_rejects_duplicate_node() {
        let document = DocumentBuilder::new()
            .add_trigger("n1", "manual", (0.0, 0.0))
            .add_action("n1", "script", (10.0, 0.0))
            .build();

        assert!(matches!(document.to_store(), Err(GraphError::InvalidDocument(_))));
    }

    #[test]
    fn test_pretty_json_parses_back() {
        let document = WorkflowDocument::from_store(&sample_store());
        let pretty = document.to_json_pretty().unwrap();

        assert!(pretty.contains("\n  \"nodes\": ["));
        assert_eq!(WorkflowDocument::from_json(&pretty).unwrap(), document);
    }

    #[test]
    fn test_missing_type_in_data_gives_empty_subtype() {
        let document = WorkflowDocument::from_json(
            r#"{"nodes":[{"id":"a","type":"action","position":{"x":0,"y":0}}],"edges":[]}"#,
        )
        .unwrap();

        let store = document.to_store().unwrap();
        assert_eq!(store.get_node("a").map(|n| n.subtype.as_str()), Some(""));
    }

    #[test]
    fn test_unknown_kind_fails_to_parse() {
        let result = WorkflowDocument::from_json(
            r#"{"nodes":[{"id":"a","type":"webhook","position":{"x":0,"y":0},"data":{}}],"edges":[]}"#,
        );
        assert!(matches!(result, Err(GraphError::Serialization(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flows").join("workflow.json");
        let document = WorkflowDocument::from_store(&sample_store());

        document.save_to_path(&path, 2).unwrap();
        let loaded = WorkflowDocument::load_from_path(&path).unwrap();
        assert_eq!(loaded, document);
    }
}
