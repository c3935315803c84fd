//! Fluent builder for workflow documents
//!
//! Provides a compact API for constructing documents programmatically,
//! mostly for hosts seeding a canvas and for tests.

use serde_json::Value;

use crate::document::{DocumentNode, WorkflowDocument};
use crate::types::{field, Connection, Edge, Fields, NodeKind, Position};

/// Fluent builder for workflow documents
///
/// # Example
///
/// ```
/// use workflow_graph::builder::DocumentBuilder;
///
/// let document = DocumentBuilder::new()
///     .add_trigger("n1", "manual", (100.0, 50.0))
///     .with_field("label", "Manual Trigger")
///     .add_action("n2", "script", (300.0, 50.0))
///     .with_field("executionMode", "local")
///     .add_edge_with_id("e1", "n1", "n2")
///     .build();
///
/// assert_eq!(document.nodes.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    nodes: Vec<DocumentNode>,
    edges: Vec<Edge>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node of any kind
    pub fn add_node(
        mut self,
        id: impl Into<String>,
        kind: NodeKind,
        subtype: impl Into<String>,
        position: (f64, f64),
    ) -> Self {
        let mut data = Fields::new();
        data.insert(field::TYPE.to_string(), Value::String(subtype.into()));
        self.nodes.push(DocumentNode {
            id: id.into(),
            kind,
            position: Position::from(position),
            data,
        });
        self
    }

    pub fn add_trigger(
        self,
        id: impl Into<String>,
        subtype: impl Into<String>,
        position: (f64, f64),
    ) -> Self {
        self.add_node(id, NodeKind::Trigger, subtype, position)
    }

    pub fn add_action(
        self,
        id: impl Into<String>,
        subtype: impl Into<String>,
        position: (f64, f64),
    ) -> Self {
        self.add_node(id, NodeKind::Action, subtype, position)
    }

    /// Set a data field on the most recently added node
    ///
    /// Must be called after `add_node` (or one of its shorthands).
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.data.insert(name.into(), value.into());
        }
        self
    }

    /// Connect the default ports of two nodes (canonical edge id)
    pub fn add_edge(self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.connect(Connection::new(source, target))
    }

    /// Add a connection between explicit ports (canonical edge id)
    pub fn connect(mut self, connection: Connection) -> Self {
        self.edges.push(connection.into_edge());
        self
    }

    /// Add an edge with an explicit ID
    pub fn add_edge_with_id(
        mut self,
        edge_id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.edges.push(Edge::new(edge_id, source, target));
        self
    }

    /// Build the document without validation
    pub fn build(self) -> WorkflowDocument {
        WorkflowDocument {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
