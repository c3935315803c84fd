//! Node/edge storage for a single editing session
//!
//! The store is the canonical graph. It keeps nodes and edges in insertion
//! order and enforces the structural invariants: unique ids, and every edge
//! endpoint resolving to a stored node. Every method either applies its whole
//! change or fails without touching the store.

use serde_json::Value;

use crate::error::{GraphError, Result};
use crate::types::{field, Edge, Fields, Node, Position};

/// A node removed from the store together with the edges cascaded with it
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    pub edges: Vec<Edge>,
}

/// In-memory node/edge store
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Nodes in insertion order
    nodes: Vec<Node>,
    /// Edges in insertion order
    edges: Vec<Edge>,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// All nodes, in insertion order
    pub fn list_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in insertion order
    pub fn list_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Find a node by ID
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find an edge by ID
    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.get_node(id).is_some()
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.get_edge(id).is_some()
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append a node
    ///
    /// Fails with `DuplicateId` if a node with the same id is stored, or with
    /// `NonFinitePosition` if its position is NaN or infinite.
    pub fn insert_node(&mut self, node: Node) -> Result<()> {
        ensure_finite(node.position)?;
        if self.contains_node(&node.id) {
            return Err(GraphError::DuplicateId(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Append an edge
    ///
    /// Fails with `UnknownEndpoint` if either endpoint is not stored, or with
    /// `DuplicateId` if the edge id is taken.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<()> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::UnknownEndpoint {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
        if self.contains_edge(&edge.id) {
            return Err(GraphError::DuplicateId(edge.id));
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Shallow-merge `partial` into a node's fields
    ///
    /// New keys overwrite, other keys are untouched. The `type` key carries the
    /// subtype and is routed there instead of into the field map. Id, kind and
    /// position never change here.
    pub fn update_node(&mut self, id: &str, partial: Fields) -> Result<&Node> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GraphError::not_found(id))?;

        for (name, value) in partial {
            if name == field::TYPE {
                match value {
                    Value::String(subtype) => node.subtype = subtype,
                    other => log::warn!("Ignoring non-string subtype {} for node '{}'", other, id),
                }
                continue;
            }
            node.fields.insert(name, value);
        }

        Ok(node)
    }

    /// Set a node's canvas position
    pub fn move_node(&mut self, id: &str, position: Position) -> Result<&Node> {
        ensure_finite(position)?;
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GraphError::not_found(id))?;
        node.position = position;
        Ok(node)
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, id: &str) -> Result<RemovedNode> {
        let pos = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| GraphError::not_found(id))?;

        let node = self.nodes.remove(pos);
        let (removed, kept): (Vec<Edge>, Vec<Edge>) =
            std::mem::take(&mut self.edges).into_iter().partition(|e| e.touches(id));
        self.edges = kept;

        Ok(RemovedNode {
            node,
            edges: removed,
        })
    }

    /// Remove a single edge
    pub fn remove_edge(&mut self, id: &str) -> Result<Edge> {
        let pos = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| GraphError::not_found(id))?;
        Ok(self.edges.remove(pos))
    }

    /// Drop every node and edge
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

fn ensure_finite(position: Position) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(GraphError::NonFinitePosition {
            x: position.x,
            y: position.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;
    use serde_json::json;

    fn trigger(id: &str) -> Node {
        Node::new(id, NodeKind::Trigger, "manual", (0.0, 0.0))
    }

    fn action(id: &str) -> Node {
        Node::new(id, NodeKind::Action, "script", (100.0, 0.0))
            .with_field("label", "Run Script")
            .with_field("description", "")
            .with_field("executionMode", "local")
    }

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut store = GraphStore::new();
        for id in ["c", "a", "b"] {
            store.insert_node(trigger(id)).unwrap();
        }

        let ids: Vec<&str> = store.list_nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut store = GraphStore::new();
        store.insert_node(trigger("n1")).unwrap();

        let err = store.insert_node(action("n1")).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateId(id) if id == "n1"));
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.list_nodes()[0].kind, NodeKind::Trigger);
    }

    #[test]
    fn test_edge_requires_live_endpoints() {
        let mut store = GraphStore::new();
        store.insert_node(trigger("n1")).unwrap();

        let err = store.insert_edge(Edge::new("e1", "n1", "ghost")).unwrap_err();
        assert!(matches!(err, GraphError::UnknownEndpoint { node_id, .. } if node_id == "ghost"));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let mut store = GraphStore::new();
        store.insert_node(trigger("n1")).unwrap();
        store.insert_node(action("n2")).unwrap();
        store.insert_edge(Edge::new("e1", "n1", "n2")).unwrap();

        let err = store.insert_edge(Edge::new("e1", "n2", "n1")).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateId(_)));
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn test_update_changes_only_given_field() {
        let mut store = GraphStore::new();
        store.insert_node(action("n2")).unwrap();
        let before = store.get_node("n2").cloned().unwrap();

        let updated = store.update_node("n2", fields(json!({"label": "X"}))).unwrap();
        assert_eq!(updated.label(), Some("X"));

        let after = store.get_node("n2").unwrap();
        assert_eq!(after.position, before.position);
        assert_eq!(after.kind, before.kind);
        assert_eq!(after.subtype, before.subtype);
        for (name, value) in &before.fields {
            if name != "label" {
                assert_eq!(after.fields.get(name), Some(value));
            }
        }
        assert_eq!(after.fields.len(), before.fields.len());
    }

    #[test]
    fn test_update_routes_type_to_subtype() {
        let mut store = GraphStore::new();
        store.insert_node(action("n2")).unwrap();

        store.update_node("n2", fields(json!({"type": "email"}))).unwrap();
        let node = store.get_node("n2").unwrap();
        assert_eq!(node.subtype, "email");
        assert!(node.field("type").is_none());
    }

    #[test]
    fn test_update_missing_node() {
        let mut store = GraphStore::new();
        let err = store.update_node("nope", Fields::new()).unwrap_err();
        assert!(matches!(err, GraphError::NotFound(_)));
    }

    #[test]
    fn test_remove_node_cascades_edges() {
        let mut store = GraphStore::new();
        store.insert_node(trigger("n1")).unwrap();
        store.insert_node(action("n2")).unwrap();
        store.insert_node(action("n3")).unwrap();
        store.insert_edge(Edge::new("e1", "n1", "n2")).unwrap();
        store.insert_edge(Edge::new("e2", "n2", "n3")).unwrap();
        store.insert_edge(Edge::new("e3", "n1", "n3")).unwrap();

        let removed = store.remove_node("n2").unwrap();
        assert_eq!(removed.node.id, "n2");
        assert_eq!(removed.edges.len(), 2);

        assert!(!store.list_edges().iter().any(|e| e.touches("n2")));
        assert_eq!(store.list_edges().len(), 1);
        assert_eq!(store.list_edges()[0].id, "e3");
    }

    #[test]
    fn test_remove_edge() {
        let mut store = GraphStore::new();
        store.insert_node(trigger("n1")).unwrap();
        store.insert_node(action("n2")).unwrap();
        store.insert_edge(Edge::new("e1", "n1", "n2")).unwrap();

        assert_eq!(store.remove_edge("e1").unwrap().id, "e1");
        assert!(matches!(store.remove_edge("e1"), Err(GraphError::NotFound(_))));
        assert_eq!(store.node_count(), 2);
    }

    #[test]
    fn test_move_node_keeps_fields() {
        let mut store = GraphStore::new();
        store.insert_node(action("n2")).unwrap();

        store.move_node("n2", Position::new(5.0, 6.0)).unwrap();
        let node = store.get_node("n2").unwrap();
        assert_eq!(node.position, Position::new(5.0, 6.0));
        assert_eq!(node.label(), Some("Run Script"));
    }

    #[test]
    fn test_non_finite_positions_rejected() {
        let mut store = GraphStore::new();
        let nan = Node::new("n1", NodeKind::Trigger, "manual", (f64::NAN, 0.0));
        assert!(matches!(
            store.insert_node(nan),
            Err(GraphError::NonFinitePosition { .. })
        ));
        assert!(store.is_empty());

        store.insert_node(trigger("n1")).unwrap();
        assert!(matches!(
            store.move_node("n1", Position::new(f64::INFINITY, 0.0)),
            Err(GraphError::NonFinitePosition { .. })
        ));
        assert_eq!(store.get_node("n1").unwrap().position, Position::default());
    }

    #[test]
    fn test_incoming_and_outgoing() {
        let mut store = GraphStore::new();
        store.insert_node(trigger("n1")).unwrap();
        store.insert_node(action("n2")).unwrap();
        store.insert_edge(Edge::new("e1", "n1", "n2")).unwrap();

        assert_eq!(store.outgoing_edges("n1").count(), 1);
        assert_eq!(store.incoming_edges("n1").count(), 0);
        assert_eq!(store.incoming_edges("n2").next().map(|e| e.id.as_str()), Some("e1"));
    }
}
