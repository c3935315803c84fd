//! Port layout per node kind and connection checks
//!
//! Triggers expose only an outgoing port; actions expose an incoming port
//! on the left and an outgoing port on the right. The canvas asks here before
//! committing a connection so it can refuse drags into a trigger.

use thiserror::Error;
use workflow_graph::{Connection, GraphStore, NodeKind};

/// Which ports a node kind exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortLayout {
    pub accepts_incoming: bool,
    pub has_outgoing: bool,
}

/// Port layout for a node kind
pub fn port_layout(kind: NodeKind) -> PortLayout {
    match kind {
        NodeKind::Trigger => PortLayout {
            accepts_incoming: false,
            has_outgoing: true,
        },
        NodeKind::Action => PortLayout {
            accepts_incoming: true,
            has_outgoing: true,
        },
    }
}

/// Reasons a connection is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("Node '{0}' not found")]
    UnknownNode(String),

    #[error("Node '{node_id}' ({kind}) has no outgoing port")]
    NoOutgoingPort { node_id: String, kind: NodeKind },

    #[error("Node '{node_id}' ({kind}) does not accept incoming connections")]
    NoIncomingPort { node_id: String, kind: NodeKind },

    #[error("Node '{0}' cannot connect to itself")]
    SelfLoop(String),
}

/// Check a connection against the port layouts of its endpoints
pub fn validate_connection(
    store: &GraphStore,
    connection: &Connection,
) -> Result<(), ConnectionError> {
    let source = store
        .get_node(&connection.source)
        .ok_or_else(|| ConnectionError::UnknownNode(connection.source.clone()))?;
    let target = store
        .get_node(&connection.target)
        .ok_or_else(|| ConnectionError::UnknownNode(connection.target.clone()))?;

    if source.id == target.id {
        return Err(ConnectionError::SelfLoop(source.id.clone()));
    }
    if !port_layout(source.kind).has_outgoing {
        return Err(ConnectionError::NoOutgoingPort {
            node_id: source.id.clone(),
            kind: source.kind,
        });
    }
    if !port_layout(target.kind).accepts_incoming {
        return Err(ConnectionError::NoIncomingPort {
            node_id: target.id.clone(),
            kind: target.kind,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use workflow_graph::Node;

    fn store() -> GraphStore {
        let mut store = GraphStore::new();
        store
            .insert_node(Node::new("t1", NodeKind::Trigger, "manual", (0.0, 0.0)))
            .unwrap();
        store
            .insert_node(Node::new("a1", NodeKind::Action, "script", (200.0, 0.0)))
            .unwrap();
        store
            .insert_node(Node::new("a2", NodeKind::Action, "email", (400.0, 0.0)))
            .unwrap();
        store
    }

    #[test]
    fn test_trigger_to_action_allowed() {
        let store = store();
        assert!(validate_connection(&store, &Connection::new("t1", "a1")).is_ok());
        assert!(validate_connection(&store, &Connection::new("a1", "a2")).is_ok());
    }

    #[test]
    fn test_trigger_rejects_incoming() {
        let store = store();
        let err = validate_connection(&store, &Connection::new("a1", "t1")).unwrap_err();
        assert_eq!(
            err,
            ConnectionError::NoIncomingPort {
                node_id: "t1".to_string(),
                kind: NodeKind::Trigger,
            }
        );
        assert_eq!(
            err.to_string(),
            "Node 't1' (trigger) does not accept incoming connections"
        );
    }

    #[test]
    fn test_self_loop_and_unknown() {
        let store = store();
        assert_eq!(
            validate_connection(&store, &Connection::new("a1", "a1")),
            Err(ConnectionError::SelfLoop("a1".to_string()))
        );
        assert_eq!(
            validate_connection(&store, &Connection::new("a1", "zz")),
            Err(ConnectionError::UnknownNode("zz".to_string()))
        );
    }
}
