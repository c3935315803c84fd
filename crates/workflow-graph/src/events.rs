//! Change notifications for graph consumers
//!
//! The session reports every committed mutation to an `EventSink` so the
//! presentation layer can re-render without polling the store.

use serde::{Deserialize, Serialize};

use crate::types::{EdgeId, NodeId, Position};

/// Trait for receiving graph change events
///
/// This abstracts over the transport mechanism (UI callback, channel, etc.)
/// so the store can be embedded in different hosts.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered (e.g., channel closed)
    fn send(&self, event: GraphEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted after a committed change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GraphEvent {
    /// A node was dropped onto the canvas
    #[serde(rename_all = "camelCase")]
    NodeAdded { node_id: NodeId },

    /// Fields of a node changed
    #[serde(rename_all = "camelCase")]
    NodeUpdated { node_id: NodeId, fields: Vec<String> },

    /// A node was dragged to a new position
    #[serde(rename_all = "camelCase")]
    NodeMoved { node_id: NodeId, position: Position },

    /// A node was removed along with its edges
    #[serde(rename_all = "camelCase")]
    NodeRemoved {
        node_id: NodeId,
        removed_edges: Vec<EdgeId>,
    },

    /// Two ports were connected
    #[serde(rename_all = "camelCase")]
    EdgeAdded {
        edge_id: EdgeId,
        source: NodeId,
        target: NodeId,
    },

    /// A single edge was removed
    #[serde(rename_all = "camelCase")]
    EdgeRemoved { edge_id: EdgeId },

    /// The selected node changed (None when cleared)
    #[serde(rename_all = "camelCase")]
    SelectionChanged { node_id: Option<NodeId> },

    /// The whole graph was replaced from a document
    #[serde(rename_all = "camelCase")]
    GraphLoaded { node_count: usize, edge_count: usize },
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: GraphEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<GraphEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<GraphEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: GraphEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .map_err(|_| EventError {
                message: "Event buffer poisoned".to_string(),
            })?
            .push(event);
        Ok(())
    }
}
