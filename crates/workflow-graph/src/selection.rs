//! Selection tracking
//!
//! The tracker remembers only the selected node id. Reads resolve the live
//! node from the store, so the panel never sees field values older than the
//! store's. The session keeps the id itself in step with removals.

use crate::error::{GraphError, Result};
use crate::store::GraphStore;
use crate::types::{Node, NodeId};

/// Holds at most one selected node
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: Option<NodeId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a node; fails with `NotFound` if the store does not hold it
    pub fn select(&mut self, store: &GraphStore, id: &str) -> Result<()> {
        if !store.contains_node(id) {
            return Err(GraphError::not_found(id));
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    /// Clear the selection; returns the previously selected id
    pub fn clear(&mut self) -> Option<NodeId> {
        self.selected.take()
    }

    /// The selected node id, if any
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Resolve the selected node against the store
    pub fn selected<'a>(&self, store: &'a GraphStore) -> Option<&'a Node> {
        self.selected.as_deref().and_then(|id| store.get_node(id))
    }

    /// Drop the selection if it no longer resolves
    ///
    /// Returns true when the selection was cleared.
    pub fn reconcile(&mut self, store: &GraphStore) -> bool {
        let dangling = self
            .selected
            .as_deref()
            .is_some_and(|id| !store.contains_node(id));
        if dangling {
            self.selected = None;
        }
        dangling
    }
}
