//! Editor session
//!
//! Owns the store for one editing session and is the only way the
//! presentation layer mutates it. Each method is a single synchronous state
//! transition: the store change, the selection fix-up and the change
//! notification all happen before it returns.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::config::EditorConfig;
use crate::coords::{CoordinateMapper, ScreenPoint, Viewport};
use crate::document::WorkflowDocument;
use crate::error::{ConfigError, GraphError, Result};
use crate::events::{EventSink, GraphEvent, NullEventSink};
use crate::ingest::{build_node, DropPayload, NodeIdGenerator};
use crate::selection::SelectionTracker;
use crate::store::{GraphStore, RemovedNode};
use crate::types::{Connection, Edge, EdgeId, Fields, Node, NodeId, Position};

/// A single editing session over one workflow graph
pub struct EditorSession {
    store: GraphStore,
    selection: SelectionTracker,
    ids: NodeIdGenerator,
    viewport: Viewport,
    config: EditorConfig,
    event_sink: Arc<dyn EventSink>,
}

impl EditorSession {
    /// Create a session with default configuration and no event consumer
    pub fn new() -> Self {
        Self::from_config(EditorConfig::default())
    }

    /// Create a session from a configuration, rejecting an invalid viewport
    pub fn with_config(config: EditorConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: EditorConfig) -> Self {
        Self {
            store: GraphStore::new(),
            selection: SelectionTracker::new(),
            ids: NodeIdGenerator::new(config.id_strategy),
            viewport: config.viewport,
            config,
            event_sink: Arc::new(NullEventSink),
        }
    }

    /// Route change notifications to `sink`
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn nodes(&self) -> &[Node] {
        self.store.list_nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.store.list_edges()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    /// Pan the canvas by a screen-space delta; drops read the result
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            log::warn!("Ignoring non-finite pan ({}, {})", dx, dy);
            return;
        }
        self.viewport.pan_by(dx, dy);
    }

    /// Zoom around a screen anchor
    pub fn zoom_to(
        &mut self,
        zoom: f64,
        anchor: ScreenPoint,
    ) -> std::result::Result<(), ConfigError> {
        self.viewport.zoom_to(zoom, anchor)
    }

    /// Replace the whole pan/zoom state
    pub fn set_viewport(&mut self, viewport: Viewport) -> std::result::Result<(), ConfigError> {
        viewport.validate()?;
        self.viewport = viewport;
        Ok(())
    }

    // =========================================================================
    // Drag-drop ingestion
    // =========================================================================

    /// Handle a drop using the session's own viewport
    ///
    /// Returns the new node id, or `None` if the drop was not meant for the
    /// graph.
    pub fn handle_drop(
        &mut self,
        kind_tag: Option<&str>,
        node_data: Option<&str>,
        point: ScreenPoint,
    ) -> Result<Option<NodeId>> {
        let viewport = self.viewport;
        self.handle_drop_with(kind_tag, node_data, point, &viewport)
    }

    /// Handle a drop, mapping the point through an external canvas engine
    pub fn handle_drop_with(
        &mut self,
        kind_tag: Option<&str>,
        node_data: Option<&str>,
        point: ScreenPoint,
        mapper: &dyn CoordinateMapper,
    ) -> Result<Option<NodeId>> {
        let payload = DropPayload::decode(kind_tag, node_data);
        self.drop_component(payload, point, mapper)
    }

    /// Commit an already decoded drop
    pub fn drop_component(
        &mut self,
        payload: Option<DropPayload>,
        point: ScreenPoint,
        mapper: &dyn CoordinateMapper,
    ) -> Result<Option<NodeId>> {
        let Some(payload) = payload else {
            return Ok(None);
        };

        let position = mapper.screen_to_canvas(point);
        if !position.is_finite() {
            log::warn!(
                "Refusing {} '{}' drop: ({}, {}) mapped to non-finite ({}, {})",
                payload.kind,
                payload.subtype,
                point.x,
                point.y,
                position.x,
                position.y
            );
            return Err(GraphError::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }
        let id = self.ids.next_id(payload.kind, &self.store);
        let node = build_node(id.clone(), &payload, position);

        if let Err(e) = self.store.insert_node(node) {
            log::error!("Generated node id collided with a stored node: {}", e);
            return Err(e);
        }

        log::debug!(
            "Dropped {} '{}' as '{}' at ({}, {})",
            payload.kind,
            payload.subtype,
            id,
            position.x,
            position.y
        );
        self.emit(GraphEvent::NodeAdded {
            node_id: id.clone(),
        });
        Ok(Some(id))
    }

    // =========================================================================
    // Connections
    // =========================================================================

    /// Connect two node ports
    ///
    /// Connecting ports that are already connected returns the existing edge.
    /// When the canonical id is held by a different connection (ids and
    /// handles may contain the `-` separator), a numeric suffix is appended.
    pub fn connect(&mut self, connection: Connection) -> Result<EdgeId> {
        if let Some(existing) = self.store.list_edges().iter().find(|e| connection.matches(e)) {
            return Ok(existing.id.clone());
        }

        let mut edge = connection.into_edge();
        let canonical = edge.id.clone();
        let mut suffix = 0u64;
        while self.store.contains_edge(&edge.id) {
            suffix += 1;
            edge.id = format!("{}-{}", canonical, suffix);
        }
        if suffix > 0 {
            log::debug!("Edge id '{}' taken, using '{}'", canonical, edge.id);
        }
        let event = GraphEvent::EdgeAdded {
            edge_id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
        };
        let id = edge.id.clone();

        self.store.insert_edge(edge)?;
        self.emit(event);
        Ok(id)
    }

    /// Remove a single edge
    pub fn disconnect(&mut self, edge_id: &str) -> Result<Edge> {
        let edge = self.store.remove_edge(edge_id)?;
        self.emit(GraphEvent::EdgeRemoved {
            edge_id: edge.id.clone(),
        });
        Ok(edge)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select a node (node click)
    pub fn select(&mut self, id: &str) -> Result<&Node> {
        let changed = !self.selection.is_selected(id);
        self.selection.select(&self.store, id)?;
        if changed {
            self.emit(GraphEvent::SelectionChanged {
                node_id: Some(id.to_string()),
            });
        }
        self.store.get_node(id).ok_or_else(|| GraphError::not_found(id))
    }

    /// Clear the selection (pane click, panel close)
    pub fn clear_selection(&mut self) {
        if self.selection.clear().is_some() {
            self.emit(GraphEvent::SelectionChanged { node_id: None });
        }
    }

    /// The selected node as currently stored
    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.selected(&self.store)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Set one field on a node (editing panel input)
    pub fn set_field(
        &mut self,
        node_id: &str,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&Node> {
        let mut partial = Fields::new();
        partial.insert(name.into(), value.into());
        self.update_node(node_id, partial)
    }

    /// Shallow-merge several fields into a node
    pub fn update_node(&mut self, node_id: &str, partial: Fields) -> Result<&Node> {
        let names: Vec<String> = partial.keys().cloned().collect();
        self.store.update_node(node_id, partial)?;
        self.emit(GraphEvent::NodeUpdated {
            node_id: node_id.to_string(),
            fields: names,
        });
        self.store.get_node(node_id).ok_or_else(|| GraphError::not_found(node_id))
    }

    /// Move a node on the canvas
    pub fn move_node(&mut self, node_id: &str, position: Position) -> Result<()> {
        self.store.move_node(node_id, position)?;
        self.emit(GraphEvent::NodeMoved {
            node_id: node_id.to_string(),
            position,
        });
        Ok(())
    }

    /// Delete a node and its edges, clearing the selection if it pointed there
    pub fn delete_node(&mut self, node_id: &str) -> Result<RemovedNode> {
        let removed = self.store.remove_node(node_id)?;
        let selection_cleared = self.selection.reconcile(&self.store);

        self.emit(GraphEvent::NodeRemoved {
            node_id: removed.node.id.clone(),
            removed_edges: removed.edges.iter().map(|e| e.id.clone()).collect(),
        });
        if selection_cleared {
            self.emit(GraphEvent::SelectionChanged { node_id: None });
        }
        Ok(removed)
    }

    /// Delete the selected node
    ///
    /// Fails with `NoSelection` (leaving the store untouched) when nothing is
    /// selected.
    pub fn delete_selected(&mut self) -> Result<RemovedNode> {
        let id = self
            .selection
            .selected_id()
            .map(str::to_string)
            .ok_or(GraphError::NoSelection)?;
        let removed = self.delete_node(&id)?;
        self.clear_selection();
        Ok(removed)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Project the current graph into a workflow document
    pub fn to_document(&self) -> WorkflowDocument {
        WorkflowDocument::from_store(&self.store)
    }

    /// Serialize the current graph as indented JSON
    pub fn save_json(&self) -> Result<String> {
        self.to_document().to_json_indented(self.config.save_indent)
    }

    /// Write the current graph to a file
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_document().save_to_path(path, self.config.save_indent)
    }

    /// Replace the graph with a document's contents
    ///
    /// On failure the session is unchanged. On success the selection is
    /// cleared.
    pub fn load_document(&mut self, document: &WorkflowDocument) -> Result<()> {
        let store = document.to_store()?;
        self.store = store;
        self.clear_selection();

        log::info!(
            "Loaded workflow with {} nodes and {} edges",
            self.store.node_count(),
            self.store.edge_count()
        );
        self.emit(GraphEvent::GraphLoaded {
            node_count: self.store.node_count(),
            edge_count: self.store.edge_count(),
        });
        Ok(())
    }

    /// Parse and load a JSON document
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let document = WorkflowDocument::from_json(json)?;
        self.load_document(&document)
    }

    /// Load a document from a JSON file
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let document = WorkflowDocument::load_from_path(path)?;
        self.load_document(&document)
    }

    fn emit(&self, event: GraphEvent) {
        if let Err(e) = self.event_sink.send(event) {
            log::warn!("Failed to deliver graph event: {}", e);
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
