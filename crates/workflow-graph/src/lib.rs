//! Workflow Graph - graph state manager for the workflow canvas
//!
//! This crate holds the authoritative state behind the visual workflow
//! editor. Presentation code (palette, canvas, editing panel) reads and
//! writes only through it. It provides:
//!
//! - An ordered node/edge store with unique ids and cascade delete
//! - Drag-drop ingestion from raw drag-transfer values
//! - Screen to canvas coordinate mapping at drop time
//! - Single-node selection that always reads live data
//! - Deterministic save to a JSON workflow document, and validated load
//!
//! # Architecture
//!
//! - `GraphStore`: canonical nodes and edges, enforcing structural invariants
//! - `EditorSession`: the mutation API; keeps selection and change
//!   notification in step with every store change
//! - `EventSink`: observer interface for re-rendering (not tied to any UI)
//! - `WorkflowDocument`: the persisted projection
//!
//! # Example
//!
//! ```
//! use workflow_graph::{Connection, EditorSession, ScreenPoint};
//!
//! let mut session = EditorSession::new();
//! let trigger = session
//!     .handle_drop(
//!         Some("trigger"),
//!         Some(r#"{"label":"Manual Trigger","type":"manual"}"#),
//!         ScreenPoint::new(100.0, 50.0),
//!     )?
//!     .expect("graph drop");
//! let action = session
//!     .handle_drop(
//!         Some("action"),
//!         Some(r#"{"label":"Run Script","type":"script"}"#),
//!         ScreenPoint::new(300.0, 50.0),
//!     )?
//!     .expect("graph drop");
//! session.connect(Connection::new(trigger, action))?;
//!
//! let json = session.save_json()?;
//! assert!(json.contains("\"executionMode\": \"local\""));
//! # Ok::<(), workflow_graph::GraphError>(())
//! ```

pub mod builder;
pub mod config;
pub mod coords;
pub mod document;
pub mod error;
pub mod events;
pub mod ingest;
pub mod selection;
pub mod session;
pub mod store;
pub mod types;
pub mod validation;

// Re-export key types
pub use config::EditorConfig;
pub use coords::{CoordinateMapper, IdentityMapper, ScreenPoint, Viewport};
pub use document::{DocumentNode, WorkflowDocument};
pub use error::{ConfigError, GraphError, Result};
pub use events::{EventSink, GraphEvent, NullEventSink, VecEventSink};
pub use ingest::{DropPayload, IdStrategy, NodeIdGenerator};
pub use selection::SelectionTracker;
pub use session::EditorSession;
pub use store::{GraphStore, RemovedNode};
pub use types::{
    field, ActionConfig, Connection, Edge, EdgeId, Execution, Fields, Node, NodeConfig, NodeId,
    NodeKind, Position, RemoteCredentials, ScriptType,
};
pub use validation::{validate_document, ValidationError};
