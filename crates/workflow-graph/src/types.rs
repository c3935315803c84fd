//! Core types for workflow graphs
//!
//! These types define the nodes and edges held by the store, plus the
//! typed configuration view that is derived from a node's open field map.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Identifier of a connection port on a node
pub type HandleId = String;

/// Open field map carried by every node
pub type Fields = serde_json::Map<String, Value>;

/// Well-known field names used by the editing panel
pub mod field {
    pub const LABEL: &str = "label";
    pub const DESCRIPTION: &str = "description";
    /// Carries the node subtype in persisted documents and drop payloads
    pub const TYPE: &str = "type";
    pub const SCRIPT_TYPE: &str = "scriptType";
    pub const EXECUTION_MODE: &str = "executionMode";
    pub const SERVER_ADDRESS: &str = "serverAddress";
    pub const USER_ID: &str = "userID";
    pub const PASSWORD: &str = "password";
}

/// The closed set of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Starts a workflow (manual, http, event, ...)
    Trigger,
    /// Performs work (script, email, ...)
    Action,
}

impl NodeKind {
    /// Wire tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Action => "action",
        }
    }

    /// Parse a wire tag, returning None for anything outside the closed set
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "trigger" => Some(Self::Trigger),
            "action" => Some(Self::Action),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates survive a JSON round trip
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier, immutable after creation
    pub id: NodeId,
    /// Trigger or action
    pub kind: NodeKind,
    /// Free-form component tag (e.g. "manual", "script")
    pub subtype: String,
    /// Position on the canvas
    pub position: Position,
    /// Label, description and kind-specific configuration
    pub fields: Fields,
}

impl Node {
    /// Create a node with an empty field map
    pub fn new(
        id: impl Into<String>,
        kind: NodeKind,
        subtype: impl Into<String>,
        position: impl Into<Position>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            subtype: subtype.into(),
            position: position.into(),
            fields: Fields::new(),
        }
    }

    /// Set a single field (builder style)
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Replace the whole field map
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// Get a raw field value
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a field as a string slice, if it is a string
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// The node label, if one has been set
    pub fn label(&self) -> Option<&str> {
        self.str_field(field::LABEL)
    }

    /// Typed view of this node's configuration
    pub fn config(&self) -> NodeConfig {
        match self.kind {
            NodeKind::Trigger => NodeConfig::Trigger,
            NodeKind::Action => NodeConfig::Action(ActionConfig::from_fields(&self.fields)),
        }
    }

    /// Field names the editing panel exposes for this node in its current state
    pub fn editable_fields(&self) -> Vec<&'static str> {
        let mut names = vec![field::LABEL, field::DESCRIPTION];
        if let NodeConfig::Action(action) = self.config() {
            names.push(field::SCRIPT_TYPE);
            names.push(field::EXECUTION_MODE);
            if action.execution.is_remote() {
                names.extend([field::SERVER_ADDRESS, field::USER_ID, field::PASSWORD]);
            }
        }
        names
    }
}

/// An edge connecting two node ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Target node ID
    pub target: NodeId,
    /// Source port, None for the default port
    pub source_handle: Option<HandleId>,
    /// Target port, None for the default port
    pub target_handle: Option<HandleId>,
}

impl Edge {
    /// Create an edge between the default ports of two nodes
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Attach explicit port handles
    pub fn with_handles(
        mut self,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }

    /// Whether either endpoint is the given node
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// A request to connect two node ports, as emitted by the canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub source_handle: Option<HandleId>,
    #[serde(default)]
    pub target_handle: Option<HandleId>,
}

impl Connection {
    /// Connect the default ports of two nodes
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    /// Canonical id for the edge this connection creates
    ///
    /// Format: `xy-edge__{source}{sourceHandle}-{target}{targetHandle}`.
    pub fn edge_id(&self) -> EdgeId {
        format!(
            "xy-edge__{}{}-{}{}",
            self.source,
            self.source_handle.as_deref().unwrap_or(""),
            self.target,
            self.target_handle.as_deref().unwrap_or(""),
        )
    }

    /// Whether an existing edge already realises this connection
    pub fn matches(&self, edge: &Edge) -> bool {
        edge.source == self.source
            && edge.target == self.target
            && edge.source_handle == self.source_handle
            && edge.target_handle == self.target_handle
    }

    /// Build the edge for this connection
    pub fn into_edge(self) -> Edge {
        let id = self.edge_id();
        Edge {
            id,
            source: self.source,
            target: self.target,
            source_handle: self.source_handle,
            target_handle: self.target_handle,
        }
    }
}

/// Typed configuration derived from a node's field map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeConfig {
    /// Triggers carry no execution configuration
    Trigger,
    /// Actions carry a script type and an execution target
    Action(ActionConfig),
}

/// Configuration for an action node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionConfig {
    pub script_type: ScriptType,
    pub execution: Execution,
}

impl ActionConfig {
    /// Read the action configuration out of an open field map
    ///
    /// Missing or unrecognised values fall back to the panel defaults
    /// (Python, local).
    pub fn from_fields(fields: &Fields) -> Self {
        let text = |name: &str| {
            fields
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let script_type = fields
            .get(field::SCRIPT_TYPE)
            .and_then(Value::as_str)
            .and_then(ScriptType::from_tag)
            .unwrap_or_default();

        let execution = match fields.get(field::EXECUTION_MODE).and_then(Value::as_str) {
            Some("remote") => Execution::Remote(RemoteCredentials {
                server_address: text(field::SERVER_ADDRESS),
                user_id: text(field::USER_ID),
                password: text(field::PASSWORD),
            }),
            _ => Execution::Local,
        };

        Self {
            script_type,
            execution,
        }
    }
}

/// Script flavour run by an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScriptType {
    #[default]
    Python,
    Powershell,
    Shell,
}

impl ScriptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Powershell => "Powershell",
            Self::Shell => "Shell",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Python" => Some(Self::Python),
            "Powershell" => Some(Self::Powershell),
            "Shell" => Some(Self::Shell),
            _ => None,
        }
    }
}

/// Where an action executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    Local,
    Remote(RemoteCredentials),
}

impl Execution {
    /// Wire value of the `executionMode` field
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote(_) => "remote",
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Credentials for remote execution
#[derive(Clone, PartialEq, Eq, Default)]
pub struct RemoteCredentials {
    pub server_address: String,
    pub user_id: String,
    pub password: String,
}

impl fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCredentials")
            .field("server_address", &self.server_address)
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}
