//! Drag-drop ingestion
//!
//! Turns the two string values carried by a drag transfer into a node ready
//! for insertion. Anything that is not a graph drop decodes to `None`; the
//! page has many drop targets and most drops are not meant for the canvas.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::GraphStore;
use crate::types::{field, Fields, Node, NodeId, NodeKind, Position};

/// Transfer format carrying the component kind tag
pub const KIND_FORMAT: &str = "application/reactflow";

/// Transfer format carrying the JSON `{label, type}` object
pub const DATA_FORMAT: &str = "application/nodedata";

/// A decoded graph drop
#[derive(Debug, Clone, PartialEq)]
pub struct DropPayload {
    pub kind: NodeKind,
    pub subtype: String,
    /// Initial fields from the drag source, label included
    pub fields: Fields,
}

impl DropPayload {
    /// Build a payload directly (for hosts that skip the string transfer)
    pub fn new(kind: NodeKind, subtype: impl Into<String>, label: impl Into<String>) -> Self {
        let mut fields = Fields::new();
        fields.insert(field::LABEL.to_string(), Value::String(label.into()));
        Self {
            kind,
            subtype: subtype.into(),
            fields,
        }
    }

    /// Decode the raw transfer values
    ///
    /// Returns `None` when the kind tag is missing, empty or unknown, or when
    /// the node data is not a JSON object.
    pub fn decode(kind_tag: Option<&str>, node_data: Option<&str>) -> Option<Self> {
        let tag = match kind_tag.map(str::trim) {
            Some(tag) if !tag.is_empty() => tag,
            _ => {
                log::debug!("Ignoring drop without a component kind");
                return None;
            }
        };

        let Some(kind) = NodeKind::from_tag(tag) else {
            log::debug!("Ignoring drop with unknown component kind '{}'", tag);
            return None;
        };

        let mut fields = match node_data.map(serde_json::from_str::<Value>) {
            Some(Ok(Value::Object(map))) => map,
            Some(Ok(other)) => {
                log::debug!("Ignoring {} drop: node data is not an object ({})", kind, other);
                return None;
            }
            Some(Err(e)) => {
                log::debug!("Ignoring {} drop: malformed node data: {}", kind, e);
                return None;
            }
            None => {
                log::debug!("Ignoring {} drop: no node data", kind);
                return None;
            }
        };

        let subtype = match fields.remove(field::TYPE) {
            Some(Value::String(subtype)) => subtype,
            _ => String::new(),
        };

        Some(Self {
            kind,
            subtype,
            fields,
        })
    }

    /// Encode as the `(kind tag, node data)` transfer pair
    pub fn encode(&self) -> (String, String) {
        let mut data = self.fields.clone();
        data.insert(field::TYPE.to_string(), Value::String(self.subtype.clone()));
        (self.kind.as_str().to_string(), Value::Object(data).to_string())
    }

    /// The label carried by the payload, if any
    pub fn label(&self) -> Option<&str> {
        self.fields.get(field::LABEL).and_then(Value::as_str)
    }
}

/// Default field set for a freshly dropped node
///
/// Payload fields, an empty description, and for actions only a local
/// execution mode with empty remote credential placeholders.
pub fn default_fields(payload: &DropPayload) -> Fields {
    let mut fields = payload.fields.clone();
    fields.insert(field::DESCRIPTION.to_string(), Value::String(String::new()));

    if payload.kind == NodeKind::Action {
        fields.insert(field::EXECUTION_MODE.to_string(), Value::from("local"));
        for name in [field::SERVER_ADDRESS, field::USER_ID, field::PASSWORD] {
            fields.insert(name.to_string(), Value::String(String::new()));
        }
    }

    fields
}

/// Build the node for a drop at an already mapped canvas position
pub fn build_node(id: NodeId, payload: &DropPayload, position: Position) -> Node {
    Node::new(id, payload.kind, payload.subtype.clone(), position)
        .with_fields(default_fields(payload))
}

/// How new node ids are generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `<kind>-<n>` with a session-scoped monotonic counter
    #[default]
    Sequential,
    /// `<kind>-<uuid v4>`
    Uuid,
}

/// Session-scoped node id generator
#[derive(Debug, Clone)]
pub struct NodeIdGenerator {
    strategy: IdStrategy,
    counter: u64,
}

impl NodeIdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            counter: 0,
        }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Produce an id not currently present in `store`
    ///
    /// Sequential ids skip over numbers already taken, e.g. after a load.
    pub fn next_id(&mut self, kind: NodeKind, store: &GraphStore) -> NodeId {
        loop {
            let candidate = match self.strategy {
                IdStrategy::Sequential => {
                    self.counter += 1;
                    format!("{}-{}", kind, self.counter)
                }
                IdStrategy::Uuid => format!("{}-{}", kind, uuid::Uuid::new_v4()),
            };
            if !store.contains_node(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for NodeIdGenerator {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}
