//! Component catalog
//!
//! The palette of components a user can drag onto the canvas. Entries keep
//! registration order so the palette renders them in a stable sequence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use workflow_graph::{DropPayload, NodeKind};

use crate::transfer::DragTransfer;

/// A draggable component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    /// Trigger or action
    pub kind: NodeKind,
    /// Subtype tag written into the node (e.g. "manual")
    pub subtype: String,
    /// Human-readable label, becomes the node's initial label
    pub label: String,
}

impl ComponentDefinition {
    pub fn new(kind: NodeKind, subtype: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind,
            subtype: subtype.into(),
            label: label.into(),
        }
    }

    pub fn trigger(subtype: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(NodeKind::Trigger, subtype, label)
    }

    pub fn action(subtype: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(NodeKind::Action, subtype, label)
    }

    /// The payload a drop of this component decodes to
    pub fn payload(&self) -> DropPayload {
        DropPayload::new(self.kind, self.subtype.clone(), self.label.clone())
    }

    /// Drag-transfer values to attach when a drag of this component starts
    pub fn drag_transfer(&self) -> DragTransfer {
        DragTransfer::from_payload(&self.payload())
    }
}

/// Registry of draggable components
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    entries: Vec<ComponentDefinition>,
}

impl ComponentCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in triggers and actions
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(ComponentDefinition::trigger("manual", "Manual Trigger"));
        catalog.register(ComponentDefinition::trigger("http", "HTTP Request"));
        catalog.register(ComponentDefinition::trigger("event", "Event Trigger"));
        catalog.register(ComponentDefinition::action("script", "Run Script"));
        catalog.register(ComponentDefinition::action("email", "Send Email"));
        catalog
    }

    /// Register a component
    ///
    /// A component with the same kind and subtype is replaced in place.
    pub fn register(&mut self, definition: ComponentDefinition) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.kind == definition.kind && e.subtype == definition.subtype)
        {
            Some(existing) => {
                log::debug!("Replacing component {}/{}", definition.kind, definition.subtype);
                *existing = definition;
            }
            None => self.entries.push(definition),
        }
    }

    /// Look up a component
    pub fn get(&self, kind: NodeKind, subtype: &str) -> Option<&ComponentDefinition> {
        self.entries
            .iter()
            .find(|e| e.kind == kind && e.subtype == subtype)
    }

    pub fn contains(&self, kind: NodeKind, subtype: &str) -> bool {
        self.get(kind, subtype).is_some()
    }

    /// All components, in registration order
    pub fn all(&self) -> &[ComponentDefinition] {
        &self.entries
    }

    /// Components of one kind, in registration order
    pub fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &ComponentDefinition> + '_ {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &ComponentDefinition> + '_ {
        self.of_kind(NodeKind::Trigger)
    }

    pub fn actions(&self) -> impl Iterator<Item = &ComponentDefinition> + '_ {
        self.of_kind(NodeKind::Action)
    }

    /// Components grouped by kind
    pub fn by_kind(&self) -> HashMap<NodeKind, Vec<&ComponentDefinition>> {
        let mut grouped: HashMap<NodeKind, Vec<&ComponentDefinition>> = HashMap::new();
        for entry in &self.entries {
            grouped.entry(entry.kind).or_default().push(entry);
        }
        grouped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another catalog into this one
    ///
    /// Entries from `other` replace entries sharing kind and subtype.
    pub fn merge(&mut self, other: ComponentCatalog) {
        for entry in other.entries {
            self.register(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let catalog = ComponentCatalog::with_builtins();
        assert_eq!(catalog.len(), 5);

        let triggers: Vec<&str> = catalog.triggers().map(|c| c.subtype.as_str()).collect();
        assert_eq!(triggers, vec!["manual", "http", "event"]);

        let actions: Vec<&str> = catalog.actions().map(|c| c.subtype.as_str()).collect();
        assert_eq!(actions, vec!["script", "email"]);

        assert_eq!(
            catalog.get(NodeKind::Trigger, "http").map(|c| c.label.as_str()),
            Some("HTTP Request")
        );
        assert!(!catalog.contains(NodeKind::Action, "manual"));
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut catalog = ComponentCatalog::with_builtins();
        catalog.register(ComponentDefinition::trigger("http", "Webhook"));

        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.all()[1].label, "Webhook");
    }

    #[test]
    fn test_merge_and_group() {
        let mut catalog = ComponentCatalog::with_builtins();
        let mut extra = ComponentCatalog::new();
        extra.register(ComponentDefinition::action("slack", "Post to Slack"));
        catalog.merge(extra);

        let grouped = catalog.by_kind();
        assert_eq!(grouped[&NodeKind::Trigger].len(), 3);
        assert_eq!(grouped[&NodeKind::Action].len(), 3);
    }

    #[test]
    fn test_definition_wire_format() {
        let definition = ComponentDefinition::action("email", "Send Email");
        assert_eq!(
            serde_json::to_value(&definition).unwrap(),
            serde_json::json!({"kind": "action", "subtype": "email", "label": "Send Email"})
        );
    }
}
