//! Drag-transfer encoding
//!
//! A drag carries two string values keyed by format: the component kind
//! tag and the JSON node data. This is the source side of what
//! `workflow_graph::DropPayload::decode` reads on drop.

use std::collections::BTreeMap;

use workflow_graph::ingest::{DATA_FORMAT, KIND_FORMAT};
use workflow_graph::DropPayload;

/// The two values set on a drag transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragTransfer {
    /// Value for `application/reactflow`
    pub kind_tag: String,
    /// Value for `application/nodedata`
    pub node_data: String,
}

impl DragTransfer {
    pub fn from_payload(payload: &DropPayload) -> Self {
        let (kind_tag, node_data) = payload.encode();
        Self {
            kind_tag,
            node_data,
        }
    }

    /// Values keyed by transfer format
    pub fn entries(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            (KIND_FORMAT, self.kind_tag.as_str()),
            (DATA_FORMAT, self.node_data.as_str()),
        ])
    }

    /// Decode back into a payload, as the canvas does on drop
    pub fn decode(&self) -> Option<DropPayload> {
        DropPayload::decode(Some(self.kind_tag.as_str()), Some(self.node_data.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workflow_graph::NodeKind;

    #[test]
    fn test_transfer_values() {
        let transfer = DragTransfer::from_payload(&DropPayload::new(
            NodeKind::Trigger,
            "manual",
            "Manual Trigger",
        ));

        assert_eq!(transfer.kind_tag, "trigger");
        let data: serde_json::Value = serde_json::from_str(&transfer.node_data).unwrap();
        assert_eq!(data, serde_json::json!({"label": "Manual Trigger", "type": "manual"}));

        let entries = transfer.entries();
        assert_eq!(entries.get("application/reactflow"), Some(&"trigger"));
        assert!(entries.contains_key("application/nodedata"));
    }

    #[test]
    fn test_transfer_decodes() {
        let payload = DropPayload::new(NodeKind::Action, "script", "Run Script");
        let transfer = DragTransfer::from_payload(&payload);
        assert_eq!(transfer.decode(), Some(payload));
    }
}
