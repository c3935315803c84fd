//! Workflow Components
//!
//! The draggable building blocks of the workflow canvas: the component
//! catalog shown in the palette, the drag-transfer encoding a palette entry
//! attaches when dragged, and the port rules used to accept or refuse
//! connections.
//!
//! # Kinds
//!
//! - **Triggers**: start a workflow (manual, HTTP request, event)
//! - **Actions**: do work (run script, send email)

pub mod catalog;
pub mod ports;
pub mod transfer;

pub use catalog::{ComponentCatalog, ComponentDefinition};
pub use ports::{port_layout, validate_connection, ConnectionError, PortLayout};
pub use transfer::DragTransfer;

#[cfg(test)]
mod tests {
    use super::*;
    use workflow_graph::{Connection, EditorSession, NodeConfig, ScreenPoint};

    #[test]
    fn test_every_builtin_drops_into_a_session() {
        let catalog = ComponentCatalog::with_builtins();
        let mut session = EditorSession::new();

        for (i, component) in catalog.all().iter().enumerate() {
            let transfer = component.drag_transfer();
            let id = session
                .handle_drop(
                    Some(transfer.kind_tag.as_str()),
                    Some(transfer.node_data.as_str()),
                    ScreenPoint::new(i as f64 * 200.0, 0.0),
                )
                .unwrap()
                .expect("catalog drops are graph drops");

            let node = session.store().get_node(&id).unwrap();
            assert_eq!(node.kind, component.kind);
            assert_eq!(node.subtype, component.subtype);
            assert_eq!(node.label(), Some(component.label.as_str()));
        }

        assert_eq!(session.nodes().len(), catalog.len());
    }

    #[test]
    fn test_palette_to_saved_workflow() {
        let catalog = ComponentCatalog::with_builtins();
        let mut session = EditorSession::new();

        let trigger = catalog.triggers().next().unwrap().drag_transfer();
        let action = catalog.actions().next().unwrap().drag_transfer();

        let t = session
            .handle_drop(
                Some(trigger.kind_tag.as_str()),
                Some(trigger.node_data.as_str()),
                ScreenPoint::new(100.0, 50.0),
            )
            .unwrap()
            .unwrap();
        let a = session
            .handle_drop(
                Some(action.kind_tag.as_str()),
                Some(action.node_data.as_str()),
                ScreenPoint::new(300.0, 50.0),
            )
            .unwrap()
            .unwrap();

        let connection = Connection::new(t.as_str(), a.as_str());
        validate_connection(session.store(), &connection).unwrap();
        session.connect(connection).unwrap();

        let backwards = Connection::new(a.as_str(), t.as_str());
        assert!(validate_connection(session.store(), &backwards).is_err());

        assert!(matches!(
            session.store().get_node(&a).unwrap().config(),
            NodeConfig::Action(_)
        ));

        let document = session.to_document();
        assert_eq!(document.nodes.len(), 2);
        assert_eq!(document.edges.len(), 1);
    }
}
