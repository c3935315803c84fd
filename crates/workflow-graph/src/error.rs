//! Error types for the workflow graph

use thiserror::Error;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while editing a workflow graph
///
/// Apart from `NonFinitePosition`, `Serialization` and `Io`, every variant
/// signals a store-consistency violation rather than bad user input.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node or edge with this id is already stored
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// An edge endpoint does not resolve to a stored node
    #[error("Edge '{edge_id}' references unknown node '{node_id}'")]
    UnknownEndpoint { edge_id: String, node_id: String },

    /// No node or edge with this id
    #[error("Not found: {0}")]
    NotFound(String),

    /// An operation required a selected node
    #[error("No node is selected")]
    NoSelection,

    /// A canvas position was NaN or infinite
    #[error("Non-finite canvas position ({x}, {y})")]
    NonFinitePosition { x: f64, y: f64 },

    /// A workflow document failed validation on load
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// Create a not-found error for any id-like value
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Whether this error indicates broken store invariants
    /// (as opposed to bad coordinates, serialization or file-system trouble)
    pub fn is_consistency_violation(&self) -> bool {
        !matches!(
            self,
            Self::NonFinitePosition { .. } | Self::Serialization(_) | Self::Io(_)
        )
    }
}

/// Errors raised by invalid editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Zoom factor must be strictly positive and finite
    #[error("Invalid zoom factor: {0}")]
    InvalidZoom(f64),

    /// Viewport origin or pan is NaN or infinite
    #[error("Viewport origin and pan must be finite")]
    NonFiniteViewport,

    /// Config file could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GraphError::UnknownEndpoint {
            edge_id: "e1".to_string(),
            node_id: "ghost".to_string(),
        };
        assert_eq!(err.to_string(), "Edge 'e1' references unknown node 'ghost'");
        assert_eq!(GraphError::not_found("n1").to_string(), "Not found: n1");
    }

    #[test]
    fn test_consistency_classification() {
        assert!(GraphError::NoSelection.is_consistency_violation());
        assert!(GraphError::DuplicateId("n1".into()).is_consistency_violation());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!GraphError::from(io).is_consistency_violation());
        let nan = GraphError::NonFinitePosition { x: f64::NAN, y: 0.0 };
        assert!(!nan.is_consistency_violation());
    }
}
