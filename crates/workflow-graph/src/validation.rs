//! Structural validation for workflow documents
//!
//! Run before a document is loaded into a store. All problems are collected
//! rather than stopping at the first one.

use std::collections::HashSet;

use crate::document::WorkflowDocument;

/// Validation error with location context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Two nodes share an id
    DuplicateNodeId { node_id: String },
    /// Two edges share an id
    DuplicateEdgeId { edge_id: String },
    /// An edge references a node that is not in the document
    UnknownNode { edge_id: String, node_id: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateNodeId { node_id } => write!(f, "Duplicate node id '{}'", node_id),
            Self::DuplicateEdgeId { edge_id } => write!(f, "Duplicate edge id '{}'", edge_id),
            Self::UnknownNode { edge_id, node_id } => {
                write!(f, "Edge '{}' references unknown node '{}'", edge_id, node_id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a workflow document
///
/// Returns all validation errors found (not just the first).
pub fn validate_document(document: &WorkflowDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let node_ids = validate_node_ids(document, &mut errors);
    validate_edge_ids(document, &mut errors);
    validate_edge_references(document, &node_ids, &mut errors);

    errors
}

/// Collect node ids, reporting each duplicate once
fn validate_node_ids<'a>(
    document: &'a WorkflowDocument,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for node in &document.nodes {
        if !seen.insert(node.id.as_str()) && reported.insert(node.id.as_str()) {
            errors.push(ValidationError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    }

    seen
}

fn validate_edge_ids(document: &WorkflowDocument, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for edge in &document.edges {
        if !seen.insert(edge.id.as_str()) && reported.insert(edge.id.as_str()) {
            errors.push(ValidationError::DuplicateEdgeId {
                edge_id: edge.id.clone(),
            });
        }
    }
}

/// Check that all edge source/target nodes exist
fn validate_edge_references(
    document: &WorkflowDocument,
    node_ids: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    for edge in &document.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint.as_str()) {
                errors.push(ValidationError::UnknownNode {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
}
