//! Error taxonomy for the editor
//!
//! Four families, matching how each one is surfaced:
//! - invariant violations are programmer errors and always reach the caller
//! - rejections are recoverable and shown to the user as warnings
//! - validation errors describe untrusted import documents
//! - I/O errors come from reading or writing files

use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Crate-wide result type
pub type Result<T, E = EditorError> = std::result::Result<T, E>;

/// Top-level error type returned by graph and controller operations
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("invalid document: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors the user can recover from without restarting
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EditorError::InvariantViolation(_))
    }
}

/// A user-facing operation that was refused; the model is left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no selection: select a node first")]
    NoSelection,

    #[error("invalid operation: node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("invalid operation: terminal node '{0}' cannot have outgoing edges")]
    TerminalSource(String),

    #[error("invalid operation: terminal node '{0}' cannot be deleted")]
    TerminalDelete(String),

    #[error("busy: finish {0} first")]
    Busy(&'static str),
}

/// Reason an import document was refused, one variant per validation rule
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("malformed JSON: {0}")]
    Syntax(String),

    #[error("document root must be an object")]
    NotAnObject,

    #[error("document must include a 'nodes' list")]
    MissingNodes,

    #[error("node entry {index} must be an object")]
    EntryNotObject { index: usize },

    #[error("node entry {index} is missing '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("node entry {index} has an invalid '{field}': expected {expected}")]
    InvalidField {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },

    #[error("duplicate node id {0}")]
    DuplicateId(NodeId),

    #[error("import requires a terminal node labeled '{0}'")]
    MissingTerminal(&'static str),

    #[error("{kind} target {target} of node {source_id} does not exist")]
    DanglingEdge {
        source_id: NodeId,
        kind: &'static str,
        target: NodeId,
    },

    #[error("'root' must be a node id or null")]
    InvalidRoot,

    #[error("root node id {0} does not exist")]
    DanglingRoot(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages_name_the_problem() {
        let err: EditorError = Rejection::TerminalDelete("0".to_string()).into();
        assert_eq!(
            err.to_string(),
            "invalid operation: terminal node '0' cannot be deleted"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_validation_message_is_prefixed() {
        let err: EditorError = ValidationError::MissingTerminal("1").into();
        assert_eq!(
            err.to_string(),
            "invalid document: import requires a terminal node labeled '1'"
        );
    }

    #[test]
    fn test_invariant_violation_is_not_recoverable() {
        let err = EditorError::InvariantViolation("node id 3 is already in use".to_string());
        assert!(!err.is_recoverable());
    }
}
