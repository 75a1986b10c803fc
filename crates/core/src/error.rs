//! Error types for NodeStore
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//! Faults raised by an external engine are kept as the `source` of the
//! wrapping variant, never flattened into a string.

use crate::types::{AssocId, NodeRef};
use std::io;
use thiserror::Error;

/// Result type alias for NodeStore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for NodeStore
#[derive(Debug, Error)]
pub enum Error {
    /// The search engine reported an I/O fault
    #[error("Search error during {operation}: {source}")]
    Search {
        /// Adapter operation that hit the fault
        operation: &'static str,
        /// Original engine fault
        #[source]
        source: io::Error,
    },

    /// Operation is not implemented by this variant
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Argument violates a role or shape constraint
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed store ref, node ref or qname text
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Node is not registered in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(NodeRef),

    /// Node is already registered in the graph
    #[error("Node already exists: {0}")]
    NodeExists(NodeRef),

    /// Association is not active in the graph
    #[error("Association not found: {0}")]
    AssociationNotFound(AssocId),

    /// Peer association with the same source, target and name already exists
    #[error("Association {qname} already exists from {source_node} to {target}")]
    AssociationExists {
        /// Source node
        source_node: NodeRef,
        /// Target node
        target: NodeRef,
        /// Association name
        qname: String,
    },

    /// Child already has a primary parent association
    #[error("Node {child} already has primary parent association {existing}")]
    DuplicatePrimary {
        /// Child node
        child: NodeRef,
        /// The active primary association
        existing: AssocId,
    },

    /// Link would make a node its own ancestor
    #[error("Cyclic association: {child} is an ancestor of {parent}")]
    CyclicAssociation {
        /// Proposed parent
        parent: NodeRef,
        /// Proposed child
        child: NodeRef,
    },

    /// Hit index outside `0..len`
    #[error("Index {index} out of range for result set of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Result set length
        len: usize,
    },

    /// Engine document lacks a required field
    #[error("Document {index} has no '{field}' field")]
    MissingField {
        /// Hit index
        index: usize,
        /// Field name
        field: &'static str,
    },

    /// Result set was closed
    #[error("Result set is closed")]
    ResultSetClosed,

    /// Unit of work is committed or aborted
    #[error("Transaction not active: {state}")]
    TransactionNotActive {
        /// Current state
        state: String,
    },

    /// Graph changed since the unit of work began
    #[error("Conflict: graph moved from version {expected} to {actual}")]
    Conflict {
        /// Version observed at begin
        expected: u64,
        /// Version found at commit
        actual: u64,
    },

    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an engine I/O fault
    pub fn search(operation: &'static str, source: io::Error) -> Self {
        Error::Search { operation, source }
    }

    /// Whether this error wraps an engine fault
    pub fn is_search(&self) -> bool {
        matches!(self, Error::Search { .. })
    }
}
