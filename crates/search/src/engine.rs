//! Search engine boundary
//!
//! The repository does not own a text engine; it consumes one through two
//! traits:
//! - `HitList`: the hits of one query, fetched by index
//! - `SearchSession`: the engine handle a query holds open
//!
//! Both report low-level faults as `io::Error`. Translating those faults is
//! the job of `ResultSet`, not of the engine.
//!
//! # Field Contract
//!
//! Every indexed document carries the repository node id in the field named
//! exactly `ID`. Index writers must populate it; `ResultSet::get_node_ref`
//! reads nothing else.

use std::collections::BTreeMap;
use std::io;

/// Field holding the repository-assigned node id
pub const FIELD_ID: &str = "ID";

/// Field holding the node's store reference (`protocol://identifier`)
pub const FIELD_STORE: &str = "STORE";

/// Field holding the indexed full text
pub const FIELD_TEXT: &str = "TEXT";

// ============================================================================
// Document
// ============================================================================

/// Engine-native document: named, multi-valued text fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fields: BTreeMap<String, Vec<String>>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Document::default()
    }

    /// Builder: append a value to a field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    /// Append a value to a field
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(name.into()).or_default().push(value.into());
    }

    /// First value of a field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of a field, empty if absent
    pub fn get_all(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Field names in sorted order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

// ============================================================================
// Engine traits
// ============================================================================

/// Hits produced by one query execution
///
/// Indexes run over `0..len()`; the length never changes.
pub trait HitList {
    /// Number of hits
    fn len(&self) -> usize;

    /// Whether the query matched nothing
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the n-th hit's document
    fn doc(&self, n: usize) -> io::Result<Document>;

    /// Relevance score of the n-th hit
    fn score(&self, n: usize) -> io::Result<f32>;
}

/// Open engine handle backing a hit list
pub trait SearchSession {
    /// Release the handle
    fn close(&mut self) -> io::Result<()>;
}
