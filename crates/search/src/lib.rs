//! Search layer for NodeStore
//!
//! This crate provides:
//! - HitList / SearchSession traits: the boundary to a text engine
//! - Document and the `ID` field contract
//! - ResultSet: repository-facing adapter translating hits to node references
//! - MemoryIndex: in-memory engine and index writer
//! - Scorer trait with a BM25-lite default
//! - Basic tokenizer
//!
//! # Usage
//!
//! ```
//! use nodestore_core::StoreRef;
//! use nodestore_search::MemoryIndex;
//!
//! let store = StoreRef::new("workspace", "SpacesStore");
//! let index = MemoryIndex::new();
//! index.index_node(&store.node("abc123"), "quarterly report");
//!
//! let mut results = index.search(&store, "report", 10);
//! assert_eq!(results.get_node_ref(0).unwrap().to_string(), "workspace://SpacesStore/abc123");
//! results.close().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod index;
pub mod result_set;
pub mod scorer;
pub mod tokenizer;

// Re-export commonly used types
pub use engine::{Document, HitList, SearchSession, FIELD_ID, FIELD_STORE, FIELD_TEXT};
pub use index::MemoryIndex;
pub use result_set::{ResultSet, ResultSetIter, ResultSetRow};
pub use scorer::{BM25LiteScorer, Scorer, ScorerContext};
pub use tokenizer::{tokenize, tokenize_unique};
