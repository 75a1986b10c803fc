//! NodeStore - node associations and search result sets for a content repository
//!
//! NodeStore models how repository nodes relate to each other and how a text
//! search over those nodes is handed back to callers.
//!
//! # Quick Start
//!
//! ```
//! use nodestore::{MemoryIndex, NodeGraph, NodeKind, QName, StoreRef};
//!
//! let store = StoreRef::new("workspace", "SpacesStore");
//! let mut graph = NodeGraph::default();
//!
//! let folder = graph.create_node(&store, NodeKind::Container);
//! let doc = graph.create_node(&store, NodeKind::Content);
//! graph
//!     .build_child_assoc(&folder, &doc, QName::new("urn:content", "contains"), true)
//!     .unwrap();
//!
//! let index = MemoryIndex::new();
//! index.index_node(&doc, "quarterly report");
//!
//! let mut results = index.search(&store, "report", 10);
//! assert_eq!(results.get_node_ref(0).unwrap(), doc);
//! results.close().unwrap();
//! ```
//!
//! # Architecture
//!
//! - `nodestore-core`: references, names, association value types, errors
//! - `nodestore-engine`: the association graph, units of work, configuration
//! - `nodestore-search`: the result set adapter and an in-memory text index

pub use nodestore_core::*;
pub use nodestore_engine::*;
pub use nodestore_search::*;
