//! Integration Tests
//!
//! Cross-crate tests through the `nodestore` facade:
//! - Associations: building, removing and walking the node graph
//! - Transactions: units of work over the graph
//! - Search: index, query and result set lifecycle
//! - Configuration: `nodestore.toml` driving graph and index

#[path = "../common/mod.rs"]
mod common;

mod associations;
mod configuration;
mod search;
mod transactions;
