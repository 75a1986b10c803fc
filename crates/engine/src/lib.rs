//! Association engine for NodeStore
//!
//! This crate owns the mutable side of the repository:
//! - NodeGraph: arena of parent-child and peer associations
//! - UnitOfWork: explicit, all-or-nothing batches of graph mutations
//! - EngineConfig: `nodestore.toml` settings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod transaction;

pub use config::{EngineConfig, PrimaryPolicy, SearchConfig, CONFIG_FILE_NAME, DEFAULT_STORE};
pub use graph::{ChildAssoc, DeleteSummary, NodeGraph, PeerAssoc};
pub use transaction::{ApplyResult, TransactionStatus, UnitOfWork};
