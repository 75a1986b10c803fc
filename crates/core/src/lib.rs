//! Core types for NodeStore
//!
//! This crate defines the foundational types used throughout the system:
//! - StoreRef / NodeRef: Store and node identity
//! - QName: Qualified association names
//! - NodeKind: Container vs plain content node
//! - AssocId: Arena identifier for association records
//! - Contract types: ChildAssocRef, AssocRef
//! - Error: Unified error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod types;

pub use contract::{AssocRef, ChildAssocRef};
pub use error::{Error, Result};
pub use types::{AssocId, NodeKind, NodeRef, QName, StoreRef};
