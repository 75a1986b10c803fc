//! Contract types for API stability
//!
//! Values in this module are how associations are addressed outside the
//! graph that owns them:
//!
//! - `assoc_ref`: `ChildAssocRef` (parent-child) and `AssocRef` (peer)

pub mod assoc_ref;

// Re-exports
pub use assoc_ref::{AssocRef, ChildAssocRef};
