//! Association reference values
//!
//! An association is addressed externally by its endpoints and name rather
//! than by the arena id the graph assigns it. These values are what callers
//! compare, hash and hand across API boundaries.
//!
//! ## Usage
//!
//! ```
//! use nodestore_core::{ChildAssocRef, QName, StoreRef};
//!
//! let store = StoreRef::new("workspace", "SpacesStore");
//! let assoc = ChildAssocRef::new(
//!     store.node("folder"),
//!     store.node("doc"),
//!     QName::new("urn:content", "contains"),
//!     true,
//!     0,
//! );
//!
//! assert!(assoc.is_primary());
//! assert_eq!(assoc.child().id, "doc");
//! ```

use crate::types::{NodeRef, QName};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Reference to a parent-child association
///
/// Identity is the two endpoints, the name and the sibling index. The
/// primary flag is carried along but not compared: demoting a primary
/// association does not change which association a reference points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildAssocRef {
    parent: NodeRef,
    child: NodeRef,
    qname: QName,
    is_primary: bool,
    nth_sibling: usize,
}

impl ChildAssocRef {
    /// Create a parent-child association reference
    pub fn new(
        parent: NodeRef,
        child: NodeRef,
        qname: QName,
        is_primary: bool,
        nth_sibling: usize,
    ) -> Self {
        ChildAssocRef {
            parent,
            child,
            qname,
            is_primary,
            nth_sibling,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Parent (container) endpoint
    pub fn parent(&self) -> &NodeRef {
        &self.parent
    }

    /// Child endpoint
    pub fn child(&self) -> &NodeRef {
        &self.child
    }

    /// Association name within the parent
    pub fn qname(&self) -> &QName {
        &self.qname
    }

    /// Whether this is the child's primary (canonical location) link
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Position among the parent's children at creation time
    pub fn nth_sibling(&self) -> usize {
        self.nth_sibling
    }
}

impl PartialEq for ChildAssocRef {
    fn eq(&self, other: &Self) -> bool {
        self.parent == other.parent
            && self.child == other.child
            && self.qname == other.qname
            && self.nth_sibling == other.nth_sibling
    }
}

impl Eq for ChildAssocRef {}

impl Hash for ChildAssocRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parent.hash(state);
        self.child.hash(state);
        self.qname.hash(state);
        self.nth_sibling.hash(state);
    }
}

impl fmt::Display for ChildAssocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.parent,
            self.child,
            self.qname,
            if self.is_primary { "primary" } else { "secondary" },
            self.nth_sibling
        )
    }
}

/// Reference to a peer (source-target) association
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssocRef {
    source: NodeRef,
    target: NodeRef,
    qname: QName,
}

impl AssocRef {
    /// Create a peer association reference
    pub fn new(source: NodeRef, target: NodeRef, qname: QName) -> Self {
        AssocRef {
            source,
            target,
            qname,
        }
    }

    /// Source endpoint
    pub fn source(&self) -> &NodeRef {
        &self.source
    }

    /// Target endpoint
    pub fn target(&self) -> &NodeRef {
        &self.target
    }

    /// Association name
    pub fn qname(&self) -> &QName {
        &self.qname
    }
}

impl fmt::Display for AssocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.source, self.target, self.qname)
    }
}
