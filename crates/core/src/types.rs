//! Core identity types for NodeStore
//!
//! This module defines the foundational types:
//! - StoreRef: Logical content store (`protocol://identifier`)
//! - NodeRef: Addressable node (`protocol://identifier/id`)
//! - QName: Namespace-scoped name for associations
//! - NodeKind: Container vs plain content node
//! - AssocId: Arena identifier for an association record

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const PROTOCOL_SEPARATOR: &str = "://";

// ============================================================================
// StoreRef
// ============================================================================

/// Reference to a logical content store
///
/// Format: "protocol://identifier", e.g. `workspace://SpacesStore`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreRef {
    /// Store protocol (e.g. "workspace", "archive")
    pub protocol: String,
    /// Store identifier within the protocol
    pub identifier: String,
}

impl StoreRef {
    /// Create a store reference from its parts
    pub fn new(protocol: impl Into<String>, identifier: impl Into<String>) -> Self {
        StoreRef {
            protocol: protocol.into(),
            identifier: identifier.into(),
        }
    }

    /// Parse a store reference from `protocol://identifier`
    ///
    /// # Errors
    /// Returns `InvalidReference` if the separator is missing or either part is empty.
    pub fn parse(s: &str) -> Result<Self> {
        let (protocol, identifier) = s
            .split_once(PROTOCOL_SEPARATOR)
            .ok_or_else(|| Error::InvalidReference(format!("missing '://' in store ref '{}'", s)))?;
        if protocol.is_empty() || identifier.is_empty() {
            return Err(Error::InvalidReference(format!(
                "store ref '{}' needs both protocol and identifier",
                s
            )));
        }
        if identifier.contains('/') {
            return Err(Error::InvalidReference(format!(
                "store identifier in '{}' must not contain '/'",
                s
            )));
        }
        Ok(StoreRef::new(protocol, identifier))
    }

    /// Create a node reference in this store
    pub fn node(&self, id: impl Into<String>) -> NodeRef {
        NodeRef::new(self.clone(), id)
    }
}

impl fmt::Display for StoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.protocol, PROTOCOL_SEPARATOR, self.identifier)
    }
}

impl FromStr for StoreRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StoreRef::parse(s)
    }
}

// ============================================================================
// NodeRef
// ============================================================================

/// Reference to a node: store + item id
///
/// Format: "protocol://identifier/id", e.g. `workspace://SpacesStore/abc123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef {
    /// Store the node lives in
    pub store: StoreRef,
    /// Item id, unique within the store
    pub id: String,
}

impl NodeRef {
    /// Create a node reference from a store and an id
    pub fn new(store: StoreRef, id: impl Into<String>) -> Self {
        NodeRef {
            store,
            id: id.into(),
        }
    }

    /// Create a node reference with a fresh UUID v4 id
    pub fn generate(store: StoreRef) -> Self {
        NodeRef::new(store, Uuid::new_v4().to_string())
    }

    /// Parse a node reference from `protocol://identifier/id`
    ///
    /// The store identifier never contains `/`, so the id is everything after
    /// the first `/` following `://` and may itself contain `/`.
    ///
    /// # Errors
    /// Returns `InvalidReference` if the store part is malformed or the id is empty.
    pub fn parse(s: &str) -> Result<Self> {
        let store_end = s
            .find(PROTOCOL_SEPARATOR)
            .map(|at| at + PROTOCOL_SEPARATOR.len())
            .and_then(|start| s[start..].find('/').map(|slash| start + slash))
            .ok_or_else(|| Error::InvalidReference(format!("node ref '{}' has no id", s)))?;
        let (store, id) = (&s[..store_end], &s[store_end + 1..]);
        if id.is_empty() {
            return Err(Error::InvalidReference(format!("node ref '{}' has an empty id", s)));
        }
        Ok(NodeRef::new(StoreRef::parse(store)?, id))
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.store, self.id)
    }
}

impl FromStr for NodeRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NodeRef::parse(s)
    }
}

// ============================================================================
// QName
// ============================================================================

/// Qualified name: namespace URI + local name
///
/// Scopes the meaning of an association within its parent or source.
/// Displayed as `{namespace}local_name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    /// Namespace URI (may be empty)
    pub namespace: String,
    /// Local name (never empty)
    pub local_name: String,
}

impl QName {
    /// Create a qualified name
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        QName {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }

    /// Parse `{namespace}local` or a bare `local`
    ///
    /// # Errors
    /// Returns `InvalidReference` for an unterminated namespace or an empty local name.
    pub fn parse(s: &str) -> Result<Self> {
        let (namespace, local) = match s.strip_prefix('{') {
            Some(rest) => rest
                .split_once('}')
                .ok_or_else(|| Error::InvalidReference(format!("unterminated namespace in '{}'", s)))?,
            None => ("", s),
        };
        if local.is_empty() {
            return Err(Error::InvalidReference(format!("qname '{}' has no local name", s)));
        }
        Ok(QName::new(namespace, local))
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_name)
        }
    }
}

impl FromStr for QName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        QName::parse(s)
    }
}

// ============================================================================
// NodeKind / AssocId
// ============================================================================

/// Role a node can play in associations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Can hold children via parent-child associations
    Container,
    /// Plain content node; may be a child or a peer endpoint
    Content,
}

impl NodeKind {
    /// Whether this node may act as a parent
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Container)
    }
}

/// Arena identifier of an association record
///
/// Allocated monotonically per graph and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssocId(pub u64);

impl AssocId {
    /// Raw numeric value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assoc#{}", self.0)
    }
}
