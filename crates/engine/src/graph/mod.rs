//! Node graph: arena of parent-child and peer associations
//!
//! Association records live in one arena keyed by `AssocId`. A node entry
//! holds only the ids of the associations it takes part in, so each link has
//! a single record and both endpoints see the same one. Every method that
//! touches an endpoint's id list updates the other endpoint in the same call.
//!
//! # Lifecycle
//!
//! An association is built fully configured (name and primary flag up front)
//! and stays active until removed. Removal is terminal: ids are never reused,
//! so a new link between the same endpoints gets a new id.
//!
//! # Validation
//!
//! All checks (existence, container role, cycles, primary uniqueness) run
//! before the first mutation, so a rejected build leaves the graph untouched.
//!
//! # Thread Safety
//!
//! None. Callers serialise access, typically through a `UnitOfWork`.

pub mod assoc;

pub use assoc::{ChildAssoc, PeerAssoc};

use crate::config::{EngineConfig, PrimaryPolicy};
use nodestore_core::{
    AssocId, AssocRef, ChildAssocRef, Error, NodeKind, NodeRef, QName, Result, StoreRef,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, info};

// ============================================================================
// NodeEntry
// ============================================================================

/// Per-node back-references into the association arena
#[derive(Debug, Clone)]
struct NodeEntry {
    kind: NodeKind,
    /// Associations where this node is the child
    parent_links: SmallVec<[AssocId; 2]>,
    /// Associations where this node is the parent, in creation order
    child_links: Vec<AssocId>,
    /// Peer associations where this node is the source
    target_links: SmallVec<[AssocId; 4]>,
    /// Peer associations where this node is the target
    source_links: SmallVec<[AssocId; 4]>,
    /// Sibling index handed to the next child association
    next_sibling: usize,
}

impl NodeEntry {
    fn new(kind: NodeKind) -> Self {
        NodeEntry {
            kind,
            parent_links: SmallVec::new(),
            child_links: Vec::new(),
            target_links: SmallVec::new(),
            source_links: SmallVec::new(),
            next_sibling: 0,
        }
    }
}

/// Outcome of `NodeGraph::delete_node`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    /// The deleted node followed by every node removed through cascade
    pub nodes_deleted: Vec<NodeRef>,
    /// Associations detached along the way
    pub assocs_removed: usize,
}

// ============================================================================
// NodeGraph
// ============================================================================

/// In-memory association graph
#[derive(Debug, Clone)]
pub struct NodeGraph {
    nodes: FxHashMap<NodeRef, NodeEntry>,
    child_records: FxHashMap<AssocId, ChildAssoc>,
    peer_records: FxHashMap<AssocId, PeerAssoc>,
    next_assoc_id: u64,
    next_txn_id: u64,
    /// Incremented on every mutation
    version: u64,
    policy: PrimaryPolicy,
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new(PrimaryPolicy::default())
    }
}

impl NodeGraph {
    /// Create an empty graph with the given primary policy
    pub fn new(policy: PrimaryPolicy) -> Self {
        NodeGraph {
            nodes: FxHashMap::default(),
            child_records: FxHashMap::default(),
            peer_records: FxHashMap::default(),
            next_assoc_id: 1,
            next_txn_id: 1,
            version: 0,
            policy,
        }
    }

    /// Create an empty graph configured from `nodestore.toml` settings
    pub fn with_config(config: &EngineConfig) -> Self {
        Self::new(config.primary_policy)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Primary-parent conflict policy in effect
    pub fn policy(&self) -> PrimaryPolicy {
        self.policy
    }

    /// Mutation counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of registered nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of active associations of both kinds
    pub fn assoc_count(&self) -> usize {
        self.child_records.len() + self.peer_records.len()
    }

    pub(crate) fn allocate_txn_id(&mut self) -> u64 {
        let id = self.next_txn_id;
        self.next_txn_id += 1;
        id
    }

    fn allocate_assoc_id(&mut self) -> AssocId {
        let id = AssocId(self.next_assoc_id);
        self.next_assoc_id += 1;
        id
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Register a new node with a generated id
    pub fn create_node(&mut self, store: &StoreRef, kind: NodeKind) -> NodeRef {
        let node = NodeRef::generate(store.clone());
        self.nodes.insert(node.clone(), NodeEntry::new(kind));
        self.version += 1;
        debug!(node = %node, ?kind, "Created node");
        node
    }

    /// Register a node under a caller-chosen reference
    pub fn add_node(&mut self, node: NodeRef, kind: NodeKind) -> Result<()> {
        if self.nodes.contains_key(&node) {
            return Err(Error::NodeExists(node));
        }
        debug!(node = %node, ?kind, "Added node");
        self.nodes.insert(node, NodeEntry::new(kind));
        self.version += 1;
        Ok(())
    }

    /// Whether the node is registered
    pub fn contains(&self, node: &NodeRef) -> bool {
        self.nodes.contains_key(node)
    }

    /// Role of a registered node
    pub fn node_kind(&self, node: &NodeRef) -> Option<NodeKind> {
        self.nodes.get(node).map(|e| e.kind)
    }

    fn entry(&self, node: &NodeRef) -> Result<&NodeEntry> {
        self.nodes
            .get(node)
            .ok_or_else(|| Error::NodeNotFound(node.clone()))
    }

    /// Delete a node and every association touching it
    ///
    /// Children whose primary parent association pointed at a deleted node
    /// are deleted too; children linked only by secondary associations just
    /// lose that link.
    pub fn delete_node(&mut self, node: &NodeRef) -> Result<DeleteSummary> {
        self.entry(node)?;

        let mut summary = DeleteSummary::default();
        let mut pending = vec![node.clone()];

        while let Some(current) = pending.pop() {
            let Some(entry) = self.nodes.remove(&current) else {
                continue;
            };
            self.version += 1;

            for link in &entry.child_links {
                if let Some(record) = self.child_records.get(link) {
                    if record.is_primary {
                        pending.push(record.child.clone());
                    }
                }
            }

            for link in entry.child_links.iter().chain(entry.parent_links.iter()) {
                if self.remove_child_assoc(*link) {
                    summary.assocs_removed += 1;
                }
            }
            for link in entry.target_links.iter().chain(entry.source_links.iter()) {
                if self.remove_peer_assoc(*link) {
                    summary.assocs_removed += 1;
                }
            }

            summary.nodes_deleted.push(current);
        }

        info!(
            node = %node,
            nodes_deleted = summary.nodes_deleted.len(),
            assocs_removed = summary.assocs_removed,
            "Deleted node"
        );
        Ok(summary)
    }

    // ========================================================================
    // Parent-child associations
    // ========================================================================

    /// Link `child` under `parent` with its name and primary flag
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if either endpoint is unknown
    /// - `InvalidArgument` if `parent` is not a container
    /// - `CyclicAssociation` if `child` is `parent` or one of its ancestors
    /// - `DuplicatePrimary` if `is_primary` and the child already has a
    ///   primary parent under `PrimaryPolicy::Reject`
    pub fn build_child_assoc(
        &mut self,
        parent: &NodeRef,
        child: &NodeRef,
        qname: QName,
        is_primary: bool,
    ) -> Result<ChildAssoc> {
        let parent_entry = self.entry(parent)?;
        if !parent_entry.kind.is_container() {
            return Err(Error::InvalidArgument(format!(
                "{} is not a container and cannot hold children",
                parent
            )));
        }
        let nth_sibling = parent_entry.next_sibling;
        self.entry(child)?;

        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::CyclicAssociation {
                parent: parent.clone(),
                child: child.clone(),
            });
        }

        let demote = if is_primary {
            match (self.primary_link(child), self.policy) {
                (Some(existing), PrimaryPolicy::Reject) => {
                    return Err(Error::DuplicatePrimary {
                        child: child.clone(),
                        existing,
                    });
                }
                (existing, _) => existing,
            }
        } else {
            None
        };

        if let Some(existing) = demote {
            if let Some(record) = self.child_records.get_mut(&existing) {
                record.is_primary = false;
                debug!(assoc = %existing, child = %child, "Demoted primary association");
            }
        }

        let id = self.allocate_assoc_id();
        let record = ChildAssoc {
            id,
            parent: parent.clone(),
            child: child.clone(),
            qname,
            is_primary,
            nth_sibling,
        };

        if let Some(entry) = self.nodes.get_mut(parent) {
            entry.child_links.push(id);
            entry.next_sibling += 1;
        }
        if let Some(entry) = self.nodes.get_mut(child) {
            entry.parent_links.push(id);
        }
        self.child_records.insert(id, record.clone());
        self.version += 1;

        debug!(
            assoc = %id,
            parent = %parent,
            child = %child,
            qname = %record.qname,
            is_primary,
            "Built child association"
        );
        Ok(record)
    }

    /// Detach a parent-child association from both endpoints
    ///
    /// Returns false if the association is not active; removing twice is a
    /// no-op. Removing a primary association does not delete the child.
    pub fn remove_child_assoc(&mut self, id: AssocId) -> bool {
        let Some(record) = self.child_records.remove(&id) else {
            debug!(assoc = %id, "Child association already removed");
            return false;
        };

        if let Some(entry) = self.nodes.get_mut(&record.parent) {
            entry.child_links.retain(|link| *link != id);
        }
        if let Some(entry) = self.nodes.get_mut(&record.child) {
            entry.parent_links.retain(|link| *link != id);
        }
        self.version += 1;

        debug!(
            assoc = %id,
            parent = %record.parent,
            child = %record.child,
            "Removed child association"
        );
        true
    }

    /// Active parent-child association by id
    pub fn child_assoc(&self, id: AssocId) -> Option<&ChildAssoc> {
        self.child_records.get(&id)
    }

    /// Resolve an external reference to the active association's id
    ///
    /// Matches on endpoints, name and sibling index, so a reference taken
    /// before a primary association was demoted still resolves.
    pub fn child_assoc_id(&self, assoc_ref: &ChildAssocRef) -> Option<AssocId> {
        let entry = self.nodes.get(assoc_ref.parent())?;
        entry.child_links.iter().copied().find(|link| {
            self.child_records
                .get(link)
                .is_some_and(|r| r.assoc_ref() == *assoc_ref)
        })
    }

    /// Associations where `parent` is the parent, in creation order
    pub fn child_assocs(&self, parent: &NodeRef) -> Result<Vec<&ChildAssoc>> {
        let entry = self.entry(parent)?;
        Ok(entry
            .child_links
            .iter()
            .filter_map(|link| self.child_records.get(link))
            .collect())
    }

    /// Associations where `child` is the child, primary first
    pub fn parent_assocs(&self, child: &NodeRef) -> Result<Vec<&ChildAssoc>> {
        let entry = self.entry(child)?;
        let mut assocs: Vec<&ChildAssoc> = entry
            .parent_links
            .iter()
            .filter_map(|link| self.child_records.get(link))
            .collect();
        assocs.sort_by_key(|a| (!a.is_primary, a.id));
        Ok(assocs)
    }

    /// The child's primary parent association, if any
    pub fn primary_parent(&self, child: &NodeRef) -> Result<Option<&ChildAssoc>> {
        self.entry(child)?;
        Ok(self
            .primary_link(child)
            .and_then(|link| self.child_records.get(&link)))
    }

    /// Child nodes of `parent`, in creation order
    pub fn children(&self, parent: &NodeRef) -> Result<Vec<&NodeRef>> {
        Ok(self
            .child_assocs(parent)?
            .into_iter()
            .map(|a| &a.child)
            .collect())
    }

    /// Primary path from the root down to `node`
    ///
    /// Empty for a node without a primary parent.
    pub fn path(&self, node: &NodeRef) -> Result<Vec<ChildAssocRef>> {
        self.entry(node)?;
        let mut path = Vec::new();
        let mut current = node;
        while let Some(record) = self
            .primary_link(current)
            .and_then(|link| self.child_records.get(&link))
        {
            path.push(record.assoc_ref());
            current = &record.parent;
        }
        path.reverse();
        Ok(path)
    }

    fn primary_link(&self, child: &NodeRef) -> Option<AssocId> {
        let entry = self.nodes.get(child)?;
        entry
            .parent_links
            .iter()
            .copied()
            .find(|link| self.child_records.get(link).is_some_and(|r| r.is_primary))
    }

    /// Whether `candidate` is reachable upwards from `node` through any parent link
    fn is_ancestor(&self, candidate: &NodeRef, node: &NodeRef) -> bool {
        let mut seen: FxHashSet<&NodeRef> = FxHashSet::default();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Some(entry) = self.nodes.get(current) else {
                continue;
            };
            for link in &entry.parent_links {
                if let Some(record) = self.child_records.get(link) {
                    if record.parent == *candidate {
                        return true;
                    }
                    if seen.insert(&record.parent) {
                        stack.push(&record.parent);
                    }
                }
            }
        }
        false
    }

    // ========================================================================
    // Peer associations
    // ========================================================================

    /// Link `source` to `target` under `qname`
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if either endpoint is unknown
    /// - `InvalidArgument` if either endpoint is a container
    /// - `AssociationExists` if the same source, target and name are linked
    pub fn build_peer_assoc(
        &mut self,
        source: &NodeRef,
        target: &NodeRef,
        qname: QName,
    ) -> Result<PeerAssoc> {
        let source_entry = self.entry(source)?;
        let target_entry = self.entry(target)?;
        for (node, entry) in [(source, source_entry), (target, target_entry)] {
            if entry.kind.is_container() {
                return Err(Error::InvalidArgument(format!(
                    "{} is a container; peer associations join plain nodes",
                    node
                )));
            }
        }

        let duplicate = source_entry.target_links.iter().any(|link| {
            self.peer_records
                .get(link)
                .is_some_and(|r| r.target == *target && r.qname == qname)
        });
        if duplicate {
            return Err(Error::AssociationExists {
                source_node: source.clone(),
                target: target.clone(),
                qname: qname.to_string(),
            });
        }

        let id = self.allocate_assoc_id();
        let record = PeerAssoc {
            id,
            source: source.clone(),
            target: target.clone(),
            qname,
        };

        if let Some(entry) = self.nodes.get_mut(source) {
            entry.target_links.push(id);
        }
        if let Some(entry) = self.nodes.get_mut(target) {
            entry.source_links.push(id);
        }
        self.peer_records.insert(id, record.clone());
        self.version += 1;

        debug!(
            assoc = %id,
            source = %source,
            target = %target,
            qname = %record.qname,
            "Built peer association"
        );
        Ok(record)
    }

    /// Detach a peer association from both endpoints
    ///
    /// Returns false if the association is not active.
    pub fn remove_peer_assoc(&mut self, id: AssocId) -> bool {
        let Some(record) = self.peer_records.remove(&id) else {
            debug!(assoc = %id, "Peer association already removed");
            return false;
        };

        if let Some(entry) = self.nodes.get_mut(&record.source) {
            entry.target_links.retain(|link| *link != id);
        }
        if let Some(entry) = self.nodes.get_mut(&record.target) {
            entry.source_links.retain(|link| *link != id);
        }
        self.version += 1;

        debug!(
            assoc = %id,
            source = %record.source,
            target = %record.target,
            "Removed peer association"
        );
        true
    }

    /// Active peer association by id
    pub fn peer_assoc(&self, id: AssocId) -> Option<&PeerAssoc> {
        self.peer_records.get(&id)
    }

    /// Resolve an external reference to the active association's id
    pub fn peer_assoc_id(&self, assoc_ref: &AssocRef) -> Option<AssocId> {
        let entry = self.nodes.get(assoc_ref.source())?;
        entry.target_links.iter().copied().find(|link| {
            self.peer_records.get(link).is_some_and(|r| {
                r.target == *assoc_ref.target() && r.qname == *assoc_ref.qname()
            })
        })
    }

    /// Peer associations where `source` is the source
    pub fn target_assocs(&self, source: &NodeRef) -> Result<Vec<&PeerAssoc>> {
        let entry = self.entry(source)?;
        Ok(entry
            .target_links
            .iter()
            .filter_map(|link| self.peer_records.get(link))
            .collect())
    }

    /// Peer associations where `target` is the target
    pub fn source_assocs(&self, target: &NodeRef) -> Result<Vec<&PeerAssoc>> {
        let entry = self.entry(target)?;
        Ok(entry
            .source_links
            .iter()
            .filter_map(|link| self.peer_records.get(link))
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
