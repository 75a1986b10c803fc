//! Unit of work over a `NodeGraph`
//!
//! Graph mutations that belong together (create a node, link it under its
//! parent, link its peers) are buffered in a `UnitOfWork` and applied in one
//! step. The context is an explicit value owned by the caller; nothing is
//! bound to the current thread.
//!
//! # Lifecycle
//!
//! 1. **BEGIN**: `UnitOfWork::begin(&mut graph)` records the graph version
//! 2. **BUFFER**: `create_node`, `link_child`, `link_peer`, `unlink_*`, `delete_node`
//! 3. **COMMIT**: every operation is applied to a staged copy of the graph;
//!    the copy replaces the graph only if all of them succeed
//! 4. **ABORT**: `abort()` drops the buffer
//!
//! A commit fails with `Conflict` if another unit of work committed after
//! this one began (first committer wins).

use crate::graph::{ChildAssoc, NodeGraph, PeerAssoc};
use nodestore_core::{AssocId, Error, NodeKind, NodeRef, QName, Result, StoreRef};
use tracing::{debug, info, warn};

/// Status of a unit of work in its lifecycle
///
/// State transitions:
/// - `Active` → `Committed` (all operations applied)
/// - `Active` → `Aborted` (user abort, conflict or failed operation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Buffering operations
    Active,
    /// Applied to the graph
    Committed,
    /// Discarded
    Aborted {
        /// Human-readable reason for abort
        reason: String,
    },
}

/// Buffered graph mutation
#[derive(Debug, Clone)]
enum GraphOp {
    AddNode {
        node: NodeRef,
        kind: NodeKind,
    },
    LinkChild {
        parent: NodeRef,
        child: NodeRef,
        qname: QName,
        is_primary: bool,
    },
    LinkPeer {
        source: NodeRef,
        target: NodeRef,
        qname: QName,
    },
    UnlinkChild(AssocId),
    UnlinkPeer(AssocId),
    DeleteNode(NodeRef),
}

/// Result of applying a unit of work
#[derive(Debug, Clone, Default)]
pub struct ApplyResult {
    /// Graph version after the commit
    pub commit_version: u64,
    /// Nodes registered
    pub nodes_created: Vec<NodeRef>,
    /// Parent-child associations built, in buffer order
    pub child_assocs: Vec<ChildAssoc>,
    /// Peer associations built, in buffer order
    pub peer_assocs: Vec<PeerAssoc>,
    /// Associations detached by unlink and delete operations
    pub assocs_removed: usize,
    /// Nodes deleted, cascade included
    pub nodes_deleted: usize,
}

/// Explicit unit of work over a graph
#[derive(Debug)]
pub struct UnitOfWork {
    /// Identifier unique within the graph that issued it
    pub txn_id: u64,
    /// Graph version at begin
    pub start_version: u64,
    /// Current status
    pub status: TransactionStatus,
    ops: Vec<GraphOp>,
}

impl UnitOfWork {
    /// Begin a unit of work against `graph`
    pub fn begin(graph: &mut NodeGraph) -> Self {
        let txn_id = graph.allocate_txn_id();
        debug!(txn_id, start_version = graph.version(), "Began unit of work");
        UnitOfWork {
            txn_id,
            start_version: graph.version(),
            status: TransactionStatus::Active,
            ops: Vec::new(),
        }
    }

    /// Whether operations can still be buffered
    pub fn is_active(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    /// Number of buffered operations
    pub fn pending(&self) -> usize {
        self.ops.len()
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(Error::TransactionNotActive {
                state: format!("{:?}", self.status),
            })
        }
    }

    fn push(&mut self, op: GraphOp) -> Result<()> {
        self.ensure_active()?;
        self.ops.push(op);
        Ok(())
    }

    // ========================================================================
    // Buffered operations
    // ========================================================================

    /// Buffer creation of a node; its reference is known immediately
    pub fn create_node(&mut self, store: &StoreRef, kind: NodeKind) -> Result<NodeRef> {
        self.ensure_active()?;
        let node = NodeRef::generate(store.clone());
        self.ops.push(GraphOp::AddNode {
            node: node.clone(),
            kind,
        });
        Ok(node)
    }

    /// Buffer registration of a node under a chosen reference
    pub fn add_node(&mut self, node: NodeRef, kind: NodeKind) -> Result<()> {
        self.push(GraphOp::AddNode { node, kind })
    }

    /// Buffer a parent-child link
    pub fn link_child(
        &mut self,
        parent: &NodeRef,
        child: &NodeRef,
        qname: QName,
        is_primary: bool,
    ) -> Result<()> {
        self.push(GraphOp::LinkChild {
            parent: parent.clone(),
            child: child.clone(),
            qname,
            is_primary,
        })
    }

    /// Buffer a peer link
    pub fn link_peer(&mut self, source: &NodeRef, target: &NodeRef, qname: QName) -> Result<()> {
        self.push(GraphOp::LinkPeer {
            source: source.clone(),
            target: target.clone(),
            qname,
        })
    }

    /// Buffer removal of a parent-child association
    pub fn unlink_child(&mut self, id: AssocId) -> Result<()> {
        self.push(GraphOp::UnlinkChild(id))
    }

    /// Buffer removal of a peer association
    pub fn unlink_peer(&mut self, id: AssocId) -> Result<()> {
        self.push(GraphOp::UnlinkPeer(id))
    }

    /// Buffer deletion of a node
    pub fn delete_node(&mut self, node: &NodeRef) -> Result<()> {
        self.push(GraphOp::DeleteNode(node.clone()))
    }

    // ========================================================================
    // Commit / Abort
    // ========================================================================

    /// Apply every buffered operation, all or nothing
    ///
    /// # Errors
    ///
    /// - `TransactionNotActive` if already committed or aborted
    /// - `Conflict` if the graph changed since `begin`
    /// - the first failing operation's error; the graph is left untouched
    pub fn commit(&mut self, graph: &mut NodeGraph) -> Result<ApplyResult> {
        self.ensure_active()?;

        if graph.version() != self.start_version {
            let err = Error::Conflict {
                expected: self.start_version,
                actual: graph.version(),
            };
            self.mark_aborted(err.to_string());
            return Err(err);
        }

        let mut staged = graph.clone();
        let mut result = ApplyResult::default();
        for op in std::mem::take(&mut self.ops) {
            if let Err(err) = apply(&mut staged, op, &mut result) {
                self.mark_aborted(err.to_string());
                return Err(err);
            }
        }

        result.commit_version = staged.version();
        *graph = staged;
        self.status = TransactionStatus::Committed;

        info!(
            txn_id = self.txn_id,
            commit_version = result.commit_version,
            nodes_created = result.nodes_created.len(),
            assocs_built = result.child_assocs.len() + result.peer_assocs.len(),
            assocs_removed = result.assocs_removed,
            "Committed unit of work"
        );
        Ok(result)
    }

    /// Discard every buffered operation
    pub fn abort(&mut self, reason: impl Into<String>) -> Result<()> {
        self.ensure_active()?;
        self.ops.clear();
        self.mark_aborted(reason.into());
        Ok(())
    }

    fn mark_aborted(&mut self, reason: String) {
        warn!(txn_id = self.txn_id, reason = %reason, "Aborted unit of work");
        self.ops.clear();
        self.status = TransactionStatus::Aborted { reason };
    }
}

fn apply(graph: &mut NodeGraph, op: GraphOp, result: &mut ApplyResult) -> Result<()> {
    match op {
        GraphOp::AddNode { node, kind } => {
            graph.add_node(node.clone(), kind)?;
            result.nodes_created.push(node);
        }
        GraphOp::LinkChild {
            parent,
            child,
            qname,
            is_primary,
        } => {
            let assoc = graph.build_child_assoc(&parent, &child, qname, is_primary)?;
            result.child_assocs.push(assoc);
        }
        GraphOp::LinkPeer {
            source,
            target,
            qname,
        } => {
            let assoc = graph.build_peer_assoc(&source, &target, qname)?;
            result.peer_assocs.push(assoc);
        }
        GraphOp::UnlinkChild(id) => {
            if graph.remove_child_assoc(id) {
                result.assocs_removed += 1;
            }
        }
        GraphOp::UnlinkPeer(id) => {
            if graph.remove_peer_assoc(id) {
                result.assocs_removed += 1;
            }
        }
        GraphOp::DeleteNode(node) => {
            let summary = graph.delete_node(&node)?;
            result.nodes_deleted += summary.nodes_deleted.len();
            result.assocs_removed += summary.assocs_removed;
        }
    }
    Ok(())
}

impl NodeGraph {
    /// Run `f` inside a unit of work and commit if it returns `Ok`
    ///
    /// # Usage
    ///
    /// ```
    /// use nodestore_core::{NodeKind, QName, StoreRef};
    /// use nodestore_engine::NodeGraph;
    ///
    /// let mut graph = NodeGraph::default();
    /// let store = StoreRef::new("workspace", "SpacesStore");
    ///
    /// let result = graph
    ///     .transaction(|uow| {
    ///         let folder = uow.create_node(&store, NodeKind::Container)?;
    ///         let doc = uow.create_node(&store, NodeKind::Content)?;
    ///         uow.link_child(&folder, &doc, QName::new("urn:content", "contains"), true)
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(result.child_assocs.len(), 1);
    /// ```
    pub fn transaction<F>(&mut self, f: F) -> Result<ApplyResult>
    where
        F: FnOnce(&mut UnitOfWork) -> Result<()>,
    {
        let mut uow = UnitOfWork::begin(self);
        if let Err(err) = f(&mut uow) {
            uow.mark_aborted(err.to_string());
            return Err(err);
        }
        uow.commit(self)
    }
}
