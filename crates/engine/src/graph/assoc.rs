//! Association records stored in the graph arena

use nodestore_core::{AssocId, AssocRef, ChildAssocRef, NodeRef, QName};

/// Parent-child association record
///
/// Created fully configured by `NodeGraph::build_child_assoc`; the only
/// field that changes afterwards is `is_primary`, when the graph demotes it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildAssoc {
    pub(crate) id: AssocId,
    pub(crate) parent: NodeRef,
    pub(crate) child: NodeRef,
    pub(crate) qname: QName,
    pub(crate) is_primary: bool,
    pub(crate) nth_sibling: usize,
}

impl ChildAssoc {
    /// Arena id
    pub fn id(&self) -> AssocId {
        self.id
    }

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

    /// Whether this is the child's primary link
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Position among the parent's children at creation time
    pub fn nth_sibling(&self) -> usize {
        self.nth_sibling
    }

    /// External addressing value
    pub fn assoc_ref(&self) -> ChildAssocRef {
        ChildAssocRef::new(
            self.parent.clone(),
            self.child.clone(),
            self.qname.clone(),
            self.is_primary,
            self.nth_sibling,
        )
    }
}

/// Peer association record
#[derive(Debug, Clone, PartialEq)]
pub struct PeerAssoc {
    pub(crate) id: AssocId,
    pub(crate) source: NodeRef,
    pub(crate) target: NodeRef,
    pub(crate) qname: QName,
}

impl PeerAssoc {
    /// Arena id
    pub fn id(&self) -> AssocId {
        self.id
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

    /// External addressing value
    pub fn assoc_ref(&self) -> AssocRef {
        AssocRef::new(self.source.clone(), self.target.clone(), self.qname.clone())
    }
}
