//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

pub use nodestore::{
    AssocId, Error, MemoryIndex, NodeGraph, NodeKind, NodeRef, PrimaryPolicy, QName, StoreRef,
};

// ============================================================================
// Fixtures
// ============================================================================

/// The default workspace store
pub fn workspace() -> StoreRef {
    StoreRef::new("workspace", "SpacesStore")
}

/// `{urn:content}contains`
pub fn contains() -> QName {
    QName::new("urn:content", "contains")
}

/// `{urn:content}references`
pub fn references() -> QName {
    QName::new("urn:content", "references")
}

/// A small repository tree
///
/// ```text
/// company_home
/// ├── projects
/// │   └── plan.doc
/// └── archive
/// ```
pub struct Tree {
    pub graph: NodeGraph,
    pub home: NodeRef,
    pub projects: NodeRef,
    pub archive: NodeRef,
    pub plan: NodeRef,
}

impl Tree {
    pub fn build(policy: PrimaryPolicy) -> Tree {
        let store = workspace();
        let mut graph = NodeGraph::new(policy);

        let home = store.node("company_home");
        let projects = store.node("projects");
        let archive = store.node("archive");
        let plan = store.node("plan.doc");

        graph.add_node(home.clone(), NodeKind::Container).unwrap();
        graph.add_node(projects.clone(), NodeKind::Container).unwrap();
        graph.add_node(archive.clone(), NodeKind::Container).unwrap();
        graph.add_node(plan.clone(), NodeKind::Content).unwrap();

        graph.build_child_assoc(&home, &projects, contains(), true).unwrap();
        graph.build_child_assoc(&home, &archive, contains(), true).unwrap();
        graph.build_child_assoc(&projects, &plan, contains(), true).unwrap();

        Tree {
            graph,
            home,
            projects,
            archive,
            plan,
        }
    }
}

// ============================================================================
// Assertions
// ============================================================================

/// Every association is visible from both of its endpoints
pub fn assert_symmetric(graph: &NodeGraph, nodes: &[&NodeRef]) {
    for node in nodes {
        for assoc in graph.child_assocs(node).unwrap() {
            let back = graph.parent_assocs(assoc.child()).unwrap();
            assert!(
                back.iter().any(|a| a.id() == assoc.id()),
                "{} missing from parents of {}",
                assoc.id(),
                assoc.child()
            );
        }
        for assoc in graph.target_assocs(node).unwrap() {
            let back = graph.source_assocs(assoc.target()).unwrap();
            assert!(back.iter().any(|a| a.id() == assoc.id()));
        }
    }
}

/// At most one primary parent per node
pub fn assert_single_primary(graph: &NodeGraph, nodes: &[&NodeRef]) {
    for node in nodes {
        let primaries = graph
            .parent_assocs(node)
            .unwrap()
            .iter()
            .filter(|a| a.is_primary())
            .count();
        assert!(primaries <= 1, "{} has {} primary parents", node, primaries);
    }
}
