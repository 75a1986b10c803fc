//! Association model tests through the facade

use crate::common::*;
use nodestore::ChildAssocRef;

#[test]
fn test_tree_is_symmetric() {
    let tree = Tree::build(PrimaryPolicy::Reject);
    let nodes = [&tree.home, &tree.projects, &tree.archive, &tree.plan];
    assert_symmetric(&tree.graph, &nodes);
    assert_single_primary(&tree.graph, &nodes);
    assert_eq!(tree.graph.assoc_count(), 3);
}

#[test]
fn test_path_walks_primary_chain() {
    let tree = Tree::build(PrimaryPolicy::Reject);
    let path = tree.graph.path(&tree.plan).unwrap();

    let parents: Vec<&NodeRef> = path.iter().map(|a| a.parent()).collect();
    assert_eq!(parents, vec![&tree.home, &tree.projects]);
    assert_eq!(path.last().unwrap().child(), &tree.plan);
    assert!(tree.graph.path(&tree.home).unwrap().is_empty());
}

#[test]
fn test_secondary_parent_visible_from_both_sides() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    let link = tree
        .graph
        .build_child_assoc(&tree.archive, &tree.plan, contains(), false)
        .unwrap();

    assert_eq!(tree.graph.children(&tree.archive).unwrap(), vec![&tree.plan]);
    let parents = tree.graph.parent_assocs(&tree.plan).unwrap();
    assert_eq!(parents.len(), 2);
    assert!(parents[0].is_primary());
    assert_eq!(parents[1].id(), link.id());
}

#[test]
fn test_second_primary_rejected_under_default_policy() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    let before = tree.graph.version();

    let err = tree
        .graph
        .build_child_assoc(&tree.archive, &tree.plan, contains(), true)
        .unwrap_err();

    assert!(matches!(err, Error::DuplicatePrimary { .. }));
    assert_eq!(tree.graph.version(), before);
    assert_eq!(tree.graph.parent_assocs(&tree.plan).unwrap().len(), 1);
}

#[test]
fn test_second_primary_demotes_under_demote_policy() {
    let mut tree = Tree::build(PrimaryPolicy::Demote);
    tree.graph
        .build_child_assoc(&tree.archive, &tree.plan, contains(), true)
        .unwrap();

    let primary = tree.graph.primary_parent(&tree.plan).unwrap().unwrap();
    assert_eq!(primary.parent(), &tree.archive);
    assert_single_primary(&tree.graph, &[&tree.plan]);
    assert!(tree.graph.children(&tree.projects).unwrap().contains(&&tree.plan));
}

#[test]
fn test_cycle_rejected() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    let err = tree
        .graph
        .build_child_assoc(&tree.projects, &tree.home, contains(), false)
        .unwrap_err();
    assert!(matches!(err, Error::CyclicAssociation { .. }));
}

#[test]
fn test_remove_twice_is_noop() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    let id = tree.graph.primary_parent(&tree.plan).unwrap().unwrap().id();

    assert!(tree.graph.remove_child_assoc(id));
    let version = tree.graph.version();
    let count = tree.graph.assoc_count();

    assert!(!tree.graph.remove_child_assoc(id));
    assert_eq!(tree.graph.version(), version);
    assert_eq!(tree.graph.assoc_count(), count);
    assert!(tree.graph.contains(&tree.plan));
}

#[test]
fn test_external_reference_round_trip() {
    let tree = Tree::build(PrimaryPolicy::Reject);
    let assoc = tree.graph.primary_parent(&tree.plan).unwrap().unwrap();

    let external: ChildAssocRef = assoc.assoc_ref();
    assert_eq!(tree.graph.child_assoc_id(&external), Some(assoc.id()));
}

#[test]
fn test_peer_links_between_documents() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    let store = workspace();
    let summary = tree.graph.create_node(&store, NodeKind::Content);
    tree.graph
        .build_child_assoc(&tree.projects, &summary, contains(), true)
        .unwrap();

    let peer = tree
        .graph
        .build_peer_assoc(&summary, &tree.plan, references())
        .unwrap();
    assert_eq!(tree.graph.source_assocs(&tree.plan).unwrap()[0].id(), peer.id());

    let dup = tree.graph.build_peer_assoc(&summary, &tree.plan, references());
    assert!(matches!(dup, Err(Error::AssociationExists { .. })));

    let onto_folder = tree.graph.build_peer_assoc(&summary, &tree.archive, references());
    assert!(matches!(onto_folder, Err(Error::InvalidArgument(_))));

    assert_symmetric(&tree.graph, &[&summary, &tree.plan]);
}

#[test]
fn test_delete_folder_cascades_primary_children() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    tree.graph
        .build_child_assoc(&tree.archive, &tree.plan, contains(), false)
        .unwrap();

    let summary = tree.graph.delete_node(&tree.projects).unwrap();

    assert_eq!(summary.nodes_deleted.len(), 2);
    assert!(!tree.graph.contains(&tree.plan));
    assert!(tree.graph.children(&tree.archive).unwrap().is_empty());
    assert_eq!(tree.graph.children(&tree.home).unwrap(), vec![&tree.archive]);
}

#[test]
fn test_node_reference_text_form() {
    let node = workspace().node("abc123");
    assert_eq!(node.to_string(), "workspace://SpacesStore/abc123");
    assert_eq!(NodeRef::parse("workspace://SpacesStore/abc123").unwrap(), node);
}

#[test]
fn test_registered_id_with_slash_round_trips() {
    let mut graph = NodeGraph::default();
    let node = workspace().node("a/b");
    graph.add_node(node.clone(), NodeKind::Content).unwrap();

    let parsed = NodeRef::parse(&node.to_string()).unwrap();
    assert_eq!(parsed, node);
    assert!(graph.contains(&parsed));
}
