//! Index, query and result set lifecycle over graph nodes

use crate::common::*;

fn indexed() -> (Tree, MemoryIndex) {
    let tree = Tree::build(PrimaryPolicy::Reject);
    let index = MemoryIndex::new();
    index.index_node(&tree.plan, "project plan for the quarterly review");
    index.index_node(&tree.projects, "projects folder");
    index.index_node(&tree.archive, "archived quarterly reports");
    (tree, index)
}

#[test]
fn test_hits_resolve_to_graph_nodes() {
    let (tree, index) = indexed();
    let mut rs = index.search(&workspace(), "quarterly", 10);

    assert_eq!(rs.length(), 2);
    for node in rs.node_refs().unwrap() {
        assert!(tree.graph.contains(&node));
    }
    rs.close().unwrap();
    assert_eq!(index.open_sessions(), 0);
}

#[test]
fn test_iterator_length_matches_and_restarts() {
    let (_tree, index) = indexed();
    let rs = index.search(&workspace(), "quarterly project", 10);

    let first: Vec<NodeRef> = rs.iter().map(|r| r.unwrap().node_ref).collect();
    let second: Vec<NodeRef> = rs.iter().map(|r| r.unwrap().node_ref).collect();

    assert_eq!(first.len(), rs.length());
    assert_eq!(rs.iter().len(), rs.length());
    assert_eq!(first, second);
}

#[test]
fn test_result_path_through_graph() {
    let (tree, index) = indexed();
    let rs = index.search(&workspace(), "plan", 10);
    let hit = rs.get_node_ref(0).unwrap();

    let path = tree.graph.path(&hit).unwrap();
    assert_eq!(path[0].parent(), &tree.home);
}

#[test]
fn test_property_paths_unsupported_through_facade() {
    let (_tree, index) = indexed();
    let rs = index.search(&workspace(), "plan", 10);
    let err = rs.get_property_paths().unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));
}

#[test]
fn test_double_close_and_drop() {
    let (_tree, index) = indexed();
    let mut closed = index.search(&workspace(), "plan", 10);
    let dropped = index.search(&workspace(), "plan", 10);
    assert_eq!(index.open_sessions(), 2);

    closed.close().unwrap();
    closed.close().unwrap();
    assert!(matches!(closed.get_score(0), Err(Error::ResultSetClosed)));

    drop(dropped);
    assert_eq!(index.open_sessions(), 0);
}

#[test]
fn test_deleted_nodes_removed_from_index() {
    let (mut tree, index) = indexed();
    let summary = tree.graph.delete_node(&tree.projects).unwrap();
    for node in &summary.nodes_deleted {
        index.remove_node(node);
    }

    assert!(index.search(&workspace(), "plan", 10).is_empty());
    assert_eq!(index.len(), 1);
}

#[test]
fn test_hit_with_slash_in_id_round_trips() {
    let index = MemoryIndex::new();
    let node = workspace().node("reports/q3");
    index.index_node(&node, "quarterly figures");

    let rs = index.search(&workspace(), "figures", 10);
    let hit = rs.get_node_ref(0).unwrap();
    assert_eq!(hit, node);
    assert_eq!(NodeRef::parse(&hit.to_string()).unwrap(), node);
}
