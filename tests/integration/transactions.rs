//! Units of work over the association graph

use crate::common::*;
use nodestore::{TransactionStatus, UnitOfWork};

#[test]
fn test_closure_commits_all_operations() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    let projects = tree.projects.clone();
    let plan = tree.plan.clone();

    let result = tree
        .graph
        .transaction(|uow| {
            let draft = uow.create_node(&workspace(), NodeKind::Content)?;
            uow.link_child(&projects, &draft, contains(), true)?;
            uow.link_peer(&draft, &plan, references())
        })
        .unwrap();

    assert_eq!(result.nodes_created.len(), 1);
    assert_eq!(result.child_assocs.len(), 1);
    assert_eq!(result.peer_assocs.len(), 1);
    assert_eq!(result.commit_version, tree.graph.version());
    assert_eq!(tree.graph.children(&tree.projects).unwrap().len(), 2);
}

#[test]
fn test_failed_operation_leaves_graph_untouched() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    let before_version = tree.graph.version();
    let before_nodes = tree.graph.node_count();

    let mut uow = UnitOfWork::begin(&mut tree.graph);
    let draft = uow.create_node(&workspace(), NodeKind::Content).unwrap();
    uow.link_child(&tree.projects, &draft, contains(), true).unwrap();
    // plan already has a primary parent
    uow.link_child(&tree.archive, &tree.plan, contains(), true).unwrap();

    let err = uow.commit(&mut tree.graph).unwrap_err();
    assert!(matches!(err, Error::DuplicatePrimary { .. }));
    assert!(matches!(uow.status, TransactionStatus::Aborted { .. }));

    assert_eq!(tree.graph.version(), before_version);
    assert_eq!(tree.graph.node_count(), before_nodes);
    assert!(!tree.graph.contains(&draft));
}

#[test]
fn test_concurrent_change_conflicts() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);

    let mut uow = UnitOfWork::begin(&mut tree.graph);
    uow.link_child(&tree.archive, &tree.plan, contains(), false).unwrap();

    tree.graph.create_node(&workspace(), NodeKind::Content);

    let err = uow.commit(&mut tree.graph).unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
    assert!(tree.graph.children(&tree.archive).unwrap().is_empty());
}

#[test]
fn test_closure_error_discards_buffer() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    let before = tree.graph.node_count();

    let result = tree.graph.transaction(|uow| {
        uow.create_node(&workspace(), NodeKind::Content)?;
        Err(Error::InvalidArgument("caller gave up".to_string()))
    });

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_eq!(tree.graph.node_count(), before);
}

#[test]
fn test_delete_in_unit_of_work_cascades() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    let projects = tree.projects.clone();

    let result = tree.graph.transaction(|uow| uow.delete_node(&projects)).unwrap();

    assert_eq!(result.nodes_deleted, 2);
    assert!(!tree.graph.contains(&tree.plan));
}

#[test]
fn test_finished_unit_of_work_rejects_more_work() {
    let mut tree = Tree::build(PrimaryPolicy::Reject);
    let mut uow = UnitOfWork::begin(&mut tree.graph);
    uow.abort("not needed").unwrap();

    let err = uow.delete_node(&tree.plan).unwrap_err();
    assert!(matches!(err, Error::TransactionNotActive { .. }));
    assert!(uow.commit(&mut tree.graph).is_err());
}
