//! `nodestore.toml` driving the graph and the index

use crate::common::*;
use nodestore::{EngineConfig, CONFIG_FILE_NAME};
use tempfile::TempDir;

#[test]
fn test_default_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    EngineConfig::write_default_if_missing(&path).unwrap();
    let config = EngineConfig::from_file(&path).unwrap();

    assert_eq!(config.primary_policy, PrimaryPolicy::Reject);
    assert_eq!(config.default_store().unwrap(), workspace());
}

#[test]
fn test_demote_policy_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "primary_policy = \"demote\"\ndefault_store = \"archive://SpacesStore\"\n\n[search]\nmax_results = 1\n",
    )
    .unwrap();

    let config = EngineConfig::from_file(&path).unwrap();
    let graph = NodeGraph::with_config(&config);
    assert_eq!(graph.policy(), PrimaryPolicy::Demote);

    let store = config.default_store().unwrap();
    let index = MemoryIndex::with_config(&config.search);
    index.index_node(&store.node("a"), "minutes");
    index.index_node(&store.node("b"), "minutes");
    assert_eq!(index.search(&store, "minutes", 10).length(), 1);
}

#[test]
fn test_invalid_store_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "default_store = \"not a store\"\n").unwrap();

    let err = EngineConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
