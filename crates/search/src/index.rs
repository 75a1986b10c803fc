//! In-memory search engine
//!
//! `MemoryIndex` is both the index writer and the query engine behind
//! `ResultSet`. It writes every document with the `ID`, `STORE` and `TEXT`
//! fields, so anything it indexes resolves back to a node.
//!
//! # Concurrency
//!
//! Documents sit behind a `parking_lot::RwLock`; term postings live in a
//! `DashMap`. Queries take a snapshot of their hits, so a result set is not
//! affected by writes made after it was opened.
//!
//! # Sessions
//!
//! Each query opens a session that stays counted in `open_sessions()` until
//! its result set is closed or dropped.

use crate::engine::{Document, HitList, SearchSession, FIELD_ID, FIELD_STORE, FIELD_TEXT};
use crate::result_set::ResultSet;
use crate::scorer::{BM25LiteScorer, Scorer, ScorerContext};
use crate::tokenizer::{term_frequencies, tokenize_unique};
use dashmap::DashMap;
use nodestore_core::{NodeRef, StoreRef};
use nodestore_engine::SearchConfig;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// IndexedDoc
// ============================================================================

#[derive(Debug, Clone)]
struct IndexedDoc {
    document: Document,
    term_freqs: HashMap<String, u32>,
    doc_len: u32,
}

// ============================================================================
// MemoryIndex
// ============================================================================

/// In-memory text index and query engine
pub struct MemoryIndex {
    docs: RwLock<HashMap<NodeRef, IndexedDoc>>,
    /// Term -> nodes containing it
    postings: DashMap<String, HashSet<NodeRef>>,
    scorer: Box<dyn Scorer>,
    max_results: usize,
    open_sessions: Arc<AtomicUsize>,
    /// Incremented on every index update
    version: AtomicU64,
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIndex {
    /// Create an empty index with default limits
    pub fn new() -> Self {
        Self::with_config(&SearchConfig::default())
    }

    /// Create an empty index using the `[search]` config section
    pub fn with_config(config: &SearchConfig) -> Self {
        MemoryIndex {
            docs: RwLock::new(HashMap::new()),
            postings: DashMap::new(),
            scorer: Box::new(BM25LiteScorer::default()),
            max_results: config.max_results,
            open_sessions: Arc::new(AtomicUsize::new(0)),
            version: AtomicU64::new(0),
        }
    }

    /// Builder: replace the scorer
    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Number of indexed nodes across all stores
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// Whether nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Sessions opened by `search` and not yet closed
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::Acquire)
    }

    /// Update counter
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Stored document of a node
    pub fn document(&self, node: &NodeRef) -> Option<Document> {
        self.docs.read().get(node).map(|d| d.document.clone())
    }

    // ========================================================================
    // Index Updates
    // ========================================================================

    /// Index a node's text, replacing any previous document for it
    pub fn index_node(&self, node: &NodeRef, text: &str) {
        let document = Document::new()
            .with_field(FIELD_ID, node.id.clone())
            .with_field(FIELD_STORE, node.store.to_string())
            .with_field(FIELD_TEXT, text);
        let (term_freqs, doc_len) = term_frequencies(text);

        let mut docs = self.docs.write();
        if let Some(previous) = docs.remove(node) {
            self.drop_postings(node, &previous);
        }
        for term in term_freqs.keys() {
            self.postings
                .entry(term.clone())
                .or_default()
                .insert(node.clone());
        }
        docs.insert(
            node.clone(),
            IndexedDoc {
                document,
                term_freqs,
                doc_len,
            },
        );
        self.version.fetch_add(1, Ordering::Release);
        debug!(node = %node, tokens = doc_len, "Indexed node");
    }

    /// Remove a node's document; returns false if it was not indexed
    pub fn remove_node(&self, node: &NodeRef) -> bool {
        let mut docs = self.docs.write();
        let Some(previous) = docs.remove(node) else {
            return false;
        };
        self.drop_postings(node, &previous);
        self.version.fetch_add(1, Ordering::Release);
        debug!(node = %node, "Removed node from index");
        true
    }

    fn drop_postings(&self, node: &NodeRef, doc: &IndexedDoc) {
        for term in doc.term_freqs.keys() {
            if let Some(mut nodes) = self.postings.get_mut(term) {
                nodes.remove(node);
            }
            self.postings.remove_if(term, |_, nodes| nodes.is_empty());
        }
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Run a keyword query against one store
    ///
    /// Hits are ordered by score (highest first), then by node id, and capped
    /// at `min(limit, max_results)`. Documents that match no query term are
    /// not returned.
    pub fn search(&self, store: &StoreRef, query: &str, limit: usize) -> ResultSet {
        let terms = tokenize_unique(query);
        let docs = self.docs.read();

        let in_store: Vec<(&NodeRef, &IndexedDoc)> =
            docs.iter().filter(|(node, _)| node.store == *store).collect();

        let mut ctx = ScorerContext::new(in_store.len());
        if !in_store.is_empty() {
            let total_len: u64 = in_store.iter().map(|(_, d)| u64::from(d.doc_len)).sum();
            ctx = ctx.with_avg_doc_len(total_len as f32 / in_store.len() as f32);
        }
        for term in &terms {
            let df = in_store
                .iter()
                .filter(|(_, d)| d.term_freqs.contains_key(term))
                .count();
            ctx.doc_freqs.insert(term.clone(), df);
        }

        let mut candidates: HashSet<NodeRef> = HashSet::new();
        for term in &terms {
            if let Some(nodes) = self.postings.get(term) {
                candidates.extend(nodes.iter().filter(|n| n.store == *store).cloned());
            }
        }

        let mut scored: Vec<(&NodeRef, &IndexedDoc, f32)> = candidates
            .iter()
            .filter_map(|node| docs.get_key_value(node))
            .map(|(node, doc)| {
                let score = self
                    .scorer
                    .score(&doc.term_freqs, doc.doc_len, &terms, &ctx);
                (node, doc, score)
            })
            .filter(|(_, _, score)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.id.cmp(&b.0.id)));
        scored.truncate(limit.min(self.max_results));

        let hits = MemoryHits {
            hits: scored
                .into_iter()
                .map(|(_, doc, score)| (doc.document.clone(), score))
                .collect(),
        };
        drop(docs);

        self.open_sessions.fetch_add(1, Ordering::AcqRel);
        debug!(
            store = %store,
            query,
            scorer = self.scorer.name(),
            hits = hits.hits.len(),
            "Executed query"
        );
        ResultSet::new(
            store.clone(),
            hits,
            MemorySession {
                open_sessions: Arc::clone(&self.open_sessions),
                closed: false,
            },
        )
    }
}

// ============================================================================
// Engine trait implementations
// ============================================================================

/// Snapshot of one query's hits
#[derive(Debug)]
struct MemoryHits {
    hits: Vec<(Document, f32)>,
}

impl HitList for MemoryHits {
    fn len(&self) -> usize {
        self.hits.len()
    }

    fn doc(&self, n: usize) -> io::Result<Document> {
        self.hits
            .get(n)
            .map(|(doc, _)| doc.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no hit at {}", n)))
    }

    fn score(&self, n: usize) -> io::Result<f32> {
        self.hits
            .get(n)
            .map(|(_, score)| *score)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no hit at {}", n)))
    }
}

/// Session handle counted against its index
#[derive(Debug)]
struct MemorySession {
    open_sessions: Arc<AtomicUsize>,
    closed: bool,
}

impl SearchSession for MemorySession {
    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "search session already closed",
            ));
        }
        self.closed = true;
        self.open_sessions.fetch_sub(1, Ordering::AcqRel);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
