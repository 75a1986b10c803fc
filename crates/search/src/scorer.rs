//! Relevance scoring for the in-memory index
//!
//! This module provides:
//! - ScorerContext: per-store corpus statistics for one query
//! - Scorer trait for pluggable scoring
//! - BM25LiteScorer default implementation

use std::collections::HashMap;

// ============================================================================
// ScorerContext
// ============================================================================

/// Corpus statistics a scorer needs, computed over the searched store
#[derive(Debug, Clone, Default)]
pub struct ScorerContext {
    /// Documents in the searched store
    pub total_docs: usize,
    /// Documents containing each query term
    pub doc_freqs: HashMap<String, usize>,
    /// Average document length in tokens
    pub avg_doc_len: f32,
}

impl ScorerContext {
    /// Create a context for a corpus of `total_docs` documents
    pub fn new(total_docs: usize) -> Self {
        ScorerContext {
            total_docs,
            ..Default::default()
        }
    }

    /// Inverse document frequency with smoothing:
    /// IDF(t) = ln((N - df + 0.5) / (df + 0.5) + 1)
    pub fn idf(&self, term: &str) -> f32 {
        let df = self.doc_freqs.get(term).copied().unwrap_or(0) as f32;
        let n = self.total_docs as f32;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// Builder: set average document length
    pub fn with_avg_doc_len(mut self, len: f32) -> Self {
        self.avg_doc_len = len;
        self
    }
}

// ============================================================================
// Scorer
// ============================================================================

/// Pluggable scoring interface
///
/// Higher scores are more relevant. A score of zero means no match.
pub trait Scorer: Send + Sync {
    /// Score one document given its term frequencies and length
    fn score(
        &self,
        term_freqs: &HashMap<String, u32>,
        doc_len: u32,
        query_terms: &[String],
        ctx: &ScorerContext,
    ) -> f32;

    /// Name for logging
    fn name(&self) -> &str;
}

/// BM25-inspired scorer
///
/// For each query term t:
/// score += IDF(t) * (tf * (k1 + 1)) / (tf + k1 * (1 - b + b * dl/avgdl))
#[derive(Debug, Clone)]
pub struct BM25LiteScorer {
    /// Term frequency saturation
    pub k1: f32,
    /// Length normalization strength
    pub b: f32,
}

impl Default for BM25LiteScorer {
    fn default() -> Self {
        BM25LiteScorer { k1: 1.2, b: 0.75 }
    }
}

impl Scorer for BM25LiteScorer {
    fn score(
        &self,
        term_freqs: &HashMap<String, u32>,
        doc_len: u32,
        query_terms: &[String],
        ctx: &ScorerContext,
    ) -> f32 {
        let avg = if ctx.avg_doc_len > 0.0 {
            ctx.avg_doc_len
        } else {
            1.0
        };
        let dl = doc_len as f32;

        query_terms
            .iter()
            .filter_map(|term| term_freqs.get(term).map(|tf| (term, *tf as f32)))
            .map(|(term, tf)| {
                let norm = tf + self.k1 * (1.0 - self.b + self.b * dl / avg);
                ctx.idf(term) * (tf * (self.k1 + 1.0)) / norm
            })
            .sum()
    }

    fn name(&self) -> &str {
        "bm25-lite"
    }
}
