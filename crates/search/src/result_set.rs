//! Repository-facing result set over an engine hit list
//!
//! A `ResultSet` binds one query's hits to the store they were searched in
//! and holds the engine session open until it is closed or dropped.
//!
//! # Error Translation
//!
//! Engine I/O faults never escape as raw `io::Error`; each is wrapped in
//! `Error::Search` with the failing operation name and the original fault as
//! its source. A fault on one index does not affect the others.
//!
//! # Lifecycle
//!
//! - `close()` releases the session exactly once; a second call is a no-op.
//! - After close, `length()` still reports the hit count but every accessor
//!   fails with `ResultSetClosed`.
//! - Dropping an open result set closes it; a close fault is logged.

use crate::engine::{Document, HitList, SearchSession, FIELD_ID};
use nodestore_core::{Error, NodeRef, Result, StoreRef};
use std::fmt;
use tracing::{debug, warn};

/// One resolved hit
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSetRow {
    /// Zero-based position in the result set
    pub index: usize,
    /// Node the hit resolves to
    pub node_ref: NodeRef,
    /// Engine relevance score
    pub score: f32,
}

/// Fixed-length, zero-indexed sequence of query hits
pub struct ResultSet {
    store: StoreRef,
    len: usize,
    hits: Box<dyn HitList + Send>,
    session: Option<Box<dyn SearchSession + Send>>,
}

impl ResultSet {
    /// Wrap an engine hit list and the session it came from
    ///
    /// The hit count is captured here and never re-read.
    pub fn new<H, S>(store: StoreRef, hits: H, session: S) -> Self
    where
        H: HitList + Send + 'static,
        S: SearchSession + Send + 'static,
    {
        let len = hits.len();
        ResultSet {
            store,
            len,
            hits: Box::new(hits),
            session: Some(Box::new(session)),
        }
    }

    /// Number of hits
    pub fn length(&self) -> usize {
        self.len
    }

    /// Whether the query matched nothing
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store every hit is resolved against
    pub fn store_ref(&self) -> &StoreRef {
        &self.store
    }

    /// Whether `close()` has run
    pub fn is_closed(&self) -> bool {
        self.session.is_none()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ResultSetClosed);
        }
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Hit access
    // ========================================================================

    /// Node reference of the n-th hit
    ///
    /// Reads the `ID` field and joins it with the bound store reference.
    pub fn get_node_ref(&self, n: usize) -> Result<NodeRef> {
        self.check_index(n)?;
        let doc = self
            .hits
            .doc(n)
            .map_err(|e| Error::search("get_node_ref", e))?;
        let id = doc.get(FIELD_ID).ok_or(Error::MissingField {
            index: n,
            field: FIELD_ID,
        })?;
        Ok(self.store.node(id))
    }

    /// Relevance score of the n-th hit
    pub fn get_score(&self, n: usize) -> Result<f32> {
        self.check_index(n)?;
        self.hits.score(n).map_err(|e| Error::search("get_score", e))
    }

    /// Raw engine document of the n-th hit
    pub fn get_document(&self, n: usize) -> Result<Document> {
        self.check_index(n)?;
        self.hits.doc(n).map_err(|e| Error::search("get_document", e))
    }

    /// Property paths matched by the query
    ///
    /// Not provided by this adapter; always fails with `Unsupported` so an
    /// empty list is never mistaken for "no paths matched".
    pub fn get_property_paths(&self) -> Result<Vec<String>> {
        Err(Error::Unsupported("property paths are not resolved by this result set"))
    }

    /// Resolve every hit to its node reference, stopping at the first error
    pub fn node_refs(&self) -> Result<Vec<NodeRef>> {
        self.iter().map(|row| row.map(|r| r.node_ref)).collect()
    }

    /// Fresh cursor from the first hit
    pub fn iter(&self) -> ResultSetIter<'_> {
        ResultSetIter {
            result_set: self,
            next: 0,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Release the engine session
    ///
    /// The session is released even when the engine reports a fault; the
    /// fault is returned wrapped in `Error::Search`. Closing again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut session) = self.session.take() else {
            debug!(store = %self.store, "Result set already closed");
            return Ok(());
        };
        session.close().map_err(|e| Error::search("close", e))?;
        debug!(store = %self.store, hits = self.len, "Closed result set");
        Ok(())
    }
}

impl Drop for ResultSet {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            debug!(store = %self.store, "Closing result set on drop");
            if let Err(e) = session.close() {
                warn!(store = %self.store, error = %e, "Failed to close search session on drop");
            }
        }
    }
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("store", &self.store)
            .field("len", &self.len)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = Result<ResultSetRow>;
    type IntoIter = ResultSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// ResultSetIter
// ============================================================================

/// Forward cursor over a result set
///
/// Borrows the result set, so it cannot outlive the session.
pub struct ResultSetIter<'a> {
    result_set: &'a ResultSet,
    next: usize,
}

impl Iterator for ResultSetIter<'_> {
    type Item = Result<ResultSetRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.result_set.length() {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let row = self.result_set.get_node_ref(index).and_then(|node_ref| {
            let score = self.result_set.get_score(index)?;
            Ok(ResultSetRow {
                index,
                node_ref,
                score,
            })
        });
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.result_set.length().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ResultSetIter<'_> {}
