//! Per-document analysis-handle cache.
//!
//! One [`Document`] per open URI, always reflecting the most recent known
//! text. Handles are replaced wholesale on change (never mutated in place)
//! and removed on close. Construction may be expensive downstream -- the
//! engine keys parse-state reuse off `(uri, revision)` -- so callers force a
//! rebuild only when the text actually changed.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

/// Read-only view of the protocol layer's text store.
pub trait DocumentStore {
    fn text(&self, uri: &str) -> Option<&str>;
    fn version(&self, uri: &str) -> Option<i32>;
}

/// The document text the store had never heard of. Indicates a request for
/// a URI that was never opened (or already closed) -- a client bug, not ours.
#[derive(Debug, Clone, Error)]
#[error("no open document for {uri}")]
pub struct UnknownDocument {
    pub uri: String,
}

/// An open document's analysis state: text snapshot plus a line index.
///
/// `revision` increases monotonically across rebuilds of any document, so
/// `(uri, revision)` uniquely identifies a snapshot process-wide.
#[derive(Debug)]
pub struct Document {
    uri: String,
    revision: u64,
    text: String,
    /// Byte offset of the start of each line.
    line_starts: Vec<usize>,
}

impl Document {
    fn new(uri: String, revision: u64, text: String) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self {
            uri,
            revision,
            text,
            line_starts,
        }
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Content of the 0-based line `idx`, without the line terminator.
    #[must_use]
    pub fn line(&self, idx: usize) -> Option<&str> {
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.text.len(), |next| next - 1);
        let line = &self.text[start..end];
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Character length of line `idx`, the end column used by findings that
    /// span "to end of line". Lines past the end count as empty.
    #[must_use]
    pub fn line_len(&self, idx: usize) -> u32 {
        self.line(idx).map_or(0, |l| l.chars().count() as u32)
    }
}

/// Maps open-document URIs to reusable analysis handles.
#[derive(Debug, Default)]
pub struct DocumentCache {
    docs: HashMap<String, Arc<Document>>,
    next_revision: u64,
}

impl DocumentCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the handle for `uri`, building one from the store's current
    /// text if none is cached or `rebuild` is set.
    ///
    /// `rebuild` must be forced only by change notifications; read-only
    /// requests (hover, completion, goto) reuse the cached handle.
    pub fn get(
        &mut self,
        store: &dyn DocumentStore,
        uri: &str,
        rebuild: bool,
    ) -> Result<Arc<Document>, UnknownDocument> {
        if !rebuild
            && let Some(doc) = self.docs.get(uri)
        {
            return Ok(Arc::clone(doc));
        }
        let text = store.text(uri).ok_or_else(|| UnknownDocument {
            uri: uri.to_string(),
        })?;
        self.next_revision += 1;
        let doc = Arc::new(Document::new(
            uri.to_string(),
            self.next_revision,
            text.to_string(),
        ));
        self.docs.insert(uri.to_string(), Arc::clone(&doc));
        Ok(doc)
    }

    /// Drop the handle for a closed document. Absence is not an error.
    pub fn remove(&mut self, uri: &str) {
        self.docs.remove(uri);
    }

    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.docs.contains_key(uri)
    }
}
