//! # Document Pool
//!
//! Holds documents awaiting inclusion in the next block.
//!
//! ## Invariants Enforced
//!
//! - Only documents whose author is on the allow-list are admitted (`stage()`)
//! - Submission order is preserved
//! - `revision` increases on every mutation, so a snapshot taken at revision
//!   `r` is known to equal the live pool while `revision == r`

use super::entities::{Document, StagedDocument, Timestamp};
use super::errors::{LedgerError, Result};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Immutable set of authorized author identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowList {
    authors: HashSet<String>,
}

impl AllowList {
    /// Builds an allow-list from author identifiers.
    pub fn new<I, S>(authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            authors: authors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, author: &str) -> bool {
        self.authors.contains(author)
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.authors.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Ordered pool of staged documents.
#[derive(Debug)]
pub struct DocumentPool {
    allow_list: AllowList,
    pending: Vec<StagedDocument>,
    revision: u64,
}

impl DocumentPool {
    /// Creates an empty pool gated by `allow_list`.
    pub fn new(allow_list: AllowList) -> Self {
        Self {
            allow_list,
            pending: Vec::new(),
            revision: 0,
        }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Builds a document stamped `now` and commits to its hash.
    ///
    /// No validation happens here; see [`DocumentPool::stage`].
    pub fn create_document(
        &self,
        author: impl Into<String>,
        content: impl Into<String>,
        now: Timestamp,
    ) -> Result<StagedDocument> {
        let doc = Document::new(author, content, now);
        Ok(StagedDocument::new(doc)?)
    }

    /// Returns true iff the record's author is on the allow-list.
    pub fn is_valid(&self, record: &StagedDocument) -> bool {
        self.allow_list.contains(record.author())
    }

    /// Admits a record into the pool.
    ///
    /// # Errors
    /// - `UnauthorizedAuthor` if the author is not on the allow-list; the
    ///   pool is left unchanged
    pub fn stage(&mut self, record: StagedDocument) -> Result<()> {
        if !self.is_valid(&record) {
            warn!(author = record.author(), "Rejected document from unregistered author");
            return Err(LedgerError::UnauthorizedAuthor {
                author: record.author().to_string(),
            });
        }

        debug!(
            author = record.author(),
            doc_hash = %record.doc_hash(),
            "Document staged"
        );
        self.pending.push(record);
        self.revision += 1;
        Ok(())
    }

    /// Documents awaiting inclusion, in submission order.
    pub fn pending(&self) -> &[StagedDocument] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Mutation counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Deep copy of the pending documents.
    pub fn snapshot(&self) -> Vec<StagedDocument> {
        self.pending.clone()
    }

    /// Empties the pool. Only called once a block has been appended.
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
        self.revision += 1;
    }
}
