//! # Shared Ledger Handle
//!
//! Lets several threads write to one ledger. Each operation takes the lock
//! once, so `seal_block` runs snapshot → validate → append → clear as a single
//! critical section and no staged document can slip in between the snapshot
//! and the clear.

use crate::domain::errors::Result;
use crate::domain::{IntegrityError, StagedDocument, StoredBlock};
use crate::ports::{SystemTimeSource, TimeSource};
use crate::service::Ledger;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, thread-safe handle to a [`Ledger`].
#[derive(Debug)]
pub struct SharedLedger<T: TimeSource = SystemTimeSource> {
    inner: Arc<Mutex<Ledger<T>>>,
}

impl<T: TimeSource> Clone for SharedLedger<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: TimeSource> SharedLedger<T> {
    pub fn new(ledger: Ledger<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Creates and stages a document under one lock.
    pub fn submit(
        &self,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<StagedDocument> {
        let mut ledger = self.inner.lock();
        let record = ledger.create_document(author, content)?;
        ledger.stage(record.clone())?;
        Ok(record)
    }

    /// Stages an already created record.
    pub fn stage(&self, record: StagedDocument) -> Result<()> {
        self.inner.lock().stage(record)
    }

    /// Forms and appends a block from the current pool atomically.
    pub fn seal_block(&self) -> Result<StoredBlock> {
        self.inner.lock().seal_block()
    }

    pub fn chain_len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending_count()
    }

    pub fn verify_chain(&self) -> std::result::Result<(), IntegrityError> {
        self.inner.lock().verify_chain()
    }

    /// Runs `f` with read access to the ledger while holding the lock.
    pub fn read<R>(&self, f: impl FnOnce(&Ledger<T>) -> R) -> R {
        let ledger = self.inner.lock();
        f(&*ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::domain::LedgerError;
    use crate::ports::ManualTimeSource;

    fn shared() -> SharedLedger<ManualTimeSource> {
        let config = LedgerConfig::default().with_authors(["alice"]);
        SharedLedger::new(Ledger::new(config, ManualTimeSource::new(0)).unwrap())
    }

    #[test]
    fn test_submit_and_seal() {
        let ledger = shared();
        let record = ledger.submit("alice", "a").unwrap();
        assert_eq!(ledger.pending_count(), 1);

        let stored = ledger.seal_block().unwrap();
        assert_eq!(stored.block().docs(), &[record]);
        assert_eq!(ledger.chain_len(), 2);
        assert_eq!(ledger.pending_count(), 0);
    }

    #[test]
    fn test_submit_unauthorized() {
        let ledger = shared();
        let result = ledger.submit("bob", "a");
        assert!(matches!(result, Err(LedgerError::UnauthorizedAuthor { .. })));
        assert_eq!(ledger.pending_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let ledger = shared();
        let other = ledger.clone();
        ledger.submit("alice", "a").unwrap();
        assert_eq!(other.pending_count(), 1);
        assert_eq!(other.read(|l| l.name().to_string()), "blockchain");
    }
}
