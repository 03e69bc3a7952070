//! Inbound (Driving) ports for the ledger.
//!
//! Primary API exposed to callers.

use crate::domain::{CandidateBlock, Digest, LedgerError, StagedDocument, StoredBlock};

/// Primary ledger API.
pub trait LedgerApi {
    /// Builds a timestamped, hashed document. Performs no validation.
    fn create_document(&self, author: &str, content: &str)
        -> Result<StagedDocument, LedgerError>;

    /// Admits a document into the pending pool if its author is authorized.
    ///
    /// # Errors
    /// - `UnauthorizedAuthor`: pool unchanged
    fn stage(&mut self, record: StagedDocument) -> Result<(), LedgerError>;

    /// Forms a candidate block from a snapshot of the pending pool.
    ///
    /// `parent_override` is only used for genesis.
    fn create_block(&self, parent_override: Option<Digest>)
        -> Result<CandidateBlock, LedgerError>;

    /// Validates and appends a candidate, clearing the pool on success.
    ///
    /// # Errors
    /// - `BlockCapacityExceeded`: candidate discarded, pool intact
    /// - `ChainAdvanced` / `PoolChanged`: candidate is stale
    fn add_block(&mut self, candidate: CandidateBlock) -> Result<StoredBlock, LedgerError>;

    /// Number of blocks, genesis included.
    fn chain_len(&self) -> usize;

    /// Number of documents awaiting inclusion.
    fn pending_count(&self) -> usize;
}
