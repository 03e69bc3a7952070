//! Ledger error types.
//!
//! Every variant is local to the call that produced it; none leave the ledger
//! in a partially updated state.

use super::entities::Digest;
use shared_crypto::HashingError;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors returned by pool and chain operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Document author is not on the allow-list. Pool unchanged.
    #[error("doc invalid, unregistered author: {author}")]
    UnauthorizedAuthor {
        /// Rejected author identifier
        author: String,
    },

    /// Candidate carries `blocksize` or more documents. Pool left intact.
    #[error("invalid block: {docs} documents, blocksize {blocksize}")]
    BlockCapacityExceeded {
        /// Documents in the candidate
        docs: usize,
        /// Configured threshold
        blocksize: usize,
    },

    /// A block was appended after the candidate was formed.
    #[error("stale candidate: formed for index {candidate_index}, chain expects {next_index}")]
    ChainAdvanced {
        /// Index the candidate was formed for
        candidate_index: u64,
        /// Index the chain expects next
        next_index: u64,
    },

    /// The pending pool changed after the candidate was formed.
    #[error("stale candidate: pool revision {candidate_revision}, current {pool_revision}")]
    PoolChanged {
        /// Pool revision captured in the candidate
        candidate_revision: u64,
        /// Current pool revision
        pool_revision: u64,
    },

    /// Candidate does not reference the current chain tip.
    #[error("parent mismatch: expected {expected}, got {found}")]
    ParentMismatch {
        /// Hash the candidate must reference
        expected: Digest,
        /// Hash the candidate references
        found: Digest,
    },

    /// No tip to link to and no parent hash supplied.
    #[error("chain is empty and no parent hash was supplied")]
    MissingParent,

    /// A record could not be canonically encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] HashingError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LedgerError {
    /// Check if the caller can retry after changing pool or chain state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnauthorizedAuthor { .. }
                | Self::BlockCapacityExceeded { .. }
                | Self::ChainAdvanced { .. }
                | Self::PoolChanged { .. }
        )
    }

    /// Check if the candidate was formed against outdated state.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::ChainAdvanced { .. } | Self::PoolChanged { .. })
    }
}

/// Violations found while re-checking a stored chain.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// The chain has no genesis block.
    #[error("chain has no genesis block")]
    Empty,

    /// Genesis block does not carry the sentinel parent hash.
    #[error("genesis parent hash is {found}, expected sentinel")]
    BadGenesisParent {
        /// Parent hash found on the genesis block
        found: Digest,
    },

    /// Block index does not match its position.
    #[error("block at position {position} has index {index}")]
    IndexMismatch {
        /// 0-based position in the chain
        position: usize,
        /// Index recorded in the block
        index: u64,
    },

    /// Parent hash does not match the preceding block's hash.
    #[error("block {index} parent hash {found} does not match {expected}")]
    BrokenLink {
        /// Index of the offending block
        index: u64,
        /// Hash of the preceding block
        expected: Digest,
        /// Parent hash recorded in the block
        found: Digest,
    },

    /// Stored block hash does not match the block contents.
    #[error("block {index} hash mismatch: stored {stored}, computed {computed}")]
    BlockHashMismatch {
        /// Index of the offending block
        index: u64,
        /// Hash stored alongside the block
        stored: Digest,
        /// Hash recomputed from the block
        computed: Digest,
    },

    /// Stored document hash does not match the document contents.
    #[error("block {index} doc {position} hash mismatch: stored {stored}, computed {computed}")]
    DocHashMismatch {
        /// Index of the containing block
        index: u64,
        /// 0-based position within the block
        position: usize,
        /// Hash stored alongside the document
        stored: Digest,
        /// Hash recomputed from the document
        computed: Digest,
    },

    /// A record could not be canonically encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] HashingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_message() {
        let err = LedgerError::UnauthorizedAuthor {
            author: "bob".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("unregistered author"));
        assert!(msg.contains("bob"));
    }

    #[test]
    fn test_capacity_message() {
        let err = LedgerError::BlockCapacityExceeded {
            docs: 5,
            blocksize: 5,
        };
        assert!(err.to_string().starts_with("invalid block"));
        assert!(err.is_recoverable());
        assert!(!err.is_stale());
    }

    #[test]
    fn test_stale_classification() {
        let err = LedgerError::PoolChanged {
            candidate_revision: 1,
            pool_revision: 2,
        };
        assert!(err.is_stale());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_serialization_not_recoverable() {
        let err = LedgerError::from(HashingError::Serialization("bad".into()));
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("bad"));
    }
}
