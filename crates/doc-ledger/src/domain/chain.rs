//! # Chain Builder - Block Formation and Append
//!
//! Forms candidate blocks from a frozen snapshot of the document pool,
//! checks the acceptance rules, and appends hashed blocks to the chain.
//!
//! ```text
//! create_block ──→ [CandidateBlock] ──add_block──→ [StoredBlock] + pool cleared
//!                         │
//!                         └── rejected ──→ discarded, chain and pool unchanged
//! ```
//!
//! ## Acceptance Rules (checked in order)
//!
//! 1. Candidate index equals the chain's next index (no block appended since)
//! 2. Candidate parent equals the tip hash, or the sentinel for genesis
//! 3. Pool revision unchanged since the snapshot, so the docs being appended
//!    are exactly the docs currently pending
//! 4. Document count strictly below `blocksize`
//!
//! Rule 3 makes the candidate's document count equal to the live pool size at
//! validation time, so rule 4 gates on both at once.

use super::entities::{Block, Digest, StagedDocument, StoredBlock, Timestamp};
use super::errors::{IntegrityError, LedgerError, Result};
use super::pool::DocumentPool;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default document threshold per block.
pub const DEFAULT_BLOCKSIZE: usize = 5;

/// Parent hash carried by the genesis block.
pub const GENESIS_PARENT_HASH: Digest = Digest::ZERO;

/// An unhashed block formed from a pool snapshot.
///
/// Only [`ChainBuilder::create_block`] produces candidates; the block index and
/// the captured pool revision let `add_block` detect that either moved on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateBlock {
    block: Block,
    pool_revision: u64,
}

impl CandidateBlock {
    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn index(&self) -> u64 {
        self.block.index()
    }

    pub fn docs(&self) -> &[StagedDocument] {
        self.block.docs()
    }

    /// Pool revision the snapshot was taken at.
    pub fn pool_revision(&self) -> u64 {
        self.pool_revision
    }

    pub fn into_block(self) -> Block {
        self.block
    }
}

/// Append-only sequence of stored blocks.
///
/// Serializes as a plain JSON array. A chain built from outside records with
/// `From<Vec<StoredBlock>>` is unchecked until [`Chain::verify`] passes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chain {
    blocks: Vec<StoredBlock>,
}

impl From<Vec<StoredBlock>> for Chain {
    fn from(blocks: Vec<StoredBlock>) -> Self {
        Self { blocks }
    }
}

impl Chain {
    /// Creates an empty (pre-genesis) chain.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index the next appended block must carry.
    pub fn next_index(&self) -> u64 {
        self.blocks.len() as u64 + 1
    }

    /// Most recently appended block.
    pub fn tip(&self) -> Option<&StoredBlock> {
        self.blocks.last()
    }

    /// Block at 1-based `index`.
    pub fn get(&self, index: u64) -> Option<&StoredBlock> {
        let position = index.checked_sub(1)?;
        self.blocks.get(usize::try_from(position).ok()?)
    }

    pub fn blocks(&self) -> &[StoredBlock] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredBlock> {
        self.blocks.iter()
    }

    /// Re-derives every hash and checks index and linkage invariants.
    pub fn verify(&self) -> std::result::Result<(), IntegrityError> {
        let genesis = self.blocks.first().ok_or(IntegrityError::Empty)?;
        if *genesis.block().parent_block_hash() != GENESIS_PARENT_HASH {
            return Err(IntegrityError::BadGenesisParent {
                found: *genesis.block().parent_block_hash(),
            });
        }

        for (position, stored) in self.blocks.iter().enumerate() {
            let block = stored.block();
            if block.index() != position as u64 + 1 {
                return Err(IntegrityError::IndexMismatch {
                    position,
                    index: block.index(),
                });
            }

            if position > 0 {
                let expected = *self.blocks[position - 1].block_hash();
                if *block.parent_block_hash() != expected {
                    return Err(IntegrityError::BrokenLink {
                        index: block.index(),
                        expected,
                        found: *block.parent_block_hash(),
                    });
                }
            }

            for (doc_position, record) in block.docs().iter().enumerate() {
                let computed = StagedDocument::new(record.doc().clone())?;
                if computed.doc_hash() != record.doc_hash() {
                    return Err(IntegrityError::DocHashMismatch {
                        index: block.index(),
                        position: doc_position,
                        stored: *record.doc_hash(),
                        computed: *computed.doc_hash(),
                    });
                }
            }

            let computed = block.hash()?;
            if computed != *stored.block_hash() {
                return Err(IntegrityError::BlockHashMismatch {
                    index: block.index(),
                    stored: *stored.block_hash(),
                    computed,
                });
            }
        }

        Ok(())
    }

    fn push(&mut self, stored: StoredBlock) {
        self.blocks.push(stored);
    }
}

/// Forms, validates and appends blocks.
#[derive(Debug)]
pub struct ChainBuilder {
    blocksize: usize,
    chain: Chain,
}

impl ChainBuilder {
    /// Creates a builder over an empty chain.
    pub fn new(blocksize: usize) -> Self {
        Self {
            blocksize,
            chain: Chain::new(),
        }
    }

    pub fn blocksize(&self) -> usize {
        self.blocksize
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Forms a candidate from a frozen copy of the pool.
    ///
    /// `parent_override` is only meant for genesis; otherwise the tip hash is
    /// used. Mutates neither pool nor chain.
    ///
    /// # Errors
    /// - `MissingParent` if the chain is empty and no override was supplied
    pub fn create_block(
        &self,
        pool: &DocumentPool,
        parent_override: Option<Digest>,
        now: Timestamp,
    ) -> Result<CandidateBlock> {
        let parent = match parent_override {
            Some(hash) => hash,
            None => *self
                .chain
                .tip()
                .ok_or(LedgerError::MissingParent)?
                .block_hash(),
        };

        Ok(CandidateBlock {
            block: Block::new(self.chain.next_index(), parent, now, pool.snapshot()),
            pool_revision: pool.revision(),
        })
    }

    /// Checks the acceptance rules without mutating anything.
    pub fn validate_block(&self, pool: &DocumentPool, candidate: &CandidateBlock) -> Result<()> {
        let next_index = self.chain.next_index();
        if candidate.index() != next_index {
            return Err(LedgerError::ChainAdvanced {
                candidate_index: candidate.index(),
                next_index,
            });
        }

        let expected_parent = self
            .chain
            .tip()
            .map(|tip| *tip.block_hash())
            .unwrap_or(GENESIS_PARENT_HASH);
        let found = *candidate.block().parent_block_hash();
        if found != expected_parent {
            return Err(LedgerError::ParentMismatch {
                expected: expected_parent,
                found,
            });
        }

        if candidate.pool_revision != pool.revision() {
            return Err(LedgerError::PoolChanged {
                candidate_revision: candidate.pool_revision,
                pool_revision: pool.revision(),
            });
        }

        let docs = candidate.docs().len();
        if docs >= self.blocksize {
            return Err(LedgerError::BlockCapacityExceeded {
                docs,
                blocksize: self.blocksize,
            });
        }

        Ok(())
    }

    /// Returns true iff the candidate would be accepted.
    pub fn is_valid_block(&self, pool: &DocumentPool, candidate: &CandidateBlock) -> bool {
        self.validate_block(pool, candidate).is_ok()
    }

    /// Hashes and appends the candidate, then clears the pool.
    ///
    /// # Errors
    /// Any acceptance-rule violation from [`ChainBuilder::validate_block`], or
    /// `Serialization` if the block cannot be hashed. On error the candidate is
    /// discarded and chain and pool are unchanged.
    pub fn add_block(
        &mut self,
        pool: &mut DocumentPool,
        candidate: CandidateBlock,
    ) -> Result<StoredBlock> {
        if let Err(err) = self.validate_block(pool, &candidate) {
            warn!(
                index = candidate.index(),
                docs = candidate.docs().len(),
                pending = pool.pending_count(),
                error = %err,
                "Block rejected"
            );
            return Err(err);
        }

        let stored = StoredBlock::seal(candidate.into_block())?;
        info!(
            index = stored.index(),
            block_hash = %stored.block_hash(),
            docs = stored.block().docs().len(),
            "Block appended"
        );
        self.chain.push(stored.clone());
        pool.clear();
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pool::AllowList;

    fn setup() -> (ChainBuilder, DocumentPool) {
        let mut builder = ChainBuilder::new(DEFAULT_BLOCKSIZE);
        let mut pool = DocumentPool::new(AllowList::new(["alice"]));
        let genesis = builder
            .create_block(&pool, Some(GENESIS_PARENT_HASH), 0)
            .unwrap();
        builder.add_block(&mut pool, genesis).unwrap();
        (builder, pool)
    }

    fn stage(pool: &mut DocumentPool, content: &str, ts: Timestamp) {
        let record = pool.create_document("alice", content, ts).unwrap();
        pool.stage(record).unwrap();
    }

    #[test]
    fn test_create_block_requires_parent_on_empty_chain() {
        let builder = ChainBuilder::new(DEFAULT_BLOCKSIZE);
        let pool = DocumentPool::new(AllowList::default());
        let result = builder.create_block(&pool, None, 0);
        assert!(matches!(result, Err(LedgerError::MissingParent)));
    }

    #[test]
    fn test_genesis_block() {
        let (builder, pool) = setup();
        let chain = builder.chain();
        assert_eq!(chain.len(), 1);
        let genesis = chain.tip().unwrap();
        assert_eq!(genesis.index(), 1);
        assert!(genesis.block().docs().is_empty());
        assert_eq!(*genesis.block().parent_block_hash(), GENESIS_PARENT_HASH);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_create_block_does_not_mutate() {
        let (builder, mut pool) = setup();
        stage(&mut pool, "a", 1);
        let candidate = builder.create_block(&pool, None, 10).unwrap();

        assert_eq!(candidate.index(), 2);
        assert_eq!(candidate.docs(), pool.pending());
        assert_eq!(
            candidate.block().parent_block_hash(),
            builder.chain().tip().unwrap().block_hash()
        );
        assert_eq!(pool.pending_count(), 1);
        assert_eq!(builder.chain().len(), 1);
    }

    #[test]
    fn test_add_block_links_and_clears() {
        let (mut builder, mut pool) = setup();
        stage(&mut pool, "a", 1);
        stage(&mut pool, "b", 2);
        let candidate = builder.create_block(&pool, None, 10).unwrap();
        let stored = builder.add_block(&mut pool, candidate).unwrap();

        assert_eq!(builder.chain().len(), 2);
        assert!(pool.is_empty());
        assert_eq!(stored.block().docs().len(), 2);
        assert_eq!(
            stored.block().parent_block_hash(),
            builder.chain().get(1).unwrap().block_hash()
        );
        assert_eq!(*stored.block_hash(), stored.block().hash().unwrap());
        assert!(builder.chain().verify().is_ok());
    }

    #[test]
    fn test_capacity_rejection_keeps_pool() {
        let (mut builder, mut pool) = setup();
        for i in 0..DEFAULT_BLOCKSIZE {
            stage(&mut pool, "doc", i as Timestamp);
        }
        let candidate = builder.create_block(&pool, None, 10).unwrap();
        assert!(!builder.is_valid_block(&pool, &candidate));

        let result = builder.add_block(&mut pool, candidate);
        assert!(matches!(
            result,
            Err(LedgerError::BlockCapacityExceeded {
                docs: 5,
                blocksize: 5
            })
        ));
        assert_eq!(pool.pending_count(), DEFAULT_BLOCKSIZE);
        assert_eq!(builder.chain().len(), 1);
    }

    #[test]
    fn test_one_below_capacity_accepted() {
        let (mut builder, mut pool) = setup();
        for i in 0..DEFAULT_BLOCKSIZE - 1 {
            stage(&mut pool, "doc", i as Timestamp);
        }
        let candidate = builder.create_block(&pool, None, 10).unwrap();
        assert!(builder.add_block(&mut pool, candidate).is_ok());
    }

    #[test]
    fn test_pool_change_makes_candidate_stale() {
        let (mut builder, mut pool) = setup();
        stage(&mut pool, "a", 1);
        let candidate = builder.create_block(&pool, None, 10).unwrap();
        stage(&mut pool, "late", 2);

        let result = builder.add_block(&mut pool, candidate);
        assert!(matches!(result, Err(LedgerError::PoolChanged { .. })));
        assert_eq!(pool.pending_count(), 2);
        assert_eq!(builder.chain().len(), 1);
    }

    #[test]
    fn test_chain_advance_makes_candidate_stale() {
        let (mut builder, mut pool) = setup();
        let first = builder.create_block(&pool, None, 10).unwrap();
        let second = builder.create_block(&pool, None, 11).unwrap();
        builder.add_block(&mut pool, first).unwrap();

        let result = builder.add_block(&mut pool, second);
        assert!(matches!(
            result,
            Err(LedgerError::ChainAdvanced {
                candidate_index: 2,
                next_index: 3
            })
        ));
        assert_eq!(builder.chain().len(), 2);
    }

    #[test]
    fn test_parent_override_after_genesis_rejected() {
        let (mut builder, mut pool) = setup();
        let candidate = builder
            .create_block(&pool, Some(GENESIS_PARENT_HASH), 10)
            .unwrap();
        let result = builder.add_block(&mut pool, candidate);
        assert!(matches!(result, Err(LedgerError::ParentMismatch { .. })));
    }

    #[test]
    fn test_get_is_one_based() {
        let (builder, _) = setup();
        assert!(builder.chain().get(0).is_none());
        assert!(builder.chain().get(1).is_some());
        assert!(builder.chain().get(2).is_none());
    }

    #[test]
    fn test_verify_empty_chain() {
        assert!(matches!(Chain::new().verify(), Err(IntegrityError::Empty)));
    }
}
