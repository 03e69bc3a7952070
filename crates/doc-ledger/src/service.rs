//! # Ledger Service
//!
//! Owns one document pool and one chain and wires them to a time source.
//! All mutation goes through `&mut self`; see [`crate::SharedLedger`] for a
//! handle that can be used from several threads.

use crate::config::LedgerConfig;
use crate::domain::errors::Result;
use crate::domain::{
    AllowList, CandidateBlock, Chain, ChainBuilder, Digest, DocumentPool, IntegrityError,
    StagedDocument, StoredBlock, GENESIS_PARENT_HASH,
};
use crate::ports::{LedgerApi, SystemTimeSource, TimeSource};
use tracing::{info, warn};

/// An append-only document ledger.
///
/// Always holds at least the genesis block once constructed.
#[derive(Debug)]
pub struct Ledger<T: TimeSource = SystemTimeSource> {
    name: String,
    pool: DocumentPool,
    builder: ChainBuilder,
    time: T,
}

impl Ledger<SystemTimeSource> {
    /// Creates a ledger with default settings and the given authors.
    pub fn with_authors<I, S>(authors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            LedgerConfig::default().with_authors(authors),
            SystemTimeSource,
        )
    }
}

impl<T: TimeSource> Ledger<T> {
    /// Validates `config` and appends the genesis block.
    pub fn new(config: LedgerConfig, time: T) -> Result<Self> {
        config.validate()?;
        if config.authors.is_empty() {
            warn!(name = %config.name, "Ledger created with an empty allow-list");
        }

        let mut ledger = Self {
            pool: DocumentPool::new(AllowList::new(config.authors)),
            builder: ChainBuilder::new(config.blocksize),
            name: config.name,
            time,
        };

        let genesis = ledger.create_block(Some(GENESIS_PARENT_HASH))?;
        let genesis = ledger.add_block(genesis)?;
        info!(
            name = %ledger.name,
            blocksize = ledger.blocksize(),
            authors = ledger.pool.allow_list().len(),
            genesis_hash = %genesis.block_hash(),
            "Ledger initialized"
        );
        Ok(ledger)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocksize(&self) -> usize {
        self.builder.blocksize()
    }

    pub fn allow_list(&self) -> &AllowList {
        self.pool.allow_list()
    }

    pub fn chain(&self) -> &Chain {
        self.builder.chain()
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.chain().len()
    }

    /// Never true after construction; provided alongside `len`.
    pub fn is_empty(&self) -> bool {
        self.chain().is_empty()
    }

    /// Most recently appended block.
    pub fn tip(&self) -> Option<&StoredBlock> {
        self.chain().tip()
    }

    /// Block at 1-based `index`.
    pub fn get_block(&self, index: u64) -> Option<&StoredBlock> {
        self.chain().get(index)
    }

    /// Documents awaiting inclusion, in submission order.
    pub fn pending(&self) -> &[StagedDocument] {
        self.pool.pending()
    }

    pub fn pending_count(&self) -> usize {
        self.pool.pending_count()
    }

    /// Builds a document stamped with the current time. No validation.
    pub fn create_document(
        &self,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<StagedDocument> {
        self.pool.create_document(author, content, self.time.now())
    }

    /// Returns true iff the record's author is on the allow-list.
    pub fn is_valid(&self, record: &StagedDocument) -> bool {
        self.pool.is_valid(record)
    }

    /// Admits a record into the pending pool.
    pub fn stage(&mut self, record: StagedDocument) -> Result<()> {
        self.pool.stage(record)
    }

    /// Forms a candidate from a frozen snapshot of the pending pool.
    pub fn create_block(&self, parent_override: Option<Digest>) -> Result<CandidateBlock> {
        self.builder
            .create_block(&self.pool, parent_override, self.time.now())
    }

    /// Returns true iff `candidate` would be accepted by `add_block`.
    pub fn is_valid_block(&self, candidate: &CandidateBlock) -> bool {
        self.builder.is_valid_block(&self.pool, candidate)
    }

    /// Like [`Ledger::is_valid_block`], with the rejection reason.
    pub fn validate_block(&self, candidate: &CandidateBlock) -> Result<()> {
        self.builder.validate_block(&self.pool, candidate)
    }

    /// Appends `candidate` and clears the pool, or rejects it leaving both
    /// chain and pool unchanged.
    pub fn add_block(&mut self, candidate: CandidateBlock) -> Result<StoredBlock> {
        self.builder.add_block(&mut self.pool, candidate)
    }

    /// Forms a block from the current pool and appends it in one step.
    pub fn seal_block(&mut self) -> Result<StoredBlock> {
        let candidate = self.create_block(None)?;
        self.add_block(candidate)
    }

    /// Re-derives all hashes and checks index and linkage invariants.
    pub fn verify_chain(&self) -> std::result::Result<(), IntegrityError> {
        self.chain().verify()
    }
}

impl<T: TimeSource> LedgerApi for Ledger<T> {
    fn create_document(&self, author: &str, content: &str) -> Result<StagedDocument> {
        Ledger::create_document(self, author, content)
    }

    fn stage(&mut self, record: StagedDocument) -> Result<()> {
        Ledger::stage(self, record)
    }

    fn create_block(&self, parent_override: Option<Digest>) -> Result<CandidateBlock> {
        Ledger::create_block(self, parent_override)
    }

    fn add_block(&mut self, candidate: CandidateBlock) -> Result<StoredBlock> {
        Ledger::add_block(self, candidate)
    }

    fn chain_len(&self) -> usize {
        self.len()
    }

    fn pending_count(&self) -> usize {
        Ledger::pending_count(self)
    }
}
