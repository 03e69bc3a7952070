//! Core domain entities for the ledger.
//!
//! Every record here is immutable once built: fields are private and only
//! exposed through accessors. Serialized field names are part of the hash
//! commitment and must not change.

use serde::{Deserialize, Serialize};
use shared_crypto::{digest, HashingError};

pub use shared_crypto::Digest;

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// An author-attributed document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    author: String,
    content: String,
    timestamp: Timestamp,
}

impl Document {
    /// Creates a document stamped with `timestamp`.
    pub fn new(author: impl Into<String>, content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            timestamp,
        }
    }

    /// Author identifier, checked against the allow-list on staging.
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// A document together with the digest committed at creation time.
///
/// The digest is never re-derived from `doc`; `verify_chain` is the only
/// place that recomputes it, to detect tampering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedDocument {
    doc_hash: Digest,
    doc: Document,
}

impl StagedDocument {
    /// Hashes `doc` and wraps it.
    pub fn new(doc: Document) -> Result<Self, HashingError> {
        let doc_hash = digest(&doc)?;
        Ok(Self { doc_hash, doc })
    }

    pub fn doc_hash(&self) -> &Digest {
        &self.doc_hash
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// Shorthand for `self.doc().author()`.
    pub fn author(&self) -> &str {
        self.doc.author()
    }
}

/// A batch of staged documents linked to its parent by hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    index: u64,
    /// Hash of the preceding block, or [`Digest::ZERO`] for genesis.
    parent_block_hash: Digest,
    timestamp: Timestamp,
    /// Documents in submission order.
    docs: Vec<StagedDocument>,
}

impl Block {
    /// Creates an unhashed block.
    pub fn new(
        index: u64,
        parent_block_hash: Digest,
        timestamp: Timestamp,
        docs: Vec<StagedDocument>,
    ) -> Self {
        Self {
            index,
            parent_block_hash,
            timestamp,
            docs,
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn parent_block_hash(&self) -> &Digest {
        &self.parent_block_hash
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn docs(&self) -> &[StagedDocument] {
        &self.docs
    }

    /// Returns true for a block whose parent is the genesis sentinel.
    pub fn is_genesis(&self) -> bool {
        self.index == 1 && self.parent_block_hash == Digest::ZERO
    }

    /// Computes this block's content hash.
    pub fn hash(&self) -> Result<Digest, HashingError> {
        digest(self)
    }
}

/// A block as stored in the chain, keyed by its hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlock {
    block_hash: Digest,
    block: Block,
}

impl StoredBlock {
    /// Hashes `block` and wraps it.
    pub fn seal(block: Block) -> Result<Self, HashingError> {
        let block_hash = block.hash()?;
        Ok(Self { block_hash, block })
    }

    /// Identity referenced by the next block's `parent_block_hash`.
    pub fn block_hash(&self) -> &Digest {
        &self.block_hash
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn index(&self) -> u64 {
        self.block.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str, ts: Timestamp) -> StagedDocument {
        StagedDocument::new(Document::new("alice", content, ts)).unwrap()
    }

    #[test]
    fn test_document_hash_is_stable() {
        let a = doc("hello", 1000);
        let b = doc("hello", 1000);
        assert_eq!(a.doc_hash(), b.doc_hash());
    }

    #[test]
    fn test_document_hash_covers_every_field() {
        let base = doc("hello", 1000);
        assert_ne!(base.doc_hash(), doc("hello", 1001).doc_hash());
        assert_ne!(base.doc_hash(), doc("hullo", 1000).doc_hash());
        let bob = StagedDocument::new(Document::new("bob", "hello", 1000)).unwrap();
        assert_ne!(base.doc_hash(), bob.doc_hash());
    }

    #[test]
    fn test_document_serialized_field_names() {
        let value = serde_json::to_value(Document::new("alice", "hi", 5)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"author": "alice", "content": "hi", "timestamp": 5})
        );
    }

    #[test]
    fn test_block_serialized_field_names() {
        let block = Block::new(2, Digest::ZERO, 9, vec![doc("x", 1)]);
        let value = serde_json::to_value(&block).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["docs", "index", "parent_block_hash", "timestamp"]);
        assert_eq!(obj["docs"][0]["doc"]["content"], "x");
        assert!(obj["docs"][0]["doc_hash"].is_string());
    }

    #[test]
    fn test_block_hash_changes_with_docs() {
        let empty = Block::new(2, Digest::ZERO, 9, vec![]);
        let full = Block::new(2, Digest::ZERO, 9, vec![doc("x", 1)]);
        assert_ne!(empty.hash().unwrap(), full.hash().unwrap());
    }

    #[test]
    fn test_stored_block_seal() {
        let block = Block::new(1, Digest::ZERO, 0, vec![]);
        let expected = block.hash().unwrap();
        let stored = StoredBlock::seal(block).unwrap();
        assert_eq!(*stored.block_hash(), expected);
        assert_eq!(stored.index(), 1);
        assert!(stored.block().is_genesis());
    }
}
