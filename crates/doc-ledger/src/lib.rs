//! # Document Ledger
//!
//! An append-only chain of blocks, each carrying a batch of author-attributed
//! documents and committing to its predecessor by hash.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Only allow-listed authors enter the pool | `domain/pool.rs` - `stage()` |
//! | `chain[i].parent_block_hash == chain[i-1].block_hash` | `domain/chain.rs` - `validate_block()` |
//! | `chain[i].index == i + 1` | `domain/chain.rs` - `validate_block()` |
//! | Appended docs are exactly the validated snapshot | `domain/chain.rs` - pool revision check |
//! | Pool is empty after every successful append | `domain/chain.rs` - `add_block()` |
//!
//! ## Block Lifecycle
//!
//! ```text
//! create_document ──stage──→ [PENDING POOL] ──create_block──→ [CANDIDATE]
//!                                                                 │
//!                    add_block (valid) ──→ [CHAIN] + pool cleared ┤
//!                    add_block (invalid) ──→ discarded, pool kept ┘
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs - Ledger (pool + chain + clock)                     │
//! │  shared.rs  - SharedLedger (locked handle for many writers)     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - LedgerApi trait                            │
//! │  ports/outbound.rs - TimeSource trait                           │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/entities.rs - Document, StagedDocument, Block, ...      │
//! │  domain/pool.rs     - AllowList, DocumentPool                   │
//! │  domain/chain.rs    - Chain, CandidateBlock, ChainBuilder       │
//! │  domain/errors.rs   - LedgerError, IntegrityError               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use doc_ledger::Ledger;
//!
//! let mut ledger = Ledger::with_authors(["alice"]).unwrap();
//! let doc = ledger.create_document("alice", "hello").unwrap();
//! ledger.stage(doc).unwrap();
//!
//! let candidate = ledger.create_block(None).unwrap();
//! let stored = ledger.add_block(candidate).unwrap();
//! assert_eq!(stored.index(), 2);
//! assert_eq!(ledger.pending_count(), 0);
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;
pub mod shared;

pub use config::LedgerConfig;
pub use domain::errors::Result;
pub use domain::*;
pub use ports::*;
pub use service::Ledger;
pub use shared::SharedLedger;
