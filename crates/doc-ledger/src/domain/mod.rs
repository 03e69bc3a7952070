//! # Domain Layer - Document Ledger
//!
//! Pure ledger logic. Time is passed in explicitly; nothing here reads a clock.
//!
//! ## Components
//!
//! - `entities`: Document, StagedDocument, Block, StoredBlock
//! - `pool`: AllowList and DocumentPool (staging gate)
//! - `chain`: Chain, CandidateBlock and ChainBuilder (block formation/append)
//! - `errors`: LedgerError and IntegrityError

pub mod chain;
pub mod entities;
pub mod errors;
pub mod pool;

pub use chain::*;
pub use entities::*;
pub use errors::{IntegrityError, LedgerError};
pub use pool::*;
