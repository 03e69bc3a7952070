//! # Shared Crypto - Content Hashing for Doc-Chain
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `canonical` | Sorted-key compact JSON | Deterministic record encoding |
//! | `hashing` | SHA-256 | Document and block identifiers |
//!
//! ## Properties
//!
//! - **Deterministic**: structurally identical records hash identically
//! - **Pure**: no side effects, no partial output on encoding failure
//! - **Hex rendering**: digests travel as 64 lowercase hex characters

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod errors;
pub mod hashing;

// Re-exports
pub use canonical::canonical_json;
pub use errors::HashingError;
pub use hashing::{digest, sha256, Digest, DIGEST_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
