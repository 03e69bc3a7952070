//! # SHA-256 Digests
//!
//! Content identifiers for documents and blocks. A [`Digest`] is the SHA-256
//! hash of a record's canonical JSON encoding and is rendered as 64 lowercase
//! hex characters wherever it appears in text or in another record.

use crate::canonical::canonical_json;
use crate::HashingError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::str::FromStr;

/// Digest length in bytes.
pub const DIGEST_LEN: usize = 32;

/// SHA-256 output (256-bit).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// All-zero digest. Used as the parent hash of a genesis block.
    pub const ZERO: Digest = Digest([0u8; DIGEST_LEN]);

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, HashingError> {
        let raw = hex::decode(s).map_err(|e| HashingError::InvalidHex(e.to_string()))?;
        let bytes: [u8; DIGEST_LEN] =
            raw.as_slice()
                .try_into()
                .map_err(|_| HashingError::InvalidLength {
                    expected: DIGEST_LEN,
                    actual: raw.len(),
                })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = HashingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash raw bytes with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Digest(hasher.finalize().into())
}

/// Hash a structured record.
///
/// The record is encoded with [`canonical_json`] first, so the result depends
/// only on field names and values. Fails without producing a partial hash if
/// the record cannot be encoded.
pub fn digest<T: Serialize + ?Sized>(record: &T) -> Result<Digest, HashingError> {
    let bytes = canonical_json(record)?;
    Ok(sha256(&bytes))
}
