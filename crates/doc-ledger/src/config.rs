//! Configuration types for the ledger

use crate::domain::{LedgerError, DEFAULT_BLOCKSIZE};
use serde::{Deserialize, Serialize};

/// Default display name.
pub const DEFAULT_NAME: &str = "blockchain";

/// Ledger construction settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Display name
    pub name: String,

    /// A block is rejected once it would carry this many documents (must be >= 1)
    pub blocksize: usize,

    /// Authors allowed to stage documents
    pub authors: Vec<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            blocksize: DEFAULT_BLOCKSIZE,
            authors: Vec::new(),
        }
    }
}

impl LedgerConfig {
    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LedgerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_blocksize(mut self, blocksize: usize) -> Self {
        self.blocksize = blocksize;
        self
    }

    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Rejects settings under which not even the genesis block is accepted.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.blocksize == 0 {
            return Err(LedgerError::InvalidConfig(
                "blocksize must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.name, "blockchain");
        assert_eq!(config.blocksize, 5);
        assert!(config.authors.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = LedgerConfig::from_json(r#"{"authors": ["alice", "bob"]}"#).unwrap();
        assert_eq!(config.authors, vec!["alice", "bob"]);
        assert_eq!(config.blocksize, DEFAULT_BLOCKSIZE);
        assert_eq!(config.name, DEFAULT_NAME);
    }

    #[test]
    fn test_from_json_rejects_zero_blocksize() {
        let result = LedgerConfig::from_json(r#"{"blocksize": 0}"#);
        assert!(matches!(result, Err(LedgerError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let result = LedgerConfig::from_json(r#"{"blocksize": "five"}"#);
        assert!(matches!(result, Err(LedgerError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_helpers() {
        let config = LedgerConfig::default()
            .with_name("notary")
            .with_blocksize(3)
            .with_authors(["alice"]);
        assert_eq!(config.name, "notary");
        assert_eq!(config.blocksize, 3);
        assert_eq!(config.authors, vec!["alice"]);
    }
}
