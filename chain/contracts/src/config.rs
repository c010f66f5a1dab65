//! Vault deployment configuration
//!
//! Loaded from a JSON file whose path is given by `VAULT_CONFIG`. A missing
//! or unreadable file falls back to defaults with a warning.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::errors::ConfigError;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "VAULT_CONFIG";

/// Claim protocol a deployment runs. The two are never mixed on one vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimProtocol {
    /// Single-step `claim(id, passphrase)`, paid to the caller.
    Direct,
    /// `claim(id, claim_hash)` followed by `reveal_claim`, paid to the
    /// committed destination.
    CommitReveal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub claim_protocol: ClaimProtocol,
    /// Enables `claim_with_signature`.
    pub signature_claims: bool,
    /// Shortest passphrase accepted at deposit time, in bytes.
    pub min_passphrase_len: usize,
    /// Upper bound on `unlock_time - now`, in seconds.
    pub max_lock_duration: Option<u64>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            claim_protocol: ClaimProtocol::CommitReveal,
            signature_claims: true,
            min_passphrase_len: 1,
            max_lock_duration: None,
        }
    }
}

impl VaultConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: VaultConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Load from the file named by `VAULT_CONFIG`, or defaults.
    pub fn from_env() -> Self {
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_default();
        if path.is_empty() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to load vault config, using defaults");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_passphrase_len == 0 {
            return Err(ConfigError::Invalid(
                "min_passphrase_len must be at least 1".to_string(),
            ));
        }
        if self.max_lock_duration == Some(0) {
            return Err(ConfigError::Invalid(
                "max_lock_duration must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn direct() -> Self {
        Self {
            claim_protocol: ClaimProtocol::Direct,
            ..Self::default()
        }
    }

    pub fn commit_reveal() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = VaultConfig::default();
        assert_eq!(config.claim_protocol, ClaimProtocol::CommitReveal);
        assert!(config.signature_claims);
        assert_eq!(config.min_passphrase_len, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_json() {
        let config = VaultConfig::from_json_str(r#"{"claim_protocol": "direct"}"#).unwrap();
        assert_eq!(config.claim_protocol, ClaimProtocol::Direct);
        assert!(config.signature_claims);
    }

    #[test]
    fn test_parse_full_json() {
        let json = r#"{
            "claim_protocol": "commit_reveal",
            "signature_claims": false,
            "min_passphrase_len": 8,
            "max_lock_duration": 86400
        }"#;
        let config = VaultConfig::from_json_str(json).unwrap();
        assert!(!config.signature_claims);
        assert_eq!(config.min_passphrase_len, 8);
        assert_eq!(config.max_lock_duration, Some(86400));
    }

    #[test]
    fn test_reject_zero_passphrase_len() {
        let result = VaultConfig::from_json_str(r#"{"min_passphrase_len": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_reject_unknown_protocol() {
        let result = VaultConfig::from_json_str(r#"{"claim_protocol": "lottery"}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"claim_protocol": "direct", "min_passphrase_len": 4}}"#).unwrap();
        let config = VaultConfig::load(file.path()).unwrap();
        assert_eq!(config, VaultConfig {
            min_passphrase_len: 4,
            ..VaultConfig::direct()
        });
    }

    #[test]
    fn test_load_missing_file() {
        let result = VaultConfig::load("/nonexistent/vault.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
