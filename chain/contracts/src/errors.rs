//! Contract-specific error types
//!
//! Every guard in the vault maps to exactly one `VaultError` variant so that
//! callers can assert on the cause of a rejection.

use thiserror::Error;
use types::ids::{Address, Amount, Asset, Timestamp};

use crate::config::ClaimProtocol;

/// Vault-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Deposit not found: {deposit_id}")]
    NotFound { deposit_id: String },

    #[error("Deposit already exists: {deposit_id}")]
    DuplicateDeposit { deposit_id: String },

    #[error("Deposit amount must be positive")]
    InvalidAmount,

    #[error("Invalid asset: token address must not be zero")]
    InvalidAsset,

    #[error("Unlock time {unlock_time} must be after {now}")]
    InvalidUnlockTime { unlock_time: Timestamp, now: Timestamp },

    #[error("Native value mismatch: expected {expected}, attached {attached}")]
    NativeValueMismatch { expected: Amount, attached: Amount },

    #[error("Deposit locked until {unlock_time}")]
    NotYetUnlocked { unlock_time: Timestamp },

    #[error("Invalid passphrase")]
    InvalidPassphrase,

    #[error("Reveal does not match committed claim hash")]
    InvalidReveal,

    #[error("Claim already committed")]
    AlreadyCommitted,

    #[error("No claim committed for deposit")]
    NotCommitted,

    #[error("Deposit already claimed")]
    AlreadyClaimed,

    #[error("Nothing to refund")]
    NothingToRefund,

    #[error("Unauthorized: {caller}")]
    NotAuthorized { caller: Address },

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Vault custody account cannot receive a payout: {recipient}")]
    InvalidRecipient { recipient: Address },

    #[error("Claim type not supported by {protocol:?} deployment")]
    UnsupportedClaim { protocol: ClaimProtocol },

    #[error("Arithmetic overflow in custody accounting")]
    Overflow,

    #[error("Asset transfer failed: {0}")]
    AssetTransferFailed(#[from] AssetError),
}

/// Errors surfaced by the asset-transfer collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Insufficient balance of {asset} for {holder}: required {required}, available {available}")]
    InsufficientBalance {
        asset: Asset,
        holder: Address,
        required: Amount,
        available: Amount,
    },

    #[error("Insufficient allowance of {asset} from {owner}: required {required}, available {available}")]
    InsufficientAllowance {
        asset: Asset,
        owner: Address,
        required: Amount,
        available: Amount,
    },

    #[error("Arithmetic overflow in {asset} balance")]
    Overflow { asset: Asset },
}

/// Signature recovery errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Invalid public key encoding")]
    InvalidPublicKey,

    #[error("Invalid signature encoding")]
    InvalidSignature,

    #[error("Signature verification failed")]
    VerificationFailed,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_error_display() {
        let err = VaultError::NotYetUnlocked { unlock_time: 3600 };
        assert_eq!(err.to_string(), "Deposit locked until 3600");
    }

    #[test]
    fn test_not_authorized_display() {
        let err = VaultError::NotAuthorized {
            caller: Address::from_bytes([0xee; 20]),
        };
        assert!(err.to_string().contains(&"ee".repeat(20)));
    }

    #[test]
    fn test_vault_error_from_asset() {
        let asset_err = AssetError::Overflow {
            asset: Asset::Native,
        };
        let vault_err: VaultError = asset_err.into();
        assert!(matches!(vault_err, VaultError::AssetTransferFailed(_)));
    }

    #[test]
    fn test_config_error_from_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
