//! Error types for primitive parsing
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Errors raised while parsing addresses, digests and amounts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Too many decimal places: {scale} exceeds {decimals}")]
    TooManyDecimals { scale: u32, decimals: u32 },
}
