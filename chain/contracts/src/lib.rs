//! Passphrase vault contract logic
//!
//! Custody of native and token deposits behind a passphrase and an unlock
//! time, with direct or commit-reveal claims, depositor-signed claims and
//! refunds.
//!
//! # Modules
//! - `vault`: Deposit lifecycle state machine
//! - `ledger`: Deposit records and per-depositor index
//! - `hashing`: Passphrase commitments, claim hashes, deposit identifiers
//! - `assets`: Asset-transfer collaborator and an in-memory implementation
//! - `signature`: Signature recovery for depositor-signed claims
//! - `clock`: Time sources
//! - `config`: Deployment configuration
//! - `events`: Contract events
//! - `errors`: Contract-specific error types

pub mod assets;
pub mod clock;
pub mod config;
pub mod errors;
pub mod events;
pub mod hashing;
pub mod ledger;
pub mod signature;
pub mod vault;
