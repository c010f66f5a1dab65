//! Types library for the passphrase vault
//!
//! Core primitives shared by the vault contract and its tooling.
//!
//! # Modules
//! - `ids`: Addresses, digests, deposit identifiers and assets
//! - `numeric`: Human-readable amount parsing and formatting
//! - `errors`: Parse error taxonomy

pub mod errors;
pub mod ids;
pub mod numeric;
