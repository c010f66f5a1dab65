//! Identifier derivation and commitment hashing
//!
//! All digests are SHA-256. Deposit identifiers hash a fixed sequence of
//! 32-byte big-endian words so that anyone holding the deposit parameters
//! can recompute the identifier off-chain:
//!
//! `id = H(depositor || asset || amount || passphrase_commitment || unlock_time)`
//!
//! The raw passphrase never enters the identifier, only its hash.

use sha2::{Digest, Sha256};
use types::ids::{Address, Amount, Asset, DepositId, Hash32, Timestamp};

/// Width of one encoded field.
const WORD: usize = 32;

/// Compute a SHA-256 hash of arbitrary data.
pub fn compute_hash(data: &[u8]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest: [u8; 32] = hasher.finalize().into();
    Hash32::from_bytes(digest)
}

/// Commitment stored on a deposit in place of the passphrase.
pub fn passphrase_commitment(passphrase: &str) -> Hash32 {
    compute_hash(passphrase.as_bytes())
}

/// Commitment binding a passphrase to a payout destination.
///
/// Packed encoding: the passphrase bytes followed by the 20 address bytes.
pub fn claim_hash(passphrase: &str, destination: &Address) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(passphrase.as_bytes());
    hasher.update(destination.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    Hash32::from_bytes(digest)
}

/// Derive the deposit identifier from the deposit's immutable parameters.
pub fn derive_deposit_id(
    depositor: &Address,
    asset: &Asset,
    amount: Amount,
    commitment: &Hash32,
    unlock_time: Timestamp,
) -> DepositId {
    let mut buf = Vec::with_capacity(5 * WORD);
    buf.extend_from_slice(&address_word(depositor));
    buf.extend_from_slice(&address_word(&asset.address()));
    buf.extend_from_slice(&uint_word(&amount.to_be_bytes()));
    buf.extend_from_slice(commitment.as_bytes());
    buf.extend_from_slice(&uint_word(&unlock_time.to_be_bytes()));
    DepositId::from_hash(compute_hash(&buf))
}

fn address_word(address: &Address) -> [u8; WORD] {
    uint_word(address.as_bytes())
}

/// Left-pad big-endian bytes to a full word.
fn uint_word(be_bytes: &[u8]) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - be_bytes.len()..].copy_from_slice(be_bytes);
    word
}
