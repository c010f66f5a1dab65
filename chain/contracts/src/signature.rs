//! Signature-based claim authorization
//!
//! A depositor may authorize a claim by signing the deposit identifier
//! instead of sharing the passphrase. The vault only needs to learn *who*
//! signed, so recovery is expressed as a trait and injected into the vault.
//!
//! The production implementation uses Ed25519. Signatures travel with the
//! signer's public key and the signer address is derived from that key, so
//! verifying the envelope is equivalent to recovering the signer.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use types::ids::{Address, DepositId};

use crate::errors::SignatureError;
use crate::hashing::compute_hash;

/// Domain separator prepended to every signed deposit identifier.
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Passphrase Vault Signed Message:\n32";

/// Signature envelope submitted with a signature claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSignature {
    /// Ed25519 public key of the signer as hex string
    pub public_key: String,
    /// Ed25519 signature as hex string
    pub signature: String,
}

/// Recovers the address that produced a signature over a message.
pub trait SignatureRecovery {
    fn recover(&self, message: &[u8], signature: &ClaimSignature) -> Result<Address, SignatureError>;
}

/// Bytes a depositor signs to authorize a claim on `id`.
pub fn claim_message(id: &DepositId) -> Vec<u8> {
    let mut message = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + 32);
    message.extend_from_slice(SIGNED_MESSAGE_PREFIX);
    message.extend_from_slice(id.as_bytes());
    message
}

/// Address controlled by an Ed25519 key: the last 20 bytes of SHA-256(key).
pub fn address_of(verifying_key: &VerifyingKey) -> Address {
    let digest = compute_hash(verifying_key.as_bytes());
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest.as_bytes()[12..]);
    Address::from_bytes(bytes)
}

/// Sign a claim authorization for `id` (wallet side).
pub fn sign_deposit_id(signing_key: &SigningKey, id: &DepositId) -> ClaimSignature {
    let signature = signing_key.sign(&claim_message(id));
    ClaimSignature {
        public_key: hex::encode(signing_key.verifying_key().to_bytes()),
        signature: hex::encode(signature.to_bytes()),
    }
}

/// Ed25519 recovery over `ClaimSignature` envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Recovery;

impl SignatureRecovery for Ed25519Recovery {
    fn recover(&self, message: &[u8], signed: &ClaimSignature) -> Result<Address, SignatureError> {
        let pub_bytes = hex::decode(&signed.public_key)
            .map_err(|_| SignatureError::InvalidPublicKey)?;
        let sig_bytes = hex::decode(&signed.signature)
            .map_err(|_| SignatureError::InvalidSignature)?;

        let pub_key_bytes: [u8; 32] = pub_bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidPublicKey)?;
        let sig_key_bytes: [u8; 64] = sig_bytes
            .try_into()
            .map_err(|_| SignatureError::InvalidSignature)?;

        let verifying_key = VerifyingKey::from_bytes(&pub_key_bytes)
            .map_err(|_| SignatureError::InvalidPublicKey)?;
        let signature = Signature::from_bytes(&sig_key_bytes);

        verifying_key
            .verify(message, &signature)
            .map_err(|_| SignatureError::VerificationFailed)?;

        Ok(address_of(&verifying_key))
    }
}
