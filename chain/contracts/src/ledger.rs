//! Deposit ledger: records keyed by derived identifier
//!
//! Owns the mapping from deposit identifier to record and the per-depositor
//! index. Records are never deleted; terminal records stay queryable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::ids::{Address, Amount, Asset, DepositId, Hash32, Timestamp};

use crate::errors::VaultError;

/// Lifecycle state of a deposit.
///
/// `Active → Committed → Claimed`, `Active → Claimed` and
/// `Active → Refunded` are the only transitions. `Claimed` and `Refunded`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    /// Funds in custody, no claim started
    Active,
    /// Claim hash committed, awaiting reveal
    Committed,
    /// Paid out to a claimant
    Claimed,
    /// Returned to the depositor
    Refunded,
}

impl DepositStatus {
    /// Funds still held by the vault.
    pub fn is_custodied(&self) -> bool {
        matches!(self, DepositStatus::Active | DepositStatus::Committed)
    }
}

/// A single deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub id: DepositId,
    pub depositor: Address,
    pub asset: Asset,
    pub amount: Amount,
    pub passphrase_commitment: Hash32,
    pub unlock_time: Timestamp,
    pub created_at: Timestamp,
    pub status: DepositStatus,
    /// Commitment to (passphrase, destination); set at most once
    pub claim_hash: Option<Hash32>,
    /// Account that committed or submitted the claim
    pub claimant: Option<Address>,
    /// Account that received the funds once terminal
    pub recipient: Option<Address>,
}

impl DepositRecord {
    pub fn is_unlocked(&self, now: Timestamp) -> bool {
        now >= self.unlock_time
    }
}

/// Deposit store with per-depositor index.
#[derive(Debug, Default)]
pub struct DepositLedger {
    deposits: HashMap<DepositId, DepositRecord>,
    /// Depositor -> identifiers in creation order (append-only)
    by_depositor: HashMap<Address, Vec<DepositId>>,
}

impl DepositLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &DepositId) -> bool {
        self.deposits.contains_key(id)
    }

    /// Insert a new record. Fails if the identifier is already taken.
    pub fn insert(&mut self, record: DepositRecord) -> Result<(), VaultError> {
        if self.deposits.contains_key(&record.id) {
            return Err(VaultError::DuplicateDeposit {
                deposit_id: record.id.to_string(),
            });
        }
        self.by_depositor
            .entry(record.depositor)
            .or_default()
            .push(record.id);
        self.deposits.insert(record.id, record);
        Ok(())
    }

    pub fn get(&self, id: &DepositId) -> Result<&DepositRecord, VaultError> {
        self.deposits.get(id).ok_or_else(|| VaultError::NotFound {
            deposit_id: id.to_string(),
        })
    }

    pub(crate) fn get_mut(&mut self, id: &DepositId) -> Result<&mut DepositRecord, VaultError> {
        self.deposits.get_mut(id).ok_or_else(|| VaultError::NotFound {
            deposit_id: id.to_string(),
        })
    }

    /// Identifiers created by `depositor`, oldest first.
    pub fn ids_for(&self, depositor: &Address) -> &[DepositId] {
        self.by_depositor
            .get(depositor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Sum of amounts still in custody for `asset`.
    pub fn custodied(&self, asset: &Asset) -> Result<Amount, VaultError> {
        self.iter()
            .filter(|r| r.asset == *asset && r.status.is_custodied())
            .try_fold(0, |acc: Amount, r| {
                acc.checked_add(r.amount).ok_or(VaultError::Overflow)
            })
    }

    pub fn len(&self) -> usize {
        self.deposits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DepositRecord> {
        self.deposits.values()
    }
}
