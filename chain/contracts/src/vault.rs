//! Vault: passphrase-gated, time-locked custody
//!
//! One state machine per deposit:
//! - Deposit: funds pulled into custody, record created `Active`
//! - Claim (direct): passphrase checked, paid to the caller
//! - Claim (commit-reveal): `claim_hash` committed, then revealed; paid to
//!   the destination bound into the commitment
//! - Claim (signature): depositor's signature over the identifier
//! - Refund: depositor-only, while no claim has started
//!
//! Every operation validates all guards before its first mutation, so a
//! rejected call leaves records, balances and indexes untouched.

use tracing::{debug, info, warn};
use types::ids::{Address, Amount, Asset, DepositId, Hash32, Timestamp};

use crate::assets::AssetLedger;
use crate::clock::Clock;
use crate::config::{ClaimProtocol, VaultConfig};
use crate::errors::VaultError;
use crate::events::{
    ClaimCommitted, ClaimMethod, Claimed, ContractEvent, DepositCreated, Refunded,
};
use crate::hashing::{claim_hash, derive_deposit_id, passphrase_commitment};
use crate::ledger::{DepositLedger, DepositRecord, DepositStatus};
use crate::signature::{claim_message, ClaimSignature, Ed25519Recovery, SignatureRecovery};

/// Caller identity plus native value attached to the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub sender: Address,
    pub value: Amount,
}

impl CallContext {
    /// Call carrying no native value.
    pub fn new(sender: Address) -> Self {
        Self { sender, value: 0 }
    }

    pub fn with_value(sender: Address, value: Amount) -> Self {
        Self { sender, value }
    }
}

/// First argument of `claim`, tagged by protocol variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimRequest {
    /// Direct variant: the raw passphrase
    Passphrase(String),
    /// Commit-reveal variant: `claim_hash(passphrase, destination)`
    Commitment(Hash32),
}

/// Core vault contract.
pub struct Vault<A: AssetLedger> {
    config: VaultConfig,
    ledger: DepositLedger,
    assets: A,
    clock: Box<dyn Clock>,
    signatures: Box<dyn SignatureRecovery>,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl<A: AssetLedger> Vault<A> {
    /// Create a vault using Ed25519 signature recovery.
    pub fn new(config: VaultConfig, assets: A, clock: impl Clock + 'static) -> Self {
        info!(
            protocol = ?config.claim_protocol,
            signature_claims = config.signature_claims,
            custodian = %assets.custodian(),
            "Vault initialized"
        );
        Self {
            config,
            ledger: DepositLedger::new(),
            assets,
            clock: Box::new(clock),
            signatures: Box::new(Ed25519Recovery),
            events: Vec::new(),
        }
    }

    /// Replace the signature recovery primitive.
    pub fn with_signature_recovery(mut self, recovery: impl SignatureRecovery + 'static) -> Self {
        self.signatures = Box::new(recovery);
        self
    }

    // ───────────────────────── Deposit ─────────────────────────

    /// Lock `amount` of `asset` behind `passphrase` until `unlock_time`.
    ///
    /// Native deposits must attach exactly `amount`; token deposits attach
    /// nothing and require a prior allowance to the vault.
    /// Emits `DepositCreated`.
    pub fn deposit(
        &mut self,
        ctx: &CallContext,
        asset: Asset,
        amount: Amount,
        passphrase: &str,
        unlock_time: Timestamp,
    ) -> Result<DepositId, VaultError> {
        self.deposit_inner(ctx, asset, amount, passphrase, unlock_time)
            .inspect_err(|e| {
                warn!(depositor = %ctx.sender, %asset, amount, error = %e, "Deposit rejected");
            })
    }

    fn deposit_inner(
        &mut self,
        ctx: &CallContext,
        asset: Asset,
        amount: Amount,
        passphrase: &str,
        unlock_time: Timestamp,
    ) -> Result<DepositId, VaultError> {
        let now = self.clock.now();

        // The custodian pulling from itself moves nothing.
        if ctx.sender == self.assets.custodian() {
            return Err(VaultError::NotAuthorized { caller: ctx.sender });
        }
        if amount == 0 {
            return Err(VaultError::InvalidAmount);
        }
        if asset == Asset::Token(Address::ZERO) {
            return Err(VaultError::InvalidAsset);
        }
        if unlock_time <= now {
            return Err(VaultError::InvalidUnlockTime { unlock_time, now });
        }
        if let Some(max) = self.config.max_lock_duration {
            if unlock_time - now > max {
                return Err(VaultError::InvalidUnlockTime { unlock_time, now });
            }
        }
        if passphrase.len() < self.config.min_passphrase_len {
            return Err(VaultError::InvalidPassphrase);
        }

        let expected_value = if asset.is_native() { amount } else { 0 };
        if ctx.value != expected_value {
            return Err(VaultError::NativeValueMismatch {
                expected: expected_value,
                attached: ctx.value,
            });
        }

        let commitment = passphrase_commitment(passphrase);
        let id = derive_deposit_id(&ctx.sender, &asset, amount, &commitment, unlock_time);
        debug!(deposit_id = %id, depositor = %ctx.sender, "Derived deposit id");

        if self.ledger.contains(&id) {
            return Err(VaultError::DuplicateDeposit {
                deposit_id: id.to_string(),
            });
        }

        // Custody pull is the first mutation.
        self.assets.transfer_in(asset, ctx.sender, amount)?;

        self.ledger.insert(DepositRecord {
            id,
            depositor: ctx.sender,
            asset,
            amount,
            passphrase_commitment: commitment,
            unlock_time,
            created_at: now,
            status: DepositStatus::Active,
            claim_hash: None,
            claimant: None,
            recipient: None,
        })?;

        info!(
            deposit_id = %id.short(),
            depositor = %ctx.sender,
            %asset,
            amount,
            unlock_time,
            "Deposit created"
        );

        self.events.push(ContractEvent::DepositCreated(DepositCreated {
            deposit_id: id,
            depositor: ctx.sender,
            asset,
            amount,
            unlock_time,
        }));
        Ok(id)
    }

    // ───────────────────────── Claim ─────────────────────────

    /// Claim entry point; the request variant must match the deployment's
    /// claim protocol.
    ///
    /// - `Passphrase` (direct): pays the caller immediately.
    /// - `Commitment` (commit-reveal): records the claim hash, no payout.
    pub fn claim(
        &mut self,
        caller: Address,
        id: &DepositId,
        request: ClaimRequest,
    ) -> Result<ContractEvent, VaultError> {
        let result = match (self.config.claim_protocol, request) {
            (ClaimProtocol::Direct, ClaimRequest::Passphrase(passphrase)) => {
                self.claim_direct(caller, id, &passphrase)
            }
            (ClaimProtocol::CommitReveal, ClaimRequest::Commitment(hash)) => {
                self.commit_claim(caller, id, hash)
            }
            (protocol, _) => Err(VaultError::UnsupportedClaim { protocol }),
        };
        result.inspect_err(|e| {
            warn!(deposit_id = %id.short(), %caller, error = %e, "Claim rejected");
        })
    }

    fn claim_direct(
        &mut self,
        caller: Address,
        id: &DepositId,
        passphrase: &str,
    ) -> Result<ContractEvent, VaultError> {
        self.ensure_external(caller)?;
        let now = self.clock.now();
        let record = self.ledger.get(id)?;
        match record.status {
            DepositStatus::Active => {}
            DepositStatus::Committed => return Err(VaultError::AlreadyCommitted),
            DepositStatus::Claimed => return Err(VaultError::AlreadyClaimed),
            DepositStatus::Refunded => return Err(not_found(id)),
        }
        ensure_unlocked(record, now)?;
        if passphrase_commitment(passphrase) != record.passphrase_commitment {
            return Err(VaultError::InvalidPassphrase);
        }

        self.pay_claim(id, caller, caller, ClaimMethod::Passphrase)
    }

    fn commit_claim(
        &mut self,
        caller: Address,
        id: &DepositId,
        hash: Hash32,
    ) -> Result<ContractEvent, VaultError> {
        let now = self.clock.now();
        let record = self.ledger.get_mut(id)?;
        match record.status {
            DepositStatus::Active => {}
            DepositStatus::Committed => return Err(VaultError::AlreadyCommitted),
            DepositStatus::Claimed => return Err(VaultError::AlreadyClaimed),
            DepositStatus::Refunded => return Err(not_found(id)),
        }
        ensure_unlocked(record, now)?;

        record.status = DepositStatus::Committed;
        record.claim_hash = Some(hash);
        record.claimant = Some(caller);

        info!(deposit_id = %id.short(), claimant = %caller, "Claim committed");

        let event = ContractEvent::ClaimCommitted(ClaimCommitted {
            deposit_id: *id,
            claimant: caller,
            claim_hash: hash,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    /// Reveal a committed claim and pay the committed destination.
    ///
    /// Anyone may reveal: the payout goes to `destination`, which must be
    /// the address bound into the committed claim hash.
    pub fn reveal_claim(
        &mut self,
        caller: Address,
        id: &DepositId,
        passphrase: &str,
        destination: Address,
    ) -> Result<ContractEvent, VaultError> {
        self.reveal_inner(caller, id, passphrase, destination)
            .inspect_err(|e| {
                warn!(deposit_id = %id.short(), %caller, error = %e, "Reveal rejected");
            })
    }

    fn reveal_inner(
        &mut self,
        caller: Address,
        id: &DepositId,
        passphrase: &str,
        destination: Address,
    ) -> Result<ContractEvent, VaultError> {
        let protocol = self.config.claim_protocol;
        if protocol != ClaimProtocol::CommitReveal {
            return Err(VaultError::UnsupportedClaim { protocol });
        }
        self.ensure_external(destination)?;

        let now = self.clock.now();
        let record = self.ledger.get(id)?;
        match record.status {
            DepositStatus::Committed => {}
            DepositStatus::Active => return Err(VaultError::NotCommitted),
            DepositStatus::Claimed => return Err(VaultError::AlreadyClaimed),
            DepositStatus::Refunded => return Err(not_found(id)),
        }
        ensure_unlocked(record, now)?;
        if passphrase_commitment(passphrase) != record.passphrase_commitment {
            return Err(VaultError::InvalidPassphrase);
        }
        if record.claim_hash != Some(claim_hash(passphrase, &destination)) {
            return Err(VaultError::InvalidReveal);
        }

        self.pay_claim(id, caller, destination, ClaimMethod::Reveal)
    }

    /// Claim with the depositor's signature over the deposit identifier.
    ///
    /// Pays the caller. Rejected once a commit-reveal claim is pending.
    pub fn claim_with_signature(
        &mut self,
        caller: Address,
        id: &DepositId,
        signature: &ClaimSignature,
    ) -> Result<ContractEvent, VaultError> {
        self.signature_claim_inner(caller, id, signature)
            .inspect_err(|e| {
                warn!(deposit_id = %id.short(), %caller, error = %e, "Signature claim rejected");
            })
    }

    fn signature_claim_inner(
        &mut self,
        caller: Address,
        id: &DepositId,
        signature: &ClaimSignature,
    ) -> Result<ContractEvent, VaultError> {
        if !self.config.signature_claims {
            return Err(VaultError::UnsupportedClaim {
                protocol: self.config.claim_protocol,
            });
        }
        self.ensure_external(caller)?;

        let now = self.clock.now();
        let record = self.ledger.get(id)?;
        match record.status {
            DepositStatus::Active => {}
            DepositStatus::Committed => return Err(VaultError::AlreadyCommitted),
            DepositStatus::Claimed => return Err(VaultError::AlreadyClaimed),
            DepositStatus::Refunded => return Err(not_found(id)),
        }
        ensure_unlocked(record, now)?;

        let signer = self
            .signatures
            .recover(&claim_message(id), signature)
            .map_err(|e| {
                debug!(deposit_id = %id.short(), error = %e, "Signature recovery failed");
                VaultError::InvalidSignature
            })?;
        if signer != record.depositor {
            return Err(VaultError::NotAuthorized { caller: signer });
        }

        self.pay_claim(id, caller, caller, ClaimMethod::Signature)
    }

    /// Rejects the custody account as a payout recipient.
    fn ensure_external(&self, recipient: Address) -> Result<(), VaultError> {
        if recipient == self.assets.custodian() {
            return Err(VaultError::InvalidRecipient { recipient });
        }
        Ok(())
    }

    /// Pay out a validated claim and move the record to `Claimed`.
    fn pay_claim(
        &mut self,
        id: &DepositId,
        claimant: Address,
        recipient: Address,
        method: ClaimMethod,
    ) -> Result<ContractEvent, VaultError> {
        let (asset, amount) = {
            let record = self.ledger.get(id)?;
            (record.asset, record.amount)
        };

        self.assets.transfer_out(asset, recipient, amount)?;

        let record = self.ledger.get_mut(id)?;
        record.status = DepositStatus::Claimed;
        record.recipient = Some(recipient);
        if record.claimant.is_none() {
            record.claimant = Some(claimant);
        }

        info!(
            deposit_id = %id.short(),
            %claimant,
            %recipient,
            %asset,
            amount,
            ?method,
            "Deposit claimed"
        );

        let event = ContractEvent::Claimed(Claimed {
            deposit_id: *id,
            claimant,
            recipient,
            asset,
            amount,
            method,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Refund ─────────────────────────

    /// Return a deposit to its depositor. Unlock time does not matter; a
    /// started claim does.
    pub fn refund(&mut self, caller: Address, id: &DepositId) -> Result<ContractEvent, VaultError> {
        self.refund_inner(caller, id).inspect_err(|e| {
            warn!(deposit_id = %id.short(), %caller, error = %e, "Refund rejected");
        })
    }

    fn refund_inner(&mut self, caller: Address, id: &DepositId) -> Result<ContractEvent, VaultError> {
        let record = self.ledger.get(id)?;
        if caller != record.depositor {
            return Err(VaultError::NotAuthorized { caller });
        }
        if record.status != DepositStatus::Active {
            return Err(VaultError::NothingToRefund);
        }
        let (depositor, asset, amount) = (record.depositor, record.asset, record.amount);

        self.assets.transfer_out(asset, depositor, amount)?;

        let record = self.ledger.get_mut(id)?;
        record.status = DepositStatus::Refunded;
        record.recipient = Some(depositor);

        info!(deposit_id = %id.short(), %depositor, %asset, amount, "Deposit refunded");

        let event = ContractEvent::Refunded(Refunded {
            deposit_id: *id,
            depositor,
            asset,
            amount,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Snapshot of a deposit record.
    pub fn get_deposit(&self, id: &DepositId) -> Result<&DepositRecord, VaultError> {
        self.ledger.get(id)
    }

    /// Deposits created by `depositor`, oldest first.
    pub fn deposits_by_depositor(&self, depositor: &Address) -> &[DepositId] {
        self.ledger.ids_for(depositor)
    }

    /// Sum of amounts of `asset` owed to Active and Committed deposits.
    pub fn custodied(&self, asset: &Asset) -> Result<Amount, VaultError> {
        self.ledger.custodied(asset)
    }

    pub fn ledger(&self) -> &DepositLedger {
        &self.ledger
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// The vault's own account.
    pub fn address(&self) -> Address {
        self.assets.custodian()
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Mutable access to the asset collaborator, for funding and approvals.
    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }
}

fn ensure_unlocked(record: &DepositRecord, now: Timestamp) -> Result<(), VaultError> {
    if !record.is_unlocked(now) {
        return Err(VaultError::NotYetUnlocked {
            unlock_time: record.unlock_time,
        });
    }
    Ok(())
}

/// Terminal refunded deposits reject claims as if absent.
fn not_found(id: &DepositId) -> VaultError {
    VaultError::NotFound {
        deposit_id: id.to_string(),
    }
}
