//! Contract events
//!
//! Events are immutable records emitted by vault operations and consumed by
//! off-chain indexers. No event carries a raw passphrase.

use serde::{Deserialize, Serialize};
use types::ids::{Address, Amount, Asset, DepositId, Hash32, Timestamp};

/// Deposit accepted into custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositCreated {
    pub deposit_id: DepositId,
    pub depositor: Address,
    pub asset: Asset,
    pub amount: Amount,
    pub unlock_time: Timestamp,
}

/// Claim hash committed against a deposit (commit-reveal first step)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimCommitted {
    pub deposit_id: DepositId,
    pub claimant: Address,
    pub claim_hash: Hash32,
}

/// How a claim was authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimMethod {
    Passphrase,
    Reveal,
    Signature,
}

/// Deposit paid out to a claimant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claimed {
    pub deposit_id: DepositId,
    /// Account that submitted the paying transaction
    pub claimant: Address,
    /// Account that received the funds
    pub recipient: Address,
    pub asset: Asset,
    pub amount: Amount,
    pub method: ClaimMethod,
}

/// Deposit returned to its depositor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refunded {
    pub deposit_id: DepositId,
    pub depositor: Address,
    pub asset: Asset,
    pub amount: Amount,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    DepositCreated(DepositCreated),
    ClaimCommitted(ClaimCommitted),
    Claimed(Claimed),
    Refunded(Refunded),
}

impl ContractEvent {
    pub fn deposit_id(&self) -> &DepositId {
        match self {
            ContractEvent::DepositCreated(e) => &e.deposit_id,
            ContractEvent::ClaimCommitted(e) => &e.deposit_id,
            ContractEvent::Claimed(e) => &e.deposit_id,
            ContractEvent::Refunded(e) => &e.deposit_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> DepositId {
        DepositId::from_hash(Hash32::from_bytes([1; 32]))
    }

    #[test]
    fn test_deposit_created_serialization() {
        let event = DepositCreated {
            deposit_id: id(),
            depositor: Address::from_bytes([2; 20]),
            asset: Asset::Native,
            amount: 10,
            unlock_time: 3600,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: DepositCreated = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_claimed_method_serialization() {
        let event = ContractEvent::Claimed(Claimed {
            deposit_id: id(),
            claimant: Address::from_bytes([3; 20]),
            recipient: Address::from_bytes([4; 20]),
            asset: Asset::Token(Address::from_bytes([5; 20])),
            amount: 7,
            method: ClaimMethod::Reveal,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"reveal\""));
        let deser: ContractEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_event_deposit_id_accessor() {
        let event = ContractEvent::Refunded(Refunded {
            deposit_id: id(),
            depositor: Address::from_bytes([2; 20]),
            asset: Asset::Native,
            amount: 1,
        });
        assert_eq!(event.deposit_id(), &id());
    }
}
