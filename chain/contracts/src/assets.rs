//! Asset transfer collaborator
//!
//! The vault never manipulates balances directly. It pulls funds into
//! custody and pays them out through an `AssetLedger`, which must apply each
//! transfer completely or not at all.

use std::collections::HashMap;

use types::ids::{Address, Amount, Asset};

use crate::errors::AssetError;

/// Transfer interface for native currency and fungible tokens.
pub trait AssetLedger {
    /// Pull `amount` of `asset` from `from` into custody.
    ///
    /// Token pulls consume the allowance `from` granted to the custodian.
    fn transfer_in(&mut self, asset: Asset, from: Address, amount: Amount) -> Result<(), AssetError>;

    /// Pay `amount` of `asset` out of custody to `to`.
    fn transfer_out(&mut self, asset: Asset, to: Address, amount: Amount) -> Result<(), AssetError>;

    /// Balance of `holder` in `asset`.
    fn balance_of(&self, asset: Asset, holder: Address) -> Amount;

    /// Account holding custodied funds.
    fn custodian(&self) -> Address;
}

/// In-memory ledger with native balances, token balances and allowances.
///
/// Behaves like a standard fungible token: `approve` overwrites the
/// allowance and custody pulls spend it.
#[derive(Debug, Clone)]
pub struct InMemoryAssets {
    custodian: Address,
    /// Balances: (asset, holder) -> amount
    balances: HashMap<(Asset, Address), Amount>,
    /// Allowances: (token, owner, spender) -> amount
    allowances: HashMap<(Asset, Address, Address), Amount>,
}

impl InMemoryAssets {
    pub fn new(custodian: Address) -> Self {
        Self {
            custodian,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// Credit `amount` of `asset` to `to` out of thin air.
    pub fn mint(&mut self, asset: Asset, to: Address, amount: Amount) -> Result<(), AssetError> {
        let current = self.balance_of(asset, to);
        let updated = current
            .checked_add(amount)
            .ok_or(AssetError::Overflow { asset })?;
        self.balances.insert((asset, to), updated);
        Ok(())
    }

    /// Set the allowance `owner` grants `spender`.
    pub fn approve(&mut self, asset: Asset, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((asset, owner, spender), amount);
    }

    pub fn allowance(&self, asset: Asset, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or(0)
    }

    /// Move funds between two holders.
    pub fn transfer(
        &mut self,
        asset: Asset,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AssetError> {
        let from_balance = self.balance_of(asset, from);
        if from_balance < amount {
            return Err(AssetError::InsufficientBalance {
                asset,
                holder: from,
                required: amount,
                available: from_balance,
            });
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(asset, to)
            .checked_add(amount)
            .ok_or(AssetError::Overflow { asset })?;

        self.balances.insert((asset, from), from_balance - amount);
        self.balances.insert((asset, to), to_balance);
        Ok(())
    }
}

impl AssetLedger for InMemoryAssets {
    fn transfer_in(&mut self, asset: Asset, from: Address, amount: Amount) -> Result<(), AssetError> {
        match asset {
            // Native value arrives with the call itself.
            Asset::Native => self.transfer(asset, from, self.custodian, amount),
            Asset::Token(_) => {
                let allowed = self.allowance(asset, from, self.custodian);
                if allowed < amount {
                    return Err(AssetError::InsufficientAllowance {
                        asset,
                        owner: from,
                        required: amount,
                        available: allowed,
                    });
                }
                self.transfer(asset, from, self.custodian, amount)?;
                self.allowances
                    .insert((asset, from, self.custodian), allowed - amount);
                Ok(())
            }
        }
    }

    fn transfer_out(&mut self, asset: Asset, to: Address, amount: Amount) -> Result<(), AssetError> {
        self.transfer(asset, self.custodian, to, amount)
    }

    fn balance_of(&self, asset: Asset, holder: Address) -> Amount {
        self.balances.get(&(asset, holder)).copied().unwrap_or(0)
    }

    fn custodian(&self) -> Address {
        self.custodian
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: Address = Address::from_bytes([0xee; 20]);
    const ALICE: Address = Address::from_bytes([0xa1; 20]);
    const BOB: Address = Address::from_bytes([0xb0; 20]);

    fn token() -> Asset {
        Asset::Token(Address::from_bytes([0x70; 20]))
    }

    #[test]
    fn test_mint_and_balance() {
        let mut assets = InMemoryAssets::new(VAULT);
        assets.mint(token(), ALICE, 100).unwrap();
        assert_eq!(assets.balance_of(token(), ALICE), 100);
        assert_eq!(assets.balance_of(Asset::Native, ALICE), 0);
    }

    #[test]
    fn test_mint_overflow() {
        let mut assets = InMemoryAssets::new(VAULT);
        assets.mint(token(), ALICE, Amount::MAX).unwrap();
        let result = assets.mint(token(), ALICE, 1);
        assert_eq!(result, Err(AssetError::Overflow { asset: token() }));
        assert_eq!(assets.balance_of(token(), ALICE), Amount::MAX);
    }

    #[test]
    fn test_token_transfer_in_requires_allowance() {
        let mut assets = InMemoryAssets::new(VAULT);
        assets.mint(token(), ALICE, 100).unwrap();

        let result = assets.transfer_in(token(), ALICE, 10);
        assert!(matches!(
            result,
            Err(AssetError::InsufficientAllowance { available: 0, .. })
        ));
        assert_eq!(assets.balance_of(token(), ALICE), 100);
    }

    #[test]
    fn test_token_transfer_in_spends_allowance() {
        let mut assets = InMemoryAssets::new(VAULT);
        assets.mint(token(), ALICE, 100).unwrap();
        assets.approve(token(), ALICE, VAULT, 50);

        assets.transfer_in(token(), ALICE, 30).unwrap();
        assert_eq!(assets.balance_of(token(), ALICE), 70);
        assert_eq!(assets.balance_of(token(), VAULT), 30);
        assert_eq!(assets.allowance(token(), ALICE, VAULT), 20);
    }

    #[test]
    fn test_token_transfer_in_insufficient_balance_keeps_allowance() {
        let mut assets = InMemoryAssets::new(VAULT);
        assets.mint(token(), ALICE, 5).unwrap();
        assets.approve(token(), ALICE, VAULT, 50);

        let result = assets.transfer_in(token(), ALICE, 10);
        assert!(matches!(result, Err(AssetError::InsufficientBalance { .. })));
        assert_eq!(assets.allowance(token(), ALICE, VAULT), 50);
        assert_eq!(assets.balance_of(token(), VAULT), 0);
    }

    #[test]
    fn test_native_transfer_in_needs_no_allowance() {
        let mut assets = InMemoryAssets::new(VAULT);
        assets.mint(Asset::Native, ALICE, 10).unwrap();
        assets.transfer_in(Asset::Native, ALICE, 10).unwrap();
        assert_eq!(assets.balance_of(Asset::Native, VAULT), 10);
        assert_eq!(assets.balance_of(Asset::Native, ALICE), 0);
    }

    #[test]
    fn test_transfer_out() {
        let mut assets = InMemoryAssets::new(VAULT);
        assets.mint(token(), VAULT, 10).unwrap();
        assets.transfer_out(token(), BOB, 4).unwrap();
        assert_eq!(assets.balance_of(token(), VAULT), 6);
        assert_eq!(assets.balance_of(token(), BOB), 4);
    }

    #[test]
    fn test_transfer_out_insufficient_custody() {
        let mut assets = InMemoryAssets::new(VAULT);
        let result = assets.transfer_out(token(), BOB, 1);
        assert!(matches!(result, Err(AssetError::InsufficientBalance { .. })));
    }
}
