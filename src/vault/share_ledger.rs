//! Fungible share balances, allowances and supply.
//!
//! The ledger is pure accounting. It keeps `Σ balances == total_supply`
//! after every method, and each method either applies completely or returns
//! an error without touching state.

use std::collections::BTreeMap;

use crate::domain::{AccountId, Amount};
use crate::error::VaultError;
use crate::math::CheckedArithmetic;

/// Share-token state: metadata, balances, allowances and supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLedger {
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: Amount,
    balances: BTreeMap<AccountId, Amount>,
    allowances: BTreeMap<(AccountId, AccountId), Amount>,
}

impl ShareLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            total_supply: Amount::ZERO,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    /// Token name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Token decimals.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Total shares outstanding.
    #[must_use]
    pub const fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Shares held by `account`; zero for unknown accounts.
    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Remaining shares `spender` may move on behalf of `owner`.
    #[must_use]
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Number of accounts that have ever held shares.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Creates `amount` shares for `to`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] if the supply would overflow.
    pub fn mint(&mut self, to: AccountId, amount: Amount) -> Result<(), VaultError> {
        let supply = self.total_supply.safe_add(&amount)?;
        let balance = self.balance_of(&to).safe_add(&amount)?;
        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    /// Destroys `amount` of `from`'s shares.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InsufficientShares`] if `from` holds fewer.
    pub fn burn(&mut self, from: AccountId, amount: Amount) -> Result<(), VaultError> {
        let balance = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(VaultError::InsufficientShares)?;
        let supply = self.total_supply.safe_sub(&amount)?;
        self.balances.insert(from, balance);
        self.total_supply = supply;
        Ok(())
    }

    /// Moves `amount` shares from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InsufficientShares`] if `from` holds fewer.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), VaultError> {
        let from_balance = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(VaultError::InsufficientShares)?;
        self.balances.insert(from, from_balance);
        // reads after the debit so self-transfers net out
        let to_balance = self.balance_of(&to).safe_add(&amount)?;
        self.balances.insert(to, to_balance);
        Ok(())
    }

    /// Sets `spender`'s allowance over `owner`'s shares, replacing any
    /// previous value.
    pub fn approve(&mut self, owner: AccountId, spender: AccountId, amount: Amount) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Moves `amount` shares from `from` to `to` on behalf of `spender`,
    /// consuming allowance.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InsufficientAllowance`] if the allowance is short.
    /// - [`VaultError::InsufficientShares`] if `from` holds fewer.
    pub fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), VaultError> {
        let remaining = self
            .allowance(&from, &spender)
            .checked_sub(&amount)
            .ok_or(VaultError::InsufficientAllowance)?;
        self.transfer(from, to, amount)?;
        self.allowances.insert((from, spender), remaining);
        Ok(())
    }

    /// Sum of all balances; equals [`total_supply`](Self::total_supply).
    #[must_use]
    pub fn balance_sum(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(b))
    }
}
