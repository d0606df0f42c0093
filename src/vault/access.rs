//! Owner and validator roles.

use std::collections::BTreeSet;

use crate::domain::AccountId;
use crate::error::VaultError;

/// Role state consulted by privileged vault operations.
///
/// The owner is fixed at construction. Only the owner may change the
/// validator set or rebalance; only validators may trigger reinvest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    owner: AccountId,
    validators: BTreeSet<AccountId>,
}

impl AccessPolicy {
    /// Creates a policy with an initial validator set.
    #[must_use]
    pub fn new(owner: AccountId, validators: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            owner,
            validators: validators.into_iter().collect(),
        }
    }

    /// The owner.
    #[must_use]
    pub const fn owner(&self) -> AccountId {
        self.owner
    }

    /// Returns `true` if `account` is a validator.
    #[must_use]
    pub fn is_validator(&self, account: &AccountId) -> bool {
        self.validators.contains(account)
    }

    /// Current validators in ascending order.
    pub fn validators(&self) -> impl Iterator<Item = &AccountId> {
        self.validators.iter()
    }

    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] unless `caller` is the owner.
    pub fn require_owner(&self, caller: &AccountId) -> Result<(), VaultError> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(VaultError::Unauthorized)
        }
    }

    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] unless `caller` is a validator.
    pub fn require_validator(&self, caller: &AccountId) -> Result<(), VaultError> {
        if self.is_validator(caller) {
            Ok(())
        } else {
            Err(VaultError::Unauthorized)
        }
    }

    /// Adds or removes `account` from the validator set on behalf of
    /// `caller`. Returns `true` if membership changed.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] unless `caller` is the owner.
    pub fn set_validator(
        &mut self,
        caller: &AccountId,
        account: AccountId,
        enabled: bool,
    ) -> Result<bool, VaultError> {
        self.require_owner(caller)?;
        Ok(if enabled {
            self.validators.insert(account)
        } else {
            self.validators.remove(&account)
        })
    }
}
