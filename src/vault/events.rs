//! Journal of completed vault operations.

use crate::domain::{AccountId, Amount, AmountPair, PositionId};

/// A record appended by every successful entry point.
///
/// Failed calls append nothing; the host drains the journal with
/// [`Vault::take_events`](super::Vault::take_events).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    /// Shares minted against a deposit.
    Deposited {
        /// Depositor.
        account: AccountId,
        /// Shares minted.
        shares: Amount,
        /// Assets deployed.
        amounts: AmountPair,
    },
    /// Shares burned for a withdrawal.
    Withdrawn {
        /// Withdrawer.
        account: AccountId,
        /// Shares burned.
        shares: Amount,
        /// Assets paid out.
        amounts: AmountPair,
    },
    /// Fees collected and redeployed.
    Reinvested {
        /// Fees collected from the positions.
        collected: AmountPair,
        /// Assets deployed back into the positions.
        deployed: AmountPair,
    },
    /// Position set migrated to new ranges.
    Rebalanced {
        /// Handles closed.
        closed: Vec<PositionId>,
        /// Assets deployed into the new positions.
        deployed: AmountPair,
        /// Assets left idle.
        residual: AmountPair,
    },
    /// Validator membership changed.
    ValidatorUpdated {
        /// Affected account.
        account: AccountId,
        /// New membership.
        enabled: bool,
    },
    /// Shares moved between holders.
    Transfer {
        /// Sender.
        from: AccountId,
        /// Recipient.
        to: AccountId,
        /// Shares moved.
        amount: Amount,
    },
    /// Allowance set.
    Approval {
        /// Share owner.
        owner: AccountId,
        /// Approved spender.
        spender: AccountId,
        /// New allowance.
        amount: Amount,
    },
}
