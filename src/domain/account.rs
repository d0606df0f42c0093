//! Holder, owner and validator identities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an account interacting with the vault.
///
/// Share holders, spenders, the owner and validators are all `AccountId`s.
/// Any 32-byte value is a valid identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Creates an `AccountId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in &self.0[..4] {
            write!(f, "{b:02x}")?;
        }
        write!(f, "..")
    }
}

/// Envelope the host supplies with every call: who is calling, and when.
///
/// `timestamp` is compared against caller deadlines; it is seconds on the
/// host's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallContext {
    /// The calling account.
    pub caller: AccountId,
    /// Current host time.
    pub timestamp: u64,
}

impl CallContext {
    /// Creates a context for `caller` at `timestamp`.
    #[must_use]
    pub const fn new(caller: AccountId, timestamp: u64) -> Self {
        Self { caller, timestamp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_round_trip_and_order() {
        let a = AccountId::from_bytes([1u8; 32]);
        let b = AccountId::from_bytes([2u8; 32]);
        assert_eq!(a.as_bytes(), [1u8; 32]);
        assert!(a < b);
    }

    #[test]
    fn context_carries_caller_and_time() {
        let who = AccountId::from_bytes([5u8; 32]);
        let ctx = CallContext::new(who, 1_700_000_000);
        assert_eq!(ctx.caller, who);
        assert_eq!(ctx.timestamp, 1_700_000_000);
    }
}
