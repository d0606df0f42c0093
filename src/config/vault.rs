//! Vault blueprint: share-token metadata, pool identity, roles and slots.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    AccountId, Amount, AssetPair, BasisPoints, FeeTier, PositionSlot, Side, TickRange,
};
use crate::error::VaultError;

/// Default share-token decimals.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Default tolerance applied to the reinvest swap quote (1%).
pub const DEFAULT_MAX_SWAP_SLIPPAGE: BasisPoints = BasisPoints::new(100);

const fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

const fn default_max_swap_slippage() -> BasisPoints {
    DEFAULT_MAX_SWAP_SLIPPAGE
}

/// One weighted range as written in a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Lower tick of the range (inclusive).
    pub tick_lower: i32,
    /// Upper tick of the range (exclusive).
    pub tick_upper: i32,
    /// Relative weight, positive.
    pub weight: u32,
}

impl SlotConfig {
    /// Creates a slot description.
    #[must_use]
    pub const fn new(tick_lower: i32, tick_upper: i32, weight: u32) -> Self {
        Self {
            tick_lower,
            tick_upper,
            weight,
        }
    }

    /// Converts into an empty [`PositionSlot`].
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfiguration`] for an out-of-bounds
    /// or inverted range, or a zero weight.
    pub fn to_slot(&self) -> Result<PositionSlot, VaultError> {
        let range = TickRange::from_indices(self.tick_lower, self.tick_upper).map_err(|e| {
            match e {
                VaultError::InvalidTick(_) => {
                    VaultError::InvalidConfiguration("slot tick out of bounds")
                }
                _ => VaultError::InvalidConfiguration("slot lower tick must be below upper tick"),
            }
        })?;
        PositionSlot::new(range, self.weight)
    }
}

/// Validates a slot set and builds empty [`PositionSlot`]s from it.
///
/// # Errors
///
/// Returns [`VaultError::InvalidConfiguration`] if the set is empty or any
/// slot is malformed.
pub fn build_slots(slots: &[SlotConfig]) -> Result<Vec<PositionSlot>, VaultError> {
    if slots.is_empty() {
        return Err(VaultError::InvalidConfiguration(
            "at least one position slot is required",
        ));
    }
    let built = slots
        .iter()
        .map(SlotConfig::to_slot)
        .collect::<Result<Vec<_>, _>>()?;
    let total: u64 = built.iter().map(|s| u64::from(s.weight())).sum();
    if total == 0 {
        return Err(VaultError::InvalidConfiguration("total slot weight must be nonzero"));
    }
    Ok(built)
}

/// Configuration for a [`Vault`](crate::vault::Vault).
///
/// Loadable from JSON; optional fields take their defaults:
///
/// ```
/// use cellar_vault::config::VaultConfig;
///
/// let json = r#"{
///     "name": "Cellar ETH/USDC",
///     "symbol": "CLR",
///     "asset_pair": { "asset0": [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
///                     "asset1": [2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2] },
///     "fee_tier": 3000,
///     "owner": [9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9],
///     "slots": [ { "tick_lower": -600, "tick_upper": 600, "weight": 1 } ]
/// }"#;
/// let config: VaultConfig = serde_json::from_str(json).expect("parses");
/// assert_eq!(config.decimals, 18);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Validation
///
/// - `name` and `symbol` are non-empty.
/// - At least one slot; every slot has `tick_lower < tick_upper` within
///   tick bounds and a positive weight.
/// - `max_swap_slippage` is at most 100%.
/// - `deposit_cap`, when set, is nonzero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Share-token name.
    pub name: String,
    /// Share-token symbol.
    pub symbol: String,
    /// Share-token decimals.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Assets of the managed pool.
    pub asset_pair: AssetPair,
    /// Fee tier of the managed pool.
    pub fee_tier: FeeTier,
    /// Immutable privileged account.
    pub owner: AccountId,
    /// Accounts allowed to trigger reinvest at construction.
    #[serde(default)]
    pub validators: Vec<AccountId>,
    /// Weighted ranges.
    pub slots: Vec<SlotConfig>,
    /// NAV ceiling in asset1 units; deposits beyond it are rejected.
    #[serde(default)]
    pub deposit_cap: Option<Amount>,
    /// Leg that can be paid and withdrawn in native form.
    #[serde(default)]
    pub native_side: Option<Side>,
    /// Tolerance below the spot quote accepted by the reinvest swap.
    #[serde(default = "default_max_swap_slippage")]
    pub max_swap_slippage: BasisPoints,
}

impl VaultConfig {
    /// Creates a config with default decimals and slippage, no validators,
    /// no cap and no native side.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        asset_pair: AssetPair,
        fee_tier: FeeTier,
        owner: AccountId,
        slots: Vec<SlotConfig>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: DEFAULT_DECIMALS,
            asset_pair,
            fee_tier,
            owner,
            validators: Vec::new(),
            slots,
            deposit_cap: None,
            native_side: None,
            max_swap_slippage: DEFAULT_MAX_SWAP_SLIPPAGE,
        }
    }

    /// Adds an initial validator.
    #[must_use]
    pub fn with_validator(mut self, validator: AccountId) -> Self {
        self.validators.push(validator);
        self
    }

    /// Sets the deposit cap.
    #[must_use]
    pub const fn with_deposit_cap(mut self, cap: Amount) -> Self {
        self.deposit_cap = Some(cap);
        self
    }

    /// Enables native settlement on `side`.
    #[must_use]
    pub const fn with_native_side(mut self, side: Side) -> Self {
        self.native_side = Some(side);
        self
    }

    /// Sets the reinvest swap tolerance.
    #[must_use]
    pub const fn with_max_swap_slippage(mut self, slippage: BasisPoints) -> Self {
        self.max_swap_slippage = slippage;
        self
    }

    /// Parses a config from JSON and validates it.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidConfiguration`] if the JSON does not parse or
    ///   the parsed config is invalid.
    pub fn from_json(json: &str) -> Result<Self, VaultError> {
        let config: Self = serde_json::from_str(json).map_err(|error| {
            debug!(%error, line = error.line(), column = error.column(), "vault config JSON rejected");
            VaultError::InvalidConfiguration("malformed vault config JSON")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfiguration`] naming the first
    /// violated rule.
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.name.trim().is_empty() {
            return Err(VaultError::InvalidConfiguration("share name must not be empty"));
        }
        if self.symbol.trim().is_empty() {
            return Err(VaultError::InvalidConfiguration("share symbol must not be empty"));
        }
        if !self.fee_tier.is_valid() {
            return Err(VaultError::InvalidConfiguration("fee tier must be below 100%"));
        }
        if !self.max_swap_slippage.is_valid_percent() {
            return Err(VaultError::InvalidConfiguration(
                "swap slippage must not exceed 10000 basis points",
            ));
        }
        if self.deposit_cap.is_some_and(|cap| cap.is_zero()) {
            return Err(VaultError::InvalidConfiguration("deposit cap must be nonzero"));
        }
        build_slots(&self.slots)?;
        Ok(())
    }
}
