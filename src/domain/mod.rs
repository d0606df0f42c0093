//! Value types shared by the vault engine and its pool adapters.
//!
//! Quantities (`Amount`, `Liquidity`), identities (`AssetId`, `AccountId`,
//! `PositionId`), price coordinates (`Tick`, `TickRange`) and the weighted
//! `PositionSlot`. Newtypes with validated constructors keep the invariants
//! at the edges so the engine can assume them.

mod account;
mod amount;
mod amount_pair;
mod asset;
mod basis_points;
mod fee_tier;
mod liquidity;
mod position;
mod rounding;
mod tick;

pub use account::{AccountId, CallContext};
pub use amount::Amount;
pub use amount_pair::AmountPair;
pub use asset::{AssetId, AssetPair, Side};
pub use basis_points::BasisPoints;
pub use fee_tier::FeeTier;
pub(crate) use fee_tier::PIPS_DENOMINATOR;
pub use liquidity::Liquidity;
pub use position::{PositionId, PositionSlot};
pub use rounding::Rounding;
pub use tick::{Tick, TickRange};
