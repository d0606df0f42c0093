//! Seams between the vault engine and the outside world.
//!
//! [`AmmAdapter`] is the pool capability the vault consumes,
//! [`PositionRegistry`] reports position state, and [`FromConfig`]
//! builds configured components.

mod amm_adapter;
mod from_config;
mod position_registry;

pub use amm_adapter::{AmmAdapter, PositionIncrease};
pub use from_config::FromConfig;
pub use position_registry::PositionRegistry;
