//! Asset identities and the ordered pair a vault trades.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;

/// Chain-agnostic identity of a fungible asset (token address).
///
/// # Examples
///
/// ```
/// use cellar_vault::domain::AssetId;
///
/// let usdc = AssetId::from_bytes([1u8; 32]);
/// assert_eq!(usdc.as_bytes(), [1u8; 32]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId([u8; 32]);

impl AssetId {
    /// Creates an `AssetId` from raw bytes.
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

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in &self.0[..4] {
            write!(f, "{b:02x}")?;
        }
        write!(f, "..")
    }
}

/// One leg of an [`AssetPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// `asset0`, the lower-ordered asset.
    Zero,
    /// `asset1`, the reference asset NAV is quoted in.
    One,
}

impl Side {
    /// The opposite leg.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }
}

/// Two distinct assets in canonical order (`asset0 < asset1`).
///
/// Prices are quoted as asset1 per asset0, and NAV is denominated in
/// asset1.
///
/// # Examples
///
/// ```
/// use cellar_vault::domain::{AssetId, AssetPair};
///
/// let a = AssetId::from_bytes([1u8; 32]);
/// let b = AssetId::from_bytes([2u8; 32]);
/// let pair = AssetPair::new(b, a).expect("distinct assets");
/// assert_eq!(pair.asset0(), a);
/// assert_eq!(pair.asset1(), b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPair", into = "RawPair")]
pub struct AssetPair {
    asset0: AssetId,
    asset1: AssetId,
}

#[derive(Serialize, Deserialize)]
struct RawPair {
    asset0: AssetId,
    asset1: AssetId,
}

impl AssetPair {
    /// Creates a canonically ordered pair.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidToken`] if both identities are equal.
    pub fn new(first: AssetId, second: AssetId) -> crate::error::Result<Self> {
        if first == second {
            return Err(VaultError::InvalidToken(
                "asset pair requires two distinct assets",
            ));
        }
        let (asset0, asset1) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        Ok(Self { asset0, asset1 })
    }

    /// Lower-ordered asset.
    #[must_use]
    pub const fn asset0(&self) -> AssetId {
        self.asset0
    }

    /// Higher-ordered asset; the reference asset.
    #[must_use]
    pub const fn asset1(&self) -> AssetId {
        self.asset1
    }

    /// Returns the asset on `side`.
    #[must_use]
    pub const fn asset(&self, side: Side) -> AssetId {
        match side {
            Side::Zero => self.asset0,
            Side::One => self.asset1,
        }
    }

    /// Returns which side `asset` is on.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidToken`] if `asset` is not in the pair.
    pub fn side_of(&self, asset: AssetId) -> crate::error::Result<Side> {
        if asset == self.asset0 {
            Ok(Side::Zero)
        } else if asset == self.asset1 {
            Ok(Side::One)
        } else {
            Err(VaultError::InvalidToken("asset is not part of this pair"))
        }
    }
}

impl TryFrom<RawPair> for AssetPair {
    type Error = VaultError;

    fn try_from(raw: RawPair) -> Result<Self, Self::Error> {
        let pair = Self::new(raw.asset0, raw.asset1)?;
        if pair.asset0 != raw.asset0 {
            return Err(VaultError::InvalidToken("asset pair is not in canonical order"));
        }
        Ok(pair)
    }
}

impl From<AssetPair> for RawPair {
    fn from(pair: AssetPair) -> Self {
        Self {
            asset0: pair.asset0,
            asset1: pair.asset1,
        }
    }
}
