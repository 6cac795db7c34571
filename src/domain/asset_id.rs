//! Packed position identifier codec.
//!
//! Hyperdrive encodes every position kind as a single uint256 asset id:
//! the top 8 bits carry the trade-type prefix, the low 248 bits carry the
//! position's maturity timestamp. LP and withdrawal-share ids have a zero
//! timestamp.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of bits reserved for the maturity timestamp.
const TIMESTAMP_BITS: u32 = 248;

/// Trade-type classification of a position.
///
/// The set is fixed by the protocol; a new prefix value is a breaking
/// protocol change, not a runtime concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Lp = 0,
    Long = 1,
    Short = 2,
    WithdrawalShare = 3,
}

/// An asset id prefix outside the known trade types.
///
/// This is a data-integrity fault to surface, never silently coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown category prefix {0}")]
pub struct UnknownCategory(pub u8);

impl Category {
    /// All categories in prefix order.
    pub const ALL: [Category; 4] = [
        Category::Lp,
        Category::Long,
        Category::Short,
        Category::WithdrawalShare,
    ];

    /// The 8-bit prefix value of this category.
    pub fn prefix(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Category {
    type Error = UnknownCategory;

    fn try_from(prefix: u8) -> Result<Self, UnknownCategory> {
        match prefix {
            0 => Ok(Category::Lp),
            1 => Ok(Category::Long),
            2 => Ok(Category::Short),
            3 => Ok(Category::WithdrawalShare),
            other => Err(UnknownCategory(other)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Lp => "LP",
            Category::Long => "LONG",
            Category::Short => "SHORT",
            Category::WithdrawalShare => "WITHDRAWAL_SHARE",
        };
        write!(f, "{}", name)
    }
}

/// An asset id wider than 256 bits cannot come from the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("asset id wider than 256 bits: {0} bits")]
pub struct AssetIdOverflow(pub u64);

/// Failure to parse an asset id from its hex form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetIdParseError {
    #[error("invalid hex literal")]
    InvalidHex,
    #[error(transparent)]
    Overflow(#[from] AssetIdOverflow),
}

/// A packed 256-bit position identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(BigUint);

impl AssetId {
    /// Wrap a raw uint256 value.
    ///
    /// # Errors
    /// Returns `AssetIdOverflow` if the value needs more than 256 bits.
    pub fn new(raw: BigUint) -> Result<Self, AssetIdOverflow> {
        if raw.bits() > 256 {
            return Err(AssetIdOverflow(raw.bits()));
        }
        Ok(AssetId(raw))
    }

    /// Pack a prefix and timestamp into an asset id (fixtures and tests).
    ///
    /// The timestamp is masked to its low 248 bits.
    pub fn encode(prefix: u8, timestamp: &BigUint) -> Self {
        let packed = (BigUint::from(prefix) << TIMESTAMP_BITS) | (timestamp & timestamp_mask());
        AssetId(packed)
    }

    /// Split the id into its 8-bit prefix and 248-bit timestamp.
    ///
    /// Any 256-bit value decodes; prefix validation happens in `classify`.
    pub fn decode(&self) -> (u8, BigUint) {
        let prefix = (&self.0 >> TIMESTAMP_BITS)
            .to_u8()
            .unwrap_or(u8::MAX); // unreachable: 256-bit bound makes the shift fit u8
        let timestamp = &self.0 & timestamp_mask();
        (prefix, timestamp)
    }

    /// Decode and map the prefix onto a known trade type.
    ///
    /// # Errors
    /// Returns `UnknownCategory` for prefixes outside LP/LONG/SHORT/
    /// WITHDRAWAL_SHARE.
    pub fn classify(&self) -> Result<(Category, BigUint), UnknownCategory> {
        let (prefix, timestamp) = self.decode();
        let category = Category::try_from(prefix)?;
        Ok((category, timestamp))
    }

    /// The raw uint256 value.
    pub fn raw(&self) -> &BigUint {
        &self.0
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, AssetIdParseError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw =
            BigUint::parse_bytes(digits.as_bytes(), 16).ok_or(AssetIdParseError::InvalidHex)?;
        Ok(AssetId::new(raw)?)
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_zero() {
            write!(f, "0x0")
        } else {
            write!(f, "{:#x}", self.0)
        }
    }
}

impl Serialize for AssetId {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        AssetId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn timestamp_mask() -> BigUint {
    (BigUint::one() << TIMESTAMP_BITS) - BigUint::one()
}
