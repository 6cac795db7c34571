//! Position records: a holder's balance in one asset id of one pool.

use num_bigint::BigUint;
use serde::Serialize;

use super::asset_id::{AssetId, Category, UnknownCategory};
use super::primitives::{biguint_string, Address};

/// A (holder, asset id, balance) triple as observed on chain, before the
/// asset id has been classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawPosition {
    pub holder: Address,
    pub asset_id: AssetId,
    #[serde(with = "biguint_string")]
    pub balance: BigUint,
}

impl RawPosition {
    pub fn new(holder: Address, asset_id: AssetId, balance: BigUint) -> Self {
        Self {
            holder,
            asset_id,
            balance,
        }
    }
}

/// A classified position: the asset id decoded into trade type and maturity.
///
/// Constructed fresh per computation run; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub holder: Address,
    pub category: Category,
    /// Maturity timestamp from the low 248 bits of the asset id
    /// (zero for LP and withdrawal shares).
    #[serde(with = "biguint_string")]
    pub maturity_timestamp: BigUint,
    #[serde(with = "biguint_string")]
    pub balance: BigUint,
}

impl Position {
    /// Classify a raw position.
    ///
    /// # Errors
    /// Returns `UnknownCategory` when the asset id prefix is outside the
    /// known trade types.
    pub fn from_raw(raw: RawPosition) -> Result<Self, UnknownCategory> {
        let (category, maturity_timestamp) = raw.asset_id.classify()?;
        Ok(Position {
            holder: raw.holder,
            category,
            maturity_timestamp,
            balance: raw.balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_classifies() {
        let raw = RawPosition::new(
            Address::new("0xabc"),
            AssetId::encode(2, &BigUint::from(1_700_000_000u64)),
            BigUint::from(42u8),
        );
        let position = Position::from_raw(raw).unwrap();
        assert_eq!(position.category, Category::Short);
        assert_eq!(position.maturity_timestamp, BigUint::from(1_700_000_000u64));
        assert_eq!(position.balance, BigUint::from(42u8));
    }

    #[test]
    fn test_from_raw_surfaces_unknown_prefix() {
        let raw = RawPosition::new(
            Address::new("0xabc"),
            AssetId::encode(9, &BigUint::from(0u8)),
            BigUint::from(10u8),
        );
        let err = Position::from_raw(raw).unwrap_err();
        assert_eq!(err, UnknownCategory(9));
    }
}
