//! Pool snapshot inputs: configuration, live info, and rewardable totals.

use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::primitives::biguint_string;

/// Immutable pool configuration, read once per snapshot.
///
/// Fixed-point fields carry their raw 1e18-scaled on-chain values; scaling
/// into the real domain happens in the rate model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(with = "biguint_string")]
    pub initial_vault_share_price: BigUint,
    #[serde(with = "biguint_string")]
    pub time_stretch: BigUint,
    /// Term length in seconds.
    pub position_duration: u64,
}

/// Live pool accounting state at the snapshot block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    #[serde(with = "biguint_string")]
    pub share_reserves: BigUint,
    /// Signed on chain; can exceed share reserves in a degenerate pool.
    pub share_adjustment: BigInt,
    #[serde(with = "biguint_string")]
    pub bond_reserves: BigUint,
    #[serde(with = "biguint_string")]
    pub shorts_outstanding: BigUint,
}

/// Shorts outstanding exceed the pool's vault share balance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("shorts outstanding {shorts} exceed vault shares balance {vault_shares}")]
pub struct TotalsUnderflow {
    pub vault_shares: BigUint,
    pub shorts: BigUint,
}

/// The authoritative reward-eligible aggregates for one pool snapshot.
///
/// `lp_rewardable` is shared by LP and withdrawal-share positions combined;
/// `short_rewardable` belongs to shorts alone. Longs receive nothing by
/// protocol rule. The allocator must make per-position shares sum to these
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardableTotals {
    #[serde(with = "biguint_string")]
    pub lp_rewardable: BigUint,
    #[serde(with = "biguint_string")]
    pub short_rewardable: BigUint,
}

impl RewardableTotals {
    pub fn new(lp_rewardable: BigUint, short_rewardable: BigUint) -> Self {
        Self {
            lp_rewardable,
            short_rewardable,
        }
    }

    /// Derive totals the way the protocol does: the short side gets
    /// `shortsOutstanding`, LPs get the rest of the vault share balance.
    ///
    /// # Errors
    /// Returns `TotalsUnderflow` when shorts exceed the vault balance.
    pub fn from_vault_shares(
        vault_shares_balance: &BigUint,
        shorts_outstanding: &BigUint,
    ) -> Result<Self, TotalsUnderflow> {
        if shorts_outstanding > vault_shares_balance {
            return Err(TotalsUnderflow {
                vault_shares: vault_shares_balance.clone(),
                shorts: shorts_outstanding.clone(),
            });
        }
        Ok(Self {
            lp_rewardable: vault_shares_balance - shorts_outstanding,
            short_rewardable: shorts_outstanding.clone(),
        })
    }

    /// Sum of both rewardable pools.
    pub fn combined(&self) -> BigUint {
        &self.lp_rewardable + &self.short_rewardable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn test_from_vault_shares_splits_totals() {
        let totals = RewardableTotals::from_vault_shares(&big(1_000), &big(300)).unwrap();
        assert_eq!(totals.lp_rewardable, big(700));
        assert_eq!(totals.short_rewardable, big(300));
        assert_eq!(totals.combined(), big(1_000));
    }

    #[test]
    fn test_from_vault_shares_underflow() {
        let err = RewardableTotals::from_vault_shares(&big(100), &big(300)).unwrap_err();
        assert_eq!(err.vault_shares, big(100));
        assert_eq!(err.shorts, big(300));
    }
}
