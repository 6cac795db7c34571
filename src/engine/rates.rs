//! Spot price and annualized rate from pool reserves.
//!
//! Derivation of the price formula:
//!     p = (y / (mu * (z - zeta))) ^ -t_s
//!       = ((mu * (z - zeta)) / y) ^ t_s
//!       = (mu * z_effective / y) ^ t_s
//! with mu = initial vault share price, z = share reserves, zeta = share
//! adjustment, y = bond reserves, t_s = time stretch. The share and bond
//! reserves enter at the same 1e18 scale, so only mu and t_s are rescaled.

use num_bigint::BigInt;
use thiserror::Error;
use tracing::debug;

use crate::domain::{Dec, DecimalError, PoolConfig, PoolInfo};

/// Seconds in a 365-day year.
const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

/// Rate computation failures, surfaced per pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    #[error("division by zero: {0}")]
    DivisionByZero(&'static str),
    /// Reserve accounting that the price formula cannot represent, e.g. a
    /// share adjustment exceeding share reserves.
    #[error("degenerate pool state: {0}")]
    DegeneratePoolState(String),
}

impl From<DecimalError> for RateError {
    fn from(err: DecimalError) -> Self {
        RateError::DegeneratePoolState(err.to_string())
    }
}

/// Share reserves net of the zeta adjustment. Signed: the adjustment can
/// exceed reserves in a degenerate pool, which callers must surface rather
/// than wrap around.
pub fn effective_share_reserves(info: &PoolInfo) -> BigInt {
    BigInt::from(info.share_reserves.clone()) - &info.share_adjustment
}

/// Spot price of a bond in the pool, in the real domain.
///
/// # Errors
/// `DivisionByZero` when bond reserves are zero; `DegeneratePoolState`
/// when effective share reserves are not positive.
pub fn spot_price(config: &PoolConfig, info: &PoolInfo) -> Result<Dec, RateError> {
    use num_traits::Zero;

    if info.bond_reserves.is_zero() {
        return Err(RateError::DivisionByZero("bond reserves"));
    }
    let z_effective = effective_share_reserves(info);
    if z_effective <= BigInt::zero() {
        return Err(RateError::DegeneratePoolState(format!(
            "effective share reserves {} not positive",
            z_effective
        )));
    }

    let mu = Dec::from_wei(&config.initial_vault_share_price);
    let time_stretch = Dec::from_wei(&config.time_stretch);
    let ratio = mu * Dec::from_bigint(&z_effective) / Dec::from_biguint(&info.bond_reserves);
    let price = ratio.pow(&time_stretch)?;
    debug!(%price, "computed spot price");
    Ok(price)
}

/// Annualized rate implied by a spot price: r = (1 - p) / (p * t).
///
/// # Errors
/// `DivisionByZero` when the price or duration is zero.
pub fn annualized_rate_from_price(price: &Dec, position_duration: u64) -> Result<Dec, RateError> {
    if price.is_zero() {
        return Err(RateError::DivisionByZero("spot price"));
    }
    if position_duration == 0 {
        return Err(RateError::DivisionByZero("position duration"));
    }
    let t = Dec::from(position_duration) / Dec::from(SECONDS_PER_YEAR);
    Ok((Dec::one() - price.clone()) / (price.clone() * t))
}

/// Spot annualized rate of the pool from its config and info.
pub fn annualized_rate(config: &PoolConfig, info: &PoolInfo) -> Result<Dec, RateError> {
    let price = spot_price(config, info)?;
    annualized_rate_from_price(&price, config.position_duration)
}
