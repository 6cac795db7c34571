//! Final per-holder reward table for one pool, with aggregate checks.

use chrono::{DateTime, TimeZone, Utc};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{
    primitives::biguint_string, Address, BlockRef, Category, Dec, PoolId, RewardableTotals,
};
use crate::engine::allocator::{AllocationOutcome, RejectedPosition};

/// A pool whose allocator output disagrees with its rewardable totals.
/// Reported per pool; a multi-pool run keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("inconsistent pool data: {0}")]
pub struct ReportError(pub String);

/// One row of the final table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub holder: Address,
    pub category: Category,
    #[serde(with = "biguint_string")]
    pub maturity_timestamp: BigUint,
    /// UTC rendering of the maturity timestamp when it fits the calendar
    /// range; None for LP-style ids (timestamp zero) and out-of-range values.
    pub maturity_time: Option<DateTime<Utc>>,
    #[serde(with = "biguint_string")]
    pub balance: BigUint,
    #[serde(with = "biguint_string")]
    pub share: BigUint,
}

/// Assembled reward report for one pool snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolReport {
    pub pool: PoolId,
    pub block: BlockRef,
    pub rows: Vec<ReportRow>,
    pub totals: RewardableTotals,
    #[serde(with = "biguint_string")]
    pub total_balance: BigUint,
    #[serde(with = "biguint_string")]
    pub total_share: BigUint,
    /// Spot annualized rate; None when the rate model failed for a reason
    /// that does not invalidate the allocation itself.
    pub annualized_rate: Option<Dec>,
    pub rejected: Vec<RejectedPosition>,
}

/// Build the report for one pool and run the aggregate checks.
///
/// # Errors
/// Returns `ReportError` when the summed shares disagree with the totals,
/// or when a positive rewardable pool produced no shares at all.
pub fn assemble(
    pool: PoolId,
    block: BlockRef,
    outcome: AllocationOutcome,
    totals: RewardableTotals,
    annualized_rate: Option<Dec>,
) -> Result<PoolReport, ReportError> {
    let rows: Vec<ReportRow> = outcome
        .shares
        .into_iter()
        .map(|s| ReportRow {
            holder: s.position.holder,
            category: s.position.category,
            maturity_time: render_maturity(&s.position.maturity_timestamp),
            maturity_timestamp: s.position.maturity_timestamp,
            balance: s.position.balance,
            share: s.share,
        })
        .collect();

    let total_balance: BigUint = rows.iter().map(|r| r.balance.clone()).sum();
    let total_share: BigUint = rows.iter().map(|r| r.share.clone()).sum();

    let expected = totals.combined();
    if total_share != expected {
        return Err(ReportError(format!(
            "total share {} != combined rewardable totals {}",
            total_share, expected
        )));
    }
    if !expected.is_zero() && total_share.is_zero() {
        return Err(ReportError(
            "positive rewardable totals but zero total share".to_string(),
        ));
    }

    Ok(PoolReport {
        pool,
        block,
        rows,
        totals,
        total_balance,
        total_share,
        annualized_rate,
        rejected: outcome.rejected,
    })
}

/// Timestamp-to-datetime rendering. Zero means "no maturity" (LP and
/// withdrawal-share ids), and anything beyond i64 seconds is left raw.
fn render_maturity(timestamp: &BigUint) -> Option<DateTime<Utc>> {
    if timestamp.is_zero() {
        return None;
    }
    let secs = timestamp.to_i64()?;
    Utc.timestamp_opt(secs, 0).single()
}
