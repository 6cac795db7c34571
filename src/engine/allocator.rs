//! Proportional apportionment of rewardable totals across positions.
//!
//! Each reward group's total is split pro rata by balance with floor
//! division, then a single correction moves the truncation remainder onto
//! the group's largest position. Largest-remainder style allocation keeps
//! the distortion on one holder and lets the group sum match the
//! authoritative total to the last unit.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Category, Position, RawPosition, RewardableTotals, UnknownCategory};

/// Allocation failures. Both indicate broken inputs or broken logic, never
/// a condition to paper over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    /// The correction pass could not restore exact equality between summed
    /// shares and the rewardable total.
    #[error("allocation invariant violated: {0}")]
    InvariantViolation(String),
}

/// One position with its apportioned share of the group's rewardable total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionShare {
    #[serde(flatten)]
    pub position: Position,
    #[serde(with = "crate::domain::primitives::biguint_string")]
    pub share: BigUint,
}

/// A raw position whose asset id failed to classify. Surfaced so callers
/// can log or abort; the rest of the batch still allocates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedPosition {
    pub raw: RawPosition,
    pub reason: String,
}

/// Output of `compute_allocations`: allocated shares plus any positions
/// rejected during classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub shares: Vec<PositionShare>,
    pub rejected: Vec<RejectedPosition>,
}

/// Reward groups, data driven: the categories pooled together and the
/// accessor for their shared rewardable total.
///
/// LP and withdrawal shares split `lp_rewardable` over their combined
/// balances; shorts split `short_rewardable` alone. Longs are in no group
/// and always get zero (they carry no exposure to the rewarded rate).
const REWARD_GROUPS: [RewardGroup; 2] = [
    RewardGroup {
        categories: &[Category::Lp, Category::WithdrawalShare],
        total: |t| &t.lp_rewardable,
    },
    RewardGroup {
        categories: &[Category::Short],
        total: |t| &t.short_rewardable,
    },
];

struct RewardGroup {
    categories: &'static [Category],
    total: fn(&RewardableTotals) -> &BigUint,
}

impl RewardGroup {
    fn contains(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// Classify raw positions and allocate shares over the valid ones.
///
/// Positions with an unknown asset id prefix are collected into
/// `rejected` (with a warning) instead of failing the whole pool.
///
/// # Errors
/// Returns `InvariantViolation` when shares cannot be made to sum exactly
/// to the rewardable totals.
pub fn compute_allocations(
    raw_positions: Vec<RawPosition>,
    totals: &RewardableTotals,
) -> Result<AllocationOutcome, AllocationError> {
    let mut positions = Vec::with_capacity(raw_positions.len());
    let mut rejected = Vec::new();
    for raw in raw_positions {
        match Position::from_raw(raw.clone()) {
            Ok(position) => positions.push(position),
            Err(reason) => {
                warn!(holder = %raw.holder, asset_id = %raw.asset_id, %reason,
                    "rejecting position with unknown category prefix");
                rejected.push(RejectedPosition {
                    raw,
                    reason: reason.to_string(),
                });
            }
        }
    }
    let shares = allocate(positions, totals)?;
    Ok(AllocationOutcome { shares, rejected })
}

/// Allocate shares over already-classified positions.
///
/// Runs the three passes described in the module docs and checks the
/// conservation postcondition before returning.
pub fn allocate(
    positions: Vec<Position>,
    totals: &RewardableTotals,
) -> Result<Vec<PositionShare>, AllocationError> {
    // Aggregate pass: balance total per category.
    let mut balance_by_category = [
        BigUint::zero(),
        BigUint::zero(),
        BigUint::zero(),
        BigUint::zero(),
    ];
    for position in &positions {
        balance_by_category[position.category.prefix() as usize] += &position.balance;
    }

    // Proportional pass: floor(total * balance / group balance). The
    // multiplication is exact in BigUint, so only the final division
    // truncates.
    let mut shares: Vec<PositionShare> = positions
        .into_iter()
        .map(|position| {
            let share = REWARD_GROUPS
                .iter()
                .find(|group| group.contains(position.category))
                .map(|group| {
                    let group_balance: BigUint = group
                        .categories
                        .iter()
                        .map(|c| balance_by_category[c.prefix() as usize].clone())
                        .sum();
                    if group_balance.is_zero() {
                        BigUint::zero()
                    } else {
                        (group.total)(totals) * &position.balance / group_balance
                    }
                })
                .unwrap_or_else(BigUint::zero);
            PositionShare { position, share }
        })
        .collect();

    // Correction pass: push each group's truncation remainder onto its
    // largest share, first-encountered on ties so reruns are identical.
    for group in &REWARD_GROUPS {
        let rewardable = (group.total)(totals);
        let combined: BigUint = shares
            .iter()
            .filter(|s| group.contains(s.position.category))
            .map(|s| s.share.clone())
            .sum();
        if &combined == rewardable {
            continue;
        }
        if &combined > rewardable {
            // Floor division cannot overshoot; getting here means a
            // rounding-direction bug.
            return Err(AllocationError::InvariantViolation(format!(
                "shares {} exceed rewardable total {} for group {:?}",
                combined, rewardable, group.categories
            )));
        }
        let diff = rewardable - &combined;
        let target = shares
            .iter_mut()
            .filter(|s| group.contains(s.position.category))
            .reduce(|best, candidate| {
                if candidate.share > best.share {
                    candidate
                } else {
                    best
                }
            });
        match target {
            Some(position) => {
                debug!(holder = %position.position.holder, diff = %diff,
                    "applying rounding correction");
                position.share += diff;
            }
            None => {
                // Positive total but nothing to correct: the group has no
                // balance at all, so no valid apportionment exists.
                return Err(AllocationError::InvariantViolation(format!(
                    "rewardable total {} for group {:?} with zero group balance",
                    rewardable, group.categories
                )));
            }
        }
    }

    // Postcondition: group sums must now equal the totals exactly.
    for group in &REWARD_GROUPS {
        let rewardable = (group.total)(totals);
        let combined: BigUint = shares
            .iter()
            .filter(|s| group.contains(s.position.category))
            .map(|s| s.share.clone())
            .sum();
        if &combined != rewardable {
            return Err(AllocationError::InvariantViolation(format!(
                "post-correction sum {} != rewardable total {} for group {:?}",
                combined, rewardable, group.categories
            )));
        }
    }

    Ok(shares)
}
