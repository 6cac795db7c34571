//! Per-snapshot pipeline: enumerate positions, allocate, assemble reports.
//!
//! Composes the datasource traits with the pure engine. All collaborators
//! are injected at construction; nothing global.

use futures::future::join_all;
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::datasource::{BalanceLookup, ParticipantEnumerator, PoolStateReader, StateError};
use crate::domain::{BlockRef, PoolId, RawPosition};
use crate::engine::{allocator, rates, report, PoolReport};
use crate::error::PoolError;

/// Outcome of a multi-pool run. Failures are contained per pool so one
/// degenerate pool cannot sink the batch.
#[derive(Debug)]
pub struct RunOutcome {
    pub reports: Vec<PoolReport>,
    pub failures: Vec<(PoolId, PoolError)>,
}

/// Snapshot computation pipeline over injected collaborators.
#[derive(Debug)]
pub struct SnapshotPipeline<S, P, B> {
    state: S,
    participants: P,
    balances: B,
    config: EngineConfig,
}

impl<S, P, B> SnapshotPipeline<S, P, B>
where
    S: PoolStateReader,
    P: ParticipantEnumerator,
    B: BalanceLookup,
{
    pub fn new(state: S, participants: P, balances: B, config: EngineConfig) -> Self {
        Self {
            state,
            participants,
            balances,
            config,
        }
    }

    /// Resolve the (holder, asset id) balance matrix at the snapshot block
    /// and keep positions above the dust threshold.
    ///
    /// Balance lookups run concurrently but results keep holder-major
    /// enumeration order, so downstream allocation is reproducible.
    pub async fn load_positions(
        &self,
        pool: &PoolId,
        block: BlockRef,
    ) -> Result<Vec<RawPosition>, StateError> {
        let holders = self.participants.list_holders(pool).await?;
        let asset_ids = self.participants.list_asset_ids(pool).await?;

        let pairs: Vec<_> = holders
            .iter()
            .flat_map(|holder| asset_ids.iter().map(move |id| (holder, id)))
            .collect();
        let lookups = join_all(
            pairs
                .iter()
                .map(|(holder, id)| self.balances.balance_of(pool, id, holder, block)),
        )
        .await;

        let mut positions = Vec::new();
        for ((holder, asset_id), balance) in pairs.into_iter().zip(lookups) {
            let balance = balance?;
            if balance > self.config.dust_threshold {
                positions.push(RawPosition::new(
                    holder.clone(),
                    asset_id.clone(),
                    balance,
                ));
            }
        }
        info!(%pool, %block, positions = positions.len(), "loaded pool positions");
        Ok(positions)
    }

    /// Full computation for one pool: positions, allocation, rate, report.
    pub async fn compute_pool(
        &self,
        pool: &PoolId,
        block: BlockRef,
    ) -> Result<PoolReport, PoolError> {
        let config = self.state.get_config(pool).await?;
        let info = self.state.get_info(pool, block).await?;
        let totals = self.state.get_rewardable_totals(pool, block).await?;

        let positions = self.load_positions(pool, block).await?;
        let outcome = allocator::compute_allocations(positions, &totals)?;
        let rate = rates::annualized_rate(&config, &info)?;

        let report = report::assemble(pool.clone(), block, outcome, totals, Some(rate))?;
        Ok(report)
    }

    /// Run every pool, containing per-pool failures.
    pub async fn compute_pools(&self, pools: &[PoolId], block: BlockRef) -> RunOutcome {
        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for pool in pools {
            match self.compute_pool(pool, block).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(%pool, error = %e, "pool computation failed");
                    failures.push((pool.clone(), e));
                }
            }
        }
        RunOutcome { reports, failures }
    }
}
