//! In-memory chain state for testing without network calls.

use super::{BalanceLookup, ParticipantEnumerator, PoolStateReader, StateError};
use crate::domain::{
    Address, AssetId, BlockRef, PoolConfig, PoolId, PoolInfo, RewardableTotals,
};
use async_trait::async_trait;
use num_bigint::BigUint;
use num_traits::Zero;
use std::collections::HashMap;

/// Mock chain state implementing all three collaborator traits over fixed
/// in-memory data.
#[derive(Debug, Clone, Default)]
pub struct MockChainState {
    configs: HashMap<PoolId, PoolConfig>,
    infos: HashMap<PoolId, PoolInfo>,
    totals: HashMap<PoolId, RewardableTotals>,
    holders: HashMap<PoolId, Vec<Address>>,
    asset_ids: HashMap<PoolId, Vec<AssetId>>,
    balances: HashMap<(PoolId, AssetId, Address), BigUint>,
}

impl MockChainState {
    /// Create an empty mock with no pools.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pool's config, info, and rewardable totals.
    pub fn with_pool(
        mut self,
        pool: PoolId,
        config: PoolConfig,
        info: PoolInfo,
        totals: RewardableTotals,
    ) -> Self {
        self.configs.insert(pool.clone(), config);
        self.infos.insert(pool.clone(), info);
        self.totals.insert(pool, totals);
        self
    }

    /// Add a holder to the pool's participant set.
    pub fn with_holder(mut self, pool: &PoolId, holder: Address) -> Self {
        self.holders.entry(pool.clone()).or_default().push(holder);
        self
    }

    /// Add an asset id to the pool's observed-id set.
    pub fn with_asset_id(mut self, pool: &PoolId, asset_id: AssetId) -> Self {
        self.asset_ids
            .entry(pool.clone())
            .or_default()
            .push(asset_id);
        self
    }

    /// Set a holder's balance for an asset id. Holders and asset ids must be
    /// registered separately; unknown pairs read as zero, like the chain.
    pub fn with_balance(
        mut self,
        pool: &PoolId,
        asset_id: &AssetId,
        holder: &Address,
        balance: BigUint,
    ) -> Self {
        self.balances
            .insert((pool.clone(), asset_id.clone(), holder.clone()), balance);
        self
    }
}

#[async_trait]
impl PoolStateReader for MockChainState {
    async fn get_config(&self, pool: &PoolId) -> Result<PoolConfig, StateError> {
        self.configs
            .get(pool)
            .cloned()
            .ok_or_else(|| StateError::UnknownPool(pool.to_string()))
    }

    async fn get_info(&self, pool: &PoolId, _block: BlockRef) -> Result<PoolInfo, StateError> {
        self.infos
            .get(pool)
            .cloned()
            .ok_or_else(|| StateError::UnknownPool(pool.to_string()))
    }

    async fn get_rewardable_totals(
        &self,
        pool: &PoolId,
        _block: BlockRef,
    ) -> Result<RewardableTotals, StateError> {
        self.totals
            .get(pool)
            .cloned()
            .ok_or_else(|| StateError::UnknownPool(pool.to_string()))
    }
}

#[async_trait]
impl ParticipantEnumerator for MockChainState {
    async fn list_holders(&self, pool: &PoolId) -> Result<Vec<Address>, StateError> {
        Ok(self.holders.get(pool).cloned().unwrap_or_default())
    }

    async fn list_asset_ids(&self, pool: &PoolId) -> Result<Vec<AssetId>, StateError> {
        Ok(self.asset_ids.get(pool).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl BalanceLookup for MockChainState {
    async fn balance_of(
        &self,
        pool: &PoolId,
        asset_id: &AssetId,
        holder: &Address,
        _block: BlockRef,
    ) -> Result<BigUint, StateError> {
        Ok(self
            .balances
            .get(&(pool.clone(), asset_id.clone(), holder.clone()))
            .cloned()
            .unwrap_or_else(BigUint::zero))
    }
}
