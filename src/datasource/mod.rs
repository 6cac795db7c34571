//! Collaborator boundary: pool state, participant discovery, and balances.
//!
//! The engine only depends on these traits. Implementations may be RPC
//! clients, files, or test fixtures; they own pagination, retry/backoff,
//! and rate limiting. The engine never retries — by the time values cross
//! this boundary they are final.

use crate::domain::{
    Address, AssetId, BlockRef, PoolConfig, PoolId, PoolInfo, RewardableTotals,
};
use async_trait::async_trait;
use num_bigint::BigUint;
use std::fmt;

pub mod mock;

pub use mock::MockChainState;

/// Read pool configuration, live info, and rewardable totals at a snapshot.
#[async_trait]
pub trait PoolStateReader: Send + Sync + fmt::Debug {
    /// Fetch the pool's immutable configuration.
    async fn get_config(&self, pool: &PoolId) -> Result<PoolConfig, StateError>;

    /// Fetch the pool's live accounting state at `block`.
    async fn get_info(&self, pool: &PoolId, block: BlockRef) -> Result<PoolInfo, StateError>;

    /// Fetch the authoritative reward-eligible totals at `block`.
    async fn get_rewardable_totals(
        &self,
        pool: &PoolId,
        block: BlockRef,
    ) -> Result<RewardableTotals, StateError>;
}

/// Enumerate every holder and asset id ever observed for a pool.
///
/// Implementations typically replay TransferSingle logs from the pool's
/// deployment block; the engine only consumes the resulting sets.
#[async_trait]
pub trait ParticipantEnumerator: Send + Sync + fmt::Debug {
    /// All addresses that ever received a position in the pool.
    async fn list_holders(&self, pool: &PoolId) -> Result<Vec<Address>, StateError>;

    /// All asset ids ever minted by the pool.
    async fn list_asset_ids(&self, pool: &PoolId) -> Result<Vec<AssetId>, StateError>;
}

/// Per-(asset id, holder) balance reads at a snapshot block.
#[async_trait]
pub trait BalanceLookup: Send + Sync + fmt::Debug {
    /// The holder's balance of one asset id, zero if never held.
    async fn balance_of(
        &self,
        pool: &PoolId,
        asset_id: &AssetId,
        holder: &Address,
        block: BlockRef,
    ) -> Result<BigUint, StateError>;
}

/// Error type for state-reading operations.
#[derive(Debug, Clone)]
pub enum StateError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// Node rejected or failed the call
    RpcError(String),
    /// Response could not be decoded into the expected shape
    DecodeError(String),
    /// Rate limit exceeded (caller should implement backoff)
    RateLimited,
    /// Requested pool is not known to this reader
    UnknownPool(String),
    /// Other error
    Other(String),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            StateError::RpcError(msg) => write!(f, "RPC error: {}", msg),
            StateError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            StateError::RateLimited => write!(f, "Rate limited"),
            StateError::UnknownPool(pool) => write!(f, "Unknown pool: {}", pool),
            StateError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for StateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let err = StateError::NetworkError("connection timeout".to_string());
        assert_eq!(err.to_string(), "Network error: connection timeout");

        let err = StateError::RpcError("execution reverted".to_string());
        assert_eq!(err.to_string(), "RPC error: execution reverted");

        let err = StateError::UnknownPool("0xfeed".to_string());
        assert_eq!(err.to_string(), "Unknown pool: 0xfeed");

        let err = StateError::RateLimited;
        assert_eq!(err.to_string(), "Rate limited");
    }
}
