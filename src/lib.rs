//! Reward-eligible value and annualized yield for Hyperdrive pool positions.
//!
//! Decodes packed position identifiers, apportions each pool's rewardable
//! totals across holders by trade type and balance share (with an exact
//! remainder correction), and derives the spot annualized rate from pool
//! reserves. Chain access sits behind the traits in [`datasource`]; the
//! engine itself does no I/O.

pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::EngineConfig;
pub use datasource::{
    BalanceLookup, MockChainState, ParticipantEnumerator, PoolStateReader, StateError,
};
pub use domain::{
    Address, AssetId, BlockRef, Category, Dec, PoolConfig, PoolId, PoolInfo, Position,
    RawPosition, RewardableTotals, UnknownCategory,
};
pub use engine::{
    allocate, annualized_rate, assemble, compute_allocations, spot_price, AllocationError,
    AllocationOutcome, PoolReport, PositionShare, RateError, ReportError,
};
pub use error::PoolError;
pub use orchestration::{RunOutcome, SnapshotPipeline};
