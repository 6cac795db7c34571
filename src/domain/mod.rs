//! Domain value types shared across the engine and collaborator boundaries.

pub mod asset_id;
pub mod decimal;
pub mod pool;
pub mod position;
pub mod primitives;

pub use asset_id::{AssetId, AssetIdOverflow, AssetIdParseError, Category, UnknownCategory};
pub use decimal::{Dec, DecimalError};
pub use pool::{PoolConfig, PoolInfo, RewardableTotals, TotalsUnderflow};
pub use position::{Position, RawPosition};
pub use primitives::{Address, BlockRef, PoolId};
