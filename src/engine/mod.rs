//! Pure computation engine: apportionment, rates, and report assembly.
//!
//! Everything here is synchronous CPU-bound arithmetic over in-memory
//! values. No I/O, no retries, no shared state; concurrent runs for
//! different pools are fully independent.

pub mod allocator;
pub mod rates;
pub mod report;

pub use allocator::{
    allocate, compute_allocations, AllocationError, AllocationOutcome, PositionShare,
    RejectedPosition,
};
pub use rates::{annualized_rate, spot_price, RateError};
pub use report::{assemble, PoolReport, ReportError, ReportRow};
