//! Per-pool failure taxonomy.

use thiserror::Error;

use crate::datasource::StateError;
use crate::domain::TotalsUnderflow;
use crate::engine::{AllocationError, RateError, ReportError};

/// Any failure that invalidates one pool's computation.
///
/// Callers decide whether to skip, log, or abort; the engine itself never
/// retries and never swallows an invariant violation.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Rate(#[from] RateError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Totals(#[from] TotalsUnderflow),
}
