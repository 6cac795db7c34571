//! Composition of datasource collaborators with the computation engine.

pub mod snapshot;

pub use snapshot::{RunOutcome, SnapshotPipeline};
