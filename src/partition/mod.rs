//! Per-vehicle partitioning and routing.
//!
//! - [`split_into_groups`] — Consecutive slicing of employees by plan order
//! - [`PartitionOrchestrator`] — Routes each group and aggregates totals

mod orchestrator;

pub use orchestrator::{split_into_groups, PartitionOrchestrator, VehicleGroup};
