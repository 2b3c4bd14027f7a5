//! # u-shuttle
//!
//! Employee shuttle planning: sizes a vehicle fleet against a distance-banded
//! rate card and computes near-optimal open pickup routes from a depot.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Employee, VehicleTier, RateCard, CapacityPlan, Route, results)
//! - [`distance`] — Depot/employee distance matrix with an unreachable sentinel
//! - [`evaluation`] — Open-path distance, fitness, and reachability
//! - [`ga`] — Genetic algorithm TSP solver (tournament, order crossover, inversion)
//! - [`fleet`] — Exhaustive minimum-price fleet allocation
//! - [`partition`] — Per-vehicle grouping and routing
//! - [`planner`] — End-to-end pipeline (estimate, allocate, partition)
//! - [`cancel`] — Cooperative cancellation
//! - [`error`] — Error type
//!
//! The crate logs through [`tracing`] and never installs a subscriber.

pub mod cancel;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod fleet;
pub mod ga;
pub mod models;
pub mod partition;
pub mod planner;

pub use error::{Result, RoutingError};
