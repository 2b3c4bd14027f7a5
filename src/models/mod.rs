//! Domain model types for shuttle planning.
//!
//! Employees to pick up, vehicle tiers with distance-banded prices, the
//! capacity plan chosen for a headcount, open pickup routes, and the
//! per-vehicle assignments handed to reporting collaborators.

mod employee;
mod plan;
mod rate;
mod route;
mod solution;
mod vehicle;

pub use employee::{employee_nodes, Employee};
pub use plan::{CapacityPlan, PlanEntry};
pub use rate::{BandMatch, RateBand, RateCard};
pub use route::Route;
pub use solution::{FleetRoutes, OptimizationResult, ServiceAssignment};
pub use vehicle::VehicleTier;
