//! Per-vehicle assignments and the final optimization result.

use serde::{Deserialize, Serialize};

use super::{CapacityPlan, Route, VehicleTier};

/// One hired vehicle with its ordered pickups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAssignment {
    /// 1-based vehicle number in plan order.
    pub vehicle: usize,
    /// Vehicle size.
    pub tier: VehicleTier,
    /// Price of this vehicle in the resolved rate band.
    pub unit_price: f64,
    /// Employee node indices in pickup order.
    pub route: Route,
    /// Open-path distance of `route` over the global matrix.
    pub distance: f64,
    /// `false` if the route crosses an unreachable edge; `distance` is then
    /// not a real figure and should be presented as a warning.
    pub reachable: bool,
}

/// Routed vehicles with grand totals.
///
/// `total_cost` is the plan's price; `total_distance` is reporting only and
/// never feeds back into pricing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetRoutes {
    /// Assignments in plan order.
    pub assignments: Vec<ServiceAssignment>,
    /// Sum of assignment distances.
    pub total_distance: f64,
    /// Sum of the plan's tier prices.
    pub total_cost: f64,
}

impl FleetRoutes {
    /// Aggregates assignments, taking the cost from `plan`.
    pub fn new(assignments: Vec<ServiceAssignment>, plan: &CapacityPlan) -> Self {
        let total_distance = assignments.iter().map(|a| a.distance).sum();
        Self {
            assignments,
            total_distance,
            total_cost: plan.total_price(),
        }
    }

    /// Number of employees picked up across all vehicles.
    pub fn num_served(&self) -> usize {
        self.assignments.iter().map(|a| a.route.len()).sum()
    }

    /// Assignments whose route crosses an unreachable edge.
    pub fn unreachable(&self) -> impl Iterator<Item = &ServiceAssignment> {
        self.assignments.iter().filter(|a| !a.reachable)
    }
}

/// Everything a report or display layer needs from one planning run.
///
/// # Examples
///
/// ```
/// use u_shuttle::models::{CapacityPlan, FleetRoutes, OptimizationResult};
///
/// let result = OptimizationResult {
///     estimated_distance: 0.0,
///     estimate_reachable: true,
///     plan: CapacityPlan::empty(),
///     routes: FleetRoutes::default(),
/// };
/// assert_eq!(result.total_cost(), 0.0);
/// assert!(!result.has_warnings());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Distance of the single whole-company route used to pick a rate band.
    pub estimated_distance: f64,
    /// `false` if the whole-company route crosses an unreachable edge.
    pub estimate_reachable: bool,
    /// The chosen vehicle mix.
    pub plan: CapacityPlan,
    /// Routed vehicles and totals.
    pub routes: FleetRoutes,
}

impl OptimizationResult {
    /// Per-vehicle assignments in plan order.
    pub fn assignments(&self) -> &[ServiceAssignment] {
        &self.routes.assignments
    }

    /// Grand total cost (the plan price).
    pub fn total_cost(&self) -> f64 {
        self.routes.total_cost
    }

    /// Grand total distance across vehicles.
    pub fn total_distance(&self) -> f64 {
        self.routes.total_distance
    }

    /// Returns `true` if any figure rests on an unreachable edge.
    pub fn has_warnings(&self) -> bool {
        !self.estimate_reachable || self.routes.unreachable().next().is_some()
    }
}
