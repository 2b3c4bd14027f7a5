//! End-to-end shuttle planning.
//!
//! [`ShuttlePlanner`] runs the whole pipeline for one employee list:
//!
//! 1. Route every employee in a single tour to estimate a representative
//!    distance.
//! 2. Price the cheapest vehicle mix for the headcount at that distance.
//! 3. Split employees across the vehicles and route each one.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::distance::DistanceMatrix;
use crate::error::{Result, RoutingError};
use crate::fleet::FleetAllocator;
use crate::ga::{RouteOptimizer, TspConfig};
use crate::models::{employee_nodes, Employee, OptimizationResult, RateCard, VehicleTier};
use crate::partition::PartitionOrchestrator;

/// Planner configuration.
///
/// # Examples
///
/// ```
/// use u_shuttle::ga::TspConfig;
/// use u_shuttle::models::VehicleTier;
/// use u_shuttle::planner::PlannerConfig;
///
/// let config = PlannerConfig::default()
///     .with_tsp(TspConfig::default().with_generations(200))
///     .with_tiers(vec![VehicleTier::new(19), VehicleTier::new(46)]);
/// assert_eq!(config.tsp.generations, 200);
/// assert_eq!(config.tiers.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// GA parameters, shared by the estimate run and every vehicle run.
    pub tsp: TspConfig,
    /// Vehicle sizes available for hire.
    pub tiers: Vec<VehicleTier>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tsp: TspConfig::default(),
            tiers: VehicleTier::STANDARD.to_vec(),
        }
    }
}

impl PlannerConfig {
    /// Sets the GA parameters.
    pub fn with_tsp(mut self, tsp: TspConfig) -> Self {
        self.tsp = tsp;
        self
    }

    /// Sets the vehicle sizes available for hire.
    pub fn with_tiers(mut self, tiers: Vec<VehicleTier>) -> Self {
        self.tiers = tiers;
        self
    }
}

/// Plans vehicles and routes for an employee list against one rate card.
///
/// # Examples
///
/// ```
/// use u_shuttle::distance::DistanceMatrix;
/// use u_shuttle::ga::TspConfig;
/// use u_shuttle::models::{Employee, RateBand, RateCard, VehicleTier};
/// use u_shuttle::planner::{PlannerConfig, ShuttlePlanner};
///
/// let card = RateCard::new(vec![RateBand::new(0.0, 50.0)
///     .with_price(VehicleTier::new(19), 100.0)
///     .with_price(VehicleTier::new(27), 130.0)])
/// .unwrap();
/// let staff = vec![Employee::new("a", "North St"), Employee::new("b", "South St")];
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 4.0, 6.0],
///     vec![4.0, 0.0, 3.0],
///     vec![6.0, 3.0, 0.0],
/// ])
/// .unwrap();
///
/// let planner = ShuttlePlanner::new(
///     card,
///     PlannerConfig::default().with_tsp(TspConfig::default().with_seed(3)),
/// );
/// let result = planner.plan(&staff, &dm).unwrap();
/// assert_eq!(result.total_cost(), 100.0);
/// assert_eq!(result.assignments()[0].route.stops(), &[1, 2]);
/// assert_eq!(result.total_distance(), 7.0);
/// ```
#[derive(Debug, Clone)]
pub struct ShuttlePlanner {
    rate_card: RateCard,
    config: PlannerConfig,
    allocator: FleetAllocator,
}

impl ShuttlePlanner {
    /// Creates a planner pricing against `rate_card`.
    pub fn new(rate_card: RateCard, config: PlannerConfig) -> Self {
        let allocator = FleetAllocator::new(config.tiers.clone());
        Self {
            rate_card,
            config,
            allocator,
        }
    }

    /// The rate card plans are priced against.
    pub fn rate_card(&self) -> &RateCard {
        &self.rate_card
    }

    /// The configuration in use.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans `employees`, whose distances are rows/columns `1..=n` of
    /// `distances` (row 0 is the depot).
    pub fn plan(&self, employees: &[Employee], distances: &DistanceMatrix) -> Result<OptimizationResult> {
        self.plan_with(employees, distances, None)
    }

    /// Like [`plan`](Self::plan), stopping early with
    /// [`RoutingError::Cancelled`] once `cancel` is tripped.
    pub fn plan_with(
        &self,
        employees: &[Employee],
        distances: &DistanceMatrix,
        cancel: Option<&CancelToken>,
    ) -> Result<OptimizationResult> {
        if distances.size() != employees.len() + 1 {
            return Err(RoutingError::invalid(format!(
                "distance matrix is {0}x{0}, expected {1}x{1} for {2} employees",
                distances.size(),
                employees.len() + 1,
                employees.len()
            )));
        }

        let optimizer = RouteOptimizer::new(self.config.tsp.clone());
        let seed = optimizer.seed();

        let estimate = optimizer.solve_with(distances, seed, cancel)?;
        let estimated_distance = estimate.distance();
        let estimate_reachable = estimate.is_reachable();
        if !estimate_reachable {
            warn!(
                distance = estimated_distance,
                "whole-company route crosses an unreachable edge; rate band may be wrong"
            );
        }
        info!(
            employees = employees.len(),
            distance = estimated_distance,
            "estimated whole-company route"
        );

        let plan = self
            .allocator
            .allocate_with(employees.len(), estimated_distance, &self.rate_card, cancel)?;

        let orchestrator = PartitionOrchestrator::new(self.config.tsp.clone());
        let nodes = employee_nodes(employees);
        let routes = orchestrator.partition_with(&nodes, &plan, distances, seed, cancel)?;
        info!(
            vehicles = routes.assignments.len(),
            total_distance = routes.total_distance,
            total_cost = routes.total_cost,
            unreachable = routes.unreachable().count(),
            "shuttle plan complete"
        );

        Ok(OptimizationResult {
            estimated_distance,
            estimate_reachable,
            plan,
            routes,
        })
    }
}
