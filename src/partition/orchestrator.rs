//! Splits employees across the planned vehicles and routes each vehicle.

use rayon::prelude::*;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::distance::DistanceMatrix;
use crate::error::{Result, RoutingError};
use crate::ga::{RouteOptimizer, TourStatus, TspConfig};
use crate::models::{CapacityPlan, FleetRoutes, ServiceAssignment, VehicleTier};

/// One vehicle's slice of the employee list.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleGroup<'a> {
    /// 1-based vehicle number in plan order.
    pub vehicle: usize,
    /// Vehicle size.
    pub tier: VehicleTier,
    /// Price of this vehicle.
    pub unit_price: f64,
    /// Global node indices assigned to this vehicle, in list order.
    pub members: &'a [usize],
}

/// Slices `employees` into consecutive groups, one per planned vehicle.
///
/// Vehicles are filled in plan order up to their capacity. Once employees
/// run out, remaining vehicles get no group; the last group may be short.
///
/// # Examples
///
/// ```
/// use u_shuttle::models::{CapacityPlan, PlanEntry, VehicleTier};
/// use u_shuttle::partition::split_into_groups;
///
/// let plan = CapacityPlan::new(
///     vec![
///         PlanEntry::new(VehicleTier::new(46), 1, 200.0),
///         PlanEntry::new(VehicleTier::new(27), 1, 130.0),
///     ],
///     65,
/// );
/// let employees: Vec<usize> = (1..=65).collect();
/// let groups = split_into_groups(&employees, &plan);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].members.len(), 46);
/// assert_eq!(groups[1].members, &employees[46..]);
/// ```
pub fn split_into_groups<'a>(employees: &'a [usize], plan: &CapacityPlan) -> Vec<VehicleGroup<'a>> {
    let mut groups = Vec::new();
    let mut offset = 0;
    for (i, (tier, unit_price)) in plan.vehicles().into_iter().enumerate() {
        if offset >= employees.len() {
            break;
        }
        let take = (tier.capacity() as usize).min(employees.len() - offset);
        groups.push(VehicleGroup {
            vehicle: i + 1,
            tier,
            unit_price,
            members: &employees[offset..offset + take],
        });
        offset += take;
    }
    groups
}

/// Routes every vehicle of a capacity plan.
///
/// Each group's depot row/column and member rows/columns are projected into
/// a local matrix, solved with the GA, and mapped back to global indices.
/// Groups are independent and run on the rayon pool; each gets its own
/// random stream derived from the run seed and its position, so results are
/// reproducible and listed in plan order.
///
/// # Examples
///
/// ```
/// use u_shuttle::distance::DistanceMatrix;
/// use u_shuttle::ga::TspConfig;
/// use u_shuttle::models::{CapacityPlan, PlanEntry, VehicleTier};
/// use u_shuttle::partition::PartitionOrchestrator;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 1.0, 2.0],
///     vec![2.0, 1.0, 0.0, 1.0],
///     vec![3.0, 2.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let plan = CapacityPlan::new(vec![PlanEntry::new(VehicleTier::new(2), 2, 50.0)], 3);
///
/// let orchestrator = PartitionOrchestrator::new(
///     TspConfig::default().with_population_size(20).with_generations(20).with_seed(1),
/// );
/// let routes = orchestrator.partition(&[1, 2, 3], &plan, &dm).unwrap();
/// assert_eq!(routes.assignments.len(), 2);
/// assert_eq!(routes.assignments[0].route.stops(), &[1, 2]);
/// assert_eq!(routes.assignments[1].route.stops(), &[3]);
/// assert_eq!(routes.total_cost, 100.0);
/// assert!((routes.total_distance - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PartitionOrchestrator {
    optimizer: RouteOptimizer,
}

impl PartitionOrchestrator {
    /// Creates an orchestrator whose per-vehicle GA uses `config`.
    pub fn new(config: TspConfig) -> Self {
        Self {
            optimizer: RouteOptimizer::new(config),
        }
    }

    /// The per-vehicle route optimizer.
    pub fn optimizer(&self) -> &RouteOptimizer {
        &self.optimizer
    }

    /// Routes `employees` (global node indices) over the vehicles of `plan`.
    pub fn partition(
        &self,
        employees: &[usize],
        plan: &CapacityPlan,
        distances: &DistanceMatrix,
    ) -> Result<FleetRoutes> {
        self.partition_with(employees, plan, distances, self.optimizer.seed(), None)
    }

    /// Like [`partition`](Self::partition) with an explicit run seed and an
    /// optional cancellation token shared by all vehicle runs.
    pub fn partition_with(
        &self,
        employees: &[usize],
        plan: &CapacityPlan,
        distances: &DistanceMatrix,
        seed: u64,
        cancel: Option<&CancelToken>,
    ) -> Result<FleetRoutes> {
        validate_employees(employees, distances)?;
        if !plan.covers(employees.len()) {
            return Err(RoutingError::InfeasiblePlan {
                headcount: employees.len(),
            });
        }

        let groups = split_into_groups(employees, plan);
        let assignments = groups
            .par_iter()
            .enumerate()
            .map(|(i, group)| self.route_group(group, distances, group_seed(seed, i), cancel))
            .collect::<Result<Vec<_>>>()?;

        let routes = FleetRoutes::new(assignments, plan);
        debug!(
            vehicles = routes.assignments.len(),
            total_distance = routes.total_distance,
            total_cost = routes.total_cost,
            "partition routed"
        );
        Ok(routes)
    }

    fn route_group(
        &self,
        group: &VehicleGroup<'_>,
        distances: &DistanceMatrix,
        seed: u64,
        cancel: Option<&CancelToken>,
    ) -> Result<ServiceAssignment> {
        let local = distances.project(group.members);
        let solution = self.optimizer.solve_with(&local, seed, cancel)?;
        if solution.status() == TourStatus::Degenerate {
            return Err(RoutingError::invalid(format!(
                "no route produced for vehicle {}",
                group.vehicle
            )));
        }

        let route = solution.route().remap(group.members);
        let distance = route.distance(distances);
        let reachable = route.is_reachable(distances);
        debug!(
            vehicle = group.vehicle,
            tier = %group.tier,
            stops = route.len(),
            distance,
            reachable,
            "vehicle routed"
        );

        Ok(ServiceAssignment {
            vehicle: group.vehicle,
            tier: group.tier,
            unit_price: group.unit_price,
            route,
            distance,
            reachable,
        })
    }
}

/// Per-group seed: the run seed offset by a golden-ratio stride.
fn group_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn validate_employees(employees: &[usize], distances: &DistanceMatrix) -> Result<()> {
    let mut seen = vec![false; distances.size()];
    for &e in employees {
        if e == 0 || e >= distances.size() {
            return Err(RoutingError::invalid(format!(
                "employee index {e} outside 1..{}",
                distances.size()
            )));
        }
        if seen[e] {
            return Err(RoutingError::invalid(format!("employee index {e} listed twice")));
        }
        seen[e] = true;
    }
    Ok(())
}
