//! Capacity plans: how many vehicles of each tier to hire.

use serde::{Deserialize, Serialize};

use super::VehicleTier;

/// One tier line of a [`CapacityPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Vehicle size.
    pub tier: VehicleTier,
    /// Number of vehicles of this tier.
    pub count: usize,
    /// Price of one vehicle in the resolved band.
    pub unit_price: f64,
    /// `count * unit_price`.
    pub total_price: f64,
    /// `unit_price` over the route distance the plan was priced at; `None`
    /// until the plan records that distance.
    pub price_per_km: Option<f64>,
    /// Employees seated by this tier when the headcount is filled in plan order.
    pub carried: usize,
}

impl PlanEntry {
    /// Creates an entry; `carried` is assigned when the plan is assembled.
    pub fn new(tier: VehicleTier, count: usize, unit_price: f64) -> Self {
        Self {
            tier,
            count,
            unit_price,
            total_price: count as f64 * unit_price,
            price_per_km: None,
            carried: 0,
        }
    }

    /// Seats offered by this entry.
    pub fn capacity(&self) -> usize {
        self.count * self.tier.capacity() as usize
    }
}

/// An ordered multiset of vehicle tiers covering a headcount, with its price.
///
/// Immutable once built. Entry order is the order in which the orchestrator
/// fills vehicles with employees.
///
/// # Examples
///
/// ```
/// use u_shuttle::models::{CapacityPlan, PlanEntry, VehicleTier};
///
/// let plan = CapacityPlan::new(
///     vec![
///         PlanEntry::new(VehicleTier::new(46), 1, 200.0),
///         PlanEntry::new(VehicleTier::new(27), 1, 130.0),
///     ],
///     65,
/// );
/// assert_eq!(plan.total_capacity(), 73);
/// assert_eq!(plan.num_vehicles(), 2);
/// assert_eq!(plan.total_price(), 330.0);
/// assert_eq!(plan.entries()[1].carried, 19);
/// assert!(plan.covers(65));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityPlan {
    entries: Vec<PlanEntry>,
    headcount: usize,
    total_price: f64,
    band: Option<String>,
    fallback_band: bool,
}

impl CapacityPlan {
    /// Assembles a plan for `headcount` employees, filling entries in order.
    ///
    /// Entries with a zero count are dropped.
    pub fn new(entries: Vec<PlanEntry>, headcount: usize) -> Self {
        let mut remaining = headcount;
        let entries: Vec<PlanEntry> = entries
            .into_iter()
            .filter(|e| e.count > 0)
            .map(|mut e| {
                e.carried = e.capacity().min(remaining);
                remaining -= e.carried;
                e
            })
            .collect();
        let total_price = entries.iter().map(|e| e.total_price).sum();
        Self {
            entries,
            headcount,
            total_price,
            band: None,
            fallback_band: false,
        }
    }

    /// The plan for nobody: no vehicles, zero cost.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Records which rate band priced this plan.
    pub fn with_band(mut self, label: impl Into<String>, fallback: bool) -> Self {
        self.band = Some(label.into());
        self.fallback_band = fallback;
        self
    }

    /// Records the route distance the plan was priced at, filling each
    /// entry's per-km price. Non-positive distances count as 1 km.
    pub fn with_route_distance(mut self, distance_km: f64) -> Self {
        let d = if distance_km > 0.0 { distance_km } else { 1.0 };
        for entry in &mut self.entries {
            entry.price_per_km = Some(entry.unit_price / d);
        }
        self
    }

    /// Tier lines in fill order.
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Returns `true` if the plan hires no vehicles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Headcount the plan was built for.
    pub fn headcount(&self) -> usize {
        self.headcount
    }

    /// Sum of all entry prices.
    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Total seats across all vehicles.
    pub fn total_capacity(&self) -> usize {
        self.entries.iter().map(PlanEntry::capacity).sum()
    }

    /// Total number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Number of distinct tiers used.
    pub fn num_tiers(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the plan seats at least `headcount` people.
    pub fn covers(&self, headcount: usize) -> bool {
        self.total_capacity() >= headcount
    }

    /// Label of the rate band used for pricing, if recorded.
    pub fn band(&self) -> Option<&str> {
        self.band.as_deref()
    }

    /// `true` if the band was chosen by the out-of-range fallback.
    pub fn used_fallback_band(&self) -> bool {
        self.fallback_band
    }

    /// One `(tier, unit_price)` per vehicle, in fill order.
    ///
    /// `[(46, 1), (27, 2)]` expands to `[46, 27, 27]`.
    pub fn vehicles(&self) -> Vec<(VehicleTier, f64)> {
        self.entries
            .iter()
            .flat_map(|e| std::iter::repeat((e.tier, e.unit_price)).take(e.count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_plan() {
        let plan = CapacityPlan::empty();
        assert!(plan.is_empty());
        assert_eq!(plan.total_price(), 0.0);
        assert_eq!(plan.num_vehicles(), 0);
        assert!(plan.covers(0));
        assert!(!plan.covers(1));
    }

    #[test]
    fn test_carried_fills_in_order() {
        let plan = CapacityPlan::new(
            vec![
                PlanEntry::new(VehicleTier::new(19), 2, 100.0),
                PlanEntry::new(VehicleTier::new(27), 1, 130.0),
                PlanEntry::new(VehicleTier::new(46), 0, 200.0),
            ],
            50,
        );
        assert_eq!(plan.num_tiers(), 2);
        assert_eq!(plan.entries()[0].carried, 38);
        assert_eq!(plan.entries()[1].carried, 12);
        assert_eq!(plan.total_price(), 330.0);
        assert_eq!(plan.headcount(), 50);
    }

    #[test]
    fn test_price_per_km() {
        let entries = vec![PlanEntry::new(VehicleTier::new(27), 2, 130.0)];
        assert_eq!(CapacityPlan::new(entries.clone(), 50).entries()[0].price_per_km, None);

        let plan = CapacityPlan::new(entries.clone(), 50).with_route_distance(26.0);
        assert_eq!(plan.entries()[0].price_per_km, Some(5.0));

        let plan = CapacityPlan::new(entries, 50).with_route_distance(0.0);
        assert_eq!(plan.entries()[0].price_per_km, Some(130.0));
    }

    #[test]
    fn test_vehicles_expansion() {
        let plan = CapacityPlan::new(
            vec![
                PlanEntry::new(VehicleTier::new(46), 1, 200.0),
                PlanEntry::new(VehicleTier::new(27), 2, 130.0),
            ],
            90,
        );
        let caps: Vec<u32> = plan.vehicles().iter().map(|(t, _)| t.capacity()).collect();
        assert_eq!(caps, vec![46, 27, 27]);
    }

    #[test]
    fn test_band_metadata() {
        let plan = CapacityPlan::empty().with_band("0-20", true);
        assert_eq!(plan.band(), Some("0-20"));
        assert!(plan.used_fallback_band());
    }
}
