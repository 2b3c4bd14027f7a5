//! Minimum-price vehicle mix for a headcount.
//!
//! # Algorithm
//!
//! For tiers `t_1..t_m` priced in the resolved rate band, enumerate every
//! count vector `(c_1..c_m)` with `0 ≤ c_i ≤ ⌈H / cap_i⌉`, keep those with
//! `Σ c_i · cap_i ≥ H`, and pick the cheapest. Ties go to fewer vehicles,
//! then fewer distinct tiers, then the lexicographically smallest counts.
//!
//! # Complexity
//!
//! `Π (⌈H / cap_i⌉ + 1)` combinations. With the usual three tiers and a few
//! hundred employees this is in the low thousands. The enumeration is split
//! on the first tier's count across the rayon pool and merged with a
//! deterministic reduce.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cancel::{checkpoint, CancelToken};
use crate::error::{Result, RoutingError};
use crate::models::{CapacityPlan, PlanEntry, RateCard, VehicleTier};

/// Prices within this many currency units are considered equal.
const PRICE_EPSILON: f64 = 1e-6;

/// Picks the cheapest combination of vehicle tiers covering a headcount.
///
/// # Examples
///
/// ```
/// use u_shuttle::fleet::FleetAllocator;
/// use u_shuttle::models::{RateBand, RateCard, VehicleTier};
///
/// let card = RateCard::new(vec![RateBand::new(0.0, 50.0)
///     .with_price(VehicleTier::new(19), 100.0)
///     .with_price(VehicleTier::new(27), 130.0)
///     .with_price(VehicleTier::new(46), 200.0)])
/// .unwrap();
///
/// let plan = FleetAllocator::default().allocate(50, 12.0, &card).unwrap();
/// assert_eq!(plan.total_price(), 260.0);
/// assert_eq!(plan.entries().len(), 1);
/// assert_eq!(plan.entries()[0].tier, VehicleTier::new(27));
/// assert_eq!(plan.entries()[0].count, 2);
/// ```
#[derive(Debug, Clone)]
pub struct FleetAllocator {
    tiers: Vec<VehicleTier>,
}

impl Default for FleetAllocator {
    fn default() -> Self {
        Self::new(VehicleTier::STANDARD.to_vec())
    }
}

impl FleetAllocator {
    /// Creates an allocator over the given tiers.
    ///
    /// Tiers are deduplicated and sorted by capacity; zero-capacity tiers are
    /// dropped.
    pub fn new(mut tiers: Vec<VehicleTier>) -> Self {
        tiers.retain(|t| t.capacity() > 0);
        tiers.sort_unstable();
        tiers.dedup();
        Self { tiers }
    }

    /// Tiers considered, ascending by capacity.
    pub fn tiers(&self) -> &[VehicleTier] {
        &self.tiers
    }

    /// Cheapest plan covering `headcount` for a route of `distance_km`.
    pub fn allocate(&self, headcount: usize, distance_km: f64, card: &RateCard) -> Result<CapacityPlan> {
        self.allocate_with(headcount, distance_km, card, None)
    }

    /// Like [`allocate`](Self::allocate), checking `cancel` once per
    /// enumerated combination.
    pub fn allocate_with(
        &self,
        headcount: usize,
        distance_km: f64,
        card: &RateCard,
        cancel: Option<&CancelToken>,
    ) -> Result<CapacityPlan> {
        if headcount == 0 {
            return Ok(CapacityPlan::empty());
        }

        let matched = card.resolve(distance_km)?;
        let priced: Vec<(VehicleTier, f64)> = self
            .tiers
            .iter()
            .filter_map(|&tier| match matched.band.price(tier) {
                Some(price) => Some((tier, price)),
                None => {
                    warn!(%tier, band = %matched.band.label(), "tier has no price in band; excluded");
                    None
                }
            })
            .collect();

        if priced.is_empty() {
            return Err(RoutingError::InfeasiblePlan { headcount });
        }

        let bounds: Vec<usize> = priced
            .iter()
            .map(|(tier, _)| tier.vehicles_to_cover(headcount))
            .collect();
        debug!(
            headcount,
            combinations = bounds.iter().map(|b| b + 1).product::<usize>(),
            "enumerating vehicle combinations"
        );

        let best = (0..=bounds[0])
            .into_par_iter()
            .map(|first| search_from(first, &priced, &bounds, headcount, cancel))
            .try_reduce(|| None, |a, b| Ok(pick(a, b)))?;

        let Some(best) = best else {
            return Err(RoutingError::InfeasiblePlan { headcount });
        };

        let entries = priced
            .iter()
            .zip(&best.counts)
            .map(|(&(tier, price), &count)| PlanEntry::new(tier, count, price))
            .collect();
        let plan = CapacityPlan::new(entries, headcount)
            .with_band(matched.band.label(), matched.fallback)
            .with_route_distance(distance_km);

        info!(
            headcount,
            vehicles = plan.num_vehicles(),
            price = plan.total_price(),
            band = %matched.band.label(),
            "vehicle plan selected"
        );
        Ok(plan)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    counts: Vec<usize>,
    price: f64,
    vehicles: usize,
    tiers_used: usize,
}

impl Candidate {
    /// Scores a count vector; `None` if it hires nobody or seats too few.
    fn evaluate(counts: &[usize], priced: &[(VehicleTier, f64)], headcount: usize) -> Option<Self> {
        let vehicles: usize = counts.iter().sum();
        let seats: usize = counts
            .iter()
            .zip(priced)
            .map(|(&c, (tier, _))| c * tier.capacity() as usize)
            .sum();
        if vehicles == 0 || seats < headcount {
            return None;
        }
        Some(Self {
            counts: counts.to_vec(),
            price: counts.iter().zip(priced).map(|(&c, &(_, p))| c as f64 * p).sum(),
            vehicles,
            tiers_used: counts.iter().filter(|&&c| c > 0).count(),
        })
    }

    fn is_better_than(&self, other: &Self) -> bool {
        if (self.price - other.price).abs() > PRICE_EPSILON {
            return self.price < other.price;
        }
        (self.vehicles, self.tiers_used, &self.counts) < (other.vehicles, other.tiers_used, &other.counts)
    }
}

fn pick(a: Option<Candidate>, b: Option<Candidate>) -> Option<Candidate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.is_better_than(&a) { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Enumerates every count vector whose first entry is `first`.
fn search_from(
    first: usize,
    priced: &[(VehicleTier, f64)],
    bounds: &[usize],
    headcount: usize,
    cancel: Option<&CancelToken>,
) -> Result<Option<Candidate>> {
    let mut counts = vec![0; priced.len()];
    counts[0] = first;
    let mut best = None;

    loop {
        checkpoint(cancel)?;
        best = pick(best, Candidate::evaluate(&counts, priced, headcount));

        // odometer over positions 1..
        let mut pos = 1;
        loop {
            if pos == counts.len() {
                return Ok(best);
            }
            if counts[pos] < bounds[pos] {
                counts[pos] += 1;
                break;
            }
            counts[pos] = 0;
            pos += 1;
        }
    }
}
