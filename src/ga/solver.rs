//! Generational GA for the open-path shuttle TSP.
//!
//! # Algorithm
//!
//! 1. Seed `P` random permutations of the stops `1..=k`.
//! 2. Per generation: score every tour (`fitness = 1 / distance`), copy the
//!    top `⌊P · elitism⌋` unchanged, then breed the rest. Each child comes
//!    from two tournament winners, through order crossover with probability
//!    `pc` (otherwise the fitter parent is cloned), then inversion mutation
//!    with probability `pm`.
//! 3. The new generation replaces the old one entirely.
//! 4. After `G` generations, return the tour with the smallest distance.
//!
//! Scoring is read-only on the matrix and runs on the rayon pool when
//! [`TspConfig::parallel`] is set; all random draws stay on the calling
//! thread, so a fixed seed gives the same route either way.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::chromosome::Tour;
use super::config::TspConfig;
use super::operators::{
    fitter_parent, inversion_mutation, order_crossover, random_permutation, tournament_select,
};
use crate::cancel::{checkpoint, CancelToken};
use crate::distance::DistanceMatrix;
use crate::error::{Result, RoutingError};
use crate::models::Route;

/// How a [`TspSolution`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourStatus {
    /// Zero or one stop; answered without running the GA.
    Trivial,
    /// Best tour of the final generation, all edges reachable.
    Optimized,
    /// Best tour found still crosses an unreachable edge.
    Unreachable,
    /// The final population held no usable tour; the route is empty.
    Degenerate,
}

/// Result of one [`RouteOptimizer`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TspSolution {
    route: Route,
    distance: f64,
    status: TourStatus,
    generations: usize,
}

impl TspSolution {
    fn trivial(route: Route, distances: &DistanceMatrix) -> Self {
        let distance = route.distance(distances);
        let status = if route.is_reachable(distances) {
            TourStatus::Trivial
        } else {
            TourStatus::Unreachable
        };
        Self {
            route,
            distance,
            status,
            generations: 0,
        }
    }

    fn degenerate(generations: usize) -> Self {
        Self {
            route: Route::empty(),
            distance: 0.0,
            status: TourStatus::Degenerate,
            generations,
        }
    }

    /// The best visiting order over local stops `1..=k`.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Open-path distance of [`route`](Self::route).
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// How the route was obtained.
    pub fn status(&self) -> TourStatus {
        self.status
    }

    /// Generations evolved (0 for trivial instances).
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Returns `true` unless the route crosses an unreachable edge or the run
    /// degenerated.
    pub fn is_reachable(&self) -> bool {
        matches!(self.status, TourStatus::Trivial | TourStatus::Optimized)
    }

    /// Consumes the solution, returning the route regardless of status.
    pub fn into_route(self) -> Route {
        self.route
    }

    /// Consumes the solution, failing if the route is not a real path.
    pub fn into_reachable(self) -> Result<Route> {
        match self.status {
            TourStatus::Trivial | TourStatus::Optimized => Ok(self.route),
            TourStatus::Unreachable => Err(RoutingError::UnreachableRoute {
                distance: self.distance,
            }),
            TourStatus::Degenerate => Err(RoutingError::invalid(
                "optimizer produced no candidate route",
            )),
        }
    }
}

/// Genetic-algorithm TSP solver for open depot-start routes.
///
/// # Examples
///
/// ```
/// use u_shuttle::distance::DistanceMatrix;
/// use u_shuttle::ga::{RouteOptimizer, TspConfig};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 2.0, 5.0, 9.0],
///     vec![2.0, 0.0, 3.0, 6.0],
///     vec![5.0, 3.0, 0.0, 4.0],
///     vec![9.0, 6.0, 4.0, 0.0],
/// ])
/// .unwrap();
///
/// let optimizer = RouteOptimizer::new(
///     TspConfig::default()
///         .with_population_size(40)
///         .with_generations(60)
///         .with_seed(42),
/// );
/// let solution = optimizer.solve(&dm).unwrap();
/// assert_eq!(solution.route().stops(), &[1, 2, 3]);
/// assert!((solution.distance() - 9.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteOptimizer {
    config: TspConfig,
}

impl RouteOptimizer {
    /// Creates an optimizer with the given parameters.
    pub fn new(config: TspConfig) -> Self {
        Self { config }
    }

    /// The parameters in use.
    pub fn config(&self) -> &TspConfig {
        &self.config
    }

    /// Solves over every non-depot node of `distances`.
    ///
    /// Uses the configured seed, or a fresh one if none is set.
    pub fn solve(&self, distances: &DistanceMatrix) -> Result<TspSolution> {
        self.solve_with(distances, self.seed(), None)
    }

    /// The configured seed, or a freshly drawn one.
    pub fn seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(rand::random)
    }

    /// Solves with an explicit seed and an optional cancellation token,
    /// checked once per generation.
    pub fn solve_with(
        &self,
        distances: &DistanceMatrix,
        seed: u64,
        cancel: Option<&CancelToken>,
    ) -> Result<TspSolution> {
        self.config.validate()?;
        let k = distances.num_employees();

        match k {
            0 => return Ok(TspSolution::trivial(Route::empty(), distances)),
            1 => return Ok(TspSolution::trivial(Route::new(vec![1]), distances)),
            _ => {}
        }

        let cfg = &self.config;
        debug!(
            stops = k,
            population = cfg.population_size,
            generations = cfg.generations,
            seed,
            "starting GA route optimization"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut population: Vec<Tour> = (0..cfg.population_size)
            .map(|_| Tour::new(random_permutation(k, &mut rng)))
            .collect();

        for generation in 0..cfg.generations {
            checkpoint(cancel)?;
            self.evaluate(&mut population, distances);
            trace!(generation, best = best_distance(&population), "generation scored");
            population = self.breed(&population, k, &mut rng);
        }

        checkpoint(cancel)?;
        self.evaluate(&mut population, distances);

        let Some(best) = population
            .into_iter()
            .filter(|t| !t.distance().is_nan())
            .reduce(|best, t| if t.distance() < best.distance() { t } else { best })
        else {
            warn!("final population held no candidate route");
            return Ok(TspSolution::degenerate(cfg.generations));
        };

        let distance = best.distance();
        let route = Route::new(best.into_stops());
        let status = if route.is_reachable(distances) {
            TourStatus::Optimized
        } else {
            warn!(distance, "best route crosses an unreachable edge");
            TourStatus::Unreachable
        };
        debug!(distance, "GA route optimization finished");

        Ok(TspSolution {
            route,
            distance,
            status,
            generations: cfg.generations,
        })
    }

    fn evaluate(&self, population: &mut [Tour], distances: &DistanceMatrix) {
        if self.config.parallel {
            population.par_iter_mut().for_each(|t| t.evaluate(distances));
        } else {
            population.iter_mut().for_each(|t| t.evaluate(distances));
        }
    }

    /// Builds the next generation from a scored population.
    fn breed<R: Rng>(&self, population: &[Tour], k: usize, rng: &mut R) -> Vec<Tour> {
        let cfg = &self.config;
        let mut next = Vec::with_capacity(cfg.population_size);

        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by(|&a, &b| population[b].fitness().total_cmp(&population[a].fitness()));
        next.extend(
            ranked
                .iter()
                .take(cfg.elite_count())
                .map(|&i| population[i].clone()),
        );

        while next.len() < cfg.population_size {
            let (Some(i), Some(j)) = (
                tournament_select(population, cfg.tournament_size, rng),
                tournament_select(population, cfg.tournament_size, rng),
            ) else {
                break;
            };
            let (p1, p2) = (&population[i], &population[j]);

            let mut child = if k > 1 && rng.random::<f64>() < cfg.crossover_rate {
                Tour::new(order_crossover(p1.stops(), p2.stops(), rng))
            } else {
                fitter_parent(p1, p2).clone()
            };

            if k > 1 && rng.random::<f64>() < cfg.mutation_rate {
                inversion_mutation(child.stops_mut(), rng);
            }
            next.push(child);
        }
        next
    }
}

fn best_distance(population: &[Tour]) -> f64 {
    population
        .iter()
        .map(Tour::distance)
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::UNREACHABLE;
    use proptest::prelude::*;

    fn scenario_a() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 2.0, 5.0, 9.0],
            vec![2.0, 0.0, 3.0, 6.0],
            vec![5.0, 3.0, 0.0, 4.0],
            vec![9.0, 6.0, 4.0, 0.0],
        ])
        .expect("valid")
    }

    fn line(n: usize) -> DistanceMatrix {
        // depot at 0, employee i at position i on a line
        let rows = (0..=n)
            .map(|i| (0..=n).map(|j| (i as f64 - j as f64).abs()).collect())
            .collect();
        DistanceMatrix::from_rows(rows).expect("valid")
    }

    fn small(seed: u64) -> RouteOptimizer {
        RouteOptimizer::new(
            TspConfig::default()
                .with_population_size(50)
                .with_generations(80)
                .with_seed(seed),
        )
    }

    #[test]
    fn test_converges_to_global_optimum() {
        let sol = small(42).solve(&scenario_a()).expect("solve");
        assert_eq!(sol.route().stops(), &[1, 2, 3]);
        assert!((sol.distance() - 9.0).abs() < 1e-10);
        assert_eq!(sol.status(), TourStatus::Optimized);
        assert_eq!(sol.generations(), 80);
    }

    #[test]
    fn test_empty_instance_skips_ga() {
        let dm = DistanceMatrix::new(1);
        let sol = small(1).solve(&dm).expect("solve");
        assert!(sol.route().is_empty());
        assert_eq!(sol.distance(), 0.0);
        assert_eq!(sol.status(), TourStatus::Trivial);
        assert_eq!(sol.generations(), 0);

        let sol = small(1).solve(&DistanceMatrix::new(0)).expect("solve");
        assert!(sol.route().is_empty());
    }

    #[test]
    fn test_single_stop() {
        let dm = DistanceMatrix::from_rows(vec![vec![0.0, 7.5], vec![7.5, 0.0]]).expect("valid");
        let sol = small(1).solve(&dm).expect("solve");
        assert_eq!(sol.route().stops(), &[1]);
        assert!((sol.distance() - 7.5).abs() < 1e-10);
        assert_eq!(sol.generations(), 0);
    }

    #[test]
    fn test_same_seed_same_route() {
        let dm = line(12);
        let a = small(7).solve(&dm).expect("solve");
        let b = small(7).solve(&dm).expect("solve");
        assert_eq!(a.route(), b.route());
        assert_eq!(a.distance(), b.distance());
    }

    #[test]
    fn test_parallel_and_serial_agree() {
        let dm = line(10);
        let par = small(5).solve(&dm).expect("solve");
        let ser = RouteOptimizer::new(small(5).config().clone().with_parallel(false))
            .solve(&dm)
            .expect("solve");
        assert_eq!(par.route(), ser.route());
    }

    #[test]
    fn test_line_is_solved_in_order() {
        let sol = RouteOptimizer::new(
            TspConfig::default()
                .with_population_size(120)
                .with_generations(300)
                .with_seed(3),
        )
        .solve(&line(6))
        .expect("solve");
        assert_eq!(sol.route().stops(), &[1, 2, 3, 4, 5, 6]);
        assert!((sol.distance() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_sentinel_route_never_best_when_alternative_exists() {
        let mut dm = scenario_a();
        // block the optimal 1 → 2 edge
        dm.set(1, 2, UNREACHABLE);
        let sol = small(9).solve(&dm).expect("solve");
        assert!(sol.is_reachable());
        assert!(sol.distance() < UNREACHABLE);
        assert!(!sol.route().stops().windows(2).any(|w| w == [1, 2]));
    }

    #[test]
    fn test_all_routes_unreachable_is_flagged() {
        let mut dm = DistanceMatrix::new(3);
        dm.set(0, 1, UNREACHABLE);
        dm.set(0, 2, UNREACHABLE);
        dm.set(1, 2, 1.0);
        dm.set(2, 1, 1.0);
        let sol = small(2).solve(&dm).expect("solve");
        assert_eq!(sol.status(), TourStatus::Unreachable);
        assert!(!sol.is_reachable());
        assert!(matches!(
            sol.into_reachable(),
            Err(RoutingError::UnreachableRoute { .. })
        ));
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let err = small(1)
            .solve_with(&line(5), 1, Some(&token))
            .unwrap_err();
        assert_eq!(err, RoutingError::Cancelled);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let optimizer = RouteOptimizer::new(TspConfig::default().with_population_size(0));
        assert!(matches!(
            optimizer.solve(&line(3)),
            Err(RoutingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_generations_returns_best_initial() {
        let optimizer = RouteOptimizer::new(
            TspConfig::default()
                .with_population_size(30)
                .with_generations(0)
                .with_seed(4),
        );
        let sol = optimizer.solve(&line(5)).expect("solve");
        assert!(sol.route().is_permutation_of(5));
        assert_eq!(sol.generations(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_route_is_permutation(k in 1usize..15, seed in any::<u64>()) {
            let optimizer = RouteOptimizer::new(
                TspConfig::default()
                    .with_population_size(12)
                    .with_generations(10)
                    .with_crossover_rate(0.9)
                    .with_mutation_rate(0.5)
                    .with_parallel(false),
            );
            let sol = optimizer.solve_with(&line(k), seed, None).expect("solve");
            prop_assert!(sol.route().is_permutation_of(k));
        }
    }
}
