//! Tour chromosome for the shuttle TSP.
//!
//! A tour is a permutation of the local stops `1..=k`; the depot (0) is the
//! implicit start and is never part of the chromosome.

use crate::distance::DistanceMatrix;
use crate::evaluation::{fitness, path_distance};

/// One individual of the population.
///
/// `distance` and `fitness` are filled by [`evaluate`](Self::evaluate); until
/// then the tour is unscored (infinite distance, zero fitness).
///
/// # Examples
///
/// ```
/// use u_shuttle::distance::DistanceMatrix;
/// use u_shuttle::ga::Tour;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 2.0, 5.0],
///     vec![2.0, 0.0, 3.0],
///     vec![5.0, 3.0, 0.0],
/// ])
/// .unwrap();
/// let mut tour = Tour::new(vec![1, 2]);
/// tour.evaluate(&dm);
/// assert_eq!(tour.distance(), 5.0);
/// assert!((tour.fitness() - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Tour {
    stops: Vec<usize>,
    distance: f64,
    fitness: f64,
}

impl Tour {
    /// Creates an unscored tour from a stop permutation.
    pub fn new(stops: Vec<usize>) -> Self {
        Self {
            stops,
            distance: f64::INFINITY,
            fitness: 0.0,
        }
    }

    /// Returns the stop permutation.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Returns a mutable reference to the stop permutation.
    ///
    /// Callers must re-evaluate after editing.
    pub fn stops_mut(&mut self) -> &mut Vec<usize> {
        &mut self.stops
    }

    /// Consumes the tour, returning its stops.
    pub fn into_stops(self) -> Vec<usize> {
        self.stops
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns true if the tour has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Open-path distance from the last evaluation.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// `1 / distance` from the last evaluation (0 for degenerate distances).
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Scores the tour against `distances`.
    pub fn evaluate(&mut self, distances: &DistanceMatrix) {
        self.distance = path_distance(&self.stops, distances);
        self.fitness = fitness(self.distance);
    }
}
