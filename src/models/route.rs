//! Pickup route type.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::evaluation::{is_path_reachable, path_distance};

/// An open pickup path `depot → stops[0] → … → stops[n-1]`.
///
/// The depot is implicit and there is no return leg. Stops are matrix node
/// indices, each appearing at most once.
///
/// # Examples
///
/// ```
/// use u_shuttle::models::Route;
///
/// let route = Route::new(vec![2, 3, 1]);
/// assert_eq!(route.len(), 3);
/// assert!(route.is_permutation_of(3));
///
/// let global = route.remap(&[10, 20, 30]);
/// assert_eq!(global.stops(), &[20, 30, 10]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    stops: Vec<usize>,
}

impl Route {
    /// Creates a route from an ordered list of stops.
    pub fn new(stops: Vec<usize>) -> Self {
        Self { stops }
    }

    /// The empty route.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Stops in visiting order.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Consumes the route, returning its stops.
    pub fn into_stops(self) -> Vec<usize> {
        self.stops
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if the route has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Returns `true` if the stops are exactly `{1..=k}`, each once.
    pub fn is_permutation_of(&self, k: usize) -> bool {
        if self.stops.len() != k {
            return false;
        }
        let mut seen = vec![false; k + 1];
        for &s in &self.stops {
            if s == 0 || s > k || seen[s] {
                return false;
            }
            seen[s] = true;
        }
        true
    }

    /// Maps local stops `1..=n` to `nodes[stop - 1]`.
    ///
    /// # Panics
    ///
    /// Panics if a stop is 0 or greater than `nodes.len()`.
    pub fn remap(&self, nodes: &[usize]) -> Route {
        Route::new(self.stops.iter().map(|&s| nodes[s - 1]).collect())
    }

    /// Open-path distance over `distances`.
    pub fn distance(&self, distances: &DistanceMatrix) -> f64 {
        path_distance(&self.stops, distances)
    }

    /// Returns `true` if no edge of the path is unreachable.
    pub fn is_reachable(&self, distances: &DistanceMatrix) -> bool {
        is_path_reachable(&self.stops, distances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::UNREACHABLE;

    #[test]
    fn test_route_empty() {
        let r = Route::empty();
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert!(r.is_permutation_of(0));
    }

    #[test]
    fn test_is_permutation_of() {
        assert!(Route::new(vec![3, 1, 2]).is_permutation_of(3));
        assert!(!Route::new(vec![1, 1, 2]).is_permutation_of(3));
        assert!(!Route::new(vec![1, 2]).is_permutation_of(3));
        assert!(!Route::new(vec![0, 1, 2]).is_permutation_of(3));
        assert!(!Route::new(vec![1, 2, 4]).is_permutation_of(3));
    }

    #[test]
    fn test_distance_and_reachability() {
        let mut dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 2.0, 5.0],
            vec![2.0, 0.0, 3.0],
            vec![5.0, 3.0, 0.0],
        ])
        .expect("valid");
        let r = Route::new(vec![1, 2]);
        assert!((r.distance(&dm) - 5.0).abs() < 1e-10);
        assert!(r.is_reachable(&dm));

        dm.set(1, 2, UNREACHABLE);
        assert!(!r.is_reachable(&dm));
    }

    #[test]
    fn test_serializes_as_list() {
        let json = serde_json::to_string(&Route::new(vec![4, 2])).expect("json");
        assert_eq!(json, "[4,2]");
    }
}
