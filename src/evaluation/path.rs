//! Open-path distance and fitness.
//!
//! A shuttle route starts at the depot and ends at the last pickup; there is
//! no return leg:
//!
//! ```text
//! distance = d(0, r[0]) + Σ d(r[i], r[i+1])
//! ```

use crate::distance::DistanceMatrix;

/// Total distance of the open path `depot → route[0] → … → route[n-1]`.
///
/// An empty route has distance 0. Unreachable edges contribute the sentinel
/// value, so a path crossing one is always longer than any real path.
///
/// # Examples
///
/// ```
/// use u_shuttle::distance::DistanceMatrix;
/// use u_shuttle::evaluation::path_distance;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 2.0, 5.0],
///     vec![2.0, 0.0, 3.0],
///     vec![5.0, 3.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(path_distance(&[1, 2], &dm), 5.0);
/// assert_eq!(path_distance(&[2, 1], &dm), 8.0);
/// assert_eq!(path_distance(&[], &dm), 0.0);
/// ```
pub fn path_distance(route: &[usize], distances: &DistanceMatrix) -> f64 {
    let Some(&first) = route.first() else {
        return 0.0;
    };
    distances.get(0, first)
        + route
            .windows(2)
            .map(|w| distances.get(w[0], w[1]))
            .sum::<f64>()
}

/// GA fitness of a path distance: `1 / distance`, or 0 when the distance is
/// zero, negative, or not finite.
pub fn fitness(distance: f64) -> f64 {
    if distance > 0.0 && distance.is_finite() {
        1.0 / distance
    } else {
        0.0
    }
}

/// Returns `true` if no edge of the open path is unreachable.
pub fn is_path_reachable(route: &[usize], distances: &DistanceMatrix) -> bool {
    let Some(&first) = route.first() else {
        return true;
    };
    !distances.is_unreachable(0, first)
        && route
            .windows(2)
            .all(|w| !distances.is_unreachable(w[0], w[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::UNREACHABLE;

    fn triangle() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 2.0, 5.0, 9.0],
            vec![2.0, 0.0, 3.0, 6.0],
            vec![5.0, 3.0, 0.0, 4.0],
            vec![9.0, 6.0, 4.0, 0.0],
        ])
        .expect("valid")
    }

    #[test]
    fn test_open_path_has_no_return_leg() {
        let dm = triangle();
        assert!((path_distance(&[1, 2, 3], &dm) - 9.0).abs() < 1e-10);
        assert!((path_distance(&[3, 2, 1], &dm) - 16.0).abs() < 1e-10);
        assert!((path_distance(&[2], &dm) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_fitness() {
        assert!((fitness(4.0) - 0.25).abs() < 1e-12);
        assert_eq!(fitness(0.0), 0.0);
        assert_eq!(fitness(f64::INFINITY), 0.0);
        assert_eq!(fitness(f64::NAN), 0.0);
        assert!(fitness(UNREACHABLE) < 1e-8);
    }

    #[test]
    fn test_reachability() {
        let mut dm = triangle();
        dm.set(1, 3, UNREACHABLE);
        assert!(is_path_reachable(&[1, 2, 3], &dm));
        assert!(!is_path_reachable(&[2, 1, 3], &dm));
        assert!(is_path_reachable(&[], &dm));

        dm.set(0, 2, UNREACHABLE);
        assert!(!is_path_reachable(&[2], &dm));
        assert!(path_distance(&[2, 1, 3], &dm) >= UNREACHABLE);
    }
}
