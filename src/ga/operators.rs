//! Permutation operators: initialization, tournament selection, parent
//! copying, order crossover (OX), and inversion mutation.
//!
//! Every operator maps permutations of `1..=k` to permutations of `1..=k`.
//!
//! # Reference
//!
//! Davis, L. (1985). "Applying adaptive algorithms to epistatic domains",
//! *Proceedings of IJCAI* 85, 162-164.

use rand::seq::SliceRandom;
use rand::Rng;

use super::chromosome::Tour;

/// A uniformly random permutation of `1..=k`.
pub fn random_permutation<R: Rng + ?Sized>(k: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (1..=k).collect();
    perm.shuffle(rng);
    perm
}

/// Samples `size` individuals uniformly (with replacement) and returns the
/// index of the fittest. Earlier draws win ties.
///
/// Returns `None` for an empty population.
pub fn tournament_select<R: Rng + ?Sized>(
    population: &[Tour],
    size: usize,
    rng: &mut R,
) -> Option<usize> {
    if population.is_empty() {
        return None;
    }
    let rounds = size.clamp(1, population.len());
    let mut best = rng.random_range(0..population.len());
    for _ in 1..rounds {
        let candidate = rng.random_range(0..population.len());
        if population[candidate].fitness() > population[best].fitness() {
            best = candidate;
        }
    }
    Some(best)
}

/// The parent a child copies when crossover is skipped.
///
/// `parent1` is chosen only if it is strictly fitter; ties go to `parent2`.
pub fn fitter_parent<'a>(parent1: &'a Tour, parent2: &'a Tour) -> &'a Tour {
    if parent1.fitness() > parent2.fitness() {
        parent1
    } else {
        parent2
    }
}

/// Order crossover with a random cut range.
///
/// Tours of length 0 or 1 are returned as a copy of `parent1`.
pub fn order_crossover<R: Rng + ?Sized>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> Vec<usize> {
    let k = parent1.len();
    if k <= 1 {
        return parent1.to_vec();
    }
    let a = rng.random_range(0..k);
    let b = rng.random_range(0..k);
    order_crossover_at(parent1, parent2, a.min(b), a.max(b))
}

/// Order crossover over the inclusive cut `[start, end]`.
///
/// The child keeps `parent1[start..=end]` in place. The remaining positions
/// are filled starting at `(end + 1) mod k`, wrapping, with the genes of
/// `parent2` read cyclically from the same offset and skipping genes
/// already placed.
///
/// ```
/// use u_shuttle::ga::operators::order_crossover_at;
///
/// let child = order_crossover_at(&[1, 2, 3, 4, 5], &[5, 4, 3, 2, 1], 1, 2);
/// assert_eq!(child, vec![4, 2, 3, 1, 5]);
/// ```
pub fn order_crossover_at(parent1: &[usize], parent2: &[usize], start: usize, end: usize) -> Vec<usize> {
    let k = parent1.len();
    let mut child = vec![0; k];
    let mut placed = vec![false; k + 1];

    for i in start..=end {
        child[i] = parent1[i];
        placed[parent1[i]] = true;
    }

    let mut pos = (end + 1) % k;
    for i in 0..k {
        let gene = parent2[(end + 1 + i) % k];
        if !placed[gene] {
            child[pos] = gene;
            placed[gene] = true;
            pos = (pos + 1) % k;
        }
    }
    child
}

/// Reverses the segment between two random distinct positions.
///
/// Tours shorter than 2 are left unchanged.
pub fn inversion_mutation<R: Rng + ?Sized>(stops: &mut [usize], rng: &mut R) {
    let k = stops.len();
    if k < 2 {
        return;
    }
    let i = rng.random_range(0..k);
    let mut j = rng.random_range(0..k);
    if i == j {
        j = (i + 1 + rng.random_range(0..k - 1)) % k;
    }
    stops[i.min(j)..=i.max(j)].reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn is_perm(v: &[usize], k: usize) -> bool {
        let mut sorted = v.to_vec();
        sorted.sort_unstable();
        sorted == (1..=k).collect::<Vec<_>>()
    }

    fn scored(distances: &[f64]) -> Vec<Tour> {
        use crate::distance::DistanceMatrix;
        distances
            .iter()
            .map(|&d| {
                let dm = DistanceMatrix::from_rows(vec![vec![0.0, d], vec![d, 0.0]]).expect("valid");
                let mut t = Tour::new(vec![1]);
                t.evaluate(&dm);
                t
            })
            .collect()
    }

    #[test]
    fn test_random_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let p = random_permutation(10, &mut rng);
        assert!(is_perm(&p, 10));
        assert!(random_permutation(0, &mut rng).is_empty());
    }

    #[test]
    fn test_ox_wraps_fill_pointer() {
        // slice [3,4] at positions 2..=3; parent2 read from position 4: 1,5,4,3,2
        let child = order_crossover_at(&[1, 2, 3, 4, 5], &[5, 4, 3, 2, 1], 2, 3);
        assert_eq!(child, vec![5, 2, 3, 4, 1]);
    }

    #[test]
    fn test_ox_full_slice_copies_parent1() {
        let child = order_crossover_at(&[3, 1, 2], &[1, 2, 3], 0, 2);
        assert_eq!(child, vec![3, 1, 2]);
    }

    #[test]
    fn test_ox_trivial_lengths() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(order_crossover(&[1], &[1], &mut rng), vec![1]);
        assert!(order_crossover(&[], &[], &mut rng).is_empty());
    }

    #[test]
    fn test_inversion_changes_two_element_tour() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut stops = vec![1, 2];
        inversion_mutation(&mut stops, &mut rng);
        assert_eq!(stops, vec![2, 1]);
    }

    #[test]
    fn test_inversion_single_is_noop() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut stops = vec![1];
        inversion_mutation(&mut stops, &mut rng);
        assert_eq!(stops, vec![1]);
    }

    #[test]
    fn test_tournament_picks_fittest_when_all_sampled() {
        let population = scored(&[10.0, 2.0, 5.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        // index 1 wins whenever it is drawn: 1 - (2/3)^3, about 70% of rounds
        let wins = (0..200)
            .filter_map(|_| tournament_select(&population, 3, &mut rng))
            .filter(|&i| i == 1)
            .count();
        assert!(wins > 100);
        assert_eq!(tournament_select(&[], 3, &mut rng), None);
    }

    #[test]
    fn test_fitter_parent_strict_and_tied() {
        use crate::distance::DistanceMatrix;

        let population = scored(&[10.0, 2.0]);
        assert!(std::ptr::eq(fitter_parent(&population[1], &population[0]), &population[1]));
        assert!(std::ptr::eq(fitter_parent(&population[0], &population[1]), &population[1]));

        // both orders cost 2 + 3
        let dm = DistanceMatrix::from_rows(vec![
            vec![0.0, 2.0, 2.0],
            vec![2.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ])
        .expect("valid");
        let mut forward = Tour::new(vec![1, 2]);
        let mut backward = Tour::new(vec![2, 1]);
        forward.evaluate(&dm);
        backward.evaluate(&dm);
        assert_eq!(forward.fitness(), backward.fitness());
        assert_eq!(fitter_parent(&forward, &backward).stops(), &[2, 1]);
        assert_eq!(fitter_parent(&backward, &forward).stops(), &[1, 2]);
    }

    proptest! {
        #[test]
        fn prop_ox_preserves_permutation(k in 1usize..30, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let p1 = random_permutation(k, &mut rng);
            let p2 = random_permutation(k, &mut rng);
            let child = order_crossover(&p1, &p2, &mut rng);
            prop_assert!(is_perm(&child, k));
        }

        #[test]
        fn prop_inversion_preserves_permutation(k in 0usize..30, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut stops = random_permutation(k, &mut rng);
            inversion_mutation(&mut stops, &mut rng);
            prop_assert!(is_perm(&stops, k));
        }
    }
}
