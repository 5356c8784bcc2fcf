//! Variation operators over three-valued genomes.
//!
//! # Crossover
//!
//! - [`crossover`]: one-point crossover producing a single child
//!
//! # Mutation
//!
//! - [`mutate`]: independent per-position redraw
//! - [`mutate_all`]: [`mutate`] applied across an offspring batch
//! - [`swap_mutate`]: exchange of two random positions
//!
//! # Distance
//!
//! - [`hamming_distance`]: number of differing positions

use rand::Rng;

use crate::sat::{Gene, Genome};

/// A uniformly random genome of the given length.
pub fn random_genome<R: Rng>(length: usize, rng: &mut R) -> Genome {
    (0..length).map(|_| Gene::random(rng)).collect()
}

/// One-point crossover at a fixed cut.
///
/// The child takes `parent1[..cut]` followed by `parent2[cut..]`.
///
/// # Panics
///
/// Panics if the parents differ in length or `cut > parent1.len()`.
///
/// # Example
///
/// ```
/// use sat_moea::moea::operators::crossover_at;
/// use sat_moea::sat::Gene::{False as F, True as T};
///
/// let child = crossover_at(&[T, T, T, T], &[F, F, F, F], 2);
/// assert_eq!(child, vec![T, T, F, F]);
/// ```
pub fn crossover_at(parent1: &[Gene], parent2: &[Gene], cut: usize) -> Genome {
    assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    let mut child = Vec::with_capacity(parent1.len());
    child.extend_from_slice(&parent1[..cut]);
    child.extend_from_slice(&parent2[cut..]);
    child
}

/// One-point crossover with a uniform cut in `[0, len)`.
///
/// Always one child from two parents. Empty parents give an empty child.
pub fn crossover<R: Rng>(parent1: &[Gene], parent2: &[Gene], rng: &mut R) -> Genome {
    let n = parent1.len();
    if n == 0 {
        return Vec::new();
    }
    crossover_at(parent1, parent2, rng.random_range(0..n))
}

/// The default per-position redraw probability: `1 / genome length`.
pub fn default_mutation_rate(genome_length: usize) -> f64 {
    if genome_length == 0 {
        0.0
    } else {
        1.0 / genome_length as f64
    }
}

/// Redraws each position independently with probability `rate`.
///
/// A redrawn position is uniform over all three gene values, so it may
/// come back unchanged.
///
/// # Complexity
/// O(n)
pub fn mutate<R: Rng>(genome: &mut [Gene], rate: f64, rng: &mut R) {
    for gene in genome.iter_mut() {
        if rng.random::<f64>() < rate {
            *gene = Gene::random(rng);
        }
    }
}

/// Applies [`mutate`] in place to every genome of a batch.
pub fn mutate_all<R: Rng>(genomes: &mut [Genome], rate: f64, rng: &mut R) {
    for genome in genomes.iter_mut() {
        mutate(genome, rate, rng);
    }
}

/// Swaps two positions drawn uniformly (possibly the same one).
///
/// Keeps the multiset of gene values, so the free-variable count never
/// changes. No-op on an empty genome.
pub fn swap_mutate<R: Rng>(genome: &mut [Gene], rng: &mut R) {
    let n = genome.len();
    if n == 0 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    genome.swap(i, j);
}

/// Applies [`swap_mutate`] to every genome of a batch.
pub fn swap_mutate_all<R: Rng>(genomes: &mut [Genome], rng: &mut R) {
    for genome in genomes.iter_mut() {
        swap_mutate(genome, rng);
    }
}

/// Number of positions at which two genomes differ.
///
/// # Panics
///
/// Panics if the genomes differ in length.
///
/// # Example
///
/// ```
/// use sat_moea::moea::operators::hamming_distance;
/// use sat_moea::sat::Gene::{DontCare as D, False as F, True as T};
///
/// assert_eq!(hamming_distance(&[T, F, D], &[T, D, F]), 2);
/// ```
pub fn hamming_distance(a: &[Gene], b: &[Gene]) -> usize {
    assert_eq!(a.len(), b.len(), "genomes must have equal length");
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use Gene::{DontCare as D, False as F, True as T};

    #[test]
    fn test_crossover_at_example() {
        assert_eq!(crossover_at(&[T, T, T, T], &[D, D, D, D], 2), vec![T, T, D, D]);
    }

    #[test]
    fn test_crossover_at_bounds() {
        let a = [T, F, T];
        let b = [D, D, D];
        assert_eq!(crossover_at(&a, &b, 0), b.to_vec());
        assert_eq!(crossover_at(&a, &b, 3), a.to_vec());
    }

    #[test]
    fn test_crossover_preserves_length() {
        let mut rng = create_rng(42);
        let a = random_genome(17, &mut rng);
        let b = random_genome(17, &mut rng);
        for _ in 0..100 {
            let child = crossover(&a, &b, &mut rng);
            assert_eq!(child.len(), 17);
            // every position comes from one of the parents at that position
            for (i, g) in child.iter().enumerate() {
                assert!(*g == a[i] || *g == b[i]);
            }
        }
    }

    #[test]
    fn test_crossover_empty() {
        let mut rng = create_rng(1);
        assert!(crossover(&[], &[], &mut rng).is_empty());
    }

    #[test]
    #[should_panic(expected = "parents must have equal length")]
    fn test_crossover_length_mismatch() {
        crossover_at(&[T], &[T, F], 0);
    }

    #[test]
    fn test_mutation_rate_zero_is_identity() {
        let mut rng = create_rng(7);
        let original = random_genome(50, &mut rng);
        let mut genome = original.clone();
        for _ in 0..20 {
            mutate(&mut genome, 0.0, &mut rng);
        }
        assert_eq!(genome, original);
    }

    #[test]
    fn test_mutation_rate_one_redraws_everything() {
        let mut rng = create_rng(7);
        let mut genome = vec![D; 3000];
        mutate(&mut genome, 1.0, &mut rng);
        // Roughly a third of the redraws land back on DontCare.
        let free = genome.iter().filter(|g| g.is_free()).count();
        assert!((700..1300).contains(&free), "free = {free}");
        assert!(genome.contains(&T));
        assert!(genome.contains(&F));
    }

    #[test]
    fn test_mutate_all_touches_batch() {
        let mut rng = create_rng(3);
        let mut batch = vec![vec![D; 100]; 4];
        mutate_all(&mut batch, 1.0, &mut rng);
        for genome in &batch {
            assert!(genome.iter().any(|g| !g.is_free()));
        }
    }

    #[test]
    fn test_default_mutation_rate() {
        assert!((default_mutation_rate(4) - 0.25).abs() < 1e-15);
        assert_eq!(default_mutation_rate(0), 0.0);
    }

    #[test]
    fn test_random_genome_uses_all_values() {
        let mut rng = create_rng(11);
        let genome = random_genome(300, &mut rng);
        for value in Gene::ALL {
            assert!(genome.contains(&value));
        }
    }

    #[test]
    fn test_swap_mutate_moves_at_most_two_positions() {
        let mut rng = create_rng(5);
        let original = random_genome(40, &mut rng);
        let mut seen_change = false;
        for _ in 0..200 {
            let mut genome = original.clone();
            swap_mutate(&mut genome, &mut rng);
            let d = hamming_distance(&original, &genome);
            assert!(d == 0 || d == 2, "distance = {d}");
            seen_change |= d == 2;

            let mut before = original.clone();
            let mut after = genome.clone();
            before.sort();
            after.sort();
            assert_eq!(before, after);
        }
        assert!(seen_change);
    }

    #[test]
    fn test_swap_mutate_empty_and_single() {
        let mut rng = create_rng(5);
        let mut empty: Vec<Gene> = Vec::new();
        swap_mutate(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = vec![T];
        swap_mutate(&mut one, &mut rng);
        assert_eq!(one, vec![T]);
    }

    #[test]
    fn test_swap_mutate_all_keeps_batch_size() {
        let mut rng = create_rng(9);
        let mut batch = vec![vec![T, F, D, D]; 6];
        swap_mutate_all(&mut batch, &mut rng);
        assert_eq!(batch.len(), 6);
        for genome in &batch {
            assert_eq!(genome.iter().filter(|g| g.is_free()).count(), 2);
        }
    }

    #[test]
    fn test_hamming_distance() {
        assert_eq!(hamming_distance(&[], &[]), 0);
        assert_eq!(hamming_distance(&[T, F, D], &[T, F, D]), 0);
        assert_eq!(hamming_distance(&[T, F, D], &[F, D, T]), 3);
    }

    #[test]
    #[should_panic(expected = "genomes must have equal length")]
    fn test_hamming_distance_length_mismatch() {
        hamming_distance(&[T], &[T, F]);
    }
}
