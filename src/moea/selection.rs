//! Parent selection.
//!
//! A parent selector reads the rank array of the current population (sorted
//! best-first, higher rank = better) and yields one pair of parent indices
//! per child to be produced.
//!
//! # References
//!
//! - Lipowski & Lipowska (2012), "Roulette-wheel selection via stochastic acceptance"
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use rand::Rng;
use tracing::warn;

/// Parent selection strategy.
///
/// # Examples
///
/// ```
/// use sat_moea::moea::ParentSelection;
/// use sat_moea::random::create_rng;
///
/// let ranks = [3, 3, 2, 1];
/// let mut rng = create_rng(42);
/// let pairs = ParentSelection::Tournament(2).select_pairs(&ranks, 5, &mut rng);
/// assert_eq!(pairs.len(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParentSelection {
    /// Two independent uniform draws per pair.
    ///
    /// The draws are not forced apart, so an individual may be paired with
    /// itself.
    Uniform,

    /// Fitness-proportional selection by stochastic acceptance.
    ///
    /// A uniform candidate is accepted with probability `rank / max_rank`.
    /// The two parents of a pair are distinct. Avoids building a cumulative
    /// distribution.
    ///
    /// # Complexity
    /// O(n) expected draws per parent in the worst case, O(1) when ranks
    /// are even.
    FitnessProportional,

    /// k-tournament with replacement.
    ///
    /// Draws `k` indices uniformly and keeps the smallest. In a best-first
    /// population the smallest index is the best contestant.
    ///
    /// # Complexity
    /// O(k) per parent
    Tournament(usize),
}

impl Default for ParentSelection {
    fn default() -> Self {
        ParentSelection::FitnessProportional
    }
}

impl ParentSelection {
    /// Selects `children` parent pairs from a population with the given ranks.
    ///
    /// # Panics
    /// Panics if `ranks` is empty.
    pub fn select_pairs<R: Rng>(
        &self,
        ranks: &[usize],
        children: usize,
        rng: &mut R,
    ) -> Vec<(usize, usize)> {
        assert!(!ranks.is_empty(), "cannot select from empty population");

        match self {
            ParentSelection::Uniform => uniform(ranks.len(), children, rng),
            ParentSelection::FitnessProportional => fitness_proportional(ranks, children, rng),
            ParentSelection::Tournament(k) => tournament(ranks.len(), *k, children, rng),
        }
    }
}

fn uniform<R: Rng>(n: usize, children: usize, rng: &mut R) -> Vec<(usize, usize)> {
    (0..children)
        .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
        .collect()
}

fn tournament<R: Rng>(n: usize, k: usize, children: usize, rng: &mut R) -> Vec<(usize, usize)> {
    let k = k.max(1);
    let pick = |rng: &mut R| {
        (0..k)
            .map(|_| rng.random_range(0..n))
            .min()
            .unwrap_or(0)
    };
    (0..children)
        .map(|_| (pick(&mut *rng), pick(&mut *rng)))
        .collect()
}

fn fitness_proportional<R: Rng>(
    ranks: &[usize],
    children: usize,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    let n = ranks.len();
    if n == 1 {
        // no distinct partner exists
        return vec![(0, 0); children];
    }

    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    (0..children)
        .map(|_| {
            let first = stochastic_acceptance(ranks, max_rank, None, rng);
            let second = stochastic_acceptance(ranks, max_rank, Some(first), rng);
            (first, second)
        })
        .collect()
}

/// Draws until a candidate is accepted with probability `rank / max_rank`.
///
/// The loop is capped; on exhaustion (e.g. every rank zero) it falls back
/// to a uniform draw that still honors `exclude`.
fn stochastic_acceptance<R: Rng>(
    ranks: &[usize],
    max_rank: usize,
    exclude: Option<usize>,
    rng: &mut R,
) -> usize {
    let n = ranks.len();
    if max_rank > 0 {
        let attempts = n.saturating_mul(64).max(1024);
        let max_rank = max_rank as f64;
        for _ in 0..attempts {
            let dart = rng.random_range(0..n);
            if rng.random::<f64>() < ranks[dart] as f64 / max_rank && Some(dart) != exclude {
                return dart;
            }
        }
    }

    warn!(
        population = n,
        max_rank, "stochastic acceptance exhausted, falling back to uniform"
    );
    uniform_excluding(n, exclude, rng)
}

/// Uniform index in `0..n`, skipping `exclude`. Requires `n >= 2` when
/// `exclude` is set.
pub(crate) fn uniform_excluding<R: Rng>(n: usize, exclude: Option<usize>, rng: &mut R) -> usize {
    match exclude {
        Some(skip) => {
            let idx = rng.random_range(0..n - 1);
            if idx >= skip {
                idx + 1
            } else {
                idx
            }
        }
        None => rng.random_range(0..n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_pair_count() {
        let ranks = [2, 2, 1, 1];
        let mut rng = create_rng(42);
        for sel in [
            ParentSelection::Uniform,
            ParentSelection::FitnessProportional,
            ParentSelection::Tournament(3),
        ] {
            let pairs = sel.select_pairs(&ranks, 13, &mut rng);
            assert_eq!(pairs.len(), 13, "{sel:?}");
            assert!(pairs.iter().all(|&(a, b)| a < 4 && b < 4));
        }
    }

    #[test]
    fn test_uniform_allows_self_pairing() {
        let ranks = [1, 1];
        let mut rng = create_rng(42);
        let pairs = ParentSelection::Uniform.select_pairs(&ranks, 200, &mut rng);
        assert!(pairs.iter().any(|&(a, b)| a == b));
    }

    #[test]
    fn test_fitness_proportional_distinct_parents() {
        let ranks = [5, 4, 3, 2, 1];
        let mut rng = create_rng(42);
        let pairs = ParentSelection::FitnessProportional.select_pairs(&ranks, 1000, &mut rng);
        assert!(pairs.iter().all(|&(a, b)| a != b));
    }

    #[test]
    fn test_fitness_proportional_favors_high_rank() {
        let ranks = [10, 1, 1, 1];
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for (a, b) in ParentSelection::FitnessProportional.select_pairs(&ranks, 5000, &mut rng) {
            counts[a] += 1;
            counts[b] += 1;
        }
        assert!(
            counts[0] > counts[1] && counts[0] > counts[2] && counts[0] > counts[3],
            "counts = {counts:?}"
        );
    }

    #[test]
    fn test_fitness_proportional_skewed_terminates() {
        // Only one individual is ever accepted; the second parent must come
        // from the fallback.
        let ranks = [1, 0, 0];
        let mut rng = create_rng(9);
        let pairs = ParentSelection::FitnessProportional.select_pairs(&ranks, 3, &mut rng);
        assert!(pairs.iter().all(|&(a, b)| a == 0 && b != 0));
    }

    #[test]
    fn test_fitness_proportional_single_individual() {
        let mut rng = create_rng(9);
        let pairs = ParentSelection::FitnessProportional.select_pairs(&[1], 2, &mut rng);
        assert_eq!(pairs, vec![(0, 0), (0, 0)]);
    }

    #[test]
    fn test_tournament_favors_low_index() {
        let ranks = [4, 3, 2, 1];
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for (a, b) in ParentSelection::Tournament(4).select_pairs(&ranks, 5000, &mut rng) {
            counts[a] += 1;
            counts[b] += 1;
        }
        // P(min of 4 draws == 0) = 1 - (3/4)^4 ≈ 0.68
        assert!(counts[0] > 6000, "counts = {counts:?}");
    }

    #[test]
    fn test_tournament_size_one_is_uniform() {
        let ranks = [4, 3, 2, 1];
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for (a, b) in ParentSelection::Tournament(1).select_pairs(&ranks, 5000, &mut rng) {
            counts[a] += 1;
            counts[b] += 1;
        }
        for &c in &counts {
            assert!(c > 2000, "expected uniform, got {counts:?}");
        }
    }

    #[test]
    fn test_uniform_excluding_never_hits_excluded() {
        let mut rng = create_rng(5);
        for _ in 0..500 {
            assert_ne!(uniform_excluding(3, Some(1), &mut rng), 1);
        }
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let mut rng = create_rng(42);
        ParentSelection::Uniform.select_pairs(&[], 1, &mut rng);
    }
}
