//! Pareto front engine.
//!
//! Both objectives are **maximized**: satisfied clauses (primary) and
//! don't-care variables (secondary). Objective values are exact integers,
//! so ties are unambiguous.
//!
//! # Algorithms
//!
//! - [`generate_fronts`]: sort-and-sweep non-dominated sorting for two objectives
//! - [`generate_zipped_from_fronts`]: flatten fronts into a rank-tagged population
//! - [`add_to_pareto_fronts`]: incremental insertion into existing fronts
//! - [`compare_fronts`] / [`fronts_equal`]: front-to-front comparisons
//! - [`measure`]: normalized hypervolume spread of a front
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - Kung, Luccio & Preparata (1975), "On Finding the Maxima of a Set of Vectors"

use super::types::{Front, Objective, RankedIndividual};

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other (incomparable or identical).
    Neither,
}

/// Compares two `(primary, secondary)` pairs for Pareto dominance (maximization).
///
/// `a` dominates `b` iff it is at least as good in both objectives and
/// strictly better in at least one. Identical pairs are [`Dominance::Neither`].
pub fn dominance_cmp(a: (usize, usize), b: (usize, usize)) -> Dominance {
    let a_better_in_some = a.0 > b.0 || a.1 > b.1;
    let b_better_in_some = b.0 > a.0 || b.1 > a.1;

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Returns `true` if `a` Pareto-dominates `b`.
#[inline]
pub fn dominates(a: &RankedIndividual, b: &RankedIndividual) -> bool {
    dominance_cmp(a.objectives(), b.objectives()) == Dominance::Left
}

/// Partitions individuals into Pareto fronts, best front first.
///
/// # Algorithm
///
/// 1. Sort by primary objective descending, secondary descending (stable)
/// 2. Sweep once, tracking the best secondary value admitted so far. An
///    individual joins the current front if its secondary exceeds that
///    value, or equals it while also matching the primary of the last
///    admitted member (a duplicate Pareto point). Everything else is
///    deferred.
/// 3. Repeat the sweep on the deferred remainder, which stays sorted.
///
/// The secondary tie-break in step 1 makes the sweep agree exactly with
/// [`dominates`]: nothing deferred from a front is non-dominated within it.
///
/// # Complexity
///
/// O(n log n + n·F) where F is the number of fronts.
///
/// # Example
///
/// ```
/// use sat_moea::moea::pareto::generate_fronts;
/// use sat_moea::moea::RankedIndividual;
///
/// let pop = vec![
///     RankedIndividual::new(3, 1, vec![]),
///     RankedIndividual::new(1, 3, vec![]),
///     RankedIndividual::new(2, 2, vec![]),
///     RankedIndividual::new(1, 1, vec![]), // dominated by all three above
/// ];
/// let fronts = generate_fronts(pop);
/// assert_eq!(fronts.len(), 2);
/// assert_eq!(fronts[0].len(), 3);
/// assert_eq!(fronts[1][0].objectives(), (1, 1));
/// ```
pub fn generate_fronts(individuals: Vec<RankedIndividual>) -> Vec<Front> {
    sort_into_fronts(individuals, RankedIndividual::objectives)
}

/// The sweep behind [`generate_fronts`], over anything with an objective pair.
fn sort_into_fronts<T, K>(mut remaining: Vec<T>, key: K) -> Vec<Vec<T>>
where
    K: Fn(&T) -> (usize, usize),
{
    remaining.sort_by(|a, b| {
        let (pa, sa) = key(a);
        let (pb, sb) = key(b);
        pb.cmp(&pa).then(sb.cmp(&sa))
    });

    let mut fronts = Vec::new();
    while !remaining.is_empty() {
        let mut front = Vec::new();
        let mut deferred = Vec::with_capacity(remaining.len());
        // (primary, secondary) of the last admitted member
        let mut last: Option<(usize, usize)> = None;

        for item in remaining {
            let (primary, secondary) = key(&item);
            let admit = match last {
                None => true,
                Some((last_primary, best_secondary)) => {
                    secondary > best_secondary
                        || (secondary == best_secondary && primary == last_primary)
                }
            };
            if admit {
                last = Some((primary, secondary));
                front.push(item);
            } else {
                deferred.push(item);
            }
        }

        fronts.push(front);
        remaining = deferred;
    }
    fronts
}

/// Flattens fronts best-to-worst and tags each member with its rank.
///
/// Every member of front `i` gets rank `fronts.len() - i`, so the best
/// front has the highest rank and the worst front has rank 1. The output
/// is sorted by descending rank.
pub fn generate_zipped_from_fronts(fronts: Vec<Front>) -> Vec<RankedIndividual> {
    let top = fronts.len();
    let mut zipped = Vec::with_capacity(fronts.iter().map(Vec::len).sum());
    for (front_index, front) in fronts.into_iter().enumerate() {
        let rank = top - front_index;
        zipped.extend(front.into_iter().map(|mut ind| {
            ind.rank = rank;
            ind
        }));
    }
    zipped
}

/// Re-ranks a population from scratch: fronts, then flatten.
pub fn rank_population(individuals: Vec<RankedIndividual>) -> Vec<RankedIndividual> {
    generate_zipped_from_fronts(generate_fronts(individuals))
}

/// Checks that no front contains a member dominated by a member of the
/// same or any later front.
///
/// Exhaustive O(F²·n²). Intended for tests and debug assertions.
pub fn verify_fronts(fronts: &[Front]) -> bool {
    fronts.iter().enumerate().all(|(index, front)| {
        fronts[index..].iter().all(|lesser_front| {
            front.iter().all(|better| {
                lesser_front
                    .iter()
                    .all(|lesser| !dominates(lesser, better))
            })
        })
    })
}

/// Inserts one individual into an existing front decomposition.
///
/// Walks the fronts best-first. If some member of a front dominates the
/// newcomer, it falls through to the next front. Otherwise it joins that
/// front, and every member it dominates is evicted and re-inserted from
/// the following front onward with the same rule. Falling off the end
/// creates a new worst front.
///
/// Ranks are not touched; flatten with [`generate_zipped_from_fronts`]
/// to refresh them.
pub fn add_to_pareto_fronts(fronts: &mut Vec<Front>, individual: RankedIndividual) {
    insert_from(fronts, 0, individual);
}

fn insert_from(fronts: &mut Vec<Front>, mut index: usize, individual: RankedIndividual) {
    while index < fronts.len() && fronts[index].iter().any(|m| dominates(m, &individual)) {
        index += 1;
    }
    if index == fronts.len() {
        fronts.push(vec![individual]);
        return;
    }

    let front = std::mem::take(&mut fronts[index]);
    let (evicted, mut kept): (Vec<_>, Vec<_>) =
        front.into_iter().partition(|m| dominates(&individual, m));
    kept.push(individual);
    fronts[index] = kept;

    for member in evicted {
        insert_from(fronts, index + 1, member);
    }
}

/// Fraction of the combined best front that comes from `a`.
///
/// Members of `a` and `b` are pooled and re-sorted into fronts; the result
/// is the share of the new best front contributed by `a`, in `[0, 1]`.
/// A value above 0.5 means `a` improves on `b`. Two empty inputs give 0.
pub fn compare_fronts(a: &[RankedIndividual], b: &[RankedIndividual]) -> f64 {
    let tagged: Vec<(bool, (usize, usize))> = a
        .iter()
        .map(|ind| (true, ind.objectives()))
        .chain(b.iter().map(|ind| (false, ind.objectives())))
        .collect();

    let combined = sort_into_fronts(tagged, |&(_, objectives)| objectives);
    let Some(best) = combined.first() else {
        return 0.0;
    };
    let from_a = best.iter().filter(|(origin, _)| *origin).count();
    from_a as f64 / best.len() as f64
}

/// Position-by-position equality of objective pairs.
///
/// Order-sensitive: both inputs must come from the same deterministic
/// ordering (e.g. two prefixes of rank-sorted populations produced by
/// [`generate_fronts`]) for the comparison to be meaningful.
pub fn fronts_equal(a: &[RankedIndividual], b: &[RankedIndividual]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.objectives() == y.objectives())
}

/// The leading run of a rank-sorted population sharing the top rank.
///
/// The population must already be sorted by descending rank. Returns a
/// borrowing iterator over the prefix; an empty population yields nothing.
pub fn get_best_front(
    population: &[RankedIndividual],
) -> impl Iterator<Item = &RankedIndividual> + '_ {
    let top = population.first().map(|ind| ind.rank);
    population
        .iter()
        .take_while(move |ind| Some(ind.rank) == top)
}

/// Normalized hypervolume spread of a front.
///
/// For every objective, the front is sorted by that objective and each
/// member's running volume is multiplied by its normalized gap to the
/// predecessor (the first member measures from `mins`). One extra tail
/// volume is multiplied by the gap from the last member to `maxs`. The
/// result is `1 − Σ volumes`: higher means a more evenly spread front.
///
/// `objectives`, `mins` and `maxs` are parallel slices. An objective whose
/// bounds coincide contributes a zero gap.
///
/// # Panics
///
/// Panics if `front` is empty or the three parallel slices differ in length.
///
/// # Example
///
/// ```
/// use sat_moea::moea::pareto::measure;
/// use sat_moea::moea::{Objective, RankedIndividual};
///
/// let front = vec![RankedIndividual::new(5, 5, vec![])];
/// let d = measure(&front, &Objective::BOTH, &[0, 0], &[10, 10]);
/// assert!((d - 0.5).abs() < 1e-12);
/// ```
pub fn measure(
    front: &[RankedIndividual],
    objectives: &[Objective],
    mins: &[usize],
    maxs: &[usize],
) -> f64 {
    assert!(!front.is_empty(), "front must not be empty");
    assert_eq!(objectives.len(), mins.len(), "one minimum per objective");
    assert_eq!(objectives.len(), maxs.len(), "one maximum per objective");

    let n = front.len();
    let mut volumes = vec![1.0f64; n];
    let mut tail = 1.0f64;

    for (k, &objective) in objectives.iter().enumerate() {
        let lo = mins[k] as f64;
        let hi = maxs[k] as f64;
        let range = hi - lo;
        let gap = |d: f64| if range > 0.0 { d / range } else { 0.0 };

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| objective.value(&front[i]));

        let mut prev = lo;
        for &i in &order {
            let value = objective.value(&front[i]) as f64;
            volumes[i] *= gap(value - prev);
            prev = value;
        }
        tail *= gap(hi - prev);
    }

    // mathematically in [0, 1]; clamp away rounding residue
    (1.0 - volumes.iter().sum::<f64>() - tail).clamp(0.0, 1.0)
}

// ============================================================================
// Tests
// ============================================================================
