//! Survival selection and generational replacement.
//!
//! Every [`SurvivalSelection`] assumes its input is sorted best-first by
//! rank and returns the survivors in the same order. A
//! [`SurvivalStrategy`] decides which individuals compete (parents and
//! offspring, or offspring alone), re-ranks them through the Pareto front
//! engine, and hands the ranked pool to the selector.

use rand::Rng;

use super::pareto::rank_population;
use super::types::RankedIndividual;
use crate::error::{Error, Result};

/// Survival selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurvivalSelection {
    /// Keep the first `target` individuals.
    Truncation,

    /// Uniform sample of `target` individuals by reservoir sampling.
    ///
    /// One O(n) pass; the sampled subset keeps its relative order.
    Uniform,

    /// Fitness-proportional selection by stochastic acceptance.
    ///
    /// Each output slot draws from the unplaced suffix and accepts with
    /// probability `rank / max rank of that suffix`. The chosen prefix is
    /// re-sorted by rank.
    FitnessProportional,

    /// k-tournament without replacement.
    ///
    /// Each of the `n - target` eliminations draws `k` contenders from the
    /// remaining pool and removes the one with the largest index (the
    /// worst, in a best-first population). The survivors are re-sorted by
    /// rank.
    Tournament(usize),
}

impl Default for SurvivalSelection {
    fn default() -> Self {
        SurvivalSelection::Truncation
    }
}

impl SurvivalSelection {
    /// Reduces a best-first population to `target` survivors, best-first.
    ///
    /// A population already at or below `target` is returned unchanged.
    pub fn select<R: Rng>(
        &self,
        population: Vec<RankedIndividual>,
        target: usize,
        rng: &mut R,
    ) -> Vec<RankedIndividual> {
        if target >= population.len() {
            return population;
        }

        match self {
            SurvivalSelection::Truncation => truncate(population, target),
            SurvivalSelection::Uniform => reservoir_sample(population, target, rng),
            SurvivalSelection::FitnessProportional => {
                fitness_proportional(population, target, rng)
            }
            SurvivalSelection::Tournament(k) => tournament(population, target, *k, rng),
        }
    }
}

fn truncate(mut population: Vec<RankedIndividual>, target: usize) -> Vec<RankedIndividual> {
    population.truncate(target);
    population
}

/// Ordered reservoir sampling: element `i` is kept with probability
/// `(still needed) / (still available)`, which yields exactly `target`.
fn reservoir_sample<R: Rng>(
    population: Vec<RankedIndividual>,
    target: usize,
    rng: &mut R,
) -> Vec<RankedIndividual> {
    let n = population.len();
    let mut selected = Vec::with_capacity(target);
    for (index, individual) in population.into_iter().enumerate() {
        let needed = target - selected.len();
        let probability = needed as f64 / (n - index) as f64;
        if rng.random::<f64>() < probability {
            selected.push(individual);
        }
    }
    selected
}

fn fitness_proportional<R: Rng>(
    mut population: Vec<RankedIndividual>,
    target: usize,
    rng: &mut R,
) -> Vec<RankedIndividual> {
    let n = population.len();
    for slot in 0..target {
        let max_rank = population[slot..]
            .iter()
            .map(|ind| ind.rank)
            .max()
            .unwrap_or(0);

        let chosen = if max_rank == 0 {
            rng.random_range(slot..n)
        } else {
            // the max-rank member always accepts, so this terminates
            let max_rank = max_rank as f64;
            loop {
                let dart = rng.random_range(slot..n);
                if rng.random::<f64>() < population[dart].rank as f64 / max_rank {
                    break dart;
                }
            }
        };
        population.swap(slot, chosen);
    }

    population.truncate(target);
    sort_best_first(&mut population);
    population
}

fn tournament<R: Rng>(
    mut population: Vec<RankedIndividual>,
    target: usize,
    k: usize,
    rng: &mut R,
) -> Vec<RankedIndividual> {
    let k = k.max(1);
    let n = population.len();
    let eliminations = n - target;

    for slot in 0..eliminations {
        let dead = (0..k)
            .map(|_| rng.random_range(slot..n))
            .max()
            .unwrap_or(slot);
        population.swap(slot, dead);
    }

    let mut survivors = population.split_off(eliminations);
    sort_best_first(&mut survivors);
    survivors
}

/// Stable sort by descending rank, then descending objectives.
///
/// The objective tie-break reproduces the member order `generate_fronts`
/// gives inside a front, so a front with unchanged contents keeps the same
/// order across generations.
fn sort_best_first(population: &mut [RankedIndividual]) {
    population.sort_by(|a, b| {
        b.rank
            .cmp(&a.rank)
            .then(b.satisfied.cmp(&a.satisfied))
            .then(b.free.cmp(&a.free))
    });
}

/// Generational replacement scheme, `(μ + λ)` or `(μ, λ)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurvivalStrategy {
    /// Parents and offspring compete together. Elitist: the best front
    /// can only improve or stay.
    #[default]
    Plus,

    /// Parents are discarded; only offspring compete. Requires at least
    /// as many offspring as survivors.
    Comma,
}

impl SurvivalStrategy {
    /// Produces the next generation of `target` individuals, best-first.
    ///
    /// # Errors
    ///
    /// [`Error::UndersizedOffspring`] if the comma strategy receives fewer
    /// than `target` offspring.
    pub fn apply<R: Rng>(
        &self,
        population: Vec<RankedIndividual>,
        offspring: Vec<RankedIndividual>,
        selection: &SurvivalSelection,
        target: usize,
        rng: &mut R,
    ) -> Result<Vec<RankedIndividual>> {
        let pool = match self {
            SurvivalStrategy::Plus => {
                let mut pool = population;
                pool.extend(offspring);
                pool
            }
            SurvivalStrategy::Comma => {
                if offspring.len() < target {
                    return Err(Error::UndersizedOffspring {
                        offspring: offspring.len(),
                        target,
                    });
                }
                offspring
            }
        };

        let ranked = rank_population(pool);
        Ok(selection.select(ranked, target, rng))
    }
}
