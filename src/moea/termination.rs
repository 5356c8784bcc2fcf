//! Convergence detectors.
//!
//! A [`Terminator`] is evaluated once per generation on the freshly ranked
//! population and keeps state between calls. The runner builds a fresh
//! set of detectors from the configured [`Termination`] variants at the start
//! of every run.

use super::pareto::{fronts_equal, get_best_front};
use super::types::RankedIndividual;

/// A stateful stopping rule.
pub trait Terminator: Send {
    /// Observes one generation and returns `true` once the rule fires.
    ///
    /// `population` must be sorted best-first by rank.
    fn evaluate(&mut self, population: &[RankedIndividual]) -> bool;

    /// Forgets all observations.
    fn reset(&mut self);
}

/// Configuration-time choice of detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Mean rank unchanged for the given number of consecutive repeats.
    StableAverage(usize),
    /// Best individual unchanged for the given number of consecutive repeats.
    StableBest(usize),
    /// Best front unchanged for the given number of consecutive generations.
    StablePareto(usize),
}

impl Termination {
    /// The detector's window length.
    pub fn window(&self) -> usize {
        match *self {
            Termination::StableAverage(n)
            | Termination::StableBest(n)
            | Termination::StablePareto(n) => n,
        }
    }

    /// Builds a fresh detector.
    pub fn build(&self) -> Box<dyn Terminator> {
        match *self {
            Termination::StableAverage(n) => Box::new(StableAverage::new(n)),
            Termination::StableBest(n) => Box::new(StableBest::new(n)),
            Termination::StablePareto(n) => Box::new(StablePareto::new(n)),
        }
    }
}

/// Fires when the mean rank is bit-for-bit identical on `n` consecutive
/// calls after the one that set it.
#[derive(Debug, Clone)]
pub struct StableAverage {
    n: usize,
    matching: usize,
    previous: Option<f64>,
}

impl StableAverage {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            matching: 0,
            previous: None,
        }
    }
}

impl Terminator for StableAverage {
    fn evaluate(&mut self, population: &[RankedIndividual]) -> bool {
        if population.is_empty() {
            return false;
        }
        let total: usize = population.iter().map(|ind| ind.rank).sum();
        let average = total as f64 / population.len() as f64;

        if self.previous.map(f64::to_bits) == Some(average.to_bits()) {
            self.matching += 1;
            self.matching >= self.n
        } else {
            self.matching = 0;
            self.previous = Some(average);
            false
        }
    }

    fn reset(&mut self) {
        self.matching = 0;
        self.previous = None;
    }
}

/// Fires when the maximal individual is unchanged on `n` consecutive calls
/// after the one that set it.
///
/// "Maximal" uses [`RankedIndividual`]'s ordering: rank, satisfied, free,
/// then genome.
#[derive(Debug, Clone)]
pub struct StableBest {
    n: usize,
    matching: usize,
    previous: Option<RankedIndividual>,
}

impl StableBest {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            matching: 0,
            previous: None,
        }
    }
}

impl Terminator for StableBest {
    fn evaluate(&mut self, population: &[RankedIndividual]) -> bool {
        let Some(best) = population.iter().max() else {
            return false;
        };

        if self.previous.as_ref() == Some(best) {
            self.matching += 1;
            self.matching >= self.n
        } else {
            self.matching = 0;
            self.previous = Some(best.clone());
            false
        }
    }

    fn reset(&mut self) {
        self.matching = 0;
        self.previous = None;
    }
}

/// Fires once the best front has had the same objective pairs, in the same
/// order, for `n` consecutive generations (counting the first).
#[derive(Debug, Clone)]
pub struct StablePareto {
    n: usize,
    match_count: usize,
    front: Vec<RankedIndividual>,
}

impl StablePareto {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            match_count: 1,
            front: Vec::new(),
        }
    }
}

impl Terminator for StablePareto {
    fn evaluate(&mut self, population: &[RankedIndividual]) -> bool {
        let front: Vec<RankedIndividual> = get_best_front(population).cloned().collect();

        if fronts_equal(&front, &self.front) {
            self.match_count += 1;
            self.match_count >= self.n
        } else {
            self.match_count = 1;
            self.front = front;
            false
        }
    }

    fn reset(&mut self) {
        self.match_count = 1;
        self.front.clear();
    }
}
