//! Search configuration.
//!
//! [`MoeaConfig`] holds all parameters that control the evolutionary loop.

use super::selection::ParentSelection;
use super::survival::{SurvivalSelection, SurvivalStrategy};
use super::termination::Termination;
use crate::error::{Error, Result};

/// Configuration for the multi-objective SAT search.
///
/// # Defaults
///
/// ```
/// use sat_moea::moea::MoeaConfig;
///
/// let config = MoeaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.offspring_count, 10);
/// assert_eq!(config.max_evaluations, Some(10_000));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use sat_moea::moea::{MoeaConfig, ParentSelection, SurvivalSelection, SurvivalStrategy};
///
/// let config = MoeaConfig::default()
///     .with_population_size(50)
///     .with_offspring_count(60)
///     .with_parent_selection(ParentSelection::Tournament(4))
///     .with_survival_selection(SurvivalSelection::Tournament(4))
///     .with_survival_strategy(SurvivalStrategy::Comma)
///     .with_stable_pareto(25)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoeaConfig {
    /// Number of survivors kept each generation (μ).
    pub population_size: usize,

    /// Number of children bred each generation (λ).
    pub offspring_count: usize,

    /// Number of independent runs.
    pub runs: usize,

    /// Stop a run once this many fitness evaluations have been spent.
    ///
    /// The initial population counts. Checked once per generation, so a
    /// run may overshoot by up to one offspring batch.
    pub max_evaluations: Option<usize>,

    /// Stop a run after this many generations.
    pub max_generations: Option<usize>,

    /// How breeding pairs are chosen.
    pub parent_selection: ParentSelection,

    /// How survivors are chosen from the ranked pool.
    pub survival_selection: SurvivalSelection,

    /// Whether parents compete with their offspring.
    pub survival_strategy: SurvivalStrategy,

    /// Convergence detectors; a run stops as soon as any of them fires.
    pub termination: Vec<Termination>,

    /// Per-position redraw probability for mutation.
    ///
    /// `None` uses `1 / number of variables`.
    pub mutation_rate: Option<f64>,

    /// Record the hypervolume spread of the best front every generation.
    pub track_diversity: bool,

    /// Execute independent runs on the rayon pool (requires the `parallel`
    /// feature; ignored otherwise).
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for MoeaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            offspring_count: 10,
            runs: 30,
            max_evaluations: Some(10_000),
            max_generations: None,
            parent_selection: ParentSelection::default(),
            survival_selection: SurvivalSelection::default(),
            survival_strategy: SurvivalStrategy::default(),
            termination: Vec::new(),
            mutation_rate: None,
            track_diversity: false,
            parallel: false,
            seed: None,
        }
    }
}

impl MoeaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of offspring per generation.
    pub fn with_offspring_count(mut self, n: usize) -> Self {
        self.offspring_count = n;
        self
    }

    /// Sets the number of independent runs.
    pub fn with_runs(mut self, n: usize) -> Self {
        self.runs = n;
        self
    }

    /// Sets the evaluation budget per run.
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = Some(n);
        self
    }

    /// Removes the evaluation budget.
    pub fn without_evaluation_limit(mut self) -> Self {
        self.max_evaluations = None;
        self
    }

    /// Sets the generation budget per run.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = Some(n);
        self
    }

    /// Sets the parent selection strategy.
    pub fn with_parent_selection(mut self, sel: ParentSelection) -> Self {
        self.parent_selection = sel;
        self
    }

    /// Sets the survival selection strategy.
    pub fn with_survival_selection(mut self, sel: SurvivalSelection) -> Self {
        self.survival_selection = sel;
        self
    }

    /// Sets the survival strategy.
    pub fn with_survival_strategy(mut self, strategy: SurvivalStrategy) -> Self {
        self.survival_strategy = strategy;
        self
    }

    /// Adds a convergence detector.
    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination.push(termination);
        self
    }

    /// Convenience for `.with_termination(Termination::StablePareto(n))`.
    pub fn with_stable_pareto(self, n: usize) -> Self {
        self.with_termination(Termination::StablePareto(n))
    }

    /// Overrides the mutation rate. Values outside `[0, 1]` are kept as
    /// given and rejected by [`validate`](Self::validate).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = Some(rate);
        self
    }

    /// Enables or disables per-generation diversity tracking.
    pub fn with_diversity(mut self, track: bool) -> Self {
        self.track_diversity = track;
        self
    }

    /// Enables or disables parallel runs.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns [`Error::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::config("population_size must be at least 1"));
        }
        if self.offspring_count == 0 {
            return Err(Error::config("offspring_count must be at least 1"));
        }
        if self.runs == 0 {
            return Err(Error::config("runs must be at least 1"));
        }
        if self.max_generations == Some(0) {
            return Err(Error::config("max_generations must be positive or None"));
        }
        if self.parent_selection == ParentSelection::Tournament(0) {
            return Err(Error::config("parent tournament size must be at least 1"));
        }
        if self.survival_selection == SurvivalSelection::Tournament(0) {
            return Err(Error::config("survival tournament size must be at least 1"));
        }
        if self.survival_strategy == SurvivalStrategy::Comma
            && self.offspring_count < self.population_size
        {
            return Err(Error::config(format!(
                "comma strategy needs offspring_count ({}) >= population_size ({})",
                self.offspring_count, self.population_size
            )));
        }
        if self.termination.iter().any(|t| t.window() == 0) {
            return Err(Error::config("termination window must be at least 1"));
        }
        if let Some(rate) = self.mutation_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::config("mutation_rate must lie in [0, 1]"));
            }
        }
        if self.max_evaluations.is_none()
            && self.max_generations.is_none()
            && self.termination.is_empty()
        {
            return Err(Error::config(
                "no stopping rule: set max_evaluations, max_generations or a termination",
            ));
        }
        Ok(())
    }
}
