//! Evolutionary loop execution.
//!
//! [`MoeaRunner`] drives the complete search:
//! initialization → scoring → ranking → parent selection → crossover →
//! mutation → survival → repeat, once per independent run, then merges the
//! per-run best fronts into one overall best front.

use std::fmt;

use rand::Rng;
use tracing::{debug, info, warn};

use super::config::MoeaConfig;
use super::operators::{crossover, default_mutation_rate, mutate_all, random_genome};
use super::pareto::{compare_fronts, get_best_front, measure, rank_population};
use super::termination::Terminator;
use super::types::{Objective, RankedIndividual};
use crate::error::{Error, Result};
use crate::random::create_rng;
use crate::sat::{Equation, Genome};

/// Population summary after one generation.
///
/// `Display` renders the tab-separated log line
/// `evaluations, mean satisfied, max satisfied, mean free, max free`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Fitness evaluations spent so far in the run.
    pub evaluations: usize,
    pub mean_satisfied: f64,
    pub max_satisfied: usize,
    pub mean_free: f64,
    pub max_free: usize,
}

impl GenerationStats {
    /// Summarizes a non-empty population.
    pub fn from_population(evaluations: usize, population: &[RankedIndividual]) -> Self {
        let n = population.len().max(1) as f64;
        let (sum_satisfied, sum_free) = population
            .iter()
            .fold((0usize, 0usize), |(s, f), ind| (s + ind.satisfied, f + ind.free));

        Self {
            evaluations,
            mean_satisfied: sum_satisfied as f64 / n,
            max_satisfied: population.iter().map(|i| i.satisfied).max().unwrap_or(0),
            mean_free: sum_free as f64 / n,
            max_free: population.iter().map(|i| i.free).max().unwrap_or(0),
        }
    }
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.evaluations, self.mean_satisfied, self.max_satisfied, self.mean_free, self.max_free
        )
    }
}

/// Outcome of one independent run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// Non-dominated members of the final population, best-first.
    pub best_front: Vec<RankedIndividual>,

    /// Generations executed (the initial population is generation 0).
    pub generations: usize,

    /// Fitness evaluations spent, including the initial population.
    pub evaluations: usize,

    /// Whether a termination detector stopped the run.
    pub converged: bool,

    /// Statistics of the initial population followed by one entry per
    /// generation.
    pub history: Vec<GenerationStats>,

    /// Best-front diversity per entry of `history`; empty unless
    /// [`MoeaConfig::track_diversity`] is set.
    pub diversity: Vec<f64>,
}

impl RunResult {
    /// Highest satisfied-clause count in the best front.
    pub fn best_satisfied(&self) -> usize {
        self.best_front.iter().map(|i| i.satisfied).max().unwrap_or(0)
    }
}

/// Outcome of all runs.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoeaResult {
    /// Per-run results in run order.
    pub runs: Vec<RunResult>,

    /// The best front across runs.
    ///
    /// Starts empty and is replaced by a run's best front whenever that
    /// front dominates more than half of the current one.
    pub overall_best_front: Vec<RankedIndividual>,
}

/// Executes the multi-objective search.
///
/// # Usage
///
/// ```
/// use sat_moea::moea::{MoeaConfig, MoeaRunner};
/// use sat_moea::sat::read_dimacs;
///
/// let equation = read_dimacs("p cnf 3 2\n1 0\n-2 0\n").unwrap();
/// let config = MoeaConfig::default()
///     .with_population_size(10)
///     .with_runs(2)
///     .with_max_evaluations(200)
///     .with_seed(42);
/// let result = MoeaRunner::run(&equation, &config, &[]).unwrap();
/// assert_eq!(result.runs.len(), 2);
/// assert!(!result.overall_best_front.is_empty());
/// ```
pub struct MoeaRunner;

impl MoeaRunner {
    /// Runs `config.runs` independent searches and merges their fronts.
    ///
    /// `seeds` are injected into every run's initial population.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if the configuration fails
    /// [`MoeaConfig::validate`] or a seed genome does not match the
    /// equation's variable count.
    pub fn run(equation: &Equation, config: &MoeaConfig, seeds: &[Genome]) -> Result<MoeaResult> {
        config.validate()?;
        check_seeds(equation, seeds)?;

        let mut master = create_rng(config.seed.unwrap_or_else(rand::random));
        let run_seeds: Vec<u64> = (0..config.runs).map(|_| master.random()).collect();

        let runs = execute_runs(equation, config, seeds, &run_seeds)?;

        let mut overall_best_front = Vec::new();
        for (index, run) in runs.iter().enumerate() {
            let fraction = compare_fronts(&run.best_front, &overall_best_front);
            if fraction > 0.5 {
                info!(run = index + 1, fraction, "new best front");
                overall_best_front = run.best_front.clone();
            }
        }

        Ok(MoeaResult {
            runs,
            overall_best_front,
        })
    }

    /// Runs a single search with the given generator.
    ///
    /// `config.runs` and `config.seed` are ignored.
    pub fn run_once<R: Rng>(
        equation: &Equation,
        config: &MoeaConfig,
        seeds: &[Genome],
        rng: &mut R,
    ) -> Result<RunResult> {
        config.validate()?;
        check_seeds(equation, seeds)?;
        evolve(equation, config, seeds, rng)
    }
}

fn check_seeds(equation: &Equation, seeds: &[Genome]) -> Result<()> {
    let n = equation.number_of_variables();
    match seeds.iter().position(|g| g.len() != n) {
        Some(i) => Err(Error::config(format!(
            "seed genome {} has length {}, expected {n}",
            i + 1,
            seeds[i].len()
        ))),
        None => Ok(()),
    }
}

#[cfg(feature = "parallel")]
fn execute_runs(
    equation: &Equation,
    config: &MoeaConfig,
    seeds: &[Genome],
    run_seeds: &[u64],
) -> Result<Vec<RunResult>> {
    use rayon::prelude::*;

    if config.parallel {
        run_seeds
            .par_iter()
            .map(|&seed| evolve(equation, config, seeds, &mut create_rng(seed)))
            .collect()
    } else {
        run_seeds
            .iter()
            .map(|&seed| evolve(equation, config, seeds, &mut create_rng(seed)))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn execute_runs(
    equation: &Equation,
    config: &MoeaConfig,
    seeds: &[Genome],
    run_seeds: &[u64],
) -> Result<Vec<RunResult>> {
    run_seeds
        .iter()
        .map(|&seed| evolve(equation, config, seeds, &mut create_rng(seed)))
        .collect()
}

/// One run of the generation loop. The configuration is already validated.
fn evolve<R: Rng>(
    equation: &Equation,
    config: &MoeaConfig,
    seeds: &[Genome],
    rng: &mut R,
) -> Result<RunResult> {
    let population_size = config.population_size;
    let n_vars = equation.number_of_variables();
    let rate = config
        .mutation_rate
        .unwrap_or_else(|| default_mutation_rate(n_vars));

    // 1. Initialize: random genomes, seeds replace the tail
    let mut genomes: Vec<Genome> = (0..population_size)
        .map(|_| random_genome(n_vars, rng))
        .collect();
    let seeds = if seeds.len() > population_size {
        warn!(
            seeds = seeds.len(),
            population_size, "more seed genomes than population slots, truncating"
        );
        &seeds[..population_size]
    } else {
        seeds
    };
    genomes.truncate(population_size - seeds.len());
    genomes.extend(seeds.iter().cloned());

    // 2. Score and rank
    let mut population = rank_population(equation.score(genomes));
    let mut evaluations = population_size;

    let mut history = vec![GenerationStats::from_population(evaluations, &population)];
    let mut diversity = Vec::new();
    if config.track_diversity {
        diversity.push(front_diversity(equation, &population));
    }

    let mut detectors: Vec<Box<dyn Terminator>> =
        config.termination.iter().map(|t| t.build()).collect();
    let mut generations = 0usize;
    let mut converged = false;

    // 3. Generation loop
    loop {
        let ranks: Vec<usize> = population.iter().map(|ind| ind.rank).collect();
        let pairs = config
            .parent_selection
            .select_pairs(&ranks, config.offspring_count, rng);

        let mut children: Vec<Genome> = pairs
            .iter()
            .map(|&(a, b)| crossover(&population[a].genome, &population[b].genome, rng))
            .collect();
        mutate_all(&mut children, rate, rng);

        let offspring = equation.score(children);
        evaluations += offspring.len();

        population = config.survival_strategy.apply(
            population,
            offspring,
            &config.survival_selection,
            population_size,
            rng,
        )?;
        generations += 1;

        let stats = GenerationStats::from_population(evaluations, &population);
        debug!(
            generation = generations,
            evaluations,
            max_satisfied = stats.max_satisfied,
            max_free = stats.max_free,
            "generation complete"
        );
        history.push(stats);
        if config.track_diversity {
            diversity.push(front_diversity(equation, &population));
        }

        // every detector observes every generation
        let fired = detectors
            .iter_mut()
            .fold(false, |fired, d| d.evaluate(&population) | fired);
        if fired {
            converged = true;
            break;
        }
        if config.max_evaluations.is_some_and(|max| evaluations >= max)
            || config.max_generations.is_some_and(|max| generations >= max)
        {
            break;
        }
    }

    let best_front: Vec<RankedIndividual> = get_best_front(&population).cloned().collect();
    if let Some(last) = history.last() {
        info!(
            generations,
            evaluations,
            converged,
            best_satisfied = last.max_satisfied,
            best_free = last.max_free,
            "run complete"
        );
    }

    Ok(RunResult {
        best_front,
        generations,
        evaluations,
        converged,
        history,
        diversity,
    })
}

/// Hypervolume spread of the population's best front, bounded by
/// `[0, clauses] x [0, variables]`.
fn front_diversity(equation: &Equation, population: &[RankedIndividual]) -> f64 {
    let len = get_best_front(population).count();
    measure(
        &population[..len],
        &Objective::BOTH,
        &[0, 0],
        &[equation.number_of_clauses(), equation.number_of_variables()],
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moea::pareto::dominates;
    use crate::moea::{ParentSelection, SurvivalSelection, SurvivalStrategy, Termination};
    use crate::sat::Gene;

    fn small_equation() -> Equation {
        Equation::from_clauses(
            6,
            &[
                vec![1, 2],
                vec![-1, 3],
                vec![-2, -3],
                vec![4, -5],
                vec![5, 6],
                vec![-4, -6],
                vec![1, -6],
                vec![2, 5],
            ],
        )
    }

    fn base_config() -> MoeaConfig {
        MoeaConfig::default()
            .with_population_size(20)
            .with_offspring_count(10)
            .with_runs(3)
            .with_max_evaluations(400)
            .with_seed(42)
    }

    #[test]
    fn test_reproducible_with_seed() {
        let eq = small_equation();
        let a = MoeaRunner::run(&eq, &base_config(), &[]).unwrap();
        let b = MoeaRunner::run(&eq, &base_config(), &[]).unwrap();
        assert_eq!(a.overall_best_front, b.overall_best_front);
        for (ra, rb) in a.runs.iter().zip(&b.runs) {
            assert_eq!(ra.history, rb.history);
        }
    }

    #[test]
    fn test_evaluation_budget() {
        let eq = small_equation();
        let result = MoeaRunner::run(&eq, &base_config(), &[]).unwrap();
        assert_eq!(result.runs.len(), 3);
        for run in &result.runs {
            // 20 initial + 10 per generation, stops at the first count >= 400
            assert_eq!(run.evaluations, 400);
            assert_eq!(run.generations, 38);
            assert_eq!(run.history.len(), run.generations + 1);
            assert!(!run.converged);
            assert!(run.diversity.is_empty());
        }
    }

    #[test]
    fn test_generation_budget() {
        let eq = small_equation();
        let config = base_config()
            .without_evaluation_limit()
            .with_max_generations(5)
            .with_runs(1);
        let result = MoeaRunner::run(&eq, &config, &[]).unwrap();
        assert_eq!(result.runs[0].generations, 5);
        assert_eq!(result.runs[0].evaluations, 20 + 5 * 10);
    }

    #[test]
    fn test_plus_strategy_is_elitist() {
        let eq = small_equation();
        let result = MoeaRunner::run(&eq, &base_config(), &[]).unwrap();
        for run in &result.runs {
            for w in run.history.windows(2) {
                assert!(w[1].max_satisfied >= w[0].max_satisfied);
            }
        }
    }

    #[test]
    fn test_best_front_is_non_dominated() {
        let eq = small_equation();
        let result = MoeaRunner::run(&eq, &base_config(), &[]).unwrap();
        for run in &result.runs {
            assert!(!run.best_front.is_empty());
            for a in &run.best_front {
                for b in &run.best_front {
                    assert!(!dominates(a, b));
                }
            }
        }
    }

    #[test]
    fn test_stable_pareto_terminates() {
        let eq = small_equation();
        let config = base_config()
            .without_evaluation_limit()
            .with_max_generations(10_000)
            .with_stable_pareto(5)
            .with_runs(1);
        let result = MoeaRunner::run(&eq, &config, &[]).unwrap();
        assert!(result.runs[0].converged);
        assert!(result.runs[0].generations >= 4);
    }

    #[test]
    fn test_diversity_tracking() {
        let eq = small_equation();
        let config = base_config().with_diversity(true).with_runs(1);
        let result = MoeaRunner::run(&eq, &config, &[]).unwrap();
        let run = &result.runs[0];
        assert_eq!(run.diversity.len(), run.history.len());
        assert!(run.diversity.iter().all(|d| (0.0..=1.0).contains(d)));
    }

    #[test]
    fn test_seeds_enter_population() {
        let eq = Equation::from_clauses(3, &[vec![1], vec![-2]]);
        let seed = vec![Gene::True, Gene::False, Gene::DontCare];
        let config = MoeaConfig::default()
            .with_population_size(5)
            .with_max_generations(1)
            .with_runs(1)
            .with_mutation_rate(0.0)
            .with_seed(3);
        let result = MoeaRunner::run(&eq, &config, &[seed]).unwrap();
        assert_eq!(result.runs[0].history[0].max_satisfied, 2);
        assert!(result.runs[0]
            .best_front
            .iter()
            .any(|i| i.objectives() == (2, 1)));
    }

    #[test]
    fn test_excess_seeds_truncated() {
        let eq = Equation::from_clauses(2, &[vec![1, 2]]);
        let seeds = vec![vec![Gene::True, Gene::True]; 8];
        let config = MoeaConfig::default()
            .with_population_size(3)
            .with_max_generations(1)
            .with_runs(1)
            .with_seed(1);
        let result = MoeaRunner::run(&eq, &config, &seeds).unwrap();
        assert_eq!(result.runs[0].evaluations, 3 + 10);
    }

    #[test]
    fn test_seed_length_mismatch() {
        let eq = small_equation();
        let err = MoeaRunner::run(&eq, &base_config(), &[vec![Gene::True]]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let eq = small_equation();
        let config = base_config().with_population_size(0);
        assert!(MoeaRunner::run(&eq, &config, &[]).is_err());
    }

    #[test]
    fn test_all_selection_combinations() {
        let eq = small_equation();
        for parent in [
            ParentSelection::Uniform,
            ParentSelection::FitnessProportional,
            ParentSelection::Tournament(4),
        ] {
            for survival in [
                SurvivalSelection::Truncation,
                SurvivalSelection::Uniform,
                SurvivalSelection::FitnessProportional,
                SurvivalSelection::Tournament(4),
            ] {
                for strategy in [SurvivalStrategy::Plus, SurvivalStrategy::Comma] {
                    let config = base_config()
                        .with_offspring_count(30)
                        .with_runs(1)
                        .with_max_evaluations(200)
                        .with_parent_selection(parent)
                        .with_survival_selection(survival)
                        .with_survival_strategy(strategy)
                        .with_termination(Termination::StableAverage(50))
                        .with_termination(Termination::StableBest(50));
                    let result = MoeaRunner::run(&eq, &config, &[]).unwrap();
                    let run = &result.runs[0];
                    assert!(run.history.iter().all(|s| s.max_satisfied <= 8));
                    assert!(!run.best_front.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_run_once() {
        let eq = small_equation();
        let mut rng = create_rng(5);
        let run = MoeaRunner::run_once(&eq, &base_config(), &[], &mut rng).unwrap();
        assert_eq!(run.evaluations, 400);
    }

    #[test]
    fn test_overall_best_front_comes_from_a_run() {
        let eq = small_equation();
        let result = MoeaRunner::run(&eq, &base_config(), &[]).unwrap();
        assert!(result
            .runs
            .iter()
            .any(|r| r.best_front == result.overall_best_front));
    }

    #[test]
    fn test_generation_stats_display() {
        let pop = vec![
            RankedIndividual::with_rank(1, 3, 1, vec![]),
            RankedIndividual::with_rank(1, 1, 2, vec![]),
        ];
        let stats = GenerationStats::from_population(110, &pop);
        assert_eq!(stats.to_string(), "110\t2\t3\t1.5\t2");
    }
}
