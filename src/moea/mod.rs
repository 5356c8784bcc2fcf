//! Bi-objective evolutionary search.
//!
//! Individuals are three-valued genomes scored on two objectives, both
//! maximized: satisfied clauses and don't-care variables. Populations are
//! ranked by non-dominated sorting and evolved with pluggable parent
//! selection, survival selection and survival strategy.
//!
//! # Key Types
//!
//! - [`RankedIndividual`]: a genome with its rank and objective values
//! - [`MoeaConfig`]: algorithm parameters (sizes, selectors, budgets)
//! - [`MoeaRunner`]: executes the evolutionary loop over several runs
//! - [`MoeaResult`]: per-run results and the overall best front
//!
//! # Strategy Families
//!
//! - [`ParentSelection`]: uniform, fitness-proportional, k-tournament
//! - [`SurvivalSelection`]: truncation, uniform, fitness-proportional,
//!   k-tournament
//! - [`SurvivalStrategy`]: `(μ + λ)` or `(μ, λ)`
//! - [`Termination`]: stable-average, stable-best, stable-pareto detectors
//!
//! # Submodules
//!
//! - [`pareto`]: dominance, front construction, front comparison and the
//!   hypervolume diversity measure
//! - [`operators`]: one-point crossover and per-position mutation
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Eiben & Smith (2015), *Introduction to Evolutionary Computing*

mod config;
pub mod operators;
pub mod pareto;
mod runner;
mod selection;
mod survival;
mod termination;
mod types;

pub use config::MoeaConfig;
pub use runner::{GenerationStats, MoeaResult, MoeaRunner, RunResult};
pub use selection::ParentSelection;
pub use survival::{SurvivalSelection, SurvivalStrategy};
pub use termination::{StableAverage, StableBest, StablePareto, Termination, Terminator};
pub use types::{Front, Objective, RankedIndividual};
