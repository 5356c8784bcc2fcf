//! Multi-objective evolutionary search for MAXSAT.
//!
//! Candidate solutions are partial assignments: every variable is true,
//! false or "don't care". The search maximizes two objectives at once, the
//! number of satisfied clauses and the number of don't-care variables, and
//! reports the Pareto front of trade-offs between them.
//!
//! - [`sat`]: CNF model, DIMACS reading, evaluation and solution I/O
//! - [`moea`]: Pareto ranking, variation and selection operators, and the
//!   multi-run evolutionary driver
//! - [`random`]: seeded generator construction
//!
//! # Example
//!
//! ```
//! use sat_moea::moea::{MoeaConfig, MoeaRunner};
//! use sat_moea::sat::read_dimacs;
//!
//! let equation = read_dimacs("c tiny\np cnf 3 2\n1 -3 0\n2 3 0\n")?;
//! let config = MoeaConfig::default()
//!     .with_population_size(20)
//!     .with_runs(1)
//!     .with_max_evaluations(500)
//!     .with_seed(7);
//! let result = MoeaRunner::run(&equation, &config, &[])?;
//! assert!(result.overall_best_front.iter().all(|ind| ind.satisfied <= 2));
//! # Ok::<(), sat_moea::Error>(())
//! ```

pub mod error;
pub mod moea;
pub mod random;
pub mod sat;

pub use error::{DimacsError, Error, Result};
