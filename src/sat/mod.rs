//! The SAT side of the search: the instance, its text formats, and the
//! fitness evaluator.
//!
//! - [`Equation`]: immutable clause matrix with [`evaluate`](Equation::evaluate)
//!   and [`count_free_variables`](Equation::count_free_variables)
//! - [`read_dimacs`]: DIMACS CNF reader
//! - [`write_solution`] / [`read_seed_genomes`]: solution text in both directions

mod dimacs;
mod equation;
mod solution;

pub use dimacs::{read_dimacs, verify_dimacs};
pub use equation::{free_count, Equation, Gene, Genome, Literal};
pub use solution::{format_assignment, read_seed_genomes, write_front, write_solution};
