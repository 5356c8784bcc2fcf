//! The static SAT instance and the fitness evaluator.
//!
//! An [`Equation`] is a dense clause matrix: one row per clause, one column
//! per variable, each cell a [`Literal`]. Candidate assignments are
//! [`Genome`]s over the three-valued [`Gene`] alphabet.
//!
//! The matrix is stored as a single contiguous buffer indexed by
//! `(clause, variable)`, so evaluation walks memory linearly.

use crate::moea::RankedIndividual;
use rand::Rng;

/// One position of a candidate assignment.
///
/// Ordering is `DontCare < False < True`, matching the `-1 / 0 / 1`
/// encoding used when genomes are compared as tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gene {
    /// The variable is left unassigned.
    DontCare,
    False,
    True,
}

impl Gene {
    /// All three gene values, in ascending order.
    pub const ALL: [Gene; 3] = [Gene::DontCare, Gene::False, Gene::True];

    /// Draws one of the three values uniformly.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Returns `true` for [`Gene::DontCare`].
    pub fn is_free(self) -> bool {
        self == Gene::DontCare
    }
}

/// A candidate assignment: one [`Gene`] per variable.
pub type Genome = Vec<Gene>;

/// One cell of the clause matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    /// The variable does not occur in the clause.
    Unused,
    /// The variable occurs negated.
    Negative,
    /// The variable occurs plain.
    Positive,
}

impl Literal {
    /// Whether `gene` makes this literal true. Unused cells and
    /// don't-care genes never match.
    #[inline]
    pub fn satisfied_by(self, gene: Gene) -> bool {
        matches!(
            (self, gene),
            (Literal::Negative, Gene::False) | (Literal::Positive, Gene::True)
        )
    }
}

/// An immutable CNF instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    number_of_clauses: usize,
    number_of_variables: usize,
    /// Row-major `number_of_clauses × number_of_variables`.
    cells: Vec<Literal>,
}

impl Equation {
    /// Builds an equation from signed 1-based DIMACS literals.
    ///
    /// Each inner slice is one clause. A positive literal `v` marks variable
    /// `v` as [`Literal::Positive`], a negative one as [`Literal::Negative`].
    ///
    /// # Panics
    ///
    /// Panics if a literal is 0 or its magnitude exceeds `number_of_variables`.
    /// The DIMACS reader rejects such input before it gets here.
    pub fn from_clauses(number_of_variables: usize, clauses: &[Vec<i64>]) -> Self {
        let number_of_clauses = clauses.len();
        let mut cells = vec![Literal::Unused; number_of_clauses * number_of_variables];
        for (row, clause) in clauses.iter().enumerate() {
            for &lit in clause {
                let var = lit.unsigned_abs() as usize;
                assert!(
                    (1..=number_of_variables).contains(&var),
                    "literal {lit} out of range 1..={number_of_variables}"
                );
                cells[row * number_of_variables + var - 1] = if lit > 0 {
                    Literal::Positive
                } else {
                    Literal::Negative
                };
            }
        }
        Self {
            number_of_clauses,
            number_of_variables,
            cells,
        }
    }

    /// Number of clauses (upper bound of the primary objective).
    pub fn number_of_clauses(&self) -> usize {
        self.number_of_clauses
    }

    /// Number of variables, which is also the genome length.
    pub fn number_of_variables(&self) -> usize {
        self.number_of_variables
    }

    /// The literals of clause `index`, one per variable.
    pub fn clause(&self, index: usize) -> &[Literal] {
        let start = index * self.number_of_variables;
        &self.cells[start..start + self.number_of_variables]
    }

    /// Iterates over all clause rows.
    pub fn clauses(&self) -> impl Iterator<Item = &[Literal]> {
        // chunks_exact panics on a zero chunk size; with no variables the
        // buffer is empty and no rows are yielded either way.
        self.cells.chunks_exact(self.number_of_variables.max(1))
    }

    /// Number of clauses satisfied by one genome.
    pub fn satisfied_count(&self, genome: &[Gene]) -> usize {
        debug_assert_eq!(genome.len(), self.number_of_variables);
        self.clauses()
            .filter(|clause| {
                clause
                    .iter()
                    .zip(genome)
                    .any(|(lit, &gene)| lit.satisfied_by(gene))
            })
            .count()
    }

    /// Satisfied-clause count for every genome, in input order.
    pub fn evaluate<G: AsRef<[Gene]>>(&self, population: &[G]) -> Vec<usize> {
        population
            .iter()
            .map(|genome| self.satisfied_count(genome.as_ref()))
            .collect()
    }

    /// Don't-care count for every genome, in input order.
    pub fn count_free_variables<G: AsRef<[Gene]>>(&self, population: &[G]) -> Vec<usize> {
        population
            .iter()
            .map(|genome| free_count(genome.as_ref()))
            .collect()
    }

    /// Scores a batch of genomes into unranked individuals (rank 0).
    ///
    /// The caller ranks them afterwards through the Pareto front engine.
    pub fn score(&self, genomes: Vec<Genome>) -> Vec<RankedIndividual> {
        genomes
            .into_iter()
            .map(|genome| {
                let satisfied = self.satisfied_count(&genome);
                let free = free_count(&genome);
                RankedIndividual::new(satisfied, free, genome)
            })
            .collect()
    }
}

/// Number of [`Gene::DontCare`] positions in a genome.
pub fn free_count(genome: &[Gene]) -> usize {
    genome.iter().filter(|g| g.is_free()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Gene::{DontCare as D, False as F, True as T};

    fn two_clause() -> Equation {
        // (x1) ∧ (¬x2)
        Equation::from_clauses(3, &[vec![1], vec![-2]])
    }

    #[test]
    fn test_dimensions() {
        let eq = two_clause();
        assert_eq!(eq.number_of_clauses(), 2);
        assert_eq!(eq.number_of_variables(), 3);
        assert_eq!(
            eq.clause(0),
            &[Literal::Positive, Literal::Unused, Literal::Unused]
        );
        assert_eq!(
            eq.clause(1),
            &[Literal::Unused, Literal::Negative, Literal::Unused]
        );
    }

    #[test]
    fn test_evaluate_counts_satisfied_clauses() {
        let eq = two_clause();
        let pop = vec![vec![T, F, D], vec![T, T, D], vec![F, T, T], vec![D, D, D]];
        assert_eq!(eq.evaluate(&pop), vec![2, 1, 0, 0]);
    }

    #[test]
    fn test_dont_care_never_satisfies() {
        let eq = Equation::from_clauses(2, &[vec![1, -2]]);
        assert_eq!(eq.satisfied_count(&[D, D]), 0);
        assert_eq!(eq.satisfied_count(&[D, F]), 1);
    }

    #[test]
    fn test_count_free_variables() {
        let eq = two_clause();
        let pop = vec![vec![T, F, D], vec![D, D, D], vec![T, T, F]];
        assert_eq!(eq.count_free_variables(&pop), vec![1, 3, 0]);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let eq = Equation::from_clauses(4, &[vec![1, 2], vec![-3, 4], vec![-1, -4]]);
        let pop = vec![vec![T, D, F, T], vec![F, F, T, F]];
        assert_eq!(eq.evaluate(&pop), eq.evaluate(&pop));
    }

    #[test]
    fn test_score_matches_evaluators() {
        let eq = two_clause();
        let pop = vec![vec![T, F, D], vec![F, D, D]];
        let scored = eq.score(pop.clone());
        assert_eq!(scored[0].satisfied, 2);
        assert_eq!(scored[0].free, 1);
        assert_eq!(scored[1].satisfied, 0);
        assert_eq!(scored[1].free, 2);
        assert!(scored.iter().all(|ind| ind.rank == 0));
        assert_eq!(scored[1].genome, pop[1]);
    }

    #[test]
    fn test_gene_order() {
        assert!(D < F && F < T);
    }

    #[test]
    fn test_no_variables() {
        let eq = Equation::from_clauses(0, &[]);
        assert_eq!(eq.clauses().count(), 0);
        assert_eq!(eq.evaluate(&[Vec::<Gene>::new()]), vec![0]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_literal_panics() {
        Equation::from_clauses(2, &[vec![3]]);
    }
}
