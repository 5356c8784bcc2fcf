//! Core population types.
//!
//! A population is a plain `Vec<RankedIndividual>`. Every survival and
//! selection operator expects it sorted best-first (descending
//! [`rank`](RankedIndividual::rank)) and hands it back in the same order.

use crate::sat::Genome;

/// A scored genome with its current Pareto rank.
///
/// Field order matters: the derived [`Ord`] compares rank, then satisfied
/// clauses, then don't-care count, then the genome itself. Stable-best
/// termination uses that ordering to find the maximal individual.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedIndividual {
    /// Front rank; higher is better. Derived, recomputed whenever fronts are
    /// regenerated. Zero means "not ranked yet".
    pub rank: usize,

    /// Primary objective: number of satisfied clauses.
    pub satisfied: usize,

    /// Secondary objective: number of don't-care variables.
    pub free: usize,

    pub genome: Genome,
}

impl RankedIndividual {
    /// Creates an unranked individual.
    pub fn new(satisfied: usize, free: usize, genome: Genome) -> Self {
        Self::with_rank(0, satisfied, free, genome)
    }

    pub fn with_rank(rank: usize, satisfied: usize, free: usize, genome: Genome) -> Self {
        Self {
            rank,
            satisfied,
            free,
            genome,
        }
    }

    /// The `(primary, secondary)` objective pair.
    #[inline]
    pub fn objectives(&self) -> (usize, usize) {
        (self.satisfied, self.free)
    }
}

/// A pairwise non-dominated group of individuals.
pub type Front = Vec<RankedIndividual>;

/// Identifies one of the two maximized objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Objective {
    /// Satisfied clause count.
    Satisfied,
    /// Don't-care variable count.
    Free,
}

impl Objective {
    /// Both objectives, primary first.
    pub const BOTH: [Objective; 2] = [Objective::Satisfied, Objective::Free];

    #[inline]
    pub fn value(self, individual: &RankedIndividual) -> usize {
        match self {
            Objective::Satisfied => individual.satisfied,
            Objective::Free => individual.free,
        }
    }
}
