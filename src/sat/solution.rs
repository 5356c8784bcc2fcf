//! Solution text: writing front members and reading them back as seeds.
//!
//! Each front member is written as a three-line block:
//!
//! ```text
//! c MAXSAT fitness value: 2
//! c Number of 'don't care' variables: 1
//! v 1 -2
//! ```
//!
//! The `v` line lists signed 1-based variable indices for every assigned
//! position; don't-care variables are omitted.

use std::io::{BufRead, Write};

use super::equation::{Gene, Genome};
use crate::error::{Error, Result};
use crate::moea::RankedIndividual;

/// Renders the assigned positions of a genome as signed 1-based literals.
///
/// # Example
///
/// ```
/// use sat_moea::sat::{format_assignment, Gene};
///
/// let genome = [Gene::True, Gene::False, Gene::DontCare, Gene::True];
/// assert_eq!(format_assignment(&genome), "1 -2 4");
/// ```
pub fn format_assignment(genome: &[Gene]) -> String {
    genome
        .iter()
        .enumerate()
        .filter_map(|(i, gene)| match gene {
            Gene::DontCare => None,
            Gene::False => Some(format!("-{}", i + 1)),
            Gene::True => Some(format!("{}", i + 1)),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes one block per front member.
pub fn write_front<'a, W, I>(writer: &mut W, front: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a RankedIndividual>,
{
    for member in front {
        writeln!(writer, "c MAXSAT fitness value: {}", member.satisfied)?;
        writeln!(
            writer,
            "c Number of 'don't care' variables: {}",
            member.free
        )?;
        writeln!(writer, "v {}", format_assignment(&member.genome))?;
    }
    Ok(())
}

/// Writes the final solution file for a finished search.
pub fn write_solution<W: Write>(
    writer: &mut W,
    instance_name: &str,
    front: &[RankedIndividual],
) -> Result<()> {
    writeln!(writer, "c Solution for: {instance_name}")?;
    writeln!(writer, "c Number of solutions in pareto front: {}", front.len())?;
    write_front(writer, front)
}

/// Reads seed genomes from a previously written solution or pareto file.
///
/// Every `v` line becomes one genome of length `number_of_variables`,
/// don't-care everywhere except the listed literals. Comment lines and
/// anything else are skipped. A trailing `0` on a `v` line is tolerated.
///
/// # Errors
///
/// Returns [`Error::SeedFile`] for a token that is not an integer or a
/// variable index outside `1..=number_of_variables`.
pub fn read_seed_genomes<R: BufRead>(reader: R, number_of_variables: usize) -> Result<Vec<Genome>> {
    let mut genomes = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let Some(body) = line.strip_prefix('v') else {
            continue;
        };
        if !(body.is_empty() || body.starts_with(char::is_whitespace)) {
            continue;
        }

        let mut genome = vec![Gene::DontCare; number_of_variables];
        for token in body.split_whitespace() {
            let lit: i64 = token
                .parse()
                .map_err(|_| Error::seed_file(line_no, format!("invalid literal `{token}`")))?;
            if lit == 0 {
                continue;
            }
            let var = lit.unsigned_abs() as usize;
            if var > number_of_variables {
                return Err(Error::seed_file(
                    line_no,
                    format!("variable {var} exceeds {number_of_variables} variables"),
                ));
            }
            genome[var - 1] = if lit > 0 { Gene::True } else { Gene::False };
        }
        genomes.push(genome);
    }
    Ok(genomes)
}
