//! DIMACS CNF reader.
//!
//! Accepts the line-oriented subset used by SAT competition benchmarks:
//!
//! ```text
//! c optional comments, only before anything else
//! p cnf <variables> <clauses>
//! 1 -2 0
//! 2 3 0
//! ```
//!
//! Every clause sits on its own line and ends with `0`. A line starting
//! with `%` (the SATLIB trailer) ends the clause section.

use super::equation::Equation;
use crate::error::DimacsError;

/// Parses DIMACS text into an [`Equation`].
///
/// Validation runs in a single pass and stops at the first problem, so the
/// returned error is the earliest structural violation in the file.
///
/// # Example
///
/// ```
/// use sat_moea::sat::read_dimacs;
///
/// let eq = read_dimacs("c tiny\np cnf 3 2\n1 0\n-2 0\n").unwrap();
/// assert_eq!(eq.number_of_variables(), 3);
/// assert_eq!(eq.number_of_clauses(), 2);
/// ```
pub fn read_dimacs(text: &str) -> Result<Equation, DimacsError> {
    let mut in_comments = true;
    let mut header: Option<(usize, usize)> = None;
    let mut clauses: Vec<Vec<i64>> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('%') {
            break;
        }

        if line.starts_with('c') {
            if !in_comments {
                return Err(DimacsError::CommentAfterHeader);
            }
            continue;
        }
        in_comments = false;

        if line.starts_with('p') {
            if header.is_some() {
                return Err(DimacsError::MultipleProblemLines);
            }
            header = Some(parse_problem_line(line)?);
        } else if line.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
            let (variables, _) = header.ok_or(DimacsError::ClauseBeforeProblemLine)?;
            clauses.push(parse_clause_line(line, variables)?);
        }
    }

    let (variables, expected) = header.ok_or(DimacsError::MissingProblemLine)?;
    if clauses.len() != expected {
        return Err(DimacsError::ClauseCountMismatch);
    }

    Ok(Equation::from_clauses(variables, &clauses))
}

/// Checks DIMACS text without keeping the result.
pub fn verify_dimacs(text: &str) -> Result<(), DimacsError> {
    read_dimacs(text).map(|_| ())
}

fn parse_problem_line(line: &str) -> Result<(usize, usize), DimacsError> {
    let mut parts = line.split_whitespace();
    if parts.next() != Some("p") || parts.next() != Some("cnf") {
        return Err(DimacsError::InvalidProblemLine);
    }
    let mut count = || -> Result<usize, DimacsError> {
        parts
            .next()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or(DimacsError::InvalidProblemLine)
    };
    let variables = count()?;
    let clauses = count()?;
    Ok((variables, clauses))
}

fn parse_clause_line(line: &str, variables: usize) -> Result<Vec<i64>, DimacsError> {
    let literals = line
        .split_whitespace()
        .map(|tok| tok.parse::<i64>().map_err(|_| DimacsError::InvalidLiteral))
        .collect::<Result<Vec<_>, _>>()?;

    let Some((&last, body)) = literals.split_last() else {
        return Err(DimacsError::MissingTerminator);
    };
    if body.iter().any(|lit| lit.unsigned_abs() as usize > variables) {
        return Err(DimacsError::VariableOutOfRange);
    }
    if last != 0 {
        return Err(DimacsError::MissingTerminator);
    }

    // stray interior zeros carry no literal
    Ok(body.iter().copied().filter(|&lit| lit != 0).collect())
}
