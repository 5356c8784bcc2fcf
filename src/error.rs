//! Error types.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Structural problems found while reading a DIMACS CNF file.
///
/// The messages are user-facing and printed verbatim by the command-line
/// driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimacsError {
    #[error("invalid p-line.")]
    InvalidProblemLine,

    #[error("Multiple p lines found.")]
    MultipleProblemLines,

    #[error("clause before p-line.")]
    ClauseBeforeProblemLine,

    #[error("Variable number greater than number of variables")]
    VariableOutOfRange,

    #[error("Clause does not end with a zero.")]
    MissingTerminator,

    #[error("Not enough clauses")]
    ClauseCountMismatch,

    #[error("Comments found outside of initial comment block.")]
    CommentAfterHeader,

    #[error("missing p-line.")]
    MissingProblemLine,

    #[error("invalid literal.")]
    InvalidLiteral,
}

/// Errors raised by the library.
#[derive(Debug, Error)]
pub enum Error {
    /// The CNF input is malformed.
    #[error(transparent)]
    Dimacs(#[from] DimacsError),

    /// A seed solution file could not be interpreted.
    #[error("seed file line {line}: {message}")]
    SeedFile { line: usize, message: String },

    /// The search configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The comma strategy was given fewer offspring than survivors it must produce.
    #[error("comma strategy needs at least {target} offspring, got {offspring}")]
    UndersizedOffspring { offspring: usize, target: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }

    pub(crate) fn seed_file(line: usize, message: impl Into<String>) -> Self {
        Error::SeedFile {
            line,
            message: message.into(),
        }
    }
}
