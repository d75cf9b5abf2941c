use thiserror::Error;

/// Errors reported by the solver library.
///
/// Failing to find a solution is not an error: it is reported through
/// `Solution::solution_found`. These variants cover malformed input that is
/// rejected before any search starts.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid puzzle parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid puzzle: {0}")]
    InvalidPuzzle(String),

    #[error("Illegal move {src} -> {dst} at step {step}")]
    IllegalMove { src: usize, dst: usize, step: usize },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SolverError>;
