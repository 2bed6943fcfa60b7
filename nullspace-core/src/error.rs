//! Error types for null-space construction.

use thiserror::Error;

/// Errors that can occur while building a null-space basis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NullSpaceError {
    /// Input matrix or settings are malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Every column was eliminated: the matrix has full column rank
    #[error("Null space is empty: {rows}x{cols} matrix has full column rank ({rank})")]
    NullSpaceEmpty {
        /// Number of rows of the input
        rows: usize,
        /// Number of columns of the input
        cols: usize,
        /// Numerical rank found by the elimination
        rank: usize,
    },

    /// Pivot selection hit a degenerate projection (NaN/inf or empty candidate set)
    #[error("Numerical instability at row {row}: {detail}")]
    NumericalInstability {
        /// Original index of the row being processed
        row: usize,
        /// What went wrong
        detail: String,
    },
}

/// Result type for null-space operations.
pub type NullSpaceResult<T> = Result<T, NullSpaceError>;
