//! Settings, results, and input validation.
//!
//! This module defines the knobs of the null-space builder and the
//! diagnostics it reports alongside the basis.

use std::fmt;

use crate::error::{NullSpaceError, NullSpaceResult};
use crate::linalg::sparse::SparseCsc;

/// How column-level work inside one elimination step is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParallelMode {
    /// Parallel once the basis has at least `parallel_min_cols` columns.
    #[default]
    Auto,

    /// Always single-threaded.
    Serial,

    /// Always use the rayon pool.
    Parallel,
}

/// Null-space builder settings.
#[derive(Debug, Clone)]
pub struct NullSpaceSettings {
    /// Pivot threshold t in [0, 1).
    ///
    /// A column is a pivot candidate when |s_j| >= t * max|s|. t = 0 favours
    /// sparsity (every nonzero is admissible), t near 1 favours accuracy.
    pub threshold: f64,

    /// Relative zero test for projection entries.
    ///
    /// s_j counts as zero when |s_j| <= zero_tol * sum_i |r_i H_ij|, i.e. when
    /// it is pure cancellation. 0.0 means only exact zeros are zero.
    pub zero_tol: f64,

    /// Updated basis entries with |value| <= drop_tol are not stored.
    /// Exact zeros are always dropped.
    pub drop_tol: f64,

    /// Column-parallel scheduling
    pub parallel: ParallelMode,

    /// Minimum basis width before `ParallelMode::Auto` goes parallel
    pub parallel_min_cols: usize,

    /// Enable progress logging through the `log` facade
    pub verbose: bool,

    /// Log every N rows when verbose
    pub log_freq: usize,
}

impl Default for NullSpaceSettings {
    fn default() -> Self {
        // NULLSPACE_ZERO_TOL=0 restores exact nonzero tests
        let zero_tol = std::env::var("NULLSPACE_ZERO_TOL")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(1e-12);

        let parallel_min_cols = std::env::var("NULLSPACE_PAR_MIN_COLS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(256);

        Self {
            threshold: 0.1,
            zero_tol,
            drop_tol: 0.0,
            parallel: ParallelMode::default(),
            parallel_min_cols,
            verbose: false,
            log_freq: 1000,
        }
    }
}

impl NullSpaceSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            log_freq: 100,
            ..Self::default()
        }
    }

    /// Set the pivot threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the relative zero tolerance for projections.
    pub fn with_zero_tol(mut self, tol: f64) -> Self {
        self.zero_tol = tol;
        self
    }

    /// Set the drop tolerance for updated entries.
    pub fn with_drop_tol(mut self, tol: f64) -> Self {
        self.drop_tol = tol;
        self
    }

    /// Set the parallel scheduling mode.
    pub fn with_parallel(mut self, mode: ParallelMode) -> Self {
        self.parallel = mode;
        self
    }

    /// Check that every setting is in range.
    pub fn validate(&self) -> NullSpaceResult<()> {
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(NullSpaceError::InvalidArgument(format!(
                "threshold must lie in [0, 1), got {}",
                self.threshold
            )));
        }
        if !self.zero_tol.is_finite() || self.zero_tol < 0.0 {
            return Err(NullSpaceError::InvalidArgument(format!(
                "zero_tol must be finite and nonnegative, got {}",
                self.zero_tol
            )));
        }
        if !self.drop_tol.is_finite() || self.drop_tol < 0.0 {
            return Err(NullSpaceError::InvalidArgument(format!(
                "drop_tol must be finite and nonnegative, got {}",
                self.drop_tol
            )));
        }
        Ok(())
    }

    /// Whether a step over a basis of `ncols` columns should use rayon.
    pub fn use_parallel(&self, ncols: usize) -> bool {
        match self.parallel {
            ParallelMode::Serial => false,
            ParallelMode::Parallel => true,
            ParallelMode::Auto => ncols >= self.parallel_min_cols.max(1),
        }
    }
}

/// Reject degenerate shapes and non-finite entries.
pub fn validate_matrix(a: &SparseCsc) -> NullSpaceResult<()> {
    if a.rows() == 0 || a.cols() == 0 {
        return Err(NullSpaceError::InvalidArgument(format!(
            "matrix must have at least one row and one column, got {}x{}",
            a.rows(),
            a.cols()
        )));
    }
    if let Some((val, (row, col))) = a.iter().find(|(v, _)| !v.is_finite()) {
        return Err(NullSpaceError::InvalidArgument(format!(
            "non-finite entry {} at ({}, {})",
            val, row, col
        )));
    }
    Ok(())
}

/// Diagnostics for one null-space construction.
#[derive(Debug, Clone)]
pub struct NullSpaceInfo {
    /// Rows of the input (m)
    pub rows: usize,

    /// Columns of the input (n)
    pub cols: usize,

    /// Rows that eliminated a basis column; the numerical rank of A
    pub rank: usize,

    /// Rows already satisfied by the basis when visited
    pub dependent_rows: usize,

    /// Stored entries in the final basis
    pub basis_nnz: usize,

    /// Largest stored-entry count the basis reached during elimination
    pub peak_nnz: usize,

    /// Wall-clock time of the elimination (milliseconds)
    pub elapsed_ms: u64,

    /// Visiting order of the rows (original indices)
    pub row_order: Vec<usize>,
}

impl NullSpaceInfo {
    /// Dimension of the null space, n - rank.
    pub fn nullity(&self) -> usize {
        self.cols - self.rank
    }
}

impl fmt::Display for NullSpaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} rank={} nullity={} dependent={} nnz={} peak_nnz={} time={}ms",
            self.rows,
            self.cols,
            self.rank,
            self.nullity(),
            self.dependent_rows,
            self.basis_nnz,
            self.peak_nnz,
            self.elapsed_ms
        )
    }
}

/// Sparse null-space basis with diagnostics.
#[derive(Debug, Clone)]
pub struct NullSpaceBasis {
    /// n x k basis in CSC format; A * basis = 0
    pub basis: SparseCsc,

    /// Construction diagnostics
    pub info: NullSpaceInfo,
}

impl NullSpaceBasis {
    /// Number of basis vectors (k).
    pub fn dim(&self) -> usize {
        self.basis.cols()
    }
}
