//! Sparse null-space bases for sparse matrices.
//!
//! Given a sparse m x n matrix A, this library builds an n x k matrix H with
//! linearly independent columns and A H = 0, keeping H as sparse as it can.
//! The construction is the ABS row-elimination method:
//!
//! - **Row ordering**: rows are visited by ascending nonzero count
//! - **Threshold pivoting**: among columns whose projection is within a factor
//!   `threshold` of the largest, the sparsest one is eliminated
//! - **Rank-one updates**: each independent row removes exactly one column
//!
//! On completion k = n - rank(A). A matrix of full column rank has no null
//! space and is reported as [`NullSpaceError::NullSpaceEmpty`].
//!
//! # Example
//!
//! ```ignore
//! use nullspace_core::{compute_sparse_null_basis, NullSpaceSettings};
//! use nullspace_core::linalg::sparse;
//!
//! // x0 + x1 = 0 in R^3
//! let a = sparse::from_triplets(1, 3, vec![(0, 0, 1.0), (0, 1, 1.0)]);
//! let result = compute_sparse_null_basis(&a, &NullSpaceSettings::default())?;
//!
//! assert_eq!(result.dim(), 2);
//! println!("{}", result.info);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::too_many_arguments)]  // sparse merge kernels take split index/value slices

pub mod abs;
pub mod error;
pub mod linalg;
pub mod ordering;
pub mod problem;
pub mod verify;

pub use error::{NullSpaceError, NullSpaceResult};
pub use problem::{NullSpaceBasis, NullSpaceInfo, NullSpaceSettings, ParallelMode};

use linalg::sparse::SparseCsc;

/// Main entry point.
///
/// Computes a sparse basis of the null space of `a` (CSR or CSC storage).
///
/// # Errors
///
/// - [`NullSpaceError::InvalidArgument`] for an empty dimension, non-finite
///   entries, or settings out of range (threshold outside [0, 1))
/// - [`NullSpaceError::NullSpaceEmpty`] when `a` has full column rank
/// - [`NullSpaceError::NumericalInstability`] when a projection degenerates
pub fn compute_sparse_null_basis(
    a: &SparseCsc,
    settings: &NullSpaceSettings,
) -> NullSpaceResult<NullSpaceBasis> {
    abs::build_null_basis(a, settings, |_, _| {})
}

/// Same as [`compute_sparse_null_basis`], calling `on_progress(row_index, total_rows)`
/// once per visited row.
pub fn compute_sparse_null_basis_with_progress<F>(
    a: &SparseCsc,
    settings: &NullSpaceSettings,
    on_progress: F,
) -> NullSpaceResult<NullSpaceBasis>
where
    F: FnMut(usize, usize),
{
    abs::build_null_basis(a, settings, on_progress)
}
