//! Row ordering for the elimination.
//!
//! Rows are visited sparsest first: cheap, selective rows shrink the basis
//! before the dense rows have a chance to spread fill-in across it.

use crate::linalg::sparse::{row_nnz_counts, SparseCsc};

/// Row indices of `a` sorted by ascending stored-entry count.
///
/// The sort is stable, so rows with equal counts keep their original order.
pub fn rows_by_nnz(a: &SparseCsc) -> Vec<usize> {
    let counts = row_nnz_counts(a);
    let mut order: Vec<usize> = (0..a.rows()).collect();
    order.sort_by_key(|&row| counts[row]);
    order
}
