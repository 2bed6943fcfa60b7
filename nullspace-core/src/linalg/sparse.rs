//! Sparse matrix types and operations.
//!
//! Thin helpers over `sprs` for the access patterns the elimination needs:
//! row-major views of the input, column-major storage for the basis, and
//! per-row sparsity counts.

use sprs::{CsMat, TriMat};

/// Sparse matrix in CSC format (general storage; CSR inputs are accepted too).
pub type SparseCsc = CsMat<f64>;

/// Sparse matrix in CSR format, used for row access.
pub type SparseCsr = CsMat<f64>;

/// CSC matrix of shape `nrows x ncols` from (row, col, value) entries.
/// Repeated positions are summed.
pub fn from_triplets<I>(nrows: usize, ncols: usize, triplets: I) -> SparseCsc
where
    I: IntoIterator<Item = (usize, usize, f64)>,
{
    let mut tri = TriMat::new((nrows, ncols));
    for (i, j, v) in triplets {
        tri.add_triplet(i, j, v);
    }
    tri.to_csc()
}

/// Create a diagonal matrix in CSC format.
pub fn diagonal(diag: &[f64]) -> SparseCsc {
    let n = diag.len();
    CsMat::new_csc((n, n), (0..=n).collect(), (0..n).collect(), diag.to_vec())
}

/// Create an identity matrix in CSC format.
pub fn identity(n: usize) -> SparseCsc {
    diagonal(&vec![1.0; n])
}

/// Row-major copy of `a`, whatever its storage.
pub fn to_row_major(a: &SparseCsc) -> SparseCsr {
    a.to_csr()
}

/// Number of stored entries in each row.
pub fn row_nnz_counts(a: &SparseCsc) -> Vec<usize> {
    if a.is_csr() {
        (0..a.rows())
            .map(|row| a.outer_view(row).map_or(0, |v| v.nnz()))
            .collect()
    } else {
        let mut counts = vec![0usize; a.rows()];
        for (_, (row, _)) in a.iter() {
            counts[row] += 1;
        }
        counts
    }
}

/// Scatter row `row` of a CSR matrix into the dense buffer `out`.
pub fn scatter_row(a: &SparseCsr, row: usize, out: &mut [f64]) {
    assert!(a.is_csr(), "scatter_row expects row-major storage");
    assert_eq!(a.cols(), out.len());

    if let Some(view) = a.outer_view(row) {
        for (col, &val) in view.iter() {
            out[col] = val;
        }
    }
}

/// Undo [`scatter_row`]: zero only the entries row `row` wrote.
pub fn clear_row(a: &SparseCsr, row: usize, out: &mut [f64]) {
    if let Some(view) = a.outer_view(row) {
        for (col, _) in view.iter() {
            out[col] = 0.0;
        }
    }
}

/// y = A x, for either storage.
pub fn mul_vec(a: &SparseCsc, x: &[f64]) -> Vec<f64> {
    assert_eq!(a.cols(), x.len());

    let mut y = vec![0.0; a.rows()];
    for (&val, (row, col)) in a.iter() {
        y[row] += val * x[col];
    }
    y
}

/// Copy the entries of `parts` into one CSC matrix, each shifted by its
/// (row, col) offset.
fn place(shape: (usize, usize), parts: &[(&SparseCsc, usize, usize)]) -> SparseCsc {
    let mut tri = TriMat::new(shape);
    for &(m, row_off, col_off) in parts {
        for (&val, (row, col)) in m.iter() {
            tri.add_triplet(row + row_off, col + col_off, val);
        }
    }
    tri.to_csc()
}

/// [A; B]
pub fn vstack(a: &SparseCsc, b: &SparseCsc) -> SparseCsc {
    assert_eq!(a.cols(), b.cols(), "vstack needs equal column counts");
    place((a.rows() + b.rows(), a.cols()), &[(a, 0, 0), (b, a.rows(), 0)])
}

/// [A, B]
pub fn hstack(a: &SparseCsc, b: &SparseCsc) -> SparseCsc {
    assert_eq!(a.rows(), b.rows(), "hstack needs equal row counts");
    place((a.rows(), a.cols() + b.cols()), &[(a, 0, 0), (b, 0, a.cols())])
}
