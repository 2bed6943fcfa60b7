//! Checks for computed bases.
//!
//! `residual_inf_norm` is cheap enough for large problems; the dense rank
//! helpers and `check_basis` are meant for small matrices in tests and smoke
//! runs.

use nalgebra::DMatrix;

use crate::linalg::sparse::{mul_vec, SparseCsc};

/// max |(A H)_ij|, computed column by column without forming A H.
pub fn residual_inf_norm(a: &SparseCsc, h: &SparseCsc) -> f64 {
    assert_eq!(a.cols(), h.rows(), "A and H dimensions do not match");

    let a_csc = a.to_csc();
    let h_csc = h.to_csc();
    let mut acc = vec![0.0; a.rows()];
    let mut touched = Vec::new();
    let mut worst = 0.0_f64;

    for col in 0..h_csc.cols() {
        let Some(h_col) = h_csc.outer_view(col) else {
            continue;
        };
        for (k, &hv) in h_col.iter() {
            if let Some(a_col) = a_csc.outer_view(k) {
                for (row, &av) in a_col.iter() {
                    if acc[row] == 0.0 {
                        touched.push(row);
                    }
                    acc[row] += av * hv;
                }
            }
        }
        for &row in &touched {
            worst = worst.max(acc[row].abs());
            acc[row] = 0.0;
        }
        touched.clear();
    }
    worst
}

/// max |A (H x)| for a probe vector x of length k.
///
/// One pass over each matrix; a quick smoke check when the full residual is
/// too expensive.
pub fn probe_residual(a: &SparseCsc, h: &SparseCsc, x: &[f64]) -> f64 {
    let hx = mul_vec(h, x);
    mul_vec(a, &hx).iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Dense copy of a sparse matrix.
pub fn to_dense(a: &SparseCsc) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(a.rows(), a.cols());
    for (&val, (row, col)) in a.iter() {
        dense[(row, col)] += val;
    }
    dense
}

/// Numerical rank via SVD.
///
/// With `tol = None` the cutoff is sigma_max * max(m, n) * eps, the usual
/// default for `matrix_rank`.
pub fn dense_rank(a: &SparseCsc, tol: Option<f64>) -> usize {
    if a.rows() == 0 || a.cols() == 0 {
        return 0;
    }
    let svd = to_dense(a).svd(false, false);
    let sigma_max = svd.singular_values.max();
    let cutoff = tol.unwrap_or(sigma_max * a.rows().max(a.cols()) as f64 * f64::EPSILON);
    svd.singular_values.iter().filter(|&&s| s > cutoff).count()
}

/// Outcome of [`check_basis`].
#[derive(Debug, Clone, PartialEq)]
pub struct BasisCheck {
    /// max |A H|
    pub residual: f64,

    /// Residual bound actually applied, `residual_tol * (1 + max|H|)`
    pub tolerance: f64,

    /// Dense numerical rank of A
    pub matrix_rank: usize,

    /// Dense numerical rank of H
    pub basis_rank: usize,

    /// Columns of H (k)
    pub dim: usize,
}

impl BasisCheck {
    /// Residual within tolerance, k = n - rank(A), and H of full column rank.
    pub fn passed(&self, n: usize) -> bool {
        self.residual <= self.tolerance
            && self.matrix_rank + self.dim == n
            && self.basis_rank == self.dim
    }
}

/// Residual and rank-nullity check of a basis `h` for `a`.
///
/// Uses dense SVDs, so only suitable for small matrices.
pub fn check_basis(a: &SparseCsc, h: &SparseCsc, residual_tol: f64) -> BasisCheck {
    let max_entry = h.data().iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    BasisCheck {
        residual: residual_inf_norm(a, h),
        tolerance: residual_tol * (1.0 + max_entry),
        matrix_rank: dense_rank(a, None),
        basis_rank: dense_rank(h, None),
        dim: h.cols(),
    }
}
