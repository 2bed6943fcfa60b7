//! Rank-one elimination update.
//!
//! Given the pivot column p of H and the projection s, the next basis is
//!
//! ```text
//! H' = [H[:, :p], H[:, p+1:]] - H[:, p] * s' / s_p
//! ```
//!
//! where s' is s without its p-th entry. Every column of H' stays orthogonal
//! to the rows already processed and becomes orthogonal to the current row.
//! The result is built as a fresh CSC structure; H itself is never mutated.

use std::cmp::Ordering;

use rayon::prelude::*;
use sprs::CsMat;

use super::pivot::Pivot;
use crate::linalg::sparse::SparseCsc;

/// Append `x + alpha * p` (both sorted sparse vectors) to the output buffers.
///
/// Exact zeros and entries with |v| <= drop_tol are skipped.
fn axpy_merge(
    x_idx: &[usize],
    x_val: &[f64],
    alpha: f64,
    p_idx: &[usize],
    p_val: &[f64],
    drop_tol: f64,
    out_idx: &mut Vec<usize>,
    out_val: &mut Vec<f64>,
) {
    let mut push = |i: usize, v: f64| {
        if v != 0.0 && v.abs() > drop_tol {
            out_idx.push(i);
            out_val.push(v);
        }
    };

    let (mut a, mut b) = (0, 0);
    while a < x_idx.len() && b < p_idx.len() {
        match x_idx[a].cmp(&p_idx[b]) {
            Ordering::Less => {
                push(x_idx[a], x_val[a]);
                a += 1;
            }
            Ordering::Greater => {
                push(p_idx[b], alpha * p_val[b]);
                b += 1;
            }
            Ordering::Equal => {
                push(x_idx[a], x_val[a] + alpha * p_val[b]);
                a += 1;
                b += 1;
            }
        }
    }
    for k in a..x_idx.len() {
        push(x_idx[k], x_val[k]);
    }
    for k in b..p_idx.len() {
        push(p_idx[k], alpha * p_val[k]);
    }
}

/// Update coefficients -s_c / s_p, zero where column c is left alone.
fn coefficients(s: &[f64], nz: &[usize], pivot: &Pivot) -> Vec<f64> {
    let mut coef = vec![0.0; s.len()];
    for &c in nz {
        if c != pivot.col {
            coef[c] = -s[c] / pivot.value;
        }
    }
    coef
}

fn updated_column(
    h: &SparseCsc,
    col: usize,
    alpha: f64,
    pivot_idx: &[usize],
    pivot_val: &[f64],
    drop_tol: f64,
    out_idx: &mut Vec<usize>,
    out_val: &mut Vec<f64>,
) {
    let Some(view) = h.outer_view(col) else {
        return;
    };
    if alpha == 0.0 {
        out_idx.extend_from_slice(view.indices());
        out_val.extend_from_slice(view.data());
    } else {
        axpy_merge(
            view.indices(),
            view.data(),
            alpha,
            pivot_idx,
            pivot_val,
            drop_tol,
            out_idx,
            out_val,
        );
    }
}

/// Eliminate `pivot.col` from `h` against the projection `s`.
///
/// `nz` lists the numerically nonzero entries of `s`; only those columns
/// receive a correction. Returns an n x (k - 1) CSC matrix.
pub fn eliminate(
    h: &SparseCsc,
    s: &[f64],
    nz: &[usize],
    pivot: &Pivot,
    drop_tol: f64,
    parallel: bool,
) -> SparseCsc {
    assert!(h.is_csc(), "basis must be column-major");
    assert_eq!(s.len(), h.cols());
    assert!(pivot.col < h.cols());

    let n = h.rows();
    let k = h.cols();
    let coef = coefficients(s, nz, pivot);

    let pivot_view = h.outer_view(pivot.col);
    let (pivot_idx, pivot_val): (&[usize], &[f64]) = match &pivot_view {
        Some(view) => (view.indices(), view.data()),
        None => (&[], &[]),
    };

    let mut indptr = Vec::with_capacity(k);
    indptr.push(0);

    if parallel {
        let columns: Vec<(Vec<usize>, Vec<f64>)> = (0..k)
            .into_par_iter()
            .filter(|&c| c != pivot.col)
            .map(|c| {
                let mut idx = Vec::new();
                let mut val = Vec::new();
                updated_column(h, c, coef[c], pivot_idx, pivot_val, drop_tol, &mut idx, &mut val);
                (idx, val)
            })
            .collect();

        let nnz: usize = columns.iter().map(|(idx, _)| idx.len()).sum();
        let mut indices = Vec::with_capacity(nnz);
        let mut data = Vec::with_capacity(nnz);
        for (idx, val) in columns {
            indices.extend(idx);
            data.extend(val);
            indptr.push(indices.len());
        }
        CsMat::new_csc((n, k - 1), indptr, indices, data)
    } else {
        let mut indices = Vec::with_capacity(h.nnz());
        let mut data = Vec::with_capacity(h.nnz());
        for c in (0..k).filter(|&c| c != pivot.col) {
            updated_column(
                h,
                c,
                coef[c],
                pivot_idx,
                pivot_val,
                drop_tol,
                &mut indices,
                &mut data,
            );
            indptr.push(indices.len());
        }
        CsMat::new_csc((n, k - 1), indptr, indices, data)
    }
}
