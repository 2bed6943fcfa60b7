//! Row projection and pivot selection.
//!
//! For the current row r the projection s = r^T H is formed column by column.
//! Pivot choice is a two-stage filter: keep the columns whose |s_j| clears
//! `threshold * max|s|`, then take the sparsest of those, lowest index first.

use rayon::prelude::*;

use crate::linalg::sparse::SparseCsc;

/// Projection of one row onto the current basis.
#[derive(Debug, Clone)]
pub struct Projection {
    /// s_j = sum_i r_i H_ij
    pub values: Vec<f64>,

    /// sum_i |r_i H_ij|, the magnitude that cancelled into s_j
    pub scale: Vec<f64>,
}

impl Projection {
    /// Indices j whose projection is numerically nonzero.
    ///
    /// An entry is zero when |s_j| <= zero_tol * scale_j. Non-finite entries
    /// are always kept so that pivot selection can reject them.
    pub fn nonzero_indices(&self, zero_tol: f64) -> Vec<usize> {
        self.values
            .iter()
            .zip(&self.scale)
            .enumerate()
            .filter(|&(_, (&s, &scale))| is_nonzero(s, scale, zero_tol))
            .map(|(j, _)| j)
            .collect()
    }
}

fn is_nonzero(s: f64, scale: f64, zero_tol: f64) -> bool {
    if !s.is_finite() {
        return true;
    }
    // an overflowed magnitude says nothing about cancellation
    s != 0.0 && (!scale.is_finite() || s.abs() > zero_tol * scale)
}

/// Selected pivot for one elimination step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    /// Basis column that is eliminated
    pub col: usize,

    /// s at the pivot column
    pub value: f64,

    /// Largest |s_j| over the nonzero entries
    pub smax: f64,
}

/// Why pivot selection could not proceed.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotFailure(pub String);

fn project_column(row: &[f64], h: &SparseCsc, col: usize) -> (f64, f64) {
    let mut dot = 0.0;
    let mut mag = 0.0;
    if let Some(view) = h.outer_view(col) {
        for (i, &v) in view.iter() {
            let term = row[i] * v;
            dot += term;
            mag += term.abs();
        }
    }
    (dot, mag)
}

/// Compute s = r^T H for a dense row `row` and CSC basis `h`.
pub fn project_row(row: &[f64], h: &SparseCsc, parallel: bool) -> Projection {
    assert_eq!(row.len(), h.rows());
    assert!(h.is_csc(), "basis must be column-major");

    let pairs: Vec<(f64, f64)> = if parallel {
        (0..h.cols())
            .into_par_iter()
            .map(|col| project_column(row, h, col))
            .collect()
    } else {
        (0..h.cols()).map(|col| project_column(row, h, col)).collect()
    };

    let (values, scale) = pairs.into_iter().unzip();
    Projection { values, scale }
}

/// Columns of `nz` whose |s_j| reaches `threshold * smax`.
///
/// Returns the candidates together with smax. Fails when smax is not finite
/// or the filter leaves nothing, both of which only happen with NaN/inf in s.
pub fn candidate_set(
    s: &[f64],
    nz: &[usize],
    threshold: f64,
) -> Result<(Vec<usize>, f64), PivotFailure> {
    if let Some(&j) = nz.iter().find(|&&j| !s[j].is_finite()) {
        return Err(PivotFailure(format!("projection entry {} is {}", j, s[j])));
    }

    let smax = nz.iter().map(|&j| s[j].abs()).fold(0.0_f64, f64::max);
    if !smax.is_finite() || smax == 0.0 {
        return Err(PivotFailure(format!("degenerate max projection {}", smax)));
    }

    let cutoff = threshold * smax;
    let candidates: Vec<usize> = nz.iter().copied().filter(|&j| s[j].abs() >= cutoff).collect();
    if candidates.is_empty() {
        return Err(PivotFailure(format!(
            "no candidate reaches {:.3e} (smax {:.3e})",
            cutoff, smax
        )));
    }
    Ok((candidates, smax))
}

/// Pick the pivot for the projection `proj`, or `None` if the row is
/// already satisfied by every basis column.
pub fn select_pivot(
    h: &SparseCsc,
    proj: &Projection,
    threshold: f64,
    zero_tol: f64,
) -> Result<Option<Pivot>, PivotFailure> {
    let nz = proj.nonzero_indices(zero_tol);
    if nz.is_empty() {
        return Ok(None);
    }

    let (candidates, smax) = candidate_set(&proj.values, &nz, threshold)?;

    // min_by_key keeps the first minimum, and candidates are ascending
    let col = candidates
        .into_iter()
        .min_by_key(|&j| h.outer_view(j).map_or(0, |v| v.nnz()))
        .ok_or_else(|| PivotFailure("empty candidate set".to_string()))?;

    Ok(Some(Pivot {
        col,
        value: proj.values[col],
        smax,
    }))
}
