//! ABS row elimination for sparse null-space bases.
//!
//! The basis starts as the n x n identity. Rows of A are visited sparsest
//! first; each row either is already annihilated by the basis (dependent row,
//! nothing to do) or selects a pivot column and removes it with a rank-one
//! update, so the basis loses exactly one column per independent row.
//!
//! Reference: M. Khorramizadeh and N. Mahdavi-Amiri, "An efficient algorithm
//! for sparse null space basis problem using ABS methods", Numerical
//! Algorithms 62(3), 2012.

pub mod pivot;
pub mod update;

use std::time::Instant;

use crate::error::{NullSpaceError, NullSpaceResult};
use crate::linalg::sparse::{self, SparseCsc};
use crate::ordering::rows_by_nnz;
use crate::problem::{validate_matrix, NullSpaceBasis, NullSpaceInfo, NullSpaceSettings};

use self::pivot::{project_row, select_pivot};
use self::update::eliminate;

/// Ratio |s_p| / smax below which an accepted pivot is reported as small.
const SMALL_PIVOT_RATIO: f64 = 1e-8;

/// Outcome of one row step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStep {
    /// Row already orthogonal to every basis column
    Satisfied,
    /// Row eliminated basis column `col`
    Eliminated { col: usize },
}

/// Build a sparse null-space basis of `a`.
///
/// `on_progress(i, m)` is called after the i-th visited row (0-based) of m.
pub fn build_null_basis<F>(
    a: &SparseCsc,
    settings: &NullSpaceSettings,
    mut on_progress: F,
) -> NullSpaceResult<NullSpaceBasis>
where
    F: FnMut(usize, usize),
{
    settings.validate()?;
    validate_matrix(a)?;

    let start = Instant::now();
    let m = a.rows();
    let n = a.cols();

    let rows = sparse::to_row_major(a);
    let order = rows_by_nnz(&rows);

    if settings.verbose {
        log::info!(
            "sparse null space: {}x{} nnz={} threshold={} zero_tol={:.1e}",
            m,
            n,
            a.nnz(),
            settings.threshold,
            settings.zero_tol
        );
    }

    let mut h = sparse::identity(n);
    let mut dense_row = vec![0.0; n];
    let mut rank = 0usize;
    let mut dependent_rows = 0usize;
    let mut peak_nnz = h.nnz();

    for (i, &row) in order.iter().enumerate() {
        let (next, step) = step_row(&rows, row, h, &mut dense_row, settings)?;
        h = next;
        match step {
            RowStep::Satisfied => dependent_rows += 1,
            RowStep::Eliminated { .. } => rank += 1,
        }
        peak_nnz = peak_nnz.max(h.nnz());

        if settings.verbose && settings.log_freq > 0 && (i + 1) % settings.log_freq == 0 {
            log::debug!(
                "row {}/{}: basis {}x{} nnz={} rank={}",
                i + 1,
                m,
                h.rows(),
                h.cols(),
                h.nnz(),
                rank
            );
        }
        on_progress(i, m);
    }

    let info = NullSpaceInfo {
        rows: m,
        cols: n,
        rank,
        dependent_rows,
        basis_nnz: h.nnz(),
        peak_nnz,
        elapsed_ms: start.elapsed().as_millis() as u64,
        row_order: order,
    };

    if settings.verbose {
        log::info!("sparse null space done: {}", info);
    }

    Ok(NullSpaceBasis { basis: h, info })
}

/// Process row `row` of the CSR matrix `rows` against the basis `h`.
///
/// Consumes the current basis and returns the next one.
fn step_row(
    rows: &SparseCsc,
    row: usize,
    h: SparseCsc,
    dense_row: &mut [f64],
    settings: &NullSpaceSettings,
) -> NullSpaceResult<(SparseCsc, RowStep)> {
    let parallel = settings.use_parallel(h.cols());

    sparse::scatter_row(rows, row, dense_row);
    let proj = project_row(dense_row, &h, parallel);
    sparse::clear_row(rows, row, dense_row);

    let pivot = select_pivot(&h, &proj, settings.threshold, settings.zero_tol).map_err(
        |failure| NullSpaceError::NumericalInstability {
            row,
            detail: failure.0,
        },
    )?;

    let Some(pivot) = pivot else {
        return Ok((h, RowStep::Satisfied));
    };

    // eliminating the last column leaves nothing to return
    if h.cols() == 1 {
        return Err(NullSpaceError::NullSpaceEmpty {
            rows: rows.rows(),
            cols: rows.cols(),
            rank: rows.cols(),
        });
    }

    if pivot.value.abs() < SMALL_PIVOT_RATIO * pivot.smax {
        log::warn!(
            "row {}: small pivot {:.3e} (max projection {:.3e})",
            row,
            pivot.value,
            pivot.smax
        );
    }

    let nz = proj.nonzero_indices(settings.zero_tol);
    let next = eliminate(&h, &proj.values, &nz, &pivot, settings.drop_tol, parallel);
    Ok((next, RowStep::Eliminated { col: pivot.col }))
}
