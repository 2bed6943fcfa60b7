//! End-to-end tests for sparse null-space construction.
//!
//! These tests validate the full pipeline (ordering, pivoting, elimination)
//! on hand-built and random sparse matrices.

use nullspace_core::linalg::sparse::{self, SparseCsc};
use nullspace_core::verify::{self, dense_rank, residual_inf_norm};
use nullspace_core::{
    compute_sparse_null_basis, compute_sparse_null_basis_with_progress, NullSpaceError,
    NullSpaceSettings, ParallelMode,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random m x n matrix with roughly `density * m * n` entries uniform in [0, 1).
fn random_sparse(m: usize, n: usize, density: f64, seed: u64) -> SparseCsc {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut triplets = Vec::new();
    for i in 0..m {
        for j in 0..n {
            if rng.gen::<f64>() < density {
                triplets.push((i, j, rng.gen_range(0.05..1.0)));
            }
        }
    }
    sparse::from_triplets(m, n, triplets)
}

fn max_abs(h: &SparseCsc) -> f64 {
    h.data().iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Residual tolerance scaled by the size of the basis entries.
fn residual_tol(h: &SparseCsc) -> f64 {
    1e-10 * (1.0 + max_abs(h))
}

/// Full check: residual, rank-nullity, and independence of the basis.
fn check_basis(a: &SparseCsc, settings: &NullSpaceSettings, label: &str) {
    let n = a.cols();

    match compute_sparse_null_basis(a, settings) {
        Ok(result) => {
            let h = &result.basis;
            assert_eq!(h.rows(), n, "{label}: basis has wrong row count");

            let check = verify::check_basis(a, h, 1e-10);
            assert!(check.passed(n), "{label}: {check:?}");
            assert_eq!(result.info.rank, check.matrix_rank, "{label}: reported rank");
            assert_eq!(
                result.info.rank + result.info.dependent_rows,
                a.rows(),
                "{label}: every row accounted for"
            );
        }
        Err(NullSpaceError::NullSpaceEmpty { .. }) => {
            let rank_a = dense_rank(a, None);
            assert_eq!(rank_a, n, "{label}: NullSpaceEmpty but rank(A) = {rank_a} < {n}");
        }
        Err(e) => panic!("{label}: unexpected error {e}"),
    }
}

#[test]
fn test_unit_rows_example() {
    // A = first four rows of I_6; null space is span{e5, e6}
    let a = sparse::from_triplets(
        4,
        6,
        vec![(0, 0, 1.0), (1, 1, 1.0), (2, 2, 1.0), (3, 3, 1.0)],
    );

    let result = compute_sparse_null_basis(&a, &NullSpaceSettings::default()).expect("basis");
    let h = &result.basis;

    assert_eq!(h.cols(), 2);
    for (_, (row, _)) in h.iter() {
        assert!(row == 4 || row == 5, "entry outside span(e5, e6) at row {row}");
    }
    assert_eq!(residual_inf_norm(&a, h), 0.0);
    assert_eq!(dense_rank(h, None), 2);
}

#[test]
fn test_identity_is_full_rank() {
    let err = compute_sparse_null_basis(&sparse::identity(6), &NullSpaceSettings::default())
        .unwrap_err();
    assert!(matches!(err, NullSpaceError::NullSpaceEmpty { rows: 6, cols: 6, rank: 6 }));
}

#[test]
fn test_tall_full_column_rank() {
    // upper bidiagonal 5x5 on top of extra dependent rows
    let mut triplets = Vec::new();
    for i in 0..5 {
        triplets.push((i, i, 2.0));
        if i + 1 < 5 {
            triplets.push((i, i + 1, 1.0));
        }
    }
    triplets.push((5, 0, 1.0));
    triplets.push((6, 4, -3.0));
    let a = sparse::from_triplets(7, 5, triplets);

    let err = compute_sparse_null_basis(&a, &NullSpaceSettings::default()).unwrap_err();
    assert!(matches!(err, NullSpaceError::NullSpaceEmpty { cols: 5, .. }));
}

#[test]
fn test_invalid_arguments() {
    let a = sparse::from_triplets(2, 3, vec![(0, 0, 1.0)]);

    for t in [1.0, -0.5, 2.0] {
        let settings = NullSpaceSettings::default().with_threshold(t);
        assert!(matches!(
            compute_sparse_null_basis(&a, &settings),
            Err(NullSpaceError::InvalidArgument(_))
        ));
    }

    let empty = sparse::from_triplets(2, 0, Vec::new());
    assert!(matches!(
        compute_sparse_null_basis(&empty, &NullSpaceSettings::default()),
        Err(NullSpaceError::InvalidArgument(_))
    ));
}

#[test]
fn test_overflow_is_reported() {
    // rank 2, but the second row's projection on e1 - e0 overflows to -inf
    let a = sparse::from_triplets(
        2,
        3,
        vec![(0, 0, 1e308), (0, 1, 1e308), (1, 0, 1e308), (1, 1, -1e308)],
    );

    for zero_tol in [0.0, 1e-12] {
        let settings = NullSpaceSettings::default().with_zero_tol(zero_tol);
        let err = compute_sparse_null_basis(&a, &settings).unwrap_err();
        assert!(
            matches!(err, NullSpaceError::NumericalInstability { row: 1, .. }),
            "zero_tol={zero_tol}: {err}"
        );
    }
}

#[test]
fn test_random_square_residual() {
    // 150x150 at 1% density, the classic smoke test
    let settings = NullSpaceSettings::default();
    for seed in 0..40 {
        let a = random_sparse(150, 150, 0.01, seed);
        let result = compute_sparse_null_basis(&a, &settings).expect("basis");
        let res = residual_inf_norm(&a, &result.basis);
        assert!(
            res < residual_tol(&result.basis),
            "seed {seed}: max|AH| = {res:.3e}"
        );
    }
}

#[test]
fn test_random_square_completeness() {
    let settings = NullSpaceSettings::default();
    for seed in 0..25 {
        let a = random_sparse(150, 150, 0.01, seed);
        check_basis(&a, &settings, &format!("150x150 seed {seed}"));
    }
}

#[test]
fn test_random_shapes() {
    let settings = NullSpaceSettings::default();
    let shapes = [
        (20, 60, 0.1),
        (60, 20, 0.05),
        (40, 40, 0.08),
        (10, 200, 0.02),
        (80, 30, 0.2),
    ];
    for (idx, &(m, n, density)) in shapes.iter().enumerate() {
        for seed in 0..5 {
            let a = random_sparse(m, n, density, 1000 * idx as u64 + seed);
            check_basis(&a, &settings, &format!("{m}x{n} d={density} seed {seed}"));
        }
    }
}

#[test]
fn test_thresholds_agree_on_dimension() {
    for seed in 0..10 {
        let a = random_sparse(50, 70, 0.05, 500 + seed);
        let rank_a = dense_rank(&a, None);

        for t in [0.0, 0.1, 0.5, 0.9, 0.99] {
            let settings = NullSpaceSettings::default().with_threshold(t);
            let result = compute_sparse_null_basis(&a, &settings).expect("basis");
            assert_eq!(result.dim(), 70 - rank_a, "seed {seed} t={t}");
            let res = residual_inf_norm(&a, &result.basis);
            assert!(res < residual_tol(&result.basis), "seed {seed} t={t}: {res:.3e}");
        }
    }
}

#[test]
fn test_rerun_is_deterministic() {
    let a = random_sparse(100, 120, 0.03, 7);
    let settings = NullSpaceSettings::default();

    let first = compute_sparse_null_basis(&a, &settings).expect("basis");
    let second = compute_sparse_null_basis(&a, &settings).expect("basis");
    assert_eq!(first.dim(), second.dim());
    assert_eq!(first.basis, second.basis);
    assert_eq!(first.info.row_order, second.info.row_order);
}

#[test]
fn test_parallel_matches_serial() {
    let a = random_sparse(120, 160, 0.03, 99);

    let serial = NullSpaceSettings::default().with_parallel(ParallelMode::Serial);
    let parallel = NullSpaceSettings::default().with_parallel(ParallelMode::Parallel);

    let hs = compute_sparse_null_basis(&a, &serial).expect("serial");
    let hp = compute_sparse_null_basis(&a, &parallel).expect("parallel");
    assert_eq!(hs.basis, hp.basis);
}

#[test]
fn test_storage_does_not_matter() {
    let a = random_sparse(60, 90, 0.05, 3);
    let a_csr = sparse::to_row_major(&a);
    let settings = NullSpaceSettings::default();

    let from_csc = compute_sparse_null_basis(&a, &settings).expect("csc");
    let from_csr = compute_sparse_null_basis(&a_csr, &settings).expect("csr");
    assert_eq!(from_csc.basis, from_csr.basis);
}

#[test]
fn test_duplicated_rows_are_dependent() {
    let a = random_sparse(40, 60, 0.06, 11);
    let doubled = sparse::vstack(&a, &a);
    let settings = NullSpaceSettings::default();

    let single = compute_sparse_null_basis(&a, &settings).expect("basis");
    let twice = compute_sparse_null_basis(&doubled, &settings).expect("basis");

    assert_eq!(single.dim(), twice.dim());
    assert_eq!(twice.info.dependent_rows, single.info.dependent_rows + 40);
    assert!(residual_inf_norm(&doubled, &twice.basis) < residual_tol(&twice.basis));
}

#[test]
fn test_duplicated_columns() {
    // A = [B, B]: every e_j - e_{j+n} is in the null space
    let b = random_sparse(30, 30, 0.1, 21);
    let a = sparse::hstack(&b, &b);
    check_basis(&a, &NullSpaceSettings::default(), "[B, B]");

    let result = compute_sparse_null_basis(&a, &NullSpaceSettings::default()).expect("basis");
    assert!(result.dim() >= 30);
}

#[test]
fn test_block_rows_stay_sparse() {
    // ten disjoint constraints x_{3b} + x_{3b+1} + x_{3b+2} = 0
    let mut triplets = Vec::new();
    for b in 0..10 {
        for j in 0..3 {
            triplets.push((b, 3 * b + j, 1.0));
        }
    }
    let a = sparse::from_triplets(10, 30, triplets);

    let result = compute_sparse_null_basis(&a, &NullSpaceSettings::default()).expect("basis");
    let h = &result.basis;

    assert_eq!(h.cols(), 20);
    assert_eq!(h.nnz(), 40);
    assert_eq!(result.info.basis_nnz, 40);
    for col in 0..h.cols() {
        assert_eq!(h.outer_view(col).unwrap().nnz(), 2);
    }
    assert_eq!(residual_inf_norm(&a, h), 0.0);
}

#[test]
fn test_exact_zero_tolerance() {
    // integer matrix: rounding never enters, exact zero tests suffice
    let a = sparse::from_triplets(
        3,
        5,
        vec![
            (0, 0, 1.0), (0, 1, 2.0),
            (1, 1, 1.0), (1, 2, -1.0),
            (2, 0, 1.0), (2, 1, 3.0), (2, 2, -1.0),
        ],
    );
    let settings = NullSpaceSettings::default().with_zero_tol(0.0);
    let result = compute_sparse_null_basis(&a, &settings).expect("basis");

    // row 2 = row 0 + row 1
    assert_eq!(result.info.rank, 2);
    assert_eq!(result.dim(), 3);
    assert_eq!(residual_inf_norm(&a, &result.basis), 0.0);
}

#[test]
fn test_progress_reports_every_row() {
    let a = random_sparse(30, 50, 0.1, 5);
    let mut calls = 0usize;
    let mut last = None;

    let result = compute_sparse_null_basis_with_progress(
        &a,
        &NullSpaceSettings::default(),
        |i, m| {
            calls += 1;
            last = Some((i, m));
        },
    )
    .expect("basis");

    assert_eq!(calls, 30);
    assert_eq!(last, Some((29, 30)));
    assert_eq!(result.info.row_order.len(), 30);
}
