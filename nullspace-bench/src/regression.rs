//! Seed sweep over random matrices with pass/fail checks and JSON summaries.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use nullspace_core::verify::{check_basis, dense_rank, residual_inf_norm};
use nullspace_core::{compute_sparse_null_basis, NullSpaceError, NullSpaceSettings};
use serde::{Deserialize, Serialize};

use crate::test_problems::random_sparse;

/// Dense rank checks are skipped above this many entries.
const DENSE_RANK_LIMIT: usize = 400 * 400;

#[derive(Debug, Clone)]
pub struct RegressionConfig {
    pub rows: usize,
    pub cols: usize,
    pub density: f64,
    pub seeds: u64,
    pub first_seed: u64,
    pub residual_tol: f64,
    pub check_rank: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionResult {
    pub seed: u64,
    pub nnz: usize,
    pub dim: Option<usize>,
    pub basis_nnz: Option<usize>,
    pub residual: Option<f64>,
    pub matrix_rank: Option<usize>,
    pub solve_time_ms: u64,
    pub error: Option<String>,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionSummary {
    pub rows: usize,
    pub cols: usize,
    pub density: f64,
    pub threshold: f64,
    pub cases: usize,
    pub failures: usize,
    pub total_solve_ms: u64,
    pub max_residual: f64,
    pub results: Vec<RegressionResult>,
}

impl RegressionSummary {
    /// Save to JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file {}", path.as_ref().display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write JSON to {}", path.as_ref().display()))?;
        Ok(())
    }
}

fn run_case(config: &RegressionConfig, settings: &NullSpaceSettings, seed: u64) -> RegressionResult {
    let a = random_sparse(config.rows, config.cols, config.density, seed);
    let matrix_rank = (config.check_rank && config.rows * config.cols <= DENSE_RANK_LIMIT)
        .then(|| dense_rank(&a, None));

    let start = Instant::now();
    let outcome = compute_sparse_null_basis(&a, settings);
    let solve_time_ms = start.elapsed().as_millis() as u64;

    let mut result = RegressionResult {
        seed,
        nnz: a.nnz(),
        dim: None,
        basis_nnz: None,
        residual: None,
        matrix_rank,
        solve_time_ms,
        error: None,
        passed: false,
    };

    match outcome {
        Ok(basis) => {
            let h = &basis.basis;
            result.dim = Some(basis.dim());
            result.basis_nnz = Some(basis.info.basis_nnz);

            if matrix_rank.is_some() {
                let check = check_basis(&a, h, config.residual_tol);
                result.residual = Some(check.residual);
                result.passed = check.passed(config.cols);
                if !result.passed {
                    result.error = Some(format!(
                        "residual {:.3e} (tol {:.3e}), rank(A) + k = {} + {}, rank(H) = {}, n = {}",
                        check.residual,
                        check.tolerance,
                        check.matrix_rank,
                        check.dim,
                        check.basis_rank,
                        config.cols
                    ));
                }
            } else {
                let residual = residual_inf_norm(&a, h);
                let scale = h.data().iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
                result.residual = Some(residual);
                result.passed = residual <= config.residual_tol * (1.0 + scale);
            }
        }
        Err(NullSpaceError::NullSpaceEmpty { rank, .. }) => {
            // only a failure if the dense rank disagrees
            result.passed = matrix_rank.map_or(true, |r| r == config.cols);
            result.error = Some(format!("null space empty (rank {})", rank));
        }
        Err(e) => {
            result.error = Some(e.to_string());
        }
    }
    result
}

pub fn run_regression(config: &RegressionConfig, settings: &NullSpaceSettings) -> RegressionSummary {
    let results: Vec<RegressionResult> = (config.first_seed..config.first_seed + config.seeds)
        .map(|seed| run_case(config, settings, seed))
        .collect();

    RegressionSummary {
        rows: config.rows,
        cols: config.cols,
        density: config.density,
        threshold: settings.threshold,
        cases: results.len(),
        failures: results.iter().filter(|r| !r.passed).count(),
        total_solve_ms: results.iter().map(|r| r.solve_time_ms).sum(),
        max_residual: results
            .iter()
            .filter_map(|r| r.residual)
            .fold(0.0_f64, f64::max),
        results,
    }
}
