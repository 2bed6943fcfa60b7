//! Benchmarking CLI for sparse null-space construction.

mod mode_choice;
mod regression;
mod test_problems;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use nullspace_core::linalg::sparse::SparseCsc;
use nullspace_core::verify::{dense_rank, probe_residual, residual_inf_norm};
use nullspace_core::{compute_sparse_null_basis_with_progress, NullSpaceSettings};

use crate::mode_choice::{settings_for, ModeChoice};
use crate::regression::{run_regression, RegressionConfig};
use crate::test_problems::{random_rank_deficient, random_sparse};

#[derive(Parser, Debug)]
#[command(name = "nullspace-bench", about = "Sparse null-space benchmarks and smoke tests")]
struct Cli {
    /// Pivot threshold in [0, 1)
    #[arg(long, global = true, default_value_t = 0.1)]
    threshold: f64,

    /// Column-parallel scheduling
    #[arg(long, global = true, value_enum, default_value_t = ModeChoice::Auto)]
    mode: ModeChoice,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One random matrix, with residual check
    Random {
        #[arg(long, default_value_t = 1000)]
        rows: usize,
        #[arg(long, default_value_t = 15000)]
        cols: usize,
        #[arg(long, default_value_t = 0.001)]
        density: f64,
        #[arg(long, default_value_t = 12)]
        seed: u64,
        /// Print a progress line every 10% of rows
        #[arg(long)]
        progress: bool,
        /// Also compare k with n - rank(A) (dense SVD; small matrices only)
        #[arg(long)]
        check_rank: bool,
    },

    /// Fixed set of shapes and densities
    Suite,

    /// Seed sweep with pass/fail checks
    Regression {
        #[arg(long, default_value_t = 150)]
        rows: usize,
        #[arg(long, default_value_t = 150)]
        cols: usize,
        #[arg(long, default_value_t = 0.01)]
        density: f64,
        #[arg(long, default_value_t = 100)]
        seeds: u64,
        #[arg(long, default_value_t = 0)]
        first_seed: u64,
        #[arg(long, default_value_t = 1e-10)]
        residual_tol: f64,
        /// Skip the dense rank-nullity check
        #[arg(long)]
        no_rank: bool,
        /// Write the summary as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn run_benchmark(
    name: &str,
    a: &SparseCsc,
    settings: &NullSpaceSettings,
    progress: bool,
    check_rank: bool,
) -> Result<()> {
    let (m, n) = (a.rows(), a.cols());
    let nnz = a.nnz();

    println!("\n{}", "=".repeat(60));
    println!("{}", name);
    println!("{}", "=".repeat(60));
    println!("Rows (m):         {}", m);
    println!("Columns (n):      {}", n);
    println!(
        "A nonzeros:       {} ({:.3}% dense)",
        nnz,
        100.0 * nnz as f64 / (m as f64 * n as f64)
    );
    println!();

    let step = (m / 10).max(1);
    let start = Instant::now();
    let result = compute_sparse_null_basis_with_progress(a, settings, |i, total| {
        if progress && ((i + 1) % step == 0 || i + 1 == total) {
            println!("  row {:>8}/{}", i + 1, total);
        }
    });
    let elapsed = start.elapsed();

    match result {
        Ok(res) => {
            let h = &res.basis;
            let probe: Vec<f64> = (0..h.cols()).map(|j| 1.0 / (1.0 + j as f64)).collect();

            println!("Basis columns k:  {}", res.dim());
            println!("Rank:             {}", res.info.rank);
            println!("Dependent rows:   {}", res.info.dependent_rows);
            println!("Basis nonzeros:   {} (peak {})", res.info.basis_nnz, res.info.peak_nnz);
            println!("max |A*H|:        {:.3e}", residual_inf_norm(a, h));
            println!("max |A*H*x|:      {:.3e}", probe_residual(a, h, &probe));
            println!("Solve time:       {:.3} ms", elapsed.as_secs_f64() * 1000.0);

            if check_rank {
                let rank_a = dense_rank(a, None);
                println!("Dense rank(A):    {}", rank_a);
                if rank_a + res.dim() != n {
                    bail!("rank-nullity violated: {} + {} != {}", rank_a, res.dim(), n);
                }
            }
        }
        Err(e) => {
            println!("ERROR: {}", e);
        }
    }
    Ok(())
}

fn run_suite(settings: &NullSpaceSettings) -> Result<()> {
    println!("Sparse Null-Space Benchmarks");
    println!("============================\n");

    let a = random_sparse(150, 150, 0.01, 0);
    run_benchmark("Random 150x150, 1% dense", &a, settings, false, true)?;

    let a = random_sparse(500, 800, 0.005, 1);
    run_benchmark("Random 500x800, 0.5% dense", &a, settings, false, false)?;

    let a = random_rank_deficient(300, 400, 0.01, 50, 20, 2);
    run_benchmark("Rank-deficient 350x420 (dependent rows, duplicate cols)", &a, settings, false, true)?;

    let a = random_sparse(1000, 15000, 0.001, 12);
    run_benchmark("Random 1000x15000, 0.1% dense", &a, settings, false, false)?;

    let a = random_sparse(2000, 5000, 0.002, 3);
    run_benchmark("Random 2000x5000, 0.2% dense", &a, settings, false, false)?;

    println!("\n{}", "=".repeat(60));
    println!("Benchmarks complete");
    println!("{}", "=".repeat(60));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings_for(cli.threshold, cli.mode);
    settings.validate()?;

    match cli.command {
        Command::Random {
            rows,
            cols,
            density,
            seed,
            progress,
            check_rank,
        } => {
            let a = random_sparse(rows, cols, density, seed);
            let name = format!("Random {}x{}, density {}, seed {}", rows, cols, density, seed);
            run_benchmark(&name, &a, &settings, progress, check_rank)
        }
        Command::Suite => run_suite(&settings),
        Command::Regression {
            rows,
            cols,
            density,
            seeds,
            first_seed,
            residual_tol,
            no_rank,
            json,
        } => {
            let config = RegressionConfig {
                rows,
                cols,
                density,
                seeds,
                first_seed,
                residual_tol,
                check_rank: !no_rank,
            };
            let summary = run_regression(&config, &settings);

            for res in summary.results.iter().filter(|r| !r.passed) {
                println!(
                    "seed {}: dim={:?} residual={:?} {}",
                    res.seed,
                    res.dim,
                    res.residual,
                    res.error.as_deref().unwrap_or("")
                );
            }
            println!(
                "{} cases, {} failures, max residual {:.3e}, total {} ms",
                summary.cases, summary.failures, summary.max_residual, summary.total_solve_ms
            );

            if let Some(path) = json {
                summary.save_json(&path)?;
            }
            if summary.failures > 0 {
                bail!("{} regression failures", summary.failures);
            }
            Ok(())
        }
    }
}
