//! Random sparse test matrices.

use nullspace_core::linalg::sparse::{self, SparseCsc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random sparse matrix.
///
/// Each entry is present with probability `density`, values uniform in [0, 1).
pub fn random_sparse(m: usize, n: usize, density: f64, seed: u64) -> SparseCsc {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // Geometric skips keep this linear in nnz rather than m*n at low density.
    let total = m as u64 * n as u64;
    let mut triplets = Vec::with_capacity((density * total as f64) as usize + 1);
    if density >= 1.0 {
        for pos in 0..total {
            triplets.push(((pos / n as u64) as usize, (pos % n as u64) as usize, rng.gen::<f64>()));
        }
    } else if density > 0.0 {
        let log_q = (1.0 - density).ln();
        let mut pos: u64 = 0;
        loop {
            let u: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
            pos = pos.saturating_add((u.ln() / log_q).floor() as u64);
            if pos >= total {
                break;
            }
            triplets.push(((pos / n as u64) as usize, (pos % n as u64) as usize, rng.gen::<f64>()));
            pos += 1;
        }
    }
    sparse::from_triplets(m, n, triplets)
}

/// Random matrix with a prescribed rank deficiency.
///
/// The last `extra` rows are sums of two earlier rows, and the matrix is
/// padded with `dup_cols` copies of existing columns, so the null space has
/// a known minimum dimension.
pub fn random_rank_deficient(
    m: usize,
    n: usize,
    density: f64,
    extra: usize,
    dup_cols: usize,
    seed: u64,
) -> SparseCsc {
    let base = random_sparse(m, n, density, seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);

    let rows = sparse::to_row_major(&base);
    let mut triplets = Vec::new();
    for r in 0..extra {
        let i = rng.gen_range(0..m);
        let j = rng.gen_range(0..m);
        for src in [i, j] {
            if let Some(view) = rows.outer_view(src) {
                for (col, &val) in view.iter() {
                    triplets.push((r, col, val));
                }
            }
        }
    }
    let stacked = sparse::vstack(&base, &sparse::from_triplets(extra, n, triplets));

    if dup_cols == 0 {
        return stacked;
    }
    let cols = stacked.to_csc();
    let mut dup = Vec::new();
    for c in 0..dup_cols {
        let src = rng.gen_range(0..n);
        if let Some(view) = cols.outer_view(src) {
            for (row, &val) in view.iter() {
                dup.push((row, c, val));
            }
        }
    }
    sparse::hstack(&stacked, &sparse::from_triplets(stacked.rows(), dup_cols, dup))
}
