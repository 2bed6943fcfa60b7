//! Null space of a wide random sparse matrix.
//!
//! Builds a 1000 x 15000 matrix at 0.1% density, computes a sparse null-space
//! basis with a progress readout, and checks that A * H vanishes.

use nullspace_core::linalg::sparse;
use nullspace_core::verify::residual_inf_norm;
use nullspace_core::{compute_sparse_null_basis_with_progress, NullSpaceSettings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn main() {
    let (m, n, density) = (1000, 15000, 0.001);
    let mut rng = ChaCha8Rng::seed_from_u64(12);

    let mut triplets = Vec::new();
    for i in 0..m {
        for j in 0..n {
            if rng.gen::<f64>() < density {
                triplets.push((i, j, rng.gen::<f64>()));
            }
        }
    }
    let a = sparse::from_triplets(m, n, triplets);

    println!("Sparse null space: {}x{}, {} nonzeros", m, n, a.nnz());

    let settings = NullSpaceSettings::default();
    let result = compute_sparse_null_basis_with_progress(&a, &settings, |i, total| {
        if (i + 1) % 100 == 0 || i + 1 == total {
            println!("  row {:>5}/{}", i + 1, total);
        }
    });

    match result {
        Ok(basis) => {
            println!("{}", basis.info);
            println!("max |A*H| = {:.3e}", residual_inf_norm(&a, &basis.basis));
        }
        Err(e) => {
            eprintln!("Null space failed: {}", e);
            std::process::exit(1);
        }
    }
}
