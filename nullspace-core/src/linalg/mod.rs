//! Linear algebra layer.
//!
//! Sparse matrix helpers built on `sprs`.

pub mod sparse;
