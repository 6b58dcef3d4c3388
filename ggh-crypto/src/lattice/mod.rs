//! # Lattice Module
//!
//! Integer and floating-point matrix primitives shared by the key-generation pipeline.
//! Bases are stored row-major: row `i` is the `i`-th basis vector.

pub mod determinant;
pub mod matrix_ops;
pub mod orthogonalize;

/// Represents an integer vector using a `Vec<i64>`.
pub type Vector = Vec<i64>;
/// Represents an integer matrix using a `Vec<Vec<i64>>`.
pub type Matrix = Vec<Vec<i64>>;
/// Represents a floating-point matrix used by the orthogonalization stages.
pub type RealMatrix = Vec<Vec<f64>>;

pub use determinant::{determinant, real_determinant, solve_real};
pub use matrix_ops::{identity_matrix, matrix_mul, require_square};
pub use orthogonalize::orthonormalize_rows;
