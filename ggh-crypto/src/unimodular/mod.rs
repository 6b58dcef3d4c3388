//! # Unimodular Module
//!
//! Random integer matrices with determinant exactly ±1.
//!
//! A unimodular `U` is built as the product of an upper- and a lower-triangular integer
//! matrix whose diagonals hold ±1. The determinant of each factor is the product of its
//! diagonal, so `det(U) = det(Upper)·det(Lower) ∈ {+1, -1}` holds by construction and
//! no rejection step is needed.

use crate::errors::GGHCryptoError;
use crate::lattice::matrix_ops::require_square;
use crate::lattice::{Matrix, determinant, matrix_mul};

use num_bigint::BigInt;
use num_traits::Signed;
use rand::Rng;

/// An integer matrix with `|det| = 1`; its inverse is an integer matrix too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnimodularTransform {
    matrix: Matrix,
}

impl UnimodularTransform {
    /// Wraps `matrix` after checking exactly that `|det(matrix)| = 1`.
    pub fn try_with(matrix: Matrix) -> Result<Self, GGHCryptoError> {
        require_square(&matrix, matrix.len())?;
        let det = determinant(&matrix)?;
        if det.abs() != BigInt::from(1) {
            return Err(GGHCryptoError::InvalidParameters(format!(
                "Matrix is not unimodular (det = {})",
                det
            )));
        }
        Ok(Self { matrix })
    }

    pub fn as_matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn into_matrix(self) -> Matrix {
        self.matrix
    }

    pub fn dimension(&self) -> usize {
        self.matrix.len()
    }

    /// Exact determinant, always `1` or `-1`.
    pub fn determinant(&self) -> Result<BigInt, GGHCryptoError> {
        determinant(&self.matrix)
    }
}

/// Draws random unimodular matrices with off-diagonal factor entries in `[-bound, bound)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnimodularGenerator {
    sample_bound: i64,
}

impl UnimodularGenerator {
    /// Creates a generator sampling factor entries from `[-sample_bound, sample_bound)`.
    ///
    /// The bound must be positive.
    pub fn try_with(sample_bound: i64) -> Result<Self, GGHCryptoError> {
        if sample_bound <= 0 {
            return Err(GGHCryptoError::InvalidParameters(format!(
                "Sample bound must be > 0, got {}",
                sample_bound
            )));
        }
        Ok(Self { sample_bound })
    }

    pub fn sample_bound(&self) -> i64 {
        self.sample_bound
    }

    /// Draws the `(Upper, Lower)` triangular factors.
    ///
    /// Strictly-upper entries of `Upper` and strictly-lower entries of `Lower` are uniform in
    /// `[-bound, bound)`. Each diagonal index gets one fair sign shared by both factors.
    pub fn triangular_factors<R: Rng>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<(Matrix, Matrix), GGHCryptoError> {
        if n == 0 {
            return Err(GGHCryptoError::InvalidDimension(
                "Dimension n must be positive".into(),
            ));
        }
        let range = -self.sample_bound..self.sample_bound;

        let mut upper = vec![vec![0i64; n]; n];
        let mut lower = vec![vec![0i64; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                upper[i][j] = rng.random_range(range.clone());
            }
        }
        for i in 0..n {
            for j in 0..i {
                lower[i][j] = rng.random_range(range.clone());
            }
        }
        for i in 0..n {
            let sign = if rng.random_bool(0.5) { 1 } else { -1 };
            upper[i][i] = sign;
            lower[i][i] = sign;
        }

        Ok((upper, lower))
    }

    /// Generates a random `n × n` unimodular transform.
    pub fn generate<R: Rng>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<UnimodularTransform, GGHCryptoError> {
        let (upper, lower) = self.triangular_factors(n, rng)?;
        compose(&upper, &lower)
    }
}

/// Multiplies triangular factors into a unimodular transform.
///
/// # Errors
///
/// Returns `GGHCryptoError::InvalidParameters` if `upper` is not upper-triangular, `lower` is not
/// lower-triangular, or a diagonal entry is not ±1. Shape errors surface as
/// `GGHCryptoError::DimensionMismatch`.
pub fn compose(upper: &Matrix, lower: &Matrix) -> Result<UnimodularTransform, GGHCryptoError> {
    let n = upper.len();
    require_square(upper, n)?;
    require_square(lower, n)?;

    for i in 0..n {
        if upper[i][i].abs() != 1 || lower[i][i].abs() != 1 {
            return Err(GGHCryptoError::InvalidParameters(format!(
                "Diagonal entry {} of the factors must be ±1",
                i
            )));
        }
        for j in 0..i {
            if upper[i][j] != 0 {
                return Err(GGHCryptoError::InvalidParameters(format!(
                    "Upper factor has non-zero entry below the diagonal at ({}, {})",
                    i, j
                )));
            }
            if lower[j][i] != 0 {
                return Err(GGHCryptoError::InvalidParameters(format!(
                    "Lower factor has non-zero entry above the diagonal at ({}, {})",
                    j, i
                )));
            }
        }
    }

    Ok(UnimodularTransform {
        matrix: matrix_mul(upper, lower)?,
    })
}
