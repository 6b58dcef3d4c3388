use crate::errors::GGHCryptoError;
use crate::lattice::{Matrix, RealMatrix};

use itertools::Itertools;

/// Checks that `matrix` is exactly `n × n`.
///
/// # Errors
///
/// Returns `GGHCryptoError::InvalidDimension` if `n` is zero and
/// `GGHCryptoError::DimensionMismatch` if the row count or any row length differs from `n`.
pub fn require_square<T>(matrix: &[Vec<T>], n: usize) -> Result<(), GGHCryptoError> {
    if n == 0 {
        return Err(GGHCryptoError::InvalidDimension(
            "Dimension n must be positive".into(),
        ));
    }
    if matrix.len() != n {
        return Err(GGHCryptoError::DimensionMismatch(format!(
            "Matrix has {} rows but expected {}",
            matrix.len(),
            n
        )));
    }
    for (i, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(GGHCryptoError::DimensionMismatch(format!(
                "Row {} has length {} but expected {}",
                i,
                row.len(),
                n
            )));
        }
    }
    Ok(())
}

/// Computes the integer matrix product `C = AB`.
///
/// # Errors
///
/// Returns `GGHCryptoError::DimensionMismatch` if the inner dimensions of the matrices do not match
/// or if rows within the matrices have inconsistent lengths.
/// Returns `GGHCryptoError::CalculationOverflow` if any intermediate value leaves the `i64` range.
pub fn matrix_mul(a: &Matrix, b: &Matrix) -> Result<Matrix, GGHCryptoError> {
    let n = a.len(); // rows in A
    if n == 0 {
        return Ok(Matrix::new());
    }
    let m_common = a[0].len(); // cols in A
    if b.len() != m_common {
        return Err(GGHCryptoError::DimensionMismatch(format!(
            "Inner dimensions must match for matrix multiplication ({} vs {})",
            m_common,
            b.len()
        )));
    }
    let p = b.first().map_or(0, Vec::len); // cols in B

    for (k, row) in b.iter().enumerate() {
        if row.len() != p {
            return Err(GGHCryptoError::DimensionMismatch(format!(
                "Matrix B row {} has incorrect length (expected {})",
                k, p
            )));
        }
    }

    let mut c = vec![vec![0i64; p]; n];
    for (i, a_row) in a.iter().enumerate() {
        if a_row.len() != m_common {
            return Err(GGHCryptoError::DimensionMismatch(format!(
                "Matrix A row {} has incorrect length (expected {})",
                i, m_common
            )));
        }
        for j in 0..p {
            let mut sum = 0i64;
            for (k, &a_ik) in a_row.iter().enumerate() {
                let term = a_ik
                    .checked_mul(b[k][j])
                    .ok_or(GGHCryptoError::CalculationOverflow)?;
                sum = sum
                    .checked_add(term)
                    .ok_or(GGHCryptoError::CalculationOverflow)?;
            }
            c[i][j] = sum;
        }
    }
    Ok(c)
}

/// Creates an identity matrix of size `n`.
pub fn identity_matrix(n: usize) -> Matrix {
    let mut identity = vec![vec![0; n]; n];
    #[allow(clippy::needless_range_loop)]
    for i in 0..n {
        identity[i][i] = 1;
    }
    identity
}

/// Lifts an integer matrix into floating point.
pub fn to_real(matrix: &Matrix) -> RealMatrix {
    matrix
        .iter()
        .map(|row| row.iter().map(|&v| v as f64).collect())
        .collect()
}

/// Rounds every entry to the nearest integer.
///
/// # Errors
///
/// Returns `GGHCryptoError::CalculationOverflow` if an entry is not finite or does not fit an `i64`.
pub fn round_to_integer(matrix: &RealMatrix) -> Result<Matrix, GGHCryptoError> {
    matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| {
                    let r = v.round();
                    if r.is_finite() && r >= i64::MIN as f64 && r <= i64::MAX as f64 {
                        Ok(r as i64)
                    } else {
                        Err(GGHCryptoError::CalculationOverflow)
                    }
                })
                .collect()
        })
        .collect()
}

/// Dot product of two equally sized real vectors.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip_eq(b).map(|(x, y)| x * y).sum()
}

/// Euclidean norm of a real vector.
pub fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Euclidean norm of an integer vector, accumulated in floating point.
pub fn integer_norm(v: &[i64]) -> f64 {
    v.iter()
        .map(|&x| {
            let x = x as f64;
            x * x
        })
        .sum::<f64>()
        .sqrt()
}
