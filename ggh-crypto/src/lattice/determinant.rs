//! Determinants and linear solves.
//!
//! Integer determinants are exact: fraction-free Bareiss elimination over [`BigInt`]
//! keeps every intermediate value an integer, so `det == 0` and `|det| == 1` are decided
//! without tolerances. Floating-point elimination is only used for real-valued stages.

use crate::errors::GGHCryptoError;
use crate::lattice::matrix_ops::require_square;
use crate::lattice::{Matrix, RealMatrix};

use num_bigint::BigInt;
use num_traits::{One, Zero};

/// Pivots smaller than this (relative to the largest entry) count as zero.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Exact determinant of a square integer matrix.
///
/// # Errors
///
/// Returns `GGHCryptoError::DimensionMismatch` if the matrix is not square.
pub fn determinant(matrix: &Matrix) -> Result<BigInt, GGHCryptoError> {
    let n = matrix.len();
    if n == 0 {
        return Ok(BigInt::one());
    }
    require_square(matrix, n)?;

    let mut a: Vec<Vec<BigInt>> = matrix
        .iter()
        .map(|row| row.iter().map(|&v| BigInt::from(v)).collect())
        .collect();
    let mut negate = false;
    let mut prev = BigInt::one();

    for k in 0..n - 1 {
        if a[k][k].is_zero() {
            // zero column below the diagonal => singular
            let Some(pivot) = (k + 1..n).find(|&i| !a[i][k].is_zero()) else {
                return Ok(BigInt::zero());
            };
            a.swap(k, pivot);
            negate = !negate;
        }
        for i in k + 1..n {
            for j in k + 1..n {
                // exact by Sylvester's identity
                let v = (&a[i][j] * &a[k][k] - &a[i][k] * &a[k][j]) / &prev;
                a[i][j] = v;
            }
        }
        prev = a[k][k].clone();
    }

    let det = a[n - 1][n - 1].clone();
    Ok(if negate { -det } else { det })
}

/// Determinant of a square real matrix by partial-pivot elimination.
///
/// # Errors
///
/// Returns `GGHCryptoError::DimensionMismatch` if the matrix is not square.
pub fn real_determinant(matrix: &RealMatrix) -> Result<f64, GGHCryptoError> {
    let n = matrix.len();
    if n == 0 {
        return Ok(1.0);
    }
    require_square(matrix, n)?;

    let mut a = matrix.clone();
    let mut det = 1.0;
    for k in 0..n {
        let pivot = (k..n)
            .max_by(|&x, &y| a[x][k].abs().total_cmp(&a[y][k].abs()))
            .unwrap_or(k);
        if a[pivot][k] == 0.0 {
            return Ok(0.0);
        }
        if pivot != k {
            a.swap(pivot, k);
            det = -det;
        }
        det *= a[k][k];
        for i in k + 1..n {
            let factor = a[i][k] / a[k][k];
            if factor != 0.0 {
                for j in k..n {
                    a[i][j] -= factor * a[k][j];
                }
            }
        }
    }
    Ok(det)
}

/// Solves `A·X = B` for `X` with Gauss–Jordan elimination and partial pivoting.
///
/// `A` must be `n × n` and `B` must have `n` rows.
///
/// # Errors
///
/// Returns `GGHCryptoError::DimensionMismatch` on shape errors and
/// `GGHCryptoError::DegenerateBasis` if `A` is (numerically) singular.
pub fn solve_real(a: &RealMatrix, b: &RealMatrix) -> Result<RealMatrix, GGHCryptoError> {
    let n = a.len();
    require_square(a, n)?;
    if b.len() != n {
        return Err(GGHCryptoError::DimensionMismatch(format!(
            "Right-hand side has {} rows but expected {}",
            b.len(),
            n
        )));
    }
    let width = b[0].len();
    if b.iter().any(|row| row.len() != width) {
        return Err(GGHCryptoError::DimensionMismatch(
            "Right-hand side rows have inconsistent lengths".into(),
        ));
    }

    let scale = a
        .iter()
        .flatten()
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    let mut lhs = a.clone();
    let mut rhs = b.clone();

    for k in 0..n {
        let pivot = (k..n)
            .max_by(|&x, &y| lhs[x][k].abs().total_cmp(&lhs[y][k].abs()))
            .unwrap_or(k);
        if lhs[pivot][k].abs() <= PIVOT_TOLERANCE * scale {
            return Err(GGHCryptoError::DegenerateBasis(format!(
                "Matrix is singular (no pivot in column {})",
                k
            )));
        }
        lhs.swap(pivot, k);
        rhs.swap(pivot, k);

        let inv = 1.0 / lhs[k][k];
        for v in lhs[k].iter_mut() {
            *v *= inv;
        }
        for v in rhs[k].iter_mut() {
            *v *= inv;
        }

        for i in 0..n {
            if i == k {
                continue;
            }
            let factor = lhs[i][k];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                lhs[i][j] -= factor * lhs[k][j];
            }
            for j in 0..width {
                rhs[i][j] -= factor * rhs[k][j];
            }
        }
    }

    Ok(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinant_small() {
        assert_eq!(determinant(&vec![vec![5]]).unwrap(), BigInt::from(5));
        assert_eq!(
            determinant(&vec![vec![7, -3], vec![-2, 1]]).unwrap(),
            BigInt::from(1)
        );
        assert_eq!(
            determinant(&vec![vec![14, -6], vec![-4, 2]]).unwrap(),
            BigInt::from(4)
        );
    }

    #[test]
    fn test_determinant_needs_pivot() {
        // leading zero forces a row swap
        let m = vec![vec![0, 1, 2], vec![1, 0, 3], vec![4, -3, 8]];
        // 0*(0*8 - 3*-3) - 1*(1*8 - 3*4) + 2*(1*-3 - 0*4) = 0 + 4 - 6
        assert_eq!(determinant(&m).unwrap(), BigInt::from(-2));
    }

    #[test]
    fn test_determinant_singular() {
        let m = vec![vec![1, 2, 3], vec![2, 4, 6], vec![0, 1, 1]];
        assert!(determinant(&m).unwrap().is_zero());
        let zero_col = vec![vec![0, 1], vec![0, 5]];
        assert!(determinant(&zero_col).unwrap().is_zero());
    }

    #[test]
    fn test_determinant_no_i64_overflow() {
        let big = 3_000_000_000i64;
        let m = vec![vec![big, 0], vec![0, big]];
        assert_eq!(
            determinant(&m).unwrap(),
            BigInt::from(big) * BigInt::from(big)
        );
    }

    #[test]
    fn test_real_determinant() {
        let m = vec![vec![0.0, 2.0], vec![3.0, 1.0]];
        assert!((real_determinant(&m).unwrap() + 6.0).abs() < 1e-12);
        let singular = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(real_determinant(&singular).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_solve_real() {
        let a = vec![vec![2.0, 0.0], vec![0.0, 2.0]];
        let b = vec![vec![14.0, -6.0], vec![-4.0, 2.0]];
        let x = solve_real(&a, &b).unwrap();
        assert_eq!(x, vec![vec![7.0, -3.0], vec![-2.0, 1.0]]);
    }

    #[test]
    fn test_solve_real_singular() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        let b = vec![vec![1.0], vec![1.0]];
        assert!(matches!(
            solve_real(&a, &b),
            Err(GGHCryptoError::DegenerateBasis(_))
        ));
    }
}
