//! Modified Gram-Schmidt with one re-orthogonalization pass.

use crate::errors::GGHCryptoError;
use crate::lattice::RealMatrix;
use crate::lattice::matrix_ops::{dot, norm};

/// Rows whose residual norm falls below this are treated as linearly dependent.
const RESIDUAL_TOLERANCE: f64 = 1e-10;

/// Turns the rows of `basis` into an orthonormal set spanning the same space.
///
/// Row `i` of the result is the normalized component of `basis[i]` orthogonal to all
/// earlier rows, i.e. the `Q` factor of a QR decomposition of `basisᵀ`, transposed.
///
/// # Errors
///
/// Returns `GGHCryptoError::DegenerateBasis` if a row is (numerically) dependent on the
/// rows before it.
pub fn orthonormalize_rows(basis: &RealMatrix) -> Result<RealMatrix, GGHCryptoError> {
    let mut q: RealMatrix = Vec::with_capacity(basis.len());

    for (i, row) in basis.iter().enumerate() {
        let original = norm(row);
        let mut v = row.clone();

        // second pass recovers orthogonality lost to cancellation
        for _ in 0..2 {
            for qj in &q {
                let proj = dot(&v, qj);
                for (vk, qk) in v.iter_mut().zip(qj) {
                    *vk -= proj * qk;
                }
            }
        }

        let residual = norm(&v);
        if !residual.is_finite() || residual <= RESIDUAL_TOLERANCE * original.max(1.0) {
            return Err(GGHCryptoError::DegenerateBasis(format!(
                "Row {} is linearly dependent on the preceding rows",
                i
            )));
        }
        for vk in v.iter_mut() {
            *vk /= residual;
        }
        q.push(v);
    }

    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_become_orthonormal() {
        let basis = vec![
            vec![4.0, 1.0, 0.5],
            vec![1.0, 3.0, 0.3],
            vec![0.5, 0.3, 2.0],
        ];
        let q = orthonormalize_rows(&basis).unwrap();
        for i in 0..3 {
            assert!((norm(&q[i]) - 1.0).abs() < 1e-12);
            for j in 0..i {
                assert!(dot(&q[i], &q[j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_first_row_keeps_direction() {
        let q = orthonormalize_rows(&vec![vec![3.0, 4.0], vec![1.0, 0.0]]).unwrap();
        assert!((q[0][0] - 0.6).abs() < 1e-12);
        assert!((q[0][1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_dependent_rows_fail() {
        let basis = vec![vec![1.0, 2.0], vec![-2.0, -4.0]];
        assert!(matches!(
            orthonormalize_rows(&basis),
            Err(GGHCryptoError::DegenerateBasis(_))
        ));
        assert!(orthonormalize_rows(&vec![vec![0.0, 0.0]]).is_err());
    }
}
