//! # Hadamard Module
//!
//! Measures how close the rows of a basis are to mutually orthogonal.
//!
//! The Hadamard ratio of an `n × n` basis `B` is
//! `(|det B| / ∏ ‖bᵢ‖)^(1/n)`. Hadamard's inequality bounds it to `(0, 1]` for a
//! non-singular basis, reaching `1` exactly when the rows are pairwise orthogonal.

use crate::errors::GGHCryptoError;
use crate::lattice::matrix_ops::{integer_norm, norm, require_square};
use crate::lattice::{Matrix, RealMatrix, determinant, real_determinant};

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use std::f64::consts::LN_2;

/// `|det| / ∏‖row‖` at or below this marks a real basis as singular.
const REAL_SINGULARITY_TOLERANCE: f64 = 1e-12;

/// Hadamard ratio of a square integer basis.
///
/// The determinant is exact, so a basis is degenerate only if it is truly singular. The
/// fractional power is applied to `|det|` in log space, which keeps the result finite for
/// odd dimensions with a negative determinant and for determinants beyond `f64` range.
///
/// # Errors
///
/// * `GGHCryptoError::InvalidDimension` if `n` is zero.
/// * `GGHCryptoError::DimensionMismatch` if `basis` is not `n × n`.
/// * `GGHCryptoError::DegenerateBasis` if a row has zero norm or the determinant is zero.
pub fn hadamard_ratio(basis: &Matrix, n: usize) -> Result<f64, GGHCryptoError> {
    require_square(basis, n)?;

    let log_norms = log_row_norms(basis.iter().map(|row| integer_norm(row)))?;

    let det = determinant(basis)?;
    if det.is_zero() {
        return Err(GGHCryptoError::DegenerateBasis(
            "Basis is singular (determinant is zero)".into(),
        ));
    }

    let log_ratio = (ln_abs(&det)? - log_norms) / n as f64;
    Ok(log_ratio.exp().min(1.0))
}

/// Hadamard ratio of a square floating-point basis.
///
/// # Errors
///
/// Same as [`hadamard_ratio`]; singularity is decided with a relative tolerance on
/// `|det| / ∏‖row‖`.
pub fn hadamard_ratio_real(basis: &RealMatrix, n: usize) -> Result<f64, GGHCryptoError> {
    require_square(basis, n)?;

    let log_norms = log_row_norms(basis.iter().map(|row| norm(row)))?;

    let det = real_determinant(basis)?.abs();
    let volume_ratio = if det > 0.0 {
        (det.ln() - log_norms).exp()
    } else {
        0.0
    };
    if !(volume_ratio > REAL_SINGULARITY_TOLERANCE) {
        return Err(GGHCryptoError::DegenerateBasis(format!(
            "Basis is numerically singular (|det| / ∏‖row‖ = {:e})",
            volume_ratio
        )));
    }

    Ok(volume_ratio.powf(1.0 / n as f64).min(1.0))
}

/// Sum of `ln ‖row‖`, rejecting zero rows.
fn log_row_norms(norms: impl Iterator<Item = f64>) -> Result<f64, GGHCryptoError> {
    let mut total = 0.0;
    for (i, row_norm) in norms.enumerate() {
        if !(row_norm > 0.0) {
            return Err(GGHCryptoError::DegenerateBasis(format!(
                "Row {} has zero norm",
                i
            )));
        }
        total += row_norm.ln();
    }
    Ok(total)
}

/// `ln |value|` for arbitrarily large integers.
fn ln_abs(value: &BigInt) -> Result<f64, GGHCryptoError> {
    let magnitude = value.magnitude();
    let bits = magnitude.bits();
    // keep 64 significant bits and account for the rest as powers of two
    let shift = bits.saturating_sub(64);
    let head = (magnitude >> shift)
        .to_f64()
        .ok_or(GGHCryptoError::CalculationOverflow)?;
    Ok(head.ln() + shift as f64 * LN_2)
}
