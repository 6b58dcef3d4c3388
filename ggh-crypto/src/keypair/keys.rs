use crate::errors::GGHCryptoError;
use crate::hadamard::hadamard_ratio;
use crate::keypair::params::KeyGenParams;
use crate::lattice::matrix_ops::{require_square, round_to_integer, to_real};
use crate::lattice::{
    Matrix, RealMatrix, determinant, matrix_mul, orthonormalize_rows, solve_real,
};
pub use crate::unimodular::UnimodularTransform;
use crate::unimodular::UnimodularGenerator;

use log::{debug, trace, warn};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use rand::Rng;

/// Smallest dimension for which a public basis can ever be accepted.
///
/// A `1 × 1` basis always has Hadamard ratio `1.0`.
pub const MIN_DIMENSION: usize = 2;

/// The "good" basis: integer rows that are close to mutually orthogonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    basis: Matrix,
}

/// The "bad" basis `PrivateKey · U`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    basis: Matrix,
}

/// The result of key generation.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
    pub transform: UnimodularTransform,
    /// Number of unimodular candidates drawn, including the accepted one.
    pub attempts: usize,
    /// Hadamard ratio of the accepted public basis.
    pub ratio: f64,
}

impl PrivateKey {
    /// Wraps a square, non-singular integer basis.
    pub fn try_with(basis: Matrix) -> Result<Self, GGHCryptoError> {
        require_non_degenerate(&basis)?;
        Ok(Self { basis })
    }

    pub fn basis(&self) -> &Matrix {
        &self.basis
    }

    pub fn into_basis(self) -> Matrix {
        self.basis
    }

    pub fn dimension(&self) -> usize {
        self.basis.len()
    }

    pub fn hadamard_ratio(&self) -> Result<f64, GGHCryptoError> {
        hadamard_ratio(&self.basis, self.dimension())
    }
}

impl PublicKey {
    /// Wraps a square, non-singular integer basis.
    pub fn try_with(basis: Matrix) -> Result<Self, GGHCryptoError> {
        require_non_degenerate(&basis)?;
        Ok(Self { basis })
    }

    pub fn basis(&self) -> &Matrix {
        &self.basis
    }

    pub fn into_basis(self) -> Matrix {
        self.basis
    }

    pub fn dimension(&self) -> usize {
        self.basis.len()
    }

    pub fn hadamard_ratio(&self) -> Result<f64, GGHCryptoError> {
        hadamard_ratio(&self.basis, self.dimension())
    }
}

impl KeyPair {
    /// Generates a key pair of dimension `n`, drawing randomness from `params.random_source`.
    pub fn generate(n: usize, params: &KeyGenParams) -> Result<Self, GGHCryptoError> {
        let mut rng = params.random_source.rng();
        generate_keypair(n, params, &mut rng)
    }

    pub fn dimension(&self) -> usize {
        self.private_key.dimension()
    }

    /// Re-checks the algebraic relations between the three matrices.
    ///
    /// # Errors
    ///
    /// Returns `GGHCryptoError::InvalidParameters` if the transform is not unimodular, the public
    /// basis is not `PrivateKey · U`, or its Hadamard ratio exceeds `acceptance_threshold`.
    pub fn verify(&self, acceptance_threshold: f64) -> Result<(), GGHCryptoError> {
        let det = self.transform.determinant()?;
        if det.abs() != BigInt::from(1) {
            return Err(GGHCryptoError::InvalidParameters(format!(
                "Transform is not unimodular (det = {})",
                det
            )));
        }

        let product = matrix_mul(self.private_key.basis(), self.transform.as_matrix())?;
        if &product != self.public_key.basis() {
            return Err(GGHCryptoError::InvalidParameters(
                "Public basis does not equal PrivateKey · U".into(),
            ));
        }

        let ratio = self.public_key.hadamard_ratio()?;
        if ratio > acceptance_threshold {
            return Err(GGHCryptoError::InvalidParameters(format!(
                "Public basis Hadamard ratio {:.4} exceeds threshold {}",
                ratio, acceptance_threshold
            )));
        }

        Ok(())
    }

    pub fn into_parts(self) -> (PrivateKey, PublicKey, UnimodularTransform) {
        (self.private_key, self.public_key, self.transform)
    }
}

/// Generates a GGH key pair of dimension `n`.
///
/// 1. Builds a near-orthogonal integer private basis (see [`make_private_basis`]).
/// 2. Draws unimodular `U` until `PrivateKey · U` has Hadamard ratio at or below
///    `params.acceptance_threshold`, for at most `params.max_attempts` draws.
///
/// # Errors
///
/// * `GGHCryptoError::InvalidDimension` if `n < MIN_DIMENSION`.
/// * `GGHCryptoError::InvalidParameters` if `params` fail validation.
/// * `GGHCryptoError::DegenerateBasis` if no private basis could be built or a candidate is singular.
/// * `GGHCryptoError::GenerationTimeout` if no candidate was accepted.
pub fn generate_keypair<R: Rng>(
    n: usize,
    params: &KeyGenParams,
    rng: &mut R,
) -> Result<KeyPair, GGHCryptoError> {
    if n < MIN_DIMENSION {
        return Err(GGHCryptoError::InvalidDimension(format!(
            "Dimension must be at least {}, got {} (a 1 x 1 basis always has Hadamard ratio 1)",
            MIN_DIMENSION, n
        )));
    }
    params.validate()?;

    let private_key = make_private_basis(n, params, rng)?;
    let generator = UnimodularGenerator::try_with(params.sample_bound)?;

    for attempt in 1..=params.max_attempts {
        let transform = generator.generate(n, rng)?;
        let candidate = matrix_mul(private_key.basis(), transform.as_matrix())?;
        let ratio = hadamard_ratio(&candidate, n)?;

        if ratio <= params.acceptance_threshold {
            debug!(
                "Accepted public basis of dimension {} after {} attempts (ratio {:.4})",
                n, attempt, ratio
            );
            return Ok(KeyPair {
                private_key,
                public_key: PublicKey { basis: candidate },
                transform,
                attempts: attempt,
                ratio,
            });
        }
        trace!("Rejected candidate {} (ratio {:.4})", attempt, ratio);
    }

    warn!(
        "No public basis with ratio <= {} after {} attempts",
        params.acceptance_threshold, params.max_attempts
    );
    Err(GGHCryptoError::GenerationTimeout {
        attempts: params.max_attempts,
    })
}

/// Builds a private basis by orthonormalizing a random integer matrix, scaling its rows to
/// `params.private_scale` and rounding.
///
/// Draws are retried while the random matrix is singular, rounding collapses a row to zero, or
/// the rounded basis is singular.
pub fn make_private_basis<R: Rng>(
    n: usize,
    params: &KeyGenParams,
    rng: &mut R,
) -> Result<PrivateKey, GGHCryptoError> {
    let bound = params.sample_bound;
    let scale = params.private_scale as f64;

    for attempt in 1..=params.private_max_attempts {
        let draw: RealMatrix = (0..n)
            .map(|_| (0..n).map(|_| rng.random_range(-bound..=bound) as f64).collect())
            .collect();

        let orthonormal = match orthonormalize_rows(&draw) {
            Ok(q) => q,
            Err(GGHCryptoError::DegenerateBasis(reason)) => {
                debug!("Private basis draw {} rejected: {}", attempt, reason);
                continue;
            }
            Err(e) => return Err(e),
        };

        let scaled: RealMatrix = orthonormal
            .iter()
            .map(|row| row.iter().map(|v| v * scale).collect())
            .collect();
        let basis = round_to_integer(&scaled)?;

        if let Some(row) = basis.iter().position(|row| row.iter().all(|&v| v == 0)) {
            debug!(
                "Private basis draw {} rejected: row {} rounded to zero",
                attempt, row
            );
            continue;
        }
        if determinant(&basis)?.is_zero() {
            debug!(
                "Private basis draw {} rejected: rounded basis is singular",
                attempt
            );
            continue;
        }

        return Ok(PrivateKey { basis });
    }

    Err(GGHCryptoError::DegenerateBasis(format!(
        "Could not build a non-degenerate private basis after {} attempts",
        params.private_max_attempts
    )))
}

/// Recovers `U = round(PrivateKey⁻¹ · PublicKey)` and checks `PrivateKey · U == PublicKey`.
pub fn recover_transform(
    private_key: &PrivateKey,
    public_key: &PublicKey,
) -> Result<Matrix, GGHCryptoError> {
    if private_key.dimension() != public_key.dimension() {
        return Err(GGHCryptoError::DimensionMismatch(format!(
            "Private basis has dimension {} but public basis has {}",
            private_key.dimension(),
            public_key.dimension()
        )));
    }

    let solution = solve_real(&to_real(private_key.basis()), &to_real(public_key.basis()))?;
    let transform = round_to_integer(&solution)?;

    if &matrix_mul(private_key.basis(), &transform)? != public_key.basis() {
        return Err(GGHCryptoError::InvalidParameters(
            "Public basis is not PrivateKey · U for an integer U".into(),
        ));
    }
    Ok(transform)
}

fn require_non_degenerate(basis: &Matrix) -> Result<(), GGHCryptoError> {
    require_square(basis, basis.len())?;
    if determinant(basis)?.is_zero() {
        return Err(GGHCryptoError::DegenerateBasis(
            "Basis is singular (determinant is zero)".into(),
        ));
    }
    Ok(())
}
