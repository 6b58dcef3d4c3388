use crate::errors::GGHCryptoError;

use rand::SeedableRng;
use rand::rngs::StdRng;

use serde::{Deserialize, Serialize};

/// Where key generation draws its randomness from.
///
/// The two sources are mutually exclusive: a seeded source is reproducible and meant for
/// tests, the entropy source is meant for real keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RandomSource {
    /// Deterministic `StdRng` seeded from `seed`.
    Seeded { seed: u64 },
    /// `StdRng` seeded from the operating system.
    #[default]
    Entropy,
}

impl RandomSource {
    /// Builds a fresh generator for this source.
    pub fn rng(&self) -> StdRng {
        match *self {
            RandomSource::Seeded { seed } => StdRng::seed_from_u64(seed),
            RandomSource::Entropy => StdRng::from_os_rng(),
        }
    }
}

/// Parameters for GGH key-pair generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyGenParams {
    /// Factor entries of the unimodular transform are drawn from `[-sample_bound, sample_bound)`.
    /// Also bounds the random matrix the private basis is orthogonalized from.
    pub sample_bound: i64,
    /// A public basis is accepted once its Hadamard ratio is at or below this value.
    pub acceptance_threshold: f64,
    /// Upper bound on unimodular candidates tried before giving up.
    pub max_attempts: usize,
    /// Length the orthonormal private rows are scaled to before rounding.
    pub private_scale: i64,
    /// Upper bound on private-basis draws before giving up.
    pub private_max_attempts: usize,
    pub random_source: RandomSource,
}

impl Default for KeyGenParams {
    fn default() -> Self {
        Self {
            sample_bound: 10,
            acceptance_threshold: 0.1,
            max_attempts: 100_000,
            private_scale: 10,
            private_max_attempts: 1_000,
            random_source: RandomSource::Entropy,
        }
    }
}

impl KeyGenParams {
    /// Creates a validated parameter set.
    pub fn try_with(
        sample_bound: i64,
        acceptance_threshold: f64,
        max_attempts: usize,
        private_scale: i64,
        private_max_attempts: usize,
        random_source: RandomSource,
    ) -> Result<Self, GGHCryptoError> {
        let params = Self {
            sample_bound,
            acceptance_threshold,
            max_attempts,
            private_scale,
            private_max_attempts,
            random_source,
        };
        params.validate()?;
        Ok(params)
    }

    /// Default parameters with a deterministic seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            random_source: RandomSource::Seeded { seed },
            ..Self::default()
        }
    }

    /// Parses parameters from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, GGHCryptoError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), GGHCryptoError> {
        if self.sample_bound <= 0 {
            return Err(GGHCryptoError::InvalidParameters(
                "Sample bound must be > 0".to_string(),
            ));
        }

        if !(self.acceptance_threshold > 0.0 && self.acceptance_threshold < 1.0) {
            return Err(GGHCryptoError::InvalidParameters(format!(
                "Acceptance threshold must lie in (0, 1), got {}",
                self.acceptance_threshold
            )));
        }

        if self.max_attempts == 0 || self.private_max_attempts == 0 {
            return Err(GGHCryptoError::InvalidParameters(
                "Attempt bounds must be > 0".to_string(),
            ));
        }

        if self.private_scale <= 0 {
            return Err(GGHCryptoError::InvalidParameters(
                "Private scale must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
