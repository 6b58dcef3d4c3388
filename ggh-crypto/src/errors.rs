#[derive(thiserror::Error, Debug)]
pub enum GGHCryptoError {
    /// The requested lattice dimension cannot produce a usable key pair.
    #[error("InvalidDimension: {0}")]
    InvalidDimension(String),
    /// A basis is singular or has a zero-norm row.
    #[error("DegenerateBasis: {0}")]
    DegenerateBasis(String),
    /// The rejection-sampling loop ran out of attempts.
    #[error("No acceptable public basis found after {attempts} attempts")]
    GenerationTimeout { attempts: usize },
    #[error("DimensionMismatch: {0}")]
    DimensionMismatch(String),
    #[error("InvalidParameters: {0}")]
    InvalidParameters(String),

    #[error("Internal error: Overflow during calculation")]
    CalculationOverflow,

    #[error("Data serialization: {0}")]
    SerializationError(#[from] serde_json::Error),
}
