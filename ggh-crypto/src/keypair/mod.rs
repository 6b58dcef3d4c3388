//! # Keypair Module
//!
//! GGH key-pair generation: a near-orthogonal private basis, a unimodular transform and the
//! skewed public basis they multiply into.

pub mod keys;
pub mod params;

pub use keys::{KeyPair, PrivateKey, PublicKey, generate_keypair, recover_transform};
pub use params::{KeyGenParams, RandomSource};
