//! GGH lattice key generation.
//!
//! A key pair is a near-orthogonal integer private basis `R`, a random unimodular `U`, and the
//! public basis `R · U` whose Hadamard ratio is pushed below a threshold by rejection sampling.

pub mod errors;
pub mod hadamard;
pub mod keypair;
pub mod lattice;
pub mod unimodular;
