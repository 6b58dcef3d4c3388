use ggh_crypto::errors::GGHCryptoError;
use ggh_crypto::hadamard::hadamard_ratio;
use ggh_crypto::keypair::{KeyGenParams, KeyPair, RandomSource, recover_transform};
use ggh_crypto::lattice::{determinant, matrix_mul};

use num_bigint::BigInt;
use num_traits::Signed;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn happy_flow() -> Result<(), GGHCryptoError> {
    init_logging();

    let params = KeyGenParams::seeded(12345);
    let key_pair = KeyPair::generate(4, &params)?;

    assert_eq!(key_pair.dimension(), 4);
    assert!(key_pair.ratio <= params.acceptance_threshold);

    let (private_key, public_key, transform) = key_pair.into_parts();

    // public = private · U
    let product = matrix_mul(private_key.basis(), transform.as_matrix())?;
    assert_eq!(&product, public_key.basis());

    // |det U| = 1, so both bases have the same covolume
    assert_eq!(transform.determinant()?.abs(), BigInt::from(1));
    assert_eq!(
        determinant(private_key.basis())?.abs(),
        determinant(public_key.basis())?.abs()
    );

    // the private basis is far better than the public one
    let private_ratio = private_key.hadamard_ratio()?;
    let public_ratio = hadamard_ratio(public_key.basis(), 4)?;
    assert!(private_ratio > public_ratio);
    assert!(public_ratio <= 0.1);

    assert_eq!(
        recover_transform(&private_key, &public_key)?,
        *transform.as_matrix()
    );

    Ok(())
}

#[test]
fn same_seed_same_key_pair() -> Result<(), GGHCryptoError> {
    init_logging();

    let params = KeyGenParams::seeded(7);
    let first = KeyPair::generate(3, &params)?;
    let second = KeyPair::generate(3, &params)?;
    assert_eq!(first, second);

    let other = KeyPair::generate(3, &KeyGenParams::seeded(8))?;
    assert_ne!(first.private_key, other.private_key);

    Ok(())
}

#[test]
fn every_accepted_public_basis_is_bad() -> Result<(), GGHCryptoError> {
    init_logging();

    for seed in 0..10 {
        for n in 2..=5 {
            let params = KeyGenParams::seeded(seed);
            let key_pair = KeyPair::generate(n, &params)?;
            let ratio = key_pair.public_key.hadamard_ratio()?;
            assert!(ratio <= params.acceptance_threshold, "n = {}, seed = {}", n, seed);
            key_pair.verify(params.acceptance_threshold)?;
        }
    }

    Ok(())
}

#[test]
fn entropy_source_generates_valid_pairs() -> Result<(), GGHCryptoError> {
    init_logging();

    let params = KeyGenParams {
        random_source: RandomSource::Entropy,
        ..KeyGenParams::default()
    };
    let key_pair = KeyPair::generate(3, &params)?;
    key_pair.verify(params.acceptance_threshold)?;

    Ok(())
}

#[test]
fn config_from_json() -> Result<(), GGHCryptoError> {
    init_logging();

    let params = KeyGenParams::from_json(
        r#"{
            "sample_bound": 10,
            "acceptance_threshold": 0.05,
            "max_attempts": 200000,
            "random_source": { "kind": "seeded", "seed": 2024 }
        }"#,
    )?;
    let key_pair = KeyPair::generate(3, &params)?;
    assert!(key_pair.ratio <= 0.05);

    Ok(())
}

#[test]
fn dimension_one_is_rejected() {
    init_logging();

    let result = KeyPair::generate(1, &KeyGenParams::seeded(1));
    assert!(matches!(result, Err(GGHCryptoError::InvalidDimension(_))));
}

#[test]
fn bounded_search_times_out() {
    init_logging();

    let params = KeyGenParams {
        acceptance_threshold: 1e-12,
        max_attempts: 10,
        ..KeyGenParams::seeded(3)
    };
    match KeyPair::generate(3, &params) {
        Err(GGHCryptoError::GenerationTimeout { attempts }) => assert_eq!(attempts, 10),
        other => panic!("expected GenerationTimeout, got {:?}", other),
    }
}
