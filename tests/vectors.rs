//! A deterministic fixture, pinned to a fixed CSPRNG seed, that exercises
//! the full key-generation → round 1 → round 2 → aggregation → verify
//! pipeline and checks the canonicality invariants RFC 9591 requires of a
//! `FROST-ED25519-SHA512-v1` signature: `R` decodes in the prime-order
//! subgroup and `z` is a fully reduced scalar. Pinning the seed makes a
//! regression in the derivation chain (binding factor, challenge,
//! Lagrange coefficient) reproducible across runs rather than masked by
//! fresh randomness every time the suite executes.

use frost_ed25519_threshold::{create_config, generate_keys, threshold_sign, verify, GroupElement, Scalar};

use rand_chacha::ChaChaRng;
use rand_core::SeedableRng;

const FIXTURE_SEED: u64 = 0x4652_4f53_545f_5631; // "FROST_V1" as bytes, read as a u64
const FIXTURE_MESSAGE: &[u8] = b"FROST-ED25519-SHA512-v1 fixture message";

#[test]
fn pinned_seed_produces_a_canonical_signature() {
    let mut rng = ChaChaRng::seed_from_u64(FIXTURE_SEED);
    let config = create_config(2, 3).unwrap();
    let (public_key_package, shares) = generate_keys(&config, &mut rng).unwrap();

    let chosen = [shares[0].clone(), shares[1].clone()];
    let signature = threshold_sign(&chosen, FIXTURE_MESSAGE, &public_key_package, &config, &mut rng).unwrap();

    assert_eq!(signature.len(), 64);

    let r_bytes: [u8; 32] = signature[0..32].try_into().unwrap();
    let z_bytes: [u8; 32] = signature[32..64].try_into().unwrap();

    // R must decode to a valid point in the prime-order subgroup.
    assert!(GroupElement::decode(&r_bytes).is_ok());
    // z must already be the canonical reduction of itself.
    let z = Scalar::from_canonical_bytes(z_bytes).unwrap();
    assert_eq!(z.to_bytes(), z_bytes);

    assert!(verify(&signature, FIXTURE_MESSAGE, public_key_package.group_public_key()));
}

/// Running the same fixture twice with the same seed produces byte-identical
/// output, confirming the pipeline has no hidden non-determinism beyond the
/// CSPRNG draws it explicitly makes.
#[test]
fn pinned_seed_is_reproducible() {
    let run = || {
        let mut rng = ChaChaRng::seed_from_u64(FIXTURE_SEED);
        let config = create_config(2, 3).unwrap();
        let (public_key_package, shares) = generate_keys(&config, &mut rng).unwrap();
        let chosen = [shares[0].clone(), shares[1].clone()];
        let signature =
            threshold_sign(&chosen, FIXTURE_MESSAGE, &public_key_package, &config, &mut rng).unwrap();
        (public_key_package.group_public_key().to_bytes(), signature)
    };

    let (pk_a, sig_a) = run();
    let (pk_b, sig_b) = run();
    assert_eq!(pk_a, pk_b);
    assert_eq!(sig_a, sig_b);
}
