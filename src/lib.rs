// -*- mode: rust; -*-
//
// This file is part of frost-ed25519-threshold.
// See LICENSE for licensing information.

#![deny(missing_docs)]

//! An implementation of FROST (Flexible Round-Optimized Schnorr Threshold
//! signatures) over Ed25519, per RFC 9591's `FROST-ED25519-SHA512-v1`
//! ciphersuite.
//!
//! Given a threshold `(t, n)` with `1 ≤ t ≤ n`, any `t` of `n` participants
//! holding a [`keys::KeyPackage`] can collaboratively produce a 64-byte
//! signature that is byte-identical in structure to a standard Ed25519
//! signature and verifies under the group's collective public key with any
//! RFC 8032 verifier. No single participant ever learns the group secret.
//!
//! The crate covers trusted-dealer key generation, the two-round signing
//! protocol and coordinator-side aggregation, signature verification, and a
//! key-backup facility (splitting and recovering an existing Ed25519
//! secret). It does not cover distributed key generation, message
//! transport, or long-term key-package storage; see each module's
//! documentation for the boundary.

mod ciphersuite;
mod derive;

pub mod coordinator;
pub mod error;
pub mod keys;
#[cfg(feature = "serde")]
mod serialization;
pub mod signer;

pub use ciphersuite::{GroupElement, Scalar, CONTEXT_STRING};
pub use coordinator::{verify, Coordinator, GroupCommitment, SessionState, SigningPackage};
pub use error::Error;
pub use keys::{
    create_config, recover, split, split_pkcs8, verify_key_package, Config, Identifier,
    KeyPackage, KeyShare, PublicKeyPackage, SecretEncoding,
};
pub use signer::{CommitmentShare, NonceCommitment, Nonces, SignatureShare, Signer};

use rand_core::{CryptoRng, RngCore};

/// Generates `config.max_signers` key packages for a fresh, randomly
/// sampled group secret key. Thin wrapper over [`keys::generate_with_dealer`]
/// under the operation name used in the crate's external interface.
pub fn generate_keys<R: RngCore + CryptoRng>(
    config: &Config,
    rng: &mut R,
) -> Result<(PublicKeyPackage, Vec<KeyPackage>), Error> {
    keys::generate_with_dealer(config, rng)
}

/// Runs round 1, signing-package construction, round 2, and aggregation in
/// one call, for a caller holding every participating share locally. Used
/// for testing and for the end of the backup/recovery path ([`sign`]).
pub fn threshold_sign<R: RngCore + CryptoRng>(
    shares: &[KeyPackage],
    message: &[u8],
    public_key_package: &PublicKeyPackage,
    config: &Config,
    rng: &mut R,
) -> Result<[u8; 64], Error> {
    if (shares.len() as u32) < config.threshold {
        return Err(Error::InsufficientSigners);
    }

    let signers: Vec<Signer> = shares.iter().cloned().map(Signer::new).collect();

    let mut nonces = Vec::with_capacity(signers.len());
    let mut commitment_shares = Vec::with_capacity(signers.len());
    for signer in &signers {
        let (signer_nonces, commitment_share) = signer.round1(rng);
        nonces.push(signer_nonces);
        commitment_shares.push(commitment_share);
    }

    let mut coordinator = Coordinator::new(config.threshold, public_key_package.clone());
    let package = coordinator
        .create_signing_package(message.to_vec(), &commitment_shares)?
        .clone();

    let mut signature_shares = Vec::with_capacity(signers.len());
    for (signer, signer_nonces) in signers.into_iter().zip(nonces) {
        signature_shares.push(signer.round2(&package, signer_nonces)?);
    }

    coordinator.aggregate_signatures(&signature_shares)
}

/// Signs `message` with a recovered group secret scalar by re-splitting it
/// into a fresh `(t, n)` polynomial and running [`threshold_sign`]. The
/// resulting signature is a normal Ed25519 signature over `scalar · G`.
pub fn sign<R: RngCore + CryptoRng>(
    scalar: [u8; 32],
    message: &[u8],
    config: &Config,
    rng: &mut R,
) -> Result<[u8; 64], Error> {
    let (public_key_package, shares) =
        keys::split(&scalar, SecretEncoding::CanonicalScalar, config, rng)?;
    threshold_sign(&shares, message, &public_key_package, config, rng)
}
