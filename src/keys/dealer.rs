// -*- mode: rust; -*-
//
// This file is part of frost-ed25519-threshold.
// See LICENSE for licensing information.

//! Trusted-dealer key generation.
//!
//! Generalizes the teacher's `keygen_with_dealer`/`generate_shares`/
//! `verify_share` (`frost.rs`) from Jubjub to the Ed25519 scalar field.

use std::collections::BTreeMap;

use rand_core::{CryptoRng, RngCore};
use zeroize::DefaultIsZeroes;

use crate::ciphersuite::{GroupElement, Scalar};
use crate::error::Error;
use crate::keys::{Config, Identifier};

/// A secret scalar value representing a single signer's share of the group
/// secret. Zeroized to the all-zero `Default` value on drop.
#[derive(Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct Secret(pub(crate) Scalar);

impl DefaultIsZeroes for Secret {}

impl From<Scalar> for Secret {
    fn from(scalar: Scalar) -> Self {
        Self(scalar)
    }
}

/// A share of a participant's secret key, produced by Shamir secret sharing
/// over the polynomial `f`. `s_i·G` must equal the advertised `public`
/// share; `Σ λ_i · s_i = sk` over any valid quorum.
///
/// The private material is zeroized on drop.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyShare {
    pub(crate) id: Identifier,
    pub(crate) secret: Secret,
    pub(crate) public: GroupElement,
}

impl KeyShare {
    /// This share's participant identifier.
    pub fn identifier(&self) -> Identifier {
        self.id
    }

    /// This share's public commitment `s_i·G`.
    pub fn public_share(&self) -> GroupElement {
        self.public
    }

    /// This share's private scalar `s_i`. Crate-internal: only the signer
    /// and recovery code ever need the raw value.
    pub(crate) fn secret_scalar(&self) -> Scalar {
        self.secret.0
    }
}

/// A per-participant bundle of identifier, secret share, public share, and
/// the group's public key. Distributed once by the dealer and held
/// immutably thereafter.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyPackage {
    pub(crate) share: KeyShare,
    pub(crate) group_public: GroupElement,
}

impl KeyPackage {
    /// This participant's identifier.
    pub fn identifier(&self) -> Identifier {
        self.share.id
    }

    /// This participant's share of the group secret key (and its advertised
    /// public commitment).
    pub fn key_share(&self) -> &KeyShare {
        &self.share
    }

    /// The group's public key, shared byte-identically across every
    /// `KeyPackage` emitted by the same [`generate_with_dealer`] call.
    pub fn group_public_key(&self) -> GroupElement {
        self.group_public
    }
}

/// Public data the coordinator needs: every participant's public share, plus
/// the group public key. The coordinator never sees any `KeyShare.secret`.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PublicKeyPackage {
    pub(crate) signer_public_shares: BTreeMap<Identifier, GroupElement>,
    pub(crate) group_public: GroupElement,
}

impl PublicKeyPackage {
    /// The group's public key.
    pub fn group_public_key(&self) -> GroupElement {
        self.group_public
    }

    /// Looks up a single participant's public share.
    pub fn public_share(&self, id: Identifier) -> Option<GroupElement> {
        self.signer_public_shares.get(&id).copied()
    }
}

/// A commitment to one coefficient of the dealer's secret polynomial `f`,
/// used for verifiable secret sharing.
#[derive(Clone)]
struct CoefficientCommitment(GroupElement);

/// The full set of coefficient commitments for the polynomial used to
/// generate one run of [`generate_with_dealer`]. Every participant must see
/// the same commitment list.
#[derive(Clone)]
struct PolynomialCommitment(Vec<CoefficientCommitment>);

/// Evaluates `f` at `id` (Horner's method) and checks the result against the
/// polynomial commitment: `f(id)·G == Σ_k (id^k)·commitment[k]`.
fn verify_share_against_commitment(
    id: Identifier,
    share: &Scalar,
    commitment: &PolynomialCommitment,
) -> Result<(), Error> {
    let expected = GroupElement::mul_base(share);

    let x = Scalar::from_u32(id.0);
    let mut x_to_the_i = Scalar::one();
    let mut accumulator = GroupElement::identity();
    for coeff in commitment.0.iter() {
        accumulator = accumulator.add(&coeff.0.mul(&x_to_the_i));
        x_to_the_i = x_to_the_i * x;
    }

    if expected == accumulator {
        Ok(())
    } else {
        Err(Error::ShareVerificationFailed)
    }
}

/// Samples a fresh random polynomial of degree `threshold - 1` with `secret`
/// as the constant term, evaluates it at every participant index `1..=n`,
/// and returns each participant's `(share, commitment)` pair.
fn generate_shares_from_secret<R: RngCore + CryptoRng>(
    secret: &Scalar,
    config: &Config,
    rng: &mut R,
) -> (Vec<(Identifier, Scalar)>, PolynomialCommitment) {
    let num_coefficients = config.threshold - 1;
    let mut coefficients = Vec::with_capacity(num_coefficients as usize);
    for _ in 0..num_coefficients {
        coefficients.push(Scalar::random(rng));
    }

    let mut commitment = Vec::with_capacity(config.threshold as usize);
    commitment.push(CoefficientCommitment(GroupElement::mul_base(secret)));
    for c in &coefficients {
        commitment.push(CoefficientCommitment(GroupElement::mul_base(c)));
    }

    let mut shares = Vec::with_capacity(config.max_signers as usize);
    for index in 1..=config.max_signers {
        let x = Scalar::from_u32(index);
        // Horner's method, evaluating highest-degree coefficient first.
        let mut value = Scalar::zero();
        for coeff in coefficients.iter().rev() {
            value = (value + *coeff) * x;
        }
        value = value + *secret;

        shares.push((Identifier(index), value));
    }

    (shares, PolynomialCommitment(commitment))
}

/// Generates `config.max_signers` key packages for a fresh, randomly sampled
/// group secret key, using Shamir secret sharing over the Ed25519 scalar
/// field with `config.threshold` required to reconstruct.
pub fn generate_with_dealer<R: RngCore + CryptoRng>(
    config: &Config,
    rng: &mut R,
) -> Result<(PublicKeyPackage, Vec<KeyPackage>), Error> {
    let secret = Scalar::random(rng);
    let (_, packages) = generate_with_dealer_from_secret(secret, config, rng)?;
    let public_package = public_key_package(&packages);
    Ok((public_package, packages))
}

/// Shared by [`generate_with_dealer`] and [`crate::keys::split`]: runs the
/// verifiable-secret-sharing machinery over a caller-supplied constant term.
pub(crate) fn generate_with_dealer_from_secret<R: RngCore + CryptoRng>(
    secret: Scalar,
    config: &Config,
    rng: &mut R,
) -> Result<(GroupElement, Vec<KeyPackage>), Error> {
    let group_public = GroupElement::mul_base(&secret);
    let (shares, commitment) = generate_shares_from_secret(&secret, config, rng);

    let mut packages = Vec::with_capacity(shares.len());

    for (id, value) in shares {
        verify_share_against_commitment(id, &value, &commitment)?;
        let public = GroupElement::mul_base(&value);
        packages.push(KeyPackage {
            share: KeyShare {
                id,
                secret: Secret(value),
                public,
            },
            group_public,
        });
    }

    Ok((group_public, packages))
}

/// Builds the [`PublicKeyPackage`] that should accompany a set of
/// [`KeyPackage`]s distributed by [`generate_with_dealer`] or
/// [`crate::keys::split`].
pub fn public_key_package(packages: &[KeyPackage]) -> PublicKeyPackage {
    let group_public = packages
        .first()
        .map(|p| p.group_public)
        .unwrap_or_else(GroupElement::identity);
    let signer_public_shares = packages
        .iter()
        .map(|p| (p.share.id, p.share.public))
        .collect();
    PublicKeyPackage {
        signer_public_shares,
        group_public,
    }
}

/// Recomputes `s_i · G` for the package's secret share and compares it,
/// byte-for-byte, against the advertised public share.
pub fn verify_key_package(package: &KeyPackage) -> bool {
    GroupElement::mul_base(&package.share.secret.0) == package.share.public
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::lagrange_coefficient;
    use rand::thread_rng;

    fn reconstruct(shares: &[(Identifier, Scalar)]) -> Scalar {
        let ids: Vec<Identifier> = shares.iter().map(|(id, _)| *id).collect();
        let mut secret = Scalar::zero();
        for (id, value) in shares {
            let lambda = lagrange_coefficient(*id, &ids).unwrap();
            secret = secret + lambda * *value;
        }
        secret
    }

    #[test]
    fn dealer_shares_reconstruct_to_group_secret() {
        let mut rng = thread_rng();
        let config = Config::new(3, 5).unwrap();
        let (public_package, packages) = generate_with_dealer(&config, &mut rng).unwrap();

        let shares: Vec<(Identifier, Scalar)> = packages
            .iter()
            .take(3)
            .map(|p| (p.share.id, p.share.secret.0))
            .collect();
        let secret = reconstruct(&shares);
        assert_eq!(GroupElement::mul_base(&secret), public_package.group_public_key());
    }

    #[test]
    fn every_quorum_reconstructs_the_same_secret() {
        let mut rng = thread_rng();
        let config = Config::new(3, 5).unwrap();
        let (_, packages) = generate_with_dealer(&config, &mut rng).unwrap();

        let shares_a: Vec<(Identifier, Scalar)> = packages[0..3]
            .iter()
            .map(|p| (p.share.id, p.share.secret.0))
            .collect();
        let shares_b: Vec<(Identifier, Scalar)> = packages[2..5]
            .iter()
            .map(|p| (p.share.id, p.share.secret.0))
            .collect();

        assert_eq!(reconstruct(&shares_a), reconstruct(&shares_b));
    }

    #[test]
    fn verify_key_package_rejects_tampered_public_share() {
        let mut rng = thread_rng();
        let config = Config::new(2, 3).unwrap();
        let (_, mut packages) = generate_with_dealer(&config, &mut rng).unwrap();

        assert!(verify_key_package(&packages[0]));

        // Swap in a public share that does not match this share's secret.
        packages[0].share.public = GroupElement::mul_base(&Scalar::from_u32(999));
        assert!(!verify_key_package(&packages[0]));
    }
}
