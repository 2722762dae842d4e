// -*- mode: rust; -*-
//
// This file is part of frost-ed25519-threshold.
// See LICENSE for licensing information.

//! Field and group primitives for the `FROST-ED25519-SHA512-v1` ciphersuite.
//!
//! This module is the only place that talks to the underlying curve library
//! (`curve25519-dalek`) and the hash function (`sha2::Sha512`). Every other
//! module in the crate works exclusively with the [`Scalar`] and
//! [`GroupElement`] newtypes defined here, so that swapping or upgrading the
//! backend curve library never ripples beyond this file.

use std::convert::TryFrom;
use std::ops::{Add, Mul, Neg, Sub};

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar as DalekScalar;
use curve25519_dalek::traits::Identity;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use crate::error::Error;

/// The name of this ciphersuite, as it appears in RFC 9591.
pub const CONTEXT_STRING: &str = "FROST-ED25519-SHA512-v1";

/// An element of the Ed25519 scalar field (integers modulo the group order
/// `ℓ = 2^252 + 27742317777372353535851937790883648493`).
///
/// All arithmetic is delegated to `curve25519_dalek::scalar::Scalar`, which
/// performs it in constant time modulo `ℓ`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Scalar(pub(crate) DalekScalar);

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0 = DalekScalar::ZERO;
    }
}

impl Scalar {
    /// The additive identity.
    pub fn zero() -> Self {
        Self(DalekScalar::ZERO)
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        Self(DalekScalar::ONE)
    }

    /// Builds a `Scalar` from a small integer, useful for participant
    /// identifiers entering Lagrange-coefficient arithmetic.
    pub fn from_u32(value: u32) -> Self {
        Self(DalekScalar::from(value))
    }

    /// Samples a uniformly random scalar in `[1, ℓ-1]` using the given CSPRNG.
    ///
    /// Rejection-samples a fresh wide scalar until it is non-zero; for a
    /// cryptographically secure RNG the expected number of draws is
    /// indistinguishable from 1.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut bytes = [0u8; 64];
            rng.fill_bytes(&mut bytes);
            let scalar = Self(DalekScalar::from_bytes_mod_order_wide(&bytes));
            if scalar != Self::zero() {
                return scalar;
            }
        }
    }

    /// Reduces 32 bytes modulo `ℓ`. Used by the key-backup facility to turn
    /// a clamped RFC 8032 seed into a scalar usable in Shamir arithmetic.
    pub fn from_bytes_mod_order(bytes: [u8; 32]) -> Self {
        Self(DalekScalar::from_bytes_mod_order(bytes))
    }

    /// Reduces a SHA-512 digest of `input` modulo `ℓ`. This is the
    /// `hash_to_scalar` primitive, used (with distinct domain separators)
    /// for binding factors, the challenge, and backup-split scalar
    /// derivation.
    pub fn hash_to_scalar(input: &[&[u8]]) -> Self {
        let mut hasher = Sha512::new();
        for piece in input {
            hasher.update(piece);
        }
        let digest: [u8; 64] = hasher.finalize().into();
        Self(DalekScalar::from_bytes_mod_order_wide(&digest))
    }

    /// Negates this scalar modulo `ℓ`.
    pub fn negate(&self) -> Self {
        Self(-self.0)
    }

    /// Inverts this scalar modulo `ℓ`. Fails for the zero scalar, which has
    /// no multiplicative inverse.
    pub fn invert(&self) -> Result<Self, Error> {
        if self.0 == DalekScalar::ZERO {
            return Err(Error::CryptoInternal("cannot invert the zero scalar"));
        }
        Ok(Self(self.0.invert()))
    }

    /// Serializes this scalar to its canonical 32-byte little-endian
    /// encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Decodes a canonical 32-byte little-endian scalar encoding. Rejects
    /// encodings that are not fully reduced modulo `ℓ`, as required for
    /// canonicality checks on an incoming signature's `z` component.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> Result<Self, Error> {
        let candidate = DalekScalar::from_canonical_bytes(bytes);
        if candidate.is_some().into() {
            Ok(Self(candidate.unwrap()))
        } else {
            Err(Error::MalformedSignature("non-canonical scalar encoding"))
        }
    }
}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 + rhs.0)
    }
}

impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 - rhs.0)
    }
}

impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 * rhs.0)
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar(-self.0)
    }
}

impl std::iter::Sum for Scalar {
    fn sum<I: Iterator<Item = Scalar>>(iter: I) -> Self {
        iter.fold(Scalar::zero(), |acc, x| acc + x)
    }
}

/// A point on the Ed25519 curve, represented internally in extended
/// coordinates. Values of this type are only ever constructed via
/// [`GroupElement::decode`] or curve arithmetic, both of which the backend
/// library performs in constant time.
#[derive(Copy, Clone, Debug)]
pub struct GroupElement(pub(crate) EdwardsPoint);

impl PartialEq for GroupElement {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for GroupElement {}

impl GroupElement {
    /// The Ed25519 base point `G`.
    pub fn base() -> Self {
        Self(ED25519_BASEPOINT_POINT)
    }

    /// The group identity element.
    pub fn identity() -> Self {
        Self(EdwardsPoint::identity())
    }

    /// Multiplies the base point by `scalar`. Equivalent to, but typically
    /// faster than, `GroupElement::base().mul(scalar)`.
    pub fn mul_base(scalar: &Scalar) -> Self {
        Self(&scalar.0 * ED25519_BASEPOINT_POINT)
    }

    /// Scalar multiplication `scalar * self`.
    pub fn mul(&self, scalar: &Scalar) -> Self {
        Self(scalar.0 * self.0)
    }

    /// Adds two group elements.
    pub fn add(&self, other: &Self) -> Self {
        Self(self.0 + other.0)
    }

    /// Returns true iff this element is the group identity.
    pub fn is_identity(&self) -> bool {
        self.0 == EdwardsPoint::identity()
    }

    /// Checks that this element lies in the prime-order subgroup, i.e. that
    /// it carries no small-order component. In `curve25519-dalek` terms,
    /// that the point is torsion-free.
    pub fn is_in_prime_order_subgroup(&self) -> bool {
        self.0.is_torsion_free()
    }

    /// Serializes this element to its canonical 32-byte compressed encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }

    /// Decodes a 32-byte compressed Ed25519 point encoding. Rejects
    /// non-canonical encodings, points not on the curve, the identity
    /// element, and points outside the prime-order subgroup.
    ///
    /// The identity has order 1, which trivially divides `ℓ`, so
    /// `is_in_prime_order_subgroup` alone does not exclude it. No wire
    /// value in this protocol (a commitment, a public key, a signature's
    /// `R`) is ever legitimately the identity, so this rejects it
    /// explicitly rather than leaving it to each caller.
    pub fn decode(bytes: &[u8; 32]) -> Result<Self, Error> {
        let compressed = CompressedEdwardsY(*bytes);
        let point = compressed
            .decompress()
            .ok_or(Error::MalformedSignature("invalid point encoding"))?;
        let element = Self(point);
        if element.is_identity() || !element.is_in_prime_order_subgroup() {
            return Err(Error::InvalidCommitment);
        }
        Ok(element)
    }
}

impl TryFrom<&[u8]> for GroupElement {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Error> {
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::MalformedSignature("expected 32 bytes"))?;
        Self::decode(&array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn base_point_roundtrips() {
        let g = GroupElement::base();
        let bytes = g.to_bytes();
        let decoded = GroupElement::decode(&bytes).unwrap();
        assert_eq!(g, decoded);
    }

    #[test]
    fn identity_is_rejected_as_commitment() {
        let id_bytes = GroupElement::identity().to_bytes();
        assert!(GroupElement::decode(&id_bytes).is_err());
    }

    #[test]
    fn scalar_invert_rejects_zero() {
        assert!(Scalar::zero().invert().is_err());
    }

    #[test]
    fn scalar_mul_base_matches_repeated_add() {
        let mut rng = thread_rng();
        let s = Scalar::random(&mut rng);
        let by_mul_base = GroupElement::mul_base(&s);
        let by_mul = GroupElement::base().mul(&s);
        assert_eq!(by_mul_base, by_mul);
    }

    #[test]
    fn non_canonical_scalar_rejected() {
        // ℓ itself, as little-endian bytes, is not a canonical representative of 0.
        let ell_hex = "edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010";
        let ell: [u8; 32] = hex::decode(ell_hex).unwrap().try_into().unwrap();
        assert!(Scalar::from_canonical_bytes(ell).is_err());
    }
}
