// -*- mode: rust; -*-
//
// This file is part of frost-ed25519-threshold.
// See LICENSE for licensing information.

//! Per-participant signer state: round-1 nonce commitment and round-2
//! signature-share computation.
//!
//! Generalizes the teacher's `SigningNonces`/`SigningCommitments`/
//! `preprocess`/`sign` (`frost.rs`) and reuses the move-only-nonce idea
//! sketched (but left unfinished) in the teacher's `frost/signer.rs`, here
//! enforced by having [`Signer::round2`] consume `Nonces` by value instead
//! of borrowing a long-lived secret share.

use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ciphersuite::{GroupElement, Scalar};
use crate::coordinator::SigningPackage;
use crate::derive::{self, lagrange_coefficient};
use crate::error::Error;
use crate::keys::{Identifier, KeyPackage};

/// A signer's per-session hiding and binding nonces. Held on the caller's
/// stack between [`Signer::round1`] and [`Signer::round2`]; zeroized on
/// drop, and consumed by value in `round2` so that reusing them for a
/// second session is a compile error rather than a runtime footgun.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Nonces {
    hiding: Scalar,
    binding: Scalar,
}

/// The public commitment `(D, E)` to a signer's round-1 nonces. Neither
/// component may be the identity element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NonceCommitment {
    pub(crate) hiding: GroupElement,
    pub(crate) binding: GroupElement,
}

impl NonceCommitment {
    /// The hiding-nonce commitment `D = d·G`.
    pub fn hiding(&self) -> GroupElement {
        self.hiding
    }

    /// The binding-nonce commitment `E = e·G`.
    pub fn binding(&self) -> GroupElement {
        self.binding
    }
}

/// A single participant's contribution to round 1: their identifier and
/// nonce commitment, as broadcast to the coordinator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommitmentShare {
    /// The participant this commitment belongs to.
    pub id: Identifier,
    /// The participant's round-1 nonce commitment.
    pub commitment: NonceCommitment,
}

/// A signature share `(id, z_i)` produced in round 2, as sent to the
/// coordinator for aggregation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureShare {
    /// The participant this signature share came from.
    pub id: Identifier,
    pub(crate) z: Scalar,
}

impl SignatureShare {
    /// This share's canonical 32-byte scalar encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.z.to_bytes()
    }
}

/// A single participant in a FROST signing group. Owns its [`KeyPackage`]
/// immutably; never holds nonces outside the lifetime of one `round1`/
/// `round2` pair.
pub struct Signer {
    key_package: KeyPackage,
}

impl Signer {
    /// Wraps a key package distributed at key-generation (or backup-split)
    /// time into a signer ready to participate in signing sessions.
    pub fn new(key_package: KeyPackage) -> Self {
        Self { key_package }
    }

    /// This signer's participant identifier.
    pub fn identifier(&self) -> Identifier {
        self.key_package.identifier()
    }

    /// The group public key this signer's shares belong to.
    pub fn group_public_key(&self) -> GroupElement {
        self.key_package.group_public_key()
    }

    /// Samples fresh hiding and binding nonces and returns them alongside
    /// the commitment to broadcast to the coordinator. Resampling is always
    /// safe; what must never happen is reusing the returned [`Nonces`]
    /// across two signing sessions, which [`Signer::round2`] prevents by
    /// consuming them.
    pub fn round1<R: RngCore + CryptoRng>(&self, rng: &mut R) -> (Nonces, CommitmentShare) {
        let hiding = Scalar::random(rng);
        let binding = Scalar::random(rng);

        let commitment = NonceCommitment {
            hiding: GroupElement::mul_base(&hiding),
            binding: GroupElement::mul_base(&binding),
        };

        (
            Nonces { hiding, binding },
            CommitmentShare {
                id: self.identifier(),
                commitment,
            },
        )
    }

    /// Computes this signer's signature share for `package`, consuming
    /// `nonces` so that the compiler, not a runtime check, prevents a
    /// second call from reusing them.
    pub fn round2(&self, package: &SigningPackage, nonces: Nonces) -> Result<SignatureShare, Error> {
        let id = self.identifier();

        if !package.participant_ids().contains(&id) {
            return Err(Error::NotAParticipant);
        }

        let binding_factor = package
            .group_commitment()
            .binding_factor(id)
            .ok_or(Error::MissingBindingFactor)?;

        let lambda_i = lagrange_coefficient(id, package.participant_ids())?;

        let challenge = derive::challenge(
            &package.group_commitment().group_point(),
            &self.group_public_key(),
            package.message(),
        );

        let secret_share = self.key_package.key_share().secret_scalar();
        let z = nonces.hiding
            + binding_factor * nonces.binding
            + lambda_i * secret_share * challenge;

        Ok(SignatureShare { id, z })
    }
}
