// -*- mode: rust; -*-
//
// This file is part of frost-ed25519-threshold.
// See LICENSE for licensing information.

//! Coordinator-side session state: signing package construction,
//! aggregation, and verification.
//!
//! Grounded on the teacher's `gen_group_commitment`/`aggregate` free
//! functions in `frost.rs`, restructured into the typestate session the
//! teacher's (unfinished) `frost/aggregator.rs` sketches,
//! `AwaitingCommitmentShares`/`AwaitingResponseShares`, completed here with
//! real fields and error handling in place of `unimplemented!()`.

use std::collections::BTreeMap;

use crate::ciphersuite::{GroupElement, Scalar};
use crate::derive::{self, encode_commitment_list, lagrange_coefficient};
use crate::error::Error;
use crate::keys::{Identifier, PublicKeyPackage};
use crate::signer::{CommitmentShare, NonceCommitment, SignatureShare};

/// `R` and the per-participant binding factors derived from one signing
/// package's commitment list.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupCommitment {
    r: GroupElement,
    binding_factors: BTreeMap<Identifier, Scalar>,
}

impl GroupCommitment {
    /// The group commitment point `R = Σ (D_i + ρ_i·E_i)`.
    pub fn group_point(&self) -> GroupElement {
        self.r
    }

    /// The binding factor `ρ_i` derived for `id`, if `id` is a participant
    /// in this session.
    pub fn binding_factor(&self, id: Identifier) -> Option<Scalar> {
        self.binding_factors.get(&id).copied()
    }
}

/// The coordinator-broadcast bundle every participant signs against:
/// message, sorted participant set, and group commitment.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SigningPackage {
    pub(crate) participant_ids: Vec<Identifier>,
    pub(crate) message: Vec<u8>,
    pub(crate) group_commitment: GroupCommitment,
}

impl SigningPackage {
    /// The signing session's participant set, in ascending identifier order.
    pub fn participant_ids(&self) -> &[Identifier] {
        &self.participant_ids
    }

    /// The message being signed.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// The group commitment computed for this session.
    pub fn group_commitment(&self) -> &GroupCommitment {
        &self.group_commitment
    }
}

/// The coordinator's view of one signing session's lifecycle. `Failed`
/// carries the error that ended the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No signing package has been requested yet.
    Idle,
    /// `create_signing_package` is validating the received commitments.
    AwaitingCommitments,
    /// A signing package has been built and is ready to broadcast.
    PackageReady,
    /// `aggregate_signatures` is validating and summing the received shares.
    AwaitingShares,
    /// Aggregation succeeded; a signature has been produced.
    Done,
    /// The session ended early; carries the error that ended it.
    Failed(Error),
}

/// Validates a raw commitment list, builds the group commitment, and
/// returns both the public `SigningPackage` and the commitment map the
/// coordinator needs later for per-share verification.
fn build_signing_package(
    threshold: u32,
    public_key_package: &PublicKeyPackage,
    message: Vec<u8>,
    commitment_shares: &[CommitmentShare],
) -> Result<(SigningPackage, BTreeMap<Identifier, NonceCommitment>), Error> {
    if (commitment_shares.len() as u32) < threshold {
        return Err(Error::InsufficientSigners);
    }

    let mut commitments: BTreeMap<Identifier, NonceCommitment> = BTreeMap::new();
    for cs in commitment_shares {
        if commitments.insert(cs.id, cs.commitment).is_some() {
            return Err(Error::MismatchedCommitments);
        }
    }

    for commitment in commitments.values() {
        if commitment.hiding().is_identity()
            || commitment.binding().is_identity()
            || !commitment.hiding().is_in_prime_order_subgroup()
            || !commitment.binding().is_in_prime_order_subgroup()
        {
            return Err(Error::InvalidCommitment);
        }
    }

    let participant_ids: Vec<Identifier> = commitments.keys().copied().collect();

    let pair_map: BTreeMap<Identifier, (GroupElement, GroupElement)> = commitments
        .iter()
        .map(|(&id, c)| (id, (c.hiding(), c.binding())))
        .collect();
    let encoded_list = encode_commitment_list(&pair_map);
    let encoded_group_public = public_key_package.group_public_key().to_bytes();

    let mut binding_factors = BTreeMap::new();
    for &id in &participant_ids {
        let rho = derive::binding_factor(id, &encoded_group_public, &encoded_list, &message);
        binding_factors.insert(id, rho);
    }

    let mut r = GroupElement::identity();
    for (&id, commitment) in commitments.iter() {
        let rho = binding_factors[&id];
        r = r.add(&commitment.hiding().add(&commitment.binding().mul(&rho)));
    }

    let package = SigningPackage {
        participant_ids,
        message,
        group_commitment: GroupCommitment { r, binding_factors },
    };

    Ok((package, commitments))
}

/// One signing session, coordinating commitment collection through
/// aggregation. Never sees any participant's private share or nonces.
pub struct Coordinator {
    config_threshold: u32,
    public_key_package: PublicKeyPackage,
    commitments: BTreeMap<Identifier, NonceCommitment>,
    signing_package: Option<SigningPackage>,
    state: SessionState,
}

impl Coordinator {
    /// Starts a new session for the given threshold and public key package.
    pub fn new(threshold: u32, public_key_package: PublicKeyPackage) -> Self {
        Self {
            config_threshold: threshold,
            public_key_package,
            commitments: BTreeMap::new(),
            signing_package: None,
            state: SessionState::Idle,
        }
    }

    /// This session's current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Validates the received commitments and builds the signing package to
    /// broadcast to every participant: enough commitments for the
    /// threshold, no duplicate or malformed commitment, then the group
    /// commitment and per-participant binding factors, each check run in
    /// order.
    pub fn create_signing_package(
        &mut self,
        message: Vec<u8>,
        commitment_shares: &[CommitmentShare],
    ) -> Result<&SigningPackage, Error> {
        self.state = SessionState::AwaitingCommitments;

        match build_signing_package(self.config_threshold, &self.public_key_package, message, commitment_shares) {
            Ok((package, commitments)) => {
                self.commitments = commitments;
                self.signing_package = Some(package);
                self.state = SessionState::PackageReady;
                Ok(self.signing_package.as_ref().expect("just assigned"))
            }
            Err(error) => {
                self.state = SessionState::Failed(error);
                Err(error)
            }
        }
    }

    /// Aggregates signature shares into a 64-byte `R‖z` signature.
    ///
    /// Always verifies each share against `z_i·G = D_i + ρ_i·E_i +
    /// λ_i·c·P_i` before summing. This crate runs that check
    /// unconditionally rather than as an opt-in, to fail closed on a bad
    /// share instead of folding it silently into the aggregate.
    pub fn aggregate_signatures(&mut self, shares: &[SignatureShare]) -> Result<[u8; 64], Error> {
        self.state = SessionState::AwaitingShares;

        let result = self.try_aggregate(shares);
        match &result {
            Ok(_) => self.state = SessionState::Done,
            Err(error) => self.state = SessionState::Failed(*error),
        }
        result
    }

    fn try_aggregate(&self, shares: &[SignatureShare]) -> Result<[u8; 64], Error> {
        let package = self.signing_package.as_ref().ok_or(Error::MismatchedShares)?;
        let ids = package.participant_ids();

        if shares.len() != ids.len() {
            return Err(Error::MismatchedShares);
        }

        let mut share_map: BTreeMap<Identifier, Scalar> = BTreeMap::new();
        for share in shares {
            if !ids.contains(&share.id) || share_map.insert(share.id, share.z).is_some() {
                return Err(Error::MismatchedShares);
            }
        }
        for id in ids {
            if !share_map.contains_key(id) {
                return Err(Error::MismatchedShares);
            }
        }

        let challenge = derive::challenge(
            &package.group_commitment().group_point(),
            &self.public_key_package.group_public_key(),
            package.message(),
        );

        for (&id, &z) in share_map.iter() {
            let commitment = self.commitments.get(&id).ok_or(Error::MismatchedCommitments)?;
            let rho = package
                .group_commitment()
                .binding_factor(id)
                .ok_or(Error::MissingBindingFactor)?;
            let lambda = lagrange_coefficient(id, ids)?;
            let p_i = self
                .public_key_package
                .public_share(id)
                .ok_or(Error::MismatchedShares)?;

            let lhs = GroupElement::mul_base(&z);
            let rhs = commitment
                .hiding()
                .add(&commitment.binding().mul(&rho))
                .add(&p_i.mul(&(lambda * challenge)));
            if lhs != rhs {
                return Err(Error::ShareVerificationFailed);
            }
        }

        let z: Scalar = share_map.values().copied().sum();

        let mut signature = [0u8; 64];
        signature[0..32].copy_from_slice(&package.group_commitment().group_point().to_bytes());
        signature[32..64].copy_from_slice(&z.to_bytes());
        Ok(signature)
    }

    /// Verifies a 64-byte signature against `message` and this session's
    /// group public key. Delegates to the free function [`verify`].
    pub fn verify(&self, signature: &[u8], message: &[u8]) -> bool {
        verify(signature, message, self.public_key_package.group_public_key())
    }
}

/// Verifies a 64-byte `R‖z` signature against `message` and `group_public`
/// using the standard Ed25519 equation `z·G = R + c·PK`. Any parse failure
/// (wrong length, non-canonical `z`, invalid `R` encoding) is folded into a
/// `false` result; this function never distinguishes a bad signature from a
/// malformed one.
pub fn verify(signature: &[u8], message: &[u8], group_public: GroupElement) -> bool {
    try_verify(signature, message, group_public).unwrap_or(false)
}

fn try_verify(signature: &[u8], message: &[u8], group_public: GroupElement) -> Result<bool, Error> {
    if signature.len() != 64 {
        return Err(Error::MalformedSignature("expected 64 bytes"));
    }
    let r_bytes: [u8; 32] = signature[0..32].try_into().expect("checked length above");
    let z_bytes: [u8; 32] = signature[32..64].try_into().expect("checked length above");

    let r = GroupElement::decode(&r_bytes)?;
    let z = Scalar::from_canonical_bytes(z_bytes)?;

    let c = derive::challenge(&r, &group_public, message);
    let lhs = GroupElement::mul_base(&z);
    let rhs = r.add(&group_public.mul(&c));
    Ok(lhs == rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_with_dealer, Config};
    use crate::signer::Signer;
    use rand::thread_rng;

    fn run_session(threshold: u32, max_signers: u32, chosen: &[usize], message: &[u8]) -> (PublicKeyPackage, [u8; 64]) {
        let mut rng = thread_rng();
        let config = Config::new(threshold, max_signers).unwrap();
        let (public_package, packages) = generate_with_dealer(&config, &mut rng).unwrap();

        let signers: Vec<Signer> = chosen.iter().map(|&i| Signer::new(packages[i].clone())).collect();

        let mut nonces = Vec::new();
        let mut commitment_shares = Vec::new();
        for signer in &signers {
            let (n, cs) = signer.round1(&mut rng);
            nonces.push(n);
            commitment_shares.push(cs);
        }

        let mut coordinator = Coordinator::new(threshold, public_package.clone());
        let package = coordinator
            .create_signing_package(message.to_vec(), &commitment_shares)
            .unwrap()
            .clone();

        let shares: Vec<SignatureShare> = signers
            .into_iter()
            .zip(nonces)
            .map(|(signer, n)| signer.round2(&package, n).unwrap())
            .collect();

        let signature = coordinator.aggregate_signatures(&shares).unwrap();
        (public_package, signature)
    }

    #[test]
    fn two_of_three_happy_path_verifies() {
        let (public_package, signature) = run_session(2, 3, &[0, 1], b"Hello, FROST!");
        assert_eq!(signature.len(), 64);
        assert!(verify(&signature, b"Hello, FROST!", public_package.group_public_key()));
    }

    #[test]
    fn three_of_four_rejects_two_participants() {
        let mut rng = thread_rng();
        let config = Config::new(3, 4).unwrap();
        let (public_package, packages) = generate_with_dealer(&config, &mut rng).unwrap();

        let signers: Vec<Signer> = packages[0..2].iter().cloned().map(Signer::new).collect();
        let commitment_shares: Vec<CommitmentShare> = signers
            .iter()
            .map(|s| s.round1(&mut rng).1)
            .collect();

        let mut coordinator = Coordinator::new(3, public_package);
        let result = coordinator.create_signing_package(b"msg".to_vec(), &commitment_shares);
        assert!(matches!(result, Err(Error::InsufficientSigners)));
    }

    #[test]
    fn tampered_signature_byte_fails_verification() {
        let (public_package, mut signature) = run_session(2, 3, &[0, 2], b"Hello, FROST!");
        signature[32] ^= 1;
        assert!(!verify(&signature, b"Hello, FROST!", public_package.group_public_key()));
    }

    #[test]
    fn tampered_message_fails_verification() {
        let (public_package, signature) = run_session(2, 3, &[0, 2], b"Hello, FROST!");
        assert!(!verify(&signature, b"Hello, FR0ST!", public_package.group_public_key()));
    }

    #[test]
    fn wrong_length_signature_rejected() {
        assert!(!verify(&[0u8; 63], b"m", GroupElement::base()));
    }
}
