// -*- mode: rust; -*-
//
// This file is part of frost-ed25519-threshold.
// See LICENSE for licensing information.

#[cfg(feature = "std")]
use thiserror::Error;

/// An error arising from FROST key generation, signing, or verification.
///
/// All public entry points fail closed: any invariant breach produces one of
/// these variants rather than silently repairing or ignoring the problem.
/// [`crate::coordinator::Coordinator::verify`] is the one exception named in
/// the interface contract. It collapses every internal failure to `false`
/// rather than distinguishing a bad signature from a malformed one.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum Error {
    /// `threshold` and `max_signers` did not satisfy `1 <= threshold <= max_signers`.
    #[cfg_attr(feature = "std", error("invalid threshold configuration"))]
    InvalidThreshold,
    /// The provided secret material could not be interpreted as a 32-byte
    /// Ed25519 scalar or PKCS#8-encoded seed.
    #[cfg_attr(feature = "std", error("invalid key format"))]
    InvalidKeyFormat,
    /// Fewer than `threshold` participants were named for a signing session.
    #[cfg_attr(feature = "std", error("insufficient signers for this threshold"))]
    InsufficientSigners,
    /// Fewer than `threshold` key shares were supplied for recovery or
    /// reconstruction.
    #[cfg_attr(feature = "std", error("insufficient shares for this threshold"))]
    InsufficientShares,
    /// Two shares or commitments carried the same participant identifier.
    #[cfg_attr(feature = "std", error("duplicate participant identifier"))]
    DuplicateParticipant,
    /// The commitment set did not match the participant set 1:1.
    #[cfg_attr(feature = "std", error("commitments do not match participant list"))]
    MismatchedCommitments,
    /// The signature-share set did not match the signing package's
    /// participant set 1:1.
    #[cfg_attr(
        feature = "std",
        error("signature shares do not match signing package")
    )]
    MismatchedShares,
    /// A received nonce commitment was the identity element or outside the
    /// prime-order subgroup.
    #[cfg_attr(feature = "std", error("invalid nonce commitment"))]
    InvalidCommitment,
    /// A 64-byte signature failed to parse: wrong length, non-canonical `z`,
    /// or an invalid `R` encoding.
    #[cfg_attr(feature = "std", error("malformed signature: {0}"))]
    MalformedSignature(&'static str),
    /// A signature share failed the optional per-share verification equation
    /// before aggregation.
    #[cfg_attr(feature = "std", error("signature share failed verification"))]
    ShareVerificationFailed,
    /// `round2` was invoked with a signing package that does not name this
    /// signer's participant identifier.
    #[cfg_attr(
        feature = "std",
        error("this signer is not a participant in the signing package")
    )]
    NotAParticipant,
    /// The group commitment carries no binding factor for this signer's
    /// participant identifier.
    #[cfg_attr(
        feature = "std",
        error("missing binding factor for this participant")
    )]
    MissingBindingFactor,
    /// An internal error surfaced by the curve or hash primitives.
    #[cfg_attr(feature = "std", error("internal cryptographic error: {0}"))]
    CryptoInternal(&'static str),
}
