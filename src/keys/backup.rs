// -*- mode: rust; -*-
//
// This file is part of frost-ed25519-threshold.
// See LICENSE for licensing information.

//! Key backup: splitting an existing Ed25519 secret key into FROST shares,
//! and recovering it from a quorum of them.
//!
//! Grounded on the same Shamir-sharing machinery as [`super::dealer`], which
//! this module drives with a caller-supplied (rather than freshly sampled)
//! constant term.

use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};

use crate::ciphersuite::Scalar;
use crate::derive::lagrange_coefficient;
use crate::error::Error;
use crate::keys::dealer::{generate_with_dealer_from_secret, public_key_package, KeyPackage, PublicKeyPackage};
use crate::keys::{Config, Identifier};

/// How the secret material passed to [`split`] should be interpreted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SecretEncoding {
    /// A 32-byte scalar already reduced modulo the Ed25519 group order,
    /// the form FROST operates on internally.
    CanonicalScalar,
    /// A 32-byte RFC 8032 / PKCS#8 Ed25519 private key seed. Hashed with
    /// SHA-512 and clamped per RFC 8032 §5.1.5 to derive the signing scalar.
    Ed25519Seed,
}

/// The fixed-offset prefix of an unencrypted, attribute-free, public-key-free
/// PKCS#8 `PrivateKeyInfo` wrapping an RFC 8410 Ed25519 seed (RFC 8410
/// §10.3's example encoding, the form `openssl genpkey -algorithm ED25519`
/// and most Ed25519 key-export APIs produce): `SEQUENCE { version
/// INTEGER(0), algorithm SEQUENCE { OID 1.3.101.112 }, privateKey OCTET
/// STRING (OCTET STRING (32-byte seed)) }`, 48 bytes total with the seed as
/// the trailing 32.
const PKCS8_ED25519_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

/// Extracts the 32-byte Ed25519 seed from a PKCS#8 DER byte sequence.
///
/// Only the minimal, unencrypted encoding RFC 8410 §10.3 specifies (no
/// `[1] publicKey` attribute, no PKCS#8 attributes) is accepted. Anything
/// else, a PEM-armored key that has not been base64-decoded, an encrypted
/// `EncryptedPrivateKeyInfo`, a key for a different algorithm OID, or a
/// truncated or extended structure, fails closed with
/// [`Error::InvalidKeyFormat`] rather than attempting a general ASN.1 parse.
fn extract_pkcs8_seed(der: &[u8]) -> Result<[u8; 32], Error> {
    if der.len() != 48 || !der.starts_with(&PKCS8_ED25519_PREFIX) {
        return Err(Error::InvalidKeyFormat);
    }
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&der[16..48]);
    Ok(seed)
}

/// RFC 8032 §5.1.5 clamping: hash the seed, take the lower half, clear the
/// low 3 bits and the high bit, set the second-highest bit.
fn clamp(seed: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha512::new();
    hasher.update(seed);
    let digest: [u8; 64] = hasher.finalize().into();

    let mut lower = [0u8; 32];
    lower.copy_from_slice(&digest[0..32]);
    lower[0] &= 248;
    lower[31] &= 127;
    lower[31] |= 64;
    lower
}

/// Splits an existing Ed25519 secret key into `config.max_signers` FROST key
/// shares, any `config.threshold` of which reconstruct it.
///
/// The clamped scalar derived from an [`SecretEncoding::Ed25519Seed`] is
/// reduced modulo the group order before sharing, since Shamir arithmetic
/// requires a field element rather than the raw clamped integer a
/// non-threshold Ed25519 signer would use directly. See DESIGN.md for why
/// this reduction does not change the resulting public key.
pub fn split<R: RngCore + CryptoRng>(
    secret_bytes: &[u8; 32],
    encoding: SecretEncoding,
    config: &Config,
    rng: &mut R,
) -> Result<(PublicKeyPackage, Vec<KeyPackage>), Error> {
    let secret = match encoding {
        SecretEncoding::CanonicalScalar => Scalar::from_canonical_bytes(*secret_bytes)?,
        SecretEncoding::Ed25519Seed => Scalar::from_bytes_mod_order(clamp(secret_bytes)),
    };

    let (_, packages) = generate_with_dealer_from_secret(secret, config, rng)?;
    let public_package = public_key_package(&packages);
    Ok((public_package, packages))
}

/// Splits an existing Ed25519 secret key presented as a raw PKCS#8 DER byte
/// sequence (the third input shape named alongside a platform key-handle and
/// a raw scalar). Extracts the embedded 32-byte seed (see
/// [`extract_pkcs8_seed`]) and otherwise behaves exactly like
/// `split(_, SecretEncoding::Ed25519Seed, _, _)`.
///
/// A platform key-handle (e.g. a WebCrypto `CryptoKey` or an HSM reference)
/// is not representable as bytes at all; callers holding one must export it
/// to PKCS#8 or a raw seed first, which is the platform API's job, not this
/// crate's.
pub fn split_pkcs8<R: RngCore + CryptoRng>(
    der: &[u8],
    config: &Config,
    rng: &mut R,
) -> Result<(PublicKeyPackage, Vec<KeyPackage>), Error> {
    let seed = extract_pkcs8_seed(der)?;
    split(&seed, SecretEncoding::Ed25519Seed, config, rng)
}

/// Reconstructs the group secret key from a quorum of key shares via
/// Lagrange interpolation at `x = 0`, and returns its canonical 32-byte
/// scalar encoding.
///
/// Fails with [`Error::InsufficientShares`] if fewer than `config.threshold`
/// shares are supplied, and with [`Error::DuplicateParticipant`] if two
/// shares carry the same identifier.
pub fn recover(shares: &[KeyPackage], config: &Config) -> Result<[u8; 32], Error> {
    if (shares.len() as u32) < config.threshold {
        return Err(Error::InsufficientShares);
    }

    let ids: Vec<Identifier> = shares.iter().map(|s| s.identifier()).collect();

    let mut secret = Scalar::zero();
    for share in shares {
        let lambda = lagrange_coefficient(share.identifier(), &ids)?;
        secret = secret + lambda * share.key_share().secret_scalar();
    }
    Ok(secret.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn split_then_recover_round_trips_a_canonical_scalar() {
        let mut rng = thread_rng();
        let config = Config::new(3, 5).unwrap();
        let original = Scalar::random(&mut rng);

        let (public_package, packages) =
            split(&original.to_bytes(), SecretEncoding::CanonicalScalar, &config, &mut rng).unwrap();

        let recovered = recover(&packages[0..3], &config).unwrap();
        assert_eq!(recovered, original.to_bytes());
        assert_eq!(
            crate::ciphersuite::GroupElement::mul_base(&original),
            public_package.group_public_key()
        );
    }

    #[test]
    fn recover_rejects_too_few_shares() {
        let mut rng = thread_rng();
        let config = Config::new(3, 5).unwrap();
        let original = Scalar::random(&mut rng);

        let (_, packages) =
            split(&original.to_bytes(), SecretEncoding::CanonicalScalar, &config, &mut rng).unwrap();

        assert_eq!(recover(&packages[0..2], &config), Err(Error::InsufficientShares));
    }

    #[test]
    fn ed25519_seed_splits_and_recovers_consistently() {
        let mut rng = thread_rng();
        let config = Config::new(2, 3).unwrap();
        let seed = [7u8; 32];

        let (public_package, packages) =
            split(&seed, SecretEncoding::Ed25519Seed, &config, &mut rng).unwrap();
        let recovered = recover(&packages[0..2], &config).unwrap();

        let expected = Scalar::from_bytes_mod_order(clamp(&seed));
        assert_eq!(recovered, expected.to_bytes());
        assert_eq!(
            crate::ciphersuite::GroupElement::mul_base(&expected),
            public_package.group_public_key()
        );
    }

    #[test]
    fn pkcs8_der_splits_to_the_same_result_as_its_seed() {
        let mut rng = thread_rng();
        let config = Config::new(2, 3).unwrap();
        let seed = [9u8; 32];

        let mut der = PKCS8_ED25519_PREFIX.to_vec();
        der.extend_from_slice(&seed);
        assert_eq!(der.len(), 48);

        let (pkcs8_public, _) = split_pkcs8(&der, &config, &mut rng).unwrap();
        let expected = Scalar::from_bytes_mod_order(clamp(&seed));
        assert_eq!(
            pkcs8_public.group_public_key(),
            crate::ciphersuite::GroupElement::mul_base(&expected)
        );
    }

    #[test]
    fn malformed_pkcs8_der_is_rejected() {
        let mut rng = thread_rng();
        let config = Config::new(2, 3).unwrap();

        assert_eq!(
            split_pkcs8(&[0u8; 48], &config, &mut rng).unwrap_err(),
            Error::InvalidKeyFormat
        );
        assert_eq!(
            split_pkcs8(&[0u8; 32], &config, &mut rng).unwrap_err(),
            Error::InvalidKeyFormat
        );
    }
}
