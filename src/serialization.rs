// -*- mode: rust; -*-
//
// This file is part of frost-ed25519-threshold.
// See LICENSE for licensing information.

//! `serde` support for the crate's wire types, gated behind the `serde`
//! feature.
//!
//! Grounded on the teacher's `VerificationKeyBytes`/`VerificationKey`
//! `serde(try_from = "...")`/`serde(into = "...")` pattern
//! (`verification_key.rs`), applied here to [`crate::ciphersuite::Scalar`]
//! and [`crate::ciphersuite::GroupElement`] so that every higher-level type
//! built from them (commitments, shares, signing packages) can simply
//! `#[derive(Serialize, Deserialize)]`.

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

use crate::ciphersuite::{GroupElement, Scalar};

/// The bytes-only shape `Scalar` round-trips through on the wire.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct ScalarBytes(#[serde(with = "serde_bytes_array")] [u8; 32]);

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ScalarBytes(self.to_bytes()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ScalarBytes(bytes) = ScalarBytes::deserialize(deserializer)?;
        Scalar::from_canonical_bytes(bytes).map_err(|_| D::Error::custom("non-canonical scalar encoding"))
    }
}

/// The bytes-only shape `GroupElement` round-trips through on the wire.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct GroupElementBytes(#[serde(with = "serde_bytes_array")] [u8; 32]);

impl Serialize for GroupElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GroupElementBytes(self.to_bytes()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GroupElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let GroupElementBytes(bytes) = GroupElementBytes::deserialize(deserializer)?;
        GroupElement::decode(&bytes).map_err(|_| D::Error::custom("invalid group element encoding"))
    }
}

/// A `[u8; 32]` serializes as a fixed-size byte array in binary formats and
/// as a sequence in human-readable ones; `serde` has no blanket impl for
/// const-generic arrays larger than 32 pre-2023, so this module supplies one
/// scoped to exactly the size every wire value in this crate uses.
mod serde_bytes_array {
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let vec: Vec<u8> = Vec::deserialize(deserializer)?;
        vec.try_into()
            .map_err(|v: Vec<u8>| DeError::custom(format!("expected 32 bytes, got {}", v.len())))
    }
}
