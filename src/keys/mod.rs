// -*- mode: rust; -*-
//
// This file is part of frost-ed25519-threshold.
// See LICENSE for licensing information.

//! Key generation, the participant identifier type, and the key-backup
//! (split/recover) facility.

mod backup;
mod dealer;

pub use backup::{recover, split, split_pkcs8, SecretEncoding};
pub use dealer::{
    generate_with_dealer, public_key_package, verify_key_package, KeyPackage, KeyShare,
    PublicKeyPackage,
};

use std::convert::TryFrom;

use crate::error::Error;

/// A participant identifier, `1 ≤ id ≤ n`. Distinct within a group; `0` is
/// reserved and never assigned, in case a future DKG needs a sentinel value
/// for "no participant".
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier(pub(crate) u32);

impl Identifier {
    /// Builds an `Identifier`, rejecting zero.
    pub fn new(id: u32) -> Result<Self, Error> {
        if id == 0 {
            return Err(Error::InvalidKeyFormat);
        }
        Ok(Self(id))
    }

    /// Returns the underlying participant index.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Identifier {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Error> {
        Identifier::new(value)
    }
}

/// A threshold configuration `(t, n)` for `FROST-ED25519-SHA512-v1`.
///
/// The only ciphersuite this crate supports is fixed at compile time. A
/// monomorphic single-ciphersuite crate has no need to carry the ciphersuite
/// as a type or runtime parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// The number of shares required to produce a valid signature.
    pub threshold: u32,
    /// The total number of shares generated.
    pub max_signers: u32,
}

impl Config {
    /// Builds a configuration, checking `1 ≤ threshold ≤ max_signers`.
    pub fn new(threshold: u32, max_signers: u32) -> Result<Self, Error> {
        if threshold == 0 || threshold > max_signers {
            return Err(Error::InvalidThreshold);
        }
        Ok(Self {
            threshold,
            max_signers,
        })
    }
}

/// Builds a threshold configuration. Thin wrapper around [`Config::new`]
/// under the name used elsewhere in this crate's public API.
pub fn create_config(threshold: u32, max_signers: u32) -> Result<Config, Error> {
    Config::new(threshold, max_signers)
}
