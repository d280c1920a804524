//! Signer and contract identities
//!
//! A 20-byte identity derived from a secp256k1 public key via
//! RIPEMD160(SHA256(pubkey)), displayed as 0x-prefixed hex.

use ripemd::Ripemd160;
use secp256k1::PublicKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Digest;
use std::fmt;
use std::str::FromStr;

use super::hash::sha256;
use super::keys::KeyError;

/// Length of an identity in bytes
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte identity: a signer, the wallet itself, or a call target
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The null identity, rejected wherever an owner or authority is registered
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    /// Derive an address from a public key
    ///
    /// Address = RIPEMD160(SHA256(compressed pubkey))
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let sha256_hash = sha256(&public_key.serialize());

        let mut ripemd = Ripemd160::new();
        ripemd.update(sha256_hash);
        Address(ripemd.finalize().into())
    }

    /// Parse an address from a hex string, with or without the 0x prefix
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidAddress)?;
        let bytes: [u8; ADDRESS_LEN] =
            bytes.try_into().map_err(|_| KeyError::InvalidAddress)?;
        Ok(Address(bytes))
    }

    /// Get the raw address bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Check whether this is the null identity
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
