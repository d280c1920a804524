//! Cryptographic hashing utilities for the wallet
//!
//! Provides SHA-256 based hashing plus the fixed message-prefixing scheme
//! used to bind operation digests to this wallet's signing domain.

use sha2::{Digest, Sha256};

/// Prefix mixed into operation digests before signature verification.
///
/// Signatures collected for batched operations live in a separate domain
/// from raw-digest signatures: the same 65-byte record can never satisfy
/// both entry points.
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Quorum Signed Message:\n32";

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Normalizes a 32-byte digest into the wallet's operation-signing domain
///
/// Returns `SHA-256(SIGNED_MESSAGE_PREFIX || digest)`.
pub fn prefixed_digest(digest: &[u8; 32]) -> [u8; 32] {
    let mut data = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + digest.len());
    data.extend_from_slice(SIGNED_MESSAGE_PREFIX);
    data.extend_from_slice(digest);
    sha256(&data)
}
