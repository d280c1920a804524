//! Cryptographic utilities for the wallet
//!
//! This module provides:
//! - SHA-256 hashing and operation-digest normalization
//! - 20-byte signer identities
//! - Recoverable ECDSA key management (secp256k1)

pub mod address;
pub mod hash;
pub mod keys;

pub use address::{Address, ADDRESS_LEN};
pub use hash::{prefixed_digest, sha256, sha256_hex, SIGNED_MESSAGE_PREFIX};
pub use keys::{recover_signer, KeyError, KeyPair, SIGNATURE_RECORD_LEN};
