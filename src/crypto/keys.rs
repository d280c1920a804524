//! ECDSA key management for the wallet
//!
//! Provides key pair generation, recoverable signing, and signer recovery
//! using the secp256k1 elliptic curve.

use rand::rngs::OsRng;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use super::address::Address;

/// Length of one signature record: r (32 bytes) || s (32 bytes) || v (1 byte)
pub const SIGNATURE_RECORD_LEN: usize = 65;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid address")]
    InvalidAddress,
    #[error("Invalid signature record")]
    InvalidSignature,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// Get the identity derived from this key pair's public key
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key)
    }

    /// Sign a 32-byte digest, producing a 65-byte recoverable signature record
    ///
    /// The record layout is `r || s || v` with v in {27, 28}.
    pub fn sign_recoverable(
        &self,
        digest: &[u8; 32],
    ) -> Result<[u8; SIGNATURE_RECORD_LEN], KeyError> {
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(digest)?;
        let signature = secp.sign_ecdsa_recoverable(&message, &self.secret_key);

        let (recovery_id, compact) = signature.serialize_compact();
        let mut record = [0u8; SIGNATURE_RECORD_LEN];
        record[..64].copy_from_slice(&compact);
        record[64] = recovery_id.to_i32() as u8 + 27;
        Ok(record)
    }
}

/// Recover the signer identity from a digest and a 65-byte signature record
///
/// The recovery byte is accepted as 0/1 or 27/28 and normalized. A malformed
/// record yields an error, never a panic.
pub fn recover_signer(digest: &[u8; 32], record: &[u8]) -> Result<Address, KeyError> {
    if record.len() != SIGNATURE_RECORD_LEN {
        return Err(KeyError::InvalidSignature);
    }

    let v = match record[64] {
        v @ 0..=1 => v,
        v @ 27..=28 => v - 27,
        _ => return Err(KeyError::InvalidSignature),
    };

    let recovery_id = RecoveryId::from_i32(v as i32)?;
    let signature = RecoverableSignature::from_compact(&record[..64], recovery_id)?;

    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(digest)?;
    let public_key = secp.recover_ecdsa(&message, &signature)?;
    Ok(Address::from_public_key(&public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sha256;

    #[test]
    fn test_key_pair_generation() {
        let kp = KeyPair::generate();
        assert!(!kp.private_key_hex().is_empty());
        assert!(!kp.public_key_hex().is_empty());
        assert!(!kp.address().is_zero());
    }

    #[test]
    fn test_key_pair_from_hex() {
        let kp1 = KeyPair::generate();
        let private_hex = kp1.private_key_hex();

        let kp2 = KeyPair::from_private_key_hex(&private_hex).unwrap();
        assert_eq!(kp1.public_key_hex(), kp2.public_key_hex());
        assert_eq!(kp1.address(), kp2.address());
    }

    #[test]
    fn test_sign_and_recover() {
        let kp = KeyPair::generate();
        let digest = sha256(b"authorize something");

        let record = kp.sign_recoverable(&digest).unwrap();
        let recovered = recover_signer(&digest, &record).unwrap();
        assert_eq!(recovered, kp.address());
    }

    #[test]
    fn test_recovery_byte_normalization() {
        let kp = KeyPair::generate();
        let digest = sha256(b"normalize v");

        let mut record = kp.sign_recoverable(&digest).unwrap();
        assert!(record[64] == 27 || record[64] == 28);

        // The 0/1 form recovers the same signer
        record[64] -= 27;
        assert_eq!(recover_signer(&digest, &record).unwrap(), kp.address());
    }

    #[test]
    fn test_recover_rejects_bad_records() {
        let kp = KeyPair::generate();
        let digest = sha256(b"bad records");
        let mut record = kp.sign_recoverable(&digest).unwrap();

        // Wrong length
        assert!(recover_signer(&digest, &record[..64]).is_err());

        // Garbage recovery byte
        record[64] = 42;
        assert!(recover_signer(&digest, &record).is_err());
    }

    #[test]
    fn test_recover_wrong_digest_gives_other_signer() {
        let kp = KeyPair::generate();
        let digest = sha256(b"the real digest");
        let other = sha256(b"a different digest");

        let record = kp.sign_recoverable(&digest).unwrap();

        // Recovery over the wrong digest either fails or yields some
        // unrelated identity, never the original signer.
        if let Ok(address) = recover_signer(&other, &record) {
            assert_ne!(address, kp.address());
        }
    }
}
