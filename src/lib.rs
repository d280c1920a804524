//! Quorum-Wallet: a threshold multi-signature authorization wallet in Rust
//!
//! This crate gates execution of arbitrary actions behind M-of-N owner
//! approvals, featuring:
//! - Owner registry with self-service governance (add/remove/threshold)
//! - Recoverable ECDSA signature bundles (secp256k1, 65-byte records)
//! - Duplicate- and non-owner-resistant bundle verification
//! - Dual validation front ends: a batched-operation validator reserved for
//!   the operation authority, and a permissionless ad-hoc signature check
//! - An execution gate over a pluggable ledger
//! - A time-locked staking collaborator with wallet-gated recovery
//!
//! # Example
//!
//! ```rust
//! use quorum_wallet::crypto::{sha256, KeyPair};
//! use quorum_wallet::wallet::{Wallet, ACCEPT_MAGIC};
//!
//! // Create a 2-of-3 wallet
//! let keys: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
//! let owners: Vec<_> = keys.iter().map(|k| k.address()).collect();
//! let authority = KeyPair::generate().address();
//! let wallet = Wallet::new(owners, 2, authority).unwrap();
//!
//! // Two distinct owners approve a digest
//! let digest = sha256(b"release the funds");
//! let mut bundle = Vec::new();
//! bundle.extend_from_slice(&keys[0].sign_recoverable(&digest).unwrap());
//! bundle.extend_from_slice(&keys[1].sign_recoverable(&digest).unwrap());
//!
//! assert_eq!(wallet.check_signature(&digest, &bundle), ACCEPT_MAGIC);
//! ```

pub mod cli;
pub mod crypto;
pub mod ledger;
pub mod staking;
pub mod wallet;

// Re-export commonly used types
pub use crypto::{Address, KeyPair};
pub use ledger::{CallError, Callee, Ledger, MemoryLedger};
pub use staking::{StakingCall, StakingError, StakingVault};
pub use wallet::{
    Operation, OwnerRegistry, ValidationData, Wallet, WalletError, WalletEvent, ACCEPT_MAGIC,
    REJECT_CODE,
};
