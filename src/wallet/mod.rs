//! Threshold multi-signature authorization
//!
//! An M-of-N wallet that gates execution of arbitrary calls behind a
//! configurable number of distinct owner approvals, exposed through two
//! validation front ends: a batched-operation validator reserved for the
//! operation authority (fails loudly) and a permissionless ad-hoc check
//! that always answers with a fixed 4-byte code.
//!
//! # Example
//!
//! ```ignore
//! use quorum_wallet::wallet::{Operation, Wallet};
//!
//! // Create a 2-of-3 wallet
//! let mut wallet = Wallet::new(vec![owner1, owner2, owner3], 2, authority)?;
//!
//! // The authority validates a signed operation, then executes it
//! let (data, validated) = wallet.validate_operation(authority, &op, &digest, 0)?;
//! wallet.execute(authority, validated, &mut ledger)?;
//!
//! // Anyone may check a digest/bundle pair
//! let code = wallet.check_signature(&digest, &bundle);
//! ```

pub mod events;
pub mod operation;
pub mod registry;
pub mod verifier;
pub mod wallet;

pub use events::WalletEvent;
pub use operation::{Operation, ValidatedOperation, ValidationData};
pub use registry::OwnerRegistry;
pub use verifier::{distinct_approvals, meets_threshold};
pub use wallet::{Wallet, WalletError, ACCEPT_MAGIC, REJECT_CODE};
