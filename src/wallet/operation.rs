//! Operation descriptors and validation outcomes
//!
//! The batched front end consumes an `Operation`, answers with packed
//! `ValidationData`, and produces the `ValidatedOperation` capability that
//! the execution gate requires.

use crate::crypto::Address;
use serde::{Deserialize, Serialize};

/// A batched operation submitted by the operation authority
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Operation {
    /// Call destination
    pub target: Address,
    /// Value to transfer with the call
    pub value: u64,
    /// Opaque payload handed to the destination
    pub payload: Vec<u8>,
    /// Concatenated 65-byte signature records approving this operation
    pub signatures: Vec<u8>,
}

/// Packed validation outcome returned to the operation authority
///
/// Encodes an optional validity window as `(valid_after << 48) | valid_until`
/// with 48-bit fields. The wallet only ever returns `ALWAYS_VALID`, which
/// packs to zero: accepted, no time bound. The window fields exist for the
/// authority's wire encoding and stay zero here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationData {
    /// Earliest time the operation is valid (0 = no bound)
    pub valid_after: u64,
    /// Latest time the operation is valid (0 = no bound)
    pub valid_until: u64,
}

impl ValidationData {
    /// Unconditional acceptance with no validity window
    pub const ALWAYS_VALID: ValidationData = ValidationData {
        valid_after: 0,
        valid_until: 0,
    };

    /// Pack into the authority's wire encoding
    pub fn packed(&self) -> u128 {
        const FIELD_MASK: u64 = (1 << 48) - 1;
        (u128::from(self.valid_after & FIELD_MASK) << 48)
            | u128::from(self.valid_until & FIELD_MASK)
    }
}

/// Proof that the batched validator accepted an operation's signature bundle
///
/// Only `Wallet::validate_operation` constructs this value and only
/// `Wallet::execute` consumes it, so execution is unreachable without a
/// prior validation. The gate itself never re-checks signatures.
#[derive(Debug)]
pub struct ValidatedOperation {
    pub(super) target: Address,
    pub(super) value: u64,
    pub(super) payload: Vec<u8>,
}

impl ValidatedOperation {
    /// Call destination extracted from the descriptor
    pub fn target(&self) -> Address {
        self.target
    }

    /// Value transferred with the call
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Opaque payload handed to the destination
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}
