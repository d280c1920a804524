//! Wallet notifications
//!
//! Emitted on every successful governance mutation and executed operation.
//! Consumed by external observers only; nothing in the core reads them back.

use crate::crypto::Address;
use serde::{Deserialize, Serialize};

/// A notification emitted by the wallet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum WalletEvent {
    /// An identity was added to the owner set
    OwnerAdded { owner: Address },
    /// An identity was removed from the owner set
    OwnerRemoved { owner: Address },
    /// The approval threshold was replaced
    ThresholdUpdated { threshold: usize },
    /// The execution gate performed a call
    OperationExecuted {
        target: Address,
        value: u64,
        payload: Vec<u8>,
    },
}
