//! Time-locked staking collaborator
//!
//! An external consumer of the wallet's authorization decision: deposits
//! are locked for a fixed period, and the emergency token-recovery path is
//! callable only by the wallet identity captured at construction. The
//! wallet reaches it through its execution gate, after a
//! threshold-satisfying signature bundle.

pub mod vault;

pub use vault::{Stake, StakingCall, StakingError, StakingVault};
