//! The threshold multi-signature wallet
//!
//! Owns the owner registry, the immutable operation-authority identity, the
//! replay nonce, and the notification buffer. Exposes governance entry
//! points, the two validation front ends, and the execution gate.

use crate::crypto::{prefixed_digest, sha256, Address, ADDRESS_LEN};
use crate::ledger::{CallError, Ledger};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::events::WalletEvent;
use super::operation::{Operation, ValidatedOperation, ValidationData};
use super::registry::OwnerRegistry;
use super::verifier;

/// Magic code returned by the ad-hoc validator on acceptance
pub const ACCEPT_MAGIC: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

/// Code returned by the ad-hoc validator on rejection
pub const REJECT_CODE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

/// Errors related to wallet operations
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid threshold {threshold} for {owners} owners")]
    InvalidThreshold { threshold: usize, owners: usize },
    #[error("Null identity is not a valid owner")]
    NullOwner,
    #[error("Null identity is not a valid operation authority")]
    NullAuthority,
    #[error("Duplicate owner: {0}")]
    DuplicateOwner(Address),
    #[error("Already an owner: {0}")]
    AlreadyOwner(Address),
    #[error("Not an owner: {0}")]
    UnknownOwner(Address),
    #[error("Caller is not an owner: {0}")]
    NotOwner(Address),
    #[error("Removing {owner} would leave {remaining} owners below threshold {threshold}")]
    BelowThreshold {
        owner: Address,
        remaining: usize,
        threshold: usize,
    },
    #[error("Caller is not the operation authority: {0}")]
    NotAuthority(Address),
    #[error("Signature bundle below threshold: have {have}, need {need}")]
    ThresholdNotMet { have: usize, need: usize },
    #[error("Call error: {0}")]
    Call(#[from] CallError),
}

/// A threshold multi-signature authorization wallet
///
/// Gates execution of arbitrary calls behind a configurable number of
/// distinct owner approvals, collected as a bundle of 65-byte recoverable
/// signature records.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Wallet {
    /// This wallet's own identity, derived from its initial configuration
    address: Address,
    /// Authorized signers and threshold
    registry: OwnerRegistry,
    /// The only caller allowed to validate and execute batched operations.
    /// Fixed at construction; there is no setter.
    authority: Address,
    /// Replay counter, advanced once per accepted batched validation
    nonce: u64,
    /// Notifications not yet drained by observers
    events: Vec<WalletEvent>,
}

impl Wallet {
    /// Create a new wallet
    ///
    /// # Arguments
    /// * `owners` - Candidate signer identities (non-empty, no nulls, no duplicates)
    /// * `threshold` - Minimum distinct approvals required (0 < threshold <= owners)
    /// * `authority` - The operation-processing authority's identity
    ///
    /// # Errors
    /// Returns an error if the threshold or any identity is invalid.
    pub fn new(
        owners: Vec<Address>,
        threshold: usize,
        authority: Address,
    ) -> Result<Self, WalletError> {
        if authority.is_zero() {
            return Err(WalletError::NullAuthority);
        }

        let registry = OwnerRegistry::new(owners, threshold)?;
        let address = Self::derive_address(&registry, &authority);

        log::info!(
            "Wallet {} created: {}-of-{}, authority {}",
            address,
            registry.threshold(),
            registry.owner_count(),
            authority
        );

        Ok(Self {
            address,
            registry,
            authority,
            nonce: 0,
            events: Vec::new(),
        })
    }

    /// Derive the wallet identity from threshold, sorted owners, and authority
    fn derive_address(registry: &OwnerRegistry, authority: &Address) -> Address {
        let mut sorted_owners = registry.owners().to_vec();
        sorted_owners.sort();

        let mut data = Vec::new();
        data.extend_from_slice(&(registry.threshold() as u64).to_be_bytes());
        for owner in &sorted_owners {
            data.extend_from_slice(owner.as_bytes());
        }
        data.extend_from_slice(authority.as_bytes());

        let hash = sha256(&data);
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&hash[..ADDRESS_LEN]);
        Address::new(bytes)
    }

    /// Get the wallet's own identity
    pub fn address(&self) -> Address {
        self.address
    }

    /// Get the operation authority's identity
    pub fn authority(&self) -> Address {
        self.authority
    }

    /// Get the replay counter
    ///
    /// Advances once per accepted batched validation; the authority binds
    /// its operation context to this value.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Get the owner registry
    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }

    /// Add an owner; caller must be a current owner
    pub fn add_owner(&mut self, caller: Address, owner: Address) -> Result<(), WalletError> {
        self.require_owner(caller)?;
        self.registry.insert(owner)?;

        log::info!("Wallet {}: owner {} added by {}", self.address, owner, caller);
        self.events.push(WalletEvent::OwnerAdded { owner });
        Ok(())
    }

    /// Remove an owner; caller must be a current owner
    ///
    /// Fails without state change if removal would leave fewer owners than
    /// the current threshold.
    pub fn remove_owner(&mut self, caller: Address, owner: Address) -> Result<(), WalletError> {
        self.require_owner(caller)?;
        self.registry.remove(owner)?;

        log::info!(
            "Wallet {}: owner {} removed by {}",
            self.address,
            owner,
            caller
        );
        self.events.push(WalletEvent::OwnerRemoved { owner });
        Ok(())
    }

    /// Replace the approval threshold; caller must be a current owner
    pub fn set_threshold(&mut self, caller: Address, threshold: usize) -> Result<(), WalletError> {
        self.require_owner(caller)?;
        self.registry.set_threshold(threshold)?;

        log::info!(
            "Wallet {}: threshold set to {} by {}",
            self.address,
            threshold,
            caller
        );
        self.events.push(WalletEvent::ThresholdUpdated { threshold });
        Ok(())
    }

    /// Validate a batched operation on behalf of the operation authority
    ///
    /// The digest ties the descriptor to the authority's replay-protected
    /// context and is normalized with the wallet's signed-message prefix
    /// before verification. On success returns the packed
    /// always-valid encoding together with the capability the execution
    /// gate requires, and advances the nonce. Fails loudly when the bundle
    /// does not meet the threshold; this entry point never encodes failure
    /// in its return value.
    ///
    /// `_prefund` is part of the authority's calling convention (a gas
    /// budget the account could choose to cover) and is not used here.
    pub fn validate_operation(
        &mut self,
        caller: Address,
        operation: &Operation,
        op_digest: &[u8; 32],
        _prefund: u64,
    ) -> Result<(ValidationData, ValidatedOperation), WalletError> {
        self.require_authority(caller)?;

        let digest = prefixed_digest(op_digest);
        let have = verifier::distinct_approvals(&digest, &operation.signatures, &self.registry);
        let need = self.registry.threshold();
        if have < need {
            log::debug!(
                "Wallet {}: operation rejected, {}/{} approvals",
                self.address,
                have,
                need
            );
            return Err(WalletError::ThresholdNotMet { have, need });
        }

        self.nonce += 1;
        log::debug!(
            "Wallet {}: operation accepted with {} approvals, nonce {}",
            self.address,
            have,
            self.nonce
        );

        Ok((
            ValidationData::ALWAYS_VALID,
            ValidatedOperation {
                target: operation.target,
                value: operation.value,
                payload: operation.payload.clone(),
            },
        ))
    }

    /// Check an arbitrary digest/signature pair against the current owners
    ///
    /// Permissionless and total: returns `ACCEPT_MAGIC` when the bundle
    /// meets the threshold over the raw digest (no prefixing) and
    /// `REJECT_CODE` otherwise. Never fails, whatever the input.
    pub fn check_signature(&self, digest: &[u8; 32], bundle: &[u8]) -> [u8; 4] {
        if verifier::meets_threshold(digest, bundle, &self.registry) {
            ACCEPT_MAGIC
        } else {
            REJECT_CODE
        }
    }

    /// Execute a validated operation; caller must be the operation authority
    ///
    /// Consumes the capability produced by `validate_operation`; no
    /// signature re-checking happens here. Performs the target call through
    /// the ledger and propagates its failure.
    pub fn execute(
        &mut self,
        caller: Address,
        operation: ValidatedOperation,
        ledger: &mut dyn Ledger,
    ) -> Result<Vec<u8>, WalletError> {
        self.require_authority(caller)?;

        let ValidatedOperation {
            target,
            value,
            payload,
        } = operation;

        let output = ledger.call(self.address, target, value, &payload)?;

        log::info!(
            "Wallet {}: executed call to {} with value {}",
            self.address,
            target,
            value
        );
        self.events.push(WalletEvent::OperationExecuted {
            target,
            value,
            payload,
        });
        Ok(output)
    }

    /// Drain buffered notifications
    pub fn drain_events(&mut self) -> Vec<WalletEvent> {
        std::mem::take(&mut self.events)
    }

    fn require_owner(&self, caller: Address) -> Result<(), WalletError> {
        if !self.registry.is_owner(&caller) {
            return Err(WalletError::NotOwner(caller));
        }
        Ok(())
    }

    fn require_authority(&self, caller: Address) -> Result<(), WalletError> {
        if caller != self.authority {
            return Err(WalletError::NotAuthority(caller));
        }
        Ok(())
    }
}
