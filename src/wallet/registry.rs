//! Owner registry
//!
//! Maintains the set of authorized signer identities and the minimum
//! approval threshold, enforcing the structural invariants on every
//! mutation.

use crate::crypto::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::wallet::WalletError;

/// The authorized signers and the approval threshold
///
/// Invariants after construction and every mutation:
/// - the membership set and the enumeration list hold exactly the same identities
/// - 0 < threshold <= owner count
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OwnerRegistry {
    /// Membership set
    owners: HashSet<Address>,
    /// Enumeration list; order carries no meaning (removal swaps with last)
    list: Vec<Address>,
    /// Minimum number of distinct owner approvals
    threshold: usize,
}

impl OwnerRegistry {
    /// Create a registry from candidate owners and a threshold
    ///
    /// # Errors
    /// Fails if the threshold is zero or exceeds the candidate count, if any
    /// candidate is the null identity, or if any candidate repeats.
    pub fn new(candidates: Vec<Address>, threshold: usize) -> Result<Self, WalletError> {
        if threshold == 0 || threshold > candidates.len() {
            return Err(WalletError::InvalidThreshold {
                threshold,
                owners: candidates.len(),
            });
        }

        let mut owners = HashSet::with_capacity(candidates.len());
        for candidate in &candidates {
            if candidate.is_zero() {
                return Err(WalletError::NullOwner);
            }
            if !owners.insert(*candidate) {
                return Err(WalletError::DuplicateOwner(*candidate));
            }
        }

        Ok(Self {
            owners,
            list: candidates,
            threshold,
        })
    }

    /// Check whether an identity is a registered owner
    pub fn is_owner(&self, address: &Address) -> bool {
        self.owners.contains(address)
    }

    /// Get the approval threshold
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Get the number of registered owners
    pub fn owner_count(&self) -> usize {
        self.list.len()
    }

    /// Enumerate the registered owners
    pub fn owners(&self) -> &[Address] {
        &self.list
    }

    /// Register a new owner
    pub(crate) fn insert(&mut self, owner: Address) -> Result<(), WalletError> {
        if self.owners.contains(&owner) {
            return Err(WalletError::AlreadyOwner(owner));
        }

        self.owners.insert(owner);
        self.list.push(owner);
        Ok(())
    }

    /// Deregister an owner, swapping the last list entry into its slot
    ///
    /// Fails without touching state if the target is not an owner or if the
    /// remaining count would drop below the current threshold.
    pub(crate) fn remove(&mut self, owner: Address) -> Result<(), WalletError> {
        if !self.owners.contains(&owner) {
            return Err(WalletError::UnknownOwner(owner));
        }

        let remaining = self.list.len() - 1;
        if remaining < self.threshold {
            return Err(WalletError::BelowThreshold {
                owner,
                remaining,
                threshold: self.threshold,
            });
        }

        self.owners.remove(&owner);
        if let Some(index) = self.list.iter().position(|a| *a == owner) {
            self.list.swap_remove(index);
        }
        Ok(())
    }

    /// Replace the approval threshold
    pub(crate) fn set_threshold(&mut self, threshold: usize) -> Result<(), WalletError> {
        if threshold == 0 || threshold > self.list.len() {
            return Err(WalletError::InvalidThreshold {
                threshold,
                owners: self.list.len(),
            });
        }

        self.threshold = threshold;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    fn sample_owners(count: usize) -> Vec<Address> {
        (0..count).map(|_| KeyPair::generate().address()).collect()
    }

    #[test]
    fn test_registry_creation() {
        let owners = sample_owners(3);
        let registry = OwnerRegistry::new(owners.clone(), 2).unwrap();

        assert_eq!(registry.threshold(), 2);
        assert_eq!(registry.owner_count(), 3);
        for owner in &owners {
            assert!(registry.is_owner(owner));
        }
    }

    #[test]
    fn test_single_owner_allowed() {
        let registry = OwnerRegistry::new(sample_owners(1), 1).unwrap();
        assert_eq!(registry.owner_count(), 1);
        assert_eq!(registry.threshold(), 1);
    }

    #[test]
    fn test_creation_validation() {
        // Zero threshold
        assert!(matches!(
            OwnerRegistry::new(sample_owners(3), 0),
            Err(WalletError::InvalidThreshold { .. })
        ));

        // Threshold above owner count
        assert!(matches!(
            OwnerRegistry::new(sample_owners(3), 4),
            Err(WalletError::InvalidThreshold { .. })
        ));

        // Empty owner list
        assert!(matches!(
            OwnerRegistry::new(Vec::new(), 1),
            Err(WalletError::InvalidThreshold { .. })
        ));

        // Null identity
        let mut owners = sample_owners(2);
        owners.push(Address::ZERO);
        assert!(matches!(
            OwnerRegistry::new(owners, 2),
            Err(WalletError::NullOwner)
        ));

        // Duplicate identity
        let mut owners = sample_owners(2);
        let repeated = owners[0];
        owners.push(repeated);
        assert!(matches!(
            OwnerRegistry::new(owners, 2),
            Err(WalletError::DuplicateOwner(_))
        ));
    }

    #[test]
    fn test_insert_owner() {
        let mut registry = OwnerRegistry::new(sample_owners(2), 2).unwrap();
        let newcomer = KeyPair::generate().address();

        registry.insert(newcomer).unwrap();
        assert!(registry.is_owner(&newcomer));
        assert_eq!(registry.owner_count(), 3);

        // Inserting twice fails
        assert!(matches!(
            registry.insert(newcomer),
            Err(WalletError::AlreadyOwner(_))
        ));
        assert_eq!(registry.owner_count(), 3);
    }

    #[test]
    fn test_remove_owner() {
        let owners = sample_owners(3);
        let mut registry = OwnerRegistry::new(owners.clone(), 2).unwrap();

        registry.remove(owners[0]).unwrap();
        assert!(!registry.is_owner(&owners[0]));
        assert_eq!(registry.owner_count(), 2);

        // Set and list stay in step after the swap-remove
        assert!(registry.owners().contains(&owners[1]));
        assert!(registry.owners().contains(&owners[2]));
    }

    #[test]
    fn test_remove_unknown_owner() {
        let mut registry = OwnerRegistry::new(sample_owners(3), 2).unwrap();
        let stranger = KeyPair::generate().address();

        assert!(matches!(
            registry.remove(stranger),
            Err(WalletError::UnknownOwner(_))
        ));
        assert_eq!(registry.owner_count(), 3);
    }

    #[test]
    fn test_remove_below_threshold_rejected() {
        let owners = sample_owners(3);
        let mut registry = OwnerRegistry::new(owners.clone(), 2).unwrap();

        // 3 -> 2 owners with threshold 2 is fine
        registry.remove(owners[2]).unwrap();

        // 2 -> 1 would drop below the threshold; nothing changes
        assert!(matches!(
            registry.remove(owners[1]),
            Err(WalletError::BelowThreshold { .. })
        ));
        assert_eq!(registry.owner_count(), 2);
        assert!(registry.is_owner(&owners[1]));
    }

    #[test]
    fn test_set_threshold() {
        let mut registry = OwnerRegistry::new(sample_owners(3), 2).unwrap();

        registry.set_threshold(3).unwrap();
        assert_eq!(registry.threshold(), 3);

        assert!(matches!(
            registry.set_threshold(0),
            Err(WalletError::InvalidThreshold { .. })
        ));
        assert!(matches!(
            registry.set_threshold(4),
            Err(WalletError::InvalidThreshold { .. })
        ));
        assert_eq!(registry.threshold(), 3);
    }
}
