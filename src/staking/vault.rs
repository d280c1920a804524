//! Time-locked staking vault
//!
//! The wallet's external collaborator: deposits stay locked for a fixed
//! period, and a privileged recovery path is callable only by the wallet
//! identity captured at construction. Reward accrual is handled outside
//! this vault; it tracks staked amounts and lock deadlines only.

use crate::crypto::Address;
use crate::ledger::{CallError, Callee};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Staking-related errors
#[derive(Error, Debug)]
pub enum StakingError {
    #[error("Invalid amount: amount must be greater than 0")]
    InvalidAmount,
    #[error("Nothing staked for {0}")]
    NoStake(Address),
    #[error("Stake for {staker} is locked until {unlock_at}")]
    StillLocked {
        staker: Address,
        unlock_at: DateTime<Utc>,
    },
    #[error("Caller {0} is not the recovery wallet")]
    NotRecoveryWallet(Address),
    #[error("Insufficient vault funds: have {have}, need {need}")]
    InsufficientVaultFunds { have: u64, need: u64 },
    #[error("Reentrant call")]
    Reentrancy,
}

/// A single staker's position
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Stake {
    /// Staked amount
    pub amount: u64,
    /// When the position unlocks
    pub unlock_at: DateTime<Utc>,
}

/// Privileged vault calls the wallet routes through its execution gate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum StakingCall {
    /// Emergency-recover vault funds to a destination
    RecoverTokens { to: Address, amount: u64 },
}

/// A staking vault with time-locked positions and wallet-gated recovery
pub struct StakingVault {
    /// Sole identity allowed to recover vault funds, fixed at construction
    wallet: Address,
    /// How long a deposit stays locked
    lock_period: Duration,
    /// Positions by staker
    stakes: HashMap<Address, Stake>,
    /// Total funds held by the vault
    total: u64,
    /// One-call-at-a-time flag for sensitive operations
    entered: bool,
}

impl StakingVault {
    /// Create a vault recoverable only by the given wallet identity
    pub fn new(wallet: Address, lock_period: Duration) -> Self {
        Self {
            wallet,
            lock_period,
            stakes: HashMap::new(),
            total: 0,
            entered: false,
        }
    }

    /// Get the wallet identity allowed to recover funds
    pub fn recovery_wallet(&self) -> Address {
        self.wallet
    }

    /// Get a staker's position
    pub fn staked(&self, staker: &Address) -> Option<&Stake> {
        self.stakes.get(staker)
    }

    /// Get the total funds held by the vault
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Stake an amount, locking it for the vault's lock period
    ///
    /// Staking on top of an existing position extends its lock.
    pub fn stake(
        &mut self,
        staker: Address,
        amount: u64,
        now: DateTime<Utc>,
    ) -> Result<(), StakingError> {
        self.enter()?;
        let result = self.stake_inner(staker, amount, now);
        self.entered = false;
        result
    }

    fn stake_inner(
        &mut self,
        staker: Address,
        amount: u64,
        now: DateTime<Utc>,
    ) -> Result<(), StakingError> {
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }

        let unlock_at = now + self.lock_period;
        let stake = self.stakes.entry(staker).or_insert(Stake {
            amount: 0,
            unlock_at,
        });
        stake.amount += amount;
        stake.unlock_at = unlock_at;
        self.total += amount;

        log::info!("Stake: {} locked {} until {}", staker, amount, unlock_at);
        Ok(())
    }

    /// Withdraw a staker's full position once its lock has expired
    pub fn withdraw(&mut self, staker: Address, now: DateTime<Utc>) -> Result<u64, StakingError> {
        self.enter()?;
        let result = self.withdraw_inner(staker, now);
        self.entered = false;
        result
    }

    fn withdraw_inner(
        &mut self,
        staker: Address,
        now: DateTime<Utc>,
    ) -> Result<u64, StakingError> {
        let stake = self
            .stakes
            .get(&staker)
            .ok_or(StakingError::NoStake(staker))?;
        if now < stake.unlock_at {
            return Err(StakingError::StillLocked {
                staker,
                unlock_at: stake.unlock_at,
            });
        }

        let amount = stake.amount;
        self.stakes.remove(&staker);
        self.total -= amount;

        log::info!("Withdraw: {} reclaimed {}", staker, amount);
        Ok(amount)
    }

    /// Emergency-recover vault funds; callable only by the wallet
    ///
    /// Reached in practice through the wallet's execution gate, i.e. only
    /// after a threshold-satisfying signature bundle approved the recovery.
    pub fn recover_tokens(
        &mut self,
        caller: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), StakingError> {
        self.enter()?;
        let result = self.recover_inner(caller, to, amount);
        self.entered = false;
        result
    }

    fn recover_inner(
        &mut self,
        caller: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), StakingError> {
        if caller != self.wallet {
            return Err(StakingError::NotRecoveryWallet(caller));
        }
        if amount > self.total {
            return Err(StakingError::InsufficientVaultFunds {
                have: self.total,
                need: amount,
            });
        }

        self.total -= amount;
        log::warn!("Emergency recovery: {} sent to {}", amount, to);
        Ok(())
    }

    fn enter(&mut self) -> Result<(), StakingError> {
        if self.entered {
            return Err(StakingError::Reentrancy);
        }
        self.entered = true;
        Ok(())
    }
}

impl Callee for StakingVault {
    fn on_call(
        &mut self,
        from: Address,
        _value: u64,
        payload: &[u8],
    ) -> Result<Vec<u8>, CallError> {
        let call: StakingCall = serde_json::from_slice(payload)
            .map_err(|e| CallError::Reverted(format!("malformed staking payload: {}", e)))?;

        match call {
            StakingCall::RecoverTokens { to, amount } => {
                self.recover_tokens(from, to, amount)
                    .map_err(|e| CallError::Reverted(e.to_string()))?;
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    fn vault() -> (StakingVault, Address) {
        let wallet = KeyPair::generate().address();
        (StakingVault::new(wallet, Duration::days(7)), wallet)
    }

    #[test]
    fn test_stake_and_withdraw_after_lock() {
        let (mut vault, _) = vault();
        let staker = KeyPair::generate().address();
        let now = Utc::now();

        vault.stake(staker, 100, now).unwrap();
        assert_eq!(vault.staked(&staker).unwrap().amount, 100);
        assert_eq!(vault.total(), 100);

        // Still locked
        assert!(matches!(
            vault.withdraw(staker, now + Duration::days(3)),
            Err(StakingError::StillLocked { .. })
        ));

        // Unlocked
        let amount = vault.withdraw(staker, now + Duration::days(8)).unwrap();
        assert_eq!(amount, 100);
        assert_eq!(vault.total(), 0);
        assert!(vault.staked(&staker).is_none());
    }

    #[test]
    fn test_restake_extends_lock() {
        let (mut vault, _) = vault();
        let staker = KeyPair::generate().address();
        let now = Utc::now();

        vault.stake(staker, 50, now).unwrap();
        vault.stake(staker, 25, now + Duration::days(5)).unwrap();

        let stake = vault.staked(&staker).unwrap();
        assert_eq!(stake.amount, 75);
        assert_eq!(stake.unlock_at, now + Duration::days(12));
    }

    #[test]
    fn test_zero_stake_rejected() {
        let (mut vault, _) = vault();
        let staker = KeyPair::generate().address();

        assert!(matches!(
            vault.stake(staker, 0, Utc::now()),
            Err(StakingError::InvalidAmount)
        ));
    }

    #[test]
    fn test_recovery_gated_on_wallet() {
        let (mut vault, wallet) = vault();
        let staker = KeyPair::generate().address();
        let intruder = KeyPair::generate().address();
        let destination = KeyPair::generate().address();

        vault.stake(staker, 100, Utc::now()).unwrap();

        // Only the wallet identity may recover
        assert!(matches!(
            vault.recover_tokens(intruder, destination, 100),
            Err(StakingError::NotRecoveryWallet(_))
        ));
        assert_eq!(vault.total(), 100);

        vault.recover_tokens(wallet, destination, 60).unwrap();
        assert_eq!(vault.total(), 40);

        // Cannot recover more than the vault holds
        assert!(matches!(
            vault.recover_tokens(wallet, destination, 100),
            Err(StakingError::InsufficientVaultFunds { .. })
        ));
    }

    #[test]
    fn test_reentrancy_flag() {
        let (mut vault, _) = vault();

        // A call arriving while another is in flight is rejected
        vault.entered = true;
        assert!(matches!(
            vault.stake(KeyPair::generate().address(), 10, Utc::now()),
            Err(StakingError::Reentrancy)
        ));

        vault.entered = false;
        vault
            .stake(KeyPair::generate().address(), 10, Utc::now())
            .unwrap();
    }

    #[test]
    fn test_recovery_through_wallet_gate() {
        use crate::crypto::{prefixed_digest, sha256};
        use crate::ledger::MemoryLedger;
        use crate::wallet::{Operation, Wallet};
        use std::cell::RefCell;
        use std::rc::Rc;

        let keys: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
        let owners: Vec<_> = keys.iter().map(|k| k.address()).collect();
        let authority = KeyPair::generate().address();
        let mut wallet = Wallet::new(owners, 2, authority).unwrap();

        let vault_address = KeyPair::generate().address();
        let destination = KeyPair::generate().address();
        let vault = Rc::new(RefCell::new(StakingVault::new(
            wallet.address(),
            Duration::days(7),
        )));
        vault
            .borrow_mut()
            .stake(KeyPair::generate().address(), 500, Utc::now())
            .unwrap();

        let mut ledger = MemoryLedger::new();
        ledger.register(vault_address, Box::new(Rc::clone(&vault)));

        let payload = serde_json::to_vec(&StakingCall::RecoverTokens {
            to: destination,
            amount: 500,
        })
        .unwrap();
        let digest = sha256(b"recover the vault");
        let prefixed = prefixed_digest(&digest);

        let mut signatures = Vec::new();
        for key in [&keys[0], &keys[1]] {
            signatures.extend_from_slice(&key.sign_recoverable(&prefixed).unwrap());
        }
        let op = Operation {
            target: vault_address,
            value: 0,
            payload,
            signatures,
        };

        let (_, validated) = wallet
            .validate_operation(authority, &op, &digest, 0)
            .unwrap();
        wallet.execute(authority, validated, &mut ledger).unwrap();

        assert_eq!(vault.borrow().total(), 0);
    }

    #[test]
    fn test_callee_decodes_recovery_payload() {
        let (mut vault, wallet) = vault();
        let destination = KeyPair::generate().address();
        vault.stake(KeyPair::generate().address(), 80, Utc::now()).unwrap();

        let payload = serde_json::to_vec(&StakingCall::RecoverTokens {
            to: destination,
            amount: 80,
        })
        .unwrap();

        // From the wallet: accepted
        vault.on_call(wallet, 0, &payload).unwrap();
        assert_eq!(vault.total(), 0);

        // Garbage payload: reverted
        assert!(matches!(
            vault.on_call(wallet, 0, b"not json"),
            Err(CallError::Reverted(_))
        ));
    }
}
