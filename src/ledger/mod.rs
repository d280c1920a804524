//! Execution substrate for the wallet
//!
//! The execution gate performs its target calls through the `Ledger` trait.
//! `MemoryLedger` is the in-process implementation used by the CLI and
//! tests: account balances plus callees registered by address, with
//! whole-call atomicity (a failed callee rolls the value transfer back).

use crate::crypto::Address;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Errors surfaced by a ledger call
#[derive(Error, Debug)]
pub enum CallError {
    #[error("Insufficient funds: {from} has {balance}, needs {needed}")]
    InsufficientFunds {
        from: Address,
        balance: u64,
        needed: u64,
    },
    #[error("Call reverted: {0}")]
    Reverted(String),
}

/// The substrate calls are performed on
///
/// Each call either fully succeeds (transfer applied, callee run) or fully
/// fails with no state change.
pub trait Ledger {
    /// Transfer `value` from `from` to `to` and hand the payload to the
    /// destination
    fn call(
        &mut self,
        from: Address,
        to: Address,
        value: u64,
        payload: &[u8],
    ) -> Result<Vec<u8>, CallError>;
}

/// A destination reachable through `MemoryLedger::call`
pub trait Callee {
    /// Handle an incoming call; an error aborts the whole call, including
    /// the value transfer
    fn on_call(&mut self, from: Address, value: u64, payload: &[u8])
        -> Result<Vec<u8>, CallError>;
}

/// Lets a caller keep a handle on a registered callee
impl<C: Callee> Callee for Rc<RefCell<C>> {
    fn on_call(
        &mut self,
        from: Address,
        value: u64,
        payload: &[u8],
    ) -> Result<Vec<u8>, CallError> {
        self.borrow_mut().on_call(from, value, payload)
    }
}

/// In-memory ledger: balances plus registered callees
#[derive(Default)]
pub struct MemoryLedger {
    balances: HashMap<Address, u64>,
    callees: HashMap<Address, Box<dyn Callee>>,
}

impl MemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account
    pub fn credit(&mut self, account: Address, amount: u64) {
        *self.balances.entry(account).or_insert(0) += amount;
    }

    /// Get an account balance
    pub fn balance_of(&self, account: &Address) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Register a callee at an address
    pub fn register(&mut self, address: Address, callee: Box<dyn Callee>) {
        self.callees.insert(address, callee);
    }
}

impl Ledger for MemoryLedger {
    fn call(
        &mut self,
        from: Address,
        to: Address,
        value: u64,
        payload: &[u8],
    ) -> Result<Vec<u8>, CallError> {
        if value > 0 {
            let balance = self.balance_of(&from);
            if balance < value {
                return Err(CallError::InsufficientFunds {
                    from,
                    balance,
                    needed: value,
                });
            }
            self.balances.insert(from, balance - value);
            *self.balances.entry(to).or_insert(0) += value;
        }

        let result = match self.callees.get_mut(&to) {
            Some(callee) => callee.on_call(from, value, payload),
            // A plain transfer; nothing to run at the destination
            None => Ok(Vec::new()),
        };

        if result.is_err() && value > 0 {
            // Undo the transfer so the whole call fails atomically
            *self.balances.entry(to).or_insert(0) -= value;
            *self.balances.entry(from).or_insert(0) += value;
        }

        result
    }
}
