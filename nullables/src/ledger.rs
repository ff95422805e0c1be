//! Nullable token ledger — in-memory balances and allowances.

use std::collections::HashMap;
use std::sync::Mutex;
use tally_external::{LedgerError, TokenLedger};
use tally_types::AccountId;

#[derive(Default)]
struct Accounts {
    balances: HashMap<AccountId, u128>,
    /// Amount each account has authorized the engine to pull.
    allowances: HashMap<AccountId, u128>,
    custody: u128,
}

/// An in-memory token ledger for testing.
///
/// Accounts must `approve` the engine before a `pull` succeeds; pulled tokens
/// sit in a single custody balance until pushed back out.
pub struct NullLedger {
    inner: Mutex<Accounts>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Accounts::default()),
        }
    }

    /// Credit tokens to an account out of thin air.
    pub fn mint(&self, account: &AccountId, amount: u128) {
        let mut inner = self.inner.lock().unwrap();
        *inner.balances.entry(account.clone()).or_default() += amount;
    }

    /// Authorize the engine to pull up to `amount` from `account`.
    /// Replaces any previous authorization.
    pub fn approve(&self, account: &AccountId, amount: u128) {
        self.inner
            .lock()
            .unwrap()
            .allowances
            .insert(account.clone(), amount);
    }

    pub fn allowance(&self, account: &AccountId) -> u128 {
        self.inner
            .lock()
            .unwrap()
            .allowances
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    /// Tokens currently held on behalf of depositors.
    pub fn custody(&self) -> u128 {
        self.inner.lock().unwrap().custody
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenLedger for NullLedger {
    fn pull(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().unwrap();
        let allowance = inner.allowances.get(account).copied().unwrap_or(0);
        if allowance < amount {
            return Err(LedgerError::AuthorizationMissing {
                account: account.clone(),
                amount,
            });
        }
        let available = inner.balances.get(account).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: account.clone(),
                needed: amount,
                available,
            });
        }
        inner.allowances.insert(account.clone(), allowance - amount);
        inner.balances.insert(account.clone(), available - amount);
        inner.custody += amount;
        Ok(())
    }

    fn push(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.custody < amount {
            return Err(LedgerError::Backend(format!(
                "custody holds {}, cannot release {}",
                inner.custody, amount
            )));
        }
        inner.custody -= amount;
        *inner.balances.entry(account.clone()).or_default() += amount;
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.inner
            .lock()
            .unwrap()
            .balances
            .get(account)
            .copied()
            .unwrap_or(0)
    }
}
