//! Deposited voting power per account.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tally_types::AccountId;

use crate::error::GovernanceError;

/// Tracks how many tokens each account holds in engine custody.
///
/// Distinct from the token ledger: this is the balance that backs votes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VotingPowerLedger {
    deposits: HashMap<AccountId, u128>,
    /// Sum of all deposits, maintained incrementally.
    total: u128,
}

impl VotingPowerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.deposits.get(account).copied().unwrap_or(0)
    }

    /// Total outstanding deposited power across all accounts.
    pub fn total(&self) -> u128 {
        self.total
    }

    /// Increase `account`'s deposit; returns the new balance.
    pub fn credit(&mut self, account: &AccountId, amount: u128) -> Result<u128, GovernanceError> {
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;
        let total = self
            .total
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)?;
        self.deposits.insert(account.clone(), balance);
        self.total = total;
        Ok(balance)
    }

    /// Decrease `account`'s deposit; returns the new balance.
    pub fn debit(&mut self, account: &AccountId, amount: u128) -> Result<u128, GovernanceError> {
        let available = self.balance_of(account);
        let balance =
            available
                .checked_sub(amount)
                .ok_or_else(|| GovernanceError::InsufficientVotingPower {
                    account: account.clone(),
                    requested: amount,
                    available,
                })?;
        let total = self
            .total
            .checked_sub(amount)
            .ok_or(GovernanceError::Overflow)?;
        self.deposits.insert(account.clone(), balance);
        self.total = total;
        Ok(balance)
    }

    /// Whether the running total equals the sum of the per-account deposits.
    pub fn is_consistent(&self) -> bool {
        self.deposits
            .values()
            .try_fold(0u128, |sum, d| sum.checked_add(*d))
            == Some(self.total)
    }
}
