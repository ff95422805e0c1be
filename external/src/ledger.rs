//! Fungible token ledger trait.

use tally_types::AccountId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The account has not authorized the engine to pull this amount.
    #[error("{account} has not authorized a transfer of {amount}")]
    AuthorizationMissing { account: AccountId, amount: u128 },

    #[error("insufficient token balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("ledger backend error: {0}")]
    Backend(String),
}

/// The token ledger the engine takes custody through.
///
/// `pull` moves tokens from `account` into the engine's custody and must fail
/// with [`LedgerError::AuthorizationMissing`] when the account has not
/// pre-authorized the transfer. `push` returns tokens from custody to `account`.
pub trait TokenLedger: Send + Sync {
    fn pull(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError>;

    fn push(&self, account: &AccountId, amount: u128) -> Result<(), LedgerError>;

    fn balance_of(&self, account: &AccountId) -> u128;
}
