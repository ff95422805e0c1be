//! Call target invoked when a proposal is approved.

use tally_types::{AccountId, CallPayload};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("call to {target} reverted: {reason}")]
    Reverted { target: AccountId, reason: String },
}

/// Dispatches an approved proposal's payload to its target.
///
/// The engine never interprets the payload; whatever this returns is surfaced
/// to the finalizing caller.
pub trait Executable: Send + Sync {
    fn invoke(&self, target: &AccountId, payload: &CallPayload) -> Result<(), ExecutionError>;
}
