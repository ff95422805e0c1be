use tally_external::{ExecutionError, LedgerError};
use tally_types::{AccountId, ProposalId, Timestamp};
use thiserror::Error;

use crate::proposal::ProposalStatus;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("{caller} is not the chairperson")]
    Unauthorized { caller: AccountId },

    #[error("approval required: {account} has not authorized a transfer of {amount}")]
    TransferAuthorizationMissing { account: AccountId, amount: u128 },

    #[error("insufficient voting power for {account}: requested {requested}, deposited {available}")]
    InsufficientVotingPower {
        account: AccountId,
        requested: u128,
        available: u128,
    },

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("{voter} has already voted on proposal {proposal}")]
    AlreadyVoted { voter: AccountId, proposal: ProposalId },

    #[error("debate period for proposal {proposal} ends at {ends_at}")]
    DebatePeriodNotElapsed {
        proposal: ProposalId,
        ends_at: Timestamp,
    },

    #[error("proposal {proposal} is already finalized as {status}")]
    AlreadyFinalized {
        proposal: ProposalId,
        status: ProposalStatus,
    },

    #[error("proposal {proposal} was approved but its call failed: {source}")]
    TargetExecutionFailed {
        proposal: ProposalId,
        #[source]
        source: ExecutionError,
    },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("voting on proposal {0} closed at the end of the debate period")]
    VotingClosed(ProposalId),

    #[error("{locked} of {account}'s voting power is committed until {unlock_at}")]
    VotingPowerLocked {
        account: AccountId,
        locked: u128,
        unlock_at: Timestamp,
    },

    #[error("arithmetic overflow in governance accounting")]
    Overflow,

    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl From<LedgerError> for GovernanceError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AuthorizationMissing { account, amount } => {
                Self::TransferAuthorizationMissing { account, amount }
            }
            other => Self::Ledger(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_authorization_surfaces_as_approval_required() {
        let err: GovernanceError = LedgerError::AuthorizationMissing {
            account: AccountId::new("alice"),
            amount: 10,
        }
        .into();
        assert!(matches!(
            err,
            GovernanceError::TransferAuthorizationMissing { amount: 10, .. }
        ));
        assert!(err.to_string().starts_with("approval required"));
    }

    #[test]
    fn other_ledger_failures_are_wrapped() {
        let err: GovernanceError = LedgerError::Backend("offline".into()).into();
        assert!(matches!(err, GovernanceError::Ledger(_)));
    }
}
