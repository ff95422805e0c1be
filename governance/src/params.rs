//! Immutable governance parameters.

use serde::{Deserialize, Serialize};
use tally_types::AccountId;

use crate::error::GovernanceError;

/// Whether committed voting power can leave the engine before its vote unlocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalPolicy {
    /// Deposits can always be withdrawn, even while backing an open vote.
    #[default]
    Unrestricted,
    /// The largest still-locked commitment must stay deposited until its
    /// unlock time.
    LockCommitted,
}

/// Parameters fixed at engine construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// The only account allowed to create proposals.
    pub chairperson: AccountId,
    /// Share of total deposited power (0..=100) that must vote for a result to count.
    pub minimum_quorum_percent: u8,
    /// Seconds a proposal stays open before it can be finalized.
    pub debating_period_secs: u64,
    pub withdrawal_policy: WithdrawalPolicy,
    /// Reject votes cast once the debate period has elapsed.
    pub close_voting_at_deadline: bool,
}

impl GovernanceParams {
    /// Parameters with the default policies.
    pub fn new(
        chairperson: AccountId,
        minimum_quorum_percent: u8,
        debating_period_secs: u64,
    ) -> Result<Self, GovernanceError> {
        let params = Self {
            chairperson,
            minimum_quorum_percent,
            debating_period_secs,
            withdrawal_policy: WithdrawalPolicy::default(),
            close_voting_at_deadline: false,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_withdrawal_policy(mut self, policy: WithdrawalPolicy) -> Self {
        self.withdrawal_policy = policy;
        self
    }

    pub fn with_voting_closed_at_deadline(mut self, close: bool) -> Self {
        self.close_voting_at_deadline = close;
        self
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.minimum_quorum_percent > 100 {
            return Err(GovernanceError::Config(format!(
                "minimum_quorum_percent must be at most 100, got {}",
                self.minimum_quorum_percent
            )));
        }
        Ok(())
    }

    /// Whether `participating` votes reach the quorum out of `total_deposited`.
    ///
    /// Exact integer form of `participating * 100 >= quorum * total_deposited`
    /// that cannot overflow.
    pub fn quorum_met(&self, participating: u128, total_deposited: u128) -> bool {
        let q = self.minimum_quorum_percent as u128;
        let floor = (total_deposited / 100) * q + (total_deposited % 100) * q / 100;
        let exact = (total_deposited % 100) * q % 100 == 0;
        participating > floor || (participating == floor && exact)
    }
}
