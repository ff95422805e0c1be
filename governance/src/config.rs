//! Governance configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tally_types::AccountId;

use crate::error::GovernanceError;
use crate::params::{GovernanceParams, WithdrawalPolicy};

/// Configuration for a governance engine.
///
/// Loaded from TOML via [`GovernanceConfig::from_toml_file`] or built
/// programmatically, then frozen into [`GovernanceParams`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// The only account allowed to create proposals. Required.
    pub chairperson: AccountId,

    /// Percentage of total deposited power that must vote.
    #[serde(default = "default_quorum_percent")]
    pub minimum_quorum_percent: u8,

    /// Length of the debate period in seconds.
    #[serde(default = "default_debating_period_secs")]
    pub debating_period_secs: u64,

    /// "unrestricted" or "lock_committed".
    #[serde(default)]
    pub withdrawal_policy: WithdrawalPolicy,

    /// Reject votes once the debate period has elapsed.
    #[serde(default)]
    pub close_voting_at_deadline: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_quorum_percent() -> u8 {
    40
}

fn default_debating_period_secs() -> u64 {
    3600
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernanceConfig {
    pub fn new(chairperson: AccountId) -> Self {
        Self {
            chairperson,
            minimum_quorum_percent: default_quorum_percent(),
            debating_period_secs: default_debating_period_secs(),
            withdrawal_policy: WithdrawalPolicy::default(),
            close_voting_at_deadline: false,
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, GovernanceError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GovernanceError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GovernanceError> {
        toml::from_str(s).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GovernanceError> {
        toml::to_string_pretty(self).map_err(|e| GovernanceError::Config(e.to_string()))
    }

    /// Validate and freeze into engine parameters.
    pub fn into_params(self) -> Result<GovernanceParams, GovernanceError> {
        let params = GovernanceParams {
            chairperson: self.chairperson,
            minimum_quorum_percent: self.minimum_quorum_percent,
            debating_period_secs: self.debating_period_secs,
            withdrawal_policy: self.withdrawal_policy,
            close_voting_at_deadline: self.close_voting_at_deadline,
        };
        params.validate()?;
        Ok(params)
    }
}
