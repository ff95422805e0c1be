//! Scenario format and runner.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tally_governance::{GovernanceEngine, GovernanceParams, Proposal};
use tally_nullables::{NullClock, NullLedger, NullTarget};
use tally_types::{AccountId, CallPayload, ProposalId, VoteSide};
use tracing::{info, warn};

/// One scripted action.
///
/// Amounts are `u64` because TOML integers are 64-bit; they are widened to
/// the engine's `u128` when applied.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Credit tokens on the ledger.
    Mint { account: AccountId, amount: u64 },
    /// Authorize the engine to pull tokens.
    Approve { account: AccountId, amount: u64 },
    Deposit { account: AccountId, amount: u64 },
    Withdraw { account: AccountId, amount: u64 },
    Propose {
        caller: AccountId,
        target: AccountId,
        /// Hex-encoded call data.
        #[serde(default)]
        payload: String,
        #[serde(default)]
        description: String,
    },
    Vote {
        voter: AccountId,
        proposal: ProposalId,
        amount: u64,
        side: VoteSide,
    },
    /// Move the clock forward.
    Advance { secs: u64 },
    End { caller: AccountId, proposal: ProposalId },
    /// Make calls to `target` fail from now on.
    RevertOn { target: AccountId },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "mint",
            Self::Approve { .. } => "approve",
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::Propose { .. } => "propose",
            Self::Vote { .. } => "vote",
            Self::Advance { .. } => "advance",
            Self::End { .. } => "end",
            Self::RevertOn { .. } => "revert_on",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Clock value (Unix seconds) before the first step.
    #[serde(default)]
    pub start_time: u64,
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("invalid scenario")
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}

/// What one step produced. Engine rejections are outcomes, not failures.
#[derive(Clone, Debug)]
pub struct StepOutcome {
    pub index: usize,
    pub action: &'static str,
    pub result: Result<String, String>,
}

/// Final state after a scenario has run.
#[derive(Clone, Debug)]
pub struct Report {
    pub outcomes: Vec<StepOutcome>,
    pub proposals: Vec<Proposal>,
    pub total_deposited: u128,
    pub executed_calls: usize,
}

impl Report {
    pub fn rejected_steps(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// An engine wired to nullable collaborators.
pub struct Simulation {
    engine: GovernanceEngine,
    ledger: Arc<NullLedger>,
    target: Arc<NullTarget>,
    clock: Arc<NullClock>,
}

impl Simulation {
    pub fn new(params: GovernanceParams, start_time: u64) -> Self {
        let ledger = Arc::new(NullLedger::new());
        let target = Arc::new(NullTarget::new());
        let clock = Arc::new(NullClock::new(start_time));
        let engine = GovernanceEngine::new(params, ledger.clone(), target.clone(), clock.clone());
        Self {
            engine,
            ledger,
            target,
            clock,
        }
    }

    pub fn engine(&self) -> &GovernanceEngine {
        &self.engine
    }

    /// Run every step in order.
    ///
    /// Fails only on a malformed step; rejected commands are recorded in the report.
    pub fn run(&self, scenario: &Scenario) -> anyhow::Result<Report> {
        let mut outcomes = Vec::with_capacity(scenario.steps.len());
        for (index, step) in scenario.steps.iter().enumerate() {
            let result = self.apply(step).with_context(|| format!("step {index}"))?;
            match &result {
                Ok(msg) => info!(index, action = step.name(), "{msg}"),
                Err(msg) => warn!(index, action = step.name(), "rejected: {msg}"),
            }
            outcomes.push(StepOutcome {
                index,
                action: step.name(),
                result,
            });
        }
        Ok(Report {
            outcomes,
            proposals: self.engine.proposals(),
            total_deposited: self.engine.total_deposited(),
            executed_calls: self.target.invocation_count(),
        })
    }

    fn apply(&self, step: &Step) -> anyhow::Result<Result<String, String>> {
        let result = match step {
            Step::Mint { account, amount } => {
                self.ledger.mint(account, u128::from(*amount));
                Ok(format!("{account} holds {}", self.engine.ledger_balance(account)))
            }
            Step::Approve { account, amount } => {
                self.ledger.approve(account, u128::from(*amount));
                Ok(format!("{account} approved {amount}"))
            }
            Step::Deposit { account, amount } => self
                .engine
                .deposit(account, u128::from(*amount))
                .map(|b| format!("{account} deposited {amount}, power {b}")),
            Step::Withdraw { account, amount } => self
                .engine
                .withdraw(account, u128::from(*amount))
                .map(|b| format!("{account} withdrew {amount}, power {b}")),
            Step::Propose {
                caller,
                target,
                payload,
                description,
            } => {
                let Some(payload) = CallPayload::from_hex(payload) else {
                    bail!("payload {payload:?} is not valid hex");
                };
                self.engine
                    .create_proposal(caller, payload, target.clone(), description.clone())
                    .map(|id| format!("proposal {id} created"))
            }
            Step::Vote {
                voter,
                proposal,
                amount,
                side,
            } => self
                .engine
                .vote(voter, *proposal, u128::from(*amount), *side)
                .map(|c| format!("{voter} voted {side} with {}", c.amount)),
            Step::Advance { secs } => {
                self.clock.advance(*secs);
                Ok(format!("advanced {}", format_period(*secs)))
            }
            Step::End { caller, proposal } => self
                .engine
                .end_proposal(caller, *proposal)
                .map(|status| format!("proposal {proposal} {status}")),
            Step::RevertOn { target } => {
                self.target.revert_on(target);
                Ok(format!("calls to {target} will revert"))
            }
        };
        Ok(result.map_err(|e| e.to_string()))
    }
}

/// Render a clock offset as every non-zero unit, largest first
/// (`"1d 2h 5s"`). Zero renders as `"0s"`.
pub fn format_period(secs: u64) -> String {
    const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];
    let mut rest = secs;
    let parts: Vec<String> = UNITS
        .iter()
        .filter_map(|&(size, unit)| {
            let n = rest / size;
            rest %= size;
            (n > 0).then(|| format!("{n}{unit}"))
        })
        .collect();
    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}
