//! Proposals and the store that owns them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tally_types::{AccountId, CallPayload, ProposalId, Timestamp, VoteSide};

use crate::error::GovernanceError;

/// Lifecycle of a proposal. `Approved` and `Rejected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProposalStatus {
    /// Created; collecting votes until finalized.
    Pending = 0,
    /// Quorum and majority reached; the call was dispatched.
    Approved = 1,
    /// Quorum or majority missed; nothing was executed.
    Rejected = 2,
}

impl ProposalStatus {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chairperson proposal to call `target` with `call_payload`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub call_payload: CallPayload,
    pub target: AccountId,
    /// Informational only.
    pub description: String,
    pub start_time: Timestamp,
    pub for_votes: u128,
    pub against_votes: u128,
    pub status: ProposalStatus,
}

impl Proposal {
    /// When the debate period ends and finalization becomes possible.
    pub fn deadline(&self, debating_period_secs: u64) -> Timestamp {
        self.start_time.plus_secs(debating_period_secs)
    }

    /// Whether the debate period has ended at `now`.
    pub fn debate_elapsed(&self, debating_period_secs: u64, now: Timestamp) -> bool {
        self.start_time.has_expired(debating_period_secs, now)
    }

    /// Total weight cast on either side.
    pub fn participation(&self) -> u128 {
        // Tallies are not bounded by current deposits: power can be withdrawn
        // after voting and deposited again elsewhere. A saturated sum still
        // meets any quorum.
        self.for_votes.saturating_add(self.against_votes)
    }

    /// Add `amount` to the tally for `side`.
    pub fn record_vote(&mut self, side: VoteSide, amount: u128) -> Result<(), GovernanceError> {
        let tally = match side {
            VoteSide::For => &mut self.for_votes,
            VoteSide::Against => &mut self.against_votes,
        };
        *tally = tally.checked_add(amount).ok_or(GovernanceError::Overflow)?;
        Ok(())
    }
}

/// Every proposal ever created, keyed by sequential id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProposalStore {
    proposals: BTreeMap<ProposalId, Proposal>,
    /// Id of the most recently created proposal (0 before the first).
    last_id: ProposalId,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new pending proposal and return its id.
    pub fn create(
        &mut self,
        call_payload: CallPayload,
        target: AccountId,
        description: String,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        let id = self.last_id.checked_add(1).ok_or(GovernanceError::Overflow)?;
        self.proposals.insert(
            id,
            Proposal {
                id,
                call_payload,
                target,
                description,
                start_time: now,
                for_votes: 0,
                against_votes: 0,
                status: ProposalStatus::Pending,
            },
        );
        self.last_id = id;
        Ok(id)
    }

    pub fn get(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    pub fn get_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, GovernanceError> {
        self.proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    /// All proposals in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn last_id(&self) -> ProposalId {
        self.last_id
    }
}
