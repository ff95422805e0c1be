//! Per-account vote commitments.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tally_types::{AccountId, ProposalId, Timestamp, VoteSide};

use crate::error::GovernanceError;

/// Voting power an account put behind one proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCommitment {
    pub amount: u128,
    pub side: VoteSide,
    /// End of the proposal's debate period; the power is free after this.
    pub unlock_time: Timestamp,
}

impl VoteCommitment {
    pub fn is_locked(&self, now: Timestamp) -> bool {
        now < self.unlock_time
    }
}

/// All commitments of a single account, by proposal.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VoterRecord {
    commitments: BTreeMap<ProposalId, VoteCommitment>,
}

/// Keyed store of voter records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VoterRecordStore {
    records: HashMap<AccountId, VoterRecord>,
}

impl VoterRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, voter: &AccountId, proposal: ProposalId) -> bool {
        self.get(voter, proposal).is_some()
    }

    pub fn get(&self, voter: &AccountId, proposal: ProposalId) -> Option<&VoteCommitment> {
        self.records
            .get(voter)
            .and_then(|r| r.commitments.get(&proposal))
    }

    /// Record a commitment. At most one per (voter, proposal).
    pub fn commit(
        &mut self,
        voter: &AccountId,
        proposal: ProposalId,
        commitment: VoteCommitment,
    ) -> Result<(), GovernanceError> {
        let record = self.records.entry(voter.clone()).or_default();
        if record.commitments.contains_key(&proposal) {
            return Err(GovernanceError::AlreadyVoted {
                voter: voter.clone(),
                proposal,
            });
        }
        record.commitments.insert(proposal, commitment);
        Ok(())
    }

    /// Every commitment `voter` has made, in proposal order.
    pub fn commitments(&self, voter: &AccountId) -> Vec<(ProposalId, VoteCommitment)> {
        self.records
            .get(voter)
            .map(|r| r.commitments.iter().map(|(id, c)| (*id, *c)).collect())
            .unwrap_or_default()
    }

    /// Power that must stay deposited at `now`, and when all of it frees up.
    ///
    /// Commitments to different proposals share the same deposit, so the lock
    /// is the largest still-locked amount, not their sum.
    pub fn locked_amount(&self, voter: &AccountId, now: Timestamp) -> Option<(u128, Timestamp)> {
        let record = self.records.get(voter)?;
        record
            .commitments
            .values()
            .filter(|c| c.is_locked(now))
            .fold(None, |acc, c| match acc {
                None => Some((c.amount, c.unlock_time)),
                Some((amount, unlock)) => {
                    Some((amount.max(c.amount), unlock.max(c.unlock_time)))
                }
            })
    }
}
