//! Engine state persistence.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tally_external::{Clock, Executable, TokenLedger};

use crate::engine::{GovernanceEngine, GovernanceState};
use crate::error::GovernanceError;
use crate::params::GovernanceParams;
use crate::proposal::ProposalStore;
use crate::voter_record::VoterRecordStore;
use crate::voting_power::VotingPowerLedger;

/// Serializable copy of everything the engine owns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceSnapshot {
    pub params: GovernanceParams,
    pub voting_power: VotingPowerLedger,
    pub proposals: ProposalStore,
    pub voters: VoterRecordStore,
}

impl GovernanceEngine {
    /// Consistent copy of the engine's state.
    pub fn snapshot(&self) -> GovernanceSnapshot {
        let state = self.lock_state();
        GovernanceSnapshot {
            params: self.params().clone(),
            voting_power: state.voting_power.clone(),
            proposals: state.proposals.clone(),
            voters: state.voters.clone(),
        }
    }

    /// Serialize the engine's state to bytes.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(&self.snapshot()).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// Rebuild an engine from [`GovernanceEngine::save_state`] bytes.
    ///
    /// Event listeners are not part of the snapshot and must be re-registered.
    pub fn restore(
        data: &[u8],
        ledger: Arc<dyn TokenLedger>,
        executor: Arc<dyn Executable>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GovernanceError> {
        let snapshot: GovernanceSnapshot =
            bincode::deserialize(data).map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        Self::from_snapshot(snapshot, ledger, executor, clock)
    }

    pub fn from_snapshot(
        snapshot: GovernanceSnapshot,
        ledger: Arc<dyn TokenLedger>,
        executor: Arc<dyn Executable>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GovernanceError> {
        snapshot.params.validate()?;
        if !snapshot.voting_power.is_consistent() {
            return Err(GovernanceError::Snapshot(
                "deposit total does not match per-account deposits".to_string(),
            ));
        }
        let state = GovernanceState {
            voting_power: snapshot.voting_power,
            proposals: snapshot.proposals,
            voters: snapshot.voters,
        };
        Ok(Self::with_state(snapshot.params, ledger, executor, clock, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::ProposalStatus;
    use tally_nullables::{NullClock, NullLedger, NullTarget};
    use tally_types::{AccountId, CallPayload, VoteSide};

    #[test]
    fn restored_engine_continues_where_it_left_off() {
        let ledger = Arc::new(NullLedger::new());
        let target = Arc::new(NullTarget::new());
        let clock = Arc::new(NullClock::new(0));
        let chair = AccountId::new("chair");
        let alice = AccountId::new("alice");

        let engine = GovernanceEngine::new(
            GovernanceParams::new(chair.clone(), 40, 60).unwrap(),
            ledger.clone(),
            target.clone(),
            clock.clone(),
        );
        ledger.mint(&alice, 1_000);
        ledger.approve(&alice, 1_000);
        engine.deposit(&alice, 1_000).unwrap();
        let id = engine
            .create_proposal(&chair, CallPayload::new(vec![9]), AccountId::new("t"), "x")
            .unwrap();
        engine.vote(&alice, id, 700, VoteSide::For).unwrap();

        let bytes = engine.save_state().unwrap();
        let restored =
            GovernanceEngine::restore(&bytes, ledger.clone(), target.clone(), clock.clone())
                .unwrap();

        assert_eq!(restored.voting_power(&alice), 1_000);
        assert_eq!(restored.proposal(id).unwrap().for_votes, 700);
        assert!(matches!(
            restored.vote(&alice, id, 1, VoteSide::For),
            Err(GovernanceError::AlreadyVoted { .. })
        ));

        clock.advance(60);
        assert_eq!(
            restored.end_proposal(&alice, id).unwrap(),
            ProposalStatus::Approved
        );
        let next = restored
            .create_proposal(&chair, CallPayload::default(), AccountId::new("t"), "y")
            .unwrap();
        assert_eq!(next, 2);
    }

    #[test]
    fn inconsistent_deposit_total_is_rejected() {
        // Same field layout as `VotingPowerLedger`, with a total that
        // disagrees with the deposits.
        #[derive(Serialize)]
        struct TamperedLedger {
            deposits: std::collections::HashMap<AccountId, u128>,
            total: u128,
        }
        let tampered = TamperedLedger {
            deposits: [(AccountId::new("alice"), 100)].into_iter().collect(),
            total: 0,
        };
        let voting_power: VotingPowerLedger =
            bincode::deserialize(&bincode::serialize(&tampered).unwrap()).unwrap();

        let snapshot = GovernanceSnapshot {
            params: GovernanceParams::new(AccountId::new("chair"), 40, 60).unwrap(),
            voting_power,
            proposals: ProposalStore::default(),
            voters: VoterRecordStore::default(),
        };
        let result = GovernanceEngine::from_snapshot(
            snapshot,
            Arc::new(NullLedger::new()),
            Arc::new(NullTarget::new()),
            Arc::new(NullClock::new(0)),
        );
        assert!(matches!(result, Err(GovernanceError::Snapshot(_))));
    }

    #[test]
    fn garbage_bytes_are_a_snapshot_error() {
        let result = GovernanceEngine::restore(
            &[0xff, 0x01],
            Arc::new(NullLedger::new()),
            Arc::new(NullTarget::new()),
            Arc::new(NullClock::new(0)),
        );
        assert!(matches!(result, Err(GovernanceError::Snapshot(_))));
    }
}
