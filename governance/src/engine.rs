//! Core governance engine — deposits, proposals, weighted votes and finalization.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tally_external::{Clock, Executable, TokenLedger};
use tally_types::{AccountId, CallPayload, ProposalId, Timestamp, VoteSide};
use tracing::{debug, info, warn};

use crate::error::GovernanceError;
use crate::events::{EventBus, GovernanceEvent};
use crate::params::{GovernanceParams, WithdrawalPolicy};
use crate::proposal::{Proposal, ProposalStatus, ProposalStore};
use crate::spans;
use crate::voter_record::{VoteCommitment, VoterRecordStore};
use crate::voting_power::VotingPowerLedger;

/// Everything the engine mutates, behind one lock.
#[derive(Default)]
pub(crate) struct GovernanceState {
    pub(crate) voting_power: VotingPowerLedger,
    pub(crate) proposals: ProposalStore,
    pub(crate) voters: VoterRecordStore,
}

/// The governance engine.
///
/// All commands serialize on a single state lock, so tallies, balances and
/// status transitions never lose updates. Ledger transfers run while the lock
/// is held; the approved call runs after it is released, by the one caller
/// that moved the proposal out of `Pending`.
pub struct GovernanceEngine {
    params: GovernanceParams,
    ledger: Arc<dyn TokenLedger>,
    executor: Arc<dyn Executable>,
    clock: Arc<dyn Clock>,
    state: Mutex<GovernanceState>,
    events: EventBus,
}

impl GovernanceEngine {
    pub fn new(
        params: GovernanceParams,
        ledger: Arc<dyn TokenLedger>,
        executor: Arc<dyn Executable>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_state(params, ledger, executor, clock, GovernanceState::default())
    }

    pub(crate) fn with_state(
        params: GovernanceParams,
        ledger: Arc<dyn TokenLedger>,
        executor: Arc<dyn Executable>,
        clock: Arc<dyn Clock>,
        state: GovernanceState,
    ) -> Self {
        info!(
            chairperson = %params.chairperson,
            quorum_percent = params.minimum_quorum_percent,
            debating_period_secs = params.debating_period_secs,
            withdrawal_policy = ?params.withdrawal_policy,
            "governance engine initialised"
        );
        Self {
            params,
            ledger,
            executor,
            clock,
            state: Mutex::new(state),
            events: EventBus::new(),
        }
    }

    /// Register a listener for [`GovernanceEvent`]s.
    ///
    /// Events are emitted after the state lock is released, so listeners may
    /// query or command the engine. Under concurrent callers, delivery order
    /// is not guaranteed to match the order in which state changed.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, GovernanceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Commands ───────────────────────────────────────────────────────

    /// Move `amount` tokens from `account` into custody as voting power.
    ///
    /// Returns the account's new deposited balance.
    pub fn deposit(&self, account: &AccountId, amount: u128) -> Result<u128, GovernanceError> {
        let _span = spans::deposit_span(account, amount).entered();
        if amount == 0 {
            return Err(GovernanceError::ZeroAmount);
        }

        let balance = {
            let mut state = self.lock_state();
            let balance = state.voting_power.credit(account, amount)?;
            if let Err(e) = self.ledger.pull(account, amount) {
                state.voting_power.debit(account, amount)?;
                warn!(error = %e, "deposit rejected by ledger");
                return Err(e.into());
            }
            balance
        };

        info!(balance = %balance, "deposited");
        self.events.emit(&GovernanceEvent::Deposited {
            account: account.clone(),
            amount,
            balance,
        });
        Ok(balance)
    }

    /// Return `amount` of deposited power to `account` as tokens.
    ///
    /// Returns the account's new deposited balance.
    pub fn withdraw(&self, account: &AccountId, amount: u128) -> Result<u128, GovernanceError> {
        let _span = spans::withdraw_span(account, amount).entered();
        let now = self.clock.now();

        let balance = {
            let mut state = self.lock_state();
            let available = state.voting_power.balance_of(account);
            if amount > available {
                warn!(available = %available, "withdrawal exceeds deposit");
                return Err(GovernanceError::InsufficientVotingPower {
                    account: account.clone(),
                    requested: amount,
                    available,
                });
            }
            if self.params.withdrawal_policy == WithdrawalPolicy::LockCommitted {
                if let Some((locked, unlock_at)) = state.voters.locked_amount(account, now) {
                    if available - amount < locked {
                        warn!(locked = %locked, unlock_at = %unlock_at, "withdrawal would free committed power");
                        return Err(GovernanceError::VotingPowerLocked {
                            account: account.clone(),
                            locked,
                            unlock_at,
                        });
                    }
                }
            }

            let balance = state.voting_power.debit(account, amount)?;
            if let Err(e) = self.ledger.push(account, amount) {
                state.voting_power.credit(account, amount)?;
                warn!(error = %e, "ledger refused to release tokens");
                return Err(e.into());
            }
            balance
        };

        info!(balance = %balance, "withdrew");
        self.events.emit(&GovernanceEvent::Withdrawn {
            account: account.clone(),
            amount,
            balance,
        });
        Ok(balance)
    }

    /// Create a proposal to call `target` with `call_payload`. Chairperson only.
    pub fn create_proposal(
        &self,
        caller: &AccountId,
        call_payload: CallPayload,
        target: AccountId,
        description: impl Into<String>,
    ) -> Result<ProposalId, GovernanceError> {
        let _span = spans::create_proposal_span(caller, &target).entered();
        if *caller != self.params.chairperson {
            warn!("proposal rejected: caller is not the chairperson");
            return Err(GovernanceError::Unauthorized {
                caller: caller.clone(),
            });
        }

        let description = description.into();
        let now = self.clock.now();
        let id = self.lock_state().proposals.create(
            call_payload,
            target.clone(),
            description.clone(),
            now,
        )?;

        info!(
            id,
            start_time = %now,
            deadline = %now.plus_secs(self.params.debating_period_secs),
            "proposal created"
        );
        self.events.emit(&GovernanceEvent::ProposalCreated {
            id,
            target,
            description,
        });
        Ok(id)
    }

    /// Put `amount` of `voter`'s deposited power behind `side` of a proposal.
    ///
    /// The same deposit may back votes on several proposals; each proposal
    /// accepts one vote per account.
    pub fn vote(
        &self,
        voter: &AccountId,
        id: ProposalId,
        amount: u128,
        side: VoteSide,
    ) -> Result<VoteCommitment, GovernanceError> {
        let _span = spans::vote_span(voter, id, side).entered();
        let now = self.clock.now();

        let commitment = {
            let mut guard = self.lock_state();
            let state = &mut *guard;

            let proposal = state.proposals.get(id)?;
            let available = state.voting_power.balance_of(voter);
            if amount > available {
                warn!(available = %available, requested = %amount, "vote exceeds deposit");
                return Err(GovernanceError::InsufficientVotingPower {
                    account: voter.clone(),
                    requested: amount,
                    available,
                });
            }
            if state.voters.has_voted(voter, id) {
                warn!("duplicate vote rejected");
                return Err(GovernanceError::AlreadyVoted {
                    voter: voter.clone(),
                    proposal: id,
                });
            }
            if proposal.status.is_terminal() {
                return Err(GovernanceError::AlreadyFinalized {
                    proposal: id,
                    status: proposal.status,
                });
            }
            let period = self.params.debating_period_secs;
            if self.params.close_voting_at_deadline && proposal.debate_elapsed(period, now) {
                return Err(GovernanceError::VotingClosed(id));
            }
            let deadline = proposal.deadline(period);

            let commitment = VoteCommitment {
                amount,
                side,
                unlock_time: deadline,
            };
            // Tally first: it is the only step that can fail.
            state.proposals.get_mut(id)?.record_vote(side, amount)?;
            state.voters.commit(voter, id, commitment)?;
            commitment
        };

        info!(amount = %amount, unlock_time = %commitment.unlock_time, "vote recorded");
        self.events.emit(&GovernanceEvent::Voted {
            id,
            voter: voter.clone(),
            side,
            amount,
        });
        Ok(commitment)
    }

    /// Finalize a proposal whose debate period has elapsed.
    ///
    /// Sets `Approved` when quorum is met and `for > against`, otherwise
    /// `Rejected`. An approved proposal's call is dispatched exactly once; if
    /// it fails the proposal remains `Approved` and the failure is returned as
    /// [`GovernanceError::TargetExecutionFailed`].
    pub fn end_proposal(
        &self,
        caller: &AccountId,
        id: ProposalId,
    ) -> Result<ProposalStatus, GovernanceError> {
        let _span = spans::end_proposal_span(caller, id).entered();
        let now = self.clock.now();

        let (status, for_votes, against_votes, call) = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            let total_deposited = state.voting_power.total();
            let proposal = state.proposals.get_mut(id)?;

            let period = self.params.debating_period_secs;
            if !proposal.debate_elapsed(period, now) {
                let deadline = proposal.deadline(period);
                debug!(ends_at = %deadline, "debate period still running");
                return Err(GovernanceError::DebatePeriodNotElapsed {
                    proposal: id,
                    ends_at: deadline,
                });
            }
            if proposal.status.is_terminal() {
                warn!(status = %proposal.status, "proposal already finalized");
                return Err(GovernanceError::AlreadyFinalized {
                    proposal: id,
                    status: proposal.status,
                });
            }

            let quorum = self
                .params
                .quorum_met(proposal.participation(), total_deposited);
            let majority = proposal.for_votes > proposal.against_votes;
            proposal.status = if quorum && majority {
                ProposalStatus::Approved
            } else {
                ProposalStatus::Rejected
            };
            info!(
                status = %proposal.status,
                for_votes = %proposal.for_votes,
                against_votes = %proposal.against_votes,
                total_deposited = %total_deposited,
                quorum,
                "proposal finalized"
            );

            let call = (proposal.status == ProposalStatus::Approved)
                .then(|| (proposal.target.clone(), proposal.call_payload.clone()));
            (proposal.status, proposal.for_votes, proposal.against_votes, call)
        };

        self.events.emit(&GovernanceEvent::ProposalFinalized {
            id,
            status,
            for_votes,
            against_votes,
        });

        if let Some((target, payload)) = call {
            if let Err(e) = self.executor.invoke(&target, &payload) {
                warn!(target = %target, error = %e, "approved call failed");
                self.events.emit(&GovernanceEvent::ExecutionFailed {
                    id,
                    reason: e.to_string(),
                });
                return Err(GovernanceError::TargetExecutionFailed {
                    proposal: id,
                    source: e,
                });
            }
            info!(target = %target, payload_len = payload.len(), "approved call executed");
        }
        Ok(status)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn proposal(&self, id: ProposalId) -> Result<Proposal, GovernanceError> {
        self.lock_state().proposals.get(id).cloned()
    }

    /// All proposals in ascending id order.
    pub fn proposals(&self) -> Vec<Proposal> {
        self.lock_state().proposals.iter().cloned().collect()
    }

    pub fn proposal_count(&self) -> usize {
        self.lock_state().proposals.len()
    }

    /// When the proposal's debate period ends.
    pub fn proposal_deadline(&self, id: ProposalId) -> Result<Timestamp, GovernanceError> {
        let state = self.lock_state();
        Ok(state.proposals.get(id)?.deadline(self.params.debating_period_secs))
    }

    pub fn voting_power(&self, account: &AccountId) -> u128 {
        self.lock_state().voting_power.balance_of(account)
    }

    /// Total deposited power across all accounts.
    pub fn total_deposited(&self) -> u128 {
        self.lock_state().voting_power.total()
    }

    pub fn vote_commitment(&self, voter: &AccountId, id: ProposalId) -> Option<VoteCommitment> {
        self.lock_state().voters.get(voter, id).copied()
    }

    pub fn commitments(&self, voter: &AccountId) -> Vec<(ProposalId, VoteCommitment)> {
        self.lock_state().voters.commitments(voter)
    }

    /// Token balance of `account` on the external ledger.
    pub fn ledger_balance(&self, account: &AccountId) -> u128 {
        self.ledger.balance_of(account)
    }
}
