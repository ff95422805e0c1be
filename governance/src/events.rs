//! Events emitted once a governance command has fully applied.

use tally_types::{AccountId, ProposalId, VoteSide};

use crate::proposal::ProposalStatus;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GovernanceEvent {
    Deposited {
        account: AccountId,
        amount: u128,
        balance: u128,
    },
    Withdrawn {
        account: AccountId,
        amount: u128,
        balance: u128,
    },
    ProposalCreated {
        id: ProposalId,
        target: AccountId,
        description: String,
    },
    Voted {
        id: ProposalId,
        voter: AccountId,
        side: VoteSide,
        amount: u128,
    },
    ProposalFinalized {
        id: ProposalId,
        status: ProposalStatus,
        for_votes: u128,
        against_votes: u128,
    },
    /// The approved proposal's call failed. Its status stays `Approved`.
    ExecutionFailed { id: ProposalId, reason: String },
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the thread that issued the command, after the
/// engine state lock has been released. A listener may therefore call back
/// into the engine. Events from commands racing on different threads can be
/// delivered in a different order than the state changes were applied; use
/// the balances and tallies carried in the event, not arrival order.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&GovernanceEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
