//! Token-weighted governance.
//!
//! Holders deposit tokens to gain voting power, a single chairperson proposes
//! external calls, and deposited power is voted for or against each proposal
//! during a fixed debate period. Once the period has elapsed a proposal is
//! finalized exactly once: `Approved` (and its call dispatched) when enough of
//! the total deposited power took part and `for > against`, otherwise
//! `Rejected`.
//!
//! Key principle: one token = one vote, and the same deposit may back a vote
//! on every open proposal.

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod params;
pub mod proposal;
pub mod snapshot;
pub mod spans;
pub mod voter_record;
pub mod voting_power;

pub use config::GovernanceConfig;
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use events::{EventBus, GovernanceEvent};
pub use params::{GovernanceParams, WithdrawalPolicy};
pub use proposal::{Proposal, ProposalStatus, ProposalStore};
pub use snapshot::GovernanceSnapshot;
pub use voter_record::{VoteCommitment, VoterRecordStore};
pub use voting_power::VotingPowerLedger;
