//! [`tracing::Span`] constructors for governance commands.
//!
//! Consistent span names and fields make it easy to filter and correlate
//! traces for one account or one proposal.

use tally_types::{AccountId, ProposalId, VoteSide};
use tracing::{info_span, Span};

pub fn deposit_span(account: &AccountId, amount: u128) -> Span {
    info_span!("deposit", account = %account, amount = %amount)
}

pub fn withdraw_span(account: &AccountId, amount: u128) -> Span {
    info_span!("withdraw", account = %account, amount = %amount)
}

pub fn create_proposal_span(caller: &AccountId, target: &AccountId) -> Span {
    info_span!("create_proposal", caller = %caller, target = %target)
}

pub fn vote_span(voter: &AccountId, proposal: ProposalId, side: VoteSide) -> Span {
    info_span!("vote", voter = %voter, proposal = proposal, side = %side)
}

pub fn end_proposal_span(caller: &AccountId, proposal: ProposalId) -> Span {
    info_span!("end_proposal", caller = %caller, proposal = proposal)
}
