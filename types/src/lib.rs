//! Fundamental types for the Tally governance engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identifiers, timestamps, proposal identifiers, call payloads and vote sides.

pub mod account;
pub mod payload;
pub mod time;
pub mod vote;

pub use account::AccountId;
pub use payload::CallPayload;
pub use time::Timestamp;
pub use vote::{ProposalId, VoteSide};
