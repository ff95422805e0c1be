//! Proposal identifiers and vote sides.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential proposal identifier. The first proposal is `1`; `0` is never assigned.
pub type ProposalId = u64;

/// Which tally a vote's weight is added to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteSide {
    For,
    Against,
}

impl VoteSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::For => "for",
            Self::Against => "against",
        }
    }
}

impl From<bool> for VoteSide {
    /// `true` votes for the proposal, `false` against.
    fn from(in_favor: bool) -> Self {
        if in_favor {
            Self::For
        } else {
            Self::Against
        }
    }
}

impl fmt::Display for VoteSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
