//! Scenario replay for the Tally governance engine.
//!
//! A scenario is a TOML list of steps (mint, approve, deposit, vote, advance
//! the clock, finalize, ...) run against a [`GovernanceEngine`] wired to the
//! nullable ledger, clock and call target.
//!
//! [`GovernanceEngine`]: tally_governance::GovernanceEngine

pub mod scenario;

pub use scenario::{format_period, Report, Scenario, Simulation, Step, StepOutcome};
