//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the governance engine (clock, token ledger, call
//! target) is abstracted behind a trait in `tally-external`. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and simulations.

pub mod clock;
pub mod ledger;
pub mod target;

pub use clock::NullClock;
pub use ledger::NullLedger;
pub use target::{Invocation, NullTarget};
