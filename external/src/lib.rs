//! Abstract interfaces for the collaborators of the Tally governance engine.
//!
//! The engine depends only on these traits. Production deployments wire in a
//! real token ledger and call dispatcher; tests use the in-memory
//! implementations from `tally-nullables`.

pub mod clock;
pub mod executor;
pub mod ledger;

pub use clock::Clock;
pub use executor::{Executable, ExecutionError};
pub use ledger::{LedgerError, TokenLedger};
