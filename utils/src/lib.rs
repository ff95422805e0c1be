//! Shared utilities for the Tally workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat};
