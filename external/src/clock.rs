//! Time source for the debate-window gate.

use tally_types::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
