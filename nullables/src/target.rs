//! Nullable call target — records every invocation.

use std::collections::HashSet;
use std::sync::Mutex;
use tally_external::{Executable, ExecutionError};
use tally_types::{AccountId, CallPayload};

/// A single recorded call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub target: AccountId,
    pub payload: CallPayload,
}

/// A call target for testing.
///
/// Every call is recorded, including ones configured to revert.
pub struct NullTarget {
    invocations: Mutex<Vec<Invocation>>,
    reverting: Mutex<HashSet<AccountId>>,
}

impl NullTarget {
    pub fn new() -> Self {
        Self {
            invocations: Mutex::new(Vec::new()),
            reverting: Mutex::new(HashSet::new()),
        }
    }

    /// Make every future call to `target` revert.
    pub fn revert_on(&self, target: &AccountId) {
        self.reverting.lock().unwrap().insert(target.clone());
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

impl Default for NullTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl Executable for NullTarget {
    fn invoke(&self, target: &AccountId, payload: &CallPayload) -> Result<(), ExecutionError> {
        self.invocations.lock().unwrap().push(Invocation {
            target: target.clone(),
            payload: payload.clone(),
        });
        if self.reverting.lock().unwrap().contains(target) {
            return Err(ExecutionError::Reverted {
                target: target.clone(),
                reason: "configured to revert".to_string(),
            });
        }
        Ok(())
    }
}
