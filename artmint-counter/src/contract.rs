// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::Address;
use tracing::debug;

use crate::{Counter, CounterError, CounterEvent, CounterOperation};

/// Executes counter operations on behalf of arbitrary callers.
///
/// There is no access control: every account gets the same result for the same
/// operation on the same state.
#[derive(Clone, Debug, Default)]
pub struct CounterContract {
    state: Counter,
}

impl CounterContract {
    /// Deploys a counter holding zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counter state.
    pub fn state(&self) -> &Counter {
        &self.state
    }

    /// Returns the current count.
    pub fn count(&self) -> u64 {
        self.state.count()
    }

    /// Executes `operation` for `caller`.
    ///
    /// A failed operation leaves the state untouched.
    pub fn execute_operation(
        &mut self,
        caller: Address,
        operation: CounterOperation,
    ) -> Result<CounterEvent, CounterError> {
        let previous = self.state.count();
        let event = match operation {
            CounterOperation::Increment => {
                self.state.increment()?;
                CounterEvent::Incremented {
                    caller,
                    previous,
                    count: self.state.count(),
                }
            }
            CounterOperation::Decrement => {
                self.state.decrement()?;
                CounterEvent::Decremented {
                    caller,
                    previous,
                    count: self.state.count(),
                }
            }
            CounterOperation::Reset => {
                self.state.reset();
                CounterEvent::Reset { caller, previous }
            }
        };
        debug!(%caller, ?operation, previous, count = self.state.count(), "Counter updated");
        Ok(event)
    }
}
