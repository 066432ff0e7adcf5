// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

/*! A counter that can be incremented, decremented down to zero, and reset by anyone. */

mod contract;
mod state;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::{contract::CounterContract, state::Counter};

/// An operation on the counter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum CounterOperation {
    /// Adds one.
    Increment,
    /// Subtracts one. Only valid while the count is positive.
    Decrement,
    /// Sets the count back to zero.
    Reset,
}

/// What an executed operation did to the counter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum CounterEvent {
    Incremented {
        caller: Address,
        previous: u64,
        count: u64,
    },
    Decremented {
        caller: Address,
        previous: u64,
        count: u64,
    },
    Reset {
        caller: Address,
        previous: u64,
    },
}

impl CounterEvent {
    /// The account that invoked the operation.
    pub fn caller(&self) -> Address {
        match self {
            CounterEvent::Incremented { caller, .. }
            | CounterEvent::Decremented { caller, .. }
            | CounterEvent::Reset { caller, .. } => *caller,
        }
    }

    /// The count after the operation.
    pub fn count(&self) -> u64 {
        match self {
            CounterEvent::Incremented { count, .. } | CounterEvent::Decremented { count, .. } => {
                *count
            }
            CounterEvent::Reset { .. } => 0,
        }
    }
}

/// An error that can occur while executing a counter operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum CounterError {
    /// The count is zero and cannot be decremented.
    #[error("Counter: cannot decrement below zero")]
    BelowZero,

    /// The count is at its maximum and cannot be incremented.
    #[error("Counter: cannot increment above the maximum value")]
    Overflow,
}
