// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::CounterError;

/// The counter state. A freshly deployed counter holds zero.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct Counter {
    count: u64,
}

impl Counter {
    /// Creates a counter holding zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current count.
    pub fn get(&self) -> u64 {
        self.count
    }

    /// Returns the current count. Same as [`Counter::get`].
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Adds one to the count.
    pub fn increment(&mut self) -> Result<(), CounterError> {
        self.count = self.count.checked_add(1).ok_or(CounterError::Overflow)?;
        Ok(())
    }

    /// Subtracts one from the count, failing if it is already zero.
    pub fn decrement(&mut self) -> Result<(), CounterError> {
        self.count = self
            .count
            .checked_sub(1)
            .ok_or(CounterError::BelowZero)?;
        Ok(())
    }

    /// Sets the count back to zero.
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::Counter;
    use crate::CounterError;

    #[test]
    fn starts_at_zero() {
        let counter = Counter::new();
        assert_eq!(counter.get(), 0);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn decrement_at_zero_leaves_count_unchanged() {
        let mut counter = Counter::new();

        assert_matches!(counter.decrement(), Err(CounterError::BelowZero));
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn increment_at_maximum_overflows() {
        let mut counter = Counter { count: u64::MAX };

        assert_matches!(counter.increment(), Err(CounterError::Overflow));
        assert_eq!(counter.count(), u64::MAX);
    }

    #[test]
    fn reset_from_any_value() {
        let mut counter = Counter { count: 9_473 };
        counter.reset();
        assert_eq!(counter, Counter::new());
    }
}
