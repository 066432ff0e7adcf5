// Copyright (c) Artmint Developers
// SPDX-License-Identifier: Apache-2.0

//! Behavioural tests for the counter.

use alloy_primitives::Address;
use artmint_counter::{CounterContract, CounterError, CounterOperation};
use assert_matches::assert_matches;
use test_strategy::proptest;

const OWNER: Address = Address::repeat_byte(0x01);
const OTHER_ACCOUNT: Address = Address::repeat_byte(0x02);

fn operation_from_byte(byte: u8) -> CounterOperation {
    match byte % 3 {
        0 => CounterOperation::Increment,
        1 => CounterOperation::Decrement,
        _ => CounterOperation::Reset,
    }
}

#[test_log::test]
fn deployment_starts_at_zero() {
    let counter = CounterContract::new();
    assert_eq!(counter.count(), 0);
    assert_eq!(counter.state().get(), 0);
}

#[test_log::test]
fn increment_then_decrement() {
    let mut counter = CounterContract::new();

    counter
        .execute_operation(OWNER, CounterOperation::Increment)
        .unwrap();
    assert_eq!(counter.count(), 1);
    counter
        .execute_operation(OWNER, CounterOperation::Increment)
        .unwrap();
    assert_eq!(counter.count(), 2);

    counter
        .execute_operation(OWNER, CounterOperation::Decrement)
        .unwrap();
    assert_eq!(counter.count(), 1);
}

#[test_log::test]
fn decrement_below_zero_reverts() {
    let mut counter = CounterContract::new();

    let error = counter
        .execute_operation(OWNER, CounterOperation::Decrement)
        .unwrap_err();

    assert_eq!(error, CounterError::BelowZero);
    assert_eq!(error.to_string(), "Counter: cannot decrement below zero");
    assert_eq!(counter.count(), 0);
}

#[test_log::test]
fn sequence_of_operations() {
    let mut counter = CounterContract::new();

    for _ in 0..3 {
        counter
            .execute_operation(OWNER, CounterOperation::Increment)
            .unwrap();
    }
    assert_eq!(counter.count(), 3);

    counter
        .execute_operation(OWNER, CounterOperation::Decrement)
        .unwrap();
    assert_eq!(counter.count(), 2);

    counter
        .execute_operation(OWNER, CounterOperation::Reset)
        .unwrap();
    assert_eq!(counter.count(), 0);
}

#[test_log::test]
fn any_account_can_interact() {
    let mut counter = CounterContract::new();

    let event = counter
        .execute_operation(OTHER_ACCOUNT, CounterOperation::Increment)
        .unwrap();
    assert_eq!(event.caller(), OTHER_ACCOUNT);
    assert_eq!(counter.count(), 1);

    counter
        .execute_operation(OTHER_ACCOUNT, CounterOperation::Decrement)
        .unwrap();
    assert_eq!(counter.count(), 0);

    assert_matches!(
        counter.execute_operation(OTHER_ACCOUNT, CounterOperation::Decrement),
        Err(CounterError::BelowZero)
    );
}

/// Decrements are only issued while the count is positive, so the final count is the
/// number of increments minus the number of decrements.
#[proptest]
fn count_is_increments_minus_decrements(steps: Vec<bool>) {
    let mut counter = CounterContract::new();
    let mut increments = 0_u64;
    let mut decrements = 0_u64;

    for increment in steps {
        if increment {
            counter
                .execute_operation(OWNER, CounterOperation::Increment)
                .unwrap();
            increments += 1;
        } else if counter.count() > 0 {
            counter
                .execute_operation(OWNER, CounterOperation::Decrement)
                .unwrap();
            decrements += 1;
        }
    }

    assert_eq!(counter.count(), increments - decrements);
}

#[proptest]
fn reset_always_yields_zero(#[strategy(0_u16..512)] increments: u16) {
    let mut counter = CounterContract::new();
    for _ in 0..increments {
        counter
            .execute_operation(OWNER, CounterOperation::Increment)
            .unwrap();
    }

    counter
        .execute_operation(OWNER, CounterOperation::Reset)
        .unwrap();

    assert_eq!(counter.count(), 0);
}

/// Replaying the same operations from two different accounts ends in the same state,
/// with the same successes and failures along the way.
#[proptest]
fn caller_does_not_change_outcomes(first: [u8; 20], second: [u8; 20], operations: Vec<u8>) {
    let first = Address::from(first);
    let second = Address::from(second);
    let mut counter_a = CounterContract::new();
    let mut counter_b = CounterContract::new();

    for byte in operations {
        let operation = operation_from_byte(byte);
        let outcome_a = counter_a
            .execute_operation(first, operation)
            .map(|event| event.count());
        let outcome_b = counter_b
            .execute_operation(second, operation)
            .map(|event| event.count());
        assert_eq!(outcome_a, outcome_b);
    }

    assert_eq!(counter_a.state(), counter_b.state());
}
