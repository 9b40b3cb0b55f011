use pretty_assertions::assert_eq;
use soroban_sdk::{testutils::Address as _, vec, Address, IntoVal, Symbol, Val, Vec};

use super::setup::{mint, GeyserTest, MAX_UNLOCK_SCHEDULES, START_TIME};
use crate::{errors::GeyserError, unlock::UnlockSchedule};

#[test]
fn test_lock_creates_schedule() {
    let test = GeyserTest::setup();

    test.lock(1_000, 100);

    assert_eq!(test.geyser.total_locked(), 1_000);
    assert_eq!(test.geyser.total_locked_shares(), 1_000);
    assert_eq!(test.distribution_token.balance(&test.admin), 0);
    assert_eq!(
        test.geyser.unlock_schedules(),
        vec![
            &test.env,
            UnlockSchedule {
                initial_shares: 1_000,
                last_unlock_time: START_TIME,
                end_time: START_TIME + 100,
                duration_sec: 100,
            }
        ]
    );
}

#[test]
fn test_lock_emits_tokens_locked() {
    let test = GeyserTest::setup();

    test.lock(1_000, 100);

    assert_eq!(
        test.last_geyser_events(1),
        vec![
            &test.env,
            (
                test.geyser.address.clone(),
                (Symbol::new(&test.env, "tokens_locked"),).into_val(&test.env),
                (1_000i128, 100u64, 1_000i128).into_val(&test.env),
            )
        ]
    );
}

#[test]
fn test_schedule_unlocks_linearly() {
    let test = GeyserTest::setup();
    test.lock(1_000, 100);

    test.set_time(START_TIME + 50);
    assert_eq!(test.geyser.accrue_and_unlock(), 500);
    assert_eq!(test.geyser.total_locked(), 500);
    assert_eq!(test.geyser.total_unlocked(), 500);

    test.set_time(START_TIME + 100);
    assert_eq!(test.geyser.accrue_and_unlock(), 500);
    assert_eq!(test.geyser.total_locked(), 0);
    assert_eq!(test.geyser.total_unlocked(), 1_000);
    assert_eq!(test.geyser.total_locked_shares(), 0);

    // nothing left past the end of the schedule
    test.set_time(START_TIME + 200);
    assert_eq!(test.geyser.accrue_and_unlock(), 0);
    assert_eq!(test.geyser.total_unlocked(), 1_000);
}

#[test]
fn test_accrue_twice_at_same_time_is_noop() {
    let test = GeyserTest::setup();
    let user = test.staker(100);
    test.lock(1_000, 100);
    test.stake(&user, 100);

    test.set_time(START_TIME + 30);
    assert_eq!(test.geyser.accrue_and_unlock(), 300);
    let share_seconds = test.geyser.total_staking_share_seconds();
    let locked_shares = test.geyser.total_locked_shares();

    assert_eq!(test.geyser.accrue_and_unlock(), 0);
    assert_eq!(test.geyser.total_staking_share_seconds(), share_seconds);
    assert_eq!(test.geyser.total_locked_shares(), locked_shares);
    assert_eq!(test.geyser.last_accrual_time(), START_TIME + 30);
}

#[test]
fn test_overlapping_schedules() {
    let test = GeyserTest::setup();

    test.lock(1_000, 100);
    test.set_time(START_TIME + 50);
    test.lock(500, 50);

    // first half of the first schedule was released before the second lock
    assert_eq!(test.geyser.total_unlocked(), 500);
    assert_eq!(test.geyser.total_locked(), 1_000);
    assert_eq!(test.geyser.total_locked_shares(), 1_000);
    assert_eq!(test.geyser.unlock_schedule_count(), 2);

    test.set_time(START_TIME + 100);
    assert_eq!(test.geyser.accrue_and_unlock(), 1_000);
    assert_eq!(test.geyser.total_locked(), 0);
    assert_eq!(test.geyser.total_unlocked(), 1_500);
}

#[test]
fn test_unscheduled_locked_balance_is_released() {
    let test = GeyserTest::setup();
    mint(&test.env, &test.distribution_token.address, &test.locked_pool.address, 300);

    assert_eq!(test.geyser.accrue_and_unlock(), 300);
    assert_eq!(test.geyser.total_locked(), 0);
    assert_eq!(test.geyser.total_unlocked(), 300);
}

#[test]
fn test_lock_by_non_admin_fails() {
    let test = GeyserTest::setup();
    let stranger = Address::generate(&test.env);
    mint(&test.env, &test.distribution_token.address, &stranger, 1_000);

    let result = test.geyser.try_lock(&stranger, &1_000, &100);
    assert_eq!(result, Err(Ok(GeyserError::Unauthorized)));
    assert_eq!(test.geyser.unlock_schedule_count(), 0);
}

#[test]
fn test_lock_rejects_bad_parameters() {
    let test = GeyserTest::setup();
    mint(&test.env, &test.distribution_token.address, &test.admin, 1_000);

    let result = test.geyser.try_lock(&test.admin, &1_000, &0);
    assert_eq!(result, Err(Ok(GeyserError::InvalidDuration)));

    let result = test.geyser.try_lock(&test.admin, &0, &100);
    assert_eq!(result, Err(Ok(GeyserError::InvalidAmount)));

    // admin holds fewer tokens than the lock asks for
    let result = test.geyser.try_lock(&test.admin, &2_000, &100);
    assert_eq!(result, Err(Ok(GeyserError::CustodyTransferFailed)));
    assert_eq!(test.geyser.unlock_schedule_count(), 0);
    assert_eq!(test.geyser.total_locked_shares(), 0);
}

#[test]
fn test_lock_beyond_schedule_limit_fails() {
    let test = GeyserTest::setup();
    for _ in 0..MAX_UNLOCK_SCHEDULES {
        test.lock(100, 10);
    }

    mint(&test.env, &test.distribution_token.address, &test.admin, 100);
    let result = test.geyser.try_lock(&test.admin, &100, &10);
    assert_eq!(result, Err(Ok(GeyserError::TooManyUnlockSchedules)));
    assert_eq!(test.geyser.unlock_schedule_count(), MAX_UNLOCK_SCHEDULES);
}

#[test]
fn test_unlock_emits_tokens_unlocked() {
    let test = GeyserTest::setup();
    test.lock(1_000, 100);

    test.set_time(START_TIME + 50);
    test.geyser.accrue_and_unlock();

    assert_eq!(
        test.last_geyser_events(1),
        vec![
            &test.env,
            (
                test.geyser.address.clone(),
                (Symbol::new(&test.env, "tokens_unlocked"),).into_val(&test.env),
                (500i128, 500i128).into_val(&test.env),
            )
        ]
    );
}

#[test]
fn test_lock_after_partial_unlock_emits_both_events() {
    let test = GeyserTest::setup();
    test.lock(1_000, 100);

    test.set_time(START_TIME + 50);
    test.lock(500, 50);

    // remaining 500 locked plus the new 500
    assert_eq!(
        test.last_geyser_events(2),
        vec![
            &test.env,
            (
                test.geyser.address.clone(),
                (Symbol::new(&test.env, "tokens_unlocked"),).into_val(&test.env),
                (500i128, 500i128).into_val(&test.env),
            ),
            (
                test.geyser.address.clone(),
                (Symbol::new(&test.env, "tokens_locked"),).into_val(&test.env),
                (500i128, 50u64, 1_000i128).into_val(&test.env),
            ),
        ]
    );
}

#[test]
fn test_accrue_without_unlock_emits_nothing() {
    let test = GeyserTest::setup();
    test.lock(1_000, 100);

    // same timestamp as the lock, nothing to release
    assert_eq!(test.geyser.accrue_and_unlock(), 0);

    let unlocked: Vec<Val> = (Symbol::new(&test.env, "tokens_unlocked"),).into_val(&test.env);
    assert!(test
        .geyser_events()
        .iter()
        .all(|(_, topics, _)| topics != unlocked));
}
