//! Linear unlock schedules over the locked pool.

use geyser_shared::mul_div_floor;
use soroban_sdk::{contracttype, Env, Vec};

use crate::{
    errors::GeyserError,
    ledger::{mint_shares, GlobalLedger},
    storage::GeyserState,
};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnlockSchedule {
    pub initial_shares: i128,
    pub last_unlock_time: u64,
    pub end_time: u64,
    pub duration_sec: u64,
}

impl UnlockSchedule {
    pub fn new(initial_shares: i128, now: u64, duration_sec: u64) -> Result<Self, GeyserError> {
        if duration_sec == 0 {
            return Err(GeyserError::InvalidDuration);
        }
        let end_time = now
            .checked_add(duration_sec)
            .ok_or(GeyserError::InvalidDuration)?;

        Ok(UnlockSchedule {
            initial_shares,
            last_unlock_time: now,
            end_time,
            duration_sec,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.last_unlock_time == self.end_time
    }

    /// Locked shares released between the last unlock and `now`, capped at
    /// the schedule end. Rounds down, so a schedule may leave dust behind.
    pub fn unlock_shares(&mut self, env: &Env, now: u64) -> Result<i128, GeyserError> {
        let until = now.min(self.end_time);
        if until <= self.last_unlock_time {
            return Ok(0);
        }

        let seconds = (until - self.last_unlock_time) as i128;
        let shares = mul_div_floor(env, seconds, self.initial_shares, self.duration_sec as i128)
            .ok_or(GeyserError::ArithmeticOverflow)?;
        self.last_unlock_time = until;
        Ok(shares)
    }
}

pub fn check_capacity(
    schedules: &Vec<UnlockSchedule>,
    max_unlock_schedules: u32,
) -> Result<(), GeyserError> {
    if schedules.len() >= max_unlock_schedules {
        return Err(GeyserError::TooManyUnlockSchedules);
    }
    Ok(())
}

/// Append a schedule locking `amount` tokens for `duration_sec`.
/// Returns the locked shares minted for it. Capacity is checked by the caller.
pub fn add_schedule(
    env: &Env,
    state: &mut GeyserState,
    amount: i128,
    duration_sec: u64,
    now: u64,
    total_locked: i128,
    initial_shares_per_token: i128,
) -> Result<i128, GeyserError> {
    let minted = mint_shares(
        env,
        amount,
        state.ledger.total_locked_shares,
        total_locked,
        initial_shares_per_token,
    )?;
    let schedule = UnlockSchedule::new(minted, now, duration_sec)?;

    state.ledger.total_locked_shares = state
        .ledger
        .total_locked_shares
        .checked_add(minted)
        .ok_or(GeyserError::ArithmeticOverflow)?;
    state.schedules.push_back(schedule);

    Ok(minted)
}

/// Advance every schedule to `now` and return the number of tokens that
/// should move from the locked pool to the unlocked pool.
///
/// With no locked shares outstanding the whole locked balance is released,
/// so tokens never get stranded behind an empty share supply.
pub fn unlock_all(
    env: &Env,
    ledger: &mut GlobalLedger,
    schedules: &mut Vec<UnlockSchedule>,
    now: u64,
    total_locked: i128,
) -> Result<i128, GeyserError> {
    if ledger.total_locked_shares == 0 {
        return Ok(total_locked);
    }

    let mut unlocked_shares: i128 = 0;
    for index in 0..schedules.len() {
        let mut schedule = match schedules.get(index) {
            Some(schedule) => schedule,
            None => continue,
        };
        if schedule.is_finished() {
            continue;
        }

        let shares = schedule.unlock_shares(env, now)?;
        schedules.set(index, schedule);
        unlocked_shares = unlocked_shares
            .checked_add(shares)
            .ok_or(GeyserError::ArithmeticOverflow)?;
    }

    let unlocked_tokens = mul_div_floor(
        env,
        unlocked_shares,
        total_locked,
        ledger.total_locked_shares,
    )
    .ok_or(GeyserError::ArithmeticOverflow)?;

    ledger.total_locked_shares = ledger
        .total_locked_shares
        .checked_sub(unlocked_shares)
        .filter(|remaining| *remaining >= 0)
        .ok_or(GeyserError::ArithmeticOverflow)?;

    Ok(unlocked_tokens)
}
