use geyser_shared::{mul_div_floor, ONE_HUNDRED_PCT};
use soroban_sdk::Env;

use crate::{account::Withdrawal, errors::GeyserError, storage::GeyserConfig};

/// Early-withdrawal multiplier: a stake held for `age` seconds earns
/// `start_bonus + (100 - start_bonus) * age / bonus_period_sec` percent of
/// its proportional reward, and the full reward once the period is over.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BonusSchedule {
    pub start_bonus: u32,
    pub bonus_period_sec: u64,
}

impl BonusSchedule {
    pub fn from_config(config: &GeyserConfig) -> Self {
        BonusSchedule {
            start_bonus: config.start_bonus,
            bonus_period_sec: config.bonus_period_sec,
        }
    }

    pub fn is_full(&self, age: u64) -> bool {
        self.start_bonus >= ONE_HUNDRED_PCT || age >= self.bonus_period_sec
    }

    pub fn apply(&self, env: &Env, reward: i128, age: u64) -> Result<i128, GeyserError> {
        if self.is_full(age) {
            return Ok(reward);
        }

        let ramp = mul_div_floor(
            env,
            (ONE_HUNDRED_PCT - self.start_bonus) as i128,
            age as i128,
            self.bonus_period_sec as i128,
        )
        .ok_or(GeyserError::ArithmeticOverflow)?;
        let multiplier = self.start_bonus as i128 + ramp;

        mul_div_floor(env, multiplier, reward, ONE_HUNDRED_PCT as i128)
            .ok_or(GeyserError::ArithmeticOverflow)
    }
}

/// Distribution tokens paid for the share-seconds burned by a withdrawal.
///
/// Slices past the bonus period are pooled and divided once, so with the
/// bonus disabled the payout is exactly
/// `total_unlocked * burned_share_seconds / total_share_seconds`.
pub fn reward_for_withdrawal(
    env: &Env,
    bonus: &BonusSchedule,
    withdrawal: &Withdrawal,
    total_unlocked: i128,
    total_share_seconds: i128,
) -> Result<i128, GeyserError> {
    if total_share_seconds == 0 {
        return Ok(0);
    }

    let mut full_share_seconds: i128 = 0;
    let mut reward: i128 = 0;

    for slice in withdrawal.slices.iter() {
        if bonus.is_full(slice.age) {
            full_share_seconds = full_share_seconds
                .checked_add(slice.share_seconds)
                .ok_or(GeyserError::ArithmeticOverflow)?;
            continue;
        }

        let proportional =
            mul_div_floor(env, total_unlocked, slice.share_seconds, total_share_seconds)
                .ok_or(GeyserError::ArithmeticOverflow)?;
        reward = reward
            .checked_add(bonus.apply(env, proportional, slice.age)?)
            .ok_or(GeyserError::ArithmeticOverflow)?;
    }

    let pooled = mul_div_floor(env, total_unlocked, full_share_seconds, total_share_seconds)
        .ok_or(GeyserError::ArithmeticOverflow)?;

    reward
        .checked_add(pooled)
        .ok_or(GeyserError::ArithmeticOverflow)
}
