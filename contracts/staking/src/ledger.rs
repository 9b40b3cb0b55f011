//! Global clock and share ledger.
//!
//! Shares are claims on a pool's live token balance. Share-seconds are the
//! time integral of shares held and are the basis of reward allocation.

use geyser_shared::{elapsed, mul_div_floor};
use soroban_sdk::{contracttype, Env};

use crate::errors::GeyserError;

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GlobalLedger {
    pub total_staking_shares: i128,
    pub total_staking_share_seconds: i128,
    pub last_accrual_time: u64,
    pub total_locked_shares: i128,
}

impl GlobalLedger {
    pub fn new(now: u64) -> Self {
        GlobalLedger {
            last_accrual_time: now,
            ..Default::default()
        }
    }

    /// Fold the time since the last accrual into the share-seconds total.
    pub fn accrue(&mut self, now: u64) -> Result<(), GeyserError> {
        let delta = share_seconds(self.total_staking_shares, self.last_accrual_time, now)?;
        self.total_staking_share_seconds = self
            .total_staking_share_seconds
            .checked_add(delta)
            .ok_or(GeyserError::ArithmeticOverflow)?;
        self.last_accrual_time = now;
        Ok(())
    }

    pub fn shares_for_deposit(
        &self,
        env: &Env,
        amount: i128,
        total_staked: i128,
        initial_shares_per_token: i128,
    ) -> Result<i128, GeyserError> {
        mint_shares(
            env,
            amount,
            self.total_staking_shares,
            total_staked,
            initial_shares_per_token,
        )
    }

    pub fn shares_to_burn(
        &self,
        env: &Env,
        amount: i128,
        total_staked: i128,
    ) -> Result<i128, GeyserError> {
        if total_staked == 0 {
            return Err(GeyserError::InsufficientStake);
        }
        mul_div_floor(env, self.total_staking_shares, amount, total_staked)
            .ok_or(GeyserError::ArithmeticOverflow)
    }

    /// Token value of `shares` against the live staking balance.
    pub fn staked_value(
        &self,
        env: &Env,
        shares: i128,
        total_staked: i128,
    ) -> Result<i128, GeyserError> {
        if self.total_staking_shares == 0 {
            return Ok(0);
        }
        mul_div_floor(env, total_staked, shares, self.total_staking_shares)
            .ok_or(GeyserError::ArithmeticOverflow)
    }

    /// Proportional claim of `share_seconds` on the unlocked pool.
    pub fn reward_value(
        &self,
        env: &Env,
        share_seconds: i128,
        total_unlocked: i128,
    ) -> Result<i128, GeyserError> {
        if self.total_staking_share_seconds == 0 {
            return Ok(0);
        }
        mul_div_floor(
            env,
            total_unlocked,
            share_seconds,
            self.total_staking_share_seconds,
        )
        .ok_or(GeyserError::ArithmeticOverflow)
    }

    pub fn mint(&mut self, shares: i128) -> Result<(), GeyserError> {
        self.total_staking_shares = self
            .total_staking_shares
            .checked_add(shares)
            .ok_or(GeyserError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn burn(&mut self, shares: i128, share_seconds: i128) -> Result<(), GeyserError> {
        let total_shares = self
            .total_staking_shares
            .checked_sub(shares)
            .filter(|remaining| *remaining >= 0)
            .ok_or(GeyserError::ArithmeticOverflow)?;
        let total_share_seconds = self
            .total_staking_share_seconds
            .checked_sub(share_seconds)
            .filter(|remaining| *remaining >= 0)
            .ok_or(GeyserError::ArithmeticOverflow)?;

        self.total_staking_shares = total_shares;
        self.total_staking_share_seconds = total_share_seconds;
        Ok(())
    }
}

/// Shares minted for `amount` tokens entering a pool.
///
/// An empty pool (no balance or no shares) mints at the bootstrap rate,
/// otherwise at the current share price, rounded down.
pub fn mint_shares(
    env: &Env,
    amount: i128,
    total_shares: i128,
    total_balance: i128,
    initial_shares_per_token: i128,
) -> Result<i128, GeyserError> {
    if total_balance == 0 || total_shares == 0 {
        return amount
            .checked_mul(initial_shares_per_token)
            .ok_or(GeyserError::ArithmeticOverflow);
    }
    mul_div_floor(env, total_shares, amount, total_balance).ok_or(GeyserError::ArithmeticOverflow)
}

/// `shares * (to - from)`
pub fn share_seconds(shares: i128, from: u64, to: u64) -> Result<i128, GeyserError> {
    let seconds = elapsed(from, to).ok_or(GeyserError::InvalidTimestamp)?;
    shares
        .checked_mul(seconds as i128)
        .ok_or(GeyserError::ArithmeticOverflow)
}
