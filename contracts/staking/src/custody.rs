use geyser_shared::TokenPoolClient;
use soroban_sdk::{token, Address, Env};

use crate::{errors::GeyserError, storage::GeyserConfig};

/// The three custody pools backing a geyser.
///
/// `staking` holds deposited stake, `locked` holds distribution tokens still
/// under an unlock schedule, `unlocked` holds distribution tokens claimable
/// by stakers.
pub struct Custody<'a> {
    env: &'a Env,
    staking: TokenPoolClient<'a>,
    locked: TokenPoolClient<'a>,
    unlocked: TokenPoolClient<'a>,
    staking_token: Address,
    distribution_token: Address,
}

impl<'a> Custody<'a> {
    pub fn new(env: &'a Env, config: &GeyserConfig) -> Self {
        Custody {
            env,
            staking: TokenPoolClient::new(env, &config.staking_pool),
            locked: TokenPoolClient::new(env, &config.locked_pool),
            unlocked: TokenPoolClient::new(env, &config.unlocked_pool),
            staking_token: config.staking_token.clone(),
            distribution_token: config.distribution_token.clone(),
        }
    }

    pub fn total_staked(&self) -> i128 {
        self.staking.balance()
    }

    pub fn total_locked(&self) -> i128 {
        self.locked.balance()
    }

    pub fn total_unlocked(&self) -> i128 {
        self.unlocked.balance()
    }

    /// Pull stake from `from` into the staking pool.
    pub fn deposit_stake(&self, from: &Address, amount: i128) -> Result<(), GeyserError> {
        self.pull(&self.staking_token, from, &self.staking.address, amount)
    }

    /// Pull distribution tokens from `from` into the locked pool.
    pub fn fund_locked(&self, from: &Address, amount: i128) -> Result<(), GeyserError> {
        self.pull(&self.distribution_token, from, &self.locked.address, amount)
    }

    pub fn release_stake(&self, to: &Address, amount: i128) -> Result<(), GeyserError> {
        Self::push(&self.staking, to, amount)
    }

    pub fn release_reward(&self, to: &Address, amount: i128) -> Result<(), GeyserError> {
        Self::push(&self.unlocked, to, amount)
    }

    /// Move `amount` from the locked pool into the unlocked pool.
    pub fn unlock(&self, amount: i128) -> Result<(), GeyserError> {
        Self::push(&self.locked, &self.unlocked.address, amount)
    }

    fn pull(
        &self,
        token: &Address,
        from: &Address,
        pool: &Address,
        amount: i128,
    ) -> Result<(), GeyserError> {
        match token::Client::new(self.env, token).try_transfer(from, pool, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(GeyserError::CustodyTransferFailed),
        }
    }

    fn push(pool: &TokenPoolClient, to: &Address, amount: i128) -> Result<(), GeyserError> {
        if amount == 0 {
            return Ok(());
        }
        match pool.try_transfer(to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(GeyserError::CustodyTransferFailed),
        }
    }
}
