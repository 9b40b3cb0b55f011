use geyser_shared::{validate_positive_amount, TokenPoolClient, ONE_HUNDRED_PCT};
use soroban_sdk::{contract, contractimpl, contractmeta, log, Address, Bytes, Env, Vec};

use crate::{
    account::{Stake, UserTotals},
    custody::Custody,
    errors::GeyserError,
    events::GeyserEvents,
    ledger::GlobalLedger,
    rewards::{reward_for_withdrawal, BonusSchedule},
    storage::{self, AccountingSnapshot, GeyserConfig, GeyserState},
    unlock::{self, UnlockSchedule},
};

contractmeta!(
    key = "Description",
    val = "Distributes unlocking rewards to stakers by deposit-seconds"
);

/// Result of the accrual step every mutating operation starts with.
///
/// `unlocked` tokens are still sitting in the locked pool; they are moved by
/// `settle_unlock` together with the operation's other transfers.
struct Accrual {
    now: u64,
    unlocked: i128,
    total_locked: i128,
    total_unlocked: i128,
}

#[contract]
pub struct TokenGeyser;

#[contractimpl]
impl TokenGeyser {
    /// Initialize the geyser with its three custody pools.
    ///
    /// Every pool must already be initialized with this contract as owner.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        admin: Address,
        staking_pool: Address,
        locked_pool: Address,
        unlocked_pool: Address,
        max_unlock_schedules: u32,
        start_bonus: u32,
        bonus_period_sec: u64,
        initial_shares_per_token: i128,
    ) -> Result<(), GeyserError> {
        if storage::is_initialized(&env) {
            return Err(GeyserError::AlreadyInitialized);
        }

        admin.require_auth();

        if max_unlock_schedules == 0
            || start_bonus > ONE_HUNDRED_PCT
            || bonus_period_sec == 0
            || initial_shares_per_token <= 0
        {
            return Err(GeyserError::InvalidConfiguration);
        }

        let staking_token = Self::owned_pool_token(&env, &staking_pool)?;
        let distribution_token = Self::owned_pool_token(&env, &locked_pool)?;
        if Self::owned_pool_token(&env, &unlocked_pool)? != distribution_token {
            return Err(GeyserError::InvalidConfiguration);
        }

        let config = GeyserConfig {
            admin: admin.clone(),
            staking_pool,
            locked_pool,
            unlocked_pool,
            staking_token,
            distribution_token,
            max_unlock_schedules,
            start_bonus,
            bonus_period_sec,
            initial_shares_per_token,
        };
        storage::save_config(&env, &config);
        storage::save_state(
            &env,
            &GeyserState {
                ledger: GlobalLedger::new(env.ledger().timestamp()),
                schedules: Vec::new(&env),
            },
        );

        GeyserEvents::initialize(&env, admin.clone());
        log!(&env, "Token geyser initialized by admin: {}", admin);

        Ok(())
    }

    /// Deposit `amount` of the staking token for the caller
    pub fn stake(
        env: Env,
        staker: Address,
        amount: i128,
        _data: Bytes,
    ) -> Result<(), GeyserError> {
        staker.require_auth();
        Self::stake_internal(&env, &staker, &staker, amount)
    }

    /// Deposit `amount` of the caller's staking token, crediting `beneficiary`
    pub fn stake_for(
        env: Env,
        staker: Address,
        beneficiary: Address,
        amount: i128,
        _data: Bytes,
    ) -> Result<(), GeyserError> {
        staker.require_auth();
        Self::stake_internal(&env, &staker, &beneficiary, amount)
    }

    /// Withdraw `amount` of stake together with the reward earned by the
    /// burned deposit-seconds. Returns the reward paid.
    pub fn unstake(
        env: Env,
        staker: Address,
        amount: i128,
        _data: Bytes,
    ) -> Result<i128, GeyserError> {
        staker.require_auth();

        if !validate_positive_amount(amount) {
            return Err(GeyserError::InvalidAmount);
        }

        let config = storage::get_config(&env)?;
        let custody = Custody::new(&env, &config);
        let mut state = storage::load_state(&env)?;
        let mut account = storage::load_account(&env, &staker);

        let total_staked = custody.total_staked();
        let staked_for = state
            .ledger
            .staked_value(&env, account.totals.shares, total_staked)?;
        if amount > staked_for {
            return Err(GeyserError::InsufficientStake);
        }

        let accrual = Self::accrue(&env, &custody, &mut state)?;
        account.accrue(accrual.now)?;

        let shares_to_burn = state.ledger.shares_to_burn(&env, amount, total_staked)?;
        if shares_to_burn == 0 {
            return Err(GeyserError::UnstakeAmountTooSmall);
        }

        let withdrawal = account.withdraw(&env, accrual.now, shares_to_burn)?;
        let reward = reward_for_withdrawal(
            &env,
            &BonusSchedule::from_config(&config),
            &withdrawal,
            accrual.total_unlocked,
            state.ledger.total_staking_share_seconds,
        )?;
        state
            .ledger
            .burn(withdrawal.shares, withdrawal.share_seconds)?;

        storage::save_state(&env, &state);
        storage::save_account(&env, &staker, &account);

        Self::settle_unlock(&env, &custody, &accrual)?;
        custody.release_stake(&staker, amount)?;
        custody.release_reward(&staker, reward)?;

        let remaining = state
            .ledger
            .staked_value(&env, account.totals.shares, total_staked - amount)?;
        GeyserEvents::unstaked(&env, staker.clone(), amount, remaining);
        GeyserEvents::tokens_claimed(&env, staker.clone(), reward);
        log!(&env, "User {} unstaked {} with {} reward", staker, amount, reward);

        Ok(reward)
    }

    /// Advance the clock and release whatever the unlock schedules allow.
    /// Returns the amount moved from the locked to the unlocked pool.
    pub fn accrue_and_unlock(env: Env) -> Result<i128, GeyserError> {
        let config = storage::get_config(&env)?;
        let custody = Custody::new(&env, &config);
        let mut state = storage::load_state(&env)?;

        let accrual = Self::accrue(&env, &custody, &mut state)?;
        storage::save_state(&env, &state);
        Self::settle_unlock(&env, &custody, &accrual)?;

        Ok(accrual.unlocked)
    }

    /// Accrue globally and for `user`, then report where the pools stand.
    pub fn update_accounting(env: Env, user: Address) -> Result<AccountingSnapshot, GeyserError> {
        let config = storage::get_config(&env)?;
        let custody = Custody::new(&env, &config);
        let mut state = storage::load_state(&env)?;
        let mut account = storage::load_account(&env, &user);

        let accrual = Self::accrue(&env, &custody, &mut state)?;
        account.accrue(accrual.now)?;

        storage::save_state(&env, &state);
        storage::save_account(&env, &user, &account);
        Self::settle_unlock(&env, &custody, &accrual)?;

        Ok(AccountingSnapshot {
            total_locked: accrual.total_locked,
            total_unlocked: accrual.total_unlocked,
            user_share_seconds: account.totals.share_seconds,
            total_share_seconds: state.ledger.total_staking_share_seconds,
            user_rewards: state.ledger.reward_value(
                &env,
                account.totals.share_seconds,
                accrual.total_unlocked,
            )?,
            timestamp: accrual.now,
        })
    }

    /// Admin function to lock `amount` of the distribution token, unlocking
    /// linearly over `duration_sec`
    pub fn lock(
        env: Env,
        admin: Address,
        amount: i128,
        duration_sec: u64,
    ) -> Result<(), GeyserError> {
        admin.require_auth();

        let config = storage::get_config(&env)?;
        if config.admin != admin {
            return Err(GeyserError::Unauthorized);
        }
        if !validate_positive_amount(amount) {
            return Err(GeyserError::InvalidAmount);
        }
        if duration_sec == 0 {
            return Err(GeyserError::InvalidDuration);
        }

        let custody = Custody::new(&env, &config);
        let mut state = storage::load_state(&env)?;
        unlock::check_capacity(&state.schedules, config.max_unlock_schedules)?;

        let accrual = Self::accrue(&env, &custody, &mut state)?;
        unlock::add_schedule(
            &env,
            &mut state,
            amount,
            duration_sec,
            accrual.now,
            accrual.total_locked,
            config.initial_shares_per_token,
        )?;

        storage::save_state(&env, &state);
        Self::settle_unlock(&env, &custody, &accrual)?;
        custody.fund_locked(&admin, amount)?;

        let total_locked = accrual
            .total_locked
            .checked_add(amount)
            .ok_or(GeyserError::ArithmeticOverflow)?;
        GeyserEvents::tokens_locked(&env, amount, duration_sec, total_locked);
        log!(&env, "Locked {} for {} seconds", amount, duration_sec);

        Ok(())
    }

    /// Admin function to hand over the admin role
    pub fn set_admin(env: Env, admin: Address, new_admin: Address) -> Result<(), GeyserError> {
        admin.require_auth();

        let mut config = storage::get_config(&env)?;
        if config.admin != admin {
            return Err(GeyserError::Unauthorized);
        }

        config.admin = new_admin.clone();
        storage::save_config(&env, &config);

        GeyserEvents::admin_changed(&env, new_admin.clone());
        log!(&env, "Admin changed to: {}", new_admin);

        Ok(())
    }

    // ################################################################
    //                             Queries
    // ################################################################

    /// Staking tokens currently owed to `user`
    pub fn total_staked_for(env: Env, user: Address) -> Result<i128, GeyserError> {
        let config = storage::get_config(&env)?;
        let state = storage::load_state(&env)?;
        let totals = storage::get_user_totals(&env, &user);

        state.ledger.staked_value(
            &env,
            totals.shares,
            Custody::new(&env, &config).total_staked(),
        )
    }

    /// Unlocked reward `user` could claim, as of their last accrual
    pub fn total_rewards_for(env: Env, user: Address) -> Result<i128, GeyserError> {
        let config = storage::get_config(&env)?;
        let state = storage::load_state(&env)?;
        let totals = storage::get_user_totals(&env, &user);

        state.ledger.reward_value(
            &env,
            totals.share_seconds,
            Custody::new(&env, &config).total_unlocked(),
        )
    }

    pub fn total_staked(env: Env) -> Result<i128, GeyserError> {
        let config = storage::get_config(&env)?;
        Ok(Custody::new(&env, &config).total_staked())
    }

    pub fn total_locked(env: Env) -> Result<i128, GeyserError> {
        let config = storage::get_config(&env)?;
        Ok(Custody::new(&env, &config).total_locked())
    }

    pub fn total_unlocked(env: Env) -> Result<i128, GeyserError> {
        let config = storage::get_config(&env)?;
        Ok(Custody::new(&env, &config).total_unlocked())
    }

    pub fn get_staking_token(env: Env) -> Result<Address, GeyserError> {
        Ok(storage::get_config(&env)?.staking_token)
    }

    pub fn get_distribution_token(env: Env) -> Result<Address, GeyserError> {
        Ok(storage::get_config(&env)?.distribution_token)
    }

    /// Past balances are not recorded
    pub fn supports_history(_env: Env) -> bool {
        false
    }

    pub fn unlock_schedule_count(env: Env) -> Result<u32, GeyserError> {
        Ok(storage::load_state(&env)?.schedules.len())
    }

    pub fn unlock_schedules(env: Env) -> Result<Vec<UnlockSchedule>, GeyserError> {
        Ok(storage::load_state(&env)?.schedules)
    }

    pub fn total_staking_shares(env: Env) -> Result<i128, GeyserError> {
        Ok(storage::load_state(&env)?.ledger.total_staking_shares)
    }

    pub fn total_staking_share_seconds(env: Env) -> Result<i128, GeyserError> {
        Ok(storage::load_state(&env)?.ledger.total_staking_share_seconds)
    }

    pub fn total_locked_shares(env: Env) -> Result<i128, GeyserError> {
        Ok(storage::load_state(&env)?.ledger.total_locked_shares)
    }

    pub fn last_accrual_time(env: Env) -> Result<u64, GeyserError> {
        Ok(storage::load_state(&env)?.ledger.last_accrual_time)
    }

    pub fn user_totals(env: Env, user: Address) -> UserTotals {
        storage::get_user_totals(&env, &user)
    }

    pub fn user_stakes(env: Env, user: Address) -> Vec<Stake> {
        storage::get_user_stakes(&env, &user)
    }

    pub fn query_config(env: Env) -> Result<GeyserConfig, GeyserError> {
        storage::get_config(&env)
    }

    pub fn query_admin(env: Env) -> Result<Address, GeyserError> {
        Ok(storage::get_config(&env)?.admin)
    }

    // Internal helper functions
    fn stake_internal(
        env: &Env,
        staker: &Address,
        beneficiary: &Address,
        amount: i128,
    ) -> Result<(), GeyserError> {
        if !validate_positive_amount(amount) {
            return Err(GeyserError::InvalidAmount);
        }

        let config = storage::get_config(env)?;
        let custody = Custody::new(env, &config);
        let mut state = storage::load_state(env)?;

        let accrual = Self::accrue(env, &custody, &mut state)?;

        if staker != beneficiary {
            let mut caller = storage::load_account(env, staker);
            caller.accrue(accrual.now)?;
            storage::save_account(env, staker, &caller);
        }

        let mut account = storage::load_account(env, beneficiary);
        let total_staked = custody.total_staked();
        let minted = state.ledger.shares_for_deposit(
            env,
            amount,
            total_staked,
            config.initial_shares_per_token,
        )?;
        if minted == 0 {
            return Err(GeyserError::StakeAmountTooSmall);
        }

        account.deposit(accrual.now, minted)?;
        state.ledger.mint(minted)?;

        storage::save_state(env, &state);
        storage::save_account(env, beneficiary, &account);

        Self::settle_unlock(env, &custody, &accrual)?;
        custody.deposit_stake(staker, amount)?;

        let total_staked_for = state.ledger.staked_value(
            env,
            account.totals.shares,
            total_staked
                .checked_add(amount)
                .ok_or(GeyserError::ArithmeticOverflow)?,
        )?;
        GeyserEvents::staked(env, beneficiary.clone(), amount, total_staked_for);
        log!(
            env,
            "User {} staked {} for {}, minting {} shares",
            staker,
            amount,
            beneficiary,
            minted
        );

        Ok(())
    }

    /// Fold elapsed time into the global share-seconds and advance every
    /// unlock schedule. Token movement is deferred to `settle_unlock`.
    fn accrue(
        env: &Env,
        custody: &Custody,
        state: &mut GeyserState,
    ) -> Result<Accrual, GeyserError> {
        let now = env.ledger().timestamp();
        state.ledger.accrue(now)?;

        let locked_balance = custody.total_locked();
        let unlocked = unlock::unlock_all(
            env,
            &mut state.ledger,
            &mut state.schedules,
            now,
            locked_balance,
        )?;

        Ok(Accrual {
            now,
            unlocked,
            total_locked: locked_balance
                .checked_sub(unlocked)
                .ok_or(GeyserError::ArithmeticOverflow)?,
            total_unlocked: custody
                .total_unlocked()
                .checked_add(unlocked)
                .ok_or(GeyserError::ArithmeticOverflow)?,
        })
    }

    fn settle_unlock(env: &Env, custody: &Custody, accrual: &Accrual) -> Result<(), GeyserError> {
        if accrual.unlocked > 0 {
            custody.unlock(accrual.unlocked)?;
            GeyserEvents::tokens_unlocked(env, accrual.unlocked, accrual.total_locked);
        }
        Ok(())
    }

    /// Token held by `pool`, provided this geyser owns the pool
    fn owned_pool_token(env: &Env, pool: &Address) -> Result<Address, GeyserError> {
        let client = TokenPoolClient::new(env, pool);
        let owner = match client.try_owner() {
            Ok(Ok(owner)) => owner,
            _ => return Err(GeyserError::InvalidConfiguration),
        };
        if owner != env.current_contract_address() {
            return Err(GeyserError::InvalidConfiguration);
        }

        match client.try_token() {
            Ok(Ok(token)) => Ok(token),
            _ => Err(GeyserError::InvalidConfiguration),
        }
    }
}
