use geyser_shared::{
    INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};
use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::{
    account::{Stake, UserAccount, UserTotals},
    errors::GeyserError,
    ledger::GlobalLedger,
    unlock::UnlockSchedule,
};

// Storage Keys
#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Config,
    Ledger,
    UnlockSchedules,
    UserTotals(Address),
    UserStakes(Address),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeyserConfig {
    pub admin: Address,
    pub staking_pool: Address,
    pub locked_pool: Address,
    pub unlocked_pool: Address,
    pub staking_token: Address,
    pub distribution_token: Address,
    pub max_unlock_schedules: u32,
    pub start_bonus: u32, // Percent, 100 disables the early-withdrawal bonus
    pub bonus_period_sec: u64,
    pub initial_shares_per_token: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountingSnapshot {
    pub total_locked: i128,
    pub total_unlocked: i128,
    pub user_share_seconds: i128,
    pub total_share_seconds: i128,
    pub user_rewards: i128,
    pub timestamp: u64,
}

/// Everything shared between participants, loaded once per operation and
/// written back in one piece.
#[derive(Clone, Debug)]
pub struct GeyserState {
    pub ledger: GlobalLedger,
    pub schedules: Vec<UnlockSchedule>,
}

// ################################################################
//                             Config
// ################################################################

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &GeyserConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn get_config(env: &Env) -> Result<GeyserConfig, GeyserError> {
    let config = env
        .storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(GeyserError::NotInitialized)?;
    bump_instance(env);

    Ok(config)
}

// ################################################################
//                          Global state
// ################################################################

pub fn load_state(env: &Env) -> Result<GeyserState, GeyserError> {
    let ledger = env
        .storage()
        .instance()
        .get(&DataKey::Ledger)
        .ok_or(GeyserError::NotInitialized)?;
    let schedules = env
        .storage()
        .instance()
        .get(&DataKey::UnlockSchedules)
        .unwrap_or_else(|| Vec::new(env));
    bump_instance(env);

    Ok(GeyserState { ledger, schedules })
}

pub fn save_state(env: &Env, state: &GeyserState) {
    env.storage().instance().set(&DataKey::Ledger, &state.ledger);
    env.storage()
        .instance()
        .set(&DataKey::UnlockSchedules, &state.schedules);
    bump_instance(env);
}

// ################################################################
//                          Participants
// ################################################################

pub fn get_user_totals(env: &Env, user: &Address) -> UserTotals {
    read_persistent(env, &DataKey::UserTotals(user.clone())).unwrap_or_default()
}

pub fn get_user_stakes(env: &Env, user: &Address) -> Vec<Stake> {
    read_persistent(env, &DataKey::UserStakes(user.clone())).unwrap_or_else(|| Vec::new(env))
}

pub fn load_account(env: &Env, user: &Address) -> UserAccount {
    UserAccount {
        totals: get_user_totals(env, user),
        stakes: get_user_stakes(env, user),
    }
}

/// Persist an account, dropping the entries once nothing is left in it.
pub fn save_account(env: &Env, user: &Address, account: &UserAccount) {
    let totals_key = DataKey::UserTotals(user.clone());
    let stakes_key = DataKey::UserStakes(user.clone());
    let storage = env.storage().persistent();

    if account.is_empty() {
        storage.remove(&totals_key);
        storage.remove(&stakes_key);
        return;
    }

    storage.set(&totals_key, &account.totals);
    storage.set(&stakes_key, &account.stakes);
    storage.extend_ttl(&totals_key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
    storage.extend_ttl(&stakes_key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn read_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let storage = env.storage().persistent();
    let value = storage.get(key);
    if value.is_some() {
        storage.extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
    }
    value
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}
