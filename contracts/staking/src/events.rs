use soroban_sdk::{Address, Env, Symbol};

pub struct GeyserEvents {}

impl GeyserEvents {
    /// Emitted when the geyser is initialized
    ///
    /// - topics - `["initialize", admin: Address]`
    /// - data - ()
    pub fn initialize(env: &Env, admin: Address) {
        let topics = (Symbol::new(env, "initialize"), admin);
        env.events().publish(topics, ());
    }

    /// Emitted when stake is deposited on behalf of a user
    ///
    /// - topics - `["staked", user: Address]`
    /// - data - `[amount: i128, total_staked_for: i128]`
    pub fn staked(env: &Env, user: Address, amount: i128, total_staked_for: i128) {
        let topics = (Symbol::new(env, "staked"), user);
        env.events().publish(topics, (amount, total_staked_for));
    }

    /// Emitted when a user withdraws stake
    ///
    /// - topics - `["unstaked", user: Address]`
    /// - data - `[amount: i128, total_staked_for: i128]`
    pub fn unstaked(env: &Env, user: Address, amount: i128, total_staked_for: i128) {
        let topics = (Symbol::new(env, "unstaked"), user);
        env.events().publish(topics, (amount, total_staked_for));
    }

    /// Emitted alongside every withdrawal with the reward paid out
    ///
    /// - topics - `["tokens_claimed", user: Address]`
    /// - data - `amount: i128`
    pub fn tokens_claimed(env: &Env, user: Address, amount: i128) {
        let topics = (Symbol::new(env, "tokens_claimed"), user);
        env.events().publish(topics, amount);
    }

    /// Emitted when the admin adds an unlock schedule
    ///
    /// - topics - `["tokens_locked"]`
    /// - data - `[amount: i128, duration_sec: u64, total_locked: i128]`
    pub fn tokens_locked(env: &Env, amount: i128, duration_sec: u64, total_locked: i128) {
        let topics = (Symbol::new(env, "tokens_locked"),);
        env.events().publish(topics, (amount, duration_sec, total_locked));
    }

    /// - topics - `["tokens_unlocked"]`
    /// - data - `[amount: i128, total_locked: i128]`
    pub fn tokens_unlocked(env: &Env, amount: i128, total_locked: i128) {
        let topics = (Symbol::new(env, "tokens_unlocked"),);
        env.events().publish(topics, (amount, total_locked));
    }

    pub fn admin_changed(env: &Env, new_admin: Address) {
        let topics = (Symbol::new(env, "admin_changed"), new_admin);
        env.events().publish(topics, ());
    }
}
