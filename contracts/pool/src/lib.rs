#![no_std]
use geyser_shared::{
    PoolError, TokenPoolInterface, INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD,
};
use soroban_sdk::{contract, contractimpl, contracttype, log, token, Address, Env};

// Storage Keys
#[contracttype]
pub enum DataKey {
    Owner,
    Token,
}

#[contract]
pub struct TokenPool;

#[contractimpl]
impl TokenPoolInterface for TokenPool {
    /// Bind the pool to the contract that controls it and the token it holds.
    /// Whoever initializes first wins, so deploy and initialize together.
    fn initialize(env: Env, owner: Address, token: Address) -> Result<(), PoolError> {
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(PoolError::AlreadyInitialized);
        }

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Token, &token);
        bump_instance(&env);

        log!(&env, "Token pool for {} initialized, owner: {}", token, owner);

        Ok(())
    }

    fn token(env: Env) -> Result<Address, PoolError> {
        read_token(&env)
    }

    fn owner(env: Env) -> Result<Address, PoolError> {
        read_owner(&env)
    }

    fn balance(env: Env) -> Result<i128, PoolError> {
        let token = read_token(&env)?;
        Ok(token::Client::new(&env, &token).balance(&env.current_contract_address()))
    }

    fn transfer(env: Env, to: Address, amount: i128) -> Result<(), PoolError> {
        let owner = read_owner(&env)?;
        owner.require_auth();

        if amount < 0 {
            return Err(PoolError::InvalidAmount);
        }
        if amount == 0 {
            return Ok(());
        }

        let token = token::Client::new(&env, &read_token(&env)?);
        let pool = env.current_contract_address();
        if token.balance(&pool) < amount {
            return Err(PoolError::InsufficientBalance);
        }

        token.transfer(&pool, &to, &amount);
        Ok(())
    }
}

fn read_owner(env: &Env) -> Result<Address, PoolError> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(PoolError::NotInitialized)
}

fn read_token(env: &Env) -> Result<Address, PoolError> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(PoolError::NotInitialized)
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}
