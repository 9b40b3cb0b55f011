#![no_std]
//! Shared definitions used by the geyser and its custody pools.
//! The pool interface lives here so the geyser can call pools without
//! linking the pool contract itself.
use soroban_sdk::{contractclient, contracterror, Address, Env, I256};

// ============================================================================
// Custody Pool Interface
// ============================================================================

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidAmount = 3,
    InsufficientBalance = 4,
}

/// A pool holds a balance of exactly one token on behalf of its owner.
///
/// Only the owner may move tokens out. Deposits are plain token transfers
/// into the pool address, authorized by whoever is paying.
#[contractclient(name = "TokenPoolClient")]
pub trait TokenPoolInterface {
    /// One-shot binding of the pool to `owner` and `token`. The call is not
    /// authorized, so a pool must be deployed and initialized in the same
    /// transaction. A pool bound to anyone else is refused by the geyser.
    fn initialize(env: Env, owner: Address, token: Address) -> Result<(), PoolError>;

    fn token(env: Env) -> Result<Address, PoolError>;

    fn owner(env: Env) -> Result<Address, PoolError>;

    /// Current balance of the custodied token held by the pool.
    fn balance(env: Env) -> Result<i128, PoolError>;

    /// Move `amount` to `to`. All or nothing: an amount above the balance is
    /// rejected without moving anything.
    fn transfer(env: Env, to: Address, amount: i128) -> Result<(), PoolError>;
}

// ============================================================================
// Proportional Math
// ============================================================================

/// `a * b / denominator`, rounded toward zero.
///
/// Operands are non-negative ledger quantities, so this is floor division.
/// The product is formed in 256 bits when it does not fit in an `i128`.
/// Returns `None` on a zero denominator or when the quotient overflows.
pub fn mul_div_floor(env: &Env, a: i128, b: i128, denominator: i128) -> Option<i128> {
    if denominator == 0 {
        return None;
    }

    match a.checked_mul(b) {
        Some(product) => product.checked_div(denominator),
        None => I256::from_i128(env, a)
            .mul(&I256::from_i128(env, b))
            .div(&I256::from_i128(env, denominator))
            .to_i128(),
    }
}

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: i128) -> bool {
    amount > 0
}

/// Seconds between two ledger timestamps, `None` if time went backwards.
pub fn elapsed(from: u64, to: u64) -> Option<u64> {
    to.checked_sub(from)
}

// ============================================================================
// Constants
// ============================================================================

/// Percentage scale used by the bonus schedule (100 = 100%)
pub const ONE_HUNDRED_PCT: u32 = 100;

/// Ledgers closed per day at ~5s per ledger
pub const DAY_IN_LEDGERS: u32 = 17280;

pub const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;
