use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GeyserError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientStake = 5,
    /// Deposit would mint zero staking shares
    StakeAmountTooSmall = 6,
    /// Withdrawal would burn zero staking shares
    UnstakeAmountTooSmall = 7,
    InvalidDuration = 8,
    TooManyUnlockSchedules = 9,
    InvalidConfiguration = 10,
    ArithmeticOverflow = 11,
    CustodyTransferFailed = 12,
    /// Ledger time is earlier than the last accrual
    InvalidTimestamp = 13,
}
