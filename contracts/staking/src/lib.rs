#![no_std]

mod account;
mod contract;
mod custody;
pub mod errors;
mod events;
mod ledger;
mod rewards;
mod storage;
mod unlock;

pub use account::{Stake, UserTotals};
pub use contract::*;
pub use ledger::GlobalLedger;
pub use storage::{AccountingSnapshot, GeyserConfig};
pub use unlock::UnlockSchedule;
