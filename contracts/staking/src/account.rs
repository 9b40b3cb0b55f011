use geyser_shared::elapsed;
use soroban_sdk::{contracttype, Env, Vec};

use crate::{errors::GeyserError, ledger::share_seconds};

/// One deposit, consumed newest-first on withdrawal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stake {
    pub shares: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserTotals {
    pub shares: i128,
    pub share_seconds: i128,
    pub last_accrual_time: u64,
}

impl UserTotals {
    pub fn accrue(&mut self, now: u64) -> Result<(), GeyserError> {
        let delta = share_seconds(self.shares, self.last_accrual_time, now)?;
        self.share_seconds = self
            .share_seconds
            .checked_add(delta)
            .ok_or(GeyserError::ArithmeticOverflow)?;
        self.last_accrual_time = now;
        Ok(())
    }
}

/// Part of a stake entry burned by a withdrawal, with the time it was held.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BurnedSlice {
    pub share_seconds: i128,
    pub age: u64,
}

#[derive(Clone, Debug)]
pub struct Withdrawal {
    pub shares: i128,
    pub share_seconds: i128,
    pub slices: Vec<BurnedSlice>,
}

/// A participant's stake list and cached totals, staged in memory while an
/// operation runs.
#[derive(Clone, Debug)]
pub struct UserAccount {
    pub totals: UserTotals,
    pub stakes: Vec<Stake>,
}

impl UserAccount {
    pub fn new(env: &Env) -> Self {
        UserAccount {
            totals: UserTotals::default(),
            stakes: Vec::new(env),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty() && self.totals.shares == 0 && self.totals.share_seconds == 0
    }

    pub fn accrue(&mut self, now: u64) -> Result<(), GeyserError> {
        self.totals.accrue(now)
    }

    /// Record freshly minted shares. New shares carry no share-seconds until
    /// time passes.
    pub fn deposit(&mut self, now: u64, shares: i128) -> Result<(), GeyserError> {
        self.accrue(now)?;

        self.totals.shares = self
            .totals
            .shares
            .checked_add(shares)
            .ok_or(GeyserError::ArithmeticOverflow)?;
        self.stakes.push_back(Stake {
            shares,
            timestamp: now,
        });
        Ok(())
    }

    /// Burn `shares_to_burn` starting from the most recent stake. A stake
    /// consumed only in part keeps its timestamp and loses the burned shares.
    pub fn withdraw(
        &mut self,
        env: &Env,
        now: u64,
        shares_to_burn: i128,
    ) -> Result<Withdrawal, GeyserError> {
        if shares_to_burn <= 0 {
            return Err(GeyserError::InvalidAmount);
        }
        if shares_to_burn > self.totals.shares {
            return Err(GeyserError::InsufficientStake);
        }
        self.accrue(now)?;

        let mut remaining = shares_to_burn;
        let mut burned_share_seconds: i128 = 0;
        let mut slices = Vec::new(env);

        while remaining > 0 {
            let last_index = self
                .stakes
                .len()
                .checked_sub(1)
                .ok_or(GeyserError::InsufficientStake)?;
            let mut stake = self
                .stakes
                .get(last_index)
                .ok_or(GeyserError::InsufficientStake)?;

            let age = elapsed(stake.timestamp, now).ok_or(GeyserError::InvalidTimestamp)?;
            let burned = stake.shares.min(remaining);
            let slice_share_seconds = share_seconds(burned, stake.timestamp, now)?;

            if burned == stake.shares {
                self.stakes.pop_back();
            } else {
                stake.shares -= burned;
                self.stakes.set(last_index, stake);
            }

            remaining -= burned;
            burned_share_seconds = burned_share_seconds
                .checked_add(slice_share_seconds)
                .ok_or(GeyserError::ArithmeticOverflow)?;
            slices.push_back(BurnedSlice {
                share_seconds: slice_share_seconds,
                age,
            });
        }

        self.totals.shares -= shares_to_burn;
        self.totals.share_seconds = self
            .totals
            .share_seconds
            .checked_sub(burned_share_seconds)
            .filter(|remaining| *remaining >= 0)
            .ok_or(GeyserError::ArithmeticOverflow)?;

        Ok(Withdrawal {
            shares: shares_to_burn,
            share_seconds: burned_share_seconds,
            slices,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::vec;

    fn account_with(env: &Env, deposits: &[(u64, i128)]) -> UserAccount {
        let mut account = UserAccount::new(env);
        for (now, shares) in deposits {
            account.deposit(*now, *shares).unwrap();
        }
        account
    }

    #[test]
    fn deposit_accrues_before_adding_shares() {
        let env = Env::default();
        let account = account_with(&env, &[(100, 10), (110, 5)]);

        assert_eq!(
            account.totals,
            UserTotals {
                shares: 15,
                share_seconds: 100,
                last_accrual_time: 110,
            }
        );
        assert_eq!(account.stakes.len(), 2);
    }

    #[test]
    fn withdraw_consumes_newest_stake_first() {
        let env = Env::default();
        let mut account = account_with(&env, &[(100, 10), (110, 5)]);

        let withdrawal = account.withdraw(&env, 120, 8).unwrap();

        // 5 shares held 10s, then 3 shares held 20s
        assert_eq!(withdrawal.share_seconds, 5 * 10 + 3 * 20);
        assert_eq!(
            withdrawal.slices,
            vec![
                &env,
                BurnedSlice { share_seconds: 50, age: 10 },
                BurnedSlice { share_seconds: 60, age: 20 },
            ]
        );
        assert_eq!(account.stakes, vec![&env, Stake { shares: 7, timestamp: 100 }]);
        assert_eq!(account.totals.shares, 7);
        // 10*20 + 5*10 accrued, 110 burned
        assert_eq!(account.totals.share_seconds, 140);
    }

    #[test]
    fn partial_withdraw_leaves_older_stakes_untouched() {
        let env = Env::default();
        let mut account = account_with(&env, &[(100, 10), (110, 5)]);

        account.withdraw(&env, 120, 2).unwrap();

        assert_eq!(
            account.stakes,
            vec![
                &env,
                Stake { shares: 10, timestamp: 100 },
                Stake { shares: 3, timestamp: 110 },
            ]
        );
    }

    #[test]
    fn withdraw_more_than_held_changes_nothing() {
        let env = Env::default();
        let mut account = account_with(&env, &[(100, 10)]);
        let before = account.clone();

        assert_eq!(
            account.withdraw(&env, 150, 11).err(),
            Some(GeyserError::InsufficientStake)
        );
        assert_eq!(account.totals, before.totals);
        assert_eq!(account.stakes, before.stakes);
    }

    #[test]
    fn full_withdraw_empties_account() {
        let env = Env::default();
        let mut account = account_with(&env, &[(100, 10), (105, 10)]);

        let withdrawal = account.withdraw(&env, 120, 20).unwrap();

        assert_eq!(withdrawal.share_seconds, 10 * 20 + 10 * 15);
        assert!(account.is_empty());
    }

    #[test]
    fn share_seconds_grow_with_time() {
        let env = Env::default();
        let mut account = account_with(&env, &[(100, 4)]);

        let mut last = 0;
        for now in [101, 150, 150, 400] {
            account.accrue(now).unwrap();
            assert!(account.totals.share_seconds >= last);
            last = account.totals.share_seconds;
        }
        assert_eq!(last, 4 * 300);
    }
}
