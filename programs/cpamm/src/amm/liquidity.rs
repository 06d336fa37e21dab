//! # Liquidity Engine
//!
//! Computes how many liquidity shares a deposit mints and how much of each
//! reserve a burn releases.
//!
//! ## First provision
//!
//! ```text
//! shares = isqrt(a * b)
//! ```
//!
//! The geometric mean keeps the nominal value of one share independent of
//! the decimals chosen by either mint.
//!
//! ## Subsequent provisions
//!
//! ```text
//! shares   = min(a * S / Ra, b * S / Rb)        (floor)
//! debit_a  = ceil(shares * Ra / S)
//! debit_b  = ceil(shares * Rb / S)
//! ```
//!
//! Only the ratio-matched part of the desired amounts is debited, so a
//! lopsided deposit can never dilute existing providers.
//!
//! ## Withdrawal
//!
//! ```text
//! out_a = floor(Ra * burn / S)
//! out_b = floor(Rb * burn / S)
//! ```
//!
//! Remainders stay in the pool. The last shares can never be burned, so an
//! active pool always holds both assets.
//!
//! Tokens sent to the vaults before the first provision are credited to the
//! first provider: they become reserves while the shares are still priced on
//! the deposited amounts.

use anchor_lang::prelude::*;

use super::fixed_point::{isqrt, mul_div_ceil, mul_div_floor, to_u64};
use crate::errors::AmmError;

/// Snapshot of the escrowed reserves and the outstanding share supply.
///
/// Reserves are read from the vault token accounts and the supply from the
/// LP mint, never from a stored counter. Every engine operation consumes a
/// snapshot and returns the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolBalances {
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub lp_supply: u64,
}

/// Amounts accepted by a provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    pub amount_a: u64,
    pub amount_b: u64,
    pub shares: u64,
}

/// Amounts released by a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    pub amount_a: u64,
    pub amount_b: u64,
    pub shares: u64,
}

/// Shares minted by the very first provision: `isqrt(a * b)`.
pub fn initial_shares(amount_a: u64, amount_b: u64) -> Result<u64> {
    let product = (amount_a as u128)
        .checked_mul(amount_b as u128)
        .ok_or(AmmError::Overflow)?;
    let shares = to_u64(isqrt(product))?;
    require!(shares > 0, AmmError::ZeroLiquidity);
    Ok(shares)
}

impl PoolBalances {
    pub fn new(reserve_a: u64, reserve_b: u64, lp_supply: u64) -> Self {
        Self {
            reserve_a,
            reserve_b,
            lp_supply,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lp_supply == 0
    }

    /// Price a provision of up to `desired_a` / `desired_b`.
    pub fn quote_deposit(&self, desired_a: u64, desired_b: u64) -> Result<Deposit> {
        require!(desired_a > 0 && desired_b > 0, AmmError::ZeroAmount);

        if self.is_empty() {
            return Ok(Deposit {
                amount_a: desired_a,
                amount_b: desired_b,
                shares: initial_shares(desired_a, desired_b)?,
            });
        }

        require!(
            self.reserve_a > 0 && self.reserve_b > 0,
            AmmError::InsufficientLiquidity
        );

        let supply = self.lp_supply as u128;
        let reserve_a = self.reserve_a as u128;
        let reserve_b = self.reserve_b as u128;

        let from_a = mul_div_floor(desired_a as u128, supply, reserve_a)?;
        let from_b = mul_div_floor(desired_b as u128, supply, reserve_b)?;
        let shares = from_a.min(from_b);
        require!(shares > 0, AmmError::ZeroLiquidity);

        // shares * R / S <= desired, so the ceiling never exceeds desired
        let amount_a = mul_div_ceil(shares, reserve_a, supply)?;
        let amount_b = mul_div_ceil(shares, reserve_b, supply)?;

        Ok(Deposit {
            amount_a: to_u64(amount_a)?,
            amount_b: to_u64(amount_b)?,
            shares: to_u64(shares)?,
        })
    }

    /// Provision transition: returns the next snapshot and what was accepted.
    pub fn deposit(self, desired_a: u64, desired_b: u64) -> Result<(Self, Deposit)> {
        let deposit = self.quote_deposit(desired_a, desired_b)?;
        let next = Self {
            reserve_a: self
                .reserve_a
                .checked_add(deposit.amount_a)
                .ok_or(AmmError::Overflow)?,
            reserve_b: self
                .reserve_b
                .checked_add(deposit.amount_b)
                .ok_or(AmmError::Overflow)?,
            lp_supply: self
                .lp_supply
                .checked_add(deposit.shares)
                .ok_or(AmmError::Overflow)?,
        };
        Ok((next, deposit))
    }

    /// Price a burn of `shares` held by a caller owning `holder_balance`.
    pub fn quote_withdrawal(&self, shares: u64, holder_balance: u64) -> Result<Withdrawal> {
        require!(shares > 0, AmmError::ZeroAmount);
        require!(
            shares <= holder_balance && shares < self.lp_supply,
            AmmError::InsufficientLiquidity
        );

        let supply = self.lp_supply as u128;
        let amount_a = to_u64(mul_div_floor(
            self.reserve_a as u128,
            shares as u128,
            supply,
        )?)?;
        let amount_b = to_u64(mul_div_floor(
            self.reserve_b as u128,
            shares as u128,
            supply,
        )?)?;
        require!(amount_a > 0 && amount_b > 0, AmmError::ZeroAmount);

        Ok(Withdrawal {
            amount_a,
            amount_b,
            shares,
        })
    }

    /// Withdrawal transition: returns the next snapshot and what was released.
    pub fn withdraw(self, shares: u64, holder_balance: u64) -> Result<(Self, Withdrawal)> {
        let withdrawal = self.quote_withdrawal(shares, holder_balance)?;
        let next = Self {
            reserve_a: self
                .reserve_a
                .checked_sub(withdrawal.amount_a)
                .ok_or(AmmError::Overflow)?,
            reserve_b: self
                .reserve_b
                .checked_sub(withdrawal.amount_b)
                .ok_or(AmmError::Overflow)?,
            lp_supply: self
                .lp_supply
                .checked_sub(withdrawal.shares)
                .ok_or(AmmError::Overflow)?,
        };
        Ok((next, withdrawal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::assert_amm_error;
    use proptest::prelude::*;

    #[test]
    fn test_first_provision_uses_geometric_mean() {
        let (next, deposit) = PoolBalances::default()
            .deposit(1_000_000, 1_000_000)
            .unwrap();
        assert_eq!(deposit.shares, 1_000_000);
        assert_eq!(next, PoolBalances::new(1_000_000, 1_000_000, 1_000_000));

        // Different decimals: 10^12 * 10^15 -> √(10^27)
        let (_, deposit) = PoolBalances::default()
            .deposit(1_000_000_000_000, 1_000_000_000_000_000)
            .unwrap();
        assert_eq!(deposit.shares, 31_622_776_601_683);
    }

    #[test]
    fn test_proportional_provision() {
        let balances =
            PoolBalances::new(1_000_000_000_000, 1_000_000_000_000, 1_000_000_000_000);
        let (next, deposit) = balances.deposit(200_000_000, 200_000_000).unwrap();

        assert_eq!(deposit.shares, 200_000_000);
        assert_eq!(deposit.amount_a, 200_000_000);
        assert_eq!(deposit.amount_b, 200_000_000);
        assert_eq!(next.lp_supply, 1_000_200_000_000);
        assert_eq!(next.reserve_a, 1_000_200_000_000);
    }

    #[test]
    fn test_mismatched_provision_debits_ratio_matched_amounts() {
        // Price 2 B per A
        let balances = PoolBalances::new(1_000, 2_000, 1_000);
        let deposit = balances.quote_deposit(100, 1_000).unwrap();

        assert_eq!(deposit.shares, 100);
        assert_eq!(deposit.amount_a, 100);
        assert_eq!(deposit.amount_b, 200);
    }

    #[test]
    fn test_provision_rounds_debit_up() {
        let balances = PoolBalances::new(1_000, 3_001, 1_000);
        let deposit = balances.quote_deposit(10, 40).unwrap();

        assert_eq!(deposit.shares, 10);
        assert_eq!(deposit.amount_a, 10);
        // 10 * 3001 / 1000 = 30.01 -> 31
        assert_eq!(deposit.amount_b, 31);
    }

    #[test]
    fn test_provision_errors() {
        let balances = PoolBalances::new(1_000_000, 1_000_000, 1_000_000);
        assert_amm_error(balances.deposit(0, 10), AmmError::ZeroAmount);
        assert_amm_error(balances.deposit(10, 0), AmmError::ZeroAmount);

        let deep = PoolBalances::new(1_000_000, 1_000_000, 10);
        assert_amm_error(deep.deposit(1, 1), AmmError::ZeroLiquidity);

        let at_limit = PoolBalances::new(u64::MAX, u64::MAX, u64::MAX);
        assert_amm_error(at_limit.deposit(1, 1), AmmError::Overflow);
    }

    #[test]
    fn test_first_provision_absorbs_preexisting_balances() {
        let (next, deposit) = PoolBalances::new(500, 0, 0).deposit(900, 100).unwrap();
        assert_eq!(deposit.shares, 300);
        assert_eq!(deposit.amount_a, 900);
        assert_eq!(next, PoolBalances::new(1_400, 100, 300));
    }

    #[test]
    fn test_withdrawal_cannot_empty_pool() {
        let balances = PoolBalances::new(500, 800, 400);
        assert_amm_error(balances.withdraw(400, 400), AmmError::InsufficientLiquidity);

        let (next, withdrawal) = balances.withdraw(399, 400).unwrap();
        assert_eq!(withdrawal.amount_a, 498);
        assert_eq!(withdrawal.amount_b, 798);
        assert_eq!(next, PoolBalances::new(2, 2, 1));
    }

    #[test]
    fn test_withdrawal_symmetry() {
        let balances = PoolBalances::new(5_000_000, 5_000_000, 5_000_000);
        let (next, withdrawal) = balances.withdraw(1_234_567, 2_000_000).unwrap();

        assert_eq!(withdrawal.amount_a, 1_234_567);
        assert_eq!(withdrawal.amount_b, 1_234_567);
        assert_eq!(next, PoolBalances::new(3_765_433, 3_765_433, 3_765_433));
    }

    #[test]
    fn test_withdrawal_floors_in_favor_of_pool() {
        let balances = PoolBalances::new(1_000, 3_001, 1_000);
        let withdrawal = balances.quote_withdrawal(10, 10).unwrap();

        assert_eq!(withdrawal.amount_a, 10);
        assert_eq!(withdrawal.amount_b, 30);
    }

    #[test]
    fn test_withdrawal_errors() {
        let balances = PoolBalances::new(1_000, 1_000, 1_000);
        assert_amm_error(balances.withdraw(0, 100), AmmError::ZeroAmount);
        assert_amm_error(balances.withdraw(101, 100), AmmError::InsufficientLiquidity);
        assert_amm_error(balances.withdraw(1_001, 5_000), AmmError::InsufficientLiquidity);
        assert_amm_error(balances.withdraw(1_000, 5_000), AmmError::InsufficientLiquidity);

        let skewed = PoolBalances::new(10, 1_000_000, 1_000);
        assert_amm_error(skewed.withdraw(1, 1), AmmError::ZeroAmount);
    }

    proptest! {
        #[test]
        fn prop_matched_provision_keeps_price(
            reserve_a in 1_000u64..1_000_000_000_000,
            reserve_b in 1_000u64..1_000_000_000_000,
            supply in 1_000u64..1_000_000_000_000,
            shares in 1u64..1_000_000_000,
        ) {
            let balances = PoolBalances::new(reserve_a, reserve_b, supply);
            let desired_a = (shares as u128 * reserve_a as u128 / supply as u128) as u64 + 1;
            let desired_b = (shares as u128 * reserve_b as u128 / supply as u128) as u64 + 1;

            let (next, deposit) = balances.deposit(desired_a, desired_b).unwrap();
            prop_assert!(deposit.amount_a <= desired_a);
            prop_assert!(deposit.amount_b <= desired_b);

            // next_a / next_b stays within one unit of reserve_a / reserve_b
            let before = reserve_a as u128 * next.reserve_b as u128;
            let after = next.reserve_a as u128 * reserve_b as u128;
            let tolerance = reserve_a.max(reserve_b) as u128;
            prop_assert!(before.abs_diff(after) <= tolerance);

            // no share is ever worth more after a deposit than before
            prop_assert!(
                next.reserve_a as u128 * supply as u128 >= reserve_a as u128 * next.lp_supply as u128
            );
            prop_assert!(
                next.reserve_b as u128 * supply as u128 >= reserve_b as u128 * next.lp_supply as u128
            );
        }

        #[test]
        fn prop_withdrawal_never_overpays(
            reserve_a in 1u64..u64::MAX / 2,
            reserve_b in 1u64..u64::MAX / 2,
            supply in 1u64..u64::MAX / 2,
            burn in 1u64..u64::MAX / 2,
        ) {
            let balances = PoolBalances::new(reserve_a, reserve_b, supply);
            if let Ok((next, withdrawal)) = balances.withdraw(burn, burn) {
                prop_assert!(
                    withdrawal.amount_a as u128 * supply as u128 <= reserve_a as u128 * burn as u128
                );
                prop_assert!(
                    withdrawal.amount_b as u128 * supply as u128 <= reserve_b as u128 * burn as u128
                );
                prop_assert_eq!(next.lp_supply, supply - burn);
                prop_assert!(next.lp_supply > 0);
                prop_assert!(next.reserve_a > 0 && next.reserve_b > 0);
            }
        }
    }
}
