//! # Swap Engine
//!
//! Prices a trade against the constant-product invariant `k = Rin * Rout`.
//!
//! ```text
//! tax        = floor(bid * tax_rate)            -> treasury (and referrer)
//! net        = bid - tax                        -> credited to Rin
//! lp_fee     = floor(net * lp_fee_rate)         -> stays in Rin
//! effective  = net - lp_fee                     -> priced on the curve
//! ask        = Rout - floor(Rin * Rout / (Rin + effective))
//! ```
//!
//! The whole net input is credited to `Rin` while only `effective` is priced,
//! so the product never falls by more than the rounding of `Rout'`. A trade
//! that would leave `Rout` empty is rejected.

use anchor_lang::prelude::*;

use super::fixed_point::{apply_rate, mul_div_floor, to_u64};
use super::liquidity::PoolBalances;
use crate::errors::AmmError;

/// Which pool asset the caller is selling.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDirection {
    /// Sell A, buy B
    AToB,
    /// Sell B, buy A
    BToA,
}

/// PRECISION-scaled rates applied to one trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapRates {
    pub protocol_tax: u64,
    pub lp_fee: u64,
    pub referral: u64,
}

/// Breakdown of a priced trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub bid_amount: u64,
    /// Whole tax withheld from the bid.
    pub tax: u64,
    /// Part of `tax` owed to the referrer.
    pub referral_cut: u64,
    /// Part of `tax` owed to the protocol treasury.
    pub protocol_cut: u64,
    /// Amount moved into the pool vault.
    pub net_input: u64,
    pub lp_fee: u64,
    pub effective_input: u64,
    pub ask_amount: u64,
}

/// Price a trade of `bid_amount` against `reserve_in` / `reserve_out`.
///
/// # Arguments
/// * `minimum_ask` - Slippage floor set by the caller
/// * `referred` - Whether a referrer record exists for the caller
pub fn quote_swap(
    reserve_in: u64,
    reserve_out: u64,
    bid_amount: u64,
    minimum_ask: u64,
    rates: &SwapRates,
    referred: bool,
) -> Result<SwapQuote> {
    require!(bid_amount > 0, AmmError::ZeroAmount);
    require!(
        reserve_in > 0 && reserve_out > 0,
        AmmError::InsufficientLiquidity
    );

    let tax = apply_rate(bid_amount, rates.protocol_tax)?;
    let referral_cut = if referred {
        apply_rate(tax, rates.referral)?
    } else {
        0
    };
    let protocol_cut = tax.checked_sub(referral_cut).ok_or(AmmError::Overflow)?;

    let net_input = bid_amount.checked_sub(tax).ok_or(AmmError::Overflow)?;
    let lp_fee = apply_rate(net_input, rates.lp_fee)?;
    let effective_input = net_input.checked_sub(lp_fee).ok_or(AmmError::Overflow)?;

    let next_reserve_in = (reserve_in as u128)
        .checked_add(effective_input as u128)
        .ok_or(AmmError::Overflow)?;
    let next_reserve_out = to_u64(mul_div_floor(
        reserve_in as u128,
        reserve_out as u128,
        next_reserve_in,
    )?)?;
    let ask_amount = reserve_out
        .checked_sub(next_reserve_out)
        .ok_or(AmmError::Overflow)?;

    require!(ask_amount >= minimum_ask, AmmError::SlippageExceeded);
    require!(ask_amount > 0, AmmError::ZeroAmount);
    require!(next_reserve_out > 0, AmmError::InsufficientLiquidity);

    Ok(SwapQuote {
        bid_amount,
        tax,
        referral_cut,
        protocol_cut,
        net_input,
        lp_fee,
        effective_input,
        ask_amount,
    })
}

impl PoolBalances {
    /// `(reserve_in, reserve_out)` for a direction.
    pub fn reserves_for(&self, direction: SwapDirection) -> (u64, u64) {
        match direction {
            SwapDirection::AToB => (self.reserve_a, self.reserve_b),
            SwapDirection::BToA => (self.reserve_b, self.reserve_a),
        }
    }

    /// Swap transition: returns the next snapshot and the priced trade.
    pub fn swap(
        self,
        direction: SwapDirection,
        bid_amount: u64,
        minimum_ask: u64,
        rates: &SwapRates,
        referred: bool,
    ) -> Result<(Self, SwapQuote)> {
        let (reserve_in, reserve_out) = self.reserves_for(direction);
        let quote = quote_swap(
            reserve_in,
            reserve_out,
            bid_amount,
            minimum_ask,
            rates,
            referred,
        )?;

        let next_in = reserve_in
            .checked_add(quote.net_input)
            .ok_or(AmmError::Overflow)?;
        let next_out = reserve_out
            .checked_sub(quote.ask_amount)
            .ok_or(AmmError::Overflow)?;

        let next = match direction {
            SwapDirection::AToB => Self {
                reserve_a: next_in,
                reserve_b: next_out,
                ..self
            },
            SwapDirection::BToA => Self {
                reserve_a: next_out,
                reserve_b: next_in,
                ..self
            },
        };
        Ok((next, quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::PRECISION;
    use crate::errors::assert_amm_error;
    use proptest::prelude::*;

    const TAX: u64 = 2_500_000;

    fn rates(protocol_tax: u64, lp_fee: u64, referral: u64) -> SwapRates {
        SwapRates {
            protocol_tax,
            lp_fee,
            referral,
        }
    }

    #[test]
    fn test_zero_fee_quote_matches_curve() {
        let quote = quote_swap(1_000, 1_000, 10, 0, &SwapRates::default(), false).unwrap();
        // 1000 - floor(1000 * 1000 / 1010) = 1000 - 990
        assert_eq!(quote.ask_amount, 10);
        assert_eq!(quote.net_input, 10);

        let quote =
            quote_swap(4_000_000, 1_000_000, 1_000_000, 0, &SwapRates::default(), false).unwrap();
        // 1_000_000 - 4 * 10^12 / 5_000_000 = 200_000 exactly
        assert_eq!(quote.ask_amount, 200_000);
    }

    #[test]
    fn test_tax_withheld_from_bid() {
        let quote = quote_swap(
            1_000_300_000_000,
            1_000_300_000_000,
            100_000_000,
            0,
            &rates(TAX, 0, 0),
            false,
        )
        .unwrap();

        assert_eq!(quote.tax, 250_000);
        assert_eq!(quote.protocol_cut, 250_000);
        assert_eq!(quote.referral_cut, 0);
        assert_eq!(quote.net_input, 99_750_000);
        assert_eq!(quote.effective_input, 99_750_000);
        assert_eq!(quote.ask_amount, 99_740_054);
    }

    #[test]
    fn test_referral_splits_tax() {
        let quote = quote_swap(
            1_000_000_000,
            1_000_000_000,
            100_000_000,
            0,
            &rates(TAX, 0, 400_000_000),
            true,
        )
        .unwrap();

        assert_eq!(quote.tax, 250_000);
        assert_eq!(quote.referral_cut, 100_000);
        assert_eq!(quote.protocol_cut, 150_000);
        assert_eq!(quote.net_input, 99_750_000);

        let unreferred = quote_swap(
            1_000_000_000,
            1_000_000_000,
            100_000_000,
            0,
            &rates(TAX, 0, 400_000_000),
            false,
        )
        .unwrap();
        assert_eq!(unreferred.referral_cut, 0);
        assert_eq!(unreferred.protocol_cut, 250_000);
        assert_eq!(unreferred.ask_amount, quote.ask_amount);
    }

    #[test]
    fn test_lp_fee_stays_in_pool() {
        let balances = PoolBalances::new(1_000_000, 1_000_000, 1_000_000);
        let (next, quote) = balances
            .swap(SwapDirection::AToB, 10_000, 0, &rates(0, 3_000_000, 0), false)
            .unwrap();

        assert_eq!(quote.lp_fee, 30);
        assert_eq!(quote.effective_input, 9_970);
        // 1_000_000 - floor(10^12 / 1_009_970) = 1_000_000 - 990_128
        assert_eq!(quote.ask_amount, 9_872);
        assert_eq!(next.reserve_a, 1_010_000);
        assert_eq!(next.reserve_b, 990_128);
        assert_eq!(next.lp_supply, 1_000_000);

        let before = 1_000_000u128 * 1_000_000;
        let after = next.reserve_a as u128 * next.reserve_b as u128;
        assert!(after > before);
    }

    #[test]
    fn test_direction_selects_reserves() {
        let balances = PoolBalances::new(4_000_000, 1_000_000, 2_000_000);
        let (next, quote) = balances
            .swap(SwapDirection::BToA, 1_000_000, 0, &SwapRates::default(), false)
            .unwrap();

        // Rin = B = 1_000_000, Rout = A = 4_000_000
        assert_eq!(quote.ask_amount, 2_000_000);
        assert_eq!(next, PoolBalances::new(2_000_000, 2_000_000, 2_000_000));
    }

    #[test]
    fn test_swap_errors() {
        let none = SwapRates::default();
        assert_amm_error(quote_swap(1_000, 1_000, 0, 0, &none, false), AmmError::ZeroAmount);
        assert_amm_error(
            quote_swap(0, 1_000, 10, 0, &none, false),
            AmmError::InsufficientLiquidity,
        );
        assert_amm_error(
            quote_swap(1_000, 1_000, 10, 11, &none, false),
            AmmError::SlippageExceeded,
        );
        // Nothing left to price once the whole bid is taxed
        let confiscatory = rates(PRECISION, 0, 0);
        assert_amm_error(
            quote_swap(1_000, 1_000, 10, 0, &confiscatory, false),
            AmmError::ZeroAmount,
        );
        // Slippage is checked before the empty quote
        assert_amm_error(
            quote_swap(1_000, 1_000, 10, 1, &confiscatory, false),
            AmmError::SlippageExceeded,
        );
        assert_amm_error(
            PoolBalances::new(u64::MAX, 1_000, 1).swap(
                SwapDirection::AToB,
                u64::MAX,
                0,
                &none,
                false,
            ),
            AmmError::Overflow,
        );
    }

    #[test]
    fn test_swap_cannot_drain_output_reserve() {
        let balances = PoolBalances::new(1, 1, 1);
        assert_amm_error(
            balances.swap(SwapDirection::AToB, u64::MAX - 1, 0, &SwapRates::default(), false),
            AmmError::InsufficientLiquidity,
        );
        assert_amm_error(
            PoolBalances::new(10, 10, 10).swap(
                SwapDirection::AToB,
                1_000_000,
                0,
                &SwapRates::default(),
                false,
            ),
            AmmError::InsufficientLiquidity,
        );

        // 10 - floor(100 / 90) leaves a single unit behind
        let (next, quote) = PoolBalances::new(10, 10, 10)
            .swap(SwapDirection::AToB, 80, 0, &SwapRates::default(), false)
            .unwrap();
        assert_eq!(quote.ask_amount, 9);
        assert_eq!(next.reserve_b, 1);
    }

    proptest! {
        #[test]
        fn prop_product_kept_up_to_rounding(
            reserve_in in 1u64..1_000_000_000_000_000,
            reserve_out in 1u64..1_000_000_000_000_000,
            bid in 1u64..1_000_000_000_000,
            tax in 0u64..50_000_000,
            lp_fee in 0u64..50_000_000,
        ) {
            let balances = PoolBalances::new(reserve_in, reserve_out, 1);
            let swap_rates = rates(tax, lp_fee, 0);
            if let Ok((next, quote)) =
                balances.swap(SwapDirection::AToB, bid, 0, &swap_rates, false)
            {
                let before = reserve_in as u128 * reserve_out as u128;
                // one unit of Rout' absorbs the floor
                let with_rounding = next.reserve_a as u128 * (next.reserve_b as u128 + 1);
                prop_assert!(with_rounding > before);
                // the retained fee adds on top of the priced input
                prop_assert!(
                    with_rounding > before + quote.lp_fee as u128 * (next.reserve_b as u128 + 1)
                );
                prop_assert!(next.reserve_b > 0);
                prop_assert_eq!(quote.tax + quote.net_input, bid);
            }
        }
    }
}
