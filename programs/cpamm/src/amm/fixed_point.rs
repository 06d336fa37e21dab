//! # Fixed-Point Arithmetic
//!
//! Integer-only helpers shared by the liquidity and swap engines.
//!
//! ```text
//!   amounts, reserves, shares ........ u64 (smallest token unit)
//!   products and quotients ........... u128 intermediates
//!   rates ............................ parts per PRECISION (10^9)
//! ```
//!
//! Nothing here wraps: every overflow, including narrowing a `u128` result
//! back to `u64`, surfaces as [`AmmError::Overflow`].

use anchor_lang::prelude::*;

use crate::errors::AmmError;

/// Denominator of every rate (tax, LP fee, referral share).
pub const PRECISION: u64 = 1_000_000_000;

/// `floor(a * b / denominator)`
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> Result<u128> {
    let product = a.checked_mul(b).ok_or(AmmError::Overflow)?;
    Ok(product.checked_div(denominator).ok_or(AmmError::Overflow)?)
}

/// `ceil(a * b / denominator)`, used wherever rounding must favor the pool.
pub fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> Result<u128> {
    require!(denominator > 0, AmmError::Overflow);
    let product = a.checked_mul(b).ok_or(AmmError::Overflow)?;
    let quotient = product / denominator;
    if product % denominator == 0 {
        Ok(quotient)
    } else {
        Ok(quotient.checked_add(1).ok_or(AmmError::Overflow)?)
    }
}

/// Narrow an intermediate back to the token unit width.
pub fn to_u64(value: u128) -> Result<u64> {
    Ok(u64::try_from(value).map_err(|_| AmmError::Overflow)?)
}

/// Portion of `amount` selected by a PRECISION-scaled `rate`, rounded down.
///
/// ```ignore
/// // 0.25% of 100 tokens (6 decimals)
/// assert_eq!(apply_rate(100_000_000, 2_500_000)?, 250_000);
/// ```
pub fn apply_rate(amount: u64, rate: u64) -> Result<u64> {
    to_u64(mul_div_floor(
        amount as u128,
        rate as u128,
        PRECISION as u128,
    )?)
}

/// Integer square root using Newton's method
///
/// Computes floor(√x) for any non-negative integer. Converges
/// quadratically from the initial guess `(x + 1) / 2`.
pub fn isqrt(x: u128) -> u128 {
    if x == 0 {
        return 0;
    }

    // (x + 1) / 2 without overflowing at u128::MAX
    let mut z = x / 2 + (x & 1);
    let mut y = x;

    while z < y {
        y = z;
        z = (x / z + z) / 2;
    }

    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::assert_amm_error;

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(10), 3);
        assert_eq!(isqrt(1_000_000), 1_000);
        assert_eq!(isqrt(1_000_000_000_000), 1_000_000);
    }

    #[test]
    fn test_isqrt_extremes() {
        let max = u64::MAX as u128;
        assert_eq!(isqrt(max * max), max);
        assert_eq!(isqrt(max * max - 1), max - 1);
        assert_eq!(isqrt(u128::MAX), max);
    }

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(mul_div_floor(7, 3, 2).unwrap(), 10);
        assert_eq!(mul_div_ceil(7, 3, 2).unwrap(), 11);
        assert_eq!(mul_div_ceil(6, 3, 2).unwrap(), 9);
    }

    #[test]
    fn test_mul_div_errors() {
        assert_amm_error(mul_div_floor(1, 1, 0), AmmError::Overflow);
        assert_amm_error(mul_div_ceil(u128::MAX, 2, 1), AmmError::Overflow);
        assert_amm_error(to_u64(u64::MAX as u128 + 1), AmmError::Overflow);
    }

    #[test]
    fn test_apply_rate() {
        assert_eq!(apply_rate(100_000_000, 2_500_000).unwrap(), 250_000);
        assert_eq!(apply_rate(u64::MAX, PRECISION).unwrap(), u64::MAX);
        assert_eq!(apply_rate(399, 2_500_000).unwrap(), 0);
        assert_eq!(apply_rate(12_345, 0).unwrap(), 0);
    }
}
