//! Program errors
//!
//! Every failure is synchronous and final: the transaction reverts and no
//! partial state survives.

use anchor_lang::prelude::*;

#[error_code]
pub enum AmmError {
    #[msg("Operation is not valid in the current pool state")]
    InvalidPoolState,
    #[msg("Caller is not the pool authority")]
    Unauthorized,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Deposit would mint zero liquidity shares")]
    ZeroLiquidity,
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Not enough liquidity")]
    InsufficientLiquidity,
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,
    #[msg("Mint does not belong to this pool")]
    InvalidAsset,
    #[msg("Rate exceeds the allowed maximum")]
    FeeTooHigh,
    #[msg("Pool mints must differ")]
    IdenticalMints,
    #[msg("Referrer record does not match this swap")]
    InvalidReferrer,
}

#[cfg(test)]
pub(crate) fn assert_amm_error<T: std::fmt::Debug>(result: Result<T>, expected: AmmError) {
    let expected: anchor_lang::error::Error = expected.into();
    assert_eq!(result.unwrap_err(), expected);
}
