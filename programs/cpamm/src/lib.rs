//! # Constant-Product Liquidity Pools
//!
//! Two-asset pools priced on the `x * y = k` curve.
//!
//! ## Overview
//!
//! - Providers deposit both assets at the current ratio and receive LP shares.
//! - Traders swap one asset for the other, paying a protocol tax (optionally
//!   split with a referrer) and an LP fee that stays in the pool.
//! - Each pool has an authority that can pause, resume or cancel it.
//!
//! Reserves are the balances of the pool's vaults and the share supply is the
//! supply of its LP mint, so there is no separate bookkeeping to drift.

use anchor_lang::prelude::*;

pub mod amm;
pub mod errors;
pub mod instructions;
pub mod state;

pub use instructions::*;

declare_id!("CPAMMpYvL5sDxR4wzT7vHGn2mR9eKqKtBXc3NfJ8hUa1");

#[program]
pub mod cpamm {
    use super::*;

    /// Create the global platform configuration (once)
    pub fn create_platform_config(
        ctx: Context<CreatePlatformConfig>,
        tax: u64,
        treasury: Pubkey,
        custom_fee_lamports: u64,
    ) -> Result<()> {
        ctx.accounts
            .create_platform_config(tax, treasury, custom_fee_lamports, &ctx.bumps)
    }

    /// Update the platform configuration (owner only)
    pub fn update_platform_config(
        ctx: Context<UpdatePlatformConfig>,
        tax: u64,
        treasury: Pubkey,
        custom_fee_lamports: u64,
    ) -> Result<()> {
        ctx.accounts
            .update_platform_config(tax, treasury, custom_fee_lamports)
    }

    /// Create a pool with its first deposit
    pub fn initialize(
        ctx: Context<Initialize>,
        amount_a: u64,
        amount_b: u64,
        lp_fee_rate: u64,
        referral_rate: u64,
    ) -> Result<()> {
        ctx.accounts
            .initialize(amount_a, amount_b, lp_fee_rate, referral_rate, &ctx.bumps)
    }

    /// Deposit both assets for LP shares
    pub fn add_liquidity(ctx: Context<AddLiquidity>, amount_a: u64, amount_b: u64) -> Result<()> {
        ctx.accounts.add_liquidity(amount_a, amount_b)
    }

    /// Burn LP shares for both assets
    pub fn remove_liquidity(ctx: Context<RemoveLiquidity>, shares: u64) -> Result<()> {
        ctx.accounts.remove_liquidity(shares)
    }

    /// Sell `bid_amount` of `bid_mint`, returns the amount received
    pub fn swap(
        ctx: Context<Swap>,
        bid_amount: u64,
        minimum_ask: u64,
        bid_mint: Pubkey,
    ) -> Result<u64> {
        ctx.accounts.swap(bid_amount, minimum_ask, bid_mint)
    }

    pub fn pause(ctx: Context<ManagePool>) -> Result<()> {
        ctx.accounts.pause()
    }

    pub fn resume(ctx: Context<ManagePool>) -> Result<()> {
        ctx.accounts.resume()
    }

    pub fn cancel(ctx: Context<ManagePool>) -> Result<()> {
        ctx.accounts.cancel()
    }

    pub fn update_lp_fee(ctx: Context<ManagePool>, rate: u64) -> Result<()> {
        ctx.accounts.update_lp_fee(rate)
    }

    pub fn update_referral_rate(ctx: Context<ManagePool>, rate: u64) -> Result<()> {
        ctx.accounts.update_referral_rate(rate)
    }

    pub fn transfer_ownership(ctx: Context<ManagePool>, new_authority: Pubkey) -> Result<()> {
        ctx.accounts.transfer_ownership(new_authority)
    }

    /// Register the caller's referrer on a pool
    pub fn create_referrer(ctx: Context<CreateReferrer>, referrer: Pubkey) -> Result<()> {
        ctx.accounts.create_referrer(referrer, &ctx.bumps)
    }
}
