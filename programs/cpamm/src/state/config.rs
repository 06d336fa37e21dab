//! Platform Configuration
//!
//! This account stores settings that apply to every pool. Pools copy the
//! tax rate at creation, so later updates only affect new pools.

use anchor_lang::prelude::*;

use crate::amm::PRECISION;
use crate::errors::AmmError;

/// Highest tax, LP fee or referral rate accepted anywhere (50%).
pub const MAX_RATE: u64 = PRECISION / 2;

/// LP fee rates above this (5%) cost the pool creator a surcharge.
pub const CUSTOM_FEE_BOUND: u64 = 50_000_000;

/// Global configuration account (singleton PDA)
///
/// Seeds: ["platform_config"]
#[account]
#[derive(InitSpace)]
pub struct PlatformConfig {
    /// Administrator allowed to update this account
    pub owner: Pubkey,

    /// Wallet whose token accounts collect the protocol tax
    pub treasury: Pubkey,

    /// Default protocol tax, parts per PRECISION
    pub tax: u64,

    /// Lamports charged for creating a pool with a custom LP fee
    pub custom_fee_lamports: u64,

    /// PDA bump seed
    pub bump: u8,

    pub created_at: i64,
    pub updated_at: i64,
}

impl PlatformConfig {
    pub const SEED: &'static [u8] = b"platform_config";

    pub fn ensure_owner(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.owner, AmmError::Unauthorized);
        Ok(())
    }

    /// Whether creating a pool with `lp_fee_rate` triggers the surcharge.
    pub fn surcharge_for(&self, lp_fee_rate: u64) -> u64 {
        if lp_fee_rate > CUSTOM_FEE_BOUND {
            self.custom_fee_lamports
        } else {
            0
        }
    }
}

pub fn validate_rate(rate: u64) -> Result<()> {
    require!(rate <= MAX_RATE, AmmError::FeeTooHigh);
    Ok(())
}
