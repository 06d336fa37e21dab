//! Liquidity Pool State
//!
//! Each pool trades one ordered pair of mints. Reserves are not stored here:
//! they are the balances of the pool's vaults, and the share supply is the
//! supply of its LP mint.

use anchor_lang::prelude::*;

use crate::amm::{SwapDirection, SwapRates};
use crate::errors::AmmError;

/// Pool account
///
/// Seeds: ["pool", mint_a, mint_b]
#[account]
#[derive(InitSpace)]
pub struct Pool {
    /// Identity allowed to pause, resume, cancel and tune the pool
    pub authority: Pubkey,

    /// First asset of the pair (order fixed at creation)
    pub mint_a: Pubkey,

    /// Second asset of the pair
    pub mint_b: Pubkey,

    /// Liquidity share mint, authority is this pool
    pub lp_mint: Pubkey,

    /// Part of each swap's net input kept for providers, parts per PRECISION
    pub lp_fee_rate: u64,

    /// Part of each swap's input sent to the treasury, copied from the
    /// platform config at creation
    pub protocol_tax_rate: u64,

    /// Part of the tax redirected to a registered referrer
    pub referral_rate: u64,

    /// Lifecycle status
    pub state: PoolState,

    /// PDA bump seed
    pub bump: u8,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Pool {
    pub const SEED: &'static [u8] = b"pool";
    pub const LP_MINT_SEED: &'static [u8] = b"lp_mint";
    pub const LP_MINT_DECIMALS: u8 = 6;

    pub fn is_active(&self) -> bool {
        self.state == PoolState::Initialized
    }

    /// Liquidity and swap instructions only run on an initialized pool.
    pub fn ensure_active(&self) -> Result<()> {
        require!(self.is_active(), AmmError::InvalidPoolState);
        Ok(())
    }

    pub fn ensure_authority(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.authority, AmmError::Unauthorized);
        Ok(())
    }

    /// Authority check first, then the lifecycle transition.
    pub fn transition(&mut self, caller: &Pubkey, event: LifecycleEvent, now: i64) -> Result<()> {
        self.ensure_authority(caller)?;
        self.state = self.state.apply(event)?;
        self.updated_at = now;
        Ok(())
    }

    /// Settings may change in any state except the terminal one.
    pub fn ensure_configurable(&self, caller: &Pubkey) -> Result<()> {
        self.ensure_authority(caller)?;
        require!(
            self.state != PoolState::Canceled,
            AmmError::InvalidPoolState
        );
        Ok(())
    }

    /// Resolve the trading direction from the mint being sold.
    pub fn direction_of(&self, bid_mint: &Pubkey) -> Result<SwapDirection> {
        if *bid_mint == self.mint_a {
            Ok(SwapDirection::AToB)
        } else if *bid_mint == self.mint_b {
            Ok(SwapDirection::BToA)
        } else {
            err!(AmmError::InvalidAsset)
        }
    }

    pub fn swap_rates(&self) -> SwapRates {
        SwapRates {
            protocol_tax: self.protocol_tax_rate,
            lp_fee: self.lp_fee_rate,
            referral: self.referral_rate,
        }
    }
}

/// Pool lifecycle status
///
/// ```text
/// Uninitialized ──initialize──▶ Initialized ──cancel──▶ Canceled
///                                 │     ▲
///                            pause│     │resume
///                                 ▼     │
///                                 Paused
/// ```
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum PoolState {
    #[default]
    Uninitialized,
    Initialized,
    Paused,
    Canceled,
}

/// Inputs of the lifecycle state machine
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LifecycleEvent {
    Initialize,
    Pause,
    Resume,
    Cancel,
}

impl PoolState {
    /// Next state, or `InvalidPoolState` when the event does not apply.
    pub fn apply(self, event: LifecycleEvent) -> Result<PoolState> {
        match (self, event) {
            (PoolState::Uninitialized, LifecycleEvent::Initialize) => Ok(PoolState::Initialized),
            (PoolState::Initialized, LifecycleEvent::Pause) => Ok(PoolState::Paused),
            (PoolState::Paused, LifecycleEvent::Resume) => Ok(PoolState::Initialized),
            // A paused pool must be resumed before it can be canceled
            (PoolState::Initialized, LifecycleEvent::Cancel) => Ok(PoolState::Canceled),
            _ => err!(AmmError::InvalidPoolState),
        }
    }
}
