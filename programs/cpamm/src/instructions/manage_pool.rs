//! Pool Administration
//!
//! Lifecycle transitions and setting changes reserved to the pool authority.
//! The authority is checked before the pool state, so a stranger always
//! sees `Unauthorized`.

use anchor_lang::prelude::*;

use crate::state::{validate_rate, LifecycleEvent, Pool};

#[event]
pub struct PoolPaused {
    pub pool: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PoolResumed {
    pub pool: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PoolCanceled {
    pub pool: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct LpFeeUpdated {
    pub pool: Pubkey,
    pub old_rate: u64,
    pub new_rate: u64,
}

#[event]
pub struct ReferralRateUpdated {
    pub pool: Pubkey,
    pub old_rate: u64,
    pub new_rate: u64,
}

#[event]
pub struct OwnershipTransferred {
    pub pool: Pubkey,
    pub previous_authority: Pubkey,
    pub new_authority: Pubkey,
}

/// Accounts for authority-only pool instructions
#[derive(Accounts)]
pub struct ManagePool<'info> {
    /// Must match `pool.authority`
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [Pool::SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,
}

impl<'info> ManagePool<'info> {
    fn transition(&mut self, event: LifecycleEvent) -> Result<i64> {
        let now = Clock::get()?.unix_timestamp;
        self.pool.transition(&self.authority.key(), event, now)?;
        msg!("Pool {} -> {:?}", self.pool.key(), self.pool.state);
        Ok(now)
    }

    pub fn pause(&mut self) -> Result<()> {
        let timestamp = self.transition(LifecycleEvent::Pause)?;
        emit!(PoolPaused {
            pool: self.pool.key(),
            timestamp,
        });
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        let timestamp = self.transition(LifecycleEvent::Resume)?;
        emit!(PoolResumed {
            pool: self.pool.key(),
            timestamp,
        });
        Ok(())
    }

    /// Terminal. Liquidity stays locked in the vaults.
    pub fn cancel(&mut self) -> Result<()> {
        let timestamp = self.transition(LifecycleEvent::Cancel)?;
        emit!(PoolCanceled {
            pool: self.pool.key(),
            timestamp,
        });
        Ok(())
    }

    pub fn update_lp_fee(&mut self, rate: u64) -> Result<()> {
        self.pool.ensure_configurable(&self.authority.key())?;
        validate_rate(rate)?;

        let old_rate = self.pool.lp_fee_rate;
        self.pool.lp_fee_rate = rate;
        self.pool.updated_at = Clock::get()?.unix_timestamp;

        msg!("LP fee rate: {} -> {}", old_rate, rate);
        emit!(LpFeeUpdated {
            pool: self.pool.key(),
            old_rate,
            new_rate: rate,
        });
        Ok(())
    }

    pub fn update_referral_rate(&mut self, rate: u64) -> Result<()> {
        self.pool.ensure_configurable(&self.authority.key())?;
        validate_rate(rate)?;

        let old_rate = self.pool.referral_rate;
        self.pool.referral_rate = rate;
        self.pool.updated_at = Clock::get()?.unix_timestamp;

        msg!("Referral rate: {} -> {}", old_rate, rate);
        emit!(ReferralRateUpdated {
            pool: self.pool.key(),
            old_rate,
            new_rate: rate,
        });
        Ok(())
    }

    pub fn transfer_ownership(&mut self, new_authority: Pubkey) -> Result<()> {
        self.pool.ensure_configurable(&self.authority.key())?;

        let previous_authority = self.pool.authority;
        self.pool.authority = new_authority;
        self.pool.updated_at = Clock::get()?.unix_timestamp;

        msg!("Authority: {} -> {}", previous_authority, new_authority);
        emit!(OwnershipTransferred {
            pool: self.pool.key(),
            previous_authority,
            new_authority,
        });
        Ok(())
    }
}
