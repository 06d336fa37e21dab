//! Referrer Registration
//!
//! The trader registers who referred them on a given pool. The record is
//! created once and never changes; a second registration fails on `init`.

use anchor_lang::prelude::*;

use crate::errors::AmmError;
use crate::state::{Pool, Referrer};

/// Event emitted when a referral record is created
#[event]
pub struct ReferrerCreated {
    pub pool: Pubkey,
    pub referee: Pubkey,
    pub referrer: Pubkey,
}

/// Accounts for referrer registration
#[derive(Accounts)]
pub struct CreateReferrer<'info> {
    /// Trader being referred (pays for the record)
    #[account(mut)]
    pub referee: Signer<'info>,

    #[account(
        seeds = [Pool::SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init,
        payer = referee,
        space = 8 + Referrer::INIT_SPACE,
        seeds = [Referrer::SEED, pool.key().as_ref(), referee.key().as_ref()],
        bump,
    )]
    pub referrer: Account<'info, Referrer>,

    pub system_program: Program<'info, System>,
}

impl<'info> CreateReferrer<'info> {
    pub fn create_referrer(&mut self, owner: Pubkey, bumps: &CreateReferrerBumps) -> Result<()> {
        let referee = self.referee.key();
        require_keys_neq!(owner, referee, AmmError::InvalidReferrer);

        self.referrer.set_inner(Referrer {
            owner,
            referee,
            pool: self.pool.key(),
            bump: bumps.referrer,
        });

        msg!("Referrer {} registered for {}", owner, referee);

        emit!(ReferrerCreated {
            pool: self.pool.key(),
            referee,
            referrer: owner,
        });

        Ok(())
    }
}
