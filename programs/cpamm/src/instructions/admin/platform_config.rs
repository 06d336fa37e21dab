//! Platform Configuration Administration
//!
//! The first caller of `create_platform_config` becomes its owner; the
//! account is a singleton PDA so later calls fail on `init`.

use anchor_lang::prelude::*;

use crate::state::{validate_rate, PlatformConfig};

/// Event emitted when the platform config is created
#[event]
pub struct PlatformConfigCreated {
    pub owner: Pubkey,
    pub treasury: Pubkey,
    pub tax: u64,
    pub custom_fee_lamports: u64,
}

/// Event emitted when the platform config changes
#[event]
pub struct PlatformConfigUpdated {
    pub owner: Pubkey,
    pub treasury: Pubkey,
    pub tax: u64,
    pub custom_fee_lamports: u64,
    pub updated_at: i64,
}

/// Accounts required to create the platform config
#[derive(Accounts)]
pub struct CreatePlatformConfig<'info> {
    /// Administrator (becomes the owner)
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = owner,
        space = 8 + PlatformConfig::INIT_SPACE,
        seeds = [PlatformConfig::SEED],
        bump,
    )]
    pub platform_config: Account<'info, PlatformConfig>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> CreatePlatformConfig<'info> {
    pub fn create_platform_config(
        &mut self,
        tax: u64,
        treasury: Pubkey,
        custom_fee_lamports: u64,
        bumps: &CreatePlatformConfigBumps,
    ) -> Result<()> {
        validate_rate(tax)?;
        let now = Clock::get()?.unix_timestamp;

        self.platform_config.set_inner(PlatformConfig {
            owner: self.owner.key(),
            treasury,
            tax,
            custom_fee_lamports,
            bump: bumps.platform_config,
            created_at: now,
            updated_at: now,
        });

        msg!("Platform config created");
        msg!("Owner: {}", self.owner.key());
        msg!("Treasury: {}", treasury);
        msg!("Tax: {}", tax);

        emit!(PlatformConfigCreated {
            owner: self.owner.key(),
            treasury,
            tax,
            custom_fee_lamports,
        });

        Ok(())
    }
}

/// Accounts required to update the platform config
#[derive(Accounts)]
pub struct UpdatePlatformConfig<'info> {
    /// Current owner
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [PlatformConfig::SEED],
        bump = platform_config.bump,
    )]
    pub platform_config: Account<'info, PlatformConfig>,
}

impl<'info> UpdatePlatformConfig<'info> {
    pub fn update_platform_config(
        &mut self,
        tax: u64,
        treasury: Pubkey,
        custom_fee_lamports: u64,
    ) -> Result<()> {
        self.platform_config.ensure_owner(&self.owner.key())?;
        validate_rate(tax)?;

        let config = &mut self.platform_config;
        config.tax = tax;
        config.treasury = treasury;
        config.custom_fee_lamports = custom_fee_lamports;
        config.updated_at = Clock::get()?.unix_timestamp;

        msg!("Platform config updated: tax={}, treasury={}", tax, treasury);

        emit!(PlatformConfigUpdated {
            owner: config.owner,
            treasury,
            tax,
            custom_fee_lamports,
            updated_at: config.updated_at,
        });

        Ok(())
    }
}
