//! Pool Creation
//!
//! Creates the pool account, its LP mint and both vaults, then takes the
//! first deposit. The first deposit fixes the initial price and mints
//! `isqrt(a * b)` shares to the creator, who becomes the pool authority.
//! Tokens sent to the vault addresses ahead of creation are kept as reserves
//! and belong to the creator's shares.

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::amm::PoolBalances;
use crate::errors::AmmError;
use crate::state::{validate_rate, LifecycleEvent, PlatformConfig, Pool};

/// Event emitted when a pool is created
#[event]
pub struct PoolInitialized {
    pub pool: Pubkey,
    pub authority: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub lp_mint: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
    pub shares: u64,
    pub lp_fee_rate: u64,
    pub protocol_tax_rate: u64,
    pub referral_rate: u64,
    pub created_at: i64,
}

/// Accounts required to create a pool
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Pool creator (pays for accounts, becomes the authority)
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Platform configuration the tax rate is copied from
    #[account(
        seeds = [PlatformConfig::SEED],
        bump = platform_config.bump,
    )]
    pub platform_config: Box<Account<'info, PlatformConfig>>,

    /// Receives the custom fee surcharge
    #[account(mut, address = platform_config.treasury)]
    pub treasury: SystemAccount<'info>,

    /// The new pool account
    #[account(
        init,
        payer = authority,
        space = 8 + Pool::INIT_SPACE,
        seeds = [Pool::SEED, mint_a.key().as_ref(), mint_b.key().as_ref()],
        bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// First asset of the pair
    pub mint_a: Box<InterfaceAccount<'info, Mint>>,

    /// Second asset of the pair
    pub mint_b: Box<InterfaceAccount<'info, Mint>>,

    /// Liquidity share mint (created for this pool)
    #[account(
        init,
        payer = authority,
        mint::decimals = Pool::LP_MINT_DECIMALS,
        mint::authority = pool,
        seeds = [Pool::LP_MINT_SEED, pool.key().as_ref()],
        bump,
    )]
    pub lp_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Pool vault for asset A (may already exist, anyone can open it)
    #[account(
        init_if_needed,
        payer = authority,
        associated_token::mint = mint_a,
        associated_token::authority = pool,
    )]
    pub vault_a: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Pool vault for asset B (may already exist, anyone can open it)
    #[account(
        init_if_needed,
        payer = authority,
        associated_token::mint = mint_b,
        associated_token::authority = pool,
    )]
    pub vault_b: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Creator's asset A account
    #[account(
        mut,
        associated_token::mint = mint_a,
        associated_token::authority = authority,
    )]
    pub authority_a: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Creator's asset B account
    #[account(
        mut,
        associated_token::mint = mint_b,
        associated_token::authority = authority,
    )]
    pub authority_b: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Creator's LP account
    #[account(
        init_if_needed,
        payer = authority,
        associated_token::mint = lp_mint,
        associated_token::authority = authority,
    )]
    pub authority_lp: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    pub fn initialize(
        &mut self,
        amount_a: u64,
        amount_b: u64,
        lp_fee_rate: u64,
        referral_rate: u64,
        bumps: &InitializeBumps,
    ) -> Result<()> {
        let mint_a = self.mint_a.key();
        let mint_b = self.mint_b.key();

        require_keys_neq!(mint_a, mint_b, AmmError::IdenticalMints);
        validate_rate(lp_fee_rate)?;
        validate_rate(referral_rate)?;

        let state = self.pool.state.apply(LifecycleEvent::Initialize)?;
        // Balances already sitting in the vaults go to the first provider
        let existing = PoolBalances::new(self.vault_a.amount, self.vault_b.amount, 0);
        let (_, deposit) = existing.deposit(amount_a, amount_b)?;
        let protocol_tax_rate = self.platform_config.tax;
        let now = Clock::get()?.unix_timestamp;

        msg!(
            "Initialize: a={}, b={}, lp_fee_rate={}, tax={}",
            amount_a,
            amount_b,
            lp_fee_rate,
            protocol_tax_rate
        );

        let surcharge = self.platform_config.surcharge_for(lp_fee_rate);
        if surcharge > 0 {
            system_program::transfer(
                CpiContext::new(
                    self.system_program.to_account_info(),
                    system_program::Transfer {
                        from: self.authority.to_account_info(),
                        to: self.treasury.to_account_info(),
                    },
                ),
                surcharge,
            )?;
            msg!("Custom fee surcharge: {} lamports", surcharge);
        }

        // Deposit asset A
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.authority_a.to_account_info(),
                    mint: self.mint_a.to_account_info(),
                    to: self.vault_a.to_account_info(),
                    authority: self.authority.to_account_info(),
                },
            ),
            deposit.amount_a,
            self.mint_a.decimals,
        )?;

        // Deposit asset B
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.authority_b.to_account_info(),
                    mint: self.mint_b.to_account_info(),
                    to: self.vault_b.to_account_info(),
                    authority: self.authority.to_account_info(),
                },
            ),
            deposit.amount_b,
            self.mint_b.decimals,
        )?;

        // Mint initial shares
        let pool_seeds = &[
            Pool::SEED,
            mint_a.as_ref(),
            mint_b.as_ref(),
            &[bumps.pool],
        ];
        let pool_signer = &[&pool_seeds[..]];

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.lp_mint.to_account_info(),
                    to: self.authority_lp.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            deposit.shares,
        )?;

        self.pool.set_inner(Pool {
            authority: self.authority.key(),
            mint_a,
            mint_b,
            lp_mint: self.lp_mint.key(),
            lp_fee_rate,
            protocol_tax_rate,
            referral_rate,
            state,
            bump: bumps.pool,
            created_at: now,
            updated_at: now,
        });

        emit!(PoolInitialized {
            pool: self.pool.key(),
            authority: self.authority.key(),
            mint_a,
            mint_b,
            lp_mint: self.lp_mint.key(),
            amount_a: deposit.amount_a,
            amount_b: deposit.amount_b,
            shares: deposit.shares,
            lp_fee_rate,
            protocol_tax_rate,
            referral_rate,
            created_at: now,
        });

        Ok(())
    }
}
