//! Liquidity Provision
//!
//! Deposits both assets at the current reserve ratio and mints shares.
//! Only the ratio-matched part of the requested amounts is debited.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::amm::PoolBalances;
use crate::errors::AmmError;
use crate::state::Pool;

/// Event emitted when liquidity is added
#[event]
pub struct LiquidityAdded {
    pub pool: Pubkey,
    pub provider: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
    pub shares: u64,
}

/// Accounts for liquidity provision
#[derive(Accounts)]
pub struct AddLiquidity<'info> {
    /// Liquidity provider
    #[account(mut)]
    pub provider: Signer<'info>,

    /// Pool receiving liquidity
    #[account(
        seeds = [Pool::SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(address = pool.mint_a @ AmmError::InvalidAsset)]
    pub mint_a: Box<InterfaceAccount<'info, Mint>>,

    #[account(address = pool.mint_b @ AmmError::InvalidAsset)]
    pub mint_b: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = pool.lp_mint @ AmmError::InvalidAsset)]
    pub lp_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = mint_a,
        associated_token::authority = pool,
    )]
    pub vault_a: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_b,
        associated_token::authority = pool,
    )]
    pub vault_b: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_a,
        associated_token::authority = provider,
    )]
    pub provider_a: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = mint_b,
        associated_token::authority = provider,
    )]
    pub provider_b: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = provider,
        associated_token::mint = lp_mint,
        associated_token::authority = provider,
    )]
    pub provider_lp: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> AddLiquidity<'info> {
    pub fn balances(&self) -> PoolBalances {
        PoolBalances::new(self.vault_a.amount, self.vault_b.amount, self.lp_mint.supply)
    }

    pub fn add_liquidity(&mut self, amount_a: u64, amount_b: u64) -> Result<()> {
        self.pool.ensure_active()?;

        let (next, deposit) = self.balances().deposit(amount_a, amount_b)?;

        msg!(
            "Add liquidity: desired=({}, {}), accepted=({}, {}), shares={}",
            amount_a,
            amount_b,
            deposit.amount_a,
            deposit.amount_b,
            deposit.shares
        );

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.provider_a.to_account_info(),
                    mint: self.mint_a.to_account_info(),
                    to: self.vault_a.to_account_info(),
                    authority: self.provider.to_account_info(),
                },
            ),
            deposit.amount_a,
            self.mint_a.decimals,
        )?;

        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.provider_b.to_account_info(),
                    mint: self.mint_b.to_account_info(),
                    to: self.vault_b.to_account_info(),
                    authority: self.provider.to_account_info(),
                },
            ),
            deposit.amount_b,
            self.mint_b.decimals,
        )?;

        let pool_seeds = &[
            Pool::SEED,
            self.pool.mint_a.as_ref(),
            self.pool.mint_b.as_ref(),
            &[self.pool.bump],
        ];
        let pool_signer = &[&pool_seeds[..]];

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.lp_mint.to_account_info(),
                    to: self.provider_lp.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            deposit.shares,
        )?;

        msg!(
            "Reserves: a={}, b={}, lp_supply={}",
            next.reserve_a,
            next.reserve_b,
            next.lp_supply
        );

        emit!(LiquidityAdded {
            pool: self.pool.key(),
            provider: self.provider.key(),
            amount_a: deposit.amount_a,
            amount_b: deposit.amount_b,
            shares: deposit.shares,
        });

        Ok(())
    }
}
