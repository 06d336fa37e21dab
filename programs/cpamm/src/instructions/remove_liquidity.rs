//! Liquidity Withdrawal
//!
//! Burns shares and releases the matching fraction of both reserves,
//! rounded down so the pool keeps any remainder.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        burn, transfer_checked, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::amm::PoolBalances;
use crate::errors::AmmError;
use crate::state::Pool;

/// Event emitted when liquidity is removed
#[event]
pub struct LiquidityRemoved {
    pub pool: Pubkey,
    pub provider: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
    pub shares: u64,
}

/// Accounts for liquidity withdrawal
#[derive(Accounts)]
pub struct RemoveLiquidity<'info> {
    /// Liquidity provider burning shares
    #[account(mut)]
    pub provider: Signer<'info>,

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
        init_if_needed,
        payer = provider,
        associated_token::mint = mint_a,
        associated_token::authority = provider,
    )]
    pub provider_a: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = provider,
        associated_token::mint = mint_b,
        associated_token::authority = provider,
    )]
    pub provider_b: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = lp_mint,
        associated_token::authority = provider,
    )]
    pub provider_lp: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> RemoveLiquidity<'info> {
    pub fn balances(&self) -> PoolBalances {
        PoolBalances::new(self.vault_a.amount, self.vault_b.amount, self.lp_mint.supply)
    }

    pub fn remove_liquidity(&mut self, shares: u64) -> Result<()> {
        self.pool.ensure_active()?;

        let (next, withdrawal) = self
            .balances()
            .withdraw(shares, self.provider_lp.amount)?;

        msg!(
            "Remove liquidity: shares={}, a={}, b={}",
            withdrawal.shares,
            withdrawal.amount_a,
            withdrawal.amount_b
        );

        burn(
            CpiContext::new(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.lp_mint.to_account_info(),
                    from: self.provider_lp.to_account_info(),
                    authority: self.provider.to_account_info(),
                },
            ),
            withdrawal.shares,
        )?;

        let pool_seeds = &[
            Pool::SEED,
            self.pool.mint_a.as_ref(),
            self.pool.mint_b.as_ref(),
            &[self.pool.bump],
        ];
        let pool_signer = &[&pool_seeds[..]];

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.vault_a.to_account_info(),
                    mint: self.mint_a.to_account_info(),
                    to: self.provider_a.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            withdrawal.amount_a,
            self.mint_a.decimals,
        )?;

        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.vault_b.to_account_info(),
                    mint: self.mint_b.to_account_info(),
                    to: self.provider_b.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            withdrawal.amount_b,
            self.mint_b.decimals,
        )?;

        msg!(
            "Reserves: a={}, b={}, lp_supply={}",
            next.reserve_a,
            next.reserve_b,
            next.lp_supply
        );

        emit!(LiquidityRemoved {
            pool: self.pool.key(),
            provider: self.provider.key(),
            amount_a: withdrawal.amount_a,
            amount_b: withdrawal.amount_b,
            shares: withdrawal.shares,
        });

        Ok(())
    }
}
