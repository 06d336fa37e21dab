//! Swapping
//!
//! Sells `bid_amount` of one pool asset for the other. The tax is withheld
//! from the bid before pricing and routed to the treasury, minus the
//! referrer's share when the trader has a referral record on this pool.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::amm::{PoolBalances, SwapDirection};
use crate::errors::AmmError;
use crate::state::{PlatformConfig, Pool, Referrer};

/// Event emitted on every swap
#[event]
pub struct Swapped {
    pub pool: Pubkey,
    pub trader: Pubkey,
    pub bid_mint: Pubkey,
    pub bid_amount: u64,
    pub ask_amount: u64,
    pub protocol_tax: u64,
    pub referral_cut: u64,
    pub lp_fee: u64,
    pub referrer: Option<Pubkey>,
}

/// Accounts for a swap
#[derive(Accounts)]
pub struct Swap<'info> {
    /// Trader selling the bid asset
    #[account(mut)]
    pub trader: Signer<'info>,

    #[account(
        seeds = [PlatformConfig::SEED],
        bump = platform_config.bump,
    )]
    pub platform_config: Box<Account<'info, PlatformConfig>>,

    #[account(
        seeds = [Pool::SEED, pool.mint_a.as_ref(), pool.mint_b.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(address = pool.mint_a @ AmmError::InvalidAsset)]
    pub mint_a: Box<InterfaceAccount<'info, Mint>>,

    #[account(address = pool.mint_b @ AmmError::InvalidAsset)]
    pub mint_b: Box<InterfaceAccount<'info, Mint>>,

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
        payer = trader,
        associated_token::mint = mint_a,
        associated_token::authority = trader,
    )]
    pub trader_a: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = mint_b,
        associated_token::authority = trader,
    )]
    pub trader_b: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Treasury token account for the bid asset
    #[account(
        mut,
        constraint = tax_destination.owner == platform_config.treasury @ AmmError::Unauthorized,
    )]
    pub tax_destination: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: referral record address of the trader on this pool. Holds a
    /// `Referrer` when one was registered and is empty otherwise.
    #[account(
        seeds = [Referrer::SEED, pool.key().as_ref(), trader.key().as_ref()],
        bump,
    )]
    pub referrer: UncheckedAccount<'info>,

    /// Referrer's token account for the bid asset
    #[account(mut)]
    pub referrer_destination: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> Swap<'info> {
    /// Reserve snapshot. Swaps never change the share supply, so it is not read.
    pub fn balances(&self) -> PoolBalances {
        PoolBalances::new(self.vault_a.amount, self.vault_b.amount, 0)
    }

    /// Load the trader's referral record, if registered, and check its
    /// payout account against the bid mint.
    fn referral_route(&self, bid_mint: &Pubkey) -> Result<Option<Pubkey>> {
        if self.referrer.data_is_empty() {
            return Ok(None);
        }
        require_keys_eq!(*self.referrer.owner, crate::ID, AmmError::InvalidReferrer);
        let record = Referrer::try_deserialize(&mut &self.referrer.try_borrow_data()?[..])?;
        record.ensure_covers(&self.pool.key(), &self.trader.key())?;

        let destination = self
            .referrer_destination
            .as_ref()
            .map(|account| (account.owner, account.mint));
        record.ensure_destination(destination, bid_mint)?;

        Ok(Some(record.owner))
    }

    /// Move `amount` out of the trader's account, signed by the trader.
    fn pay_from_trader(
        &self,
        from: &InterfaceAccount<'info, TokenAccount>,
        to: AccountInfo<'info>,
        mint: &InterfaceAccount<'info, Mint>,
        amount: u64,
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: from.to_account_info(),
                    mint: mint.to_account_info(),
                    to,
                    authority: self.trader.to_account_info(),
                },
            ),
            amount,
            mint.decimals,
        )
    }

    pub fn swap(&mut self, bid_amount: u64, minimum_ask: u64, bid_mint: Pubkey) -> Result<u64> {
        self.pool.ensure_active()?;
        let direction = self.pool.direction_of(&bid_mint)?;

        require_keys_eq!(
            self.tax_destination.mint,
            bid_mint,
            AmmError::InvalidAsset
        );
        let referrer = self.referral_route(&bid_mint)?;

        let (next, quote) = self.balances().swap(
            direction,
            bid_amount,
            minimum_ask,
            &self.pool.swap_rates(),
            referrer.is_some(),
        )?;

        msg!(
            "Swap: bid={}, tax={}, referral={}, lp_fee={}, ask={}",
            quote.bid_amount,
            quote.tax,
            quote.referral_cut,
            quote.lp_fee,
            quote.ask_amount
        );

        let (vault_in, vault_out, trader_in, trader_out, mint_in, mint_out) = match direction {
            SwapDirection::AToB => (
                &self.vault_a,
                &self.vault_b,
                &self.trader_a,
                &self.trader_b,
                &self.mint_a,
                &self.mint_b,
            ),
            SwapDirection::BToA => (
                &self.vault_b,
                &self.vault_a,
                &self.trader_b,
                &self.trader_a,
                &self.mint_b,
                &self.mint_a,
            ),
        };

        self.pay_from_trader(
            trader_in,
            vault_in.to_account_info(),
            mint_in,
            quote.net_input,
        )?;
        self.pay_from_trader(
            trader_in,
            self.tax_destination.to_account_info(),
            mint_in,
            quote.protocol_cut,
        )?;
        // referral_cut is zero unless a record was validated above
        if let Some(destination) = self.referrer_destination.as_ref() {
            self.pay_from_trader(
                trader_in,
                destination.to_account_info(),
                mint_in,
                quote.referral_cut,
            )?;
        }

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
                    from: vault_out.to_account_info(),
                    mint: mint_out.to_account_info(),
                    to: trader_out.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            quote.ask_amount,
            mint_out.decimals,
        )?;

        msg!("Reserves: a={}, b={}", next.reserve_a, next.reserve_b);

        emit!(Swapped {
            pool: self.pool.key(),
            trader: self.trader.key(),
            bid_mint,
            bid_amount: quote.bid_amount,
            ask_amount: quote.ask_amount,
            protocol_tax: quote.protocol_cut,
            referral_cut: quote.referral_cut,
            lp_fee: quote.lp_fee,
            referrer,
        });

        Ok(quote.ask_amount)
    }
}
