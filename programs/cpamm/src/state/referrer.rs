//! Referrer Records
//!
//! A referral is scoped to one caller and one pool. Its address is derived
//! from both, so a swap can be matched to at most one record and no lookup
//! table is needed.

use anchor_lang::prelude::*;

use crate::errors::AmmError;

/// Referral record (immutable once created)
///
/// Seeds: ["referrer", pool, referee]
#[account]
#[derive(InitSpace)]
pub struct Referrer {
    /// Identity credited with the referral share of the tax
    pub owner: Pubkey,

    /// Caller whose swaps are attributed to `owner`
    pub referee: Pubkey,

    /// Pool this record applies to
    pub pool: Pubkey,

    /// PDA bump seed
    pub bump: u8,
}

impl Referrer {
    pub const SEED: &'static [u8] = b"referrer";

    /// Whether this record covers `trader` swapping on `pool`.
    pub fn ensure_covers(&self, pool: &Pubkey, trader: &Pubkey) -> Result<()> {
        require_keys_eq!(self.pool, *pool, AmmError::InvalidReferrer);
        require_keys_eq!(self.referee, *trader, AmmError::InvalidReferrer);
        Ok(())
    }

    /// The payout account, given as `(owner, mint)`, must belong to the
    /// referrer and hold the bid asset.
    pub fn ensure_destination(
        &self,
        destination: Option<(Pubkey, Pubkey)>,
        bid_mint: &Pubkey,
    ) -> Result<()> {
        let (owner, mint) = destination.ok_or(AmmError::InvalidReferrer)?;
        require_keys_eq!(owner, self.owner, AmmError::InvalidReferrer);
        require_keys_eq!(mint, *bid_mint, AmmError::InvalidReferrer);
        Ok(())
    }
}
