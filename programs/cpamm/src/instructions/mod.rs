//! Instruction handlers for the liquidity pool program
//!
//! - `admin` - Platform configuration (owner only)
//! - `initialize` - Create a pool and take its first deposit
//! - `add_liquidity` / `remove_liquidity` - Mint and burn pool shares
//! - `swap` - Trade one pool asset for the other
//! - `manage_pool` - Lifecycle and settings (pool authority only)
//! - `create_referrer` - Register a referral record

pub mod add_liquidity;
pub mod admin;
pub mod create_referrer;
pub mod initialize;
pub mod manage_pool;
pub mod remove_liquidity;
pub mod swap;

pub use add_liquidity::*;
pub use admin::*;
pub use create_referrer::*;
pub use initialize::*;
pub use manage_pool::*;
pub use remove_liquidity::*;
pub use swap::*;
