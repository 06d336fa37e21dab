//! # Automated Market Maker (AMM) Module
//!
//! Pure pricing logic for a two-asset constant-product pool. Nothing in
//! here touches accounts: every operation takes a [`PoolBalances`] snapshot
//! and returns the next one together with the amounts to move.
//!
//! ```text
//!   ┌────────────────────────────────────────────┐
//!   │                 x * y = k                  │
//!   │                                            │
//!   │   y ▲                                      │
//!   │     │╲                                     │
//!   │     │  ╲                                   │
//!   │     │    ╲___                              │
//!   │     │        ‾‾‾───____                    │
//!   │     └──────────────────────▶ x             │
//!   │                                            │
//!   │ Swaps slide along the curve, LP fees       │
//!   │ push it outwards, deposits scale it.       │
//!   └────────────────────────────────────────────┘
//! ```

pub mod fixed_point;
pub mod liquidity;
pub mod swap;

pub use fixed_point::*;
pub use liquidity::*;
pub use swap::*;
