//! State structures for the pool program

pub mod config;
pub mod pool;
pub mod referrer;

pub use config::*;
pub use pool::*;
pub use referrer::*;
