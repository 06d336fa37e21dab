pub mod platform_config;

pub use platform_config::*;
