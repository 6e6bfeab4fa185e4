pub mod config;
pub mod types;

pub use config::RolloutConfig;
pub use types::*;
