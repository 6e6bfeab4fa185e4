//! Command implementations for the switchyard binary.

pub mod deploy;
pub mod init;
pub mod plan;
pub mod run;
pub mod status;
pub mod swap;

use std::path::Path;

use tracing::debug;

use switchyard_core::RolloutConfig;

/// Load switchyard.toml, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> anyhow::Result<RolloutConfig> {
    if path.exists() {
        RolloutConfig::from_file(path)
    } else {
        debug!(path = %path.display(), "config file absent, using defaults");
        Ok(RolloutConfig::default())
    }
}
