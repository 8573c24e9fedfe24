pub mod info;
pub mod install;

use anyhow::{Context, Result};
use casapip_bootstrap::{BootstrapConfig, ConfigOverrides};

/// Environment (and `.env`) first, then command-line overrides on top.
pub(crate) fn load_config(overrides: ConfigOverrides) -> Result<BootstrapConfig> {
    BootstrapConfig::from_env(overrides).context("Invalid casapip configuration")
}
