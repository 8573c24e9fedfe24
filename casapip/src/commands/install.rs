//! `casapip` with no subcommand: the full bootstrap.

use anyhow::{Context, Result};
use casapip_bootstrap::{pipeline, ArchiveFetcher, BootstrapConfig, ConfigOverrides};

use super::load_config;

pub fn cmd_install(overrides: ConfigOverrides) -> Result<()> {
    let config = load_config(overrides)?;
    tracing::debug!(
        platform = %config.platform,
        user_dir = %config.user_dir.display(),
        pip_url = %config.pip_url,
        "starting bootstrap"
    );
    let fetcher = fetcher_for(&config)?;
    let report = pipeline::run(&config, fetcher.as_ref()).context("casapip bootstrap failed")?;

    eprintln!();
    eprintln!("You should now add {} to your PATH", report.bin_dir.display());
    Ok(())
}

#[cfg(feature = "download")]
fn fetcher_for(config: &BootstrapConfig) -> Result<Box<dyn ArchiveFetcher>> {
    Ok(Box::new(casapip_bootstrap::HttpFetcher::new(config)))
}

#[cfg(not(feature = "download"))]
fn fetcher_for(config: &BootstrapConfig) -> Result<Box<dyn ArchiveFetcher>> {
    anyhow::bail!(
        "casapip was built without the `download` feature; cannot fetch {}",
        config.pip_url
    )
}
