use anyhow::{Context, Result};
use casapip_bootstrap::{pipeline, ConfigOverrides, Inspection};

use super::load_config;

pub fn cmd_info(overrides: ConfigOverrides, json: bool) -> Result<()> {
    let config = load_config(overrides)?;
    let inspection = pipeline::inspect(&config).context("Could not inspect CASA installation")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
    } else {
        print!("{}", render_text(&inspection));
    }
    Ok(())
}

fn render_text(i: &Inspection) -> String {
    format!(
        "CASA Installation:\n  \
         Platform: {}\n  \
         Executable: {}\n  \
         Root: {}\n  \
         Python Version: {}\n\
         casapip Would Write:\n  \
         User Directory: {}\n  \
         Wrapper: {}\n  \
         Pip Wrapper: {}\n  \
         Site Packages: {}\n  \
         Startup File: {}\n\
         Download:\n  \
         URL: {}\n  \
         Checksum: {}\n",
        i.host.platform,
        i.host.executable.display(),
        i.host.root.display(),
        i.python_version,
        i.user_dir.display(),
        i.primary_wrapper.display(),
        i.secondary_wrapper.display(),
        i.site_packages.display(),
        i.startup_file.display(),
        i.pip_url,
        i.pip_checksum,
    )
}
