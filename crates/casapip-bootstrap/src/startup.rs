//! Patch CASA's `init.py` so user-installed packages are importable.
//!
//! Known issue: the snippet is appended on every run with no duplicate check,
//! so re-running the bootstrap leaves repeated `site.addsitedir` blocks.

use std::path::{Path, PathBuf};

use crate::config::BootstrapConfig;
use crate::error::Result;
use crate::info_log;

pub fn render_snippet(site_packages: &Path) -> String {
    format!(
        "\nimport site\nsite.addsitedir(\"{}\")\n",
        site_packages.display()
    )
}

/// Append the snippet to `<user dir>/init.py`, creating the file if needed.
pub fn patch_startup(config: &BootstrapConfig, version: &str) -> Result<PathBuf> {
    let init = config.startup_file_path();
    info_log!("Setting up {}", init.display());
    let snippet = render_snippet(&config.site_packages(version));
    casapip_fs::append_file(&init, &snippet)?;
    Ok(init)
}
