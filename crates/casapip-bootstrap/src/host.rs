//! Locate the CASA launcher and derive its installation root.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, Result};
use crate::info_log;
use crate::platform::HostPlatform;

/// A resolved CASA installation. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostInstallation {
    pub platform: HostPlatform,
    /// Symlink-free path of the launcher.
    pub executable: PathBuf,
    /// Root the wrapper's `INSTALLPATH` points at.
    pub root: PathBuf,
}

impl HostInstallation {
    /// Derive the layout from a resolved launcher path.
    ///
    /// The root is two `dirname`s above the launcher on both layouts:
    /// `CASA.app/Contents/MacOS/casapy` → `CASA.app/Contents`,
    /// `casa-x.y/bin/casapy` → `casa-x.y`.
    pub fn from_executable(platform: HostPlatform, executable: PathBuf) -> Self {
        let root = executable
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        Self {
            platform,
            executable,
            root,
        }
    }

    /// Directory holding the launcher; on macOS the bundled `python` sits beside it.
    pub fn exe_dir(&self) -> &Path {
        self.executable.parent().unwrap_or(&self.root)
    }

    /// Interpreter run with `--version` by the macOS prober.
    pub fn bundled_python(&self) -> PathBuf {
        self.exe_dir().join("python")
    }
}

/// Find `config.host_program` on the search path and resolve symlinks.
pub fn locate_host(config: &BootstrapConfig) -> Result<HostInstallation> {
    let program = config.host_program.as_str();
    let found = match &config.search_path {
        Some(paths) => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            which::which_in(program, Some(paths), cwd)
        }
        None => which::which(program),
    }
    .map_err(|source| BootstrapError::HostNotFound {
        program: program.to_string(),
        source,
    })?;

    // realpath: /usr/bin/casapy is commonly a symlink into the install tree
    let resolved = std::fs::canonicalize(&found)
        .map_err(|e| BootstrapError::io(format!("Failed to resolve {}", found.display()), e))?;

    let host = HostInstallation::from_executable(config.platform, resolved);
    info_log!("Finding path to {}... {}", program, host.root.display());
    Ok(host)
}
