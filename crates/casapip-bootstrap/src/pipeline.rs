//! The bootstrap run, start to finish.
//!
//! `LocateHost → ProbeVersion → GeneratePrimaryWrapper → DownloadAndInstall →
//! GenerateSecondaryWrapper → PatchStartup → Done`. The first failing stage
//! ends the run; side effects of earlier stages stay on disk and a re-run
//! repeats all of them.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::BootstrapConfig;
use crate::error::Result;
use crate::host::{locate_host, HostInstallation};
use crate::installer::{install_pip, ArchiveFetcher};
use crate::startup::patch_startup;
use crate::version::probe_version;
use crate::wrapper::{write_primary, write_secondary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    LocateHost,
    ProbeVersion,
    GeneratePrimaryWrapper,
    DownloadAndInstall,
    GenerateSecondaryWrapper,
    PatchStartup,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::LocateHost => "locate-host",
            Self::ProbeVersion => "probe-version",
            Self::GeneratePrimaryWrapper => "primary-wrapper",
            Self::DownloadAndInstall => "download-and-install",
            Self::GenerateSecondaryWrapper => "secondary-wrapper",
            Self::PatchStartup => "patch-startup",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a successful run wrote.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub host: HostInstallation,
    pub python_version: String,
    pub bin_dir: PathBuf,
    pub primary_wrapper: PathBuf,
    pub secondary_wrapper: PathBuf,
    pub site_packages: PathBuf,
    pub startup_file: PathBuf,
    /// Kept after the run; holds the archive, the unpacked tree and `install_pip.sh`.
    pub work_dir: PathBuf,
}

/// Host and version plus the paths a full run would write. No side effects.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub host: HostInstallation,
    pub python_version: String,
    pub user_dir: PathBuf,
    pub primary_wrapper: PathBuf,
    pub secondary_wrapper: PathBuf,
    pub site_packages: PathBuf,
    pub startup_file: PathBuf,
    pub pip_url: String,
    pub pip_checksum: String,
}

fn step<T>(stage: Stage, f: impl FnOnce() -> Result<T>) -> Result<T> {
    tracing::debug!(%stage, "stage started");
    f().inspect_err(|_| tracing::error!(%stage, "bootstrap stopped"))
}

pub fn run(config: &BootstrapConfig, fetcher: &dyn ArchiveFetcher) -> Result<BootstrapReport> {
    let host = step(Stage::LocateHost, || locate_host(config))?;
    let version = step(Stage::ProbeVersion, || probe_version(&host))?;
    let primary_wrapper = step(Stage::GeneratePrimaryWrapper, || {
        write_primary(config, &host, &version)
    })?;
    let installed = step(Stage::DownloadAndInstall, || {
        install_pip(config, fetcher, &version)
    })?;
    let secondary_wrapper = step(Stage::GenerateSecondaryWrapper, || write_secondary(config))?;
    let startup_file = step(Stage::PatchStartup, || patch_startup(config, &version))?;
    tracing::debug!(stage = %Stage::Done, "bootstrap complete");

    Ok(BootstrapReport {
        host,
        python_version: version,
        bin_dir: config.bin_dir(),
        primary_wrapper,
        secondary_wrapper,
        site_packages: installed.site_packages,
        startup_file,
        work_dir: installed.work_dir,
    })
}

pub fn inspect(config: &BootstrapConfig) -> Result<Inspection> {
    let host = step(Stage::LocateHost, || locate_host(config))?;
    let version = step(Stage::ProbeVersion, || probe_version(&host))?;
    Ok(Inspection {
        user_dir: config.user_dir.clone(),
        primary_wrapper: config.primary_wrapper_path(),
        secondary_wrapper: config.secondary_wrapper_path(),
        site_packages: config.site_packages(&version),
        startup_file: config.startup_file_path(),
        pip_url: config.pip_url.clone(),
        pip_checksum: config.pip_checksum.to_string(),
        host,
        python_version: version,
    })
}
