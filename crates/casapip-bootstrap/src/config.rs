//! Immutable run configuration, built once and passed to every stage.
//!
//! Precedence: CLI override > environment > `.env` > built-in default.
//! Overrides are applied to the raw values before parsing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use casapip_core::config::schema::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_HOST_PROGRAM, DEFAULT_PIP_CHECKSUM, DEFAULT_PIP_URL,
    DEFAULT_READ_TIMEOUT_SECS,
};
use casapip_core::config::{DownloadConfig, PathsConfig};

use crate::checksum::Checksum;
use crate::error::{BootstrapError, Result};
use crate::platform::HostPlatform;

pub const PRIMARY_WRAPPER_NAME: &str = "casa-python";
pub const SECONDARY_WRAPPER_NAME: &str = "casa-pip";
pub const STARTUP_FILE_NAME: &str = "init.py";
pub const INSTALL_SCRIPT_NAME: &str = "install_pip.sh";

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub platform: HostPlatform,
    /// Executable searched for on PATH (`casapy`).
    pub host_program: String,
    /// Directories to search instead of `$PATH`, colon separated.
    pub search_path: Option<OsString>,
    pub home_dir: PathBuf,
    /// User-local prefix (`~/.casa`): wrappers, site-packages and `init.py` live here.
    pub user_dir: PathBuf,
    /// `None` means a fresh `casapip-*` temp dir, left behind after the run.
    pub work_dir: Option<PathBuf>,
    pub pip_url: String,
    pub pip_checksum: Checksum,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

/// Values supplied on the command line; `None` keeps the env/default value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub user_dir: Option<PathBuf>,
    pub host_program: Option<String>,
    pub pip_url: Option<String>,
    pub pip_checksum: Option<String>,
    pub work_dir: Option<PathBuf>,
}

impl BootstrapConfig {
    /// Built-in defaults for the given platform and directories.
    pub fn new(platform: HostPlatform, home_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            host_program: DEFAULT_HOST_PROGRAM.to_string(),
            search_path: None,
            home_dir: home_dir.into(),
            user_dir: user_dir.into(),
            work_dir: None,
            pip_url: DEFAULT_PIP_URL.to_string(),
            pip_checksum: Checksum::Md5(
                DEFAULT_PIP_CHECKSUM.trim_start_matches("md5:").to_string(),
            ),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        }
    }

    /// Load from the environment for the detected platform, with `overrides`
    /// applied on top before anything is parsed or resolved.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self> {
        Self::from_parts(
            HostPlatform::detect(),
            PathsConfig::from_env(),
            DownloadConfig::from_env(),
            overrides,
        )
    }

    /// Build from raw env-level configs. Overrides replace the raw values
    /// first, so an invalid environment value never masks a valid flag.
    /// `user_dir` and `work_dir` are made absolute against the current directory.
    pub fn from_parts(
        platform: HostPlatform,
        mut paths: PathsConfig,
        mut download: DownloadConfig,
        overrides: ConfigOverrides,
    ) -> Result<Self> {
        overrides.apply(&mut paths, &mut download);

        let mut cfg = Self::new(platform, paths.home_dir, absolute(paths.user_dir)?);
        cfg.host_program = paths.host_program;
        cfg.work_dir = paths.work_dir.map(absolute).transpose()?;
        cfg.pip_url = download.url;
        cfg.pip_checksum = Checksum::parse(&download.checksum)?;
        cfg.connect_timeout = Duration::from_secs(download.connect_timeout_secs);
        cfg.read_timeout = Duration::from_secs(download.read_timeout_secs);
        Ok(cfg)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.user_dir.join("bin")
    }

    pub fn primary_wrapper_path(&self) -> PathBuf {
        self.bin_dir().join(PRIMARY_WRAPPER_NAME)
    }

    pub fn secondary_wrapper_path(&self) -> PathBuf {
        self.bin_dir().join(SECONDARY_WRAPPER_NAME)
    }

    pub fn startup_file_path(&self) -> PathBuf {
        self.user_dir.join(STARTUP_FILE_NAME)
    }

    /// `<user dir>/lib/python<version>/site-packages`
    pub fn site_packages(&self, version: &str) -> PathBuf {
        self.user_dir
            .join("lib")
            .join(format!("python{}", version))
            .join("site-packages")
    }

    /// The user prefix as written into generated scripts: `$HOME/...` when it
    /// lives under the home directory, so the scripts follow `$HOME`.
    pub fn user_base_expr(&self) -> String {
        shell_path(&self.user_dir, &self.home_dir)
    }
}

impl ConfigOverrides {
    /// Replace env-level values with whatever was given on the command line.
    pub fn apply(self, paths: &mut PathsConfig, download: &mut DownloadConfig) {
        if let Some(user_dir) = self.user_dir {
            paths.user_dir = user_dir;
        }
        if let Some(program) = self.host_program {
            paths.host_program = program;
        }
        if let Some(work_dir) = self.work_dir {
            paths.work_dir = Some(work_dir);
        }
        if let Some(url) = self.pip_url {
            download.url = url;
        }
        if let Some(checksum) = self.pip_checksum {
            download.checksum = checksum;
        }
    }
}

/// Resolve `path` against the current directory. Paths written into the
/// generated scripts and `init.py` must be absolute.
pub(crate) fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    std::path::absolute(&path)
        .map_err(|e| BootstrapError::io(format!("Failed to resolve {}", path.display()), e))
}

fn shell_path(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rel) if rel.as_os_str().is_empty() => "$HOME".to_string(),
        Ok(rel) if !home.as_os_str().is_empty() => format!("$HOME/{}", rel.display()),
        _ => path.display().to_string(),
    }
}
