//! Configuration structs grouped by concern, loaded from the environment.

use super::env_keys::{download as dl_keys, observability as obv_keys, paths as path_keys};
use super::loader::{env_bool, env_optional, env_or, env_u64, load_dotenv};
use std::path::PathBuf;

/// pip 1.5.4 source tarball on PyPI.
pub const DEFAULT_PIP_URL: &str = "https://pypi.python.org/packages/source/p/pip/pip-1.5.4.tar.gz";

/// MD5 published for [`DEFAULT_PIP_URL`].
pub const DEFAULT_PIP_CHECKSUM: &str = "md5:834b2904f92d46aaa333267fb1c922bb";

pub const DEFAULT_HOST_PROGRAM: &str = "casapy";

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 120;

/// User prefix, host program and work directory.
#[derive(Debug, Clone)]
pub struct PathsConfig {
    /// Invoking user's home directory.
    pub home_dir: PathBuf,
    /// Per-user prefix, `~/.casa` unless overridden.
    pub user_dir: PathBuf,
    pub host_program: String,
    pub work_dir: Option<PathBuf>,
}

impl PathsConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let user_dir = env_optional(path_keys::CASAPIP_USER_DIR, path_keys::USER_DIR_ALIASES)
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir.join(".casa"));
        let host_program = env_or(path_keys::CASAPIP_HOST_PROGRAM, &[], || {
            DEFAULT_HOST_PROGRAM.to_string()
        });
        let work_dir = env_optional(path_keys::CASAPIP_WORK_DIR, &[]).map(PathBuf::from);
        Self {
            home_dir,
            user_dir,
            host_program,
            work_dir,
        }
    }
}

/// Archive source and HTTP agent settings.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub url: String,
    /// Unparsed digest spec; see `casapip_bootstrap::Checksum::parse`.
    pub checksum: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl DownloadConfig {
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            url: env_or(dl_keys::CASAPIP_PIP_URL, &[], || DEFAULT_PIP_URL.to_string()),
            checksum: env_or(dl_keys::CASAPIP_PIP_CHECKSUM, &[], || {
                DEFAULT_PIP_CHECKSUM.to_string()
            }),
            connect_timeout_secs: env_u64(
                dl_keys::CASAPIP_HTTP_CONNECT_TIMEOUT_SECS,
                &[],
                DEFAULT_CONNECT_TIMEOUT_SECS,
            ),
            read_timeout_secs: env_u64(
                dl_keys::CASAPIP_HTTP_READ_TIMEOUT_SECS,
                &[],
                DEFAULT_READ_TIMEOUT_SECS,
            ),
        }
    }
}

/// Observability: quiet, log_level, log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            load_dotenv();
            Self {
                quiet: env_bool(obv_keys::CASAPIP_QUIET, &[], false),
                log_level: env_or(obv_keys::CASAPIP_LOG_LEVEL, &[], || {
                    "casapip=info".to_string()
                }),
                log_json: env_bool(obv_keys::CASAPIP_LOG_JSON, &[], false),
            }
        })
    }
}
