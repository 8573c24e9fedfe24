//! Environment variable keys.

/// Paths: user prefix, host program, work directory
pub mod paths {
    pub const CASAPIP_USER_DIR: &str = "CASAPIP_USER_DIR";
    pub const USER_DIR_ALIASES: &[&str] = &["CASA_USER_DIR"];

    pub const CASAPIP_HOST_PROGRAM: &str = "CASAPIP_HOST_PROGRAM";

    /// Where the archive is staged and `install_pip.sh` runs. Unset means a fresh temp dir.
    pub const CASAPIP_WORK_DIR: &str = "CASAPIP_WORK_DIR";
}

/// pip archive download
pub mod download {
    pub const CASAPIP_PIP_URL: &str = "CASAPIP_PIP_URL";
    /// `md5:<hex>`, `sha256:<hex>` or a bare hex digest.
    pub const CASAPIP_PIP_CHECKSUM: &str = "CASAPIP_PIP_CHECKSUM";

    pub const CASAPIP_HTTP_CONNECT_TIMEOUT_SECS: &str = "CASAPIP_HTTP_CONNECT_TIMEOUT_SECS";
    pub const CASAPIP_HTTP_READ_TIMEOUT_SECS: &str = "CASAPIP_HTTP_READ_TIMEOUT_SECS";
}

/// Observability and logging
pub mod observability {
    pub const CASAPIP_QUIET: &str = "CASAPIP_QUIET";
    pub const CASAPIP_LOG_LEVEL: &str = "CASAPIP_LOG_LEVEL";
    pub const CASAPIP_LOG_JSON: &str = "CASAPIP_LOG_JSON";
}
