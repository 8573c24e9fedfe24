use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a bootstrap run. Nothing is retried or rolled back.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("'{program}' not found on PATH; is CASA installed?")]
    HostNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("Could not determine Python version under {}", .root.display())]
    VersionIndeterminate { root: PathBuf },

    #[error("Could not determine Python version from {}: {reason}", .interpreter.display())]
    VersionProbeFailed { interpreter: PathBuf, reason: String },

    #[error("Invalid checksum '{0}' (expected md5:<hex>, sha256:<hex> or a bare hex digest)")]
    InvalidChecksum(String),

    #[error("Download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("pip checksum does not match ({algorithm}: expected {expected}, got {actual})")]
    ChecksumMismatch {
        algorithm: &'static str,
        expected: String,
        actual: String,
    },

    #[error("pip installation failed! ({status})")]
    InstallFailed { status: String },

    #[error(transparent)]
    Fs(#[from] casapip_fs::FsError),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BootstrapError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
