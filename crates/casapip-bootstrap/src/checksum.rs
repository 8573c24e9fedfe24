//! Download integrity check for the pip archive.
//!
//! MD5 is what PyPI published for pip 1.5.4; it only guards against corrupt or
//! truncated downloads. SHA-256 is accepted for mirrors that publish it.

use md5::Md5;
use sha2::{Digest, Sha256};

use crate::error::{BootstrapError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checksum {
    Md5(String),
    Sha256(String),
}

impl Checksum {
    /// Parse `md5:<hex>`, `sha256:<hex>`, or a bare digest whose length picks
    /// the algorithm (32 hex chars → MD5, 64 → SHA-256).
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let (algo, digest) = match spec.split_once(':') {
            Some((algo, digest)) => (Some(algo.to_ascii_lowercase()), digest.trim()),
            None => (None, spec),
        };
        if digest.is_empty() || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BootstrapError::InvalidChecksum(spec.to_string()));
        }
        let digest = digest.to_ascii_lowercase();
        match (algo.as_deref(), digest.len()) {
            (Some("md5"), 32) | (None, 32) => Ok(Self::Md5(digest)),
            (Some("sha256"), 64) | (None, 64) => Ok(Self::Sha256(digest)),
            _ => Err(BootstrapError::InvalidChecksum(spec.to_string())),
        }
    }

    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Md5(_) => "md5",
            Self::Sha256(_) => "sha256",
        }
    }

    pub fn expected(&self) -> &str {
        match self {
            Self::Md5(hex) | Self::Sha256(hex) => hex,
        }
    }

    /// Lowercase hex digest of `bytes` under this checksum's algorithm.
    pub fn digest(&self, bytes: &[u8]) -> String {
        match self {
            Self::Md5(_) => hex::encode(Md5::digest(bytes)),
            Self::Sha256(_) => hex::encode(Sha256::digest(bytes)),
        }
    }

    pub fn verify(&self, bytes: &[u8]) -> Result<()> {
        let actual = self.digest(bytes);
        if actual == self.expected() {
            Ok(())
        } else {
            Err(BootstrapError::ChecksumMismatch {
                algorithm: self.algorithm(),
                expected: self.expected().to_string(),
                actual,
            })
        }
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm(), self.expected())
    }
}
