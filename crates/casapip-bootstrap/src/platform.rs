//! The two CASA installation layouts the bootstrap understands.

use serde::Serialize;

/// Selected once per run and carried in [`crate::BootstrapConfig`].
///
/// - `MacOs`: `CASA.app/Contents/{MacOS,Frameworks,Resources}`; the interpreter
///   version is read by running the bundled `python --version`.
/// - `Linux`: flat tree with `lib64/pythonX.Y`; the version is inferred from
///   which of the known directories exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    MacOs,
    Linux,
}

impl HostPlatform {
    /// Darwin gets the bundle layout; every other OS is treated as Linux.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Linux => "linux",
        }
    }
}

impl std::fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_matches_target() {
        let expected = if cfg!(target_os = "macos") {
            HostPlatform::MacOs
        } else {
            HostPlatform::Linux
        };
        assert_eq!(HostPlatform::detect(), expected);
    }
}
