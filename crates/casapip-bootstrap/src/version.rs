//! Determine the Python version bundled with CASA.
//!
//! The result is only ever substituted into templates, never compared.

use std::path::Path;
use std::process::Command;

use crate::error::{BootstrapError, Result};
use crate::host::HostInstallation;
use crate::info_log;
use crate::platform::HostPlatform;

/// `lib64/pythonX.Y` directories probed on Linux, in order.
pub const LINUX_KNOWN_VERSIONS: &[&str] = &["2.6", "2.7"];

pub fn probe_version(host: &HostInstallation) -> Result<String> {
    let version = match host.platform {
        HostPlatform::MacOs => probe_by_invocation(&host.bundled_python())?,
        HostPlatform::Linux => probe_lib64(&host.root)?,
    };
    info_log!("Determined Python version in CASA... {}", version);
    Ok(version)
}

/// Run `<python> --version` and parse `Python X.Y.Z` down to `X.Y`.
pub fn probe_by_invocation(interpreter: &Path) -> Result<String> {
    let output = Command::new(interpreter)
        .arg("--version")
        .output()
        .map_err(|e| BootstrapError::VersionProbeFailed {
            interpreter: interpreter.to_path_buf(),
            reason: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(BootstrapError::VersionProbeFailed {
            interpreter: interpreter.to_path_buf(),
            reason: format!("exited with {}", output.status),
        });
    }
    // Python 2 prints the banner on stderr, Python 3.4+ on stdout.
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_version_banner(&stderr)
        .or_else(|| parse_version_banner(&stdout))
        .ok_or_else(|| BootstrapError::VersionProbeFailed {
            interpreter: interpreter.to_path_buf(),
            reason: format!("unexpected output {:?}", stderr.trim()),
        })
}

/// From the first line starting with `Python `, the second whitespace token
/// cut to three characters: `"Python 2.7.3"` → `"2.7"`. Other lines, such as
/// interpreter warnings, are skipped.
pub fn parse_version_banner(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("Python "))
        .find_map(|line| line.split_whitespace().nth(1))
        .map(|token| token.chars().take(3).collect())
}

/// First of `lib64/python2.6`, `lib64/python2.7` that exists under `root`.
pub fn probe_lib64(root: &Path) -> Result<String> {
    let lib64 = root.join("lib64");
    LINUX_KNOWN_VERSIONS
        .iter()
        .find(|v| lib64.join(format!("python{}", v)).exists())
        .map(|v| v.to_string())
        .ok_or_else(|| BootstrapError::VersionIndeterminate {
            root: root.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_version_banner() {
        assert_eq!(parse_version_banner("Python 2.7.3\n").as_deref(), Some("2.7"));
        assert_eq!(parse_version_banner("Python 2.6").as_deref(), Some("2.6"));
        assert_eq!(parse_version_banner("Python"), None);
        assert_eq!(parse_version_banner(""), None);
        assert_eq!(parse_version_banner("Warning: foo\n"), None);
        assert_eq!(
            parse_version_banner("Warning: foo\nPython 2.7.3\n").as_deref(),
            Some("2.7")
        );
    }

    #[test]
    fn test_probe_lib64_selects_26() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("lib64").join("python2.6")).unwrap();
        assert_eq!(probe_lib64(tmp.path()).unwrap(), "2.6");
    }

    #[test]
    fn test_probe_lib64_selects_27() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("lib64").join("python2.7")).unwrap();
        assert_eq!(probe_lib64(tmp.path()).unwrap(), "2.7");
    }

    #[test]
    fn test_probe_lib64_prefers_26_when_both_exist() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("lib64").join("python2.6")).unwrap();
        fs::create_dir_all(tmp.path().join("lib64").join("python2.7")).unwrap();
        assert_eq!(probe_lib64(tmp.path()).unwrap(), "2.6");
    }

    #[test]
    fn test_probe_lib64_indeterminate() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("lib64").join("python3.6")).unwrap();
        let err = probe_lib64(tmp.path()).unwrap_err();
        assert!(matches!(err, BootstrapError::VersionIndeterminate { .. }));
        assert!(err.to_string().starts_with("Could not determine Python version"));
    }

    #[cfg(unix)]
    fn fake_python(dir: &Path, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let python = dir.join("python");
        fs::write(&python, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).unwrap();
        python
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_by_invocation_reads_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let python = fake_python(tmp.path(), "echo 'Python 2.7.3' >&2");
        assert_eq!(probe_by_invocation(&python).unwrap(), "2.7");
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_by_invocation_falls_back_to_stdout() {
        let tmp = tempfile::tempdir().unwrap();
        let python = fake_python(tmp.path(), "echo 'Python 2.6.9'");
        assert_eq!(probe_by_invocation(&python).unwrap(), "2.6");
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_by_invocation_skips_stderr_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let python = fake_python(tmp.path(), "echo 'Warning: foo' >&2; echo 'Python 2.7.3'");
        assert_eq!(probe_by_invocation(&python).unwrap(), "2.7");
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_by_invocation_without_banner_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let python = fake_python(tmp.path(), "echo 'Warning: foo' >&2");
        let err = probe_by_invocation(&python).unwrap_err();
        assert!(matches!(err, BootstrapError::VersionProbeFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_by_invocation_nonzero_exit_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let python = fake_python(tmp.path(), "echo 'Python 2.7.3' >&2; exit 3");
        let err = probe_by_invocation(&python).unwrap_err();
        assert!(matches!(err, BootstrapError::VersionProbeFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_version_macos_uses_python_beside_launcher() {
        let tmp = tempfile::tempdir().unwrap();
        let macos_dir = tmp.path().join("CASA.app").join("Contents").join("MacOS");
        fs::create_dir_all(&macos_dir).unwrap();
        fake_python(&macos_dir, "echo 'Python 2.7.3' >&2");
        let host =
            HostInstallation::from_executable(HostPlatform::MacOs, macos_dir.join("casapy"));
        assert_eq!(probe_version(&host).unwrap(), "2.7");
    }
}
