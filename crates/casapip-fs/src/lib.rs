//! File primitives used by the bootstrap stages.
//!
//! Every failure carries the operation and the path it touched, so the
//! single-line diagnostic printed on abort is enough to locate the problem.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Owner-execute bit (`S_IXUSR`).
pub const OWNER_EXEC: u32 = 0o100;

#[derive(Debug, Error)]
#[error("failed to {op} {}", .path.display())]
pub struct FsError {
    pub op: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

pub type Result<T> = std::result::Result<T, FsError>;

trait IoContext<T> {
    fn at(self, op: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, op: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| FsError {
            op,
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `mkdir -p`: succeeds when the directory already exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).at("create directory", path)
}

/// Write `content`, replacing any existing file. Parent directories are created.
pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, content).at("write", path)
}

/// Append `content`, creating the file when missing. Never truncates.
pub fn append_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .at("open for append", path)?;
    file.write_all(content.as_bytes()).at("append to", path)
}

/// Add the owner-execute bit, keeping every bit already set (`chmod u+x`).
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(path).at("stat", path)?.permissions().mode();
    fs::set_permissions(path, fs::Permissions::from_mode(mode | OWNER_EXEC)).at("chmod", path)
}

#[cfg(not(unix))]
pub fn make_executable(path: &Path) -> Result<()> {
    fs::metadata(path).at("stat", path).map(|_| ())
}

/// Write a script and mark it executable.
pub fn write_executable(path: &Path, content: &str) -> Result<()> {
    write_file(path, content.as_bytes())?;
    make_executable(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("lib").join("python2.7").join("site-packages");
        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_write_file_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bin").join("casa-python");
        write_file(&path, b"first").unwrap();
        write_file(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_append_file_creates_then_appends() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing-dir").join("init.py");
        append_file(&path, "a\n").unwrap();
        append_file(&path, "b\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_errors_name_path_and_operation() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let err = make_executable(&missing).unwrap_err();
        assert_eq!(err.path, missing);
        assert!(err.to_string().starts_with("failed to stat "));
    }

    #[cfg(unix)]
    #[test]
    fn test_make_executable_is_additive() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("script.sh");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o646)).unwrap();

        make_executable(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode, 0o746);
    }
}
