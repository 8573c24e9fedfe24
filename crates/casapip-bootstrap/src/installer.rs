//! Download, verify and install pip into the user prefix.
//!
//! The archive is verified in memory before anything touches disk; a mismatch
//! aborts with no file written and no process spawned. After that the archive
//! is staged in a work directory and `install_pip.sh` unpacks it and runs
//! `casa-python setup.py install --prefix=<user base>`.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{absolute, BootstrapConfig, INSTALL_SCRIPT_NAME, PRIMARY_WRAPPER_NAME};
use crate::error::{BootstrapError, Result};
use crate::info_log;

/// Source of the pip archive bytes. The HTTP implementation is the default;
/// tests inject canned bytes.
pub trait ArchiveFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP GET via `ureq`.
#[cfg(feature = "download")]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

#[cfg(feature = "download")]
impl HttpFetcher {
    pub fn new(config: &BootstrapConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout_read(config.read_timeout)
            .build();
        Self { agent }
    }
}

#[cfg(feature = "download")]
impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        use std::io::Read;

        let resp = self.agent.get(url).call().map_err(|e| match &e {
            ureq::Error::Status(code, _) => BootstrapError::Download {
                url: url.to_string(),
                reason: format!("server returned HTTP {}", code),
            },
            ureq::Error::Transport(_) => BootstrapError::Download {
                url: url.to_string(),
                reason: e.to_string(),
            },
        })?;

        let mut bytes = Vec::new();
        resp.into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| BootstrapError::Download {
                url: url.to_string(),
                reason: format!("read failed: {}", e),
            })?;
        tracing::debug!(url, bytes = bytes.len(), "archive downloaded");
        Ok(bytes)
    }
}

/// Archive and script staged in the work directory, ready to run.
#[derive(Debug, Clone)]
pub struct PreparedInstall {
    pub work_dir: PathBuf,
    pub archive_path: PathBuf,
    /// Directory the archive unpacks into, relative to `work_dir`.
    pub unpacked_dir: String,
    pub script_path: PathBuf,
    pub site_packages: PathBuf,
}

/// Last path segment of `url`, ignoring any query or fragment.
pub fn archive_file_name(url: &str) -> Result<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(BootstrapError::Download {
            url: url.to_string(),
            reason: "URL does not name an archive file".to_string(),
        }),
    }
}

/// Strip exactly two trailing extensions: `pip-1.5.4.tar.gz` → `pip-1.5.4`.
/// Names with fewer dots lose what they have.
pub fn unpacked_dir_name(file_name: &str) -> &str {
    file_name.rsplitn(3, '.').last().unwrap_or(file_name)
}

pub fn render_install_script(archive: &str, unpacked_dir: &str, user_base: &str) -> String {
    format!(
        "#!/bin/bash\n\
         export PYTHONUSERBASE={base}\n\
         export PATH={base}/bin:$PATH\n\
         tar xvzf {archive}\n\
         cd {dir}\n\
         {python} setup.py install --prefix={base}\n",
        base = user_base,
        archive = archive,
        dir = unpacked_dir,
        python = PRIMARY_WRAPPER_NAME,
    )
}

/// Verify `bytes` against the configured checksum, then stage the archive
/// and write the install script into `work_dir`.
pub fn prepare_install(
    config: &BootstrapConfig,
    bytes: &[u8],
    version: &str,
    work_dir: &Path,
) -> Result<PreparedInstall> {
    let file_name = archive_file_name(&config.pip_url)?;
    config.pip_checksum.verify(bytes)?;
    tracing::debug!(checksum = %config.pip_checksum, "archive checksum verified");

    let archive_path = work_dir.join(file_name);
    casapip_fs::write_file(&archive_path, bytes)?;

    info_log!("Installing pip...");
    let site_packages = config.site_packages(version);
    casapip_fs::ensure_dir(&site_packages)?;

    let unpacked_dir = unpacked_dir_name(file_name).to_string();
    let script_path = work_dir.join(INSTALL_SCRIPT_NAME);
    let script = render_install_script(file_name, &unpacked_dir, &config.user_base_expr());
    casapip_fs::write_executable(&script_path, &script)?;

    Ok(PreparedInstall {
        work_dir: work_dir.to_path_buf(),
        archive_path,
        unpacked_dir,
        script_path,
        site_packages,
    })
}

/// Run `install_pip.sh` from the work directory with inherited stdio.
pub fn run_install_script(prepared: &PreparedInstall) -> Result<()> {
    // resolved before current_dir changes what a relative path means
    let script = absolute(prepared.script_path.clone())?;
    let status = Command::new(&script)
        .current_dir(&prepared.work_dir)
        .status()
        .map_err(|e| {
            BootstrapError::io(
                format!("Failed to run {}", script.display()),
                e,
            )
        })?;
    if !status.success() {
        return Err(BootstrapError::InstallFailed {
            status: status.to_string(),
        });
    }
    Ok(())
}

/// The work directory for this run: the configured one, or a fresh temp dir
/// that is intentionally left on disk afterwards.
pub fn create_work_dir(config: &BootstrapConfig) -> Result<PathBuf> {
    if let Some(ref dir) = config.work_dir {
        let dir = absolute(dir.clone())?;
        casapip_fs::ensure_dir(&dir)?;
        return Ok(dir);
    }
    let temp = tempfile::Builder::new()
        .prefix("casapip-")
        .tempdir()
        .map_err(|e| BootstrapError::io("Failed to create temporary directory", e))?;
    #[allow(deprecated)]
    let path = temp.into_path();
    Ok(path)
}

/// Download, verify, stage and install. Returns what was staged.
pub fn install_pip(
    config: &BootstrapConfig,
    fetcher: &dyn ArchiveFetcher,
    version: &str,
) -> Result<PreparedInstall> {
    archive_file_name(&config.pip_url)?;
    info_log!("Downloading pip...");
    let bytes = fetcher.fetch(&config.pip_url)?;

    let work_dir = create_work_dir(config)?;
    info_log!("Using work directory {}", work_dir.display());
    let prepared = prepare_install(config, &bytes, version, &work_dir)?;
    run_install_script(&prepared)?;
    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::Checksum;
    use crate::platform::HostPlatform;

    fn config_for(tmp: &Path, bytes: &[u8]) -> BootstrapConfig {
        let mut cfg = BootstrapConfig::new(HostPlatform::Linux, tmp.join("home"), tmp.join("user"));
        let digest = Checksum::Md5(String::new()).digest(bytes);
        cfg.pip_checksum = Checksum::Md5(digest);
        cfg
    }

    struct CannedFetcher(Vec<u8>);

    impl ArchiveFetcher for CannedFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(
            archive_file_name("https://pypi.python.org/packages/source/p/pip/pip-1.5.4.tar.gz")
                .unwrap(),
            "pip-1.5.4.tar.gz"
        );
        assert_eq!(
            archive_file_name("https://mirror.example/pip-1.5.4.tar.gz?download=1").unwrap(),
            "pip-1.5.4.tar.gz"
        );
    }

    #[test]
    fn test_archive_file_name_rejects_directory_url() {
        let err = archive_file_name("https://mirror.example/pip/").unwrap_err();
        assert!(matches!(err, BootstrapError::Download { ref url, .. } if url == "https://mirror.example/pip/"));
        assert!(archive_file_name("https://mirror.example/pip/?x=1").is_err());
    }

    #[test]
    fn test_directory_url_fails_before_fetch_and_writes_nothing() {
        struct UnreachableFetcher;
        impl ArchiveFetcher for UnreachableFetcher {
            fn fetch(&self, url: &str) -> Result<Vec<u8>> {
                panic!("fetched {}", url);
            }
        }
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config_for(tmp.path(), b"archive");
        cfg.pip_url = "https://mirror.example/pip/".into();
        cfg.work_dir = Some(tmp.path().join("work"));

        let err = install_pip(&cfg, &UnreachableFetcher, "2.7").unwrap_err();

        assert!(matches!(err, BootstrapError::Download { .. }));
        assert!(!tmp.path().join("work").exists());
    }

    #[test]
    fn test_unpacked_dir_name() {
        assert_eq!(unpacked_dir_name("pip-1.5.4.tar.gz"), "pip-1.5.4");
        assert_eq!(unpacked_dir_name("pip-1.5.4.tgz"), "pip-1.5");
        assert_eq!(unpacked_dir_name("pip.zip"), "pip");
        assert_eq!(unpacked_dir_name("pip"), "pip");
    }

    #[test]
    fn test_install_script() {
        let script = render_install_script("pip-1.5.4.tar.gz", "pip-1.5.4", "$HOME/.casa");
        assert_eq!(
            script,
            "#!/bin/bash\n\
             export PYTHONUSERBASE=$HOME/.casa\n\
             export PATH=$HOME/.casa/bin:$PATH\n\
             tar xvzf pip-1.5.4.tar.gz\n\
             cd pip-1.5.4\n\
             casa-python setup.py install --prefix=$HOME/.casa\n"
        );
    }

    #[test]
    fn test_checksum_mismatch_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let work = tmp.path().join("work");
        std::fs::create_dir_all(&work).unwrap();
        let cfg = config_for(tmp.path(), b"the real archive");

        let err = prepare_install(&cfg, b"a corrupted archive", "2.7", &work).unwrap_err();

        assert!(matches!(err, BootstrapError::ChecksumMismatch { .. }));
        assert_eq!(std::fs::read_dir(&work).unwrap().count(), 0);
        assert!(!cfg.user_dir.exists());
    }

    #[test]
    fn test_install_pip_mismatch_leaves_work_dir_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config_for(tmp.path(), b"the real archive");
        cfg.work_dir = Some(tmp.path().join("work"));

        let err = install_pip(&cfg, &CannedFetcher(b"tampered".to_vec()), "2.7").unwrap_err();

        assert!(matches!(err, BootstrapError::ChecksumMismatch { .. }));
        assert_eq!(std::fs::read_dir(tmp.path().join("work")).unwrap().count(), 0);
        assert!(!cfg.user_dir.exists());
    }

    #[test]
    fn test_prepare_stages_archive_and_script() {
        let tmp = tempfile::tempdir().unwrap();
        let work = tmp.path().join("work");
        let bytes = b"pretend this is a tarball";
        let cfg = config_for(tmp.path(), bytes);

        let prepared = prepare_install(&cfg, bytes, "2.6", &work).unwrap();

        assert_eq!(prepared.unpacked_dir, "pip-1.5.4");
        assert_eq!(prepared.archive_path, work.join("pip-1.5.4.tar.gz"));
        assert_eq!(std::fs::read(&prepared.archive_path).unwrap(), bytes);
        assert_eq!(prepared.script_path, work.join("install_pip.sh"));
        assert!(prepared.site_packages.ends_with("lib/python2.6/site-packages"));
        assert!(prepared.site_packages.is_dir());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&prepared.script_path).unwrap().permissions().mode();
            assert_ne!(mode & 0o100, 0, "install_pip.sh lacks u+x");
        }

        let script = std::fs::read_to_string(&prepared.script_path).unwrap();
        assert!(script.contains("\ncd pip-1.5.4\n"));
        // user dir is outside the fake home, so the absolute path is used
        let base = cfg.user_dir.display().to_string();
        assert!(script.contains(&format!("--prefix={}\n", base)));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_script_is_install_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let script_path = tmp.path().join("install_pip.sh");
        casapip_fs::write_executable(&script_path, "#!/bin/sh\nexit 2\n").unwrap();
        let prepared = PreparedInstall {
            work_dir: tmp.path().to_path_buf(),
            archive_path: tmp.path().join("pip-1.5.4.tar.gz"),
            unpacked_dir: "pip-1.5.4".into(),
            script_path,
            site_packages: tmp.path().join("site-packages"),
        };

        let err = run_install_script(&prepared).unwrap_err();
        assert!(matches!(err, BootstrapError::InstallFailed { .. }));
        assert!(err.to_string().starts_with("pip installation failed!"));
    }

    #[cfg(unix)]
    #[test]
    fn test_restaging_keeps_script_mode_bits() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let work = tmp.path().join("work");
        let bytes = b"pretend this is a tarball";
        let cfg = config_for(tmp.path(), bytes);
        let prepared = prepare_install(&cfg, bytes, "2.7", &work).unwrap();
        std::fs::set_permissions(&prepared.script_path, std::fs::Permissions::from_mode(0o640))
            .unwrap();

        prepare_install(&cfg, bytes, "2.7", &work).unwrap();

        let mode = std::fs::metadata(&prepared.script_path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o740);
    }

    /// Work dir given relative to the current directory, as from `--work-dir rel`.
    #[cfg(unix)]
    #[test]
    fn test_relative_work_dir_runs_script() {
        let here = tempfile::tempdir_in(".").unwrap();
        let rel = PathBuf::from(here.path().file_name().unwrap());
        let mut cfg = BootstrapConfig::new(
            HostPlatform::Linux,
            here.path().join("home"),
            here.path().join("user"),
        );
        cfg.work_dir = Some(rel.clone());

        let work_dir = create_work_dir(&cfg).unwrap();
        assert!(work_dir.is_absolute());
        assert_eq!(work_dir, std::env::current_dir().unwrap().join(&rel));

        let script_path = rel.join("install_pip.sh");
        casapip_fs::write_executable(&script_path, "#!/bin/sh\ntouch ran\n").unwrap();
        let prepared = PreparedInstall {
            work_dir: rel.clone(),
            archive_path: rel.join("pip-1.5.4.tar.gz"),
            unpacked_dir: "pip-1.5.4".into(),
            script_path,
            site_packages: rel.join("site-packages"),
        };

        run_install_script(&prepared).unwrap();
        assert!(here.path().join("ran").is_file());
    }
}
