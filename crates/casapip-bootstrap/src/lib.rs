//! Bootstrap pip into CASA's bundled Python.
//!
//! Stages, in order: [`host`] finds `casapy`, [`version`] determines the
//! bundled Python version, [`wrapper`] writes `casa-python`, [`installer`]
//! fetches, verifies and installs pip, [`wrapper`] writes `casa-pip`, and
//! [`startup`] patches `init.py`. [`pipeline::run`] sequences them.

pub mod checksum;
pub mod config;
pub mod error;
pub mod host;
pub mod installer;
pub mod log;
pub mod pipeline;
pub mod platform;
pub mod startup;
pub mod version;
pub mod wrapper;

pub use checksum::Checksum;
pub use config::{BootstrapConfig, ConfigOverrides};
pub use error::{BootstrapError, Result};
pub use host::HostInstallation;
pub use installer::ArchiveFetcher;
#[cfg(feature = "download")]
pub use installer::HttpFetcher;
pub use pipeline::{BootstrapReport, Inspection, Stage};
pub use platform::HostPlatform;
