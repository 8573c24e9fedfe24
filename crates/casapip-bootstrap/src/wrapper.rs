//! `casa-python` and `casa-pip` generation.
//!
//! CASA's interpreter cannot be run bare: it needs PYTHONHOME, PYTHONPATH and
//! the loader paths pointed into the bundle. `casa-python` sets those and
//! execs it; `casa-pip` runs the installed pip through `casa-python`.

use std::path::PathBuf;

use crate::config::{BootstrapConfig, PRIMARY_WRAPPER_NAME, SECONDARY_WRAPPER_NAME};
use crate::error::Result;
use crate::host::HostInstallation;
use crate::info_log;
use crate::platform::HostPlatform;

/// Render `casa-python` for the host's layout.
pub fn render_primary(host: &HostInstallation, version: &str, user_base: &str) -> String {
    let root = host.root.display();
    match host.platform {
        HostPlatform::MacOs => format!(
            r#"#!/bin/sh

INSTALLPATH={root}

PROOT=$INSTALLPATH/Frameworks/Python.framework/Versions/{pv}
PBIND=$PROOT/MacOS
PLIBD=$PROOT/lib/python{pv}
PPATH=$PBIND:$PLIBD:$PLIBD/plat-mac:$PLIBD/plat-darwin
PPATH=$PPATH:$PBIND/lib-scriptpackages:$PLIBD/lib-tk
PPATH=$PPATH:$PLIBD/lib-dynload:$PLIBD/site-packages
PPATH=$PPATH:$PLIBD/site-packages/Numeric:$PLIBD/site-packages/PyObjC
PPATH=$INSTALLPATH/Resources/python:$PPATH

export PYTHONUSERBASE={user_base}

export PYTHONHOME=$PROOT
export PYTHONPATH=$PPATH
export PYTHONEXECUTABLE=$PROOT/Resources/Python.app/Contents/MacOS/Python

export DYLD_FRAMEWORK_PATH="$INSTALLPATH/Frameworks"

exec -a pythonw $INSTALLPATH/MacOS/pythonw -W ignore::DeprecationWarning "$@"
"#,
            root = root,
            pv = version,
            user_base = user_base,
        ),
        HostPlatform::Linux => format!(
            r#"#!/bin/sh

INSTALLPATH={root}

export LD_LIBRARY_PATH=$INSTALLPATH/lib64:/lib64:/usr/lib64:$LD_LIBRARY_PATH
export LDFLAGS="-L$INSTALLPATH/lib64/"

export PYTHONHOME=$INSTALLPATH

export PYTHONUSERBASE={user_base}

export PYTHONPATH=$INSTALLPATH/lib64/python{pv}/site-packages:$PYTHONPATH
export PYTHONPATH=$INSTALLPATH/lib64/python{pv}/heuristics:$PYTHONPATH
export PYTHONPATH=$INSTALLPATH/lib64/python{pv}:$PYTHONPATH

exec $INSTALLPATH/lib64/casapy/bin/python $*
"#,
            root = root,
            pv = version,
            user_base = user_base,
        ),
    }
}

/// Render `casa-pip`: a single line, always scoped with `--user`.
pub fn render_secondary(user_base: &str) -> String {
    format!(
        "{base}/bin/{python} {base}/bin/pip $* --user\n",
        base = user_base,
        python = PRIMARY_WRAPPER_NAME,
    )
}

/// Write `<user dir>/bin/casa-python` (overwriting) and add `u+x`.
pub fn write_primary(
    config: &BootstrapConfig,
    host: &HostInstallation,
    version: &str,
) -> Result<PathBuf> {
    info_log!("Creating {} script...", PRIMARY_WRAPPER_NAME);
    let path = config.primary_wrapper_path();
    let script = render_primary(host, version, &config.user_base_expr());
    casapip_fs::write_executable(&path, &script)?;
    Ok(path)
}

/// Write `<user dir>/bin/casa-pip` (overwriting) and add `u+x`.
pub fn write_secondary(config: &BootstrapConfig) -> Result<PathBuf> {
    let path = config.secondary_wrapper_path();
    info_log!("Creating {} script...", SECONDARY_WRAPPER_NAME);
    casapip_fs::write_executable(&path, &render_secondary(&config.user_base_expr()))?;
    Ok(path)
}
