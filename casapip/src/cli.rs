use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// casapip - install pip into CASA's bundled Python
///
/// With no subcommand, locates casapy, writes the casa-python wrapper,
/// installs pip into the user directory, writes casa-pip and patches init.py.
#[derive(Parser, Debug)]
#[command(name = "casapip")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// User directory for wrappers, packages and init.py (default: from env or ~/.casa)
    #[arg(long, global = true, value_name = "DIR")]
    pub user_dir: Option<PathBuf>,

    /// CASA launcher to look up on PATH (default: from env or casapy)
    #[arg(long, global = true, value_name = "NAME")]
    pub host_program: Option<String>,

    /// Where to download the pip archive from
    #[arg(long, global = true, value_name = "URL")]
    pub pip_url: Option<String>,

    /// Expected archive digest: md5:<hex>, sha256:<hex> or bare hex
    #[arg(long, global = true, value_name = "DIGEST")]
    pub pip_checksum: Option<String>,

    /// Directory to stage the archive in (default: a fresh temp dir, kept)
    #[arg(long, global = true, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved CASA install, its Python version and the paths a run would write
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
