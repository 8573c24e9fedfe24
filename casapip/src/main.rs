mod cli;
mod commands;

use anyhow::Result;
use casapip_bootstrap::ConfigOverrides;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    casapip_core::observability::init_tracing();
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        user_dir: cli.user_dir,
        host_program: cli.host_program,
        pip_url: cli.pip_url,
        pip_checksum: cli.pip_checksum,
        work_dir: cli.work_dir,
    };

    match cli.command {
        None => commands::install::cmd_install(overrides)?,
        Some(Commands::Info { json }) => commands::info::cmd_info(overrides, json)?,
    }
    Ok(())
}
