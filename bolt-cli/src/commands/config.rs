//! `bolt config` - inspect the layered configuration.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::ConfigLoader;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the merged user and project config as TOML. Values under
    /// [api_keys], provider api_key fields, and [env] entries whose names
    /// contain KEY, TOKEN or SECRET are masked.
    Show,
    /// Print where the user and project config files are looked up
    Path,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let merged = ConfigLoader::load()?.redacted();
            print!("{}", toml::to_string_pretty(&merged)?);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("User config:    {}", describe(&ConfigLoader::user_config_path()));
            println!("Project config: {}", describe(&ConfigLoader::project_config_path()));
            Ok(())
        }
    }
}

/// The path, flagged when no file exists there yet.
fn describe(path: &Path) -> String {
    if path.is_file() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}
