//! CLI command implementations.

mod build;
mod check;
mod routes;
mod serve;

use std::path::PathBuf;

use clap::Args;
use quire_config::{CliSettings, Config};

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use routes::RoutesArgs;
pub(crate) use serve::ServeArgs;

/// Options shared by every command that reads the site configuration.
#[derive(Args, Debug, Default)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long, env = "QUIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    src_dir: Option<PathBuf>,

    /// Build output directory (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Deployment base path (overrides config).
    #[arg(long, env = "QUIRE_BASE")]
    base: Option<String>,
}

impl SiteArgs {
    /// Load the configuration with these overrides applied.
    pub(crate) fn load(self, host: Option<String>, port: Option<u16>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            host,
            port,
            src_dir: self.src_dir,
            out_dir: self.out_dir,
            base: self.base,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}
