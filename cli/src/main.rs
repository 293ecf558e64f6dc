//! chainfeed-pack — package and publish the ChainFeed client crate.
//!
//! ```
//! chainfeed-pack                      # clean, trim README, build, publish, restore
//! chainfeed-pack --skip-publish       # stop after relocating the package
//! chainfeed-pack --config pack.yaml   # override commands and paths
//! ```

use anyhow::{Context, Result};
use chainfeed_observability::{init_tracing, LogConfig};
use clap::Parser;
use std::path::PathBuf;

mod pack;
mod runner;

use pack::{PackConfig, Packer};
use runner::SystemRunner;

#[derive(Parser)]
#[command(
    name = "chainfeed-pack",
    about = "Build and publish the ChainFeed package with a trimmed README",
    long_about = "
Runs: clean -> truncate README -> build -> relocate -> publish.
The README is restored with `git restore` whether or not any step failed.

ENVIRONMENT VARIABLES:
  CHAINFEED_LOG        tracing filter directives (default: info)
  CHAINFEED_LOG_JSON   emit JSON log lines when true
",
    version
)]
struct Cli {
    /// YAML file overriding the default commands and paths
    #[arg(long)]
    config: Option<PathBuf>,

    /// Build and relocate the package but do not publish it
    #[arg(long)]
    skip_publish: bool,

    /// Workspace root to package (default: current directory)
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&LogConfig::from_env()).context("initialising logging")?;

    let config = match &cli.config {
        Some(path) => PackConfig::load(path)?,
        None => PackConfig::default(),
    };

    Packer::new(cli.root, config, SystemRunner).run(cli.skip_publish)
}
