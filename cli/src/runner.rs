//! External tool execution.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Runs one external command to completion.
///
/// A non-zero exit status is an error. Tests substitute a recording
/// implementation to script failures.
pub trait ToolRunner {
    fn run(&self, command: &[String], cwd: &Path) -> Result<()>;
}

/// Spawns real processes, inheriting stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, command: &[String], cwd: &Path) -> Result<()> {
        let (program, args) = command
            .split_first()
            .context("empty command in pack configuration")?;

        debug!(program, ?args, cwd = %cwd.display(), "spawning");
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .with_context(|| format!("failed to spawn `{program}`"))?;

        if !status.success() {
            bail!("`{}` exited with {}", command.join(" "), status);
        }
        Ok(())
    }
}
