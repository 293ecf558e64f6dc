//! The packaging sequence.
//!
//! ```text
//! clean ─► truncate README ─► build ─► relocate ─► publish
//!               │                                     │
//!               └────────── restore README ◄──────────┘  (always)
//! ```
//!
//! Package registries render the README on the crate page, so the long
//! form is cut to its introduction while the package is built and put back
//! with `git restore` afterwards, however the sequence ended.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::runner::ToolRunner;

/// Placeholder substituted with the relocated package directory.
pub const PACKAGE_DIR_PLACEHOLDER: &str = "{package_dir}";
/// Placeholder substituted with the README path.
pub const README_PLACEHOLDER: &str = "{readme}";

/// Packaging settings. Every field has a default, so a `pack.yaml` only
/// needs the keys it changes. Paths are relative to the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    pub readme: PathBuf,
    /// Lines of the README kept in the published package
    pub keep_lines: usize,
    /// Scratch directory handed to the build tool
    pub dist_dir: PathBuf,
    /// Where the build tool leaves its artifacts
    pub output_dir: PathBuf,
    /// Final home of the artifacts
    pub package_dir: PathBuf,
    pub build: Vec<String>,
    /// `cargo publish` repackages from the manifest, so the default does not
    /// read `package_dir`. Uploaders of prebuilt artifacts reference it
    /// with `{package_dir}`.
    pub publish: Vec<String>,
    /// `{readme}` is replaced with the README path
    pub restore: Vec<String>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            readme: "README.md".into(),
            keep_lines: 28,
            dist_dir: "dist".into(),
            output_dir: "dist/package".into(),
            package_dir: "target/package".into(),
            build: args(&["cargo", "package", "--allow-dirty", "--no-verify", "--target-dir", "dist"]),
            publish: args(&["cargo", "publish", "--allow-dirty", "--no-verify"]),
            restore: args(&["git", "restore", README_PLACEHOLDER]),
        }
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

impl PackConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading pack config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("parsing pack config {}", path.display()))
    }
}

/// Keep the first `keep` lines of the file at `path` and drop the rest.
/// Returns the number of lines removed.
pub fn truncate_readme(path: &Path, keep: usize) -> Result<usize> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    if lines.len() <= keep {
        return Ok(0);
    }

    let kept: String = lines[..keep].concat();
    fs::write(path, kept).with_context(|| format!("writing {}", path.display()))?;
    Ok(lines.len() - keep)
}

fn remove_dir_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    // rename fails across filesystems
    fs::copy(from, to)?;
    fs::remove_file(from)
}

/// Runs the packaging sequence inside one workspace root.
pub struct Packer<R> {
    root: PathBuf,
    config: PackConfig,
    runner: R,
}

impl<R: ToolRunner> Packer<R> {
    pub fn new(root: impl Into<PathBuf>, config: PackConfig, runner: R) -> Self {
        Self {
            root: root.into(),
            config,
            runner,
        }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Remove leftovers of a previous run. Missing directories are fine.
    pub fn clean(&self) -> Result<()> {
        for dir in [&self.config.dist_dir, &self.config.package_dir] {
            let dir = self.path(dir);
            remove_dir_if_exists(&dir).with_context(|| format!("removing {}", dir.display()))?;
        }
        Ok(())
    }

    pub fn truncate_readme(&self) -> Result<()> {
        let readme = self.path(&self.config.readme);
        let removed = truncate_readme(&readme, self.config.keep_lines)?;
        info!(readme = %readme.display(), keep = self.config.keep_lines, removed, "README truncated");
        Ok(())
    }

    pub fn build(&self) -> Result<()> {
        info!("building package");
        self.runner
            .run(&self.config.build, &self.root)
            .context("package build failed")
    }

    /// Move every build artifact into the package directory, then drop the
    /// scratch directory.
    pub fn relocate(&self) -> Result<usize> {
        let output = self.path(&self.config.output_dir);
        let target = self.path(&self.config.package_dir);
        if !output.is_dir() {
            anyhow::bail!("build produced no output at {}", output.display());
        }

        let mut moved = 0;
        for entry in WalkDir::new(&output).min_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&output)?;
            let dest = target.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            move_file(entry.path(), &dest)
                .with_context(|| format!("moving {}", entry.path().display()))?;
            moved += 1;
        }

        let dist = self.path(&self.config.dist_dir);
        remove_dir_if_exists(&dist).with_context(|| format!("removing {}", dist.display()))?;
        info!(moved, dest = %target.display(), "artifacts relocated");
        Ok(moved)
    }

    pub fn publish(&self) -> Result<()> {
        let package_dir = self.config.package_dir.display().to_string();
        let command: Vec<String> = self
            .config
            .publish
            .iter()
            .map(|arg| arg.replace(PACKAGE_DIR_PLACEHOLDER, &package_dir))
            .collect();
        info!("publishing package");
        self.runner.run(&command, &self.root).context("publish failed")
    }

    pub fn restore(&self) -> Result<()> {
        let readme = self.config.readme.display().to_string();
        let command: Vec<String> = self
            .config
            .restore
            .iter()
            .map(|arg| arg.replace(README_PLACEHOLDER, &readme))
            .collect();
        self.runner
            .run(&command, &self.root)
            .context("restoring README failed")?;
        info!(readme = %readme, "README restored");
        Ok(())
    }

    /// The full sequence. The README is restored on every path once it has
    /// been touched; if both a step and the restore fail, the step's error
    /// is returned and the restore error is logged.
    pub fn run(&self, skip_publish: bool) -> Result<()> {
        self.clean()?;

        let guard = RestoreGuard::new(self);
        let outcome = self.package(skip_publish);
        let restored = guard.finish();

        match (outcome, restored) {
            (Err(e), Err(restore_err)) => {
                error!(error = %format!("{restore_err:#}"), "README restore failed after an earlier error");
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), restored) => restored,
        }
    }

    fn package(&self, skip_publish: bool) -> Result<()> {
        self.truncate_readme()?;
        self.build()?;
        self.relocate()?;
        if skip_publish {
            warn!("publish skipped");
            return Ok(());
        }
        self.publish()
    }
}

/// Restores the README when dropped, unless [`finish`](Self::finish)
/// already did.
struct RestoreGuard<'a, R: ToolRunner> {
    packer: Option<&'a Packer<R>>,
}

impl<'a, R: ToolRunner> RestoreGuard<'a, R> {
    fn new(packer: &'a Packer<R>) -> Self {
        Self {
            packer: Some(packer),
        }
    }

    fn finish(mut self) -> Result<()> {
        match self.packer.take() {
            Some(packer) => packer.restore(),
            None => Ok(()),
        }
    }
}

impl<R: ToolRunner> Drop for RestoreGuard<'_, R> {
    fn drop(&mut self) {
        if let Some(packer) = self.packer.take() {
            if let Err(e) = packer.restore() {
                error!(error = %format!("{e:#}"), "README restore failed during unwind");
            }
        }
    }
}
