//! Coordinated monorepo releases
//!
//! A release moves every module of the repository to one version in a single
//! pass:
//!
//! 1. **Validate** the target version (nothing is touched when it is invalid)
//! 2. **Discover** modules and build the dependency graph ([`ReleaseContext`])
//! 3. **Synchronize** module versions and intra-repo requirements ([`sync`])
//! 4. **Rehash** each module in dependencies-first order ([`hashes`])
//!
//! Step 4 is where ordering matters: a module's lock entries pin the hashes of
//! its dependencies *after* they were rewritten, so every dependency must be
//! finished before any of its dependents starts.
//!
//! Errors stop the run. Modules processed before the failure keep their new
//! files; nothing is rolled back.

pub mod hashes;
pub mod sync;

use crate::core::context::ReleaseContext;
use crate::core::error::{MonoResult, ResultExt};
use crate::core::events::{EventSink, ReleaseEvent, TracingSink};
use crate::version::ReleaseVersion;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Knobs for a release run
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseOptions {
  /// Compute everything, write nothing
  pub dry_run: bool,
}

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
  Written,
  /// Rendered bytes already on disk
  Unchanged,
  /// Dry-run
  Skipped,
}

/// Per-module result of a release
#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
  pub module: String,
  pub dir: PathBuf,
  pub version: String,
  pub manifest_hash: String,
  pub dir_hash: String,
  pub manifest: WriteOutcome,
  /// `None` when the module has no lock file and needs none
  pub lock: Option<WriteOutcome>,
  pub lock_entries_replaced: usize,
}

/// Result of a release, modules in processing order
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseReport {
  pub version: String,
  pub dry_run: bool,
  pub order: Vec<String>,
  pub modules: Vec<ModuleReport>,
}

impl ReleaseReport {
  /// Number of files actually rewritten on disk
  pub fn files_written(&self) -> usize {
    self
      .modules
      .iter()
      .flat_map(|m| std::iter::once(m.manifest).chain(m.lock))
      .filter(|outcome| *outcome == WriteOutcome::Written)
      .count()
  }

  pub fn module(&self, path: &str) -> Option<&ModuleReport> {
    self.modules.iter().find(|m| m.module == path)
  }
}

/// Release every module under `root` at `version`.
///
/// Progress is reported through `tracing`.
pub fn release(root: &Path, version: &str, dry_run: bool) -> MonoResult<ReleaseReport> {
  release_with(root, version, ReleaseOptions { dry_run }, &mut TracingSink)
}

/// Release every module under `root` at `version`, reporting to `events`.
pub fn release_with(
  root: &Path,
  version: &str,
  options: ReleaseOptions,
  events: &mut dyn EventSink,
) -> MonoResult<ReleaseReport> {
  let target = ReleaseVersion::parse(version).context("failed to update modules to new version")?;

  let mut ctx = ReleaseContext::build(root, events)?;
  sync::sync_versions(&mut ctx.workspace, &target, events);

  let mut modules = Vec::with_capacity(ctx.order.len());
  for id in ctx.order.clone() {
    let report = hashes::update_module(&mut ctx.workspace, id, &target, options.dry_run, events)
      .context("failed to update modules to new version")?;
    modules.push(report);
  }

  events.emit(ReleaseEvent::ReleaseFinished {
    modules: modules.len(),
    dry_run: options.dry_run,
  });

  Ok(ReleaseReport {
    version: target.to_string(),
    dry_run: options.dry_run,
    order: ctx.order_paths(),
    modules,
  })
}
