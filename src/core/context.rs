//! Release context - build once, pass everywhere
//!
//! # Design
//!
//! ReleaseContext loads everything a command needs about the repository in one
//! place (config, discovered modules, release order) so the
//! release engine and read-only commands (`mono order`) share a single code path.
//!
//! ```text
//! main.rs / release():
//!   ReleaseContext::build() -> ReleaseContext
//!   |
//!   v
//! sync versions -> update hashes (in ctx.order)
//! ```

use crate::core::config::MonoConfig;
use crate::core::error::{MonoError, MonoResult, ResultExt};
use crate::core::events::{EventSink, ReleaseEvent};
use crate::graph::ModuleGraph;
use crate::modules::{ModuleId, Workspace, discover};
use std::path::{Path, PathBuf};

/// Everything known about the repository before any module is mutated.
pub struct ReleaseContext {
  /// Repository root directory
  pub root: PathBuf,

  /// Repository configuration (defaults when no mono.toml exists)
  pub config: MonoConfig,

  /// Arena of discovered modules
  pub workspace: Workspace,

  /// Dependencies-first processing order
  pub order: Vec<ModuleId>,
}

impl ReleaseContext {
  /// Build the context for the repository at `root`.
  ///
  /// Fails when no module is found, when a manifest is broken, or when the
  /// modules cannot be ordered.
  pub fn build(root: &Path, events: &mut dyn EventSink) -> MonoResult<Self> {
    let config = MonoConfig::load(root)?;
    Self::build_with_config(root, config, events)
  }

  /// Build the context with an already loaded configuration.
  pub fn build_with_config(root: &Path, config: MonoConfig, events: &mut dyn EventSink) -> MonoResult<Self> {
    let mut workspace = discover(root, &config.discovery, events).context("failed to fetch monorepo modules")?;
    if workspace.is_empty() {
      return Err(MonoError::NoModulesFound {
        root: root.to_path_buf(),
      });
    }

    let graph = ModuleGraph::build(&mut workspace, events);
    let order = graph
      .topological_order(&workspace)
      .context("failed to calculate monorepo interdependencies")?;

    let ctx = Self {
      root: root.to_path_buf(),
      config,
      workspace,
      order,
    };
    events.emit(ReleaseEvent::OrderResolved {
      order: ctx.order_paths(),
    });
    Ok(ctx)
  }

  /// Module identities in processing order
  pub fn order_paths(&self) -> Vec<String> {
    self
      .order
      .iter()
      .map(|id| self.workspace.get(*id).path().to_string())
      .collect()
  }
}
