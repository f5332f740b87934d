//! Order command implementation

use crate::core::context::ReleaseContext;
use crate::core::error::MonoResult;
use crate::core::events::TracingSink;
use crate::utils::display_relative;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One row of the release order
#[derive(Debug, Clone, Serialize)]
pub struct OrderEntry {
  pub module: String,
  pub version: String,
  pub dir: PathBuf,
  /// Identities of the intra-repo modules this one requires
  pub dependencies: Vec<String>,
}

/// Run the order command
pub fn run_order(root: &Path, json: bool) -> MonoResult<()> {
  let ctx = ReleaseContext::build(root, &mut TracingSink)?;

  let entries: Vec<OrderEntry> = ctx
    .order
    .iter()
    .map(|id| {
      let module = ctx.workspace.get(*id);
      OrderEntry {
        module: module.path().to_string(),
        version: module.version().to_string(),
        dir: module.dir.clone(),
        dependencies: module
          .dependencies
          .iter()
          .map(|dep| ctx.workspace.get(dep.id).path().to_string())
          .collect(),
      }
    })
    .collect();

  if json {
    println!("{}", serde_json::to_string_pretty(&entries)?);
    return Ok(());
  }

  println!("Release order ({} modules):", entries.len());
  for (i, entry) in entries.iter().enumerate() {
    let deps = if entry.dependencies.is_empty() {
      String::new()
    } else {
      format!(" <- {}", entry.dependencies.join(", "))
    };
    println!(
      "  {:>3}. {} {} ({}){}",
      i + 1,
      entry.module,
      entry.version,
      display_relative(root, &entry.dir),
      deps
    );
  }

  Ok(())
}
