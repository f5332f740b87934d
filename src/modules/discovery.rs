//! Module discovery
//!
//! Every immediate, non-hidden subdirectory of the root holding a
//! `module.toml` is a module. Directories without one are skipped; a manifest
//! that is present but broken stops discovery.

use super::lockfile::LockTable;
use super::manifest::Manifest;
use super::module::{Module, Workspace};
use super::MANIFEST_FILE;
use crate::core::config::DiscoveryConfig;
use crate::core::error::{MonoError, MonoResult, ResultExt};
use crate::core::events::{EventSink, ReleaseEvent};
use crate::utils::is_hidden_entry;
use std::fs;
use std::io;
use std::path::Path;

/// Load every module below `root`.
///
/// Subdirectories are visited in name order so the arena (and everything
/// derived from it) is reproducible.
pub fn discover(root: &Path, config: &DiscoveryConfig, events: &mut dyn EventSink) -> MonoResult<Workspace> {
  let mut entries = Vec::new();
  for entry in fs::read_dir(root).with_context(|| format!("failed to list {}", root.display()))? {
    let entry = entry.with_context(|| format!("failed to list {}", root.display()))?;
    let file_type = entry
      .file_type()
      .with_context(|| format!("failed to inspect {}", entry.path().display()))?;
    if file_type.is_dir() {
      entries.push(entry);
    }
  }
  entries.sort_by_key(|e| e.file_name());

  let mut workspace = Workspace::new(root.to_path_buf());
  for entry in entries {
    let name = entry.file_name().to_string_lossy().to_string();
    let dir = entry.path();

    if is_hidden_entry(&name) {
      continue;
    }
    if config.is_excluded(&name) {
      events.emit(ReleaseEvent::DirectorySkipped {
        dir,
        reason: "excluded by configuration",
      });
      continue;
    }

    let manifest_file = dir.join(MANIFEST_FILE);
    let manifest_source = match fs::read_to_string(&manifest_file) {
      Ok(text) => text,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        events.emit(ReleaseEvent::DirectorySkipped {
          dir,
          reason: "no module.toml",
        });
        continue;
      }
      Err(e) => {
        return Err(MonoError::Io(e).context(format!("failed to read {}", manifest_file.display())));
      }
    };
    let manifest = Manifest::parse(&manifest_file, &manifest_source)?;

    let (lock, lock_source) = LockTable::read(&dir.join(super::LOCK_FILE))?;

    let module = Module::new(dir.clone(), manifest, manifest_source, lock, lock_source);
    events.emit(ReleaseEvent::ModuleFound {
      module: module.path().to_string(),
      dir: dir.clone(),
    });

    if let Err(duplicate) = workspace.insert(module) {
      let first = workspace
        .find(duplicate.path())
        .map(|id| workspace.get(id).dir.clone())
        .unwrap_or_default();
      return Err(MonoError::DuplicateModule {
        module: duplicate.path().to_string(),
        first,
        second: dir,
      });
    }
  }

  Ok(workspace)
}
