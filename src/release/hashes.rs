//! Hash consistency updates
//!
//! Modules are processed strictly in release order. For each module the
//! manifest is rendered, hashed and written; every lock entry pinning an
//! intra-repo dependency at its old version is replaced by one pinning the
//! dependency's fresh hashes at the target version; the lock file is written;
//! finally the module's own directory is hashed for the modules that follow.

use super::{ModuleReport, WriteOutcome};
use crate::core::error::{MonoError, MonoResult, ResultExt};
use crate::core::events::{EventSink, ReleaseEvent};
use crate::modules::hash::{self, Overlay};
use crate::modules::{HashKind, LOCK_FILE, LockKey, MANIFEST_FILE, ModuleHashes, ModuleId, Workspace};
use crate::utils::display_relative;
use crate::version::ReleaseVersion;
use std::fs;
use std::path::Path;

/// Rewrite one module's manifest and lock file and compute its hashes.
///
/// Every dependency of `id` must already have been processed.
pub fn update_module(
  workspace: &mut Workspace,
  id: ModuleId,
  target: &ReleaseVersion,
  dry_run: bool,
  events: &mut dyn EventSink,
) -> MonoResult<ModuleReport> {
  let root = workspace.root().to_path_buf();
  let module_path = workspace.get(id).path().to_string();

  // 1. Manifest
  let manifest_file = workspace.get(id).manifest_file();
  let canonical = workspace.get(id).manifest.to_canonical_string();
  let manifest_hash = hash::manifest_hash(canonical.as_bytes())?;
  let manifest_outcome = persist(
    &module_path,
    &manifest_file,
    canonical.as_bytes(),
    Some(workspace.get(id).manifest_source.as_bytes()),
    dry_run,
    events,
  )
  .with_context(|| format!("failed to update \"{}\"", display_relative(&root, &manifest_file)))?;

  // 2. Lock entries of intra-repo dependencies
  let lock_file = workspace.get(id).lock_file();
  let replaced = replace_lock_entries(workspace, id, target, events)
    .with_context(|| format!("failed to update \"{}\"", display_relative(&root, &lock_file)))?;

  // 3. Lock file
  let module = workspace.get(id);
  let lock_text = module.lock.format();
  let keep_lock = module.lock_source.is_some() || !module.lock.is_empty();
  let lock_outcome = if keep_lock {
    let outcome = persist(
      &module_path,
      &lock_file,
      lock_text.as_bytes(),
      module.lock_source.as_deref(),
      dry_run,
      events,
    )
    .with_context(|| format!("failed to update \"{}\"", display_relative(&root, &lock_file)))?;
    Some(outcome)
  } else {
    None
  };

  // 4. Directory hash, after the writes above
  let prefix = module.hash_prefix();
  let hashed = if dry_run {
    let mut overlay = Overlay::new();
    overlay.insert(MANIFEST_FILE.to_string(), canonical.into_bytes());
    if keep_lock {
      overlay.insert(LOCK_FILE.to_string(), lock_text.into_bytes());
    }
    hash::hash_dir_with_overlay(&module.dir, &prefix, &overlay)
  } else {
    hash::hash_dir(&module.dir, &prefix)
  };
  let dir_hash = hashed.with_context(|| format!("failed to hash \"{}\"", display_relative(&root, &module.dir)))?;

  let report = ModuleReport {
    module: module_path.clone(),
    dir: module.dir.clone(),
    version: target.to_string(),
    manifest_hash: manifest_hash.clone(),
    dir_hash: dir_hash.clone(),
    manifest: manifest_outcome,
    lock: lock_outcome,
    lock_entries_replaced: replaced,
  };

  workspace.get_mut(id).hashes = Some(ModuleHashes {
    manifest: manifest_hash.clone(),
    dir: dir_hash.clone(),
  });
  events.emit(ReleaseEvent::ModuleUpdated {
    module: module_path,
    manifest_hash,
    dir_hash,
  });

  Ok(report)
}

/// Swap every `(dep, old version)` lock entry for `(dep, target)` with the
/// dependency's fresh hash. Returns the number of entries replaced.
fn replace_lock_entries(
  workspace: &mut Workspace,
  id: ModuleId,
  target: &ReleaseVersion,
  events: &mut dyn EventSink,
) -> MonoResult<usize> {
  let module_path = workspace.get(id).path().to_string();

  let mut pending = Vec::new();
  for dep in &workspace.get(id).dependencies {
    let dependency = workspace.get(dep.id);
    let hashes = dependency.hashes.clone().ok_or_else(|| {
      MonoError::message(format!(
        "dependency '{}' of '{}' has not been hashed yet",
        dependency.path(),
        module_path
      ))
    })?;
    pending.push((dependency.path().to_string(), dep.declared_version.clone(), hashes));
  }

  let mut replaced = 0;
  for (dep_path, declared, hashes) in pending {
    for kind in HashKind::ALL {
      let old_key = LockKey::new(dep_path.clone(), declared.clone(), kind);
      let new_key = LockKey::new(dep_path.clone(), target.as_str(), kind);
      let new_hash = match kind {
        HashKind::Dir => hashes.dir.clone(),
        HashKind::Manifest => hashes.manifest.clone(),
      };

      let lock = &mut workspace.get_mut(id).lock;
      let Some(old_hashes) = lock.replace(&old_key, new_key.clone(), new_hash.clone()) else {
        return Err(MonoError::LockInconsistency {
          module: module_path,
          dependency: dep_path,
          version: old_key.version_field(),
        });
      };
      replaced += 1;

      events.emit(ReleaseEvent::LockEntryReplaced {
        module: module_path.clone(),
        old_key: old_key.to_string(),
        new_key: new_key.to_string(),
        old_hashes,
        new_hash,
      });
    }
  }

  Ok(replaced)
}

/// Write `bytes` unless they already match `current` or this is a dry run.
fn persist(
  module: &str,
  file: &Path,
  bytes: &[u8],
  current: Option<&[u8]>,
  dry_run: bool,
  events: &mut dyn EventSink,
) -> MonoResult<WriteOutcome> {
  let event_file = file.to_path_buf();
  if current == Some(bytes) {
    events.emit(ReleaseEvent::FileUnchanged {
      module: module.to_string(),
      file: event_file,
    });
    return Ok(WriteOutcome::Unchanged);
  }

  if dry_run {
    events.emit(ReleaseEvent::WriteSkipped {
      module: module.to_string(),
      file: event_file,
    });
    return Ok(WriteOutcome::Skipped);
  }

  fs::write(file, bytes)?;
  events.emit(ReleaseEvent::FileWritten {
    module: module.to_string(),
    file: event_file,
  });
  Ok(WriteOutcome::Written)
}
