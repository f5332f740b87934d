//! Structured progress events
//!
//! Every step of a release reports what it did through an [`EventSink`] passed
//! in by the caller. Sinks observe; they never influence control flow.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseEvent {
  /// A subdirectory with a manifest was loaded
  ModuleFound { module: String, dir: PathBuf },
  /// A subdirectory was not treated as a module
  DirectorySkipped { dir: PathBuf, reason: &'static str },
  /// A requirement resolved to another module in the repository
  DependencyFound {
    module: String,
    dependency: String,
    version: String,
  },
  /// Modules will be processed in this order
  OrderResolved { order: Vec<String> },
  /// A module's own version was rewritten in memory
  VersionSet { module: String, from: String, to: String },
  FileWritten { module: String, file: PathBuf },
  /// The rendered bytes equal what is already on disk
  FileUnchanged { module: String, file: PathBuf },
  /// Dry-run: the write was not performed
  WriteSkipped { module: String, file: PathBuf },
  LockEntryReplaced {
    module: String,
    old_key: String,
    new_key: String,
    old_hashes: Vec<String>,
    new_hash: String,
  },
  /// A module finished; its hashes are final
  ModuleUpdated {
    module: String,
    manifest_hash: String,
    dir_hash: String,
  },
  ReleaseFinished { modules: usize, dry_run: bool },
}

/// Receiver for release progress events
pub trait EventSink {
  fn emit(&mut self, event: ReleaseEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
  fn emit(&mut self, _event: ReleaseEvent) {}
}

/// Collects events in order (handy for inspection in tests)
impl EventSink for Vec<ReleaseEvent> {
  fn emit(&mut self, event: ReleaseEvent) {
    self.push(event);
  }
}

/// Forwards events to `tracing` as structured records
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
  fn emit(&mut self, event: ReleaseEvent) {
    match event {
      ReleaseEvent::ModuleFound { module, dir } => {
        tracing::debug!(module = %module, dir = %dir.display(), "found monorepo module");
      }
      ReleaseEvent::DirectorySkipped { dir, reason } => {
        tracing::debug!(dir = %dir.display(), reason, "skipped directory");
      }
      ReleaseEvent::DependencyFound {
        module,
        dependency,
        version,
      } => {
        tracing::debug!(module = %module, dependency = %dependency, version = %version, "found interdependency");
      }
      ReleaseEvent::OrderResolved { order } => {
        tracing::debug!(order = %order.join(", "), "resolved release order");
      }
      ReleaseEvent::VersionSet { module, from, to } => {
        tracing::debug!(module = %module, from = %from, to = %to, "set module version");
      }
      ReleaseEvent::FileWritten { module, file } => {
        tracing::debug!(module = %module, file = %file.display(), "wrote file");
      }
      ReleaseEvent::FileUnchanged { module, file } => {
        tracing::debug!(module = %module, file = %file.display(), "file already up to date");
      }
      ReleaseEvent::WriteSkipped { module, file } => {
        tracing::debug!(module = %module, file = %file.display(), "[skipped] writing file");
      }
      ReleaseEvent::LockEntryReplaced {
        module,
        old_key,
        new_key,
        old_hashes,
        new_hash,
      } => {
        tracing::debug!(
          module = %module,
          old = %old_key,
          new = %new_key,
          old_hashes = %old_hashes.join(" "),
          new_hash = %new_hash,
          "changed dependency lock entry"
        );
      }
      ReleaseEvent::ModuleUpdated {
        module,
        manifest_hash,
        dir_hash,
      } => {
        tracing::info!(module = %module, manifest_hash = %manifest_hash, dir_hash = %dir_hash, "module updated");
      }
      ReleaseEvent::ReleaseFinished { modules, dry_run } => {
        tracing::info!(modules, dry_run, "all modules updated");
      }
    }
  }
}
