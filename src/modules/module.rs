//! Module records and the arena that owns them
//!
//! Discovery creates every [`Module`] once and stores it in a [`Workspace`].
//! Everything else refers to modules by [`ModuleId`] (an arena index), so the
//! dependency graph never owns or cycles through module data.

use super::lockfile::LockTable;
use super::manifest::Manifest;
use super::{LOCK_FILE, MANIFEST_FILE};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Index of a module inside its [`Workspace`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModuleId(pub usize);

/// A resolved intra-repo dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
  pub id: ModuleId,
  /// Version the dependent required before the release rewrote it.
  /// Locates the lock entries that are about to be replaced.
  pub declared_version: String,
}

/// Hashes computed for a module during the release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleHashes {
  pub manifest: String,
  pub dir: String,
}

#[derive(Debug, Clone)]
pub struct Module {
  /// Directory holding the manifest
  pub dir: PathBuf,
  pub manifest: Manifest,
  /// Manifest text as read from disk
  pub manifest_source: String,
  pub lock: LockTable,
  /// Lock file bytes as read from disk (`None` when there was no lock file)
  pub lock_source: Option<Vec<u8>>,
  pub dependencies: Vec<ResolvedDependency>,
  pub hashes: Option<ModuleHashes>,
}

impl Module {
  pub fn new(
    dir: PathBuf,
    manifest: Manifest,
    manifest_source: String,
    lock: LockTable,
    lock_source: Option<Vec<u8>>,
  ) -> Self {
    Self {
      dir,
      manifest,
      manifest_source,
      lock,
      lock_source,
      dependencies: Vec::new(),
      hashes: None,
    }
  }

  /// Module identity
  pub fn path(&self) -> &str {
    self.manifest.module_path()
  }

  pub fn version(&self) -> &str {
    self.manifest.version()
  }

  pub fn manifest_file(&self) -> PathBuf {
    self.dir.join(MANIFEST_FILE)
  }

  pub fn lock_file(&self) -> PathBuf {
    self.dir.join(LOCK_FILE)
  }

  /// Prefix naming this module's files in its directory hash
  pub fn hash_prefix(&self) -> String {
    format!("{}@{}", self.path(), self.version())
  }
}

/// Arena of discovered modules, indexed by identity
#[derive(Debug, Clone, Default)]
pub struct Workspace {
  root: PathBuf,
  modules: Vec<Module>,
  by_path: HashMap<String, ModuleId>,
}

impl Workspace {
  pub fn new(root: PathBuf) -> Self {
    Self {
      root,
      modules: Vec::new(),
      by_path: HashMap::new(),
    }
  }

  /// Add a module, or hand it back when its identity is already taken.
  pub fn insert(&mut self, module: Module) -> Result<ModuleId, Box<Module>> {
    if self.by_path.contains_key(module.path()) {
      return Err(Box::new(module));
    }
    let id = ModuleId(self.modules.len());
    self.by_path.insert(module.path().to_string(), id);
    self.modules.push(module);
    Ok(id)
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  pub fn get(&self, id: ModuleId) -> &Module {
    &self.modules[id.0]
  }

  pub fn get_mut(&mut self, id: ModuleId) -> &mut Module {
    &mut self.modules[id.0]
  }

  pub fn find(&self, path: &str) -> Option<ModuleId> {
    self.by_path.get(path).copied()
  }

  pub fn ids(&self) -> impl Iterator<Item = ModuleId> + use<> {
    (0..self.modules.len()).map(ModuleId)
  }

  pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
    self.modules.iter().enumerate().map(|(i, m)| (ModuleId(i), m))
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Module> {
    self.modules.iter_mut()
  }
}
