//! Lock file codec (`module.sum`)
//!
//! One pinned hash per line: `path version hash`. A version ending in
//! `/module.toml` pins the dependency's manifest hash; a bare version pins its
//! directory hash. Both live in the same table under distinct keys.

use super::MANIFEST_FILE;
use crate::core::error::{MonoError, MonoResult};
use crate::version;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Hash of a one-file tree holding an empty `module.toml`.
///
/// Older tooling wrote this for directories that were not modules. It is
/// stripped on read and never written back.
pub const LEGACY_EMPTY_MANIFEST_HASH: &str = "h1:pBQ6CljZOi5cutD/oaEDvLrCFa5syHp6NtaVz4jNJlQ=";

/// What a lock entry pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashKind {
  /// Hash of the dependency's whole directory tree
  Dir,
  /// Hash of the dependency's manifest alone
  Manifest,
}

impl HashKind {
  pub const ALL: [HashKind; 2] = [HashKind::Dir, HashKind::Manifest];

  /// Suffix appended to the version field in the lock file
  pub fn suffix(self) -> String {
    match self {
      HashKind::Dir => String::new(),
      HashKind::Manifest => format!("/{}", MANIFEST_FILE),
    }
  }
}

/// Key of a lock table entry: (dependency path, version, kind)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey {
  pub path: String,
  pub version: String,
  pub kind: HashKind,
}

impl LockKey {
  pub fn new(path: impl Into<String>, version: impl Into<String>, kind: HashKind) -> Self {
    Self {
      path: path.into(),
      version: version.into(),
      kind,
    }
  }

  /// Split a lock file version field into version and kind.
  fn from_fields(path: &str, field: &str) -> Self {
    let manifest_suffix = HashKind::Manifest.suffix();
    match field.strip_suffix(manifest_suffix.as_str()) {
      Some(version) => Self::new(path, version, HashKind::Manifest),
      None => Self::new(path, field, HashKind::Dir),
    }
  }

  /// The version field as written to the lock file
  pub fn version_field(&self) -> String {
    format!("{}{}", self.version, self.kind.suffix())
  }
}

impl fmt::Display for LockKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}@{}", self.path, self.version_field())
  }
}

impl Ord for LockKey {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .path
      .cmp(&other.path)
      .then_with(|| version::compare(&self.version, &other.version))
      .then_with(|| self.kind.cmp(&other.kind))
      .then_with(|| self.version.cmp(&other.version))
  }
}

impl PartialOrd for LockKey {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

/// A module's pinned dependency hashes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockTable {
  entries: BTreeMap<LockKey, Vec<String>>,
}

impl LockTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parse lock file text.
  ///
  /// Blank lines and lines that are not exactly three fields are skipped, as
  /// are entries carrying the legacy empty-manifest hash.
  pub fn parse(text: &str) -> Self {
    Self::parse_bytes(text.as_bytes())
  }

  /// Parse raw lock file bytes; lines that are not UTF-8 are foreign content and skipped.
  pub fn parse_bytes(bytes: &[u8]) -> Self {
    let mut table = Self::new();
    for line in bytes.split(|b| *b == b'\n') {
      let Ok(line) = std::str::from_utf8(line) else {
        continue;
      };
      let fields: Vec<&str> = line.split_whitespace().collect();
      let [path, version, hash] = fields.as_slice() else {
        continue;
      };
      if *hash == LEGACY_EMPTY_MANIFEST_HASH {
        continue;
      }
      table.insert(LockKey::from_fields(path, version), hash.to_string());
    }
    table
  }

  /// Read a lock file; a missing file is an empty table.
  ///
  /// Returns the table and the raw bytes that were on disk, if any.
  pub fn read(path: &Path) -> MonoResult<(Self, Option<Vec<u8>>)> {
    let bytes = match fs::read(path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((Self::new(), None)),
      Err(e) => return Err(MonoError::Io(e).context(format!("failed to read {}", path.display()))),
    };
    Ok((Self::parse_bytes(&bytes), Some(bytes)))
  }

  /// Append a hash under `key`; hashes inserted separately are all kept.
  pub fn insert(&mut self, key: LockKey, hash: String) {
    self.entries.entry(key).or_default().push(hash);
  }

  pub fn get(&self, key: &LockKey) -> Option<&[String]> {
    self.entries.get(key).map(Vec::as_slice)
  }

  pub fn contains(&self, key: &LockKey) -> bool {
    self.entries.contains_key(key)
  }

  /// Replace the entry under `old` with a single `hash` under `new`.
  ///
  /// Returns the hashes previously stored under `old`, or `None` (leaving the
  /// table untouched) when there was no such entry.
  pub fn replace(&mut self, old: &LockKey, new: LockKey, hash: String) -> Option<Vec<String>> {
    let previous = self.entries.remove(old)?;
    self.entries.insert(new, vec![hash]);
    Some(previous)
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Number of distinct keys
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&LockKey, &[String])> {
    self.entries.iter().map(|(k, v)| (k, v.as_slice()))
  }

  /// Serialize in canonical order, one line per stored hash.
  pub fn format(&self) -> String {
    let mut out = String::new();
    for (key, hashes) in &self.entries {
      for hash in hashes {
        if hash == LEGACY_EMPTY_MANIFEST_HASH {
          continue;
        }
        out.push_str(&key.path);
        out.push(' ');
        out.push_str(&key.version_field());
        out.push(' ');
        out.push_str(hash);
        out.push('\n');
      }
    }
    out
  }
}
