//! `h1:` content hashes for module directories and manifests
//!
//! The hash of a file set is computed over a summary listing, for every file
//! in name order, the hex SHA-256 of its content and its name. The summary
//! itself is hashed with SHA-256 and base64-encoded behind an `h1:` prefix.
//! File names inside a module directory are `"{path}@{version}/{relative}"`,
//! so the same tree hashes differently under a different identity or version.

use super::MANIFEST_FILE;
use crate::core::error::{MonoError, MonoResult, ResultExt};
use crate::utils::path_to_slash_format;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// In-memory file contents that replace (or add to) what is on disk,
/// keyed by slash-separated path relative to the hashed directory.
pub type Overlay = BTreeMap<String, Vec<u8>>;

/// Where the bytes of one hashed file come from
enum Source<'a> {
  Disk(PathBuf),
  Memory(&'a [u8]),
}

/// Compute the `h1:` hash of a named file set.
fn hash1<'a>(mut files: Vec<(String, Source<'a>)>) -> MonoResult<String> {
  files.sort_by(|a, b| a.0.cmp(&b.0));

  let mut summary = String::new();
  for (name, source) in &files {
    if name.contains('\n') {
      return Err(MonoError::message(format!("file name {:?} contains a newline", name)));
    }

    let digest = match source {
      Source::Disk(path) => {
        let mut file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher).with_context(|| format!("failed to read {}", path.display()))?;
        hasher.finalize()
      }
      Source::Memory(bytes) => Sha256::digest(bytes),
    };

    summary.push_str(&format!("{:x}", digest));
    summary.push_str("  ");
    summary.push_str(name);
    summary.push('\n');
  }

  let sum = Sha256::digest(summary.as_bytes());
  Ok(format!("h1:{}", base64::engine::general_purpose::STANDARD.encode(sum)))
}

/// Hash canonical manifest bytes as a one-file tree named after the manifest.
pub fn manifest_hash(canonical: &[u8]) -> MonoResult<String> {
  hash1(vec![(MANIFEST_FILE.to_string(), Source::Memory(canonical))])
}

/// Hash every regular file below `dir`, naming each `"{prefix}/{relative}"`.
pub fn hash_dir(dir: &Path, prefix: &str) -> MonoResult<String> {
  hash_dir_with_overlay(dir, prefix, &Overlay::new())
}

/// Like [`hash_dir`], but files present in `overlay` are hashed from memory.
///
/// Used to preview the hash of a tree whose pending writes were skipped.
pub fn hash_dir_with_overlay(dir: &Path, prefix: &str, overlay: &Overlay) -> MonoResult<String> {
  let mut files: BTreeMap<String, Source<'_>> = BTreeMap::new();

  for entry in WalkDir::new(dir).follow_links(false) {
    let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
    let file_type = entry.file_type();
    if file_type.is_dir() {
      continue;
    }

    let rel = entry
      .path()
      .strip_prefix(dir)
      .map_err(|_| MonoError::message(format!("{} escapes {}", entry.path().display(), dir.display())))?;
    let rel = path_to_slash_format(rel);

    if !file_type.is_file() {
      return Err(MonoError::with_help(
        format!("{} is not a regular file", entry.path().display()),
        "Module directories may only contain regular files and directories; symlinks are not hashable.",
      ));
    }

    files.insert(rel, Source::Disk(entry.path().to_path_buf()));
  }

  for (rel, bytes) in overlay {
    files.insert(rel.clone(), Source::Memory(bytes));
  }

  let named = files
    .into_iter()
    .map(|(rel, source)| (format!("{}/{}", prefix, rel), source))
    .collect();
  hash1(named)
}
