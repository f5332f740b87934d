//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Directory holding the fixture repositories
pub fn fixtures_dir() -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// A scratch copy of a fixture repository
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestRepo {
  /// Copy `tests/fixtures/<name>` into a fresh temporary directory
  pub fn from_fixture(name: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("repo");
    copy_tree(&fixtures_dir().join(name), &path).with_context(|| format!("Failed to copy fixture {}", name))?;
    Ok(Self { _root: root, path })
  }

  /// Read a file relative to the repository root
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Every file below the repository root with its bytes
  pub fn snapshot(&self) -> Result<BTreeMap<String, Vec<u8>>> {
    snapshot(&self.path)
  }
}

/// Recursively copy `from` into `to`
pub fn copy_tree(from: &Path, to: &Path) -> Result<()> {
  for entry in WalkDir::new(from) {
    let entry = entry?;
    let rel = entry.path().strip_prefix(from)?;
    let target = to.join(rel);
    if entry.file_type().is_dir() {
      std::fs::create_dir_all(&target)?;
    } else {
      std::fs::copy(entry.path(), &target)?;
    }
  }
  Ok(())
}

/// Map of slash-separated relative path to file bytes
pub fn snapshot(dir: &Path) -> Result<BTreeMap<String, Vec<u8>>> {
  let mut files = BTreeMap::new();
  for entry in WalkDir::new(dir) {
    let entry = entry?;
    if entry.file_type().is_file() {
      let rel = entry.path().strip_prefix(dir)?.to_string_lossy().replace('\\', "/");
      files.insert(rel, std::fs::read(entry.path())?);
    }
  }
  Ok(files)
}

/// Snapshot of one fixture, as committed
pub fn fixture_snapshot(name: &str) -> Result<BTreeMap<String, Vec<u8>>> {
  snapshot(&fixtures_dir().join(name))
}

/// Assert two snapshots are byte-identical, naming the first differing file
pub fn assert_same_tree(actual: &BTreeMap<String, Vec<u8>>, expected: &BTreeMap<String, Vec<u8>>) {
  let actual_names: Vec<_> = actual.keys().collect();
  let expected_names: Vec<_> = expected.keys().collect();
  assert_eq!(actual_names, expected_names, "file sets differ");

  for (name, bytes) in expected {
    assert_eq!(
      String::from_utf8_lossy(&actual[name]),
      String::from_utf8_lossy(bytes),
      "{} differs",
      name
    );
  }
}

/// Run the mono binary; fails if it exits non-zero
pub fn run_mono(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_mono_unchecked(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "mono command failed: mono {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the mono binary and return whatever it produced
pub fn run_mono_unchecked(cwd: &Path, args: &[&str]) -> Result<Output> {
  let mono_bin = env!("CARGO_BIN_EXE_mono");

  Command::new(mono_bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("MONO_LOG")
    .env("NO_COLOR", "1")
    .output()
    .context("Failed to run mono")
}
