//! Tests for the `mono` binary

use crate::helpers::{TestRepo, assert_same_tree, fixture_snapshot, run_mono, run_mono_unchecked};
use anyhow::Result;

#[test]
fn test_release_command_matches_golden() -> Result<()> {
  let repo = TestRepo::from_fixture("prev-release")?;

  let output = run_mono(&repo.path, &["release", "v1.2.0"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("example.com/mono/cli"));
  assert!(stdout.contains("5 files written"), "{}", stdout);
  assert_same_tree(&repo.snapshot()?, &fixture_snapshot("golden")?);
  Ok(())
}

#[test]
fn test_release_command_with_context_dir() -> Result<()> {
  let repo = TestRepo::from_fixture("prev-release")?;
  let cwd = tempfile::TempDir::new()?;
  let context = repo.path.to_string_lossy().to_string();

  run_mono(cwd.path(), &["release", "--context", &context, "--progress", "v1.2.0"])?;

  assert_same_tree(&repo.snapshot()?, &fixture_snapshot("golden")?);
  Ok(())
}

#[test]
fn test_release_dry_run_json() -> Result<()> {
  let repo = TestRepo::from_fixture("prev-release")?;
  let before = repo.snapshot()?;

  let output = run_mono(&repo.path, &["release", "--dry-run", "--json", "v1.2.0"])?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["version"], "v1.2.0");
  assert_eq!(report["dry_run"], true);
  assert_eq!(report["modules"].as_array().map(Vec::len), Some(3));
  assert_eq!(report["modules"][0]["module"], "example.com/mono/core");
  assert_eq!(report["modules"][0]["manifest"], "skipped");
  assert_eq!(report["modules"][0]["lock"], "unchanged");
  assert_same_tree(&repo.snapshot()?, &before);
  Ok(())
}

#[test]
fn test_invalid_version_exit_code() -> Result<()> {
  let repo = TestRepo::from_fixture("prev-release")?;

  let output = run_mono_unchecked(&repo.path, &["release", "not#valid"])?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("invalid version \"not#valid\""), "{}", stderr);
  Ok(())
}

#[test]
fn test_lock_inconsistency_exit_code() -> Result<()> {
  let repo = TestRepo::from_fixture("inconsistent-lock")?;

  let output = run_mono_unchecked(&repo.path, &["release", "v1.2.0"])?;

  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("missing lock entry for example.com/mono/core@v0.1.0"), "{}", stderr);
  Ok(())
}

#[test]
fn test_order_command_is_read_only() -> Result<()> {
  let repo = TestRepo::from_fixture("prev-release")?;
  let before = repo.snapshot()?;

  let output = run_mono(&repo.path, &["order", "--json"])?;
  let order: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  let modules: Vec<&str> = order
    .as_array()
    .map(|rows| rows.iter().filter_map(|row| row["module"].as_str()).collect())
    .unwrap_or_default();
  assert_eq!(
    modules,
    vec!["example.com/mono/core", "example.com/mono/util", "example.com/mono/cli"]
  );
  assert_eq!(order[2]["dependencies"][1], "example.com/mono/util");
  assert_same_tree(&repo.snapshot()?, &before);
  Ok(())
}

#[test]
fn test_order_command_reports_cycle() -> Result<()> {
  let repo = TestRepo::from_fixture("cycle")?;

  let output = run_mono_unchecked(&repo.path, &["order"])?;

  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("example.com/cyc/alpha"), "{}", stderr);
  Ok(())
}
