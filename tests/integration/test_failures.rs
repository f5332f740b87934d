//! Releases that must stop, and what they leave behind

use crate::helpers::{TestRepo, assert_same_tree, fixture_snapshot};
use anyhow::Result;
use mono_release::{ExitCode, MonoError, release};

#[test]
fn test_invalid_version_touches_nothing() -> Result<()> {
  let repo = TestRepo::from_fixture("prev-release")?;
  let before = repo.snapshot()?;

  for version in ["not#valid", "1.2.0", "v1.2", "v1.2.0+", ""] {
    let err = release(&repo.path, version, false).unwrap_err();
    assert!(
      matches!(err.root(), MonoError::InvalidVersion { .. }),
      "{:?} gave {}",
      version,
      err
    );
    assert_eq!(err.exit_code(), ExitCode::User);
  }

  assert_same_tree(&repo.snapshot()?, &before);
  Ok(())
}

#[test]
fn test_invalid_version_is_reported_before_discovery() -> Result<()> {
  let repo = TestRepo::from_fixture("corrupt-manifest")?;

  let err = release(&repo.path, "not#valid", false).unwrap_err();

  assert!(matches!(err.root(), MonoError::InvalidVersion { .. }));
  Ok(())
}

#[test]
fn test_inconsistent_lock_stops_release() -> Result<()> {
  let repo = TestRepo::from_fixture("inconsistent-lock")?;

  let err = release(&repo.path, "v1.2.0", false).unwrap_err();

  match err.root() {
    MonoError::LockInconsistency {
      module,
      dependency,
      version,
    } => {
      assert_eq!(module, "example.com/mono/util");
      assert_eq!(dependency, "example.com/mono/core");
      assert_eq!(version, "v0.1.0");
    }
    other => panic!("unexpected error: {}", other),
  }
  assert_eq!(err.exit_code(), ExitCode::Validation);
  assert!(err.to_string().contains("util/module.sum"), "{}", err);

  // core finished before the failure
  let golden = fixture_snapshot("golden")?;
  let after = repo.snapshot()?;
  assert_eq!(after["core/module.toml"], golden["core/module.toml"]);

  // util's lock was not rewritten, cli was never reached
  let original = fixture_snapshot("inconsistent-lock")?;
  assert_eq!(after["util/module.sum"], original["util/module.sum"]);
  assert_eq!(after["cli/module.toml"], original["cli/module.toml"]);
  assert_eq!(after["cli/module.sum"], original["cli/module.sum"]);
  Ok(())
}

#[test]
fn test_missing_lock_file_is_inconsistent() -> Result<()> {
  let repo = TestRepo::from_fixture("missing-lock")?;

  let err = release(&repo.path, "v1.2.0", false).unwrap_err();

  match err.root() {
    MonoError::LockInconsistency {
      module,
      dependency,
      version,
    } => {
      assert_eq!(module, "example.com/mono/cli");
      assert_eq!(dependency, "example.com/mono/core");
      assert_eq!(version, "v0.1.0");
    }
    other => panic!("unexpected error: {}", other),
  }

  // Modules ordered before cli were fully released; no lock file was invented for cli
  let golden = fixture_snapshot("golden")?;
  let after = repo.snapshot()?;
  for file in ["core/module.toml", "core/module.sum", "util/module.toml", "util/module.sum"] {
    assert_eq!(after[file], golden[file], "{}", file);
  }
  assert!(!repo.file_exists("cli/module.sum"));
  Ok(())
}

#[test]
fn test_dry_run_reports_the_same_inconsistency() -> Result<()> {
  let repo = TestRepo::from_fixture("inconsistent-lock")?;
  let before = repo.snapshot()?;

  let err = release(&repo.path, "v1.2.0", true).unwrap_err();

  assert!(matches!(err.root(), MonoError::LockInconsistency { .. }));
  assert_same_tree(&repo.snapshot()?, &before);
  Ok(())
}

#[test]
fn test_cycle_is_rejected_before_any_write() -> Result<()> {
  let repo = TestRepo::from_fixture("cycle")?;
  let before = repo.snapshot()?;

  let err = release(&repo.path, "v1.2.0", false).unwrap_err();

  match err.root() {
    MonoError::GraphCycle { cycles } => {
      assert_eq!(
        cycles,
        &vec![vec![
          "example.com/cyc/alpha".to_string(),
          "example.com/cyc/beta".to_string(),
          "example.com/cyc/gamma".to_string(),
        ]]
      );
    }
    other => panic!("unexpected error: {}", other),
  }
  assert!(err.to_string().contains("failed to calculate monorepo interdependencies"));
  assert_same_tree(&repo.snapshot()?, &before);
  Ok(())
}

#[test]
fn test_corrupt_manifest_is_fatal() -> Result<()> {
  let repo = TestRepo::from_fixture("corrupt-manifest")?;
  let before = repo.snapshot()?;

  let err = release(&repo.path, "v1.2.0", false).unwrap_err();

  match err.root() {
    MonoError::ManifestParse { path, .. } => assert!(path.ends_with("broken/module.toml")),
    other => panic!("unexpected error: {}", other),
  }
  assert_same_tree(&repo.snapshot()?, &before);
  Ok(())
}

#[test]
fn test_no_modules_found() -> Result<()> {
  let repo = TestRepo::from_fixture("empty")?;

  let err = release(&repo.path, "v1.2.0", false).unwrap_err();

  assert!(matches!(err.root(), MonoError::NoModulesFound { .. }));
  Ok(())
}

#[test]
fn test_duplicate_module_identity() -> Result<()> {
  let repo = TestRepo::from_fixture("prev-release")?;
  std::fs::create_dir_all(repo.path.join("core-copy"))?;
  std::fs::copy(repo.path.join("core/module.toml"), repo.path.join("core-copy/module.toml"))?;

  let err = release(&repo.path, "v1.2.0", false).unwrap_err();

  match err.root() {
    MonoError::DuplicateModule { module, .. } => assert_eq!(module, "example.com/mono/core"),
    other => panic!("unexpected error: {}", other),
  }
  Ok(())
}

#[test]
fn test_excluded_directory_is_not_a_module() -> Result<()> {
  let repo = TestRepo::from_fixture("prev-release")?;
  std::fs::create_dir_all(repo.path.join("core-copy"))?;
  std::fs::copy(repo.path.join("core/module.toml"), repo.path.join("core-copy/module.toml"))?;
  std::fs::write(repo.path.join("mono.toml"), "[discovery]\nexclude = [\"core-copy\"]\n")?;

  let report = release(&repo.path, "v1.2.0", false)?;

  assert_eq!(report.modules.len(), 3);
  Ok(())
}
