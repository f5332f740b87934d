//! Release command implementation

use crate::core::error::MonoResult;
use crate::core::events::{EventSink, TracingSink};
use crate::release::{ReleaseOptions, ReleaseReport, WriteOutcome, release_with};
use crate::ui::ProgressSink;
use crate::utils::display_relative;
use std::path::Path;

/// Run the release command
pub fn run_release(root: &Path, version: &str, dry_run: bool, json: bool, progress: bool) -> MonoResult<()> {
  let options = ReleaseOptions { dry_run };

  let mut sink: Box<dyn EventSink> = if progress && !json {
    Box::new(ProgressSink::new(TracingSink))
  } else {
    Box::new(TracingSink)
  };
  let report = release_with(root, version, options, sink.as_mut())?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(root, &report);
  }

  Ok(())
}

fn print_report(root: &Path, report: &ReleaseReport) {
  println!("📦 Release {} ({} modules)", report.version, report.modules.len());
  println!();

  for module in &report.modules {
    println!("  {} ({})", module.module, display_relative(root, &module.dir));
    println!("    manifest: {} {}", module.manifest_hash, format_outcome(module.manifest));
    if let Some(lock) = module.lock {
      println!(
        "    lock:     {} entries replaced {}",
        module.lock_entries_replaced,
        format_outcome(lock)
      );
    }
    println!("    tree:     {}", module.dir_hash);
  }
  println!();

  if report.dry_run {
    println!("🔍 Dry-run mode (no changes applied)");
  } else {
    println!("✅ Released {} ({} files written)", report.version, report.files_written());
  }
}

fn format_outcome(outcome: WriteOutcome) -> &'static str {
  match outcome {
    WriteOutcome::Written => "[written]",
    WriteOutcome::Unchanged => "[unchanged]",
    WriteOutcome::Skipped => "[dry-run]",
  }
}
