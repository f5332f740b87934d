//! Utility functions for cross-platform path handling

use std::path::Path;

/// Check if a directory entry name is hidden (`.git`, `.github`, ...)
pub fn is_hidden_entry(name: &str) -> bool {
  name.starts_with('.')
}

/// Convert a relative path to slash format (always forward slashes)
///
/// Content hashes name files with forward slashes so that the same tree hashes
/// identically on every platform.
pub fn path_to_slash_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Render `path` relative to `root` when possible, for messages
pub fn display_relative(root: &Path, path: &Path) -> String {
  path_to_slash_format(path.strip_prefix(root).unwrap_or(path))
}
