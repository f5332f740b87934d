use crate::core::error::{ConfigError, MonoError, MonoResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Repository configuration for mono-release
/// Searched in order: mono.toml, .mono.toml, .config/mono.toml
///
/// Every table is optional; a repository without any config file releases
/// with the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonoConfig {
  #[serde(default)]
  pub discovery: DiscoveryConfig,
}

/// Module discovery settings
///
/// ```toml
/// [discovery]
/// exclude = ["scripts", "docs"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryConfig {
  /// Immediate subdirectories of the root that are never treated as modules
  #[serde(default)]
  pub exclude: Vec<String>,
}

impl DiscoveryConfig {
  /// Validate exclude entries are plain directory names
  pub fn validate(&self) -> MonoResult<()> {
    for entry in &self.exclude {
      if entry.is_empty() || entry.contains('/') || entry.contains('\\') || entry == "." || entry == ".." {
        return Err(MonoError::Config(ConfigError::BadExclude { entry: entry.clone() }));
      }
    }
    Ok(())
  }

  /// Whether the directory name is excluded from discovery
  pub fn is_excluded(&self, dir_name: &str) -> bool {
    self.exclude.iter().any(|e| e == dir_name)
  }
}

impl MonoConfig {
  /// Find config file in search order: mono.toml, .mono.toml, .config/mono.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = [
      root.join("mono.toml"),
      root.join(".mono.toml"),
      root.join(".config").join("mono.toml"),
    ];

    candidates.into_iter().find(|p| p.is_file())
  }

  /// Load config from the repository root, falling back to defaults when absent
  pub fn load(root: &Path) -> MonoResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("failed to read config from {}", config_path.display()))?;
    let config: MonoConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("failed to parse config from {}", config_path.display()))?;

    config
      .discovery
      .validate()
      .with_context(|| format!("invalid discovery configuration in {}", config_path.display()))?;

    Ok(config)
  }
}
