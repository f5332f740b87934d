//! Error types for mono-release with contextual messages and exit codes
//!
//! Every failure aborts the whole release. Errors carry enough context (module
//! identity, file path) to tell the user which module stopped the run, plus an
//! optional hint on how to fix it.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for the `mono` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (invalid version, empty repository, bad config)
  User = 1,
  /// System error (I/O)
  System = 2,
  /// Validation failure (cycles, inconsistent lock files, broken manifests)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for mono-release
#[derive(Debug)]
pub enum MonoError {
  /// The repository root contains no discoverable module
  NoModulesFound { root: PathBuf },

  /// A module manifest is unreadable or malformed
  ManifestParse { path: PathBuf, reason: String },

  /// Two module directories declare the same identity
  DuplicateModule {
    module: String,
    first: PathBuf,
    second: PathBuf,
  },

  /// Intra-repo dependencies cannot be ordered
  GraphCycle { cycles: Vec<Vec<String>> },

  /// The target version is not a valid semantic version
  InvalidVersion { version: String },

  /// A lock file lacks the entry the hash updater must replace
  LockInconsistency {
    module: String,
    dependency: String,
    version: String,
  },

  /// Configuration errors
  Config(ConfigError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional help
  Message { message: String, help: Option<String> },

  /// Another error wrapped with a frame describing where it happened
  Context { context: String, source: Box<MonoError> },
}

impl MonoError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    MonoError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    MonoError::Message {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    MonoError::Context {
      context: ctx.into(),
      source: Box::new(self),
    }
  }

  /// The innermost error, skipping every context frame
  pub fn root(&self) -> &MonoError {
    match self {
      MonoError::Context { source, .. } => source.root(),
      other => other,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self.root() {
      MonoError::NoModulesFound { .. } => ExitCode::User,
      MonoError::InvalidVersion { .. } => ExitCode::User,
      MonoError::Config(_) => ExitCode::User,
      MonoError::Message { .. } => ExitCode::User,
      MonoError::Io(_) => ExitCode::System,
      MonoError::ManifestParse { .. }
      | MonoError::DuplicateModule { .. }
      | MonoError::GraphCycle { .. }
      | MonoError::LockInconsistency { .. } => ExitCode::Validation,
      MonoError::Context { .. } => unreachable!("root() never returns a context frame"),
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self.root() {
      MonoError::NoModulesFound { .. } => {
        Some("Run from the repository root or pass --context <DIR>. Each module needs a module.toml.".to_string())
      }
      MonoError::InvalidVersion { .. } => {
        Some("Versions look like v1.2.3, v1.2.3-rc.1 or v1.2.3+build.5 (note the leading 'v').".to_string())
      }
      MonoError::GraphCycle { .. } => {
        Some("Modules in one repository must not depend on each other in a loop. Remove one requirement.".to_string())
      }
      MonoError::LockInconsistency { .. } => Some(
        "The lock file does not match its manifest. Regenerate it before releasing, or restore the missing line."
          .to_string(),
      ),
      MonoError::DuplicateModule { .. } => Some("Every module.toml must declare a unique [module].path.".to_string()),
      MonoError::Config(e) => e.help_message(),
      MonoError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for MonoError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MonoError::NoModulesFound { root } => write!(f, "no modules found at {}", root.display()),
      MonoError::ManifestParse { path, reason } => {
        write!(f, "failed to parse manifest {}: {}", path.display(), reason)
      }
      MonoError::DuplicateModule { module, first, second } => write!(
        f,
        "module '{}' is declared twice: {} and {}",
        module,
        first.display(),
        second.display()
      ),
      MonoError::GraphCycle { cycles } => {
        write!(f, "dependency cycle between modules")?;
        for cycle in cycles {
          write!(f, "\n  {}", cycle.join(" -> "))?;
        }
        Ok(())
      }
      MonoError::InvalidVersion { version } => write!(f, "invalid version \"{}\"", version),
      MonoError::LockInconsistency {
        module,
        dependency,
        version,
      } => write!(
        f,
        "inconsistent dependencies in '{}': missing lock entry for {}@{}",
        module, dependency, version
      ),
      MonoError::Config(e) => write!(f, "{}", e),
      MonoError::Io(e) => write!(f, "I/O error: {}", e),
      MonoError::Message { message, .. } => write!(f, "{}", message),
      MonoError::Context { context, source } => write!(f, "{}: {}", context, source),
    }
  }
}

impl std::error::Error for MonoError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      MonoError::Io(e) => Some(e),
      MonoError::Context { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for MonoError {
  fn from(err: io::Error) -> Self {
    MonoError::Io(err)
  }
}

impl From<String> for MonoError {
  fn from(msg: String) -> Self {
    MonoError::message(msg)
  }
}

impl From<&str> for MonoError {
  fn from(msg: &str) -> Self {
    MonoError::message(msg)
  }
}

impl From<walkdir::Error> for MonoError {
  fn from(err: walkdir::Error) -> Self {
    match err.into_io_error() {
      Some(io) => MonoError::Io(io),
      None => MonoError::message("filesystem loop detected while walking module directory"),
    }
  }
}

impl From<toml_edit::de::Error> for MonoError {
  fn from(err: toml_edit::de::Error) -> Self {
    MonoError::Config(ConfigError::Invalid {
      reason: err.to_string(),
    })
  }
}

impl From<serde_json::Error> for MonoError {
  fn from(err: serde_json::Error) -> Self {
    MonoError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// mono.toml could not be deserialized
  Invalid { reason: String },

  /// An exclude entry is not a plain directory name
  BadExclude { entry: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { .. } => Some("Check mono.toml against the documented [discovery] table.".to_string()),
      ConfigError::BadExclude { .. } => {
        Some("Exclude entries name immediate subdirectories of the root, e.g. \"scripts\".".to_string())
      }
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Invalid { reason } => write!(f, "invalid mono.toml: {}", reason),
      ConfigError::BadExclude { entry } => write!(f, "invalid exclude entry '{}' in mono.toml", entry),
    }
  }
}

/// Result type alias for mono-release
pub type MonoResult<T> = Result<T, MonoError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> MonoResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> MonoResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<MonoError>,
{
  fn context(self, ctx: impl Into<String>) -> MonoResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> MonoResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &MonoError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
