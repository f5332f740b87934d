//! Module manifest (`module.toml`) with lossless editing
//!
//! ```toml
//! [module]
//! path = "example.com/mono/api"
//! version = "v1.0.0"
//!
//! [requires]
//! "example.com/mono/core" = "v1.0.0"
//! ```
//!
//! Edits replace only the affected values and keep their surrounding
//! whitespace and comments, so rewriting an already released manifest yields
//! the same bytes.

use crate::core::error::{MonoError, MonoResult};
use std::path::Path;
use toml_edit::{DocumentMut, Item, Value};

/// A declared dependency requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
  pub path: String,
  pub version: String,
}

#[derive(Debug, Clone)]
pub struct Manifest {
  doc: DocumentMut,
  module_path: String,
  version: String,
}

impl Manifest {
  /// Parse manifest text; `file` is only used in error messages.
  pub fn parse(file: &Path, text: &str) -> MonoResult<Self> {
    let fail = |reason: String| MonoError::ManifestParse {
      path: file.to_path_buf(),
      reason,
    };

    let doc: DocumentMut = text.parse().map_err(|e: toml_edit::TomlError| fail(e.to_string()))?;

    let module = doc
      .get("module")
      .and_then(Item::as_table_like)
      .ok_or_else(|| fail("missing [module] table".to_string()))?;
    let module_path = required_string(module.get("path"), "module.path").map_err(fail)?;
    let version = required_string(module.get("version"), "module.version").map_err(fail)?;

    if let Some(requires) = doc.get("requires") {
      let table = requires
        .as_table_like()
        .ok_or_else(|| fail("[requires] must be a table".to_string()))?;
      for (dep, item) in table.iter() {
        if item.as_str().is_none() {
          return Err(fail(format!("requirement '{}' must be a version string", dep)));
        }
      }
    }

    Ok(Self {
      doc,
      module_path,
      version,
    })
  }

  /// Module identity declared in `[module].path`
  pub fn module_path(&self) -> &str {
    &self.module_path
  }

  /// Module version declared in `[module].version`
  pub fn version(&self) -> &str {
    &self.version
  }

  /// Dependency requirements in declaration order
  pub fn requirements(&self) -> Vec<Requirement> {
    self
      .doc
      .get("requires")
      .and_then(Item::as_table_like)
      .map(|table| {
        table
          .iter()
          .filter_map(|(path, item)| {
            item.as_str().map(|version| Requirement {
              path: path.to_string(),
              version: version.to_string(),
            })
          })
          .collect()
      })
      .unwrap_or_default()
  }

  /// Set the module's own version.
  pub fn set_version(&mut self, version: &str) {
    if let Some(item) = self.doc.get_mut("module").and_then(|m| m.get_mut("version")) {
      set_string_preserving_decor(item, version);
    }
    self.version = version.to_string();
  }

  /// Point the requirement on `path` at `version`, adding it when absent.
  pub fn set_requirement(&mut self, path: &str, version: &str) {
    if self.doc.get("requires").is_none() {
      self.doc["requires"] = Item::Table(toml_edit::Table::new());
    }
    let Some(table) = self.doc.get_mut("requires").and_then(Item::as_table_like_mut) else {
      return;
    };
    match table.get_mut(path) {
      Some(item) => set_string_preserving_decor(item, version),
      None => {
        table.insert(path, toml_edit::value(version));
      }
    }
  }

  /// The manifest rendered back to text; these exact bytes are hashed and written.
  pub fn to_canonical_string(&self) -> String {
    self.doc.to_string()
  }
}

fn required_string(item: Option<&Item>, name: &str) -> Result<String, String> {
  match item.and_then(Item::as_str) {
    Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
    Some(_) => Err(format!("{} must not be empty", name)),
    None => Err(format!("missing string field {}", name)),
  }
}

fn set_string_preserving_decor(item: &mut Item, new: &str) {
  match item.as_value_mut() {
    Some(value) => {
      let decor = value.decor().clone();
      *value = Value::from(new);
      *value.decor_mut() = decor;
    }
    None => *item = toml_edit::value(new),
  }
}
