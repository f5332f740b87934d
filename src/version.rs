//! Module versions: `v`-prefixed semantic versions
//!
//! Release targets must be full `vMAJOR.MINOR.PATCH[-pre][+build]` versions.
//! Versions read back from lock files are compared leniently (shorthand `v1`
//! and `v1.2` are accepted) so that foreign entries still sort deterministically.

use crate::core::error::{MonoError, MonoResult};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A validated release target version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
  raw: String,
  parsed: semver::Version,
}

impl ReleaseVersion {
  /// Validate a target version string
  pub fn parse(version: &str) -> MonoResult<Self> {
    let invalid = || MonoError::InvalidVersion {
      version: version.to_string(),
    };

    let rest = version.strip_prefix('v').ok_or_else(invalid)?;
    let parsed = semver::Version::parse(rest).map_err(|_| invalid())?;

    Ok(Self {
      raw: version.to_string(),
      parsed,
    })
  }

  /// The version exactly as given, including the leading `v`
  pub fn as_str(&self) -> &str {
    &self.raw
  }

  pub fn semver(&self) -> &semver::Version {
    &self.parsed
  }

  pub fn is_prerelease(&self) -> bool {
    !self.parsed.pre.is_empty()
  }
}

impl FromStr for ReleaseVersion {
  type Err = MonoError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl fmt::Display for ReleaseVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.raw)
  }
}

/// Whether `version` is a valid full release version
pub fn is_valid(version: &str) -> bool {
  ReleaseVersion::parse(version).is_ok()
}

/// Parse a version leniently, accepting `v1` and `v1.2` shorthands
fn parse_lenient(version: &str) -> Option<semver::Version> {
  let rest = version.strip_prefix('v')?;
  if let Ok(v) = semver::Version::parse(rest) {
    return Some(v);
  }

  let mut parts = [0u64; 3];
  let mut count = 0;
  for part in rest.split('.') {
    if count == 2 || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
      return None;
    }
    if part.len() > 1 && part.starts_with('0') {
      return None;
    }
    parts[count] = part.parse().ok()?;
    count += 1;
  }
  if count == 0 {
    return None;
  }
  Some(semver::Version::new(parts[0], parts[1], parts[2]))
}

/// Compare two version strings by semantic precedence
///
/// Invalid versions sort before valid ones and compare equal among themselves.
/// Build metadata does not participate.
pub fn compare(a: &str, b: &str) -> Ordering {
  match (parse_lenient(a), parse_lenient(b)) {
    (Some(va), Some(vb)) => va.cmp_precedence(&vb),
    (Some(_), None) => Ordering::Greater,
    (None, Some(_)) => Ordering::Less,
    (None, None) => Ordering::Equal,
  }
}
