//! Modules of a monorepo and their on-disk files
//!
//! - **discovery**: find and load every module below the repository root
//! - **manifest**: `module.toml` parsing and lossless editing
//! - **lockfile**: `module.sum` codec
//! - **hash**: `h1:` content hashes for directories and manifests
//! - **module**: module records and the arena that owns them

pub mod discovery;
pub mod hash;
pub mod lockfile;
pub mod manifest;
pub mod module;

/// Manifest file expected in every module directory
pub const MANIFEST_FILE: &str = "module.toml";

/// Lock file pinning dependency hashes, next to the manifest
pub const LOCK_FILE: &str = "module.sum";

pub use discovery::discover;
pub use lockfile::{HashKind, LockKey, LockTable};
pub use manifest::{Manifest, Requirement};
pub use module::{Module, ModuleHashes, ModuleId, ResolvedDependency, Workspace};
