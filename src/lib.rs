//! Coordinated version releases for monorepos
//!
//! Every module of a repository (a subdirectory holding a `module.toml`) is
//! moved to one target version. Intra-repo requirements follow, and each
//! module's `module.sum` lock file is refreshed with the content hashes of its
//! freshly rewritten dependencies, processing modules dependencies-first.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = mono_release::release(Path::new("."), "v1.4.0", true)?;
//! for module in &report.modules {
//!   println!("{} {}", module.module, module.dir_hash);
//! }
//! # Ok::<(), mono_release::MonoError>(())
//! ```

pub mod commands;
pub mod core;
pub mod graph;
pub mod modules;
pub mod release;
pub mod ui;
pub mod utils;
pub mod version;

pub use crate::core::error::{ExitCode, MonoError, MonoResult};
pub use crate::core::events::{EventSink, NullSink, ReleaseEvent, TracingSink};
pub use crate::release::{ModuleReport, ReleaseOptions, ReleaseReport, WriteOutcome, release, release_with};
pub use crate::version::ReleaseVersion;
