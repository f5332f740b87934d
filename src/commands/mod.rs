//! CLI commands for mono
//!
//! - **release**: move every module to one version and refresh lock hashes
//! - **order**: print the dependencies-first release order (read-only)

pub mod order;
pub mod release;

pub use order::run_order;
pub use release::run_release;
