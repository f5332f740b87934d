//! Core building blocks shared by every command
//!
//! - **config**: repository configuration (mono.toml) parsing and validation
//! - **context**: discovered modules, graph and release order loaded once
//! - **error**: error types with contextual help messages
//! - **events**: structured progress events and their sinks

pub mod config;
pub mod context;
pub mod error;
pub mod events;
