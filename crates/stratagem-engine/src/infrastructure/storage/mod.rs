//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module handles:
//!
//! - Reading the TOML configuration file from the platform-appropriate
//!   directory, or from an explicit path.
//! - Providing defaults when the file does not exist yet (first run).
//! - Turning the file into the engine's settings and slot table.
//!
//! Writing settings back is left to the host application.

pub mod config;
