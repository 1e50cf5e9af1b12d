//! armm - Android Repo Manifest Management
//!
//! Edits and queries git-repo style XML manifests: a `<manifest>` tree of
//! remotes, defaults, projects (which may nest) and their annotations,
//! copyfile and linkfile entries.
//!
//! # Architecture
//!
//! - **manifest**: element registry, document tree, store, operations, queries
//! - **config**: optional user configuration (~/.config/armm/config.yaml)
//! - **output**: rendering of query results (plain, JSON, YAML)
//! - **logging**: tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod output;

// Re-exports
pub use error::{ArmmError, ErrorCategory, Result, ValidationError, ValidationReason};
