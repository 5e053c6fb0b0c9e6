//! Infrastructure layer for filesystem and environment interactions.
//!
//! This module resolves user-facing paths: `~` in configuration values and
//! the state directory that holds the log file.

pub mod paths;

pub use paths::{default_log_file, expand_tilde, get_state_dir, resolve_log_file};
