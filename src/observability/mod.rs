//! Structured logging with optional file output.
//!
//! Every layer logs through `tracing` macros. This module installs the
//! subscriber that turns those events into text lines.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → stderr | FileWriter → rotating log file
//! ```
//!
//! # Features
//!
//! - **Level Filtering**: `RUST_LOG` or the `trace_level` config option
//! - **Automatic Rotation**: Log files rotate at 10MB with 3-backup retention
//! - **Thread Names**: File output records the worker thread of background tasks
//!
//! # Usage
//!
//! Initialize tracing early, before building the menu:
//!
//! ```rust
//! use lcdmenu::observability::init_tracing;
//! use lcdmenu::Config;
//!
//! let config = Config::default();
//! init_tracing(&config);
//!
//! tracing::info!("menu starting");
//! ```
//!
//! # Modules
//!
//! - [`init`]: Tracing initialization and subscriber setup
//! - [`file_writer`]: Rotating file writer with size-based rotation

pub mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
