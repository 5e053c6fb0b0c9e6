//! Error types for the menu engine.
//!
//! This module defines the centralized error type [`LcdMenuError`] and a type alias
//! [`Result`] used throughout the crate. Errors are implemented with the `thiserror`
//! crate for automatic `Error` trait implementation.
//!
//! Only background operations and the configuration layer produce errors. Focus
//! protocol misuse is a programming defect and panics instead of returning an error.

use thiserror::Error;

/// The main error type for menu engine operations.
///
/// Errors raised inside a background operation never reach the UI context as
/// errors: the modal task runner converts them into a failed outcome and only
/// logs the message.
///
/// # Examples
///
/// ```
/// use lcdmenu::LcdMenuError;
///
/// fn read_versions() -> Result<(), LcdMenuError> {
///     Err(LcdMenuError::Device("version file missing".to_string()))
/// }
/// assert!(read_versions().is_err());
/// ```
#[derive(Debug, Error)]
pub enum LcdMenuError {
    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when a configuration file cannot be parsed or holds values of the
    /// wrong type.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A device query failed.
    ///
    /// Raised by version sources when the installed firmware or image version
    /// cannot be determined.
    #[error("Device error: {0}")]
    Device(String),

    /// A network query failed.
    ///
    /// Raised by network sources when no local address can be determined.
    #[error("Network error: {0}")]
    Network(String),

    /// A background operation failed for a reason of its own.
    #[error("Task error: {0}")]
    Task(String),
}

/// A specialized `Result` type for menu engine operations.
pub type Result<T> = std::result::Result<T, LcdMenuError>;
