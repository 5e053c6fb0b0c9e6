//! Domain layer for the menu engine.
//!
//! This module contains the plain data types shared by every other layer,
//! independent of any display, input or threading concern.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`snapshot`]: Device information snapshot
//!
//! # Examples
//!
//! ```
//! use lcdmenu::domain::{InfoSnapshot, Result};
//!
//! fn build() -> Result<InfoSnapshot> {
//!     Ok(InfoSnapshot::new(
//!         "1.0".to_string(),
//!         "1.0".to_string(),
//!         None,
//!         "arm-linux".to_string(),
//!         "10.0.0.2".to_string(),
//!     ))
//! }
//! # assert!(build().is_ok());
//! ```

pub mod error;
pub mod snapshot;

pub use error::{LcdMenuError, Result};
pub use snapshot::{InfoSnapshot, UNKNOWN_VERSION};
