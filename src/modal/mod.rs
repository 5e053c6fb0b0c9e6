//! Modal task runner.
//!
//! An item hands a long-running operation to a [`ProgressDialog`]. The
//! operation runs on its own worker thread while a dialog with the working
//! message owns the screen and input. The outcome comes back over a
//! single-slot channel and is collected on the UI thread by
//! [`ProgressDialog::poll`], which passes it to the item's callback exactly
//! once.
//!
//! # Modules
//!
//! - [`task`]: Task descriptors, worker spawn, handles and outcomes
//! - [`runner`]: The progress dialog state machine

pub mod runner;
pub mod task;

pub use runner::{DialogState, ProgressDialog};
pub use task::{Operation, Outcome, TaskDescriptor, TaskError, TaskHandle};
