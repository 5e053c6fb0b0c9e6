//! Background operations and the handles that collect their outcome.

use crate::domain::Result;
use crate::input::{CancelSource, CancelToken};
use crate::ui::DialogView;
use crossbeam_channel::{bounded, Receiver, RecvError, TryRecvError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info_span};

/// Zero-argument background operation.
pub type Operation<T> = Arc<dyn Fn() -> Result<T> + Send + Sync>;

/// An operation together with the strings its progress dialog shows.
///
/// Immutable once built; owned by the item that runs it.
pub struct TaskDescriptor<T> {
    operation: Operation<T>,
    title: String,
    working: String,
    failed: String,
}

impl<T> TaskDescriptor<T> {
    pub fn new<F>(
        operation: F,
        title: impl Into<String>,
        working: impl Into<String>,
        failed: impl Into<String>,
    ) -> Self
    where
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        Self {
            operation: Arc::new(operation),
            title: title.into(),
            working: working.into(),
            failed: failed.into(),
        }
    }

    #[must_use]
    pub fn operation(&self) -> Operation<T> {
        Arc::clone(&self.operation)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn working(&self) -> &str {
        &self.working
    }

    #[must_use]
    pub fn failed(&self) -> &str {
        &self.failed
    }

    #[must_use]
    pub fn working_view(&self) -> DialogView {
        DialogView::new(&self.title, &self.working)
    }

    #[must_use]
    pub fn failed_view(&self) -> DialogView {
        DialogView::new(&self.title, &self.failed)
    }
}

impl<T> Clone for TaskDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
            title: self.title.clone(),
            working: self.working.clone(),
            failed: self.failed.clone(),
        }
    }
}

impl<T> std::fmt::Debug for TaskDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDescriptor")
            .field("title", &self.title)
            .field("working", &self.working)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

/// Why an operation did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("operation failed: {0}")]
    Failed(String),

    #[error("operation panicked: {0}")]
    Panicked(String),

    #[error("worker could not be started: {0}")]
    Spawn(String),

    #[error("worker ended without reporting")]
    Disconnected,
}

/// Result of one background run, delivered exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Ok(T),
    Failed(TaskError),
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Failed(_) => None,
        }
    }
}

impl<T> From<std::result::Result<T, TaskError>> for Outcome<T> {
    fn from(result: std::result::Result<T, TaskError>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::Failed(e),
        }
    }
}

/// Receiving end of one background run.
///
/// The worker sends exactly one result over a single-slot channel and then
/// fires the completion token, so a result is always readable once the token
/// has fired.
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: Receiver<std::result::Result<T, TaskError>>,
    completion: CancelToken,
    worker: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Starts `operation` on a new worker thread.
    ///
    /// Errors and panics of the operation both arrive as
    /// [`Outcome::Failed`].
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(name: &str, operation: Operation<T>) -> Result<Self> {
        let (sender, receiver) = bounded(1);
        let done = CancelSource::new();
        let completion = done.token();
        let span = info_span!("task", name);

        let worker = thread::Builder::new()
            .name(format!("task-{name}"))
            .spawn(move || {
                let _span = span.entered();
                let _done = done;
                let result = match panic::catch_unwind(AssertUnwindSafe(|| operation())) {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(TaskError::Failed(e.to_string())),
                    Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
                };
                debug!(ok = result.is_ok(), "operation returned");
                // The handle may be gone already.
                let _ = sender.send(result);
            })?;

        Ok(Self {
            receiver,
            completion,
            worker: Some(worker),
        })
    }
}

impl<T> TaskHandle<T> {
    /// A handle that has already finished with `error`.
    #[must_use]
    pub fn failed(error: TaskError) -> Self {
        let (sender, receiver) = bounded(1);
        // A fresh single-slot channel always has room.
        let _ = sender.send(Err(error));
        Self {
            receiver,
            completion: CancelToken::cancelled(),
            worker: None,
        }
    }

    /// Fires once the worker has finished.
    #[must_use]
    pub fn completion_token(&self) -> CancelToken {
        self.completion.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.completion.is_cancelled()
    }

    /// The outcome, if the worker has reported. Never blocks.
    pub fn try_outcome(&mut self) -> Option<Outcome<T>> {
        let outcome = match self.receiver.try_recv() {
            Ok(result) => Outcome::from(result),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Outcome::Failed(TaskError::Disconnected),
        };
        self.join();
        Some(outcome)
    }

    /// Blocks until the worker reports.
    pub fn wait(mut self) -> Outcome<T> {
        let outcome = match self.receiver.recv() {
            Ok(result) => Outcome::from(result),
            Err(RecvError) => Outcome::Failed(TaskError::Disconnected),
        };
        self.join();
        outcome
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                debug!("worker thread panicked after reporting");
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
