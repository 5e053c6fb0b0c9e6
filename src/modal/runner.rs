//! Progress dialog state machine.
//!
//! ```text
//! Idle --run--> Running --worker reports--> Completed --on_exit--> Idle
//! ```
//!
//! While running, the owning item's dialog surface holds focus and the root
//! drops every key, so the only way out of `Running` is the worker reporting.
//! Pressing Escape does not cancel the operation.

use super::task::{Outcome, TaskDescriptor, TaskError, TaskHandle};
use crate::focus::ItemCx;
use crate::input::{CancelToken, LedColor, LedEffect};
use tracing::{info, warn};

/// Where a [`ProgressDialog`] is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Idle,
    Running,
    Completed,
}

/// Modal runner for one background operation, owned by the item that shows
/// it.
#[derive(Debug)]
pub struct ProgressDialog<T> {
    task: TaskDescriptor<T>,
    state: DialogState,
    handle: Option<TaskHandle<T>>,
}

impl<T: Send + 'static> ProgressDialog<T> {
    #[must_use]
    pub const fn new(task: TaskDescriptor<T>) -> Self {
        Self {
            task,
            state: DialogState::Idle,
            handle: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> DialogState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == DialogState::Running
    }

    #[must_use]
    pub const fn task(&self) -> &TaskDescriptor<T> {
        &self.task
    }

    /// Opens the dialog and starts the operation.
    ///
    /// The dialog surface takes focus through the owner's parent, the
    /// working message is drawn at once, button events are suspended and
    /// the LED pulses orange until the outcome is collected by
    /// [`ProgressDialog::poll`].
    ///
    /// # Panics
    ///
    /// Panics if the dialog is already running.
    pub fn run(&mut self, cx: &mut ItemCx<'_>) {
        assert!(
            !self.is_running(),
            "progress dialog {:?} started while running",
            self.task.title()
        );

        let working = self.task.working_view();
        cx.open_dialog(working.clone());
        cx.draw_dialog(&working);
        cx.suspend_button_events();
        cx.set_led(LedColor::Orange, LedEffect::Pulse);

        let spawned = TaskHandle::spawn(self.task.title(), self.task.operation());
        let handle = spawned.unwrap_or_else(|e| {
            warn!(error = %e, "failed to start background operation");
            TaskHandle::failed(TaskError::Spawn(e.to_string()))
        });
        info!(title = self.task.title(), "background operation started");
        self.handle = Some(handle);
        self.state = DialogState::Running;
    }

    /// Collects the outcome if the worker has reported. Returns true when
    /// it did.
    ///
    /// On an outcome, button events are resumed and the LED shows the
    /// result. A failure also draws the failed message and holds it on
    /// screen until the next key. Then `on_exit` runs, and finally the
    /// dialog gives up focus. An `Ok` callback that re-grants focus to the
    /// item leaves the item focused; otherwise focus falls back to the
    /// item's parent.
    pub fn poll<F>(&mut self, cx: &mut ItemCx<'_>, on_exit: F) -> bool
    where
        F: FnOnce(Outcome<T>, &mut ItemCx<'_>),
    {
        let Some(outcome) = self.handle.as_mut().and_then(TaskHandle::try_outcome) else {
            return false;
        };
        self.handle = None;
        self.state = DialogState::Completed;

        cx.resume_button_events();
        match &outcome {
            Outcome::Ok(_) => {
                info!(title = self.task.title(), "background operation finished");
                cx.set_led(LedColor::Green, LedEffect::Normal);
            }
            Outcome::Failed(e) => {
                warn!(title = self.task.title(), error = %e, "background operation failed");
                cx.draw_dialog(&self.task.failed_view());
                cx.hold_display();
                cx.set_led(LedColor::Red, LedEffect::Flash);
            }
        }

        on_exit(outcome, cx);
        cx.close_dialog();
        self.state = DialogState::Idle;
        true
    }

    /// Fires when the running operation ends.
    #[must_use]
    pub fn completion_token(&self) -> Option<CancelToken> {
        self.handle.as_ref().map(TaskHandle::completion_token)
    }
}
