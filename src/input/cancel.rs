//! One-shot cancellation signal.
//!
//! A [`CancelSource`] holds the only sender of a zero-capacity channel that
//! never carries a message. Dropping that sender disconnects the channel, and
//! every [`CancelToken`] clone sees the disconnect at once, either through
//! [`CancelToken::is_cancelled`] or by selecting on
//! [`CancelToken::receiver`] next to other channels.
//!
//! Dropping the source cancels too, so a worker thread can hand out a token
//! that fires when the thread finishes, whatever way it finishes.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

/// Owning side of a cancellation signal.
#[derive(Debug)]
pub struct CancelSource {
    sender: Option<Sender<()>>,
    token: CancelToken,
}

impl CancelSource {
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = bounded(0);
        Self {
            sender: Some(sender),
            token: CancelToken { receiver },
        }
    }

    /// A token observing this source.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Fires the signal. Calling it again has no further effect.
    pub fn cancel(&mut self) {
        self.sender.take();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.sender.is_none()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observing side of a cancellation signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelToken {
    receiver: Receiver<()>,
}

impl CancelToken {
    /// A token that is cancelled from the start.
    #[must_use]
    pub fn cancelled() -> Self {
        let mut source = CancelSource::new();
        source.cancel();
        source.token()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Blocks until the signal fires.
    pub fn wait(&self) {
        // Nothing is ever sent, so this only returns on disconnect.
        let _ = self.receiver.recv();
    }

    /// Blocks until the signal fires or `timeout` passes.
    ///
    /// Returns `true` if the signal fired.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        matches!(
            self.receiver.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    /// Channel end for use in `crossbeam_channel::select!`.
    ///
    /// Becomes ready (with an error) once the signal fires.
    #[must_use]
    pub const fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn fresh_source_is_not_cancelled() {
        let source = CancelSource::new();
        assert!(!source.is_cancelled());
        assert!(!source.token().is_cancelled());
        assert!(!source.token().wait_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn cancel_reaches_every_clone() {
        let mut source = CancelSource::new();
        let first = source.token();
        let second = first.clone();

        source.cancel();
        source.cancel();

        assert!(first.is_cancelled());
        assert!(second.is_cancelled());
        assert!(source.is_cancelled());
    }

    #[test]
    fn dropping_the_source_cancels() {
        let source = CancelSource::new();
        let token = source.token();
        drop(source);
        assert!(token.is_cancelled());
    }

    #[test]
    fn wait_wakes_when_another_thread_finishes() {
        let source = CancelSource::new();
        let token = source.token();
        let worker = thread::spawn(move || drop(source));

        token.wait();
        assert!(token.is_cancelled());
        worker.join().unwrap();
    }

    #[test]
    fn precancelled_token() {
        assert!(CancelToken::cancelled().is_cancelled());
    }
}
