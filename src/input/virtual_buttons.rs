//! Channel-fed [`Buttons`] backend.
//!
//! [`ChannelButtons`] receives [`KeyEvent`]s from a [`ButtonDriver`]: a GPIO
//! edge task on hardware, the stdin reader of the simulator, or a test. The
//! pressed set lives in an atomic so [`Buttons::poll_state`] never blocks.
//!
//! LED patterns are forwarded to an optional sink with `try_send`; a full or
//! missing sink drops the pattern silently.

use super::{
    Buttons, ButtonState, CancelToken, Key, KeyEvent, KeyEventKind, LedColor, LedEffect, LedPattern,
};
use crossbeam_channel::{never, select, unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicU8, Ordering};

/// Creates a connected driver and button backend.
#[must_use]
pub fn channel() -> (ButtonDriver, ChannelButtons) {
    let (sender, receiver) = unbounded();
    (
        ButtonDriver { events: sender },
        ChannelButtons {
            events: receiver,
            state: AtomicU8::new(0),
            leds: None,
        },
    )
}

/// Producing side: reports key transitions.
#[derive(Debug, Clone)]
pub struct ButtonDriver {
    events: Sender<KeyEvent>,
}

impl ButtonDriver {
    /// Reports a key transition. Returns `false` if the backend is gone.
    pub fn send(&self, event: KeyEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn press(&self, key: Key) -> bool {
        self.send(KeyEvent::press(key))
    }

    pub fn release(&self, key: Key) -> bool {
        self.send(KeyEvent::release(key))
    }

    /// Press immediately followed by release.
    pub fn tap(&self, key: Key) -> bool {
        self.press(key) && self.release(key)
    }
}

/// Consuming side: implements [`Buttons`] over the driver's events.
#[derive(Debug)]
pub struct ChannelButtons {
    events: Receiver<KeyEvent>,
    state: AtomicU8,
    leds: Option<Sender<LedPattern>>,
}

impl ChannelButtons {
    /// Forwards LED patterns to `sink`.
    #[must_use]
    pub fn with_led_sink(mut self, sink: Sender<LedPattern>) -> Self {
        self.leds = Some(sink);
        self
    }

    fn state(&self) -> ButtonState {
        ButtonState::from_bits_truncate(self.state.load(Ordering::Acquire))
    }

    /// Folds one event into the pressed set. Returns `true` for a press.
    fn apply(&self, event: KeyEvent) -> bool {
        let bits = event.key.flag().bits();
        match event.kind {
            KeyEventKind::Press => {
                self.state.fetch_or(bits, Ordering::AcqRel);
                true
            }
            KeyEventKind::Release => {
                self.state.fetch_and(!bits, Ordering::AcqRel);
                false
            }
        }
    }
}

impl Buttons for ChannelButtons {
    fn poll_state(&self) -> ButtonState {
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
        }
        self.state()
    }

    fn wait_for_release(&self, cancel: Option<&CancelToken>) {
        let idle = never();
        let cancelled = cancel.map_or(&idle, CancelToken::receiver);

        while !self.state().is_empty() {
            select! {
                recv(self.events) -> event => match event {
                    Ok(event) => {
                        self.apply(event);
                    }
                    Err(_) => {
                        tracing::debug!("button driver disconnected while waiting for release");
                        return;
                    }
                },
                recv(cancelled) -> _ => return,
            }
        }
    }

    fn wait_for_keypress(&self, cancel: Option<&CancelToken>) -> ButtonState {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return ButtonState::empty();
        }

        let idle = never();
        let cancelled = cancel.map_or(&idle, CancelToken::receiver);

        loop {
            select! {
                recv(self.events) -> event => match event {
                    Ok(event) => {
                        if self.apply(event) {
                            return self.state();
                        }
                    }
                    Err(_) => {
                        tracing::debug!("button driver disconnected while waiting for keypress");
                        return ButtonState::empty();
                    }
                },
                recv(cancelled) -> _ => return ButtonState::empty(),
            }
        }
    }

    fn set_led(&self, color: LedColor, effect: LedEffect) {
        tracing::debug!(color = ?color, effect = ?effect, "led pattern");
        if let Some(sink) = &self.leds {
            let _ = sink.try_send(LedPattern::new(color, effect));
        }
    }
}
