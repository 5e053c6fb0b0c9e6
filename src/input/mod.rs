//! Physical key input and LED feedback.
//!
//! The device has six keys and a status LED. This module defines the
//! [`Buttons`] contract every input backend implements, the pressed-key
//! bitset [`ButtonState`], and the LED side channel.
//!
//! The blocking waits are the only suspension points tied to physical input.
//! Everything above them (menus, dialogs) composes these waits with a
//! [`CancelToken`] instead of polling in a tight loop.
//!
//! # Modules
//!
//! - [`cancel`]: One-shot cancellation signal for blocking waits
//! - [`virtual_buttons`]: Channel-fed backend used by the simulator and tests
//!
//! # Example
//!
//! ```
//! use lcdmenu::input::{virtual_buttons, Buttons, ButtonState, Key};
//!
//! let (driver, buttons) = virtual_buttons::channel();
//! driver.press(Key::Enter);
//! assert_eq!(buttons.wait_for_keypress(None), ButtonState::ENTER);
//! ```

pub mod cancel;
pub mod virtual_buttons;

pub use cancel::{CancelSource, CancelToken};
pub use virtual_buttons::{ButtonDriver, ChannelButtons};

use bitflags::bitflags;

bitflags! {
    /// Set of keys currently held down.
    ///
    /// The empty set doubles as the result of a cancelled wait.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ButtonState: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const ENTER = 1 << 4;
        const ESCAPE = 1 << 5;
    }
}

/// One physical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
}

impl Key {
    /// All keys, in dispatch order.
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Enter,
        Self::Escape,
    ];

    /// The bit this key occupies in a [`ButtonState`].
    #[must_use]
    pub const fn flag(self) -> ButtonState {
        match self {
            Self::Up => ButtonState::UP,
            Self::Down => ButtonState::DOWN,
            Self::Left => ButtonState::LEFT,
            Self::Right => ButtonState::RIGHT,
            Self::Enter => ButtonState::ENTER,
            Self::Escape => ButtonState::ESCAPE,
        }
    }
}

impl ButtonState {
    /// Pressed keys in dispatch order.
    pub fn keys(self) -> impl Iterator<Item = Key> {
        Key::ALL.into_iter().filter(move |key| self.contains(key.flag()))
    }
}

/// Whether a key went down or came back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// A single key transition as reported by an input driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    #[must_use]
    pub const fn press(key: Key) -> Self {
        Self { key, kind: KeyEventKind::Press }
    }

    #[must_use]
    pub const fn release(key: Key) -> Self {
        Self { key, kind: KeyEventKind::Release }
    }
}

/// Status LED color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColor {
    Off,
    Green,
    Red,
    Orange,
}

/// Status LED effect.
///
/// Discriminants are the codes the LED driver expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LedEffect {
    Normal = 0,
    Flash = 3,
    Pulse = 6,
}

/// A color and effect pair sent to the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedPattern {
    pub color: LedColor,
    pub effect: LedEffect,
}

impl LedPattern {
    #[must_use]
    pub const fn new(color: LedColor, effect: LedEffect) -> Self {
        Self { color, effect }
    }
}

/// Contract of a key/LED input backend.
///
/// Waits take an optional cancellation token; without one they block until
/// the awaited key transition happens.
pub trait Buttons {
    /// Snapshot of the keys currently down. Never blocks, never fails.
    fn poll_state(&self) -> ButtonState;

    /// Blocks until every key is released or `cancel` fires.
    fn wait_for_release(&self, cancel: Option<&CancelToken>);

    /// Blocks until a key is pressed or `cancel` fires.
    ///
    /// Returns the keys down after the press, or an empty state when the
    /// wait was cancelled. An already-cancelled token returns immediately
    /// without looking at the keys at all.
    fn wait_for_keypress(&self, cancel: Option<&CancelToken>) -> ButtonState;

    /// Fire-and-forget LED update.
    fn set_led(&self, color: LedColor, effect: LedEffect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_iterate_in_dispatch_order() {
        let state = ButtonState::ESCAPE | ButtonState::UP | ButtonState::ENTER;
        let keys: Vec<Key> = state.keys().collect();
        assert_eq!(keys, vec![Key::Up, Key::Enter, Key::Escape]);
    }

    #[test]
    fn empty_state_has_no_keys() {
        assert_eq!(ButtonState::empty().keys().count(), 0);
    }

    #[test]
    fn led_effect_codes_match_driver() {
        assert_eq!(LedEffect::Normal as u8, 0);
        assert_eq!(LedEffect::Flash as u8, 3);
        assert_eq!(LedEffect::Pulse as u8, 6);
    }

    #[test]
    fn every_key_has_a_distinct_flag() {
        let all = Key::ALL
            .iter()
            .fold(ButtonState::empty(), |acc, key| acc | key.flag());
        assert_eq!(all, ButtonState::all());
    }
}
