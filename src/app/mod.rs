//! Application layer: the event loop tying input, menu tree and display
//! together.
//!
//! One thread owns the [`App`]. It is the only thread that dispatches keys,
//! applies focus changes and draws; background operations hand their
//! results over through the items' task handles and are collected here.
//!
//! # Architecture
//!
//! ```text
//! Buttons::wait_for_keypress ─→ Navigator::dispatch (per key) ─→ Buttons::wait_for_release
//!          ↑ (completion token)                                           │
//!          │                                                              ↓
//!   worker finishes ←── task running       Navigator::pump → LEDs → Navigator::render
//! ```
//!
//! While a background operation runs, the key wait is given the task's
//! completion token, so the loop wakes up as soon as the worker finishes
//! even when nobody touches a key.
//!
//! # Modules
//!
//! - [`keymap`]: Terminal characters to keys, for the simulator
//!
//! # Example
//!
//! ```rust
//! use lcdmenu::app::App;
//! use lcdmenu::focus::{Navigator, TextItem};
//! use lcdmenu::input::{virtual_buttons, Key};
//! use lcdmenu::ui::RecordingSurface;
//!
//! let mut nav = Navigator::new("Main");
//! let about = nav.add_item(nav.root(), TextItem::new("About", ["lcdmenu"]));
//!
//! let (driver, buttons) = virtual_buttons::channel();
//! let mut app = App::new(nav, buttons, RecordingSurface::new(178, 128));
//! app.start();
//!
//! driver.tap(Key::Enter);
//! app.step();
//! assert!(app.navigator().has_focus(about));
//! assert!(app.surface().contains_text("lcdmenu"));
//! ```

pub mod keymap;

pub use keymap::{command_for, Command};

use crate::focus::Navigator;
use crate::input::{ButtonState, Buttons, CancelToken};
use crate::ui::RenderSurface;
use tracing::{debug, debug_span, info};

/// What one pass of the event loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Keys pressed; empty when the wait was woken by something else.
    pub pressed: ButtonState,
    /// Background operations whose outcome was collected.
    pub completed: usize,
    pub rendered: bool,
}

impl Step {
    /// Nothing was pressed and nothing finished.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pressed.is_empty() && self.completed == 0
    }
}

/// The menu event loop.
#[derive(Debug)]
pub struct App<B, S> {
    navigator: Navigator,
    buttons: B,
    surface: S,
}

impl<B: Buttons, S: RenderSurface> App<B, S> {
    pub const fn new(navigator: Navigator, buttons: B, surface: S) -> Self {
        Self {
            navigator,
            buttons,
            surface,
        }
    }

    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub const fn buttons(&self) -> &B {
        &self.buttons
    }

    /// Draws the first page.
    pub fn start(&mut self) {
        self.navigator.mark_dirty();
        self.navigator.render(&mut self.surface);
    }

    /// Waits for one key press, or for a running background operation to
    /// finish, and processes it.
    pub fn step(&mut self) -> Step {
        self.step_with(None)
    }

    fn step_with(&mut self, shutdown: Option<&CancelToken>) -> Step {
        let completion = self.navigator.completion_token();
        let pressed = self.buttons.wait_for_keypress(completion.as_ref().or(shutdown));
        let _span = debug_span!("step", ?pressed).entered();

        for key in pressed.keys() {
            self.navigator.dispatch(key, &mut self.surface);
        }
        if !pressed.is_empty() {
            // A key may just have started a task.
            let completion = self.navigator.completion_token();
            self.buttons.wait_for_release(completion.as_ref().or(shutdown));
        }

        let (completed, rendered) = self.refresh();
        Step {
            pressed,
            completed,
            rendered,
        }
    }

    /// Blocks until no background operation is running, collecting each
    /// outcome as it arrives. Keys are left alone.
    pub fn settle(&mut self) -> usize {
        let mut completed = 0;
        while let Some(token) = self.navigator.completion_token() {
            token.wait();
            completed += self.refresh().0;
        }
        completed
    }

    /// Runs the loop until `shutdown` fires or the input source goes away.
    ///
    /// `shutdown` is only observed while no background operation runs;
    /// a running operation always gets to finish first. When the input
    /// source closes, running operations are settled before returning.
    pub fn run(&mut self, shutdown: &CancelToken) {
        info!("menu loop started");
        self.start();
        while !shutdown.is_cancelled() {
            let step = self.step_with(Some(shutdown));
            if step.is_idle() && !shutdown.is_cancelled() {
                debug!("input source closed");
                self.settle();
                break;
            }
        }
        info!("menu loop stopped");
    }

    /// Collects finished operations, forwards LED requests and redraws.
    fn refresh(&mut self) -> (usize, bool) {
        let completed = self.navigator.pump(&mut self.surface);
        for pattern in self.navigator.take_led_requests() {
            self.buttons.set_led(pattern.color, pattern.effect);
        }
        let rendered = self.navigator.render(&mut self.surface);
        (completed, rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::TextItem;
    use crate::input::{virtual_buttons, CancelSource, Key, LedColor, LedEffect, LedPattern};
    use crate::ui::RecordingSurface;

    type TestApp = App<virtual_buttons::ChannelButtons, RecordingSurface>;

    fn app() -> (virtual_buttons::ButtonDriver, TestApp) {
        let mut nav = Navigator::new("Main");
        nav.add_item(nav.root(), TextItem::new("First", ["one"]));
        nav.add_item(nav.root(), TextItem::new("Second", ["two"]));
        let (driver, buttons) = virtual_buttons::channel();
        (driver, App::new(nav, buttons, RecordingSurface::new(178, 128)))
    }

    #[test]
    fn start_draws_the_root_menu() {
        let (_driver, mut app) = app();
        app.start();
        assert_eq!(app.surface().texts(), vec!["Main", "First", "Second"]);
    }

    #[test]
    fn a_step_dispatches_the_pressed_key_and_redraws() {
        let (driver, mut app) = app();
        app.start();

        driver.tap(Key::Down);
        let step = app.step();

        assert_eq!(step.pressed, ButtonState::DOWN);
        assert!(step.rendered);
        assert_eq!(app.navigator().selected(app.navigator().root()), 1);
        assert!(app.buttons().poll_state().is_empty());
    }

    #[test]
    fn run_stops_when_the_driver_goes_away() {
        let (driver, mut app) = app();
        driver.tap(Key::Down);
        drop(driver);

        let shutdown = CancelSource::new();
        app.run(&shutdown.token());
        assert_eq!(app.navigator().selected(app.navigator().root()), 1);
    }

    #[test]
    fn run_returns_at_once_after_shutdown() {
        let (_driver, mut app) = app();
        app.run(&CancelToken::cancelled());
        assert_eq!(app.surface().texts(), vec!["Main", "First", "Second"]);
    }

    #[test]
    fn led_requests_reach_the_buttons() {
        struct Blink;

        impl crate::focus::MenuItem for Blink {
            fn on_enter(&mut self, cx: &mut crate::focus::ItemCx<'_>) {
                cx.set_led(LedColor::Green, LedEffect::Flash);
            }

            fn on_escape(&mut self, _cx: &mut crate::focus::ItemCx<'_>) {}

            fn draw_title(
                &self,
                surface: &mut dyn RenderSurface,
                font: crate::ui::Font,
                rect: crate::ui::Rect,
                selected: bool,
            ) {
                surface.draw_text(font, rect, "Blink", selected);
            }

            fn draw_content(&self, _surface: &mut dyn RenderSurface) {}
        }

        let mut nav = Navigator::new("Main");
        nav.add_item(nav.root(), Blink);
        let (leds, patterns) = crossbeam_channel::bounded(4);
        let (driver, buttons) = virtual_buttons::channel();
        let mut app = App::new(nav, buttons.with_led_sink(leds), RecordingSurface::new(64, 64));

        driver.tap(Key::Enter);
        app.step();

        assert_eq!(
            patterns.try_recv(),
            Ok(LedPattern::new(LedColor::Green, LedEffect::Flash))
        );
    }
}
