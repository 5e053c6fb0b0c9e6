//! Render surface contract and LCD geometry.
//!
//! The menu engine never composes pixels itself. It issues draw requests
//! (font, rectangle, text, selected flag) and clear/update commands to a
//! [`RenderSurface`]; what a surface does with them is its own business.
//!
//! # Modules
//!
//! - [`dialog`]: Modal dialog page (title bar and message)
//! - [`menu`]: Page layout for container menus (title bar, scrolled rows)
//! - [`recording`]: Surface that records draw commands, for tests and replays
//! - [`text`]: Character-grid surface printed to a terminal by the simulator
//! - `graphics`: Surface over an `embedded-graphics` draw target (feature `graphics`)
//!
//! # Example
//!
//! ```
//! use lcdmenu::ui::{Font, Point, Rect, RecordingSurface, RenderSurface};
//!
//! let mut surface = RecordingSurface::new(178, 128);
//! surface.clear();
//! surface.draw_text(Font::Medium, Rect::new(Point::new(0, 0), 178, 10), "Hello", false);
//! surface.update();
//! assert!(surface.contains_text("Hello"));
//! ```

pub mod dialog;
pub mod menu;
pub mod recording;
pub mod text;

#[cfg(feature = "graphics")]
pub mod graphics;

pub use dialog::DialogView;
pub use menu::MenuLayout;
pub use recording::{DrawCommand, RecordingSurface};
pub use text::TextSurface;

#[cfg(feature = "graphics")]
pub use graphics::GraphicsSurface;

use std::ops::{Add, Mul};

/// Fixed-width fonts available on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    Small,
    Medium,
    Large,
}

impl Font {
    /// Line height in pixels.
    #[must_use]
    pub const fn max_height(self) -> u32 {
        match self {
            Self::Small => 8,
            Self::Medium => 10,
            Self::Large => 15,
        }
    }

    /// Glyph advance in pixels.
    #[must_use]
    pub const fn char_width(self) -> u32 {
        match self {
            Self::Small => 5,
            Self::Medium => 6,
            Self::Large => 9,
        }
    }
}

/// Pixel position, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Mul<i32> for Point {
    type Output = Self;

    fn mul(self, factor: i32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// Pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub origin: Point,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(origin: Point, width: u32, height: u32) -> Self {
        Self { origin, width, height }
    }

    /// Full-width band of `height` pixels starting at row `y`.
    #[must_use]
    pub const fn band(y: i32, width: u32, height: u32) -> Self {
        Self::new(Point::new(0, y), width, height)
    }
}

/// Drawing backend of the display.
///
/// Draw calls only touch the back buffer; [`RenderSurface::update`] makes the
/// buffer visible.
pub trait RenderSurface {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Blanks the whole buffer.
    fn clear(&mut self);

    /// Draws `text` inside `rect`. A selected rectangle is drawn inverted.
    fn draw_text(&mut self, font: Font, rect: Rect, text: &str, selected: bool);

    /// Pushes the buffer to the display.
    fn update(&mut self);

    /// Draws one line per entry, top to bottom, in `font`.
    fn draw_lines(&mut self, font: Font, lines: &[String]) {
        let (width, _) = self.size();
        let offset = Point::new(0, i32::try_from(font.max_height()).unwrap_or(i32::MAX));
        for (row, line) in (0_i32..).zip(lines) {
            let rect = Rect::new(offset * row, width, font.max_height());
            self.draw_text(font, rect, line, false);
        }
    }
}
