//! Modal dialog page: an inverted title bar over a single message line.

use super::{Font, Rect, RenderSurface};

/// What a modal dialog shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub title: String,
    pub message: String,
}

impl DialogView {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Clears the surface and draws the dialog page.
    pub fn draw(&self, surface: &mut dyn RenderSurface, font: Font) {
        let (width, height) = surface.size();
        let line = font.max_height() + 2;
        let middle = i32::try_from(height.saturating_sub(line) / 2).unwrap_or(0);

        surface.clear();
        surface.draw_text(font, Rect::band(0, width, line), &self.title, true);
        surface.draw_text(font, Rect::band(middle, width, line), &self.message, false);
        surface.update();
    }
}
