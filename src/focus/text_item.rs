//! Static leaf showing fixed lines of text.

use super::{ItemCx, MenuItem};
use crate::ui::{Font, Rect, RenderSurface};

/// Menu entry whose content never changes.
///
/// Enter opens it, Enter or Escape closes it again.
#[derive(Debug, Clone)]
pub struct TextItem {
    title: String,
    lines: Vec<String>,
    font: Font,
}

impl TextItem {
    pub fn new<I, S>(title: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            lines: lines.into_iter().map(Into::into).collect(),
            font: Font::Small,
        }
    }

    #[must_use]
    pub const fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl MenuItem for TextItem {
    fn on_enter(&mut self, cx: &mut ItemCx<'_>) {
        if cx.has_focus() {
            cx.release_focus();
        } else {
            cx.request_focus();
        }
    }

    fn on_escape(&mut self, cx: &mut ItemCx<'_>) {
        if cx.has_focus() {
            cx.release_focus();
        }
    }

    fn draw_title(&self, surface: &mut dyn RenderSurface, font: Font, rect: Rect, selected: bool) {
        surface.draw_text(font, rect, &self.title, selected);
    }

    fn draw_content(&self, surface: &mut dyn RenderSurface) {
        surface.clear();
        surface.draw_lines(self.font, &self.lines);
        surface.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::{NodeId, Request};
    use crate::ui::RecordingSurface;

    #[test]
    fn enter_toggles_focus() {
        let mut item = TextItem::new("About", ["v1"]);
        let mut surface = RecordingSurface::new(64, 32);

        let mut cx = ItemCx::new(NodeId::new(1), false, &mut surface);
        item.on_enter(&mut cx);
        assert_eq!(cx.into_requests(), vec![Request::SetFocus(NodeId::new(1))]);

        let mut cx = ItemCx::new(NodeId::new(1), true, &mut surface);
        item.on_enter(&mut cx);
        assert_eq!(cx.into_requests(), vec![Request::RemoveFocus(NodeId::new(1))]);
    }

    #[test]
    fn content_is_the_fixed_lines() {
        let item = TextItem::new("About", ["first", "second"]);
        let mut surface = RecordingSurface::new(64, 32);
        item.draw_content(&mut surface);
        assert_eq!(surface.texts(), vec!["first", "second"]);
    }
}
