//! Page layout for container menus.
//!
//! A menu page is a title bar followed by as many item rows as fit on the
//! display. When a container has more children than rows, the page shows a
//! window of rows that keeps the selection cursor visible, scrolling only
//! when the cursor leaves the window.

use super::{Font, Point, Rect};
use std::ops::Range;

/// Geometry of one menu page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuLayout {
    width: u32,
    height: u32,
    title_font: Font,
    item_font: Font,
}

impl MenuLayout {
    #[must_use]
    pub const fn new(width: u32, height: u32, title_font: Font, item_font: Font) -> Self {
        Self {
            width,
            height,
            title_font,
            item_font,
        }
    }

    #[must_use]
    pub const fn title_font(&self) -> Font {
        self.title_font
    }

    #[must_use]
    pub const fn item_font(&self) -> Font {
        self.item_font
    }

    /// Rectangle of the title bar.
    #[must_use]
    pub const fn title_rect(&self) -> Rect {
        Rect::band(0, self.width, self.title_font.max_height() + 2)
    }

    fn row_height(&self) -> u32 {
        self.item_font.max_height() + 2
    }

    /// Number of item rows below the title bar. At least one.
    #[must_use]
    pub fn visible_rows(&self) -> usize {
        let free = self.height.saturating_sub(self.title_rect().height);
        ((free / self.row_height()).max(1)) as usize
    }

    /// Rectangle of the `slot`-th visible row.
    #[must_use]
    pub fn row_rect(&self, slot: usize) -> Rect {
        let rows_above = u32::try_from(slot).unwrap_or(u32::MAX);
        let top = self.title_rect().height + self.row_height() * rows_above;
        Rect::new(
            Point::new(0, i32::try_from(top).unwrap_or(i32::MAX)),
            self.width,
            self.row_height(),
        )
    }

    /// Child indexes shown on the page.
    ///
    /// `first` is the first index shown on the previous page; the window
    /// only moves when `selected` falls outside it.
    ///
    /// # Example
    ///
    /// ```
    /// use lcdmenu::ui::{Font, MenuLayout};
    ///
    /// let layout = MenuLayout::new(178, 40, Font::Medium, Font::Medium);
    /// assert_eq!(layout.visible_rows(), 2);
    /// assert_eq!(layout.window(0, 3, 5), 2..4);
    /// assert_eq!(layout.window(2, 2, 5), 2..4);
    /// ```
    #[must_use]
    pub fn window(&self, first: usize, selected: usize, count: usize) -> Range<usize> {
        let rows = self.visible_rows();
        if count <= rows {
            return 0..count;
        }
        let selected = selected.min(count - 1);
        let start = if selected < first {
            selected
        } else if selected >= first + rows {
            selected + 1 - rows
        } else {
            first
        };
        let start = start.min(count - rows);
        start..start + rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> MenuLayout {
        // Title 12px, rows 12px: four rows on a 64px panel.
        MenuLayout::new(128, 64, Font::Medium, Font::Medium)
    }

    #[test]
    fn rows_fit_below_the_title() {
        assert_eq!(layout().visible_rows(), 4);
        assert_eq!(layout().row_rect(0), Rect::band(12, 128, 12));
        assert_eq!(layout().row_rect(3), Rect::band(48, 128, 12));
    }

    #[test]
    fn short_menus_are_not_windowed() {
        assert_eq!(layout().window(0, 2, 3), 0..3);
    }

    #[test]
    fn window_scrolls_down_only_past_the_last_row() {
        let l = layout();
        assert_eq!(l.window(0, 3, 10), 0..4);
        assert_eq!(l.window(0, 4, 10), 1..5);
        assert_eq!(l.window(1, 2, 10), 1..5);
    }

    #[test]
    fn window_scrolls_up_to_the_selection() {
        assert_eq!(layout().window(5, 2, 10), 2..6);
    }

    #[test]
    fn wrap_to_top_resets_the_window() {
        assert_eq!(layout().window(6, 0, 10), 0..4);
    }

    #[test]
    fn tiny_panels_still_show_one_row() {
        let l = MenuLayout::new(64, 8, Font::Large, Font::Large);
        assert_eq!(l.visible_rows(), 1);
        assert_eq!(l.window(0, 1, 3), 1..2);
    }
}
