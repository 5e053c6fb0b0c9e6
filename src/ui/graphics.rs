//! Surface over an `embedded-graphics` draw target.
//!
//! Works with any monochrome panel driver that implements `DrawTarget`
//! (SSD1306, ST7565, SH1106...). Flushing the driver's frame buffer stays with
//! the caller, so [`RenderSurface::update`] is a no-op here.

use super::{Font, Rect, RenderSurface};
use embedded_graphics::geometry::{Point as GfxPoint, Size};
use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

fn mono_font(font: Font) -> &'static MonoFont<'static> {
    match font {
        Font::Small => &FONT_5X8,
        Font::Medium => &FONT_6X10,
        Font::Large => &FONT_9X15,
    }
}

/// [`RenderSurface`] drawing into an `embedded-graphics` target.
#[derive(Debug)]
pub struct GraphicsSurface<D> {
    target: D,
}

impl<D> GraphicsSurface<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    pub const fn new(target: D) -> Self {
        Self { target }
    }

    /// The wrapped target, for flushing.
    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D> RenderSurface for GraphicsSurface<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    fn size(&self) -> (u32, u32) {
        let size = self.target.bounding_box().size;
        (size.width, size.height)
    }

    fn clear(&mut self) {
        let _ = self.target.clear(BinaryColor::Off);
    }

    fn draw_text(&mut self, font: Font, rect: Rect, text: &str, selected: bool) {
        let (background, foreground) = if selected {
            (BinaryColor::On, BinaryColor::Off)
        } else {
            (BinaryColor::Off, BinaryColor::On)
        };

        let origin = GfxPoint::new(rect.origin.x, rect.origin.y);
        let _ = Rectangle::new(origin, Size::new(rect.width, rect.height))
            .into_styled(PrimitiveStyle::with_fill(background))
            .draw(&mut self.target);

        let style = MonoTextStyle::new(mono_font(font), foreground);
        let _ = Text::with_baseline(text, origin + GfxPoint::new(1, 1), style, Baseline::Top)
            .draw(&mut self.target);
    }

    fn update(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Point;
    use embedded_graphics::mock_display::MockDisplay;

    fn display() -> MockDisplay<BinaryColor> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        display
    }

    #[test]
    fn selected_rows_are_filled() {
        let mut surface = GraphicsSurface::new(display());
        surface.draw_text(Font::Small, Rect::new(Point::new(0, 0), 20, 10), "", true);
        let display = surface.into_inner();
        assert_eq!(display.get_pixel(GfxPoint::new(5, 5)), Some(BinaryColor::On));
    }

    #[test]
    fn size_comes_from_the_target() {
        let surface = GraphicsSurface::new(display());
        assert_eq!(surface.size(), (64, 64));
    }
}
