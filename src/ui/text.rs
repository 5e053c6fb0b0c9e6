//! Character-grid surface for running menus in a terminal.
//!
//! Pixels are mapped onto a grid of 6x10 cells, so the simulated LCD has the
//! same number of rows and columns the medium font gets on the real panel.
//! Selected text is printed in reverse video. Each [`RenderSurface::update`]
//! writes one framed snapshot of the grid to the output.

use super::{Font, Rect, RenderSurface};
use std::io::Write;

const CELL_WIDTH: u32 = Font::Medium.char_width();
const CELL_HEIGHT: u32 = Font::Medium.max_height();

const REVERSE: &str = "\u{001b}[7m";
const RESET: &str = "\u{001b}[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    glyph: char,
    inverted: bool,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    inverted: false,
};

/// Terminal rendition of the LCD.
pub struct TextSurface {
    width: u32,
    height: u32,
    columns: usize,
    cells: Vec<Vec<Cell>>,
    out: Box<dyn Write + Send>,
}

impl TextSurface {
    /// A `width` x `height` pixel display printed to `out`.
    #[must_use]
    pub fn new(width: u32, height: u32, out: Box<dyn Write + Send>) -> Self {
        let columns = (width / CELL_WIDTH).max(1) as usize;
        let rows = (height / CELL_HEIGHT).max(1) as usize;
        Self {
            width,
            height,
            columns,
            cells: vec![vec![BLANK; columns]; rows],
            out,
        }
    }

    /// Display printed to stdout.
    #[must_use]
    pub fn stdout(width: u32, height: u32) -> Self {
        Self::new(width, height, Box::new(std::io::stdout()))
    }

    /// Rows of the grid as plain text, without styling.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.glyph).collect::<String>().trim_end().to_string())
            .collect()
    }

    fn frame(&self) -> String {
        let border = format!("+{}+", "-".repeat(self.columns));
        let mut frame = String::with_capacity((self.columns + 8) * (self.cells.len() + 2));
        frame.push_str(&border);
        frame.push('\n');
        for row in &self.cells {
            frame.push('|');
            let mut inverted = false;
            for cell in row {
                if cell.inverted != inverted {
                    frame.push_str(if cell.inverted { REVERSE } else { RESET });
                    inverted = cell.inverted;
                }
                frame.push(cell.glyph);
            }
            if inverted {
                frame.push_str(RESET);
            }
            frame.push_str("|\n");
        }
        frame.push_str(&border);
        frame.push('\n');
        frame
    }
}

impl std::fmt::Debug for TextSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl RenderSurface for TextSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(BLANK);
        }
    }

    fn draw_text(&mut self, _font: Font, rect: Rect, text: &str, selected: bool) {
        let Ok(y) = u32::try_from(rect.origin.y) else {
            return;
        };
        let x = u32::try_from(rect.origin.x).unwrap_or(0);
        let row_index = (y / CELL_HEIGHT) as usize;
        let Some(row) = self.cells.get_mut(row_index) else {
            return;
        };

        let start = ((x / CELL_WIDTH) as usize).min(row.len());
        let span = ((rect.width / CELL_WIDTH) as usize).max(1);
        let end = (start + span).min(row.len());

        let mut glyphs = text.chars();
        for cell in &mut row[start..end] {
            *cell = Cell {
                glyph: glyphs.next().unwrap_or(' '),
                inverted: selected,
            };
        }
    }

    fn update(&mut self) {
        let frame = self.frame();
        if let Err(e) = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|()| self.out.flush())
        {
            tracing::debug!(error = %e, "failed to write display frame");
        }
    }
}
