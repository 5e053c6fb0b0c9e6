//! Surface that records every draw request.

use super::{Font, Rect, RenderSurface};

/// One request received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear,
    Text {
        font: Font,
        rect: Rect,
        text: String,
        selected: bool,
    },
    Update,
}

/// A [`RenderSurface`] that keeps a log of draw requests instead of pixels.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the log and starts a new one.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Text of every draw request, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|text| text.contains(needle))
    }

    /// Text drawn with the selected flag set.
    #[must_use]
    pub fn selected_texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, selected: true, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_text(&mut self, font: Font, rect: Rect, text: &str, selected: bool) {
        self.commands.push(DrawCommand::Text {
            font,
            rect,
            text: text.to_string(),
            selected,
        });
    }

    fn update(&mut self) {
        self.commands.push(DrawCommand::Update);
    }
}
