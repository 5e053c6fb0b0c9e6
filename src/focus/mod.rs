//! Focus protocol: a tree of menu nodes where exactly one path from the root
//! holds keyboard focus.
//!
//! The tree itself lives in the [`Navigator`] arena. Leaf behavior is
//! supplied by [`MenuItem`] implementations, which never touch the tree
//! directly: every handler receives an [`ItemCx`] and pushes [`Request`]s
//! onto it. Once the handler returns, the navigator applies the requests in
//! order through the issuer's parent.
//!
//! A request travels to the parent of the node that issued it. Containers
//! apply focus requests themselves; leaves and dialogs forward them
//! unchanged to their own parent. Suspending and resuming button events
//! always ends at the root.
//!
//! # Modules
//!
//! - [`tree`]: The [`Navigator`] arena, key routing and rendering
//! - [`text_item`]: Static leaf showing fixed lines of text
//!
//! # Example
//!
//! ```
//! use lcdmenu::focus::{Navigator, TextItem};
//! use lcdmenu::input::Key;
//! use lcdmenu::ui::RecordingSurface;
//!
//! let mut nav = Navigator::new("Main");
//! let about = nav.add_item(nav.root(), TextItem::new("About", ["lcdmenu"]));
//!
//! let mut surface = RecordingSurface::new(178, 128);
//! nav.dispatch(Key::Enter, &mut surface);
//! assert!(nav.has_focus(about));
//! ```

pub mod text_item;
pub mod tree;

pub use text_item::TextItem;
pub use tree::{FocusChange, Navigator};

use crate::input::{CancelToken, LedColor, LedEffect, LedPattern};
use crate::ui::{DialogView, Font, Rect, RenderSurface};

/// Index of a node in the [`Navigator`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Tree mutation asked for by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Grant focus to the node, through the issuer's parent.
    SetFocus(NodeId),
    /// Revoke focus from the node, through the issuer's parent.
    RemoveFocus(NodeId),
    SuspendButtonEvents,
    ResumeButtonEvents,
    /// Show the issuer's dialog surface and give it focus.
    OpenDialog(DialogView),
    /// Revoke focus from the issuer's dialog surface.
    CloseDialog,
    /// Keep the current screen until the next key press.
    HoldDisplay,
    Led(LedPattern),
}

/// Context handed to every [`MenuItem`] handler.
pub struct ItemCx<'a> {
    id: NodeId,
    has_focus: bool,
    surface: &'a mut dyn RenderSurface,
    dialog_font: Font,
    requests: Vec<Request>,
}

impl<'a> ItemCx<'a> {
    pub(crate) fn new(id: NodeId, has_focus: bool, surface: &'a mut dyn RenderSurface) -> Self {
        Self {
            id,
            has_focus,
            surface,
            dialog_font: Font::Medium,
            requests: Vec::new(),
        }
    }

    pub(crate) fn with_dialog_font(mut self, font: Font) -> Self {
        self.dialog_font = font;
        self
    }

    /// Node of the item being called.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Whether the item holds focus right now.
    #[must_use]
    pub const fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn surface(&mut self) -> &mut dyn RenderSurface {
        &mut *self.surface
    }

    /// Font the navigator draws dialog pages with.
    #[must_use]
    pub const fn dialog_font(&self) -> Font {
        self.dialog_font
    }

    /// Draws `view` right away, in the same font the navigator uses when it
    /// redraws the dialog.
    pub fn draw_dialog(&mut self, view: &DialogView) {
        view.draw(&mut *self.surface, self.dialog_font);
    }

    pub fn push(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// Asks the parent to grant focus to this item.
    pub fn request_focus(&mut self) {
        self.push(Request::SetFocus(self.id));
    }

    /// Hands focus back to the parent.
    pub fn release_focus(&mut self) {
        self.push(Request::RemoveFocus(self.id));
    }

    pub fn suspend_button_events(&mut self) {
        self.push(Request::SuspendButtonEvents);
    }

    pub fn resume_button_events(&mut self) {
        self.push(Request::ResumeButtonEvents);
    }

    pub fn open_dialog(&mut self, view: DialogView) {
        self.push(Request::OpenDialog(view));
    }

    pub fn close_dialog(&mut self) {
        self.push(Request::CloseDialog);
    }

    pub fn hold_display(&mut self) {
        self.push(Request::HoldDisplay);
    }

    pub fn set_led(&mut self, color: LedColor, effect: LedEffect) {
        self.push(Request::Led(LedPattern::new(color, effect)));
    }

    #[must_use]
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub(crate) fn into_requests(self) -> Vec<Request> {
        self.requests
    }
}

impl std::fmt::Debug for ItemCx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemCx")
            .field("id", &self.id)
            .field("has_focus", &self.has_focus)
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}

/// Behavior of a leaf in the menu tree.
///
/// Key handlers are called in two situations: on a focused item, for every
/// key, and on an unfocused item, for Enter while its container has it
/// selected. [`ItemCx::has_focus`] tells the two apart.
pub trait MenuItem {
    fn on_up(&mut self, _cx: &mut ItemCx<'_>) {}

    fn on_down(&mut self, _cx: &mut ItemCx<'_>) {}

    fn on_left(&mut self, _cx: &mut ItemCx<'_>) {}

    fn on_right(&mut self, _cx: &mut ItemCx<'_>) {}

    fn on_enter(&mut self, cx: &mut ItemCx<'_>);

    fn on_escape(&mut self, cx: &mut ItemCx<'_>);

    /// Draws the row shown in the parent's menu.
    fn draw_title(&self, surface: &mut dyn RenderSurface, font: Font, rect: Rect, selected: bool);

    /// Draws the full-screen content shown while the item holds focus.
    fn draw_content(&self, surface: &mut dyn RenderSurface);

    /// Focus was revoked by the parent; the content is no longer on screen.
    fn on_hide_content(&mut self) {}

    /// Collects finished background work. Returns true when something
    /// completed.
    fn poll(&mut self, _cx: &mut ItemCx<'_>) -> bool {
        false
    }

    /// Token that fires when the item's running background work ends.
    fn completion_token(&self) -> Option<CancelToken> {
        None
    }
}
