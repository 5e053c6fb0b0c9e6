//! The menu tree arena.
//!
//! Nodes are stored in a flat vector and refer to each other by [`NodeId`].
//! Every node except the root has a parent; containers keep their children
//! in display order. A node is on the focus path when its `has_focus` flag is
//! set, and each container records which of its children (or which dialog
//! surface below them) holds focus. Keys are routed to the end of that path.

use super::{ItemCx, MenuItem, NodeId, Request};
use crate::input::{CancelToken, Key, LedPattern};
use crate::ui::{DialogView, Font, MenuLayout, RenderSurface};
use std::collections::VecDeque;
use tracing::{debug, debug_span, trace};

const JOURNAL_CAPACITY: usize = 64;

/// A focus transition applied by a container, or a change of the root's
/// button event gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Granted { parent: NodeId, child: NodeId },
    Revoked { parent: NodeId, child: NodeId },
    Suspended,
    Resumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Container,
    Leaf,
    Dialog,
}

struct Container {
    title: String,
    children: Vec<NodeId>,
    selected: usize,
    first_visible: usize,
    focused_child: Option<NodeId>,
    suspended: bool,
}

struct Leaf {
    item: Box<dyn MenuItem>,
    dialog: Option<NodeId>,
}

struct Dialog {
    view: DialogView,
}

enum NodeKind {
    Container(Container),
    Leaf(Leaf),
    Dialog(Dialog),
}

struct Node {
    parent: Option<NodeId>,
    has_focus: bool,
    kind: NodeKind,
}

/// Menu tree with focus routing and rendering.
///
/// The root container always holds focus. Items change the tree only through
/// the [`Request`]s they push onto their [`ItemCx`].
pub struct Navigator {
    nodes: Vec<Node>,
    title_font: Font,
    item_font: Font,
    dirty: bool,
    hold_display: bool,
    leds: Vec<LedPattern>,
    journal: VecDeque<FocusChange>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("nodes", &self.nodes.len())
            .field("focus_path", &self.focus_path())
            .field("dirty", &self.dirty)
            .field("hold_display", &self.hold_display)
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// A tree holding only a focused root container titled `title`.
    pub fn new(title: impl Into<String>) -> Self {
        let root = Node {
            parent: None,
            has_focus: true,
            kind: NodeKind::Container(Container::new(title.into())),
        };
        Self {
            nodes: vec![root],
            title_font: Font::Medium,
            item_font: Font::Medium,
            dirty: true,
            hold_display: false,
            leds: Vec::new(),
            journal: VecDeque::with_capacity(JOURNAL_CAPACITY),
        }
    }

    /// Fonts of the menu page title bar and rows.
    #[must_use]
    pub const fn with_fonts(mut self, title_font: Font, item_font: Font) -> Self {
        self.title_font = title_font;
        self.item_font = item_font;
        self
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Appends a child container to `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a container.
    pub fn add_container(&mut self, parent: NodeId, title: impl Into<String>) -> NodeId {
        self.attach(parent, NodeKind::Container(Container::new(title.into())))
    }

    /// Appends a leaf item to `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a container.
    pub fn add_item(&mut self, parent: NodeId, item: impl MenuItem + 'static) -> NodeId {
        self.add_boxed_item(parent, Box::new(item))
    }

    pub fn add_boxed_item(&mut self, parent: NodeId, item: Box<dyn MenuItem>) -> NodeId {
        self.attach(parent, NodeKind::Leaf(Leaf { item, dialog: None }))
    }

    fn attach(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.container_mut(parent).children.push(id);
        self.nodes.push(Node {
            parent: Some(parent),
            has_focus: false,
            kind,
        });
        self.dirty = true;
        id
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[must_use]
    pub fn children(&self, container: NodeId) -> &[NodeId] {
        &self.container(container).children
    }

    /// Whether `id` is on the focus path.
    #[must_use]
    pub fn has_focus(&self, id: NodeId) -> bool {
        self.node(id).has_focus
    }

    /// Index of the selection cursor among the children of `container`.
    #[must_use]
    pub fn selected(&self, container: NodeId) -> usize {
        self.container(container).selected
    }

    /// Dialog surface owned by `item`, once it has been opened.
    #[must_use]
    pub fn dialog_of(&self, item: NodeId) -> Option<NodeId> {
        match &self.node(item).kind {
            NodeKind::Leaf(leaf) => leaf.dialog,
            _ => None,
        }
    }

    /// Nodes holding focus, from the root down.
    #[must_use]
    pub fn focus_path(&self) -> Vec<NodeId> {
        let mut path = vec![self.root()];
        let mut current = self.root();
        while let NodeKind::Container(container) = &self.node(current).kind {
            let Some(child) = container.focused_child else {
                break;
            };
            path.push(child);
            current = child;
        }
        path
    }

    /// The focused leaf or dialog, if the focus path ends in one.
    #[must_use]
    pub fn focused_leaf(&self) -> Option<NodeId> {
        let end = self.route_target();
        (self.kind_of(end) != Kind::Container).then_some(end)
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.container(self.root()).suspended
    }

    #[must_use]
    pub const fn is_holding_display(&self) -> bool {
        self.hold_display
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Applied focus transitions, oldest first. Only the most recent ones
    /// are kept.
    pub fn journal(&self) -> impl Iterator<Item = &FocusChange> + '_ {
        self.journal.iter()
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// LED patterns requested since the last call.
    pub fn take_led_requests(&mut self) -> Vec<LedPattern> {
        std::mem::take(&mut self.leds)
    }

    /// Completion signal of the first item with background work in flight.
    #[must_use]
    pub fn completion_token(&self) -> Option<CancelToken> {
        self.nodes.iter().find_map(|node| match &node.kind {
            NodeKind::Leaf(leaf) => leaf.item.completion_token(),
            _ => None,
        })
    }

    /// Grants focus to `child` through the parent capability of `parent`.
    ///
    /// A container applies the grant itself: granting to the child that
    /// already holds focus does nothing, otherwise the previous holder is
    /// revoked first. When the container is not on the focus path yet, it
    /// asks its own parent for focus too. Leaves and dialogs pass the call
    /// to their parent unchanged.
    ///
    /// # Panics
    ///
    /// Panics on unknown node ids, or when a leaf without parent is asked to
    /// forward.
    pub fn set_focus(&mut self, parent: NodeId, child: NodeId) {
        match self.kind_of(parent) {
            Kind::Container => self.grant(parent, child),
            Kind::Leaf | Kind::Dialog => {
                let up = self.parent_of(parent);
                self.set_focus(up, child);
            }
        }
    }

    /// Revokes focus from `child` through the parent capability of `parent`.
    ///
    /// A container ignores the call unless `child` is its focused child.
    pub fn remove_focus(&mut self, parent: NodeId, child: NodeId) {
        match self.kind_of(parent) {
            Kind::Container => {
                if self.container(parent).focused_child != Some(child) {
                    debug!(?parent, ?child, "remove_focus ignored, child does not hold focus");
                    return;
                }
                self.revoke(child);
                self.container_mut(parent).focused_child = None;
                self.record(FocusChange::Revoked { parent, child });
                self.dirty = true;
            }
            Kind::Leaf | Kind::Dialog => {
                let up = self.parent_of(parent);
                self.remove_focus(up, child);
            }
        }
    }

    /// Stops routing keys until [`Navigator::resume_button_events`]. The
    /// call climbs from `from` to the root. Calls do not nest.
    pub fn suspend_button_events(&mut self, from: NodeId) {
        self.set_suspended(from, true);
    }

    pub fn resume_button_events(&mut self, from: NodeId) {
        self.set_suspended(from, false);
    }

    fn set_suspended(&mut self, from: NodeId, suspended: bool) {
        match self.node(from).parent {
            Some(up) => self.set_suspended(up, suspended),
            None => {
                self.container_mut(from).suspended = suspended;
                self.record(if suspended {
                    FocusChange::Suspended
                } else {
                    FocusChange::Resumed
                });
            }
        }
    }

    /// Routes one key press to the end of the focus path.
    pub fn dispatch(&mut self, key: Key, surface: &mut dyn RenderSurface) {
        let _span = debug_span!("dispatch", ?key).entered();

        if self.hold_display {
            self.hold_display = false;
            self.dirty = true;
        }
        if self.is_suspended() {
            debug!("button events suspended, key dropped");
            return;
        }

        let target = self.route_target();
        match self.kind_of(target) {
            Kind::Container => self.navigate(target, key, surface),
            Kind::Leaf => {
                self.deliver(target, surface, |item, cx| match key {
                    Key::Up => item.on_up(cx),
                    Key::Down => item.on_down(cx),
                    Key::Left => item.on_left(cx),
                    Key::Right => item.on_right(cx),
                    Key::Enter => item.on_enter(cx),
                    Key::Escape => item.on_escape(cx),
                });
            }
            Kind::Dialog => debug!(dialog = ?target, "dialog holds focus, key dropped"),
        }
    }

    /// Lets every item collect finished background work. Returns how many
    /// items reported a completion.
    pub fn pump(&mut self, surface: &mut dyn RenderSurface) -> usize {
        let leaves: Vec<NodeId> = (0..self.nodes.len())
            .map(NodeId::new)
            .filter(|&id| self.kind_of(id) == Kind::Leaf)
            .collect();

        leaves
            .into_iter()
            .filter(|&id| self.deliver(id, &mut *surface, |item, cx| item.poll(cx)) == Some(true))
            .count()
    }

    /// Redraws the end of the focus path if anything changed since the
    /// last draw and no request holds the current screen. Returns whether
    /// it drew.
    pub fn render(&mut self, surface: &mut dyn RenderSurface) -> bool {
        if self.hold_display {
            trace!("display held, render skipped");
            return false;
        }
        if !self.dirty {
            return false;
        }
        self.draw(surface);
        true
    }

    /// Draws the end of the focus path unconditionally.
    pub fn draw(&mut self, surface: &mut dyn RenderSurface) {
        self.dirty = false;
        let target = self.route_target();
        if self.kind_of(target) == Kind::Container {
            self.draw_menu(target, surface);
            return;
        }
        match &self.node(target).kind {
            NodeKind::Leaf(leaf) => leaf.item.draw_content(surface),
            NodeKind::Dialog(dialog) => dialog.view.draw(surface, self.title_font),
            NodeKind::Container(_) => {}
        }
    }

    fn draw_menu(&mut self, id: NodeId, surface: &mut dyn RenderSurface) {
        let (width, height) = surface.size();
        let layout = MenuLayout::new(width, height, self.title_font, self.item_font);

        let container = self.container(id);
        let title = container.title.clone();
        let children = container.children.clone();
        let selected = container.selected;
        let window = layout.window(container.first_visible, selected, children.len());
        self.container_mut(id).first_visible = window.start;

        surface.clear();
        surface.draw_text(layout.title_font(), layout.title_rect(), &title, true);
        for (slot, index) in window.enumerate() {
            let rect = layout.row_rect(slot);
            let highlighted = index == selected;
            match &self.node(children[index]).kind {
                NodeKind::Container(child) => {
                    surface.draw_text(layout.item_font(), rect, &child.title, highlighted);
                }
                NodeKind::Leaf(leaf) => {
                    leaf.item.draw_title(surface, layout.item_font(), rect, highlighted);
                }
                NodeKind::Dialog(_) => {}
            }
        }
        surface.update();
    }

    fn navigate(&mut self, id: NodeId, key: Key, surface: &mut dyn RenderSurface) {
        let count = self.container(id).children.len();
        match key {
            Key::Up | Key::Down if count > 0 => {
                let container = self.container_mut(id);
                container.selected = if key == Key::Up {
                    (container.selected + count - 1) % count
                } else {
                    (container.selected + 1) % count
                };
                trace!(container = ?id, selected = container.selected, "selection moved");
                self.dirty = true;
            }
            Key::Enter => {
                let container = self.container(id);
                let selected = container.children.get(container.selected).copied();
                if let Some(child) = selected {
                    self.enter(child, surface);
                }
            }
            Key::Escape => match self.node(id).parent {
                Some(parent) => self.remove_focus(parent, id),
                None => trace!("escape at the root ignored"),
            },
            _ => {}
        }
    }

    fn enter(&mut self, child: NodeId, surface: &mut dyn RenderSurface) {
        match self.kind_of(child) {
            Kind::Container => {
                let parent = self.parent_of(child);
                self.set_focus(parent, child);
            }
            Kind::Leaf => {
                self.deliver(child, surface, |item, cx| item.on_enter(cx));
            }
            Kind::Dialog => {}
        }
    }

    /// Calls `f` on the item at `id` and applies what it requested.
    fn deliver<R>(
        &mut self,
        id: NodeId,
        surface: &mut dyn RenderSurface,
        f: impl FnOnce(&mut dyn MenuItem, &mut ItemCx<'_>) -> R,
    ) -> Option<R> {
        let dialog_font = self.title_font;
        let node = self.node_mut(id);
        let has_focus = node.has_focus;
        let NodeKind::Leaf(leaf) = &mut node.kind else {
            return None;
        };

        let mut cx = ItemCx::new(id, has_focus, surface).with_dialog_font(dialog_font);
        let result = f(leaf.item.as_mut(), &mut cx);
        let requests = cx.into_requests();
        self.apply(id, requests);
        Some(result)
    }

    fn apply(&mut self, issuer: NodeId, requests: Vec<Request>) {
        for request in requests {
            trace!(?issuer, ?request, "applying request");
            match request {
                Request::SetFocus(target) => {
                    let parent = self.parent_of(issuer);
                    self.set_focus(parent, target);
                }
                Request::RemoveFocus(target) => {
                    let parent = self.parent_of(issuer);
                    self.remove_focus(parent, target);
                }
                Request::SuspendButtonEvents => self.suspend_button_events(issuer),
                Request::ResumeButtonEvents => self.resume_button_events(issuer),
                Request::OpenDialog(view) => {
                    let dialog = self.dialog_surface(issuer, view);
                    self.set_focus(issuer, dialog);
                }
                Request::CloseDialog => {
                    if let Some(dialog) = self.dialog_of(issuer) {
                        self.remove_focus(issuer, dialog);
                    }
                }
                Request::HoldDisplay => self.hold_display = true,
                Request::Led(pattern) => self.leds.push(pattern),
            }
        }
    }

    /// Dialog node of `owner`, created on first use.
    fn dialog_surface(&mut self, owner: NodeId, view: DialogView) -> NodeId {
        if let Some(dialog) = self.dialog_of(owner) {
            if let NodeKind::Dialog(existing) = &mut self.node_mut(dialog).kind {
                existing.view = view;
            }
            return dialog;
        }

        let dialog = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(owner),
            has_focus: false,
            kind: NodeKind::Dialog(Dialog { view }),
        });
        if let NodeKind::Leaf(leaf) = &mut self.node_mut(owner).kind {
            leaf.dialog = Some(dialog);
        }
        debug!(?owner, ?dialog, "dialog surface created");
        dialog
    }

    fn grant(&mut self, container: NodeId, child: NodeId) {
        let previous = self.container(container).focused_child;
        if previous == Some(child) {
            trace!(?container, ?child, "set_focus ignored, child already holds focus");
            return;
        }
        // Unknown ids panic here, before anything changed.
        self.node(child);

        if let Some(previous) = previous {
            self.revoke(previous);
            self.record(FocusChange::Revoked {
                parent: container,
                child: previous,
            });
        }

        let node = self.container_mut(container);
        node.focused_child = Some(child);
        if let Some(position) = node.children.iter().position(|&id| id == child) {
            node.selected = position;
        }
        self.node_mut(child).has_focus = true;
        self.record(FocusChange::Granted {
            parent: container,
            child,
        });
        self.dirty = true;

        if !self.node(container).has_focus {
            if let Some(up) = self.node(container).parent {
                self.set_focus(up, container);
            }
        }
    }

    /// Clears the focus flag of `id` and everything focused below it.
    fn revoke(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.has_focus = false;
        let below = match &mut node.kind {
            NodeKind::Container(container) => container.focused_child.take(),
            NodeKind::Leaf(leaf) => {
                leaf.item.on_hide_content();
                None
            }
            NodeKind::Dialog(_) => None,
        };
        if let Some(below) = below {
            self.revoke(below);
        }
    }

    fn route_target(&self) -> NodeId {
        let mut current = self.root();
        while let NodeKind::Container(container) = &self.node(current).kind {
            match container.focused_child {
                Some(child) => current = child,
                None => break,
            }
        }
        current
    }

    fn record(&mut self, change: FocusChange) {
        debug!(?change, "focus change");
        if self.journal.len() == JOURNAL_CAPACITY {
            self.journal.pop_front();
        }
        self.journal.push_back(change);
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes
            .get(id.index())
            .unwrap_or_else(|| panic!("unknown menu node {id:?}"))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("unknown menu node {id:?}"))
    }

    fn kind_of(&self, id: NodeId) -> Kind {
        match self.node(id).kind {
            NodeKind::Container(_) => Kind::Container,
            NodeKind::Leaf(_) => Kind::Leaf,
            NodeKind::Dialog(_) => Kind::Dialog,
        }
    }

    fn parent_of(&self, id: NodeId) -> NodeId {
        self.node(id)
            .parent
            .unwrap_or_else(|| panic!("menu node {id:?} has no parent"))
    }

    fn container(&self, id: NodeId) -> &Container {
        match &self.node(id).kind {
            NodeKind::Container(container) => container,
            _ => panic!("menu node {id:?} is not a container"),
        }
    }

    fn container_mut(&mut self, id: NodeId) -> &mut Container {
        match &mut self.node_mut(id).kind {
            NodeKind::Container(container) => container,
            _ => panic!("menu node {id:?} is not a container"),
        }
    }
}

impl Container {
    const fn new(title: String) -> Self {
        Self {
            title,
            children: Vec::new(),
            selected: 0,
            first_visible: 0,
            focused_child: None,
            suspended: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::TextItem;
    use crate::input::{LedColor, LedEffect};
    use crate::ui::{DrawCommand, RecordingSurface};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Item whose Enter handler is scripted and which counts hide calls.
    struct Spy {
        title: &'static str,
        enter: fn(&mut ItemCx<'_>),
        hidden: Rc<Cell<u32>>,
    }

    impl Spy {
        fn new(title: &'static str, enter: fn(&mut ItemCx<'_>)) -> (Self, Rc<Cell<u32>>) {
            let hidden = Rc::new(Cell::new(0));
            (
                Self {
                    title,
                    enter,
                    hidden: Rc::clone(&hidden),
                },
                hidden,
            )
        }
    }

    impl MenuItem for Spy {
        fn on_enter(&mut self, cx: &mut ItemCx<'_>) {
            (self.enter)(cx);
        }

        fn on_escape(&mut self, cx: &mut ItemCx<'_>) {
            cx.release_focus();
        }

        fn draw_title(
            &self,
            surface: &mut dyn RenderSurface,
            font: Font,
            rect: crate::ui::Rect,
            selected: bool,
        ) {
            surface.draw_text(font, rect, self.title, selected);
        }

        fn draw_content(&self, surface: &mut dyn RenderSurface) {
            surface.clear();
            surface.draw_lines(Font::Small, &[format!("{} content", self.title)]);
            surface.update();
        }

        fn on_hide_content(&mut self) {
            self.hidden.set(self.hidden.get() + 1);
        }
    }

    fn surface() -> RecordingSurface {
        RecordingSurface::new(178, 128)
    }

    fn revocations(nav: &Navigator) -> usize {
        nav.journal()
            .filter(|change| matches!(change, FocusChange::Revoked { .. }))
            .count()
    }

    #[test]
    fn root_holds_focus_and_renders_its_menu() {
        let mut nav = Navigator::new("Main");
        nav.add_item(nav.root(), TextItem::new("First", ["1"]));
        nav.add_item(nav.root(), TextItem::new("Second", ["2"]));

        let mut surface = surface();
        assert!(nav.render(&mut surface));

        assert!(nav.has_focus(nav.root()));
        assert_eq!(surface.texts(), vec!["Main", "First", "Second"]);
        assert_eq!(surface.selected_texts(), vec!["Main", "First"]);
        assert!(!nav.render(&mut surface), "nothing changed");
    }

    #[test]
    fn up_and_down_wrap_around() {
        let mut nav = Navigator::new("Main");
        for title in ["a", "b", "c"] {
            nav.add_item(nav.root(), TextItem::new(title, [title]));
        }
        let mut surface = surface();

        nav.dispatch(Key::Up, &mut surface);
        assert_eq!(nav.selected(nav.root()), 2);
        nav.dispatch(Key::Down, &mut surface);
        assert_eq!(nav.selected(nav.root()), 0);
        nav.dispatch(Key::Down, &mut surface);
        assert_eq!(nav.selected(nav.root()), 1);
    }

    #[test]
    fn left_right_and_escape_at_root_do_nothing() {
        let mut nav = Navigator::new("Main");
        nav.add_item(nav.root(), TextItem::new("a", ["a"]));
        nav.add_item(nav.root(), TextItem::new("b", ["b"]));
        let mut surface = surface();

        for key in [Key::Left, Key::Right, Key::Escape] {
            nav.dispatch(key, &mut surface);
        }
        assert_eq!(nav.selected(nav.root()), 0);
        assert!(nav.has_focus(nav.root()));
        assert_eq!(nav.journal().count(), 0);
    }

    #[test]
    fn enter_and_escape_move_focus_into_and_out_of_a_leaf() {
        let mut nav = Navigator::new("Main");
        let about = nav.add_item(nav.root(), TextItem::new("About", ["lcdmenu"]));
        let mut surface = surface();

        nav.dispatch(Key::Enter, &mut surface);
        assert!(nav.has_focus(about));
        assert_eq!(nav.focused_leaf(), Some(about));

        nav.draw(&mut surface);
        assert!(surface.contains_text("lcdmenu"));

        nav.dispatch(Key::Escape, &mut surface);
        assert!(!nav.has_focus(about));
        assert_eq!(nav.focused_leaf(), None);
        assert_eq!(revocations(&nav), 1);
    }

    #[test]
    fn granting_focus_twice_is_idempotent() {
        let mut nav = Navigator::new("Main");
        let (spy, hidden) = Spy::new("s", |_| {});
        let item = nav.add_item(nav.root(), spy);

        nav.set_focus(nav.root(), item);
        nav.set_focus(nav.root(), item);

        assert_eq!(nav.journal().count(), 1);
        assert_eq!(hidden.get(), 0);
    }

    #[test]
    fn granting_a_sibling_revokes_the_previous_holder() {
        let mut nav = Navigator::new("Main");
        let (first, first_hidden) = Spy::new("first", |_| {});
        let (second, _) = Spy::new("second", |_| {});
        let first = nav.add_item(nav.root(), first);
        let second = nav.add_item(nav.root(), second);

        nav.set_focus(nav.root(), first);
        nav.set_focus(nav.root(), second);

        assert!(!nav.has_focus(first));
        assert!(nav.has_focus(second));
        assert_eq!(first_hidden.get(), 1);
        assert_eq!(nav.selected(nav.root()), 1);
    }

    #[test]
    fn removing_focus_from_a_non_holder_is_a_no_op() {
        let mut nav = Navigator::new("Main");
        let (first, hidden) = Spy::new("first", |_| {});
        let first = nav.add_item(nav.root(), first);
        let second = nav.add_item(nav.root(), TextItem::new("second", ["2"]));

        nav.set_focus(nav.root(), first);
        nav.remove_focus(nav.root(), second);

        assert!(nav.has_focus(first));
        assert_eq!(hidden.get(), 0);
        assert_eq!(revocations(&nav), 0);
    }

    #[test]
    fn leaves_forward_focus_calls_to_their_parent() {
        let mut nav = Navigator::new("Main");
        let first = nav.add_item(nav.root(), TextItem::new("first", ["1"]));
        let second = nav.add_item(nav.root(), TextItem::new("second", ["2"]));

        nav.set_focus(first, second);
        assert!(nav.has_focus(second));

        nav.remove_focus(first, second);
        assert!(!nav.has_focus(second));
        assert_eq!(
            nav.journal().copied().collect::<Vec<_>>(),
            vec![
                FocusChange::Granted { parent: nav.root(), child: second },
                FocusChange::Revoked { parent: nav.root(), child: second },
            ]
        );
    }

    #[test]
    fn nested_containers_are_entered_and_left_with_enter_and_escape() {
        let mut nav = Navigator::new("Main");
        let settings = nav.add_container(nav.root(), "Settings");
        let item = nav.add_item(settings, TextItem::new("Brightness", ["50%"]));
        let mut surface = surface();

        nav.dispatch(Key::Enter, &mut surface);
        assert!(nav.has_focus(settings));
        assert_eq!(nav.focused_leaf(), None);

        nav.draw(&mut surface);
        assert!(surface.contains_text("Settings"));
        assert!(surface.contains_text("Brightness"));

        nav.dispatch(Key::Enter, &mut surface);
        assert_eq!(nav.focus_path(), vec![nav.root(), settings, item]);

        nav.dispatch(Key::Escape, &mut surface);
        nav.dispatch(Key::Escape, &mut surface);
        assert_eq!(nav.focus_path(), vec![nav.root()]);
    }

    #[test]
    fn focus_granted_deep_in_the_tree_claims_the_whole_path() {
        let mut nav = Navigator::new("Main");
        let (top, top_hidden) = Spy::new("top", |_| {});
        let top = nav.add_item(nav.root(), top);
        let settings = nav.add_container(nav.root(), "Settings");
        let deep = nav.add_item(settings, TextItem::new("Deep", ["d"]));

        nav.set_focus(nav.root(), top);
        nav.set_focus(settings, deep);

        assert_eq!(nav.focus_path(), vec![nav.root(), settings, deep]);
        assert!(!nav.has_focus(top));
        assert_eq!(top_hidden.get(), 1);
    }

    #[test]
    fn revoking_a_container_clears_everything_below_it() {
        let mut nav = Navigator::new("Main");
        let settings = nav.add_container(nav.root(), "Settings");
        let (deep, hidden) = Spy::new("deep", |_| {});
        let deep = nav.add_item(settings, deep);

        nav.set_focus(settings, deep);
        nav.remove_focus(nav.root(), settings);

        assert!(!nav.has_focus(settings));
        assert!(!nav.has_focus(deep));
        assert_eq!(hidden.get(), 1);
    }

    #[test]
    fn suspension_climbs_to_the_root_and_drops_keys() {
        let mut nav = Navigator::new("Main");
        let settings = nav.add_container(nav.root(), "Settings");
        let deep = nav.add_item(settings, TextItem::new("Deep", ["d"]));
        nav.add_item(nav.root(), TextItem::new("Other", ["o"]));
        let mut surface = surface();

        nav.suspend_button_events(deep);
        assert!(nav.is_suspended());
        nav.dispatch(Key::Down, &mut surface);
        assert_eq!(nav.selected(nav.root()), 0);

        nav.resume_button_events(deep);
        nav.dispatch(Key::Down, &mut surface);
        assert_eq!(nav.selected(nav.root()), 1);
    }

    #[test]
    fn dialog_takes_focus_from_its_owner_and_swallows_keys() {
        let mut nav = Navigator::new("Main");
        let (spy, _) = Spy::new("spy", |cx| {
            cx.open_dialog(DialogView::new("Working", "Please wait"));
            cx.suspend_button_events();
        });
        let item = nav.add_item(nav.root(), spy);
        let mut surface = surface();

        nav.dispatch(Key::Enter, &mut surface);

        let dialog = nav.dialog_of(item).expect("dialog created");
        assert!(nav.has_focus(dialog));
        assert!(!nav.has_focus(item));
        assert_eq!(nav.focused_leaf(), Some(dialog));

        nav.draw(&mut surface);
        assert_eq!(surface.selected_texts(), vec!["Working"]);
        assert!(surface.contains_text("Please wait"));

        nav.resume_button_events(item);
        nav.dispatch(Key::Escape, &mut surface);
        assert!(nav.has_focus(dialog), "escape does not close a dialog");
    }

    #[test]
    fn dialog_surface_is_reused_by_later_runs() {
        let mut nav = Navigator::new("Main");
        let (spy, _) = Spy::new("spy", |cx| {
            cx.open_dialog(DialogView::new("t", "m"));
            cx.close_dialog();
        });
        let item = nav.add_item(nav.root(), spy);
        let mut surface = surface();

        nav.dispatch(Key::Enter, &mut surface);
        let first = nav.dialog_of(item);
        nav.dispatch(Key::Enter, &mut surface);

        assert_eq!(nav.dialog_of(item), first);
        assert_eq!(nav.focus_path(), vec![nav.root()]);
    }

    #[test]
    fn held_display_skips_rendering_until_the_next_key() {
        let mut nav = Navigator::new("Main");
        let (spy, _) = Spy::new("spy", |cx| {
            cx.surface().draw_text(Font::Small, crate::ui::Rect::band(0, 10, 8), "notice", false);
            cx.hold_display();
        });
        nav.add_item(nav.root(), spy);
        let mut surface = surface();

        nav.dispatch(Key::Enter, &mut surface);
        assert!(nav.is_holding_display());
        assert!(!nav.render(&mut surface));

        nav.dispatch(Key::Left, &mut surface);
        assert!(nav.render(&mut surface));
    }

    #[test]
    fn led_requests_are_queued_for_the_event_loop() {
        let mut nav = Navigator::new("Main");
        let (spy, _) = Spy::new("spy", |cx| cx.set_led(LedColor::Red, LedEffect::Flash));
        nav.add_item(nav.root(), spy);

        nav.dispatch(Key::Enter, &mut surface());

        assert_eq!(
            nav.take_led_requests(),
            vec![LedPattern::new(LedColor::Red, LedEffect::Flash)]
        );
        assert!(nav.take_led_requests().is_empty());
    }

    #[test]
    fn long_menus_scroll_with_the_cursor() {
        let mut nav = Navigator::new("Main");
        for index in 0..10 {
            let title = format!("item {index}");
            nav.add_item(nav.root(), TextItem::new(title, ["x"]));
        }
        // 12px title and rows: four rows on a 64px panel.
        let mut surface = RecordingSurface::new(128, 64);
        for _ in 0..5 {
            nav.dispatch(Key::Down, &mut surface);
        }
        nav.draw(&mut surface);

        let rows: Vec<&str> = surface.texts().into_iter().skip(1).collect();
        assert_eq!(rows, vec!["item 2", "item 3", "item 4", "item 5"]);
        assert_eq!(surface.commands().first(), Some(&DrawCommand::Clear));
    }

    #[test]
    #[should_panic(expected = "not a container")]
    fn attaching_to_a_leaf_panics() {
        let mut nav = Navigator::new("Main");
        let leaf = nav.add_item(nav.root(), TextItem::new("leaf", ["l"]));
        nav.add_container(leaf, "nope");
    }

    #[test]
    fn at_most_one_leaf_holds_focus_under_any_call_sequence() {
        let mut nav = Navigator::new("Main");
        let root = nav.root();
        let a = nav.add_item(root, TextItem::new("a", ["a"]));
        let sub = nav.add_container(root, "sub");
        let b = nav.add_item(sub, TextItem::new("b", ["b"]));
        let c = nav.add_item(sub, TextItem::new("c", ["c"]));
        let subsub = nav.add_container(sub, "subsub");
        let d = nav.add_item(subsub, TextItem::new("d", ["d"]));

        let edges = [(root, a), (root, sub), (sub, b), (sub, c), (sub, subsub), (subsub, d)];
        let leaves = [a, b, c, d];
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;

        for _ in 0..2_000 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let (parent, child) = edges[(seed >> 33) as usize % edges.len()];
            if (seed >> 20) & 1 == 0 {
                nav.set_focus(parent, child);
            } else {
                nav.remove_focus(parent, child);
            }

            let focused = leaves.iter().filter(|&&leaf| nav.has_focus(leaf)).count();
            assert!(focused <= 1);
            for &(parent, child) in &edges {
                if nav.has_focus(child) {
                    assert!(nav.has_focus(parent), "focus path is contiguous");
                }
            }
        }
    }
}
