//! Menu item showing the device information page.

use super::InfoSources;
use crate::domain::InfoSnapshot;
use crate::focus::{ItemCx, MenuItem};
use crate::input::CancelToken;
use crate::modal::{Outcome, ProgressDialog, TaskDescriptor};
use crate::ui::{Font, Rect, RenderSurface};
use tracing::debug;

/// Device information page.
///
/// The first Enter gathers the information in the background behind a
/// progress dialog and caches it. Later visits show the cached snapshot
/// straight away; Right refreshes it while the page is open.
#[derive(Debug)]
pub struct DeviceInfoItem {
    title: String,
    content_font: Font,
    dialog: ProgressDialog<InfoSnapshot>,
    info: Option<InfoSnapshot>,
}

impl DeviceInfoItem {
    pub const DEFAULT_TITLE: &'static str = "Device information";

    /// Item running `task` to gather its snapshot.
    #[must_use]
    pub fn new(task: TaskDescriptor<InfoSnapshot>) -> Self {
        Self {
            title: Self::DEFAULT_TITLE.to_string(),
            content_font: Font::Medium,
            dialog: ProgressDialog::new(task),
            info: None,
        }
    }

    /// Item gathering its snapshot from `sources`, with the given dialog
    /// title, working and failed messages.
    pub fn with_sources(
        sources: InfoSources,
        title: impl Into<String>,
        working: impl Into<String>,
        failed: impl Into<String>,
    ) -> Self {
        Self::new(TaskDescriptor::new(move || sources.gather(), title, working, failed))
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub const fn with_content_font(mut self, font: Font) -> Self {
        self.content_font = font;
        self
    }

    /// The cached snapshot, if one has been gathered.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&InfoSnapshot> {
        self.info.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.dialog.is_running()
    }
}

impl MenuItem for DeviceInfoItem {
    fn on_enter(&mut self, cx: &mut ItemCx<'_>) {
        if cx.has_focus() {
            cx.release_focus();
        } else if self.info.is_none() {
            self.dialog.run(cx);
        } else {
            cx.request_focus();
        }
    }

    fn on_escape(&mut self, cx: &mut ItemCx<'_>) {
        if cx.has_focus() {
            cx.release_focus();
        }
    }

    fn on_right(&mut self, cx: &mut ItemCx<'_>) {
        if cx.has_focus() {
            debug!("refreshing device information");
            self.dialog.run(cx);
        }
    }

    fn draw_title(&self, surface: &mut dyn RenderSurface, font: Font, rect: Rect, selected: bool) {
        surface.draw_text(font, rect, &self.title, selected);
    }

    fn draw_content(&self, surface: &mut dyn RenderSurface) {
        surface.clear();
        if let Some(info) = &self.info {
            surface.draw_lines(self.content_font, &info.display_lines());
        }
        surface.update();
    }

    fn poll(&mut self, cx: &mut ItemCx<'_>) -> bool {
        let info = &mut self.info;
        self.dialog.poll(cx, |outcome, cx| match outcome {
            Outcome::Ok(snapshot) => {
                debug!(captured_at = %snapshot.captured_at(), "device information cached");
                *info = Some(snapshot);
                cx.request_focus();
            }
            Outcome::Failed(_) => cx.release_focus(),
        })
    }

    fn completion_token(&self) -> Option<CancelToken> {
        self.dialog.completion_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LcdMenuError, Result};
    use crate::focus::{NodeId, Request};
    use crate::ui::RecordingSurface;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const ID: NodeId = NodeId::new(1);

    fn item(
        operation: impl Fn() -> Result<InfoSnapshot> + Send + Sync + 'static,
    ) -> DeviceInfoItem {
        DeviceInfoItem::new(TaskDescriptor::new(
            operation,
            "Getting Info",
            "Loading",
            "Failed to load info",
        ))
    }

    fn snapshot(ip: &str) -> InfoSnapshot {
        InfoSnapshot::new(
            "1.0".to_string(),
            "img".to_string(),
            Some("0.1.0".to_string()),
            "x86_64-linux".to_string(),
            ip.to_string(),
        )
    }

    /// Delivers `f` to the item and returns the requests it made.
    fn call(
        item: &mut DeviceInfoItem,
        has_focus: bool,
        surface: &mut RecordingSurface,
        f: impl FnOnce(&mut DeviceInfoItem, &mut ItemCx<'_>),
    ) -> Vec<Request> {
        let mut cx = ItemCx::new(ID, has_focus, surface);
        f(item, &mut cx);
        cx.into_requests()
    }

    fn finish(item: &mut DeviceInfoItem, surface: &mut RecordingSurface) -> Vec<Request> {
        item.completion_token().expect("running").wait();
        call(item, false, surface, |item, cx| assert!(item.poll(cx)))
    }

    #[test]
    fn first_enter_starts_loading() {
        let mut surface = RecordingSurface::new(178, 128);
        let mut item = item(|| Ok(snapshot("10.0.0.1")));

        let requests = call(&mut item, false, &mut surface, |item, cx| item.on_enter(cx));

        assert!(matches!(requests.first(), Some(Request::OpenDialog(_))));
        assert!(item.is_loading());
        finish(&mut item, &mut surface);
    }

    #[test]
    fn success_caches_the_snapshot_and_takes_focus() {
        let mut surface = RecordingSurface::new(178, 128);
        let mut item = item(|| Ok(snapshot("10.0.0.1")));
        call(&mut item, false, &mut surface, |item, cx| item.on_enter(cx));

        let requests = finish(&mut item, &mut surface);

        assert_eq!(item.snapshot().map(InfoSnapshot::ip_address), Some("10.0.0.1"));
        assert!(requests.contains(&Request::SetFocus(ID)));
        assert!(!item.is_loading());
    }

    #[test]
    fn failure_stores_nothing_and_releases_focus() {
        let mut surface = RecordingSurface::new(178, 128);
        let mut item = item(|| Err(LcdMenuError::Device("no version file".to_string())));
        call(&mut item, false, &mut surface, |item, cx| item.on_enter(cx));

        let requests = finish(&mut item, &mut surface);

        assert!(item.snapshot().is_none());
        assert!(requests.contains(&Request::RemoveFocus(ID)));
        assert!(!requests.contains(&Request::SetFocus(ID)));
        assert!(surface.contains_text("Failed to load info"));
    }

    #[test]
    fn cached_snapshot_is_shown_without_querying_again() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let mut surface = RecordingSurface::new(178, 128);
        let mut item = item(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(snapshot("10.0.0.1"))
        });
        call(&mut item, false, &mut surface, |item, cx| item.on_enter(cx));
        finish(&mut item, &mut surface);

        let requests = call(&mut item, false, &mut surface, |item, cx| item.on_enter(cx));
        assert_eq!(requests, vec![Request::SetFocus(ID)]);

        item.draw_content(&mut surface);
        item.draw_content(&mut surface);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn focused_item_releases_on_enter_and_escape() {
        let mut surface = RecordingSurface::new(178, 128);
        let mut item = item(|| Ok(snapshot("10.0.0.1")));

        let enter = call(&mut item, true, &mut surface, |item, cx| item.on_enter(cx));
        let escape = call(&mut item, true, &mut surface, |item, cx| item.on_escape(cx));
        let unfocused_escape = call(&mut item, false, &mut surface, |item, cx| item.on_escape(cx));

        assert_eq!(enter, vec![Request::RemoveFocus(ID)]);
        assert_eq!(escape, vec![Request::RemoveFocus(ID)]);
        assert!(unfocused_escape.is_empty());
    }

    #[test]
    fn right_refreshes_and_replaces_the_whole_snapshot() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let mut surface = RecordingSurface::new(178, 128);
        let mut item = item(move || {
            let run = counter.fetch_add(1, Ordering::SeqCst);
            Ok(snapshot(&format!("10.0.0.{run}")))
        });
        call(&mut item, false, &mut surface, |item, cx| item.on_enter(cx));
        finish(&mut item, &mut surface);
        let first = item.snapshot().cloned().unwrap();

        let ignored = call(&mut item, false, &mut surface, |item, cx| item.on_right(cx));
        assert!(ignored.is_empty());

        call(&mut item, true, &mut surface, |item, cx| item.on_right(cx));
        finish(&mut item, &mut surface);
        let second = item.snapshot().cloned().unwrap();

        assert_eq!(first.ip_address(), "10.0.0.0");
        assert_eq!(second.ip_address(), "10.0.0.1");
        assert_ne!(first, second);
        assert!(second.captured_at() >= first.captured_at());
    }

    #[test]
    fn failed_refresh_keeps_the_cached_snapshot() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let mut surface = RecordingSurface::new(178, 128);
        let mut item = item(move || match counter.fetch_add(1, Ordering::SeqCst) {
            0 => Ok(snapshot("10.0.0.1")),
            _ => Err(LcdMenuError::Network("link down".to_string())),
        });
        call(&mut item, false, &mut surface, |item, cx| item.on_enter(cx));
        finish(&mut item, &mut surface);
        let cached = item.snapshot().cloned().unwrap();

        call(&mut item, true, &mut surface, |item, cx| item.on_right(cx));
        let requests = finish(&mut item, &mut surface);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(item.snapshot(), Some(&cached));
        assert!(requests.contains(&Request::RemoveFocus(ID)));
        assert!(!requests.contains(&Request::SetFocus(ID)));
        assert!(surface.contains_text("Failed to load info"));
    }

    #[test]
    fn content_lists_the_five_fields() {
        let mut surface = RecordingSurface::new(178, 128);
        let mut item = item(|| Ok(snapshot("10.0.0.1")));
        call(&mut item, false, &mut surface, |item, cx| item.on_enter(cx));
        finish(&mut item, &mut surface);
        surface.take();

        item.draw_content(&mut surface);
        assert_eq!(
            surface.texts(),
            vec![
                "Firmware: 1.0",
                "Image: img",
                "Runtime: 0.1.0",
                "Runtime id: x86_64-linux",
                "IP: 10.0.0.1",
            ]
        );
    }

    #[test]
    fn title_row_uses_the_item_title() {
        let item = item(|| Ok(snapshot("10.0.0.1"))).titled("Brick info");
        let mut surface = RecordingSurface::new(178, 128);
        item.draw_title(&mut surface, Font::Medium, Rect::band(12, 178, 12), true);
        assert_eq!(surface.selected_texts(), vec!["Brick info"]);
    }
}
