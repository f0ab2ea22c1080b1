//! In-memory stand-ins for every platform collaborator.
//!
//! Each fake is cheap to clone and clones share state, so a test can hand
//! one copy to the engine and keep another to inspect what happened.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ffchat::errors::PlatformError;
use ffchat::keys::{Key, KeyEvent};
use ffchat::locate::WindowFilter;
use ffchat::platform::{
    Clipboard, KeyListener, KeySink, KeystrokeInjector, LayoutSwitcher, OverlaySurface,
    PlatformResult, WindowFocus, WindowQuery,
};
use ffchat::types::{Position, Size, WindowId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeWindow {
    pub id: WindowId,
    pub name: String,
    pub class: String,
}

#[derive(Debug, Default)]
struct WindowsInner {
    windows: Mutex<Vec<FakeWindow>>,
    active: Mutex<Option<WindowId>>,
    focused: Mutex<Vec<WindowId>>,
    refreshes: AtomicUsize,
    fail_refresh: AtomicBool,
    fail_focus: AtomicBool,
    /// One-shot window lists applied by successive refreshes.
    scripted: Mutex<VecDeque<Vec<FakeWindow>>>,
}

/// Scriptable window manager.
#[derive(Debug, Clone, Default)]
pub struct FakeWindows {
    inner: Arc<WindowsInner>,
}

impl FakeWindows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(self, id: &str, name: &str, class: &str) -> Self {
        self.add_window(id, name, class);
        self
    }

    pub fn add_window(&self, id: &str, name: &str, class: &str) {
        self.inner.windows.lock().unwrap().push(FakeWindow {
            id: WindowId::new(id),
            name: name.to_string(),
            class: class.to_string(),
        });
    }

    pub fn remove_window(&self, id: &str) {
        self.inner
            .windows
            .lock()
            .unwrap()
            .retain(|w| w.id.as_str() != id);
    }

    /// From the next refresh on, list `windows` (one refresh each), then
    /// keep the last list.
    pub fn script_refreshes(&self, lists: Vec<Vec<FakeWindow>>) {
        self.inner.scripted.lock().unwrap().extend(lists);
    }

    pub fn set_active(&self, id: Option<&str>) {
        *self.inner.active.lock().unwrap() = id.map(WindowId::new);
    }

    pub fn fail_refresh(&self, fail: bool) {
        self.inner.fail_refresh.store(fail, Ordering::SeqCst);
    }

    pub fn fail_focus(&self, fail: bool) {
        self.inner.fail_focus.store(fail, Ordering::SeqCst);
    }

    pub fn refreshes(&self) -> usize {
        self.inner.refreshes.load(Ordering::SeqCst)
    }

    /// Every id passed to `focus`, in order.
    pub fn focused(&self) -> Vec<WindowId> {
        self.inner.focused.lock().unwrap().clone()
    }
}

impl WindowQuery for FakeWindows {
    fn refresh(&self) -> PlatformResult<()> {
        self.inner.refreshes.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.inner.scripted.lock().unwrap().pop_front() {
            *self.inner.windows.lock().unwrap() = next;
        }
        if self.inner.fail_refresh.load(Ordering::SeqCst) {
            return Err(PlatformError::Unavailable("window list unavailable".into()));
        }
        Ok(())
    }

    fn find(&self, filter: &WindowFilter) -> Vec<WindowId> {
        self.inner
            .windows
            .lock()
            .unwrap()
            .iter()
            .filter(|w| filter.matches(&w.name, &w.class))
            .map(|w| w.id.clone())
            .collect()
    }

    fn active_id(&self) -> Option<WindowId> {
        self.inner.active.lock().unwrap().clone()
    }
}

impl WindowFocus for FakeWindows {
    fn focus(&self, id: &WindowId) -> PlatformResult<()> {
        if self.inner.fail_focus.load(Ordering::SeqCst) {
            return Err(PlatformError::CommandFailed {
                program: "fake-focus".into(),
                status: 1,
                stderr: "refused".into(),
            });
        }
        self.inner.focused.lock().unwrap().push(id.clone());
        *self.inner.active.lock().unwrap() = Some(id.clone());
        Ok(())
    }
}

/// Records every chord sent.
#[derive(Debug, Clone, Default)]
pub struct RecordingKeystrokes {
    sent: Arc<Mutex<Vec<Vec<Key>>>>,
}

impl RecordingKeystrokes {
    pub fn sent(&self) -> Vec<Vec<Key>> {
        self.sent.lock().unwrap().clone()
    }
}

impl KeystrokeInjector for RecordingKeystrokes {
    fn send(&self, keys: &[Key]) -> PlatformResult<()> {
        self.sent.lock().unwrap().push(keys.to_vec());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ClipboardInner {
    content: Mutex<String>,
    writes: Mutex<Vec<String>>,
}

/// Clipboard held in memory, with a history of writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    inner: Arc<ClipboardInner>,
}

impl MemoryClipboard {
    pub fn with_content(content: &str) -> Self {
        let clipboard = Self::default();
        *clipboard.inner.content.lock().unwrap() = content.to_string();
        clipboard
    }

    pub fn content(&self) -> String {
        self.inner.content.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<String> {
        self.inner.writes.lock().unwrap().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&self) -> PlatformResult<String> {
        Ok(self.content())
    }

    fn write(&self, text: &str) -> PlatformResult<()> {
        *self.inner.content.lock().unwrap() = text.to_string();
        self.inner.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Records layout switches; can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct FakeLayouts {
    switched: Arc<Mutex<Vec<String>>>,
    fail: Arc<AtomicBool>,
}

impl FakeLayouts {
    pub fn failing() -> Self {
        let layouts = Self::default();
        layouts.fail.store(true, Ordering::SeqCst);
        layouts
    }

    pub fn switched(&self) -> Vec<String> {
        self.switched.lock().unwrap().clone()
    }
}

impl LayoutSwitcher for FakeLayouts {
    fn switch(&self, layout: &str) -> PlatformResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PlatformError::CommandFailed {
                program: "fake-layouts".into(),
                status: 1,
                stderr: format!("no such layout: {layout}"),
            });
        }
        self.switched.lock().unwrap().push(layout.to_string());
        Ok(())
    }
}

/// Observable overlay state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub visible: bool,
    pub closed: bool,
    pub size: Option<Size>,
    pub position: Option<Position>,
    pub input: String,
    /// `show`, `hide`, `relocate`, `clear`, `close` in call order.
    pub calls: Vec<&'static str>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeOverlay {
    state: Arc<Mutex<OverlayState>>,
}

impl FakeOverlay {
    pub fn snapshot(&self) -> OverlayState {
        self.state.lock().unwrap().clone()
    }

    pub fn set_input(&self, text: &str) {
        self.state.lock().unwrap().input = text.to_string();
    }

    pub fn set_visible(&self, visible: bool) {
        self.state.lock().unwrap().visible = visible;
    }
}

impl OverlaySurface for FakeOverlay {
    fn show(&mut self) {
        let mut s = self.state.lock().unwrap();
        s.visible = true;
        s.calls.push("show");
    }

    fn hide(&mut self) {
        let mut s = self.state.lock().unwrap();
        s.visible = false;
        s.calls.push("hide");
    }

    fn is_visible(&self) -> bool {
        self.state.lock().unwrap().visible
    }

    fn relocate(&mut self, size: Option<Size>, position: Option<Position>) {
        let mut s = self.state.lock().unwrap();
        if size.is_some() {
            s.size = size;
        }
        if position.is_some() {
            s.position = position;
        }
        s.calls.push("relocate");
    }

    fn input_text(&self) -> String {
        self.state.lock().unwrap().input.clone()
    }

    fn clear_input(&mut self) {
        let mut s = self.state.lock().unwrap();
        s.input.clear();
        s.calls.push("clear");
    }

    fn close(&mut self) {
        let mut s = self.state.lock().unwrap();
        s.visible = false;
        s.closed = true;
        s.calls.push("close");
    }
}

/// Key listener driven by the test through [`FakeListener::press`].
#[derive(Clone, Default)]
pub struct FakeListener {
    sink: Arc<Mutex<Option<KeySink>>>,
    stopped: Arc<AtomicBool>,
}

impl FakeListener {
    /// Deliver a key-down to the registered sink. Returns false when the
    /// listener is not started or already stopped.
    pub fn press(&self, event: KeyEvent) -> bool {
        if self.stopped.load(Ordering::SeqCst) {
            return false;
        }
        match self.sink.lock().unwrap().as_ref() {
            Some(sink) => {
                sink(event);
                true
            }
            None => false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl KeyListener for FakeListener {
    fn start(&mut self, sink: KeySink) -> PlatformResult<()> {
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.sink.lock().unwrap().take();
    }
}
