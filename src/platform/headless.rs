// src/platform/headless.rs

//! In-memory overlay used when no rendering surface is attached.
//!
//! It keeps visibility, geometry and input text so the whole task pipeline
//! can run (and be scripted through [`stdin_keys`](super::stdin_keys))
//! without a toolkit. [`HeadlessWindows`] lists it next to the real windows
//! so it can be located and focused by title. Both share an
//! [`OverlayFocus`]: hiding or closing the overlay hands the active window
//! back to the window manager.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info};

use super::{OverlaySurface, PlatformResult, WindowFocus, WindowQuery};
use crate::locate::WindowFilter;
use crate::types::{Position, Size, WindowId};

/// Id and class reported for the in-memory overlay.
pub const HEADLESS_OVERLAY_ID: &str = "headless-overlay";
pub const HEADLESS_OVERLAY_CLASS: &str = "ffchat.headless";

/// Shared handle to the overlay's text input.
#[derive(Debug, Clone, Default)]
pub struct HeadlessInput(Arc<Mutex<String>>);

impl HeadlessInput {
    pub fn set(&self, text: impl Into<String>) {
        *self.lock() = text.into();
    }

    pub fn get(&self) -> String {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.0.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Visibility and focus of the virtual overlay window.
///
/// A hidden overlay can not hold focus.
#[derive(Debug, Clone, Default)]
pub struct OverlayFocus(Arc<FocusFlags>);

#[derive(Debug, Default)]
struct FocusFlags {
    visible: AtomicBool,
    focused: AtomicBool,
}

impl OverlayFocus {
    pub fn is_focused(&self) -> bool {
        self.0.focused.load(Ordering::Acquire)
    }

    fn set_visible(&self, visible: bool) {
        self.0.visible.store(visible, Ordering::Release);
        if !visible {
            self.0.focused.store(false, Ordering::Release);
        }
    }

    /// Returns whether the overlay took focus.
    fn grab(&self) -> bool {
        let visible = self.0.visible.load(Ordering::Acquire);
        self.0.focused.store(visible, Ordering::Release);
        visible
    }

    fn release(&self) {
        self.0.focused.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct HeadlessOverlay {
    visible: bool,
    closed: bool,
    size: Option<Size>,
    position: Option<Position>,
    input: HeadlessInput,
    focus: OverlayFocus,
}

impl HeadlessOverlay {
    pub fn new(input: HeadlessInput) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    /// Share focus with the [`HeadlessWindows`] that lists this overlay.
    pub fn linked(mut self, focus: OverlayFocus) -> Self {
        focus.set_visible(self.visible);
        self.focus = focus;
        self
    }

    pub fn geometry(&self) -> (Option<Size>, Option<Position>) {
        (self.size, self.position)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl OverlaySurface for HeadlessOverlay {
    fn show(&mut self) {
        self.visible = true;
        self.focus.set_visible(true);
        info!("overlay shown");
    }

    fn hide(&mut self) {
        self.visible = false;
        self.focus.set_visible(false);
        info!("overlay hidden");
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn relocate(&mut self, size: Option<Size>, position: Option<Position>) {
        if size.is_some() {
            self.size = size;
        }
        if position.is_some() {
            self.position = position;
        }
        info!(size = ?self.size, position = ?self.position, "overlay relocated");
    }

    fn input_text(&self) -> String {
        self.input.get()
    }

    fn clear_input(&mut self) {
        self.input.set(String::new());
    }

    fn close(&mut self) {
        self.visible = false;
        self.closed = true;
        self.focus.set_visible(false);
        info!("overlay closed");
    }
}

/// Window manager view with the headless overlay added as a virtual window.
///
/// While the overlay holds focus it is reported as the active window.
pub struct HeadlessWindows<W> {
    inner: W,
    title: String,
    overlay_focus: OverlayFocus,
}

impl<W> HeadlessWindows<W> {
    pub fn new(inner: W, title: impl Into<String>) -> Self {
        Self {
            inner,
            title: title.into(),
            overlay_focus: OverlayFocus::default(),
        }
    }

    /// Handle to pass to [`HeadlessOverlay::linked`].
    pub fn overlay_focus(&self) -> OverlayFocus {
        self.overlay_focus.clone()
    }

    fn overlay_id() -> WindowId {
        WindowId::new(HEADLESS_OVERLAY_ID)
    }
}

impl<W: WindowQuery> WindowQuery for HeadlessWindows<W> {
    fn refresh(&self) -> PlatformResult<()> {
        self.inner.refresh()
    }

    fn find(&self, filter: &WindowFilter) -> Vec<WindowId> {
        let mut found = self.inner.find(filter);
        if filter.matches(&self.title, HEADLESS_OVERLAY_CLASS) {
            found.push(Self::overlay_id());
        }
        found
    }

    fn active_id(&self) -> Option<WindowId> {
        if self.overlay_focus.is_focused() {
            Some(Self::overlay_id())
        } else {
            self.inner.active_id()
        }
    }
}

impl<W: WindowFocus> WindowFocus for HeadlessWindows<W> {
    fn focus(&self, id: &WindowId) -> PlatformResult<()> {
        if id.as_str() == HEADLESS_OVERLAY_ID {
            if self.overlay_focus.grab() {
                debug!("headless overlay focused");
            } else {
                debug!("headless overlay is hidden, focus ignored");
            }
            return Ok(());
        }
        self.overlay_focus.release();
        self.inner.focus(id)
    }
}
