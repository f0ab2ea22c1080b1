// src/platform/mod.rs

//! Narrow contracts for everything outside the orchestration core.
//!
//! The engine only ever talks to these traits. Production wiring uses the
//! command-line shims in [`command`], the in-memory overlay in [`headless`]
//! and the line-driven key source in [`stdin_keys`]; tests substitute fakes
//! from the `ffchat-test-utils` crate.
//!
//! Thread affinity:
//! - `WindowQuery` / `WindowFocus` are `Send + Sync`: the workers and the key
//!   listener query them from their own threads.
//! - `OverlaySurface` is owner-thread only and therefore not `Send`.

pub mod command;
pub mod headless;
pub mod stdin_keys;

use crate::errors::PlatformError;
use crate::keys::{Key, KeyEvent};
use crate::locate::WindowFilter;
use crate::types::{Position, Size, WindowId};

pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// Read side of the window manager.
pub trait WindowQuery: Send + Sync {
    /// Re-read the window list from the window manager.
    fn refresh(&self) -> PlatformResult<()>;

    /// Ids of the windows in the last refreshed list that match `filter`.
    fn find(&self, filter: &WindowFilter) -> Vec<WindowId>;

    /// Currently focused window, if the window manager reports one.
    fn active_id(&self) -> Option<WindowId>;
}

/// Write side of the window manager.
pub trait WindowFocus: Send + Sync {
    fn focus(&self, id: &WindowId) -> PlatformResult<()>;
}

/// Synthetic key presses.
pub trait KeystrokeInjector {
    /// Press `keys` in order, then release them in reverse order.
    fn send(&self, keys: &[Key]) -> PlatformResult<()>;
}

pub trait Clipboard {
    fn read(&self) -> PlatformResult<String>;
    fn write(&self, text: &str) -> PlatformResult<()>;
}

/// Input-method switcher (e.g. fcitx5).
pub trait LayoutSwitcher {
    fn switch(&self, layout: &str) -> PlatformResult<()>;
}

/// The overlay window itself.
pub trait OverlaySurface {
    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
    fn relocate(&mut self, size: Option<Size>, position: Option<Position>);
    fn input_text(&self) -> String;
    fn clear_input(&mut self);
    fn close(&mut self);
}

/// Callback receiving key-down events on the listener's own thread.
pub type KeySink = Box<dyn Fn(KeyEvent) + Send + Sync>;

/// Global key-down source.
pub trait KeyListener {
    fn start(&mut self, sink: KeySink) -> PlatformResult<()>;
    fn stop(&mut self);
}
