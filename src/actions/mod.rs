// src/actions/mod.rs

//! Task handlers and the owner-thread context they run against.
//!
//! Handlers are plain functions grouped by the window they act on:
//! - [`target`]: the externally owned target window,
//! - [`overlay`]: the overlay surface,
//! - [`app`]: clipboard, keystrokes, layouts, pauses and shutdown.
//!
//! [`standard_registry`] wires every `TaskKind` to its handler.

pub mod app;
pub mod overlay;
pub mod target;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigFile;
use crate::engine::{
    ActionRegistry, AppTask, Gestures, OverlayTask, SharedState, ShutdownSequencer, TargetTask,
    TaskKind, TaskPacket, TaskQueue,
};
use crate::locate::{LocateRole, Locator, WindowFilter};
use crate::platform::{
    Clipboard, KeyListener, KeystrokeInjector, LayoutSwitcher, OverlaySurface, WindowFocus,
    WindowQuery,
};
use crate::types::{Placement, WindowId};
use crate::workers::Coordinator;

/// Static settings the handlers need, derived from the config once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSettings {
    pub target: WindowFilter,
    /// Used for the target when `target` has no predicate.
    pub default_target: WindowFilter,
    pub overlay: WindowFilter,
    pub placement: Placement,
    pub gestures: Gestures,
}

impl ActionSettings {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            target: cfg.target_filter(),
            default_target: ConfigFile::default().target_filter(),
            overlay: cfg.overlay_filter(),
            placement: cfg.placement(),
            gestures: cfg.gestures(),
        }
    }

    /// The filter the target is located with.
    pub fn target_filter(&self) -> &WindowFilter {
        self.target.or(&self.default_target)
    }
}

/// External collaborators used by the handlers.
pub struct Collaborators {
    pub windows: Arc<dyn WindowQuery>,
    pub focus: Arc<dyn WindowFocus>,
    pub keystrokes: Box<dyn KeystrokeInjector>,
    pub clipboard: Box<dyn Clipboard>,
    pub layouts: Box<dyn LayoutSwitcher>,
    pub overlay: Box<dyn OverlaySurface>,
}

/// Everything a handler may touch. Lives on the owner thread.
pub struct ActionContext {
    pub(crate) queue: Arc<TaskQueue>,
    pub(crate) state: Arc<SharedState>,
    pub(crate) shutdown: ShutdownSequencer,
    pub(crate) locator: Locator,
    pub(crate) settings: ActionSettings,
    pub(crate) focus: Arc<dyn WindowFocus>,
    pub(crate) keystrokes: Box<dyn KeystrokeInjector>,
    pub(crate) clipboard: Box<dyn Clipboard>,
    pub(crate) layouts: Box<dyn LayoutSwitcher>,
    pub(crate) overlay: Box<dyn OverlaySurface>,
    pub(crate) stored_clipboard: String,
    workers: Option<Coordinator>,
    listener: Option<Box<dyn KeyListener>>,
}

impl fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("settings", &self.settings)
            .field("overlay_visible", &self.overlay.is_visible())
            .finish_non_exhaustive()
    }
}

impl ActionContext {
    pub fn new(
        queue: Arc<TaskQueue>,
        state: Arc<SharedState>,
        settings: ActionSettings,
        collaborators: Collaborators,
    ) -> Self {
        let shutdown = ShutdownSequencer::new(Arc::clone(&state), Arc::clone(&queue));
        Self {
            locator: Locator::new(collaborators.windows),
            queue,
            state,
            shutdown,
            settings,
            focus: collaborators.focus,
            keystrokes: collaborators.keystrokes,
            clipboard: collaborators.clipboard,
            layouts: collaborators.layouts,
            overlay: collaborators.overlay,
            stored_clipboard: String::new(),
            workers: None,
            listener: None,
        }
    }

    /// Hand the worker threads over so the exit handler can stop them.
    pub fn attach_workers(&mut self, workers: Coordinator) {
        self.workers = Some(workers);
    }

    /// Hand the key listener over so the exit handler can stop it.
    pub fn attach_listener(&mut self, listener: Box<dyn KeyListener>) {
        self.listener = Some(listener);
    }

    pub fn shutdown(&self) -> &ShutdownSequencer {
        &self.shutdown
    }

    pub(crate) fn locate_target(&self) -> Option<WindowId> {
        self.locator
            .locate_or_shutdown(self.settings.target_filter(), LocateRole::Target, &self.shutdown)
    }

    pub(crate) fn locate_overlay(&self) -> Option<WindowId> {
        self.locator
            .locate_or_shutdown(&self.settings.overlay, LocateRole::Overlay, &self.shutdown)
    }

    pub(crate) fn push_burst(&self, burst: Vec<TaskPacket>) {
        self.queue.push_batch(burst);
    }

    /// Stop workers and the key listener, close the overlay, and let the
    /// runtime loop end.
    pub(crate) fn teardown(&mut self) {
        if let Some(mut workers) = self.workers.take() {
            workers.stop_all();
        }
        if let Some(mut listener) = self.listener.take() {
            listener.stop();
        }
        self.overlay.close();
        self.state.set_overlay_visible(false);
        self.state.mark_exited();
        debug!("teardown complete");
    }
}

/// Handler table covering every task kind.
pub fn standard_registry() -> ActionRegistry<ActionContext> {
    ActionRegistry::builder()
        .register(TaskKind::Target(TargetTask::Focus), target::focus)
        .register(TaskKind::Overlay(OverlayTask::Show), overlay::show)
        .register(TaskKind::Overlay(OverlayTask::Hide), overlay::hide)
        .register(TaskKind::Overlay(OverlayTask::ToggleShow), overlay::toggle_show)
        .register(TaskKind::Overlay(OverlayTask::Focus), overlay::focus)
        .register(TaskKind::Overlay(OverlayTask::Restore), overlay::restore)
        .register(TaskKind::Overlay(OverlayTask::CopyInput), overlay::copy_input)
        .register(TaskKind::Overlay(OverlayTask::ClearInput), overlay::clear_input)
        .register(TaskKind::App(AppTask::Exit), app::exit)
        .register(TaskKind::App(AppTask::ToggleFocus), app::toggle_focus)
        .register(TaskKind::App(AppTask::SaveClipboard), app::save_clipboard)
        .register(TaskKind::App(AppTask::RestoreClipboard), app::restore_clipboard)
        .register(TaskKind::App(AppTask::SendKeystroke), app::send_keystroke)
        .register(TaskKind::App(AppTask::SwitchKeyboard), app::switch_keyboard)
        .register(TaskKind::App(AppTask::Wait), app::wait)
        .register(TaskKind::App(AppTask::UpdateWindows), app::update_windows)
        .build()
}
