// src/engine/router.rs

//! Global hotkeys mapped onto gesture bursts.
//!
//! The key listener calls [`KeyRouter::on_key`] from its own thread. The
//! router only inspects window state and pushes packets; it never runs a
//! handler.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::{Gestures, SharedState, ShutdownSequencer, TaskQueue};
use crate::keys::{Chord, Key, KeyEvent};
use crate::locate::{Locator, WindowFilter};
use crate::platform::KeySink;
use crate::types::ExitReason;

/// What a hotkey asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    OpenOverlay,
    DismissClear,
    Dismiss,
    ClearInput,
    FocusOverlay,
    RestoreOverlay,
    Quit,
    ToggleFocus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub open_overlay: Chord,
    pub dismiss_clear: Chord,
    pub dismiss: Chord,
    pub clear_input: Chord,
    pub focus_overlay: Chord,
    pub restore_overlay: Chord,
    pub quit: Chord,
    pub toggle_focus: Option<Chord>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            open_overlay: Chord::new([Key::Ctrl], Key::Enter),
            dismiss_clear: Chord::new([Key::Ctrl], Key::Char('d')),
            dismiss: Chord::new([Key::Ctrl], Key::Char('e')),
            clear_input: Chord::new([Key::Ctrl], Key::Char('l')),
            focus_overlay: Chord::new([Key::Ctrl], Key::Char('f')),
            restore_overlay: Chord::new([Key::Ctrl], Key::Char('r')),
            quit: Chord::new([Key::Shift], Key::F(8)),
            toggle_focus: None,
        }
    }
}

impl KeyBindings {
    /// First gesture whose chord fires on `event`.
    pub fn resolve(&self, event: &KeyEvent) -> Option<Gesture> {
        let table = [
            (Some(&self.open_overlay), Gesture::OpenOverlay),
            (Some(&self.dismiss_clear), Gesture::DismissClear),
            (Some(&self.dismiss), Gesture::Dismiss),
            (Some(&self.clear_input), Gesture::ClearInput),
            (Some(&self.focus_overlay), Gesture::FocusOverlay),
            (Some(&self.restore_overlay), Gesture::RestoreOverlay),
            (Some(&self.quit), Gesture::Quit),
            (self.toggle_focus.as_ref(), Gesture::ToggleFocus),
        ];

        table
            .into_iter()
            .find_map(|(chord, gesture)| chord.filter(|c| c.matches(event)).map(|_| gesture))
    }
}

/// Window state the router's preconditions depend on.
pub trait WindowProbe: Send + Sync {
    fn target_focused(&self) -> bool;
    fn overlay_visible(&self) -> bool;
    fn overlay_focused(&self) -> bool;
}

/// Probe backed by the real locator and the shared visibility mirror.
pub struct LocatorProbe {
    pub locator: Locator,
    pub state: Arc<SharedState>,
    pub target: WindowFilter,
    pub overlay: WindowFilter,
}

impl WindowProbe for LocatorProbe {
    fn target_focused(&self) -> bool {
        self.locator.is_active(&self.target)
    }

    fn overlay_visible(&self) -> bool {
        self.state.overlay_visible()
    }

    fn overlay_focused(&self) -> bool {
        self.locator.is_active(&self.overlay)
    }
}

pub struct KeyRouter {
    bindings: KeyBindings,
    gestures: Gestures,
    queue: Arc<TaskQueue>,
    shutdown: ShutdownSequencer,
    probe: Box<dyn WindowProbe>,
}

impl fmt::Debug for KeyRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRouter")
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

impl KeyRouter {
    pub fn new(
        bindings: KeyBindings,
        gestures: Gestures,
        queue: Arc<TaskQueue>,
        shutdown: ShutdownSequencer,
        probe: Box<dyn WindowProbe>,
    ) -> Self {
        Self {
            bindings,
            gestures,
            queue,
            shutdown,
            probe,
        }
    }

    /// Route one key-down. Returns the gesture that fired, if any; a chord
    /// whose precondition does not hold is ignored.
    pub fn on_key(&self, event: &KeyEvent) -> Option<Gesture> {
        let gesture = self.bindings.resolve(event)?;
        if self.shutdown.stopping() {
            trace!(?gesture, "ignored while stopping");
            return None;
        }

        let probe = self.probe.as_ref();
        let overlay_active = || probe.overlay_visible() && probe.overlay_focused();

        let burst = match gesture {
            Gesture::OpenOverlay if probe.target_focused() => self.gestures.open_overlay(),
            Gesture::DismissClear if overlay_active() => self.gestures.dismiss(true),
            Gesture::Dismiss if overlay_active() => self.gestures.dismiss(false),
            Gesture::ClearInput if overlay_active() => self.gestures.clear_input(),
            Gesture::FocusOverlay if probe.overlay_visible() && probe.target_focused() => {
                self.gestures.focus_overlay()
            }
            Gesture::RestoreOverlay if overlay_active() => self.gestures.restore(true),
            Gesture::ToggleFocus => self.gestures.toggle_focus(),
            Gesture::Quit => {
                self.shutdown.request_stop(
                    ExitReason::ExitKeyPress,
                    "Thanks for using ffchat",
                    false,
                );
                return Some(gesture);
            }
            _ => {
                trace!(?gesture, "precondition not met");
                return None;
            }
        };

        debug!(?gesture, tasks = burst.len(), "hotkey");
        self.queue.push_batch(burst);
        Some(gesture)
    }

    /// Wrap the router as a listener callback.
    pub fn into_sink(self) -> KeySink {
        Box::new(move |event| {
            self.on_key(&event);
        })
    }
}
