// src/locate.rs

//! Bounded-retry window resolution.
//!
//! The window manager may lag behind reality (a window that was just mapped
//! is not listed yet), so "nothing found" is retried a few times. "More than
//! one found" is never retried: waiting does not make a filter less
//! ambiguous.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, trace};

use crate::engine::ShutdownSequencer;
use crate::platform::WindowQuery;
use crate::types::{ExitReason, WindowId};

/// Number of refresh-and-filter attempts before reporting absence.
pub const LOCATE_ATTEMPTS: usize = 10;
/// Sleep between two attempts.
pub const LOCATE_INTERVAL: Duration = Duration::from_millis(50);

/// Equality predicates on window name and class. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowFilter {
    pub name: Option<String>,
    pub class: Option<String>,
}

impl WindowFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            class: None,
        }
    }

    pub fn by_class(class: impl Into<String>) -> Self {
        Self {
            name: None,
            class: Some(class.into()),
        }
    }

    /// Neither predicate is set, so the filter matches every window.
    pub fn is_unset(&self) -> bool {
        self.name.is_none() && self.class.is_none()
    }

    /// `self`, or `fallback` when `self` has no predicate at all.
    pub fn or<'a>(&'a self, fallback: &'a WindowFilter) -> &'a WindowFilter {
        if self.is_unset() { fallback } else { self }
    }

    pub fn matches(&self, name: &str, class: &str) -> bool {
        self.name.as_deref().is_none_or(|n| n == name)
            && self.class.as_deref().is_none_or(|c| c == class)
    }
}

/// Result of a locate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateOutcome {
    Found(WindowId),
    /// More than one window matched on some attempt.
    Ambiguous(Vec<WindowId>),
    /// No window matched on any attempt.
    Absent,
}

/// Which window is being located; decides the exit reason on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateRole {
    /// First resolution of the target at startup.
    Startup,
    /// Re-resolution of the target while running.
    Target,
    Overlay,
}

impl LocateRole {
    fn failure(self, outcome: &LocateOutcome) -> (ExitReason, String) {
        match (self, outcome) {
            (LocateRole::Overlay, LocateOutcome::Ambiguous(ids)) => (
                ExitReason::MultipleOverlays,
                format!("Found several overlay windows ({}).", join_ids(ids)),
            ),
            (_, LocateOutcome::Ambiguous(ids)) => (
                ExitReason::MultipleTargets,
                format!(
                    "Found several windows matching the target ({}); narrow the filter.",
                    join_ids(ids)
                ),
            ),
            (LocateRole::Startup, _) => (
                ExitReason::TargetNotFound,
                "Target not found at startup. Open it before starting ffchat.".to_string(),
            ),
            (LocateRole::Target, _) => (
                ExitReason::TargetDied,
                "Target no longer found, stopping.".to_string(),
            ),
            (LocateRole::Overlay, _) => (
                ExitReason::OverlayNotFound,
                "Overlay window not found, stopping.".to_string(),
            ),
        }
    }
}

/// Resolves filters to exactly one live window.
#[derive(Clone)]
pub struct Locator {
    windows: Arc<dyn WindowQuery>,
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator").finish_non_exhaustive()
    }
}

impl Locator {
    pub fn new(windows: Arc<dyn WindowQuery>) -> Self {
        Self { windows }
    }

    pub fn windows(&self) -> &Arc<dyn WindowQuery> {
        &self.windows
    }

    /// Find the single window matching `filter`.
    ///
    /// Up to [`LOCATE_ATTEMPTS`] attempts, [`LOCATE_INTERVAL`] apart. Each
    /// attempt refreshes the window list first; a failed refresh counts as
    /// an attempt that saw the previous list.
    pub fn locate(&self, filter: &WindowFilter) -> LocateOutcome {
        for attempt in 1..=LOCATE_ATTEMPTS {
            if let Err(err) = self.windows.refresh() {
                debug!(attempt, error = %err, "window list refresh failed");
            }

            let mut found = self.windows.find(filter);
            match found.len() {
                0 => trace!(attempt, ?filter, "no window matched"),
                1 => return LocateOutcome::Found(found.remove(0)),
                _ => {
                    debug!(?filter, candidates = ?found, "filter is ambiguous");
                    return LocateOutcome::Ambiguous(found);
                }
            }

            if attempt < LOCATE_ATTEMPTS {
                thread::sleep(LOCATE_INTERVAL);
            }
        }

        debug!(?filter, attempts = LOCATE_ATTEMPTS, "window not found");
        LocateOutcome::Absent
    }

    /// Like [`locate`](Self::locate), but ambiguity and absence shut the
    /// process down instead of being returned.
    pub fn locate_or_shutdown(
        &self,
        filter: &WindowFilter,
        role: LocateRole,
        shutdown: &ShutdownSequencer,
    ) -> Option<WindowId> {
        let outcome = self.locate(filter);
        match outcome {
            LocateOutcome::Found(id) => Some(id),
            LocateOutcome::Ambiguous(_) | LocateOutcome::Absent => {
                let (reason, message) = role.failure(&outcome);
                error!(?role, %reason, "{message}");
                shutdown.request_stop(reason, message, false);
                None
            }
        }
    }

    /// True when `filter` resolves to the currently focused window.
    pub fn is_active(&self, filter: &WindowFilter) -> bool {
        match self.locate(filter) {
            LocateOutcome::Found(id) => self.windows.active_id().as_ref() == Some(&id),
            LocateOutcome::Ambiguous(_) | LocateOutcome::Absent => false,
        }
    }
}

fn join_ids(ids: &[WindowId]) -> String {
    ids.iter().map(WindowId::as_str).collect::<Vec<_>>().join(", ")
}
