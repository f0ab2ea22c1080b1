// src/engine/state.rs

//! Cross-thread coordination state.
//!
//! Everything the workers, the key listener and the owner thread need to
//! agree on lives here and is shared as `Arc<SharedState>`:
//! - the global pause deadline set by `App.Wait`,
//! - the single-flight drain flag,
//! - the write-once stop record,
//! - a mirror of overlay visibility for threads that cannot touch the
//!   overlay itself,
//! - the target id cached at startup.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::{Duration, Instant};

use crate::types::{ExitReason, WindowId};

/// Result of consulting the pause deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseStatus {
    /// No deadline was set.
    Clear,
    /// A deadline is set and still in the future.
    Pending(Duration),
    /// A deadline was set, has been reached, and is now cleared.
    Elapsed,
}

/// First accepted shutdown request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRecord {
    pub reason: ExitReason,
    pub extra_message: String,
}

#[derive(Debug, Default)]
pub struct SharedState {
    pause_until: Mutex<Option<Instant>>,
    draining: AtomicBool,
    stop: OnceLock<StopRecord>,
    exited: AtomicBool,
    overlay_visible: AtomicBool,
    target: Mutex<Option<WindowId>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- pause deadline -------------------------------------------------

    /// Suspend draining for `delay` from now, replacing any earlier deadline.
    pub fn pause_for(&self, delay: Duration) {
        *lock(&self.pause_until) = Some(Instant::now() + delay);
    }

    pub fn pause_deadline(&self) -> Option<Instant> {
        *lock(&self.pause_until)
    }

    /// Check the deadline against the clock, clearing it once reached.
    pub fn check_pause(&self) -> PauseStatus {
        let mut deadline = lock(&self.pause_until);
        match *deadline {
            None => PauseStatus::Clear,
            Some(at) => {
                let now = Instant::now();
                if now < at {
                    PauseStatus::Pending(at - now)
                } else {
                    *deadline = None;
                    PauseStatus::Elapsed
                }
            }
        }
    }

    // ---- single-flight drain --------------------------------------------

    /// Try to become the only active drain pass.
    ///
    /// Returns `None` if another pass holds the flag. The flag is released
    /// when the guard drops, including during unwinding.
    pub fn try_begin_drain(&self) -> Option<DrainGuard<'_>> {
        self.draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DrainGuard { flag: &self.draining })
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    // ---- stop record ----------------------------------------------------

    /// Store the stop reason if none was stored yet. Returns whether this
    /// call was the one that stuck.
    pub fn record_stop(&self, reason: ExitReason, extra_message: impl Into<String>) -> bool {
        self.stop
            .set(StopRecord {
                reason,
                extra_message: extra_message.into(),
            })
            .is_ok()
    }

    pub fn stopping(&self) -> bool {
        self.stop.get().is_some()
    }

    pub fn stop_record(&self) -> Option<&StopRecord> {
        self.stop.get()
    }

    /// Set by the exit handler once teardown is complete.
    pub fn mark_exited(&self) {
        self.exited.store(true, Ordering::Release);
    }

    pub fn exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
    }

    // ---- mirrors --------------------------------------------------------

    pub fn set_overlay_visible(&self, visible: bool) {
        self.overlay_visible.store(visible, Ordering::Release);
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible.load(Ordering::Acquire)
    }

    pub fn store_target(&self, id: Option<WindowId>) {
        *lock(&self.target) = id;
    }

    pub fn cached_target(&self) -> Option<WindowId> {
        lock(&self.target).clone()
    }
}

/// Scoped ownership of the drain flag.
#[derive(Debug)]
pub struct DrainGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
