// src/engine/gestures.rs

//! User gestures expanded into ordered task bursts.
//!
//! Every gesture is a plain `Vec<TaskPacket>` pushed with
//! [`TaskQueue::push_batch`](super::queue::TaskQueue::push_batch), so the
//! burst stays contiguous in the queue and runs in order, pausing only at
//! its own `App.Wait` packets.

use std::time::Duration;

use super::task::{AppTask, OverlayTask, TargetTask, TaskKind, TaskPacket};
use crate::keys::Key;

/// Timings and layout names every gesture needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gestures {
    /// Delay that lets the window manager catch up after a focus change.
    pub settle: Duration,
    /// Delay between pasting and clearing, so the target reads the clipboard
    /// before it is restored.
    pub paste: Duration,
    /// Input method used while typing in the overlay.
    pub overlay_layout: String,
    /// Input method restored for the target window.
    pub target_layout: String,
}

impl Gestures {
    /// Copy the overlay text into the target and return to the target.
    pub fn send_message(&self) -> Vec<TaskPacket> {
        vec![
            TaskPacket::new(TaskKind::App(AppTask::SaveClipboard)),
            TaskPacket::new(TaskKind::Overlay(OverlayTask::CopyInput)),
            TaskPacket::new(TaskKind::Target(TargetTask::Focus)),
            TaskPacket::new(TaskKind::Overlay(OverlayTask::Hide)),
            TaskPacket::wait(self.settle),
            TaskPacket::keystroke(vec![Key::Ctrl, Key::Char('v')]),
            TaskPacket::wait(self.paste),
            TaskPacket::new(TaskKind::Overlay(OverlayTask::ClearInput)),
            TaskPacket::new(TaskKind::App(AppTask::RestoreClipboard)),
            TaskPacket::switch_keyboard(&self.target_layout),
            TaskPacket::keystroke(vec![Key::Enter]),
        ]
    }

    /// Bring the overlay up over the target and switch to the overlay layout.
    pub fn open_overlay(&self) -> Vec<TaskPacket> {
        vec![
            TaskPacket::wait(self.settle),
            TaskPacket::new(TaskKind::Overlay(OverlayTask::Show)),
            TaskPacket::new(TaskKind::Overlay(OverlayTask::Focus)),
            TaskPacket::switch_keyboard(&self.overlay_layout),
        ]
    }

    /// Hide the overlay and hand the keyboard back to the target.
    ///
    /// The trailing Escape closes the target's own chat line.
    pub fn dismiss(&self, clear_input: bool) -> Vec<TaskPacket> {
        let mut burst = vec![TaskPacket::new(TaskKind::Overlay(OverlayTask::Hide))];
        if clear_input {
            burst.push(TaskPacket::new(TaskKind::Overlay(OverlayTask::ClearInput)));
        }
        burst.extend([
            TaskPacket::switch_keyboard(&self.target_layout),
            TaskPacket::wait(self.settle),
            TaskPacket::keystroke(vec![Key::Escape]),
        ]);
        burst
    }

    pub fn clear_input(&self) -> Vec<TaskPacket> {
        vec![TaskPacket::new(TaskKind::Overlay(OverlayTask::ClearInput))]
    }

    pub fn focus_overlay(&self) -> Vec<TaskPacket> {
        vec![TaskPacket::new(TaskKind::Overlay(OverlayTask::Focus))]
    }

    pub fn toggle_focus(&self) -> Vec<TaskPacket> {
        vec![TaskPacket::new(TaskKind::App(AppTask::ToggleFocus))]
    }

    /// Move the overlay back to its configured place, optionally showing it.
    pub fn restore(&self, show: bool) -> Vec<TaskPacket> {
        vec![restore_packet(show)]
    }

    /// Used by `Overlay.Restore` when the overlay is visible: it cannot be
    /// moved while shown, so hide it, let focus return to the target, and
    /// retry.
    pub fn restore_hidden_first(&self, show: bool) -> Vec<TaskPacket> {
        vec![
            TaskPacket::new(TaskKind::Overlay(OverlayTask::Hide)),
            TaskPacket::new(TaskKind::Target(TargetTask::Focus)),
            TaskPacket::wait(self.settle),
            restore_packet(show),
        ]
    }
}

fn restore_packet(show: bool) -> TaskPacket {
    TaskPacket::with_args(TaskKind::Overlay(OverlayTask::Restore), vec![show.into()])
}
