// src/types.rs

use std::fmt;

use serde::Deserialize;

/// Why the process is shutting down.
///
/// Recorded once by the shutdown sequencer; every later request is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitReason {
    ExitKeyPress,
    TargetDied,
    MultipleTargets,
    MultipleOverlays,
    TargetNotFound,
    OverlayNotFound,
    Interrupted,
    WmProblems,
    Unknown,
}

impl ExitReason {
    /// Human readable description printed on shutdown.
    pub fn message(self) -> &'static str {
        match self {
            ExitReason::ExitKeyPress => "Exit due to key press.",
            ExitReason::TargetDied => "The target process has died.",
            ExitReason::MultipleTargets => "More targets than expected were found.",
            ExitReason::MultipleOverlays => "More overlay windows than expected were found.",
            ExitReason::TargetNotFound => "The target process could not be found.",
            ExitReason::OverlayNotFound => "The overlay window could not be found.",
            ExitReason::Interrupted => "Interrupted by signal.",
            ExitReason::WmProblems => "The window manager is not responding as expected.",
            ExitReason::Unknown => "An unknown reason for exit occurred.",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Opaque identifier of a window owned by the external window manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Width / height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "(i32, i32)")]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self { width, height }
    }
}

/// Screen coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "(i32, i32)")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Overlay geometry relative to the screen.
///
/// Offsets follow the "anchor from the far edge" convention: a negative
/// offset is measured from the right/bottom edge, zero pins to pixel 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub resolution: Size,
    pub size: Size,
    pub offset: Position,
}

impl Placement {
    /// Absolute top-left corner for the overlay.
    pub fn resolve(&self) -> Position {
        Position {
            x: resolve_axis(self.resolution.width, self.size.width, self.offset.x),
            y: resolve_axis(self.resolution.height, self.size.height, self.offset.y),
        }
    }
}

fn resolve_axis(screen: i32, extent: i32, offset: i32) -> i32 {
    match offset {
        o if o < 0 => screen
            .saturating_sub(extent)
            .saturating_sub_unsigned(o.unsigned_abs()),
        0 => 1,
        o => o,
    }
}
