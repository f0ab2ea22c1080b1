// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::{Gestures, KeyBindings};
use crate::locate::WindowFilter;
use crate::platform::command::FocusBackend;
use crate::types::{Placement, Position, Size};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [target]
/// name = "FINAL FANTASY XIV"
///
/// [overlay]
/// title = "FFChat"
/// size = [900, 160]
/// position = [510, -200]
/// resolution = [1920, 1080]
///
/// [layouts]
/// overlay = "mozc"
/// target = "keyboard-es"
///
/// [timing]
/// settle_ms = 100
/// paste_ms = 150
///
/// [keys]
/// open_overlay = "ctrl+enter"
/// quit = "shift+f8"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub target: TargetSection,

    #[serde(default)]
    pub overlay: OverlaySection,

    #[serde(default)]
    pub layouts: LayoutSection,

    #[serde(default)]
    pub timing: TimingSection,

    /// Chord strings keyed by gesture name. Unlisted gestures keep their
    /// default chord.
    #[serde(default)]
    pub keys: BTreeMap<String, String>,

    #[serde(default)]
    pub platform: PlatformSection,
}

/// `[target]`: which window the overlay types into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetSection {
    /// Exact window title.
    #[serde(default)]
    pub name: Option<String>,

    /// Exact WM class, as `wmctrl -lx` prints it (e.g. `discord.discord`).
    #[serde(default)]
    pub class: Option<String>,
}

impl TargetSection {
    /// Blank predicates are treated as unset.
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            name: keep(self.name),
            class: keep(self.class),
        }
    }
}

impl Default for TargetSection {
    fn default() -> Self {
        Self {
            name: Some("FINAL FANTASY XIV".to_string()),
            class: None,
        }
    }
}

/// `[overlay]`: title and geometry of the overlay window.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OverlaySection {
    #[serde(default = "default_overlay_title")]
    pub title: String,

    #[serde(default = "default_overlay_size")]
    pub size: Size,

    /// Negative values anchor from the right/bottom edge.
    #[serde(default = "default_overlay_position")]
    pub position: Position,

    #[serde(default = "default_resolution")]
    pub resolution: Size,
}

fn default_overlay_title() -> String {
    "FFChat".to_string()
}

fn default_overlay_size() -> Size {
    Size::new(900, 160)
}

fn default_overlay_position() -> Position {
    Position::new(510, -200)
}

fn default_resolution() -> Size {
    Size::new(1920, 1080)
}

impl Default for OverlaySection {
    fn default() -> Self {
        Self {
            title: default_overlay_title(),
            size: default_overlay_size(),
            position: default_overlay_position(),
            resolution: default_resolution(),
        }
    }
}

/// `[layouts]`: input method names passed to the layout switcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayoutSection {
    #[serde(default = "default_overlay_layout")]
    pub overlay: String,

    #[serde(default = "default_target_layout")]
    pub target: String,
}

fn default_overlay_layout() -> String {
    "mozc".to_string()
}

fn default_target_layout() -> String {
    "keyboard-es".to_string()
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            overlay: default_overlay_layout(),
            target: default_target_layout(),
        }
    }
}

/// `[timing]`, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimingSection {
    /// Pause after focus changes inside gestures.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Pause between paste and clipboard restore.
    #[serde(default = "default_paste_ms")]
    pub paste_ms: u64,

    /// Control worker tick.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Watchdog check interval.
    #[serde(default = "default_watchdog_ms")]
    pub watchdog_ms: u64,
}

fn default_settle_ms() -> u64 {
    100
}

fn default_paste_ms() -> u64 {
    150
}

fn default_tick_ms() -> u64 {
    5
}

fn default_watchdog_ms() -> u64 {
    1000
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            paste_ms: default_paste_ms(),
            tick_ms: default_tick_ms(),
            watchdog_ms: default_watchdog_ms(),
        }
    }
}

/// `[platform]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PlatformSection {
    /// `"bspc"` (default) or `"wmctrl"`.
    #[serde(default)]
    pub focus: FocusBackend,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (or
/// [`ConfigFile::new_unchecked`] for code that has already validated).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub target: TargetSection,
    pub overlay: OverlaySection,
    pub layouts: LayoutSection,
    pub timing: TimingSection,
    pub platform: PlatformSection,
    bindings: KeyBindings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            TargetSection::default(),
            OverlaySection::default(),
            LayoutSection::default(),
            TimingSection::default(),
            PlatformSection::default(),
            KeyBindings::default(),
        )
    }
}

impl ConfigFile {
    pub fn new_unchecked(
        target: TargetSection,
        overlay: OverlaySection,
        layouts: LayoutSection,
        timing: TimingSection,
        platform: PlatformSection,
        bindings: KeyBindings,
    ) -> Self {
        Self {
            target,
            overlay,
            layouts,
            timing,
            platform,
            bindings,
        }
    }

    /// Replace the target predicates, e.g. from command-line flags.
    ///
    /// Passing only one of the two clears the other, so the override is
    /// never mixed with the file's filter.
    pub fn override_target(&mut self, name: Option<String>, class: Option<String>) {
        if name.is_some() || class.is_some() {
            self.target = TargetSection { name, class }.normalized();
        }
    }

    pub fn target_filter(&self) -> WindowFilter {
        WindowFilter {
            name: self.target.name.clone(),
            class: self.target.class.clone(),
        }
    }

    /// The overlay is found by its title.
    pub fn overlay_filter(&self) -> WindowFilter {
        WindowFilter::by_name(self.overlay.title.clone())
    }

    pub fn placement(&self) -> Placement {
        Placement {
            resolution: self.overlay.resolution,
            size: self.overlay.size,
            offset: self.overlay.position,
        }
    }

    pub fn gestures(&self) -> Gestures {
        Gestures {
            settle: Duration::from_millis(self.timing.settle_ms),
            paste: Duration::from_millis(self.timing.paste_ms),
            overlay_layout: self.layouts.overlay.clone(),
            target_layout: self.layouts.target.clone(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.timing.tick_ms)
    }

    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_millis(self.timing.watchdog_ms)
    }
}
