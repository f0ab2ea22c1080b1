#![allow(dead_code)]

use ffchat::config::{ConfigFile, RawConfigFile};
use ffchat::errors::Result;
use ffchat::types::{Position, Size};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_target_name(mut self, name: &str) -> Self {
        self.config.target.name = Some(name.to_string());
        self.config.target.class = None;
        self
    }

    pub fn with_target_class(mut self, class: &str) -> Self {
        self.config.target.name = None;
        self.config.target.class = Some(class.to_string());
        self
    }

    pub fn with_overlay_title(mut self, title: &str) -> Self {
        self.config.overlay.title = title.to_string();
        self
    }

    pub fn with_geometry(mut self, size: (i32, i32), position: (i32, i32)) -> Self {
        self.config.overlay.size = Size::from(size);
        self.config.overlay.position = Position::from(position);
        self
    }

    pub fn with_timing(mut self, settle_ms: u64, paste_ms: u64) -> Self {
        self.config.timing.settle_ms = settle_ms;
        self.config.timing.paste_ms = paste_ms;
        self
    }

    pub fn with_tick(mut self, tick_ms: u64, watchdog_ms: u64) -> Self {
        self.config.timing.tick_ms = tick_ms;
        self.config.timing.watchdog_ms = watchdog_ms;
        self
    }

    pub fn with_key(mut self, gesture: &str, chord: &str) -> Self {
        self.config.keys.insert(gesture.to_string(), chord.to_string());
        self
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
