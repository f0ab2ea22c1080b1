// src/config/mod.rs

//! Configuration loading and validation for ffchat.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it and parse hotkey chords (`validate.rs`).
//!
//! The config is loaded once at startup and read-only afterwards.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    ConfigFile, LayoutSection, OverlaySection, PlatformSection, RawConfigFile, TargetSection,
    TimingSection,
};
pub use validate::validate_config;
