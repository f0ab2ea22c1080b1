// src/config/validate.rs

use crate::config::model::{ConfigFile, OverlaySection, RawConfigFile, TimingSection};
use crate::engine::KeyBindings;
use crate::errors::{FfchatError, Result};
use crate::keys::Chord;
use crate::types::Size;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FfchatError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let bindings = parse_bindings(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.target.normalized(),
            raw.overlay,
            raw.layouts,
            raw.timing,
            raw.platform,
            bindings,
        ))
    }
}

/// Re-check a config whose target was overridden after loading.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_target_filter(cfg.target.name.as_deref(), cfg.target.class.as_deref())
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_target_filter(cfg.target.name.as_deref(), cfg.target.class.as_deref())?;
    validate_overlay(&cfg.overlay)?;
    validate_layouts(cfg)?;
    validate_timing(&cfg.timing)?;
    Ok(())
}

fn ensure_target_filter(name: Option<&str>, class: Option<&str>) -> Result<()> {
    let blank = |v: Option<&str>| v.is_none_or(|s| s.trim().is_empty());
    if blank(name) && blank(class) {
        return Err(FfchatError::ConfigError(
            "[target] needs a non-empty `name` or `class`".to_string(),
        ));
    }
    Ok(())
}

fn validate_overlay(overlay: &OverlaySection) -> Result<()> {
    if overlay.title.trim().is_empty() {
        return Err(FfchatError::ConfigError(
            "[overlay].title must not be empty".to_string(),
        ));
    }
    ensure_positive("[overlay].size", overlay.size)?;
    ensure_positive("[overlay].resolution", overlay.resolution)?;

    if overlay.size.width > overlay.resolution.width
        || overlay.size.height > overlay.resolution.height
    {
        return Err(FfchatError::ConfigError(format!(
            "[overlay].size {}x{} does not fit the {}x{} resolution",
            overlay.size.width,
            overlay.size.height,
            overlay.resolution.width,
            overlay.resolution.height
        )));
    }

    let (x, y) = (overlay.position.x, overlay.position.y);
    if x.unsigned_abs() > overlay.resolution.width.unsigned_abs()
        || y.unsigned_abs() > overlay.resolution.height.unsigned_abs()
    {
        return Err(FfchatError::ConfigError(format!(
            "[overlay].position ({x}, {y}) is off the {}x{} screen",
            overlay.resolution.width, overlay.resolution.height
        )));
    }
    Ok(())
}

fn ensure_positive(field: &str, size: Size) -> Result<()> {
    if size.width <= 0 || size.height <= 0 {
        return Err(FfchatError::ConfigError(format!(
            "{field} must be positive (got {}x{})",
            size.width, size.height
        )));
    }
    Ok(())
}

fn validate_layouts(cfg: &RawConfigFile) -> Result<()> {
    for (field, value) in [
        ("overlay", &cfg.layouts.overlay),
        ("target", &cfg.layouts.target),
    ] {
        if value.trim().is_empty() {
            return Err(FfchatError::ConfigError(format!(
                "[layouts].{field} must not be empty"
            )));
        }
    }
    Ok(())
}

fn validate_timing(timing: &TimingSection) -> Result<()> {
    if timing.tick_ms == 0 {
        return Err(FfchatError::ConfigError(
            "[timing].tick_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if timing.watchdog_ms == 0 {
        return Err(FfchatError::ConfigError(
            "[timing].watchdog_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn parse_bindings(cfg: &RawConfigFile) -> Result<KeyBindings> {
    let mut bindings = KeyBindings::default();

    for (name, chord) in cfg.keys.iter() {
        let parsed: Chord = chord.parse().map_err(|e| {
            FfchatError::ConfigError(format!("[keys].{name}: invalid chord {chord:?}: {e}"))
        })?;

        let slot = match name.as_str() {
            "open_overlay" => &mut bindings.open_overlay,
            "dismiss_clear" => &mut bindings.dismiss_clear,
            "dismiss" => &mut bindings.dismiss,
            "clear_input" => &mut bindings.clear_input,
            "focus_overlay" => &mut bindings.focus_overlay,
            "restore_overlay" => &mut bindings.restore_overlay,
            "quit" => &mut bindings.quit,
            "toggle_focus" => {
                bindings.toggle_focus = Some(parsed);
                continue;
            }
            other => {
                return Err(FfchatError::ConfigError(format!(
                    "[keys] has unknown gesture '{other}'"
                )));
            }
        };
        *slot = parsed;
    }

    Ok(bindings)
}
