// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use tempfile::{NamedTempFile, tempdir};

use ffchat::config::{load_and_validate, load_or_default};
use ffchat::errors::FfchatError;
use ffchat::keys::{Chord, Key};
use ffchat::locate::WindowFilter;
use ffchat::platform::command::FocusBackend;
use ffchat::types::{Position, Size};
use ffchat_test_utils::builders::ConfigFileBuilder;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str, needle: &str) {
    let file = write_config(contents);
    match load_and_validate(file.path()) {
        Err(FfchatError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} should mention {needle:?}")
        }
        Err(e) => panic!("Expected ConfigError, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn full_file_is_loaded() {
    let file = write_config(
        r#"
[target]
class = "discord.discord"

[overlay]
title = "Chat Overlay"
size = [730, 450]
position = [0, -10]
resolution = [2560, 1440]

[layouts]
overlay = "anthy"
target = "keyboard-us"

[timing]
settle_ms = 80
paste_ms = 200
tick_ms = 10
watchdog_ms = 500

[keys]
open_overlay = "ctrl+shift+enter"
toggle_focus = "alt+tab"

[platform]
focus = "wmctrl"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.target_filter(), WindowFilter::by_class("discord.discord"));
    assert_eq!(cfg.overlay_filter(), WindowFilter::by_name("Chat Overlay"));

    let placement = cfg.placement();
    assert_eq!(placement.size, Size::new(730, 450));
    assert_eq!(placement.resolve(), Position::new(1, 1440 - 450 - 10));

    let gestures = cfg.gestures();
    assert_eq!(gestures.settle, Duration::from_millis(80));
    assert_eq!(gestures.paste, Duration::from_millis(200));
    assert_eq!(gestures.overlay_layout, "anthy");
    assert_eq!(gestures.target_layout, "keyboard-us");
    assert_eq!(cfg.tick(), Duration::from_millis(10));
    assert_eq!(cfg.watchdog_interval(), Duration::from_millis(500));

    let bindings = cfg.bindings();
    assert_eq!(
        bindings.open_overlay,
        Chord::new([Key::Ctrl, Key::Shift], Key::Enter)
    );
    assert_eq!(bindings.toggle_focus, Some(Chord::new([Key::Alt], Key::Tab)));
    // Unlisted gestures keep their defaults.
    assert_eq!(bindings.quit, Chord::new([Key::Shift], Key::F(8)));

    assert_eq!(cfg.platform.focus, FocusBackend::Wmctrl);
}

#[test]
fn empty_file_uses_defaults() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.target_filter(), WindowFilter::by_name("FINAL FANTASY XIV"));
    assert_eq!(cfg.overlay.title, "FFChat");
    assert_eq!(cfg.placement().resolve(), Position::new(510, 720));
    assert_eq!(cfg.gestures().settle, Duration::from_millis(100));
    assert_eq!(cfg.gestures().paste, Duration::from_millis(150));
    assert_eq!(cfg.platform.focus, FocusBackend::Bspc);
    assert!(cfg.bindings().toggle_focus.is_none());
}

#[test]
fn missing_default_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let cfg = load_or_default(dir.path().join("FFChat.toml")).unwrap();
    assert_eq!(cfg.overlay.title, "FFChat");
}

#[test]
fn missing_explicit_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let result = load_and_validate(dir.path().join("nope.toml"));
    assert!(matches!(result, Err(FfchatError::IoError(_))));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_config("[overlay\ntitle = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(FfchatError::TomlError(_))
    ));
}

#[test]
fn target_needs_a_name_or_class() {
    expect_config_error("[target]\nname = \"  \"\n", "[target]");
}

#[test]
fn overlay_size_must_be_positive() {
    expect_config_error("[overlay]\nsize = [0, 160]\n", "[overlay].size");
}

#[test]
fn overlay_must_fit_the_screen() {
    expect_config_error(
        "[overlay]\nsize = [2000, 160]\nresolution = [1920, 1080]\n",
        "does not fit",
    );
}

#[test]
fn overlay_position_must_stay_on_screen() {
    expect_config_error("[overlay]\nposition = [-2147483648, 0]\n", "[overlay].position");
    expect_config_error("[overlay]\nposition = [0, 1081]\n", "[overlay].position");

    let file = write_config("[overlay]\nposition = [-1920, 1080]\n");
    assert!(load_and_validate(file.path()).is_ok());
}

#[test]
fn blank_target_predicates_are_dropped() {
    let file = write_config("[target]\nname = \"\"\nclass = \"game.exe\"\n");
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.target.name, None);
    assert_eq!(cfg.target_filter(), WindowFilter::by_class("game.exe"));

    let mut cfg = ConfigFileBuilder::new().build();
    cfg.override_target(Some(" ".to_string()), Some("kitty.kitty".to_string()));
    assert_eq!(cfg.target_filter(), WindowFilter::by_class("kitty.kitty"));
}

#[test]
fn zero_tick_is_rejected() {
    expect_config_error("[timing]\ntick_ms = 0\n", "tick_ms");
}

#[test]
fn bad_chord_is_rejected() {
    expect_config_error("[keys]\nquit = \"f8+shift\"\n", "[keys].quit");
}

#[test]
fn unknown_gesture_is_rejected() {
    expect_config_error("[keys]\nlaunch_rockets = \"ctrl+x\"\n", "launch_rockets");
}

#[test]
fn cli_override_replaces_both_predicates() {
    let mut cfg = ConfigFileBuilder::new().with_target_name("Game").build();
    cfg.override_target(None, Some("kitty.kitty".to_string()));
    assert_eq!(cfg.target_filter(), WindowFilter::by_class("kitty.kitty"));

    cfg.override_target(None, None);
    assert_eq!(cfg.target_filter(), WindowFilter::by_class("kitty.kitty"));
}
