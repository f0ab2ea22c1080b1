// tests/parsing.rs

use ffchat::cli::LogLevel;
use ffchat::keys::{Chord, Key, KeyEvent};
use ffchat::logging::resolve_level;
use ffchat::platform::command::parse_wmctrl_line;
use ffchat::platform::stdin_keys::StdinCommand;
use ffchat::types::{Placement, Position, Size, WindowId};

#[test]
fn chords_parse_with_aliases() {
    let chord: Chord = "Ctrl_L + Return".parse().unwrap();
    assert_eq!(chord, Chord::new([Key::Ctrl], Key::Enter));
    assert_eq!(chord.to_string(), "ctrl+enter");

    let chord: Chord = "shift+f8".parse().unwrap();
    assert_eq!(chord, Chord::new([Key::Shift], Key::F(8)));

    let chord: Chord = "d".parse().unwrap();
    assert!(chord.modifiers.is_empty());
    assert_eq!(chord.key, Key::Char('d'));
}

#[test]
fn chords_reject_garbage() {
    assert!("".parse::<Chord>().is_err());
    assert!("ctrl+".parse::<Chord>().is_err());
    assert!("a+b".parse::<Chord>().is_err(), "non-modifier prefix");
    assert!("ctrl+f99".parse::<Chord>().is_err());
    assert!("ctrl+pageup".parse::<Chord>().is_err());
}

#[test]
fn chord_matching_needs_every_modifier_held() {
    let chord = Chord::new([Key::Ctrl], Key::Char('d'));

    assert!(chord.matches(&KeyEvent::new(Key::Char('d'), [Key::Ctrl, Key::Char('d')])));
    assert!(chord.matches(&KeyEvent::new(
        Key::Char('d'),
        [Key::Ctrl, Key::Shift, Key::Char('d')]
    )));
    assert!(!chord.matches(&KeyEvent::new(Key::Char('d'), [Key::Char('d')])));
    assert!(!chord.matches(&KeyEvent::new(Key::Char('e'), [Key::Ctrl])));
}

#[test]
fn placement_anchors_negative_offsets_from_the_far_edge() {
    let placement = Placement {
        resolution: Size::new(1920, 1080),
        size: Size::new(900, 160),
        offset: Position::new(-20, -200),
    };
    assert_eq!(placement.resolve(), Position::new(1920 - 900 - 20, 1080 - 160 - 200));

    let placement = Placement {
        offset: Position::new(0, 35),
        ..placement
    };
    assert_eq!(placement.resolve(), Position::new(1, 35));
}

#[test]
fn extreme_negative_offset_does_not_overflow() {
    let placement = Placement {
        resolution: Size::new(1920, 1080),
        size: Size::new(900, 160),
        offset: Position::new(i32::MIN, -10),
    };
    assert_eq!(placement.resolve(), Position::new(i32::MIN + 1020, 1080 - 160 - 10));

    let placement = Placement {
        resolution: Size::new(100, 100),
        size: Size::new(i32::MAX, 10),
        offset: Position::new(i32::MIN, -1),
    };
    assert_eq!(placement.resolve(), Position::new(i32::MIN, 100 - 10 - 1));
}

#[test]
fn wmctrl_rows_keep_titles_with_spaces() {
    let info = parse_wmctrl_line(
        "0x04200007  0 ffxiv_dx11.exe.ffxiv_dx11.exe  host FINAL FANTASY XIV",
    )
    .unwrap();
    assert_eq!(info.id, WindowId::new("0x04200007"));
    assert_eq!(info.desktop, "0");
    assert_eq!(info.class, "ffxiv_dx11.exe.ffxiv_dx11.exe");
    assert_eq!(info.name, "FINAL FANTASY XIV");

    let untitled = parse_wmctrl_line("0x01 -1 panel.Panel host").unwrap();
    assert_eq!(untitled.name, "");

    assert!(parse_wmctrl_line("0x01 0").is_none());
    assert!(parse_wmctrl_line("").is_none());
}

#[test]
fn stdin_commands() {
    assert_eq!(StdinCommand::parse("   ").unwrap(), None);
    assert_eq!(StdinCommand::parse("# comment").unwrap(), None);
    assert_eq!(StdinCommand::parse("submit").unwrap(), Some(StdinCommand::Submit));
    assert_eq!(
        StdinCommand::parse("text hola mundo").unwrap(),
        Some(StdinCommand::Text("hola mundo".into()))
    );

    match StdinCommand::parse("key ctrl+enter").unwrap() {
        Some(StdinCommand::Key(event)) => {
            assert_eq!(event.key, Key::Enter);
            assert!(event.pressed.contains(&Key::Ctrl));
        }
        other => panic!("expected a key event, got {other:?}"),
    }

    assert!(StdinCommand::parse("jump").is_err());
    assert!(StdinCommand::parse("key ctrl+").is_err());
}

#[test]
fn log_level_priority() {
    assert_eq!(
        resolve_level(Some(LogLevel::Debug), Some("error")),
        tracing::Level::DEBUG
    );
    assert_eq!(resolve_level(None, Some(" Warning ")), tracing::Level::WARN);
    assert_eq!(resolve_level(None, Some("loud")), tracing::Level::INFO);
    assert_eq!(resolve_level(None, None), tracing::Level::INFO);
}
