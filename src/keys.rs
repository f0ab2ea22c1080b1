// src/keys.rs

//! Key model shared by the key listener, the keystroke injector and the
//! hotkey bindings.
//!
//! Chords are written the way users type them in the config file:
//! `"ctrl+enter"`, `"shift+f8"`, `"ctrl+d"`. Modifier names are
//! case-insensitive; the last segment is the key itself.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Ctrl,
    Shift,
    Alt,
    Super,
    Enter,
    Escape,
    Space,
    Tab,
    Backspace,
    F(u8),
    Char(char),
}

impl Key {
    pub fn is_modifier(self) -> bool {
        matches!(self, Key::Ctrl | Key::Shift | Key::Alt | Key::Super)
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let key = match lower.as_str() {
            "ctrl" | "control" | "ctrl_l" => Key::Ctrl,
            "shift" | "shift_l" => Key::Shift,
            "alt" | "alt_l" => Key::Alt,
            "super" | "cmd" | "meta" => Key::Super,
            "enter" | "return" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            "space" => Key::Space,
            "tab" => Key::Tab,
            "backspace" => Key::Backspace,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    (Some('f'), Some(_)) => match other[1..].parse::<u8>() {
                        Ok(n) if (1..=24).contains(&n) => Key::F(n),
                        _ => return Err(format!("unknown key: {s}")),
                    },
                    _ => return Err(format!("unknown key: {s}")),
                }
            }
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Ctrl => f.write_str("ctrl"),
            Key::Shift => f.write_str("shift"),
            Key::Alt => f.write_str("alt"),
            Key::Super => f.write_str("super"),
            Key::Enter => f.write_str("enter"),
            Key::Escape => f.write_str("esc"),
            Key::Space => f.write_str("space"),
            Key::Tab => f.write_str("tab"),
            Key::Backspace => f.write_str("backspace"),
            Key::F(n) => write!(f, "f{n}"),
            Key::Char(c) => write!(f, "{c}"),
        }
    }
}

/// A key press together with the keys held down at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: BTreeSet<Key>,
}

impl KeyEvent {
    pub fn new(key: Key, pressed: impl IntoIterator<Item = Key>) -> Self {
        Self {
            key,
            pressed: pressed.into_iter().collect(),
        }
    }
}

/// Hotkey: a set of modifiers plus one trigger key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pub modifiers: BTreeSet<Key>,
    pub key: Key,
}

impl Chord {
    pub fn new(modifiers: impl IntoIterator<Item = Key>, key: Key) -> Self {
        Self {
            modifiers: modifiers.into_iter().collect(),
            key,
        }
    }

    /// True when `event` fires this chord.
    ///
    /// Extra held keys are tolerated; every modifier of the chord must be
    /// held.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.key == self.key && self.modifiers.iter().all(|m| event.pressed.contains(m))
    }
}

impl FromStr for Chord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (last, mods) = match parts.split_last() {
            Some((last, mods)) if !last.is_empty() => (last, mods),
            _ => return Err(format!("empty chord: {s:?}")),
        };

        let key: Key = last.parse()?;
        let mut modifiers = BTreeSet::new();
        for m in mods {
            let m: Key = m.parse()?;
            if !m.is_modifier() {
                return Err(format!("'{m}' is not a modifier in chord {s:?}"));
            }
            modifiers.insert(m);
        }

        Ok(Chord { modifiers, key })
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{m}+")?;
        }
        write!(f, "{}", self.key)
    }
}
