// src/platform/command.rs

//! Command-line backed collaborators for X11 desktops.
//!
//! - window list: `wmctrl -lx`
//! - active window: `xdotool getactivewindow`
//! - focus: `bspc node <id> -f` or `wmctrl -i -a <id>`
//! - keystrokes: `xdotool keydown` / `xdotool keyup`
//! - clipboard: `xclip -selection clipboard`
//! - input method: `fcitx5-remote -s <layout>`

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use super::{Clipboard, KeystrokeInjector, LayoutSwitcher, PlatformResult, WindowFocus, WindowQuery};
use crate::errors::PlatformError;
use crate::keys::Key;
use crate::locate::WindowFilter;
use crate::types::WindowId;

/// How long synthetic keys stay pressed.
const KEY_HOLD: Duration = Duration::from_millis(100);

/// Program used to focus a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusBackend {
    #[default]
    Bspc,
    Wmctrl,
}

/// One row of `wmctrl -lx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: WindowId,
    pub desktop: String,
    pub class: String,
    pub name: String,
}

/// Window manager access through `wmctrl`, `xdotool` and `bspc`.
#[derive(Debug)]
pub struct CommandWindows {
    focus: FocusBackend,
    windows: Mutex<Vec<WindowInfo>>,
}

impl CommandWindows {
    pub fn new(focus: FocusBackend) -> Self {
        Self {
            focus,
            windows: Mutex::new(Vec::new()),
        }
    }

    fn list(&self) -> MutexGuard<'_, Vec<WindowInfo>> {
        self.windows.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl WindowQuery for CommandWindows {
    fn refresh(&self) -> PlatformResult<()> {
        let out = run("wmctrl", &["-lx"])?;
        let parsed: Vec<WindowInfo> = out.lines().filter_map(parse_wmctrl_line).collect();
        *self.list() = parsed;
        Ok(())
    }

    fn find(&self, filter: &WindowFilter) -> Vec<WindowId> {
        self.list()
            .iter()
            .filter(|w| filter.matches(&w.name, &w.class))
            .map(|w| w.id.clone())
            .collect()
    }

    fn active_id(&self) -> Option<WindowId> {
        let out = run("xdotool", &["getactivewindow"]).ok()?;
        let raw: u64 = out.trim().parse().ok()?;
        Some(WindowId::new(format!("0x{raw:08x}")))
    }
}

impl WindowFocus for CommandWindows {
    fn focus(&self, id: &WindowId) -> PlatformResult<()> {
        match self.focus {
            FocusBackend::Bspc => run("bspc", &["node", id.as_str(), "-f"])?,
            FocusBackend::Wmctrl => run("wmctrl", &["-i", "-a", id.as_str()])?,
        };
        debug!(window = %id, "focused window");
        Ok(())
    }
}

/// Parse a `wmctrl -lx` row: `<id> <desktop> <class> <host> <title...>`.
///
/// The title may contain spaces or be empty.
pub fn parse_wmctrl_line(line: &str) -> Option<WindowInfo> {
    let mut rest = line.trim_start();
    let mut fields = [""; 4];

    for field in fields.iter_mut() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        *field = &rest[..end];
        rest = rest[end..].trim_start();
    }

    let [id, desktop, class, _host] = fields;
    Some(WindowInfo {
        id: WindowId::new(id),
        desktop: desktop.to_string(),
        class: class.to_string(),
        name: rest.trim_end().to_string(),
    })
}

/// Keystroke injection through `xdotool`.
#[derive(Debug, Default)]
pub struct XdotoolKeystrokes;

impl KeystrokeInjector for XdotoolKeystrokes {
    fn send(&self, keys: &[Key]) -> PlatformResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = keys.iter().map(|k| xdotool_key_name(*k)).collect();
        let mut down = vec!["keydown"];
        down.extend(names.iter().map(String::as_str));
        run("xdotool", &down)?;

        thread::sleep(KEY_HOLD);

        let mut up = vec!["keyup"];
        up.extend(names.iter().rev().map(String::as_str));
        run("xdotool", &up)?;
        Ok(())
    }
}

fn xdotool_key_name(key: Key) -> String {
    match key {
        Key::Ctrl => "ctrl".into(),
        Key::Shift => "shift".into(),
        Key::Alt => "alt".into(),
        Key::Super => "super".into(),
        Key::Enter => "Return".into(),
        Key::Escape => "Escape".into(),
        Key::Space => "space".into(),
        Key::Tab => "Tab".into(),
        Key::Backspace => "BackSpace".into(),
        Key::F(n) => format!("F{n}"),
        Key::Char(c) => c.to_string(),
    }
}

/// Clipboard access through `xclip`.
#[derive(Debug, Default)]
pub struct XclipClipboard;

impl Clipboard for XclipClipboard {
    fn read(&self) -> PlatformResult<String> {
        run("xclip", &["-selection", "clipboard", "-o"])
    }

    fn write(&self, text: &str) -> PlatformResult<()> {
        let program = "xclip";
        let mut child = Command::new(program)
            .args(["-selection", "clipboard", "-i"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| spawn_error(program, source))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|source| spawn_error(program, source))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|source| spawn_error(program, source))?;
        check_status(program, &output)?;
        Ok(())
    }
}

/// Input-method switching through `fcitx5-remote`.
#[derive(Debug, Default)]
pub struct Fcitx5Layouts;

impl LayoutSwitcher for Fcitx5Layouts {
    fn switch(&self, layout: &str) -> PlatformResult<()> {
        run("fcitx5-remote", &["-s", layout])?;
        info!(layout, "switched input keyboard");
        Ok(())
    }
}

/// Run `program` with `args`, returning stdout on success.
fn run(program: &str, args: &[&str]) -> PlatformResult<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| spawn_error(program, source))?;
    check_status(program, &output)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn check_status(program: &str, output: &std::process::Output) -> PlatformResult<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(PlatformError::CommandFailed {
        program: program.to_string(),
        status: output.status.code().unwrap_or(-1),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

fn spawn_error(program: &str, source: std::io::Error) -> PlatformError {
    PlatformError::Spawn {
        program: program.to_string(),
        source,
    }
}
