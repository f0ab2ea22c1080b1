// src/engine/task.rs

//! Task taxonomy: what can be queued and which arguments each kind takes.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::errors::DispatchError;
use crate::keys::Key;
use crate::types::ExitReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetTask {
    Focus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayTask {
    Show,
    Hide,
    ToggleShow,
    Focus,
    Restore,
    CopyInput,
    ClearInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppTask {
    Exit,
    ToggleFocus,
    SaveClipboard,
    RestoreClipboard,
    SendKeystroke,
    SwitchKeyboard,
    Wait,
    UpdateWindows,
}

/// Every primitive action the dispatcher knows, grouped by what it acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Target(TargetTask),
    Overlay(OverlayTask),
    App(AppTask),
}

impl TaskKind {
    pub const ALL: [TaskKind; 16] = [
        TaskKind::Target(TargetTask::Focus),
        TaskKind::Overlay(OverlayTask::Show),
        TaskKind::Overlay(OverlayTask::Hide),
        TaskKind::Overlay(OverlayTask::ToggleShow),
        TaskKind::Overlay(OverlayTask::Focus),
        TaskKind::Overlay(OverlayTask::Restore),
        TaskKind::Overlay(OverlayTask::CopyInput),
        TaskKind::Overlay(OverlayTask::ClearInput),
        TaskKind::App(AppTask::Exit),
        TaskKind::App(AppTask::ToggleFocus),
        TaskKind::App(AppTask::SaveClipboard),
        TaskKind::App(AppTask::RestoreClipboard),
        TaskKind::App(AppTask::SendKeystroke),
        TaskKind::App(AppTask::SwitchKeyboard),
        TaskKind::App(AppTask::Wait),
        TaskKind::App(AppTask::UpdateWindows),
    ];

    pub const WAIT: TaskKind = TaskKind::App(AppTask::Wait);
    pub const EXIT: TaskKind = TaskKind::App(AppTask::Exit);

    pub fn is_wait(self) -> bool {
        self == Self::WAIT
    }

    /// Argument contract for this kind.
    pub fn arity(self) -> Arity {
        match self {
            TaskKind::Overlay(OverlayTask::Restore) => Arity {
                min: 0,
                max: 1,
                kwargs: &["show"],
            },
            TaskKind::App(AppTask::Exit) => Arity::positional(2),
            TaskKind::App(AppTask::SendKeystroke)
            | TaskKind::App(AppTask::SwitchKeyboard)
            | TaskKind::App(AppTask::Wait) => Arity::positional(1),
            _ => Arity::positional(0),
        }
    }

    /// Human description, used in logs.
    pub fn describe(self) -> &'static str {
        match self {
            TaskKind::Target(TargetTask::Focus) => "Focus the target window",
            TaskKind::Overlay(OverlayTask::Show) => "Show the overlay",
            TaskKind::Overlay(OverlayTask::Hide) => "Hide the overlay",
            TaskKind::Overlay(OverlayTask::ToggleShow) => "Show or hide the overlay",
            TaskKind::Overlay(OverlayTask::Focus) => "Focus the overlay",
            TaskKind::Overlay(OverlayTask::Restore) => "Restore the overlay position",
            TaskKind::Overlay(OverlayTask::CopyInput) => "Copy the overlay input to the clipboard",
            TaskKind::Overlay(OverlayTask::ClearInput) => "Clear the overlay input",
            TaskKind::App(AppTask::Exit) => "Exit the application",
            TaskKind::App(AppTask::ToggleFocus) => "Toggle focus between target and overlay",
            TaskKind::App(AppTask::SaveClipboard) => "Save the user clipboard",
            TaskKind::App(AppTask::RestoreClipboard) => "Restore the saved clipboard",
            TaskKind::App(AppTask::SendKeystroke) => "Send a keystroke",
            TaskKind::App(AppTask::SwitchKeyboard) => "Switch the input keyboard layout",
            TaskKind::App(AppTask::Wait) => "Pause task draining",
            TaskKind::App(AppTask::UpdateWindows) => "Refresh the window list",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Target(t) => write!(f, "Target.{t:?}"),
            TaskKind::Overlay(t) => write!(f, "Overlay.{t:?}"),
            TaskKind::App(t) => write!(f, "App.{t:?}"),
        }
    }
}

/// Accepted argument shape of a task kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
    pub kwargs: &'static [&'static str],
}

impl Arity {
    const fn positional(n: usize) -> Self {
        Self {
            min: n,
            max: n,
            kwargs: &[],
        }
    }

    pub fn check(&self, packet: &TaskPacket) -> Result<(), DispatchError> {
        let got = packet.args.len();
        if got < self.min || got > self.max {
            let expected = if self.min == self.max {
                self.min.to_string()
            } else {
                format!("{}..={}", self.min, self.max)
            };
            return Err(DispatchError::Arity {
                kind: packet.kind,
                expected,
                got,
            });
        }

        if let Some(name) = packet.kwargs.keys().find(|k| !self.kwargs.contains(&k.as_str())) {
            return Err(DispatchError::UnknownKwarg {
                kind: packet.kind,
                name: name.clone(),
            });
        }

        Ok(())
    }
}

/// Opaque argument value carried by a packet.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskArg {
    Duration(Duration),
    Bool(bool),
    Text(String),
    Keys(Vec<Key>),
    Reason(ExitReason),
}

impl From<Duration> for TaskArg {
    fn from(d: Duration) -> Self {
        TaskArg::Duration(d)
    }
}

impl From<bool> for TaskArg {
    fn from(b: bool) -> Self {
        TaskArg::Bool(b)
    }
}

impl From<&str> for TaskArg {
    fn from(s: &str) -> Self {
        TaskArg::Text(s.to_string())
    }
}

impl From<String> for TaskArg {
    fn from(s: String) -> Self {
        TaskArg::Text(s)
    }
}

impl From<Vec<Key>> for TaskArg {
    fn from(keys: Vec<Key>) -> Self {
        TaskArg::Keys(keys)
    }
}

impl From<ExitReason> for TaskArg {
    fn from(r: ExitReason) -> Self {
        TaskArg::Reason(r)
    }
}

/// One queued unit of work. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPacket {
    pub kind: TaskKind,
    pub args: Vec<TaskArg>,
    pub kwargs: BTreeMap<String, TaskArg>,
}

impl TaskPacket {
    pub fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    pub fn with_args(kind: TaskKind, args: Vec<TaskArg>) -> Self {
        Self {
            kind,
            args,
            kwargs: BTreeMap::new(),
        }
    }

    pub fn with_kwarg(mut self, name: &str, value: impl Into<TaskArg>) -> Self {
        self.kwargs.insert(name.to_string(), value.into());
        self
    }

    pub fn wait(delay: Duration) -> Self {
        Self::with_args(TaskKind::WAIT, vec![delay.into()])
    }

    pub fn keystroke(keys: Vec<Key>) -> Self {
        Self::with_args(TaskKind::App(AppTask::SendKeystroke), vec![keys.into()])
    }

    pub fn switch_keyboard(layout: &str) -> Self {
        Self::with_args(TaskKind::App(AppTask::SwitchKeyboard), vec![layout.into()])
    }

    pub fn exit(reason: ExitReason, extra: &str) -> Self {
        Self::with_args(TaskKind::EXIT, vec![reason.into(), extra.into()])
    }

    pub fn duration_arg(&self, index: usize) -> Result<Duration, DispatchError> {
        match self.args.get(index) {
            Some(TaskArg::Duration(d)) => Ok(*d),
            _ => Err(self.type_error(index, "a duration")),
        }
    }

    pub fn text_arg(&self, index: usize) -> Result<&str, DispatchError> {
        match self.args.get(index) {
            Some(TaskArg::Text(s)) => Ok(s),
            _ => Err(self.type_error(index, "text")),
        }
    }

    pub fn keys_arg(&self, index: usize) -> Result<&[Key], DispatchError> {
        match self.args.get(index) {
            Some(TaskArg::Keys(k)) => Ok(k),
            _ => Err(self.type_error(index, "a key list")),
        }
    }

    pub fn reason_arg(&self, index: usize) -> Result<ExitReason, DispatchError> {
        match self.args.get(index) {
            Some(TaskArg::Reason(r)) => Ok(*r),
            _ => Err(self.type_error(index, "an exit reason")),
        }
    }

    /// Optional boolean given either positionally or by name.
    pub fn flag(&self, index: usize, name: &str) -> Result<Option<bool>, DispatchError> {
        let value = self.args.get(index).or_else(|| self.kwargs.get(name));
        match value {
            None => Ok(None),
            Some(TaskArg::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(DispatchError::ArgumentType {
                kind: self.kind,
                position: format!("{index} ({name})"),
                expected: "a bool",
            }),
        }
    }

    fn type_error(&self, index: usize, expected: &'static str) -> DispatchError {
        DispatchError::ArgumentType {
            kind: self.kind,
            position: index.to_string(),
            expected,
        }
    }
}

impl From<TaskKind> for TaskPacket {
    fn from(kind: TaskKind) -> Self {
        TaskPacket::new(kind)
    }
}

impl fmt::Display for TaskPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.args.is_empty() || !self.kwargs.is_empty() {
            write!(f, "({:?}, {:?})", self.args, self.kwargs)?;
        }
        Ok(())
    }
}
