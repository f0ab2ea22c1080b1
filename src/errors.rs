// src/errors.rs

//! Crate-wide error types and aliases.

use thiserror::Error;

use crate::engine::TaskKind;

#[derive(Error, Debug)]
pub enum FfchatError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Internal wiring defects detected while draining the task queue.
///
/// None of these can be caused by the user or the environment; they mean the
/// action table or a gesture was built incorrectly. The dispatcher aborts the
/// drain pass and the runtime terminates with this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no handler registered for task kind {0}")]
    Unregistered(TaskKind),

    #[error("task {kind} expects {expected} positional argument(s), got {got}")]
    Arity {
        kind: TaskKind,
        expected: String,
        got: usize,
    },

    #[error("task {kind} does not accept keyword argument '{name}'")]
    UnknownKwarg { kind: TaskKind, name: String },

    #[error("task {kind}: argument {position} should be {expected}")]
    ArgumentType {
        kind: TaskKind,
        position: String,
        expected: &'static str,
    },
}

/// Failure reported by a task handler.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The packet itself is malformed; treated like any other dispatch defect.
    #[error(transparent)]
    Fatal(#[from] DispatchError),

    /// The action could not be completed; logged and the drain continues.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl From<PlatformError> for HandlerError {
    fn from(err: PlatformError) -> Self {
        HandlerError::Failed(err.into())
    }
}

/// Errors raised by the OS collaborators (window manager, clipboard, ...).
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with status {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: i32,
        stderr: String,
    },

    #[error("unexpected output from `{program}`: {detail}")]
    Parse { program: String, detail: String },

    #[error("{0}")]
    Unavailable(String),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FfchatError>;
