// src/platform/stdin_keys.rs

//! Line-driven key source.
//!
//! Reads commands from stdin, one per line:
//! - `key <chord>`: a global key-down, e.g. `key ctrl+enter`
//! - `text <input>`: replace the headless overlay's input text
//! - `submit`: press Return inside the overlay
//!
//! Useful for scripting the pipeline without a global key hook.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::headless::HeadlessInput;
use super::{KeyListener, KeySink, PlatformResult};
use crate::engine::OwnerRequest;
use crate::errors::PlatformError;
use crate::keys::{Chord, KeyEvent};

/// One parsed stdin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinCommand {
    Key(KeyEvent),
    Text(String),
    Submit,
}

impl StdinCommand {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        match verb {
            "key" => {
                let chord: Chord = rest.parse()?;
                let pressed = chord.modifiers.iter().copied().chain([chord.key]);
                Ok(Some(StdinCommand::Key(KeyEvent::new(chord.key, pressed))))
            }
            "text" => Ok(Some(StdinCommand::Text(rest.to_string()))),
            "submit" => Ok(Some(StdinCommand::Submit)),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

pub struct StdinKeys {
    input: HeadlessInput,
    requests: mpsc::UnboundedSender<OwnerRequest>,
    stopped: Arc<AtomicBool>,
    started: bool,
}

impl StdinKeys {
    pub fn new(input: HeadlessInput, requests: mpsc::UnboundedSender<OwnerRequest>) -> Self {
        Self {
            input,
            requests,
            stopped: Arc::new(AtomicBool::new(false)),
            started: false,
        }
    }
}

impl KeyListener for StdinKeys {
    fn start(&mut self, sink: KeySink) -> PlatformResult<()> {
        if self.started {
            return Ok(());
        }

        let input = self.input.clone();
        let requests = self.requests.clone();
        let stopped = Arc::clone(&self.stopped);

        thread::Builder::new()
            .name("ffchat-stdin-keys".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    if stopped.load(Ordering::Acquire) {
                        break;
                    }
                    let Ok(line) = line else { break };
                    match StdinCommand::parse(&line) {
                        Ok(Some(StdinCommand::Key(event))) => sink(event),
                        Ok(Some(StdinCommand::Text(text))) => input.set(text),
                        Ok(Some(StdinCommand::Submit)) => {
                            if requests.send(OwnerRequest::OverlaySubmit).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(err) => warn!(%line, "ignoring stdin command: {err}"),
                    }
                }
                debug!("stdin key source finished");
            })
            .map_err(|e| PlatformError::Unavailable(format!("cannot spawn stdin reader: {e}")))?;

        self.started = true;
        info!("reading key commands from stdin");
        Ok(())
    }

    // A blocking stdin read cannot be interrupted; the reader thread exits at
    // its next line or at EOF and is not joined.
    fn stop(&mut self) {
        self.stopped.store(true, Ordering::Release);
    }
}
