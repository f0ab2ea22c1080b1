// src/workers/mod.rs

//! Background workers and their lifecycle.
//!
//! Three cooperating OS threads feed the owner thread:
//! - [`startup`]: one pass that resolves and caches the target window,
//! - [`control`]: the fine-grained tick that requests drains,
//! - [`watchdog`]: the coarse liveness check on the target window.
//!
//! Workers never run task handlers. They push packets (through the shutdown
//! sequencer) or send [`OwnerRequest`]s; the owner thread does the rest.
//! Cancellation is cooperative: each loop checks its interruption flag at
//! the top, and [`Worker::stop`] sets the flag, wakes the thread and joins
//! it.

pub mod control;
pub mod startup;
pub mod watchdog;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::{OwnerRequest, SharedState, ShutdownSequencer};
use crate::errors::Result;
use crate::locate::{Locator, WindowFilter};

/// Interruption flag as seen from inside a worker.
#[derive(Debug, Clone, Default)]
pub struct WorkerSignal(Arc<AtomicBool>);

impl WorkerSignal {
    pub fn interrupted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Sleep for `duration`, returning early once interrupted.
    pub fn sleep(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while !self.interrupted() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::park_timeout(deadline - now);
        }
    }

    fn interrupt(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// A named, stoppable thread.
pub struct Worker {
    name: &'static str,
    signal: WorkerSignal,
    handle: Option<JoinHandle<()>>,
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}

impl Worker {
    pub fn spawn(
        name: &'static str,
        body: impl FnOnce(WorkerSignal) + Send + 'static,
    ) -> std::io::Result<Self> {
        let signal = WorkerSignal::default();
        let inner = signal.clone();
        let handle = thread::Builder::new()
            .name(format!("ffchat-{name}"))
            .spawn(move || {
                debug!(worker = name, "worker started");
                body(inner);
                debug!(worker = name, "worker finished");
            })?;

        Ok(Self {
            name,
            signal,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the worker to finish on its own.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!(worker = self.name, "worker panicked");
            }
        }
    }

    /// Interrupt the worker and wait until it has fully exited.
    pub fn stop(&mut self) {
        self.signal.interrupt();
        if let Some(handle) = self.handle.as_ref() {
            handle.thread().unpark();
        }
        self.join();
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// What every worker gets to work with.
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub state: Arc<SharedState>,
    pub shutdown: ShutdownSequencer,
    pub locator: Locator,
    pub target: WindowFilter,
    pub requests: mpsc::UnboundedSender<OwnerRequest>,
    pub tick: Duration,
    pub watchdog_interval: Duration,
}

/// Owns the three workers; each can be started and stopped on its own.
#[derive(Debug)]
pub struct Coordinator {
    ctx: WorkerContext,
    startup: Option<Worker>,
    control: Option<Worker>,
    watchdog: Option<Worker>,
}

impl Coordinator {
    pub fn new(ctx: WorkerContext) -> Self {
        Self {
            ctx,
            startup: None,
            control: None,
            watchdog: None,
        }
    }

    /// Start the startup probe; with `wait`, block until it has finished.
    pub fn run_startup(&mut self, wait: bool) -> Result<()> {
        let ctx = self.ctx.clone();
        let mut worker = Worker::spawn("startup", move |signal| startup::run(&ctx, &signal))?;
        if wait {
            worker.join();
        }
        self.startup = Some(worker);
        Ok(())
    }

    pub fn run_control(&mut self) -> Result<()> {
        let ctx = self.ctx.clone();
        self.control = Some(Worker::spawn("control", move |signal| {
            control::run(&ctx, &signal)
        })?);
        Ok(())
    }

    pub fn run_watchdog(&mut self) -> Result<()> {
        let ctx = self.ctx.clone();
        self.watchdog = Some(Worker::spawn("watchdog", move |signal| {
            watchdog::run(&ctx, &signal)
        })?);
        Ok(())
    }

    /// Startup (blocking), then watchdog and control.
    pub fn start_all(&mut self) -> Result<()> {
        self.run_startup(true)?;
        self.run_watchdog()?;
        self.run_control()?;
        info!("workers started");
        Ok(())
    }

    pub fn stop_startup(&mut self) {
        stop_slot(&mut self.startup);
    }

    pub fn stop_control(&mut self) {
        stop_slot(&mut self.control);
    }

    pub fn stop_watchdog(&mut self) {
        stop_slot(&mut self.watchdog);
    }

    pub fn stop_all(&mut self) {
        self.stop_control();
        self.stop_watchdog();
        self.stop_startup();
        info!("workers stopped");
    }

    pub fn running(&self) -> Vec<&'static str> {
        [&self.startup, &self.control, &self.watchdog]
            .into_iter()
            .flatten()
            .filter(|w| w.is_running())
            .map(Worker::name)
            .collect()
    }
}

fn stop_slot(slot: &mut Option<Worker>) {
    if let Some(mut worker) = slot.take() {
        worker.stop();
    }
}
