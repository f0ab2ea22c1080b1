// src/engine/dispatcher.rs

//! Serialized execution of queued tasks.
//!
//! The dispatcher is the only consumer of the [`TaskQueue`]. It is called
//! from the owner thread only, and on top of that refuses to start a pass
//! while another one is active, so no two handlers ever run at once.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, trace, warn};

use super::queue::TaskQueue;
use super::registry::ActionRegistry;
use super::state::{PauseStatus, SharedState};
use super::task::{TaskArg, TaskKind, TaskPacket};
use crate::errors::{DispatchError, HandlerError};

/// Limits for a single drain pass. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainBudget {
    pub max_tasks: Option<usize>,
    pub max_duration: Option<Duration>,
}

impl DrainBudget {
    /// Zero for either limit means "no limit".
    pub fn new(max_tasks: usize, max_duration: Duration) -> Self {
        Self {
            max_tasks: (max_tasks > 0).then_some(max_tasks),
            max_duration: (!max_duration.is_zero()).then_some(max_duration),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            max_tasks: None,
            max_duration: None,
        }
    }

    /// Budget used by the control tick: one task, at most one second.
    pub fn single() -> Self {
        Self::new(1, Duration::from_secs(1))
    }

    pub fn tasks(max_tasks: usize) -> Self {
        Self::new(max_tasks, Duration::ZERO)
    }
}

/// Why a drain pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStop {
    /// The pause deadline has not been reached; nothing ran.
    Paused,
    /// Another pass was active; nothing ran.
    AlreadyRunning,
    /// The queue ran dry.
    Empty,
    /// `max_tasks` packets ran.
    TaskLimit,
    /// `max_duration` elapsed.
    TimeLimit,
    /// An `App.Wait` packet ran.
    Waited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub executed: usize,
    pub stop: DrainStop,
}

impl DrainReport {
    fn idle(stop: DrainStop) -> Self {
        Self { executed: 0, stop }
    }
}

pub struct Dispatcher<C> {
    queue: Arc<TaskQueue>,
    state: Arc<SharedState>,
    registry: ActionRegistry<C>,
}

impl<C> std::fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending", &self.queue.len())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<C> Dispatcher<C> {
    pub fn new(queue: Arc<TaskQueue>, state: Arc<SharedState>, registry: ActionRegistry<C>) -> Self {
        Self {
            queue,
            state,
            registry,
        }
    }

    pub fn queue(&self) -> &Arc<TaskQueue> {
        &self.queue
    }

    pub fn state(&self) -> &Arc<SharedState> {
        &self.state
    }

    /// Enqueue a packet built from its parts.
    pub fn push(&self, kind: TaskKind, args: Vec<TaskArg>, kwargs: Vec<(String, TaskArg)>) {
        let mut packet = TaskPacket::with_args(kind, args);
        packet.kwargs.extend(kwargs);
        self.queue.push(packet);
    }

    /// Run queued tasks on the calling thread.
    ///
    /// - No-op while the pause deadline is pending or another pass is active.
    /// - Packets run strictly in queue order; the pass ends after the budget
    ///   is spent, the queue empties, or an `App.Wait` ran.
    /// - Handler failures are logged and the pass continues; dispatch
    ///   defects abort the pass and are returned.
    pub fn drain(&self, ctx: &mut C, budget: DrainBudget) -> Result<DrainReport, DispatchError> {
        match self.state.check_pause() {
            PauseStatus::Pending(remaining) => {
                trace!(?remaining, "drain skipped: paused");
                return Ok(DrainReport::idle(DrainStop::Paused));
            }
            PauseStatus::Elapsed => debug!("pause deadline reached"),
            PauseStatus::Clear => {}
        }

        let Some(_guard) = self.state.try_begin_drain() else {
            trace!("drain skipped: another pass is active");
            return Ok(DrainReport::idle(DrainStop::AlreadyRunning));
        };

        let started = Instant::now();
        let mut executed = 0usize;

        let stop = loop {
            if budget.max_tasks.is_some_and(|max| executed >= max) {
                break DrainStop::TaskLimit;
            }
            if budget.max_duration.is_some_and(|max| started.elapsed() >= max) {
                break DrainStop::TimeLimit;
            }

            let Some(packet) = self.queue.pop() else {
                break DrainStop::Empty;
            };

            self.execute(ctx, &packet)?;
            executed += 1;

            // Whatever comes after a wait must not be rushed through.
            if packet.kind.is_wait() {
                break DrainStop::Waited;
            }
        };

        if executed > 0 {
            debug!(executed, ?stop, "drain pass finished");
        }
        Ok(DrainReport { executed, stop })
    }

    fn execute(&self, ctx: &mut C, packet: &TaskPacket) -> Result<(), DispatchError> {
        let Some(handler) = self.registry.get(packet.kind) else {
            let err = DispatchError::Unregistered(packet.kind);
            error!(task = %packet.kind, "{err}");
            return Err(err);
        };

        if let Err(err) = packet.kind.arity().check(packet) {
            error!(task = %packet, "{err}");
            return Err(err);
        }

        debug!(task = %packet, "running task");
        match handler(ctx, packet) {
            Ok(()) => Ok(()),
            Err(HandlerError::Failed(err)) => {
                warn!(task = %packet.kind, error = %format!("{err:#}"), "task failed; continuing");
                Ok(())
            }
            Err(HandlerError::Fatal(err)) => {
                error!(task = %packet, "{err}");
                Err(err)
            }
        }
    }
}
