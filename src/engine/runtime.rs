// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::types::ExitReason;

use super::{
    Dispatcher, DrainBudget, DrainStop, Gestures, OwnerRequest, PauseStatus, SharedState,
    ShutdownSequencer,
};

/// Owner-thread event loop.
///
/// Every handler runs here, called through the [`Dispatcher`]. Everything
/// else (workers, key listener, Ctrl-C) only sends [`OwnerRequest`]s or
/// pushes packets.
pub struct Runtime<C> {
    dispatcher: Dispatcher<C>,
    ctx: C,
    requests: mpsc::UnboundedReceiver<OwnerRequest>,
    gestures: Gestures,
    shutdown: ShutdownSequencer,
}

impl<C> fmt::Debug for Runtime<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl<C> Runtime<C> {
    pub fn new(
        dispatcher: Dispatcher<C>,
        ctx: C,
        requests: mpsc::UnboundedReceiver<OwnerRequest>,
        gestures: Gestures,
    ) -> Self {
        let shutdown = ShutdownSequencer::new(
            Arc::clone(dispatcher.state()),
            Arc::clone(dispatcher.queue()),
        );
        Self {
            dispatcher,
            ctx,
            requests,
            gestures,
            shutdown,
        }
    }

    fn state(&self) -> &SharedState {
        self.dispatcher.state()
    }

    /// Main event loop.
    ///
    /// Runs until the exit handler has torn everything down, or until every
    /// sender is gone. Returns the handler context so callers can inspect
    /// what happened.
    pub async fn run(mut self) -> Result<C> {
        info!("ffchat runtime started");

        while !self.state().exited() {
            let Some(request) = self.requests.recv().await else {
                info!("owner request channel closed");
                if self.state().stopping() {
                    self.flush().await?;
                }
                break;
            };

            self.handle(request).await?;
        }

        match self.state().stop_record() {
            Some(record) => info!(reason = %record.reason, "runtime exiting"),
            None => info!("runtime exiting"),
        }
        Ok(self.ctx)
    }

    async fn handle(&mut self, request: OwnerRequest) -> Result<()> {
        match request {
            OwnerRequest::Drain(budget) => {
                self.dispatcher.drain(&mut self.ctx, budget)?;
            }
            OwnerRequest::RestoreOverlay => {
                self.dispatcher
                    .queue()
                    .push_batch(self.gestures.restore(false));
            }
            OwnerRequest::OverlaySubmit => {
                debug!("overlay submit");
                self.dispatcher
                    .queue()
                    .push_batch(self.gestures.send_message());
            }
            OwnerRequest::Interrupted => {
                warn!("interrupted");
                self.shutdown
                    .request_stop(ExitReason::Interrupted, "Interrupted by Ctrl-C", false);
            }
            OwnerRequest::ControlStopped => {
                debug!("control worker stopped; flushing queue");
                self.flush().await?;
            }
        }
        Ok(())
    }

    /// Drain until the queue is empty or the exit handler ran, waiting out
    /// pause deadlines on the way.
    async fn flush(&mut self) -> Result<()> {
        while !self.state().exited() {
            if let PauseStatus::Pending(left) = self.state().check_pause() {
                tokio::time::sleep(left).await;
                continue;
            }

            let report = self
                .dispatcher
                .drain(&mut self.ctx, DrainBudget::unbounded())?;

            match report.stop {
                DrainStop::Waited | DrainStop::Paused => continue,
                DrainStop::Empty | DrainStop::AlreadyRunning => break,
                DrainStop::TaskLimit | DrainStop::TimeLimit => {
                    if self.dispatcher.queue().is_empty() {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
