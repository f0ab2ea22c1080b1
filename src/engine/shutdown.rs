// src/engine/shutdown.rs

use std::sync::Arc;

use tracing::{info, warn};

use super::queue::TaskQueue;
use super::state::SharedState;
use super::task::TaskPacket;
use crate::types::ExitReason;

/// Single entry point for fatal conditions.
///
/// The first request freezes the stop record and queues exactly one
/// `App.Exit` packet; the actual teardown happens when the dispatcher
/// executes that packet on the owner thread. Later requests are logged and
/// dropped.
#[derive(Debug, Clone)]
pub struct ShutdownSequencer {
    state: Arc<SharedState>,
    queue: Arc<TaskQueue>,
}

impl ShutdownSequencer {
    pub fn new(state: Arc<SharedState>, queue: Arc<TaskQueue>) -> Self {
        Self { state, queue }
    }

    /// Request process shutdown.
    ///
    /// - `clear_pending` discards the queued work first, so `App.Exit` runs
    ///   next.
    /// - Returns `false` if a stop was already requested.
    pub fn request_stop(
        &self,
        reason: ExitReason,
        extra_message: impl Into<String>,
        clear_pending: bool,
    ) -> bool {
        let extra_message = extra_message.into();

        // The stop record and the exit packet are published under the queue
        // lock: whoever sees `stopping()` and then pops will find the packet.
        let accepted = self.queue.transaction(|pending| {
            if !self.state.record_stop(reason, extra_message.clone()) {
                return false;
            }
            if clear_pending && !pending.is_empty() {
                warn!(dropped = pending.len(), "discarding pending tasks before exit");
                pending.clear();
            }
            pending.push_back(TaskPacket::exit(reason, &extra_message));
            true
        });

        if accepted {
            info!(%reason, extra = %extra_message, "stop requested");
        } else {
            let first = self.state.stop_record().map(|r| r.reason);
            warn!(
                ignored = %reason,
                extra = %extra_message,
                first = ?first,
                "stop already requested; ignoring additional request"
            );
        }
        accepted
    }

    pub fn stopping(&self) -> bool {
        self.state.stopping()
    }
}
