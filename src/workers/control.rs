// src/workers/control.rs

use tracing::{debug, trace};

use super::{WorkerContext, WorkerSignal};
use crate::engine::{DrainBudget, OwnerRequest, PauseStatus};

/// Tick loop that asks the owner thread to drain one task at a time.
///
/// While a pause is pending the loop keeps ticking without asking for
/// drains. It ends when interrupted, when a shutdown is in progress, or when
/// the owner side of the channel is gone; in every case the owner hears
/// about it through [`OwnerRequest::ControlStopped`].
pub fn run(ctx: &WorkerContext, signal: &WorkerSignal) {
    while !signal.interrupted() && !ctx.state.stopping() {
        match ctx.state.check_pause() {
            PauseStatus::Pending(left) => {
                trace!(?left, "paused");
                signal.sleep(ctx.tick.min(left));
                continue;
            }
            PauseStatus::Elapsed => {
                debug!("pause elapsed");
                continue;
            }
            PauseStatus::Clear => {}
        }

        signal.sleep(ctx.tick);
        if ctx
            .requests
            .send(OwnerRequest::Drain(DrainBudget::single()))
            .is_err()
        {
            debug!("owner gone; control loop ending");
            break;
        }
    }

    let _ = ctx.requests.send(OwnerRequest::ControlStopped);
}
