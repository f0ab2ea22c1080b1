// src/workers/watchdog.rs

use tracing::{debug, info};

use super::{WorkerContext, WorkerSignal};
use crate::locate::LocateRole;

/// Periodically re-resolve the target; if it is gone or ambiguous the
/// locator has already requested the shutdown and the loop winds down.
pub fn run(ctx: &WorkerContext, signal: &WorkerSignal) {
    while !signal.interrupted() && !ctx.state.stopping() {
        match ctx
            .locator
            .locate_or_shutdown(&ctx.target, LocateRole::Target, &ctx.shutdown)
        {
            Some(id) => {
                if ctx.state.cached_target().as_ref() != Some(&id) {
                    info!(window = %id, "target window changed");
                    ctx.state.store_target(Some(id));
                }
            }
            None => {
                debug!("target lost; watchdog ending");
                break;
            }
        }
        signal.sleep(ctx.watchdog_interval);
    }
}
