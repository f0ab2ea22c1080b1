// src/workers/startup.rs

use tracing::{info, warn};

use super::{WorkerContext, WorkerSignal};
use crate::engine::OwnerRequest;
use crate::locate::LocateRole;

/// One pass: refresh the window list, resolve and cache the target, and ask
/// the owner to put the overlay in place.
///
/// An absent or ambiguous target has already requested a shutdown by the
/// time this returns.
pub fn run(ctx: &WorkerContext, signal: &WorkerSignal) {
    if signal.interrupted() {
        return;
    }

    if let Err(err) = ctx.locator.windows().refresh() {
        warn!(error = %err, "initial window list refresh failed");
    }

    let found = ctx
        .locator
        .locate_or_shutdown(&ctx.target, LocateRole::Startup, &ctx.shutdown);
    ctx.state.store_target(found.clone());

    if let Some(id) = found {
        info!(window = %id, "target window located");
        let _ = ctx.requests.send(OwnerRequest::RestoreOverlay);
    }
}
