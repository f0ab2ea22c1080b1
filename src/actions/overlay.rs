// src/actions/overlay.rs

use anyhow::Context;
use tracing::{debug, info, warn};

use super::ActionContext;
use crate::engine::{OverlayTask, TaskKind, TaskPacket};
use crate::errors::HandlerError;

/// `Overlay.Show`: focus the target first so the overlay stacks above it,
/// then show.
pub fn show(ctx: &mut ActionContext, _packet: &TaskPacket) -> Result<(), HandlerError> {
    if ctx.overlay.is_visible() {
        return Ok(());
    }

    let Some(target) = ctx.locate_target() else {
        return Ok(());
    };
    if let Err(err) = ctx.focus.focus(&target) {
        warn!(window = %target, error = %err, "could not focus target before showing overlay");
    }

    ctx.overlay.show();
    ctx.state.set_overlay_visible(true);
    Ok(())
}

pub fn hide(ctx: &mut ActionContext, _packet: &TaskPacket) -> Result<(), HandlerError> {
    if ctx.overlay.is_visible() {
        ctx.overlay.hide();
    }
    ctx.state.set_overlay_visible(false);
    Ok(())
}

pub fn toggle_show(ctx: &mut ActionContext, packet: &TaskPacket) -> Result<(), HandlerError> {
    if ctx.overlay.is_visible() {
        hide(ctx, packet)
    } else {
        show(ctx, packet)
    }
}

/// `Overlay.Focus`: the overlay window is located by title like any other.
pub fn focus(ctx: &mut ActionContext, _packet: &TaskPacket) -> Result<(), HandlerError> {
    let Some(id) = ctx.locate_overlay() else {
        return Ok(());
    };
    ctx.focus.focus(&id)?;
    debug!(window = %id, "overlay focused");
    Ok(())
}

/// `Overlay.Restore([show])`: move the overlay back to its configured
/// geometry.
///
/// A visible overlay is hidden first and the restore is re-queued behind a
/// settle pause.
pub fn restore(ctx: &mut ActionContext, packet: &TaskPacket) -> Result<(), HandlerError> {
    let show = packet.flag(0, "show")?.unwrap_or(false);

    if ctx.overlay.is_visible() {
        debug!(show, "overlay visible; hiding before restore");
        let burst = ctx.settings.gestures.restore_hidden_first(show);
        ctx.push_burst(burst);
        return Ok(());
    }

    let placement = ctx.settings.placement;
    let position = placement.resolve();
    ctx.overlay.relocate(Some(placement.size), Some(position));
    info!(size = ?placement.size, ?position, "overlay restored");

    if show {
        ctx.queue.push(TaskPacket::new(TaskKind::Overlay(OverlayTask::Show)));
    }
    Ok(())
}

pub fn copy_input(ctx: &mut ActionContext, _packet: &TaskPacket) -> Result<(), HandlerError> {
    let text = ctx.overlay.input_text();
    ctx.clipboard
        .write(&text)
        .context("copying overlay input to the clipboard")?;
    debug!(chars = text.chars().count(), "overlay input copied");
    Ok(())
}

pub fn clear_input(ctx: &mut ActionContext, _packet: &TaskPacket) -> Result<(), HandlerError> {
    ctx.overlay.clear_input();
    Ok(())
}
