// src/actions/app.rs

use anyhow::Context;
use tracing::{debug, info};

use super::{ActionContext, overlay, target};
use crate::engine::TaskPacket;
use crate::errors::HandlerError;

/// `App.Exit(reason, extra)`: the single teardown path.
pub fn exit(ctx: &mut ActionContext, packet: &TaskPacket) -> Result<(), HandlerError> {
    let reason = packet.reason_arg(0)?;
    let extra = packet.text_arg(1)?;

    println!();
    println!("  Stopping ffchat.");
    println!("    Reason:  {}", reason.message());
    println!("    Details: {extra}");
    println!();

    info!(%reason, "tearing down");
    ctx.teardown();
    Ok(())
}

/// `App.ToggleFocus`: move focus to whichever of target/overlay does not
/// have it. A hidden overlay always sends focus to the target.
pub fn toggle_focus(ctx: &mut ActionContext, packet: &TaskPacket) -> Result<(), HandlerError> {
    let overlay_visible = ctx.overlay.is_visible();
    if !overlay_visible || ctx.locator.is_active(&ctx.settings.overlay) {
        target::focus(ctx, packet)
    } else {
        overlay::focus(ctx, packet)
    }
}

pub fn save_clipboard(ctx: &mut ActionContext, _packet: &TaskPacket) -> Result<(), HandlerError> {
    ctx.stored_clipboard = ctx.clipboard.read().context("saving the clipboard")?;
    debug!(chars = ctx.stored_clipboard.chars().count(), "clipboard saved");
    Ok(())
}

pub fn restore_clipboard(ctx: &mut ActionContext, _packet: &TaskPacket) -> Result<(), HandlerError> {
    ctx.clipboard
        .write(&ctx.stored_clipboard)
        .context("restoring the clipboard")?;
    debug!("clipboard restored");
    Ok(())
}

pub fn send_keystroke(ctx: &mut ActionContext, packet: &TaskPacket) -> Result<(), HandlerError> {
    let keys = packet.keys_arg(0)?;
    ctx.keystrokes
        .send(keys)
        .with_context(|| format!("sending keystroke {keys:?}"))?;
    Ok(())
}

/// `App.SwitchKeyboard(layout)`. Failure is reported but never stops the
/// gesture that asked for it.
pub fn switch_keyboard(ctx: &mut ActionContext, packet: &TaskPacket) -> Result<(), HandlerError> {
    let layout = packet.text_arg(0)?;
    ctx.layouts
        .switch(layout)
        .with_context(|| format!("switching to input keyboard '{layout}'"))?;
    Ok(())
}

/// `App.Wait(delay)`: set the global pause deadline. A newer wait replaces
/// an older one.
pub fn wait(ctx: &mut ActionContext, packet: &TaskPacket) -> Result<(), HandlerError> {
    let delay = packet.duration_arg(0)?;
    if ctx.state.pause_deadline().is_some() {
        debug!(?delay, "replacing pending pause deadline");
    }
    ctx.state.pause_for(delay);
    Ok(())
}

pub fn update_windows(ctx: &mut ActionContext, _packet: &TaskPacket) -> Result<(), HandlerError> {
    ctx.locator.windows().refresh()?;
    Ok(())
}
