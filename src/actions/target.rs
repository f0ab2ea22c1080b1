// src/actions/target.rs

use tracing::debug;

use super::ActionContext;
use crate::engine::TaskPacket;
use crate::errors::HandlerError;

/// `Target.Focus`: re-resolve the target and focus it.
///
/// A target that vanished or became ambiguous has already triggered the
/// shutdown; there is nothing left to focus.
pub fn focus(ctx: &mut ActionContext, _packet: &TaskPacket) -> Result<(), HandlerError> {
    let Some(id) = ctx.locate_target() else {
        return Ok(());
    };
    ctx.focus.focus(&id)?;
    debug!(window = %id, "target focused");
    Ok(())
}
