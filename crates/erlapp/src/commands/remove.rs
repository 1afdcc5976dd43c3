use crate::commands::{live_label, CmdMessage, CmdResult};
use crate::config::WidgetSettings;
use crate::error::Result;
use crate::session::{Phase, WidgetSession};

/// Asks for confirmation before removing the item at `delta`.
pub fn open(
    session: &mut WidgetSession,
    settings: &WidgetSettings,
    delta: usize,
) -> Result<CmdResult> {
    let Some(label) = live_label(session, settings, delta, "open_remove") else {
        return Ok(CmdResult::ignored(format!("No item at {delta} to remove")));
    };
    session.set_phase(Phase::Confirming { delta });

    let mut result = CmdResult::rebuild().with_affected(vec![delta]);
    result.add_message(CmdMessage::warning(format!(
        "Are you sure you want to permanently remove this {label}? This action cannot be undone."
    )));
    Ok(result)
}

/// Detaches the entity at `delta`.
///
/// The slot stays in the list as an empty tombstone so every rendered delta
/// keeps pointing at the same item. Render and persistence skip it, and the
/// next placement sync drops it.
pub fn confirm(
    session: &mut WidgetSession,
    settings: &WidgetSettings,
    delta: usize,
) -> Result<CmdResult> {
    let Some(label) = live_label(session, settings, delta, "confirm_remove") else {
        return Ok(CmdResult::ignored(format!("No item at {delta} to remove")));
    };
    if let Some(item) = session.live_mut(delta) {
        item.detach();
    }
    session.set_phase(Phase::Idle);
    tracing::debug!(delta, "removed item");

    let mut result = CmdResult::rebuild().with_affected(vec![delta]);
    result.add_message(CmdMessage::success(format!("{label} removed")));
    Ok(result)
}

/// Closes the confirmation dialog.
pub fn cancel(session: &mut WidgetSession) -> Result<CmdResult> {
    let Some(delta) = session.confirming() else {
        tracing::debug!("no removal pending");
        return Ok(CmdResult::ignored("No removal pending"));
    };
    session.set_phase(Phase::Idle);
    Ok(CmdResult::rebuild().with_affected(vec![delta]))
}
