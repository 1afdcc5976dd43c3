use crate::commands::{live_label, CmdMessage, CmdResult};
use crate::config::WidgetSettings;
use crate::error::Result;
use crate::session::{Phase, WidgetSession};

/// Opens the edit form of the item at `delta`.
pub fn open(
    session: &mut WidgetSession,
    settings: &WidgetSettings,
    delta: usize,
) -> Result<CmdResult> {
    let Some(label) = live_label(session, settings, delta, "open_edit") else {
        return Ok(CmdResult::ignored(format!("No item at {delta} to edit")));
    };
    session.set_phase(Phase::Editing {
        delta,
        selected_layout: None,
    });
    tracing::debug!(delta, "opened edit form");

    let mut result = CmdResult::rebuild().with_affected(vec![delta]);
    result.add_message(CmdMessage::info(format!("Edit {label}")));
    Ok(result)
}

/// Records the layout radio picked in the open form of a layout item.
///
/// Only the sub-form changes; nothing is stored on the item until save.
pub fn select_layout(
    session: &mut WidgetSession,
    settings: &WidgetSettings,
    delta: usize,
    layout: &str,
) -> Result<CmdResult> {
    if session.editing() != Some(delta) || !session.live(delta).is_some_and(|i| i.is_layout()) {
        tracing::warn!(delta, layout, "layout selected outside an open section form");
        return Ok(CmdResult::ignored(format!(
            "Item {delta} is not an open section"
        )));
    }
    if !settings.is_layout_allowed(layout) {
        tracing::warn!(delta, layout, "layout is not allowed");
        return Ok(CmdResult::ignored(format!("Layout {layout} is not allowed")));
    }
    session.set_phase(Phase::Editing {
        delta,
        selected_layout: Some(layout.to_string()),
    });
    Ok(CmdResult::rebuild().with_affected(vec![delta]))
}

/// Closes the edit form. An item that was never saved is dropped entirely.
///
/// Only the item whose form is open can be cancelled.
pub fn cancel(session: &mut WidgetSession, delta: usize) -> Result<CmdResult> {
    let Some(is_new) = session.live(delta).map(|item| item.is_new) else {
        tracing::warn!(delta, len = session.len(), "ignoring stale cancel");
        return Ok(CmdResult::ignored(format!("No item at {delta} to cancel")));
    };
    if session.editing() != Some(delta) {
        tracing::warn!(delta, editing = ?session.editing(), "cancel for a form that is not open");
        return Ok(CmdResult::ignored(format!("Item {delta} is not being edited")));
    }
    session.set_phase(Phase::Idle);
    if is_new {
        session.items_mut().remove(delta);
        tracing::debug!(delta, "discarded unsaved item");
        return Ok(CmdResult::rebuild());
    }
    Ok(CmdResult::rebuild().with_affected(vec![delta]))
}
