use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::commands::{CmdMessage, CmdResult};
use crate::config::WidgetSettings;
use crate::error::{ErlError, Result};
use crate::model::{ItemKind, ItemOptions, LayoutConfig, PendingPlacement};
use crate::session::{Phase, WidgetSession};
use crate::store::LayoutRegistry;

/// Values posted by the edit form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditSubmission {
    /// Entity field values.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    /// The checked layout radio, for sections.
    #[serde(default)]
    pub layout: Option<String>,
    /// Values of the layout configuration sub-form, when it was shown.
    #[serde(default)]
    pub layout_config: Option<LayoutConfig>,
    /// Legacy options form values.
    #[serde(default)]
    pub options: Option<ItemOptions>,
}

/// Commits the open form into the item at `delta` and closes it.
///
/// Everything is validated before the item is touched, so a failed save
/// leaves the session exactly as it was.
pub fn run<R: LayoutRegistry + ?Sized>(
    session: &mut WidgetSession,
    registry: &R,
    settings: &WidgetSettings,
    delta: usize,
    submission: &EditSubmission,
) -> Result<CmdResult> {
    let Some(item) = session.live(delta) else {
        tracing::warn!(delta, len = session.len(), "ignoring stale save");
        return Ok(CmdResult::ignored(format!("No item at {delta} to save")));
    };

    let mut layout = None;
    let mut layout_config = None;
    if item.is_layout() {
        // The radio of another section's open form never applies here.
        let selected = (session.editing() == Some(delta))
            .then(|| session.selected_layout())
            .flatten();
        let chosen = submission
            .layout
            .clone()
            .or_else(|| selected.map(str::to_string))
            .or_else(|| item.layout.clone())
            .ok_or(ErlError::LayoutRequired(delta))?;
        if !settings.is_layout_allowed(&chosen) {
            return Err(ErlError::UnknownLayout(chosen));
        }
        let existing = item
            .layout_config
            .as_ref()
            .filter(|_| item.layout.as_deref() == Some(chosen.as_str()));
        let mut plugin = registry.create_instance(&chosen, existing)?;
        layout_config = match &submission.layout_config {
            Some(values) => plugin.submit_config_form(values),
            None if plugin.has_config_form => Some(plugin.configuration().clone()),
            None => None,
        };
        layout = Some(chosen);
    }
    let options = (settings.always_show_options_form && item.is_layout())
        .then(|| submission.options.clone().unwrap_or_default())
        .filter(|options| !options.is_empty());

    let Some(item) = session.live_mut(delta) else {
        return Ok(CmdResult::ignored(format!("No item at {delta} to save")));
    };
    if let Some(entity) = item.entity.as_mut() {
        entity.extract_form_values(&submission.fields);
    }
    if item.kind == ItemKind::Layout {
        item.layout = layout;
        item.layout_config = layout_config;
        if settings.always_show_options_form {
            item.options = options;
        }
    }
    let was_new = item.is_new;
    item.is_new = false;
    let pending = item.pending.take();
    let label = item.bundle().map(|b| settings.label(b)).unwrap_or_default();

    let delta = match pending {
        Some(pending) => relocate(session, delta, &pending),
        None => delta,
    };
    session.set_phase(Phase::Idle);
    tracing::debug!(delta, was_new, "saved item");

    let mut result = CmdResult::rebuild().with_affected(vec![delta]);
    result.add_message(CmdMessage::success(format!("{label} saved")));
    Ok(result)
}

/// Moves a freshly saved item to where its add control pointed and returns
/// its new delta.
///
/// Sections land right after the span of the layout they were added after.
/// Content lands at the end of the span of its target layout, so the region
/// set at creation puts it in the right column. Hints that no longer match a
/// layout leave the item at the end of the list.
fn relocate(session: &mut WidgetSession, delta: usize, pending: &PendingPlacement) -> usize {
    let item = session.items_mut().remove(delta);
    let layouts = session.layout_deltas();
    let len = session.len();
    let at = match pending.parent_weight {
        Some(ordinal) if ordinal < layouts.len() => {
            layouts.get(ordinal + 1).copied().unwrap_or(len)
        }
        _ => len,
    };
    session.items_mut().insert(at, item);
    at
}
