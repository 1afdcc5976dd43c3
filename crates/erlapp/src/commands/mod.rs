//! # Command Layer
//!
//! This module holds the session transitions. Each one lives in its own
//! submodule as plain functions over a [`WidgetSession`] and the external
//! collaborators it needs.
//!
//! ## Role and Responsibilities
//!
//! - Validate the transition input against the session
//! - Mutate the item list and the phase slot
//! - Return a structured [`CmdResult`] saying whether the widget must be
//!   re-rendered, which deltas were touched, and any messages
//!
//! Commands never render. The view is a separate projection ([`crate::view`])
//! computed after the transition.
//!
//! ## Defensive No-ops
//!
//! Out-of-range or stale deltas are not errors. The form they came from was
//! rendered against an older session, so the transition logs a warning and
//! returns [`CmdResult::ignored`]. Only genuinely broken input (unknown
//! bundles, missing layouts, store failures) becomes an [`crate::error::ErlError`].
//!
//! ## Command Modules
//!
//! - [`add`]: Append a new unsaved item and open it for edit
//! - [`edit`]: Open, re-target and cancel the edit form
//! - [`remove`]: Open, confirm and cancel the removal dialog
//! - [`save`]: Commit the edit form into the item
//! - [`sync`]: Apply client-side placements before any transition

use serde::Serialize;

use crate::session::WidgetSession;

pub mod add;
pub mod edit;
pub mod remove;
pub mod save;
pub mod sync;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CmdResult {
    /// Deltas touched by the transition, as they are after it.
    pub affected: Vec<usize>,
    pub messages: Vec<CmdMessage>,
    /// Whether the host must rebuild and re-render the widget.
    pub rebuild: bool,
}

impl CmdResult {
    pub fn rebuild() -> Self {
        Self {
            rebuild: true,
            ..Default::default()
        }
    }

    /// A transition that was skipped because its input was stale.
    pub fn ignored(reason: impl Into<String>) -> Self {
        Self {
            messages: vec![CmdMessage::warning(reason)],
            ..Default::default()
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, affected: Vec<usize>) -> Self {
        self.affected = affected;
        self
    }
}

/// Looks up the label of the live item at `delta`, or logs why it can't.
pub(crate) fn live_label(
    session: &WidgetSession,
    settings: &crate::config::WidgetSettings,
    delta: usize,
    action: &str,
) -> Option<String> {
    match session.live(delta).and_then(|item| item.bundle()) {
        Some(bundle) => Some(settings.label(bundle)),
        None => {
            tracing::warn!(delta, len = session.len(), action, "ignoring stale delta");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::model::{Entity, Item, ItemKind};
    use crate::session::WidgetSession;

    pub(crate) fn layout(id: &str) -> Item {
        let mut entity = Entity::new("section");
        entity.id = Some(uuid::Uuid::new_v4());
        let mut item = Item::existing(entity, ItemKind::Layout);
        item.layout = Some(id.into());
        item
    }

    pub(crate) fn content(region: &str) -> Item {
        let mut entity = Entity::new("text");
        entity.id = Some(uuid::Uuid::new_v4());
        let mut item = Item::existing(entity, ItemKind::Content);
        item.region = region.into();
        item
    }

    /// `[two_col(left: 1 | right: 2)] [one_col(main: 4)]`.
    pub(crate) fn session() -> WidgetSession {
        WidgetSession::new(
            "field_body",
            vec![
                layout("two_col"),
                content("left"),
                content("right"),
                layout("one_col"),
                content("main"),
            ],
        )
    }
}
