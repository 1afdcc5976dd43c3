//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point a host uses to drive one widget through an editing session.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the session and its collaborators for the lifetime of the form
//! - **Dispatches** each [`Action`] to the matching command function
//! - **Orders** every form submission: placement sync first, then the action
//! - **Projects** the session into a [`WidgetView`] on request
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Rendering markup**: [`WidgetView`] is data, the host turns it into HTML
//! - **Client behaviour**: Drag and drop lives in [`crate::editor`]
//!
//! ## Form Submissions
//!
//! Every button in the widget posts the whole form. A [`FormSubmission`]
//! carries the hidden placement fields of every rendered item and, optionally,
//! the action whose button triggered it:
//!
//! ```text
//! FormSubmission { placements, trigger }
//!        │
//!        ├─ 1. sync placements   (reorder, set regions, drop tombstones)
//!        ├─ 2. remap trigger     (its delta was rendered before the sync)
//!        └─ 3. dispatch trigger  (add, open_edit, save, ...)
//! ```
//!
//! A submission without a trigger only syncs.
//!
//! ## Generic Over Collaborators
//!
//! `WidgetApi<E: EntityStore, L: LayoutRegistry>` is generic over entity
//! storage and the layout registry, so tests run entirely in memory.

use serde::{Deserialize, Serialize};

use crate::commands::{self, sync::DeltaMap, CmdResult};
use crate::commands::save::EditSubmission;
use crate::config::WidgetSettings;
use crate::error::Result;
use crate::model::{AddItemRequest, ConfigForm};
use crate::persist::{self, FieldValue, StoredValue};
use crate::placement::Placement;
use crate::session::WidgetSession;
use crate::store::{EntityStore, LayoutRegistry};
use crate::view::{self, WidgetView};

/// The button that triggered a form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Add(AddItemRequest),
    OpenEdit {
        delta: usize,
    },
    SelectLayout {
        delta: usize,
        layout: String,
    },
    OpenRemove {
        delta: usize,
    },
    ConfirmRemove {
        delta: usize,
    },
    CancelRemove,
    Save {
        delta: usize,
        #[serde(default)]
        submission: EditSubmission,
    },
    CancelEdit {
        delta: usize,
    },
}

impl Action {
    pub fn delta(&self) -> Option<usize> {
        match self {
            Action::Add(_) | Action::CancelRemove => None,
            Action::OpenEdit { delta }
            | Action::SelectLayout { delta, .. }
            | Action::OpenRemove { delta }
            | Action::ConfirmRemove { delta }
            | Action::Save { delta, .. }
            | Action::CancelEdit { delta } => Some(*delta),
        }
    }

    /// Rewrites the action's delta after a sync, or `None` if its item is gone.
    pub fn remap(mut self, map: &DeltaMap) -> Option<Self> {
        match &mut self {
            Action::Add(_) | Action::CancelRemove => {}
            Action::OpenEdit { delta }
            | Action::SelectLayout { delta, .. }
            | Action::OpenRemove { delta }
            | Action::ConfirmRemove { delta }
            | Action::Save { delta, .. }
            | Action::CancelEdit { delta } => *delta = map.get(*delta)?,
        }
        Some(self)
    }
}

/// Everything one widget posts when any of its buttons is pressed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    #[serde(default)]
    pub placements: Vec<Placement>,
    #[serde(default)]
    pub trigger: Option<Action>,
}

/// The main API facade for one widget.
pub struct WidgetApi<E: EntityStore, L: LayoutRegistry> {
    session: WidgetSession,
    entities: E,
    registry: L,
    settings: WidgetSettings,
}

impl<E: EntityStore, L: LayoutRegistry> WidgetApi<E, L> {
    /// A widget for an empty field.
    pub fn new(
        field_name: impl Into<String>,
        entities: E,
        registry: L,
        settings: WidgetSettings,
    ) -> Self {
        Self {
            session: WidgetSession::new(field_name, Vec::new()),
            entities,
            registry,
            settings,
        }
    }

    /// A widget for a field with stored values.
    pub fn load(
        field_name: impl Into<String>,
        values: &[StoredValue],
        entities: E,
        registry: L,
        settings: WidgetSettings,
    ) -> Result<Self> {
        let session = persist::load(field_name, values, &entities, &settings)?;
        Ok(Self {
            session,
            entities,
            registry,
            settings,
        })
    }

    pub fn session(&self) -> &WidgetSession {
        &self.session
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn entities(&self) -> &E {
        &self.entities
    }

    pub fn registry(&self) -> &L {
        &self.registry
    }

    /// Processes one posted form: placement sync, then the triggering action.
    pub fn submit(&mut self, submission: FormSubmission) -> Result<CmdResult> {
        let (synced, map) = commands::sync::run(&mut self.session, &submission.placements)?;
        let Some(action) = submission.trigger else {
            tracing::debug!("submission without trigger");
            return Ok(synced);
        };
        match action.clone().remap(&map) {
            Some(action) => self.dispatch(action),
            None => {
                tracing::warn!(?action, "trigger refers to a removed item");
                Ok(CmdResult::ignored("The item is no longer available"))
            }
        }
    }

    /// Runs one action against the current session, without a sync.
    pub fn dispatch(&mut self, action: Action) -> Result<CmdResult> {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::Add(request) => commands::add::run(
                &mut self.session,
                &mut self.entities,
                &self.settings,
                &request,
            ),
            Action::OpenEdit { delta } => {
                commands::edit::open(&mut self.session, &self.settings, delta)
            }
            Action::SelectLayout { delta, layout } => {
                commands::edit::select_layout(&mut self.session, &self.settings, delta, &layout)
            }
            Action::OpenRemove { delta } => {
                commands::remove::open(&mut self.session, &self.settings, delta)
            }
            Action::ConfirmRemove { delta } => {
                commands::remove::confirm(&mut self.session, &self.settings, delta)
            }
            Action::CancelRemove => commands::remove::cancel(&mut self.session),
            Action::Save { delta, submission } => commands::save::run(
                &mut self.session,
                &self.registry,
                &self.settings,
                delta,
                &submission,
            ),
            Action::CancelEdit { delta } => commands::edit::cancel(&mut self.session, delta),
        }
    }

    /// The element refresh: the current session as a view.
    pub fn refresh(&self) -> WidgetView {
        view::render(&self.session, &self.registry, &self.settings)
    }

    /// The layout configuration sub-form of the section at `delta`.
    pub fn layout_config_form(&self, delta: usize) -> Option<ConfigForm> {
        view::layout_config_form(&self.session, &self.registry, delta)
    }

    pub fn flatten(&self) -> Vec<FieldValue> {
        persist::flatten(&self.session, &self.registry)
    }

    /// Saves every entity and returns the values to store in the field.
    pub fn commit(&mut self) -> Result<Vec<StoredValue>> {
        persist::commit(&mut self.session, &self.registry, &mut self.entities)
    }
}
