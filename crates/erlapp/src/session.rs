//! # Widget Session
//!
//! A [`WidgetSession`] is the server-held state of one widget while its form
//! is being edited. It lives for one editing session and is passed explicitly
//! to every transition; nothing about it is global.
//!
//! ## Phases
//!
//! ```text
//!            add / open_edit            save / cancel_edit
//!   Idle ───────────────────▶ Editing ───────────────────▶ Idle
//!     │
//!     │ open_remove          confirm_remove / cancel_remove
//!     └──────────────▶ Confirming ─────────────────────────▶ Idle
//! ```
//!
//! Editing and confirming share one [`Phase`] slot, so entering one replaces
//! the other: the last transition wins.

use serde::{Deserialize, Serialize};

use crate::model::Item;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Editing {
        delta: usize,
        /// Layout picked in the open form but not saved yet.
        #[serde(default)]
        selected_layout: Option<String>,
    },
    Confirming {
        delta: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSession {
    field_name: String,
    items: Vec<Item>,
    phase: Phase,
}

impl WidgetSession {
    pub fn new(field_name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            field_name: field_name.into(),
            items,
            phase: Phase::Idle,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }

    /// Slot count, removed items included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items that still reference an entity.
    pub fn live_len(&self) -> usize {
        self.items.iter().filter(|i| !i.is_detached()).count()
    }

    /// The item at `delta`, unless it is out of range or removed.
    pub fn live(&self, delta: usize) -> Option<&Item> {
        self.items.get(delta).filter(|i| !i.is_detached())
    }

    pub(crate) fn live_mut(&mut self, delta: usize) -> Option<&mut Item> {
        self.items.get_mut(delta).filter(|i| !i.is_detached())
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn editing(&self) -> Option<usize> {
        match self.phase {
            Phase::Editing { delta, .. } => Some(delta),
            _ => None,
        }
    }

    pub fn confirming(&self) -> Option<usize> {
        match self.phase {
            Phase::Confirming { delta } => Some(delta),
            _ => None,
        }
    }

    pub fn selected_layout(&self) -> Option<&str> {
        match &self.phase {
            Phase::Editing {
                selected_layout, ..
            } => selected_layout.as_deref(),
            _ => None,
        }
    }

    /// Ordinals among live layout items, keyed by delta.
    pub fn layout_deltas(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_layout() && !item.is_detached() && item.pending.is_none())
            .map(|(delta, _)| delta)
            .collect()
    }
}
