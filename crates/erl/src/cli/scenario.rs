//! Scenario files and their replay.
//!
//! ```json
//! {
//!   "field_name": "field_page",
//!   "layouts": [{ "id": "two_col", "label": "Two columns", "regions": ["left", "right"] }],
//!   "settings": { "target_bundles": ["text"], "layout_bundles": ["section"] },
//!   "steps": [
//!     { "step": "add_section", "bundle": "section" },
//!     { "step": "submit", "trigger": { "action": "save", "delta": 0,
//!       "submission": { "layout": "two_col" } } },
//!     { "step": "add_item", "bundle": "text", "layout": 0, "region": "right" },
//!     { "step": "drag", "key": 1, "target": { "kind": "disabled" } },
//!     { "step": "sync" }
//!   ]
//! }
//! ```
//!
//! Keys and deltas always refer to the most recent render.

use anyhow::{anyhow, Context, Result};
use erlapp::api::{Action, WidgetApi};
use erlapp::commands::{CmdMessage, CmdResult};
use erlapp::config::WidgetSettings;
use erlapp::editor::{DropOutcome, GrabTarget, StructuralEditor};
use erlapp::model::LayoutDefinition;
use erlapp::placement::{Container, NodeKey, Sibling};
use erlapp::store::memory::{InMemoryEntityStore, StaticLayoutRegistry};
use erlapp::view::WidgetView;
use serde::Deserialize;
use std::path::Path;

fn default_field_name() -> String {
    "field_layout".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default = "default_field_name")]
    pub field_name: String,
    #[serde(default)]
    pub layouts: Vec<LayoutDefinition>,
    #[serde(default)]
    pub settings: Option<WidgetSettings>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Drag `key` by its handle and drop it before `sibling` in `target`.
    Drag {
        key: NodeKey,
        target: Container,
        #[serde(default)]
        sibling: Option<Sibling>,
    },
    MoveUp {
        key: NodeKey,
    },
    MoveDown {
        key: NodeKey,
    },
    /// Press a region's "Create New" button for `bundle`.
    AddItem {
        bundle: String,
        layout: NodeKey,
        region: String,
    },
    /// Press an "Add section" button, placing the section after `after`.
    AddSection {
        bundle: String,
        #[serde(default)]
        after: Option<NodeKey>,
    },
    /// Post the form with a triggering action.
    Submit {
        trigger: Action,
    },
    /// Post the form without a trigger.
    Sync,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Drag { .. } => "drag",
            Step::MoveUp { .. } => "move_up",
            Step::MoveDown { .. } => "move_down",
            Step::AddItem { .. } => "add_item",
            Step::AddSection { .. } => "add_section",
            Step::Submit { .. } => "submit",
            Step::Sync => "sync",
        }
    }
}

impl Scenario {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }
}

fn step_message(key: NodeKey, moved: bool) -> CmdMessage {
    if moved {
        CmdMessage::info(format!("Moved item {}", key))
    } else {
        CmdMessage::warning(format!("Item {} cannot move further", key))
    }
}

pub type Widget = WidgetApi<InMemoryEntityStore, StaticLayoutRegistry>;

/// A widget plus the editor attached to its latest render.
pub struct Driver {
    widget: Widget,
    editor: StructuralEditor,
}

impl Driver {
    pub fn new(field_name: &str, layouts: Vec<LayoutDefinition>, settings: WidgetSettings) -> Self {
        let widget = WidgetApi::new(
            field_name,
            InMemoryEntityStore::new(),
            StaticLayoutRegistry::new(layouts),
            settings,
        );
        let editor = StructuralEditor::attach(&widget.refresh());
        Self { widget, editor }
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut Widget {
        &mut self.widget
    }

    pub fn view(&self) -> WidgetView {
        self.widget.refresh()
    }

    /// Applies one step and returns what it reported.
    pub fn apply(&mut self, step: &Step) -> Result<Vec<CmdMessage>> {
        tracing::debug!(step = step.name(), "apply");
        match step {
            Step::Drag {
                key,
                target,
                sibling,
            } => {
                if self.editor.grab(*key, GrabTarget::Handle).is_none() {
                    return Ok(vec![CmdMessage::warning(format!("Item {} cannot be dragged", key))]);
                }
                Ok(match self.editor.drop(target, sibling.as_ref()) {
                    DropOutcome::Moved => vec![CmdMessage::info(format!("Moved item {}", key))],
                    DropOutcome::Rejected => {
                        vec![CmdMessage::warning(format!("Drop of item {} rejected", key))]
                    }
                })
            }
            Step::MoveUp { key } => {
                let moved = self.editor.move_up(*key);
                Ok(vec![step_message(*key, moved)])
            }
            Step::MoveDown { key } => {
                let moved = self.editor.move_down(*key);
                Ok(vec![step_message(*key, moved)])
            }
            Step::AddItem {
                bundle,
                layout,
                region,
            } => {
                let request = self
                    .editor
                    .request_add_item(bundle, *layout, region)
                    .ok_or_else(|| anyhow!("section {} has no region '{}'", layout, region))?;
                self.post(Some(Action::Add(request)))
            }
            Step::AddSection { bundle, after } => {
                let request = self.editor.request_add_section(bundle, *after);
                self.post(Some(Action::Add(request)))
            }
            Step::Submit { trigger } => self.post(Some(trigger.clone())),
            Step::Sync => self.post(None),
        }
    }

    /// Posts the form as the editor currently sees it, then re-attaches.
    fn post(&mut self, trigger: Option<Action>) -> Result<Vec<CmdMessage>> {
        let result: CmdResult = self.widget.submit(self.editor.submission(trigger))?;
        self.editor = StructuralEditor::attach(&self.widget.refresh());
        Ok(result.messages)
    }
}
