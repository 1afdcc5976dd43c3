//! # Render Projection
//!
//! [`render`] turns a session into a [`WidgetView`]: the structure a host
//! turns into markup, and the structural editor attaches to. It is a pure
//! function of the session, the layout registry and the settings, so calling
//! it again without a transition in between yields the same view.
//!
//! ## What the View Carries
//!
//! - Sections in document order, each with its regions and their items.
//! - The disabled bucket, with the "no items" description flag.
//! - The hidden `weight` and `region` values of every item, computed by
//!   [`renumber`] over the projected tree.
//! - The add controls the settings allow.
//! - The open dialog, if the session is editing or confirming.
//!
//! Removed items are skipped. Items that were added but never saved are
//! rendered with `hidden` set, at the position their add control pointed to.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::config::WidgetSettings;
use crate::model::{BundleType, ConfigForm, Item, ItemOptions};
use crate::placement::{renumber, Arrangement, LayoutNode, NodeKey, Placement, RegionNode};
use crate::session::{Phase, WidgetSession};
use crate::store::LayoutRegistry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    pub field_name: String,
    pub wrapper_id: String,
    pub sections: Vec<SectionView>,
    pub disabled: DisabledView,
    pub add: AddControls,
    pub dialog: Option<Dialog>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub delta: usize,
    pub bundle: String,
    pub label: String,
    /// Unsaved items are rendered but not shown.
    pub hidden: bool,
    pub weight: Option<usize>,
    pub region: String,
    pub fields: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    #[serde(flatten)]
    pub item: ItemView,
    pub layout: Option<String>,
    pub layout_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ItemOptions>,
    pub regions: Vec<RegionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionView {
    pub name: String,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisabledView {
    pub items: Vec<ItemView>,
    /// Shown only while the bucket is empty.
    pub description_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddButton {
    pub bundle: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddControls {
    /// Choices behind every region's "Create New" control.
    pub items: Vec<BundleType>,
    /// One "Add {label}" button per section bundle.
    pub sections: Vec<AddButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "dialog", rename_all = "snake_case")]
pub enum Dialog {
    Edit(EditDialog),
    ConfirmRemove(RemoveDialog),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditDialog {
    pub delta: usize,
    pub title: String,
    pub fields: BTreeMap<String, Value>,
    pub layout_select: Option<LayoutSelect>,
    pub config_form: Option<ConfigForm>,
    pub options_form: Option<ItemOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOption {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSelect {
    pub options: Vec<LayoutOption>,
    pub selected: Option<String>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveDialog {
    pub delta: usize,
    pub title: String,
    pub message: String,
}

/// Projects the session into its rendered form.
pub fn render<R: LayoutRegistry + ?Sized>(
    session: &WidgetSession,
    registry: &R,
    settings: &WidgetSettings,
) -> WidgetView {
    let items = session.items();
    let arrangement = Arrangement::project(items, registry);
    let placements: HashMap<NodeKey, Placement> = renumber(&arrangement)
        .into_iter()
        .map(|p| (p.key, p))
        .collect();
    let view_of = |delta: NodeKey| item_view(items, settings, &placements, delta);

    let sections = arrangement
        .layouts
        .iter()
        .map(|layout| {
            let item = &items[layout.key];
            SectionView {
                item: view_of(layout.key),
                layout: item.layout.clone(),
                layout_label: item
                    .layout
                    .as_deref()
                    .and_then(|id| registry.definition(id))
                    .map(|d| d.label.clone()),
                options: item.options.clone(),
                regions: layout
                    .regions
                    .iter()
                    .map(|region| RegionView {
                        name: region.name.clone(),
                        items: region.items.iter().map(|&k| view_of(k)).collect(),
                    })
                    .collect(),
            }
        })
        .collect();

    let disabled = DisabledView {
        items: arrangement.disabled.iter().map(|&k| view_of(k)).collect(),
        description_visible: arrangement.disabled.is_empty(),
    };

    let add = AddControls {
        items: settings.item_bundles(),
        sections: settings
            .section_bundles()
            .into_iter()
            .map(|b| AddButton {
                label: format!("Add {}", b.label),
                bundle: b.id,
            })
            .collect(),
    };

    WidgetView {
        field_name: session.field_name().to_string(),
        wrapper_id: format!("{}-wrapper", session.field_name().replace('_', "-")),
        sections,
        disabled,
        add,
        dialog: dialog(session, registry, settings),
    }
}

fn item_view(
    items: &[Item],
    settings: &WidgetSettings,
    placements: &HashMap<NodeKey, Placement>,
    delta: NodeKey,
) -> ItemView {
    let item = &items[delta];
    let bundle = item.bundle().unwrap_or_default().to_string();
    let placement = placements.get(&delta);
    ItemView {
        delta,
        label: settings.label(&bundle),
        bundle,
        hidden: item.is_new,
        weight: placement.and_then(|p| p.weight),
        region: placement.map(|p| p.region.clone()).unwrap_or_default(),
        fields: item
            .entity
            .as_ref()
            .map(|e| e.fields.clone())
            .unwrap_or_default(),
    }
}

fn dialog<R: LayoutRegistry + ?Sized>(
    session: &WidgetSession,
    registry: &R,
    settings: &WidgetSettings,
) -> Option<Dialog> {
    match session.phase() {
        Phase::Idle => None,
        Phase::Editing { delta, .. } => {
            let item = session.live(*delta)?;
            let entity = item.entity.as_ref()?;
            let label = settings.label(&entity.bundle);
            let title = if entity.is_saved() {
                format!("Edit {label}")
            } else {
                format!("Create new {label}")
            };
            let layout_select = item.is_layout().then(|| LayoutSelect {
                options: settings
                    .available_layouts()
                    .into_iter()
                    .map(|(id, label)| LayoutOption { id, label })
                    .collect(),
                selected: session
                    .selected_layout()
                    .map(str::to_string)
                    .or_else(|| item.layout.clone()),
                required: true,
            });
            let options_form = (item.is_layout() && settings.always_show_options_form)
                .then(|| item.options.clone().unwrap_or_default());
            Some(Dialog::Edit(EditDialog {
                delta: *delta,
                title,
                fields: entity.fields.clone(),
                layout_select,
                config_form: layout_config_form(session, registry, *delta),
                options_form,
            }))
        }
        Phase::Confirming { delta } => {
            let label = settings.label(session.live(*delta)?.bundle()?);
            Some(Dialog::ConfirmRemove(RemoveDialog {
                delta: *delta,
                title: "Confirm removal".to_string(),
                message: format!(
                    "Are you sure you want to permanently remove this {label}? This action cannot be undone."
                ),
            }))
        }
    }
}

/// The layout configuration sub-form of the section at `delta`.
///
/// Follows the layout picked in the open form when there is one, otherwise
/// the saved layout. `None` for content items, sections without a layout, and
/// plugins that have no configuration form.
pub fn layout_config_form<R: LayoutRegistry + ?Sized>(
    session: &WidgetSession,
    registry: &R,
    delta: usize,
) -> Option<ConfigForm> {
    let item = session.live(delta).filter(|i| i.is_layout())?;
    let selected = if session.editing() == Some(delta) {
        session.selected_layout()
    } else {
        None
    };
    let layout = selected.or(item.layout.as_deref())?;
    let existing = item
        .layout_config
        .as_ref()
        .filter(|_| item.layout.as_deref() == Some(layout));
    match registry.create_instance(layout, existing) {
        Ok(plugin) => plugin.build_config_form(),
        Err(err) => {
            tracing::warn!(delta, layout, %err, "cannot build layout config form");
            None
        }
    }
}

impl WidgetView {
    /// All items in document order, sections included.
    pub fn items(&self) -> impl Iterator<Item = &ItemView> {
        self.sections
            .iter()
            .flat_map(|s| {
                std::iter::once(&s.item).chain(s.regions.iter().flat_map(|r| r.items.iter()))
            })
            .chain(self.disabled.items.iter())
    }

    pub fn item(&self, delta: usize) -> Option<&ItemView> {
        self.items().find(|i| i.delta == delta)
    }
}

impl Arrangement {
    /// Rebuilds the structural tree from a rendered view.
    pub fn from_view(view: &WidgetView) -> Self {
        Arrangement {
            layouts: view
                .sections
                .iter()
                .map(|section| LayoutNode {
                    key: section.item.delta,
                    regions: section
                        .regions
                        .iter()
                        .map(|region| RegionNode {
                            name: region.name.clone(),
                            items: region.items.iter().map(|i| i.delta).collect(),
                        })
                        .collect(),
                })
                .collect(),
            disabled: view.disabled.items.iter().map(|i| i.delta).collect(),
        }
    }
}
