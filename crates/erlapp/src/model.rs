//! # Domain Model: Items, Entities and Layout Plugins
//!
//! This module defines the data the widget session holds: [`Item`], the
//! external [`Entity`] it references, and the [`LayoutPlugin`] value that
//! describes a layout container.
//!
//! ## The Flat List
//!
//! The field value is a flat ordered list. Structure is implied by order:
//!
//! ```text
//! 0  Section (layout: two_col)        <-- Layout item, region ""
//! 1    Text    (region: left)         <-- belongs to the section above
//! 2    Image   (region: right)
//! 3  Section (layout: one_col)
//! 4    Quote   (region: main)
//! 5  Text      (region: "")           <-- no matching region: disabled bucket
//! ```
//!
//! A layout item owns the span of following content items whose region is one
//! of its plugin's regions. Layouts never nest.
//!
//! ## Positional Identity
//!
//! An item's `delta` is simply its index in the session list. It is recomputed
//! after every structural change and is never persisted as identity.
//!
//! ## Item Kind
//!
//! Whether an item is a layout container is decided once, when the item enters
//! the session, from [`BundleType::is_layout_container`]. Nothing re-derives it
//! later.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Identifier handed out by the entity store on first save.
pub type EntityId = Uuid;

/// Opaque layout plugin configuration.
pub type LayoutConfig = Map<String, Value>;

/// An external content object referenced by an [`Item`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// `None` until the entity store has saved it.
    #[serde(default)]
    pub id: Option<EntityId>,
    pub bundle: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl Entity {
    pub fn new(bundle: impl Into<String>) -> Self {
        Self {
            id: None,
            bundle: bundle.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Copies submitted form values onto the entity, overwriting existing keys.
    pub fn extract_form_values(&mut self, values: &BTreeMap<String, Value>) {
        for (name, value) in values {
            self.fields.insert(name.clone(), value.clone());
        }
    }
}

/// A bundle editors can add, with its layout capability fixed up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleType {
    pub id: String,
    pub label: String,
    pub is_layout_container: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Layout,
    Content,
}

/// Legacy presentation options, only collected when the options form is on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_classes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
}

impl ItemOptions {
    pub fn is_empty(&self) -> bool {
        self.container_classes.is_none() && self.bg_color.is_none()
    }
}

/// Placement hints captured from the add controls when an item is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPlacement {
    /// Target region name; empty for sections.
    #[serde(default)]
    pub region: String,
    /// Ordinal (among layouts) of the layout the item was added to or after.
    #[serde(default)]
    pub parent_weight: Option<usize>,
}

/// The hidden inputs an add control submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub bundle: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub parent_weight: Option<usize>,
}

impl AddItemRequest {
    pub fn pending(&self) -> PendingPlacement {
        PendingPlacement {
            region: self.region.clone(),
            parent_weight: self.parent_weight,
        }
    }
}

/// One entry in the session's ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// `None` once the item has been removed; the slot is kept until the next
    /// placement sync so rendered deltas stay valid.
    pub entity: Option<Entity>,
    pub kind: ItemKind,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub layout_config: Option<LayoutConfig>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub options: Option<ItemOptions>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub pending: Option<PendingPlacement>,
}

impl Item {
    /// A freshly added, unsaved item.
    pub fn new(entity: Entity, kind: ItemKind, pending: PendingPlacement) -> Self {
        let region = match kind {
            ItemKind::Layout => String::new(),
            ItemKind::Content => pending.region.clone(),
        };
        Self {
            entity: Some(entity),
            kind,
            layout: None,
            layout_config: None,
            region,
            options: None,
            is_new: true,
            pending: Some(pending),
        }
    }

    /// An item restored from a stored field value.
    pub fn existing(entity: Entity, kind: ItemKind) -> Self {
        Self {
            entity: Some(entity),
            kind,
            layout: None,
            layout_config: None,
            region: String::new(),
            options: None,
            is_new: false,
            pending: None,
        }
    }

    pub fn is_layout(&self) -> bool {
        self.kind == ItemKind::Layout
    }

    /// Removed items keep their slot but are no longer part of the field.
    pub fn is_detached(&self) -> bool {
        self.entity.is_none()
    }

    pub fn bundle(&self) -> Option<&str> {
        self.entity.as_ref().map(|e| e.bundle.as_str())
    }

    pub fn detach(&mut self) -> Option<Entity> {
        self.pending = None;
        self.entity.take()
    }
}

/// Static description of a layout plugin, as exposed by a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub regions: Vec<String>,
    #[serde(default)]
    pub has_config_form: bool,
    #[serde(default)]
    pub default_config: LayoutConfig,
}

/// A field rendered inside a layout configuration sub-form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigField {
    pub key: String,
    pub value: Value,
}

/// The configuration sub-form of a layout plugin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigForm {
    pub layout: String,
    pub title: String,
    pub fields: Vec<ConfigField>,
}

/// A configured layout instance.
///
/// The form methods only do something for plugins with a configuration form;
/// for the rest they return `None` and the sub-form is simply left out.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlugin {
    pub id: String,
    pub regions: Vec<String>,
    pub has_config_form: bool,
    config: LayoutConfig,
}

impl LayoutPlugin {
    pub fn new(definition: &LayoutDefinition, config: Option<&LayoutConfig>) -> Self {
        let mut merged = definition.default_config.clone();
        if let Some(config) = config {
            for (key, value) in config {
                merged.insert(key.clone(), value.clone());
            }
        }
        Self {
            id: definition.id.clone(),
            regions: definition.regions.clone(),
            has_config_form: definition.has_config_form,
            config: merged,
        }
    }

    pub fn build_config_form(&self) -> Option<ConfigForm> {
        if !self.has_config_form {
            return None;
        }
        Some(ConfigForm {
            layout: self.id.clone(),
            title: "Layout Configuration".to_string(),
            fields: self
                .config
                .iter()
                .map(|(key, value)| ConfigField {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        })
    }

    /// Applies submitted sub-form values and returns the resulting configuration.
    pub fn submit_config_form(&mut self, values: &LayoutConfig) -> Option<LayoutConfig> {
        if !self.has_config_form {
            return None;
        }
        for (key, value) in values {
            self.config.insert(key.clone(), value.clone());
        }
        Some(self.config.clone())
    }

    pub fn configuration(&self) -> &LayoutConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(has_form: bool) -> LayoutDefinition {
        let mut default_config = LayoutConfig::new();
        default_config.insert("column_widths".into(), json!("50-50"));
        LayoutDefinition {
            id: "two_col".into(),
            label: "Two column".into(),
            regions: vec!["left".into(), "right".into()],
            has_config_form: has_form,
            default_config,
        }
    }

    #[test]
    fn new_content_item_takes_pending_region() {
        let pending = PendingPlacement {
            region: "right".into(),
            parent_weight: Some(0),
        };
        let item = Item::new(Entity::new("text"), ItemKind::Content, pending);
        assert_eq!(item.region, "right");
        assert!(item.is_new);
        assert!(item.pending.is_some());
    }

    #[test]
    fn new_layout_item_never_has_region() {
        let pending = PendingPlacement {
            region: "right".into(),
            parent_weight: None,
        };
        let item = Item::new(Entity::new("section"), ItemKind::Layout, pending);
        assert_eq!(item.region, "");
    }

    #[test]
    fn detach_drops_entity() {
        let mut item = Item::existing(Entity::new("text"), ItemKind::Content);
        let entity = item.detach().unwrap();
        assert_eq!(entity.bundle, "text");
        assert!(item.is_detached());
        assert_eq!(item.bundle(), None);
    }

    #[test]
    fn extract_form_values_overwrites() {
        let mut entity = Entity::new("text");
        entity.fields.insert("body".into(), json!("old"));
        let mut values = BTreeMap::new();
        values.insert("body".to_string(), json!("new"));
        values.insert("title".to_string(), json!("Hello"));
        entity.extract_form_values(&values);
        assert_eq!(entity.fields["body"], json!("new"));
        assert_eq!(entity.fields["title"], json!("Hello"));
    }

    #[test]
    fn plugin_without_form_has_no_config_form() {
        let mut plugin = LayoutPlugin::new(&definition(false), None);
        assert!(plugin.build_config_form().is_none());
        assert!(plugin.submit_config_form(&LayoutConfig::new()).is_none());
    }

    #[test]
    fn plugin_config_merges_defaults_and_submission() {
        let mut existing = LayoutConfig::new();
        existing.insert("label".into(), json!("Hero"));
        let mut plugin = LayoutPlugin::new(&definition(true), Some(&existing));

        let form = plugin.build_config_form().unwrap();
        assert_eq!(form.fields.len(), 2);

        let mut submitted = LayoutConfig::new();
        submitted.insert("column_widths".into(), json!("67-33"));
        let config = plugin.submit_config_form(&submitted).unwrap();
        assert_eq!(config["column_widths"], json!("67-33"));
        assert_eq!(config["label"], json!("Hero"));
        assert_eq!(plugin.configuration(), &config);
    }
}
