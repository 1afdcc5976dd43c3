//! # Widget Settings
//!
//! Widget settings are managed by [`confique`], which handles layered loading
//! from a TOML file and environment variables on top of compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `ERL_NEGATE`, `ERL_ALWAYS_SHOW_OPTIONS_FORM`.
//! 2. **Settings file**: `erl.toml`, passed explicitly by the host.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `target_bundles` | `[]` | Bundles editors may add |
//! | `layout_bundles` | `[]` | Bundles that act as layout containers (sections) |
//! | `negate` | `false` | Treat `target_bundles` as an exclusion list over `bundle_labels` |
//! | `bundle_labels` | none | Human labels per bundle; also the known bundle list |
//! | `allowed_layouts` | none | Layout ids grouped by category; none means unrestricted |
//! | `always_show_options_form` | `false` | Show the legacy classes/background form |
//!
//! Layout capability is decided here, once: [`WidgetSettings::bundle_type`]
//! returns a [`BundleType`] whose `is_layout_container` flag travels with the
//! item for the rest of the session.

use confique::Config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::model::BundleType;

/// Settings for one widget instance, stored in `erl.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WidgetSettings {
    /// Bundles editors may add to the field.
    #[config(default = [])]
    pub target_bundles: Vec<String>,

    /// Bundles whose items are layout containers.
    #[config(default = [])]
    pub layout_bundles: Vec<String>,

    /// When set, `target_bundles` lists the bundles to exclude.
    #[config(env = "ERL_NEGATE", default = false)]
    pub negate: bool,

    /// Bundle id to label.
    pub bundle_labels: Option<BTreeMap<String, String>>,

    /// Group name to (layout id to label).
    pub allowed_layouts: Option<BTreeMap<String, BTreeMap<String, String>>>,

    /// Collect legacy container classes and background colour for layouts.
    #[config(env = "ERL_ALWAYS_SHOW_OPTIONS_FORM", default = false)]
    pub always_show_options_form: bool,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            target_bundles: Vec::new(),
            layout_bundles: Vec::new(),
            negate: false,
            bundle_labels: None,
            allowed_layouts: None,
            always_show_options_form: false,
        }
    }
}

impl WidgetSettings {
    /// Loads settings from the environment and an optional TOML file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = WidgetSettings::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    pub fn label(&self, bundle: &str) -> String {
        self.bundle_labels
            .as_ref()
            .and_then(|labels| labels.get(bundle))
            .cloned()
            .unwrap_or_else(|| bundle.to_string())
    }

    pub fn is_layout_bundle(&self, bundle: &str) -> bool {
        self.layout_bundles.iter().any(|b| b == bundle)
    }

    /// Target bundles after applying `negate`.
    pub fn effective_target_bundles(&self) -> Vec<String> {
        if !self.negate {
            return self.target_bundles.clone();
        }
        self.bundle_labels
            .as_ref()
            .map(|labels| {
                labels
                    .keys()
                    .filter(|b| !self.target_bundles.contains(b))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves a bundle editors may add, or `None` if it is not allowed.
    pub fn bundle_type(&self, bundle: &str) -> Option<BundleType> {
        let is_layout = self.is_layout_bundle(bundle);
        if !is_layout && !self.effective_target_bundles().iter().any(|b| b == bundle) {
            return None;
        }
        Some(BundleType {
            id: bundle.to_string(),
            label: self.label(bundle),
            is_layout_container: is_layout,
        })
    }

    /// Bundles offered by the per-region "add item" controls.
    pub fn item_bundles(&self) -> Vec<BundleType> {
        self.effective_target_bundles()
            .iter()
            .filter(|b| !self.is_layout_bundle(b))
            .filter_map(|b| self.bundle_type(b))
            .collect()
    }

    /// Bundles offered by the "add section" controls.
    pub fn section_bundles(&self) -> Vec<BundleType> {
        self.layout_bundles
            .iter()
            .filter_map(|b| self.bundle_type(b))
            .collect()
    }

    /// Allowed layouts flattened into `(id, label)` pairs for the radios.
    pub fn available_layouts(&self) -> Vec<(String, String)> {
        self.allowed_layouts
            .iter()
            .flat_map(|groups| groups.values())
            .flat_map(|group| group.iter())
            .map(|(id, label)| (id.clone(), label.clone()))
            .collect()
    }

    pub fn is_layout_allowed(&self, layout: &str) -> bool {
        match &self.allowed_layouts {
            None => true,
            Some(_) => self.available_layouts().iter().any(|(id, _)| id == layout),
        }
    }

    pub fn summary(&self) -> Vec<String> {
        if self.always_show_options_form {
            vec!["Layout configuration: Show extra options form (deprecated).".to_string()]
        } else {
            vec!["Layout configuration: Rely on Layout Plugins (preferred).".to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn settings() -> WidgetSettings {
        let mut labels = BTreeMap::new();
        labels.insert("section".to_string(), "Section".to_string());
        labels.insert("text".to_string(), "Text".to_string());
        labels.insert("image".to_string(), "Image".to_string());
        WidgetSettings {
            target_bundles: vec!["section".into(), "text".into(), "image".into()],
            layout_bundles: vec!["section".into()],
            bundle_labels: Some(labels),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = WidgetSettings::default();
        assert!(settings.target_bundles.is_empty());
        assert!(!settings.negate);
        assert!(settings.item_bundles().is_empty());
        assert!(settings.is_layout_allowed("anything"));
    }

    #[test]
    fn test_item_bundles_exclude_layouts() {
        let ids: Vec<String> = settings().item_bundles().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["text", "image"]);
    }

    #[test]
    fn test_section_bundles_are_layout_containers() {
        let sections = settings().section_bundles();
        assert_eq!(sections.len(), 1);
        assert!(sections[0].is_layout_container);
        assert_eq!(sections[0].label, "Section");
    }

    #[test]
    fn test_negate_excludes_listed_bundles() {
        let settings = WidgetSettings {
            target_bundles: vec!["image".into()],
            negate: true,
            ..settings()
        };
        let ids: Vec<String> = settings.item_bundles().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["text"]);
        assert!(settings.bundle_type("image").is_none());
    }

    #[test]
    fn test_unknown_bundle_has_no_type() {
        assert!(settings().bundle_type("video").is_none());
    }

    #[test]
    fn test_label_falls_back_to_id() {
        assert_eq!(settings().label("video"), "video");
    }

    #[test]
    fn test_allowed_layouts_flatten() {
        let mut group = BTreeMap::new();
        group.insert("one_col".to_string(), "One column".to_string());
        group.insert("two_col".to_string(), "Two column".to_string());
        let mut groups = BTreeMap::new();
        groups.insert("Columns".to_string(), group);
        let settings = WidgetSettings {
            allowed_layouts: Some(groups),
            ..Default::default()
        };
        assert_eq!(settings.available_layouts().len(), 2);
        assert!(settings.is_layout_allowed("two_col"));
        assert!(!settings.is_layout_allowed("three_col"));
    }

    #[test]
    fn test_summary_mentions_options_form() {
        let settings = WidgetSettings {
            always_show_options_form: true,
            ..Default::default()
        };
        assert!(settings.summary()[0].contains("extra options form"));
        assert!(WidgetSettings::default().summary()[0].contains("Layout Plugins"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("erl.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
target_bundles = ["text", "section"]
layout_bundles = ["section"]

[bundle_labels]
text = "Text"
section = "Section"
"#
        )
        .unwrap();

        let settings = WidgetSettings::load(Some(&path)).unwrap();

        assert_eq!(settings.layout_bundles, vec!["section"]);
        assert_eq!(settings.label("text"), "Text");
        assert!(!settings.always_show_options_form);
    }
}
