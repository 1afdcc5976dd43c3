use super::{EntityStore, LayoutRegistry};
use crate::error::{ErlError, Result};
use crate::model::{Entity, EntityId, LayoutDefinition};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// In-memory entity storage for tests and the CLI driver.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    entities: HashMap<EntityId, Entity>,
    simulate_write_error: bool,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityStore for InMemoryEntityStore {
    fn create_entity(&mut self, bundle: &str) -> Result<Entity> {
        Ok(Entity::new(bundle))
    }

    fn load_entity(&self, id: &EntityId) -> Result<Entity> {
        self.entities
            .get(id)
            .cloned()
            .ok_or_else(|| ErlError::entity_not_found(id))
    }

    fn save_entity(&mut self, entity: &mut Entity) -> Result<EntityId> {
        if self.simulate_write_error {
            return Err(ErlError::Store("Simulated write error".to_string()));
        }
        let id = *entity.id.get_or_insert_with(Uuid::new_v4);
        self.entities.insert(id, entity.clone());
        Ok(id)
    }
}

/// A fixed set of layout definitions.
#[derive(Debug, Default, Clone)]
pub struct StaticLayoutRegistry {
    definitions: BTreeMap<String, LayoutDefinition>,
}

impl StaticLayoutRegistry {
    pub fn new(definitions: impl IntoIterator<Item = LayoutDefinition>) -> Self {
        Self {
            definitions: definitions
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
        }
    }
}

impl LayoutRegistry for StaticLayoutRegistry {
    fn definition(&self, layout_id: &str) -> Option<&LayoutDefinition> {
        self.definitions.get(layout_id)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::config::WidgetSettings;
    use crate::model::LayoutConfig;
    use serde_json::json;

    /// Two layouts: `two_col` (left/right, configurable) and `one_col` (main).
    pub fn layouts() -> StaticLayoutRegistry {
        let mut two_col_config = LayoutConfig::new();
        two_col_config.insert("column_widths".into(), json!("50-50"));
        StaticLayoutRegistry::new([
            LayoutDefinition {
                id: "two_col".into(),
                label: "Two column".into(),
                regions: vec!["left".into(), "right".into()],
                has_config_form: true,
                default_config: two_col_config,
            },
            LayoutDefinition {
                id: "one_col".into(),
                label: "One column".into(),
                regions: vec!["main".into()],
                has_config_form: false,
                default_config: LayoutConfig::new(),
            },
        ])
    }

    /// `section` is the layout bundle; `text` and `image` are content.
    pub fn settings() -> WidgetSettings {
        let mut labels = BTreeMap::new();
        labels.insert("section".to_string(), "Section".to_string());
        labels.insert("text".to_string(), "Text".to_string());
        labels.insert("image".to_string(), "Image".to_string());
        let mut columns = BTreeMap::new();
        columns.insert("one_col".to_string(), "One column".to_string());
        columns.insert("two_col".to_string(), "Two column".to_string());
        let mut groups = BTreeMap::new();
        groups.insert("Columns".to_string(), columns);
        WidgetSettings {
            target_bundles: vec!["section".into(), "text".into(), "image".into()],
            layout_bundles: vec!["section".into()],
            bundle_labels: Some(labels),
            allowed_layouts: Some(groups),
            ..Default::default()
        }
    }
}
