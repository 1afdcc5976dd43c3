//! # External Collaborators
//!
//! The widget does not own entity storage or layout plugins. It talks to them
//! through two narrow traits:
//!
//! - [`EntityStore`]: creates unsaved entities, loads and saves them.
//! - [`LayoutRegistry`]: describes layout plugins and instantiates them with
//!   a configuration.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryEntityStore`]: a `HashMap` keyed by entity id, used by
//!   tests and the CLI driver.
//! - [`memory::StaticLayoutRegistry`]: a fixed set of [`LayoutDefinition`]s.
//!
//! Production hosts implement these traits over their own storage and plugin
//! systems; nothing in the session depends on how they work.

use crate::error::{ErlError, Result};
use crate::model::{Entity, EntityId, LayoutConfig, LayoutDefinition, LayoutPlugin};

pub mod memory;

/// Abstract interface for entity storage.
pub trait EntityStore {
    /// Instantiate a new, unsaved entity of the given bundle.
    fn create_entity(&mut self, bundle: &str) -> Result<Entity>;

    /// Load a saved entity by id.
    fn load_entity(&self, id: &EntityId) -> Result<Entity>;

    /// Save an entity, assigning an id on first save.
    fn save_entity(&mut self, entity: &mut Entity) -> Result<EntityId>;
}

/// Abstract interface for the layout plugin registry.
pub trait LayoutRegistry {
    fn definition(&self, layout_id: &str) -> Option<&LayoutDefinition>;

    /// Region names of a layout, empty for unknown layouts.
    fn regions(&self, layout_id: &str) -> Vec<String> {
        self.definition(layout_id)
            .map(|d| d.regions.clone())
            .unwrap_or_default()
    }

    fn create_instance(
        &self,
        layout_id: &str,
        config: Option<&LayoutConfig>,
    ) -> Result<LayoutPlugin> {
        self.definition(layout_id)
            .map(|definition| LayoutPlugin::new(definition, config))
            .ok_or_else(|| ErlError::UnknownLayout(layout_id.to_string()))
    }
}
