//! # Persistence Adapter
//!
//! Converts between a session and the values stored in the field. A stored
//! value is a flat tuple:
//!
//! ```text
//! (target_id, layout | null, layout_config | null, region, options)
//! ```
//!
//! Values are written in document order, so loading them back yields the
//! same structure. Regions are taken from the projected tree rather than the
//! item, which means content that rendered in the disabled bucket is stored
//! with an empty region and stays disabled after a reload.
//!
//! Removed items and items that were never saved are not part of the field.

use serde::{Deserialize, Serialize};

use crate::config::WidgetSettings;
use crate::error::Result;
use crate::model::{Entity, EntityId, Item, ItemKind, ItemOptions, LayoutConfig};
use crate::placement::{renumber, Arrangement};
use crate::session::WidgetSession;
use crate::store::{EntityStore, LayoutRegistry};

/// One field value before its entity has been saved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValue {
    pub delta: usize,
    pub entity: Entity,
    pub layout: Option<String>,
    pub layout_config: Option<LayoutConfig>,
    pub region: String,
    pub options: Option<ItemOptions>,
}

/// One field value as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    pub target_id: EntityId,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub layout_config: Option<LayoutConfig>,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ItemOptions>,
}

/// Flattens the session into field values, in document order.
pub fn flatten<R: LayoutRegistry + ?Sized>(
    session: &WidgetSession,
    registry: &R,
) -> Vec<FieldValue> {
    let items = session.items();
    renumber(&Arrangement::project(items, registry))
        .into_iter()
        .filter_map(|placement| {
            let item = &items[placement.key];
            if item.is_new {
                return None;
            }
            let entity = item.entity.clone()?;
            Some(FieldValue {
                delta: placement.key,
                entity,
                layout: item.layout.clone(),
                layout_config: item.layout_config.clone(),
                region: placement.region,
                options: item.options.clone(),
            })
        })
        .collect()
}

/// Saves every entity of the field and returns the values to store.
///
/// Entities get their ids on first save; the session keeps them, so a second
/// commit does not create duplicates.
pub fn commit<R: LayoutRegistry + ?Sized, E: EntityStore + ?Sized>(
    session: &mut WidgetSession,
    registry: &R,
    entities: &mut E,
) -> Result<Vec<StoredValue>> {
    let values = flatten(session, registry);
    let mut stored = Vec::with_capacity(values.len());
    for value in values {
        let Some(entity) = session.live_mut(value.delta).and_then(|i| i.entity.as_mut()) else {
            continue;
        };
        let target_id = entities.save_entity(entity)?;
        stored.push(StoredValue {
            target_id,
            layout: value.layout,
            layout_config: value.layout_config,
            region: value.region,
            options: value.options,
        });
    }
    tracing::debug!(values = stored.len(), "committed field");
    Ok(stored)
}

/// Builds the initial session from stored values.
pub fn load<E: EntityStore + ?Sized>(
    field_name: impl Into<String>,
    values: &[StoredValue],
    entities: &E,
    settings: &WidgetSettings,
) -> Result<WidgetSession> {
    let mut items = Vec::with_capacity(values.len());
    for value in values {
        let entity = entities.load_entity(&value.target_id)?;
        let kind = if settings.is_layout_bundle(&entity.bundle) {
            ItemKind::Layout
        } else {
            ItemKind::Content
        };
        let mut item = Item::existing(entity, kind);
        match kind {
            ItemKind::Layout => {
                item.layout = value.layout.clone();
                item.layout_config = value.layout_config.clone();
                item.options = value.options.clone();
            }
            ItemKind::Content => item.region = value.region.clone(),
        }
        items.push(item);
    }
    let session = WidgetSession::new(field_name, items);
    tracing::debug!(items = session.len(), field = session.field_name(), "loaded field");
    Ok(session)
}

/// The stored values as the field column holds them.
pub fn encode(values: &[StoredValue]) -> Result<String> {
    Ok(serde_json::to_string(values)?)
}

pub fn decode(text: &str) -> Result<Vec<StoredValue>> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{content, layout, session};
    use crate::error::ErlError;
    use crate::model::PendingPlacement;
    use crate::store::memory::{fixtures, InMemoryEntityStore};

    #[test]
    fn flatten_skips_removed_and_new_items() {
        let mut s = session();
        s.items_mut()[2].detach();
        s.items_mut().push(Item::new(
            Entity::new("text"),
            ItemKind::Content,
            PendingPlacement::default(),
        ));
        let values = flatten(&s, &fixtures::layouts());
        let deltas: Vec<usize> = values.iter().map(|v| v.delta).collect();
        assert_eq!(deltas, vec![0, 1, 3, 4]);
    }

    #[test]
    fn flatten_stores_disabled_content_last_without_region() {
        let s = WidgetSession::new(
            "field_body",
            vec![content("main"), layout("one_col"), content("main")],
        );
        let values = flatten(&s, &fixtures::layouts());
        let summary: Vec<(usize, &str)> =
            values.iter().map(|v| (v.delta, v.region.as_str())).collect();
        assert_eq!(summary, vec![(1, ""), (2, "main"), (0, "")]);
    }

    #[test]
    fn commit_then_load_preserves_structure() {
        let mut s = session();
        let mut store = InMemoryEntityStore::new();
        let stored = commit(&mut s, &fixtures::layouts(), &mut store).unwrap();
        assert_eq!(stored.len(), 5);
        assert_eq!(store.len(), 5);
        assert_eq!(stored[0].layout.as_deref(), Some("two_col"));
        assert_eq!(stored[2].region, "right");

        let loaded = load("field_body", &stored, &store, &fixtures::settings()).unwrap();
        assert_eq!(
            flatten(&loaded, &fixtures::layouts()),
            flatten(&s, &fixtures::layouts())
        );
    }

    #[test]
    fn commit_twice_reuses_ids() {
        let mut s = session();
        let mut store = InMemoryEntityStore::new();
        let first = commit(&mut s, &fixtures::layouts(), &mut store).unwrap();
        let second = commit(&mut s, &fixtures::layouts(), &mut store).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn commit_surfaces_store_errors() {
        let mut s = session();
        let mut store = InMemoryEntityStore::new();
        store.set_simulate_write_error(true);
        let err = commit(&mut s, &fixtures::layouts(), &mut store).unwrap_err();
        assert!(matches!(err, ErlError::Store(_)));
    }

    #[test]
    fn decode_reads_what_encode_wrote() {
        let mut s = session();
        let mut store = InMemoryEntityStore::new();
        let stored = commit(&mut s, &fixtures::layouts(), &mut store).unwrap();
        assert_eq!(decode(&encode(&stored).unwrap()).unwrap(), stored);
    }

    #[test]
    fn decode_rejects_malformed_values() {
        let err = decode(r#"[{"layout": "one_col"}]"#).unwrap_err();
        assert!(matches!(err, ErlError::Serialization(_)));
    }

    #[test]
    fn load_fails_on_missing_entity() {
        let store = InMemoryEntityStore::new();
        let values = vec![StoredValue {
            target_id: uuid::Uuid::new_v4(),
            layout: None,
            layout_config: None,
            region: "main".into(),
            options: None,
        }];
        let err = load("field_body", &values, &store, &fixtures::settings()).unwrap_err();
        assert!(matches!(err, ErlError::EntityNotFound(_)));
    }

    #[test]
    fn load_ignores_region_on_layouts() {
        let mut store = InMemoryEntityStore::new();
        let mut entity = Entity::new("section");
        let id = store.save_entity(&mut entity).unwrap();
        let values = vec![StoredValue {
            target_id: id,
            layout: Some("one_col".into()),
            layout_config: None,
            region: "main".into(),
            options: None,
        }];
        let session = load("field_body", &values, &store, &fixtures::settings()).unwrap();
        let item = &session.items()[0];
        assert!(item.is_layout());
        assert_eq!(item.region, "");
        assert!(!item.is_new);
    }
}
