use crate::commands::{CmdMessage, CmdResult};
use crate::config::WidgetSettings;
use crate::error::{ErlError, Result};
use crate::model::{AddItemRequest, Item, ItemKind};
use crate::session::{Phase, WidgetSession};
use crate::store::EntityStore;

/// Appends a new unsaved item and opens it for edit.
///
/// The item stays hidden at the end of the list until its first save moves
/// it to where the add control pointed.
pub fn run<E: EntityStore + ?Sized>(
    session: &mut WidgetSession,
    entities: &mut E,
    settings: &WidgetSettings,
    request: &AddItemRequest,
) -> Result<CmdResult> {
    let bundle = settings
        .bundle_type(&request.bundle)
        .ok_or_else(|| ErlError::UnknownBundle(request.bundle.clone()))?;

    let entity = entities.create_entity(&bundle.id)?;
    let kind = if bundle.is_layout_container {
        ItemKind::Layout
    } else {
        ItemKind::Content
    };
    let item = Item::new(entity, kind, request.pending());

    let delta = session.len();
    session.items_mut().push(item);
    session.set_phase(Phase::Editing {
        delta,
        selected_layout: None,
    });
    tracing::debug!(delta, bundle = %bundle.id, region = %request.region, "added item");

    let mut result = CmdResult::rebuild().with_affected(vec![delta]);
    result.add_message(CmdMessage::info(format!("Create new {}", bundle.label)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::session;
    use crate::store::memory::{fixtures, InMemoryEntityStore};

    fn request(bundle: &str, region: &str, parent_weight: Option<usize>) -> AddItemRequest {
        AddItemRequest {
            bundle: bundle.into(),
            region: region.into(),
            parent_weight,
        }
    }

    #[test]
    fn appends_one_item_and_opens_it() {
        let mut s = session();
        let mut store = InMemoryEntityStore::new();
        let before = s.len();

        let result = run(
            &mut s,
            &mut store,
            &fixtures::settings(),
            &request("text", "right", Some(0)),
        )
        .unwrap();

        assert_eq!(s.len(), before + 1);
        assert_eq!(s.editing(), Some(before));
        assert!(result.rebuild);
        let item = &s.items()[before];
        assert!(item.is_new);
        assert_eq!(item.region, "right");
        assert_eq!(item.kind, ItemKind::Content);
        assert!(!item.entity.as_ref().unwrap().is_saved());
    }

    #[test]
    fn sections_are_layout_items_without_region() {
        let mut s = session();
        let mut store = InMemoryEntityStore::new();
        run(
            &mut s,
            &mut store,
            &fixtures::settings(),
            &request("section", "left", Some(1)),
        )
        .unwrap();
        let item = s.items().last().unwrap();
        assert!(item.is_layout());
        assert_eq!(item.region, "");
        assert_eq!(item.pending.as_ref().unwrap().parent_weight, Some(1));
    }

    #[test]
    fn unknown_bundle_is_an_error() {
        let mut s = session();
        let mut store = InMemoryEntityStore::new();
        let err = run(
            &mut s,
            &mut store,
            &fixtures::settings(),
            &request("video", "", None),
        )
        .unwrap_err();
        assert!(matches!(err, ErlError::UnknownBundle(b) if b == "video"));
        assert_eq!(s.len(), 5);
        assert_eq!(s.phase(), &Phase::Idle);
    }

    #[test]
    fn add_replaces_pending_removal() {
        let mut s = session();
        s.set_phase(Phase::Confirming { delta: 1 });
        let mut store = InMemoryEntityStore::new();
        run(
            &mut s,
            &mut store,
            &fixtures::settings(),
            &request("image", "main", Some(1)),
        )
        .unwrap();
        assert_eq!(s.confirming(), None);
        assert_eq!(s.editing(), Some(5));
    }
}
