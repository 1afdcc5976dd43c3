use super::{Arrangement, LayoutNode, NodeKey, RegionNode};
use crate::model::{Item, ItemKind};
use crate::store::LayoutRegistry;

impl Arrangement {
    /// Builds the structural tree implied by a flat session list.
    ///
    /// Content items belong to the closest preceding layout when their region
    /// is one of its regions, otherwise they land in the disabled bucket.
    /// Unsaved items still carrying placement hints are placed by the hints:
    /// content into the hinted layout, sections right after it.
    pub fn project<R: LayoutRegistry + ?Sized>(items: &[Item], registry: &R) -> Self {
        let mut arrangement = Arrangement::default();
        let mut pending_sections: Vec<(NodeKey, Option<usize>)> = Vec::new();
        let mut contents: Vec<(NodeKey, Option<NodeKey>)> = Vec::new();
        let mut current: Option<NodeKey> = None;

        for (delta, item) in items.iter().enumerate() {
            if item.is_detached() {
                continue;
            }
            let hint = pending_hint(item);
            match item.kind {
                ItemKind::Layout => {
                    if item.is_new && hint.is_some() {
                        pending_sections.push((delta, hint.flatten()));
                        continue;
                    }
                    let regions = item
                        .layout
                        .as_deref()
                        .map(|id| registry.regions(id))
                        .unwrap_or_default();
                    arrangement.layouts.push(LayoutNode {
                        key: delta,
                        regions: regions.into_iter().map(RegionNode::new).collect(),
                    });
                    current = Some(delta);
                }
                ItemKind::Content => contents.push((delta, current)),
            }
        }

        // Hints reference layout ordinals as the editor saw them, before any
        // hidden section is slotted in.
        let base: Vec<NodeKey> = arrangement.layouts.iter().map(|l| l.key).collect();
        let contents: Vec<(NodeKey, Option<NodeKey>)> = contents
            .into_iter()
            .map(|(delta, owner)| match pending_hint(&items[delta]) {
                Some(Some(ordinal)) if items[delta].is_new => {
                    (delta, base.get(ordinal).copied().or(owner))
                }
                _ => (delta, owner),
            })
            .collect();

        for (delta, ordinal) in pending_sections {
            let at = ordinal
                .and_then(|o| base.get(o))
                .and_then(|key| arrangement.layout_ordinal(*key))
                .map(|i| i + 1)
                .unwrap_or(arrangement.layouts.len());
            arrangement.layouts.insert(
                at,
                LayoutNode {
                    key: delta,
                    regions: Vec::new(),
                },
            );
        }

        for (delta, owner) in contents {
            let region = &items[delta].region;
            let slot = owner
                .and_then(|key| arrangement.layout_ordinal(key))
                .and_then(|li| {
                    arrangement.layouts[li]
                        .region_index(region)
                        .map(|ri| (li, ri))
                });
            match slot {
                Some((li, ri)) => arrangement.layouts[li].regions[ri].items.push(delta),
                None => arrangement.disabled.push(delta),
            }
        }

        arrangement
    }
}

/// `Some(parent_weight)` while an item still carries a placement hint.
fn pending_hint(item: &Item) -> Option<Option<usize>> {
    item.pending.as_ref().map(|p| p.parent_weight)
}
