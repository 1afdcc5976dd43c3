//! Placement sync: the first step of every form submission.
//!
//! The client reorders nodes freely and only tells the server the result
//! through hidden `weight` and `region` fields. Before any transition runs,
//! the session adopts that order: items are rearranged into document order,
//! content items take their submitted region, and tombstones left by removals
//! are dropped. Deltas change as a result, so the open phase and the
//! triggering action are remapped through the returned [`DeltaMap`].

use std::collections::HashSet;

use crate::commands::CmdResult;
use crate::error::Result;
use crate::placement::Placement;
use crate::session::{Phase, WidgetSession};

/// Old delta to new delta, for deltas that survived a sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaMap(Vec<Option<usize>>);

impl DeltaMap {
    pub fn get(&self, old: usize) -> Option<usize> {
        self.0.get(old).copied().flatten()
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, d)| *d == Some(i))
    }
}

/// Applies submitted placements to the session.
///
/// Placements are taken in submission order. Unknown, duplicate and removed
/// keys are skipped; live items the submission does not mention keep their
/// relative order after the submitted ones.
pub fn run(session: &mut WidgetSession, placements: &[Placement]) -> Result<(CmdResult, DeltaMap)> {
    let len = session.len();
    let mut seen = HashSet::new();
    let mut order: Vec<(usize, Option<&str>)> = Vec::with_capacity(len);

    for placement in placements {
        if session.live(placement.key).is_none() || !seen.insert(placement.key) {
            tracing::debug!(key = placement.key, "skipping placement");
            continue;
        }
        order.push((placement.key, Some(placement.region.as_str())));
    }
    for delta in 0..len {
        if session.live(delta).is_some() && !seen.contains(&delta) {
            order.push((delta, None));
        }
    }

    let mut old: Vec<Option<_>> = std::mem::take(session.items_mut())
        .into_iter()
        .map(Some)
        .collect();
    let mut map = vec![None; len];
    let mut moved = Vec::new();
    for (new_delta, (old_delta, region)) in order.into_iter().enumerate() {
        let Some(mut item) = old[old_delta].take() else {
            continue;
        };
        if let Some(region) = region {
            if !item.is_layout() && item.region != region {
                item.region = region.to_string();
                moved.push(new_delta);
            }
        }
        if old_delta != new_delta {
            moved.push(new_delta);
        }
        map[old_delta] = Some(new_delta);
        session.items_mut().push(item);
    }
    let map = DeltaMap(map);

    let phase = match session.phase().clone() {
        Phase::Editing {
            delta,
            selected_layout,
        } => map.get(delta).map(|delta| Phase::Editing {
            delta,
            selected_layout,
        }),
        Phase::Confirming { delta } => map.get(delta).map(|delta| Phase::Confirming { delta }),
        Phase::Idle => Some(Phase::Idle),
    };
    session.set_phase(phase.unwrap_or_default());

    moved.dedup();
    tracing::debug!(items = session.len(), dropped = len - session.len(), "synced placements");
    Ok((CmdResult::default().with_affected(moved), map))
}
