//! # Structural Editor
//!
//! The client half of the widget. It attaches to a rendered [`WidgetView`],
//! interprets drag gestures and up/down buttons against the placement model,
//! and keeps the hidden `weight`/`region` fields of every item in step with
//! the tree. Nothing here talks to the server: the result of all local edits
//! travels with the next [`FormSubmission`].
//!
//! ## Dragging
//!
//! ```text
//! grab(key, Handle) ──▶ accepts(target, sibling)* ──▶ drop(target, sibling)
//!                                                      │
//!                                     Moved ◀──────────┴──────────▶ Rejected
//! ```
//!
//! Only the drag handle starts a drag. The same rules answer the hover check
//! and the drop, so a drop the editor showed as allowed is never refused.
//!
//! ## After Every Move
//!
//! A successful drop or button move renumbers the tree, refreshes the hidden
//! fields and re-evaluates the disabled bucket's "empty" description.

use std::collections::{HashMap, HashSet};

use crate::api::{Action, FormSubmission};
use crate::model::AddItemRequest;
use crate::placement::{renumber, Arrangement, Container, NodeKey, Placement, Sibling};
use crate::view::WidgetView;

/// Where a pointer went down on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabTarget {
    Handle,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub key: NodeKey,
    pub is_layout: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Moved,
    Rejected,
}

/// State of one region's add-content control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddToggle {
    pub open: bool,
}

impl AddToggle {
    pub fn label(&self) -> &'static str {
        if self.open {
            "-"
        } else {
            "+"
        }
    }
}

#[derive(Debug, Clone)]
pub struct StructuralEditor {
    arrangement: Arrangement,
    fields: Vec<Placement>,
    hidden: HashSet<NodeKey>,
    toggles: HashMap<(NodeKey, String), AddToggle>,
    drag: Option<Drag>,
    disabled_description_visible: bool,
}

impl StructuralEditor {
    pub fn attach(view: &WidgetView) -> Self {
        let arrangement = Arrangement::from_view(view);
        let hidden = view.items().filter(|i| i.hidden).map(|i| i.delta).collect();
        let mut editor = Self {
            arrangement,
            fields: Vec::new(),
            hidden,
            toggles: HashMap::new(),
            drag: None,
            disabled_description_visible: view.disabled.description_visible,
        };
        editor.refresh();
        editor
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    /// Hidden field values in document order.
    pub fn fields(&self) -> &[Placement] {
        &self.fields
    }

    pub fn field(&self, key: NodeKey) -> Option<&Placement> {
        self.fields.iter().find(|p| p.key == key)
    }

    pub fn disabled_description_visible(&self) -> bool {
        self.disabled_description_visible
    }

    pub fn dragging(&self) -> Option<Drag> {
        self.drag
    }

    /// Starts a drag. Only visible items picked up by their handle move.
    pub fn grab(&mut self, key: NodeKey, target: GrabTarget) -> Option<Drag> {
        if target != GrabTarget::Handle
            || self.hidden.contains(&key)
            || self.arrangement.locate(key).is_none()
        {
            return None;
        }
        let drag = Drag {
            key,
            is_layout: self.arrangement.is_layout(key),
        };
        self.drag = Some(drag);
        Some(drag)
    }

    /// Whether the current drag may be dropped at this spot.
    pub fn accepts(&self, target: &Container, sibling: Option<&Sibling>) -> bool {
        self.drag
            .is_some_and(|drag| self.arrangement.can_accept(drag.key, target, sibling))
    }

    /// Ends the current drag.
    pub fn drop(&mut self, target: &Container, sibling: Option<&Sibling>) -> DropOutcome {
        let Some(drag) = self.drag.take() else {
            return DropOutcome::Rejected;
        };
        if !self.arrangement.move_node(drag.key, target, sibling) {
            tracing::debug!(key = drag.key, ?target, ?sibling, "drop rejected");
            return DropOutcome::Rejected;
        }
        self.refresh();
        DropOutcome::Moved
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Unsaved new items are invisible, so they never count as the neighbour
    /// a node swaps with.
    pub fn move_up(&mut self, key: NodeKey) -> bool {
        if self.hidden.contains(&key) || !self.arrangement.move_up(key, &self.hidden) {
            return false;
        }
        self.refresh();
        true
    }

    pub fn move_down(&mut self, key: NodeKey) -> bool {
        if self.hidden.contains(&key) || !self.arrangement.move_down(key, &self.hidden) {
            return false;
        }
        self.refresh();
        true
    }

    fn refresh(&mut self) {
        self.fields = renumber(&self.arrangement);
        self.disabled_description_visible = self.arrangement.disabled.is_empty();
    }

    /// Opens or closes a region's add-content control.
    pub fn toggle_add_content(&mut self, layout: NodeKey, region: &str) -> AddToggle {
        let toggle = self
            .toggles
            .entry((layout, region.to_string()))
            .or_default();
        toggle.open = !toggle.open;
        *toggle
    }

    pub fn add_toggle(&self, layout: NodeKey, region: &str) -> AddToggle {
        self.toggles
            .get(&(layout, region.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Ordinal of a layout among the layouts the server knows about.
    fn parent_weight(&self, layout: NodeKey) -> Option<usize> {
        self.arrangement
            .layouts
            .iter()
            .filter(|l| !self.hidden.contains(&l.key))
            .position(|l| l.key == layout)
    }

    /// The hidden inputs of a region's "Create New" control.
    pub fn request_add_item(
        &self,
        bundle: &str,
        layout: NodeKey,
        region: &str,
    ) -> Option<AddItemRequest> {
        let parent_weight = self.parent_weight(layout)?;
        let has_region = self
            .arrangement
            .layouts
            .iter()
            .any(|l| l.key == layout && l.regions.iter().any(|r| r.name == region));
        has_region.then(|| AddItemRequest {
            bundle: bundle.to_string(),
            region: region.to_string(),
            parent_weight: Some(parent_weight),
        })
    }

    /// The hidden inputs of an "Add section" button, placed after `after` or
    /// at the end.
    pub fn request_add_section(&self, bundle: &str, after: Option<NodeKey>) -> AddItemRequest {
        AddItemRequest {
            bundle: bundle.to_string(),
            region: String::new(),
            parent_weight: after.and_then(|key| self.parent_weight(key)),
        }
    }

    /// The form as it would be posted now.
    pub fn submission(&self, trigger: Option<Action>) -> FormSubmission {
        FormSubmission {
            placements: self.fields.clone(),
            trigger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{content, session};
    use crate::model::{Entity, Item, ItemKind, PendingPlacement};
    use crate::store::memory::fixtures;
    use crate::view::render;

    /// `[two_col(left: 1 | right: 2)] [one_col(main: 4)]`, disabled `[5]`.
    fn editor() -> StructuralEditor {
        let mut s = session();
        s.items_mut().push(content("sidebar"));
        StructuralEditor::attach(&render(&s, &fixtures::layouts(), &fixtures::settings()))
    }

    fn region(layout: NodeKey, name: &str) -> Container {
        Container::Region {
            layout,
            region: name.into(),
        }
    }

    #[test]
    fn only_handle_starts_drag() {
        let mut e = editor();
        assert!(e.grab(1, GrabTarget::Body).is_none());
        assert!(e.dragging().is_none());
        assert_eq!(
            e.grab(0, GrabTarget::Handle),
            Some(Drag {
                key: 0,
                is_layout: true
            })
        );
    }

    #[test]
    fn drop_into_disabled_updates_fields() {
        let mut e = editor();
        e.grab(2, GrabTarget::Handle);
        assert!(e.accepts(&Container::Disabled, Some(&Sibling::Node(5))));
        assert_eq!(
            e.drop(&Container::Disabled, Some(&Sibling::Node(5))),
            DropOutcome::Moved
        );
        let field = e.field(2).unwrap();
        assert_eq!(field.region, "");
        assert_eq!(field.weight, Some(2));
        assert_eq!(e.field(5).unwrap().weight, Some(3));
    }

    #[test]
    fn layout_drop_into_disabled_is_rejected() {
        let mut e = editor();
        let before = e.fields().to_vec();
        e.grab(0, GrabTarget::Handle);
        assert!(!e.accepts(&Container::Disabled, Some(&Sibling::Node(5))));
        assert_eq!(
            e.drop(&Container::Disabled, Some(&Sibling::Node(5))),
            DropOutcome::Rejected
        );
        assert_eq!(e.fields(), before.as_slice());
        assert!(e.dragging().is_none());
    }

    #[test]
    fn layout_never_drops_into_region() {
        let mut e = editor();
        e.grab(3, GrabTarget::Handle);
        assert!(!e.accepts(&region(0, "right"), Some(&Sibling::Control)));
        assert!(e.accepts(&Container::Wrapper, Some(&Sibling::Node(0))));
    }

    #[test]
    fn move_up_across_layouts_updates_region_field() {
        let mut e = editor();
        assert!(e.move_up(4));
        let field = e.field(4).unwrap();
        assert_eq!(field.region, "right");
        assert_eq!(field.weight, Some(2));
    }

    #[test]
    fn disabled_description_tracks_bucket() {
        let mut e = editor();
        assert!(!e.disabled_description_visible());
        e.grab(5, GrabTarget::Handle);
        assert_eq!(
            e.drop(&region(3, "main"), Some(&Sibling::Control)),
            DropOutcome::Moved
        );
        assert!(e.disabled_description_visible());
        assert_eq!(e.field(5).unwrap().region, "main");
    }

    #[test]
    fn add_toggle_flips_label() {
        let mut e = editor();
        assert_eq!(e.add_toggle(0, "left").label(), "+");
        assert_eq!(e.toggle_add_content(0, "left").label(), "-");
        assert!(e.add_toggle(0, "left").open);
        assert!(!e.add_toggle(0, "right").open);
        assert_eq!(e.toggle_add_content(0, "left").label(), "+");
    }

    #[test]
    fn add_requests_carry_hidden_inputs() {
        let e = editor();
        let request = e.request_add_item("text", 3, "main").unwrap();
        assert_eq!(request.parent_weight, Some(1));
        assert_eq!(request.region, "main");
        assert!(e.request_add_item("text", 3, "left").is_none());

        let section = e.request_add_section("section", Some(0));
        assert_eq!(section.parent_weight, Some(0));
        assert_eq!(section.region, "");
        assert_eq!(e.request_add_section("section", None).parent_weight, None);
    }

    #[test]
    fn hidden_items_do_not_move() {
        let mut s = session();
        s.items_mut().push(Item::new(
            Entity::new("text"),
            ItemKind::Content,
            PendingPlacement {
                region: "left".into(),
                parent_weight: Some(0),
            },
        ));
        let mut e =
            StructuralEditor::attach(&render(&s, &fixtures::layouts(), &fixtures::settings()));
        assert!(e.grab(5, GrabTarget::Handle).is_none());
        assert!(!e.move_up(5));
        assert!(e.field(5).is_some());
    }

    #[test]
    fn moves_pass_over_hidden_neighbours() {
        // New text item 5 sits hidden at the top of "left"; 1 is below it.
        let mut s = session();
        s.items_mut().insert(
            1,
            Item::new(
                Entity::new("text"),
                ItemKind::Content,
                PendingPlacement {
                    region: "left".into(),
                    parent_weight: Some(0),
                },
            ),
        );
        let view = render(&s, &fixtures::layouts(), &fixtures::settings());
        let mut e = StructuralEditor::attach(&view);
        let hidden_key = view.items().find(|i| i.hidden).map(|i| i.delta).unwrap();
        let left_before: Vec<NodeKey> = e.arrangement().layouts[0].regions[0].items.clone();
        assert_eq!(left_before[0], hidden_key);

        // The first visible item of the first region has nowhere to go.
        let first = left_before[1];
        assert!(!e.move_up(first));
        assert_eq!(e.arrangement().layouts[0].regions[0].items, left_before);
    }

    #[test]
    fn submission_carries_fields_and_trigger() {
        let e = editor();
        let submission = e.submission(Some(Action::OpenEdit { delta: 1 }));
        assert_eq!(submission.placements.len(), 6);
        assert_eq!(submission.trigger, Some(Action::OpenEdit { delta: 1 }));
    }
}
