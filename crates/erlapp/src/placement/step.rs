use std::collections::HashSet;

use super::{Arrangement, NodeKey, Position};

/// Nearest entry before `index` that is not hidden.
fn visible_before(keys: &[NodeKey], index: usize, hidden: &HashSet<NodeKey>) -> Option<usize> {
    keys[..index].iter().rposition(|k| !hidden.contains(k))
}

/// Nearest entry after `index` that is not hidden.
fn visible_after(keys: &[NodeKey], index: usize, hidden: &HashSet<NodeKey>) -> Option<usize> {
    keys.iter()
        .enumerate()
        .skip(index + 1)
        .find(|(_, k)| !hidden.contains(k))
        .map(|(i, _)| i)
}

fn shift<T>(list: &mut Vec<T>, from: usize, to: usize) {
    let node = list.remove(from);
    list.insert(to, node);
}

impl Arrangement {
    fn layout_keys(&self) -> Vec<NodeKey> {
        self.layouts.iter().map(|l| l.key).collect()
    }

    /// Moves `key` one step towards the top.
    ///
    /// Keys in `hidden` are not counted as neighbours: the node passes over
    /// them to the nearest visible one. Content at the top of a region jumps
    /// to the end of the previous region of the same layout, or to the end of
    /// the last region of the previous visible layout. Returns `false` when
    /// there is nowhere to go.
    pub fn move_up(&mut self, key: NodeKey, hidden: &HashSet<NodeKey>) -> bool {
        match self.locate(key) {
            Some(Position::Layout { layout }) => {
                let Some(to) = visible_before(&self.layout_keys(), layout, hidden) else {
                    return false;
                };
                shift(&mut self.layouts, layout, to);
                true
            }
            Some(Position::Disabled { index }) => {
                let Some(to) = visible_before(&self.disabled, index, hidden) else {
                    return false;
                };
                shift(&mut self.disabled, index, to);
                true
            }
            Some(Position::Region {
                layout,
                region,
                index,
            }) => {
                let items = &mut self.layouts[layout].regions[region].items;
                if let Some(to) = visible_before(items, index, hidden) {
                    shift(items, index, to);
                    return true;
                }
                let target = if region > 0 {
                    Some((layout, region - 1))
                } else {
                    visible_before(&self.layout_keys(), layout, hidden).and_then(|li| {
                        self.layouts[li]
                            .regions
                            .len()
                            .checked_sub(1)
                            .map(|last| (li, last))
                    })
                };
                let Some((li, ri)) = target else {
                    return false;
                };
                self.layouts[layout].regions[region].items.remove(index);
                self.layouts[li].regions[ri].items.push(key);
                true
            }
            None => false,
        }
    }

    /// Moves `key` one step towards the bottom.
    ///
    /// Content at the bottom of a region jumps to the start of the next region
    /// of the same layout, or to the end of the first region of the next
    /// visible layout.
    pub fn move_down(&mut self, key: NodeKey, hidden: &HashSet<NodeKey>) -> bool {
        match self.locate(key) {
            Some(Position::Layout { layout }) => {
                let Some(to) = visible_after(&self.layout_keys(), layout, hidden) else {
                    return false;
                };
                shift(&mut self.layouts, layout, to);
                true
            }
            Some(Position::Disabled { index }) => {
                let Some(to) = visible_after(&self.disabled, index, hidden) else {
                    return false;
                };
                shift(&mut self.disabled, index, to);
                true
            }
            Some(Position::Region {
                layout,
                region,
                index,
            }) => {
                let items = &mut self.layouts[layout].regions[region].items;
                if let Some(to) = visible_after(items, index, hidden) {
                    shift(items, index, to);
                    return true;
                }
                if region + 1 < self.layouts[layout].regions.len() {
                    self.layouts[layout].regions[region].items.remove(index);
                    self.layouts[layout].regions[region + 1]
                        .items
                        .insert(0, key);
                    return true;
                }
                let next = visible_after(&self.layout_keys(), layout, hidden)
                    .filter(|&li| !self.layouts[li].regions.is_empty());
                let Some(li) = next else {
                    return false;
                };
                self.layouts[layout].regions[region].items.remove(index);
                self.layouts[li].regions[0].items.push(key);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::tests::sample;
    use crate::placement::{LayoutNode, RegionNode};

    fn none() -> HashSet<NodeKey> {
        HashSet::new()
    }

    #[test]
    fn swaps_within_region() {
        let mut a = sample();
        assert!(a.move_up(2, &none()));
        assert_eq!(a.layouts[0].regions[0].items, vec![2, 1]);
        assert!(a.move_down(2, &none()));
        assert_eq!(a.layouts[0].regions[0].items, vec![1, 2]);
    }

    #[test]
    fn move_up_from_first_region_enters_previous_layout() {
        // L0(left: 1, 2 | right: -), L3(main: 4): 4 goes to the end of "right".
        let mut a = sample();
        assert!(a.move_up(4, &none()));
        assert_eq!(a.region_of(4), "right");
        assert_eq!(a.layouts[0].regions[1].items, vec![4]);
        assert!(a.layouts[1].regions[0].items.is_empty());
    }

    #[test]
    fn move_up_crosses_regions_of_same_layout() {
        let mut a = sample();
        a.layouts[0].regions[1].items.push(6);
        assert!(a.move_up(6, &none()));
        assert_eq!(a.layouts[0].regions[0].items, vec![1, 2, 6]);
    }

    #[test]
    fn move_up_at_top_is_a_no_op() {
        let mut a = sample();
        let before = a.clone();
        assert!(!a.move_up(1, &none()));
        assert!(!a.move_up(0, &none()));
        assert!(!a.move_up(5, &none()));
        assert_eq!(a, before);
    }

    #[test]
    fn move_down_prepends_to_next_region() {
        let mut a = sample();
        a.layouts[0].regions[1].items.push(6);
        assert!(a.move_down(2, &none()));
        assert_eq!(a.layouts[0].regions[1].items, vec![2, 6]);
    }

    #[test]
    fn move_down_from_last_region_enters_next_layout() {
        let mut a = sample();
        a.layouts[0].regions[1].items.push(6);
        assert!(a.move_down(6, &none()));
        assert_eq!(a.layouts[1].regions[0].items, vec![4, 6]);
    }

    #[test]
    fn move_down_at_bottom_is_a_no_op() {
        let mut a = sample();
        let before = a.clone();
        assert!(!a.move_down(4, &none()));
        assert!(!a.move_down(3, &none()));
        assert!(!a.move_down(5, &none()));
        assert_eq!(a, before);
    }

    #[test]
    fn layouts_swap_with_neighbours() {
        let mut a = sample();
        assert!(a.move_down(0, &none()));
        assert_eq!(a.layouts[0].key, 3);
        assert!(a.move_up(0, &none()));
        assert_eq!(a.layouts[0].key, 0);
    }

    #[test]
    fn disabled_items_swap_inside_bucket() {
        let mut a = sample();
        a.disabled.push(7);
        assert!(a.move_down(5, &none()));
        assert_eq!(a.disabled, vec![7, 5]);
        assert!(a.move_up(5, &none()));
        assert_eq!(a.disabled, vec![5, 7]);
    }

    #[test]
    fn hidden_neighbour_is_passed_over() {
        // left: [9 (hidden), 1, 2]; 1 has no visible predecessor in "left".
        let mut a = sample();
        a.layouts[0].regions[0].items.insert(0, 9);
        let hidden = HashSet::from([9]);

        assert!(!a.move_up(1, &hidden));
        assert_eq!(a.layouts[0].regions[0].items, vec![9, 1, 2]);

        assert!(a.move_up(2, &hidden));
        assert_eq!(a.layouts[0].regions[0].items, vec![9, 2, 1]);
    }

    #[test]
    fn content_moving_down_skips_hidden_tail() {
        // left: [1, 2, 9 (hidden)]: 2 is effectively last and jumps to "right".
        let mut a = sample();
        a.layouts[0].regions[0].items.push(9);
        let hidden = HashSet::from([9]);
        assert!(a.move_down(2, &hidden));
        assert_eq!(a.layouts[0].regions[0].items, vec![1, 9]);
        assert_eq!(a.layouts[0].regions[1].items, vec![2]);
    }

    #[test]
    fn hidden_layout_is_not_a_move_target() {
        // L0, L8 (hidden, unsaved), L3: content of L3 moves up into L0.
        let mut a = sample();
        a.layouts.insert(
            1,
            LayoutNode {
                key: 8,
                regions: vec![RegionNode::new("main")],
            },
        );
        let hidden = HashSet::from([8]);

        assert!(a.move_up(4, &hidden));
        assert_eq!(a.layouts[0].regions[1].items, vec![4]);
        assert!(a.layouts[2].regions[0].items.is_empty());

        assert!(a.move_up(3, &hidden));
        let order: Vec<NodeKey> = a.layouts.iter().map(|l| l.key).collect();
        assert_eq!(order, vec![3, 0, 8]);
    }
}
