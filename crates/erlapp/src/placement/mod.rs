//! # Placement Model
//!
//! The rendered widget is a shallow tree. Everything the structural editor and
//! the session agree on is expressed over it:
//!
//! ```text
//! Wrapper
//! ├── Layout (key 0)
//! │   ├── Region "left"   [item 1, item 2, <control>]
//! │   └── Region "right"  [<control>]
//! └── Layout (key 3)
//!     └── Region "main"   [item 4, <control>]
//! Disabled                [item 5]
//! ```
//!
//! Node keys are the deltas of the session items at render time. Every region
//! ends with the add-content control, which is not domain data but still
//! occupies the last slot, so a drop into a region always has a following
//! sibling.
//!
//! ## Rules
//!
//! [`Arrangement::can_accept`] decides whether a move may happen:
//!
//! - content needs a following sibling unless the target container is empty;
//! - layouts never go inside a layout, at any depth;
//! - layouts never go into the disabled bucket;
//! - content never sits directly in the wrapper.
//!
//! ## Renumbering
//!
//! [`renumber`] walks the tree in document order and yields, per node, the
//! values of the hidden `weight` and `region` fields. Weights count content
//! items only; layouts carry none. The walk is a pure function of the tree,
//! so running it again on an unchanged tree is a no-op.

use serde::{Deserialize, Serialize};

mod project;
mod step;

/// A node's key: the delta of its item when the widget was rendered.
pub type NodeKey = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionNode {
    pub name: String,
    /// Content items in order. The add-content control follows implicitly.
    pub items: Vec<NodeKey>,
}

impl RegionNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub key: NodeKey,
    pub regions: Vec<RegionNode>,
}

impl LayoutNode {
    fn region_index(&self, name: &str) -> Option<usize> {
        self.regions.iter().position(|r| r.name == name)
    }
}

/// The whole structural tree of one widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrangement {
    pub layouts: Vec<LayoutNode>,
    pub disabled: Vec<NodeKey>,
}

/// A drop target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Container {
    /// The top-level list of layouts.
    Wrapper,
    Region { layout: NodeKey, region: String },
    Disabled,
}

/// The node a dropped element is inserted before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sibling {
    Node(NodeKey),
    /// The add-content control at the end of a region.
    Control,
}

/// Where a node currently sits, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Layout {
        layout: usize,
    },
    Region {
        layout: usize,
        region: usize,
        index: usize,
    },
    Disabled {
        index: usize,
    },
}

/// Hidden field values for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub key: NodeKey,
    /// Rank among content items; `None` for layouts.
    pub weight: Option<usize>,
    pub region: String,
}

/// A node lifted out of the tree during a move.
#[derive(Debug, Clone)]
enum Detached {
    Layout(LayoutNode),
    Item(NodeKey),
}

impl Arrangement {
    pub fn locate(&self, key: NodeKey) -> Option<Position> {
        for (li, layout) in self.layouts.iter().enumerate() {
            if layout.key == key {
                return Some(Position::Layout { layout: li });
            }
            for (ri, region) in layout.regions.iter().enumerate() {
                if let Some(index) = region.items.iter().position(|&k| k == key) {
                    return Some(Position::Region {
                        layout: li,
                        region: ri,
                        index,
                    });
                }
            }
        }
        self.disabled
            .iter()
            .position(|&k| k == key)
            .map(|index| Position::Disabled { index })
    }

    pub fn is_layout(&self, key: NodeKey) -> bool {
        self.layouts.iter().any(|l| l.key == key)
    }

    /// Name of the region enclosing `key`, or empty for layouts, disabled
    /// items and unknown nodes.
    pub fn region_of(&self, key: NodeKey) -> String {
        match self.locate(key) {
            Some(Position::Region { layout, region, .. }) => {
                self.layouts[layout].regions[region].name.clone()
            }
            _ => String::new(),
        }
    }

    /// Ordinal of a layout among layouts.
    pub fn layout_ordinal(&self, key: NodeKey) -> Option<usize> {
        self.layouts.iter().position(|l| l.key == key)
    }

    fn region_indices(&self, layout: NodeKey, region: &str) -> Option<(usize, usize)> {
        let li = self.layout_ordinal(layout)?;
        let ri = self.layouts[li].region_index(region)?;
        Some((li, ri))
    }

    /// Number of children of a container, counting the region control.
    pub fn child_count(&self, container: &Container) -> Option<usize> {
        match container {
            Container::Wrapper => Some(self.layouts.len()),
            Container::Disabled => Some(self.disabled.len()),
            Container::Region { layout, region } => self
                .region_indices(*layout, region)
                .map(|(li, ri)| self.layouts[li].regions[ri].items.len() + 1),
        }
    }

    fn contains_sibling(&self, container: &Container, sibling: &Sibling) -> bool {
        match (container, sibling) {
            (Container::Wrapper, Sibling::Node(key)) => self.is_layout(*key),
            (Container::Disabled, Sibling::Node(key)) => self.disabled.contains(key),
            (Container::Region { layout, region }, Sibling::Node(key)) => self
                .region_indices(*layout, region)
                .map(|(li, ri)| self.layouts[li].regions[ri].items.contains(key))
                .unwrap_or(false),
            (Container::Region { layout, region }, Sibling::Control) => {
                self.region_indices(*layout, region).is_some()
            }
            (_, Sibling::Control) => false,
        }
    }

    /// Decides whether `dragged` may be dropped into `target` before `sibling`.
    pub fn can_accept(
        &self,
        dragged: NodeKey,
        target: &Container,
        sibling: Option<&Sibling>,
    ) -> bool {
        if self.locate(dragged).is_none() {
            return false;
        }
        let Some(children) = self.child_count(target) else {
            return false;
        };
        if let Some(sibling) = sibling {
            if *sibling == Sibling::Node(dragged) || !self.contains_sibling(target, sibling) {
                return false;
            }
        }

        let is_layout = self.is_layout(dragged);

        // The control must stay last, so content always needs a sibling.
        if !is_layout && sibling.is_none() && children > 0 {
            return false;
        }

        if is_layout {
            match target {
                Container::Region { .. } => false,
                Container::Disabled => false,
                Container::Wrapper => true,
            }
        } else {
            !matches!(target, Container::Wrapper)
        }
    }

    /// Moves `key` if the rules accept it. Returns whether the tree changed.
    pub fn move_node(
        &mut self,
        key: NodeKey,
        target: &Container,
        sibling: Option<&Sibling>,
    ) -> bool {
        if !self.can_accept(key, target, sibling) {
            return false;
        }
        let Some(node) = self.detach(key) else {
            return false;
        };
        self.insert(node, target, sibling);
        true
    }

    fn detach(&mut self, key: NodeKey) -> Option<Detached> {
        match self.locate(key)? {
            Position::Layout { layout } => Some(Detached::Layout(self.layouts.remove(layout))),
            Position::Region {
                layout,
                region,
                index,
            } => {
                self.layouts[layout].regions[region].items.remove(index);
                Some(Detached::Item(key))
            }
            Position::Disabled { index } => {
                self.disabled.remove(index);
                Some(Detached::Item(key))
            }
        }
    }

    fn insert(&mut self, node: Detached, target: &Container, sibling: Option<&Sibling>) {
        match (node, target) {
            (Detached::Layout(layout), Container::Wrapper) => {
                let at = match sibling {
                    Some(Sibling::Node(key)) => {
                        self.layout_ordinal(*key).unwrap_or(self.layouts.len())
                    }
                    _ => self.layouts.len(),
                };
                self.layouts.insert(at, layout);
            }
            (Detached::Item(key), Container::Disabled) => {
                let at = match sibling {
                    Some(Sibling::Node(s)) => self
                        .disabled
                        .iter()
                        .position(|k| k == s)
                        .unwrap_or(self.disabled.len()),
                    _ => self.disabled.len(),
                };
                self.disabled.insert(at, key);
            }
            (Detached::Item(key), Container::Region { layout, region }) => {
                if let Some((li, ri)) = self.region_indices(*layout, region) {
                    let items = &mut self.layouts[li].regions[ri].items;
                    let at = match sibling {
                        Some(Sibling::Node(s)) => {
                            items.iter().position(|k| k == s).unwrap_or(items.len())
                        }
                        _ => items.len(),
                    };
                    items.insert(at, key);
                }
            }
            // can_accept rules these out before anything is detached.
            (node, target) => {
                tracing::warn!(?node, ?target, "dropped node into an incompatible container");
            }
        }
    }

    /// Keys in document order.
    pub fn document_order(&self) -> Vec<NodeKey> {
        renumber(self).into_iter().map(|p| p.key).collect()
    }

    pub fn content_count(&self) -> usize {
        self.layouts
            .iter()
            .flat_map(|l| l.regions.iter())
            .map(|r| r.items.len())
            .sum::<usize>()
            + self.disabled.len()
    }
}

/// Computes hidden weight and region values for every node, in document order.
pub fn renumber(arrangement: &Arrangement) -> Vec<Placement> {
    let mut placements = Vec::new();
    let mut weight = 0;
    for layout in &arrangement.layouts {
        placements.push(Placement {
            key: layout.key,
            weight: None,
            region: String::new(),
        });
        for region in &layout.regions {
            for &key in &region.items {
                placements.push(Placement {
                    key,
                    weight: Some(weight),
                    region: region.name.clone(),
                });
                weight += 1;
            }
        }
    }
    for &key in &arrangement.disabled {
        placements.push(Placement {
            key,
            weight: Some(weight),
            region: String::new(),
        });
        weight += 1;
    }
    placements
}
