// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable identifiers and tree snapshots for accessibility.
//!
//! The area tree is rebuilt from scratch every frame, but assistive
//! technology needs identifiers that survive the rebuild. Identifiers are
//! therefore keyed by the annotation *content* rather than by area index:
//! a per-content pool remembers the ids issued for that content, marks
//! them used as areas claim them during a frame, and drops the ids that
//! went unclaimed when the next frame starts. Unchanged content thus keeps
//! its id for as long as it is on screen.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

use bracken_io::semantic::{Class, Gestures};

use crate::scene::{NONE, SceneTree};

/// Identifier of a node in the semantic tree, stable across frames for
/// unchanged content.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemanticId(pub u64);

/// The annotation content a [`SemanticId`] is keyed by.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SemanticContent<T> {
    pub(crate) tag: Option<T>,
    pub(crate) label: String,
    pub(crate) description: String,
    pub(crate) class: Class,
    pub(crate) gestures: Gestures,
    pub(crate) selected: bool,
    pub(crate) disabled: bool,
}

impl<T> Default for SemanticContent<T> {
    fn default() -> Self {
        Self {
            tag: None,
            label: String::new(),
            description: String::new(),
            class: Class::Unknown,
            gestures: Gestures::empty(),
            selected: false,
            disabled: false,
        }
    }
}

/// A semantic description of a UI component.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SemanticDesc {
    /// The component class.
    pub class: Class,
    /// Accessibility label.
    pub label: String,
    /// Longer accessibility description.
    pub description: String,
    /// Whether the component is selected.
    pub selected: bool,
    /// Whether the component is disabled.
    pub disabled: bool,
    /// Gestures the component supports.
    pub gestures: Gestures,
    /// World-space bounds.
    pub bounds: Rect,
}

/// A node of the semantic tree snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SemanticNode {
    /// Identifier of this node.
    pub id: Option<SemanticId>,
    /// Identifier of the parent node, if any.
    pub parent: Option<SemanticId>,
    /// The description of this node.
    pub desc: SemanticDesc,
    /// Semantic children, depth-first.
    pub children: Vec<SemanticNode>,
}

#[derive(Clone, Debug)]
struct PoolEntry {
    id: SemanticId,
    used: bool,
}

/// The cross-frame id pool.
#[derive(Clone, Debug)]
pub(crate) struct SemanticIds<T> {
    assigned: bool,
    last: u64,
    pool: HashMap<SemanticContent<T>, SmallVec<[PoolEntry; 1]>>,
}

impl<T> Default for SemanticIds<T> {
    fn default() -> Self {
        Self {
            assigned: false,
            last: 0,
            pool: HashMap::new(),
        }
    }
}

impl<T: Copy + Eq + core::hash::Hash> SemanticIds<T> {
    /// Forget unclaimed ids and open a new claim round.
    pub(crate) fn frame_reset(&mut self) {
        self.assigned = false;
        self.pool.retain(|_, entries| {
            entries.retain(|e| e.used);
            for e in entries.iter_mut() {
                e.used = false;
            }
            !entries.is_empty()
        });
    }

    fn id_for(&mut self, content: &SemanticContent<T>) -> SemanticId {
        if let Some(entries) = self.pool.get_mut(content)
            && let Some(e) = entries.iter_mut().find(|e| !e.used)
        {
            e.used = true;
            return e.id;
        }
        // No prior unclaimed id for this content; allocate a fresh one.
        self.last += 1;
        let id = SemanticId(self.last);
        self.pool
            .entry(content.clone())
            .or_default()
            .push(PoolEntry { id, used: true });
        id
    }

    /// Assign ids to every semantically valid area, once per frame.
    pub(crate) fn assign(&mut self, tree: &mut SceneTree<T>) {
        if self.assigned {
            return;
        }
        self.assigned = true;
        for i in 0..tree.areas.len() {
            if tree.areas[i].semantic.valid {
                let id = self.id_for(&tree.areas[i].semantic.content);
                tree.areas[i].semantic.id = Some(id);
            }
        }
    }

    /// The innermost semantic id on the hit chain at `pos`.
    pub(crate) fn at(&mut self, tree: &mut SceneTree<T>, pos: Point) -> Option<SemanticId> {
        self.assign(tree);
        let mut found = None;
        tree.hit_walk(pos, |n| {
            if let Some(id) = tree.areas[n.area as usize].semantic.id {
                found = Some(id);
                return false;
            }
            true
        });
        found
    }

    /// Build the semantic tree snapshot, rooted at the implicit root area.
    pub(crate) fn snapshot(&mut self, tree: &mut SceneTree<T>) -> Vec<SemanticNode> {
        self.assign(tree);
        if tree.areas.is_empty() {
            return Vec::new();
        }
        collect_semantic(tree, 0, None)
    }
}

/// Collect the semantic nodes among `area` and its next siblings,
/// descending through non-semantic areas.
fn collect_semantic<T: Copy>(
    tree: &SceneTree<T>,
    mut area: i32,
    parent: Option<SemanticId>,
) -> Vec<SemanticNode> {
    let mut out = Vec::new();
    while area != NONE {
        let a = &tree.areas[area as usize];
        if let Some(id) = a.semantic.id {
            let c = &a.semantic.content;
            out.push(SemanticNode {
                id: Some(id),
                parent,
                desc: SemanticDesc {
                    class: c.class,
                    label: c.label.clone(),
                    description: c.description.clone(),
                    selected: c.selected,
                    disabled: c.disabled,
                    gestures: c.gestures,
                    bounds: a.bounds(),
                },
                children: collect_semantic(tree, a.first_child, Some(id)),
            });
        } else {
            out.extend(collect_semantic(tree, a.first_child, parent));
        }
        area = a.sibling;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBuilder;
    use alloc::string::ToString;
    use bracken_io::scene::ClipShape;

    fn labeled_tree(labels: &[&str]) -> SceneTree<u32> {
        let mut tree = SceneTree::default();
        let mut b = SceneBuilder::default();
        b.reset(&mut tree);
        for (i, label) in labels.iter().enumerate() {
            b.push_clip(
                &mut tree,
                ClipShape::Rect,
                Rect::new(0.0, i as f64 * 10.0, 100.0, (i + 1) as f64 * 10.0),
            );
            let slot = b.semantic_mut(&mut tree);
            slot.valid = true;
            slot.content.label = label.to_string();
            b.pop_clip(&tree).unwrap();
        }
        tree
    }

    #[test]
    fn unchanged_content_keeps_its_id_across_frames() {
        let mut ids = SemanticIds::<u32>::default();
        let mut tree = labeled_tree(&["a", "b"]);
        ids.assign(&mut tree);
        let a1 = tree.areas[1].semantic.id;
        let b1 = tree.areas[2].semantic.id;

        ids.frame_reset();
        // Rebuild with the same content in the opposite declaration order.
        let mut tree = labeled_tree(&["b", "a"]);
        ids.assign(&mut tree);
        assert_eq!(tree.areas[1].semantic.id, b1);
        assert_eq!(tree.areas[2].semantic.id, a1);
    }

    #[test]
    fn changed_content_gets_a_fresh_id() {
        let mut ids = SemanticIds::<u32>::default();
        let mut tree = labeled_tree(&["a"]);
        ids.assign(&mut tree);
        let a1 = tree.areas[1].semantic.id;

        ids.frame_reset();
        let mut tree = labeled_tree(&["changed"]);
        ids.assign(&mut tree);
        assert_ne!(tree.areas[1].semantic.id, a1);
    }

    #[test]
    fn unclaimed_ids_are_dropped_after_a_frame() {
        let mut ids = SemanticIds::<u32>::default();
        let mut tree = labeled_tree(&["a"]);
        ids.assign(&mut tree);
        let a1 = tree.areas[1].semantic.id;

        // One frame without "a": its pooled id is discarded.
        ids.frame_reset();
        let mut tree = labeled_tree(&[]);
        ids.assign(&mut tree);

        ids.frame_reset();
        let mut tree = labeled_tree(&["a"]);
        ids.assign(&mut tree);
        assert_ne!(tree.areas[1].semantic.id, a1);
    }

    #[test]
    fn duplicate_content_gets_distinct_ids() {
        let mut ids = SemanticIds::<u32>::default();
        let mut tree = labeled_tree(&["dup", "dup"]);
        ids.assign(&mut tree);
        let first = tree.areas[1].semantic.id;
        let second = tree.areas[2].semantic.id;
        assert_ne!(first, second);

        // Both survive the rebuild.
        ids.frame_reset();
        let mut tree = labeled_tree(&["dup", "dup"]);
        ids.assign(&mut tree);
        assert_eq!(tree.areas[1].semantic.id, first);
        assert_eq!(tree.areas[2].semantic.id, second);
    }

    #[test]
    fn snapshot_nests_semantic_areas_under_the_root() {
        let mut ids = SemanticIds::<u32>::default();
        let mut tree = labeled_tree(&["a", "b"]);
        ids.assign(&mut tree);
        let nodes = ids.snapshot(&mut tree);
        assert_eq!(nodes.len(), 1, "single semantic root expected");
        let root = &nodes[0];
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].desc.label, "a");
        assert_eq!(root.children[1].desc.label, "b");
        assert_eq!(root.children[0].parent, root.id);
    }
}
