// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame area tree and flattened hit list.
//!
//! ## Overview
//!
//! Every frame, the structural operation stream is decoded into a
//! [`SceneTree`]: an arena of clip areas linked by parent/child/sibling
//! indices (`-1` is the "none" sentinel) plus a flat list of [`HitNode`]s
//! appended in declaration order. Each hit node records the area it was
//! declared in and links to the node of the enclosing area, so scanning
//! the list from the end visits handlers topmost-first while honoring
//! containment.
//!
//! The tree is append-only and rebuilt from scratch by [`SceneBuilder`];
//! it is never mutated after the decode pass, apart from semantic id
//! assignment and gesture derivation at the frame boundary.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect};

use bracken_io::pointer::Cursor;
use bracken_io::scene::ClipShape;
use bracken_io::window::Actions;

use crate::semantics::{SemanticContent, SemanticId};

/// Index sentinel meaning "no node".
pub(crate) const NONE: i32 = -1;

/// A fatal defect in the structural operation stream.
///
/// The stream is a producer contract; any of these conditions aborts the
/// frame decode immediately, since routing against a partially built tree
/// would be inconsistent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// A `PopClip` without a matching open clip.
    UnbalancedClipPop,
    /// A `PopTransform` without a matching transform push.
    UnbalancedTransformPop,
    /// A `PopPass` without a matching `PushPass`.
    UnbalancedPassPop,
    /// A `LoadTransform` from a slot that was never saved.
    UnknownTransformSlot(u32),
}

impl core::fmt::Display for SceneError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnbalancedClipPop => write!(f, "pop of an unopened clip area"),
            Self::UnbalancedTransformPop => write!(f, "pop of an unpushed transform"),
            Self::UnbalancedPassPop => write!(f, "pop of an unpushed pass mode"),
            Self::UnknownTransformSlot(slot) => {
                write!(f, "load from unsaved transform slot {slot}")
            }
        }
    }
}

impl core::error::Error for SceneError {}

/// The accessibility annotation attached to an area.
#[derive(Clone, Debug)]
pub(crate) struct SemanticSlot<T> {
    /// Whether the area appears in the semantic tree.
    pub(crate) valid: bool,
    /// Stable identifier, assigned at the frame boundary.
    pub(crate) id: Option<SemanticId>,
    /// The annotation content the identifier is keyed by.
    pub(crate) content: SemanticContent<T>,
}

impl<T> Default for SemanticSlot<T> {
    fn default() -> Self {
        Self {
            valid: false,
            id: None,
            content: SemanticContent::default(),
        }
    }
}

/// A clip area in the per-frame tree.
#[derive(Clone, Debug)]
pub(crate) struct AreaNode<T> {
    pub(crate) shape: ClipShape,
    /// Bounds in local coordinates.
    pub(crate) rect: Rect,
    /// Accumulated local-to-surface transform.
    pub(crate) transform: Affine,
    pub(crate) parent: i32,
    pub(crate) first_child: i32,
    pub(crate) last_child: i32,
    pub(crate) sibling: i32,
    /// Cursor shown while the pointer is inside this area.
    pub(crate) cursor: Cursor,
    /// Window-manager actions attached to this area.
    pub(crate) actions: Actions,
    pub(crate) semantic: SemanticSlot<T>,
}

impl<T> AreaNode<T> {
    /// World-space axis-aligned bounds.
    pub(crate) fn bounds(&self) -> Rect {
        self.transform.transform_rect_bbox(self.rect)
    }

    fn contains_local(&self, p: Point) -> bool {
        let x = p.x - self.rect.x0;
        let y = p.y - self.rect.y0;
        let w = self.rect.width();
        let h = self.rect.height();
        match self.shape {
            ClipShape::Rect => 0.0 <= x && x < w && 0.0 <= y && y < h,
            ClipShape::Ellipse => {
                let rx = w / 2.0;
                let ry = h / 2.0;
                let xh = x - rx;
                let yk = y - ry;
                // 0/0 is NaN, so a degenerate ellipse contains nothing.
                (xh * xh) / (rx * rx) + (yk * yk) / (ry * ry) <= 1.0
            }
        }
    }
}

/// An entry of the flattened hit list.
#[derive(Clone, Debug)]
pub(crate) struct HitNode<T> {
    /// Index of the hit node of the enclosing area.
    pub(crate) next: i32,
    /// The area this node was declared in.
    pub(crate) area: i32,
    /// The declared handler; `None` for the pass-through node pushed by
    /// a clip.
    pub(crate) tag: Option<T>,
    /// Whether hits pass through this node to the nodes beneath it.
    pub(crate) pass: bool,
}

/// The arena of areas and the hit list for one frame.
#[derive(Clone, Debug)]
pub(crate) struct SceneTree<T> {
    pub(crate) areas: Vec<AreaNode<T>>,
    pub(crate) hits: Vec<HitNode<T>>,
}

impl<T> Default for SceneTree<T> {
    fn default() -> Self {
        Self {
            areas: Vec::new(),
            hits: Vec::new(),
        }
    }
}

impl<T: Copy> SceneTree<T> {
    pub(crate) fn clear(&mut self) {
        self.areas.clear();
        self.hits.clear();
    }

    /// Transform `p` into the local coordinates of `area`.
    pub(crate) fn inv_transform(&self, area: i32, p: Point) -> Point {
        if area == NONE {
            return p;
        }
        self.areas[area as usize].transform.inverse() * p
    }

    /// Whether `p` lies inside `area` and every ancestor, along with the
    /// innermost non-default cursor on that ancestor chain.
    pub(crate) fn contains(&self, mut area: i32, p: Point) -> (bool, Cursor) {
        let mut cursor = Cursor::Default;
        while area != NONE {
            let a = &self.areas[area as usize];
            if cursor == Cursor::Default {
                cursor = a.cursor;
            }
            let local = a.transform.inverse() * p;
            if !a.contains_local(local) {
                return (false, cursor);
            }
            area = a.parent;
        }
        (true, cursor)
    }

    /// Walk the hit list topmost-first, visiting every node containing
    /// `pos`. The visitor returns `false` to stop the walk. Returns the
    /// cursor of the topmost hit area.
    ///
    /// Pass-through nodes keep the walk linear; once a non-passing node is
    /// hit, the walk jumps along `next` links, which restricts it to the
    /// enclosing areas of that node.
    pub(crate) fn hit_walk(
        &self,
        pos: Point,
        mut on_node: impl FnMut(&HitNode<T>) -> bool,
    ) -> Cursor {
        let mut pass = true;
        let mut idx = self.hits.len() as i32 - 1;
        let mut cursor = Cursor::Default;
        while idx >= 0 {
            let n = &self.hits[idx as usize];
            let (hit, c) = self.contains(n.area, pos);
            if !hit {
                idx -= 1;
                continue;
            }
            if cursor == Cursor::Default {
                cursor = c;
            }
            pass = pass && n.pass;
            if pass {
                idx -= 1;
            } else {
                idx = n.next;
            }
            if !on_node(n) {
                break;
            }
        }
        cursor
    }

    /// The first window action on the hit chain at `pos`.
    pub(crate) fn action_at(&self, pos: Point) -> Option<Actions> {
        let mut action = None;
        self.hit_walk(pos, |n| {
            let a = &self.areas[n.area as usize];
            if !a.actions.is_empty() {
                action = Some(a.actions);
                return false;
            }
            true
        });
        action
    }

    /// Intersect `r` with the world bounds of the ancestors of `area`.
    pub(crate) fn clip_for(&self, area: i32, mut r: Rect) -> Rect {
        let mut parent = self.areas[area as usize].parent;
        while parent != NONE {
            let a = &self.areas[parent as usize];
            r = r.intersect(a.bounds());
            parent = a.parent;
        }
        r
    }
}

/// Rebuilds a [`SceneTree`] from the structural stream.
///
/// The builder tracks the open-area stack, the pass depth and the current
/// transform; the op loop itself lives in the router, which also owns the
/// transform save slots and push stack.
#[derive(Clone, Debug, Default)]
pub(crate) struct SceneBuilder {
    /// Index of the current hit node, plus one so the zero value denotes
    /// the pre-root state.
    node_plus_one: i32,
    node_stack: Vec<i32>,
    /// Stack entries below this belong to the implicit root and are not
    /// poppable by the producer.
    base: usize,
    pass: u32,
    transform: Affine,
}

impl SceneBuilder {
    pub(crate) fn reset<T: Copy>(&mut self, tree: &mut SceneTree<T>) {
        tree.clear();
        self.node_plus_one = 0;
        self.node_stack.clear();
        self.pass = 0;
        self.transform = Affine::IDENTITY;
        self.ensure_root(tree);
    }

    /// Push the implicit full-plane root area, so annotations always have
    /// a current area and the semantic tree has a single root.
    pub(crate) fn ensure_root<T: Copy>(&mut self, tree: &mut SceneTree<T>) {
        if !tree.areas.is_empty() {
            return;
        }
        self.push_clip(
            tree,
            ClipShape::Rect,
            Rect::new(-1e6, -1e6, 1e6, 1e6),
        );
        tree.areas[0].semantic.valid = true;
        self.base = self.node_stack.len();
    }

    pub(crate) fn set_transform(&mut self, t: Affine) {
        self.transform = t;
    }

    pub(crate) fn transform(&self) -> Affine {
        self.transform
    }

    /// Rewind the open-area stack to the root, as a transform slot load
    /// does.
    pub(crate) fn rewind_to_root<T>(&mut self, tree: &SceneTree<T>) {
        self.node_stack.clear();
        self.base = 0;
        self.node_plus_one = if tree.hits.is_empty() { 0 } else { 1 };
    }

    pub(crate) fn current_area<T>(&self, tree: &SceneTree<T>) -> i32 {
        let idx = self.node_plus_one - 1;
        if idx == NONE {
            return NONE;
        }
        tree.hits[idx as usize].area
    }

    /// World bounds of the innermost open area.
    pub(crate) fn current_area_bounds<T: Copy>(&self, tree: &SceneTree<T>) -> Rect {
        let area = self.current_area(tree);
        tree.areas[area as usize].bounds()
    }

    pub(crate) fn push_clip<T: Copy>(
        &mut self,
        tree: &mut SceneTree<T>,
        shape: ClipShape,
        rect: Rect,
    ) {
        let parent = self.current_area(tree);
        let area = tree.areas.len() as i32;
        if parent != NONE {
            let p = &mut tree.areas[parent as usize];
            if p.first_child == NONE {
                p.first_child = area;
            }
            let sibling = p.last_child;
            p.last_child = area;
            if sibling != NONE {
                tree.areas[sibling as usize].sibling = area;
            }
        }
        tree.areas.push(AreaNode {
            shape,
            rect,
            transform: self.transform,
            parent,
            first_child: NONE,
            last_child: NONE,
            sibling: NONE,
            cursor: Cursor::Default,
            actions: Actions::empty(),
            semantic: SemanticSlot::default(),
        });
        self.node_stack.push(self.node_plus_one - 1);
        self.add_hit_node(
            tree,
            HitNode {
                next: NONE,
                area,
                tag: None,
                pass: true,
            },
        );
    }

    pub(crate) fn pop_clip<T>(&mut self, _tree: &SceneTree<T>) -> Result<(), SceneError> {
        if self.node_stack.len() <= self.base {
            return Err(SceneError::UnbalancedClipPop);
        }
        let node = self.node_stack.pop().ok_or(SceneError::UnbalancedClipPop)?;
        self.node_plus_one = node + 1;
        Ok(())
    }

    pub(crate) fn push_pass(&mut self) {
        self.pass += 1;
    }

    pub(crate) fn pop_pass(&mut self) -> Result<(), SceneError> {
        self.pass = self.pass.checked_sub(1).ok_or(SceneError::UnbalancedPassPop)?;
        Ok(())
    }

    /// Declare a handler in the current area, returning the area index.
    pub(crate) fn declare<T: Copy>(&mut self, tree: &mut SceneTree<T>, tag: T) -> i32 {
        let area = self.current_area(tree);
        self.add_hit_node(
            tree,
            HitNode {
                next: NONE,
                area,
                tag: Some(tag),
                pass: self.pass > 0,
            },
        );
        tree.areas[area as usize].semantic.content.tag = Some(tag);
        area
    }

    fn add_hit_node<T>(&mut self, tree: &mut SceneTree<T>, mut n: HitNode<T>) {
        n.next = self.node_plus_one - 1;
        tree.hits.push(n);
        self.node_plus_one = tree.hits.len() as i32;
    }

    pub(crate) fn set_cursor<T>(&mut self, tree: &mut SceneTree<T>, cursor: Cursor) {
        let area = self.current_area(tree);
        tree.areas[area as usize].cursor = cursor;
    }

    pub(crate) fn set_actions<T>(&mut self, tree: &mut SceneTree<T>, actions: Actions) {
        let area = self.current_area(tree);
        tree.areas[area as usize].actions = actions;
    }

    pub(crate) fn semantic_mut<'t, T>(
        &mut self,
        tree: &'t mut SceneTree<T>,
    ) -> &'t mut SemanticSlot<T> {
        let area = self.current_area(tree);
        &mut tree.areas[area as usize].semantic
    }
}
