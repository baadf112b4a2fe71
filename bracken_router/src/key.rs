// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The key and focus engine.
//!
//! ## Overview
//!
//! At most one handler holds focus. Focus changes are idempotent and emit
//! a loss event to the previous holder before the gain event to the new
//! one; any pending editor selection or snippet state is reset by the
//! change, and the text-input tri-state is forced closed unless a
//! soft-keyboard command in the same batch opened it.
//!
//! Tab order follows declaration order. Directional navigation partitions
//! the focusable handlers into rows with a greedy sweep — sort by top
//! edge, absorb every handler whose vertical center lies above the row
//! leader's bottom edge, sort each row by left edge — and then moves by
//! index within a row or to the nearest horizontal-center match in the
//! adjacent row.
//!
//! Cross-event focus state travels through [`KeyState`] snapshots; the
//! per-frame declaration table lives in the queue.

use alloc::vec::Vec;
use core::cmp::Ordering;

use hashbrown::HashMap;
use kurbo::{Affine, Rect};

use bracken_io::event::Event;
use bracken_io::key::{
    Caret, FocusDirection, FocusEvent, InputHint, KeyEvent, KeyFilter, Range, Snippet,
    TextInputState,
};

use crate::pointer::TaggedEvents;
use crate::scene::NONE;

/// The editor state of the focused handler, as needed by platform input
/// methods.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorState {
    /// The selection, positioned in the focused handler's transform.
    pub selection: Selection,
    /// The content snippet around the selection.
    pub snippet: Snippet,
}

/// A selection inside the focused editor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Transform from the handler's local space to surface space.
    pub transform: Affine,
    /// The selected rune range.
    pub range: Range,
    /// The caret position.
    pub caret: Caret,
}

/// The snapshot part of key routing state.
#[derive(Clone, Debug)]
pub(crate) struct KeyState<T> {
    pub(crate) focus: Option<T>,
    pub(crate) input: TextInputState,
    pub(crate) content: EditorState,
}

impl<T> Default for KeyState<T> {
    fn default() -> Self {
        Self {
            focus: None,
            input: TextInputState::Keep,
            content: EditorState::default(),
        }
    }
}

impl<T> KeyState<T> {
    /// Read the tri-state and reset it to [`TextInputState::Keep`].
    pub(crate) fn take_input(mut self) -> (Self, TextInputState) {
        let input = self.input;
        self.input = TextInputState::Keep;
        (self, input)
    }

    pub(crate) fn soft_keyboard(mut self, show: bool) -> Self {
        self.input = if show {
            TextInputState::Open
        } else {
            TextInputState::Close
        };
        self
    }
}

#[derive(Clone, Debug)]
struct KeyHandler {
    /// Declared in the current frame's operation stream.
    visible: bool,
    /// Whether the handler has seen its one-time focus reset event.
    reset: bool,
    /// Touched (declared or filtered) since the last frame boundary.
    live: bool,
    focusable: bool,
    filters: Vec<KeyFilter>,
    hint: InputHint,
    /// Position in declaration order, plus one so zero means undeclared.
    order_plus_one: usize,
    /// Position in the directional layout.
    dir_order: usize,
    transform: Affine,
}

impl Default for KeyHandler {
    fn default() -> Self {
        Self {
            visible: false,
            reset: false,
            live: false,
            focusable: false,
            filters: Vec::new(),
            hint: InputHint::Any,
            order_plus_one: 0,
            dir_order: 0,
            transform: Affine::IDENTITY,
        }
    }
}

#[derive(Clone, Debug)]
struct DirEntry<T> {
    tag: T,
    row: usize,
    area: i32,
    bounds: Rect,
}

/// The key and focus engine. Holds the per-frame handler table and the
/// navigation layout.
#[derive(Clone, Debug)]
pub(crate) struct KeyQueue<T> {
    handlers: HashMap<T, KeyHandler>,
    /// Declared handlers in declaration order, the tab cycle.
    order: Vec<T>,
    dir_order: Vec<DirEntry<T>>,
    hint: InputHint,
}

impl<T> Default for KeyQueue<T> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            order: Vec::new(),
            dir_order: Vec::new(),
            hint: InputHint::Any,
        }
    }
}

impl<T: Copy + Eq + core::hash::Hash> KeyQueue<T> {
    fn handler_for(&mut self, tag: T) -> &mut KeyHandler {
        let h = self.handlers.entry(tag).or_default();
        if !h.live {
            h.focusable = false;
            h.filters.clear();
        }
        h.live = true;
        h
    }

    /// Clear the declaration-order state for a new frame.
    pub(crate) fn begin_frame(&mut self) {
        self.order.clear();
        self.dir_order.clear();
        for h in self.handlers.values_mut() {
            h.visible = false;
            h.order_plus_one = 0;
            h.hint = InputHint::Any;
        }
    }

    /// Record a handler declaration with its transform and world bounds.
    pub(crate) fn declare(&mut self, tag: T, transform: Affine, area: i32, bounds: Rect) {
        let h = self.handler_for(tag);
        h.visible = true;
        h.transform = transform;
        let undeclared = h.order_plus_one == 0;
        if undeclared {
            self.order.push(tag);
            self.dir_order.push(DirEntry {
                tag,
                row: 0,
                area,
                bounds,
            });
            let order = self.order.len();
            if let Some(h) = self.handlers.get_mut(&tag) {
                h.order_plus_one = order;
            }
        }
    }

    pub(crate) fn add_filter(&mut self, tag: T, f: &KeyFilter) {
        let h = self.handler_for(tag);
        if !h.filters.contains(f) {
            h.filters.push(f.clone());
        }
    }

    pub(crate) fn set_focusable(&mut self, tag: T) {
        self.handler_for(tag).focusable = true;
    }

    pub(crate) fn set_hint(&mut self, tag: T, hint: InputHint) {
        self.handler_for(tag).hint = hint;
    }

    /// The one-time synthetic focus loss that gives a newly observed
    /// handler a known baseline.
    pub(crate) fn reset_event(&mut self, tag: T) -> Option<Event> {
        let h = self.handlers.get_mut(&tag)?;
        if h.reset {
            return None;
        }
        h.reset = true;
        Some(Event::Focus(FocusEvent { focused: false }))
    }

    pub(crate) fn is_known(&self, tag: T) -> bool {
        self.handlers.contains_key(&tag)
    }

    /// Whether `tag`'s key filters accept `e`.
    pub(crate) fn accepts(&self, tag: T, e: &KeyEvent) -> bool {
        self.handlers
            .get(&tag)
            .is_some_and(|h| h.filters.iter().any(|f| f.matches(e)))
    }

    /// Change focus. Idempotent; unknown previous holders simply receive
    /// nothing.
    pub(crate) fn focus(
        &self,
        mut state: KeyState<T>,
        focus: Option<T>,
    ) -> (KeyState<T>, TaggedEvents<T>) {
        if focus == state.focus {
            return (state, Vec::new());
        }
        state.content = EditorState::default();
        let mut evts = Vec::new();
        if let Some(old) = state.focus {
            evts.push((old, Event::Focus(FocusEvent { focused: false })));
        }
        state.focus = focus;
        if let Some(new) = state.focus {
            evts.push((new, Event::Focus(FocusEvent { focused: true })));
        }
        if state.focus.is_none() || state.input == TextInputState::Keep {
            state.input = TextInputState::Close;
        }
        (state, evts)
    }

    /// The frame boundary pass: defocus a handler that is no longer both
    /// visible and focusable, rebuild the directional layout and prune
    /// untouched handlers.
    pub(crate) fn frame(&mut self, mut state: KeyState<T>) -> KeyState<T> {
        if let Some(f) = state.focus {
            let keep = self
                .handlers
                .get(&f)
                .is_some_and(|h| h.focusable && h.visible);
            if !keep {
                state.focus = None;
                state.input = TextInputState::Close;
            }
        }
        self.update_focus_layout();
        self.handlers.retain(|_, h| {
            let keep = h.live;
            h.live = false;
            keep
        });
        state
    }

    /// Partition the declared handlers into rows for directional moves.
    ///
    /// Greedy: take the topmost remaining handler as a row leader and
    /// absorb every handler whose vertical center lies above the leader's
    /// bottom edge, then order the row left to right.
    fn update_focus_layout(&mut self) {
        self.dir_order.sort_by(|a, b| {
            a.bounds
                .y0
                .partial_cmp(&b.bounds.y0)
                .unwrap_or(Ordering::Equal)
        });
        let mut row = 0;
        let mut start = 0;
        while start < self.dir_order.len() {
            self.dir_order[start].row = row;
            let bottom = self.dir_order[start].bounds.y1;
            let mut end = start + 1;
            while end < self.dir_order.len() {
                let b = &self.dir_order[end].bounds;
                if (b.y0 + b.y1) / 2.0 > bottom {
                    break;
                }
                self.dir_order[end].row = row;
                end += 1;
            }
            self.dir_order[start..end].sort_by(|a, b| {
                a.bounds
                    .x0
                    .partial_cmp(&b.bounds.x0)
                    .unwrap_or(Ordering::Equal)
            });
            start = end;
            row += 1;
        }
        for i in 0..self.dir_order.len() {
            let tag = self.dir_order[i].tag;
            if let Some(h) = self.handlers.get_mut(&tag) {
                h.dir_order = i;
            }
        }
    }

    /// Move focus in `dir`. A no-op on an empty layout.
    pub(crate) fn move_focus(
        &self,
        state: KeyState<T>,
        dir: FocusDirection,
    ) -> (KeyState<T>, TaggedEvents<T>) {
        if self.dir_order.is_empty() {
            return (state, Vec::new());
        }
        let order = state
            .focus
            .and_then(|f| self.handlers.get(&f))
            .map_or(0, |h| h.dir_order);
        let focus_entry = &self.dir_order[order];
        match dir {
            FocusDirection::Forward | FocusDirection::Backward => {
                if self.order.is_empty() {
                    return (state, Vec::new());
                }
                let n = self.order.len() as isize;
                let mut o: isize = if dir == FocusDirection::Backward { -1 } else { 0 };
                if let Some(h) = state.focus.and_then(|f| self.handlers.get(&f))
                    && h.order_plus_one > 0
                {
                    o = h.order_plus_one as isize - 1;
                    o += if dir == FocusDirection::Forward { 1 } else { -1 };
                }
                let o = ((o % n) + n) % n;
                self.focus(state, Some(self.order[o as usize]))
            }
            FocusDirection::Left | FocusDirection::Right => {
                let next = if state.focus.is_some() {
                    if dir == FocusDirection::Left {
                        order as isize - 1
                    } else {
                        order as isize + 1
                    }
                } else {
                    order as isize
                };
                if 0 <= next && (next as usize) < self.dir_order.len() {
                    let candidate = &self.dir_order[next as usize];
                    if candidate.row == focus_entry.row {
                        let tag = candidate.tag;
                        return self.focus(state, Some(tag));
                    }
                }
                (state, Vec::new())
            }
            FocusDirection::Up | FocusDirection::Down => {
                let delta: isize = if dir == FocusDirection::Up { -1 } else { 1 };
                let next_row = if state.focus.is_some() {
                    focus_entry.row as isize + delta
                } else {
                    0
                };
                let center = (focus_entry.bounds.x0 + focus_entry.bounds.x1) / 2.0;
                let mut closest = None;
                let mut dist = f64::INFINITY;
                let mut o = order as isize;
                while 0 <= o && (o as usize) < self.dir_order.len() {
                    let next = &self.dir_order[o as usize];
                    if next.row as isize == next_row {
                        let next_center = (next.bounds.x0 + next.bounds.x1) / 2.0;
                        let d = (center - next_center).abs();
                        if d > dist {
                            break;
                        }
                        dist = d;
                        closest = Some(next.tag);
                    } else if next.row as isize == next_row + delta {
                        break;
                    }
                    o += delta;
                }
                match closest {
                    Some(tag) => self.focus(state, Some(tag)),
                    None => (state, Vec::new()),
                }
            }
        }
    }

    /// The focused handler's input hint, and whether it changed since the
    /// last query.
    pub(crate) fn input_hint(&mut self, state: &KeyState<T>) -> (InputHint, bool) {
        let Some(h) = state.focus.and_then(|f| self.handlers.get(&f)) else {
            return (self.hint, false);
        };
        let old = self.hint;
        self.hint = h.hint;
        (self.hint, old != self.hint)
    }

    /// The editor state, with the selection transform of the focused
    /// handler filled in.
    pub(crate) fn editor_state(&self, state: &KeyState<T>) -> EditorState {
        let mut s = state.content.clone();
        if let Some(h) = state.focus.and_then(|f| self.handlers.get(&f)) {
            s.selection.transform = h.transform;
        }
        s
    }

    /// Update the selection; only the focused tag may do so.
    pub(crate) fn set_selection(
        &self,
        mut state: KeyState<T>,
        tag: T,
        range: Range,
        caret: Caret,
    ) -> KeyState<T> {
        if state.focus != Some(tag) {
            return state;
        }
        state.content.selection.range = range;
        state.content.selection.caret = caret;
        state
    }

    /// Update the snippet; only the focused tag may do so.
    pub(crate) fn set_snippet(
        &self,
        mut state: KeyState<T>,
        tag: T,
        snippet: Snippet,
    ) -> KeyState<T> {
        if state.focus != Some(tag) {
            return state;
        }
        state.content.snippet = snippet;
        state
    }

    pub(crate) fn bounds_for(&self, tag: T) -> Option<Rect> {
        let h = self.handlers.get(&tag)?;
        self.dir_order.get(h.dir_order).map(|e| e.bounds)
    }

    pub(crate) fn area_for(&self, tag: T) -> Option<i32> {
        let h = self.handlers.get(&tag)?;
        let area = self.dir_order.get(h.dir_order).map(|e| e.area)?;
        (area != NONE).then_some(area)
    }
}
