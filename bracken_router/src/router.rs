// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The router: frame orchestration, command execution and the event
//! replay protocol.
//!
//! ## State changes
//!
//! Routing state is kept as a chain of immutable snapshots, one per
//! atomic batch of deliveries. Each incoming event or executed command
//! appends a `(state, pending events)` change to the chain instead of
//! mutating in place. [`Router::events`] removes the events the consumer
//! observes and collapses the chain up to the last match, merging the
//! observed history forward into the base snapshot while unobserved
//! events survive for later consumers.
//!
//! ## Commands
//!
//! A command executes against the newest snapshot. If one of the events
//! it produces targets a handler that has already exhausted the matching
//! filters this frame, delivering it now would reach a consumer that
//! believes it has seen everything; the command is instead deferred to
//! the next frame boundary and replayed against the rebuilt state.

use alloc::vec::Vec;
use core::hash::Hash;
use core::mem;

use hashbrown::HashMap;
use kurbo::{Affine, Point, Rect, Vec2};

use bracken_io::clipboard::ClipboardData;
use bracken_io::event::{Deadline, Event, Filter, Timestamp};
use bracken_io::key::{
    Caret, FocusDirection, InputHint, KeyEvent, Range, Snippet, TextInputState,
};
use bracken_io::pointer::{Cursor, PointerEvent, PointerId, PointerKind, Source};
use bracken_io::scene::SceneOp;
use bracken_io::transfer::{DataHandle, TransferData};
use bracken_io::window::Actions;

use crate::clipboard::{ClipboardQueue, ClipboardState};
use crate::key::{EditorState, KeyQueue, KeyState};
use crate::pointer::{PointerQueue, PointerState, TaggedEvents, key_fallback_walk};
use crate::scene::{SceneBuilder, SceneError, SceneTree};
use crate::semantics::{SemanticId, SemanticIds, SemanticNode};

/// A request changing routing state, executed through [`Router::execute`].
///
/// Requests referencing identities the router does not know, such as a
/// grab for a pointer that is not pressed or an offer from a tag that is
/// not the recorded drag source, are silent no-ops.
#[derive(Clone, Debug, PartialEq)]
pub enum Command<T> {
    /// Move focus to the given handler, or clear it.
    SetFocus(Option<T>),
    /// Force exclusive delivery of a pointer to one handler, cancelling
    /// every other handler currently holding it.
    Grab {
        /// The pointer to grab.
        pointer: PointerId,
        /// The handler taking exclusive delivery.
        tag: T,
    },
    /// Show or hide the platform soft keyboard.
    SoftKeyboard(bool),
    /// Update the focused editor's selection. Ignored unless `tag` holds
    /// focus.
    Selection {
        /// The editor the selection belongs to.
        tag: T,
        /// The selected rune range.
        range: Range,
        /// The caret position.
        caret: Caret,
    },
    /// Update the focused editor's content snippet. Ignored unless `tag`
    /// holds focus.
    Snippet {
        /// The editor the snippet belongs to.
        tag: T,
        /// The content snippet.
        snippet: Snippet,
    },
    /// Respond to a transfer request with data. Ignored unless `tag` is
    /// the recorded drag source.
    Offer {
        /// The responding drag source.
        tag: T,
        /// The offered payload.
        data: TransferData,
    },
    /// Buffer content to copy to the clipboard, superseding any unread
    /// earlier write.
    WriteClipboard(ClipboardData),
    /// Register the given handler as a receiver of the next clipboard
    /// content.
    ReadClipboard(T),
    /// Request a redraw no later than `at`, or as soon as possible when
    /// `at` is `None`.
    Invalidate {
        /// The deadline.
        at: Option<Timestamp>,
    },
}

/// One immutable snapshot of the state needed to route events.
#[derive(Clone, Debug)]
struct InputState<T> {
    pointer: PointerState<T>,
    key: KeyState<T>,
    clipboard: ClipboardState<T>,
}

impl<T> Default for InputState<T> {
    fn default() -> Self {
        Self {
            pointer: PointerState::default(),
            key: KeyState::default(),
            clipboard: ClipboardState::default(),
        }
    }
}

/// A snapshot plus the deliveries that produced it.
#[derive(Clone, Debug)]
struct StateChange<T> {
    state: InputState<T>,
    events: TaggedEvents<T>,
}

/// Routes raw platform events to handler tags declared by a per-frame
/// structural stream.
///
/// See the crate documentation for the frame protocol.
#[derive(Debug)]
pub struct Router<T> {
    tree: SceneTree<T>,
    builder: SceneBuilder,
    saved_trans: Vec<Option<Affine>>,
    trans_stack: Vec<Affine>,
    pointer: PointerQueue<T>,
    key: KeyQueue<T>,
    clipboard: ClipboardQueue,
    semantics: SemanticIds<T>,
    /// The snapshot chain. The first element is the current state from
    /// the consumers' perspective.
    changes: Vec<StateChange<T>>,
    /// Commands deferred to the next frame boundary.
    deferred: Vec<Command<T>>,
    /// Filters each tag has exhausted this frame through
    /// [`Router::events`].
    drained: HashMap<T, Vec<Filter>>,
    /// Pending transfer payloads; a `None` slot was claimed.
    transfers: Vec<Option<TransferData>>,
    wakeup: Option<Deadline>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self {
            tree: SceneTree::default(),
            builder: SceneBuilder::default(),
            saved_trans: Vec::new(),
            trans_stack: Vec::new(),
            pointer: PointerQueue::default(),
            key: KeyQueue::default(),
            clipboard: ClipboardQueue::default(),
            semantics: SemanticIds::default(),
            changes: Vec::new(),
            deferred: Vec::new(),
            drained: HashMap::new(),
            transfers: Vec::new(),
            wakeup: None,
        }
    }
}

fn vec_min(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x.min(b.x), a.y.min(b.y))
}

fn vec_max(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x.max(b.x), a.y.max(b.y))
}

impl<T: Copy + Eq + Hash> Router<T> {
    /// A router with no declared handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending events for `tag` that match `filters`.
    ///
    /// The filters are first merged into `tag`'s declared interest for
    /// the current frame; a handler observed for the first time receives
    /// its one-time reset event (a pointer cancel, a focus loss) ahead of
    /// anything pending. Events handed out are removed from the snapshot
    /// chain and the chain is collapsed past the last match.
    pub fn events(&mut self, tag: T, filters: &[Filter]) -> Vec<Event> {
        let mut events = Vec::new();
        for f in filters {
            match f {
                Filter::Pointer(pf) => {
                    self.pointer.merge_filter(tag, pf);
                    if let Some(reset) = self.pointer.reset_event(tag) {
                        events.push(reset);
                    }
                }
                Filter::Key(kf) => self.key.add_filter(tag, kf),
                Filter::Focus => {
                    self.key.set_focusable(tag);
                    if let Some(reset) = self.key.reset_event(tag) {
                        events.push(reset);
                    }
                }
                Filter::TransferSource { mime } => self.pointer.source_filter(tag, mime),
                Filter::TransferTarget { mime } => self.pointer.target_filter(tag, mime),
                Filter::ClipboardRead => {}
            }
        }
        self.drained
            .entry(tag)
            .or_default()
            .extend(filters.iter().cloned());
        let mut matched = 0;
        for i in 0..self.changes.len() {
            let change = &mut self.changes[i];
            let mut j = 0;
            while j < change.events.len() {
                let (t, e) = &change.events[j];
                if *t != tag || !filters.iter().any(|f| f.matches(e)) {
                    j += 1;
                    continue;
                }
                events.push(change.events.remove(j).1);
                matched = i;
            }
        }
        self.collapse(matched);
        events
    }

    /// Execute a command, or defer it to the next frame boundary if one
    /// of its deliveries would reach a handler that already exhausted the
    /// matching filters this frame.
    pub fn execute(&mut self, cmd: Command<T>) {
        let transfer_mark = self.transfers.len();
        let Some((state, evts)) = self.apply(cmd.clone()) else {
            return;
        };
        if evts.iter().any(|(t, e)| self.exhausted(*t, e)) {
            self.transfers.truncate(transfer_mark);
            self.deferred.push(cmd);
            return;
        }
        self.change_state(state, evts);
    }

    /// Route one raw platform event, reporting whether it produced a
    /// delivery for some handler.
    ///
    /// Enter, leave and drag pointer kinds are derived internally and
    /// ignored when injected raw, as are transfer protocol events.
    /// Edit, selection, snippet and focus events are scoped to the
    /// focused handler.
    pub fn queue(&mut self, event: Event) -> bool {
        let state = self.last_state();
        match event {
            Event::Pointer(e) => {
                let (p, evts) = self.pointer.push(&self.tree, state.pointer, e);
                self.change_pointer_state(p, evts)
            }
            Event::Key(e) => {
                let evts = self.route_key(&state.key, e);
                self.add_events(evts)
            }
            Event::Snippet(mut e) => {
                // Expand an existing, overlapping snippet.
                let r = state.key.content.snippet.range;
                if r.overlaps(e.0) {
                    e.0.start = e.0.start.min(r.start);
                    e.0.end = e.0.end.max(r.end);
                }
                let evts: TaggedEvents<T> = state
                    .key
                    .focus
                    .map(|f| (f, Event::Snippet(e)))
                    .into_iter()
                    .collect();
                self.add_events(evts)
            }
            Event::Edit(_) | Event::Focus(_) | Event::Selection(_) => {
                let evts: TaggedEvents<T> =
                    state.key.focus.map(|f| (f, event)).into_iter().collect();
                self.add_events(evts)
            }
            Event::Clipboard(data) => {
                let (c, evts) = self.clipboard.push(state.clipboard, &data);
                self.change_clipboard_state(c, evts)
            }
            Event::Transfer(_) => false,
        }
    }

    /// Run one frame boundary: release unclaimed transfer payloads,
    /// reseed the snapshot chain, rebuild the area tree from `ops`,
    /// execute deferred commands and run the pointer and key frame
    /// passes.
    ///
    /// A malformed stream is a producer contract violation; the decode
    /// stops at the offending operation and the frame must not be routed
    /// against.
    pub fn frame(&mut self, ops: &[SceneOp<T>]) -> Result<(), SceneError> {
        self.transfers.clear();
        self.wakeup = None;
        self.drained.clear();
        if self.changes.len() > 1 {
            let state = self.last_state();
            self.changes.clear();
            self.changes.push(StateChange {
                state,
                events: Vec::new(),
            });
        }
        self.decode(ops)?;
        let deferred = mem::take(&mut self.deferred);
        for cmd in deferred {
            self.execute(cmd);
        }
        let state = self.last_state();
        let (p, evts) = self.pointer.frame(&mut self.tree, state.pointer);
        self.change_pointer_state(p, evts);
        let state = self.last_state();
        let k = self.key.frame(state.key);
        self.change_key_state(k, Vec::new());
        self.collapse(self.changes.len().saturating_sub(1));
        if self.changes.first().is_some_and(|c| !c.events.is_empty()) {
            self.wakeup = Some(Deadline::Asap);
        }
        Ok(())
    }

    /// Move the focus in `dir`, reporting whether focus events resulted.
    pub fn move_focus(&mut self, dir: FocusDirection) -> bool {
        let state = self.last_state();
        let (k, evts) = self.key.move_focus(state.key, dir);
        self.change_key_state(k, evts)
    }

    /// Deliver a synthetic scroll of `delta` to the focused handler's
    /// area, honoring declared scroll bounds along its hit chain.
    pub fn scroll_focus(&mut self, delta: Vec2) {
        let state = self.last_state();
        let Some(focus) = state.key.focus else {
            return;
        };
        let Some(area) = self.key.area_for(focus) else {
            return;
        };
        let evts = self.pointer.deliver_to_area(
            &self.tree,
            area,
            PointerEvent {
                kind: PointerKind::SCROLL,
                source: Source::Touch,
                scroll: delta,
                ..PointerEvent::default()
            },
        );
        self.add_events(evts);
    }

    /// Scroll the focused handler into `viewport`, clipped by its
    /// ancestor areas.
    pub fn reveal_focus(&mut self, viewport: Rect) {
        let state = self.last_state();
        let Some(focus) = state.key.focus else {
            return;
        };
        let Some(bounds) = self.key.bounds_for(focus) else {
            return;
        };
        let Some(area) = self.key.area_for(focus) else {
            return;
        };
        let viewport = self.tree.clip_for(area, viewport);

        let min_delta = Vec2::new(bounds.x0 - viewport.x0, bounds.y0 - viewport.y0);
        let max_delta = Vec2::new(bounds.x1 - viewport.x1, bounds.y1 - viewport.y1);
        let topleft = vec_min(Vec2::ZERO, vec_max(min_delta, max_delta));
        let bottomright = vec_max(Vec2::ZERO, vec_min(max_delta, min_delta));
        let mut s = topleft;
        if s.x == 0.0 {
            s.x = bottomright.x;
        }
        if s.y == 0.0 {
            s.y = bottomright.y;
        }
        self.scroll_focus(s);
    }

    /// Synthesize a press and release pair at the center of the focused
    /// handler's bounds, for keyboard activation.
    pub fn click_focus(&mut self) {
        let state = self.last_state();
        let Some(focus) = state.key.focus else {
            return;
        };
        let Some(bounds) = self.key.bounds_for(focus) else {
            return;
        };
        let Some(area) = self.key.area_for(focus) else {
            return;
        };
        let mut e = PointerEvent {
            position: bounds.center(),
            source: Source::Touch,
            ..PointerEvent::default()
        };
        e.kind = PointerKind::PRESS;
        let evts = self.pointer.deliver_to_area(&self.tree, area, e.clone());
        self.add_events(evts);
        e.kind = PointerKind::RELEASE;
        let evts = self.pointer.deliver_to_area(&self.tree, area, e);
        self.add_events(evts);
    }

    /// The cursor selected by the most recent hit test.
    pub fn cursor(&self) -> Cursor {
        self.changes
            .first()
            .map_or(Cursor::Default, |c| c.state.pointer.cursor)
    }

    /// The handler holding focus, if any, as of the newest state.
    pub fn focused(&self) -> Option<T> {
        self.changes.last().and_then(|c| c.state.key.focus)
    }

    /// Whether the platform text input connection should open or close.
    ///
    /// Edge-triggered: a reported value reverts to
    /// [`TextInputState::Keep`] until the state changes again.
    pub fn text_input_state(&mut self) -> TextInputState {
        let state = self.state();
        let (k, input) = state.key.take_input();
        let mut last = self.last_state();
        last.key = k;
        self.change_state(last, Vec::new());
        input
    }

    /// The focused handler's input hint, and whether it changed since
    /// the last query.
    pub fn input_hint(&mut self) -> (InputHint, bool) {
        let state = self.state();
        self.key.input_hint(&state.key)
    }

    /// The editor state of the focused handler, or the default value if
    /// there is none.
    pub fn editor_state(&self) -> EditorState {
        let state = self.state();
        self.key.editor_state(&state.key)
    }

    /// The most recent content to copy to the clipboard, if any. Reading
    /// consumes the pending write.
    pub fn take_clipboard_write(&mut self) -> Option<ClipboardData> {
        self.clipboard.take_write()
    }

    /// Whether a new batch of handlers is waiting to read the clipboard.
    pub fn clipboard_requested(&mut self) -> bool {
        let state = self.last_state();
        self.clipboard.requested(&state.clipboard)
    }

    /// The semantic tree snapshot for the current frame. The root node
    /// is the first in the returned list.
    pub fn semantics(&mut self) -> Vec<SemanticNode> {
        self.semantics.snapshot(&mut self.tree)
    }

    /// The innermost semantic id on the hit chain at `pos`, if any.
    pub fn semantic_at(&mut self, pos: Point) -> Option<SemanticId> {
        self.semantics.at(&mut self.tree, pos)
    }

    /// The window action attached to the hit chain at `pos`, if any.
    pub fn action_at(&self, pos: Point) -> Option<Actions> {
        self.tree.action_at(pos)
    }

    /// When the embedder should produce the next frame, if a deadline is
    /// pending. [`Deadline::Asap`] means events are already waiting for
    /// a consumer.
    pub fn wakeup(&self) -> Option<Deadline> {
        self.wakeup
    }

    /// Claim the payload behind a [`TransferEvent::Data`] delivery, at
    /// most once. An unclaimed payload is released at the next frame
    /// boundary.
    ///
    /// [`TransferEvent::Data`]: bracken_io::transfer::TransferEvent::Data
    pub fn claim_data(&mut self, handle: DataHandle) -> Option<TransferData> {
        self.transfers.get_mut(handle.index())?.take()
    }

    /// Apply `cmd` against the newest snapshot, returning the resulting
    /// state and deliveries. `None` means the request found nothing to
    /// affect.
    fn apply(&mut self, cmd: Command<T>) -> Option<(InputState<T>, TaggedEvents<T>)> {
        let mut state = self.last_state();
        let mut evts = Vec::new();
        match cmd {
            Command::SetFocus(tag) => {
                if let Some(t) = tag
                    && !self.key.is_known(t)
                {
                    return None;
                }
                let (k, e) = self.key.focus(state.key, tag);
                state.key = k;
                evts = e;
            }
            Command::Grab { pointer, tag } => {
                self.pointer.grab(&mut state.pointer, pointer, tag, &mut evts);
            }
            Command::SoftKeyboard(show) => state.key = state.key.soft_keyboard(show),
            Command::Selection { tag, range, caret } => {
                state.key = self.key.set_selection(state.key, tag, range, caret);
            }
            Command::Snippet { tag, snippet } => {
                state.key = self.key.set_snippet(state.key, tag, snippet);
            }
            Command::Offer { tag, data } => {
                self.pointer
                    .offer_data(&mut state.pointer, tag, data, &mut self.transfers, &mut evts);
            }
            Command::WriteClipboard(data) => self.clipboard.write(data),
            Command::ReadClipboard(tag) => {
                state.clipboard = self.clipboard.request_read(state.clipboard, tag);
            }
            Command::Invalidate { at } => {
                self.invalidate(at.map_or(Deadline::Asap, Deadline::At));
            }
        }
        Some((state, evts))
    }

    /// Whether `tag` has already observed the filter set matching
    /// `event` this frame.
    fn exhausted(&self, tag: T, event: &Event) -> bool {
        self.drained
            .get(&tag)
            .is_some_and(|fs| fs.iter().any(|f| f.matches(event)))
    }

    /// Deliver a key event to the focused handler if its filters accept
    /// it, falling back to the nearest declared acceptor along the hit
    /// chain.
    fn route_key(&self, kstate: &KeyState<T>, e: KeyEvent) -> TaggedEvents<T> {
        if let Some(f) = kstate.focus
            && self.key.accepts(f, &e)
        {
            return alloc::vec![(f, Event::Key(e))];
        }
        match key_fallback_walk(&self.tree, kstate.focus, |t| self.key.accepts(t, &e)) {
            Some(tag) => alloc::vec![(tag, Event::Key(e))],
            None => Vec::new(),
        }
    }

    fn decode(&mut self, ops: &[SceneOp<T>]) -> Result<(), SceneError> {
        self.trans_stack.clear();
        self.semantics.frame_reset();
        self.builder.reset(&mut self.tree);
        self.pointer.begin_frame();
        self.key.begin_frame();
        for op in ops {
            match op {
                SceneOp::SaveTransform(slot) => {
                    let slot = *slot as usize;
                    if slot >= self.saved_trans.len() {
                        self.saved_trans.resize(slot + 1, None);
                    }
                    self.saved_trans[slot] = Some(self.builder.transform());
                }
                SceneOp::LoadTransform(slot) => {
                    let t = self
                        .saved_trans
                        .get(*slot as usize)
                        .copied()
                        .flatten()
                        .ok_or(SceneError::UnknownTransformSlot(*slot))?;
                    self.builder.rewind_to_root(&self.tree);
                    self.builder.set_transform(t);
                }
                SceneOp::Transform { affine, push } => {
                    let t = self.builder.transform();
                    if *push {
                        self.trans_stack.push(t);
                    }
                    self.builder.set_transform(t * *affine);
                }
                SceneOp::PopTransform => {
                    let t = self
                        .trans_stack
                        .pop()
                        .ok_or(SceneError::UnbalancedTransformPop)?;
                    self.builder.set_transform(t);
                }
                SceneOp::PushClip { shape, rect } => {
                    self.builder.push_clip(&mut self.tree, *shape, *rect);
                }
                SceneOp::PopClip => self.builder.pop_clip(&self.tree)?,
                SceneOp::PushPass => self.builder.push_pass(),
                SceneOp::PopPass => self.builder.pop_pass()?,
                SceneOp::Handler(tag) => {
                    let area = self.builder.declare(&mut self.tree, *tag);
                    self.pointer.declare(*tag, area);
                    let bounds = self.builder.current_area_bounds(&self.tree);
                    self.key.declare(*tag, self.builder.transform(), area, bounds);
                }
                SceneOp::Cursor(c) => self.builder.set_cursor(&mut self.tree, *c),
                SceneOp::WindowAction(a) => self.builder.set_actions(&mut self.tree, *a),
                SceneOp::InputHint { tag, hint } => self.key.set_hint(*tag, *hint),
                SceneOp::SemanticLabel(s) => {
                    let slot = self.builder.semantic_mut(&mut self.tree);
                    slot.valid = true;
                    slot.content.label = s.clone();
                }
                SceneOp::SemanticDescription(s) => {
                    let slot = self.builder.semantic_mut(&mut self.tree);
                    slot.valid = true;
                    slot.content.description = s.clone();
                }
                SceneOp::SemanticClass(c) => {
                    let slot = self.builder.semantic_mut(&mut self.tree);
                    slot.valid = true;
                    slot.content.class = *c;
                }
                SceneOp::SemanticSelected(v) => {
                    let slot = self.builder.semantic_mut(&mut self.tree);
                    slot.valid = true;
                    slot.content.selected = *v;
                }
                SceneOp::SemanticEnabled(v) => {
                    let slot = self.builder.semantic_mut(&mut self.tree);
                    slot.valid = true;
                    slot.content.disabled = !*v;
                }
                SceneOp::Invalidate { at } => {
                    self.invalidate(at.map_or(Deadline::Asap, Deadline::At));
                }
            }
        }
        Ok(())
    }

    fn invalidate(&mut self, deadline: Deadline) {
        self.wakeup = Some(match self.wakeup {
            Some(w) if w <= deadline => w,
            _ => deadline,
        });
    }

    /// Merge the chain in `[1..=idx]` into the base snapshot. Events that
    /// were not observed stay pending in the base.
    fn collapse(&mut self, idx: usize) {
        if idx == 0 || self.changes.is_empty() {
            return;
        }
        let mut merged: Vec<StateChange<T>> = self.changes.drain(1..=idx).collect();
        let last_state = merged.last().map(|c| c.state.clone());
        let first = &mut self.changes[0];
        for c in &mut merged {
            first.events.append(&mut c.events);
        }
        if let Some(state) = last_state {
            first.state = state;
        }
    }

    /// The base snapshot, as consumers see it.
    fn state(&self) -> InputState<T> {
        self.changes
            .first()
            .map(|c| c.state.clone())
            .unwrap_or_default()
    }

    /// The newest snapshot, which events and commands apply against.
    fn last_state(&self) -> InputState<T> {
        self.changes
            .last()
            .map(|c| c.state.clone())
            .unwrap_or_default()
    }

    fn change_pointer_state(&mut self, p: PointerState<T>, evts: TaggedEvents<T>) -> bool {
        let mut state = self.last_state();
        state.pointer = p;
        self.change_state(state, evts)
    }

    fn change_key_state(&mut self, k: KeyState<T>, evts: TaggedEvents<T>) -> bool {
        let mut state = self.last_state();
        state.key = k;
        self.change_state(state, evts)
    }

    fn change_clipboard_state(&mut self, c: ClipboardState<T>, evts: TaggedEvents<T>) -> bool {
        let mut state = self.last_state();
        state.clipboard = c;
        self.change_state(state, evts)
    }

    fn add_events(&mut self, evts: TaggedEvents<T>) -> bool {
        let state = self.last_state();
        self.change_state(state, evts)
    }

    /// Append a state change, keeping each change atomic from the
    /// handlers' perspective: new deliveries on top of undelivered ones
    /// start a fresh snapshot instead of merging.
    fn change_state(&mut self, state: InputState<T>, mut evts: TaggedEvents<T>) -> bool {
        let had = !evts.is_empty();
        match self.changes.last_mut() {
            Some(prev) if !had || prev.events.is_empty() => {
                prev.state = state;
                prev.events.append(&mut evts);
            }
            _ => self.changes.push(StateChange { state, events: evts }),
        }
        had
    }
}
