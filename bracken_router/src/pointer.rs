// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pointer dispatch engine.
//!
//! ## Overview
//!
//! One state machine per tracked pointer id. A pointer is created by the
//! first event that mentions its id and discarded once it is neither
//! pressed nor inside any handler. Between those points it moves through
//! hovering and pressed states:
//!
//! - A press freezes the hit set at the press position into the pointer's
//!   handler list for the duration of the press; while pressed, moves are
//!   redelivered as drags.
//! - Enter and leave events are derived by diffing the current hit set
//!   against the pointer's previous entered set, independently of the
//!   other deliveries.
//! - Scroll deltas are distributed over the handlers in hit order; each
//!   handler's declared acceptance bounds clamp and consume part of the
//!   delta, and only the remainder is offered further down.
//! - If the pressed set has exactly one handler it receives events at
//!   grabbed priority; otherwise the topmost accepting handler receives
//!   foremost priority and the rest shared.
//!
//! The engine also runs the drag-and-drop sub-protocol: selecting a data
//! source from the entered set, notifying potential targets, matching a
//! target on release and brokering the offered payload.
//!
//! State that must survive the router's snapshot protocol lives in
//! [`PointerState`]; per-frame declarations live in the queue itself.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use bracken_io::event::Event;
use bracken_io::pointer::{
    Cursor, PointerEvent, PointerFilter, PointerId, PointerKind, Priority, ScrollBounds, Source,
};
use bracken_io::semantic::Gestures;
use bracken_io::transfer::{DataHandle, TransferData, TransferEvent};

use crate::scene::{NONE, SceneTree};

/// Events paired with the tag they are addressed to.
pub(crate) type TaggedEvents<T> = Vec<(T, Event)>;

/// A handler's declared pointer interest for the current frame.
#[derive(Clone, Debug)]
pub(crate) struct PointerHandler {
    /// Area the handler was declared in; [`NONE`] until declared.
    pub(crate) area: i32,
    /// Whether the handler has received the cancel event that resets its
    /// state on first observation.
    setup: bool,
    /// Whether the handler was declared or filtered this frame.
    live: bool,
    kinds: PointerKind,
    scroll: ScrollBounds,
    source_mimes: Vec<String>,
    target_mimes: Vec<String>,
}

impl Default for PointerHandler {
    fn default() -> Self {
        Self {
            area: NONE,
            setup: false,
            live: false,
            kinds: PointerKind::empty(),
            scroll: ScrollBounds::default(),
            source_mimes: Vec::new(),
            target_mimes: Vec::new(),
        }
    }
}

/// A tracked physical pointer.
#[derive(Clone, Debug)]
pub(crate) struct PointerInfo<T> {
    id: PointerId,
    pressed: bool,
    /// Handlers receiving delivery; frozen at press, tracking the hit set
    /// while hovering.
    handlers: SmallVec<[T; 4]>,
    /// Handlers the pointer is currently inside.
    entered: SmallVec<[T; 4]>,
    /// Last processed event, replayed at the frame boundary to refresh
    /// the entered set against the rebuilt tree.
    last: PointerEvent,
    /// Bound drag-and-drop source, if a drag is in progress.
    data_source: Option<T>,
    /// Matched drop target, set on release.
    data_target: Option<T>,
}

impl<T> Default for PointerInfo<T> {
    fn default() -> Self {
        Self {
            id: PointerId::default(),
            pressed: false,
            handlers: SmallVec::new(),
            entered: SmallVec::new(),
            last: PointerEvent::default(),
            data_source: None,
            data_target: None,
        }
    }
}

/// The snapshot part of pointer routing state.
#[derive(Clone, Debug)]
pub(crate) struct PointerState<T> {
    pointers: Vec<PointerInfo<T>>,
    /// Cursor selected by the most recent hit test.
    pub(crate) cursor: Cursor,
}

impl<T> Default for PointerState<T> {
    fn default() -> Self {
        Self {
            pointers: Vec::new(),
            cursor: Cursor::Default,
        }
    }
}

/// The pointer dispatch engine. Holds the per-frame handler table; the
/// cross-event state travels through [`PointerState`] snapshots.
#[derive(Clone, Debug)]
pub(crate) struct PointerQueue<T> {
    handlers: HashMap<T, PointerHandler>,
}

impl<T> Default for PointerQueue<T> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

/// Split `v` against the acceptance interval `[min, max]`: the part inside
/// the interval is consumed, the part beyond it is left for the next
/// handler.
fn clamp_split(v: f64, min: f64, max: f64) -> (f64, f64) {
    if v > max {
        (v - max, max)
    } else if v < min {
        (v - min, min)
    } else {
        (0.0, v)
    }
}

fn cancel_event() -> Event {
    Event::Pointer(PointerEvent {
        kind: PointerKind::CANCEL,
        ..PointerEvent::default()
    })
}

fn add_unique<T: Copy + Eq>(tags: &mut SmallVec<[T; 4]>, tag: T) {
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}

/// First MIME type in common between a source and a target.
fn first_mime_match(src: &PointerHandler, tgt: &PointerHandler) -> Option<String> {
    tgt.target_mimes
        .iter()
        .find(|t| src.source_mimes.contains(t))
        .cloned()
}

impl<T: Copy + Eq + core::hash::Hash> PointerQueue<T> {
    /// The handler entry for `tag`, reset on its first touch of a frame.
    fn handler_for(&mut self, tag: T) -> &mut PointerHandler {
        let h = self.handlers.entry(tag).or_default();
        if !h.live {
            h.kinds = PointerKind::empty();
            h.scroll = ScrollBounds::default();
            h.source_mimes.clear();
            h.target_mimes.clear();
        }
        h.live = true;
        h
    }

    /// Record a handler declaration in `area`.
    pub(crate) fn declare(&mut self, tag: T, area: i32) {
        self.handler_for(tag).area = area;
    }

    /// Merge a pointer filter declaration.
    pub(crate) fn merge_filter(&mut self, tag: T, f: &PointerFilter) {
        let h = self.handler_for(tag);
        h.kinds |= f.kinds;
        h.scroll = h.scroll.union(f.scroll);
    }

    /// Declare a drag source MIME interest.
    pub(crate) fn source_filter(&mut self, tag: T, mime: &str) {
        let h = self.handler_for(tag);
        if !h.source_mimes.iter().any(|m| m == mime) {
            h.source_mimes.push(mime.into());
        }
    }

    /// Declare a drop target MIME interest.
    pub(crate) fn target_filter(&mut self, tag: T, mime: &str) {
        let h = self.handler_for(tag);
        if !h.target_mimes.iter().any(|m| m == mime) {
            h.target_mimes.push(mime.into());
        }
    }

    /// The one-time synthetic cancel that gives a newly observed handler a
    /// known baseline.
    pub(crate) fn reset_event(&mut self, tag: T) -> Option<Event> {
        let h = self.handlers.get_mut(&tag)?;
        if h.setup {
            return None;
        }
        h.setup = true;
        Some(cancel_event())
    }

    /// Remove `tag` from every pointer's delivery and entered sets.
    fn drop_handler(state: &mut PointerState<T>, tag: T) {
        for p in &mut state.pointers {
            p.handlers.retain(|t| *t != tag);
            p.entered.retain(|t| *t != tag);
        }
    }

    /// Force exclusive delivery of `pointer` to `tag`, cancelling every
    /// other handler currently holding it. Unknown pointers and unpressed
    /// pointers are ignored.
    pub(crate) fn grab(
        &self,
        state: &mut PointerState<T>,
        pointer: PointerId,
        tag: T,
        evts: &mut TaggedEvents<T>,
    ) {
        let Some(idx) = state
            .pointers
            .iter()
            .position(|p| p.pressed && p.id == pointer)
        else {
            return;
        };
        let losers: Vec<T> = state.pointers[idx]
            .handlers
            .iter()
            .rev()
            .copied()
            .filter(|t| *t != tag)
            .collect();
        for t in losers {
            evts.push((t, cancel_event()));
            Self::drop_handler(state, t);
        }
    }

    /// Route one raw pointer event.
    pub(crate) fn push(
        &mut self,
        scene: &SceneTree<T>,
        mut state: PointerState<T>,
        mut e: PointerEvent,
    ) -> (PointerState<T>, TaggedEvents<T>) {
        let mut evts = Vec::new();
        if e.kind == PointerKind::CANCEL {
            // A system cancel aborts every gesture in flight.
            for tag in self.handlers.keys() {
                evts.push((*tag, cancel_event()));
            }
            state.pointers.clear();
            return (state, evts);
        }
        if !(PointerKind::PRESS | PointerKind::RELEASE | PointerKind::MOVE | PointerKind::SCROLL)
            .contains(e.kind)
        {
            // Enter, leave and drag are derived here, never accepted raw.
            return (state, evts);
        }

        let pidx = Self::pointer_of(&mut state, e.pointer);
        let mut p = state.pointers[pidx].clone();
        let mut cursor = state.cursor;

        if e.kind == PointerKind::PRESS {
            self.enter_leave(scene, &mut p, &mut cursor, &mut evts, e.clone());
            p.pressed = true;
            self.deliver(scene, &p, &mut evts, e.clone());
        } else if e.kind == PointerKind::MOVE {
            if p.pressed {
                e.kind = PointerKind::DRAG;
            }
            self.enter_leave(scene, &mut p, &mut cursor, &mut evts, e.clone());
            self.deliver(scene, &p, &mut evts, e.clone());
            if p.pressed {
                self.drag_event(&mut p, &mut evts);
            }
        } else if e.kind == PointerKind::RELEASE {
            self.deliver(scene, &p, &mut evts, e.clone());
            p.pressed = false;
            self.enter_leave(scene, &mut p, &mut cursor, &mut evts, e.clone());
            self.drop_event(&mut p, &mut evts);
        } else {
            // Scroll.
            self.enter_leave(scene, &mut p, &mut cursor, &mut evts, e.clone());
            self.deliver(scene, &p, &mut evts, e.clone());
        }

        p.last = e;
        state.cursor = cursor;
        if !p.pressed && p.entered.is_empty() {
            // No longer any reason to track this pointer.
            state.pointers.remove(pidx);
        } else {
            state.pointers[pidx] = p;
        }
        (state, evts)
    }

    fn pointer_of(state: &mut PointerState<T>, id: PointerId) -> usize {
        if let Some(i) = state.pointers.iter().position(|p| p.id == id) {
            return i;
        }
        state.pointers.push(PointerInfo {
            id,
            ..PointerInfo::default()
        });
        state.pointers.len() - 1
    }

    /// Deliver `e` to the pointer's handler list, applying priorities and
    /// scroll distribution.
    fn deliver(
        &self,
        scene: &SceneTree<T>,
        p: &PointerInfo<T>,
        evts: &mut TaggedEvents<T>,
        mut e: PointerEvent,
    ) {
        let mut foremost = true;
        if p.pressed && p.handlers.len() == 1 {
            e.priority = Priority::Grabbed;
            foremost = false;
        }
        let (mut sx, mut sy) = (e.scroll.x, e.scroll.y);
        for k in &p.handlers {
            let Some(h) = self.handlers.get(k) else {
                continue;
            };
            let mut e = e.clone();
            if e.kind == PointerKind::SCROLL {
                if sx == 0.0 && sy == 0.0 {
                    return;
                }
                // Each handler consumes the part of the delta inside its
                // declared bounds; the remainder moves on.
                (sx, e.scroll.x) = clamp_split(sx, h.scroll.min.x, h.scroll.max.x);
                (sy, e.scroll.y) = clamp_split(sy, h.scroll.min.y, h.scroll.max.y);
            }
            if !h.kinds.contains(e.kind) {
                continue;
            }
            if foremost {
                foremost = false;
                e.priority = Priority::Foremost;
            }
            e.position = scene.inv_transform(h.area, e.position);
            evts.push((*k, Event::Pointer(e)));
        }
    }

    /// Diff the hit set at `e.position` against the pointer's entered set
    /// and emit the resulting leave and enter events.
    fn enter_leave(
        &self,
        scene: &SceneTree<T>,
        p: &mut PointerInfo<T>,
        cursor: &mut Cursor,
        evts: &mut TaggedEvents<T>,
        e: PointerEvent,
    ) {
        let mut hits: SmallVec<[T; 4]> = SmallVec::new();
        if e.source != Source::Mouse && !p.pressed && e.kind != PointerKind::PRESS {
            // Non-hovering devices leave everything once released.
        } else {
            *cursor = scene.hit_walk(e.position, |n| {
                if let Some(tag) = n.tag
                    && self.handlers.contains_key(&tag)
                {
                    add_unique(&mut hits, tag);
                }
                true
            });
            if p.pressed {
                // While pressed the delivery set is frozen; drop hits that
                // are not part of it, unless a transfer is under way and a
                // potential target is among them.
                let mut hits_have_target = false;
                if let Some(src) = p.data_source.and_then(|t| self.handlers.get(&t)) {
                    hits_have_target = hits
                        .iter()
                        .any(|t| {
                            self.handlers
                                .get(t)
                                .is_some_and(|h| first_mime_match(src, h).is_some())
                        });
                }
                if !hits_have_target {
                    hits.retain(|t| p.handlers.contains(t));
                }
            } else {
                p.handlers = hits.clone();
            }
        }
        for k in &p.entered {
            if hits.contains(k) {
                continue;
            }
            let Some(h) = self.handlers.get(k) else {
                continue;
            };
            if h.kinds.contains(PointerKind::LEAVE) {
                let mut e = e.clone();
                e.kind = PointerKind::LEAVE;
                e.position = scene.inv_transform(h.area, e.position);
                evts.push((*k, Event::Pointer(e)));
            }
        }
        for k in &hits {
            if p.entered.contains(k) {
                continue;
            }
            let Some(h) = self.handlers.get(k) else {
                continue;
            };
            if h.kinds.contains(PointerKind::ENTER) {
                let mut e = e.clone();
                e.kind = PointerKind::ENTER;
                e.position = scene.inv_transform(h.area, e.position);
                evts.push((*k, Event::Pointer(e)));
            }
        }
        p.entered = hits;
    }

    /// Bind a drag source and announce the transfer to every potential
    /// participant.
    fn drag_event(&self, p: &mut PointerInfo<T>, evts: &mut TaggedEvents<T>) {
        if p.data_source.is_some() {
            return;
        }
        for k in &p.entered {
            let Some(src) = self.handlers.get(k) else {
                continue;
            };
            if src.source_mimes.is_empty() {
                continue;
            }
            // One data source per pointer.
            p.data_source = Some(*k);
            for (tag, tgt) in &self.handlers {
                if first_mime_match(src, tgt).is_some() {
                    evts.push((*tag, Event::Transfer(TransferEvent::Initiate)));
                }
            }
            break;
        }
    }

    /// Look for a drop target among the entered handlers; request data
    /// from the source on a match, abort the transfer otherwise.
    fn drop_event(&self, p: &mut PointerInfo<T>, evts: &mut TaggedEvents<T>) {
        let Some(source) = p.data_source else {
            return;
        };
        let Some(src) = self.handlers.get(&source) else {
            self.transfer_cancel(p, evts);
            return;
        };
        for k in &p.entered {
            if let Some(h) = self.handlers.get(k)
                && let Some(mime) = first_mime_match(src, h)
            {
                p.data_target = Some(*k);
                evts.push((source, Event::Transfer(TransferEvent::Request { mime })));
                return;
            }
        }
        self.transfer_cancel(p, evts);
    }

    /// Cancel the transfer towards the source and every potential target.
    fn transfer_cancel(&self, p: &mut PointerInfo<T>, evts: &mut TaggedEvents<T>) {
        let Some(source) = p.data_source else {
            return;
        };
        evts.push((source, Event::Transfer(TransferEvent::Cancel)));
        if let Some(src) = self.handlers.get(&source) {
            for (tag, h) in &self.handlers {
                if first_mime_match(src, h).is_some() {
                    evts.push((*tag, Event::Transfer(TransferEvent::Cancel)));
                }
            }
        }
        p.data_source = None;
        p.data_target = None;
    }

    /// Respond to a transfer request: hand the payload to the recorded
    /// target and finish the transfer. A tag that is not the recorded
    /// source of any pointer is ignored and the payload dropped.
    pub(crate) fn offer_data(
        &self,
        state: &mut PointerState<T>,
        tag: T,
        data: TransferData,
        transfers: &mut Vec<Option<TransferData>>,
        evts: &mut TaggedEvents<T>,
    ) {
        for i in 0..state.pointers.len() {
            if state.pointers[i].data_source != Some(tag) {
                continue;
            }
            let mut p = state.pointers[i].clone();
            if let Some(target) = p.data_target {
                let handle = DataHandle::new(transfers.len());
                let mime = data.mime.clone();
                transfers.push(Some(data));
                evts.push((target, Event::Transfer(TransferEvent::Data { mime, handle })));
            }
            self.transfer_cancel(&mut p, evts);
            state.pointers[i] = p;
            return;
        }
    }

    /// The frame boundary pass: prune undeclared handlers, derive gesture
    /// semantics, and refresh every pointer's entered set against the
    /// rebuilt tree.
    pub(crate) fn frame(
        &mut self,
        scene: &mut SceneTree<T>,
        mut state: PointerState<T>,
    ) -> (PointerState<T>, TaggedEvents<T>) {
        let mut evts = Vec::new();
        let dead: Vec<T> = self
            .handlers
            .iter()
            .filter(|(_, h)| !h.live)
            .map(|(t, _)| *t)
            .collect();
        for t in dead {
            Self::drop_handler(&mut state, t);
            self.handlers.remove(&t);
        }
        for h in self.handlers.values_mut() {
            h.live = false;
            if h.area != NONE {
                let slot = &mut scene.areas[h.area as usize].semantic;
                if h.kinds.intersects(PointerKind::PRESS | PointerKind::RELEASE) {
                    slot.content.gestures |= Gestures::CLICK;
                }
                if h.kinds.contains(PointerKind::SCROLL) {
                    slot.content.gestures |= Gestures::SCROLL;
                }
                slot.valid |= !slot.content.gestures.is_empty();
            }
        }
        let mut cursor = state.cursor;
        for i in 0..state.pointers.len() {
            let mut p = state.pointers[i].clone();
            let last = p.last.clone();
            self.enter_leave(scene, &mut p, &mut cursor, &mut evts, last);
            state.pointers[i] = p;
        }
        state.cursor = cursor;
        (state, evts)
    }

    /// Mark every handler as undeclared for the new frame; declarations
    /// during the decode pass re-establish their areas.
    pub(crate) fn begin_frame(&mut self) {
        for h in self.handlers.values_mut() {
            h.area = NONE;
        }
    }

    /// Deliver `e` starting from the hit node chain of `area`, for
    /// synthetic deliveries targeted at a known handler's area.
    pub(crate) fn deliver_to_area(
        &self,
        scene: &SceneTree<T>,
        area: i32,
        e: PointerEvent,
    ) -> TaggedEvents<T> {
        let mut evts = Vec::new();
        let (mut sx, mut sy) = (e.scroll.x, e.scroll.y);
        let mut idx = scene.hits.len() as i32 - 1;
        while idx != NONE {
            if scene.hits[idx as usize].area == area {
                break;
            }
            idx -= 1;
        }
        while idx != NONE {
            let n = &scene.hits[idx as usize];
            idx = n.next;
            let Some(tag) = n.tag else {
                continue;
            };
            let Some(h) = self.handlers.get(&tag) else {
                continue;
            };
            if !h.kinds.contains(e.kind) {
                continue;
            }
            let mut e = e.clone();
            if e.kind == PointerKind::SCROLL {
                if sx == 0.0 && sy == 0.0 {
                    break;
                }
                (sx, e.scroll.x) = clamp_split(sx, h.scroll.min.x, h.scroll.max.x);
                (sy, e.scroll.y) = clamp_split(sy, h.scroll.min.y, h.scroll.max.y);
            }
            e.position = scene.inv_transform(h.area, e.position);
            let kind = e.kind;
            evts.push((tag, Event::Pointer(e)));
            if kind != PointerKind::SCROLL {
                break;
            }
        }
        evts
    }
}

/// Walk the hit list for key fallback routing: visit handler tags from
/// `from` (or the very top when `None`), following enclosing-area links
/// when anchored, top-down otherwise.
pub(crate) fn key_fallback_walk<T: Copy + Eq>(
    scene: &SceneTree<T>,
    from: Option<T>,
    mut accepts: impl FnMut(T) -> bool,
) -> Option<T> {
    let mut idx = scene.hits.len() as i32 - 1;
    let anchored = from.is_some();
    if let Some(f) = from {
        while idx >= 0 && scene.hits[idx as usize].tag != Some(f) {
            idx -= 1;
        }
        if idx < 0 {
            return None;
        }
    }
    while idx != NONE {
        let n = &scene.hits[idx as usize];
        idx = if anchored { n.next } else { idx - 1 };
        let Some(tag) = n.tag else {
            continue;
        };
        if accepts(tag) {
            return Some(tag);
        }
    }
    None
}
