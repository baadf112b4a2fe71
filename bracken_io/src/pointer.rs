// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer events, kind masks and filters.

use kurbo::{Point, Vec2};

use crate::event::Timestamp;
use crate::key::Modifiers;

/// Identifier of a physical pointer (mouse, touch contact, pen).
///
/// Ids are assigned by the platform and are only compared for equality; a
/// pointer keeps its id from press to release or cancel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PointerId(pub u16);

bitflags::bitflags! {
    /// Pointer event kinds.
    ///
    /// An event carries exactly one kind bit; a [`PointerFilter`] carries
    /// the union of kinds a handler wants delivered.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerKind: u16 {
        /// The gesture was cancelled by another handler or the system.
        const CANCEL  = 1 << 0;
        /// A press of the pointer.
        const PRESS   = 1 << 1;
        /// A release of the pointer.
        const RELEASE = 1 << 2;
        /// An unpressed move.
        const MOVE    = 1 << 3;
        /// A move while pressed; synthesized from [`PointerKind::MOVE`]
        /// by the dispatcher.
        const DRAG    = 1 << 4;
        /// The pointer entered a handler's area.
        const ENTER   = 1 << 5;
        /// The pointer left a handler's area.
        const LEAVE   = 1 << 6;
        /// A scroll motion, such as a mouse wheel tick.
        const SCROLL  = 1 << 7;
    }
}

/// Input device that produced a pointer event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Source {
    /// A mouse-like device that hovers.
    #[default]
    Mouse,
    /// A touch contact; considered gone when not pressed.
    Touch,
}

/// Delivery priority of a pointer event, reflecting the receiving
/// handler's position among contending handlers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Part of a matching set larger than one.
    #[default]
    Shared,
    /// The topmost handler of a matching set larger than one.
    Foremost,
    /// The only handler of its matching set.
    Grabbed,
}

bitflags::bitflags! {
    /// A set of pressed mouse buttons.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        /// The primary button.
        const LEFT   = 1 << 0;
        /// The secondary button.
        const RIGHT  = 1 << 1;
        /// The middle (wheel) button.
        const MIDDLE = 1 << 2;
    }
}

/// A pointer event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerEvent {
    /// The kind of this event. Exactly one bit is set.
    pub kind: PointerKind,
    /// The device that produced the event.
    pub source: Source,
    /// The pointer this event belongs to.
    pub pointer: PointerId,
    /// Priority of the receiving handler, filled in by the dispatcher.
    pub priority: Priority,
    /// When the event happened, relative to an undefined base.
    pub time: Timestamp,
    /// The set of pressed mouse buttons.
    pub buttons: Buttons,
    /// Event position. Raw events are in surface coordinates; delivered
    /// events are in the receiving handler's local coordinates.
    pub position: Point,
    /// Scroll delta, if any.
    pub scroll: Vec2,
    /// Active key modifiers.
    pub modifiers: Modifiers,
}

/// Per-axis scroll acceptance bounds.
///
/// `min` holds the most negative deltas a handler accepts on each axis and
/// `max` the most positive. Declarations made for the same handler within
/// one frame merge by union.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollBounds {
    /// Most negative accepted delta per axis.
    pub min: Vec2,
    /// Most positive accepted delta per axis.
    pub max: Vec2,
}

impl ScrollBounds {
    /// Bounds accepting only the given horizontal interval.
    pub fn horizontal(min: f64, max: f64) -> Self {
        Self {
            min: Vec2::new(min, 0.0),
            max: Vec2::new(max, 0.0),
        }
    }

    /// Bounds accepting only the given vertical interval.
    pub fn vertical(min: f64, max: f64) -> Self {
        Self {
            min: Vec2::new(0.0, min),
            max: Vec2::new(0.0, max),
        }
    }

    /// The smallest bounds containing both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// Declares the pointer events a handler wants delivered.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerFilter {
    /// Union of accepted event kinds.
    pub kinds: PointerKind,
    /// Scroll acceptance bounds, consulted when distributing scroll
    /// deltas across contending handlers.
    pub scroll: ScrollBounds,
}

/// The name of a cursor to display.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// The default cursor.
    #[default]
    Default,
    /// No cursor.
    None,
    /// A text input caret.
    Text,
    /// A pointing hand over a link or button.
    Pointer,
    /// A crosshair, often used for selection.
    Crosshair,
    /// Indicates that the hovered element is grabbable.
    Grab,
    /// Indicates an active grab.
    Grabbing,
    /// A help cursor.
    Help,
    /// Indicates that the requested action will not be carried out.
    NotAllowed,
    /// Indicates pending activity.
    Progress,
    /// Indicates waiting.
    Wait,
    /// Resize along the north edge.
    NorthResize,
    /// Resize along the south edge.
    SouthResize,
    /// Resize along the east edge.
    EastResize,
    /// Resize along the west edge.
    WestResize,
    /// Resize towards the north-east corner.
    NorthEastResize,
    /// Resize towards the north-west corner.
    NorthWestResize,
    /// Resize towards the south-east corner.
    SouthEastResize,
    /// Resize towards the south-west corner.
    SouthWestResize,
    /// Horizontal column resize.
    ColumnResize,
    /// Vertical row resize.
    RowResize,
}
