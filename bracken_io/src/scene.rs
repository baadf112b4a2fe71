// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The structural operation stream.
//!
//! Once per frame, the layout/paint producer describes the visual tree to
//! the router as an ordered sequence of [`SceneOp`]s: transform and clip
//! stack manipulation, handler declarations, and annotations attached to
//! the innermost open clip area. The stream is the already-decoded form;
//! byte-level encodings belong to the producer.
//!
//! Transform state can additionally be saved to and loaded from numbered
//! slots, which permits non-nested restores across macro boundaries.
//! Loading a slot also rewinds the clip stack to the root.

use alloc::string::String;

use kurbo::{Affine, Rect};

use crate::event::Timestamp;
use crate::key::InputHint;
use crate::pointer::Cursor;
use crate::semantic::Class;
use crate::window::Actions;

/// Shape of a clip area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClipShape {
    /// An axis-aligned rectangle in local coordinates.
    #[default]
    Rect,
    /// The ellipse inscribed in the rectangle.
    Ellipse,
}

/// One structural operation, generic over the handler tag `T`.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneOp<T> {
    /// Save the current transform to a numbered slot.
    SaveTransform(u32),
    /// Restore the transform from a numbered slot and rewind the clip
    /// stack to the root.
    LoadTransform(u32),
    /// Multiply the current transform by `affine`. With `push` set, the
    /// previous transform is also pushed for a later
    /// [`SceneOp::PopTransform`].
    Transform {
        /// The transform to append.
        affine: Affine,
        /// Whether to push the previous transform.
        push: bool,
    },
    /// Restore the most recently pushed transform.
    PopTransform,
    /// Open a clip area as a child of the innermost open area.
    PushClip {
        /// Shape of the clip.
        shape: ClipShape,
        /// Bounds in local coordinates.
        rect: Rect,
    },
    /// Close the innermost open clip area.
    PopClip,
    /// Enter pass-through mode: handlers declared while the pass depth is
    /// positive let hits continue to handlers beneath them.
    PushPass,
    /// Leave the innermost pass-through mode.
    PopPass,
    /// Declare a handler in the innermost open area.
    Handler(T),
    /// Set the cursor shown while the pointer hovers the innermost area.
    Cursor(Cursor),
    /// Attach window-manager actions to the innermost area.
    WindowAction(Actions),
    /// Set the input hint of a declared handler.
    InputHint {
        /// The handler the hint belongs to.
        tag: T,
        /// The hint.
        hint: InputHint,
    },
    /// Set the accessibility label of the innermost area.
    SemanticLabel(String),
    /// Set the accessibility description of the innermost area.
    SemanticDescription(String),
    /// Set the semantic class of the innermost area.
    SemanticClass(Class),
    /// Mark the innermost area as selected or unselected.
    SemanticSelected(bool),
    /// Mark the innermost area as enabled or disabled.
    SemanticEnabled(bool),
    /// Request a redraw no later than `at`, or as soon as possible when
    /// `at` is `None`.
    Invalidate {
        /// The deadline.
        at: Option<Timestamp>,
    },
}
