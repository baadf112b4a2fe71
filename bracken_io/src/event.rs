// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event and filter umbrellas, timestamps and wakeup deadlines.

use alloc::string::String;

use crate::clipboard::ClipboardData;
use crate::key::{EditEvent, FocusEvent, KeyEvent, KeyFilter, SelectionEvent, SnippetEvent};
use crate::pointer::{PointerEvent, PointerFilter};
use crate::transfer::TransferEvent;

/// A point in time, in milliseconds from an undefined base.
///
/// The router only ever compares timestamps; the base is chosen by the
/// platform.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub u64);

/// When the embedder should run the next frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Deadline {
    /// As soon as possible; events are already waiting for a consumer.
    Asap,
    /// No later than the given time.
    At(Timestamp),
}

/// Any event the router can deliver to a handler, or accept from the
/// platform.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A pointer event.
    Pointer(PointerEvent),
    /// A key press or release.
    Key(KeyEvent),
    /// A focus gain or loss.
    Focus(FocusEvent),
    /// A text edit requested by an input method.
    Edit(EditEvent),
    /// A selection change made by an input method.
    Selection(SelectionEvent),
    /// A snippet-range change made by an input method.
    Snippet(SnippetEvent),
    /// A drag-and-drop protocol event.
    Transfer(TransferEvent),
    /// Clipboard content arriving for a read requester.
    Clipboard(ClipboardData),
}

/// Declares the events a handler wants delivered.
///
/// Filters passed to an events query are merged into the handler's
/// declared interest for the current frame and then select which pending
/// events the query returns.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Pointer events of the given kinds, with scroll bounds.
    Pointer(PointerFilter),
    /// Key events matching the given key filter.
    Key(KeyFilter),
    /// Focus transitions and editor protocol events. Also marks the
    /// handler as focusable.
    Focus,
    /// Transfer-source events for the given MIME type.
    TransferSource {
        /// The offered MIME type.
        mime: String,
    },
    /// Transfer-target events for the given MIME type.
    TransferTarget {
        /// The accepted MIME type.
        mime: String,
    },
    /// Clipboard content requested through a read command.
    ClipboardRead,
}

impl Filter {
    /// Whether `event` matches this filter.
    pub fn matches(&self, event: &Event) -> bool {
        match (self, event) {
            (Self::Pointer(f), Event::Pointer(e)) => f.kinds.contains(e.kind),
            (Self::Key(f), Event::Key(e)) => f.matches(e),
            (
                Self::Focus,
                Event::Focus(_) | Event::Edit(_) | Event::Selection(_) | Event::Snippet(_),
            ) => true,
            (
                Self::TransferSource { .. } | Self::TransferTarget { .. },
                Event::Transfer(TransferEvent::Initiate | TransferEvent::Cancel),
            ) => true,
            (Self::TransferSource { mime }, Event::Transfer(TransferEvent::Request { mime: m })) => {
                mime == m
            }
            (Self::TransferTarget { mime }, Event::Transfer(TransferEvent::Data { mime: m, .. })) => {
                mime == m
            }
            (Self::ClipboardRead, Event::Clipboard(_)) => true,
            _ => false,
        }
    }
}
