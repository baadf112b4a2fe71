// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The clipboard mediator.
//!
//! Writes are buffered one deep: a later write silently supersedes an
//! earlier unread one, and the platform collects the pending payload with
//! [`ClipboardQueue::take_write`]. Reads register the requesting tag in a
//! receiver set; the `requested` latch signals the platform exactly once
//! per batch of receivers, and the eventual platform-supplied content is
//! fanned out to every still-registered receiver exactly once.

use bracken_io::clipboard::ClipboardData;
use bracken_io::event::Event;
use smallvec::SmallVec;

use crate::pointer::TaggedEvents;

/// The snapshot part of clipboard state: the tags waiting for content.
#[derive(Clone, Debug)]
pub(crate) struct ClipboardState<T> {
    receivers: SmallVec<[T; 2]>,
}

impl<T> Default for ClipboardState<T> {
    fn default() -> Self {
        Self {
            receivers: SmallVec::new(),
        }
    }
}

/// The mediator for the single platform clipboard.
#[derive(Clone, Debug, Default)]
pub(crate) struct ClipboardQueue {
    /// Set when a new receiver registered, cleared when the platform is
    /// told; avoids re-signalling every frame while a read is in flight.
    requested: bool,
    write: Option<ClipboardData>,
}

impl ClipboardQueue {
    /// The most recent payload to copy to the clipboard, if any.
    pub(crate) fn take_write(&mut self) -> Option<ClipboardData> {
        self.write.take()
    }

    /// Buffer a write, superseding any unread one.
    pub(crate) fn write(&mut self, data: ClipboardData) {
        self.write = Some(data);
    }

    /// Whether a new batch of receivers is waiting for clipboard content.
    /// Reading resets the latch.
    pub(crate) fn requested<T>(&mut self, state: &ClipboardState<T>) -> bool {
        let req = !state.receivers.is_empty() && self.requested;
        self.requested = false;
        req
    }

    /// Register `tag` as a receiver of the next clipboard content.
    pub(crate) fn request_read<T: Copy + Eq>(
        &mut self,
        mut state: ClipboardState<T>,
        tag: T,
    ) -> ClipboardState<T> {
        if state.receivers.contains(&tag) {
            return state;
        }
        state.receivers.push(tag);
        self.requested = true;
        state
    }

    /// Fan platform-supplied content out to every registered receiver and
    /// clear the set.
    pub(crate) fn push<T: Copy>(
        &mut self,
        mut state: ClipboardState<T>,
        data: &ClipboardData,
    ) -> (ClipboardState<T>, TaggedEvents<T>) {
        let evts = state
            .receivers
            .iter()
            .map(|r| (*r, Event::Clipboard(data.clone())))
            .collect();
        state.receivers.clear();
        (state, evts)
    }
}
