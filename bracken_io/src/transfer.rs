// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag-and-drop data transfer protocol.
//!
//! ## Protocol
//!
//! - Data sources declare [`Filter::TransferSource`](crate::event::Filter)
//!   interests and receive [`TransferEvent::Initiate`] when a drag starts
//!   and [`TransferEvent::Request`] when a drop finds a matching target.
//!   Sources respond to a request with an offer command carrying a
//!   [`TransferData`] payload.
//! - Data targets declare [`Filter::TransferTarget`](crate::event::Filter)
//!   interests and receive [`TransferEvent::Data`] on a completed drop.
//!   The payload is claimed from the router through the event's
//!   [`DataHandle`], at most once; a payload left unclaimed is released at
//!   the next frame boundary.
//! - When a drag gesture ends without a matching target, the source and
//!   all potential targets receive [`TransferEvent::Cancel`].

use alloc::string::String;
use alloc::vec::Vec;

/// An owned transfer payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferData {
    /// MIME type of the payload.
    pub mime: String,
    /// The payload bytes.
    pub bytes: Vec<u8>,
}

/// Handle to a pending transfer payload held by the router.
///
/// Valid only during the frame its [`TransferEvent::Data`] was delivered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataHandle(pub(crate) usize);

impl DataHandle {
    /// Wrap a router-side ledger index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// The router-side ledger index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A drag-and-drop protocol event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferEvent {
    /// A transfer gesture was initiated. Sent to the source and to every
    /// potential target.
    Initiate,
    /// A drop completed over a matching target; the source must respond
    /// with an offer command carrying data of the given MIME type.
    Request {
        /// First MIME type matched between source and target.
        mime: String,
    },
    /// The transfer was aborted; undoes the effect of
    /// [`TransferEvent::Initiate`].
    Cancel,
    /// Data arriving at the drop target.
    Data {
        /// MIME type of the payload.
        mime: String,
        /// Handle used to claim the payload from the router.
        handle: DataHandle,
    },
}
