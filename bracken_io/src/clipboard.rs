// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipboard payloads.

use alloc::string::String;
use alloc::vec::Vec;

/// A clipboard payload: a pending write handed to the platform, or
/// platform-supplied content fanned out to read requesters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipboardData {
    /// MIME type of the content.
    pub mime: String,
    /// The content bytes.
    pub bytes: Vec<u8>,
}
