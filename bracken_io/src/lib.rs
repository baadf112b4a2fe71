// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken IO: the event, command and filter vocabulary of the Bracken
//! input router.
//!
//! ## Overview
//!
//! This crate defines the plain data types exchanged between a platform
//! shell, a layout/paint producer and the routing core in `bracken_router`:
//!
//! - [`pointer`]: pointer events, kind masks, scroll acceptance bounds and
//!   cursors.
//! - [`key`]: key events, modifier sets, key filters, focus directions and
//!   the editor protocol types (ranges, snippets, carets, input hints).
//! - [`transfer`]: the drag-and-drop data transfer protocol.
//! - [`clipboard`]: the clipboard payload type.
//! - [`semantic`]: accessibility classes and gesture sets.
//! - [`window`]: window-manager actions attachable to scene areas.
//! - [`scene`]: the decoded structural operation stream describing one
//!   frame of the visual tree.
//! - [`event`]: the [`Event`](event::Event) and [`Filter`](event::Filter)
//!   umbrellas plus timestamps and wakeup deadlines.
//!
//! Handler identities ("tags") are caller-supplied opaque tokens; every
//! type here that mentions a tag is generic over it. The routing core only
//! requires `Copy + Eq + Hash`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod clipboard;
pub mod event;
pub mod key;
pub mod pointer;
pub mod scene;
pub mod semantic;
pub mod transfer;
pub mod window;

pub use event::{Deadline, Event, Filter, Timestamp};
