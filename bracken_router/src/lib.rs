// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Router: the input-routing core of an immediate-mode UI
//! toolkit.
//!
//! ## Overview
//!
//! Once per frame, a layout/paint producer describes the visual tree as
//! an ordered stream of structural operations
//! ([`SceneOp`](bracken_io::scene::SceneOp)): clip and transform stack
//! manipulation, handler declarations, and cursor, window-action and
//! accessibility annotations. [`Router::frame`] rebuilds the hit-test
//! tree from that stream. Between frames, raw platform events injected
//! with [`Router::queue`] are routed to the declared handler tags, and
//! commands executed with [`Router::execute`] change focus, grab
//! pointers, or mediate clipboard and drag-and-drop data.
//!
//! Handlers are opaque caller-supplied tags (`Copy + Eq + Hash`). A
//! handler declares the events it wants by passing
//! [`Filter`](bracken_io::event::Filter)s to [`Router::events`], which
//! also returns the pending deliveries for that tag. Declarations are
//! per frame: undeclared handlers are pruned at the next boundary.
//!
//! ## Dispatch
//!
//! - A press freezes the hit set at the press position for the duration
//!   of the press; moves while pressed are redelivered as drags.
//! - Enter and leave events are derived by diffing each hit test against
//!   the pointer's previous entered set.
//! - Scroll deltas are split across contending handlers by their
//!   declared acceptance bounds; no handler receives an amount outside
//!   its own bounds and the total never exceeds the original delta.
//! - At most one handler holds focus; tab order follows declaration
//!   order and directional moves walk a row layout derived from handler
//!   bounds. Key events fall back from the focused handler to the
//!   nearest declared acceptor on the hit chain.
//! - Semantically annotated areas keep stable identifiers across frames,
//!   keyed by annotation content.
//!
//! ## Example
//!
//! ```
//! use bracken_io::event::{Event, Filter};
//! use bracken_io::pointer::{PointerEvent, PointerFilter, PointerKind};
//! use bracken_io::scene::{ClipShape, SceneOp};
//! use bracken_router::Router;
//! use kurbo::{Point, Rect};
//!
//! let mut router = Router::<u32>::new();
//! let filter = Filter::Pointer(PointerFilter {
//!     kinds: PointerKind::ENTER | PointerKind::MOVE,
//!     ..PointerFilter::default()
//! });
//! // Declare interest; the first query delivers the one-time reset.
//! router.events(1, core::slice::from_ref(&filter));
//!
//! let ops = vec![
//!     SceneOp::PushClip {
//!         shape: ClipShape::Rect,
//!         rect: Rect::new(0.0, 0.0, 100.0, 100.0),
//!     },
//!     SceneOp::Handler(1),
//!     SceneOp::PopClip,
//! ];
//! router.frame(&ops)?;
//!
//! router.queue(Event::Pointer(PointerEvent {
//!     kind: PointerKind::MOVE,
//!     position: Point::new(50.0, 50.0),
//!     ..PointerEvent::default()
//! }));
//! let events = router.events(1, core::slice::from_ref(&filter));
//! // The pointer entered the handler's area, then moved inside it.
//! assert_eq!(events.len(), 2);
//! # Ok::<(), bracken_router::SceneError>(())
//! ```
//!
//! The router is single threaded and frame driven; callers serialize
//! event injection, command execution and frame rebuilds onto one
//! processing sequence.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod clipboard;
mod key;
mod pointer;
mod router;
mod scene;
mod semantics;

pub use key::{EditorState, Selection};
pub use router::{Command, Router};
pub use scene::SceneError;
pub use semantics::{SemanticDesc, SemanticId, SemanticNode};
