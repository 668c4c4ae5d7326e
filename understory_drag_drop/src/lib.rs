// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_drag_drop --heading-base-level=0

//! Understory Drag Drop: drag-and-drop coordination for UIs.
//!
//! This crate tracks any number of simultaneously active drags and a set of registered drop
//! targets, decides which drop target is hovered by which drag, and reports a completion when a
//! drag is released over the target it hovers.
//!
//! - Register a drag when its gesture starts, forward movement deltas, and end it on release.
//! - Register drop targets when their elements mount and report bounds whenever layout changes.
//! - Read [`DragDropState::hover`] to highlight targets and [`DragDropState::drags`] to draw
//!   drag ghosts.
//! - Completions go to an [`OnDrop`] handler (any `FnMut(&K, &T, &D)` closure works).
//!
//! The state is generic over the drag key `K`, the drop key `D`, and the payload `T` carried by
//! each drag. Geometry uses [`kurbo`] types in a single coordinate space shared by drags and drop
//! targets.
//!
//! ## Hover rules
//!
//! A drag hovers a drop target when the drag's center lies inside the target's bounds
//! ([`kurbo::Rect::contains`]). Hover is kept eagerly consistent:
//!
//! - Moving or resizing a drag offers it to every target that lacks a valid hover. A target that
//!   already holds a valid hover keeps it; drags are never stolen.
//! - A drag is hovered by at most one target. With overlapping targets, the one registered first
//!   wins.
//! - Changing a target's bounds re-resolves it at once: a hover that falls outside is cleared, and
//!   an empty target claims the first (by registration) unclaimed drag centered inside.
//! - Ending a drag fires completion for the target it hovers, then lets that target claim the
//!   next waiting drag.
//!
//! Removing a drop target never fires a completion. Whether tearing down a drag mid-gesture does
//! is decided by [`TeardownPolicy`]; the default cancels silently.
//!
//! ## Observing changes
//!
//! [`DragDropState::revision`] increases on every observable change. A renderer can remember the
//! revision it last drew and skip re-reading state when it has not moved.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size, Vec2};
//! use understory_drag_drop::{DragDropState, DragGeometry};
//!
//! let mut dropped = Vec::new();
//! {
//!     let mut state = DragDropState::new(|drag: &&'static str, data: &u32, drop: &&'static str| {
//!         dropped.push((*drag, *data, *drop));
//!     });
//!
//!     // A drop target mounts and layout reports its bounds.
//!     state
//!         .register_drop("inbox")
//!         .set_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
//!
//!     // A 10x10 card starts dragging at (200, 200) and moves over the target.
//!     let card = DragGeometry::new(Point::new(200.0, 200.0), Size::new(10.0, 10.0));
//!     assert!(state.register_drag("card", 42, card));
//!     state.move_drag(&"card", Vec2::new(-195.0, -195.0));
//!     assert_eq!(state.hover(&"inbox"), Some((&"card", &42)));
//!
//!     // Releasing it completes the drop.
//!     state.end_drag(&"card");
//!     assert_eq!(state.hover(&"inbox"), None);
//! }
//! assert_eq!(dropped, [("card", 42, "inbox")]);
//! ```
//!
//! ## Threading
//!
//! All operations are synchronous and expect to be driven from a single UI event thread. Hosts
//! that deliver gestures from several threads should wrap the state in a single mutex.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `tracing`: emits `tracing` events for registrations, hover changes, and completions.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod log;
mod state;
mod types;

pub use state::{DragDropState, DropTargetMut};
pub use types::{DragGeometry, DragSource, DropTarget, OnDrop, TeardownPolicy};
