// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag source and drop target records.

use kurbo::{Point, Rect, Size, Vec2};

/// Geometry a drag source reports when its gesture starts.
///
/// `origin` is the top-left corner of the dragged element in the coordinate space shared with
/// every drop target's bounds. Subsequent movement is accumulated as an offset on top of it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DragGeometry {
    /// Top-left corner of the element when the drag started.
    pub origin: Point,
    /// Measured size of the element.
    pub size: Size,
}

impl DragGeometry {
    /// Create drag geometry from an origin and a size.
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }
}

impl From<Rect> for DragGeometry {
    fn from(rect: Rect) -> Self {
        Self {
            origin: rect.origin(),
            size: rect.size(),
        }
    }
}

/// An active drag source.
///
/// Identity is the key. The record is owned by [`DragDropState`](crate::DragDropState) and is
/// handed out by reference for rendering drag ghosts.
#[derive(Clone, Debug)]
pub struct DragSource<K, T> {
    pub(crate) key: K,
    pub(crate) data: T,
    pub(crate) origin: Point,
    pub(crate) offset: Vec2,
    pub(crate) size: Size,
}

impl<K, T> DragSource<K, T> {
    pub(crate) fn new(key: K, data: T, geometry: DragGeometry) -> Self {
        Self {
            key,
            data,
            origin: geometry.origin,
            offset: Vec2::ZERO,
            size: geometry.size,
        }
    }

    /// Key identifying this drag.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Payload carried by this drag.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consume the record and return its payload.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Position of the element when the gesture started.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Total movement since the gesture started.
    ///
    /// This is the translation a renderer applies to the drag ghost.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Measured size of the element.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Current top-left position: origin plus accumulated offset.
    pub fn position(&self) -> Point {
        self.origin + self.offset
    }

    /// Current center point, the point used for hit testing against drop targets.
    pub fn center(&self) -> Point {
        self.position() + self.size.to_vec2() * 0.5
    }

    /// Current bounding rectangle.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size)
    }

    /// Returns `true` if this drag's center lies within `bounds`.
    ///
    /// Containment follows [`Rect::contains`]: the left and top edges are inclusive, the right
    /// and bottom edges exclusive.
    pub fn is_within(&self, bounds: Rect) -> bool {
        bounds.contains(self.center())
    }
}

/// A registered drop target.
///
/// `K` is the drag key type, `D` the drop key type.
#[derive(Clone, Debug)]
pub struct DropTarget<K, D> {
    pub(crate) key: D,
    pub(crate) bounds: Rect,
    pub(crate) hover: Option<K>,
}

impl<K, D> DropTarget<K, D> {
    pub(crate) fn new(key: D) -> Self {
        Self {
            key,
            bounds: Rect::ZERO,
            hover: None,
        }
    }

    /// Key identifying this drop target.
    pub fn key(&self) -> &D {
        &self.key
    }

    /// Current bounds as last reported by layout. Empty until the first report.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Key of the drag currently hovering this target, if any.
    pub fn hover(&self) -> Option<&K> {
        self.hover.as_ref()
    }

    /// Returns `true` if some drag is hovering this target.
    pub fn is_hovered(&self) -> bool {
        self.hover.is_some()
    }
}

/// What [`DragDropState::unregister_drag`](crate::DragDropState::unregister_drag) does when the
/// torn-down drag is hovering a drop target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TeardownPolicy {
    /// Remove the drag silently; no completion fires.
    #[default]
    Cancel,
    /// Treat teardown as an implicit drop and fire completion.
    Complete,
}

/// Receiver of drop completions.
///
/// Invoked exactly once per successful drop with the drag key, the drag payload, and the key of
/// the drop target that received it. Any `FnMut(&K, &T, &D)` closure implements this trait.
pub trait OnDrop<K, D, T> {
    /// A drag ended while hovering a drop target.
    fn on_drop(&mut self, drag: &K, data: &T, drop: &D);
}

impl<K, D, T, F> OnDrop<K, D, T> for F
where
    F: FnMut(&K, &T, &D),
{
    fn on_drop(&mut self, drag: &K, data: &T, drop: &D) {
        self(drag, data, drop);
    }
}
