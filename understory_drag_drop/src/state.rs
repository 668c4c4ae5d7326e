// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag coordinator.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::log::{debug, trace};
use crate::types::{DragGeometry, DragSource, DropTarget, OnDrop, TeardownPolicy};

/// Coordinates simultaneously active drags with registered drop targets.
///
/// `K` keys drags, `D` keys drop targets, `T` is the payload carried by each drag, and `H`
/// receives drop completions (see [`OnDrop`]).
///
/// The state is the only owner of hover truth. Every public operation is a single synchronous
/// transition that leaves these invariants intact:
///
/// - A drag key is registered at most once.
/// - A drop target's hover, if set, names a live drag whose center lies within the target's
///   current bounds.
/// - No drag is hovered by more than one drop target.
///
/// Operations on unknown keys are ignored, since late gesture events during teardown are
/// expected.
///
/// Both registries iterate in registration order. That order decides ties: the first drop
/// target (by registration) claims a drag, and a vacated drop target picks the first waiting
/// drag (by registration) whose center it contains.
pub struct DragDropState<K, D, T, H> {
    drags: Vec<DragSource<K, T>>,
    drops: Vec<DropTarget<K, D>>,
    on_drop: H,
    teardown: TeardownPolicy,
    revision: u64,
}

impl<K, D, T, H> DragDropState<K, D, T, H> {
    /// Create an empty state that reports completions to `on_drop`.
    ///
    /// Teardown defaults to [`TeardownPolicy::Cancel`].
    pub fn new(on_drop: H) -> Self {
        Self::with_teardown_policy(on_drop, TeardownPolicy::default())
    }

    /// Create an empty state with an explicit teardown policy.
    pub fn with_teardown_policy(on_drop: H, teardown: TeardownPolicy) -> Self {
        Self {
            drags: Vec::new(),
            drops: Vec::new(),
            on_drop,
            teardown,
            revision: 0,
        }
    }

    /// Policy applied by [`unregister_drag`](Self::unregister_drag).
    pub fn teardown_policy(&self) -> TeardownPolicy {
        self.teardown
    }

    /// Change the policy applied by [`unregister_drag`](Self::unregister_drag).
    pub fn set_teardown_policy(&mut self, teardown: TeardownPolicy) {
        self.teardown = teardown;
    }

    /// Counter bumped on every observable change.
    ///
    /// Renderers can store the value they last drew and re-read state only when it differs.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The completion handler.
    pub fn handler(&self) -> &H {
        &self.on_drop
    }

    /// The completion handler, mutably.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.on_drop
    }

    /// Consume the state and return the completion handler.
    pub fn into_handler(self) -> H {
        self.on_drop
    }

    /// All active drags in registration order.
    pub fn drags(&self) -> impl Iterator<Item = &DragSource<K, T>> {
        self.drags.iter()
    }

    /// All drop targets in registration order.
    pub fn drop_targets(&self) -> impl Iterator<Item = &DropTarget<K, D>> {
        self.drops.iter()
    }

    /// Number of active drags.
    pub fn drag_count(&self) -> usize {
        self.drags.len()
    }

    /// Number of registered drop targets.
    pub fn drop_count(&self) -> usize {
        self.drops.len()
    }

    /// Every current hover assignment as `(drop key, drag key)`.
    pub fn hovers(&self) -> impl Iterator<Item = (&D, &K)> {
        self.drops
            .iter()
            .filter_map(|drop| drop.hover.as_ref().map(|drag| (&drop.key, drag)))
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<K: PartialEq, D: PartialEq, T, H> DragDropState<K, D, T, H> {
    /// Look up an active drag.
    pub fn drag(&self, key: &K) -> Option<&DragSource<K, T>> {
        self.drags.iter().find(|drag| drag.key == *key)
    }

    /// Returns `true` if `key` is currently being dragged.
    pub fn is_dragging(&self, key: &K) -> bool {
        self.drag(key).is_some()
    }

    /// Look up a drop target.
    pub fn drop_target(&self, key: &D) -> Option<&DropTarget<K, D>> {
        self.drops.iter().find(|drop| drop.key == *key)
    }

    /// The drag hovering drop target `key`, with its payload.
    pub fn hover(&self, key: &D) -> Option<(&K, &T)> {
        let hover = self.drop_target(key)?.hover.as_ref()?;
        self.drag(hover).map(|drag| (&drag.key, &drag.data))
    }

    /// The drop target currently hovered by drag `key`.
    pub fn hovered_drop(&self, key: &K) -> Option<&D> {
        self.drops
            .iter()
            .find(|drop| drop.hover.as_ref() == Some(key))
            .map(|drop| &drop.key)
    }

    fn drag_index(&self, key: &K) -> Option<usize> {
        self.drags.iter().position(|drag| drag.key == *key)
    }

    fn drop_index(&self, key: &D) -> Option<usize> {
        self.drops.iter().position(|drop| drop.key == *key)
    }

    /// Hover of drop `index` names a live drag whose center is inside the bounds.
    fn has_valid_hover(&self, index: usize) -> bool {
        let drop = &self.drops[index];
        drop.hover
            .as_ref()
            .and_then(|key| self.drag(key))
            .is_some_and(|drag| drag.is_within(drop.bounds))
    }

    /// Some drop other than `index` validly holds drag `key`.
    fn is_claimed_elsewhere(&self, key: &K, index: usize) -> bool {
        self.drops.iter().enumerate().any(|(i, drop)| {
            i != index && drop.hover.as_ref() == Some(key) && self.has_valid_hover(i)
        })
    }
}

impl<K, D, T, H> DragDropState<K, D, T, H>
where
    K: PartialEq + Clone,
    D: PartialEq,
    H: OnDrop<K, D, T>,
{
    /// Start tracking a drag.
    ///
    /// Returns `false` and leaves the existing entry untouched if `key` is already being dragged.
    /// The caller should stop forwarding events for a rejected gesture; forwarding them anyway is
    /// harmless but may steer the drag that owns the key.
    ///
    /// The new drag starts at `geometry.origin` with a zero offset. Hover resolution waits for
    /// the first move.
    pub fn register_drag(&mut self, key: K, data: T, geometry: DragGeometry) -> bool {
        if self.drag_index(&key).is_some() {
            debug!("drag registration rejected: key already active");
            return false;
        }
        self.drags.push(DragSource::new(key, data, geometry));
        self.bump();
        debug!(drags = self.drags.len(), "drag registered");
        true
    }

    /// Move drag `key` by `delta` and resolve hover.
    ///
    /// Ignored if `key` is not registered.
    pub fn move_drag(&mut self, key: &K, delta: Vec2) {
        let Some(index) = self.drag_index(key) else {
            return;
        };
        self.drags[index].offset += delta;
        self.bump();
        self.reconcile_moved(key);
    }

    /// Update the measured size of drag `key` and resolve hover.
    ///
    /// Returns `false` if `key` is not registered.
    pub fn set_drag_size(&mut self, key: &K, size: Size) -> bool {
        let Some(index) = self.drag_index(key) else {
            return false;
        };
        if self.drags[index].size != size {
            self.drags[index].size = size;
            self.bump();
            self.reconcile_moved(key);
        }
        true
    }

    /// End the gesture for drag `key`.
    ///
    /// If the drag is hovering a drop target, completion fires with the drag key, its payload,
    /// and the drop key. The vacated target then picks up the first other drag already centered
    /// inside it, if any.
    ///
    /// Returns the removed drag, or `None` if `key` was not registered.
    pub fn end_drag(&mut self, key: &K) -> Option<DragSource<K, T>> {
        self.remove_drag(key, true)
    }

    /// Remove drag `key` because its element was torn down.
    ///
    /// Whether a hovered drop target receives a completion is decided by the
    /// [`TeardownPolicy`]. Everything else behaves as [`end_drag`](Self::end_drag).
    pub fn unregister_drag(&mut self, key: &K) -> Option<DragSource<K, T>> {
        let complete = self.teardown == TeardownPolicy::Complete;
        debug!(complete, "drag torn down");
        self.remove_drag(key, complete)
    }

    /// Remove drag `key` without firing completion.
    pub fn cancel_drag(&mut self, key: &K) -> Option<DragSource<K, T>> {
        self.remove_drag(key, false)
    }

    /// Cancel every active drag. No completion fires and every hover is cleared.
    pub fn clear_drags(&mut self) {
        if self.drags.is_empty() {
            return;
        }
        self.drags.clear();
        for drop in &mut self.drops {
            drop.hover = None;
        }
        self.bump();
        debug!("all drags cleared");
    }

    /// Register a drop target with empty bounds and no hover.
    ///
    /// Re-registering an existing key resets that target in place. The returned handle is where
    /// layout reports bounds.
    pub fn register_drop(&mut self, key: D) -> DropTargetMut<'_, K, D, T, H> {
        let index = match self.drop_index(&key) {
            Some(index) => {
                let drop = &mut self.drops[index];
                drop.bounds = Rect::ZERO;
                let released = drop.hover.take();
                self.bump();
                if let Some(released) = released {
                    self.reconcile_moved(&released);
                }
                index
            }
            None => {
                self.drops.push(DropTarget::new(key));
                self.bump();
                self.drops.len() - 1
            }
        };
        DropTargetMut { state: self, index }
    }

    /// Handle for reporting bounds of an existing drop target.
    pub fn drop_target_mut(&mut self, key: &D) -> Option<DropTargetMut<'_, K, D, T, H>> {
        let index = self.drop_index(key)?;
        Some(DropTargetMut { state: self, index })
    }

    /// Remove drop target `key`.
    ///
    /// No completion fires. A drag it was hovering becomes free and may be claimed by another
    /// target containing its center.
    pub fn unregister_drop(&mut self, key: &D) -> Option<DropTarget<K, D>> {
        let index = self.drop_index(key)?;
        let removed = self.drops.remove(index);
        self.bump();
        if let Some(released) = &removed.hover {
            self.reconcile_moved(released);
        }
        Some(removed)
    }

    /// Update the bounds of drop target `key`.
    ///
    /// Returns `false` if `key` is not registered.
    pub fn set_drop_bounds(&mut self, key: &D, bounds: Rect) -> bool {
        match self.drop_index(key) {
            Some(index) => {
                self.set_bounds_at(index, bounds);
                true
            }
            None => false,
        }
    }

    fn set_bounds_at(&mut self, index: usize, bounds: Rect) {
        if self.drops[index].bounds != bounds {
            self.drops[index].bounds = bounds;
            self.bump();
        }
        let previous = self.drops[index].hover.clone();
        self.reconcile_vacated(index);
        // A drag pushed out of these bounds may already sit inside another target.
        if let Some(previous) = previous
            && self.drops[index].hover.as_ref() != Some(&previous)
        {
            self.reconcile_moved(&previous);
        }
    }

    fn remove_drag(&mut self, key: &K, complete: bool) -> Option<DragSource<K, T>> {
        let removed = self.drag_index(key).map(|index| self.drags.remove(index));
        if removed.is_some() {
            self.bump();
        }
        let hovering: SmallVec<[usize; 1]> = self
            .drops
            .iter()
            .enumerate()
            .filter(|(_, drop)| drop.hover.as_ref() == Some(key))
            .map(|(index, _)| index)
            .collect();
        for index in hovering {
            if complete
                && let Some(drag) = &removed
                && drag.is_within(self.drops[index].bounds)
            {
                debug!("drop completed");
                self.on_drop.on_drop(&drag.key, &drag.data, &self.drops[index].key);
            }
            self.set_hover(index, None);
            self.reconcile_vacated(index);
        }
        removed
    }

    /// Offer a moved drag to every drop target that lacks a valid hover.
    fn reconcile_moved(&mut self, key: &K) {
        let Some(drag_index) = self.drag_index(key) else {
            return;
        };
        for index in 0..self.drops.len() {
            if self.has_valid_hover(index) {
                continue;
            }
            let inside = self.drags[drag_index].is_within(self.drops[index].bounds);
            if inside && !self.is_claimed_elsewhere(key, index) {
                self.set_hover(index, Some(key.clone()));
            } else if self.drops[index].hover.is_some() {
                // Stale: the hovered drag left these bounds.
                self.set_hover(index, None);
                self.reconcile_vacated(index);
            }
        }
    }

    /// Give drop target `index` the first unclaimed drag centered inside it, unless its current
    /// hover is still valid.
    fn reconcile_vacated(&mut self, index: usize) {
        if self.has_valid_hover(index) {
            return;
        }
        let bounds = self.drops[index].bounds;
        let candidate = self
            .drags
            .iter()
            .find(|drag| drag.is_within(bounds) && !self.is_claimed_elsewhere(&drag.key, index))
            .map(|drag| drag.key.clone());
        self.set_hover(index, candidate);
    }

    fn set_hover(&mut self, index: usize, hover: Option<K>) {
        let drop = &mut self.drops[index];
        if drop.hover == hover {
            return;
        }
        drop.hover = hover;
        self.bump();
        trace!(drop = index, hovered = self.drops[index].hover.is_some(), "hover changed");
    }
}

impl<K: fmt::Debug, D: fmt::Debug, T: fmt::Debug, H> fmt::Debug for DragDropState<K, D, T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDropState")
            .field("drags", &self.drags)
            .field("drops", &self.drops)
            .field("teardown", &self.teardown)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// Mutable handle to a registered drop target.
///
/// Returned by [`DragDropState::register_drop`] and [`DragDropState::drop_target_mut`]. Layout
/// reports bounds through [`set_bounds`](Self::set_bounds).
pub struct DropTargetMut<'a, K, D, T, H> {
    state: &'a mut DragDropState<K, D, T, H>,
    index: usize,
}

impl<K, D, T, H> DropTargetMut<'_, K, D, T, H> {
    /// Key of this drop target.
    pub fn key(&self) -> &D {
        &self.state.drops[self.index].key
    }

    /// Current bounds.
    pub fn bounds(&self) -> Rect {
        self.state.drops[self.index].bounds
    }

    /// Key of the drag hovering this target, if any.
    pub fn hover(&self) -> Option<&K> {
        self.state.drops[self.index].hover.as_ref()
    }
}

impl<K, D, T, H> DropTargetMut<'_, K, D, T, H>
where
    K: PartialEq + Clone,
    D: PartialEq,
    H: OnDrop<K, D, T>,
{
    /// Report new bounds for this target.
    ///
    /// A target without a valid hover immediately claims the first unclaimed drag centered
    /// inside the new bounds; a hover whose drag falls outside is cleared.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.state.set_bounds_at(self.index, bounds);
    }
}

impl<K: fmt::Debug, D: fmt::Debug, T, H> fmt::Debug for DropTargetMut<'_, K, D, T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTargetMut")
            .field("target", &self.state.drops[self.index])
            .finish_non_exhaustive()
    }
}
