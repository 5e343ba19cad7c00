// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer intent: hover-driven opening and the safe-polygon grace period.
//!
//! ## Hover
//!
//! Hovering an item in an open menu at depth `d`:
//! - If the item is the trigger of the menu open at `d + 1`, that submenu stays
//!   and only deeper menus close.
//! - Otherwise every menu deeper than `d` closes immediately, whatever the item's
//!   kind, and an enabled trigger opens its submenu with no delay.
//!
//! Hover never moves focus.
//!
//! ## Leaving an open trigger
//!
//! When the pointer leaves a trigger whose submenu is open, the tracker decides
//! between closing now and a grace period:
//! - Missing or zero-area rectangles: close now.
//! - Horizontal trend pointing away from the submenu: close now.
//! - Otherwise a [`SafePolygon`] is built from the exit sample toward the submenu's
//!   near edge and a [`Timer::GraceClose`] is armed.
//!
//! While the grace intent is armed, each sample inside the polygon suppresses
//! hover on parent items and restarts the timer, whatever its direction. Outside
//! the polygon:
//! - Over an item of an ancestor menu the intent drops and the hover applies,
//!   closing the branch at once.
//! - Over a menu surface or outside every menu the timer is restarted once and
//!   left to run, so jitter across the polygon edge does not close the submenu.
//!
//! Reaching the submenu drops the intent.

use core::fmt::Debug;
use core::hash::Hash;

use smallvec::SmallVec;

use crate::config::MenuConfig;
use crate::geometry::MenuGeometry;
use crate::polygon::{SafePolygon, is_usable};
use crate::stack::MenuStack;
use crate::timer::{Scheduler, Timer};
use crate::tree::MenuTree;
use crate::types::{Direction, ItemRef, PointerSample, PointerTarget, Side};

/// Engine state and host capabilities a pointer event is processed against.
#[derive(Debug)]
pub struct PointerContext<'a, K, G: ?Sized, S: ?Sized> {
    /// All menus.
    pub tree: &'a MenuTree<K>,
    /// Open menus; mutated in place.
    pub stack: &'a mut MenuStack<K>,
    /// Current rectangles.
    pub geometry: &'a G,
    /// Timer capability.
    pub timers: &'a mut S,
    /// Reading direction for this interaction.
    pub direction: Direction,
    /// Tuning constants.
    pub config: &'a MenuConfig,
}

/// An armed grace period for one submenu.
#[derive(Clone, Debug, PartialEq)]
pub struct GraceIntent<K> {
    /// Trigger the pointer left.
    pub trigger: ItemRef<K>,
    /// Submenu kept open.
    pub submenu: K,
    /// Region the pointer must stay inside.
    pub polygon: SafePolygon,
    /// The pointer is outside the polygon and the close is counting down.
    pub lapsing: bool,
}

/// Tracks pointer trajectory and decides hover opens and deferred closes.
#[derive(Clone, Debug)]
pub struct PointerIntentTracker<K> {
    samples: SmallVec<[PointerSample; 4]>,
    trend: Option<Side>,
    hovered: Option<PointerTarget<K>>,
    grace: Option<GraceIntent<K>>,
}

impl<K> Default for PointerIntentTracker<K> {
    fn default() -> Self {
        Self {
            samples: SmallVec::new(),
            trend: None,
            hovered: None,
            grace: None,
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> PointerIntentTracker<K> {
    /// Create an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal direction of recent movement, if any movement was seen.
    pub fn trend(&self) -> Option<Side> {
        self.trend
    }

    /// Last target reported under the pointer.
    pub fn hovered(&self) -> Option<PointerTarget<K>> {
        self.hovered
    }

    /// The armed grace intent.
    pub fn grace(&self) -> Option<&GraceIntent<K>> {
        self.grace.as_ref()
    }

    /// The most recent sample.
    pub fn last_sample(&self) -> Option<PointerSample> {
        self.samples.last().copied()
    }

    /// Drop any armed grace intent and disarm its timer.
    pub fn cancel_grace<S: Scheduler<K> + ?Sized>(&mut self, timers: &mut S) {
        self.drop_grace(timers);
    }

    /// Forget trajectory, hover, and grace state, disarming its timer.
    pub fn reset<S: Scheduler<K> + ?Sized>(&mut self, timers: &mut S) {
        self.drop_grace(timers);
        self.samples.clear();
        self.trend = None;
        self.hovered = None;
    }

    /// Process one pointer sample over `target`.
    ///
    /// Returns `true` if the open stack changed.
    pub fn pointer_move<G, S>(
        &mut self,
        sample: PointerSample,
        target: PointerTarget<K>,
        cx: &mut PointerContext<'_, K, G, S>,
    ) -> bool
    where
        G: MenuGeometry<K> + ?Sized,
        S: Scheduler<K> + ?Sized,
    {
        self.record(sample, cx.config.trend_samples);
        let previous = self.hovered.replace(target);
        let mut changed = false;

        if let Some(PointerTarget::Item(left)) = previous
            && previous != Some(target)
        {
            changed |= self.leave_item(left, sample, target, cx);
        }

        if self.grace.is_some() && matches!(self.test_grace(sample, target, cx), GraceTest::Hold) {
            return changed;
        }

        if let PointerTarget::Item(item) = target {
            changed |= hover_item(item, cx.tree, cx.stack);
        }
        changed
    }

    /// Handle an expired [`Timer::GraceClose`] for `submenu`.
    ///
    /// The captured submenu and trigger are re-validated against the stack; a
    /// fire that lost a race with a newer open is a no-op. Returns `true` if the
    /// stack changed.
    pub fn grace_expired<G, S>(&mut self, submenu: K, cx: &mut PointerContext<'_, K, G, S>) -> bool
    where
        G: MenuGeometry<K> + ?Sized,
        S: Scheduler<K> + ?Sized,
    {
        let Some(grace) = self.grace.take_if(|g| g.submenu == submenu) else {
            log::trace!("grace timer for {submenu:?} is stale");
            return false;
        };
        if !opened_by(cx.stack, grace.trigger, grace.submenu) {
            log::trace!("grace timer for {submenu:?} superseded");
            return false;
        }
        if self.pointer_within(grace.submenu, cx.stack) {
            return false;
        }
        log::debug!("grace period for {submenu:?} expired; closing");
        let mut changed = cx.stack.close(grace.submenu);
        if let Some(PointerTarget::Item(item)) = self.hovered {
            changed |= hover_item(item, cx.tree, cx.stack);
        }
        changed
    }

    fn record(&mut self, sample: PointerSample, window: usize) {
        let window = window.max(2);
        if self.samples.len() >= window {
            let excess = self.samples.len() + 1 - window;
            self.samples.drain(..excess);
        }
        self.samples.push(sample);
        if let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) {
            let dx = last.position.x - first.position.x;
            if dx > 0.0 {
                self.trend = Some(Side::Right);
            } else if dx < 0.0 {
                self.trend = Some(Side::Left);
            }
        }
    }

    /// Unknown trend counts as toward, so a first sample never closes early.
    fn moving_toward(&self, side: Side) -> bool {
        self.trend.is_none_or(|t| t == side)
    }

    /// Returns `true` if the hovered target lies in `submenu` or deeper.
    fn pointer_within(&self, submenu: K, stack: &MenuStack<K>) -> bool {
        let Some(depth) = stack.depth_of(submenu) else {
            return false;
        };
        self.hovered
            .and_then(|t| t.menu())
            .and_then(|m| stack.depth_of(m))
            .is_some_and(|d| d >= depth)
    }

    fn leave_item<G, S>(
        &mut self,
        left: ItemRef<K>,
        sample: PointerSample,
        target: PointerTarget<K>,
        cx: &mut PointerContext<'_, K, G, S>,
    ) -> bool
    where
        G: MenuGeometry<K> + ?Sized,
        S: Scheduler<K> + ?Sized,
    {
        let Some(&submenu) = cx.tree.item(left).and_then(|it| it.opens()) else {
            return false;
        };
        if !opened_by(cx.stack, left, submenu) {
            return false;
        }
        // Stepping straight onto the submenu (or deeper) needs no grace.
        let target_depth = target.menu().and_then(|m| cx.stack.depth_of(m));
        let sub_depth = cx.stack.depth_of(submenu);
        if matches!((target_depth, sub_depth), (Some(t), Some(s)) if t >= s) {
            return false;
        }

        let trigger_rect = cx.geometry.item_rect(left).filter(|r| is_usable(*r));
        let submenu_rect = cx.geometry.menu_rect(submenu).filter(|r| is_usable(*r));
        let (Some(trigger_rect), Some(submenu_rect)) = (trigger_rect, submenu_rect) else {
            log::debug!("no usable geometry for {submenu:?}; closing without grace");
            self.drop_grace(cx.timers);
            return cx.stack.close(submenu);
        };

        let side = Side::of(trigger_rect, submenu_rect, cx.direction.forward_side());
        if !self.moving_toward(side) {
            log::debug!("pointer left {left:?} away from {submenu:?}; closing");
            self.drop_grace(cx.timers);
            return cx.stack.close(submenu);
        }

        let Some(polygon) = SafePolygon::toward(
            sample.position,
            submenu_rect,
            side,
            cx.config.polygon_bleed,
        ) else {
            self.drop_grace(cx.timers);
            return cx.stack.close(submenu);
        };

        self.drop_grace(cx.timers);
        log::trace!("arming grace for {submenu:?} on side {side:?}");
        self.grace = Some(GraceIntent {
            trigger: left,
            submenu,
            polygon,
            lapsing: false,
        });
        cx.timers.schedule(
            Timer::GraceClose { submenu },
            cx.config.grace_close_delay_ms,
        );
        false
    }

    fn test_grace<G, S>(
        &mut self,
        sample: PointerSample,
        target: PointerTarget<K>,
        cx: &mut PointerContext<'_, K, G, S>,
    ) -> GraceTest
    where
        G: MenuGeometry<K> + ?Sized,
        S: Scheduler<K> + ?Sized,
    {
        let Some(grace) = self.grace.as_ref() else {
            return GraceTest::Released;
        };
        let submenu = grace.submenu;

        if !opened_by(cx.stack, grace.trigger, submenu) || self.pointer_within(submenu, cx.stack) {
            self.drop_grace(cx.timers);
            return GraceTest::Released;
        }

        // Re-hovering the trigger itself is not a transit; let hover handle it.
        if target == PointerTarget::Item(grace.trigger) {
            self.drop_grace(cx.timers);
            return GraceTest::Released;
        }

        let delay = cx.config.grace_close_delay_ms;
        if grace.polygon.contains(sample.position) {
            if let Some(g) = self.grace.as_mut() {
                g.lapsing = false;
            }
            cx.timers.schedule(Timer::GraceClose { submenu }, delay);
            return GraceTest::Hold;
        }

        match target {
            // Hovering an ancestor item is unambiguous; the hover closes the branch.
            PointerTarget::Item(_) => {
                log::debug!("pointer left the safe polygon of {submenu:?} onto an item");
                self.drop_grace(cx.timers);
                GraceTest::Released
            }
            // Anywhere else the close waits out one grace delay to absorb jitter.
            PointerTarget::Menu(_) | PointerTarget::Outside => {
                if let Some(g) = self.grace.as_mut()
                    && !g.lapsing
                {
                    log::trace!("pointer left the safe polygon of {submenu:?}; closing after grace");
                    g.lapsing = true;
                    cx.timers.schedule(Timer::GraceClose { submenu }, delay);
                }
                GraceTest::Hold
            }
        }
    }

    fn drop_grace<S: Scheduler<K> + ?Sized>(&mut self, timers: &mut S) {
        if let Some(g) = self.grace.take() {
            timers.cancel(Timer::GraceClose { submenu: g.submenu });
        }
    }
}

enum GraceTest {
    /// Keep the submenu; the sample's hover is suppressed.
    Hold,
    /// The intent is gone; process the sample as a normal hover.
    Released,
}

/// Returns `true` if `submenu` is open directly under the menu holding `trigger`.
fn opened_by<K: Copy + Eq>(stack: &MenuStack<K>, trigger: ItemRef<K>, submenu: K) -> bool {
    stack
        .depth_of(trigger.menu)
        .is_some_and(|d| stack.get(d + 1) == Some(submenu))
}

/// Apply a hover on `item`. Returns `true` if the stack changed.
pub(crate) fn hover_item<K: Copy + Eq + Hash + Debug>(
    item: ItemRef<K>,
    tree: &MenuTree<K>,
    stack: &mut MenuStack<K>,
) -> bool {
    let (Some(depth), Some(it)) = (stack.depth_of(item.menu), tree.item(item)) else {
        return false;
    };
    match it.opens().copied() {
        Some(submenu) if stack.get(depth + 1) == Some(submenu) => stack.close_from(depth + 2),
        Some(submenu) if tree.contains(submenu) => {
            let closed = stack.close_from(depth + 1);
            log::trace!("hover opens {submenu:?}");
            stack.open(submenu, Some(item.menu)) | closed
        }
        _ => stack.close_from(depth + 1),
    }
}
