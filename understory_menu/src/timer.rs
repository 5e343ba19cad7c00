// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancellable delayed callbacks.
//!
//! The engine never sleeps or spawns. When it needs a delayed decision it asks the
//! host's [`Scheduler`] to arm a [`Timer`], and the host later hands the fired
//! timer back to [`RootDispatcher::timer_fired`](crate::RootDispatcher::timer_fired).
//! Each timer is keyed by the menu it belongs to; arming a timer that is already
//! pending replaces it, so at most one is pending per key.
//!
//! [`TimerQueue`] is a deterministic scheduler driven by explicit timestamps, handy
//! for tests and for hosts that already run a frame clock.
//!
//! ```rust
//! use understory_menu::{Scheduler, Timer, TimerQueue};
//!
//! let mut timers = TimerQueue::new(0);
//! timers.schedule(Timer::GraceClose { submenu: 7_u32 }, 300);
//! timers.schedule(Timer::GraceClose { submenu: 7_u32 }, 500); // supersedes
//!
//! assert!(timers.advance_to(400).is_empty());
//! assert_eq!(timers.advance_to(500), vec![Timer::GraceClose { submenu: 7 }]);
//! ```

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

/// A delayed callback owned by the menu engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Timer<K> {
    /// Close `submenu` unless the pointer reached it first.
    GraceClose {
        /// Submenu to close.
        submenu: K,
    },
    /// Clear the typeahead buffer of `menu`.
    TypeaheadReset {
        /// Menu whose buffer expires.
        menu: K,
    },
}

/// Host capability for arming and canceling [`Timer`]s.
///
/// Implementations must treat a second `schedule` for an equal timer as a
/// replacement of the first. The engine re-validates state when a timer fires,
/// so a late or duplicated fire is harmless.
pub trait Scheduler<K> {
    /// Arm `timer` to fire after `delay_ms` milliseconds.
    fn schedule(&mut self, timer: Timer<K>, delay_ms: u64);
    /// Disarm `timer` if pending.
    fn cancel(&mut self, timer: Timer<K>);
}

/// Deterministic [`Scheduler`] keyed by explicit timestamps.
#[derive(Clone, Debug)]
pub struct TimerQueue<K> {
    now: u64,
    pending: HashMap<Timer<K>, (u64, u64)>,
    seq: u64,
}

impl<K: Copy + Eq + Hash> TimerQueue<K> {
    /// Create a queue whose clock starts at `now` milliseconds.
    pub fn new(now: u64) -> Self {
        Self {
            now,
            pending: HashMap::new(),
            seq: 0,
        }
    }

    /// Current clock value.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Deadline of a pending timer.
    pub fn deadline(&self, timer: &Timer<K>) -> Option<u64> {
        self.pending.get(timer).map(|&(at, _)| at)
    }

    /// Returns `true` if `timer` is armed.
    pub fn is_pending(&self, timer: &Timer<K>) -> bool {
        self.pending.contains_key(timer)
    }

    /// Number of armed timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is armed.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward and return every timer due by `now`.
    ///
    /// Timers come out in deadline order; equal deadlines keep arming order.
    /// The clock never moves backwards.
    pub fn advance_to(&mut self, now: u64) -> Vec<Timer<K>> {
        self.now = self.now.max(now);
        let mut due: Vec<(u64, u64, Timer<K>)> = self
            .pending
            .iter()
            .filter(|&(_, &(at, _))| at <= self.now)
            .map(|(&t, &(at, seq))| (at, seq, t))
            .collect();
        due.sort_by_key(|&(at, seq, _)| (at, seq));
        for (_, _, t) in &due {
            self.pending.remove(t);
        }
        due.into_iter().map(|(_, _, t)| t).collect()
    }
}

impl<K: Copy + Eq + Hash> Scheduler<K> for TimerQueue<K> {
    fn schedule(&mut self, timer: Timer<K>, delay_ms: u64) {
        self.seq += 1;
        let at = self.now.saturating_add(delay_ms);
        self.pending.insert(timer, (at, self.seq));
    }

    fn cancel(&mut self, timer: Timer<K>) {
        self.pending.remove(&timer);
    }
}
