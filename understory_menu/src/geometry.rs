// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-provided geometry.
//!
//! Rectangles are read on demand during a single interaction and never cached,
//! so a host can reposition menus (for example after a viewport collision flip)
//! between events.

use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::types::ItemRef;

/// Source of current bounding rectangles, in one shared surface coordinate space.
pub trait MenuGeometry<K> {
    /// Bounds of an open menu surface.
    fn menu_rect(&self, menu: K) -> Option<Rect>;
    /// Bounds of an item.
    fn item_rect(&self, item: ItemRef<K>) -> Option<Rect>;
}

/// A fixed table of rectangles, for tests and simple hosts.
#[derive(Clone, Debug)]
pub struct RectTable<K> {
    menus: HashMap<K, Rect>,
    items: HashMap<ItemRef<K>, Rect>,
}

impl<K> Default for RectTable<K> {
    fn default() -> Self {
        Self {
            menus: HashMap::new(),
            items: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> RectTable<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the bounds of a menu surface.
    pub fn set_menu(&mut self, menu: K, rect: Rect) -> &mut Self {
        self.menus.insert(menu, rect);
        self
    }

    /// Record the bounds of an item.
    pub fn set_item(&mut self, menu: K, item: K, rect: Rect) -> &mut Self {
        self.items.insert(ItemRef::new(menu, item), rect);
        self
    }
}

impl<K: Copy + Eq + Hash> MenuGeometry<K> for RectTable<K> {
    fn menu_rect(&self, menu: K) -> Option<Rect> {
        self.menus.get(&menu).copied()
    }

    fn item_rect(&self, item: ItemRef<K>) -> Option<Rect> {
        self.items.get(&item).copied()
    }
}

/// Geometry that knows nothing; every grace period is disabled.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoGeometry;

impl<K> MenuGeometry<K> for NoGeometry {
    fn menu_rect(&self, _: K) -> Option<Rect> {
        None
    }

    fn item_rect(&self, _: ItemRef<K>) -> Option<Rect> {
        None
    }
}
