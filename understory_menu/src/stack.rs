// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The open-menu stack: a contiguous root→leaf chain of menu ids.

use smallvec::SmallVec;

/// Ordered chain of open menus, index 0 being the root.
///
/// When every [`MenuStack::open`] call passes the menu's real parent, entry `i`
/// is always the parent of entry `i + 1`, and at most one menu is open per depth.
/// All operations are `O(depth)`.
///
/// ```rust
/// use understory_menu::MenuStack;
///
/// let mut stack = MenuStack::new();
/// stack.open(1_u32, None);
/// stack.open(2, Some(1));
/// stack.open(3, Some(2));
///
/// // Opening a sibling of 2 closes the whole branch under 1.
/// stack.open(4, Some(1));
/// assert_eq!(stack.as_slice(), &[1, 4]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuStack<K> {
    open: SmallVec<[K; 4]>,
}

impl<K> Default for MenuStack<K> {
    fn default() -> Self {
        Self {
            open: SmallVec::new(),
        }
    }
}

impl<K: Copy + Eq> MenuStack<K> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `node` as a child of `parent`.
    ///
    /// - `parent` is the top: `node` is appended.
    /// - `parent` is deeper in the chain: everything below `parent` closes first.
    /// - `parent` is `None` or not open: the stack becomes `[node]`.
    ///
    /// Opening a node that is already open directly under `parent` leaves the
    /// stack untouched. Returns `true` if the stack changed.
    pub fn open(&mut self, node: K, parent: Option<K>) -> bool {
        let Some(depth) = parent.and_then(|p| self.depth_of(p)) else {
            if self.open.first() == Some(&node) && parent.is_none() {
                return false;
            }
            let changed = self.open.as_slice() != [node].as_slice();
            self.open.clear();
            self.open.push(node);
            return changed;
        };
        if self.open.get(depth + 1) == Some(&node) {
            return false;
        }
        self.open.truncate(depth + 1);
        self.open.push(node);
        true
    }

    /// Close `node` and every menu deeper than it.
    ///
    /// Returns `true` if `node` was open.
    pub fn close(&mut self, node: K) -> bool {
        match self.depth_of(node) {
            Some(depth) => {
                self.open.truncate(depth);
                true
            }
            None => false,
        }
    }

    /// Keep only the first `depth` menus.
    ///
    /// Returns `true` if anything closed.
    pub fn close_from(&mut self, depth: usize) -> bool {
        let changed = depth < self.open.len();
        self.open.truncate(depth);
        changed
    }

    /// Close every menu. Returns `true` if anything was open.
    pub fn close_all(&mut self) -> bool {
        let changed = !self.open.is_empty();
        self.open.clear();
        changed
    }

    /// Depth of `node`, if open.
    pub fn depth_of(&self, node: K) -> Option<usize> {
        self.open.iter().position(|&k| k == node)
    }

    /// Returns `true` if `node` is open.
    pub fn contains(&self, node: K) -> bool {
        self.open.contains(&node)
    }

    /// Menu at `depth`.
    pub fn get(&self, depth: usize) -> Option<K> {
        self.open.get(depth).copied()
    }

    /// The deepest open menu.
    pub fn top(&self) -> Option<K> {
        self.open.last().copied()
    }

    /// The root menu.
    pub fn root(&self) -> Option<K> {
        self.open.first().copied()
    }

    /// Open menus, outermost first.
    pub fn as_slice(&self) -> &[K] {
        &self.open
    }

    /// Iterate open menus, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.open.iter().copied()
    }

    /// Number of open menus.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Returns `true` if nothing is open.
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
