// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical focus: the single item that receives keyboard input.
//!
//! Focus is independent of which menus are open. Pointer hover opens submenus
//! without touching focus; keyboard opens move focus into the new submenu; a
//! backward close returns focus to the trigger; closing everything clears it.

use crate::stack::MenuStack;
use crate::types::{ItemRef, MenuNode};

/// Linear traversal intent within one menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Traverse {
    /// Next enabled item after the origin (for example, `ArrowDown`).
    Next,
    /// Previous enabled item before the origin (for example, `ArrowUp`).
    Prev,
    /// First enabled item (`Home`).
    First,
    /// Last enabled item (`End`).
    Last,
}

/// Pick the item to focus when moving from `origin` in `node`.
///
/// Disabled items are skipped. With no origin, `Next` picks the first enabled
/// item and `Prev` the last. When `wrap` is `false`, stepping past either end
/// yields `None`.
pub fn traverse<K: Copy + Eq>(
    node: &MenuNode<K>,
    origin: Option<K>,
    step: Traverse,
    wrap: bool,
) -> Option<K> {
    let items = &node.items;
    let mut enabled = items
        .iter()
        .enumerate()
        .filter(|(_, it)| it.is_enabled())
        .map(|(i, _)| i);
    let first = enabled.clone().next()?;
    let last = enabled.clone().next_back()?;
    let origin_pos = origin.and_then(|o| node.position(o));

    let idx = match (step, origin_pos) {
        (Traverse::First, _) | (Traverse::Next, None) => Some(first),
        (Traverse::Last, _) | (Traverse::Prev, None) => Some(last),
        (Traverse::Next, Some(pos)) => enabled
            .find(|&i| i > pos)
            .or_else(|| wrap.then_some(first)),
        (Traverse::Prev, Some(pos)) => enabled
            .rev()
            .find(|&i| i < pos)
            .or_else(|| wrap.then_some(last)),
    };
    idx.map(|i| items[i].id)
}

/// Owner of the single [`ItemRef`] holding logical focus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusCoordinator<K> {
    target: Option<ItemRef<K>>,
}

impl<K> Default for FocusCoordinator<K> {
    fn default() -> Self {
        Self { target: None }
    }
}

impl<K: Copy + Eq> FocusCoordinator<K> {
    /// Create a coordinator with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused item.
    pub fn target(&self) -> Option<ItemRef<K>> {
        self.target
    }

    /// The menu containing the focused item.
    pub fn menu(&self) -> Option<K> {
        self.target.map(|t| t.menu)
    }

    /// Focus `item`. Returns `true` if focus changed.
    pub fn set(&mut self, item: ItemRef<K>) -> bool {
        let changed = self.target != Some(item);
        self.target = Some(item);
        changed
    }

    /// Clear focus. Returns `true` if something was focused.
    pub fn clear(&mut self) -> bool {
        self.target.take().is_some()
    }

    /// Focus the first enabled item of `node`, or clear focus if it has none.
    ///
    /// Returns `true` if focus changed.
    pub fn focus_first(&mut self, node: &MenuNode<K>) -> bool {
        match traverse(node, None, Traverse::First, false) {
            Some(item) => self.set(ItemRef::new(node.id, item)),
            None => self.clear(),
        }
    }

    /// Drop focus if it points into a menu that is no longer open.
    ///
    /// Returns `true` if focus was cleared.
    pub fn retain_open(&mut self, stack: &MenuStack<K>) -> bool {
        match self.target {
            Some(t) if !stack.contains(t.menu) => {
                log::trace!("focus: dropping target in closed menu");
                self.target = None;
                true
            }
            _ => false,
        }
    }
}
