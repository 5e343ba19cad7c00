// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu arena: validated storage for every [`MenuNode`] of one menu tree.

use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::types::{Item, ItemKind, ItemRef, MenuNode};

/// Errors reported while building a [`MenuTree`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MenuTreeError<K: Debug> {
    /// A menu with this id was already inserted.
    #[error("menu {0:?} is already in the tree")]
    DuplicateMenu(K),
    /// The parent menu has not been inserted yet.
    #[error("menu {menu:?} names unknown parent {parent:?}")]
    UnknownParent {
        /// Menu being inserted.
        menu: K,
        /// Missing parent.
        parent: K,
    },
    /// No trigger item in the parent names this menu as its submenu.
    #[error("no trigger in {parent:?} opens menu {menu:?}")]
    UnlinkedSubmenu {
        /// Menu being inserted.
        menu: K,
        /// Parent that lacks a trigger for it.
        parent: K,
    },
    /// Two items in one menu share an id.
    #[error("menu {menu:?} has duplicate item {item:?}")]
    DuplicateItem {
        /// Offending menu.
        menu: K,
        /// Repeated item id.
        item: K,
    },
    /// A trigger item without a submenu.
    #[error("trigger {item:?} in menu {menu:?} has no submenu")]
    TriggerWithoutSubmenu {
        /// Offending menu.
        menu: K,
        /// Trigger item.
        item: K,
    },
}

/// Arena of menus addressed by id.
///
/// Menus are inserted root-first: a submenu can only be inserted once its parent
/// exists and the parent holds a trigger item whose `submenu` names it. This keeps
/// every parent link resolvable, so the open stack can rely on it.
///
/// ```rust
/// use understory_menu::{Item, MenuNode, MenuTree};
///
/// let mut tree = MenuTree::new();
/// tree.insert(MenuNode::root("root", vec![Item::trigger("more", "More", "sub")]))
///     .unwrap();
/// tree.insert(MenuNode::submenu("sub", "root", vec![Item::normal("a", "Alpha")]))
///     .unwrap();
///
/// assert_eq!(tree.parent_of("sub"), Some("root"));
/// assert_eq!(tree.trigger_of("sub").map(|r| r.item), Some("more"));
/// ```
#[derive(Clone, Debug)]
pub struct MenuTree<K> {
    menus: HashMap<K, MenuNode<K>>,
    /// submenu -> owning trigger
    triggers: HashMap<K, ItemRef<K>>,
}

impl<K> Default for MenuTree<K> {
    fn default() -> Self {
        Self {
            menus: HashMap::new(),
            triggers: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> MenuTree<K> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a menu, validating its links.
    pub fn insert(&mut self, node: MenuNode<K>) -> Result<(), MenuTreeError<K>> {
        if self.menus.contains_key(&node.id) {
            return Err(MenuTreeError::DuplicateMenu(node.id));
        }
        for (i, item) in node.items.iter().enumerate() {
            if node.items[..i].iter().any(|prev| prev.id == item.id) {
                return Err(MenuTreeError::DuplicateItem {
                    menu: node.id,
                    item: item.id,
                });
            }
            if item.kind == ItemKind::Trigger && item.submenu.is_none() {
                return Err(MenuTreeError::TriggerWithoutSubmenu {
                    menu: node.id,
                    item: item.id,
                });
            }
        }

        if let Some(parent) = node.parent {
            let parent_node = self.menus.get(&parent).ok_or(MenuTreeError::UnknownParent {
                menu: node.id,
                parent,
            })?;
            let trigger = parent_node
                .items
                .iter()
                .find(|it| it.kind.is_trigger() && it.submenu == Some(node.id))
                .ok_or(MenuTreeError::UnlinkedSubmenu {
                    menu: node.id,
                    parent,
                })?;
            self.triggers
                .insert(node.id, ItemRef::new(parent, trigger.id));
        }

        log::trace!("menu tree: inserted {:?}", node.id);
        self.menus.insert(node.id, node);
        Ok(())
    }

    /// Look up a menu.
    pub fn get(&self, id: K) -> Option<&MenuNode<K>> {
        self.menus.get(&id)
    }

    /// Look up an item.
    pub fn item(&self, r: ItemRef<K>) -> Option<&Item<K>> {
        self.menus.get(&r.menu)?.item(r.item)
    }

    /// Parent of a menu.
    pub fn parent_of(&self, id: K) -> Option<K> {
        self.menus.get(&id)?.parent
    }

    /// The trigger item that opens `id`.
    pub fn trigger_of(&self, id: K) -> Option<ItemRef<K>> {
        self.triggers.get(&id).copied()
    }

    /// Returns `true` if the menu is in the tree.
    pub fn contains(&self, id: K) -> bool {
        self.menus.contains_key(&id)
    }

    /// Number of menus.
    pub fn len(&self) -> usize {
        self.menus.len()
    }

    /// Returns `true` if no menus were inserted.
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}
