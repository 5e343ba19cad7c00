// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard navigation: maps key presses to stack and focus transitions.
//!
//! Resolution is keyed by the focused item, its kind, and the reading
//! [`Direction`]. The navigator never mutates the stack itself; it returns a
//! [`KeyAction`] that the dispatcher applies, so keyboard and pointer paths
//! share one set of stack/focus mutations.
//!
//! | Key | Condition | Action |
//! |---|---|---|
//! | `Enter` / `Space` / forward arrow | focused enabled trigger | [`KeyAction::OpenSubmenu`] |
//! | backward arrow | focused menu is a submenu | [`KeyAction::CloseSubmenu`] |
//! | `Enter` / `Space` | focused enabled non-trigger | [`KeyAction::Select`] |
//! | `Escape` | anything open | [`KeyAction::CloseAll`] |
//! | `ArrowUp` / `ArrowDown` / `Home` / `End` | any | [`KeyAction::Focus`] |
//! | printable character | no command modifier | [`KeyAction::Typeahead`] |

use alloc::string::String;
use core::fmt::Debug;
use core::hash::Hash;

use crate::focus::{Traverse, traverse};
use crate::stack::MenuStack;
use crate::tree::MenuTree;
use crate::types::{Direction, ItemKind, ItemRef, Key, KeyPress, MenuNode};

/// Outcome of resolving one key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyAction<K> {
    /// Open `submenu` under `trigger` and focus its first enabled item.
    OpenSubmenu {
        /// The focused trigger.
        trigger: ItemRef<K>,
        /// Menu it opens.
        submenu: K,
    },
    /// Close `submenu` (and deeper) and return focus to `trigger`.
    CloseSubmenu {
        /// Menu being closed.
        submenu: K,
        /// Trigger that owns it.
        trigger: ItemRef<K>,
    },
    /// Activate a non-trigger item; the whole stack closes.
    Select(ItemRef<K>),
    /// Close every menu.
    CloseAll,
    /// Move focus within the current menu.
    Focus(ItemRef<K>),
    /// A typeahead character was consumed for `menu`; `focus` is the match to
    /// move to, if any.
    Typeahead {
        /// Menu the buffer is scoped to.
        menu: K,
        /// Item to focus.
        focus: Option<K>,
    },
    /// The key does not apply.
    Ignore,
}

/// Read-only view of the engine state a key press is resolved against.
#[derive(Clone, Copy, Debug)]
pub struct KeyContext<'a, K> {
    /// All menus.
    pub tree: &'a MenuTree<K>,
    /// Open menus.
    pub stack: &'a MenuStack<K>,
    /// Focused item.
    pub focus: Option<ItemRef<K>>,
    /// Reading direction for this interaction.
    pub direction: Direction,
    /// Whether arrow traversal wraps.
    pub loop_focus: bool,
}

impl<K: Copy + Eq> KeyContext<'_, K> {
    /// The menu keys apply to: the focused menu if open, otherwise the deepest.
    pub fn scope(&self) -> Option<K> {
        match self.focus {
            Some(f) if self.stack.contains(f.menu) => Some(f.menu),
            _ => self.stack.top(),
        }
    }
}

/// Result of feeding one character to a [`Typeahead`] buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeaheadMatch<K> {
    /// Move focus to this item.
    Move(K),
    /// The focused item already matches.
    Stay,
    /// Nothing matches; the buffer was cleared.
    None,
}

/// Rolling typeahead buffer scoped to one menu.
#[derive(Clone, Debug)]
pub struct Typeahead<K> {
    menu: Option<K>,
    buffer: String,
}

impl<K> Default for Typeahead<K> {
    fn default() -> Self {
        Self {
            menu: None,
            buffer: String::new(),
        }
    }
}

impl<K: Copy + Eq> Typeahead<K> {
    /// Current buffer contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Menu the buffer belongs to, if non-empty.
    pub fn menu(&self) -> Option<K> {
        if self.buffer.is_empty() {
            None
        } else {
            self.menu
        }
    }

    /// Returns `true` if a search is in progress in `menu`.
    pub fn is_active_in(&self, menu: K) -> bool {
        self.menu() == Some(menu)
    }

    /// Clear the buffer. Returns `true` if it held anything.
    pub fn clear(&mut self) -> bool {
        let had = !self.buffer.is_empty();
        self.buffer.clear();
        self.menu = None;
        had
    }

    /// Append `ch` and search `node` for the first enabled item whose label
    /// starts with the buffer, in display order.
    ///
    /// A buffer of one character typed repeatedly (for example `"nnn"`) instead
    /// cycles through the items starting with that character, beginning after
    /// `current`. When the extended buffer matches nothing it restarts from `ch`
    /// alone, and clears if that fails too.
    pub fn push(&mut self, node: &MenuNode<K>, current: Option<K>, ch: char) -> TypeaheadMatch<K> {
        if self.menu != Some(node.id) {
            self.buffer.clear();
            self.menu = Some(node.id);
        }
        self.buffer.push(ch);
        if let Some(found) = find_match(node, current, &self.buffer) {
            return found;
        }
        if self.buffer.chars().count() > 1 {
            self.buffer.clear();
            self.buffer.push(ch);
            if let Some(found) = find_match(node, current, &self.buffer) {
                return found;
            }
        }
        self.clear();
        TypeaheadMatch::None
    }
}

fn find_match<K: Copy + Eq>(
    node: &MenuNode<K>,
    current: Option<K>,
    buffer: &str,
) -> Option<TypeaheadMatch<K>> {
    let mut chars = buffer.chars();
    let first = chars.next()?;
    let repeated = chars.all(|c| c == first);
    let needle = if repeated {
        first.to_lowercase().collect::<String>()
    } else {
        buffer.to_lowercase()
    };

    // Only a repeat of a single character cycles; anything else is a fresh
    // search from the top.
    let cycling = repeated && buffer.chars().nth(1).is_some();
    let items = &node.items;
    let n = items.len();
    let start = if cycling {
        current.and_then(|c| node.position(c)).map_or(0, |i| i + 1)
    } else {
        0
    };
    let found = (0..n)
        .map(|offset| &items[(start + offset) % n])
        .filter(|it| it.is_enabled())
        .filter(|it| !(cycling && Some(it.id) == current))
        .find(|it| it.label.to_lowercase().starts_with(&needle))?;

    Some(if Some(found.id) == current {
        TypeaheadMatch::Stay
    } else {
        TypeaheadMatch::Move(found.id)
    })
}

/// Key → transition state machine, plus the typeahead buffer it owns.
#[derive(Clone, Debug)]
pub struct KeyboardNavigator<K> {
    typeahead: Typeahead<K>,
}

impl<K> Default for KeyboardNavigator<K> {
    fn default() -> Self {
        Self {
            typeahead: Typeahead::default(),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> KeyboardNavigator<K> {
    /// Create a navigator with an empty typeahead buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The typeahead buffer.
    pub fn typeahead(&self) -> &Typeahead<K> {
        &self.typeahead
    }

    /// Clear typeahead state.
    pub fn reset_typeahead(&mut self) -> bool {
        self.typeahead.clear()
    }

    /// Resolve `press` against `ctx`.
    ///
    /// Typeahead characters update the buffer as a side effect; everything else
    /// is a pure function of the context.
    pub fn key_down(&mut self, press: KeyPress, ctx: &KeyContext<'_, K>) -> KeyAction<K> {
        let Some(scope) = ctx.scope() else {
            return KeyAction::Ignore;
        };
        let Some(node) = ctx.tree.get(scope) else {
            return KeyAction::Ignore;
        };
        let focused = ctx.focus.filter(|f| f.menu == scope);
        let item = focused.and_then(|f| node.item(f.item));
        let dir = ctx.direction;

        let key = press.key;
        let typing = match key {
            Key::Character(c) => !c.is_control() && !press.modifiers.is_command(),
            Key::Space => self.typeahead.is_active_in(scope) && !press.modifiers.is_command(),
            _ => false,
        };
        if typing {
            let ch = match key {
                Key::Character(c) => c,
                _ => ' ',
            };
            let focus = match self.typeahead.push(node, focused.map(|f| f.item), ch) {
                TypeaheadMatch::Move(id) => Some(id),
                TypeaheadMatch::Stay | TypeaheadMatch::None => None,
            };
            log::trace!("typeahead {:?} in {:?} -> {:?}", self.typeahead.buffer(), scope, focus);
            return KeyAction::Typeahead { menu: scope, focus };
        }

        match key {
            Key::Escape => KeyAction::CloseAll,
            Key::Enter | Key::Space => match item {
                Some(it) => match (it.kind, it.submenu) {
                    (ItemKind::Trigger, Some(submenu)) => KeyAction::OpenSubmenu {
                        trigger: ItemRef::new(scope, it.id),
                        submenu,
                    },
                    (ItemKind::Normal, _) => KeyAction::Select(ItemRef::new(scope, it.id)),
                    _ => KeyAction::Ignore,
                },
                None => KeyAction::Ignore,
            },
            k if k == dir.forward_key() => match item.and_then(|it| it.opens().map(|s| (it, *s))) {
                Some((it, submenu)) => KeyAction::OpenSubmenu {
                    trigger: ItemRef::new(scope, it.id),
                    submenu,
                },
                None => KeyAction::Ignore,
            },
            k if k == dir.backward_key() => {
                match (ctx.stack.depth_of(scope), ctx.tree.trigger_of(scope)) {
                    (Some(depth), Some(trigger)) if depth > 0 => KeyAction::CloseSubmenu {
                        submenu: scope,
                        trigger,
                    },
                    _ => KeyAction::Ignore,
                }
            }
            Key::ArrowDown | Key::ArrowUp | Key::Home | Key::End => {
                let step = match key {
                    Key::ArrowDown => Traverse::Next,
                    Key::ArrowUp => Traverse::Prev,
                    Key::Home => Traverse::First,
                    _ => Traverse::Last,
                };
                match traverse(node, focused.map(|f| f.item), step, ctx.loop_focus) {
                    Some(id) => KeyAction::Focus(ItemRef::new(scope, id)),
                    None => KeyAction::Ignore,
                }
            }
            _ => KeyAction::Ignore,
        }
    }
}
