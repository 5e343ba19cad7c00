// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: menu nodes, items, directions, keys, and pointer samples.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};

/// Behavior class of a menu item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A plain, activatable item.
    Normal,
    /// An item that cannot be activated or focused by traversal.
    ///
    /// It still participates in pointer hover, so hovering it closes unrelated
    /// open submenus.
    Disabled,
    /// An item that owns a child menu and opens it.
    Trigger,
    /// A trigger that never opens its child menu.
    DisabledTrigger,
}

impl ItemKind {
    /// Returns `true` for [`ItemKind::Disabled`] and [`ItemKind::DisabledTrigger`].
    pub const fn is_disabled(self) -> bool {
        matches!(self, Self::Disabled | Self::DisabledTrigger)
    }

    /// Returns `true` for both enabled and disabled triggers.
    pub const fn is_trigger(self) -> bool {
        matches!(self, Self::Trigger | Self::DisabledTrigger)
    }
}

/// A single entry in a menu.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<K> {
    /// Identifier of the item, unique within its menu.
    pub id: K,
    /// Text used for typeahead matching.
    pub label: String,
    /// Behavior class.
    pub kind: ItemKind,
    /// Child menu for trigger kinds.
    pub submenu: Option<K>,
}

impl<K> Item<K> {
    /// An enabled, activatable item.
    pub fn normal(id: K, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            kind: ItemKind::Normal,
            submenu: None,
        }
    }

    /// A disabled item.
    pub fn disabled(id: K, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            kind: ItemKind::Disabled,
            submenu: None,
        }
    }

    /// An enabled trigger that opens `submenu`.
    pub fn trigger(id: K, label: impl Into<String>, submenu: K) -> Self {
        Self {
            id,
            label: label.into(),
            kind: ItemKind::Trigger,
            submenu: Some(submenu),
        }
    }

    /// A disabled trigger; `submenu` is recorded but never opened.
    pub fn disabled_trigger(id: K, label: impl Into<String>, submenu: K) -> Self {
        Self {
            id,
            label: label.into(),
            kind: ItemKind::DisabledTrigger,
            submenu: Some(submenu),
        }
    }

    /// Returns `true` if the item can be focused by traversal and activated.
    pub fn is_enabled(&self) -> bool {
        !self.kind.is_disabled()
    }

    /// The child menu this item opens, if it is an enabled trigger.
    pub fn opens(&self) -> Option<&K> {
        match self.kind {
            ItemKind::Trigger => self.submenu.as_ref(),
            _ => None,
        }
    }
}

/// One level of a cascading menu.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuNode<K> {
    /// Identifier of the menu.
    pub id: K,
    /// Parent menu; `None` for a root menu.
    pub parent: Option<K>,
    /// Items in display order.
    pub items: Vec<Item<K>>,
}

impl<K: Copy + Eq> MenuNode<K> {
    /// A root menu.
    pub fn root(id: K, items: Vec<Item<K>>) -> Self {
        Self {
            id,
            parent: None,
            items,
        }
    }

    /// A submenu of `parent`.
    pub fn submenu(id: K, parent: K, items: Vec<Item<K>>) -> Self {
        Self {
            id,
            parent: Some(parent),
            items,
        }
    }

    /// Look up an item by id.
    pub fn item(&self, id: K) -> Option<&Item<K>> {
        self.items.iter().find(|it| it.id == id)
    }

    /// Position of an item within [`MenuNode::items`].
    pub fn position(&self, id: K) -> Option<usize> {
        self.items.iter().position(|it| it.id == id)
    }
}

/// Address of an item: the menu it lives in and its id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemRef<K> {
    /// Menu containing the item.
    pub menu: K,
    /// Item id.
    pub item: K,
}

impl<K> ItemRef<K> {
    /// Build an item reference.
    pub const fn new(menu: K, item: K) -> Self {
        Self { menu, item }
    }
}

impl<K> From<(K, K)> for ItemRef<K> {
    fn from((menu, item): (K, K)) -> Self {
        Self { menu, item }
    }
}

/// Reading direction supplied by the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left-to-right: submenus open to the right.
    #[default]
    Ltr,
    /// Right-to-left: submenus open to the left.
    Rtl,
}

impl Direction {
    /// The side on which submenus open by default.
    pub const fn forward_side(self) -> Side {
        match self {
            Self::Ltr => Side::Right,
            Self::Rtl => Side::Left,
        }
    }

    /// The arrow key that opens a submenu.
    pub const fn forward_key(self) -> Key {
        match self {
            Self::Ltr => Key::ArrowRight,
            Self::Rtl => Key::ArrowLeft,
        }
    }

    /// The arrow key that closes a submenu.
    pub const fn backward_key(self) -> Key {
        match self {
            Self::Ltr => Key::ArrowLeft,
            Self::Rtl => Key::ArrowRight,
        }
    }
}

/// Horizontal side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Toward smaller x.
    Left,
    /// Toward larger x.
    Right,
}

impl Side {
    /// Side on which `submenu` sits relative to `trigger`.
    ///
    /// Uses the horizontal centers; when they coincide the `fallback` side is
    /// returned. This catches submenus flipped to the other side by a viewport
    /// collision.
    pub fn of(trigger: Rect, submenu: Rect, fallback: Self) -> Self {
        let tc = trigger.center().x;
        let sc = submenu.center().x;
        if sc > tc {
            Self::Right
        } else if sc < tc {
            Self::Left
        } else {
            fallback
        }
    }
}

/// Logical key identity for keyboard navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Home.
    Home,
    /// End.
    End,
    /// Tab.
    Tab,
    /// A printable character.
    Character(char),
}

bitflags::bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Meta / Command / Super.
        const META  = 0b0000_1000;
    }
}

impl Modifiers {
    /// Returns `true` when a modifier that turns a key into a shortcut is held.
    pub fn is_command(self) -> bool {
        self.intersects(Self::CTRL | Self::ALT | Self::META)
    }
}

/// A key press with its modifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyPress {
    /// The key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// A key press without modifiers.
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }
}

impl From<Key> for KeyPress {
    fn from(key: Key) -> Self {
        Self::plain(key)
    }
}

/// An observed pointer position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// Position in the host's surface coordinate space.
    pub position: Point,
    /// Timestamp in milliseconds.
    pub time_ms: u64,
}

impl PointerSample {
    /// Build a sample.
    pub fn new(position: impl Into<Point>, time_ms: u64) -> Self {
        Self {
            position: position.into(),
            time_ms,
        }
    }
}

/// What lies under the pointer, as resolved by the host's hit testing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerTarget<K> {
    /// An item inside an open menu.
    Item(ItemRef<K>),
    /// A menu surface, but not over any item (padding, separators).
    Menu(K),
    /// Outside every open menu surface.
    Outside,
}

impl<K: Copy> PointerTarget<K> {
    /// The menu under the pointer, if any.
    pub fn menu(&self) -> Option<K> {
        match *self {
            Self::Item(r) => Some(r.menu),
            Self::Menu(m) => Some(m),
            Self::Outside => None,
        }
    }
}

/// How a menu was opened by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpenReason {
    /// Opened by pointer; focus is left alone.
    Pointer,
    /// Opened by keyboard; the first enabled item receives focus.
    Keyboard,
}
