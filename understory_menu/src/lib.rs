// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Menu: a headless interaction engine for cascading menus.
//!
//! ## Overview
//!
//! This crate decides which menus are open and which item has focus in a tree of
//! nested menus (a menu bar dropdown, a context menu with submenus). It does not
//! render, measure, or hit test. The host resolves what is under the pointer,
//! reports rectangles on demand, and re-renders from the state it reads back.
//!
//! ## Pieces
//!
//! - [`MenuTree`] holds every [`MenuNode`] and validates parent/trigger links.
//! - [`MenuStack`] is the chain of open menus, root first.
//! - [`PointerIntentTracker`] turns pointer samples into hover opens and closes,
//!   keeping a submenu open while the pointer travels diagonally toward it
//!   inside a [`SafePolygon`].
//! - [`KeyboardNavigator`] maps key presses to [`KeyAction`]s, mirrored by
//!   [`Direction`], and owns the typeahead buffer.
//! - [`FocusCoordinator`] holds the one focused item.
//! - [`RootDispatcher`] owns all of the above for one tree and is what hosts
//!   talk to.
//!
//! ## Host capabilities
//!
//! - [`MenuGeometry`] supplies menu and item rectangles in one coordinate space.
//!   Missing or empty rectangles simply disable the grace period.
//! - [`Scheduler`] arms and cancels delayed callbacks. [`TimerQueue`] is a
//!   deterministic implementation driven by explicit timestamps; hosts with a
//!   real event loop can implement the trait over their own timers and hand
//!   fired [`Timer`]s back through [`RootDispatcher::timer_fired`].
//!
//! ## Example
//!
//! ```rust
//! use understory_menu::{
//!     Item, MenuConfig, MenuNode, MenuTree, OpenReason, PointerSample, PointerTarget,
//!     RectTable, RootDispatcher, TimerQueue,
//! };
//! use kurbo::Rect;
//!
//! let mut tree = MenuTree::new();
//! tree.insert(MenuNode::root(
//!     "root",
//!     vec![
//!         Item::trigger("bookmarks", "Bookmarks", "bm"),
//!         Item::normal("new-tab", "New Tab"),
//!     ],
//! ))
//! .unwrap();
//! tree.insert(MenuNode::submenu("bm", "root", vec![Item::normal("inbox", "Inbox")]))
//!     .unwrap();
//!
//! let mut geometry = RectTable::new();
//! geometry
//!     .set_menu("root", Rect::new(0.0, 0.0, 100.0, 40.0))
//!     .set_item("root", "bookmarks", Rect::new(0.0, 0.0, 100.0, 20.0))
//!     .set_item("root", "new-tab", Rect::new(0.0, 20.0, 100.0, 40.0))
//!     .set_menu("bm", Rect::new(100.0, 0.0, 200.0, 100.0));
//!
//! let mut timers = TimerQueue::new(0);
//! let mut menu = RootDispatcher::new(tree, MenuConfig::default());
//! menu.open_root("root", OpenReason::Pointer, &mut timers);
//!
//! // Hovering a trigger opens its submenu immediately.
//! let bookmarks = PointerTarget::Item(("root", "bookmarks").into());
//! menu.pointer_move(PointerSample::new((50.0, 10.0), 0), bookmarks, &geometry, &mut timers);
//! menu.pointer_move(PointerSample::new((90.0, 18.0), 8), bookmarks, &geometry, &mut timers);
//! assert_eq!(menu.stack().as_slice(), &["root", "bm"]);
//!
//! // Cutting across "New Tab" on the way to the submenu keeps it open.
//! let new_tab = PointerTarget::Item(("root", "new-tab").into());
//! menu.pointer_move(PointerSample::new((96.0, 22.0), 16), new_tab, &geometry, &mut timers);
//! assert_eq!(menu.stack().as_slice(), &["root", "bm"]);
//!
//! // If the pointer stalls there, the grace timer closes it.
//! for timer in timers.advance_to(1_000) {
//!     menu.timer_fired(timer, &geometry, &mut timers);
//! }
//! assert_eq!(menu.stack().as_slice(), &["root"]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: forwards to `kurbo/libm` for `no_std` targets.
//!
//! Diagnostics go through the [`log`] facade at `debug` and `trace` levels.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod config;
pub mod dispatcher;
pub mod focus;
pub mod geometry;
pub mod intent;
pub mod keyboard;
pub mod polygon;
pub mod stack;
pub mod timer;
pub mod tree;
pub mod types;

pub use config::MenuConfig;
pub use dispatcher::{RootDispatcher, Update};
pub use focus::{FocusCoordinator, Traverse};
pub use geometry::{MenuGeometry, NoGeometry, RectTable};
pub use intent::{GraceIntent, PointerContext, PointerIntentTracker};
pub use keyboard::{KeyAction, KeyContext, KeyboardNavigator, Typeahead, TypeaheadMatch};
pub use polygon::SafePolygon;
pub use stack::MenuStack;
pub use timer::{Scheduler, Timer, TimerQueue};
pub use tree::{MenuTree, MenuTreeError};
pub use types::{
    Direction, Item, ItemKind, ItemRef, Key, KeyPress, Modifiers, MenuNode, OpenReason,
    PointerSample, PointerTarget, Side,
};
