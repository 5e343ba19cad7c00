// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root dispatcher: the single entry point for host events.
//!
//! A [`RootDispatcher`] owns one [`MenuTree`] together with its open stack, focus,
//! keyboard navigator, and pointer intent tracker. Hosts feed it pre-resolved
//! pointer targets, key presses, and timer fires, and read back an [`Update`].
//!
//! Global rules live here:
//! - A pointer-down outside every open menu closes the whole stack.
//! - Activating an enabled non-trigger item reports it and closes the whole stack.
//! - Focus never outlives the menu it points into.
//! - A typeahead buffer never outlives the menu it is scoped to.

use core::fmt::Debug;
use core::hash::Hash;

use crate::config::MenuConfig;
use crate::focus::FocusCoordinator;
use crate::geometry::MenuGeometry;
use crate::intent::{PointerContext, PointerIntentTracker, hover_item};
use crate::keyboard::{KeyAction, KeyContext, KeyboardNavigator};
use crate::stack::MenuStack;
use crate::timer::{Scheduler, Timer};
use crate::tree::MenuTree;
use crate::types::{Direction, ItemKind, ItemRef, KeyPress, OpenReason, PointerSample, PointerTarget};

/// What an event did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Update<K> {
    /// Item activated by this event. The stack is already closed when this is set.
    pub selected: Option<ItemRef<K>>,
    /// The open stack changed.
    pub stack_changed: bool,
    /// Logical focus changed.
    pub focus_changed: bool,
    /// The event was consumed by the menu system and should not propagate.
    pub handled: bool,
}

impl<K> Default for Update<K> {
    fn default() -> Self {
        Self {
            selected: None,
            stack_changed: false,
            focus_changed: false,
            handled: false,
        }
    }
}

impl<K> Update<K> {
    /// An update for an event the engine consumed.
    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    /// Returns `true` if anything observable changed.
    pub fn changed(&self) -> bool {
        self.stack_changed || self.focus_changed || self.selected.is_some()
    }
}

/// Event router and state owner for one menu tree.
///
/// ```rust
/// use understory_menu::{
///     Item, Key, MenuConfig, MenuNode, MenuTree, OpenReason, RootDispatcher, TimerQueue,
/// };
///
/// let mut tree = MenuTree::new();
/// tree.insert(MenuNode::root(
///     "root",
///     vec![
///         Item::normal("new-tab", "New Tab"),
///         Item::trigger("bookmarks", "Bookmarks", "bm"),
///     ],
/// ))
/// .unwrap();
/// tree.insert(MenuNode::submenu("bm", "root", vec![Item::normal("inbox", "Inbox")]))
///     .unwrap();
///
/// let mut timers = TimerQueue::new(0);
/// let mut menu = RootDispatcher::new(tree, MenuConfig::default());
/// menu.open_root("root", OpenReason::Keyboard, &mut timers);
///
/// menu.key_down(Key::ArrowDown.into(), &mut timers);
/// menu.key_down(Key::ArrowRight.into(), &mut timers);
/// assert_eq!(menu.stack().as_slice(), &["root", "bm"]);
///
/// let update = menu.key_down(Key::Enter.into(), &mut timers);
/// assert_eq!(update.selected.map(|s| s.item), Some("inbox"));
/// assert!(menu.stack().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct RootDispatcher<K> {
    tree: MenuTree<K>,
    stack: MenuStack<K>,
    focus: FocusCoordinator<K>,
    navigator: KeyboardNavigator<K>,
    tracker: PointerIntentTracker<K>,
    config: MenuConfig,
    direction: Direction,
}

impl<K: Copy + Eq + Hash + Debug> RootDispatcher<K> {
    /// Create a dispatcher with nothing open.
    pub fn new(tree: MenuTree<K>, config: MenuConfig) -> Self {
        Self {
            tree,
            stack: MenuStack::new(),
            focus: FocusCoordinator::new(),
            navigator: KeyboardNavigator::new(),
            tracker: PointerIntentTracker::new(),
            config,
            direction: Direction::default(),
        }
    }

    /// The menu tree.
    pub fn tree(&self) -> &MenuTree<K> {
        &self.tree
    }

    /// Open menus, outermost first.
    pub fn stack(&self) -> &MenuStack<K> {
        &self.stack
    }

    /// The focused item.
    pub fn focus(&self) -> Option<ItemRef<K>> {
        self.focus.target()
    }

    /// Tuning constants.
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Reading direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Set the reading direction used by subsequent events.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Current typeahead buffer.
    pub fn typeahead(&self) -> &str {
        self.navigator.typeahead().buffer()
    }

    /// Pointer trajectory state.
    pub fn pointer_intent(&self) -> &PointerIntentTracker<K> {
        &self.tracker
    }

    /// Open `menu` as the root, replacing anything open.
    ///
    /// A keyboard open focuses the first enabled item; a pointer open leaves
    /// nothing focused. Unknown menus are ignored.
    pub fn open_root<S: Scheduler<K> + ?Sized>(
        &mut self,
        menu: K,
        reason: OpenReason,
        timers: &mut S,
    ) -> Update<K> {
        let Some(node) = self.tree.get(menu) else {
            log::debug!("open_root: unknown menu {menu:?}");
            return Update::default();
        };
        self.tracker.reset(timers);
        let mut update = Update::handled();
        update.stack_changed = self.stack.open(menu, None);
        update.focus_changed = match reason {
            OpenReason::Keyboard => self.focus.focus_first(node),
            OpenReason::Pointer => self.focus.clear(),
        };
        log::debug!("opened root {menu:?} via {reason:?}");
        self.settle(update, timers)
    }

    /// Close every menu.
    pub fn close<S: Scheduler<K> + ?Sized>(&mut self, timers: &mut S) -> Update<K> {
        let update = self.close_all();
        self.settle(update, timers)
    }

    /// Feed a pointer sample over a pre-resolved target.
    pub fn pointer_move<G, S>(
        &mut self,
        sample: PointerSample,
        target: PointerTarget<K>,
        geometry: &G,
        timers: &mut S,
    ) -> Update<K>
    where
        G: MenuGeometry<K> + ?Sized,
        S: Scheduler<K> + ?Sized,
    {
        if self.stack.is_empty() {
            return Update::default();
        }
        let mut cx = PointerContext {
            tree: &self.tree,
            stack: &mut self.stack,
            geometry,
            timers: &mut *timers,
            direction: self.direction,
            config: &self.config,
        };
        let stack_changed = self.tracker.pointer_move(sample, target, &mut cx);
        let update = Update {
            stack_changed,
            handled: self.is_open_target(target),
            ..Update::default()
        };
        self.settle(update, timers)
    }

    /// A pointer button went down over `target`.
    ///
    /// Outside every open menu this closes the whole stack.
    pub fn pointer_down<S: Scheduler<K> + ?Sized>(
        &mut self,
        target: PointerTarget<K>,
        timers: &mut S,
    ) -> Update<K> {
        if self.stack.is_empty() {
            return Update::default();
        }
        if !self.is_open_target(target) {
            log::debug!("pointer down outside; closing");
            // Outside interactions are not consumed; the host may act on them too.
            let update = Update {
                handled: false,
                ..self.close_all()
            };
            return self.settle(update, timers);
        }
        Update::handled()
    }

    /// Activate `target` with the pointer.
    ///
    /// - Enabled item: selected, then the whole stack closes.
    /// - Enabled trigger: its submenu opens without moving focus.
    /// - Disabled kinds: nothing.
    pub fn click<S: Scheduler<K> + ?Sized>(
        &mut self,
        target: PointerTarget<K>,
        timers: &mut S,
    ) -> Update<K> {
        if !self.is_open_target(target) {
            return self.pointer_down(target, timers);
        }
        let PointerTarget::Item(item) = target else {
            return Update::handled();
        };
        let Some(kind) = self.tree.item(item).map(|it| it.kind) else {
            return Update::handled();
        };
        let update = match kind {
            ItemKind::Normal => self.select(item),
            ItemKind::Trigger => Update {
                stack_changed: hover_item(item, &self.tree, &mut self.stack),
                ..Update::handled()
            },
            ItemKind::Disabled | ItemKind::DisabledTrigger => Update::handled(),
        };
        self.settle(update, timers)
    }

    /// Resolve and apply a key press.
    pub fn key_down<S: Scheduler<K> + ?Sized>(
        &mut self,
        press: KeyPress,
        timers: &mut S,
    ) -> Update<K> {
        let ctx = KeyContext {
            tree: &self.tree,
            stack: &self.stack,
            focus: self.focus.target(),
            direction: self.direction,
            loop_focus: self.config.loop_focus,
        };
        let action = self.navigator.key_down(press, &ctx);
        log::trace!("key {press:?} -> {action:?}");
        let update = self.apply(action, timers);
        self.settle(update, timers)
    }

    /// Move logical focus to `item`, as when the host element receives focus.
    ///
    /// The item's menu must be open. Deeper menus not opened by `item` close;
    /// nothing opens.
    pub fn focus_item<S: Scheduler<K> + ?Sized>(
        &mut self,
        item: ItemRef<K>,
        timers: &mut S,
    ) -> Update<K> {
        let update = self.move_focus(item);
        self.settle(update, timers)
    }

    /// Deliver a timer armed through `timers`.
    pub fn timer_fired<G, S>(&mut self, timer: Timer<K>, geometry: &G, timers: &mut S) -> Update<K>
    where
        G: MenuGeometry<K> + ?Sized,
        S: Scheduler<K> + ?Sized,
    {
        let update = match timer {
            Timer::GraceClose { submenu } => {
                let mut cx = PointerContext {
                    tree: &self.tree,
                    stack: &mut self.stack,
                    geometry,
                    timers: &mut *timers,
                    direction: self.direction,
                    config: &self.config,
                };
                Update {
                    stack_changed: self.tracker.grace_expired(submenu, &mut cx),
                    ..Update::handled()
                }
            }
            Timer::TypeaheadReset { menu } => {
                if self.navigator.typeahead().is_active_in(menu) {
                    self.navigator.reset_typeahead();
                }
                Update::handled()
            }
        };
        self.settle(update, timers)
    }

    fn apply<S: Scheduler<K> + ?Sized>(&mut self, action: KeyAction<K>, timers: &mut S) -> Update<K> {
        match action {
            KeyAction::OpenSubmenu { trigger, submenu } => {
                if !self.stack.contains(trigger.menu) {
                    return Update::default();
                }
                self.tracker.cancel_grace(timers);
                let mut update = Update::handled();
                update.stack_changed = self.stack.open(submenu, Some(trigger.menu));
                update.focus_changed = match self.tree.get(submenu) {
                    Some(node) => self.focus.focus_first(node),
                    None => self.focus.clear(),
                };
                update
            }
            KeyAction::CloseSubmenu { submenu, trigger } => {
                self.tracker.cancel_grace(timers);
                Update {
                    stack_changed: self.stack.close(submenu),
                    focus_changed: self.focus.set(trigger),
                    ..Update::handled()
                }
            }
            KeyAction::Select(item) => self.select(item),
            KeyAction::CloseAll => self.close_all(),
            KeyAction::Focus(item) => self.move_focus(item),
            KeyAction::Typeahead { menu, focus } => {
                let mut update = match focus {
                    Some(item) => self.move_focus(ItemRef::new(menu, item)),
                    None => Update::handled(),
                };
                update.handled = true;
                let reset = Timer::TypeaheadReset { menu };
                if self.navigator.typeahead().is_active_in(menu) {
                    timers.schedule(reset, self.config.typeahead_timeout_ms);
                } else {
                    timers.cancel(reset);
                }
                update
            }
            KeyAction::Ignore => Update::default(),
        }
    }

    fn select(&mut self, item: ItemRef<K>) -> Update<K> {
        log::debug!("selected {item:?}");
        Update {
            selected: Some(item),
            ..self.close_all()
        }
    }

    fn close_all(&mut self) -> Update<K> {
        Update {
            stack_changed: self.stack.close_all(),
            focus_changed: self.focus.clear(),
            ..Update::handled()
        }
    }

    fn move_focus(&mut self, item: ItemRef<K>) -> Update<K> {
        let (Some(depth), Some(it)) = (self.stack.depth_of(item.menu), self.tree.item(item)) else {
            return Update::default();
        };
        let keeps_child = match (it.opens(), self.stack.get(depth + 1)) {
            (Some(&sub), Some(open)) => sub == open,
            _ => false,
        };
        let stack_changed = if keeps_child {
            false
        } else {
            self.stack.close_from(depth + 1)
        };
        Update {
            stack_changed,
            focus_changed: self.focus.set(item),
            ..Update::handled()
        }
    }

    fn is_open_target(&self, target: PointerTarget<K>) -> bool {
        target.menu().is_some_and(|m| self.stack.contains(m))
    }

    /// Re-establish cross-component invariants after a mutation.
    fn settle<S: Scheduler<K> + ?Sized>(&mut self, mut update: Update<K>, timers: &mut S) -> Update<K> {
        update.focus_changed |= self.focus.retain_open(&self.stack);
        if let Some(menu) = self.navigator.typeahead().menu()
            && !self.stack.contains(menu)
        {
            self.navigator.reset_typeahead();
            timers.cancel(Timer::TypeaheadReset { menu });
        }
        if self.stack.is_empty() {
            self.tracker.reset(timers);
        }
        update
    }
}
