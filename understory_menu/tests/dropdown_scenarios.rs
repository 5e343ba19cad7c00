// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios for a dropdown with nested submenus.
//!
//! The layout below is written for left-to-right. Right-to-left runs mirror every
//! rectangle and every pointer position around `x = 250`, so the same pointer
//! scripts exercise the mirrored geometry.
//!
//! ```text
//! root (0..160)        bm (160..320)
//! New Tab
//! New Window
//! Bookmarks →          Inbox
//! Tools →              Calendar
//! History → (off)      WorkOS →      workos is flipped to the left
//! Print… (off)         Notion        (0..150, y 80..140) by collision
//! ```

use kurbo::{Point, Rect};
use understory_menu::{
    Direction, Item, ItemRef, Key, KeyPress, MenuConfig, MenuNode, MenuTree, Modifiers,
    OpenReason, PointerSample, PointerTarget, RectTable, RootDispatcher, Timer, TimerQueue,
};

type Id = &'static str;

const MIRROR_AXIS: f64 = 250.0;
const STEP_MS: u64 = 8;

/// `(grace_close_delay_ms, trend_samples)` pairs the grace scenarios run under.
const GRACE_SETTINGS: &[(u64, usize)] = &[(300, 2), (150, 3)];

fn tree() -> MenuTree<Id> {
    let mut tree = MenuTree::new();
    tree.insert(MenuNode::root(
        "root",
        vec![
            Item::normal("new-tab", "New Tab"),
            Item::normal("new-window", "New Window"),
            Item::trigger("bookmarks", "Bookmarks →", "bm"),
            Item::trigger("tools", "Tools →", "tools"),
            Item::disabled_trigger("history", "History →", "hist"),
            Item::disabled("print", "Print…"),
        ],
    ))
    .unwrap();
    tree.insert(MenuNode::submenu(
        "bm",
        "root",
        vec![
            Item::normal("inbox", "Inbox"),
            Item::normal("calendar", "Calendar"),
            Item::trigger("workos", "WorkOS →", "workos"),
            Item::normal("notion", "Notion"),
        ],
    ))
    .unwrap();
    tree.insert(MenuNode::submenu(
        "workos",
        "bm",
        vec![
            Item::normal("stitches", "Stitches"),
            Item::normal("composer", "Composer"),
            Item::normal("radix", "Radix"),
        ],
    ))
    .unwrap();
    tree.insert(MenuNode::submenu(
        "tools",
        "root",
        vec![
            Item::normal("devtools", "Developer Tools"),
            Item::normal("task-manager", "Task Manager"),
        ],
    ))
    .unwrap();
    tree.insert(MenuNode::submenu(
        "hist",
        "root",
        vec![Item::normal("today", "Today")],
    ))
    .unwrap();
    tree
}

/// `(menu, x0, x1, top, item ids)`; every item row is 20 units tall.
const LAYOUT: &[(Id, f64, f64, f64, &[Id])] = &[
    (
        "root",
        0.0,
        160.0,
        0.0,
        &["new-tab", "new-window", "bookmarks", "tools", "history", "print"],
    ),
    ("bm", 160.0, 320.0, 40.0, &["inbox", "calendar", "workos", "notion"]),
    ("workos", 0.0, 150.0, 80.0, &["stitches", "composer", "radix"]),
    ("tools", 160.0, 320.0, 60.0, &["devtools", "task-manager"]),
    ("hist", 160.0, 320.0, 80.0, &["today"]),
];

struct Scenario {
    menu: RootDispatcher<Id>,
    timers: TimerQueue<Id>,
    geometry: RectTable<Id>,
    menus: Vec<(Id, Rect)>,
    items: Vec<(ItemRef<Id>, Rect)>,
    mirrored: bool,
    now: u64,
}

impl Scenario {
    fn new(direction: Direction) -> Self {
        Self::with_config(direction, MenuConfig::default())
    }

    fn with_config(direction: Direction, config: MenuConfig) -> Self {
        let mirrored = direction == Direction::Rtl;
        let flip = |r: Rect| {
            if mirrored {
                Rect::new(mirror(r.x1), r.y0, mirror(r.x0), r.y1)
            } else {
                r
            }
        };
        let mut geometry = RectTable::new();
        let mut menus = Vec::new();
        let mut items = Vec::new();
        for &(menu, x0, x1, top, ids) in LAYOUT {
            let bottom = top + 20.0 * ids.len() as f64;
            let rect = flip(Rect::new(x0, top, x1, bottom));
            geometry.set_menu(menu, rect);
            menus.push((menu, rect));
            for (row, &id) in ids.iter().enumerate() {
                let y = top + 20.0 * row as f64;
                let rect = flip(Rect::new(x0, y, x1, y + 20.0));
                geometry.set_item(menu, id, rect);
                items.push((ItemRef::new(menu, id), rect));
            }
        }
        let mut menu = RootDispatcher::new(tree(), config);
        menu.set_direction(direction);
        let mut timers = TimerQueue::new(0);
        menu.open_root("root", OpenReason::Pointer, &mut timers);
        Self {
            menu,
            timers,
            geometry,
            menus,
            items,
            mirrored,
            now: 0,
        }
    }

    fn point(&self, x: f64, y: f64) -> Point {
        if self.mirrored {
            Point::new(mirror(x), y)
        } else {
            Point::new(x, y)
        }
    }

    /// Hit test like a host would: deepest open menu first.
    fn hit(&self, p: Point) -> PointerTarget<Id> {
        for menu in self.menu.stack().as_slice().iter().rev() {
            let Some(&(_, rect)) = self.menus.iter().find(|(m, _)| m == menu) else {
                continue;
            };
            if !rect.contains(p) {
                continue;
            }
            return self
                .items
                .iter()
                .find(|(r, rect)| r.menu == *menu && rect.contains(p))
                .map_or(PointerTarget::Menu(*menu), |&(r, _)| PointerTarget::Item(r));
        }
        PointerTarget::Outside
    }

    /// Let time pass, delivering timers as a host event loop would.
    fn wait(&mut self, ms: u64) {
        self.now += ms;
        for timer in self.timers.advance_to(self.now) {
            self.menu.timer_fired(timer, &self.geometry, &mut self.timers);
        }
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.wait(STEP_MS);
        let p = self.point(x, y);
        let target = self.hit(p);
        let sample = PointerSample::new(p, self.now);
        self.menu
            .pointer_move(sample, target, &self.geometry, &mut self.timers);
    }

    fn hover(&mut self, menu: Id, item: Id) {
        let (_, rect) = self
            .items
            .iter()
            .find(|(r, _)| *r == ItemRef::new(menu, item))
            .copied()
            .unwrap();
        let c = rect.center();
        let x = if self.mirrored { mirror(c.x) } else { c.x };
        self.move_to(x, c.y);
    }

    /// Enter the item at its far edge, cross to its near bottom corner, and leave.
    fn exit_backward(&mut self, menu: Id, item: Id, out: (f64, f64)) {
        let rect = self.layout_rect(menu, item);
        self.move_to(rect.x1 - 5.0, rect.center().y);
        self.move_to(rect.x0 + 5.0, rect.y1 - 1.0);
        self.move_to(out.0, out.1);
    }

    /// Enter the item at its near edge, cross to its far bottom corner, and leave.
    fn exit_forward(&mut self, menu: Id, item: Id, out: (f64, f64)) {
        let rect = self.layout_rect(menu, item);
        self.move_to(rect.x0 + 5.0, rect.center().y);
        self.move_to(rect.x1 - 5.0, rect.y1 - 1.0);
        self.move_to(out.0, out.1);
    }

    /// Item rectangle in unmirrored layout coordinates.
    fn layout_rect(&self, menu: Id, item: Id) -> Rect {
        let (_, x0, x1, top, ids) = LAYOUT.iter().find(|(m, ..)| *m == menu).copied().unwrap();
        let row = ids.iter().position(|&i| i == item).unwrap();
        let y = top + 20.0 * row as f64;
        Rect::new(x0, y, x1, y + 20.0)
    }

    fn click(&mut self, menu: Id, item: Id) -> Option<ItemRef<Id>> {
        self.menu
            .click(PointerTarget::Item(ItemRef::new(menu, item)), &mut self.timers)
            .selected
    }

    fn focus(&mut self, menu: Id, item: Id) {
        self.menu
            .focus_item(ItemRef::new(menu, item), &mut self.timers);
    }

    fn key(&mut self, key: Key) {
        self.menu.key_down(key.into(), &mut self.timers);
    }

    fn type_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.wait(STEP_MS);
            self.key(Key::Character(ch));
        }
    }

    fn grace_ms(&self) -> u64 {
        self.menu.config().grace_close_delay_ms
    }

    fn reopen(&mut self) {
        self.menu
            .open_root("root", OpenReason::Pointer, &mut self.timers);
    }

    fn open(&self) -> &[Id] {
        self.menu.stack().as_slice()
    }

    fn focused(&self) -> Option<ItemRef<Id>> {
        self.menu.focus()
    }
}

fn mirror(x: f64) -> f64 {
    2.0 * MIRROR_AXIS - x
}

fn both(f: impl Fn(Direction)) {
    f(Direction::Ltr);
    f(Direction::Rtl);
}

/// Run `f` in both directions under every entry of [`GRACE_SETTINGS`].
fn each_grace_setting(f: impl Fn(Scenario)) {
    for &(grace, trend) in GRACE_SETTINGS {
        let config = MenuConfig::default()
            .with_delays(grace, 1_000)
            .with_trend_samples(trend);
        both(|dir| f(Scenario::with_config(dir, config.clone())));
    }
}

#[test]
fn hovering_trigger_opens_without_focus() {
    both(|dir| {
        let mut s = Scenario::new(dir);
        s.hover("root", "bookmarks");
        assert_eq!(s.open(), &["root", "bm"], "{dir:?}");
        assert_eq!(s.focused(), None);
    });
}

#[test]
fn moving_into_submenu_and_back_keeps_it_open() {
    both(|dir| {
        let mut s = Scenario::new(dir);
        s.hover("root", "bookmarks");
        s.hover("bm", "inbox");
        s.hover("root", "bookmarks");
        assert_eq!(s.open(), &["root", "bm"], "{dir:?}");
    });
}

#[test]
fn leaving_trigger_away_closes_and_toward_keeps_open() {
    each_grace_setting(|mut s| {
        let dir = s.menu.direction();

        // Away from the submenu: out past the root's near edge.
        s.hover("root", "bookmarks");
        assert_eq!(s.open(), &["root", "bm"]);
        s.exit_backward("root", "bookmarks", (-3.0, 59.0));
        assert_eq!(s.open(), &["root"], "{dir:?}: away");

        // Toward: the diagonal cuts across "Tools →" without opening it.
        s.hover("root", "bookmarks");
        s.exit_forward("root", "bookmarks", (158.0, 61.0));
        assert_eq!(s.open(), &["root", "bm"], "{dir:?}: toward");
        assert!(s.menu.pointer_intent().grace().is_some());
        s.move_to(165.0, 63.0);
        assert!(s.menu.pointer_intent().grace().is_none());
        assert_eq!(s.open(), &["root", "bm"]);
    });
}

#[test]
fn collision_flipped_submenu_uses_its_real_side() {
    each_grace_setting(|mut s| {
        let dir = s.menu.direction();
        s.hover("root", "bookmarks");
        s.hover("bm", "calendar");

        // "WorkOS →" opens a submenu that sits on the reading-backward side.
        s.hover("bm", "workos");
        assert_eq!(s.open(), &["root", "bm", "workos"]);
        s.exit_forward("bm", "workos", (322.0, 99.0));
        assert_eq!(s.open(), &["root", "bm"], "{dir:?}: away");

        s.hover("bm", "workos");
        s.exit_backward("bm", "workos", (158.0, 99.0));
        assert_eq!(s.open(), &["root", "bm", "workos"], "{dir:?}: toward");
        s.move_to(140.0, 101.0);
        assert!(s.menu.pointer_intent().grace().is_none());
        assert_eq!(s.open(), &["root", "bm", "workos"]);
    });
}

#[test]
fn stalling_inside_the_polygon_hands_over_after_grace() {
    each_grace_setting(|mut s| {
        let dir = s.menu.direction();
        let grace = s.grace_ms();
        s.hover("root", "bookmarks");
        s.exit_forward("root", "bookmarks", (158.0, 61.0));
        assert_eq!(s.open(), &["root", "bm"]);

        // Parked over "Tools →": once the grace period lapses the hover applies.
        s.wait(grace - 1);
        assert_eq!(s.open(), &["root", "bm"], "{dir:?}, {grace} ms");
        s.wait(1);
        assert_eq!(s.open(), &["root", "tools"], "{dir:?}, {grace} ms");
    });
}

#[test]
fn jitter_inside_the_polygon_restarts_the_grace_period() {
    each_grace_setting(|mut s| {
        let dir = s.menu.direction();
        let grace = s.grace_ms();
        s.hover("root", "bookmarks");
        s.exit_forward("root", "bookmarks", (158.0, 61.0));

        // A small step back toward the trigger, still inside the wedge.
        s.move_to(157.0, 62.0);
        assert_eq!(s.open(), &["root", "bm"], "{dir:?}, {grace} ms");
        s.wait(grace - 1);
        assert_eq!(s.open(), &["root", "bm"], "{dir:?}, {grace} ms");
        s.wait(1);
        assert_eq!(s.open(), &["root", "tools"], "{dir:?}, {grace} ms");
    });
}

#[test]
fn drifting_off_the_menus_closes_after_grace() {
    each_grace_setting(|mut s| {
        let dir = s.menu.direction();
        let grace = s.grace_ms();
        s.hover("root", "bookmarks");
        s.exit_forward("root", "bookmarks", (158.0, 61.0));

        // Below the submenu's reach and outside every menu surface.
        s.move_to(165.0, 140.0);
        assert_eq!(s.open(), &["root", "bm"], "{dir:?}, {grace} ms");
        s.move_to(170.0, 150.0);
        s.wait(grace - 2 * STEP_MS - 1);
        assert_eq!(s.open(), &["root", "bm"], "{dir:?}, {grace} ms");
        s.wait(STEP_MS + 1);
        assert_eq!(s.open(), &["root"], "{dir:?}, {grace} ms");
    });
}

#[test]
fn hovering_any_parent_item_closes_submenu() {
    both(|dir| {
        for other in ["new-tab", "print", "tools", "history"] {
            let mut s = Scenario::new(dir);
            s.hover("root", "bookmarks");
            s.hover("bm", "inbox");
            s.hover("root", other);
            assert!(!s.menu.stack().contains("bm"), "{dir:?}: {other}");
            let expected: &[Id] = if other == "tools" {
                &["root", "tools"]
            } else {
                &["root"]
            };
            assert_eq!(s.open(), expected);
        }
    });
}

#[test]
fn returning_to_root_trigger_closes_unassociated_submenus() {
    both(|dir| {
        let mut s = Scenario::new(dir);
        s.hover("root", "bookmarks");
        s.hover("bm", "workos");
        s.hover("workos", "radix");
        s.hover("root", "bookmarks");
        assert_eq!(s.open(), &["root", "bm"], "{dir:?}");
    });
}

#[test]
fn clicking_items_or_outside_closes_everything() {
    let mut s = Scenario::new(Direction::Ltr);
    assert_eq!(s.click("root", "new-tab"), Some(ItemRef::new("root", "new-tab")));
    assert!(s.open().is_empty());

    s.reopen();
    s.hover("root", "bookmarks");
    assert_eq!(s.click("bm", "inbox"), Some(ItemRef::new("bm", "inbox")));
    assert!(s.open().is_empty());

    s.reopen();
    s.hover("root", "bookmarks");
    s.hover("bm", "workos");
    assert_eq!(s.open(), &["root", "bm", "workos"]);
    assert_eq!(s.click("workos", "radix"), Some(ItemRef::new("workos", "radix")));
    assert!(s.open().is_empty());

    s.reopen();
    s.move_to(400.0, 300.0);
    let update = s.menu.pointer_down(PointerTarget::Outside, &mut s.timers);
    assert!(update.stack_changed);
    assert!(s.open().is_empty());

    // Disabled entries swallow clicks.
    s.reopen();
    assert_eq!(s.click("root", "print"), None);
    assert_eq!(s.click("root", "history"), None);
    assert_eq!(s.open(), &["root"]);
}

#[test]
fn focusing_trigger_does_not_open() {
    let mut s = Scenario::new(Direction::Ltr);
    s.focus("root", "bookmarks");
    assert_eq!(s.open(), &["root"]);
    assert_eq!(s.focused(), Some(ItemRef::new("root", "bookmarks")));
}

#[test]
fn open_keys_focus_first_item() {
    let mut s = Scenario::new(Direction::Ltr);
    for key in [Key::Space, Key::Enter, Key::ArrowRight] {
        s.focus("root", "bookmarks");
        s.key(key);
        assert_eq!(s.focused(), Some(ItemRef::new("bm", "inbox")), "{key:?}");
        s.key(Key::ArrowLeft);
        assert_eq!(s.open(), &["root"]);
        assert_eq!(s.focused(), Some(ItemRef::new("root", "bookmarks")));
    }
}

#[test]
fn backward_arrow_closes_only_focused_submenu() {
    let mut s = Scenario::new(Direction::Ltr);
    s.focus("root", "bookmarks");
    s.key(Key::Enter);
    s.focus("bm", "workos");
    s.key(Key::Enter);
    assert_eq!(s.focused(), Some(ItemRef::new("workos", "stitches")));
    s.key(Key::ArrowLeft);
    assert_eq!(s.open(), &["root", "bm"]);
    assert_eq!(s.focused(), Some(ItemRef::new("bm", "workos")));
}

#[test]
fn forward_arrow_after_pointer_open_moves_focus_in() {
    let mut s = Scenario::new(Direction::Ltr);
    s.hover("root", "bookmarks");
    assert_eq!(s.focused(), None);
    s.focus("root", "bookmarks");
    assert_eq!(s.open(), &["root", "bm"]);
    s.key(Key::ArrowRight);
    assert_eq!(s.focused(), Some(ItemRef::new("bm", "inbox")));
}

#[test]
fn escape_and_activation_close_everything() {
    let mut s = Scenario::new(Direction::Ltr);
    s.focus("root", "new-window");
    s.key(Key::Escape);
    assert!(s.open().is_empty());
    assert_eq!(s.focused(), None);

    s.reopen();
    s.focus("root", "bookmarks");
    s.key(Key::Enter);
    s.key(Key::Escape);
    assert!(s.open().is_empty());

    s.reopen();
    s.focus("root", "bookmarks");
    s.key(Key::Enter);
    let update = s.menu.key_down(Key::Space.into(), &mut s.timers);
    assert_eq!(update.selected, Some(ItemRef::new("bm", "inbox")));
    assert!(s.open().is_empty());
}

#[test]
fn typeahead_is_scoped_to_active_menu() {
    let mut s = Scenario::new(Direction::Ltr);
    s.hover("root", "bookmarks");
    s.hover("bm", "workos");
    s.focus("workos", "stitches");
    s.type_str("Inbox");
    assert_eq!(s.focused(), Some(ItemRef::new("workos", "stitches")));

    s.hover("bm", "notion");
    s.focus("bm", "notion");
    assert_eq!(s.open(), &["root", "bm"]);
    s.type_str("Inbox");
    assert_eq!(s.focused(), Some(ItemRef::new("bm", "inbox")));
    assert_eq!(s.menu.typeahead(), "Inbox");

    // The buffer lapses after a quiet period.
    s.wait(1_000);
    assert_eq!(s.menu.typeahead(), "");
    assert!(!s.timers.is_pending(&Timer::TypeaheadReset { menu: "bm" }));
}

#[test]
fn command_modifiers_bypass_typeahead() {
    let mut s = Scenario::new(Direction::Ltr);
    s.focus("root", "new-tab");
    let press = KeyPress {
        key: Key::Character('b'),
        modifiers: Modifiers::CTRL,
    };
    assert!(!s.menu.key_down(press, &mut s.timers).handled);
    assert_eq!(s.focused(), Some(ItemRef::new("root", "new-tab")));
}

#[test]
fn rtl_arrows_are_mirrored() {
    let mut s = Scenario::new(Direction::Rtl);
    s.focus("root", "bookmarks");
    s.key(Key::ArrowLeft);
    assert_eq!(s.focused(), Some(ItemRef::new("bm", "inbox")));
    s.key(Key::ArrowRight);
    assert_eq!(s.open(), &["root"]);
    assert_eq!(s.focused(), Some(ItemRef::new("root", "bookmarks")));
}

#[test]
fn grace_without_geometry_closes_immediately() {
    let mut timers = TimerQueue::new(0);
    let mut menu = RootDispatcher::new(tree(), MenuConfig::default());
    menu.open_root("root", OpenReason::Pointer, &mut timers);
    let bookmarks = PointerTarget::Item(ItemRef::new("root", "bookmarks"));
    let tools = PointerTarget::Item(ItemRef::new("root", "tools"));
    let nowhere = understory_menu::NoGeometry;
    menu.pointer_move(PointerSample::new((10.0, 50.0), 0), bookmarks, &nowhere, &mut timers);
    menu.pointer_move(PointerSample::new((150.0, 59.0), 8), bookmarks, &nowhere, &mut timers);
    menu.pointer_move(PointerSample::new((155.0, 61.0), 16), tools, &nowhere, &mut timers);
    assert_eq!(menu.stack().as_slice(), &["root", "tools"]);
    assert!(menu.pointer_intent().grace().is_none());
}
