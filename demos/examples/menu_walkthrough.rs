// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted walkthrough of a dropdown with nested submenus.
//!
//! This example shows how a host drives `understory_menu`:
//! - resolve what is under the pointer itself (here, a tiny rect lookup),
//! - hand samples, keys, and fired timers to a `RootDispatcher`,
//! - re-render from `stack()` and `focus()` whenever an `Update` says so.
//!
//! Run:
//! - `cargo run -p understory_demos --example menu_walkthrough`

use kurbo::{Point, Rect};
use understory_menu::{
    Item, ItemRef, Key, MenuConfig, MenuNode, MenuTree, OpenReason, PointerSample,
    PointerTarget, RectTable, RootDispatcher, TimerQueue, Update,
};

type Id = &'static str;

/// Menu bounds plus item rows, in surface coordinates.
struct Layout {
    table: RectTable<Id>,
    menus: Vec<(Id, Rect)>,
    items: Vec<(ItemRef<Id>, Rect)>,
}

impl Layout {
    fn new() -> Self {
        Self {
            table: RectTable::new(),
            menus: Vec::new(),
            items: Vec::new(),
        }
    }

    fn column(&mut self, menu: Id, x: f64, top: f64, ids: &[Id]) {
        let rect = Rect::new(x, top, x + 140.0, top + 24.0 * ids.len() as f64);
        self.table.set_menu(menu, rect);
        self.menus.push((menu, rect));
        for (row, &id) in ids.iter().enumerate() {
            let y = top + 24.0 * row as f64;
            let r = Rect::new(x, y, x + 140.0, y + 24.0);
            self.table.set_item(menu, id, r);
            self.items.push((ItemRef::new(menu, id), r));
        }
    }

    /// Deepest open menu wins, like a stacking order would.
    fn hit(&self, open: &[Id], p: Point) -> PointerTarget<Id> {
        for menu in open.iter().rev() {
            let inside = self
                .menus
                .iter()
                .any(|(m, r)| m == menu && r.contains(p));
            if !inside {
                continue;
            }
            return match self
                .items
                .iter()
                .find(|(i, r)| i.menu == *menu && r.contains(p))
            {
                Some(&(item, _)) => PointerTarget::Item(item),
                None => PointerTarget::Menu(*menu),
            };
        }
        PointerTarget::Outside
    }
}

fn report(step: &str, menu: &RootDispatcher<Id>, update: Update<Id>) {
    println!("{step}");
    println!("  open:  {:?}", menu.stack().as_slice());
    println!("  focus: {:?}", menu.focus().map(|f| f.item));
    if let Some(selected) = update.selected {
        println!("  selected {:?}", selected.item);
    }
}

fn main() {
    let mut tree = MenuTree::new();
    let menus = [
        MenuNode::root(
            "root",
            vec![
                Item::normal("new-tab", "New Tab"),
                Item::trigger("bookmarks", "Bookmarks", "bm"),
                Item::trigger("tools", "Tools", "tools"),
                Item::disabled("print", "Print…"),
            ],
        ),
        MenuNode::submenu(
            "bm",
            "root",
            vec![
                Item::normal("inbox", "Inbox"),
                Item::normal("calendar", "Calendar"),
                Item::normal("notion", "Notion"),
            ],
        ),
        MenuNode::submenu("tools", "root", vec![Item::normal("devtools", "Developer Tools")]),
    ];
    for node in menus {
        if let Err(err) = tree.insert(node) {
            eprintln!("bad menu tree: {err}");
            return;
        }
    }

    let mut layout = Layout::new();
    layout.column("root", 0.0, 0.0, &["new-tab", "bookmarks", "tools", "print"]);
    layout.column("bm", 140.0, 24.0, &["inbox", "calendar", "notion"]);
    layout.column("tools", 140.0, 48.0, &["devtools"]);

    let mut timers = TimerQueue::new(0);
    let mut menu = RootDispatcher::new(tree, MenuConfig::default());
    let update = menu.open_root("root", OpenReason::Pointer, &mut timers);
    report("open with the pointer", &menu, update);

    // A diagonal path from "Bookmarks" toward its submenu, crossing "Tools".
    let path = [(40.0, 36.0), (120.0, 44.0), (136.0, 52.0), (150.0, 60.0)];
    for (i, (x, y)) in path.into_iter().enumerate() {
        let now = 16 * i as u64;
        for timer in timers.advance_to(now) {
            menu.timer_fired(timer, &layout.table, &mut timers);
        }
        let p = Point::new(x, y);
        let target = layout.hit(menu.stack().as_slice(), p);
        let update = menu.pointer_move(PointerSample::new(p, now), target, &layout.table, &mut timers);
        report(&format!("pointer at ({x}, {y}) over {target:?}"), &menu, update);
    }

    // Keyboard from here on.
    let update = menu.focus_item(ItemRef::new("bm", "calendar"), &mut timers);
    report("focus Calendar", &menu, update);
    let update = menu.key_down(Key::Character('n').into(), &mut timers);
    report("type 'n'", &menu, update);
    let update = menu.key_down(Key::ArrowLeft.into(), &mut timers);
    report("ArrowLeft", &menu, update);
    let update = menu.key_down(Key::ArrowDown.into(), &mut timers);
    report("ArrowDown", &menu, update);
    let update = menu.key_down(Key::Enter.into(), &mut timers);
    report("Enter", &menu, update);
    let update = menu.key_down(Key::Enter.into(), &mut timers);
    report("Enter", &menu, update);
}
