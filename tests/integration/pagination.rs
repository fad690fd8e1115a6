//! Placement behavior: stacking, column wrap, page breaks and start directives.

use super::test_utils::{body, bounds, buttons, memory_session, metrics};
use frameflow::flow::{FlowSettings, Paginator};
use frameflow::item::Item;
use frameflow::nav::NavRole;
use frameflow::store::{FrameStore, MemoryFrameStore};
use frameflow::types::{Point, Size};
use std::path::Path;
use std::sync::Arc;

#[test]
fn test_same_item_twice_stacks_without_overlap() {
    let (_, mut paginator) = memory_session(false);
    let item = Item::text("repeated line");

    let first = paginator.place(item.clone(), false).unwrap();
    let second = paginator.place(item, false).unwrap();

    let (a, b) = (bounds(&first.item), bounds(&second.item));
    assert_eq!(a.bottom, b.top);
    assert!(!a.overlaps(&b));
    assert_ne!(first.item.id, second.item.id);
}

fn half_plus_one(paginator: &Paginator, width: i32) -> Item {
    let available = paginator.vertical_limit().unwrap() - paginator.cursor().pen.y;
    Item::rule(Size::new(width, available / 2 + 1))
}

#[test]
fn test_column_wrap_instead_of_new_page() {
    let (_, mut paginator) = memory_session(true);
    let start = paginator.cursor().start;
    let item = half_plus_one(&paginator, 200);

    let first = paginator.place(item.clone(), false).unwrap();
    let second = paginator.place(item, false).unwrap();

    assert_eq!(second.spawned, 0);
    assert_eq!(second.page, "notes1");
    assert_eq!(paginator.chain().len(), 1);

    let (a, b) = (bounds(&first.item), bounds(&second.item));
    assert_eq!(b.left, a.right + FlowSettings::default().gutter);
    assert_eq!(b.top, start.y);
}

#[test]
fn test_single_column_overflow_spawns_one_linked_page() {
    let (_, mut paginator) = memory_session(false);
    let item = half_plus_one(&paginator, 200);

    paginator.place(item.clone(), false).unwrap();
    let second = paginator.place(item, false).unwrap();

    assert_eq!(second.spawned, 1);
    assert_eq!(second.page, "notes2");
    assert_eq!(paginator.chain().len(), 2);

    let chain = paginator.chain();
    let prior = chain.page(0).unwrap();
    let next = buttons(prior, NavRole::Next);
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].link.as_deref(), Some("notes2"));

    let spawned = chain.page(1).unwrap();
    let previous = buttons(spawned, NavRole::Previous);
    let first = buttons(spawned, NavRole::First);
    assert_eq!(previous.len(), 1);
    assert_eq!(previous[0].link.as_deref(), Some("notes1"));
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].link.as_deref(), Some(paginator.first_page_name()));
    assert_eq!(body(spawned).len(), 1);
}

#[test]
fn test_too_wide_column_falls_back_to_new_page() {
    let (_, mut paginator) = memory_session(true);
    let item = half_plus_one(&paginator, 600);

    paginator.place(item.clone(), false).unwrap();
    let second = paginator.place(item, false).unwrap();
    assert_eq!(second.spawned, 1);
    assert_eq!(second.page, "notes2");
}

#[test]
fn test_spawned_page_starts_below_its_title() {
    let (_, mut paginator) = memory_session(false);
    let item = half_plus_one(&paginator, 200);
    paginator.place(item.clone(), false).unwrap();
    let placed = paginator.place(item, false).unwrap();

    let page = paginator.current_page();
    let title = bounds(&page.title);
    let b = bounds(&placed.item);
    assert_eq!(b.top, title.bottom);
    assert_eq!(b.left, page.title.position.x + FlowSettings::default().title_indent);
}

#[test]
fn test_content_stays_above_navigation_band() {
    let (_, mut paginator) = memory_session(false);
    for i in 0..200 {
        paginator.place(Item::text(format!("line {}", i)), false).unwrap();
    }
    let chain = paginator.chain();
    assert!(chain.len() > 2);
    for page in chain.pages() {
        let band = buttons(page, NavRole::Previous)
            .first()
            .map(|b| bounds(b).top)
            .unwrap_or(i32::MAX);
        for item in body(page) {
            assert!(bounds(item).bottom <= band, "{} runs under the buttons", page.name);
        }
    }
}

#[test]
fn test_oversize_item_is_placed_on_fresh_page() {
    let (_, mut paginator) = memory_session(false);
    let tall = Item::rule(Size::new(100, 2000));

    let placed = paginator.place(tall, false).unwrap();
    assert_eq!(placed.spawned, 0);
    assert_eq!(placed.page, "notes1");

    let after = paginator.place(Item::text("after"), false).unwrap();
    assert_eq!(after.spawned, 1);
}

#[test]
fn test_persist_now_writes_through() {
    let (store, mut paginator) = memory_session(false);
    let placed = paginator.place(Item::text("durable"), true).unwrap();

    let stored = store.load("notes1").unwrap().unwrap();
    assert_eq!(stored.item(placed.item.id), Some(&placed.item));
}

fn resume_with_first_item(text: &str, at: Point) -> Paginator {
    let store = Arc::new(MemoryFrameStore::new());
    let mut page = store.create_frameset("draft", Path::new(""), false).unwrap();
    let mut marker = Item::text(text);
    marker.position = at;
    page.push(marker);
    store.persist(&page, false).unwrap();

    let page = store.load("draft1").unwrap().unwrap();
    Paginator::resume(store, Arc::new(metrics()), FlowSettings::default(), page, false).unwrap()
}

#[test]
fn test_bare_start_marker_sets_origin() {
    let at = Point::new(400, 300);
    let mut paginator = resume_with_first_item("@START", at);

    assert_eq!(paginator.cursor().pen, at);
    assert!(paginator.current_page().items().is_empty());

    let placed = paginator.place(Item::text("here"), false).unwrap();
    let b = bounds(&placed.item);
    assert_eq!((b.left, b.top), (at.x, at.y));
}

#[test]
fn test_start_marker_with_text_keeps_item() {
    let paginator = resume_with_first_item("@start: Chapter one", Point::new(400, 300));

    let items = paginator.current_page().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].as_text(), Some("Chapter one"));

    // The kept item is body content; flow resumes below it at the default x.
    let cursor = paginator.cursor();
    assert_eq!(cursor.pen.x, cursor.start.x);
    assert_eq!(cursor.pen.y, bounds(&items[0]).bottom);
}

#[test]
fn test_ordinary_first_item_is_untouched() {
    let paginator = resume_with_first_item("@startled reader", Point::new(400, 300));
    let item = &paginator.current_page().items()[0];
    assert_eq!(item.as_text(), Some("@startled reader"));
    assert_eq!(paginator.cursor().pen.y, bounds(item).bottom);
}

#[test]
fn test_spacing_before_first_item_still_respects_band() {
    let (_, mut paginator) = memory_session(false);
    paginator.advance_spacing(10_000).unwrap();

    let placed = paginator.place(Item::text("first line"), false).unwrap();
    assert_eq!(placed.spawned, 1);
    assert_eq!(placed.page, "notes2");
    assert!(bounds(&placed.item).bottom <= paginator.vertical_limit().unwrap());
    assert!(body(paginator.chain().first()).is_empty());
}

#[test]
fn test_low_start_origin_breaks_instead_of_straddling() {
    let mut paginator = resume_with_first_item("@start", Point::new(400, 740));
    let limit = paginator.vertical_limit().unwrap();
    assert!(paginator.cursor().pen.y + 24 > limit);

    let placed = paginator.place(Item::text("below the marker"), false).unwrap();
    assert_eq!(placed.spawned, 1);
    assert_eq!(placed.page, "draft2");
    assert!(bounds(&placed.item).bottom <= paginator.vertical_limit().unwrap());
}
