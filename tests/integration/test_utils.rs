//! Shared helpers for integration tests.

use frameflow::flow::{FlowSettings, Paginator, SessionOptions};
use frameflow::geometry::{FixedMetrics, Geometry};
use frameflow::item::Item;
use frameflow::nav::NavRole;
use frameflow::page::Page;
use frameflow::store::{FrameStore, MemoryFrameStore};
use frameflow::types::{Bounds, Size};
use std::sync::Arc;

pub const PAGE: Size = Size {
    width: 1024,
    height: 768,
};

pub fn metrics() -> FixedMetrics {
    FixedMetrics::with_page(PAGE)
}

/// Start a session on frameset `notes` backed by `store`.
pub fn start(store: Arc<dyn FrameStore>, multi_column: bool) -> Paginator {
    let mut options = SessionOptions::new("notes");
    options.multi_column = multi_column;
    Paginator::start(store, Arc::new(metrics()), FlowSettings::default(), options)
        .expect("session should start")
}

pub fn memory_session(multi_column: bool) -> (Arc<MemoryFrameStore>, Paginator) {
    let store = Arc::new(MemoryFrameStore::new());
    let paginator = start(store.clone(), multi_column);
    (store, paginator)
}

pub fn bounds(item: &Item) -> Bounds {
    metrics().bounds(item).expect("item should measure")
}

/// Navigation buttons of `role` on `page`.
pub fn buttons(page: &Page, role: NavRole) -> Vec<&Item> {
    page.items()
        .iter()
        .filter(|item| NavRole::of(item) == Some(role))
        .collect()
}

/// Items that are not navigation buttons.
pub fn body(page: &Page) -> Vec<&Item> {
    page.items()
        .iter()
        .filter(|item| NavRole::of(item).is_none())
        .collect()
}

/// Force the next placement onto a new page.
pub fn spawn_page(paginator: &mut Paginator, text: &str) {
    paginator
        .place(Item::text("filler"), false)
        .expect("filler should place");
    paginator.advance_spacing(10_000).expect("spacing");
    let placed = paginator.place(Item::text(text), false).expect("placement");
    assert_eq!(placed.spawned, 1);
}
