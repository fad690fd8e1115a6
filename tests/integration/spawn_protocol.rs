//! Spawn-and-link protocol: link wiring, acyclicity and failure atomicity.

use super::test_utils::{body, bounds, buttons, memory_session, metrics, spawn_page};
use frameflow::error::{ChainError, PlacementError};
use frameflow::flow::{FlowSettings, Paginator};
use frameflow::item::Item;
use frameflow::nav::{follow_stored, NavRole};
use frameflow::store::FrameStore;
use std::sync::Arc;

#[test]
fn test_origin_page_never_gets_first_button() {
    let (_, mut paginator) = memory_session(false);
    for i in 0..6 {
        spawn_page(&mut paginator, &format!("page {}", i));
    }

    let chain = paginator.chain();
    assert_eq!(chain.len(), 7);
    assert!(buttons(chain.first(), NavRole::First).is_empty());
    assert!(buttons(chain.first(), NavRole::Previous).is_empty());
    for page in &chain.pages()[1..] {
        let first = buttons(page, NavRole::First);
        assert_eq!(first.len(), 1, "{} needs one First button", page.name);
        assert_eq!(first[0].link.as_deref(), Some("notes1"));
    }
}

#[test]
fn test_next_links_visit_every_page_once() {
    let (store, mut paginator) = memory_session(false);
    let spawns = 9;
    for i in 0..spawns {
        spawn_page(&mut paginator, &format!("page {}", i));
    }
    paginator.chain().validate().unwrap();

    let walked: Vec<String> = paginator.chain().walk().map(|p| p.name.clone()).collect();
    assert_eq!(walked.len(), spawns + 1);
    let expected: Vec<String> = (1..=spawns + 1).map(|n| format!("notes{}", n)).collect();
    assert_eq!(walked, expected);

    let chain = paginator.finish().unwrap();
    let last = chain.walk().last().unwrap();
    assert!(buttons(last, NavRole::Next).is_empty());

    let stored = follow_stored(store.as_ref(), "notes1").unwrap();
    let stored_names: Vec<String> = stored.iter().map(|p| p.name.clone()).collect();
    assert_eq!(stored_names, expected);
}

#[test]
fn test_every_non_last_page_has_exactly_one_next() {
    let (_, mut paginator) = memory_session(false);
    for i in 0..4 {
        spawn_page(&mut paginator, &format!("page {}", i));
    }
    let pages = paginator.chain().pages();
    for (index, page) in pages.iter().enumerate() {
        let expected = usize::from(index + 1 < pages.len());
        assert_eq!(buttons(page, NavRole::Next).len(), expected, "{}", page.name);
    }
}

#[test]
fn test_rejected_persist_during_spawn_places_nothing() {
    let (store, mut paginator) = memory_session(false);
    paginator.place(Item::text("kept"), false).unwrap();
    paginator.advance_spacing(10_000).unwrap();

    store.reject_persist_of("notes1");
    let result = paginator.place(Item::text("overflow"), false);
    assert!(matches!(
        result,
        Err(PlacementError::Chain(ChainError::LinkNotPersisted { .. }))
    ));

    let chain = paginator.chain();
    assert_eq!(chain.len(), 1);
    for page in chain.pages() {
        assert!(body(page).iter().all(|item| item.as_text() != Some("overflow")));
    }
    assert!(buttons(chain.first(), NavRole::Next).is_empty());

    store.clear_failures();
    let again = paginator.place(Item::text("later"), false);
    assert!(matches!(
        again,
        Err(PlacementError::Chain(ChainError::Poisoned(_)))
    ));
    assert!(matches!(
        paginator.save(),
        Err(PlacementError::Chain(ChainError::Poisoned(_)))
    ));
    assert!(paginator.set_multi_column(true).is_err());
    assert!(paginator.finish().is_err());
}

#[test]
fn test_resume_rejects_page_with_next_link() {
    let (store, mut paginator) = memory_session(false);
    spawn_page(&mut paginator, "second");
    paginator.finish().unwrap();

    let linked = store.load("notes1").unwrap().unwrap();
    let result = Paginator::resume(
        store.clone(),
        Arc::new(metrics()),
        FlowSettings::default(),
        linked,
        false,
    );
    assert!(matches!(
        result,
        Err(PlacementError::Chain(ChainError::NextAlreadyLinked(name))) if name == "notes1"
    ));
    assert_eq!(follow_stored(store.as_ref(), "notes1").unwrap().len(), 2);
}

#[test]
fn test_resume_last_page_extends_stored_chain() {
    let (store, mut paginator) = memory_session(false);
    spawn_page(&mut paginator, "second");
    paginator.finish().unwrap();

    let last = store.load("notes2").unwrap().unwrap();
    let existing: Vec<_> = body(&last).iter().map(|item| bounds(item)).collect();
    let mut resumed = Paginator::resume(
        store.clone(),
        Arc::new(metrics()),
        FlowSettings::default(),
        last,
        false,
    )
    .unwrap();

    let placed = resumed.place(Item::text("continued"), false).unwrap();
    assert_eq!((placed.page.as_str(), placed.spawned), ("notes2", 0));
    let new = bounds(&placed.item);
    assert!(existing.iter().all(|old| !old.overlaps(&new)));
    assert!(new.bottom <= resumed.vertical_limit().unwrap());

    resumed.advance_spacing(10_000).unwrap();
    let overflow = resumed.place(Item::text("overflow"), false).unwrap();
    assert_eq!(overflow.spawned, 1);

    let chain = resumed.finish().unwrap();
    chain.validate().unwrap();
    assert_eq!(buttons(chain.first(), NavRole::Next).len(), 1);
    assert_eq!(buttons(chain.first(), NavRole::Previous).len(), 1);

    let names: Vec<String> = follow_stored(store.as_ref(), "notes1")
        .unwrap()
        .into_iter()
        .map(|page| page.name)
        .collect();
    assert_eq!(names, ["notes1", "notes2", "notes3"]);
}

#[test]
fn test_rejected_page_creation_is_recoverable() {
    let (store, mut paginator) = memory_session(false);
    paginator.place(Item::text("kept"), false).unwrap();
    paginator.advance_spacing(10_000).unwrap();

    store.reject_page_creation(true);
    let result = paginator.place(Item::text("overflow"), false);
    assert!(matches!(result, Err(PlacementError::Store(_))));
    assert_eq!(paginator.chain().len(), 1);
    assert!(buttons(paginator.chain().first(), NavRole::Next).is_empty());

    store.clear_failures();
    let placed = paginator.place(Item::text("overflow"), false).unwrap();
    assert_eq!(placed.spawned, 1);
    paginator.chain().validate().unwrap();
}

#[test]
fn test_spawned_pages_inherit_title() {
    let (_, mut paginator) = memory_session(false);
    paginator.set_title("Findings").unwrap();
    spawn_page(&mut paginator, "next");
    assert_eq!(paginator.current_page().title_text(), "Findings");
    assert_eq!(paginator.current_page_name(), "notes2");
    assert_eq!(paginator.first_page_name(), "notes1");
}
