//! Sessions against on-disk stores, reopened after the session ends.

use super::test_utils::{buttons, spawn_page, start};
use frameflow::flow::{FlowSettings, Paginator, SessionOptions};
use frameflow::item::Item;
use frameflow::nav::{follow_stored, NavRole};
use frameflow::store::{FileFrameStore, FrameStore, SledFrameStore};
use std::sync::Arc;
use tempfile::TempDir;

fn build_chain(store: Arc<dyn FrameStore>, spawns: usize) -> Vec<String> {
    let mut paginator = start(store, false);
    for i in 0..spawns {
        spawn_page(&mut paginator, &format!("entry {}", i));
    }
    let chain = paginator.finish().unwrap();
    chain.walk().map(|page| page.name.clone()).collect()
}

#[test]
fn test_file_store_chain_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let names = {
        let store = Arc::new(FileFrameStore::new(temp.path()).unwrap());
        build_chain(store, 3)
    };

    let reopened = FileFrameStore::new(temp.path()).unwrap();
    let pages = follow_stored(&reopened, "notes1").unwrap();
    let stored: Vec<String> = pages.iter().map(|p| p.name.clone()).collect();
    assert_eq!(stored, names);
    assert_eq!(reopened.list("notes").unwrap(), names);

    let last = pages.last().unwrap();
    assert_eq!(buttons(last, NavRole::Previous)[0].link.as_deref(), Some("notes3"));
    assert!(last.items().iter().any(|item| item.as_text() == Some("entry 2")));
}

#[test]
fn test_sled_store_chain_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("frames.db");
    let names = {
        let store = Arc::new(SledFrameStore::new(&db_path).unwrap());
        let names = build_chain(store.clone(), 2);
        store.flush().unwrap();
        names
    };

    let reopened = SledFrameStore::new(&db_path).unwrap();
    let pages = follow_stored(&reopened, "notes1").unwrap();
    assert_eq!(pages.len(), names.len());
    assert_eq!(reopened.list("notes").unwrap(), names);
}

#[test]
fn test_recreate_replaces_frameset() {
    let temp = TempDir::new().unwrap();
    let store: Arc<dyn FrameStore> = Arc::new(FileFrameStore::new(temp.path()).unwrap());
    build_chain(store.clone(), 2);

    let mut options = SessionOptions::new("notes");
    assert!(Paginator::start(
        store.clone(),
        Arc::new(super::test_utils::metrics()),
        FlowSettings::default(),
        options.clone(),
    )
    .is_err());

    options.recreate = true;
    let mut paginator = Paginator::start(
        store.clone(),
        Arc::new(super::test_utils::metrics()),
        FlowSettings::default(),
        options,
    )
    .unwrap();
    paginator.place(Item::text("fresh"), false).unwrap();
    paginator.finish().unwrap();

    assert_eq!(store.list("notes").unwrap(), vec!["notes1".to_string()]);
    let page = store.load("notes1").unwrap().unwrap();
    assert!(page.items().iter().any(|item| item.as_text() == Some("fresh")));
}

#[test]
fn test_save_forces_write() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileFrameStore::new(temp.path()).unwrap());
    let mut paginator = start(store.clone(), false);
    paginator.place(Item::text("draft"), false).unwrap();
    assert!(store.load("notes1").unwrap().unwrap().items().is_empty());

    paginator.save().unwrap();
    let stored = store.load("notes1").unwrap().unwrap();
    assert_eq!(stored.items().len(), 1);
}
