//! Configuration driving a real session.

use frameflow::config::{ConfigLoader, StorageBackend};
use frameflow::flow::{Paginator, SessionOptions};
use frameflow::geometry::Geometry;
use frameflow::item::Item;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_layout_config_shapes_pagination() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.path().join("frameflow.toml");
    std::fs::write(
        &config_file,
        r#"
[layout]
page_height = 240
gutter = 12
title_indent = 4

[storage]
backend = "file"
root = "store"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert_eq!(config.storage.backend, StorageBackend::File);

    let store = config.storage.open_store(temp.path()).unwrap();
    let metrics = config.layout.to_metrics();
    let geometry: Arc<dyn Geometry> = Arc::new(metrics.clone());
    let mut paginator = Paginator::start(
        store.clone(),
        geometry,
        config.layout.to_settings(),
        SessionOptions::new("small"),
    )
    .unwrap();

    let title = metrics.bounds(&paginator.current_page().title).unwrap();
    assert_eq!(paginator.cursor().start.x, paginator.current_page().title.position.x + 4);
    assert_eq!(paginator.cursor().start.y, title.bottom);

    for i in 0..30 {
        paginator.place(Item::text(format!("row {}", i)), false).unwrap();
    }
    let chain = paginator.finish().unwrap();
    assert!(chain.len() > 3);
    assert!(temp.path().join("store").join("small").join("1.page").is_file());
}

#[test]
fn test_invalid_layout_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.path().join("frameflow.toml");
    std::fs::write(&config_file, "[layout]\nstart_marker = \"\"\n").unwrap();

    let err = ConfigLoader::load_from_file(&config_file).unwrap_err();
    assert!(err.to_string().contains("Start marker"));
}
