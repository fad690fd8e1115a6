//! Property-based tests for navigation chain invariants

use frameflow::flow::{FlowSettings, Paginator, SessionOptions};
use frameflow::geometry::FixedMetrics;
use frameflow::item::Item;
use frameflow::nav::{follow_stored, NavRole};
use frameflow::store::MemoryFrameStore;
use frameflow::types::Size;
use proptest::prelude::*;
use std::sync::Arc;

fn count(page: &frameflow::page::Page, role: NavRole) -> usize {
    page.items()
        .iter()
        .filter(|item| NavRole::of(item) == Some(role))
        .count()
}

/// Any sequence of placements yields an acyclic chain with exactly the
/// expected buttons on every page.
#[test]
fn test_chain_invariants_property() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(64));

    runner
        .run(
            &(proptest::collection::vec(8i32..300, 1..80), any::<bool>()),
            |(heights, multi_column)| {
                let store = Arc::new(MemoryFrameStore::new());
                let mut options = SessionOptions::new("prop");
                options.multi_column = multi_column;
                let mut paginator = Paginator::start(
                    store.clone(),
                    Arc::new(FixedMetrics::default()),
                    FlowSettings::default(),
                    options,
                )
                .unwrap();

                for height in &heights {
                    paginator
                        .place(Item::rule(Size::new(120, *height)), false)
                        .unwrap();
                }

                let chain = paginator.finish().unwrap();
                prop_assert!(chain.validate().is_ok());
                prop_assert_eq!(chain.walk().count(), chain.len());

                let pages = chain.pages();
                for (index, page) in pages.iter().enumerate() {
                    let is_first = index == 0;
                    let is_last = index + 1 == pages.len();
                    prop_assert_eq!(count(page, NavRole::Next), usize::from(!is_last));
                    prop_assert_eq!(count(page, NavRole::Previous), usize::from(!is_first));
                    prop_assert_eq!(count(page, NavRole::First), usize::from(!is_first));
                }

                let stored = follow_stored(store.as_ref(), "prop1").unwrap();
                prop_assert_eq!(stored.len(), chain.len());
                Ok(())
            },
        )
        .unwrap();
}
