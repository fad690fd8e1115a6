//! Property-based tests for placement geometry

use frameflow::flow::{FlowSettings, Paginator, SessionOptions};
use frameflow::geometry::{FixedMetrics, Geometry};
use frameflow::item::Item;
use frameflow::nav::NavRole;
use frameflow::store::MemoryFrameStore;
use frameflow::types::Size;
use proptest::prelude::*;
use std::sync::Arc;

fn item_strategy() -> impl Strategy<Value = Item> {
    prop_oneof![
        "[a-z ]{1,40}".prop_map(Item::text),
        (10i32..300, 4i32..200).prop_map(|(w, h)| Item::rule(Size::new(w, h))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Items on one page never overlap, and every item starts right of the
    /// title indent and below the title.
    #[test]
    fn placed_items_never_overlap(
        items in proptest::collection::vec(item_strategy(), 1..60),
        multi_column in any::<bool>(),
    ) {
        let geometry = FixedMetrics::default();
        let mut options = SessionOptions::new("grid");
        options.multi_column = multi_column;
        let mut paginator = Paginator::start(
            Arc::new(MemoryFrameStore::new()),
            Arc::new(geometry),
            FlowSettings::default(),
            options,
        )
        .unwrap();

        for item in items {
            paginator.place(item, false).unwrap();
        }

        for page in paginator.chain().pages() {
            let title = geometry.bounds(&page.title).unwrap();
            let body: Vec<_> = page
                .items()
                .iter()
                .filter(|item| NavRole::of(item).is_none())
                .map(|item| geometry.bounds(item).unwrap())
                .collect();

            for (i, a) in body.iter().enumerate() {
                prop_assert!(a.top >= title.bottom);
                prop_assert!(a.left >= page.title.position.x);
                for b in &body[i + 1..] {
                    prop_assert!(!a.overlaps(b), "{:?} overlaps {:?} on {}", a, b, page.name);
                }
            }
        }
    }

    /// Spacing never moves the pen above the flow start or below the limit.
    #[test]
    fn spacing_stays_in_band(amounts in proptest::collection::vec(-500i32..500, 1..20)) {
        let mut paginator = Paginator::start(
            Arc::new(MemoryFrameStore::new()),
            Arc::new(FixedMetrics::default()),
            FlowSettings::default(),
            SessionOptions::new("gap"),
        )
        .unwrap();
        let limit = paginator.vertical_limit().unwrap();

        for amount in amounts {
            paginator.advance_spacing(amount).unwrap();
            let cursor = paginator.cursor();
            prop_assert!(cursor.pen.y >= cursor.start.y);
            prop_assert!(cursor.pen.y <= limit);
        }
    }
}
