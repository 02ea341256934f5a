//! Property tests for the order model under random drags and data churn.
//!
//! Checked after every step:
//!
//! 1. The order is a permutation of the data's keys.
//! 2. Positions are prefix sums of measured heights.
//! 3. Every section occupies one contiguous index range, in ascending
//!    section order, so no drag ever carried a row out of its section.
//! 4. `on_reorder` fired exactly once per drag that actually started, even
//!    when the dragged row was removed mid-drag.
//! 5. Feeding the data back (in any order) leaves the order untouched.

mod harness;

use std::collections::BTreeSet;

use harness::{Harness, Row};
use proptest::prelude::*;
use relist_core::PointerEvent;
use relist_widgets::{Key, ListItem, Section};

#[derive(Debug, Clone)]
enum Op {
    Drag(usize, f32),
    CancelDrag(usize, f32),
    /// Drag, and drop a row from the data while the finger is still down.
    RemoveMidDrag(usize, usize, f32),
    FeedBack,
    FeedReversed,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..16, -300.0f32..300.0).prop_map(|(i, dy)| Op::Drag(i, dy)),
        2 => (0usize..16, -300.0f32..300.0).prop_map(|(i, dy)| Op::CancelDrag(i, dy)),
        2 => (0usize..16, 0usize..16, -300.0f32..300.0)
            .prop_map(|(i, victim, dy)| Op::RemoveMidDrag(i, victim, dy)),
        1 => Just(Op::FeedBack),
        1 => Just(Op::FeedReversed),
    ]
}

fn data_strategy() -> impl Strategy<Value = Vec<(Option<i64>, f32)>> {
    proptest::collection::vec(
        (
            prop_oneof![Just(None), Just(Some(0)), Just(Some(1)), Just(Some(-2))],
            0.0f32..80.0,
        ),
        1..8,
    )
}

fn check_invariants(h: &Harness) -> Result<(), TestCaseError> {
    let order = h.list.order();
    let data_keys: BTreeSet<String> = h.list.data().iter().map(|r| r.id.clone()).collect();
    let order_keys: BTreeSet<String> = order.iter().map(ToString::to_string).collect();
    prop_assert_eq!(order.len(), data_keys.len());
    prop_assert_eq!(&order_keys, &data_keys);

    let positions = h.list.engine().positions();
    let mut acc = 0.0f32;
    for (i, key) in order.iter().enumerate() {
        prop_assert_eq!(positions.offset_at(i), acc);
        acc += h.list.layout().height(key);
    }

    let section_of = |key: &Key| -> Section {
        h.list
            .data()
            .iter()
            .find(|r| r.id == key.as_str())
            .map(Row::section)
            .unwrap_or_default()
    };
    let sections: Vec<Section> = order.iter().map(section_of).collect();
    prop_assert!(
        sections.windows(2).all(|w| w[0] <= w[1]),
        "sections out of order: {:?}",
        sections
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn order_invariants_hold(
        items in data_strategy(),
        ops in proptest::collection::vec(op_strategy(), 1..12),
    ) {
        let data: Vec<Row> = items
            .iter()
            .enumerate()
            .map(|(i, &(section, _))| Row::new(&format!("k{i}"), section))
            .collect();
        let mut h = Harness::new(data, 1.0, true);
        for (i, &(_, height)) in items.iter().enumerate() {
            h.list.report_height(&Key::from(format!("k{i}")), height);
        }
        h.settle();
        check_invariants(&h)?;

        let mut started = 0usize;
        for op in ops {
            match op {
                Op::Drag(i, dy) | Op::CancelDrag(i, dy) => {
                    let order = h.order();
                    let id = order[i % order.len()].clone();
                    h.lift(&id);
                    if h.list.is_dragging() {
                        started += 1;
                    }
                    h.move_by(&id, dy);
                    if matches!(op, Op::CancelDrag(..)) {
                        h.pointer(&id, PointerEvent::cancel());
                    } else {
                        h.release(&id, dy);
                    }
                    h.settle();
                }
                Op::RemoveMidDrag(i, victim, dy) => {
                    let order = h.order();
                    let id = order[i % order.len()].clone();
                    h.lift(&id);
                    if h.list.is_dragging() {
                        started += 1;
                    }
                    h.move_by(&id, dy);
                    let mut data = h.list.data().to_vec();
                    if data.len() > 1 {
                        data.remove(victim % data.len());
                        h.set_data(data);
                    }
                    h.release(&id, dy);
                    h.settle();
                    prop_assert!(!h.list.is_dragging());
                }
                Op::FeedBack | Op::FeedReversed => {
                    let before = h.order();
                    let mut data = h.list.data().to_vec();
                    if matches!(op, Op::FeedReversed) {
                        data.reverse();
                    }
                    h.list.set_data(data);
                    h.settle();
                    prop_assert_eq!(h.order(), before);
                }
            }
            check_invariants(&h)?;
        }

        h.flush();
        prop_assert_eq!(h.reorders().len(), started);
    }

    #[test]
    fn cancel_without_index_change_restores_anchor(
        n in 2usize..6,
        pick in 0usize..6,
        jiggle in -4.0f32..4.0,
    ) {
        let ids: Vec<String> = (0..n).map(|i| format!("r{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let mut h = Harness::new(harness::plain(&refs), 30.0, true);
        let id = ids[pick % n].clone();
        let anchor = h.offset_of(&id);

        h.lift(&id);
        h.move_by(&id, jiggle);
        h.pointer(&id, PointerEvent::cancel());
        h.settle();

        prop_assert_eq!(h.offset_of(&id), anchor);
        prop_assert_eq!(h.order(), ids);
    }
}
