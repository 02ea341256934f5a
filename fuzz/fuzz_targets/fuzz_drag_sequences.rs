#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use relist_core::PointerEvent;
use relist_widgets::{Key, ListItem, ReorderableList, Section};
use web_time::Instant;

#[derive(Debug, Clone)]
struct Row {
    id: u8,
    section: Option<i64>,
}

impl ListItem for Row {
    fn section(&self) -> Section {
        Section::from(self.section)
    }
}

#[derive(Debug, Arbitrary)]
enum Op {
    Down(u8),
    Move(u8, i16),
    Up(u8, i16),
    Cancel(u8),
    Frame(u8),
    Height(u8, u8),
    Drop(u8),
    Save,
    Discard,
}

#[derive(Debug, Arbitrary)]
struct Input {
    rows: Vec<(u8, Option<u8>)>,
    reorderable: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let data: Vec<Row> = input
        .rows
        .iter()
        .take(24)
        .map(|&(id, s)| Row {
            id,
            section: s.map(|s| i64::from(s % 3)),
        })
        .collect();
    if data.is_empty() {
        return;
    }
    let key = |i: u8| Key::new((data[usize::from(i) % data.len()].id).to_string());

    let mut list = ReorderableList::new(|r: &Row| Key::new(r.id.to_string()))
        .reorderable(input.reorderable);
    list.set_data(data.clone());
    for row in &data {
        list.report_height(&Key::new(row.id.to_string()), 40.0);
    }
    let mut now = Instant::now();
    list.on_frame(now);

    for op in input.ops.iter().take(256) {
        match *op {
            Op::Down(i) => list.handle_pointer(&key(i), &PointerEvent::down(0.0, 0.0), now),
            Op::Move(i, dy) => {
                list.handle_pointer(&key(i), &PointerEvent::moved(0.0, f32::from(dy)), now)
            }
            Op::Up(i, dy) => {
                list.handle_pointer(&key(i), &PointerEvent::up(0.0, f32::from(dy)), now)
            }
            Op::Cancel(i) => list.handle_pointer(&key(i), &PointerEvent::cancel(), now),
            Op::Frame(ms) => {
                now += Duration::from_millis(u64::from(ms));
                list.on_frame(now);
            }
            Op::Height(i, h) => list.report_height(&key(i), f32::from(h)),
            Op::Drop(i) => {
                let mut next = list.data().to_vec();
                if next.len() > 1 {
                    next.remove(usize::from(i) % next.len());
                    list.set_data(next);
                }
            }
            Op::Save => list.save(),
            Op::Discard => list.cancel(),
        }
        let _ = list.flush_effects();

        let order = list.order();
        // Data changes during a drag are applied once it commits.
        if !list.is_dragging() {
            let mut expected: Vec<String> =
                list.data().iter().map(|r| r.id.to_string()).collect();
            expected.sort();
            expected.dedup();
            let mut seen: Vec<String> = order.iter().map(ToString::to_string).collect();
            seen.sort();
            assert_eq!(seen, expected, "order is not a permutation of the data keys");
        }

        let sections: Vec<Section> = order
            .iter()
            .filter_map(|k| list.data().iter().find(|r| r.id.to_string() == k.as_str()))
            .map(ListItem::section)
            .collect();
        assert!(
            sections.windows(2).all(|w| w[0] <= w[1]),
            "sections interleaved: {sections:?}"
        );
    }
});
