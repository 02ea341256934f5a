//! Shared driver for list integration tests.
//!
//! Owns a list, a recording delegate, recording haptics and a fake clock,
//! and exposes touch-level helpers (`drag`, `long_press`) that go through
//! the real gesture path.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use relist_core::PointerEvent;
use relist_runtime::{FlushReport, HapticStrength, RecordingHaptics};
use relist_widgets::{
    Key, ListDelegate, ListItem, ReorderConfig, ReorderableList, ScrollOffset, Section,
};
use web_time::Instant;

pub const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: String,
    pub section: Option<i64>,
}

impl Row {
    pub fn new(id: &str, section: Option<i64>) -> Self {
        Self {
            id: id.to_string(),
            section,
        }
    }
}

impl ListItem for Row {
    fn section(&self) -> Section {
        Section::from(self.section)
    }
}

pub fn rows(items: &[(&str, Option<i64>)]) -> Vec<Row> {
    items.iter().map(|&(id, s)| Row::new(id, s)).collect()
}

pub fn plain(ids: &[&str]) -> Vec<Row> {
    ids.iter().map(|id| Row::new(id, None)).collect()
}

pub fn ids(data: &[Row]) -> Vec<String> {
    data.iter().map(|r| r.id.clone()).collect()
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub reorders: Vec<Vec<Row>>,
    pub edit_modes: Vec<bool>,
    pub saves: u32,
    pub cancels: u32,
}

impl ListDelegate<Row> for Recorder {
    fn on_reorder(&mut self, data: Vec<Row>) {
        self.reorders.push(data);
    }

    fn on_edit_mode_change(&mut self, editing: bool) {
        self.edit_modes.push(editing);
    }

    fn on_save_changes(&mut self) {
        self.saves += 1;
    }

    fn on_cancel_changes(&mut self) {
        self.cancels += 1;
    }
}

pub struct Harness {
    pub list: ReorderableList<Row>,
    pub delegate: Rc<RefCell<Recorder>>,
    pub haptics: RecordingHaptics,
    pub scroll: ScrollOffset,
    pub now: Instant,
}

impl Harness {
    /// A list over `data` with every row measured at `height`.
    pub fn new(data: Vec<Row>, height: f32, reorderable: bool) -> Self {
        Self::with_haptics(data, height, reorderable, RecordingHaptics::new())
    }

    pub fn with_haptics(
        data: Vec<Row>,
        height: f32,
        reorderable: bool,
        haptics: RecordingHaptics,
    ) -> Self {
        Self::build(data, height, reorderable, haptics, ReorderConfig::default())
    }

    pub fn with_config(data: Vec<Row>, height: f32, config: ReorderConfig) -> Self {
        Self::build(data, height, true, RecordingHaptics::new(), config)
    }

    fn build(
        data: Vec<Row>,
        height: f32,
        reorderable: bool,
        haptics: RecordingHaptics,
        config: ReorderConfig,
    ) -> Self {
        let delegate = Rc::new(RefCell::new(Recorder::default()));
        let scroll = ScrollOffset::new(0.0);
        let mut list = ReorderableList::new(|r: &Row| Key::from(r.id.as_str()))
            .reorderable(reorderable)
            .with_config(config)
            .with_delegate(Rc::clone(&delegate))
            .with_haptics(haptics.clone())
            .with_scroll(scroll.clone());
        list.set_data(data.clone());
        for row in &data {
            list.report_height(&Key::from(row.id.as_str()), height);
        }
        let mut harness = Self {
            list,
            delegate,
            haptics,
            scroll,
            now: Instant::now(),
        };
        harness.list.on_frame(harness.now);
        harness
    }

    pub fn order(&self) -> Vec<String> {
        self.list.order().iter().map(ToString::to_string).collect()
    }

    pub fn offset_of(&self, id: &str) -> f32 {
        self.list
            .rows()
            .into_iter()
            .find(|r| r.key.as_str() == id)
            .map(|r| r.offset_y)
            .expect("row present")
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        self.list.on_frame(self.now);
    }

    pub fn frames(&mut self, n: usize) {
        for _ in 0..n {
            self.advance(FRAME);
        }
    }

    pub fn pointer(&mut self, id: &str, event: PointerEvent) {
        let now = self.now;
        self.list.handle_pointer(&Key::from(id), &event, now);
    }

    /// Touch down on `id` and hold until the drag activates.
    pub fn lift(&mut self, id: &str) {
        self.pointer(id, PointerEvent::down(10.0, 10.0));
        self.advance(Duration::from_millis(160));
    }

    pub fn move_by(&mut self, id: &str, dy: f32) {
        self.pointer(id, PointerEvent::moved(10.0, 10.0 + dy));
        self.advance(FRAME);
    }

    pub fn release(&mut self, id: &str, dy: f32) {
        self.pointer(id, PointerEvent::up(10.0, 10.0 + dy));
    }

    /// Run frames until the drag session and all row motion finish.
    pub fn settle(&mut self) {
        for _ in 0..600 {
            if !self.list.is_animating() {
                return;
            }
            self.advance(FRAME);
        }
        panic!("list never settled");
    }

    /// Full drag of `id` by `dy` px, settled.
    pub fn drag(&mut self, id: &str, dy: f32) {
        self.lift(id);
        self.move_by(id, dy);
        self.release(id, dy);
        self.settle();
    }

    pub fn long_press(&mut self, id: &str) {
        self.pointer(id, PointerEvent::down(10.0, 10.0));
        self.advance(Duration::from_millis(520));
        self.pointer(id, PointerEvent::up(10.0, 10.0));
    }

    pub fn flush(&mut self) -> FlushReport {
        self.list.flush_effects()
    }

    pub fn reorders(&self) -> Vec<Vec<String>> {
        self.delegate
            .borrow()
            .reorders
            .iter()
            .map(|d| ids(d))
            .collect()
    }

    pub fn set_data(&mut self, data: Vec<Row>) {
        self.list.set_data(data);
    }

    pub fn pulses(&self) -> Vec<HapticStrength> {
        self.haptics.pulses()
    }
}
