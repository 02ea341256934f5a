#![forbid(unsafe_code)]

//! The reorderable list.
//!
//! [`ReorderableList`] ties row gestures, the [`ReorderEngine`], row motion
//! and the edit session together behind the two entry points a host drives
//! every frame, plus the application-context calls that hand data in and
//! effects out.
//!
//! # Contexts
//!
//! | Call | Context | May run caller code |
//! |------|---------|---------------------|
//! | [`handle_pointer`](ReorderableList::handle_pointer) | animation | no |
//! | [`on_frame`](ReorderableList::on_frame) | animation | no |
//! | [`flush_effects`](ReorderableList::flush_effects) | application | yes |
//! | `set_data`, `report_height`, `save`, `cancel` | application | no |
//!
//! Delegate callbacks and haptic pulses are posted to an [`EffectQueue`] and
//! only run on flush. A delegate that needs to call back into the list
//! should flush through a cloned [`effects`](ReorderableList::effects)
//! handle so the list is not borrowed while callbacks run.
//!
//! # Example
//!
//! ```
//! use relist_widgets::{Key, ListItem, ReorderableList};
//!
//! #[derive(Clone)]
//! struct Task { id: &'static str }
//! impl ListItem for Task {}
//!
//! let mut list = ReorderableList::new(|t: &Task| Key::from(t.id)).reorderable(true);
//! list.set_data(vec![Task { id: "a" }, Task { id: "b" }]);
//! list.report_height(&Key::from("a"), 40.0);
//! list.report_height(&Key::from("b"), 40.0);
//! let rows = list.rows();
//! assert_eq!(rows[1].offset_y, 40.0);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use ahash::{AHashMap, AHashSet};
use bitflags::bitflags;
use relist_core::{Gesture, GestureRecognizer, PointerEvent};
use relist_runtime::{
    EffectQueue, FlushReport, FrameClock, HapticStrength, Haptics, NoHaptics, Observable,
};
use web_time::Instant;

use crate::config::ReorderConfig;
use crate::edit_session::{EditSession, ScrollHandle};
use crate::item::{Key, ListItem};
use crate::layout_tracker::LayoutTracker;
use crate::motion::MotionDriver;
use crate::order::OrderEntry;
use crate::reorder::{Commit, DragPhase, ReorderEngine};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Callbacks into the owner of the data. Every method defaults to a no-op.
///
/// All calls arrive from [`ReorderableList::flush_effects`].
pub trait ListDelegate<T> {
    /// A drag finished (or was cancelled and reset). `data` is the full
    /// item list in its new order.
    fn on_reorder(&mut self, data: Vec<T>) {
        let _ = data;
    }

    fn on_edit_mode_change(&mut self, editing: bool) {
        let _ = editing;
    }

    fn on_save_changes(&mut self) {}

    fn on_cancel_changes(&mut self) {}
}

impl<T> ListDelegate<T> for () {}

bitflags! {
    /// Render state of one row.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RowFlags: u8 {
        /// The list is in edit mode.
        const EDITING  = 1 << 0;
        /// Lifted and following the pointer.
        const DRAGGING = 1 << 1;
        /// Released and springing into its slot.
        const SETTLING = 1 << 2;
        /// Touch-down feedback.
        const FLASHING = 1 << 3;
    }
}

/// Where a row is in its gesture lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPhase {
    Idle,
    Flashing,
    Dragging,
    Settling,
}

/// One row to render.
#[derive(Debug, Clone)]
pub struct RowState<'a, T> {
    pub item: &'a T,
    /// Position in the render order.
    pub index: usize,
    pub key: Key,
    /// Animated top offset in px.
    pub offset_y: f32,
    pub flags: RowFlags,
}

impl<T> RowState<'_, T> {
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.flags.contains(RowFlags::EDITING)
    }

    /// Lifted, either following the pointer or settling.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.flags
            .intersects(RowFlags::DRAGGING | RowFlags::SETTLING)
    }

    #[must_use]
    pub fn is_flashing(&self) -> bool {
        self.flags.contains(RowFlags::FLASHING)
    }
}

type KeyFn<T> = Rc<dyn Fn(&T) -> Key>;

// ---------------------------------------------------------------------------
// ReorderableList
// ---------------------------------------------------------------------------

/// A list whose rows can be long-pressed and dragged into a new order.
pub struct ReorderableList<T> {
    data: Vec<T>,
    /// Key to index in `data`, first occurrence only.
    slots: AHashMap<Key, usize>,
    key_of: KeyFn<T>,
    reorderable: bool,
    config: ReorderConfig,
    layout: LayoutTracker,
    engine: ReorderEngine,
    motion: MotionDriver,
    edit: EditSession,
    recognizers: AHashMap<Key, GestureRecognizer>,
    flashing: AHashSet<Key>,
    effects: EffectQueue,
    delegate: Rc<RefCell<dyn ListDelegate<T>>>,
    haptics: Rc<dyn Haptics>,
    scroll: Option<Box<dyn ScrollHandle>>,
    clock: FrameClock,
    rebuild_pending: bool,
}

impl<T> std::fmt::Debug for ReorderableList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReorderableList")
            .field("items", &self.data.len())
            .field("reorderable", &self.reorderable)
            .field("editing", &self.edit.is_editing())
            .field("session", &self.engine.session().map(|s| s.key().clone()))
            .field("pending_effects", &self.effects.len())
            .finish_non_exhaustive()
    }
}

impl<T: ListItem + Clone + 'static> ReorderableList<T> {
    /// An empty, non-reorderable list keyed by `key_of`.
    pub fn new(key_of: impl Fn(&T) -> Key + 'static) -> Self {
        let config = ReorderConfig::default();
        Self {
            data: Vec::new(),
            slots: AHashMap::new(),
            key_of: Rc::new(key_of),
            reorderable: false,
            layout: LayoutTracker::new(),
            engine: ReorderEngine::new(config.settle_params()),
            motion: MotionDriver::new(config.row_params()),
            edit: EditSession::new(config.header.height, config.header_params()),
            recognizers: AHashMap::new(),
            flashing: AHashSet::new(),
            effects: EffectQueue::new(),
            delegate: Rc::new(RefCell::new(())),
            haptics: Rc::new(NoHaptics),
            scroll: None,
            clock: FrameClock::new(config.max_frame_delta()),
            rebuild_pending: false,
            config,
        }
    }

    /// Permanently reorderable lists drag on a short hold and have no edit
    /// mode. Others enter edit mode on long press.
    #[must_use]
    pub fn reorderable(mut self, reorderable: bool) -> Self {
        self.reorderable = reorderable;
        self
    }

    /// Apply tunables. Out-of-range values are logged, not rejected; use
    /// [`ReorderConfig::into_validated`] to refuse them up front.
    #[must_use]
    pub fn with_config(mut self, config: ReorderConfig) -> Self {
        for problem in config.validate() {
            tracing::warn!(target: "relist.reorder", %problem, "config value out of range");
        }
        self.engine.set_settle_params(config.settle_params());
        self.motion.set_params(config.row_params());
        self.edit = EditSession::new(config.header.height, config.header_params())
            .with_navigation_flag(self.edit.navigation());
        self.clock = FrameClock::new(config.max_frame_delta());
        let gesture = config.gesture_config();
        for recognizer in self.recognizers.values_mut() {
            recognizer.set_config(gesture.clone());
        }
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_delegate<D: ListDelegate<T> + 'static>(mut self, delegate: Rc<RefCell<D>>) -> Self {
        self.delegate = delegate;
        self
    }

    #[must_use]
    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Rc::new(haptics);
        self
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll: impl ScrollHandle + 'static) -> Self {
        self.scroll = Some(Box::new(scroll));
        self
    }

    /// Share the host's navigation-visibility flag. Cleared while editing.
    #[must_use]
    pub fn with_navigation_flag(mut self, flag: Observable<bool>) -> Self {
        self.edit = self.edit.with_navigation_flag(flag);
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<T>) -> Self {
        self.set_data(data);
        self
    }

    // -- application context -------------------------------------------------

    /// Replace the data. Rebuilds the order now, or after the live drag.
    ///
    /// Data that drops the dragged row ends that drag as a cancellation
    /// first; its pointer events would no longer reach the list.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.reindex();
        if let Some(session) = self.engine.session()
            && !self.slots.contains_key(session.key())
        {
            tracing::debug!(
                target: "relist.reorder",
                key = %session.key(),
                "dragged row removed; finalizing drag"
            );
            self.finish_live_drag();
        }

        let live: AHashSet<Key> = self.slots.keys().cloned().collect();
        self.layout.retain(&live);
        self.recognizers.retain(|k, _| live.contains(k));
        self.flashing.retain(|k| live.contains(k));
        self.refresh_order();
    }

    /// Record a row's measured height. Unknown keys are ignored.
    pub fn report_height(&mut self, key: &Key, height: f32) {
        if !self.slots.contains_key(key) {
            tracing::trace!(target: "relist.reorder", key = %key, "height for unknown key ignored");
            return;
        }
        if self.layout.report(key, height) {
            self.refresh_order();
        }
    }

    /// Run queued side effects. Failures are logged and reported, never
    /// raised.
    pub fn flush_effects(&self) -> FlushReport {
        self.effects.flush()
    }

    /// Handle to the effect queue.
    #[must_use]
    pub fn effects(&self) -> EffectQueue {
        self.effects.clone()
    }

    /// Leave edit mode keeping the current order.
    pub fn save(&mut self) {
        if !self.edit.is_editing() {
            return;
        }
        self.finish_live_drag();
        self.edit.exit(self.scroll_offset());

        let delegate = Rc::clone(&self.delegate);
        self.effects
            .post_fn("delegate.on_save_changes", move || delegate.borrow_mut().on_save_changes());
        self.post_edit_mode_change(false);
        let haptics = Rc::clone(&self.haptics);
        self.effects.post("haptic.save", move || {
            haptics.impact(HapticStrength::Heavy)?;
            Ok(())
        });
    }

    /// Leave edit mode restoring the order from when it was entered.
    pub fn cancel(&mut self) {
        if !self.edit.is_editing() {
            return;
        }
        self.finish_live_drag();
        let snapshot = self.edit.exit(self.scroll_offset()).unwrap_or_default();
        if self.engine.restore_order(&snapshot, &self.layout) {
            self.sync_motion(true);
            self.data = self.items_in(&self.engine.order().keys());
            self.reindex();
        }

        let delegate = Rc::clone(&self.delegate);
        self.effects.post_fn("delegate.on_cancel_changes", move || {
            delegate.borrow_mut().on_cancel_changes();
        });
        self.post_edit_mode_change(false);
    }

    // -- animation context ---------------------------------------------------

    /// Feed one pointer sample on the row for `key`.
    pub fn handle_pointer(&mut self, key: &Key, event: &PointerEvent, now: Instant) {
        if !self.slots.contains_key(key) {
            tracing::trace!(target: "relist.gesture", key = %key, "pointer on unknown key ignored");
            return;
        }
        let editing = self.edit.is_editing();
        let pan = self.reorderable || editing;
        let long_press = !self.reorderable && !editing;
        let config = &self.config;
        let recognizer = self
            .recognizers
            .entry(key.clone())
            .or_insert_with(|| GestureRecognizer::new(config.gesture_config()));
        recognizer.set_detectors(pan, long_press);
        let gestures = recognizer.process(event, now);
        for gesture in gestures {
            self.dispatch(key, gesture, now);
        }
    }

    /// Advance timers and animations to `now`.
    pub fn on_frame(&mut self, now: Instant) {
        let dt = self.clock.tick(now);

        let fired: Vec<(Key, Gesture)> = self
            .recognizers
            .iter_mut()
            .filter(|(_, r)| r.is_pressed())
            .flat_map(|(k, r)| r.check_timers(now).into_iter().map(move |g| (k.clone(), g)))
            .collect();
        for (key, gesture) in fired {
            self.dispatch(&key, gesture, now);
        }

        if let Some(commit) = self.engine.tick(dt) {
            self.apply_commit(commit);
        }
        self.motion.tick(dt);
        if let Some(offset) = self.edit.tick(dt)
            && let Some(scroll) = self.scroll.as_mut()
        {
            scroll.scroll_to(offset);
        }
    }

    // -- queries ---------------------------------------------------------------

    /// Rows in render order.
    #[must_use]
    pub fn rows(&self) -> Vec<RowState<'_, T>> {
        let editing = self.edit.is_editing();
        let session = self.engine.session();
        self.engine.order().with_keys(|keys| {
            keys.iter()
                .enumerate()
                .filter_map(|(index, key)| {
                    let &slot = self.slots.get(key)?;
                    let mut flags = RowFlags::empty();
                    flags.set(RowFlags::EDITING, editing);
                    flags.set(RowFlags::FLASHING, self.flashing.contains(key));
                    let offset_y = match session {
                        Some(s) if s.key() == key => {
                            flags.insert(match s.phase() {
                                DragPhase::Dragging => RowFlags::DRAGGING,
                                DragPhase::Settling => RowFlags::SETTLING,
                            });
                            s.live_offset()
                        }
                        _ => self
                            .motion
                            .offset(key)
                            .or_else(|| self.engine.display_offset(key))
                            .unwrap_or(0.0),
                    };
                    Some(RowState {
                        item: &self.data[slot],
                        index,
                        key: key.clone(),
                        offset_y,
                        flags,
                    })
                })
                .collect()
        })
    }

    #[must_use]
    pub fn row_phase(&self, key: &Key) -> RowPhase {
        match self.engine.session() {
            Some(s) if s.key() == key => match s.phase() {
                DragPhase::Dragging => RowPhase::Dragging,
                DragPhase::Settling => RowPhase::Settling,
            },
            _ if self.flashing.contains(key) => RowPhase::Flashing,
            _ => RowPhase::Idle,
        }
    }

    /// Keys in render order.
    #[must_use]
    pub fn order(&self) -> Vec<Key> {
        self.engine.order().keys()
    }

    /// Items as last supplied or reordered.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[must_use]
    pub fn key_of(&self, item: &T) -> Key {
        (self.key_of)(item)
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.edit.is_editing()
    }

    #[must_use]
    pub fn is_reorderable(&self) -> bool {
        self.reorderable
    }

    pub fn set_reorderable(&mut self, reorderable: bool) {
        self.reorderable = reorderable;
    }

    /// Whether a drag session (dragging or settling) is live.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.engine.is_session_live()
    }

    #[must_use]
    pub fn is_layout_complete(&self) -> bool {
        self.engine.order().is_built()
    }

    /// Whether another frame would change anything on screen.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.engine.is_session_live() || !self.motion.is_idle() || self.edit.is_animating()
    }

    /// Current (animated) edit header height.
    #[must_use]
    pub fn header_height(&self) -> f32 {
        self.edit.header_height()
    }

    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.engine.with_positions(|p| p.total_height())
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutTracker {
        &self.layout
    }

    #[must_use]
    pub fn engine(&self) -> &ReorderEngine {
        &self.engine
    }

    /// Observable edit-mode flag.
    #[must_use]
    pub fn editing_flag(&self) -> Observable<bool> {
        self.edit.editing()
    }

    #[must_use]
    pub fn navigation_flag(&self) -> Observable<bool> {
        self.edit.navigation()
    }

    #[must_use]
    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    // -- internals -------------------------------------------------------------

    fn reindex(&mut self) {
        self.slots.clear();
        for (i, item) in self.data.iter().enumerate() {
            let key = (self.key_of)(item);
            if self.slots.contains_key(&key) {
                tracing::warn!(target: "relist.reorder", key = %key, index = i, "duplicate key ignored");
                continue;
            }
            self.slots.insert(key, i);
        }
    }

    fn entries(&self) -> Vec<OrderEntry> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let key = (self.key_of)(item);
                (self.slots.get(&key) == Some(&i)).then(|| OrderEntry {
                    key,
                    section: item.section(),
                    sort_order: item.sort_order(),
                })
            })
            .collect()
    }

    fn refresh_order(&mut self) {
        if self.engine.is_session_live() {
            tracing::debug!(target: "relist.reorder", "rebuild deferred until drag ends");
            self.rebuild_pending = true;
            return;
        }
        self.rebuild_pending = false;

        let entries = self.entries();
        let was_built = self.engine.order().is_built();
        if self.layout.is_complete(entries.iter().map(|e| &e.key)) {
            self.engine.rebuild(&entries, &self.layout);
        } else {
            self.engine.show_provisional(&entries, &self.layout);
        }
        self.sync_motion(was_built && self.engine.order().is_built());
    }

    fn sync_motion(&mut self, animate: bool) {
        let keys = self.engine.order().keys();
        self.engine
            .with_positions(|p| self.motion.sync(p, &keys, animate));
    }

    /// Caller items in `order`; items not named keep data order at the end.
    fn items_in(&self, order: &[Key]) -> Vec<T> {
        let mut used = vec![false; self.data.len()];
        let mut out = Vec::with_capacity(self.data.len());
        for key in order {
            if let Some(&i) = self.slots.get(key)
                && !used[i]
            {
                used[i] = true;
                out.push(self.data[i].clone());
            }
        }
        out.extend(
            self.data
                .iter()
                .zip(&used)
                .filter(|(_, used)| !**used)
                .map(|(item, _)| item.clone()),
        );
        out
    }

    fn scroll_offset(&self) -> f32 {
        self.scroll.as_ref().map_or(0.0, |s| s.offset())
    }

    fn dispatch(&mut self, key: &Key, gesture: Gesture, now: Instant) {
        match gesture {
            Gesture::Press { .. } => {
                self.flashing.insert(key.clone());
            }
            Gesture::Release => {
                self.flashing.remove(key);
            }
            Gesture::LongPress { .. } => self.enter_edit_mode(),
            Gesture::PanStart { .. } => {
                self.flashing.remove(key);
                self.start_drag(key, now);
            }
            Gesture::PanMove { translation, .. } => {
                if self
                    .engine
                    .update_drag(key, translation.y, &self.layout)
                    .is_some()
                {
                    self.sync_motion(true);
                }
            }
            Gesture::PanEnd { translation, .. } => {
                if self
                    .engine
                    .update_drag(key, translation.y, &self.layout)
                    .is_some()
                {
                    self.sync_motion(true);
                }
                self.engine.end_drag(key);
            }
            Gesture::PanCancel => {
                if self.engine.cancel_drag(key, &self.layout).is_some() {
                    self.sync_motion(true);
                }
            }
        }
    }

    fn start_drag(&mut self, key: &Key, now: Instant) {
        match self.engine.begin_drag(key, now) {
            Ok(_) => {
                let haptics = Rc::clone(&self.haptics);
                self.effects.post("haptic.drag_start", move || {
                    haptics.impact(HapticStrength::Medium)?;
                    Ok(())
                });
            }
            Err(reason) => {
                tracing::debug!(target: "relist.gesture", key = %key, %reason, "drag start ignored");
            }
        }
    }

    fn enter_edit_mode(&mut self) {
        if self.reorderable {
            return;
        }
        let scroll = self.scroll_offset();
        if self.edit.enter(scroll, self.engine.order().keys()) {
            self.post_edit_mode_change(true);
        }
    }

    fn post_edit_mode_change(&self, editing: bool) {
        let delegate = Rc::clone(&self.delegate);
        self.effects.post_fn("delegate.on_edit_mode_change", move || {
            delegate.borrow_mut().on_edit_mode_change(editing);
        });
    }

    /// Tear down a finished session and post the reordered data.
    fn apply_commit(&mut self, commit: Commit) {
        if let Some(rest) = self.engine.with_positions(|p| p.offset(&commit.key)) {
            self.motion.snap(&commit.key, rest);
        }
        let reordered = self.items_in(&commit.order);
        self.data = reordered.clone();
        self.reindex();

        let delegate = Rc::clone(&self.delegate);
        self.effects.post_fn("delegate.on_reorder", move || {
            delegate.borrow_mut().on_reorder(reordered);
        });

        if self.rebuild_pending {
            self.refresh_order();
        }
    }

    /// Settle any live drag immediately as a cancellation.
    fn finish_live_drag(&mut self) {
        if let Some(commit) = self.engine.finalize_now(&self.layout) {
            for recognizer in self.recognizers.values_mut() {
                recognizer.reset();
            }
            self.flashing.clear();
            self.sync_motion(true);
            self.apply_commit(commit);
        }
    }
}
