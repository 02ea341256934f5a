#![forbid(unsafe_code)]

//! Drag sessions over the order model.
//!
//! [`ReorderEngine`] owns the [`OrderModel`], the derived [`PositionMap`]
//! and at most one [`DragSession`]. It is driven entirely from the animation
//! context and never runs caller code: a finished session is handed back as
//! a [`Commit`] for the list to post.
//!
//! # Session lifecycle
//!
//! ```text
//! begin_drag ──► Dragging ──update_drag*──► end_drag | cancel_drag
//!                                               │
//!                                               ▼
//!                               Settling ──tick*──► Commit (session gone)
//! ```
//!
//! # Invariants
//!
//! 1. At most one session is live; `begin_drag` while one is live, settling
//!    included, is rejected.
//! 2. The dragged key never leaves the index range of its own section.
//! 3. Each session yields exactly one [`Commit`], cancelled or not. A
//!    settle that has not come to rest after [`MAX_SETTLE`] snaps into its
//!    slot and commits anyway.
//! 4. Each index change updates order and positions inside one
//!    [`BatchScope`], so observers never see one without the other.

use std::fmt;
use std::time::Duration;

use relist_core::animation::{Spring, SpringParams};
use relist_runtime::{BatchScope, Observable};
use web_time::Instant;

use crate::item::{Key, Section};
use crate::layout_tracker::LayoutTracker;
use crate::order::{OrderEntry, OrderModel};
use crate::positions::PositionMap;

/// Longest a released row may spring before it is snapped into place.
pub const MAX_SETTLE: Duration = Duration::from_secs(2);

/// Where the dragged row is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Following the pointer.
    Dragging,
    /// Released; springing into its resting slot.
    Settling,
}

/// Why a drag start was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragRejection {
    /// Some row has not reported a height yet.
    LayoutPending,
    /// Another session is live.
    SessionLive { key: Key, phase: DragPhase },
    /// The key is not in the current order.
    UnknownKey(Key),
}

impl fmt::Display for DragRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayoutPending => write!(f, "layout not yet measured"),
            Self::SessionLive { key, phase } => {
                write!(f, "drag of '{key}' still live ({phase:?})")
            }
            Self::UnknownKey(key) => write!(f, "unknown key '{key}'"),
        }
    }
}

/// A resolved index change during a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexChange {
    pub key: Key,
    pub from: usize,
    pub to: usize,
}

/// A finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub key: Key,
    /// Index at drag start.
    pub from: usize,
    /// Final index.
    pub to: usize,
    pub cancelled: bool,
    /// Key order after the session.
    pub order: Vec<Key>,
}

/// State of the one live drag.
#[derive(Debug, Clone)]
pub struct DragSession {
    key: Key,
    section: Section,
    anchor: f32,
    live: f32,
    start_index: usize,
    index: usize,
    committed: Vec<Key>,
    phase: DragPhase,
    settle: Option<Spring>,
    settling_for: Duration,
    cancelled: bool,
    started_at: Instant,
}

impl DragSession {
    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    /// Offset of the row when the drag started.
    #[must_use]
    pub fn anchor(&self) -> f32 {
        self.anchor
    }

    /// Offset at which the dragged row is drawn.
    #[must_use]
    pub fn live_offset(&self) -> f32 {
        self.live
    }

    #[must_use]
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Last resolved index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Order captured at drag start.
    #[must_use]
    pub fn committed_order(&self) -> &[Key] {
        &self.committed
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// First index whose midpoint lies below `live`; the last index if none.
#[must_use]
pub fn resolve_index(
    live: f32,
    order: &[Key],
    positions: &PositionMap,
    heights: &LayoutTracker,
) -> usize {
    order
        .iter()
        .enumerate()
        .position(|(i, key)| positions.offset_at(i) + heights.height(key) / 2.0 > live)
        .unwrap_or_else(|| order.len().saturating_sub(1))
}

/// Clamp `candidate` into an inclusive `(first, last)` range.
#[must_use]
pub fn clamp_to_range(candidate: usize, range: Option<(usize, usize)>) -> usize {
    match range {
        Some((first, last)) => candidate.clamp(first, last),
        None => candidate,
    }
}

/// Order, positions, and the drag session that mutates them.
#[derive(Debug)]
pub struct ReorderEngine {
    order: OrderModel,
    positions: Observable<PositionMap>,
    session: Option<DragSession>,
    settle_params: SpringParams,
}

impl Default for ReorderEngine {
    fn default() -> Self {
        Self::new(SpringParams::settle())
    }
}

impl ReorderEngine {
    #[must_use]
    pub fn new(settle_params: SpringParams) -> Self {
        Self {
            order: OrderModel::new(),
            positions: Observable::new(PositionMap::default()),
            session: None,
            settle_params,
        }
    }

    #[must_use]
    pub fn order(&self) -> &OrderModel {
        &self.order
    }

    /// Current positions.
    #[must_use]
    pub fn positions(&self) -> PositionMap {
        self.positions.get()
    }

    pub fn with_positions<R>(&self, f: impl FnOnce(&PositionMap) -> R) -> R {
        self.positions.with(f)
    }

    #[must_use]
    pub fn positions_observable(&self) -> Observable<PositionMap> {
        self.positions.clone()
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_session_live(&self) -> bool {
        self.session.is_some()
    }

    pub fn set_settle_params(&mut self, params: SpringParams) {
        self.settle_params = params;
    }

    /// Full rebuild from entries. Callers must not rebuild mid-session.
    ///
    /// Returns `true` if the order or positions changed.
    pub fn rebuild(&mut self, entries: &[OrderEntry], heights: &LayoutTracker) -> bool {
        debug_assert!(self.session.is_none(), "rebuild during a live drag");
        let start = Instant::now();
        let _span = tracing::debug_span!(
            "reorder.rebuild",
            item_count = entries.len() as u64,
            duration_us = tracing::field::Empty,
        )
        .entered();

        let _batch = BatchScope::new();
        let order_changed = self.order.rebuild(entries);
        let positions_changed = self.recompute_positions(heights);

        tracing::Span::current().record("duration_us", start.elapsed().as_micros() as u64);
        order_changed || positions_changed
    }

    /// Show entries in data order while layout is incomplete.
    pub fn show_provisional(&mut self, entries: &[OrderEntry], heights: &LayoutTracker) -> bool {
        let _batch = BatchScope::new();
        let order_changed = self.order.set_provisional(entries);
        let positions_changed = self.recompute_positions(heights);
        order_changed || positions_changed
    }

    /// Re-derive positions from the current order.
    pub fn recompute_positions(&mut self, heights: &LayoutTracker) -> bool {
        let derived = self.order.with_keys(|keys| PositionMap::derive(keys, heights));
        self.positions.set(derived)
    }

    /// Start a session on `key`, returning its anchor offset.
    pub fn begin_drag(&mut self, key: &Key, now: Instant) -> Result<f32, DragRejection> {
        if let Some(s) = &self.session {
            return Err(DragRejection::SessionLive {
                key: s.key.clone(),
                phase: s.phase,
            });
        }
        if !self.order.is_built() {
            return Err(DragRejection::LayoutPending);
        }
        let index = self
            .order
            .index_of(key)
            .ok_or_else(|| DragRejection::UnknownKey(key.clone()))?;
        let anchor = self.positions.with(|p| p.offset_at(index));

        self.session = Some(DragSession {
            key: key.clone(),
            section: self.order.section_of(key),
            anchor,
            live: anchor,
            start_index: index,
            index,
            committed: self.order.keys(),
            phase: DragPhase::Dragging,
            settle: None,
            settling_for: Duration::ZERO,
            cancelled: false,
            started_at: now,
        });
        tracing::debug!(target: "relist.reorder", key = %key, index, anchor, "drag started");
        Ok(anchor)
    }

    /// Follow the pointer. Returns the index change, if any.
    pub fn update_drag(
        &mut self,
        key: &Key,
        translation: f32,
        heights: &LayoutTracker,
    ) -> Option<IndexChange> {
        let session = self.session.as_mut()?;
        if session.phase != DragPhase::Dragging || &session.key != key {
            return None;
        }
        session.live = session.anchor + translation;

        let candidate = self.order.with_keys(|keys| {
            self.positions
                .with(|p| resolve_index(session.live, keys, p, heights))
        });
        let target = clamp_to_range(candidate, self.order.section_range(session.section));
        if target == session.index {
            return None;
        }

        let from = session.index;
        session.index = target;
        let change = IndexChange {
            key: session.key.clone(),
            from,
            to: target,
        };

        let _batch = BatchScope::new();
        self.order.move_key(from, target);
        self.recompute_positions(heights);
        tracing::trace!(
            target: "relist.reorder",
            key = %change.key,
            from,
            to = target,
            "drag index changed"
        );
        Some(change)
    }

    /// Release: spring the row from its live offset into its slot.
    pub fn end_drag(&mut self, key: &Key) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.phase != DragPhase::Dragging || &session.key != key {
            return false;
        }
        let rest = self.positions.with(|p| p.offset_at(session.index));
        Self::start_settle(session, rest, self.settle_params);
        true
    }

    /// Abort: restore the order from drag start and spring back.
    ///
    /// Returns the index change if the order had moved.
    pub fn cancel_drag(&mut self, key: &Key, heights: &LayoutTracker) -> Option<IndexChange> {
        let session = self.session.as_ref()?;
        if session.phase != DragPhase::Dragging || &session.key != key {
            return None;
        }
        let (from, to) = (session.index, session.start_index);
        let committed = session.committed.clone();

        let moved = {
            let _batch = BatchScope::new();
            let moved = self.order.restore(&committed);
            self.recompute_positions(heights);
            moved
        };
        let rest = self.positions.with(|p| p.offset_at(to));
        let settle_params = self.settle_params;
        let session = self.session.as_mut()?;
        session.index = to;
        session.cancelled = true;
        Self::start_settle(session, rest, settle_params);
        tracing::debug!(target: "relist.reorder", key = %session.key, "drag cancelled");

        moved.then(|| IndexChange {
            key: session.key.clone(),
            from,
            to,
        })
    }

    fn start_settle(session: &mut DragSession, rest: f32, params: SpringParams) {
        session.phase = DragPhase::Settling;
        session.settling_for = Duration::ZERO;
        session.settle =
            Some(Spring::new(f64::from(session.live), f64::from(rest)).with_params(params));
    }

    /// Advance the settle spring. Yields the commit once it comes to rest.
    pub fn tick(&mut self, dt: Duration) -> Option<Commit> {
        let session = self.session.as_mut()?;
        if session.phase != DragPhase::Settling {
            return None;
        }
        let spring = session.settle.as_mut()?;
        spring.advance(dt);
        session.settling_for += dt;
        if !spring.is_at_rest() && session.settling_for >= MAX_SETTLE {
            tracing::debug!(
                target: "relist.reorder",
                key = %session.key,
                offset = spring.position(),
                target_offset = spring.target(),
                "settle cut off"
            );
            spring.snap_to(spring.target());
        }
        session.live = spring.position() as f32;
        if spring.is_at_rest() {
            return self.finalize();
        }
        None
    }

    /// End any live session immediately, as a cancellation if still
    /// dragging. Skips the settle animation.
    pub fn finalize_now(&mut self, heights: &LayoutTracker) -> Option<Commit> {
        let session = self.session.as_ref()?;
        if session.phase == DragPhase::Dragging {
            let key = session.key.clone();
            self.cancel_drag(&key, heights);
        }
        self.finalize()
    }

    fn finalize(&mut self) -> Option<Commit> {
        let session = self.session.take()?;
        self.order.commit_ranks();
        let commit = Commit {
            key: session.key,
            from: session.start_index,
            to: session.index,
            cancelled: session.cancelled,
            order: self.order.keys(),
        };
        tracing::debug!(
            target: "relist.reorder",
            key = %commit.key,
            from = commit.from,
            to = commit.to,
            cancelled = commit.cancelled,
            held_ms = session.started_at.elapsed().as_millis() as u64,
            "drag committed"
        );
        Some(commit)
    }

    /// Offset to draw `key` at: the live offset while dragged, else its slot.
    #[must_use]
    pub fn display_offset(&self, key: &Key) -> Option<f32> {
        match &self.session {
            Some(s) if &s.key == key => Some(s.live),
            _ => self.positions.with(|p| p.offset(key)),
        }
    }

    /// Move the ordered keys to follow `snapshot` (edit cancel).
    pub fn restore_order(&mut self, snapshot: &[Key], heights: &LayoutTracker) -> bool {
        debug_assert!(self.session.is_none(), "restore during a live drag");
        let _batch = BatchScope::new();
        let moved = self.order.restore(snapshot);
        self.recompute_positions(heights);
        self.order.commit_ranks();
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f32 = 40.0;

    fn setup(items: &[(&str, Option<i64>)]) -> (ReorderEngine, LayoutTracker) {
        let heights = LayoutTracker::new();
        let entries: Vec<OrderEntry> = items
            .iter()
            .map(|&(k, s)| OrderEntry::new(k, Section::from(s)))
            .collect();
        for e in &entries {
            heights.report(&e.key, H);
        }
        let mut engine = ReorderEngine::default();
        engine.rebuild(&entries, &heights);
        (engine, heights)
    }

    fn names(engine: &ReorderEngine) -> Vec<String> {
        engine.order().keys().iter().map(ToString::to_string).collect()
    }

    fn settle(engine: &mut ReorderEngine) -> Commit {
        for _ in 0..600 {
            if let Some(c) = engine.tick(Duration::from_millis(16)) {
                return c;
            }
        }
        panic!("settle never completed");
    }

    #[test]
    fn resolve_uses_midpoints() {
        let (engine, heights) = setup(&[("a", None), ("b", None), ("c", None)]);
        let keys = engine.order().keys();
        let p = engine.positions();
        assert_eq!(resolve_index(0.0, &keys, &p, &heights), 0);
        assert_eq!(resolve_index(19.9, &keys, &p, &heights), 0);
        assert_eq!(resolve_index(20.0, &keys, &p, &heights), 1);
        assert_eq!(resolve_index(1000.0, &keys, &p, &heights), 2);
        assert_eq!(resolve_index(-50.0, &keys, &p, &heights), 0);
    }

    #[test]
    fn drag_down_shifts_rows_up() {
        let (mut engine, heights) =
            setup(&[("0", None), ("1", None), ("2", None), ("3", None), ("4", None)]);
        let k = Key::from("0");
        let t0 = Instant::now();
        assert_eq!(engine.begin_drag(&k, t0), Ok(0.0));
        let change = engine.update_drag(&k, 3.0 * H, &heights);
        assert_eq!(change.map(|c| (c.from, c.to)), Some((0, 3)));
        assert_eq!(names(&engine), ["1", "2", "3", "0", "4"]);
        assert_eq!(engine.positions().offset(&k), Some(3.0 * H));

        assert!(engine.end_drag(&k));
        let commit = settle(&mut engine);
        assert_eq!((commit.from, commit.to, commit.cancelled), (0, 3, false));
        assert!(engine.session().is_none());
        assert_eq!(engine.order().ranks().get("0"), Some(&3));
    }

    #[test]
    fn section_clamp_holds_at_boundary() {
        let (mut engine, heights) = setup(&[("1", Some(0)), ("2", Some(0)), ("3", Some(1))]);
        let k = Key::from("2");
        engine.begin_drag(&k, Instant::now()).unwrap();
        assert_eq!(engine.update_drag(&k, 100.0, &heights), None);
        assert_eq!(names(&engine), ["1", "2", "3"]);
        assert_eq!(engine.session().unwrap().live_offset(), 140.0);
    }

    #[test]
    fn rejects_second_session_even_when_settling() {
        let (mut engine, heights) = setup(&[("a", None), ("b", None)]);
        let (a, b) = (Key::from("a"), Key::from("b"));
        engine.begin_drag(&a, Instant::now()).unwrap();
        engine.update_drag(&a, 25.0, &heights);
        engine.end_drag(&a);
        assert!(matches!(
            engine.begin_drag(&b, Instant::now()),
            Err(DragRejection::SessionLive {
                phase: DragPhase::Settling,
                ..
            })
        ));
    }

    #[test]
    fn rejects_drag_before_layout() {
        let heights = LayoutTracker::new();
        let mut engine = ReorderEngine::default();
        engine.show_provisional(&[OrderEntry::new("a", Section::Unconstrained)], &heights);
        assert_eq!(
            engine.begin_drag(&Key::from("a"), Instant::now()),
            Err(DragRejection::LayoutPending)
        );
    }

    #[test]
    fn cancel_restores_start_order() {
        let (mut engine, heights) = setup(&[("a", None), ("b", None), ("c", None)]);
        let k = Key::from("a");
        engine.begin_drag(&k, Instant::now()).unwrap();
        engine.update_drag(&k, 2.0 * H, &heights);
        assert_eq!(names(&engine), ["b", "c", "a"]);

        let change = engine.cancel_drag(&k, &heights);
        assert_eq!(change.map(|c| (c.from, c.to)), Some((2, 0)));
        assert_eq!(names(&engine), ["a", "b", "c"]);
        let commit = settle(&mut engine);
        assert!(commit.cancelled);
        assert_eq!(commit.to, 0);
        assert_eq!(engine.display_offset(&k), Some(0.0));
    }

    #[test]
    fn release_in_place_commits_on_first_tick() {
        let (mut engine, _heights) = setup(&[("a", None), ("b", None)]);
        let k = Key::from("b");
        engine.begin_drag(&k, Instant::now()).unwrap();
        engine.end_drag(&k);
        let commit = engine.tick(Duration::from_millis(16)).unwrap();
        assert_eq!((commit.from, commit.to), (1, 1));
    }

    #[test]
    fn undamped_settle_is_cut_off() {
        let (mut engine, heights) = setup(&[("a", None), ("b", None)]);
        engine.set_settle_params(SpringParams::new(300.0, 0.0));
        let k = Key::from("a");
        engine.begin_drag(&k, Instant::now()).unwrap();
        engine.update_drag(&k, H + 5.0, &heights);
        engine.end_drag(&k);

        let frame = Duration::from_millis(16);
        let mut elapsed = Duration::ZERO;
        let commit = loop {
            elapsed += frame;
            if let Some(commit) = engine.tick(frame) {
                break commit;
            }
            assert!(elapsed <= MAX_SETTLE + frame, "settle never committed");
        };
        assert!(elapsed >= MAX_SETTLE - frame);
        assert_eq!((commit.from, commit.to), (0, 1));
        assert!(!engine.is_session_live());
        assert_eq!(engine.display_offset(&k), Some(H));
    }

    #[test]
    fn finalize_now_cancels_live_drag() {
        let (mut engine, heights) = setup(&[("a", None), ("b", None)]);
        let k = Key::from("a");
        engine.begin_drag(&k, Instant::now()).unwrap();
        engine.update_drag(&k, H, &heights);
        let commit = engine.finalize_now(&heights).unwrap();
        assert!(commit.cancelled);
        assert_eq!(names(&engine), ["a", "b"]);
        assert!(engine.finalize_now(&heights).is_none());
    }

    #[test]
    fn updates_for_other_keys_are_ignored() {
        let (mut engine, heights) = setup(&[("a", None), ("b", None)]);
        engine.begin_drag(&Key::from("a"), Instant::now()).unwrap();
        assert_eq!(engine.update_drag(&Key::from("b"), 200.0, &heights), None);
        assert!(!engine.end_drag(&Key::from("b")));
    }
}
