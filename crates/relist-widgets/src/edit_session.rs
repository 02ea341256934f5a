#![forbid(unsafe_code)]

//! Edit mode for lists that are not permanently reorderable.
//!
//! A long press enters editing: a Save/Cancel header grows in from zero
//! height, the host's navigation chrome is hidden, and the key order is
//! snapshotted so Cancel can put it back. While the header animates the
//! scroll offset follows it so the row under the finger does not jump.
//!
//! ```text
//! Viewing ──long press──► Editing ──save | cancel──► Viewing
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use relist_core::animation::{Spring, SpringParams};
use relist_runtime::Observable;

use crate::item::Key;

/// Default full height of the edit header, in pixels.
pub const DEFAULT_HEADER_HEIGHT: f32 = 56.0;

/// The host's scroll container.
pub trait ScrollHandle {
    fn offset(&self) -> f32;
    fn scroll_to(&mut self, offset: f32);
}

/// Shared scroll offset cell for hosts without a native scroll view.
///
/// Clones share the same offset.
#[derive(Debug, Clone, Default)]
pub struct ScrollOffset(Rc<Cell<f32>>);

impl ScrollOffset {
    #[must_use]
    pub fn new(offset: f32) -> Self {
        Self(Rc::new(Cell::new(offset)))
    }

    #[must_use]
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    pub fn set(&self, offset: f32) {
        self.0.set(offset);
    }
}

impl ScrollHandle for ScrollOffset {
    fn offset(&self) -> f32 {
        self.0.get()
    }

    fn scroll_to(&mut self, offset: f32) {
        self.0.set(offset);
    }
}

/// Editing state, header animation and scroll compensation.
#[derive(Debug, Clone)]
pub struct EditSession {
    editing: Observable<bool>,
    navigation: Observable<bool>,
    header: Spring,
    header_height: f32,
    baseline: f32,
    snapshot: Option<Vec<Key>>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_HEIGHT, SpringParams::header())
    }
}

impl EditSession {
    #[must_use]
    pub fn new(header_height: f32, params: SpringParams) -> Self {
        Self {
            editing: Observable::new(false),
            navigation: Observable::new(true),
            header: Spring::at(0.0).with_params(params),
            header_height: header_height.max(0.0),
            baseline: 0.0,
            snapshot: None,
        }
    }

    /// Share the host's navigation-visibility flag.
    #[must_use]
    pub fn with_navigation_flag(mut self, flag: Observable<bool>) -> Self {
        self.navigation = flag;
        self
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing.get()
    }

    /// Observable editing flag.
    #[must_use]
    pub fn editing(&self) -> Observable<bool> {
        self.editing.clone()
    }

    #[must_use]
    pub fn navigation(&self) -> Observable<bool> {
        self.navigation.clone()
    }

    /// Current (animated) header height.
    #[must_use]
    pub fn header_height(&self) -> f32 {
        self.header.position() as f32
    }

    #[must_use]
    pub fn full_header_height(&self) -> f32 {
        self.header_height
    }

    /// Scroll offset the compensation is anchored on.
    #[must_use]
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Order captured on entry.
    #[must_use]
    pub fn snapshot(&self) -> Option<&[Key]> {
        self.snapshot.as_deref()
    }

    /// Enter editing. Returns `false` if already editing.
    pub fn enter(&mut self, scroll_offset: f32, order: Vec<Key>) -> bool {
        if self.is_editing() {
            return false;
        }
        self.baseline = scroll_offset - self.header_height();
        self.snapshot = Some(order);
        self.header.retarget(f64::from(self.header_height));
        self.editing.set(true);
        self.navigation.set(false);
        tracing::info!(target: "relist.edit", baseline = self.baseline, "edit mode entered");
        true
    }

    /// Leave editing, returning the entry snapshot. `None` if not editing.
    pub fn exit(&mut self, scroll_offset: f32) -> Option<Vec<Key>> {
        if !self.is_editing() {
            return None;
        }
        self.baseline = scroll_offset - self.header_height();
        self.header.retarget(0.0);
        self.editing.set(false);
        self.navigation.set(true);
        tracing::info!(target: "relist.edit", "edit mode exited");
        Some(self.snapshot.take().unwrap_or_default())
    }

    /// Advance the header. Returns the scroll offset to apply while it moves.
    pub fn tick(&mut self, dt: Duration) -> Option<f32> {
        if self.header.is_at_rest() {
            return None;
        }
        self.header.advance(dt);
        Some(self.baseline + self.header_height())
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.header.is_at_rest()
    }
}
