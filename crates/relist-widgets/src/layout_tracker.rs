#![forbid(unsafe_code)]

//! Measured row heights.
//!
//! Rows report their laid-out height once measured. The tracker keeps the
//! map in an [`Observable`] owned by one list instance, so separate lists
//! never see each other's measurements.

use ahash::{AHashMap, AHashSet};
use relist_runtime::Observable;

use crate::item::Key;

/// Heights keyed by item, in pixels.
pub type HeightMap = AHashMap<Key, f32>;

/// Per-list record of measured row heights.
#[derive(Debug, Clone)]
pub struct LayoutTracker {
    heights: Observable<HeightMap>,
}

impl Default for LayoutTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heights: Observable::new(HeightMap::new()),
        }
    }

    /// Record a measured height. Returns `true` if the map changed.
    ///
    /// Negative and non-finite heights are recorded as 0.
    pub fn report(&self, key: &Key, height: f32) -> bool {
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        if self.heights.with(|m| m.get(key) == Some(&height)) {
            return false;
        }
        tracing::trace!(target: "relist.reorder", key = %key, height, "height reported");
        self.heights.update(|m| {
            m.insert(key.clone(), height);
        })
    }

    /// Recorded height, or 0 if unmeasured.
    #[must_use]
    pub fn height(&self, key: &Key) -> f32 {
        self.heights.with(|m| m.get(key).copied().unwrap_or(0.0))
    }

    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.heights.with(|m| m.contains_key(key))
    }

    /// Whether every key in `keys` has a recorded height.
    pub fn is_complete<'a>(&self, mut keys: impl Iterator<Item = &'a Key>) -> bool {
        self.heights.with(|m| keys.all(|k| m.contains_key(k)))
    }

    /// Drop heights of keys not in `live`. Returns `true` if any were dropped.
    pub fn retain(&self, live: &AHashSet<Key>) -> bool {
        if self.heights.with(|m| m.keys().all(|k| live.contains(k))) {
            return false;
        }
        self.heights.update(|m| m.retain(|k, _| live.contains(k)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.with(|m| m.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bumps once per actual change.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.heights.version()
    }

    /// Shared handle for hosts that want to observe measurements.
    #[must_use]
    pub fn observable(&self) -> Observable<HeightMap> {
        self.heights.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(s: &str) -> Key {
        Key::from(s)
    }

    #[test]
    fn equal_report_is_noop() {
        let t = LayoutTracker::new();
        assert!(t.report(&k("a"), 40.0));
        assert!(!t.report(&k("a"), 40.0));
        assert_eq!(t.version(), 1);
        assert!(t.report(&k("a"), 44.0));
        assert_eq!(t.height(&k("a")), 44.0);
    }

    #[test]
    fn missing_height_defaults_to_zero() {
        let t = LayoutTracker::new();
        assert_eq!(t.height(&k("ghost")), 0.0);
        assert!(!t.contains(&k("ghost")));
    }

    #[test]
    fn bad_heights_clamp_to_zero() {
        let t = LayoutTracker::new();
        t.report(&k("neg"), -5.0);
        t.report(&k("nan"), f32::NAN);
        t.report(&k("inf"), f32::INFINITY);
        assert_eq!(t.height(&k("neg")), 0.0);
        assert_eq!(t.height(&k("nan")), 0.0);
        assert_eq!(t.height(&k("inf")), 0.0);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn completeness_tracks_known_keys() {
        let t = LayoutTracker::new();
        let keys = [k("a"), k("b")];
        t.report(&keys[0], 10.0);
        assert!(!t.is_complete(keys.iter()));
        t.report(&keys[1], 0.0);
        assert!(t.is_complete(keys.iter()));
    }

    #[test]
    fn retain_prunes_removed_keys() {
        let t = LayoutTracker::new();
        t.report(&k("a"), 10.0);
        t.report(&k("b"), 10.0);
        let live: AHashSet<Key> = [k("a")].into_iter().collect();
        assert!(t.retain(&live));
        assert!(!t.retain(&live));
        assert!(!t.contains(&k("b")));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn instances_are_isolated() {
        let a = LayoutTracker::new();
        let b = LayoutTracker::new();
        a.report(&k("x"), 10.0);
        assert!(b.is_empty());
    }
}
