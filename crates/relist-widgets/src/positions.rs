#![forbid(unsafe_code)]

//! Prefix-sum positions over the render order.

use ahash::AHashMap;

use crate::item::Key;
use crate::layout_tracker::LayoutTracker;

/// Top offset of every row, derived from order and heights.
///
/// `offset_at(i)` equals the sum of the heights of rows `0..i`; unmeasured
/// rows count as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionMap {
    offsets: Vec<f32>,
    by_key: AHashMap<Key, f32>,
    total: f32,
}

impl PositionMap {
    /// One pass over `order`, accumulating heights.
    #[must_use]
    pub fn derive(order: &[Key], heights: &LayoutTracker) -> Self {
        let mut offsets = Vec::with_capacity(order.len());
        let mut by_key = AHashMap::with_capacity(order.len());
        let mut acc = 0.0f32;
        for key in order {
            offsets.push(acc);
            by_key.insert(key.clone(), acc);
            acc += heights.height(key);
        }
        Self {
            offsets,
            by_key,
            total: acc,
        }
    }

    #[must_use]
    pub fn offset(&self, key: &Key) -> Option<f32> {
        self.by_key.get(key).copied()
    }

    /// Offset of the row at `index`; past the end this is the total height.
    #[must_use]
    pub fn offset_at(&self, index: usize) -> f32 {
        self.offsets.get(index).copied().unwrap_or(self.total)
    }

    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.total
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
