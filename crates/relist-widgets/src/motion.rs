#![forbid(unsafe_code)]

//! Per-row springs that slide rows into their slots.

use std::time::Duration;

use ahash::AHashMap;
use relist_core::animation::{Spring, SpringParams};

use crate::item::Key;
use crate::positions::PositionMap;

/// Animated top offset of every row.
#[derive(Debug, Clone)]
pub struct MotionDriver {
    rows: AHashMap<Key, Spring>,
    params: SpringParams,
}

impl Default for MotionDriver {
    fn default() -> Self {
        Self::new(SpringParams::rows())
    }
}

impl MotionDriver {
    #[must_use]
    pub fn new(params: SpringParams) -> Self {
        Self {
            rows: AHashMap::new(),
            params,
        }
    }

    pub fn set_params(&mut self, params: SpringParams) {
        self.params = params;
        for spring in self.rows.values_mut() {
            let (pos, target) = (spring.position(), spring.target());
            *spring = Spring::new(pos, target).with_params(params);
        }
    }

    /// Point every row at its slot in `positions`.
    ///
    /// With `animate` rows glide there; without it they jump. Rows new to the
    /// driver always appear in place. Rows absent from `positions` are dropped.
    pub fn sync(&mut self, positions: &PositionMap, keys: &[Key], animate: bool) {
        self.rows.retain(|k, _| positions.offset(k).is_some());
        for key in keys {
            let Some(target) = positions.offset(key) else {
                continue;
            };
            let target = f64::from(target);
            match self.rows.get_mut(key) {
                Some(spring) if animate => spring.retarget(target),
                Some(spring) => spring.snap_to(target),
                None => {
                    self.rows
                        .insert(key.clone(), Spring::at(target).with_params(self.params));
                }
            }
        }
    }

    /// Jump one row to `offset` (end of its drag).
    pub fn snap(&mut self, key: &Key, offset: f32) {
        if let Some(spring) = self.rows.get_mut(key) {
            spring.snap_to(f64::from(offset));
        }
    }

    /// Advance every moving row. Returns `true` while any is still moving.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let mut moving = false;
        for spring in self.rows.values_mut() {
            spring.advance(dt);
            moving |= !spring.is_at_rest();
        }
        moving
    }

    #[must_use]
    pub fn offset(&self, key: &Key) -> Option<f32> {
        self.rows.get(key).map(|s| s.position() as f32)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.rows.values().all(Spring::is_at_rest)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
