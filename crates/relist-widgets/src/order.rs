#![forbid(unsafe_code)]

//! Authoritative render order of item keys.
//!
//! # Rebuild
//!
//! Every data or layout change rebuilds the order from the incoming entries
//! and the ranks remembered from the previous build:
//!
//! 1. A key seen before keeps its remembered rank; an unseen key ranks at its
//!    position in the incoming data.
//! 2. Entries sort by `(section, rank, sort_order hint, data index)`, so
//!    numbered groups come first in ascending order and the unconstrained
//!    group forms the tail.
//! 3. Each key's new index becomes its rank for the next rebuild. Ranks of
//!    keys no longer present are dropped.
//!
//! Rebuilding to the order already held is a no-op on the backing
//! [`Observable`]: no version bump, no notification.
//!
//! # Invariants
//!
//! 1. `keys()` is a permutation of the keys of the last rebuild.
//! 2. Within the built order each section occupies one contiguous range.

use std::cmp::Ordering;

use ahash::{AHashMap, AHashSet};
use relist_runtime::Observable;

use crate::item::{Key, Section};

/// What a rebuild needs to know about one item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEntry {
    pub key: Key,
    pub section: Section,
    pub sort_order: Option<f64>,
}

impl OrderEntry {
    #[must_use]
    pub fn new(key: impl Into<Key>, section: Section) -> Self {
        Self {
            key: key.into(),
            section,
            sort_order: None,
        }
    }

    #[must_use]
    pub fn with_sort_order(mut self, sort_order: f64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }
}

/// Ordered key sequence plus remembered ranks.
#[derive(Debug, Clone)]
pub struct OrderModel {
    keys: Observable<Vec<Key>>,
    sections: AHashMap<Key, Section>,
    ranks: AHashMap<Key, usize>,
    built: bool,
}

impl Default for OrderModel {
    fn default() -> Self {
        Self::new()
    }
}

fn cmp_hint(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl OrderModel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: Observable::new(Vec::new()),
            sections: AHashMap::new(),
            ranks: AHashMap::new(),
            built: false,
        }
    }

    /// Rebuild from `entries`. Returns `true` if the key order changed.
    pub fn rebuild(&mut self, entries: &[OrderEntry]) -> bool {
        let mut sorted: Vec<(usize, usize)> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, self.ranks.get(&e.key).copied().unwrap_or(i)))
            .collect();
        sorted.sort_by(|&(ia, ra), &(ib, rb)| {
            let (a, b) = (&entries[ia], &entries[ib]);
            a.section
                .cmp(&b.section)
                .then(ra.cmp(&rb))
                .then_with(|| cmp_hint(a.sort_order, b.sort_order))
                .then(ia.cmp(&ib))
        });

        let keys: Vec<Key> = sorted.iter().map(|&(i, _)| entries[i].key.clone()).collect();
        self.sections = entries.iter().map(|e| (e.key.clone(), e.section)).collect();
        self.ranks = keys.iter().enumerate().map(|(i, k)| (k.clone(), i)).collect();
        self.built = true;
        self.keys.set(keys)
    }

    /// Show `entries` in data order without consulting or persisting ranks.
    ///
    /// Used while heights are still being measured.
    pub fn set_provisional(&mut self, entries: &[OrderEntry]) -> bool {
        self.sections = entries.iter().map(|e| (e.key.clone(), e.section)).collect();
        self.built = false;
        self.keys.set(entries.iter().map(|e| e.key.clone()).collect())
    }

    /// Whether the current order came from a full rebuild.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        self.keys.get()
    }

    pub fn with_keys<R>(&self, f: impl FnOnce(&[Key]) -> R) -> R {
        self.keys.with(|k| f(k))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.with(Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn index_of(&self, key: &Key) -> Option<usize> {
        self.keys.with(|k| k.iter().position(|x| x == key))
    }

    #[must_use]
    pub fn key_at(&self, index: usize) -> Option<Key> {
        self.keys.with(|k| k.get(index).cloned())
    }

    #[must_use]
    pub fn section_of(&self, key: &Key) -> Section {
        self.sections.get(key).copied().unwrap_or_default()
    }

    /// First and last index occupied by `section`, if any item is in it.
    #[must_use]
    pub fn section_range(&self, section: Section) -> Option<(usize, usize)> {
        self.keys.with(|keys| {
            let mut members = keys
                .iter()
                .enumerate()
                .filter(|(_, k)| self.section_of(k) == section)
                .map(|(i, _)| i);
            let first = members.next()?;
            Some((first, members.last().unwrap_or(first)))
        })
    }

    /// Splice the key at `from` out and reinsert it at `to`.
    pub fn move_key(&mut self, from: usize, to: usize) -> bool {
        let len = self.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        self.keys.update(|keys| {
            let key = keys.remove(from);
            keys.insert(to, key);
        })
    }

    /// Reorder to follow `snapshot`.
    ///
    /// Snapshot keys no longer present are skipped; present keys missing
    /// from the snapshot keep their current relative order at the end.
    pub fn restore(&mut self, snapshot: &[Key]) -> bool {
        let current = self.keys();
        let present: AHashSet<&Key> = current.iter().collect();
        let mut restored: Vec<Key> = snapshot
            .iter()
            .filter(|k| present.contains(k))
            .cloned()
            .collect();
        let placed: AHashSet<Key> = restored.iter().cloned().collect();
        restored.extend(current.iter().filter(|k| !placed.contains(*k)).cloned());
        self.keys.set(restored)
    }

    /// Persist the current indices as ranks for the next rebuild.
    pub fn commit_ranks(&mut self) {
        self.ranks = self.keys.with(|keys| {
            keys.iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), i))
                .collect()
        });
    }

    #[must_use]
    pub fn ranks(&self) -> &AHashMap<Key, usize> {
        &self.ranks
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.keys.version()
    }

    #[must_use]
    pub fn observable(&self) -> Observable<Vec<Key>> {
        self.keys.clone()
    }
}
