#![forbid(unsafe_code)]

//! Item identity and grouping at the data boundary.
//!
//! Callers own their items. The engine only ever sees three things about an
//! item: its [`Key`] (from the caller's extractor), its [`Section`], and an
//! optional sort hint. [`ListItem`] exposes the latter two with defaults, so
//! a plain item type needs only `impl ListItem for Task {}`.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

/// Stable identity of an item. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Rc<str>);

impl Key {
    #[must_use]
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(Rc::from(s.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", &*self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(Rc::from(s))
    }
}

/// Group membership of an item.
///
/// An item may only be reordered within the contiguous range its section
/// occupies. Numbered groups sort ascending and come before the
/// unconstrained group. In a list where no item declares a group, every item
/// is `Unconstrained` and the range is the whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Section {
    Group(i64),
    #[default]
    Unconstrained,
}

impl Section {
    /// Map a bare optional number to a tagged section.
    #[must_use]
    pub const fn from_option(section: Option<i64>) -> Self {
        match section {
            Some(n) => Self::Group(n),
            None => Self::Unconstrained,
        }
    }

    #[must_use]
    pub const fn is_group(self) -> bool {
        matches!(self, Self::Group(_))
    }
}

impl From<Option<i64>> for Section {
    fn from(section: Option<i64>) -> Self {
        Self::from_option(section)
    }
}

/// What the engine may read from a caller's item.
pub trait ListItem {
    fn section(&self) -> Section {
        Section::Unconstrained
    }

    /// Initial-rank hint. Breaks ties between equal remembered ranks.
    fn sort_order(&self) -> Option<f64> {
        None
    }
}
