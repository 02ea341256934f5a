#![forbid(unsafe_code)]

//! Reorderable list engine.
//!
//! Rows report heights, pointer samples and frame ticks come in, and the
//! list answers with [`RowState`]s to render plus delegate callbacks queued
//! for the application context.

pub mod config;
pub mod edit_session;
pub mod item;
pub mod layout_tracker;
pub mod motion;
pub mod order;
pub mod positions;
pub mod reorder;
pub mod reorderable_list;

pub use config::{ConfigError, ReorderConfig};
pub use edit_session::{EditSession, ScrollHandle, ScrollOffset};
pub use item::{Key, ListItem, Section};
pub use layout_tracker::LayoutTracker;
pub use order::{OrderEntry, OrderModel};
pub use positions::PositionMap;
pub use reorder::{Commit, DragPhase, DragRejection, DragSession, ReorderEngine};
pub use reorderable_list::{ListDelegate, ReorderableList, RowFlags, RowPhase, RowState};
