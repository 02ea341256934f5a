#![forbid(unsafe_code)]

//! Reactive state for list instances.
//!
//! Every list owns its own observables; nothing here is global except the
//! thread-local batch context, which only defers notifications.

pub mod batch;
pub mod observable;

pub use batch::BatchScope;
pub use observable::{Observable, Subscription};
