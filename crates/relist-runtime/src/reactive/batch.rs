#![forbid(unsafe_code)]

//! Batch coalescing for [`Observable`](super::Observable) notifications.
//!
//! A drag update touches several observables in sequence (key order,
//! positions, resolved index). Observers must never see the half-applied
//! state in between, so the engine wraps each update in a [`BatchScope`]:
//! values change immediately but notifications wait until the scope exits,
//! and each callback then fires once with the final value.
//!
//! # Invariants
//!
//! 1. Nested scopes are supported; only the outermost one flushes.
//! 2. Inside a batch, `Observable::get()` returns the latest value.
//! 3. After a batch exits, subscribers see only the final state.
//! 4. Flush runs callbacks in first-enqueue order.
//!
//! # Failure Modes
//!
//! - **Callback panics during flush**: the remaining callbacks still run and
//!   the first panic is re-raised afterwards.

use std::cell::RefCell;

type DeferredNotify = Box<dyn FnOnce()>;

struct DeferredEntry {
    key: Option<usize>,
    notify: DeferredNotify,
}

struct BatchContext {
    depth: u32,
    deferred: Vec<DeferredEntry>,
}

thread_local! {
    static BATCH_CTX: RefCell<Option<BatchContext>> = const { RefCell::new(None) };
}

/// Returns true if a batch is active on this thread.
pub fn is_batching() -> bool {
    BATCH_CTX.with(|ctx| ctx.borrow().is_some())
}

/// Queue `f` for the end of the current batch, or run it now if none.
///
/// Returns `true` if deferred.
pub fn defer_or_run(f: impl FnOnce() + 'static) -> bool {
    BATCH_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        if let Some(ref mut batch) = *guard {
            batch.deferred.push(DeferredEntry {
                key: None,
                notify: Box::new(f),
            });
            true
        } else {
            drop(guard);
            f();
            false
        }
    })
}

/// Like [`defer_or_run`], replacing any entry already queued under `key`.
///
/// The replacement keeps the original queue position.
pub fn defer_or_run_keyed(key: usize, f: impl FnOnce() + 'static) -> bool {
    BATCH_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        if let Some(ref mut batch) = *guard {
            if let Some(entry) = batch.deferred.iter_mut().find(|e| e.key == Some(key)) {
                entry.notify = Box::new(f);
            } else {
                batch.deferred.push(DeferredEntry {
                    key: Some(key),
                    notify: Box::new(f),
                });
            }
            true
        } else {
            drop(guard);
            f();
            false
        }
    })
}

fn flush() {
    let deferred: Vec<DeferredNotify> = BATCH_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        match *guard {
            Some(ref mut batch) => std::mem::take(&mut batch.deferred)
                .into_iter()
                .map(|entry| entry.notify)
                .collect(),
            None => Vec::new(),
        }
    });
    if deferred.is_empty() {
        return;
    }

    let _span = tracing::trace_span!("reactive.batch_flush", deferred = deferred.len() as u64)
        .entered();

    let mut first_panic: Option<Box<dyn std::any::Any + Send>> = None;
    for notify in deferred {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(notify));
        if let Err(payload) = result
            && first_panic.is_none()
        {
            first_panic = Some(payload);
        }
    }

    if let Some(payload) = first_panic {
        std::panic::resume_unwind(payload);
    }
}

/// RAII guard that defers observable notifications until dropped.
pub struct BatchScope {
    is_root: bool,
}

impl BatchScope {
    /// Begin a scope. Inside an existing batch this only nests.
    #[must_use]
    pub fn new() -> Self {
        let is_root = BATCH_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match *guard {
                Some(ref mut batch) => {
                    batch.depth += 1;
                    false
                }
                None => {
                    *guard = Some(BatchContext {
                        depth: 1,
                        deferred: Vec::new(),
                    });
                    true
                }
            }
        });
        Self { is_root }
    }

    /// Notifications queued in the current batch.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        BATCH_CTX.with(|ctx| ctx.borrow().as_ref().map_or(0, |b| b.deferred.len()))
    }

    /// Whether this scope will flush on drop.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_root
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let should_flush = BATCH_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            if let Some(ref mut batch) = *guard {
                batch.depth -= 1;
                batch.depth == 0
            } else {
                false
            }
        });

        if should_flush {
            // Clear the context even if a callback panics during flush.
            struct ClearOnExit;
            impl Drop for ClearOnExit {
                fn drop(&mut self) {
                    BATCH_CTX.with(|ctx| *ctx.borrow_mut() = None);
                }
            }
            let _clear = ClearOnExit;
            flush();
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("is_root", &self.is_root)
            .field("pending", &self.pending_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
