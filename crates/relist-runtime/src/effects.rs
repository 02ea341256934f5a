#![forbid(unsafe_code)]

//! Application-context effect queue.
//!
//! The animation context must never run caller code or platform side
//! effects inline: a slow haptic engine or a parent callback that re-renders
//! would stall the frame. Instead it [`post`](EffectQueue::post)s a labelled
//! job and moves on. The application context later calls
//! [`flush`](EffectQueue::flush), which runs the queued jobs in order.
//!
//! # Failure isolation
//!
//! A job returning `Err` is logged at `warn`; a job that panics is caught and
//! logged at `error`. Neither stops the remaining jobs, and neither is
//! propagated to the caller of `flush`. Failures are tallied in the returned
//! [`FlushReport`] and in process-wide counters.
//!
//! Catching panics needs an unwinding build. Under `panic = "abort"` a
//! panicking job aborts the process before the queue sees it; only `Err`
//! results are isolated there.
//!
//! # Invariants
//!
//! 1. Jobs run in post order, each at most once.
//! 2. Jobs posted *during* a flush are kept for the next flush.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use web_time::Instant;

use crate::haptics::HapticsError;

// ---------------------------------------------------------------------------
// Monotonic counters
// ---------------------------------------------------------------------------

static EFFECTS_EXECUTED_TOTAL: AtomicU64 = AtomicU64::new(0);
static EFFECTS_FAILED_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Total effects run to completion, process-wide.
#[must_use]
pub fn effects_executed_total() -> u64 {
    EFFECTS_EXECUTED_TOTAL.load(Ordering::Relaxed)
}

/// Total effects that returned an error or panicked, process-wide.
#[must_use]
pub fn effects_failed_total() -> u64 {
    EFFECTS_FAILED_TOTAL.load(Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A side effect that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    /// Haptic pulse failed or is unsupported.
    Haptics(HapticsError),
    /// The job panicked.
    Panicked { label: &'static str, message: String },
}

impl fmt::Display for EffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Haptics(err) => write!(f, "{err}"),
            Self::Panicked { label, message } => {
                write!(f, "effect '{label}' panicked: {message}")
            }
        }
    }
}

impl std::error::Error for EffectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Haptics(err) => Some(err),
            Self::Panicked { .. } => None,
        }
    }
}

impl From<HapticsError> for EffectError {
    fn from(err: HapticsError) -> Self {
        Self::Haptics(err)
    }
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

type Job = Box<dyn FnOnce() -> Result<(), EffectError>>;

struct PendingEffect {
    label: &'static str,
    job: Job,
}

/// Outcome of one [`EffectQueue::flush`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Jobs that completed successfully.
    pub executed: usize,
    /// Jobs that failed, in run order.
    pub failures: Vec<EffectError>,
}

impl FlushReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Jobs attempted, successful or not.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.executed + self.failures.len()
    }
}

/// Shared FIFO of side effects awaiting the application context.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct EffectQueue {
    pending: Rc<RefCell<VecDeque<PendingEffect>>>,
}

impl fmt::Debug for EffectQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectQueue")
            .field("pending", &self.len())
            .finish()
    }
}

impl EffectQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fallible job. Never runs it inline.
    pub fn post(&self, label: &'static str, job: impl FnOnce() -> Result<(), EffectError> + 'static) {
        tracing::trace!(target: "relist.effect", effect = label, "effect posted");
        self.pending.borrow_mut().push_back(PendingEffect {
            label,
            job: Box::new(job),
        });
    }

    /// Queue a job that cannot report failure (it may still panic).
    pub fn post_fn(&self, label: &'static str, job: impl FnOnce() + 'static) {
        self.post(label, move || {
            job();
            Ok(())
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Labels of queued jobs, in run order.
    #[must_use]
    pub fn pending_labels(&self) -> Vec<&'static str> {
        self.pending.borrow().iter().map(|p| p.label).collect()
    }

    /// Drop every queued job without running it.
    pub fn clear(&self) {
        self.pending.borrow_mut().clear();
    }

    /// Run every job queued before this call. Failures are logged, counted,
    /// and reported; they never propagate.
    pub fn flush(&self) -> FlushReport {
        let batch: Vec<PendingEffect> = self.pending.borrow_mut().drain(..).collect();
        let mut report = FlushReport::default();
        if batch.is_empty() {
            return report;
        }

        let start = Instant::now();
        let _span = tracing::debug_span!(
            "effect.flush",
            effect_count = batch.len() as u64,
            failures = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        )
        .entered();

        for PendingEffect { label, job } in batch {
            // No-op under panic = "abort".
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job));
            let result = match outcome {
                Ok(result) => result,
                Err(payload) => Err(EffectError::Panicked {
                    label,
                    message: panic_message(payload.as_ref()),
                }),
            };
            match result {
                Ok(()) => {
                    EFFECTS_EXECUTED_TOTAL.fetch_add(1, Ordering::Relaxed);
                    report.executed += 1;
                }
                Err(err) => {
                    EFFECTS_FAILED_TOTAL.fetch_add(1, Ordering::Relaxed);
                    match &err {
                        EffectError::Panicked { .. } => tracing::error!(
                            target: "relist.effect",
                            effect = label,
                            error = %err,
                            "effect panicked during execution"
                        ),
                        EffectError::Haptics(_) => tracing::warn!(
                            target: "relist.effect",
                            effect = label,
                            error = %err,
                            "effect failed"
                        ),
                    }
                    report.failures.push(err);
                }
            }
        }

        let span = tracing::Span::current();
        span.record("failures", report.failures.len() as u64);
        span.record("duration_us", start.elapsed().as_micros() as u64);
        report
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
