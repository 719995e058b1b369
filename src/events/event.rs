//! # Events emitted by supervised workers.
//!
//! The [`EventKind`] enum classifies what happened to a worker; the [`Event`] struct
//! carries the metadata (worker id and name, elapsed time, reason).
//!
//! Events are an observability side channel only. The textual reports written to the
//! [`OutputSink`](crate::OutputSink) remain the user-visible surface; silent exits produce
//! a [`EventKind::WorkerSilenced`] event but no sink output.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use waitvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::WorkerFinished)
//!     .with_worker(3, "primer-search")
//!     .with_elapsed(Duration::from_millis(200));
//!
//! assert_eq!(ev.kind, EventKind::WorkerFinished);
//! assert_eq!(ev.worker.as_deref(), Some("primer-search"));
//! assert_eq!(ev.elapsed_ms, Some(200));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of worker events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Worker invoked its target.
    ///
    /// Sets:
    /// - `worker_id`, `worker`: identity
    /// - `at`, `seq`
    WorkerStarting,

    /// Final "has finished" report written (after success, conflict or failure).
    ///
    /// Sets:
    /// - `worker_id`, `worker`: identity
    /// - `elapsed_ms`: reported duration (zero after a conflict or failure)
    /// - `reason`: outcome label
    /// - `at`, `seq`
    WorkerFinished,

    /// Worker exited without output (cancel, upstream closed, interrupted syscall).
    ///
    /// Sets:
    /// - `worker_id`, `worker`: identity
    /// - `reason`: outcome label
    /// - `at`, `seq`
    WorkerSilenced,

    /// Stale-instance conflict diagnostic written (followed by `WorkerFinished`).
    ///
    /// Sets:
    /// - `worker_id`, `worker`: identity
    /// - `reason`: error text
    /// - `at`, `seq`
    WorkerConflict,

    /// Unclassified failure diagnostic written (followed by `WorkerFinished`).
    ///
    /// Sets:
    /// - `worker_id`, `worker`: identity
    /// - `reason`: error text
    /// - `at`, `seq`
    WorkerFailed,
}

/// Worker event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Caller-assigned task identifier.
    pub worker_id: Option<u64>,
    /// Worker display name.
    pub worker: Option<Arc<str>>,
    /// Reported elapsed time in milliseconds (compact).
    pub elapsed_ms: Option<u64>,
    /// Human-readable reason (error text, outcome label).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker_id: None,
            worker: None,
            elapsed_ms: None,
            reason: None,
        }
    }

    /// Attaches worker identity.
    #[inline]
    pub fn with_worker(mut self, id: u64, name: impl Into<Arc<str>>) -> Self {
        self.worker_id = Some(id);
        self.worker = Some(name.into());
        self
    }

    /// Attaches an elapsed duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u64::MAX)) as u64;
        self.elapsed_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for the terminal worker events (exactly one per worker that ran to the end).
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::WorkerFinished | EventKind::WorkerSilenced
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::WorkerStarting);
        let b = Event::new(EventKind::WorkerStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn elapsed_is_stored_in_millis() {
        let ev = Event::new(EventKind::WorkerFinished).with_elapsed(Duration::from_micros(1_999));
        assert_eq!(ev.elapsed_ms, Some(1));
    }
}
