//! # LogWriter: events to `tracing`
//!
//! A subscriber that renders worker events as structured `tracing` records.
//! Installing a `tracing` subscriber (formatting, filtering) is up to the application.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! DEBUG waitvisor: worker starting worker_id=3 worker="primer-search"
//!  INFO waitvisor: worker finished worker_id=3 worker="primer-search" elapsed_ms=200 outcome="completed"
//!  WARN waitvisor: worker failed worker_id=4 worker="blast" reason="execution failed: boom"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event-to-`tracing` subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let worker = e.worker.as_deref().unwrap_or("unknown");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::WorkerStarting => {
                tracing::debug!(worker_id = ?e.worker_id, worker, "worker starting");
            }
            EventKind::WorkerFinished => {
                tracing::info!(
                    worker_id = ?e.worker_id,
                    worker,
                    elapsed_ms = ?e.elapsed_ms,
                    outcome = reason,
                    "worker finished"
                );
            }
            EventKind::WorkerSilenced => {
                tracing::debug!(
                    worker_id = ?e.worker_id,
                    worker,
                    outcome = reason,
                    "worker silenced"
                );
            }
            EventKind::WorkerConflict => {
                tracing::warn!(worker_id = ?e.worker_id, worker, reason, "stale peer instance");
            }
            EventKind::WorkerFailed => {
                tracing::warn!(worker_id = ?e.worker_id, worker, reason, "worker failed");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn every_kind_becomes_a_record() {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let log = LogWriter::new();
        let events = [
            Event::new(EventKind::WorkerStarting),
            Event::new(EventKind::WorkerFinished)
                .with_elapsed(Duration::from_millis(200))
                .with_reason("completed"),
            Event::new(EventKind::WorkerSilenced).with_reason("upstream_closed"),
            Event::new(EventKind::WorkerConflict).with_reason("mbuf"),
            Event::new(EventKind::WorkerFailed).with_reason("execution failed: boom"),
        ];
        for ev in events {
            log.on_event(&ev.with_worker(3, "primer-search")).await;
        }

        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        for needle in [
            "worker starting",
            "worker finished",
            "elapsed_ms=Some(200)",
            "worker silenced",
            "stale peer instance",
            "worker failed",
            "execution failed: boom",
        ] {
            assert!(text.contains(needle), "missing {needle:?} in\n{text}");
        }
        assert_eq!(text.matches("worker=\"primer-search\"").count(), 5, "{text}");
        assert_eq!(log.name(), "LogWriter");
    }
}
