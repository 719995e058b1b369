//! # SupervisedWorker: one timed, classified, self-reporting unit.
//!
//! Wraps one target together with its identity and bound arguments. Running it:
//!
//! ```text
//! start() ──► tokio::spawn(run())  (detached, caller is not blocked)
//!
//! run():
//!   ├─► t0 = now, publish WorkerStarting
//!   ├─► async { target.spawn(ctx).await }.catch_unwind()
//!   │       ├─ Ok(())  ──► Outcome::Completed(now - t0)
//!   │       ├─ Err(e)  ──► classifier.classify(&e)
//!   │       └─ panic   ──► classifier.classify(&Panicked)
//!   └─► match outcome (exactly once):
//!         ├─ Cancelled | UpstreamClosed | Transient ──► publish WorkerSilenced, return
//!         ├─ Conflict  ──► sink.write(remediation)   ─┐
//!         ├─ Failed    ──► sink.write(error + trace) ─┤ elapsed = 0
//!         └─ Completed ───────────────────────────────┤ elapsed = measured
//!                                                     ▼
//!                            sleep(settle) ──► sink.write("Task #id has finished") ──► WorkerFinished
//! ```
//!
//! ## Rules
//! - Exactly **one** terminal path per worker: silent, or final report (optionally preceded
//!   by one diagnostic)
//! - The sink lock is taken per write only, never across the target or the settle delay
//! - Errors never reach the caller; they surface only as sink text (and bus events)
//! - A worker is consumed by `start`/`run` and cannot be restarted

use std::borrow::Cow;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::classify::{Classify, ErrnoClassifier};
use crate::config::WorkerConfig;
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::outcome::{Elapsed, Outcome};
use crate::report;
use crate::sink::OutputSink;
use crate::tasks::{TaskArgs, TaskContext, TaskRef};
use crate::worker::DetachedWorker;

/// One concurrent execution unit wrapping a target.
///
/// Many workers share one [`OutputSink`] through an `Arc`; nothing else is shared.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use waitvisor::{OutputSink, SupervisedWorker, TaskContext, TaskError, TaskFn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (sink, transcript) = OutputSink::transcript();
/// let sink = Arc::new(sink);
///
/// let target = TaskFn::arc(|_ctx: TaskContext| async move {
///     tokio::time::sleep(Duration::from_millis(5)).await;
///     Ok::<_, TaskError>(())
/// });
///
/// SupervisedWorker::new(sink, 3, target)
///     .with_name("primer-search")
///     .start()
///     .join()
///     .await;
///
/// assert!(transcript.text().starts_with("Task #3 has finished:\n   primer-search\n"));
/// # }
/// ```
pub struct SupervisedWorker {
    id: u64,
    name: Cow<'static, str>,
    target: TaskRef,
    args: TaskArgs,
    sink: Arc<OutputSink>,
    classifier: Arc<dyn Classify>,
    cfg: WorkerConfig,
    bus: Option<Bus>,
    token: CancellationToken,
}

impl SupervisedWorker {
    /// Creates a worker for `target` reporting through `sink` under task identifier `id`.
    ///
    /// Defaults: name `worker-<id>`, no arguments, [`ErrnoClassifier`],
    /// [`WorkerConfig::default`], no event bus, a fresh cancellation token.
    pub fn new(sink: Arc<OutputSink>, id: u64, target: TaskRef) -> Self {
        Self {
            id,
            name: Cow::Owned(format!("worker-{id}")),
            target,
            args: TaskArgs::default(),
            sink,
            classifier: Arc::new(ErrnoClassifier),
            cfg: WorkerConfig::default(),
            bus: None,
            token: CancellationToken::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces all bound arguments.
    pub fn with_args(mut self, args: TaskArgs) -> Self {
        self.args = args;
        self
    }

    /// Replaces the positional arguments.
    pub fn with_positional(mut self, positional: Vec<Value>) -> Self {
        self.args.positional = positional;
        self
    }

    /// Sets one named argument.
    pub fn with_named(mut self, key: impl Into<String>, value: Value) -> Self {
        self.args.named.insert(key.into(), value);
        self
    }

    /// Replaces the failure classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn Classify>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: WorkerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Publishes lifecycle events on `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Derives the target's cancellation token from `parent`.
    pub fn with_token(mut self, parent: &CancellationToken) -> Self {
        self.token = parent.child_token();
        self
    }

    /// Caller-assigned task identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Always `true`: the host may exit without waiting for this worker.
    pub fn is_daemon(&self) -> bool {
        true
    }

    /// Starts the run procedure on the tokio runtime without blocking the caller.
    ///
    /// Fire-and-forget: the returned handle owns no result and dropping it detaches the
    /// worker. When the runtime shuts down, unfinished workers are abandoned mid-flight
    /// with no final report and no cleanup.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(self) -> DetachedWorker {
        let id = self.id;
        DetachedWorker::new(id, tokio::spawn(self.run()))
    }

    /// Runs the target, classifies the result and reports, in the current task.
    pub async fn run(self) {
        let started = Instant::now();
        tracing::debug!(worker_id = self.id, worker = %self.name, "worker starting");
        self.publish(Event::new(EventKind::WorkerStarting));

        let ctx = TaskContext {
            id: self.id,
            name: self.name.clone(),
            args: self.args.clone(),
            token: self.token.clone(),
        };
        // `spawn` itself may panic before handing back a future.
        let target = Arc::clone(&self.target);
        let res = std::panic::AssertUnwindSafe(async move { target.spawn(ctx).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(TaskError::panicked(&*panic)));

        let outcome = match res {
            Ok(()) => Outcome::Completed(started.elapsed()),
            Err(e) => self.classifier.classify(&e),
        };
        self.report(outcome).await;
    }

    async fn report(&self, outcome: Outcome) {
        let Some(elapsed) = outcome.reported_elapsed() else {
            tracing::debug!(
                worker_id = self.id,
                worker = %self.name,
                outcome = outcome.as_label(),
                "worker exited silently"
            );
            self.publish(Event::new(EventKind::WorkerSilenced).with_reason(outcome.as_label()));
            return;
        };

        match &outcome {
            Outcome::Conflict { detail } => {
                tracing::warn!(
                    worker_id = self.id,
                    worker = %self.name,
                    %detail,
                    "stale peer instance"
                );
                self.sink
                    .write(&report::conflict(&self.name, detail, &self.cfg.peer_process));
                self.publish(Event::new(EventKind::WorkerConflict).with_reason(detail.as_str()));
            }
            Outcome::Failed { detail, trace } => {
                tracing::warn!(worker_id = self.id, worker = %self.name, %detail, "worker failed");
                self.sink.write(&report::failure(&self.name, detail, trace));
                self.publish(Event::new(EventKind::WorkerFailed).with_reason(detail.as_str()));
            }
            _ => {}
        }

        time::sleep(self.cfg.settle).await;
        self.sink.write(&report::finished(self.id, &self.name, elapsed));
        tracing::debug!(
            worker_id = self.id,
            worker = %self.name,
            elapsed = %Elapsed(elapsed),
            outcome = outcome.as_label(),
            "worker finished"
        );
        self.publish(
            Event::new(EventKind::WorkerFinished)
                .with_elapsed(elapsed)
                .with_reason(outcome.as_label()),
        );
    }

    fn publish(&self, ev: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(ev.with_worker(self.id, self.name.as_ref()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Transcript;
    use crate::tasks::{BlockingFn, TaskFn};
    use serde_json::json;
    use std::io;
    use std::time::Duration;

    fn sink() -> (Arc<OutputSink>, Transcript) {
        let (sink, transcript) = OutputSink::transcript();
        (Arc::new(sink), transcript)
    }

    fn failing(err: fn() -> TaskError) -> TaskRef {
        TaskFn::arc(move |_ctx: TaskContext| async move { Err::<(), TaskError>(err()) })
    }

    #[tokio::test(start_paused = true)]
    async fn success_reports_measured_elapsed() {
        let (sink, transcript) = sink();
        let target = TaskFn::arc(|_ctx: TaskContext| async move {
            time::sleep(Duration::from_millis(200)).await;
            Ok::<_, TaskError>(())
        });

        SupervisedWorker::new(sink, 3, target)
            .with_name("primer-search")
            .run()
            .await;

        assert_eq!(
            transcript.blocks(),
            vec!["Task #3 has finished:\n   primer-search\nElapsed time: 0:00:00.200000"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn default_name_uses_id() {
        let (sink, transcript) = sink();
        let target = TaskFn::arc(|_ctx: TaskContext| async move { Ok::<_, TaskError>(()) });

        let worker = SupervisedWorker::new(sink, 9, target);
        assert_eq!(worker.name(), "worker-9");
        assert!(worker.is_daemon());
        worker.run().await;

        assert_eq!(
            transcript.blocks(),
            vec!["Task #9 has finished:\n   worker-9\nElapsed time: 0:00:00"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_signals_produce_no_output() {
        let silent: [fn() -> TaskError; 4] = [
            || TaskError::Canceled,
            || TaskError::upstream_closed("manager terminated"),
            || io::Error::from(io::ErrorKind::UnexpectedEof).into(),
            || io::Error::from(io::ErrorKind::Interrupted).into(),
        ];
        for err in silent {
            let (sink, transcript) = sink();
            SupervisedWorker::new(sink.clone(), 1, failing(err)).run().await;
            assert!(transcript.is_empty(), "{:?}", transcript.blocks());
            assert_eq!(sink.writes(), 0);
        }
    }

    #[cfg(unix)]
    #[tokio::test(start_paused = true)]
    async fn stale_peer_conflict_writes_hint_then_zero_report() {
        let (sink, transcript) = sink();
        let target = failing(|| {
            io::Error::from_raw_os_error(nix::errno::Errno::EBADMSG as i32).into()
        });

        SupervisedWorker::new(sink, 2, target)
            .with_name("primer-search")
            .with_config(WorkerConfig::default().with_peer_process("degen_primer"))
            .run()
            .await;

        let blocks = transcript.blocks();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Error in thread: primer-search\n"));
        assert!(blocks[0].contains("old degen_primer instance is running in the system"));
        assert!(blocks[1].ends_with("Elapsed time: 0:00:00"));
    }

    #[tokio::test(start_paused = true)]
    async fn injected_classifier_drives_conflict_path() {
        let (sink, transcript) = sink();
        let classifier: Arc<dyn Classify> = Arc::new(|err: &TaskError| match err {
            TaskError::Fail { error, .. } if error == "mbuf" => Outcome::Conflict {
                detail: error.clone(),
            },
            other => ErrnoClassifier.classify(other),
        });
        let target = TaskFn::arc(|_ctx: TaskContext| async move {
            time::sleep(Duration::from_millis(50)).await;
            Err::<(), TaskError>(TaskError::fail("mbuf"))
        });

        SupervisedWorker::new(sink, 5, target)
            .with_name("primer-search")
            .with_classifier(classifier)
            .run()
            .await;

        let blocks = transcript.blocks();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("mbuf"));
        assert!(blocks[0].contains("old"));
        assert!(blocks[0].contains("running in the system"));
        assert_eq!(
            blocks[1],
            "Task #5 has finished:\n   primer-search\nElapsed time: 0:00:00"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn generic_failure_writes_trace_then_zero_report() {
        #[derive(Debug, thiserror::Error)]
        #[error("alignment failed")]
        struct Align(#[source] io::Error);

        let (sink, transcript) = sink();
        let target = TaskFn::arc(|_ctx: TaskContext| async move {
            time::sleep(Duration::from_millis(300)).await;
            Err::<(), TaskError>(TaskError::from_error(&Align(io::Error::other(
                "index corrupt",
            ))))
        });

        SupervisedWorker::new(sink, 4, target)
            .with_name("blast")
            .run()
            .await;

        let blocks = transcript.blocks();
        assert_eq!(blocks.len(), 2);
        assert!(
            blocks[0].starts_with("Error in thread: blast\nexecution failed: alignment failed\n")
        );
        assert!(blocks[0].contains("Caused by: index corrupt"));
        assert_eq!(blocks[1], "Task #4 has finished:\n   blast\nElapsed time: 0:00:00");
    }

    #[tokio::test(start_paused = true)]
    async fn unclassified_io_failure_carries_a_trace() {
        let (sink, transcript) = sink();
        let target = failing(|| io::Error::new(io::ErrorKind::PermissionDenied, "locked").into());

        SupervisedWorker::new(sink, 13, target).with_name("w").run().await;

        let blocks = transcript.blocks();
        assert_eq!(blocks.len(), 2);
        assert!(
            blocks[0].starts_with("Error in thread: w\nlocked\nI/O error kind: permission denied"),
            "{:?}",
            blocks[0]
        );
        assert!(blocks[1].ends_with("Elapsed time: 0:00:00"));
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_target_is_reported_as_failure() {
        let (sink, transcript) = sink();
        let target = TaskFn::arc(|ctx: TaskContext| async move {
            if ctx.id == 6 {
                panic!("primer table missing");
            }
            Ok::<_, TaskError>(())
        });

        SupervisedWorker::new(sink, 6, target).run().await;

        let blocks = transcript.blocks();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("primer table missing"));
        assert!(blocks[1].ends_with("Elapsed time: 0:00:00"));
    }

    #[tokio::test(start_paused = true)]
    async fn panic_before_the_future_exists_is_a_failure() {
        let (sink, transcript) = sink();
        let target = TaskFn::arc(|ctx: TaskContext| {
            let rounds: u32 = ctx.args.get("rounds").unwrap();
            async move {
                time::sleep(Duration::from_millis(u64::from(rounds))).await;
                Ok::<_, TaskError>(())
            }
        });

        SupervisedWorker::new(sink, 12, target)
            .with_name("melt")
            .start()
            .join()
            .await;

        let blocks = transcript.blocks();
        assert_eq!(blocks.len(), 2, "{blocks:?}");
        assert!(blocks[0].starts_with("Error in thread: melt\ntarget panicked: "));
        assert!(blocks[0].contains("rounds"));
        assert_eq!(blocks[1], "Task #12 has finished:\n   melt\nElapsed time: 0:00:00");
    }

    #[tokio::test(start_paused = true)]
    async fn arguments_reach_the_target() {
        let (sink, transcript) = sink();
        let target = TaskFn::arc(|ctx: TaskContext| async move {
            let seq: String = ctx.args.get_positional(0)?;
            let min_len: u32 = ctx.args.get("min_len")?;
            if seq == "ACGT" && min_len == 18 {
                Ok::<(), TaskError>(())
            } else {
                Err(TaskError::fail("wrong arguments"))
            }
        });

        SupervisedWorker::new(sink, 7, target)
            .with_positional(vec![json!("ACGT")])
            .with_named("min_len", json!(18))
            .run()
            .await;

        assert_eq!(transcript.len(), 1);
        assert!(transcript.blocks()[0].starts_with("Task #7 has finished:"));
    }

    #[tokio::test]
    async fn parent_cancellation_reaches_blocking_target() {
        let (sink, transcript) = sink();
        let root = CancellationToken::new();
        let target = BlockingFn::arc(|ctx: TaskContext| -> Result<(), TaskError> {
            while !ctx.token.is_cancelled() {
                std::thread::sleep(Duration::from_millis(1));
            }
            Err(TaskError::Canceled)
        });

        let handle = SupervisedWorker::new(sink, 8, target)
            .with_token(&root)
            .start();
        root.cancel();
        handle.join().await;

        assert!(transcript.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn events_mirror_the_terminal_path() {
        let (sink, _transcript) = sink();
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let target = failing(|| TaskError::fail("boom"));

        SupervisedWorker::new(sink, 11, target)
            .with_bus(bus)
            .run()
            .await;

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| {
                assert_eq!(ev.worker_id, Some(11));
                ev.kind
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::WorkerStarting,
                EventKind::WorkerFailed,
                EventKind::WorkerFinished
            ]
        );
    }
}
