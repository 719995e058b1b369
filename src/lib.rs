//! # waitvisor
//!
//! **Waitvisor** wraps caller-supplied tasks in supervised worker units. Each worker runs
//! its target once, measures how long it took, tells "the remote activity I was waiting
//! on was terminated" apart from "the task failed", and reports completion through an
//! output sink shared by every worker in the pool.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────┐
//!     │ SupervisedWorker │ │ SupervisedWorker │ │ SupervisedWorker │
//!     │  id=1 target=A   │ │  id=2 target=B   │ │  id=N target=..  │
//!     └────────┬─────────┘ └────────┬─────────┘ └────────┬─────────┘
//!              │ run target, time it, classify error (Classify)  │
//!              ▼                    ▼                    ▼
//!     ┌───────────────────────────────────────────────────────────┐
//!     │  Outcome: Completed | Cancelled | UpstreamClosed |         │
//!     │           Transient | Conflict | Failed                    │
//!     └────────┬──────────────────────────────────┬───────────────┘
//!              │ non-silent: one atomic write each │ events (optional)
//!              ▼                                   ▼
//!     ┌──────────────────┐                  ┌──────────────┐
//!     │    OutputSink    │                  │     Bus      │──► SubscriberSet ──► LogWriter
//!     │ (one lock, many  │                  └──────────────┘
//!     │     workers)     │
//!     └──────────────────┘
//! ```
//!
//! ## Report shapes
//! ```text
//! Task #3 has finished:
//!    primer-search
//! Elapsed time: 0:00:00.200000
//!
//! Error in thread: primer-search
//! <error text>
//!
//! *** It seems that an old <process> instance is running in the system. Kill it and try again. ***
//!
//! Error in thread: primer-search
//! <error text>
//! <trace>
//! ```
//! Both diagnostics are followed by the "has finished" report with a zero elapsed time.
//! Cancellation, upstream-closed and interrupted-syscall outcomes print nothing.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Workers**       | Timed, classified, self-reporting execution units            | [`SupervisedWorker`], [`DetachedWorker`]    |
//! | **Sink**          | Lock-guarded atomic block writer, in-memory capture          | [`OutputSink`], [`Transcript`]              |
//! | **Classification**| Injectable error-to-outcome mapping                          | [`Classify`], [`ErrnoClassifier`], [`Outcome`] |
//! | **Targets**       | Async or thread-blocking closures with bound arguments       | [`Task`], [`TaskFn`], [`BlockingFn`], [`TaskArgs`] |
//! | **Events**        | Optional lifecycle events and subscribers                    | [`Bus`], [`Event`], [`Subscribe`], [`LogWriter`] |
//! | **Errors**        | Typed target errors                                          | [`TaskError`]                               |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use waitvisor::{OutputSink, SupervisedWorker, TaskContext, TaskError, TaskFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sink = Arc::new(OutputSink::stdout());
//!
//!     let handles: Vec<_> = (1..=3)
//!         .map(|id| {
//!             let target = TaskFn::arc(|_ctx: TaskContext| async move {
//!                 tokio::time::sleep(Duration::from_millis(20)).await;
//!                 Ok::<_, TaskError>(())
//!             });
//!             SupervisedWorker::new(Arc::clone(&sink), id, target)
//!                 .with_name(format!("search #{id}"))
//!                 .start()
//!         })
//!         .collect();
//!
//!     // Workers are daemons; waiting is optional.
//!     for h in handles {
//!         h.join().await;
//!     }
//! }
//! ```
mod classify;
mod config;
mod error;
mod events;
mod outcome;
mod report;
mod shutdown;
mod sink;
mod subscribers;
mod tasks;
mod worker;

// ---- Public re-exports ----

pub use classify::{Classify, ErrnoClassifier};
pub use config::WorkerConfig;
pub use error::TaskError;
pub use events::{Bus, Event, EventKind};
pub use outcome::{Elapsed, Outcome};
pub use shutdown::wait_for_shutdown_signal;
pub use sink::{OutputSink, Transcript};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use tasks::{BlockingFn, BoxTaskFuture, Task, TaskArgs, TaskContext, TaskFn, TaskRef};
pub use worker::{DetachedWorker, SupervisedWorker};
