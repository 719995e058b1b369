//! Supervised workers.
//!
//! - [`SupervisedWorker`]: wraps one target with timing, classification and reporting
//! - [`DetachedWorker`]: fire-and-forget handle returned by `start`
//!
//! Pooling is the caller's job: build N workers over one shared
//! [`OutputSink`](crate::OutputSink) and start each.

mod handle;
mod worker;

pub use handle::DetachedWorker;
pub use worker::SupervisedWorker;
