//! # Worker targets.
//!
//! This module provides the target-related types:
//! - [`Task`] - trait for async cancelable targets
//! - [`TaskFn`] / [`BlockingFn`] - closure-backed targets (async / thread-blocking)
//! - [`TaskRef`] - shared reference to a target (`Arc<dyn Task>`)
//! - [`TaskArgs`] - positional and named arguments bound at construction
//! - [`TaskContext`] - what a target receives per invocation

mod args;
mod task;
mod task_fn;

pub use args::TaskArgs;
pub use task::{BoxTaskFuture, Task, TaskContext, TaskRef};
pub use task_fn::{BlockingFn, TaskFn};
