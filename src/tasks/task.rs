//! # Worker target abstraction.
//!
//! This module defines the [`Task`] trait: the caller-supplied target a
//! [`SupervisedWorker`](crate::SupervisedWorker) runs once. The common handle type is
//! [`TaskRef`], an `Arc<dyn Task>`.
//!
//! A target receives a [`TaskContext`] carrying its bound arguments and a
//! [`CancellationToken`]. Cancellation is cooperative: the worker never polls the token,
//! the target observes it and answers with [`TaskError::Canceled`].

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::tasks::TaskArgs;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Shared handle to a target.
pub type TaskRef = Arc<dyn Task>;

/// Everything a target gets for one invocation.
#[derive(Clone, Debug)]
pub struct TaskContext {
    /// Caller-assigned task identifier.
    pub id: u64,
    /// Display name of the worker.
    pub name: Cow<'static, str>,
    /// Arguments bound at worker construction.
    pub args: TaskArgs,
    /// Cooperative cancellation signal.
    pub token: CancellationToken,
}

impl TaskContext {
    /// Returns `Err(TaskError::Canceled)` once the token is cancelled.
    ///
    /// Convenience for targets that check at safe points with `?`.
    pub fn checkpoint(&self) -> Result<(), TaskError> {
        if self.token.is_cancelled() {
            Err(TaskError::Canceled)
        } else {
            Ok(())
        }
    }
}

/// # Asynchronous, cancelable target.
///
/// `spawn` creates a fresh future per invocation; a worker calls it exactly once.
///
/// # Example
/// ```
/// use waitvisor::{BoxTaskFuture, Task, TaskContext, TaskError};
///
/// struct Align;
///
/// impl Task for Align {
///     fn spawn(&self, ctx: TaskContext) -> BoxTaskFuture {
///         Box::pin(async move {
///             ctx.checkpoint()?;
///             // align...
///             Ok::<(), TaskError>(())
///         })
///     }
/// }
/// ```
pub trait Task: Send + Sync + 'static {
    /// Creates the future running this target with `ctx`.
    fn spawn(&self, ctx: TaskContext) -> BoxTaskFuture;
}
