//! # Function-backed targets (`TaskFn`, `BlockingFn`)
//!
//! [`TaskFn`] wraps an async closure `F: Fn(TaskContext) -> Fut`, producing a fresh
//! future per spawn. [`BlockingFn`] wraps a synchronous closure and runs it on tokio's
//! blocking pool, for targets that park a thread while waiting on an external process.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use waitvisor::{BlockingFn, TaskContext, TaskError, TaskFn, TaskRef};
//!
//! let sleeper: TaskRef = TaskFn::arc(|_ctx: TaskContext| async move {
//!     tokio::time::sleep(Duration::from_millis(10)).await;
//!     Ok::<_, TaskError>(())
//! });
//!
//! let blocking: TaskRef = BlockingFn::arc(|ctx: TaskContext| -> Result<(), TaskError> {
//!     ctx.checkpoint()?;
//!     std::thread::sleep(Duration::from_millis(10));
//!     Ok(())
//! });
//! # let _ = (sleeper, blocking);
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::error::TaskError;
use crate::tasks::task::{BoxTaskFuture, Task, TaskContext};

/// Async-closure target.
#[derive(Debug)]
pub struct TaskFn<F> {
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed target.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the target and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F, Fut> Task for TaskFn<F>
where
    F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn spawn(&self, ctx: TaskContext) -> BoxTaskFuture {
        Box::pin((self.f)(ctx))
    }
}

/// Synchronous-closure target run via [`tokio::task::spawn_blocking`].
///
/// A panic inside the closure surfaces as [`TaskError::Panicked`].
pub struct BlockingFn<F> {
    f: Arc<F>,
}

impl<F> BlockingFn<F> {
    /// Creates a new blocking target.
    pub fn new(f: F) -> Self {
        Self { f: Arc::new(f) }
    }

    /// Creates the target and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> Task for BlockingFn<F>
where
    F: Fn(TaskContext) -> Result<(), TaskError> + Send + Sync + 'static,
{
    fn spawn(&self, ctx: TaskContext) -> BoxTaskFuture {
        let f = Arc::clone(&self.f);
        Box::pin(async move {
            match tokio::task::spawn_blocking(move || f(ctx)).await {
                Ok(res) => res,
                Err(join) if join.is_panic() => Err(TaskError::panicked(&*join.into_panic())),
                Err(_) => Err(TaskError::Canceled),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskArgs;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    fn ctx(args: TaskArgs) -> TaskContext {
        TaskContext {
            id: 1,
            name: "t".into(),
            args,
            token: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn task_fn_sees_bound_arguments() {
        let t = TaskFn::new(|ctx: TaskContext| async move {
            let n: u32 = ctx.args.get("n")?;
            if n == 3 {
                Ok::<(), TaskError>(())
            } else {
                Err(TaskError::fail("wrong n"))
            }
        });
        assert!(t.spawn(ctx(TaskArgs::new().with("n", json!(3)))).await.is_ok());
        assert!(t.spawn(ctx(TaskArgs::new().with("n", json!(4)))).await.is_err());
    }

    #[tokio::test]
    async fn blocking_fn_runs_off_the_runtime() {
        let t = BlockingFn::new(|ctx: TaskContext| -> Result<(), TaskError> {
            let s: String = ctx.args.get_positional(0)?;
            assert_eq!(s, "ACGT");
            Ok(())
        });
        t.spawn(ctx(TaskArgs::new().push(json!("ACGT"))))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn blocking_fn_panics_become_errors() {
        let t = BlockingFn::new(|_ctx: TaskContext| -> Result<(), TaskError> {
            panic!("melted");
        });
        match t.spawn(ctx(TaskArgs::new())).await {
            Err(TaskError::Panicked { info }) => assert_eq!(info, "melted"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn checkpoint_reports_cancellation() {
        let c = ctx(TaskArgs::new());
        assert!(c.checkpoint().is_ok());
        c.token.cancel();
        assert!(matches!(c.checkpoint(), Err(TaskError::Canceled)));
    }
}
