//! # Detached worker handle.
//!
//! [`DetachedWorker`] is what [`SupervisedWorker::start`](crate::SupervisedWorker::start)
//! hands back. It owns no result: outcomes are reported through the sink. Dropping it
//! detaches the worker, which then runs until it finishes or the runtime shuts down.

use tokio::task::JoinHandle;

/// Handle to a started worker. Dropping it does **not** stop the worker.
#[derive(Debug)]
pub struct DetachedWorker {
    id: u64,
    handle: JoinHandle<()>,
}

impl DetachedWorker {
    pub(crate) fn new(id: u64, handle: JoinHandle<()>) -> Self {
        Self { id, handle }
    }

    /// Task identifier of the worker.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True once the worker reached a terminal state (or was aborted).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the worker to reach its terminal state.
    ///
    /// Optional: callers that never join get daemon semantics.
    pub async fn join(self) {
        if let Err(error) = self.handle.await {
            tracing::warn!(worker_id = self.id, %error, "worker did not run to completion");
        }
    }
}
