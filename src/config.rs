//! # Per-worker configuration.
//!
//! [`WorkerConfig`] groups the few knobs a [`SupervisedWorker`](crate::SupervisedWorker)
//! needs besides its target. Construction (CLI flags, config files) is the caller's
//! concern; this type only carries the values.

use std::borrow::Cow;
use std::time::Duration;

/// Configuration shared by workers of one pool.
///
/// ## Field semantics
/// - `settle`: pause before the final report, lets concurrently printed diagnostics land first
/// - `peer_process`: name of the cooperating external process, used in the stale-instance hint
#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Delay before the final "has finished" report.
    pub settle: Duration,

    /// Name of the external manager process shown in the conflict remediation text.
    pub peer_process: Cow<'static, str>,
}

impl WorkerConfig {
    /// Returns a config with an updated settle delay.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Returns a config with an updated peer process name.
    pub fn with_peer_process(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.peer_process = name.into();
        self
    }
}

impl Default for WorkerConfig {
    /// Default configuration:
    ///
    /// - `settle = 100ms`
    /// - `peer_process = "manager"`
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(100),
            peer_process: Cow::Borrowed("manager"),
        }
    }
}
