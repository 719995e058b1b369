//! # Outcome of one worker run.
//!
//! [`Outcome`] is the tagged result at the target-invocation boundary. The worker switches
//! on it exactly once to pick its single terminal path:
//!
//! ```text
//!   Completed(d)      ─► final report (elapsed = d)
//!   Cancelled         ─┐
//!   UpstreamClosed    ─┼► silent exit, no output
//!   Transient         ─┘
//!   Conflict{..}      ─► remediation diagnostic ─► final report (elapsed = 0)
//!   Failed{..}        ─► diagnostic + trace     ─► final report (elapsed = 0)
//! ```

mod elapsed;

pub use elapsed::Elapsed;

use std::time::Duration;

/// Classified result of running a worker target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Target returned normally after the given wall-clock duration.
    Completed(Duration),
    /// Caller-level interrupt.
    Cancelled,
    /// The external activity the target waited on was torn down.
    UpstreamClosed,
    /// System call interrupted by a signal; abandoned, not retried.
    Transient,
    /// A stale instance of the external manager process is interfering.
    Conflict {
        /// Error text shown in the diagnostic.
        detail: String,
    },
    /// Any other failure.
    Failed {
        /// Error text shown in the diagnostic.
        detail: String,
        /// Cause chain / backtrace shown below the error text.
        trace: String,
    },
}

impl Outcome {
    /// True for outcomes that end the worker without any output.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            Outcome::Cancelled | Outcome::UpstreamClosed | Outcome::Transient
        )
    }

    /// Elapsed time shown in the final report, or `None` for silent outcomes.
    ///
    /// Failed and conflicting runs report zero, not the partial time already measured.
    pub fn reported_elapsed(&self) -> Option<Duration> {
        match self {
            Outcome::Completed(d) => Some(*d),
            Outcome::Conflict { .. } | Outcome::Failed { .. } => Some(Duration::ZERO),
            Outcome::Cancelled | Outcome::UpstreamClosed | Outcome::Transient => None,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Completed(_) => "completed",
            Outcome::Cancelled => "cancelled",
            Outcome::UpstreamClosed => "upstream_closed",
            Outcome::Transient => "transient",
            Outcome::Conflict { .. } => "conflict",
            Outcome::Failed { .. } => "failed",
        }
    }
}
