//! Error types raised by worker targets.
//!
//! [`TaskError`] is what a target returns when it does not complete. The worker never
//! propagates it to the caller: a [`Classify`](crate::Classify) implementation turns it into
//! an [`Outcome`](crate::Outcome), which decides whether anything is reported at all.
//!
//! Like the runtime's other error types it offers `as_label` / `as_message` helpers for
//! logs, plus [`TaskError::trace`] which renders the diagnostic trace printed on failure.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::Write as _;
use std::io;

use thiserror::Error;

/// # Errors produced by a worker target.
///
/// Variants map onto the failure taxonomy:
/// - [`TaskError::Canceled`]: caller-level interrupt (Ctrl-C, shutdown token);
/// - [`TaskError::UpstreamClosed`]: the remote activity the target was waiting on went away;
/// - [`TaskError::Io`]: an I/O failure, classified further by its kind / OS error code;
/// - [`TaskError::Fail`], [`TaskError::Panicked`]: unclassified failures.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Target observed cancellation and stopped.
    #[error("context cancelled")]
    Canceled,

    /// The channel to the external activity was closed (end of stream).
    #[error("upstream closed: {reason}")]
    UpstreamClosed {
        /// What was closed, for logs.
        reason: String,
    },

    /// I/O failure surfaced by the target.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Target failed for any other reason.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
        /// Rendered cause chain and backtrace, if any.
        trace: String,
    },

    /// Target panicked.
    #[error("target panicked: {info}")]
    Panicked {
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl TaskError {
    /// Builds a [`TaskError::Fail`] from a message, capturing a backtrace when enabled.
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
            trace: render_backtrace(&Backtrace::capture()),
        }
    }

    /// Builds a [`TaskError::Fail`] from any error, keeping its `source()` chain in the trace.
    ///
    /// # Example
    /// ```
    /// use waitvisor::TaskError;
    ///
    /// let err = std::io::Error::other("disk on fire");
    /// let fail = TaskError::from_error(&err);
    /// assert_eq!(fail.as_label(), "task_failed");
    /// ```
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut trace = render_chain(err);
        trace.push_str(&render_backtrace(&Backtrace::capture()));
        TaskError::Fail {
            error: err.to_string(),
            trace,
        }
    }

    /// Builds a [`TaskError::UpstreamClosed`].
    pub fn upstream_closed(reason: impl Into<String>) -> Self {
        TaskError::UpstreamClosed {
            reason: reason.into(),
        }
    }

    /// Builds a [`TaskError::Panicked`] from a caught panic payload.
    pub fn panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        let info = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        TaskError::Panicked { info }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use waitvisor::TaskError;
    ///
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// assert_eq!(TaskError::upstream_closed("pipe").as_label(), "task_upstream_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Canceled => "task_canceled",
            TaskError::UpstreamClosed { .. } => "task_upstream_closed",
            TaskError::Io(_) => "task_io",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Canceled => "context cancelled".to_string(),
            TaskError::UpstreamClosed { reason } => format!("upstream closed: {reason}"),
            TaskError::Io(e) => format!("io: {e}"),
            TaskError::Fail { error, .. } => format!("error: {error}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Returns the diagnostic trace printed below the error text on failure.
    ///
    /// - `Fail`: the trace captured at construction;
    /// - `Io`: error kind and OS code, the `source()` chain, then a backtrace;
    /// - `Panicked`: the panic payload, then a backtrace;
    /// - other variants have no trace.
    ///
    /// Backtraces are only present when enabled (`RUST_BACKTRACE`) and are taken at the
    /// call site, which for `Io`/`Panicked` is the worker that classifies the error.
    pub fn trace(&self) -> String {
        match self {
            TaskError::Fail { trace, .. } => trace.clone(),
            TaskError::Io(e) => {
                let mut out = match e.raw_os_error() {
                    Some(code) => format!("I/O error kind: {} (os error {code})\n", e.kind()),
                    None => format!("I/O error kind: {}\n", e.kind()),
                };
                out.push_str(&render_chain(e));
                out.push_str(&render_backtrace(&Backtrace::capture()));
                out
            }
            TaskError::Panicked { info } => {
                let mut out = format!("panicked: {info}\n");
                out.push_str(&render_backtrace(&Backtrace::capture()));
                out
            }
            TaskError::Canceled | TaskError::UpstreamClosed { .. } => String::new(),
        }
    }
}

/// Renders the `source()` chain of `err`, one `Caused by:` line per cause.
fn render_chain<E>(err: &E) -> String
where
    E: std::error::Error + ?Sized,
{
    let mut out = String::new();
    let mut cause = err.source();
    while let Some(c) = cause {
        let _ = writeln!(out, "Caused by: {c}");
        cause = c.source();
    }
    out
}

fn render_backtrace(bt: &Backtrace) -> String {
    match bt.status() {
        BacktraceStatus::Captured => format!("Backtrace:\n{bt}\n"),
        _ => String::new(),
    }
}
