//! # Failure classification.
//!
//! A [`Classify`] implementation maps the [`TaskError`] returned by a target onto an
//! [`Outcome`]. The worker holds one behind an `Arc` so tests (or callers talking to a
//! different external process) can inject their own mapping instead of depending on
//! OS-specific error codes.
//!
//! ## Default mapping ([`ErrnoClassifier`])
//! ```text
//! Canceled                               ─► Cancelled
//! UpstreamClosed | io UnexpectedEof      ─► UpstreamClosed
//! io Interrupted | raw EINTR             ─► Transient
//! raw EBADMSG (unix)                     ─► Conflict{detail}
//! anything else                          ─► Failed{detail, trace}
//! ```

use std::io;

use crate::error::TaskError;
use crate::outcome::Outcome;

/// Maps a target error to an [`Outcome`].
///
/// Closures `Fn(&TaskError) -> Outcome` implement this trait.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use waitvisor::{Classify, Outcome, TaskError};
///
/// // Treat every failure as a stale-instance conflict.
/// let strict: Arc<dyn Classify> = Arc::new(|err: &TaskError| Outcome::Conflict {
///     detail: err.to_string(),
/// });
/// assert_eq!(strict.classify(&TaskError::fail("mbuf")).as_label(), "conflict");
/// ```
pub trait Classify: Send + Sync + 'static {
    /// Classifies one error. Must not block.
    fn classify(&self, err: &TaskError) -> Outcome;
}

impl<F> Classify for F
where
    F: Fn(&TaskError) -> Outcome + Send + Sync + 'static,
{
    fn classify(&self, err: &TaskError) -> Outcome {
        self(err)
    }
}

/// Default classifier keyed on error variants, I/O kinds and raw OS error codes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrnoClassifier;

impl Classify for ErrnoClassifier {
    fn classify(&self, err: &TaskError) -> Outcome {
        match err {
            TaskError::Canceled => Outcome::Cancelled,
            TaskError::UpstreamClosed { .. } => Outcome::UpstreamClosed,
            TaskError::Io(e) => classify_io(e, err),
            _ => failed(err),
        }
    }
}

fn classify_io(e: &io::Error, err: &TaskError) -> Outcome {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        return Outcome::UpstreamClosed;
    }
    if e.kind() == io::ErrorKind::Interrupted || is_errno(e, Errno::Eintr) {
        return Outcome::Transient;
    }
    if is_errno(e, Errno::Ebadmsg) {
        return Outcome::Conflict {
            detail: e.to_string(),
        };
    }
    failed(err)
}

fn failed(err: &TaskError) -> Outcome {
    Outcome::Failed {
        detail: err.to_string(),
        trace: err.trace(),
    }
}

#[derive(Clone, Copy)]
enum Errno {
    Eintr,
    Ebadmsg,
}

#[cfg(unix)]
fn is_errno(e: &io::Error, which: Errno) -> bool {
    use nix::errno::Errno as Sys;

    let code = match which {
        Errno::Eintr => Sys::EINTR,
        Errno::Ebadmsg => Sys::EBADMSG,
    };
    e.raw_os_error() == Some(code as i32)
}

#[cfg(not(unix))]
fn is_errno(_e: &io::Error, _which: Errno) -> bool {
    false
}
