//! # OutputSink: lock-guarded report writer.
//!
//! A single [`Mutex`] guards the destination. The lock is taken for the duration of one
//! block write (write + newline + flush) and never across an `.await`, so it is safe to
//! share between async workers and blocking threads alike.
//!
//! ## Rules
//! - One call to [`OutputSink::write`] = one atomic block on the destination
//! - Blocks from different callers are ordered by lock acquisition
//! - Write failures are logged and swallowed; reporting never fails a worker
//! - A poisoned lock is recovered; the destination carries no invariant a panic could break

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::sink::Transcript;

enum Target {
    Writer(Box<dyn Write + Send>),
    Memory(Transcript),
}

/// Mutual-exclusion guarded console/log writer shared by all workers.
///
/// Created once by the caller, wrapped in an `Arc`, and handed to every
/// [`SupervisedWorker`](crate::SupervisedWorker).
///
/// # Example
/// ```
/// use waitvisor::OutputSink;
///
/// let (sink, transcript) = OutputSink::transcript();
/// sink.write_lines(["Task #1 has finished:", "   demo"]);
/// assert_eq!(transcript.blocks(), vec!["Task #1 has finished:\n   demo".to_string()]);
/// ```
pub struct OutputSink {
    target: Mutex<Target>,
    writes: AtomicU64,
}

impl OutputSink {
    /// Creates a sink over an arbitrary writer (file, pipe, buffer).
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self::with_target(Target::Writer(Box::new(writer)))
    }

    /// Creates a sink writing to the process stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Creates a sink writing to the process stderr.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Creates an in-memory sink and the [`Transcript`] that observes it.
    pub fn transcript() -> (Self, Transcript) {
        let transcript = Transcript::default();
        (Self::with_target(Target::Memory(transcript.clone())), transcript)
    }

    fn with_target(target: Target) -> Self {
        Self {
            target: Mutex::new(target),
            writes: AtomicU64::new(0),
        }
    }

    /// Writes `block` as one atomic unit, followed by a newline.
    pub fn write(&self, block: &str) {
        let mut target = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        let res = match &mut *target {
            Target::Writer(w) => write_block(w.as_mut(), block),
            Target::Memory(t) => {
                t.push(block);
                Ok(())
            }
        };
        match res {
            Ok(()) => {
                self.writes.fetch_add(1, Ordering::Relaxed);
            }
            Err(error) => {
                tracing::warn!(%error, "output sink write failed");
            }
        }
    }

    /// Joins `lines` with `\n` and writes them as one atomic block.
    pub fn write_lines<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut block = String::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                block.push('\n');
            }
            block.push_str(line.as_ref());
        }
        self.write(&block);
    }

    /// Number of blocks successfully written so far.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink")
            .field("writes", &self.writes())
            .finish_non_exhaustive()
    }
}

fn write_block(w: &mut dyn Write, block: &str) -> io::Result<()> {
    w.write_all(block.as_bytes())?;
    w.write_all(b"\n")?;
    w.flush()
}
