//! # Shared output sink.
//!
//! Every worker reports through one [`OutputSink`]. The sink owns a single lock and
//! performs each report as one atomic block, so lines written by different workers
//! are never interleaved below the block level.
//!
//! ```text
//!   worker #1 ──┐
//!   worker #2 ──┼──► OutputSink::write(block) ──► [lock] ──► stdout / file / Transcript
//!   worker #N ──┘
//! ```
//!
//! - [`OutputSink`]: the lock-guarded writer
//! - [`Transcript`]: in-memory capture of written blocks (tests, embedding)

mod output;
mod transcript;

pub use output::OutputSink;
pub use transcript::Transcript;
