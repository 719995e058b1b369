//! # Transcript: in-memory capture of sink writes.
//!
//! Each atomic [`OutputSink::write`](crate::OutputSink::write) becomes one entry, which makes
//! "exactly N writes happened" and "this block was not torn" directly observable.

use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable view over the blocks written to an in-memory [`OutputSink`](crate::OutputSink).
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    blocks: Arc<Mutex<Vec<String>>>,
}

impl Transcript {
    pub(crate) fn push(&self, block: &str) {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(block.to_string());
    }

    /// Snapshot of all blocks written so far, in write order.
    #[must_use]
    pub fn blocks(&self) -> Vec<String> {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of blocks written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All blocks rendered as the console would show them (newline-terminated).
    #[must_use]
    pub fn text(&self) -> String {
        self.blocks()
            .iter()
            .map(|b| format!("{b}\n"))
            .collect()
    }
}
