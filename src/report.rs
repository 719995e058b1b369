//! Text of the blocks workers write through the [`OutputSink`](crate::OutputSink).
//!
//! ```text
//! Task #3 has finished:
//!    primer-search
//! Elapsed time: 0:00:00.200000
//! ```

use std::time::Duration;

use crate::outcome::Elapsed;

/// Final report, written once per non-silent run.
pub(crate) fn finished(id: u64, name: &str, elapsed: Duration) -> String {
    format!(
        "Task #{id} has finished:\n   {name}\nElapsed time: {}",
        Elapsed(elapsed)
    )
}

/// Diagnostic for the stale-instance conflict, with its remediation hint.
pub(crate) fn conflict(name: &str, detail: &str, peer_process: &str) -> String {
    format!(
        "Error in thread: {name}\n{detail}\n\n\
         *** It seems that an old {peer_process} instance is running in the system. \
         Kill it and try again. ***\n"
    )
}

/// Diagnostic for any other failure, error text followed by its trace.
pub(crate) fn failure(name: &str, detail: &str, trace: &str) -> String {
    let mut block = format!("Error in thread: {name}\n{detail}");
    let trace = trace.trim_end();
    if !trace.is_empty() {
        block.push('\n');
        block.push_str(trace);
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_shape() {
        assert_eq!(
            finished(3, "primer-search", Duration::from_millis(200)),
            "Task #3 has finished:\n   primer-search\nElapsed time: 0:00:00.200000"
        );
        assert_eq!(
            finished(7, "w", Duration::ZERO),
            "Task #7 has finished:\n   w\nElapsed time: 0:00:00"
        );
    }

    #[test]
    fn conflict_shape() {
        assert_eq!(
            conflict("w", "mbuf", "degen_primer"),
            "Error in thread: w\nmbuf\n\n*** It seems that an old degen_primer instance \
             is running in the system. Kill it and try again. ***\n"
        );
    }

    #[test]
    fn failure_shape() {
        assert_eq!(failure("w", "boom", ""), "Error in thread: w\nboom");
        assert_eq!(
            failure("w", "boom", "Caused by: disk\n"),
            "Error in thread: w\nboom\nCaused by: disk"
        );
    }
}
