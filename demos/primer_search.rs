//! # Example: primer_search
//!
//! A small pool of supervised workers sharing one stdout sink.
//!
//! Demonstrates how to:
//! - Bind arguments to targets and start workers concurrently.
//! - Observe lifecycle events through a [`SubscriberSet`] with the built-in [`LogWriter`].
//! - Cancel in-flight workers on Ctrl-C (they exit without output).
//!
//! ## Flow
//! ```text
//! main ──► OutputSink::stdout() (shared)
//!      ├─► worker #1 async target, sleeps     ─► "Task #1 has finished"
//!      ├─► worker #2 blocking target          ─► "Task #2 has finished"
//!      ├─► worker #3 manager went away (EOF)  ─► (silent)
//!      ├─► worker #4 fails                    ─► "Error in thread" + "Task #4 has finished" (0:00:00)
//!      └─► Ctrl-C ─► root token cancelled     ─► remaining workers exit silently
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=waitvisor=debug cargo run --example primer_search
//! ```

use std::io;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use waitvisor::{
    BlockingFn, Bus, LogWriter, OutputSink, Subscribe, SubscriberSet, SupervisedWorker,
    TaskArgs, TaskContext, TaskError, TaskFn, TaskRef, WorkerConfig, wait_for_shutdown_signal,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logging goes to stderr so it never mixes with the reports on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // 2. Shared sink, event bus and subscribers
    let sink = Arc::new(OutputSink::stdout());
    let bus = Bus::default();
    let subs = Arc::new(SubscriberSet::new(vec![
        Arc::new(LogWriter::new()) as Arc<dyn Subscribe>,
    ]));
    subs.listen(&bus);

    let cfg = WorkerConfig::default().with_peer_process("primer_search");
    let root = CancellationToken::new();

    // 3. Targets
    let scan: TaskRef = TaskFn::arc(|ctx: TaskContext| async move {
        let primer: String = ctx.args.get_positional(0)?;
        let rounds: u64 = ctx.args.get("rounds")?;
        for _ in 0..rounds {
            ctx.checkpoint()?;
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        tracing::debug!(%primer, "scan complete");
        Ok(())
    });

    let melt: TaskRef = BlockingFn::arc(|ctx: TaskContext| -> Result<(), TaskError> {
        let seq: String = ctx.args.get_positional(0)?;
        let gc = seq.chars().filter(|c| matches!(c, 'G' | 'C')).count();
        std::thread::sleep(Duration::from_millis(300));
        ctx.checkpoint()?;
        tracing::debug!(gc, "melting temperature computed");
        Ok(())
    });

    let orphaned: TaskRef = TaskFn::arc(|_ctx: TaskContext| async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Err::<(), _>(io::Error::from(io::ErrorKind::UnexpectedEof).into())
    });

    let broken: TaskRef = TaskFn::arc(|_ctx: TaskContext| async move {
        Err::<(), _>(TaskError::fail("primer database is empty"))
    });

    // 4. Workers
    let specs = [
        (
            1,
            "scan ACGTTGCAAG",
            scan,
            TaskArgs::new()
                .push(json!("ACGTTGCAAG"))
                .with("rounds", json!(4)),
        ),
        (
            2,
            "melt GGCCATAT",
            melt,
            TaskArgs::new().push(json!("GGCCATAT")),
        ),
        (3, "orphaned", orphaned, TaskArgs::new()),
        (4, "broken", broken, TaskArgs::new()),
    ];
    let handles: Vec<_> = specs
        .into_iter()
        .map(|(id, name, target, args)| {
            SupervisedWorker::new(Arc::clone(&sink), id, target)
                .with_name(name)
                .with_args(args)
                .with_config(cfg.clone())
                .with_bus(bus.clone())
                .with_token(&root)
                .start()
        })
        .collect();

    // 5. Wait for all workers or a shutdown signal, whichever comes first
    tokio::select! {
        _ = async { for h in handles { h.join().await; } } => {}
        res = wait_for_shutdown_signal() => {
            res?;
            root.cancel();
            // Give cooperative targets a moment to observe cancellation
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    }
    Ok(())
}
