//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into a
//! worker pool. Each subscriber is driven by a dedicated loop fed by a bounded
//! queue owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching) – they do **not** block
//!   the workers nor other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that
//!   subscriber are **dropped** (warn).

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// # Example
/// ```
/// use waitvisor::{Event, EventKind, Subscribe};
/// use async_trait::async_trait;
///
/// struct FailureCounter(std::sync::atomic::AtomicU64);
///
/// #[async_trait]
/// impl Subscribe for FailureCounter {
///     async fn on_event(&self, ev: &Event) {
///         if ev.kind == EventKind::WorkerFailed {
///             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///         }
///     }
///     fn name(&self) -> &'static str { "failure-counter" }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
