//! # Event bus for broadcasting worker events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from many workers at once.
//!
//! ```text
//! Publishers (many):               Receivers (any):
//!   worker #1 ──┐
//!   worker #2 ──┼──────► Bus ───────► SubscriberSet::listen ──► subscribers
//!   worker #N ──┘  (broadcast chan)  └► Bus::subscribe() (tests, callers)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for worker events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender); each worker keeps its own clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped and this still returns immediately.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for Bus {
    /// Bus with capacity 1024.
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn receivers_only_see_later_events() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::WorkerStarting));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::WorkerFinished).with_worker(1, "w"));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::WorkerFinished);
        assert_eq!(ev.worker_id, Some(1));
    }
}
