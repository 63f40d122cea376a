//! Change feed for observing engine state mutations.
//!
//! Every mutator emits a reasoned event after updating the query state.
//! External collaborators subscribe instead of being called directly; a
//! selection manager, for instance, clears its row selection when it sees
//! a filter or sort change.

use parking_lot::RwLock;
use std::sync::mpsc::{self, Receiver, Sender};

/// Why the query state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    /// The free-text search term changed.
    QueryChange,
    /// Structured filters were replaced.
    FilterChange,
    /// The sort entry changed.
    SortChange,
    /// The page changed.
    PageChange,
    /// A saved view was selected or deselected.
    ViewChange,
    /// `refresh()` forced a re-resolution without a state change.
    Refresh,
}

/// One state-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    /// Why the state changed.
    pub reason: ChangeReason,
    /// The page after the mutation (filter-shaped changes reset it to 1).
    pub page: u64,
}

/// Distributes state-change events to subscribers.
///
/// Disconnected subscribers are pruned on the next emit.
#[derive(Default)]
pub struct ChangeFeed {
    subscribers: RwLock<Vec<Sender<StateChange>>>,
}

impl ChangeFeed {
    /// Creates a feed with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to all future state changes.
    pub fn subscribe(&self) -> Receiver<StateChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: StateChange) {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(event).is_ok());
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_and_receive() {
        let feed = ChangeFeed::new();
        let rx = feed.subscribe();

        let event = StateChange {
            reason: ChangeReason::FilterChange,
            page: 1,
        };
        feed.emit(event);
        assert_eq!(rx.try_recv().unwrap(), event);
    }

    #[test]
    fn multiple_subscribers() {
        let feed = ChangeFeed::new();
        let rx1 = feed.subscribe();
        let rx2 = feed.subscribe();

        let event = StateChange {
            reason: ChangeReason::SortChange,
            page: 3,
        };
        feed.emit(event);
        assert_eq!(rx1.try_recv().unwrap(), event);
        assert_eq!(rx2.try_recv().unwrap(), event);
    }

    #[test]
    fn subscriber_cleanup() {
        let feed = ChangeFeed::new();
        let rx = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);

        drop(rx);
        feed.emit(StateChange {
            reason: ChangeReason::Refresh,
            page: 1,
        });
        assert_eq!(feed.subscriber_count(), 0);
    }
}
