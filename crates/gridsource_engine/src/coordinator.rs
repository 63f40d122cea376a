//! Request coordination: debounce and cancel-on-supersede per logical key.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Registry of in-flight work, keyed by logical data-source key.
///
/// At most one logical operation is live per key at any time. Scheduling a
/// new operation under a key supersedes whatever was pending (still in its
/// debounce window) or in flight under that key; the superseded operation's
/// eventual completion is discarded.
///
/// The registry is an explicit, cloneable object rather than ambient global
/// state: engines sharing one coordinator and one key contend, engines with
/// different keys or different coordinators never do, and tests construct
/// isolated instances.
#[derive(Clone, Default)]
pub struct RequestCoordinator {
    generations: Arc<Mutex<HashMap<String, u64>>>,
}

/// Cooperative cancellation handle for one scheduled operation.
///
/// Work must check [`Ticket::is_live`] after any suspension point and
/// before committing its result; cancellation is never forced, a canceled
/// operation may still run to completion in the background.
#[derive(Clone)]
pub struct Ticket {
    generations: Arc<Mutex<HashMap<String, u64>>>,
    key: String,
    generation: u64,
}

impl Ticket {
    /// Returns true while this operation is still the most recently
    /// scheduled one under its key.
    pub fn is_live(&self) -> bool {
        self.generations
            .lock()
            .get(&self.key)
            .is_some_and(|current| *current == self.generation)
    }

    /// Returns the logical key this ticket belongs to.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl RequestCoordinator {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `work` under `key` after `delay`, superseding any pending
    /// timer or in-flight operation previously scheduled under that key.
    ///
    /// The debounce timer and the work itself run on a spawned task; the
    /// caller must be inside a tokio runtime. The returned handle is mainly
    /// useful to tests that want to await quiescence.
    pub fn schedule<F, Fut>(&self, key: &str, delay: Duration, work: F) -> JoinHandle<()>
    where
        F: FnOnce(Ticket) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.begin(key);
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if !ticket.is_live() {
                tracing::debug!(key = %ticket.key(), "debounced operation superseded before start");
                return;
            }
            work(ticket).await;
        })
    }

    /// Registers a new generation under `key`, superseding any previous
    /// operation, and returns its ticket.
    pub fn begin(&self, key: &str) -> Ticket {
        let mut generations = self.generations.lock();
        let entry = generations.entry(key.to_string()).or_insert(0);
        *entry += 1;
        Ticket {
            generations: Arc::clone(&self.generations),
            key: key.to_string(),
            generation: *entry,
        }
    }

    /// Cancels whatever is pending or in flight under `key` and releases
    /// its bookkeeping.
    pub fn cancel(&self, key: &str) {
        self.generations.lock().remove(key);
    }

    /// Number of keys with live bookkeeping.
    pub fn tracked_keys(&self) -> usize {
        self.generations.lock().len()
    }
}
