//! Address-bar collaborator.

use parking_lot::Mutex;

/// Access to the host's address bar (or any equivalent location store).
///
/// The engine reads once at construction and writes a full replacement of
/// the query-string portion on each (debounced) state change. Writes must
/// not create history entries; the engine never live-watches for external
/// changes after mount.
pub trait AddressBar: Send + Sync {
    /// Returns the current query-string portion, if any.
    fn read(&self) -> Option<String>;

    /// Replaces the query-string portion wholesale.
    fn replace(&self, query: &str);
}

/// An in-memory address bar for tests and non-browser hosts.
#[derive(Default)]
pub struct MemoryAddressBar {
    query: Mutex<Option<String>>,
}

impl MemoryAddressBar {
    /// Creates an empty address bar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an address bar seeded with a query string, as if the host
    /// were deep-linked into a view.
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Mutex::new(Some(query.into())),
        }
    }

    /// Returns the last written query string.
    pub fn current(&self) -> Option<String> {
        self.query.lock().clone()
    }
}

impl AddressBar for MemoryAddressBar {
    fn read(&self) -> Option<String> {
        self.query.lock().clone()
    }

    fn replace(&self, query: &str) {
        *self.query.lock() = Some(query.to_string());
    }
}
