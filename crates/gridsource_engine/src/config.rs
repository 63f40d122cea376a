//! Configuration for the data-source engine.

use gridsource_state::{SortSpec, View};
use std::time::Duration;

/// Default page size.
pub const DEFAULT_LIMIT: u64 = 50;
/// Default debounce applied before an outbound fetch.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
/// Fixed debounce applied before an address-bar write.
pub const URL_DEBOUNCE: Duration = Duration::from_millis(100);

/// Configuration for one data-source engine instance.
#[derive(Debug, Clone)]
pub struct DataSourceConfig {
    /// Endpoint of the paginated list backend. Also the default logical
    /// key under which requests are coordinated.
    pub endpoint: String,
    /// Field name used for free-text matching, both locally and as the
    /// remote query parameter key.
    pub query_key: String,
    /// Logical key for request coordination. Engines sharing a key contend
    /// (last write wins); engines with different keys never do.
    pub source_key: String,
    /// Sort applied when the URL carries none.
    pub default_sort: Option<SortSpec>,
    /// Page size, fixed for the lifetime of the instance.
    pub default_limit: u64,
    /// Views available for selection before any store round-trip.
    pub default_views: Vec<View>,
    /// Whether to mirror state into the address bar and read it once at
    /// construction.
    pub sync_with_url: bool,
    /// Hint appended to remote URLs asking for a reduced payload. Opaque
    /// backend convention; forwarded verbatim.
    pub abbreviated: bool,
    /// Debounce before an outbound fetch.
    pub debounce: Duration,
    /// Debounce before an address-bar write.
    pub url_debounce: Duration,
}

impl DataSourceConfig {
    /// Creates a configuration for the given endpoint and query key.
    pub fn new(endpoint: impl Into<String>, query_key: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            source_key: endpoint.clone(),
            endpoint,
            query_key: query_key.into(),
            default_sort: None,
            default_limit: DEFAULT_LIMIT,
            default_views: Vec::new(),
            sync_with_url: true,
            abbreviated: false,
            debounce: DEFAULT_DEBOUNCE,
            url_debounce: URL_DEBOUNCE,
        }
    }

    /// Sets the default sort.
    pub fn with_default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// Sets the page size.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    /// Sets the views available before any store round-trip.
    pub fn with_default_views(mut self, views: Vec<View>) -> Self {
        self.default_views = views;
        self
    }

    /// Enables or disables address-bar synchronization.
    pub fn with_url_sync(mut self, enabled: bool) -> Self {
        self.sync_with_url = enabled;
        self
    }

    /// Sets the reduced-payload hint.
    pub fn with_abbreviated(mut self, abbreviated: bool) -> Self {
        self.abbreviated = abbreviated;
        self
    }

    /// Sets the fetch debounce.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Overrides the logical coordination key.
    pub fn with_source_key(mut self, key: impl Into<String>) -> Self {
        self.source_key = key.into();
        self
    }
}
