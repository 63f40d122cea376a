//! The data-source engine state machine.

use crate::config::DataSourceConfig;
use crate::coordinator::{RequestCoordinator, Ticket};
use crate::error::EngineError;
use crate::events::{ChangeFeed, ChangeReason, StateChange};
use crate::fetch::{FetchOutcome, FetchRequest, Fetcher};
use crate::local::resolve_local;
use crate::remote::{build_url, normalize, Normalized, TransformFn};
use crate::url::AddressBar;
use gridsource_state::{FilterMap, QueryState, PageResult, Record, SortSpec, View};
use gridsource_urlcodec::{decode_query, encode_query};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Weak};

/// The engine's derived read state.
///
/// Replaced wholesale on each committed resolution. `loading` is the
/// authoritative staleness signal: after a synchronous mutator returns,
/// `QueryState` reads reflect the new state immediately while `items` and
/// `total` stay stale until the corresponding resolution commits.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    /// Items of the last committed resolution.
    pub items: Vec<T>,
    /// Pre-pagination total of the last committed resolution.
    pub total: u64,
    /// True while a resolution is pending or in flight.
    pub loading: bool,
    /// True until the first resolution completes; distinguishes "loading
    /// nothing yet" from "loading a refresh".
    pub first_load: bool,
    /// Error overlay, set on hard failure and cleared when the next
    /// resolution attempt starts.
    pub error: Option<EngineError>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            loading: true,
            first_load: true,
            error: None,
        }
    }
}

/// Derived pagination summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSummary {
    /// Current page, 1-based.
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Total matching items.
    pub total: u64,
    /// Number of pages needed for `total` items.
    pub page_count: u64,
}

/// How this engine instance resolves its query state. Decided at
/// construction, fixed for the instance's lifetime.
enum Mode<T> {
    /// Synchronous resolution over an in-memory array.
    Local(Vec<T>),
    /// Debounced, cancelable fetch against a paginated list backend.
    Remote {
        fetcher: Arc<dyn Fetcher>,
        transform: Option<TransformFn<T>>,
    },
}

/// Builder for a [`DataSourceEngine`].
pub struct DataSourceBuilder<T> {
    config: DataSourceConfig,
    coordinator: RequestCoordinator,
    address_bar: Option<Arc<dyn AddressBar>>,
    transform: Option<TransformFn<T>>,
}

impl<T> DataSourceBuilder<T>
where
    T: Record + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Starts a builder from a configuration.
    pub fn new(config: DataSourceConfig) -> Self {
        Self {
            config,
            coordinator: RequestCoordinator::new(),
            address_bar: None,
            transform: None,
        }
    }

    /// Shares a request coordinator with other engines. Engines sharing a
    /// coordinator and a source key supersede each other's requests.
    pub fn coordinator(mut self, coordinator: RequestCoordinator) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// Attaches the host's address bar.
    pub fn address_bar(mut self, bar: Arc<dyn AddressBar>) -> Self {
        self.address_bar = Some(bar);
        self
    }

    /// Installs a hook remapping raw backend payloads into the page shape.
    pub fn transform(mut self, transform: TransformFn<T>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Builds a local-mode engine over an in-memory array.
    ///
    /// Presence of local data overrides the configured endpoint.
    pub fn build_local(self, data: Vec<T>) -> Arc<DataSourceEngine<T>> {
        DataSourceEngine::build(self.config, Mode::Local(data), self.coordinator, self.address_bar)
    }

    /// Builds a remote-mode engine against the configured endpoint.
    ///
    /// Must be called inside a tokio runtime: the initial resolution is
    /// spawned immediately.
    pub fn build_remote(self, fetcher: Arc<dyn Fetcher>) -> Arc<DataSourceEngine<T>> {
        let mode = Mode::Remote {
            fetcher,
            transform: self.transform,
        };
        DataSourceEngine::build(self.config, mode, self.coordinator, self.address_bar)
    }
}

/// The data-source state engine.
///
/// Owns the [`QueryState`], decides local vs remote resolution at
/// construction, mirrors state into the address bar (debounced, one-way)
/// after reading it once at mount, and exposes the mutation and derived
/// read APIs. Mutators are synchronous and fire-and-forget: resolution
/// outcomes surface only through the snapshot's `error` field, never as
/// exceptions.
pub struct DataSourceEngine<T> {
    config: DataSourceConfig,
    mode: Mode<T>,
    coordinator: RequestCoordinator,
    address_bar: Option<Arc<dyn AddressBar>>,
    state: RwLock<QueryState>,
    snapshot: RwLock<Snapshot<T>>,
    views: RwLock<Vec<View>>,
    feed: ChangeFeed,
    /// Handle to ourselves for the spawned resolution tasks.
    self_ref: Weak<DataSourceEngine<T>>,
}

impl<T> DataSourceEngine<T>
where
    T: Record + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Shorthand for a local-mode engine with no address bar.
    pub fn local(config: DataSourceConfig, data: Vec<T>) -> Arc<Self> {
        DataSourceBuilder::new(config).build_local(data)
    }

    /// Shorthand for a remote-mode engine with no address bar.
    pub fn remote(config: DataSourceConfig, fetcher: Arc<dyn Fetcher>) -> Arc<Self> {
        DataSourceBuilder::new(config).build_remote(fetcher)
    }

    fn build(
        config: DataSourceConfig,
        mode: Mode<T>,
        coordinator: RequestCoordinator,
        address_bar: Option<Arc<dyn AddressBar>>,
    ) -> Arc<Self> {
        let state = Self::initial_state(&config, address_bar.as_deref());
        let engine = Arc::new_cyclic(|self_ref| Self {
            views: RwLock::new(config.default_views.clone()),
            config,
            mode,
            coordinator,
            address_bar,
            state: RwLock::new(state),
            snapshot: RwLock::new(Snapshot::default()),
            feed: ChangeFeed::new(),
            self_ref: self_ref.clone(),
        });
        engine.request_resolve();
        engine
    }

    /// The address bar is read exactly once, here; the engine never
    /// watches it afterwards.
    fn initial_state(config: &DataSourceConfig, bar: Option<&dyn AddressBar>) -> QueryState {
        if config.sync_with_url {
            if let Some(query) = bar.and_then(|bar| bar.read()) {
                let mut state = decode_query(&query, config.default_limit);
                if state.sort.is_none() {
                    state.sort = config.default_sort.clone();
                }
                return state;
            }
        }
        QueryState::new(config.default_limit, config.default_sort.clone())
    }

    // ---- mutation API -------------------------------------------------

    /// Moves to the given page.
    pub fn set_page(&self, page: u64) {
        self.state.write().set_page(page);
        self.after_mutation(ChangeReason::PageChange);
    }

    /// Sets or clears the sort entry.
    pub fn set_sort(&self, sort: Option<SortSpec>) {
        self.state.write().set_sort(sort);
        self.after_mutation(ChangeReason::SortChange);
    }

    /// Replaces the structured filters wholesale. Resets the page to 1,
    /// whether or not the values actually changed.
    pub fn set_filters(&self, filters: FilterMap) {
        self.state.write().set_filters(filters);
        self.after_mutation(ChangeReason::FilterChange);
    }

    /// Sets the free-text search term. Resets the page to 1.
    pub fn set_query_value(&self, value: impl Into<String>) {
        self.state.write().set_query_value(value);
        self.after_mutation(ChangeReason::QueryChange);
    }

    /// Selects a saved view by name (or id), populating the filters from
    /// its preset, or returns to the default "All" view with `None`.
    /// Resets the page to 1. Selecting an unknown name is a no-op.
    pub fn set_selected_view(&self, name: Option<&str>) {
        match name {
            Some(name) => {
                let view = self
                    .views
                    .read()
                    .iter()
                    .find(|view| view.name == name || view.id.as_deref() == Some(name))
                    .cloned();
                match view {
                    Some(view) => self.state.write().select_view(&view),
                    None => {
                        tracing::warn!(view = %name, "ignoring selection of unknown view");
                        return;
                    }
                }
            }
            None => self.state.write().clear_view(),
        }
        self.after_mutation(ChangeReason::ViewChange);
    }

    /// Forces a re-resolution without changing the query state, for hosts
    /// whose external conditions changed (e.g. a polling timer).
    pub fn refresh(&self) {
        self.feed.emit(StateChange {
            reason: ChangeReason::Refresh,
            page: self.state.read().page,
        });
        self.request_resolve();
    }

    /// Replaces the set of views available for selection.
    pub fn set_views(&self, views: Vec<View>) {
        *self.views.write() = views;
    }

    /// Cancels pending timers and in-flight work and releases coordinator
    /// bookkeeping. Call on host teardown.
    pub fn dispose(&self) {
        self.coordinator.cancel(&self.config.source_key);
        self.coordinator.cancel(&self.url_key());
    }

    // ---- derived read API ---------------------------------------------

    /// Returns a copy of the current query state.
    pub fn state(&self) -> QueryState {
        self.state.read().clone()
    }

    /// Returns a copy of the current result snapshot.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.snapshot.read().clone()
    }

    /// Returns the pagination summary for the current state and total.
    pub fn pagination(&self) -> PaginationSummary {
        let state = self.state.read();
        let total = self.snapshot.read().total;
        PaginationSummary {
            page: state.page,
            limit: state.limit,
            total,
            page_count: total.div_ceil(state.limit),
        }
    }

    /// Returns the views available for selection.
    pub fn views(&self) -> Vec<View> {
        self.views.read().clone()
    }

    /// Subscribes to reasoned state-change events.
    pub fn subscribe(&self) -> Receiver<StateChange> {
        self.feed.subscribe()
    }

    // ---- resolution ---------------------------------------------------

    fn after_mutation(&self, reason: ChangeReason) {
        self.feed.emit(StateChange {
            reason,
            page: self.state.read().page,
        });
        self.schedule_url_write();
        self.request_resolve();
    }

    fn request_resolve(&self) {
        {
            let mut snapshot = self.snapshot.write();
            snapshot.error = None;
            snapshot.loading = true;
        }
        match &self.mode {
            Mode::Local(items) => {
                let state = self.state.read().clone();
                let page = resolve_local(items, &state, &self.config.query_key);
                self.commit_success(None, page);
            }
            Mode::Remote { fetcher, transform } => {
                let Some(engine) = self.self_ref.upgrade() else {
                    return;
                };
                let fetcher = Arc::clone(fetcher);
                let transform = transform.clone();
                // Fire-and-forget; outcomes surface through the snapshot.
                let _ = self.coordinator.schedule(
                    &self.config.source_key,
                    self.config.debounce,
                    move |ticket| async move {
                        engine.run_remote(ticket, fetcher, transform).await;
                    },
                );
            }
        }
    }

    async fn run_remote(
        &self,
        ticket: Ticket,
        fetcher: Arc<dyn Fetcher>,
        transform: Option<TransformFn<T>>,
    ) {
        // The URL is built when the debounce timer fires, so a burst of
        // mutations collapses into one request carrying the last state.
        let state = self.state.read().clone();
        let url = build_url(
            &self.config.endpoint,
            &state,
            &self.config.query_key,
            self.config.abbreviated,
        );
        tracing::debug!(url = %url, "issuing fetch");

        let outcome = fetcher.fetch(FetchRequest::new(url)).await;
        if !ticket.is_live() {
            tracing::debug!(key = %ticket.key(), "discarding superseded completion");
            return;
        }

        match outcome {
            FetchOutcome::Cancelled => {}
            FetchOutcome::Failed(message) => {
                self.commit_failure(Some(&ticket), EngineError::transport(message))
            }
            FetchOutcome::Ok(raw) => match normalize(raw, transform.as_ref()) {
                Ok(Normalized::Aborted) => {}
                Ok(Normalized::Page(page)) => self.commit_success(Some(&ticket), page),
                Err(err) => self.commit_failure(Some(&ticket), err),
            },
        }
    }

    /// A successor may begin between the post-fetch liveness check and the
    /// lock acquisition, so the ticket is re-checked under the lock. The
    /// successor's generation bump happens before its own commit, which
    /// makes a stale overwrite impossible.
    fn commit_success(&self, ticket: Option<&Ticket>, page: PageResult<T>) {
        let mut snapshot = self.snapshot.write();
        if let Some(ticket) = ticket {
            if !ticket.is_live() {
                return;
            }
        }
        snapshot.items = page.items;
        snapshot.total = page.total;
        snapshot.loading = false;
        snapshot.first_load = false;
        snapshot.error = None;
    }

    /// Hard failure must not leave stale items behind.
    fn commit_failure(&self, ticket: Option<&Ticket>, error: EngineError) {
        let mut snapshot = self.snapshot.write();
        if let Some(ticket) = ticket {
            if !ticket.is_live() {
                return;
            }
        }
        tracing::warn!(%error, "resolution failed");
        snapshot.items = Vec::new();
        snapshot.total = 0;
        snapshot.loading = false;
        snapshot.first_load = false;
        snapshot.error = Some(error);
    }

    fn url_key(&self) -> String {
        format!("{}#url", self.config.source_key)
    }

    fn schedule_url_write(&self) {
        if !self.config.sync_with_url {
            return;
        }
        let Some(bar) = self.address_bar.clone() else {
            return;
        };
        let Some(engine) = self.self_ref.upgrade() else {
            return;
        };
        let _ = self.coordinator.schedule(
            &self.url_key(),
            self.config.url_debounce,
            move |_ticket| async move {
                let query = encode_query(&engine.state.read());
                bar.replace(&query);
            },
        );
    }
}
