//! # Gridsource Engine
//!
//! The data-source state engine for gridsource data tables.
//!
//! This crate provides:
//! - [`DataSourceEngine`]: the state machine reconciling address-bar
//!   parameters, in-memory query state, outbound requests and the rendered
//!   result set
//! - [`RequestCoordinator`]: debounce and cancel-on-supersede per logical
//!   data-source key
//! - Local (synchronous, in-memory) and remote (debounced, cancelable
//!   fetch) resolution producing the same result shape
//! - [`Fetcher`] / [`AddressBar`]: injectable collaborators for the HTTP
//!   stack and the host's location, with mock implementations
//! - [`ChangeFeed`]: reasoned state-change events for external
//!   collaborators such as a selection manager
//!
//! ## Key Invariants
//!
//! - Exactly one resolver (local or remote) per engine instance, decided
//!   at construction
//! - Within one logical key, only the most recently scheduled operation's
//!   result ever lands; superseded completions are discarded
//! - A hard failure empties the result set; a cancellation leaves the
//!   previous result visible
//! - The address bar is read once at mount and written (debounced) on
//!   every state change; it is never watched afterwards

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod coordinator;
mod engine;
mod error;
mod events;
mod fetch;
mod local;
mod remote;
mod url;

pub use config::{DataSourceConfig, DEFAULT_DEBOUNCE, DEFAULT_LIMIT, URL_DEBOUNCE};
pub use coordinator::{RequestCoordinator, Ticket};
pub use engine::{DataSourceBuilder, DataSourceEngine, PaginationSummary, Snapshot};
pub use error::{EngineError, EngineResult};
pub use events::{ChangeFeed, ChangeReason, StateChange};
pub use fetch::{BoxFetch, FetchOutcome, FetchRequest, Fetcher, MockFetcher};
pub use local::resolve_local;
pub use remote::{build_url, normalize, Normalized, TransformFn};
pub use url::{AddressBar, MemoryAddressBar};
