//! # Gridsource Views
//!
//! Saved-view store client for gridsource data tables.
//!
//! A view is a named filter preset ([`gridsource_state::View`]). This crate
//! provides:
//! - [`ViewStore`]: the store abstraction (list, create, update, delete,
//!   rename), scoped by namespace path and optional owner
//! - [`HttpViewStore`]: JSON-over-POST client against a backend, with the
//!   HTTP stack injected via [`HttpClient`]
//! - [`MemoryViewStore`]: the in-memory reference implementation of the
//!   ownership rule, used in tests and single-process hosts
//!
//! Ownership rule: a view created without an owner is shared and visible
//! to everyone; a view created with an owner is visible only to that
//! owner. Names are unique within a caller's visible scope.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod http;
mod memory;
mod store;

pub use error::{ViewStoreError, ViewStoreResult};
pub use http::{HttpClient, HttpViewStore};
pub use memory::MemoryViewStore;
pub use store::{
    CreateViewRequest, DeleteViewRequest, DeleteViewResponse, ListViewsRequest, ListViewsResponse,
    RenameViewRequest, UpdateViewRequest, ViewResponse, ViewStore,
};
