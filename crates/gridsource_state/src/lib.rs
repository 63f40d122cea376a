//! # Gridsource State
//!
//! Pure data model for gridsource data tables.
//!
//! This crate provides:
//! - [`QueryState`]: the canonical snapshot of page, limit, sort, filter
//!   values and view selection owned by a data-source engine
//! - [`FilterValue`]: a tagged union over the value shapes a filter can hold
//! - [`View`]: a named, persisted filter preset
//! - [`PageResult`]: one resolved page of items plus the pre-pagination total
//! - [`Record`]: field access used by local (in-memory) resolution
//!
//! ## Key Invariants
//!
//! - `page >= 1`, and it resets to 1 whenever filters change
//! - the reserved `queryValue` filter entry is always present as a scalar
//!   after initialization, even if empty
//! - `limit` is fixed for the lifetime of an engine instance

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod filter;
mod page;
mod query_state;
mod record;
mod sort;
mod view;

pub use filter::{FilterMap, FilterValue, QUERY_VALUE_KEY};
pub use page::PageResult;
pub use query_state::QueryState;
pub use record::{FieldValue, Record};
pub use sort::{SortDirection, SortSpec};
pub use view::View;
