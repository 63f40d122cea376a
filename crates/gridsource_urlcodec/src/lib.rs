//! # Gridsource URL Codec
//!
//! Bidirectional mapping between a [`QueryState`](gridsource_state::QueryState)
//! and its address-bar query-string representation.
//!
//! ## Wire format
//!
//! - `page`: omitted when 1, else decimal
//! - `sort`: `field|direction`
//! - `query`: the free-text search term, omitted when empty
//! - `filter_<key>`: one parameter per structured filter; list values are
//!   JSON-encoded, scalar values are plain (percent-encoded) strings
//! - `viewSelected`: name of the active saved view
//!
//! This is a public, stable format: external tools bookmark and deep-link
//! into table views through it.
//!
//! ## Contract
//!
//! `decode_query(encode_query(state), state.limit)` reproduces `state` for
//! every representable state. The reverse is not byte-stable: the codec is
//! a presentation projection, not a storage format, and decoding is
//! deliberately lenient (malformed numbers, JSON and percent escapes fall
//! back to defaults or raw strings rather than failing).

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decode;
mod encode;
mod error;
mod percent;

pub use decode::decode_query;
pub use encode::encode_query;
pub use error::{CodecError, CodecResult};
pub use percent::{percent_decode, percent_decode_strict, percent_encode};

#[cfg(test)]
mod tests {
    use super::*;
    use gridsource_state::{FilterValue, QueryState, SortSpec};

    #[test]
    fn roundtrip_default_state_is_empty() {
        let state = QueryState::new(50, None);
        assert_eq!(encode_query(&state), "");
        assert_eq!(decode_query("", 50), state);
    }

    #[test]
    fn roundtrip_full_state() {
        let mut state = QueryState::new(25, None);
        state.set_query_value("crates & things");
        state
            .filters
            .insert("status".into(), FilterValue::from("active"));
        state
            .filters
            .insert("tags".into(), FilterValue::from(vec!["a|b", "c=d"]));
        state.set_sort(Some(SortSpec::desc("price")));
        state.view_selected = Some("My View".into());
        state.set_page(3);

        let encoded = encode_query(&state);
        assert_eq!(decode_query(&encoded, 25), state);
    }

    #[test]
    fn roundtrip_sort_field_with_pipe() {
        let state = QueryState::new(50, Some(SortSpec::asc("unit|price")));
        assert_eq!(decode_query(&encode_query(&state), 50), state);
    }
}
