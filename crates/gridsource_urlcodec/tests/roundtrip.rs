//! Property tests for the codec round-trip contract.

use gridsource_state::{FilterValue, QueryState, SortDirection, SortSpec, QUERY_VALUE_KEY};
use gridsource_urlcodec::{decode_query, encode_query};
use proptest::prelude::*;

fn filter_key() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,11}".prop_filter("reserved key", |key| key != QUERY_VALUE_KEY)
}

/// Scalar filter values: arbitrary non-empty text that does not itself
/// parse as a JSON string array (such values are representable only as
/// list filters on the wire).
fn scalar_value() -> impl Strategy<Value = String> {
    ".{1,24}".prop_filter("parses as JSON array", |value| {
        serde_json::from_str::<Vec<String>>(value).is_err()
    })
}

fn filter_value() -> impl Strategy<Value = FilterValue> {
    prop_oneof![
        scalar_value().prop_map(FilterValue::Scalar),
        prop::collection::vec(".{0,16}", 1..4).prop_map(FilterValue::List),
    ]
}

fn sort_spec() -> impl Strategy<Value = Option<SortSpec>> {
    // Pipes are legal in field names; only the final separator is the
    // codec's.
    prop::option::of(("[a-zA-Z][a-zA-Z0-9_|]{0,11}", prop_oneof![
        Just(SortDirection::Asc),
        Just(SortDirection::Desc)
    ])
    .prop_map(|(field, direction)| SortSpec::new(field, direction)))
}

fn query_state() -> impl Strategy<Value = QueryState> {
    (
        1u64..500,
        1u64..200,
        sort_spec(),
        ".{0,24}",
        prop::collection::btree_map(filter_key(), filter_value(), 0..4),
        prop::option::of(".{1,16}"),
    )
        .prop_map(|(page, limit, sort, query_value, filters, view)| {
            let mut state = QueryState::new(limit, sort);
            for (key, value) in filters {
                state.filters.insert(key, value);
            }
            state.set_query_value(query_value);
            state.view_selected = view;
            state.set_page(page);
            state
        })
}

proptest! {
    #[test]
    fn decode_inverts_encode(state in query_state()) {
        let encoded = encode_query(&state);
        let decoded = decode_query(&encoded, state.limit);
        prop_assert_eq!(decoded, state);
    }

    #[test]
    fn encoded_form_is_single_line_ascii(state in query_state()) {
        let encoded = encode_query(&state);
        prop_assert!(encoded.is_ascii());
        prop_assert!(!encoded.contains(' '));
        prop_assert!(!encoded.contains('\n'));
    }
}
