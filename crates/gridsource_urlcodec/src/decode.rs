//! Query string → query state.

use crate::percent::percent_decode;
use gridsource_state::{FilterValue, QueryState, SortSpec, QUERY_VALUE_KEY};

const FILTER_PREFIX: &str = "filter_";

/// Decodes an address-bar query string into a query state.
///
/// The page size is not part of the wire format and comes from the engine's
/// configuration. Decoding is lenient throughout: a non-numeric `page`
/// falls back to 1, an unrecognized sort direction drops the sort entry,
/// a `filter_*` value that fails to parse as a JSON string array is kept as
/// a plain string, and unknown parameters are ignored.
pub fn decode_query(query: &str, limit: u64) -> QueryState {
    let mut state = QueryState::new(limit, None);
    let query = query.strip_prefix('?').unwrap_or(query);

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = percent_decode(raw_key);
        let value = percent_decode(raw_value);

        match key.as_str() {
            "page" => {
                state.page = value.parse::<u64>().ok().filter(|page| *page >= 1).unwrap_or(1);
            }
            "sort" => state.sort = decode_sort(&value),
            "query" => {
                state
                    .filters
                    .insert(QUERY_VALUE_KEY.to_string(), FilterValue::Scalar(value));
            }
            "viewSelected" if !value.is_empty() => {
                state.view_selected = Some(value);
            }
            _ => {
                if let Some(filter_key) = key.strip_prefix(FILTER_PREFIX) {
                    if !value.is_empty() {
                        state
                            .filters
                            .insert(filter_key.to_string(), decode_filter_value(value));
                    }
                }
                // Anything else is an unknown parameter and is ignored.
            }
        }
    }

    state
}

/// The direction is always `asc`/`desc` and never contains a pipe, so the
/// split happens at the last one and a field may carry pipes of its own.
fn decode_sort(value: &str) -> Option<SortSpec> {
    let (field, direction) = value.rsplit_once('|')?;
    if field.is_empty() {
        return None;
    }
    let direction = direction.parse().ok()?;
    Some(SortSpec::new(field, direction))
}

/// A value that parses as a JSON array of strings becomes a list filter;
/// anything else stays a scalar. Trying JSON first means a multi-choice
/// filter survives the round trip, while scalars that merely resemble JSON
/// (`"5"`, `"true"`) are untouched because they do not parse as arrays.
fn decode_filter_value(value: String) -> FilterValue {
    match serde_json::from_str::<Vec<String>>(&value) {
        Ok(items) => FilterValue::List(items),
        Err(_) => FilterValue::Scalar(value),
    }
}
