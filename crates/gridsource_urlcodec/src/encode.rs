//! Query state → query string.

use crate::percent::percent_encode;
use gridsource_state::{FilterValue, QueryState};

const FILTER_PREFIX: &str = "filter_";

/// Encodes a query state as an address-bar query string (no leading `?`).
///
/// Defaults are elided: page 1, an absent sort, an empty free-text term and
/// empty filter entries produce no parameter at all. Writers replace the
/// whole query-string portion, so eliding a parameter also clears any stale
/// value a previous state left behind.
pub fn encode_query(state: &QueryState) -> String {
    let mut params: Vec<(String, String)> = Vec::new();

    if state.page > 1 {
        params.push(("page".into(), state.page.to_string()));
    }

    if let Some(sort) = &state.sort {
        params.push((
            "sort".into(),
            format!("{}|{}", sort.field, sort.direction.as_str()),
        ));
    }

    let query_value = state.query_value();
    if !query_value.is_empty() {
        params.push(("query".into(), query_value.to_string()));
    }

    for (key, value) in state.active_filters() {
        let encoded = match value {
            FilterValue::Scalar(s) => s.clone(),
            FilterValue::List(items) => match serde_json::to_string(items) {
                Ok(json) => json,
                Err(_) => continue,
            },
            FilterValue::Absent => continue,
        };
        params.push((format!("{FILTER_PREFIX}{key}"), encoded));
    }

    if let Some(view) = &state.view_selected {
        params.push(("viewSelected".into(), view.clone()));
    }

    params
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsource_state::SortSpec;

    #[test]
    fn page_one_is_elided() {
        let mut state = QueryState::new(50, None);
        assert_eq!(encode_query(&state), "");
        state.set_page(2);
        assert_eq!(encode_query(&state), "page=2");
    }

    #[test]
    fn sort_uses_pipe_separator() {
        let state = QueryState::new(50, Some(SortSpec::desc("price")));
        assert_eq!(encode_query(&state), "sort=price%7Cdesc");
    }

    #[test]
    fn query_value_under_query_key() {
        let mut state = QueryState::new(50, None);
        state.set_query_value("bob smith");
        assert_eq!(encode_query(&state), "query=bob%20smith");
    }

    #[test]
    fn filters_are_prefixed_and_lists_json_encoded() {
        let mut state = QueryState::new(50, None);
        state
            .filters
            .insert("status".into(), FilterValue::from("active"));
        state
            .filters
            .insert("tags".into(), FilterValue::from(vec!["a", "b"]));

        let encoded = encode_query(&state);
        assert!(encoded.contains("filter_status=active"));
        assert!(encoded.contains("filter_tags=%5B%22a%22%2C%22b%22%5D"));
    }

    #[test]
    fn empty_filters_are_omitted() {
        let mut state = QueryState::new(50, None);
        state.filters.insert("status".into(), FilterValue::Absent);
        state
            .filters
            .insert("owner".into(), FilterValue::Scalar(String::new()));
        assert_eq!(encode_query(&state), "");
    }

    #[test]
    fn view_selected_encoded_verbatim() {
        let mut state = QueryState::new(50, None);
        state.view_selected = Some("My View".into());
        assert_eq!(encode_query(&state), "viewSelected=My%20View");
    }
}
