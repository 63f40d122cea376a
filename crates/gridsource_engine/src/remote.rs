//! Remote resolution: URL construction and response normalization.

use crate::error::{EngineError, EngineResult};
use gridsource_state::{FilterValue, PageResult, QueryState};
use gridsource_urlcodec::percent_encode;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Hook remapping a raw backend payload into the page shape.
pub type TransformFn<T> =
    Arc<dyn Fn(serde_json::Value) -> EngineResult<PageResult<T>> + Send + Sync>;

/// Backend-reported cancellation marker.
///
/// An opaque wire convention: a payload whose `message` field equals this
/// string is a cancellation signal, not a result.
const ABORTED_MESSAGE: &str = "aborted";

/// A normalized backend payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<T> {
    /// A usable page of results.
    Page(PageResult<T>),
    /// The backend reported the request as aborted; discard like any other
    /// cancellation.
    Aborted,
}

/// Builds the outbound request URL for a query state.
///
/// Parameters: `page` (omitted when 1), `limit`, `sort=field|direction`,
/// one repeatable `filters` parameter per active filter (`key|value` for
/// scalars, `key|array|any|v1,v2` for lists), the free-text term as
/// `queryKey|trimmed`, and a plain `abbreviated=true` hint when configured.
pub fn build_url(
    endpoint: &str,
    state: &QueryState,
    query_key: &str,
    abbreviated: bool,
) -> String {
    let mut params: Vec<(String, String)> = Vec::new();

    if state.page > 1 {
        params.push(("page".into(), state.page.to_string()));
    }
    params.push(("limit".into(), state.limit.to_string()));

    if let Some(sort) = &state.sort {
        params.push((
            "sort".into(),
            format!("{}|{}", sort.field, sort.direction.as_str()),
        ));
    }

    let query = state.query_value().trim();
    if !query.is_empty() {
        params.push(("filters".into(), format!("{query_key}|{query}")));
    }

    for (key, value) in state.active_filters() {
        let serialized = match value {
            FilterValue::Scalar(s) => format!("{key}|{s}"),
            FilterValue::List(items) => format!("{key}|array|any|{}", items.join(",")),
            FilterValue::Absent => continue,
        };
        params.push(("filters".into(), serialized));
    }

    if abbreviated {
        params.push(("abbreviated".into(), "true".into()));
    }

    let query_string = params
        .iter()
        .map(|(key, value)| format!("{key}={}", percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{endpoint}?{query_string}")
}

/// Normalizes a raw backend payload into a page result.
///
/// The aborted marker is checked first; a payload carrying it is never
/// treated as data or as a failure. Otherwise the optional transform hook
/// maps the payload, or the default `{items, total}` shape is
/// deserialized.
pub fn normalize<T: DeserializeOwned>(
    raw: serde_json::Value,
    transform: Option<&TransformFn<T>>,
) -> EngineResult<Normalized<T>> {
    if raw.get("message").and_then(|m| m.as_str()) == Some(ABORTED_MESSAGE) {
        return Ok(Normalized::Aborted);
    }

    let page = match transform {
        Some(transform) => transform(raw)?,
        None => serde_json::from_value(raw)
            .map_err(|err| EngineError::invalid_response(err.to_string()))?,
    };
    Ok(Normalized::Page(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsource_state::SortSpec;
    use serde_json::json;

    #[test]
    fn url_shape_scenario() {
        let mut state = QueryState::new(20, Some(SortSpec::desc("price")));
        state
            .filters
            .insert("status".into(), FilterValue::from("active"));
        state.set_page(2);

        let url = build_url("/api/x", &state, "name", false);
        assert!(url.starts_with("/api/x?"));
        assert!(url.contains("page=2"));
        assert!(url.contains("limit=20"));
        assert!(url.contains("sort=price%7Cdesc"));
        assert!(url.contains("filters=status%7Cactive"));
        assert!(!url.contains("abbreviated"));
    }

    #[test]
    fn page_one_is_omitted() {
        let state = QueryState::new(20, None);
        let url = build_url("/api/x", &state, "name", false);
        assert!(!url.contains("page="));
        assert!(url.contains("limit=20"));
    }

    #[test]
    fn query_value_rides_the_filters_parameter() {
        let mut state = QueryState::new(20, None);
        state.set_query_value("  bob  ");
        let url = build_url("/api/x", &state, "name", false);
        assert!(url.contains("filters=name%7Cbob"));
    }

    #[test]
    fn list_filters_use_array_any_form() {
        let mut state = QueryState::new(20, None);
        state
            .filters
            .insert("status".into(), FilterValue::from(vec!["active", "archived"]));
        let url = build_url("/api/x", &state, "name", false);
        assert!(url.contains("filters=status%7Carray%7Cany%7Cactive%2Carchived"));
    }

    #[test]
    fn abbreviated_flag_is_appended() {
        let state = QueryState::new(20, None);
        let url = build_url("/api/x", &state, "name", true);
        assert!(url.ends_with("abbreviated=true"));
    }

    #[test]
    fn normalize_default_shape() {
        let raw = json!({ "items": [{"name": "Bob"}], "total": 12 });
        let normalized: Normalized<serde_json::Value> = normalize(raw, None).unwrap();
        match normalized {
            Normalized::Page(page) => {
                assert_eq!(page.items.len(), 1);
                assert_eq!(page.total, 12);
            }
            Normalized::Aborted => panic!("expected page"),
        }
    }

    #[test]
    fn normalize_detects_aborted_marker() {
        let raw = json!({ "message": "aborted" });
        let normalized: Normalized<serde_json::Value> = normalize(raw, None).unwrap();
        assert_eq!(normalized, Normalized::Aborted);
    }

    #[test]
    fn normalize_rejects_unexpected_shape() {
        let raw = json!({ "rows": [] });
        let result: EngineResult<Normalized<serde_json::Value>> = normalize(raw, None);
        assert!(matches!(result, Err(EngineError::InvalidResponse { .. })));
    }

    #[test]
    fn transform_hook_remaps_payload() {
        let transform: TransformFn<serde_json::Value> = Arc::new(|raw| {
            let rows = raw
                .get("rows")
                .and_then(|rows| rows.as_array())
                .cloned()
                .ok_or_else(|| EngineError::transform("missing rows"))?;
            let total = rows.len() as u64;
            Ok(PageResult::new(rows, total))
        });

        let raw = json!({ "rows": [{"name": "Ann"}] });
        let normalized = normalize(raw, Some(&transform)).unwrap();
        match normalized {
            Normalized::Page(page) => assert_eq!(page.total, 1),
            Normalized::Aborted => panic!("expected page"),
        }

        let bad = json!({ "items": [] });
        assert!(matches!(
            normalize(bad, Some(&transform)),
            Err(EngineError::Transform { .. })
        ));
    }
}
