//! Local resolution: filter → sort → paginate over an in-memory array.

use chrono::{DateTime, NaiveDate};
use gridsource_state::{FieldValue, FilterValue, PageResult, QueryState, Record};
use std::cmp::Ordering;

/// Field name whose values are compared as timestamps when sorting.
const CREATED_AT: &str = "createdAt";

/// Resolves a query state against an in-memory array.
///
/// The pipeline order is fixed; each stage narrows or reorders the
/// previous stage's output:
/// 1. free-text match of the query term against `query_key`
/// 2. structured per-key filters
/// 3. stable sort
/// 4. pagination
///
/// `total` counts the set after filtering but before pagination. Pages
/// beyond the available data yield an empty slice, not an error.
pub fn resolve_local<T: Record + Clone>(
    items: &[T],
    state: &QueryState,
    query_key: &str,
) -> PageResult<T> {
    let query = state.query_value().trim().to_lowercase();

    let mut matched: Vec<&T> = items
        .iter()
        .filter(|item| matches_query(*item, query_key, &query))
        .filter(|item| matches_filters(*item, state))
        .collect();

    if let Some(sort) = &state.sort {
        let descending = sort.direction == gridsource_state::SortDirection::Desc;
        // Vec::sort_by is stable, so ties keep their original order.
        matched.sort_by(|a, b| {
            let ordering = compare_fields(a.field(&sort.field), b.field(&sort.field), &sort.field);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    let total = matched.len() as u64;
    let start = state.page.saturating_sub(1).saturating_mul(state.limit);
    let page: Vec<T> = matched
        .into_iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(usize::try_from(state.limit).unwrap_or(usize::MAX))
        .cloned()
        .collect();

    PageResult::new(page, total)
}

/// Items whose field is absent are excluded when a query term is present.
fn matches_query<T: Record>(item: &T, query_key: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    match item.field(query_key) {
        Some(value) => value.to_text().to_lowercase().contains(query),
        None => false,
    }
}

fn matches_filters<T: Record>(item: &T, state: &QueryState) -> bool {
    state.active_filters().all(|(key, filter)| {
        let field = item.field(key);
        match filter {
            FilterValue::List(allowed) => match field {
                Some(value) => {
                    let text = value.to_text();
                    allowed.iter().any(|candidate| *candidate == text)
                }
                None => false,
            },
            FilterValue::Scalar(needle) => match field {
                Some(value) => value
                    .to_text()
                    .to_lowercase()
                    .contains(&needle.to_lowercase()),
                None => false,
            },
            // Empty values never reach here: active_filters skips them.
            FilterValue::Absent => true,
        }
    })
}

/// Missing fields sort to the end ascending (and therefore to the start
/// descending, since the caller reverses the ordering).
fn compare_fields(a: Option<FieldValue>, b: Option<FieldValue>, field: &str) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_values(&a, &b, field),
    }
}

fn compare_values(a: &FieldValue, b: &FieldValue, field: &str) -> Ordering {
    if field == CREATED_AT {
        if let (Some(a), Some(b)) = (parse_timestamp(a), parse_timestamp(b)) {
            return a.cmp(&b);
        }
    }
    match (a, b) {
        (FieldValue::Number(a), FieldValue::Number(b)) => {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        _ => a
            .to_text()
            .to_lowercase()
            .cmp(&b.to_text().to_lowercase()),
    }
}

fn parse_timestamp(value: &FieldValue) -> Option<i64> {
    match value {
        // Numeric timestamps are taken as epoch milliseconds.
        FieldValue::Number(n) => Some(*n as i64),
        FieldValue::Text(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp_millis())
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc().timestamp_millis())
            }),
        FieldValue::Bool(_) => None,
    }
}
