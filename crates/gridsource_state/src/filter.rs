//! Filter values and the filter map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved filter key holding the free-text search term.
///
/// This entry is always present in a [`FilterMap`] owned by a query state,
/// even when the term is empty.
pub const QUERY_VALUE_KEY: &str = "queryValue";

/// Mapping from filter key to value.
///
/// A `BTreeMap` keeps iteration order deterministic, which in turn keeps
/// encoded URLs and outbound request parameters deterministic.
pub type FilterMap = BTreeMap<String, FilterValue>;

/// The value held by a single filter entry.
///
/// Replaces the loosely typed `string | string[] | undefined` shape with an
/// explicit tagged union. On the wire (view presets) a scalar serializes as
/// a JSON string, a list as a JSON array and an absent value as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Free-text or single-choice value.
    Scalar(String),
    /// Multi-choice value.
    List(Vec<String>),
    /// Explicitly cleared / absent.
    Absent,
}

impl FilterValue {
    /// Returns true if this value imposes no constraint.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Absent => true,
            FilterValue::Scalar(s) => s.is_empty(),
            FilterValue::List(v) => v.is_empty(),
        }
    }

    /// Returns the scalar value, if this is a non-empty scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FilterValue::Scalar(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Returns the list value, if this is a non-empty list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FilterValue::List(v) if !v.is_empty() => Some(v),
            _ => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Scalar(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Scalar(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::List(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        FilterValue::List(values.into_iter().map(String::from).collect())
    }
}
