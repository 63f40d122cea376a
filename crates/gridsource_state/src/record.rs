//! Field access for local resolution.

use std::fmt;

/// A field value extracted from a record for filtering or sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl FieldValue {
    /// Renders the value as text for substring matching.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => {
                // Integral floats render without a trailing ".0" so that
                // `42` matches the query "42" rather than "42.0".
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            FieldValue::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Access to named fields on an item, as required by the local resolver.
///
/// Returning `None` means the field is absent or not representable as a
/// filterable value; such items are excluded by a non-empty free-text query
/// and sort after (ascending) or before (descending) items that carry the
/// field.
pub trait Record {
    /// Returns the value of the named field, if present.
    fn field(&self, key: &str) -> Option<FieldValue>;
}

impl Record for serde_json::Value {
    fn field(&self, key: &str) -> Option<FieldValue> {
        match self.get(key)? {
            serde_json::Value::String(s) => Some(FieldValue::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(FieldValue::Number),
            serde_json::Value::Bool(b) => Some(FieldValue::Bool(*b)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_field_access() {
        let row = json!({"name": "Bob", "age": 42, "active": true, "tags": ["x"]});
        assert_eq!(row.field("name"), Some(FieldValue::Text("Bob".into())));
        assert_eq!(row.field("age"), Some(FieldValue::Number(42.0)));
        assert_eq!(row.field("active"), Some(FieldValue::Bool(true)));
        assert_eq!(row.field("tags"), None);
        assert_eq!(row.field("missing"), None);
    }

    #[test]
    fn text_rendering() {
        assert_eq!(FieldValue::Number(42.0).to_text(), "42");
        assert_eq!(FieldValue::Number(1.5).to_text(), "1.5");
        assert_eq!(FieldValue::Bool(false).to_text(), "false");
        assert_eq!(FieldValue::Text("x".into()).to_text(), "x");
    }
}
