//! Saved view presets.

use crate::filter::FilterMap;
use serde::{Deserialize, Serialize};

/// A named, persisted filter preset.
///
/// Views are created and managed by an external view store; a data-source
/// engine only reads `filters` when a view is selected. A view with no
/// owner is shared/global; ownership is enforced by the store, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Store-assigned identifier, if the view has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name, unique within a visibility scope.
    pub name: String,
    /// The filter values this view applies when selected.
    pub filters: FilterMap,
}

impl View {
    /// Creates an unpersisted view.
    pub fn new(name: impl Into<String>, filters: FilterMap) -> Self {
        Self {
            id: None,
            name: name.into(),
            filters,
        }
    }

    /// Attaches a store-assigned identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterValue;

    #[test]
    fn wire_roundtrip() {
        let mut filters = FilterMap::new();
        filters.insert("status".into(), FilterValue::from("active"));
        filters.insert("tags".into(), FilterValue::from(vec!["a", "b"]));
        let view = View::new("Active", filters).with_id("v1");

        let json = serde_json::to_string(&view).unwrap();
        let decoded: View = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, view);
    }

    #[test]
    fn unpersisted_view_omits_id() {
        let view = View::new("All", FilterMap::new());
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("\"id\""));
    }
}
