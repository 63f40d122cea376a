//! View store abstraction and wire messages.

use crate::error::ViewStoreResult;
use gridsource_state::{FilterMap, View};
use serde::{Deserialize, Serialize};

/// A store of saved view presets.
///
/// Views live under a `path` (one namespace per data table, typically the
/// table's endpoint). `owner` scopes visibility: a view created without an
/// owner is shared/global, a view created with one is visible only to that
/// owner. Names are unique within a caller's visible scope.
///
/// The data-source engine never performs view CRUD; hosts drive the store
/// and hand the resulting views to the engine.
pub trait ViewStore: Send + Sync {
    /// Lists the views visible to `owner` under `path`: the shared views
    /// plus the owner's own.
    fn list(&self, path: &str, owner: Option<&str>) -> ViewStoreResult<Vec<View>>;

    /// Creates a view in the caller's scope and returns it with its
    /// store-assigned id.
    fn create(&self, path: &str, view: &View, owner: Option<&str>) -> ViewStoreResult<View>;

    /// Replaces the filters of the named view in the caller's scope.
    fn update(
        &self,
        path: &str,
        name: &str,
        filters: &FilterMap,
        owner: Option<&str>,
    ) -> ViewStoreResult<View>;

    /// Deletes the named view from the caller's scope.
    fn delete(&self, path: &str, name: &str, owner: Option<&str>) -> ViewStoreResult<()>;

    /// Renames a view within the caller's scope.
    fn rename(&self, path: &str, from: &str, to: &str, owner: Option<&str>)
        -> ViewStoreResult<View>;
}

/// Request body for `list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListViewsRequest {
    /// Namespace the views live under.
    pub path: String,
    /// Caller's owner scope, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Response body for `list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListViewsResponse {
    /// Views visible to the caller.
    pub views: Vec<View>,
}

/// Request body for `create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateViewRequest {
    /// Namespace the view lives under.
    pub path: String,
    /// Caller's owner scope, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// The view to create; any client-side id is ignored.
    pub view: View,
}

/// Request body for `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateViewRequest {
    /// Namespace the view lives under.
    pub path: String,
    /// Caller's owner scope, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Name of the view to update.
    pub name: String,
    /// Replacement filters.
    pub filters: FilterMap,
}

/// Request body for `delete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteViewRequest {
    /// Namespace the view lives under.
    pub path: String,
    /// Caller's owner scope, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Name of the view to delete.
    pub name: String,
}

/// Request body for `rename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameViewRequest {
    /// Namespace the view lives under.
    pub path: String,
    /// Caller's owner scope, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Current name.
    pub from: String,
    /// New name.
    pub to: String,
}

/// Response body carrying a single view (`create`, `update`, `rename`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewResponse {
    /// The affected view, as stored.
    pub view: View,
}

/// Response body for `delete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteViewResponse {
    /// Whether a view was removed.
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_absent_owner() {
        let request = ListViewsRequest {
            path: "/api/people".into(),
            owner: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("owner"));

        let decoded: ListViewsRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn create_request_roundtrip() {
        let request = CreateViewRequest {
            path: "/api/people".into(),
            owner: Some("u1".into()),
            view: View::new("Active", FilterMap::new()),
        };
        let json = serde_json::to_string(&request).unwrap();
        let decoded: CreateViewRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, request);
    }
}
