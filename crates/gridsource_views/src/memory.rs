//! In-memory view store.

use crate::error::{ViewStoreError, ViewStoreResult};
use crate::store::ViewStore;
use gridsource_state::{FilterMap, View};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

struct StoredView {
    owner: Option<String>,
    view: View,
}

impl StoredView {
    /// A view with no owner is shared; an owned view is visible only to
    /// its owner.
    fn visible_to(&self, owner: Option<&str>) -> bool {
        match &self.owner {
            None => true,
            Some(view_owner) => owner == Some(view_owner.as_str()),
        }
    }

    /// Mutations resolve against the caller's exact scope, never across it:
    /// an owned caller cannot modify a shared view and vice versa.
    fn in_scope(&self, owner: Option<&str>) -> bool {
        self.owner.as_deref() == owner
    }
}

/// A view store held entirely in memory.
///
/// The reference implementation of the ownership rule, and the store used
/// in tests and single-process hosts.
#[derive(Default)]
pub struct MemoryViewStore {
    namespaces: RwLock<HashMap<String, Vec<StoredView>>>,
    next_id: AtomicU64,
}

impl MemoryViewStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored views across all namespaces and scopes.
    pub fn view_count(&self) -> usize {
        self.namespaces.read().values().map(Vec::len).sum()
    }

    fn assign_id(&self) -> String {
        format!("v{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl ViewStore for MemoryViewStore {
    fn list(&self, path: &str, owner: Option<&str>) -> ViewStoreResult<Vec<View>> {
        let namespaces = self.namespaces.read();
        let views = namespaces
            .get(path)
            .map(|stored| {
                stored
                    .iter()
                    .filter(|entry| entry.visible_to(owner))
                    .map(|entry| entry.view.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(views)
    }

    fn create(&self, path: &str, view: &View, owner: Option<&str>) -> ViewStoreResult<View> {
        let mut namespaces = self.namespaces.write();
        let stored = namespaces.entry(path.to_string()).or_default();

        // Names are unique within the caller's visible scope, so a user
        // cannot shadow a shared view with an owned one of the same name.
        if stored
            .iter()
            .any(|entry| entry.visible_to(owner) && entry.view.name == view.name)
        {
            return Err(ViewStoreError::DuplicateName(view.name.clone()));
        }

        let view = View::new(view.name.clone(), view.filters.clone()).with_id(self.assign_id());
        stored.push(StoredView {
            owner: owner.map(str::to_string),
            view: view.clone(),
        });
        Ok(view)
    }

    fn update(
        &self,
        path: &str,
        name: &str,
        filters: &FilterMap,
        owner: Option<&str>,
    ) -> ViewStoreResult<View> {
        let mut namespaces = self.namespaces.write();
        let stored = namespaces
            .get_mut(path)
            .ok_or_else(|| ViewStoreError::NotFound(name.to_string()))?;
        let entry = stored
            .iter_mut()
            .find(|entry| entry.in_scope(owner) && entry.view.name == name)
            .ok_or_else(|| ViewStoreError::NotFound(name.to_string()))?;

        entry.view.filters = filters.clone();
        Ok(entry.view.clone())
    }

    fn delete(&self, path: &str, name: &str, owner: Option<&str>) -> ViewStoreResult<()> {
        let mut namespaces = self.namespaces.write();
        let stored = namespaces
            .get_mut(path)
            .ok_or_else(|| ViewStoreError::NotFound(name.to_string()))?;
        let before = stored.len();
        stored.retain(|entry| !(entry.in_scope(owner) && entry.view.name == name));
        if stored.len() == before {
            return Err(ViewStoreError::NotFound(name.to_string()));
        }
        Ok(())
    }

    fn rename(
        &self,
        path: &str,
        from: &str,
        to: &str,
        owner: Option<&str>,
    ) -> ViewStoreResult<View> {
        let mut namespaces = self.namespaces.write();
        let stored = namespaces
            .get_mut(path)
            .ok_or_else(|| ViewStoreError::NotFound(from.to_string()))?;

        if stored
            .iter()
            .any(|entry| entry.visible_to(owner) && entry.view.name == to)
        {
            return Err(ViewStoreError::DuplicateName(to.to_string()));
        }

        let entry = stored
            .iter_mut()
            .find(|entry| entry.in_scope(owner) && entry.view.name == from)
            .ok_or_else(|| ViewStoreError::NotFound(from.to_string()))?;
        entry.view.name = to.to_string();
        Ok(entry.view.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsource_state::FilterValue;

    const PATH: &str = "/api/people/views";

    fn active_filters() -> FilterMap {
        let mut filters = FilterMap::new();
        filters.insert("status".into(), FilterValue::from("active"));
        filters
    }

    #[test]
    fn shared_views_are_visible_to_everyone() {
        let store = MemoryViewStore::new();
        store
            .create(PATH, &View::new("Active", active_filters()), None)
            .unwrap();

        assert_eq!(store.list(PATH, None).unwrap().len(), 1);
        assert_eq!(store.list(PATH, Some("u1")).unwrap().len(), 1);
        assert_eq!(store.list(PATH, Some("u2")).unwrap().len(), 1);
    }

    #[test]
    fn owned_views_are_visible_only_to_their_owner() {
        let store = MemoryViewStore::new();
        store
            .create(PATH, &View::new("Mine", active_filters()), Some("u1"))
            .unwrap();

        assert_eq!(store.list(PATH, Some("u1")).unwrap().len(), 1);
        assert!(store.list(PATH, Some("u2")).unwrap().is_empty());
        assert!(store.list(PATH, None).unwrap().is_empty());
    }

    #[test]
    fn list_merges_shared_and_owned() {
        let store = MemoryViewStore::new();
        store
            .create(PATH, &View::new("Everyone", FilterMap::new()), None)
            .unwrap();
        store
            .create(PATH, &View::new("Mine", FilterMap::new()), Some("u1"))
            .unwrap();

        let names: Vec<String> = store
            .list(PATH, Some("u1"))
            .unwrap()
            .into_iter()
            .map(|view| view.name)
            .collect();
        assert_eq!(names, vec!["Everyone".to_string(), "Mine".to_string()]);
    }

    #[test]
    fn duplicate_names_rejected_within_scope() {
        let store = MemoryViewStore::new();
        store
            .create(PATH, &View::new("Active", FilterMap::new()), None)
            .unwrap();

        // Same name owned by u1 would shadow the shared view.
        let result = store.create(PATH, &View::new("Active", FilterMap::new()), Some("u1"));
        assert!(matches!(result, Err(ViewStoreError::DuplicateName(_))));

        // A different owner's scope is unaffected by u2's private names.
        store
            .create(PATH, &View::new("Private", FilterMap::new()), Some("u2"))
            .unwrap();
        store
            .create(PATH, &View::new("Private", FilterMap::new()), Some("u1"))
            .unwrap();
    }

    #[test]
    fn create_assigns_ids() {
        let store = MemoryViewStore::new();
        let first = store
            .create(PATH, &View::new("A", FilterMap::new()), None)
            .unwrap();
        let second = store
            .create(PATH, &View::new("B", FilterMap::new()), None)
            .unwrap();
        assert!(first.id.is_some());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn update_replaces_filters_in_scope_only() {
        let store = MemoryViewStore::new();
        store
            .create(PATH, &View::new("Active", FilterMap::new()), Some("u1"))
            .unwrap();

        let updated = store
            .update(PATH, "Active", &active_filters(), Some("u1"))
            .unwrap();
        assert_eq!(updated.filters, active_filters());

        // Another caller cannot reach into u1's scope.
        let result = store.update(PATH, "Active", &FilterMap::new(), Some("u2"));
        assert!(matches!(result, Err(ViewStoreError::NotFound(_))));
    }

    #[test]
    fn delete_and_rename_respect_scope() {
        let store = MemoryViewStore::new();
        store
            .create(PATH, &View::new("Shared", FilterMap::new()), None)
            .unwrap();
        store
            .create(PATH, &View::new("Mine", FilterMap::new()), Some("u1"))
            .unwrap();

        // An owned caller cannot delete the shared view.
        let result = store.delete(PATH, "Shared", Some("u1"));
        assert!(matches!(result, Err(ViewStoreError::NotFound(_))));

        let renamed = store.rename(PATH, "Mine", "Ours", Some("u1")).unwrap();
        assert_eq!(renamed.name, "Ours");

        // Renaming onto a visible name is rejected.
        let result = store.rename(PATH, "Ours", "Shared", Some("u1"));
        assert!(matches!(result, Err(ViewStoreError::DuplicateName(_))));

        store.delete(PATH, "Ours", Some("u1")).unwrap();
        assert_eq!(store.view_count(), 1);
    }

    #[test]
    fn namespaces_are_isolated() {
        let store = MemoryViewStore::new();
        store
            .create("/api/people/views", &View::new("A", FilterMap::new()), None)
            .unwrap();
        store
            .create("/api/orders/views", &View::new("A", FilterMap::new()), None)
            .unwrap();

        assert_eq!(store.list("/api/people/views", None).unwrap().len(), 1);
        assert_eq!(store.list("/api/orders/views", None).unwrap().len(), 1);
    }
}
