//! HTTP-backed view store.
//!
//! The actual HTTP client is abstracted via a trait so different stacks
//! (reqwest, hyper, a browser bridge) plug in without this crate knowing
//! about any of them. Bodies are JSON.

use crate::error::{ViewStoreError, ViewStoreResult};
use crate::store::{
    CreateViewRequest, DeleteViewRequest, DeleteViewResponse, ListViewsRequest, ListViewsResponse,
    RenameViewRequest, UpdateViewRequest, ViewResponse, ViewStore,
};
use gridsource_state::{FilterMap, View};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual transport.
pub trait HttpClient: Send + Sync {
    /// Sends a POST request and returns the response body.
    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, String>;

    /// Checks if the client is connected/healthy.
    fn is_healthy(&self) -> bool;
}

/// A view store backed by an HTTP endpoint.
///
/// Operations POST JSON to `{base}{path}/{op}` routes. A transport failure
/// marks the store disconnected and records the error; a later successful
/// call is prevented until [`HttpViewStore::reconnect`].
pub struct HttpViewStore<C: HttpClient> {
    base_url: String,
    client: C,
    connected: AtomicBool,
    last_error: RwLock<Option<String>>,
}

impl<C: HttpClient> HttpViewStore<C> {
    /// Creates a store rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            connected: AtomicBool::new(true),
            last_error: RwLock::new(None),
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the last transport error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// True while the store considers itself connected.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && self.client.is_healthy()
    }

    /// Clears the disconnected flag after a transport failure.
    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
        *self.last_error.write() = None;
    }

    fn post_json<Req, Res>(&self, path: &str, op: &str, request: &Req) -> ViewStoreResult<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        if !self.is_connected() {
            return Err(ViewStoreError::NotConnected);
        }

        let body = serde_json::to_vec(request)
            .map_err(|err| ViewStoreError::protocol(format!("failed to encode request: {err}")))?;

        let url = format!("{}{}/{}", self.base_url, path, op);
        let response = self.client.post(&url, body).map_err(|err| {
            *self.last_error.write() = Some(err.clone());
            self.connected.store(false, Ordering::SeqCst);
            ViewStoreError::transport(err)
        })?;

        *self.last_error.write() = None;

        serde_json::from_slice(&response)
            .map_err(|err| ViewStoreError::protocol(format!("failed to decode response: {err}")))
    }
}

impl<C: HttpClient> ViewStore for HttpViewStore<C> {
    fn list(&self, path: &str, owner: Option<&str>) -> ViewStoreResult<Vec<View>> {
        let request = ListViewsRequest {
            path: path.to_string(),
            owner: owner.map(str::to_string),
        };
        let response: ListViewsResponse = self.post_json(path, "list", &request)?;
        Ok(response.views)
    }

    fn create(&self, path: &str, view: &View, owner: Option<&str>) -> ViewStoreResult<View> {
        let request = CreateViewRequest {
            path: path.to_string(),
            owner: owner.map(str::to_string),
            view: view.clone(),
        };
        let response: ViewResponse = self.post_json(path, "create", &request)?;
        Ok(response.view)
    }

    fn update(
        &self,
        path: &str,
        name: &str,
        filters: &FilterMap,
        owner: Option<&str>,
    ) -> ViewStoreResult<View> {
        let request = UpdateViewRequest {
            path: path.to_string(),
            owner: owner.map(str::to_string),
            name: name.to_string(),
            filters: filters.clone(),
        };
        let response: ViewResponse = self.post_json(path, "update", &request)?;
        Ok(response.view)
    }

    fn delete(&self, path: &str, name: &str, owner: Option<&str>) -> ViewStoreResult<()> {
        let request = DeleteViewRequest {
            path: path.to_string(),
            owner: owner.map(str::to_string),
            name: name.to_string(),
        };
        let response: DeleteViewResponse = self.post_json(path, "delete", &request)?;
        if response.deleted {
            Ok(())
        } else {
            Err(ViewStoreError::NotFound(name.to_string()))
        }
    }

    fn rename(
        &self,
        path: &str,
        from: &str,
        to: &str,
        owner: Option<&str>,
    ) -> ViewStoreResult<View> {
        let request = RenameViewRequest {
            path: path.to_string(),
            owner: owner.map(str::to_string),
            from: from.to_string(),
            to: to.to_string(),
        };
        let response: ViewResponse = self.post_json(path, "rename", &request)?;
        Ok(response.view)
    }
}
