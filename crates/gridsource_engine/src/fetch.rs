//! Fetch abstraction for the remote resolver.
//!
//! The actual network call is delegated to an injectable collaborator so
//! different HTTP stacks (reqwest, hyper, a browser bridge) plug in without
//! the engine knowing about any of them.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// One outbound request. GET-equivalent; the query state is fully encoded
/// in the URL and there is no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Fully constructed request URL.
    pub url: String,
}

impl FetchRequest {
    /// Creates a request for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Discriminated outcome of a fetch attempt.
///
/// Cancellation is a first-class variant rather than an error dressed up
/// with an abort marker, so callers never sniff error strings to tell a
/// failed request from an intentionally abandoned one.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The backend responded; the payload is the parsed JSON body.
    Ok(serde_json::Value),
    /// The request was abandoned (client-side abort).
    Cancelled,
    /// The request failed in transport or the body was not JSON.
    Failed(String),
}

/// Boxed fetch future, keeping [`Fetcher`] object-safe.
pub type BoxFetch = Pin<Box<dyn Future<Output = FetchOutcome> + Send>>;

/// A fetch collaborator issues one HTTP request and classifies the result.
pub trait Fetcher: Send + Sync {
    /// Issues the request. Implementations should resolve to
    /// [`FetchOutcome::Cancelled`] when their own transport aborts, and
    /// must not panic on transport failure.
    fn fetch(&self, request: FetchRequest) -> BoxFetch;
}

/// A scripted fetcher for tests.
///
/// Responses are consumed in order; each carries an artificial latency so
/// tests can interleave completions with state mutations. When the script
/// runs dry an empty page is returned immediately.
#[derive(Default)]
pub struct MockFetcher {
    script: Mutex<VecDeque<(Duration, FetchOutcome)>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Creates a fetcher with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an immediate response to the script.
    pub fn push_response(&self, outcome: FetchOutcome) {
        self.push_delayed(Duration::ZERO, outcome);
    }

    /// Appends a response that resolves after `latency`.
    pub fn push_delayed(&self, latency: Duration, outcome: FetchOutcome) {
        self.script.lock().push_back((latency, outcome));
    }

    /// URLs of every request issued so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Number of requests issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, request: FetchRequest) -> BoxFetch {
        self.requests.lock().push(request.url);
        let scripted = self.script.lock().pop_front();
        Box::pin(async move {
            match scripted {
                Some((latency, outcome)) => {
                    if !latency.is_zero() {
                        tokio::time::sleep(latency).await;
                    }
                    outcome
                }
                None => FetchOutcome::Ok(serde_json::json!({ "items": [], "total": 0 })),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn scripted_responses_in_order() {
        let fetcher = MockFetcher::new();
        fetcher.push_response(FetchOutcome::Ok(json!({ "items": [1], "total": 1 })));
        fetcher.push_response(FetchOutcome::Failed("boom".into()));

        let first = fetcher.fetch(FetchRequest::new("/a")).await;
        let second = fetcher.fetch(FetchRequest::new("/b")).await;

        assert!(matches!(first, FetchOutcome::Ok(_)));
        assert_eq!(second, FetchOutcome::Failed("boom".into()));
        assert_eq!(fetcher.requests(), vec!["/a".to_string(), "/b".to_string()]);
    }

    #[tokio::test]
    async fn dry_script_returns_empty_page() {
        let fetcher = MockFetcher::new();
        let outcome = fetcher.fetch(FetchRequest::new("/a")).await;
        assert_eq!(
            outcome,
            FetchOutcome::Ok(json!({ "items": [], "total": 0 }))
        );
    }
}
