//! Resolved page results.

use serde::{Deserialize, Serialize};

/// One resolved page of items plus the pre-pagination total.
///
/// Replaced wholesale on each successful resolution; never persisted. This
/// is also the default wire shape a paginated list backend responds with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// The items on the requested page.
    pub items: Vec<T>,
    /// Total number of matching items across all pages.
    pub total: u64,
}

impl<T> PageResult<T> {
    /// Creates a page result.
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Creates an empty result with a total of zero.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wire_shape() {
        let decoded: PageResult<serde_json::Value> =
            serde_json::from_str(r#"{"items":[{"name":"Bob"}],"total":7}"#).unwrap();
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.total, 7);
    }

    #[test]
    fn empty_result() {
        let result: PageResult<u32> = PageResult::empty();
        assert!(result.items.is_empty());
        assert_eq!(result.total, 0);
    }
}
