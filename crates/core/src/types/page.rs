//! Paged response envelope.

use serde::{Deserialize, Serialize};

/// A page of results as returned by the core application backend.
///
/// Mirrors the Spring-style page shape: the element list plus totals and the
/// zero-based page number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Elements on this page.
    pub content: Vec<T>,
    /// Total number of elements across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Zero-based index of this page.
    pub number: u32,
    /// Requested page size.
    pub size: u32,
}

impl<T> Page<T> {
    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "content": ["a", "b"],
            "totalElements": 12,
            "totalPages": 2,
            "number": 0,
            "size": 10
        }"#;

        let page: Page<String> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements, 12);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page: Page<u32> = Page {
            content: vec![1],
            total_elements: 11,
            total_pages: 2,
            number: 1,
            size: 10,
        };
        assert!(!page.has_next());
        assert!(page.has_previous());
    }
}
