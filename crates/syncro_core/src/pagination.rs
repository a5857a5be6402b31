//! Page-based pagination types.

use crate::QueryParams;
use serde::{Deserialize, Serialize};

/// Pagination metadata from the `meta` object of a list response.
///
/// Fields the server leaves out default to zero, so a `meta` object without
/// `total_pages` ends a traversal after the current page.
///
/// # Examples
///
/// ```
/// use syncro_core::PaginationMeta;
///
/// let meta: PaginationMeta = serde_json::from_str(
///     r#"{"total_pages": 3, "total_entries": 70, "per_page": 25, "page": 1}"#,
/// ).unwrap();
/// assert_eq!(*meta.total_pages(), 3);
/// assert!(meta.has_next_page());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct PaginationMeta {
    /// Total number of pages
    #[serde(default)]
    total_pages: u32,
    /// Total number of entries across all pages
    #[serde(default)]
    total_entries: u64,
    /// Results per page
    #[serde(default)]
    per_page: u32,
    /// Current page number (1-indexed)
    #[serde(default)]
    page: u32,
}

impl PaginationMeta {
    /// Create metadata from its parts.
    pub fn new(total_pages: u32, total_entries: u64, per_page: u32, page: u32) -> Self {
        Self {
            total_pages,
            total_entries,
            per_page,
            page,
        }
    }

    /// Whether the server reports a page after this one.
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Page selection for a list request.
///
/// # Examples
///
/// ```
/// use syncro_core::PaginationParams;
///
/// let params = PaginationParams::default().with_page(2u32).with_per_page(50u32);
/// let query = params.to_query();
/// assert_eq!(query.get("page"), Some("2"));
/// assert_eq!(query.get("per_page"), Some("50"));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_", strip_option, into)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    /// Results per page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    per_page: Option<u32>,
}

impl PaginationParams {
    /// Page to start from; the API counts from 1.
    pub fn start_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Query parameters for the set fields only.
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("page", self.page);
        query.push_opt("per_page", self.per_page);
        query
    }
}
