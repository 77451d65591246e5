// src/api/types.rs
//! Type definitions for the Notion API module.

use serde::{Deserialize, Serialize};

/// One batch of a cursor-paginated Notion listing.
///
/// `next_cursor` is only meaningful while `has_more` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// A final batch: nothing remains after it.
    pub fn last(results: Vec<T>) -> Self {
        Self {
            results,
            next_cursor: None,
            has_more: false,
        }
    }

    /// A batch followed by more, fetched with `cursor`.
    pub fn more(results: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            results,
            next_cursor: Some(cursor.into()),
            has_more: true,
        }
    }
}

/// Raw listing envelope, before its items are converted.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawListing {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Body of a workspace search request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchRequest {
    pub filter: SearchFilter,
    pub page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchFilter {
    pub property: &'static str,
    pub value: &'static str,
}

impl SearchRequest {
    pub fn pages(page_size: usize, start_cursor: Option<String>) -> Self {
        Self {
            filter: SearchFilter {
                property: "object",
                value: "page",
            },
            page_size,
            start_cursor,
        }
    }
}
