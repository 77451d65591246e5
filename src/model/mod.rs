//! Domain model: the parts of a Notion workspace an export cares about.
//!
//! API payloads are converted into these types by `api::notion_client_adapter`;
//! nothing downstream of the API layer sees raw JSON.

mod block;
mod rich_text;

pub use block::{Block, BlockKind, FileSource};
pub use rich_text::{Annotations, RichText, RichTextRun};

use crate::constants::FALLBACK_TITLE;
use crate::types::NotionId;
use serde::{Deserialize, Serialize};

/// A fully retrieved Notion page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: NotionId,
    pub title: PageTitle,
    pub url: String,
    pub archived: bool,
}

impl Page {
    pub fn new(id: NotionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: PageTitle::new(title),
            url: String::new(),
            archived: false,
        }
    }

    /// Get the page title
    pub fn title(&self) -> &PageTitle {
        &self.title
    }
}

/// What a page retrieval produced.
///
/// Notion answers with a partial object (an id and nothing else) for pages the
/// integration can see referenced but may not read.
#[derive(Debug, Clone, PartialEq)]
pub enum PageRecord {
    Full(Page),
    Restricted { id: NotionId },
}

impl PageRecord {
    pub fn id(&self) -> &NotionId {
        match self {
            PageRecord::Full(page) => &page.id,
            PageRecord::Restricted { id } => id,
        }
    }

    pub fn into_page(self) -> Option<Page> {
        match self {
            PageRecord::Full(page) => Some(page),
            PageRecord::Restricted { .. } => None,
        }
    }
}

/// A page as seen by the tree exporter during one visit.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
    pub id: NotionId,
    pub title: PageTitle,
    pub has_children: bool,
}

impl PageNode {
    pub fn new(page: &Page, has_children: bool) -> Self {
        Self {
            id: page.id.clone(),
            title: page.title.clone(),
            has_children,
        }
    }
}

/// Page title. Never empty: a missing or blank title reads as "Untitled".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTitle(String);

impl PageTitle {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        if title.is_empty() {
            Self(FALLBACK_TITLE.to_string())
        } else {
            Self(title)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PageTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
