// src/api/mod.rs
//! Notion API interaction: the ability to retrieve content from a workspace.
//!
//! This module provides a data-oriented interface to the Notion API,
//! with clear separation between I/O operations, parsing, and business logic.

pub mod client;
pub mod notion_client_adapter;
mod pagination;
pub mod parser;
mod types;

use crate::error::AppError;
use crate::model::{Block, PageRecord};
use crate::types::NotionId;

/// The ability to retrieve content from a Notion workspace.
///
/// Business logic depends on this trait, never on HTTP details. Listing
/// operations return one batch per call; [`paginate`] drives them to the end.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// One batch of the workspace-wide page search.
    async fn search_pages(
        &self,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<PageRecord>, AppError>;

    /// Retrieves a single page, full or restricted.
    async fn retrieve_page(&self, id: &NotionId) -> Result<PageRecord, AppError>;

    /// One batch of a block's direct children.
    async fn list_block_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError>;
}

// Re-export the public interface
pub use client::NotionHttpClient;
pub use pagination::{list_child_pages, list_children, paginate, search_pages};
pub use types::PaginatedResponse;
