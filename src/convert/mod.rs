// src/convert/mod.rs
//! Page content conversion: turns a page's block tree into Markdown.

mod render;

pub use render::{render_blocks, render_document};

use crate::api::{list_children, NotionRepository};
use crate::constants::BLOCK_MAX_RENDER_DEPTH;
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::NotionId;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

/// The ability to turn a page into document text.
///
/// The exporter treats the result as opaque text apart from scanning it for
/// image references.
#[async_trait::async_trait]
pub trait ContentConverter: Send + Sync {
    async fn convert(&self, page: &Page) -> Result<String, AppError>;
}

/// Fetches a page's blocks through the repository and renders them as Markdown.
pub struct MarkdownConverter {
    repo: Arc<dyn NotionRepository>,
}

impl MarkdownConverter {
    pub fn new(repo: Arc<dyn NotionRepository>) -> Self {
        Self { repo }
    }

    /// Fetches the children of `parent`, descending into blocks that carry
    /// their own inline content.
    fn fetch_tree<'a>(
        &'a self,
        parent: &'a NotionId,
        depth: usize,
    ) -> BoxFuture<'a, Result<Vec<Block>, AppError>> {
        async move {
            let mut blocks = list_children(self.repo.as_ref(), parent).await?;

            for block in blocks.iter_mut().filter(|b| b.owns_inline_children()) {
                if depth + 1 >= BLOCK_MAX_RENDER_DEPTH {
                    log::warn!(
                        "Block {} is nested deeper than {} levels; its children are not rendered",
                        block.id,
                        BLOCK_MAX_RENDER_DEPTH
                    );
                    continue;
                }
                let id = block.id.clone();
                block.children = self.fetch_tree(&id, depth + 1).await?;
            }

            Ok(blocks)
        }
        .boxed()
    }
}

#[async_trait::async_trait]
impl ContentConverter for MarkdownConverter {
    async fn convert(&self, page: &Page) -> Result<String, AppError> {
        let blocks = self.fetch_tree(&page.id, 0).await?;
        log::debug!("Fetched {} top-level blocks for page {}", blocks.len(), page.id);
        Ok(render_document(&blocks))
    }
}
