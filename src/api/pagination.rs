// src/api/pagination.rs
//! Cursor-following listings as lazy streams.
//!
//! A batch is only requested once the previous one has been consumed, so a
//! listing never holds more than one batch in memory.

use super::types::PaginatedResponse;
use super::NotionRepository;
use crate::error::AppError;
use crate::model::{Block, Page, PageRecord};
use crate::types::NotionId;
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// Where the next batch of a listing starts.
enum Cursor {
    Start,
    Next(String),
    Exhausted,
}

/// Drives a cursor-paginated endpoint, yielding items as batches arrive.
///
/// `fetch` receives the cursor of the batch to request (`None` for the
/// first). The listing ends when a batch reports no more results, or reports
/// more without a cursor to continue from. A failed batch ends the stream
/// with that error.
pub fn paginate<'a, T, F, Fut>(fetch: F) -> impl Stream<Item = Result<T, AppError>> + 'a
where
    T: 'a,
    F: FnMut(Option<String>) -> Fut + 'a,
    Fut: Future<Output = Result<PaginatedResponse<T>, AppError>> + 'a,
{
    stream::try_unfold((Cursor::Start, fetch), |(cursor, mut fetch)| async move {
        let start = match cursor {
            Cursor::Exhausted => return Ok(None),
            Cursor::Start => None,
            Cursor::Next(cursor) => Some(cursor),
        };

        let batch = fetch(start).await?;
        let next = match (batch.has_more, batch.next_cursor) {
            (true, Some(cursor)) => Cursor::Next(cursor),
            (true, None) => {
                log::warn!("Listing reported more results without a cursor; stopping");
                Cursor::Exhausted
            }
            (false, _) => Cursor::Exhausted,
        };

        Ok::<_, AppError>(Some((batch.results, (next, fetch))))
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, AppError>)))
    .try_flatten()
}

/// Every page the integration can see, in search order.
pub fn search_pages<'a, R>(repo: &'a R) -> impl Stream<Item = Result<PageRecord, AppError>> + 'a
where
    R: NotionRepository + ?Sized,
{
    paginate(move |cursor| repo.search_pages(cursor))
}

/// All direct children of a block or page, driven to the end.
pub async fn list_children<R>(repo: &R, parent: &NotionId) -> Result<Vec<Block>, AppError>
where
    R: NotionRepository + ?Sized,
{
    paginate(move |cursor| repo.list_block_children(parent, cursor))
        .try_collect()
        .await
}

/// The readable child pages of `parent`, in listing order.
///
/// Each `child_page` block is resolved with its own retrieval. A child that
/// cannot be retrieved, or comes back restricted or archived, is logged and
/// left out; only a failure of the listing itself, or a rejected token, is
/// returned as an error.
pub async fn list_child_pages<R>(repo: &R, parent: &NotionId) -> Result<Vec<Page>, AppError>
where
    R: NotionRepository + ?Sized,
{
    let blocks = paginate(move |cursor| repo.list_block_children(parent, cursor));
    let mut blocks = std::pin::pin!(blocks);
    let mut pages = Vec::new();

    while let Some(block) = blocks.try_next().await? {
        if !block.is_child_page() {
            continue;
        }

        match repo.retrieve_page(&block.id).await {
            Ok(PageRecord::Full(page)) if page.archived => {
                log::debug!("Skipping archived child page {} of {}", page.id, parent);
            }
            Ok(PageRecord::Full(page)) => pages.push(page),
            Ok(PageRecord::Restricted { id }) => {
                log::warn!("Skipping child page {} of {}: not shared with the integration", id, parent);
            }
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => {
                log::warn!("Skipping child page {} of {}: {}", block.id, parent, e);
            }
        }
    }

    Ok(pages)
}
