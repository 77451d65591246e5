// src/exporter/mod.rs
//! Tree export: mirrors a page hierarchy into nested directories.
//!
//! A visit goes through retrieval, child listing, conversion, image
//! rehosting and writing, then recurses into the children in listing order.
//! Whatever goes wrong inside one visit is logged against that page and the
//! rest of the tree carries on, unless Notion rejected the token: then the
//! run stops and the error reaches the caller.

mod navigation;
mod run;

pub use navigation::append_navigation;
pub use run::{ExportRun, ExportStats};

use crate::api::{list_child_pages, search_pages, NotionRepository};
use crate::constants::DEFAULT_MAX_TREE_DEPTH;
use crate::convert::ContentConverter;
use crate::error::AppError;
use crate::media::MediaRehoster;
use crate::model::{Page, PageNode, PageRecord};
use crate::output::{ensure_directory, write_document, ExportTarget};
use crate::types::NotionId;
use futures::future::{BoxFuture, FutureExt};
use futures::TryStreamExt;
use std::path::Path;
use std::sync::Arc;

/// How a single page visit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The identity was visited earlier in this run.
    AlreadyProcessed,
    /// Restricted or archived; nothing was written.
    Skipped,
    Written,
    Failed,
    /// The run was stopped before this page was visited.
    Aborted,
}

/// Walks the page tree and writes one Markdown file per page.
pub struct TreeExporter {
    repo: Arc<dyn NotionRepository>,
    converter: Arc<dyn ContentConverter>,
    rehoster: MediaRehoster,
    root_page: Option<NotionId>,
    max_depth: usize,
}

impl TreeExporter {
    pub fn new(
        repo: Arc<dyn NotionRepository>,
        converter: Arc<dyn ContentConverter>,
        rehoster: MediaRehoster,
    ) -> Self {
        Self {
            repo,
            converter,
            rehoster,
            root_page: None,
            max_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }

    /// Export only this page and its descendants instead of the whole workspace.
    pub fn with_root_page(mut self, root_page: Option<NotionId>) -> Self {
        self.root_page = root_page;
        self
    }

    /// Deepest nesting level visited; the root pages are level 0.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Exports the configured root page, or every page the integration can see.
    ///
    /// Only a failure to create the output root, to list the workspace, or
    /// a rejected token is returned; per-page failures are counted in the stats.
    pub async fn export_all(&self, output_root: &Path) -> Result<ExportStats, AppError> {
        ensure_directory(output_root)?;
        let run = ExportRun::new();

        match &self.root_page {
            Some(root) => {
                log::info!("Exporting page tree rooted at {}", root);
                self.export_page(&run, root, output_root, 0).await;
            }
            None => {
                log::info!("Exporting every page shared with the integration");
                let pages = search_pages(self.repo.as_ref());
                let mut pages = std::pin::pin!(pages);
                while let Some(record) = pages.try_next().await? {
                    if self.export_page(&run, record.id(), output_root, 0).await
                        == PageOutcome::Aborted
                    {
                        break;
                    }
                }
            }
        }

        match run.take_abort() {
            Some(e) => Err(e),
            None => Ok(run.stats()),
        }
    }

    /// Exports one page into `parent_dir`, then its children beneath it.
    ///
    /// Never fails: the outcome says what happened, and errors are logged
    /// with the page identity. A rejected token aborts `run` instead of
    /// counting as a failure. `depth` is the nesting level of this page.
    pub fn export_page<'a>(
        &'a self,
        run: &'a ExportRun,
        id: &'a NotionId,
        parent_dir: &'a Path,
        depth: usize,
    ) -> BoxFuture<'a, PageOutcome> {
        async move {
            if run.is_aborted() {
                return PageOutcome::Aborted;
            }
            if !run.mark_processed(id) {
                log::debug!("Page {} already processed in this run", id);
                return PageOutcome::AlreadyProcessed;
            }

            match self.visit(run, id, parent_dir, depth).await {
                Ok(outcome) => outcome,
                Err(e) if e.is_unauthorized() => {
                    log::error!("Notion rejected the integration token at page {}: {}", id, e);
                    run.abort_with(e);
                    PageOutcome::Aborted
                }
                Err(e) => {
                    log::error!("Failed to export page {}: {}", id, e);
                    run.record_failed();
                    PageOutcome::Failed
                }
            }
        }
        .boxed()
    }

    async fn visit(
        &self,
        run: &ExportRun,
        id: &NotionId,
        parent_dir: &Path,
        depth: usize,
    ) -> Result<PageOutcome, AppError> {
        if depth > self.max_depth {
            return Err(AppError::RecursionLimitExceeded(self.max_depth));
        }

        let Some(page) = self.retrieve_readable(id).await? else {
            run.record_skipped();
            return Ok(PageOutcome::Skipped);
        };
        log::info!("Exporting '{}' ({})", page.title(), page.id);

        // Children decide the navigation section, so they are listed first.
        let children = list_child_pages(self.repo.as_ref(), &page.id).await?;
        let node = PageNode::new(&page, !children.is_empty());

        let content = self.converter.convert(&page).await?;

        // Images live next to the page's file, not inside its child directory.
        let rehosted = self.rehoster.rehost(&content, parent_dir).await;
        run.record_images(rehosted.rehosted, rehosted.failed);
        for image in &rehosted.saved {
            run.record_media(image);
        }

        let target = ExportTarget::new(parent_dir, node.title.as_str());
        let mut document = rehosted.text;
        if node.has_children {
            append_navigation(&mut document, &target, &children);
        }

        let path = target.document_path();
        write_document(&path, &document)?;
        run.record_written(&path);

        if node.has_children {
            let child_dir = target.child_dir();
            ensure_directory(&child_dir)?;
            for child in &children {
                if self.export_page(run, &child.id, &child_dir, depth + 1).await
                    == PageOutcome::Aborted
                {
                    break;
                }
            }
        }

        Ok(PageOutcome::Written)
    }

    /// The full page, or `None` when it must be left out of the export.
    async fn retrieve_readable(&self, id: &NotionId) -> Result<Option<Page>, AppError> {
        match self.repo.retrieve_page(id).await {
            Ok(PageRecord::Full(page)) if page.archived => {
                log::info!("Skipping archived page {}", id);
                Ok(None)
            }
            Ok(PageRecord::Full(page)) => Ok(Some(page)),
            Ok(PageRecord::Restricted { .. }) => {
                log::warn!("Skipping page {}: not shared with the integration", id);
                Ok(None)
            }
            Err(e) if e.is_restricted() => {
                log::warn!("Skipping page {}: {}", id, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
