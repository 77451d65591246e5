// tests/common/mod.rs
//! Shared fixtures: an in-memory workspace and helpers for reading export trees.

#![allow(dead_code)]

use async_trait::async_trait;
use notion2markdown::{
    AppError, Block, BlockKind, FileSource, MediaDownloader, MediaHost, MediaRehoster,
    NotionErrorCode, NotionId, NotionRepository, Page, PageRecord, PaginatedResponse, RichText,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Listings are served in batches this small so every walk crosses a cursor.
const BATCH_SIZE: usize = 2;

static NEXT_BLOCK: AtomicU32 = AtomicU32::new(0x00b1_0000);

pub fn id(n: u32) -> NotionId {
    NotionId::parse(&format!("{:032x}", n)).expect("test id should be valid")
}

fn next_block_id() -> NotionId {
    id(NEXT_BLOCK.fetch_add(1, Ordering::Relaxed))
}

pub fn paragraph(text: &str) -> Block {
    Block::new(
        next_block_id(),
        BlockKind::Paragraph {
            text: RichText::plain(text),
        },
    )
}

pub fn image(url: &str) -> Block {
    Block::new(
        next_block_id(),
        BlockKind::Image {
            source: FileSource::External {
                url: url.to_string(),
            },
            caption: RichText::default(),
        },
    )
}

/// A child page block. Notion gives it the id of the page it stands for.
pub fn child_page(page: &NotionId, title: &str) -> Block {
    Block::new(
        page.clone(),
        BlockKind::ChildPage {
            title: title.to_string(),
        },
    )
}

#[derive(Debug, Clone)]
enum Entry {
    Page { title: String, archived: bool },
    Restricted,
    RejectedToken,
}

/// A workspace held in memory, listing in small batches.
#[derive(Default)]
pub struct FakeWorkspace {
    pages: HashMap<NotionId, Entry>,
    children: HashMap<NotionId, Vec<Block>>,
    broken_listings: HashSet<NotionId>,
    search_order: Vec<NotionId>,
    retrievals: Mutex<Vec<NotionId>>,
}

impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: &NotionId, title: &str, blocks: Vec<Block>) -> Self {
        self.pages.insert(
            page.clone(),
            Entry::Page {
                title: title.to_string(),
                archived: false,
            },
        );
        self.children.insert(page.clone(), blocks);
        self
    }

    pub fn archived(mut self, page: &NotionId, title: &str) -> Self {
        self.pages.insert(
            page.clone(),
            Entry::Page {
                title: title.to_string(),
                archived: true,
            },
        );
        self
    }

    /// A page the integration can see referenced but not read.
    pub fn restricted(mut self, page: &NotionId) -> Self {
        self.pages.insert(page.clone(), Entry::Restricted);
        self
    }

    /// Retrieving this page answers 401, as Notion does for a revoked token.
    pub fn rejects_token_at(mut self, page: &NotionId) -> Self {
        self.pages.insert(page.clone(), Entry::RejectedToken);
        self
    }

    /// Listing this page's blocks fails.
    pub fn broken_listing(mut self, page: &NotionId) -> Self {
        self.broken_listings.insert(page.clone());
        self
    }

    pub fn searchable(mut self, pages: &[&NotionId]) -> Self {
        self.search_order = pages.iter().map(|p| (*p).clone()).collect();
        self
    }

    /// How many times `page` was retrieved.
    pub fn retrievals_of(&self, page: &NotionId) -> usize {
        self.retrievals
            .lock()
            .unwrap()
            .iter()
            .filter(|seen| *seen == page)
            .count()
    }

    fn record(&self, page: &NotionId) -> Result<PageRecord, AppError> {
        match self.pages.get(page) {
            Some(Entry::Page { title, archived }) => {
                let mut full = Page::new(page.clone(), title.as_str());
                full.archived = *archived;
                Ok(PageRecord::Full(full))
            }
            Some(Entry::Restricted) => Ok(PageRecord::Restricted { id: page.clone() }),
            Some(Entry::RejectedToken) => Err(AppError::NotionService {
                code: NotionErrorCode::Unauthorized,
                message: "API token is invalid.".to_string(),
                status: reqwest::StatusCode::UNAUTHORIZED,
            }),
            None => Err(AppError::NotionService {
                code: NotionErrorCode::ObjectNotFound,
                message: format!("Could not find page with ID: {}", page),
                status: reqwest::StatusCode::NOT_FOUND,
            }),
        }
    }
}

fn batch<T: Clone>(items: &[T], cursor: Option<String>) -> PaginatedResponse<T> {
    let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
    let end = (start + BATCH_SIZE).min(items.len());
    let results = items[start.min(end)..end].to_vec();
    if end < items.len() {
        PaginatedResponse::more(results, end.to_string())
    } else {
        PaginatedResponse::last(results)
    }
}

#[async_trait]
impl NotionRepository for FakeWorkspace {
    async fn search_pages(
        &self,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<PageRecord>, AppError> {
        let records = self
            .search_order
            .iter()
            .map(|page| self.record(page))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(batch(&records, cursor))
    }

    async fn retrieve_page(&self, page: &NotionId) -> Result<PageRecord, AppError> {
        self.retrievals.lock().unwrap().push(page.clone());
        self.record(page)
    }

    async fn list_block_children(
        &self,
        parent: &NotionId,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        if self.broken_listings.contains(parent) {
            return Err(AppError::NotionService {
                code: NotionErrorCode::ValidationFailed,
                message: "listing rejected".to_string(),
                status: reqwest::StatusCode::BAD_REQUEST,
            });
        }
        let blocks = self.children.get(parent).cloned().unwrap_or_default();
        Ok(batch(&blocks, cursor))
    }
}

/// A rehoster that mirrors images from local mock servers only.
pub fn local_rehoster() -> MediaRehoster {
    MediaRehoster::new(
        MediaDownloader::new(Duration::from_secs(5)).unwrap(),
        vec![MediaHost::new("127.0.0.1").unwrap()],
    )
}

/// Every file under `root`, keyed by its path relative to `root`.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    collect(root, root, &mut files);
    files
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path.strip_prefix(root).unwrap().to_path_buf();
            files.insert(relative, std::fs::read(&path).unwrap());
        }
    }
}

pub fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}
