// src/lib.rs
//! notion2markdown library: mirrors a Notion page tree into a directory of
//! Markdown files with locally rehosted images.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `ExportConfig`
//! - **Domain model**: `Page`, `PageRecord`, `PageNode`, `Block`, `RichText`
//! - **API client**: `NotionRepository`, `NotionHttpClient`, pagination helpers
//! - **Conversion**: `ContentConverter`, `MarkdownConverter`
//! - **Export**: `TreeExporter`, `MediaRehoster`, `ExportDriver`, name sanitizing

pub mod api;
pub mod config;
pub mod constants;
pub mod convert;
mod error;
pub mod error_recovery;
pub mod exporter;
pub mod media;
pub mod model;
pub mod output;
pub mod pipeline;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionClientError, NotionErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ExportConfig};

// --- Domain Model ---
pub use crate::model::{
    Annotations, Block, BlockKind, FileSource, Page, PageNode, PageRecord, PageTitle, RichText,
    RichTextRun,
};

// --- Domain Types ---
pub use crate::types::{ApiKey, MediaHost, NotionId};

// --- API Client ---
pub use crate::api::{
    list_child_pages, list_children, paginate, search_pages, NotionHttpClient, NotionRepository,
    PaginatedResponse,
};

// --- Conversion ---
pub use crate::convert::{render_blocks, render_document, ContentConverter, MarkdownConverter};

// --- Export ---
pub use crate::exporter::{ExportRun, ExportStats, PageOutcome, TreeExporter};
pub use crate::media::{MediaDownloader, MediaRehoster, RehostOutcome};
pub use crate::output::{sanitize_title, ExportTarget};
pub use crate::pipeline::{ExportDriver, ExportReport};
