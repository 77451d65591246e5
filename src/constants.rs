// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you the story
//! of how an export runs: how it pages through Notion, how deep it descends,
//! how it names files, and which media it brings home.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips while listing children and searching the workspace.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Notion API version header sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Production Notion API base URL.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Attempts per API call when failures are transient (rate limits, 5xx).
pub const DEFAULT_API_ATTEMPTS: u32 = 3;

/// Seconds before a single remote call is abandoned.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Tree traversal boundaries
// ---------------------------------------------------------------------------

/// Default ceiling on page nesting depth during an export.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 64;

/// Hard ceiling on page nesting depth, whatever the configuration says.
///
/// Every level costs a boxed future and a directory level; real workspaces
/// never come near this.
pub const NOTION_MAX_TREE_DEPTH: usize = 256;

/// Maximum nesting depth when fetching and rendering a page's own blocks.
pub const BLOCK_MAX_RENDER_DEPTH: usize = 32;

/// Number of spaces per indentation level for nested list items.
pub const INDENT_SPACES: usize = 2;

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Maximum length of a sanitized page file name, in characters.
pub const FILENAME_MAX_LENGTH: usize = 200;

/// Maximum encoded size of a sanitized file name, leaving room for `.md`
/// under the common 255-byte file name limit.
pub const FILENAME_MAX_BYTES: usize = 240;

/// File name used when a title sanitizes to nothing.
pub const FALLBACK_FILENAME: &str = "untitled";

/// Title used when a page has no title text.
pub const FALLBACK_TITLE: &str = "Untitled";

/// Extension of every exported document.
pub const DOCUMENT_EXTENSION: &str = "md";

/// Heading of the generated child-page navigation section.
pub const NAVIGATION_HEADING: &str = "## Child Pages";

// ---------------------------------------------------------------------------
// Media rehosting
// ---------------------------------------------------------------------------

/// Directory, next to each exported document, that holds its images.
pub const MEDIA_DIR_NAME: &str = "images";

/// Prefix of every rehosted image file name (`image-<n>.<ext>`).
pub const MEDIA_FILE_PREFIX: &str = "image";

/// Extension used when the media URL does not reveal one.
pub const DEFAULT_MEDIA_EXTENSION: &str = "png";

/// Longest URL path extension accepted as-is.
pub const MEDIA_EXTENSION_MAX_LENGTH: usize = 5;

/// Redirect responses followed before a download is given up.
pub const MEDIA_MAX_REDIRECTS: usize = 5;

/// Hosts whose media is mirrored by default (suffix match).
///
/// Notion stores uploaded files in S3 and serves some assets from its own domains.
pub const DEFAULT_MEDIA_HOSTS: &[&str] = &[
    "amazonaws.com",
    "notion-static.com",
    "notion.so",
    "notion.site",
];

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Output root used when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "notion-export";

/// Environment variables checked, in order, for the integration token.
pub const TOKEN_ENV_VARS: &[&str] = &["NOTION_TOKEN", "NOTION_API_KEY"];

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
