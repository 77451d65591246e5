use super::RichText;
use crate::types::NotionId;
use serde::{Deserialize, Serialize};

/// Where a file-like block's content lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileSource {
    /// Uploaded to Notion; the URL is a short-lived signed link.
    Hosted { url: String },
    /// Linked from elsewhere on the web.
    External { url: String },
}

impl FileSource {
    pub fn url(&self) -> &str {
        match self {
            FileSource::Hosted { url } | FileSource::External { url } => url,
        }
    }
}

/// The block types the Markdown converter understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph { text: RichText },
    Heading { level: u8, text: RichText },
    BulletedListItem { text: RichText },
    NumberedListItem { text: RichText },
    ToDo { text: RichText, checked: bool },
    Toggle { text: RichText },
    Quote { text: RichText },
    Callout { icon: Option<String>, text: RichText },
    Code { language: String, text: RichText, caption: RichText },
    Equation { expression: String },
    Divider,
    Image { source: FileSource, caption: RichText },
    Video { source: FileSource, caption: RichText },
    File { source: FileSource, caption: RichText },
    Pdf { source: FileSource, caption: RichText },
    Bookmark { url: String, caption: RichText },
    Embed { url: String },
    LinkPreview { url: String },
    ChildPage { title: String },
    ChildDatabase { title: String },
    LinkToPage { page_id: NotionId },
    Table { has_column_header: bool },
    TableRow { cells: Vec<RichText> },
    ColumnList,
    Column,
    Synced,
    Unsupported { block_type: String },
}

/// A block in a page body, with its children once they have been fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: NotionId,
    pub has_children: bool,
    pub kind: BlockKind,
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(id: NotionId, kind: BlockKind) -> Self {
        Self {
            id,
            has_children: false,
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }

    /// Whether this block marks a nested page.
    pub fn is_child_page(&self) -> bool {
        matches!(self.kind, BlockKind::ChildPage { .. })
    }

    /// Whether the block's children belong to its own body.
    ///
    /// Child pages and child databases own their content; the converter must
    /// not inline it into the parent document.
    pub fn owns_inline_children(&self) -> bool {
        self.has_children
            && !matches!(
                self.kind,
                BlockKind::ChildPage { .. } | BlockKind::ChildDatabase { .. }
            )
    }

    pub fn is_list_item(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::BulletedListItem { .. }
                | BlockKind::NumberedListItem { .. }
                | BlockKind::ToDo { .. }
        )
    }
}
