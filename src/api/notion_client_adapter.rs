//! Adapter layer for converting notion-client types to our domain model.
//!
//! notion-client owns the wire schema; this module decides what of it the
//! exporter keeps. Conversion is forgiving: a block type we do not render
//! becomes `BlockKind::Unsupported` instead of an error.

use crate::constants::FALLBACK_TITLE;
use crate::error::{AppError, NotionClientError};
use crate::model::{Annotations, Block, BlockKind, FileSource, Page, PageTitle, RichText, RichTextRun};
use crate::types::NotionId;
use notion_client::objects::block::{Block as NcBlock, BlockType};
use notion_client::objects::file::File as NcFile;
use notion_client::objects::page::{Page as NcPage, PageProperty};
use notion_client::objects::rich_text::RichText as NcRichText;
use std::collections::HashMap;

/// Convert notion-client Page to our domain Page
pub fn convert_page(notion_page: NcPage) -> Result<Page, AppError> {
    let id = NotionId::parse(&notion_page.id)?;
    let title = extract_page_title(&notion_page.properties);

    Ok(Page {
        id,
        title,
        url: notion_page.url,
        archived: notion_page.archived,
    })
}

/// Extract the page title: the first title property that has text.
fn extract_page_title(properties: &HashMap<String, PageProperty>) -> PageTitle {
    properties
        .values()
        .find_map(|property| match property {
            PageProperty::Title { title, .. } if !title.is_empty() => {
                Some(convert_rich_text_array(title.clone()).plain_text())
            }
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .map(PageTitle::new)
        .unwrap_or_else(|| PageTitle::new(FALLBACK_TITLE))
}

/// Convert notion-client Block to our domain Block
pub fn convert_block(notion_block: NcBlock) -> Result<Block, AppError> {
    let id = NotionId::parse(&notion_block.id.clone().ok_or_else(|| {
        NotionClientError::ConversionError {
            message: "Block missing required ID field".to_string(),
        }
    })?)?;
    let has_children = notion_block.has_children.unwrap_or(false);
    let kind = convert_block_type(notion_block.block_type)?;

    Ok(Block {
        id,
        has_children,
        kind,
        children: Vec::new(), // Populated by the converter when it descends
    })
}

fn convert_block_type(block_type: BlockType) -> Result<BlockKind, AppError> {
    let kind = match block_type {
        BlockType::Paragraph { paragraph } => BlockKind::Paragraph {
            text: convert_rich_text_array(paragraph.rich_text),
        },
        BlockType::Heading1 { heading_1 } => BlockKind::Heading {
            level: 1,
            text: convert_rich_text_array(heading_1.rich_text),
        },
        BlockType::Heading2 { heading_2 } => BlockKind::Heading {
            level: 2,
            text: convert_rich_text_array(heading_2.rich_text),
        },
        BlockType::Heading3 { heading_3 } => BlockKind::Heading {
            level: 3,
            text: convert_rich_text_array(heading_3.rich_text),
        },
        BlockType::BulletedListItem { bulleted_list_item } => BlockKind::BulletedListItem {
            text: convert_rich_text_array(bulleted_list_item.rich_text),
        },
        BlockType::NumberedListItem { numbered_list_item } => BlockKind::NumberedListItem {
            text: convert_rich_text_array(numbered_list_item.rich_text),
        },
        BlockType::ToDo { to_do } => BlockKind::ToDo {
            text: convert_rich_text_array(to_do.rich_text),
            checked: to_do.checked.unwrap_or(false),
        },
        BlockType::Toggle { toggle } => BlockKind::Toggle {
            text: convert_rich_text_array(toggle.rich_text),
        },
        BlockType::Quote { quote } => BlockKind::Quote {
            text: convert_rich_text_array(quote.rich_text),
        },
        BlockType::Callout { callout } => BlockKind::Callout {
            icon: callout.icon.and_then(convert_icon),
            text: convert_rich_text_array(callout.rich_text),
        },
        BlockType::Code { code } => BlockKind::Code {
            language: code_language(&format!("{:?}", code.language)),
            text: convert_rich_text_array(code.rich_text),
            caption: convert_rich_text_array(code.caption),
        },
        BlockType::Equation { equation } => BlockKind::Equation {
            expression: equation.expression,
        },
        BlockType::Divider { .. } => BlockKind::Divider,
        BlockType::Image { image } => BlockKind::Image {
            source: convert_file(image.file_type),
            caption: RichText::default(), // ImageValue doesn't carry a caption in this version
        },
        BlockType::Video { video } => BlockKind::Video {
            source: convert_file(video.file_type),
            caption: RichText::default(),
        },
        BlockType::File { file } => BlockKind::File {
            source: convert_file(file.file_type),
            caption: convert_rich_text_array(file.caption),
        },
        BlockType::Pdf { pdf } => BlockKind::Pdf {
            source: convert_file(pdf.file_type),
            caption: convert_rich_text_array(pdf.caption),
        },
        BlockType::Bookmark { bookmark } => BlockKind::Bookmark {
            url: bookmark.url,
            caption: convert_rich_text_array(bookmark.caption),
        },
        BlockType::Embed { embed } => BlockKind::Embed { url: embed.url },
        BlockType::LinkPreview { link_preview } => BlockKind::LinkPreview {
            url: link_preview.url,
        },
        BlockType::ChildPage { child_page } => BlockKind::ChildPage {
            title: child_page.title,
        },
        BlockType::ChildDatabase { child_database } => BlockKind::ChildDatabase {
            title: child_database.title,
        },
        BlockType::LinkToPage { link_to_page } => match link_to_page {
            notion_client::objects::parent::Parent::PageId { page_id } => BlockKind::LinkToPage {
                page_id: NotionId::parse(&page_id)?,
            },
            _ => BlockKind::Unsupported {
                block_type: "link_to_page".to_string(),
            },
        },
        BlockType::Table { table } => BlockKind::Table {
            has_column_header: table.has_column_header,
        },
        BlockType::TableRow { table_row } => BlockKind::TableRow {
            cells: table_row
                .cells
                .into_iter()
                .map(convert_rich_text_array)
                .collect(),
        },
        BlockType::ColumnList { .. } => BlockKind::ColumnList,
        BlockType::Column { .. } => BlockKind::Column,
        BlockType::SyncedBlock { .. } => BlockKind::Synced,
        other => BlockKind::Unsupported {
            block_type: format!("{:?}", other)
                .split([' ', '{', '('])
                .next()
                .unwrap_or("unknown")
                .to_string(),
        },
    };
    Ok(kind)
}

/// Normalizes notion-client's language enum name (`PlainText`, `Rust`) to a fence tag.
fn code_language(debug_name: &str) -> String {
    match debug_name.to_ascii_lowercase().as_str() {
        "plaintext" | "plain_text" | "plain text" => String::new(),
        other => other.to_string(),
    }
}

fn convert_file(file: NcFile) -> FileSource {
    match file {
        NcFile::External { external } => FileSource::External { url: external.url },
        NcFile::File { file } => FileSource::Hosted { url: file.url },
    }
}

fn convert_icon(icon: notion_client::objects::block::Icon) -> Option<String> {
    use notion_client::objects::block::Icon as NcIcon;

    match icon {
        NcIcon::Emoji(notion_client::objects::emoji::Emoji::Emoji { emoji }) => Some(emoji),
        NcIcon::File(_) => None,
    }
}

/// Convert array of rich text items
pub fn convert_rich_text_array(rich_texts: Vec<NcRichText>) -> RichText {
    RichText(rich_texts.into_iter().map(convert_rich_text).collect())
}

/// Convert single rich text item
fn convert_rich_text(rich_text: NcRichText) -> RichTextRun {
    match rich_text {
        NcRichText::Text {
            text,
            annotations,
            plain_text,
            href,
        } => RichTextRun {
            href: href.or_else(|| text.link.map(|link| link.url)),
            plain_text: plain_text.unwrap_or(text.content),
            annotations: annotations.map(convert_annotations).unwrap_or_default(),
        },

        NcRichText::Mention {
            annotations,
            plain_text,
            href,
            ..
        } => RichTextRun {
            plain_text,
            href,
            annotations: convert_annotations(annotations),
        },

        NcRichText::Equation {
            equation,
            annotations,
            ..
        } => RichTextRun {
            plain_text: format!("${}$", equation.expression),
            href: None,
            annotations: Annotations {
                code: false,
                ..convert_annotations(annotations)
            },
        },

        _ => {
            log::debug!("Unsupported rich text type, rendering as empty text");
            RichTextRun::plain("")
        }
    }
}

fn convert_annotations(annotations: notion_client::objects::rich_text::Annotations) -> Annotations {
    Annotations {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
    }
}
