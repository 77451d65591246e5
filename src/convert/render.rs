// src/convert/render.rs
//! Block rendering: converts a fetched block tree to Markdown.
//!
//! Rendering is pure: every block becomes a chunk of text, and chunks are
//! joined with a blank line except between items of the same list.

use crate::constants::INDENT_SPACES;
use crate::model::{Block, BlockKind, FileSource, RichText};

/// Renders a page body. The result ends with a single newline, or is empty.
pub fn render_document(blocks: &[Block]) -> String {
    let body = render_blocks(blocks);
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!("{}\n", body)
    }
}

/// Renders sibling blocks, without a trailing newline.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut output = String::new();
    let mut previous: Option<&Block> = None;
    let mut list_number = 0usize;

    for block in blocks {
        if matches!(block.kind, BlockKind::NumberedListItem { .. }) {
            let continues_run = previous
                .is_some_and(|p| matches!(p.kind, BlockKind::NumberedListItem { .. }));
            list_number = if continues_run { list_number + 1 } else { 1 };
        }

        let chunk = render_block(block, list_number);
        if chunk.is_empty() {
            continue;
        }

        if let Some(prev) = previous {
            let same_list = prev.is_list_item() && block.is_list_item();
            output.push_str(if same_list { "\n" } else { "\n\n" });
        }
        output.push_str(&chunk);
        previous = Some(block);
    }

    output
}

fn render_block(block: &Block, list_number: usize) -> String {
    let children = &block.children;

    match &block.kind {
        BlockKind::Paragraph { text } => {
            let text = text.to_markdown();
            with_indented_children(text, children)
        }
        BlockKind::Heading { level, text } => {
            let heading = format!("{} {}", "#".repeat((*level).clamp(1, 6) as usize), text.to_markdown());
            with_children(heading, children)
        }
        BlockKind::BulletedListItem { text } => {
            list_item("- ", text, children, INDENT_SPACES)
        }
        BlockKind::NumberedListItem { text } => {
            let marker = format!("{}. ", list_number.max(1));
            let indent = marker.len();
            list_item(&marker, text, children, indent)
        }
        BlockKind::ToDo { text, checked } => {
            let marker = if *checked { "- [x] " } else { "- [ ] " };
            list_item(marker, text, children, INDENT_SPACES)
        }
        BlockKind::Toggle { text } => {
            let mut out = format!("<details>\n<summary>{}</summary>", text.to_markdown());
            let inner = render_blocks(children);
            if !inner.is_empty() {
                out.push_str("\n\n");
                out.push_str(&inner);
            }
            out.push_str("\n\n</details>");
            out
        }
        BlockKind::Quote { text } => {
            let body = with_children(text.to_markdown(), children);
            quote(&body)
        }
        BlockKind::Callout { icon, text } => {
            let head = match icon {
                Some(icon) => format!("{} {}", icon, text.to_markdown()),
                None => text.to_markdown(),
            };
            quote(&with_children(head, children))
        }
        BlockKind::Code {
            language,
            text,
            caption,
        } => {
            let mut out = format!("```{}\n{}\n```", language, text.plain_text());
            if !caption.is_empty() {
                out.push_str(&format!("\n\n*{}*", caption.to_markdown()));
            }
            out
        }
        BlockKind::Equation { expression } => format!("$$\n{}\n$$", expression),
        BlockKind::Divider => "---".to_string(),
        BlockKind::Image { source, caption } => {
            format!("![{}]({})", alt_text(caption), source.url())
        }
        BlockKind::Video { source, caption } => file_link("Video", source, caption),
        BlockKind::File { source, caption } => file_link("File", source, caption),
        BlockKind::Pdf { source, caption } => file_link("PDF", source, caption),
        BlockKind::Bookmark { url, caption } => {
            if caption.is_empty() {
                format!("[{}]({})", url, url)
            } else {
                format!("[{}]({})", caption.to_markdown(), url)
            }
        }
        BlockKind::Embed { url } => format!("[Embed]({})", url),
        BlockKind::LinkPreview { url } => format!("[{}]({})", url, url),
        // Listed by the navigation section instead.
        BlockKind::ChildPage { .. } => String::new(),
        BlockKind::ChildDatabase { title } => {
            let title = if title.is_empty() { "Untitled" } else { title };
            format!("*Database: {} (not exported)*", title)
        }
        BlockKind::LinkToPage { page_id } => {
            format!("[Linked page](https://www.notion.so/{})", page_id.as_str())
        }
        BlockKind::Table { has_column_header } => render_table(children, *has_column_header),
        // Rows outside a table have no header to hang off.
        BlockKind::TableRow { cells } => table_row(cells),
        BlockKind::ColumnList | BlockKind::Column | BlockKind::Synced => render_blocks(children),
        BlockKind::Unsupported { block_type } => {
            format!("<!-- Unsupported block type: {} -->", block_type)
        }
    }
}

/// A list item: marker, text, then children indented under the marker.
fn list_item(marker: &str, text: &RichText, children: &[Block], indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = String::from(marker);
    out.push_str(&indent_lines(&text.to_markdown(), &pad, false));

    let nested = render_blocks(children);
    if !nested.is_empty() {
        out.push('\n');
        out.push_str(&indent_lines(&nested, &pad, true));
    }
    out
}

/// Head text followed by the children at the same level.
fn with_children(head: String, children: &[Block]) -> String {
    let nested = render_blocks(children);
    match (head.is_empty(), nested.is_empty()) {
        (_, true) => head,
        (true, false) => nested,
        (false, false) => format!("{}\n\n{}", head, nested),
    }
}

/// Head text followed by the children, indented one level.
fn with_indented_children(head: String, children: &[Block]) -> String {
    let nested = render_blocks(children);
    if nested.is_empty() {
        return head;
    }
    let nested = indent_lines(&nested, &" ".repeat(INDENT_SPACES), true);
    if head.is_empty() {
        nested
    } else {
        format!("{}\n\n{}", head, nested)
    }
}

fn quote(body: &str) -> String {
    body.lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indents non-empty lines. The first line is left alone unless `first` is set.
fn indent_lines(text: &str, pad: &str, first: bool) -> String {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| {
            if line.is_empty() || (i == 0 && !first) {
                line.to_string()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Image alt text: plain caption text without brackets, "Image" when empty.
fn alt_text(caption: &RichText) -> String {
    let alt: String = caption
        .plain_text()
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '\n'))
        .collect();
    if alt.trim().is_empty() {
        "Image".to_string()
    } else {
        alt.trim().to_string()
    }
}

fn file_link(label: &str, source: &FileSource, caption: &RichText) -> String {
    let text = if caption.is_empty() {
        label.to_string()
    } else {
        caption.to_markdown()
    };
    format!("[{}]({})", text, source.url())
}

fn render_table(rows: &[Block], has_column_header: bool) -> String {
    let rows: Vec<&Vec<RichText>> = rows
        .iter()
        .filter_map(|row| match &row.kind {
            BlockKind::TableRow { cells } => Some(cells),
            _ => None,
        })
        .collect();

    let Some(width) = rows.iter().map(|cells| cells.len()).max() else {
        return String::new();
    };

    let separator = format!("|{}", " --- |".repeat(width));
    let mut lines = Vec::with_capacity(rows.len() + 2);

    // Markdown tables always have a header row; without one in Notion, leave it blank.
    let body = if has_column_header {
        lines.push(padded_row(rows[0], width));
        &rows[1..]
    } else {
        lines.push(format!("|{}", "  |".repeat(width)));
        &rows[..]
    };
    lines.push(separator);
    lines.extend(body.iter().map(|cells| padded_row(cells, width)));

    lines.join("\n")
}

fn padded_row(cells: &[RichText], width: usize) -> String {
    let mut row = String::from("|");
    for i in 0..width {
        let cell = cells.get(i).map(table_cell).unwrap_or_default();
        row.push_str(&format!(" {} |", cell));
    }
    row
}

fn table_row(cells: &[RichText]) -> String {
    padded_row(cells, cells.len())
}

fn table_cell(cell: &RichText) -> String {
    cell.to_markdown().replace('|', "\\|").replace('\n', "<br>")
}
