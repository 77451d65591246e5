// src/exporter/navigation.rs
//! The "Child Pages" section appended to documents that have children.

use crate::constants::NAVIGATION_HEADING;
use crate::model::Page;
use crate::output::ExportTarget;

/// Appends a link to every child, in listing order, to `document`.
///
/// Each link targets the file the child's own visit will write,
/// `./<parent stem>/<sanitized child title>.md`, in angle brackets since
/// sanitized names may keep parentheses.
pub fn append_navigation(document: &mut String, target: &ExportTarget, children: &[Page]) {
    if children.is_empty() {
        return;
    }

    let trimmed_len = document.trim_end().len();
    document.truncate(trimmed_len);
    if !document.is_empty() {
        document.push_str("\n\n");
    }

    document.push_str(NAVIGATION_HEADING);
    document.push_str("\n\n");
    for child in children {
        let title = child.title().as_str();
        document.push_str(&format!(
            "- [{}](<{}>)\n",
            escape_link_text(title),
            target.child_link(title)
        ));
    }
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
