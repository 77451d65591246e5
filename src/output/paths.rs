// src/output/paths.rs
//! Pure functions for path calculations and filename generation.
//!
//! This module handles all path-related operations without
//! performing any I/O operations.

use crate::constants::{
    DOCUMENT_EXTENSION, FALLBACK_FILENAME, FILENAME_MAX_BYTES, FILENAME_MAX_LENGTH,
};
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static::lazy_static! {
    static ref RESERVED_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*\p{Cc}]"#)
        .expect("Failed to compile reserved character regex - this is a bug in the code");
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+")
        .expect("Failed to compile whitespace regex - this is a bug in the code");
    static ref HYPHEN_RUN: Regex = Regex::new(r"-{2,}")
        .expect("Failed to compile hyphen regex - this is a bug in the code");
}

/// Maps a page title to a filesystem-safe file stem.
///
/// Reserved characters and whitespace runs become single hyphens, hyphen runs
/// collapse, and the ends are trimmed. The result is at most
/// [`FILENAME_MAX_LENGTH`] characters and [`FILENAME_MAX_BYTES`] bytes, and is
/// never empty: a title with nothing usable left becomes `untitled`.
pub fn sanitize_title(title: &str) -> String {
    let replaced = RESERVED_CHARS.replace_all(title, "-");
    let replaced = WHITESPACE_RUN.replace_all(&replaced, "-");
    let collapsed = HYPHEN_RUN.replace_all(&replaced, "-");
    let trimmed = collapsed.trim_matches('-');

    let truncated = truncate(trimmed, FILENAME_MAX_LENGTH, FILENAME_MAX_BYTES);
    // Truncation can expose a hyphen at the cut.
    let stem = truncated.trim_end_matches('-');

    // "." and ".." would name the directory itself or its parent.
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        FALLBACK_FILENAME.to_string()
    } else {
        stem.to_string()
    }
}

/// The longest prefix of `s` within both limits, cut on a character boundary.
fn truncate(s: &str, max_chars: usize, max_bytes: usize) -> &str {
    let mut end = 0;
    for (count, (index, c)) in s.char_indices().enumerate() {
        if count >= max_chars || index + c.len_utf8() > max_bytes {
            break;
        }
        end = index + c.len_utf8();
    }
    &s[..end]
}

/// `<stem>.md`
pub fn document_file_name(stem: &str) -> String {
    format!("{}.{}", stem, DOCUMENT_EXTENSION)
}

/// Link from a parent document to a child document, relative to the parent's file.
pub fn child_link(parent_stem: &str, child_title: &str) -> String {
    format!(
        "./{}/{}",
        parent_stem,
        document_file_name(&sanitize_title(child_title))
    )
}

/// Where one page lands on disk, derived from its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub parent_dir: PathBuf,
    pub file_stem: String,
}

impl ExportTarget {
    pub fn new(parent_dir: &Path, title: &str) -> Self {
        Self {
            parent_dir: parent_dir.to_path_buf(),
            file_stem: sanitize_title(title),
        }
    }

    /// `parent_dir/<stem>.md`
    pub fn document_path(&self) -> PathBuf {
        self.parent_dir.join(document_file_name(&self.file_stem))
    }

    /// `parent_dir/<stem>/`, holding the page's children.
    pub fn child_dir(&self) -> PathBuf {
        self.parent_dir.join(&self.file_stem)
    }

    /// Link to a child page, as written in this page's navigation section.
    pub fn child_link(&self, child_title: &str) -> String {
        child_link(&self.file_stem, child_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("My Notes"), "My-Notes");
        assert_eq!(sanitize_title("Child A"), "Child-A");
        assert_eq!(sanitize_title("a/b\\c:d*e?f\"g<h>i|j"), "a-b-c-d-e-f-g-h-i-j");
        assert_eq!(sanitize_title("  Lots   of\t\nspace  "), "Lots-of-space");
        assert_eq!(sanitize_title("--Already - hyphenated--"), "Already-hyphenated");
        assert_eq!(sanitize_title("Q3 / Q4: Plans?"), "Q3-Q4-Plans");
        assert_eq!(sanitize_title("Café ☕ notes"), "Café-☕-notes");
    }

    #[test]
    fn test_empty_results_fall_back() {
        assert_eq!(sanitize_title(""), "untitled");
        assert_eq!(sanitize_title("   "), "untitled");
        assert_eq!(sanitize_title(":::"), "untitled");
        assert_eq!(sanitize_title(".."), "untitled");
        assert_eq!(sanitize_title(" . "), "untitled");
    }

    #[test]
    fn test_length_is_bounded() {
        let long = "word ".repeat(100);
        let stem = sanitize_title(&long);
        assert!(stem.chars().count() <= FILENAME_MAX_LENGTH);
        assert!(!stem.ends_with('-'));

        let wide = "語".repeat(300);
        let stem = sanitize_title(&wide);
        assert!(stem.len() <= FILENAME_MAX_BYTES);
        assert_eq!(stem.chars().count(), FILENAME_MAX_BYTES / 3);
    }

    #[test]
    fn test_sanitized_titles_hold_their_properties() {
        let repeated = "x y ".repeat(80);
        let titles = [
            "Meeting notes 2024/01/02",
            "  leading and trailing  ",
            "<<<>>>",
            "tabs\tand\nnewlines",
            "a -- b ---- c",
            "emoji 🚀 launch | plan",
            "control\u{0007}char",
            repeated.as_str(),
        ];

        for title in titles {
            let stem = sanitize_title(title);
            assert!(!stem.is_empty(), "{:?}", title);
            assert!(
                !stem.contains(['<', '>', ':', '"', '/', '\\', '|', '?', '*']),
                "{:?} -> {:?}",
                title,
                stem
            );
            assert!(!stem.chars().any(char::is_whitespace), "{:?}", stem);
            assert!(!stem.contains("--"), "{:?}", stem);
            assert!(!stem.starts_with('-') && !stem.ends_with('-'), "{:?}", stem);
            assert!(stem.chars().count() <= FILENAME_MAX_LENGTH);
            assert_eq!(sanitize_title(title), stem, "sanitizing is deterministic");
        }
    }

    #[test]
    fn test_export_target_paths() {
        let target = ExportTarget::new(Path::new("/out"), "Parent");
        assert_eq!(target.document_path(), PathBuf::from("/out/Parent.md"));
        assert_eq!(target.child_dir(), PathBuf::from("/out/Parent"));
        assert_eq!(target.child_link("Child A"), "./Parent/Child-A.md");
    }
}
