// src/media/references.rs
//! Image references in document text, and the local names they are given.

use crate::constants::{
    DEFAULT_MEDIA_EXTENSION, MEDIA_DIR_NAME, MEDIA_EXTENSION_MAX_LENGTH, MEDIA_FILE_PREFIX,
};
use regex::Regex;
use std::ops::Range;
use url::Url;

lazy_static::lazy_static! {
    static ref IMAGE_REFERENCE: Regex = Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)")
        .expect("Failed to compile image reference regex - this is a bug in the code");
}

/// One `![alt](target)` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    pub alt: String,
    pub target: String,
    /// Byte range of the whole occurrence in the scanned text.
    pub span: Range<usize>,
}

impl MediaReference {
    /// Whether the target is an absolute network URL.
    pub fn is_remote(&self) -> bool {
        let target = self.target.to_ascii_lowercase();
        target.starts_with("http://") || target.starts_with("https://")
    }

    /// The reference rewritten to point at a local file.
    pub fn rewritten(&self, file_name: &str) -> String {
        format!("![{}](./{}/{})", self.alt, MEDIA_DIR_NAME, file_name)
    }
}

/// All image references in `text`, in order of appearance.
pub fn scan(text: &str) -> Vec<MediaReference> {
    IMAGE_REFERENCE
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            Some(MediaReference {
                alt: captures.get(1)?.as_str().to_string(),
                // An optional `"title"` after the URL is not part of the target.
                target: captures
                    .get(2)?
                    .as_str()
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

/// The extension of the URL's last path segment, or the default one.
///
/// Only short alphanumeric extensions are trusted; anything else (no dot,
/// `.php?id=..` style endpoints, long random suffixes) gets the default.
pub fn media_extension(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MEDIA_EXTENSION_MAX_LENGTH
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_MEDIA_EXTENSION.to_string())
}

/// `image-<sequence>.<extension>`
pub fn media_file_name(sequence: usize, extension: &str) -> String {
    format!("{}-{}.{}", MEDIA_FILE_PREFIX, sequence, extension)
}
