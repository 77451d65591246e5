// src/media/mod.rs
//! Media rehosting: brings a document's remote images home.
//!
//! Every `![alt](target)` in a document is visited left to right. Images on a
//! mirrored host are downloaded into an `images` directory next to the
//! document and the reference is rewritten to the local copy; everything else
//! is left exactly as written.

mod download;
mod references;

pub use download::MediaDownloader;
pub use references::{media_extension, media_file_name, scan, MediaReference};

use crate::config::ExportConfig;
use crate::constants::MEDIA_DIR_NAME;
use crate::error::AppError;
use crate::types::MediaHost;
use std::path::{Path, PathBuf};
use url::Url;

/// Result of rehosting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RehostOutcome {
    pub text: String,
    /// Images now served from the local `images` directory.
    pub rehosted: usize,
    /// Mirrored-host images whose download failed; their URLs were kept.
    pub failed: usize,
    /// Files written for the rehosted images, in order of appearance.
    pub saved: Vec<PathBuf>,
}

/// Downloads mirrored media and rewrites references to it.
#[derive(Clone)]
pub struct MediaRehoster {
    downloader: MediaDownloader,
    hosts: Vec<MediaHost>,
}

impl MediaRehoster {
    pub fn new(downloader: MediaDownloader, hosts: Vec<MediaHost>) -> Self {
        Self { downloader, hosts }
    }

    pub fn from_config(config: &ExportConfig) -> Result<Self, AppError> {
        Ok(Self::new(
            MediaDownloader::new(config.request_timeout)?,
            config.media_hosts.clone(),
        ))
    }

    fn is_mirrored(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| self.hosts.iter().any(|mirrored| mirrored.covers(host)))
    }

    /// Rehosts the images of one document whose file lives in `parent_dir`.
    ///
    /// Never fails: an image that cannot be brought home keeps its original
    /// reference. Sequence numbers are handed out in order of appearance to
    /// every mirrored image, whether or not its download succeeds, so the
    /// same input always yields the same names.
    pub async fn rehost(&self, text: &str, parent_dir: &Path) -> RehostOutcome {
        let references = scan(text);
        if references.is_empty() {
            return RehostOutcome {
                text: text.to_string(),
                rehosted: 0,
                failed: 0,
                saved: Vec::new(),
            };
        }

        let media_dir = parent_dir.join(MEDIA_DIR_NAME);
        let mut media_dir_ready = false;
        let mut sequence = 0usize;
        let mut rehosted = 0usize;
        let mut failed = 0usize;
        let mut saved = Vec::new();

        let mut output = String::with_capacity(text.len());
        let mut cursor = 0usize;

        for reference in &references {
            output.push_str(&text[cursor..reference.span.start]);
            cursor = reference.span.end;
            let original = &text[reference.span.clone()];

            if !reference.is_remote() {
                output.push_str(original);
                continue;
            }

            let url = match Url::parse(&reference.target) {
                Ok(url) => url,
                Err(e) => {
                    log::warn!("Leaving image with unparseable URL '{}': {}", reference.target, e);
                    output.push_str(original);
                    continue;
                }
            };

            if !self.is_mirrored(&url) {
                log::info!(
                    "Skipping image on unmirrored host {}: {}",
                    url.host_str().unwrap_or_default(),
                    reference.target
                );
                output.push_str(original);
                continue;
            }

            sequence += 1;
            let file_name = media_file_name(sequence, &media_extension(&url));

            let media_path = media_dir.join(&file_name);
            match self
                .download(&url, &media_dir, &media_path, &mut media_dir_ready)
                .await
            {
                Ok(bytes) => {
                    log::debug!(
                        "Rehosted {} as {}/{} ({} bytes)",
                        url,
                        MEDIA_DIR_NAME,
                        file_name,
                        bytes
                    );
                    output.push_str(&reference.rewritten(&file_name));
                    saved.push(media_path);
                    rehosted += 1;
                }
                Err(e) => {
                    log::warn!("Keeping remote image {}: {}", reference.target, e);
                    output.push_str(original);
                    failed += 1;
                }
            }
        }
        output.push_str(&text[cursor..]);

        RehostOutcome {
            text: output,
            rehosted,
            failed,
            saved,
        }
    }

    /// Downloads one image, creating the media directory on first success.
    async fn download(
        &self,
        url: &Url,
        media_dir: &Path,
        media_path: &Path,
        media_dir_ready: &mut bool,
    ) -> Result<u64, AppError> {
        let response = self.downloader.fetch(url).await?;

        if !*media_dir_ready {
            tokio::fs::create_dir_all(media_dir).await?;
            *media_dir_ready = true;
        }

        self.downloader.save(response, media_path).await
    }
}
