// src/exporter/run.rs
//! State owned by one export run.

use crate::error::AppError;
use crate::types::NotionId;
use dashmap::DashSet;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Distinct page identities visited, whatever the outcome.
    pub processed: usize,
    pub written: usize,
    /// Pages left out because they are restricted or archived.
    pub skipped: usize,
    pub failed: usize,
    pub images_rehosted: usize,
    pub images_failed: usize,
    /// Saved images that landed on a file another page already wrote.
    pub images_overwritten: usize,
}

/// The processed set and counters of a single export.
///
/// An identity, once marked, stays marked for the rest of the run; that is
/// what stops cycles and duplicate writes. Every operation takes `&self`, so
/// one run can be shared by concurrent visitors.
#[derive(Debug, Default)]
pub struct ExportRun {
    processed: DashSet<NotionId>,
    written_paths: DashSet<PathBuf>,
    stats: Mutex<ExportStats>,
    abort: Mutex<Option<AppError>>,
}

impl ExportRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as processed. Returns false if it already was.
    pub fn mark_processed(&self, id: &NotionId) -> bool {
        self.processed.insert(id.clone())
    }

    pub fn is_processed(&self, id: &NotionId) -> bool {
        self.processed.contains(id)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Records a written document, warning when a path is written twice.
    pub fn record_written(&self, path: &Path) {
        if !self.written_paths.insert(path.to_path_buf()) {
            log::warn!(
                "{} was already written in this run; a sibling with the same sanitized title overwrote it",
                path.display()
            );
        }
        self.stats.lock().written += 1;
    }

    /// Records a saved image file. Returns false, with a warning, when an
    /// earlier page of this run already wrote the same path.
    pub fn record_media(&self, path: &Path) -> bool {
        if self.written_paths.insert(path.to_path_buf()) {
            return true;
        }
        log::warn!(
            "{} was already written in this run; a sibling page's image overwrote it",
            path.display()
        );
        self.stats.lock().images_overwritten += 1;
        false
    }

    pub fn record_skipped(&self) {
        self.stats.lock().skipped += 1;
    }

    pub fn record_failed(&self) {
        self.stats.lock().failed += 1;
    }

    pub fn record_images(&self, rehosted: usize, failed: usize) {
        let mut stats = self.stats.lock();
        stats.images_rehosted += rehosted;
        stats.images_failed += failed;
    }

    /// Stops the run. The first error recorded is the one reported.
    pub fn abort_with(&self, error: AppError) {
        let mut abort = self.abort.lock();
        if abort.is_none() {
            *abort = Some(error);
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.lock().is_some()
    }

    /// The error that stopped the run, if any.
    pub fn take_abort(&self) -> Option<AppError> {
        self.abort.lock().take()
    }

    /// A snapshot of the counters.
    pub fn stats(&self) -> ExportStats {
        ExportStats {
            processed: self.processed_count(),
            ..self.stats.lock().clone()
        }
    }
}
