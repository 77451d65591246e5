// src/pipeline.rs
//! Export driver: owns the output root and reports how the run went.
//!
//! The driver wires the concrete collaborators together from an
//! [`ExportConfig`]; tests build a [`TreeExporter`] from fakes and hand it to
//! [`ExportDriver::new`] instead.

use crate::api::{NotionHttpClient, NotionRepository};
use crate::config::ExportConfig;
use crate::convert::{ContentConverter, MarkdownConverter};
use crate::error::AppError;
use crate::exporter::{ExportStats, TreeExporter};
use crate::media::MediaRehoster;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Aggregate outcome of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub output_root: PathBuf,
    /// Distinct page identities visited.
    pub processed: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub images_rehosted: usize,
    pub images_failed: usize,
    pub images_overwritten: usize,
    pub elapsed: Duration,
}

impl ExportReport {
    fn new(output_root: &Path, stats: ExportStats, elapsed: Duration) -> Self {
        Self {
            output_root: output_root.to_path_buf(),
            processed: stats.processed,
            written: stats.written,
            skipped: stats.skipped,
            failed: stats.failed,
            images_rehosted: stats.images_rehosted,
            images_failed: stats.images_failed,
            images_overwritten: stats.images_overwritten,
            elapsed,
        }
    }

    /// True when no page or image failed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.images_failed == 0
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exported to {}: {} pages processed ({} written, {} skipped, {} failed), {} images rehosted",
            self.output_root.display(),
            self.processed,
            self.written,
            self.skipped,
            self.failed,
            self.images_rehosted
        )?;
        if self.images_failed > 0 {
            write!(f, ", {} images kept remote", self.images_failed)?;
        }
        if self.images_overwritten > 0 {
            write!(f, ", {} images overwritten", self.images_overwritten)?;
        }
        Ok(())
    }
}

/// Runs a whole export into one output root.
pub struct ExportDriver {
    exporter: TreeExporter,
    output_root: PathBuf,
}

impl ExportDriver {
    pub fn new(exporter: TreeExporter, output_root: impl Into<PathBuf>) -> Self {
        Self {
            exporter,
            output_root: output_root.into(),
        }
    }

    /// Builds the HTTP client, converter and rehoster described by `config`.
    pub fn from_config(config: &ExportConfig) -> Result<Self, AppError> {
        let repo: Arc<dyn NotionRepository> = Arc::new(NotionHttpClient::from_config(config)?);
        let converter: Arc<dyn ContentConverter> =
            Arc::new(MarkdownConverter::new(Arc::clone(&repo)));
        let rehoster = MediaRehoster::from_config(config)?;

        let exporter = TreeExporter::new(repo, converter, rehoster)
            .with_root_page(config.root_page.clone())
            .with_max_depth(config.max_depth);

        Ok(Self::new(exporter, config.output_dir.clone()))
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Exports the tree. Fails when the output root cannot be created, the
    /// workspace listing breaks down, or Notion rejects the token.
    pub async fn run(&self) -> Result<ExportReport, AppError> {
        let started = Instant::now();
        log::info!("Starting export into {}", self.output_root.display());

        let stats = self.exporter.export_all(&self.output_root).await?;
        let report = ExportReport::new(&self.output_root, stats, started.elapsed());

        if report.is_clean() {
            log::info!("{} in {:.1?}", report, report.elapsed);
        } else {
            log::warn!("{} in {:.1?}; see the log for failures", report, report.elapsed);
        }
        Ok(report)
    }
}
