// src/output/writer.rs
//! Executes output operations by performing actual I/O.
//!
//! This module is the only place where document and directory writes occur,
//! keeping the rest of the codebase pure and testable.

use crate::error::AppError;
use std::fs;
use std::path::Path;

/// Writes a document, replacing whatever was at `path`.
///
/// Returns the number of bytes written.
pub fn write_document(path: &Path, content: &str) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if path.is_dir() {
        return Err(AppError::PathError(format!(
            "Cannot write document, a directory is in the way: {}",
            path.display()
        )));
    }

    fs::write(path, content)?;

    log::info!("Wrote file: {}", path.display());
    Ok(content.len())
}

/// Creates a directory and its parents. Succeeds if it already exists.
pub fn ensure_directory(path: &Path) -> Result<(), AppError> {
    if path.exists() {
        if path.is_dir() {
            log::debug!("Directory already exists: {}", path.display());
            return Ok(());
        } else {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("Path exists but is not a directory: {}", path.display()),
            )));
        }
    }

    // A sibling may create the same directory between the check and here.
    fs::create_dir_all(path)?;
    log::debug!("Created directory: {}", path.display());
    Ok(())
}
