// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Path and name derivation are pure functions; `writer` performs the I/O.

mod paths;
mod writer;

// Re-export the public interface
pub use paths::{child_link, document_file_name, sanitize_title, ExportTarget};
pub use writer::{ensure_directory, write_document};
