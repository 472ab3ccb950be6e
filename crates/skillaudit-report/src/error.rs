//! Error types for report generation

use std::path::PathBuf;
use thiserror::Error;

/// Per-report failures; each one skips only the report it belongs to
#[derive(Debug, Error)]
pub enum ReportError {
    /// The template for this report does not exist or cannot be read
    #[error("Template not found: {}", path.display())]
    TemplateMissing {
        /// Expected template location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be created
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        /// Output directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The rendered report could not be written
    #[error("Failed to write report {}: {source}", path.display())]
    OutputWrite {
        /// Report file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, ReportError>;
