//! Error types for corpus loading

use std::path::PathBuf;
use thiserror::Error;

/// Fatal corpus errors; they abort the run before any analysis starts
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The skills directory does not exist
    #[error("Skills directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The skills path exists but is not a directory
    #[error("Skills path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The directory listing could not be read
    #[error("Failed to read skills directory {}: {source}", path.display())]
    Unreadable {
        /// Directory being listed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, CorpusError>;
