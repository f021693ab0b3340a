//! Fatal errors.
//!
//! Only environment problems and output failures are fatal. Missing
//! history data never surfaces here; see [`crate::Lookup`].

use std::path::PathBuf;

/// Errors that abort a snapshot run.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The corpus root does not exist or is not a directory.
    #[error("Corpus root does not exist: {}", .0.display())]
    CorpusRootMissing(PathBuf),

    /// The corpus root carries no `.git` marker.
    #[error("{} is not a git repository", .0.display())]
    InvalidCorpusRoot(PathBuf),

    /// The optional config file could not be read or parsed.
    #[error("Failed to load config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// The snapshot or an output directory could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot could not be serialized.
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}
