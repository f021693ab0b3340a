//! Strata - temporal history for document corpora
//!
//! Strata walks a git-tracked corpus of projects, each anchored by a
//! designated document, and reconstructs its history: the commit
//! timeline, line-level authorship of the document, and the revision
//! history of every image the document embeds. Everything is written as
//! one JSON snapshot next to a flattened assets directory.

pub mod assets;
pub mod config;
pub mod discovery;
pub mod error;
pub mod git;
pub mod lookup;
pub mod snapshot;

pub use config::Config;
pub use error::SnapshotError;
pub use lookup::Lookup;
