//! Snapshot data model
//!
//! These types are the serialized shape of a snapshot. Field names are
//! camelCase on the wire because the snapshot is consumed by web tooling.

use serde::{Deserialize, Serialize};

/// Schema version written into every snapshot.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// A single commit as reported by the history tool.
///
/// Commits keep the tool's traversal order (newest first) and are never
/// re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full 40-character commit hash
    pub sha: String,

    /// Author display name
    pub author: String,

    /// Author email
    pub email: String,

    /// Author date, ISO 8601 with offset
    pub date: String,

    /// First line of the commit message
    pub message: String,

    /// Paths touched by the commit, relative to the repository root.
    /// Only populated for whole-repository timelines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

/// Authorship of one physical line of the document's current revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAttribution {
    /// 1-based line number in the current revision
    pub line_start: u32,

    /// Always equal to `line_start`
    pub line_end: u32,

    /// Commit that last touched the line
    pub commit: String,

    pub author: String,

    pub email: String,

    /// Author time in UTC, e.g. `2024-03-01T12:00:00Z`
    pub date: String,

    /// Raw line text without the trailing newline
    pub content: String,

    /// Line number in the commit that introduced the line
    pub original_line_start: u32,
}

/// One revision of an embedded resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHistoryEntry {
    pub sha: String,
    pub author: String,
    pub email: String,
    pub date: String,
    pub message: String,

    /// Byte length of the blob at this revision, 0 if it could not be read
    pub size: u64,
}

impl ResourceHistoryEntry {
    /// Builds an entry from a commit and the blob size at that commit.
    pub fn from_commit(commit: CommitRecord, size: u64) -> Self {
        Self {
            sha: commit.sha,
            author: commit.author,
            email: commit.email,
            date: commit.date,
            message: commit.message,
            size,
        }
    }
}

/// A resource copied into the assets directory together with its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopiedAsset {
    /// Reference exactly as written in the document
    pub source: String,

    /// Destination relative to the assets directory, forward slashes
    pub destination: String,

    /// Absolute destination path
    pub full_path: String,

    /// Size of the file that was copied
    pub current_size: u64,

    /// Revisions of the resource, newest first
    pub versions: Vec<ResourceHistoryEntry>,

    pub version_count: usize,
}

/// History of a project's designated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Document path relative to the corpus root
    pub path: String,

    /// Commits that touched the document, newest first
    pub commits: Vec<CommitRecord>,

    /// One attribution per current line, in document order
    pub blame_history: Vec<LineAttribution>,

    /// The document as it is on disk
    pub current_content: String,

    /// Images the document embeds that were found and copied
    pub images: Vec<CopiedAsset>,
}

/// Everything known about one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Last component of the project path
    pub name: String,

    /// Project directory relative to the corpus root, forward slashes
    pub path: String,

    /// Full timeline of the project's repository, with touched files
    pub commits: Vec<CommitRecord>,

    #[serde(rename = "clickFile")]
    pub document: DocumentRecord,
}

/// Generation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// UTC generation time with a `Z` suffix
    pub generated_at: String,

    pub version: String,
}

/// The complete output of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Projects in discovery order
    pub projects: Vec<ProjectRecord>,

    pub metadata: SnapshotMetadata,
}
