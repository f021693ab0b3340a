//! Revision history of a single resource.

use std::path::Path;

use crate::git::{History, Vcs};
use crate::lookup::Lookup;
use crate::snapshot::ResourceHistoryEntry;

/// Returns the commits that touched `path` with the blob size at each.
///
/// `path` is relative to `repo_root`. The result is newest first and is
/// `Absent` when the resource is not currently on disk. A revision whose
/// blob cannot be read (typically a rename boundary `--follow` did not
/// bridge) is kept with a size of 0.
pub fn resource_history(
    vcs: &dyn Vcs,
    repo_root: &Path,
    path: &str,
) -> Lookup<Vec<ResourceHistoryEntry>> {
    if !repo_root.join(path).exists() {
        return Lookup::Absent;
    }

    let history = History::new(vcs, repo_root);
    let entries = history
        .path_commits(path)
        .into_iter()
        .map(|commit| {
            let size = history
                .blob(&commit.sha, path)
                .map(|blob| blob.len() as u64)
                .unwrap_or_default();
            ResourceHistoryEntry::from_commit(commit, size)
        })
        .collect();

    Lookup::Found(entries)
}
