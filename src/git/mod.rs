//! Git integration.
//!
//! Provides the history queries a snapshot needs: whole-repository and
//! per-path commit logs, the files each commit touched, line-level blame
//! of a document, and blob contents at a revision. Queries go through
//! the [`Vcs`] trait so they can run against the real `git` binary or a
//! scripted stand-in.

pub mod blame;
pub mod log;
pub mod runner;

use std::path::Path;

use crate::lookup::Lookup;
use crate::snapshot::{CommitRecord, LineAttribution};

pub use runner::{GitCli, Vcs};

/// History queries against one repository root.
///
/// Paths passed to the queries are relative to `root`, which is also the
/// working directory of every invocation.
pub struct History<'a> {
    vcs: &'a dyn Vcs,
    root: &'a Path,
}

impl<'a> History<'a> {
    pub fn new(vcs: &'a dyn Vcs, root: &'a Path) -> Self {
        Self { vcs, root }
    }

    /// Returns the repository root the queries run in.
    pub fn root(&self) -> &Path {
        self.root
    }

    /// Every commit reachable from any ref, each with the files it touched.
    pub fn all_commits(&self) -> Vec<CommitRecord> {
        let output = self
            .vcs
            .text(&["log", log::LOG_FORMAT, "--all"], self.root)
            .unwrap_or_default();

        log::parse_log(&output)
            .into_iter()
            .map(|mut commit| {
                commit.files = Some(self.files_touched(&commit.sha));
                commit
            })
            .collect()
    }

    /// Commits that touched `path`, following renames.
    pub fn path_commits(&self, path: &str) -> Vec<CommitRecord> {
        let output = self
            .vcs
            .text(&["log", log::LOG_FORMAT, "--follow", "--", path], self.root)
            .unwrap_or_default();

        log::parse_log(&output)
    }

    /// Paths changed by a single commit, including a root commit.
    pub fn files_touched(&self, sha: &str) -> Vec<String> {
        let output = self
            .vcs
            .text(
                &["diff-tree", "--no-commit-id", "--name-only", "-r", "--root", sha],
                self.root,
            )
            .unwrap_or_default();

        log::parse_file_list(&output)
    }

    /// Line-level attribution of `path` at HEAD.
    ///
    /// Absent when the file is not on disk. The stream is not trimmed so
    /// whitespace at the end of the last line survives.
    pub fn blame(&self, path: &str) -> Lookup<Vec<LineAttribution>> {
        if !self.root.join(path).exists() {
            return Lookup::Absent;
        }

        self.vcs
            .bytes(&["blame", "--line-porcelain", path], self.root)
            .map(|output| blame::parse_line_porcelain(&String::from_utf8_lossy(&output)))
    }

    /// Raw content of `path` as committed in `sha`.
    ///
    /// The path is resolved relative to the repository root given to
    /// [`History::new`], not to the top of the enclosing git repository.
    pub fn blob(&self, sha: &str, path: &str) -> Lookup<Vec<u8>> {
        let spec = format!("{sha}:./{path}");
        self.vcs.bytes(&["show", spec.as_str()], self.root)
    }
}
