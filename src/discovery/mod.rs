//! Project discovery.
//!
//! A project is a directory holding the designated document. Projects
//! live in two places under the corpus root:
//!
//! - the projects directory, tracked by the corpus repository itself;
//! - the external projects directory, whose children are independent
//!   repositories checked out inside the corpus.
//!
//! The two kinds resolve repository paths differently, which is captured
//! by [`ProjectKind`].

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;

/// Where a project's history lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    /// Tracked by the corpus repository. Paths are prefixed with the
    /// project's sub-path and resolved from the corpus root.
    Internal,
    /// Its own repository. Paths are resolved from the project directory.
    External,
}

/// A discovered project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Last component of `path`
    pub name: String,
    /// Directory relative to the corpus root, forward slashes
    pub path: String,
    pub kind: ProjectKind,
}

impl Project {
    fn new(corpus_root: &Path, dir: &Path, kind: ProjectKind) -> Option<Self> {
        let path = relative_slash_path(corpus_root, dir)?;
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.clone());
        Some(Self { name, path, kind })
    }

    /// The project directory on disk.
    pub fn directory(&self, corpus_root: &Path) -> PathBuf {
        corpus_root.join(&self.path)
    }

    /// Working directory for history queries.
    pub fn repo_root(&self, corpus_root: &Path) -> PathBuf {
        match self.kind {
            ProjectKind::Internal => corpus_root.to_path_buf(),
            ProjectKind::External => self.directory(corpus_root),
        }
    }

    /// Path of a project-relative file as seen from [`Project::repo_root`].
    pub fn repo_path(&self, relative: &str) -> String {
        match self.kind {
            ProjectKind::Internal => format!("{}/{}", self.path, relative),
            ProjectKind::External => relative.to_string(),
        }
    }

    /// Path of the document relative to the corpus root.
    pub fn document_path(&self, document_name: &str) -> String {
        format!("{}/{}", self.path, document_name)
    }
}

/// Finds every project, internal ones first.
pub fn find_projects(config: &Config) -> Vec<Project> {
    let root = &config.corpus_root;
    let mut projects = find_internal_projects(
        root,
        &root.join(&config.projects_dir),
        &config.document_name,
    );
    projects.extend(find_external_projects(
        root,
        &root.join(&config.external_projects_dir),
        &config.document_name,
    ));
    tracing::info!("Discovered {} projects under {:?}", projects.len(), root);
    projects
}

/// Every directory under `projects_dir` (itself included) that holds
/// the document.
pub fn find_internal_projects(
    corpus_root: &Path,
    projects_dir: &Path,
    document_name: &str,
) -> Vec<Project> {
    if !projects_dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(projects_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {:?}: {}", projects_dir, e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| entry.path().join(document_name).is_file())
        .filter_map(|entry| Project::new(corpus_root, entry.path(), ProjectKind::Internal))
        .inspect(|project| tracing::debug!("Found internal project {}", project.path))
        .collect()
}

/// One project per child repository of `external_dir`: the child itself
/// when the document sits at its root, otherwise the first directory
/// below it that holds the document.
pub fn find_external_projects(
    corpus_root: &Path,
    external_dir: &Path,
    document_name: &str,
) -> Vec<Project> {
    let Ok(entries) = fs::read_dir(external_dir) else {
        return Vec::new();
    };

    let mut children: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    children.sort();

    children
        .iter()
        .filter_map(|child| {
            let dir = if child.join(document_name).is_file() {
                Some(child.clone())
            } else {
                first_directory_with(child, document_name)
            }?;
            Project::new(corpus_root, &dir, ProjectKind::External)
        })
        .inspect(|project| tracing::debug!("Found external project {}", project.path))
        .collect()
}

fn first_directory_with(root: &Path, document_name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .find(|entry| entry.path().join(document_name).is_file())
        .map(|entry| entry.into_path())
}

/// `dir` relative to `root`, joined with forward slashes.
fn relative_slash_path(root: &Path, dir: &Path) -> Option<String> {
    let relative = dir.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}
