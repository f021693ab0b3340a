//! Embedded image handling.
//!
//! Images referenced by a project's document are copied into a shared
//! assets directory and annotated with their own revision history.
//!
//! Destinations are qualified by project name: `img/a.png` in project
//! `alpha` lands at `alpha/img/a.png`, while a bare `a.png` is flattened
//! to `alpha_a.png`.

pub mod history;
pub mod refs;

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::discovery::Project;
use crate::git::Vcs;
use crate::snapshot::CopiedAsset;

pub use history::resource_history;
pub use refs::extract_image_references;

/// Copies a project's images into the assets directory.
pub struct AssetMaterializer<'a> {
    vcs: &'a dyn Vcs,
    corpus_root: &'a Path,
    assets_dir: &'a Path,
}

impl<'a> AssetMaterializer<'a> {
    pub fn new(vcs: &'a dyn Vcs, corpus_root: &'a Path, assets_dir: &'a Path) -> Self {
        Self {
            vcs,
            corpus_root,
            assets_dir,
        }
    }

    /// Copies every reference that resolves to a file in the project
    /// directory, in reference order. Missing images and copy failures
    /// are logged and skipped.
    ///
    /// The assets directory itself is expected to exist already; see
    /// [`crate::Config::create_assets_dir`].
    pub fn materialize(&self, project: &Project, references: &BTreeSet<String>) -> Vec<CopiedAsset> {
        let project_dir = project.directory(self.corpus_root);
        let repo_root = project.repo_root(self.corpus_root);

        references
            .iter()
            .filter_map(|reference| {
                let source = normalize(&project_dir.join(reference));
                if !source.is_file() {
                    tracing::warn!("Image not found: {}", reference);
                    return None;
                }

                let (destination, web_path) = self.destination(&project.name, reference);
                let versions =
                    resource_history(self.vcs, &repo_root, &project.repo_path(reference))
                        .unwrap_or_default();

                match copy_with_mtime(&source, &destination) {
                    Ok(current_size) => Some(CopiedAsset {
                        source: reference.clone(),
                        destination: web_path,
                        full_path: destination.to_string_lossy().to_string(),
                        current_size,
                        version_count: versions.len(),
                        versions,
                    }),
                    Err(e) => {
                        tracing::warn!("Could not copy image {}: {}", reference, e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Filesystem destination and assets-relative web path for a reference.
    fn destination(&self, project_name: &str, reference: &str) -> (PathBuf, String) {
        let reference = Path::new(reference);
        let file_name = reference
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let subdirs: Vec<String> = reference
            .parent()
            .map(|dir| {
                dir.components()
                    .filter_map(|c| match c {
                        Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if subdirs.is_empty() {
            let flat = format!("{project_name}_{file_name}");
            return (self.assets_dir.join(&flat), flat);
        }

        let mut destination = self.assets_dir.join(project_name);
        let mut web_parts = vec![project_name.to_string()];
        for part in subdirs {
            destination.push(&part);
            web_parts.push(part);
        }
        destination.push(&file_name);
        web_parts.push(file_name);

        (destination, web_parts.join("/"))
    }
}

/// Copies bytes and permissions, then carries over the modification time.
/// Returns the size of the copied file.
fn copy_with_mtime(source: &Path, destination: &Path) -> io::Result<u64> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    let size = fs::copy(source, destination)?;

    let modified = fs::metadata(source)?.modified()?;
    fs::File::options()
        .write(true)
        .open(destination)?
        .set_modified(modified)?;

    Ok(size)
}

/// Lexically resolves `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
