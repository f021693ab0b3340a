//! Snapshot assembly.
//!
//! Builds one [`ProjectRecord`] per discovered project and writes the
//! aggregate as pretty-printed JSON. Each project is processed on its
//! own: a failed query only leaves that project's fields empty.

pub mod models;

use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};

use crate::assets::{extract_image_references, AssetMaterializer};
use crate::config::Config;
use crate::discovery::Project;
use crate::error::SnapshotError;
use crate::git::{History, Vcs};

pub use models::*;

/// Builds project records from history queries.
pub struct SnapshotBuilder<'a> {
    config: &'a Config,
    vcs: &'a dyn Vcs,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(config: &'a Config, vcs: &'a dyn Vcs) -> Self {
        Self { config, vcs }
    }

    /// Reconstructs the full history of one project.
    pub fn build_project(&self, project: &Project) -> ProjectRecord {
        tracing::info!("Building history for project {}", project.name);
        let corpus_root = &self.config.corpus_root;
        let document_name = &self.config.document_name;
        let repo_root = project.repo_root(corpus_root);
        let history = History::new(self.vcs, &repo_root);

        let document_repo_path = project.repo_path(document_name);
        let commits = history.all_commits();
        let document_commits = history.path_commits(&document_repo_path);
        let blame_history = history.blame(&document_repo_path).unwrap_or_default();

        let document_path = project.document_path(document_name);
        let current_content = read_document(&corpus_root.join(&document_path));

        let references = extract_image_references(&current_content);
        let assets_dir = self.config.assets_dir();
        let images = AssetMaterializer::new(self.vcs, corpus_root, &assets_dir)
            .materialize(project, &references);

        ProjectRecord {
            name: project.name.clone(),
            path: project.path.clone(),
            commits,
            document: DocumentRecord {
                path: document_path,
                commits: document_commits,
                blame_history,
                current_content,
                images,
            },
        }
    }

    /// Builds records for all projects, in order.
    pub fn build(&self, projects: &[Project]) -> Snapshot {
        Snapshot::new(projects.iter().map(|p| self.build_project(p)).collect())
    }
}

impl Snapshot {
    /// Wraps project records with generation metadata stamped now.
    pub fn new(projects: Vec<ProjectRecord>) -> Self {
        Self {
            projects,
            metadata: SnapshotMetadata {
                generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
                version: SCHEMA_VERSION.to_string(),
            },
        }
    }

    /// Writes the snapshot as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn write(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SnapshotError::WriteOutput {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SnapshotError::WriteOutput {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Wrote {} projects to {:?}", self.projects.len(), path);
        Ok(())
    }
}

/// Reads the document, or returns an empty string if it is unreadable.
fn read_document(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!("Could not read document {:?}: {}", path, e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::ProjectKind;
    use crate::git::log::LOG_FORMAT;
    use crate::git::runner::fake::FakeVcs;
    use tempfile::tempdir;

    const SHA_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const SHA_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn config_for(root: &Path) -> Config {
        Config {
            corpus_root: root.to_path_buf(),
            ..Config::default()
        }
    }

    fn blame_group(sha: &str, line: u32, content: &str) -> String {
        format!(
            "{sha} {line} {line} 1\nauthor Ada\nauthor-mail <ada@example.com>\nauthor-time 1700000000\n\t{content}\n"
        )
    }

    #[test]
    fn test_build_internal_project() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let project_dir = root.join("projects/alpha");
        fs::create_dir_all(project_dir.join("img")).unwrap();
        fs::write(project_dir.join("click.md"), "# Alpha\n\n![shot](img/a.png)\n").unwrap();
        fs::write(project_dir.join("img/a.png"), b"png!").unwrap();

        let vcs = FakeVcs::new()
            .respond(
                &["log", LOG_FORMAT, "--all"],
                format!(
                    "{SHA_B}|Ada|ada@example.com|2024-02-01T00:00:00Z|Add image\n\
                     {SHA_A}|Ada|ada@example.com|2024-01-01T00:00:00Z|Start"
                ),
            )
            .respond(
                &["diff-tree", "--no-commit-id", "--name-only", "-r", "--root", SHA_B],
                "projects/alpha/click.md\nprojects/alpha/img/a.png",
            )
            .respond(
                &["diff-tree", "--no-commit-id", "--name-only", "-r", "--root", SHA_A],
                "projects/alpha/click.md",
            )
            .respond(
                &["log", LOG_FORMAT, "--follow", "--", "projects/alpha/click.md"],
                format!(
                    "{SHA_B}|Ada|ada@example.com|2024-02-01T00:00:00Z|Add image\n\
                     {SHA_A}|Ada|ada@example.com|2024-01-01T00:00:00Z|Start"
                ),
            )
            .respond(
                &["blame", "--line-porcelain", "projects/alpha/click.md"],
                [
                    blame_group(SHA_A, 1, "# Alpha"),
                    blame_group(SHA_A, 2, ""),
                    blame_group(SHA_B, 3, "![shot](img/a.png)"),
                ]
                .concat(),
            )
            .respond(
                &["log", LOG_FORMAT, "--follow", "--", "projects/alpha/img/a.png"],
                format!("{SHA_B}|Ada|ada@example.com|2024-02-01T00:00:00Z|Add image"),
            )
            .respond(&["show", format!("{SHA_B}:./projects/alpha/img/a.png").as_str()], b"png!");

        let config = config_for(root);
        let project = Project {
            name: "alpha".to_string(),
            path: "projects/alpha".to_string(),
            kind: ProjectKind::Internal,
        };
        let record = SnapshotBuilder::new(&config, &vcs).build_project(&project);

        assert_eq!(record.name, "alpha");
        assert_eq!(record.commits.len(), 2);
        assert_eq!(record.commits[0].files.as_ref().map(Vec::len), Some(2));
        assert_eq!(record.document.path, "projects/alpha/click.md");
        assert_eq!(record.document.commits.len(), 2);
        assert_eq!(record.document.blame_history.len(), 3);
        assert_eq!(record.document.blame_history[2].commit, SHA_B);
        assert_eq!(record.document.images.len(), 1);
        assert_eq!(record.document.images[0].destination, "alpha/img/a.png");
        assert_eq!(record.document.images[0].versions[0].size, 4);
        assert!(root.join("dist/assets/alpha/img/a.png").is_file());
    }

    #[test]
    fn test_failed_queries_leave_project_empty() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("external-projects/site")).unwrap();
        fs::write(root.join("external-projects/site/click.md"), "just text\n").unwrap();

        let vcs = FakeVcs::new();
        let config = config_for(root);
        let project = Project {
            name: "site".to_string(),
            path: "external-projects/site".to_string(),
            kind: ProjectKind::External,
        };
        let record = SnapshotBuilder::new(&config, &vcs).build_project(&project);

        assert!(record.commits.is_empty());
        assert!(record.document.commits.is_empty());
        assert!(record.document.blame_history.is_empty());
        assert_eq!(record.document.current_content, "just text\n");
        assert!(record.document.images.is_empty());
        assert!(vcs
            .calls
            .borrow()
            .iter()
            .any(|call| call == "blame --line-porcelain click.md"));
    }

    #[test]
    fn test_write_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/data.json");

        let snapshot = Snapshot::new(Vec::new());
        snapshot.write(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["projects"], serde_json::json!([]));
        assert_eq!(value["metadata"]["version"], SCHEMA_VERSION);
        assert!(value["metadata"]["generatedAt"]
            .as_str()
            .unwrap()
            .ends_with('Z'));
    }

    #[test]
    fn test_build_keeps_discovery_order() {
        let dir = tempdir().unwrap();
        let vcs = FakeVcs::new();
        let config = config_for(dir.path());
        let projects: Vec<Project> = ["b", "a"]
            .iter()
            .map(|name| Project {
                name: name.to_string(),
                path: format!("projects/{name}"),
                kind: ProjectKind::Internal,
            })
            .collect();

        let snapshot = SnapshotBuilder::new(&config, &vcs).build(&projects);
        let names: Vec<&str> = snapshot.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
