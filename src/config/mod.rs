//! Configuration management
//!
//! A run is driven by an explicit [`Config`]. Defaults match the usual
//! corpus layout; an optional `.strata.yaml` at the corpus root can
//! override them, and command-line arguments override the file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SnapshotError;

/// Name of the optional config file at the corpus root.
pub const CONFIG_FILE_NAME: &str = ".strata.yaml";

/// Settings for one snapshot run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Top-level directory under which projects are discovered
    #[serde(skip)]
    pub corpus_root: PathBuf,

    /// Snapshot file; relative paths resolve against the corpus root
    pub output_file: PathBuf,

    /// File name that marks a project directory
    pub document_name: String,

    /// Directory of projects tracked by the corpus repository
    pub projects_dir: String,

    /// Directory whose children are independent repositories
    pub external_projects_dir: String,

    /// Directory created next to the snapshot for copied images
    pub assets_dir_name: String,

    /// Git executable to invoke
    pub git_program: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::from("."),
            output_file: PathBuf::from("dist/temporal-data.json"),
            document_name: "click.md".to_string(),
            projects_dir: "projects".to_string(),
            external_projects_dir: "external-projects".to_string(),
            assets_dir_name: "assets".to_string(),
            git_program: "git".to_string(),
        }
    }
}

impl Config {
    /// Loads the config for a corpus.
    ///
    /// The root is canonicalized so that every derived path is absolute,
    /// and must be a git repository before `.strata.yaml` is consulted.
    /// The file is applied when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist, is not a git
    /// repository, or the config file cannot be parsed.
    pub fn load(corpus_root: &Path) -> Result<Self, SnapshotError> {
        let root = fs::canonicalize(corpus_root)
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| SnapshotError::CorpusRootMissing(corpus_root.to_path_buf()))?;
        require_git_marker(&root)?;

        let config_path = root.join(CONFIG_FILE_NAME);
        let mut config = if config_path.is_file() {
            let raw = fs::read_to_string(&config_path).map_err(|e| SnapshotError::Config {
                path: config_path.clone(),
                message: e.to_string(),
            })?;
            Self::from_yaml(&raw).map_err(|message| SnapshotError::Config {
                path: config_path.clone(),
                message,
            })?
        } else {
            Self::default()
        };

        config.corpus_root = root;
        Ok(config)
    }

    /// Parses config overrides from YAML.
    pub fn from_yaml(raw: &str) -> Result<Self, String> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(raw).map_err(|e| e.to_string())
    }

    /// Checks that the corpus root is a git repository.
    ///
    /// A `.git` directory or a `.git` file (worktrees, submodules) both
    /// count.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        require_git_marker(&self.corpus_root)
    }

    /// Absolute path of the snapshot file.
    pub fn output_path(&self) -> PathBuf {
        if self.output_file.is_absolute() {
            self.output_file.clone()
        } else {
            self.corpus_root.join(&self.output_file)
        }
    }

    /// Directory that receives copied images, beside the snapshot.
    pub fn assets_dir(&self) -> PathBuf {
        let output = self.output_path();
        output
            .parent()
            .map(|dir| dir.join(&self.assets_dir_name))
            .unwrap_or_else(|| PathBuf::from(&self.assets_dir_name))
    }

    /// Creates the assets directory and returns its path.
    ///
    /// # Errors
    ///
    /// Returns `WriteOutput` if the directory cannot be created.
    pub fn create_assets_dir(&self) -> Result<PathBuf, SnapshotError> {
        let dir = self.assets_dir();
        fs::create_dir_all(&dir).map_err(|source| SnapshotError::WriteOutput {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }
}

fn require_git_marker(root: &Path) -> Result<(), SnapshotError> {
    if !root.join(".git").exists() {
        return Err(SnapshotError::InvalidCorpusRoot(root.to_path_buf()));
    }
    Ok(())
}
