//! Command-line interface for Strata.
//!
//! Resolves the run configuration from arguments, processes each
//! discovered project in turn while printing a progress summary, and
//! writes the snapshot.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use strata_cli::discovery::find_projects;
use strata_cli::git::GitCli;
use strata_cli::snapshot::{ProjectRecord, Snapshot, SnapshotBuilder};
use strata_cli::Config;

/// Positional arguments and options of the `strata` command.
#[derive(clap::Args)]
pub struct Args {
    /// Corpus root (defaults to the current directory)
    #[arg(value_name = "CORPUS_ROOT")]
    #[arg(long_help = "Top-level directory of the corpus. It must be a git\n\
        repository; projects are discovered under its projects and\n\
        external-projects directories.")]
    pub corpus_root: Option<PathBuf>,

    /// Snapshot file to write (defaults to dist/temporal-data.json)
    #[arg(value_name = "OUTPUT_FILE")]
    #[arg(long_help = "Path of the JSON snapshot. Relative paths resolve\n\
        against the corpus root. Images are copied into an assets\n\
        directory next to this file.")]
    pub output_file: Option<PathBuf>,

    /// File name that marks a project directory (defaults to click.md)
    #[arg(long, value_name = "NAME")]
    pub document: Option<String>,
}

/// Executes a snapshot run.
///
/// Fails only if the corpus root is invalid or the snapshot or its assets
/// directory cannot be written; per-project problems are reported as
/// warnings.
pub fn run(args: Args) -> Result<()> {
    let corpus_root = match args.corpus_root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let mut config = Config::load(&corpus_root)?;
    if let Some(output_file) = args.output_file {
        config.output_file = output_file;
    }
    if let Some(document) = args.document {
        config.document_name = document;
    }
    config.create_assets_dir()?;

    println!(
        "{} {}",
        "Generating temporal data for repository:".bold(),
        config.corpus_root.display()
    );

    let projects = find_projects(&config);
    if projects.is_empty() {
        println!(
            "{}",
            format!(
                "Warning: No projects with {} files found",
                config.document_name
            )
            .yellow()
        );
        println!("{}", "Creating empty data structure...".dimmed());
    }

    let git = GitCli::new(config.git_program.clone());
    let builder = SnapshotBuilder::new(&config, &git);

    let mut records = Vec::with_capacity(projects.len());
    for project in &projects {
        println!();
        println!("{} {}", "Processing project:".bold(), project.name.cyan());
        let record = builder.build_project(project);
        print_summary(&record, &config.document_name, &config.assets_dir_name);
        records.push(record);
    }

    let snapshot = Snapshot::new(records);
    let output_path = config.output_path();
    snapshot.write(&output_path)?;

    println!();
    println!(
        "{} {}",
        "Temporal data written to:".bold(),
        output_path.display()
    );
    println!("Total projects processed: {}", snapshot.projects.len());
    println!();
    println!("{}", "Done!".green());

    Ok(())
}

fn print_summary(record: &ProjectRecord, document_name: &str, assets_dir_name: &str) {
    println!(
        "  Found {} total commits in project repository",
        record.commits.len()
    );
    println!(
        "  Found {} commits for {}",
        record.document.commits.len(),
        document_name
    );
    println!(
        "  Extracted blame history for {} lines",
        record.document.blame_history.len()
    );
    for image in &record.document.images {
        println!(
            "  Copied image: {} -> {}/{} ({} versions)",
            image.source,
            assets_dir_name,
            image.destination,
            image.version_count
        );
    }
}
