use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "strata")]
#[command(version)]
#[command(about = "Temporal history for a git-tracked document corpus")]
#[command(long_about = "Strata reconstructs the history of every project in a corpus:\n\
    the commit timeline, line-level authorship of each project's document,\n\
    and the revision history of every image the document embeds.\n\n\
    The result is one JSON snapshot plus a directory of copied images.")]
#[command(after_help = "EXAMPLES:\n    \
    strata                               Snapshot the current directory\n    \
    strata ~/corpus                      Snapshot another corpus\n    \
    strata ~/corpus site/data.json       Write the snapshot elsewhere\n    \
    strata --document index.md           Use a different project document")]
struct Cli {
    #[command(flatten)]
    args: cli::Args,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "strata_cli=debug,strata=debug"
    } else {
        "strata_cli=info,strata=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    cli::run(cli.args)
}
