//! Release notes
//!
//! Changelog step of the release workflow: lists the commit subjects between
//! the pushed version tag and the version tag before it, and hands them to the
//! workflow as the `changelog` output.

mod changelog;
mod error;
mod version;

use crate::error::ReleaseError;
use crate::version::Version;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Derive a changelog from the commits since the previous version tag
#[derive(Parser, Debug)]
#[command(name = "release-notes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pushed tag, e.g. v1.4.0 or refs/tags/v1.4.0
    #[arg(env = "GITHUB_REF")]
    tag: String,

    /// Repository to inspect
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Workflow output file; printed to stdout when unset
    #[arg(long, env = "GITHUB_OUTPUT")]
    output: Option<PathBuf>,

    /// Print the changelog unescaped instead of as a workflow output
    #[arg(long)]
    raw: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), ReleaseError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let tag = cli.tag.strip_prefix("refs/tags/").unwrap_or(&cli.tag);
    let current: Version = tag
        .parse()
        .map_err(|_| ReleaseError::InvalidTag(tag.to_string()))?;

    let tags = changelog::list_tags(&cli.repo).await?;
    let previous = version::previous_tag(tags.iter().map(String::as_str), &current);
    match &previous {
        Some(previous) => info!("Changelog for {} since {}", tag, previous),
        None => info!("No version tag before {}, using the full history", tag),
    }

    let text = changelog::commit_log(&cli.repo, previous.as_deref(), tag).await?;

    if cli.raw {
        println!("{}", text);
        return Ok(());
    }

    let escaped = changelog::escape_output(&text);
    match &cli.output {
        Some(path) => {
            changelog::append_output(path, "changelog", &escaped)?;
            info!("Wrote changelog output to {}", path.display());
        }
        None => println!("changelog={}", escaped),
    }

    Ok(())
}
