//! # Nextep - Episode Selector CLI
//!
//! Resolves episode selectors (`s01e02`, `s02e10-s03e03`, `next`, `latest`,
//! ...) against a TV library spread over one or more source roots, and keeps
//! a per-user "current episode" pointer for relative navigation.
//!
//! ## Usage
//!
//! ```bash
//! # Resolve a selector to concrete episode files
//! nextep resolve "Scrubs" s02e10-s03e03 --source /mnt/tv:/mnt/tv2
//!
//! # List the recognized seasons of a show
//! nextep seasons "Scrubs" --source /mnt/tv
//!
//! # Move the watch pointer and persist it
//! nextep advance "Scrubs" next --source /mnt/tv
//! ```

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nextep::config::Config;
use nextep::library::Library;
use nextep::matcher::EpisodeMatcher;
use nextep::navigator::{Direction, Navigator};
use nextep::pointer::{JsonPointerStore, PointerStore, WatchedEpisode};
use nextep::probe::filter_existing_sources;
use nextep::selector::{Resolver, Selector};

/// Nextep - An episode selector resolution CLI
#[derive(Parser)]
#[command(
    name = "nextep",
    about = "Resolve episode selectors against a TV library",
    long_about = "Resolves selectors like s01e02, s02e10-s03e03, latest or next against season directories under one or more source roots.",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Resolve a selector to concrete episode files
    Resolve {
        /// Name of the show directory
        show: String,
        /// Selector to resolve (s01e02, s02e10-s03e03, s03, latest, next, ...)
        selector: String,
        /// Source roots to search, colon-delimited
        #[arg(long, short, env = "NEXTEP_SOURCES", value_delimiter = ':', required = true)]
        source: Vec<PathBuf>,
    },
    /// List the recognized seasons of a show
    Seasons {
        /// Name of the show directory
        show: String,
        /// Source roots to search, colon-delimited
        #[arg(long, short, env = "NEXTEP_SOURCES", value_delimiter = ':', required = true)]
        source: Vec<PathBuf>,
    },
    /// Move the watch pointer and persist it
    Advance {
        /// Name of the show directory
        show: String,
        /// Direction to move: prev, cur or next
        direction: String,
        /// Source roots to search, colon-delimited
        #[arg(long, short, env = "NEXTEP_SOURCES", value_delimiter = ':', required = true)]
        source: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nextep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match cli.command {
        Commands::Resolve {
            show,
            selector,
            source,
        } => {
            info!(
                "Resolving {:?} for show {:?} over {} source(s)",
                selector,
                show,
                source.len()
            );
            resolve_command(&show, &selector, source, &config).await
        }
        Commands::Seasons { show, source } => {
            info!("Listing seasons for show {:?}", show);
            seasons_command(&show, source, &config).await
        }
        Commands::Advance {
            show,
            direction,
            source,
        } => {
            info!("Advancing pointer for show {:?}: {}", show, direction);
            advance_command(&show, &direction, source, &config).await
        }
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Probe the configured roots and build a library over the live ones.
async fn probed_library(sources: Vec<PathBuf>, config: &Config) -> Result<Library> {
    let roots = filter_existing_sources(sources, config.probe_timeout).await;
    if roots.is_empty() {
        bail!("no source roots are reachable");
    }
    Ok(Library::new(roots))
}

async fn resolve_command(
    show: &str,
    selector: &str,
    sources: Vec<PathBuf>,
    config: &Config,
) -> Result<()> {
    let library = probed_library(sources, config).await?;
    let matcher = EpisodeMatcher::new();
    let resolver = Resolver::new(&library, &matcher, show, &config.user);

    let selector = Selector::parse(selector)?;
    let pointer = if matches!(selector, Selector::Pointer { .. }) {
        let store = JsonPointerStore::new(config.pointer_file.clone());
        store.read(show, &config.user)?
    } else {
        None
    };

    let matches = resolver.resolve(&selector, pointer.as_ref())?;
    for m in &matches {
        match &m.path {
            Some(path) => println!("{}  {}", m, path.display()),
            None => println!("{}", m),
        }
    }
    Ok(())
}

async fn seasons_command(show: &str, sources: Vec<PathBuf>, config: &Config) -> Result<()> {
    let library = probed_library(sources, config).await?;
    let Some(show_dir) = library.resolve_show_dir(show) else {
        bail!("show {:?} not found in any source root", show);
    };

    let seasons = library.list_seasons(&show_dir);
    if seasons.is_empty() {
        bail!("no season directories found for {:?}", show);
    }
    for season in &seasons {
        println!("Season {}", season.number);
    }
    Ok(())
}

async fn advance_command(
    show: &str,
    direction: &str,
    sources: Vec<PathBuf>,
    config: &Config,
) -> Result<()> {
    let library = probed_library(sources, config).await?;
    let matcher = EpisodeMatcher::new();
    let navigator = Navigator::new(&library, &matcher);

    let store = JsonPointerStore::new(config.pointer_file.clone());
    let Some(current) = store.read(show, &config.user)? else {
        bail!("no watch pointer recorded for {}/{}", config.user, show);
    };

    let direction = Direction::parse(direction);
    let Some(next) = navigator.navigate(&current, direction) else {
        bail!("no episode {} of {}", direction_label(direction), show);
    };

    let updated = WatchedEpisode::new(show, config.user.clone(), next);
    store.write(&updated)?;
    println!("{}", updated.matched);
    Ok(())
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Prev => "before the pointer",
        Direction::Cur => "at the pointer",
        Direction::Next => "after the pointer",
    }
}
