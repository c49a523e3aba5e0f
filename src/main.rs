//! Shoreline main entry point
//!
//! This is the command-line interface for the Shoreline crawler.

use clap::{ArgGroup, Parser};
use shoreline::config::{load_config, validate, Config};
use shoreline::crawler::{build_controller, HttpFetcher};
use shoreline::output::{format_lookup, load_statistics, print_statistics};
use shoreline::storage::{open_storage, FrontierStore, SqliteStorage};
use shoreline::{try_canonicalize, Clock, ShorelineError, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Shoreline: a resumable web crawler
///
/// Shoreline keeps its frontier in SQLite. Start it with a seed URL, or with no
/// operation to resume from wherever the previous run stopped.
#[derive(Parser, Debug)]
#[command(name = "shoreline")]
#[command(version)]
#[command(about = "A resumable single-stream web crawler", long_about = None)]
#[command(group(ArgGroup::new("operation").args(["get_url", "all", "links", "stats"])))]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(short = 'u', long = "url", value_name = "URL", conflicts_with = "operation")]
    url: Option<String>,

    /// Only crawl URLs whose host ends with this suffix
    #[arg(short = 'f', long, value_name = "SUFFIX")]
    filter_hostname: Option<String>,

    /// Print the stored record of a URL and exit
    #[arg(short = 'g', long, value_name = "URL")]
    get_url: Option<String>,

    /// Print every stored URL and exit
    #[arg(short = 'a', long)]
    all: bool,

    /// Print the links recorded for a URL and exit
    #[arg(long, value_name = "URL")]
    links: Option<String>,

    /// Show frontier statistics and exit
    #[arg(long)]
    stats: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database file, overriding the configuration
    #[arg(long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_settings(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let database_path = Path::new(&config.output.database_path);
    tracing::debug!("Using database {}", database_path.display());
    let storage = match open_storage(database_path, clock.clone()) {
        Ok(storage) => storage,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    // Every branch hands the storage back so it is closed on all paths
    let (storage, result) = if let Some(url) = &cli.get_url {
        let result = handle_get_url(&storage, url);
        (storage, result)
    } else if cli.all {
        let result = handle_all(&storage);
        (storage, result)
    } else if let Some(url) = &cli.links {
        let result = handle_links(&storage, url);
        (storage, result)
    } else if cli.stats {
        let result = handle_stats(&storage);
        (storage, result)
    } else {
        handle_crawl(&config, cli.url.as_deref(), storage, clock).await
    };

    if let Err(e) = storage.close() {
        tracing::error!("Failed to close database: {}", e);
    }

    if let Err(e) = result {
        tracing::error!("{}", e);
        return Err(e.into());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shoreline=info,warn"),
            1 => EnvFilter::new("shoreline=debug,info"),
            2 => EnvFilter::new("shoreline=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
fn load_settings(cli: &Cli) -> Result<Config, ShorelineError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(filter) = &cli.filter_hostname {
        config.crawler.set_filter_hostname(Some(filter.clone()));
    }

    if let Some(database) = &cli.database {
        config.output.database_path = database.display().to_string();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles --get-url: prints one record
fn handle_get_url(storage: &SqliteStorage, url: &str) -> Result<(), ShorelineError> {
    // Records are keyed by canonical URL; fall back to the input as typed
    let key = try_canonicalize(url, None, None).unwrap_or_else(|_| url.to_string());

    let record = storage.get_url(&key)?;
    println!("{}", format_lookup(&key, record.as_ref()));

    Ok(())
}

/// Handles --all: prints every stored URL
fn handle_all(storage: &SqliteStorage) -> Result<(), ShorelineError> {
    for url in storage.list_all_urls() {
        println!("{}", url?);
    }
    Ok(())
}

/// Handles --links: prints the links recorded for a page
fn handle_links(storage: &SqliteStorage, url: &str) -> Result<(), ShorelineError> {
    let key = try_canonicalize(url, None, None).unwrap_or_else(|_| url.to_string());

    for link in storage.outgoing_links(&key)? {
        println!("{}", link.link);
    }
    Ok(())
}

/// Handles --stats: shows statistics from the database
fn handle_stats(storage: &SqliteStorage) -> Result<(), ShorelineError> {
    let stats = load_statistics(storage)?;
    print_statistics(&stats);
    Ok(())
}

/// Handles the main crawl operation
///
/// Runs until Ctrl-C. Returns the storage alongside the outcome so the caller
/// can close it.
async fn handle_crawl(
    config: &Config,
    seed: Option<&str>,
    storage: SqliteStorage,
    clock: Arc<dyn Clock>,
) -> (SqliteStorage, Result<(), ShorelineError>) {
    let fetcher = match HttpFetcher::from_config(
        &config.user_agent,
        Duration::from_secs(config.crawler.request_timeout),
    ) {
        Ok(fetcher) => fetcher,
        Err(e) => return (storage, Err(e.into())),
    };

    let mut controller = build_controller(config, storage, Box::new(fetcher), clock);

    if let Some(filter) = &config.crawler.filter_hostname {
        tracing::info!("Restricting crawl to hosts ending with '{}'", filter);
    }

    if let Err(e) = controller.start(seed) {
        return (controller.into_store(), Err(e));
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping");
            trigger.cancel();
        }
    });

    controller.run(&cancel).await;
    (controller.into_store(), Ok(()))
}
