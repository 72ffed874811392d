mod cli;
mod config;
mod domain;
mod infra;
mod parser;
mod workflows;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use cli::{Cli, LogLevel, Mode};
use config::AppConfig;
use infra::cache::CachedCatalog;
use infra::tmdb::TmdbClient;
use infra::watcher::DirectoryWatcher;
use workflows::organizer::{FileOrganizer, Summary};
use workflows::scanner;

type Organizer = FileOrganizer<CachedCatalog<TmdbClient>>;

fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::resolve(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    init_logging(config.log_level);

    if let Err(e) = run(config) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn init_logging(log_level: LogLevel) {
    // RUST_LOG wins over the configured level
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("chiprr={}", log_level.as_str()));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

fn run(config: AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let client = TmdbClient::new(config.tmdb_token.clone())?;
    let catalog = CachedCatalog::load(client, &config.cache_file_path);
    let organizer = FileOrganizer::new(catalog, &config.input_directory, &config.sorted_directory);

    info!(
        input = %config.input_directory.display(),
        sorted = %config.sorted_directory.display(),
        mode = ?config.mode,
        "starting chiprr"
    );

    match config.mode {
        Mode::Execute => runtime.block_on(execute(&organizer)),
        Mode::Watch => runtime.block_on(watch(&organizer)),
    }
}

async fn execute(organizer: &Organizer) -> Result<()> {
    let files = scanner::collect_files(organizer.input_directory())?;
    info!(count = files.len(), "found files in input directory");

    let summary = organizer.organize_all(files).await;
    log_summary(&summary);
    save_cache(organizer);

    Ok(())
}

async fn watch(organizer: &Organizer) -> Result<()> {
    let mut watcher = DirectoryWatcher::start(organizer.input_directory())?;

    loop {
        tokio::select! {
            arrived = watcher.next_arrived() => {
                let Some(path) = arrived else {
                    warn!("file watcher stopped");
                    break;
                };
                let summary = organizer.organize_all(expand_arrived(path)).await;
                log_summary(&summary);
                save_cache(organizer);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    save_cache(organizer);
    Ok(())
}

/// A directory that appears (created or moved in) stands for every file
/// inside it.
fn expand_arrived(path: PathBuf) -> Vec<PathBuf> {
    scanner::expand_path(&path).unwrap_or_else(|e| {
        error!(path = %path.display(), "{e:#}");
        Vec::new()
    })
}

fn log_summary(summary: &Summary) {
    info!(
        linked = summary.linked,
        already_linked = summary.already_linked,
        skipped = summary.skipped,
        failed = summary.failed,
        "finished processing files"
    );
}

fn save_cache(organizer: &Organizer) {
    if let Err(e) = organizer.catalog().save() {
        warn!("Failed to save lookup cache: {e:#}");
    }
}
