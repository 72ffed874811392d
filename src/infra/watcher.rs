use anyhow::{bail, Context, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Reports paths that appear anywhere below a directory, whether created in
/// place or moved in from elsewhere.
pub struct DirectoryWatcher {
    // Dropping the watcher stops the notifications.
    _watcher: RecommendedWatcher,
    arrived: mpsc::Receiver<PathBuf>,
}

impl DirectoryWatcher {
    pub fn start(directory: &Path) -> Result<Self> {
        if !directory.is_dir() {
            bail!("Input directory does not exist: {}", directory.display());
        }

        let (arrived_tx, arrived) = mpsc::channel::<PathBuf>(100);
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for path in arrived_paths(event) {
                        let _ = arrived_tx.blocking_send(path);
                    }
                }
                Err(e) => warn!(error = %e, "file watcher error"),
            },
            Config::default(),
        )
        .context("Failed to create file watcher")?;

        watcher
            .watch(directory, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch directory {}", directory.display()))?;
        info!(directory = %directory.display(), "watching for new files");

        Ok(Self {
            _watcher: watcher,
            arrived,
        })
    }

    /// The next new path, or `None` once the watcher has shut down.
    pub async fn next_arrived(&mut self) -> Option<PathBuf> {
        self.arrived.recv().await
    }
}

/// Paths an event brings into the watched tree. Finished downloads are
/// usually moved into place, so rename targets count as well as creations.
fn arrived_paths(event: Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths,
        // [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.into_iter().skip(1).collect()
        }
        // Backends that cannot tell the two ends of a rename apart
        EventKind::Modify(ModifyKind::Name(RenameMode::Any)) => {
            event.paths.into_iter().filter(|path| path.exists()).collect()
        }
        _ => Vec::new(),
    }
}
