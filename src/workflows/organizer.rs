use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::infra::ignore_filter::IgnoreFilter;
use crate::parser;
use crate::workflows::linker::{self, LinkOutcome};
use crate::workflows::matchers::{match_show, CatalogLookup};
use crate::workflows::scanner::is_video_file;

/// Files processed at the same time by [`FileOrganizer::organize_all`].
const CONCURRENT_FILES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NotVideo,
    Ignored,
    Linked(PathBuf),
    AlreadyLinked(PathBuf),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub linked: usize,
    pub already_linked: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// `path` with its directory resolved like the input directory. The file
/// itself is kept as named, even when it is a symlink.
fn resolve_parent(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(file_name)) => fs::canonicalize(parent)
            .map(|parent| parent.join(file_name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// Turns files under the input directory into hard links in the sorted tree.
pub struct FileOrganizer<C> {
    catalog: C,
    ignore_filter: IgnoreFilter,
    input_directory: PathBuf,
    sorted_directory: PathBuf,
}

impl<C: CatalogLookup> FileOrganizer<C> {
    /// The input directory is resolved once so that relative or
    /// non-canonical settings still prefix the absolute paths watchers report.
    pub fn new(catalog: C, input_directory: impl Into<PathBuf>, sorted_directory: impl Into<PathBuf>) -> Self {
        let input_directory = input_directory.into();
        let input_directory = fs::canonicalize(&input_directory).unwrap_or(input_directory);
        Self {
            catalog,
            ignore_filter: IgnoreFilter::new(input_directory.clone()),
            input_directory,
            sorted_directory: sorted_directory.into(),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn input_directory(&self) -> &Path {
        &self.input_directory
    }

    pub async fn organize(&self, path: &Path) -> Result<Outcome> {
        let path = &resolve_parent(path);
        if !is_video_file(path) {
            debug!(path = %path.display(), "not a video file, skipping");
            return Ok(Outcome::NotVideo);
        }
        if self.ignore_filter.should_ignore(path)? {
            info!(path = %path.display(), "ignored by .chiprrignore");
            return Ok(Outcome::Ignored);
        }

        // The input directory's own ancestors say nothing about the show.
        let relative_path = path.strip_prefix(&self.input_directory).unwrap_or(path);
        let segments = parser::parse(relative_path);
        let result = match_show(&segments, &self.catalog)
            .await
            .with_context(|| format!("Failed to match {}", path.display()))?;
        debug!(path = %path.display(), ?result, "matched");

        match linker::create_link(path, &self.sorted_directory, &result)? {
            LinkOutcome::Created(destination) => Ok(Outcome::Linked(destination)),
            LinkOutcome::AlreadyExists(destination) => {
                info!(path = %path.display(), destination = %destination.display(), "already linked");
                Ok(Outcome::AlreadyLinked(destination))
            }
        }
    }

    /// Organizes every path, logging failures instead of stopping at them.
    pub async fn organize_all(&self, paths: impl IntoIterator<Item = PathBuf>) -> Summary {
        let results: Vec<(PathBuf, Result<Outcome>)> = stream::iter(paths)
            .map(|path| async move {
                let outcome = self.organize(&path).await;
                (path, outcome)
            })
            .buffer_unordered(CONCURRENT_FILES)
            .collect()
            .await;

        let mut summary = Summary::default();
        for (path, outcome) in results {
            match outcome {
                Ok(Outcome::Linked(_)) => summary.linked += 1,
                Ok(Outcome::AlreadyLinked(_)) => summary.already_linked += 1,
                Ok(Outcome::NotVideo | Outcome::Ignored) => summary.skipped += 1,
                Err(e) => {
                    error!(path = %path.display(), "{e:#}");
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}
