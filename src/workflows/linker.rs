use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::models::MatchResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

pub fn generate_filename(show_name: &str, season: u32, episode: u32, extension: Option<&str>) -> String {
    let base = format!(
        "{} S{:02}E{:02}",
        sanitize_filename(show_name),
        season,
        episode
    );
    match extension {
        Some(extension) => format!("{base}.{extension}"),
        None => base,
    }
}

fn sanitize_filename(name: &str) -> String {
    // Remove or replace invalid filename characters
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// `<sorted>/<show>/Season <n>/<show> SxxEyy.<ext>`
pub fn destination_path(sorted_directory: &Path, source: &Path, result: &MatchResult) -> PathBuf {
    let show_directory = sanitize_filename(&result.show_name);
    let extension = source.extension().and_then(|s| s.to_str());
    sorted_directory
        .join(show_directory)
        .join(format!("Season {}", result.season))
        .join(generate_filename(
            &result.show_name,
            result.season,
            result.episode,
            extension,
        ))
}

/// Hard links `source` into its place in the sorted tree. An existing file
/// at the destination is never replaced.
pub fn create_link(source: &Path, sorted_directory: &Path, result: &MatchResult) -> Result<LinkOutcome> {
    let destination = destination_path(sorted_directory, source, result);

    if destination.exists() {
        debug!(destination = %destination.display(), "destination already exists");
        return Ok(LinkOutcome::AlreadyExists(destination));
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::hard_link(source, &destination).with_context(|| {
        format!(
            "Failed to link {} to {}",
            source.display(),
            destination.display()
        )
    })?;
    info!(
        source = %source.display(),
        destination = %destination.display(),
        "created hard link"
    );

    Ok(LinkOutcome::Created(destination))
}
