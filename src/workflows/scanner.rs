use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "wmv", "webm", "flv", "m4v", "mkv", "vob", "ts", "3gp", "asf", "divx",
];

pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|extension| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|video| video.eq_ignore_ascii_case(extension))
        })
        .unwrap_or(false)
}

/// Every file below `dir_path`, sorted. Filtering is left to the organizer.
pub fn collect_files(dir_path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files_helper(dir_path, &mut files)?;
    files.sort();
    Ok(files)
}

/// `path` itself, or every file below it when it is a directory.
pub fn expand_path(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_dir() {
        collect_files(path)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

fn collect_files_helper(dir_path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory {}", dir_path.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            files.push(path);
        } else if path.is_dir() {
            collect_files_helper(&path, files)?;
        }
    }

    Ok(())
}
