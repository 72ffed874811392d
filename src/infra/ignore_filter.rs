use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const IGNORE_FILE_NAME: &str = ".chiprrignore";

enum IgnoreRules {
    /// An empty ignore file: nothing below it is organized.
    All,
    Patterns(Gitignore),
}

/// Decides whether files below `base` should be left alone, based on the
/// `.chiprrignore` files between `base` and each file.
///
/// Ignore files are read on every call so edits apply immediately.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    base: PathBuf,
}

impl IgnoreFilter {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn should_ignore(&self, file_path: &Path) -> Result<bool> {
        if file_path.file_name() == Some(OsStr::new(IGNORE_FILE_NAME)) {
            return Ok(true);
        }

        let Ok(relative_path) = file_path.strip_prefix(&self.base) else {
            return Ok(false);
        };

        // Outermost directory first: "" (the base itself), "a", "a/b", ...
        let directories: Vec<&Path> = relative_path.ancestors().skip(1).collect();
        for directory in directories.into_iter().rev() {
            match self.load_rules(directory)? {
                None => continue,
                Some(IgnoreRules::All) => {
                    debug!(
                        path = %relative_path.display(),
                        directory = %directory.display(),
                        "ignored by empty ignore file"
                    );
                    return Ok(true);
                }
                Some(IgnoreRules::Patterns(rules)) => {
                    if rules
                        .matched_path_or_any_parents(relative_path, false)
                        .is_ignore()
                    {
                        debug!(
                            path = %relative_path.display(),
                            directory = %directory.display(),
                            "ignored by ignore file pattern"
                        );
                        return Ok(true);
                    }
                }
            }
        }

        Ok(false)
    }

    fn load_rules(&self, directory: &Path) -> Result<Option<IgnoreRules>> {
        let ignore_file = self.base.join(directory).join(IGNORE_FILE_NAME);
        let content = match fs::read_to_string(&ignore_file) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", ignore_file.display()))
            }
        };

        if content.trim().is_empty() {
            return Ok(Some(IgnoreRules::All));
        }

        let mut builder = GitignoreBuilder::new(&self.base);
        for line in content.lines() {
            builder
                .add_line(None, line)
                .with_context(|| format!("Invalid pattern {line:?} in {}", ignore_file.display()))?;
        }
        let rules = builder
            .build()
            .with_context(|| format!("Failed to load {}", ignore_file.display()))?;
        debug!(file = %ignore_file.display(), rules = rules.num_ignores() + rules.num_whitelists(), "loaded ignore rules");

        Ok(Some(IgnoreRules::Patterns(rules)))
    }
}
