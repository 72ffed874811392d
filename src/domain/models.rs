use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Directory,
    File,
}

/// One component of a path, as it appears on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub raw_name: String,
    pub kind: SegmentKind,
    /// Position from the path root, starting at 0.
    pub index: usize,
}

/// What a single path component says about the episode it belongs to.
///
/// `season` and `episode` are either both set or both unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSegment {
    pub raw_name: String,
    pub show_name: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub kind: SegmentKind,
    pub index: usize,
}

impl ParsedSegment {
    pub fn is_file(&self) -> bool {
        self.kind == SegmentKind::File
    }

    pub fn season_episode(&self) -> Option<(u32, u32)> {
        Some((self.season?, self.episode?))
    }
}

/// A show as returned by the catalog, with every name it is known by.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
    pub aliases: BTreeSet<String>, // lowercased
}

impl CatalogEntry {
    pub fn new<I, S>(id: u64, name: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id,
            name: name.into(),
            aliases: aliases
                .into_iter()
                .map(|alias| alias.as_ref().to_lowercase())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub show_name: String,
    pub season: u32,
    pub episode: u32,
}
