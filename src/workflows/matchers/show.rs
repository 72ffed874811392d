use tracing::{debug, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::CatalogLookup;
use crate::domain::error::MatchError;
use crate::domain::models::{CatalogEntry, ParsedSegment};

/// Directory names this short ("tv", "new") say nothing about the show.
const MIN_DIRECTORY_NAME_LEN: usize = 4;

/// Names worth asking the catalog about, strongest first: the file name,
/// then each directory from the closest one up.
pub fn naming_hypotheses(segments: &[ParsedSegment]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    let Some((file, directories)) = segments.split_last() else {
        return names;
    };

    if !file.show_name.is_empty() {
        names.push(&file.show_name);
    }

    for directory in directories.iter().rev() {
        let name = directory.show_name.as_str();
        if name.chars().count() < MIN_DIRECTORY_NAME_LEN {
            debug!(name, "skipping short directory name");
            continue;
        }
        if !names.contains(&name) {
            names.push(name);
        }
    }

    names
}

/// Finds the catalog name of the show the segments point at.
///
/// Every hypothesis is looked up once. Exact alias matches are tried for all
/// of them before diacritic-insensitive ones, and if neither works the first
/// result returned for the file name is used.
pub async fn resolve_show_name(
    segments: &[ParsedSegment],
    catalog: &dyn CatalogLookup,
) -> Result<String, MatchError> {
    let hypotheses = naming_hypotheses(segments);
    let mut responses: Vec<(&str, Vec<CatalogEntry>)> = Vec::with_capacity(hypotheses.len());

    for name in hypotheses {
        let shows = catalog.search_show(name).await?;
        if let Some(show) = find_exact(name, &shows) {
            debug!(name, matched = %show.name, "exact match found");
            return Ok(show.name.clone());
        }
        debug!(name, candidates = shows.len(), "no exact match");
        responses.push((name, shows));
    }

    for (name, shows) in &responses {
        if let Some(show) = find_without_diacritics(name, shows) {
            debug!(name, matched = %show.name, "match found after removing diacritics");
            return Ok(show.name.clone());
        }
    }

    let file_name = segments
        .last()
        .map(|segment| segment.show_name.as_str())
        .unwrap_or_default();
    let first = responses
        .iter()
        .find(|(name, _)| *name == file_name)
        .and_then(|(_, shows)| shows.first());

    match first {
        Some(show) => {
            warn!(
                name = file_name,
                using = %show.name,
                "could not find exact match, using first search result"
            );
            Ok(show.name.clone())
        }
        None => Err(MatchError::NoCatalogMatch {
            name: file_name.to_string(),
        }),
    }
}

fn find_exact<'a>(name: &str, shows: &'a [CatalogEntry]) -> Option<&'a CatalogEntry> {
    let name = name.to_lowercase();
    shows.iter().find(|show| show.aliases.contains(name.as_str()))
}

fn find_without_diacritics<'a>(name: &str, shows: &'a [CatalogEntry]) -> Option<&'a CatalogEntry> {
    let name = strip_diacritics(&name.to_lowercase());
    shows.iter().find(|show| {
        show.aliases
            .iter()
            .any(|alias| strip_diacritics(alias) == name)
    })
}

/// "Casa dé Papel" -> "Casa de Papel"
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}
