use async_trait::async_trait;

use crate::domain::error::{CatalogError, MatchError};
use crate::domain::models::{CatalogEntry, MatchResult, ParsedSegment};

pub mod show;
#[cfg(test)]
pub mod test_fixtures;

/// Anything that can search the show catalog by name.
///
/// An empty list is a normal answer, not an error.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn search_show(&self, query: &str) -> Result<Vec<CatalogEntry>, CatalogError>;
}

/// Resolves the parsed segments of one path to a catalog show and episode.
pub async fn match_show(
    segments: &[ParsedSegment],
    catalog: &dyn CatalogLookup,
) -> Result<MatchResult, MatchError> {
    let (season, episode) = resolve_season_episode(segments).ok_or(MatchError::NoEpisodeInfo)?;
    let show_name = show::resolve_show_name(segments, catalog).await?;

    Ok(MatchResult {
        show_name,
        season,
        episode,
    })
}

/// The file's own season/episode, else the one of the closest directory
/// that has both.
pub fn resolve_season_episode(segments: &[ParsedSegment]) -> Option<(u32, u32)> {
    segments.iter().rev().find_map(ParsedSegment::season_episode)
}
