use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

// Ordered by priority. Each pattern may bind a season, an episode or both.
static EPISODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // S01E01, s1e1, S01E101
        r"[Ss](?<season>\d{1,2})[Ee](?<episode>\d{1,3})",
        // 1x01, 01x01, 7X05
        r"(?i)(?<season>\d{1,2})x(?<episode>\d{1,3})",
        // Cap.101, Cap101, Capitulo 1012
        r"(?i)cap(?:itulo)?\.?\s*(?<season>\d{1,2})(?<episode>\d{2})",
        r"(?i)cap(?:itulo)?\.?\s*(?<episode>\d{1,2})",
        // E01, Ep.01, Episode 1
        r"(?i)(?:e|ep|episode)\.?\s*(?<episode>\d{1,3})",
        // One Punch Man S03 - E01
        r"(?i)s(?<season>\d{1,2})",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Season/episode numbers found in a piece of text, along with the exact
/// substrings that carried them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeMarkers {
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub matched: Vec<String>,
}

impl EpisodeMarkers {
    /// Both numbers, or nothing if either one is missing.
    pub fn season_episode(&self) -> Option<(u32, u32)> {
        Some((self.season?, self.episode?))
    }
}

pub fn find_episode_markers(text: &str) -> EpisodeMarkers {
    let mut markers = EpisodeMarkers::default();

    for pattern in EPISODE_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        debug!(text, pattern = pattern.as_str(), matched = &caps[0], "episode pattern matched");
        markers.matched.push(caps[0].to_string());

        if markers.season.is_none() {
            markers.season = caps.name("season").and_then(|m| m.as_str().parse().ok());
        }
        if markers.episode.is_none() {
            markers.episode = caps.name("episode").and_then(|m| m.as_str().parse().ok());
        }

        if markers.season_episode().is_some() {
            break;
        }
    }

    markers
}
