//! Turning a raw file or directory name into a best-effort show name.
//!
//! Every step is a pure function over a string so it can be tested on its
//! own. [`clean_show_name`] chains them in the one order that works: later
//! steps rely on the debris earlier steps leave behind.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Fraction of the original text above which `.` or `_` are treated as word
/// separators rather than part of the title.
const SEPARATOR_DENSITY: f64 = 0.07;

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)|\{[^}]*\}|<[^>]*>").unwrap());

static SPACED_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)\s+-\s+(\w)").unwrap());

static QUALITY_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:HDTV|720p|1080p|480p|WEB-DL|BluRay|DVDRip|x264|x265|HEVC|AAC|AC3)\b")
        .unwrap()
});

static PLAIN_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\S\s?)+$").unwrap());

pub fn clean_show_name(text: &str, episode_markers: &[String]) -> String {
    let name = truncate_at_markers(text, episode_markers);
    debug!(step = 1, name = %name, "cleaning name");
    let name = strip_brackets(&name);
    debug!(step = 2, name = %name, "cleaning name");
    let name = normalize_dashes(&name);
    debug!(step = 3, name = %name, "cleaning name");
    let name = replace_dense_separator(&name, text, '.');
    debug!(step = 4, name = %name, "cleaning name");
    let name = replace_dense_separator(&name, text, '_');
    debug!(step = 5, name = %name, "cleaning name");
    let name = strip_quality_tokens(&name);
    debug!(step = 6, name = %name, "cleaning name");
    let name = collapse_whitespace(&name);
    debug!(step = 7, name = %name, "cleaning name");
    let name = drop_episode_title(&name);
    debug!(step = 8, name = %name, "cleaning name");
    name.to_lowercase()
}

/// Cuts the text right before the earliest episode marker, unless the marker
/// sits within the first few characters (a name like "E01 - Pilot" would
/// otherwise be wiped out).
pub fn truncate_at_markers(text: &str, episode_markers: &[String]) -> String {
    let cut = episode_markers
        .iter()
        .filter_map(|marker| text.find(marker.as_str()))
        .filter(|&position| text[..position].chars().count() > 4)
        .min();

    match cut {
        Some(position) => {
            let head = &text[..position];
            head.strip_suffix(|c: char| matches!(c, '(' | '[' | '<'))
                .unwrap_or(head)
                .to_string()
        }
        None => text.to_string(),
    }
}

pub fn strip_brackets(name: &str) -> String {
    BRACKETED.replace_all(name, "").into_owned()
}

pub fn normalize_dashes(name: &str) -> String {
    SPACED_DASH.replace_all(name, "$1 - $2").into_owned()
}

/// Replaces `separator` with spaces when it makes up a large share of
/// `original`, which is how dotted release names look.
pub fn replace_dense_separator(name: &str, original: &str, separator: char) -> String {
    let total = original.chars().count();
    if total == 0 {
        return name.to_string();
    }

    let occurrences = original.chars().filter(|&c| c == separator).count();
    if occurrences as f64 / total as f64 > SEPARATOR_DENSITY {
        name.replace(separator, " ")
    } else {
        name.to_string()
    }
}

pub fn strip_quality_tokens(name: &str) -> String {
    QUALITY_TOKENS.replace_all(name, "").into_owned()
}

pub fn collapse_whitespace(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "The Office - Christmas Party" becomes "The Office".
pub fn drop_episode_title(name: &str) -> String {
    match name.split_once(" - ") {
        Some((prefix, _)) if PLAIN_TITLE.is_match(prefix) => prefix.to_string(),
        _ => name.to_string(),
    }
}

/// Strips separator debris (`-`, `.`, whitespace) from both ends.
pub fn trim_garbage(name: &str) -> String {
    name.trim_matches(|c: char| c == '-' || c == '.' || c.is_whitespace())
        .to_string()
}
