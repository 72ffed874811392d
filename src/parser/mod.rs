//! Path inference: what show, season and episode a path looks like.
//!
//! Every component of the path is read on its own. Directories often carry
//! the proper show name while the file name carries release noise, or the
//! other way around, so the matcher gets one guess per component.

pub mod cleaning;
pub mod patterns;

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path};
use tracing::debug;

use crate::domain::models::{ParsedSegment, PathSegment, SegmentKind};
use cleaning::{clean_show_name, trim_garbage};
use patterns::find_episode_markers;

static EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[a-zA-Z0-9]{2,10}$").unwrap());

/// Parses every component of `path`, root to leaf. The last one is the file.
pub fn parse(path: impl AsRef<Path>) -> Vec<ParsedSegment> {
    split_path(path.as_ref()).iter().map(parse_segment).collect()
}

/// Splits a path into its normalized components. `.` and repeated
/// separators vanish, `..` removes the component before it, and root or
/// drive prefixes are not components.
pub fn split_path(path: &Path) -> Vec<PathSegment> {
    let mut names: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => names.push(name.to_string_lossy().into_owned()),
            Component::ParentDir => {
                names.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    let last = names.len().saturating_sub(1);
    names
        .into_iter()
        .enumerate()
        .map(|(index, raw_name)| PathSegment {
            raw_name,
            kind: if index == last {
                SegmentKind::File
            } else {
                SegmentKind::Directory
            },
            index,
        })
        .collect()
}

pub fn parse_segment(segment: &PathSegment) -> ParsedSegment {
    let text = match segment.kind {
        SegmentKind::File => strip_extension(&segment.raw_name),
        SegmentKind::Directory => segment.raw_name.clone(),
    };

    // Markers come from the raw name; cleaning works on the stripped one.
    // A lone season or episode marker is too weak to cut the name at.
    let markers = find_episode_markers(&segment.raw_name);
    let season_episode = markers.season_episode();
    let matched: &[String] = match season_episode {
        Some(_) => &markers.matched,
        None => &[],
    };
    let show_name = trim_garbage(&clean_show_name(&text, matched));
    let (season, episode) = season_episode.unzip();

    debug!(
        raw_name = %segment.raw_name,
        show_name = %show_name,
        ?season,
        ?episode,
        "parsed path segment"
    );

    ParsedSegment {
        raw_name: segment.raw_name.clone(),
        show_name,
        season,
        episode,
        kind: segment.kind,
        index: segment.index,
    }
}

fn strip_extension(file_name: &str) -> String {
    EXTENSION.replace(file_name, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> ParsedSegment {
        parse(path).pop().unwrap()
    }

    fn summary(segment: &ParsedSegment) -> (&str, Option<u32>, Option<u32>) {
        (segment.show_name.as_str(), segment.season, segment.episode)
    }

    #[test]
    fn test_single_file() {
        let segments = parse("Breaking Bad S01E01.mkv");
        assert_eq!(
            segments,
            vec![ParsedSegment {
                raw_name: "Breaking Bad S01E01.mkv".to_string(),
                show_name: "breaking bad".to_string(),
                season: Some(1),
                episode: Some(1),
                kind: SegmentKind::File,
                index: 0,
            }]
        );
    }

    const FILE_NAMES: &[(&str, (&str, Option<u32>, Option<u32>))] = &[
        ("Game of Thrones 1x05 [1080p].mp4", ("game of thrones", Some(1), Some(5))),
        ("The Office (US) - S02E10 - Christmas Party.avi", ("the office", Some(2), Some(10))),
        ("Stargate SG-1 - S02E08 - Family DVD.avi", ("stargate sg-1", Some(2), Some(8))),
        ("Altered Carbon 720p 7x05 [www.torrentrapid.com].mkv", ("altered carbon", Some(7), Some(5))),
        ("Altered Carbon 720p S07E05 [www.torrentrapid.com].mkv", ("altered carbon", Some(7), Some(5))),
        ("The Eternaut - S01E01 - A Night of Cards HDTV-720p.mkv", ("the eternaut", Some(1), Some(1))),
        ("Machine [HDTV 720p][Cap.101].mkv", ("machine", Some(1), Some(1))),
        ("/Downloads/One Punch Man S03 - E01 [Sub] 1080p.mkv", ("one punch man", Some(3), Some(1))),
        ("/Downloads/[SubsPlease] Attack on Titan - S04E28 (1080p) [A1B2C3D4].mkv", ("attack on titan", Some(4), Some(28))),
        ("/Media/Friends/Friends - 2x04 - The One Where Monica Gets a Roommate.avi", ("friends", Some(2), Some(4))),
        ("/Downloads/Rick.and.Morty.S04E06.Never.Ricking.Morty.1080p.AMZN.WEB-DL.DDP5.1.H.264-NTb.mkv", ("rick and morty", Some(4), Some(6))),
        ("/Series/Casa de Papel/La.Casa.de.Papel.S02E03.720p.NF.WEB-DL.DDP5.1.x264-NTG.mkv", ("la casa de papel", Some(2), Some(3))),
        ("random.mkv", ("random", None, None)),
    ];

    #[test]
    fn test_file_names() {
        for &(path, expected) in FILE_NAMES {
            assert_eq!(summary(&file(path)), expected, "path: {path}");
        }
    }

    #[test]
    fn test_show_names_are_stable_under_recleaning() {
        for &(path, _) in FILE_NAMES {
            let once = file(path).show_name;
            let twice = trim_garbage(&clean_show_name(&once, &[]));
            assert_eq!(twice, once, "path: {path}");
        }
    }

    #[test]
    fn test_short_names_can_lose_periods_on_recleaning() {
        // Period density is measured against the whole raw name, so a period
        // that survives in a long name can be dense enough to go in a short one.
        let once = file("Mr. Robot - S01E01 - eps1.0_hellofriend.mov").show_name;
        assert_eq!(once, "mr. robot");
        assert_eq!(trim_garbage(&clean_show_name(&once, &[])), "mr robot");
    }

    #[test]
    fn test_every_component_is_parsed() {
        let segments =
            parse("/media/series/Breaking Bad/Season 01/Breaking.Bad.S01E03.720p.BluRay.x264-DEMAND.mkv");

        let names: Vec<_> = segments.iter().map(|s| s.show_name.as_str()).collect();
        assert_eq!(names, vec!["media", "series", "breaking bad", "season 01", "breaking bad"]);

        let indexes: Vec<_> = segments.iter().map(|s| s.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3, 4]);

        assert!(segments[..4].iter().all(|s| s.kind == SegmentKind::Directory));
        assert!(segments[4].is_file());
        assert_eq!(segments[4].season_episode(), Some((1, 3)));
        assert!(segments[..4].iter().all(|s| s.season_episode().is_none()));
    }

    #[test]
    fn test_directory_carries_episode_info() {
        let segments = parse(
            "/Downloads/Peaky Blinders (Proper) - Temporada 1 [HDTV 720p][Cap.105][AC3 5.1 Español Castellano]/PB 1x05 720p [www.newpct1.com].mkv",
        );
        assert_eq!(segments.len(), 3);
        assert_eq!(summary(&segments[0]), ("downloads", None, None));
        assert_eq!(summary(&segments[1]), ("peaky blinders", Some(1), Some(5)));
        assert_eq!(summary(&segments[2]), ("pb 1x05", Some(1), Some(5)));
    }

    #[test]
    fn test_directory_without_season_and_episode() {
        let segments = parse("/Videos/Stranger Things S01/Stranger.Things.S01E08.Chapter.Eight.mkv");
        assert_eq!(summary(&segments[1]), ("stranger things s01", None, None));
        assert_eq!(summary(&segments[2]), ("stranger things", Some(1), Some(8)));
    }

    #[test]
    fn test_path_normalization() {
        let segments = parse("./shows//../Breaking Bad S01E01.mkv");
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_file());
        assert_eq!(segments[0].index, 0);

        let segments = parse("/a/./b/../Show S01E01.mkv");
        let raw: Vec<_> = segments.iter().map(|s| s.raw_name.as_str()).collect();
        assert_eq!(raw, vec!["a", "Show S01E01.mkv"]);
    }

    #[test]
    fn test_empty_path() {
        assert!(parse("").is_empty());
        assert!(parse("/").is_empty());
    }

    #[test]
    fn test_extension_stripping_only_applies_to_files() {
        let segments = parse("Show.Name.2019/Show.Name.S01E01.mkv");
        assert_eq!(segments[0].show_name, "show name 2019");
        assert_eq!(segments[1].show_name, "show name");
    }
}
