//! On-disk filename parsing.
//!
//! Library files must follow
//! `(Studio) - Title [{SceneID}] [(Year)] [- [Cast, ...]] [- stack-marker]`.
//! A filename that does not match is logged and skipped; no partial
//! record is ever produced for it.

use crate::error::ParseError;
use crate::normalize::normalise;
use once_cell::sync::Lazy;
use regex::Regex;
use reel_match_models::FilmRecord;
use std::path::Path;
use tracing::debug;

static FILENAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\((?P<studio>[^()]*)\) - (?P<title>.+?)(?: - \{(?P<sceneid>\d{5,6}[LNR])\})?(?: \((?P<year>\d{4})\))?(?: - \[(?P<cast>[^\]]*)\])?(?: - (?i:(?P<stackword>cd|disc|disk|dvd|part|pt|scene) (?P<stackno>[1-8])))?$",
    )
    .unwrap()
});

/// A title fragment ending in a standalone number is a series name plus
/// episode number
static EPISODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<name>.+?)\s+(?P<num>\d{1,3})$").unwrap());

/// Parse a library file's name into a [`FilmRecord`].
///
/// `duration_mins` is the duration probed from the media file by the
/// host, when known.
pub fn parse_filename(file_path: &Path, duration_mins: Option<i64>) -> Result<FilmRecord, ParseError> {
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ParseError::Path(file_path.to_path_buf()))?;
    let stem = file_path
        .file_stem()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ParseError::Path(file_path.to_path_buf()))?;

    let caps = FILENAME_RE
        .captures(stem)
        .ok_or_else(|| ParseError::Format(file_name.to_string()))?;

    let studio_field = caps.name("studio").map(|m| m.as_str()).unwrap_or("").trim();
    if studio_field.is_empty() {
        return Err(ParseError::Format(file_name.to_string()));
    }
    let (studio, iafd_studio) = match studio_field.split_once(';') {
        Some((billing, iafd)) => (billing.trim().to_string(), Some(iafd.trim().to_string())),
        None => (studio_field.to_string(), None),
    };

    let title = caps
        .name("title")
        .map(|m| m.as_str())
        .unwrap_or("")
        .trim()
        .trim_end_matches('-')
        .trim()
        .to_string();
    if title.is_empty() {
        return Err(ParseError::Format(file_name.to_string()));
    }

    let year: Option<i32> = caps.name("year").and_then(|m| m.as_str().parse().ok());
    let scene_id = caps.name("sceneid").map(|m| m.as_str().to_string());
    let filename_cast: Vec<String> = caps
        .name("cast")
        .map(|m| {
            m.as_str()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let stacked = caps.name("stackword").is_some();
    let stack_part: Option<u8> = caps.name("stackno").and_then(|m| m.as_str().parse().ok());

    let (series, episodes, short_title) = split_series(&title);
    let compare_titles = title_variants(&title, &short_title, &series);

    debug!(
        file = file_name,
        studio = %studio,
        title = %title,
        short_title = %short_title,
        year = ?year,
        stacked,
        "parsed filename"
    );

    Ok(FilmRecord {
        file_name: file_name.to_string(),
        studio,
        iafd_studio,
        title,
        short_title,
        year,
        compare_titles,
        series,
        episodes,
        scene_id,
        duration_mins,
        iafd_duration_mins: None,
        filename_cast,
        compare_date: None,
        site_url: None,
        site: None,
        iafd_film_url: None,
        found_on_iafd: false,
        compilation: false,
        stacked,
        stack_part,
    })
}

/// Split the title on `" - "` and peel off series/episode fragments.
/// Returns (series names, episode fragments, short title).
fn split_series(title: &str) -> (Vec<String>, Vec<String>, String) {
    let mut series = Vec::new();
    let mut episodes = Vec::new();
    let mut remainder: Option<String> = None;

    for fragment in title.split(" - ").map(str::trim).filter(|f| !f.is_empty()) {
        if let Some(caps) = EPISODE_RE.captures(fragment) {
            series.push(caps["name"].trim().to_string());
            episodes.push(fragment.to_string());
        } else if remainder.is_none() {
            remainder = Some(fragment.to_string());
        }
    }

    // An all-episode title keeps the last series name as its short form
    let short_title = remainder
        .or_else(|| series.last().cloned())
        .unwrap_or_else(|| title.to_string());
    (series, episodes, short_title)
}

/// Acceptable comparison-title variants: full title, short title, each
/// series+short combination, and all series fragments plus the short
/// title. The first two are always present, so the set is never empty.
fn title_variants(title: &str, short_title: &str, series: &[String]) -> Vec<String> {
    let mut variants = Vec::new();
    push_unique(&mut variants, normalise(title));
    push_unique(&mut variants, normalise(short_title));
    for name in series {
        push_unique(&mut variants, normalise(&format!("{} {}", name, short_title)));
    }
    if series.len() > 1 {
        push_unique(
            &mut variants,
            normalise(&format!("{} {}", series.join(" "), short_title)),
        );
    }
    variants
}

fn push_unique(variants: &mut Vec<String>, key: String) {
    if !variants.contains(&key) {
        variants.push(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn plain_release() {
        let record =
            parse_filename(&PathBuf::from("(Titan Men) - Wet Heat (2015).mp4"), Some(95)).unwrap();
        assert_eq!(record.studio, "Titan Men");
        assert_eq!(record.iafd_studio, None);
        assert_eq!(record.title, "Wet Heat");
        assert_eq!(record.short_title, "Wet Heat");
        assert_eq!(record.year, Some(2015));
        assert!(!record.stacked);
        assert!(record.filename_cast.is_empty());
        assert_eq!(record.duration_mins, Some(95));
        assert!(record.compare_titles.contains(&"wetheat".to_string()));
    }

    #[test]
    fn series_cast_and_stack_marker() {
        let record = parse_filename(
            &PathBuf::from("(Studio) - Risky Business 2 - (2020) - [John Doe, Jane Roe] - part 1.mp4"),
            None,
        )
        .unwrap();
        assert_eq!(record.series, vec!["Risky Business"]);
        assert_eq!(record.episodes, vec!["Risky Business 2"]);
        assert_eq!(record.short_title, "Risky Business");
        assert!(record.stacked);
        assert_eq!(record.stack_part, Some(1));
        assert_eq!(record.filename_cast, vec!["John Doe", "Jane Roe"]);
        assert_eq!(record.year, Some(2020));
    }

    #[test]
    fn dual_studio_field() {
        let record = parse_filename(
            &PathBuf::from("(Falcon; Falcon Studios Group) - Aspen (1984).avi"),
            None,
        )
        .unwrap();
        assert_eq!(record.studio, "Falcon");
        assert_eq!(record.iafd_studio.as_deref(), Some("Falcon Studios Group"));
    }

    #[test]
    fn scene_id_is_captured() {
        let record = parse_filename(
            &PathBuf::from("(CockyBoys) - Just Angels - {12345N} (2021).mp4"),
            None,
        )
        .unwrap();
        assert_eq!(record.scene_id.as_deref(), Some("12345N"));
        assert_eq!(record.title, "Just Angels");
    }

    #[test]
    fn series_and_standalone_fragment() {
        let record = parse_filename(
            &PathBuf::from("(Studio) - Hot House 3 - Backroom (2018).mp4"),
            None,
        )
        .unwrap();
        assert_eq!(record.series, vec!["Hot House"]);
        assert_eq!(record.episodes, vec!["Hot House 3"]);
        assert_eq!(record.short_title, "Backroom");
        // variants: full, short, series+short
        assert!(record.compare_titles.contains(&"hothouse3backroom".to_string()));
        assert!(record.compare_titles.contains(&"backroom".to_string()));
        assert!(record.compare_titles.contains(&"hothousebackroom".to_string()));
    }

    #[test]
    fn stack_markers_are_case_insensitive() {
        for marker in ["CD 2", "Disc 3", "pt 4", "SCENE 1"] {
            let name = format!("(Studio) - Title (2020) - {}.mp4", marker);
            let record = parse_filename(&PathBuf::from(name), None).unwrap();
            assert!(record.stacked, "marker {:?} not recognized", marker);
        }
    }

    #[test]
    fn rejects_filenames_without_studio_prefix() {
        for bad in [
            "Wet Heat (2015).mp4",
            "(Titan Men) Wet Heat.mp4",
            "() - Wet Heat.mp4",
            "(Studio) - .mp4",
        ] {
            assert!(
                parse_filename(&PathBuf::from(bad), None).is_err(),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn stack_digit_out_of_range_is_not_a_marker() {
        // "part 9" is outside the 1-8 range, so it reads as part of the title
        let record =
            parse_filename(&PathBuf::from("(Studio) - Title - part 9.mp4"), None).unwrap();
        assert!(!record.stacked);
        assert_eq!(record.title, "Title - part 9");
    }
}
