//! The collection side table: entries keyed by synthetic title, derived
//! from studio, genres, cast, directors, and system tags, written to the
//! host's collection store at the end of the update phase.

use reel_match_config::CollectionsConfig;
use reel_match_models::{CollectionEntry, FilmRecord, SiteDetails};
use std::collections::BTreeMap;

pub fn build_collections(
    config: &CollectionsConfig,
    film: &FilmRecord,
    details: &SiteDetails,
    cast_names: &[String],
    director_names: &[String],
) -> Vec<CollectionEntry> {
    // keyed by title so the same entry is never emitted twice
    let mut table: BTreeMap<String, CollectionEntry> = BTreeMap::new();

    if config.studio {
        let mut entry = CollectionEntry::new(film.studio.clone());
        entry.poster = details.poster.first().cloned();
        entry.art = details.art.first().cloned();
        entry.summary = Some(format!("Releases from {}", film.studio));
        table.entry(entry.title.clone()).or_insert(entry);
    }

    // site-declared series collections ride along with the studio switch
    if config.studio {
        for series in &details.collections {
            let mut entry = CollectionEntry::new(series.clone());
            entry.summary = Some(format!("The {} series", series));
            table.entry(series.clone()).or_insert(entry);
        }
    }

    if config.genres {
        for genre in &details.genres {
            table
                .entry(genre.clone())
                .or_insert_with(|| CollectionEntry::new(genre.clone()));
        }
    }

    if config.cast {
        for name in cast_names {
            table
                .entry(name.clone())
                .or_insert_with(|| CollectionEntry::new(name.clone()));
        }
    }

    if config.directors {
        for name in director_names {
            let title = format!("{} (Director)", name);
            table
                .entry(title.clone())
                .or_insert_with(|| CollectionEntry::new(title.clone()));
        }
    }

    if config.system {
        if film.compilation {
            table
                .entry("Compilations".to_string())
                .or_insert_with(|| CollectionEntry::new("Compilations"));
        }
        if film.stacked {
            table
                .entry("Multi-Part Releases".to_string())
                .or_insert_with(|| CollectionEntry::new("Multi-Part Releases"));
        }
        if !film.found_on_iafd {
            table
                .entry("Not on IAFD".to_string())
                .or_insert_with(|| CollectionEntry::new("Not on IAFD"));
        }
    }

    table.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_match_matching::parse_filename;
    use std::path::PathBuf;

    fn film() -> FilmRecord {
        parse_filename(&PathBuf::from("(Titan Men) - Wet Heat (2015).mp4"), None).unwrap()
    }

    fn details() -> SiteDetails {
        let mut details = SiteDetails::default();
        details.genres.insert("Muscles".to_string());
        details.collections.insert("Heat".to_string());
        details.poster.push("https://img/front.jpg".to_string());
        details
    }

    #[test]
    fn default_config_builds_studio_genre_and_system_entries() {
        let entries = build_collections(
            &CollectionsConfig::default(),
            &film(),
            &details(),
            &["Dario Beck".to_string()],
            &["Brian Mills".to_string()],
        );
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert!(titles.contains(&"Titan Men"));
        assert!(titles.contains(&"Heat"));
        assert!(titles.contains(&"Muscles"));
        // film was never confirmed on IAFD in this fixture
        assert!(titles.contains(&"Not on IAFD"));
        // cast/director collections are off by default
        assert!(!titles.contains(&"Dario Beck"));
        assert!(!titles.contains(&"Brian Mills (Director)"));
    }

    #[test]
    fn studio_entry_carries_artwork() {
        let entries = build_collections(
            &CollectionsConfig::default(),
            &film(),
            &details(),
            &[],
            &[],
        );
        let studio = entries.iter().find(|e| e.title == "Titan Men").unwrap();
        assert_eq!(studio.poster.as_deref(), Some("https://img/front.jpg"));
        assert!(studio.summary.as_deref().unwrap().contains("Titan Men"));
    }

    #[test]
    fn person_collections_follow_configuration() {
        let config = CollectionsConfig {
            studio: false,
            genres: false,
            cast: true,
            directors: true,
            system: false,
        };
        let entries = build_collections(
            &config,
            &film(),
            &details(),
            &["Dario Beck".to_string()],
            &["Brian Mills".to_string()],
        );
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Brian Mills (Director)", "Dario Beck"]);
    }

    #[test]
    fn compilation_and_stacked_tags() {
        let mut record = film();
        record.compilation = true;
        record.stacked = true;
        record.found_on_iafd = true;
        let entries = build_collections(
            &CollectionsConfig::default(),
            &record,
            &SiteDetails::default(),
            &[],
            &[],
        );
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert!(titles.contains(&"Compilations"));
        assert!(titles.contains(&"Multi-Part Releases"));
        assert!(!titles.contains(&"Not on IAFD"));
    }
}
