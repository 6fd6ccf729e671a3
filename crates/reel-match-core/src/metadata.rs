//! Assembly of the final metadata bundle from the confirmed record, the
//! site details, and the resolved people.

use crate::collections::build_collections;
use chrono::Datelike;
use reel_match_config::Config;
use reel_match_models::{
    CastEntry, Chapter, DirectorEntry, FilmRecord, MetadataBundle, PersonRecord, SiteDetails,
};
use std::collections::BTreeMap;

pub fn write_bundle(
    config: &Config,
    film: &FilmRecord,
    details: &SiteDetails,
    cast_names: &[String],
    cast: &BTreeMap<String, PersonRecord>,
    director_names: &[String],
    directors: &BTreeMap<String, PersonRecord>,
) -> MetadataBundle {
    let originally_available = film.comparison_date();

    let cast_entries: Vec<CastEntry> = cast_names
        .iter()
        .map(|name| match cast.get(name) {
            Some(person) => CastEntry {
                name: person.name.clone(),
                role: person.role.to_string(),
                photo: person.photo.clone(),
            },
            None => CastEntry {
                name: name.clone(),
                role: String::new(),
                photo: None,
            },
        })
        .collect();

    let director_entries: Vec<DirectorEntry> = director_names
        .iter()
        .map(|name| match directors.get(name) {
            Some(person) => DirectorEntry {
                name: person.name.clone(),
                photo: person.photo.clone(),
            },
            None => DirectorEntry {
                name: name.clone(),
                photo: None,
            },
        })
        .collect();

    let resolved_cast_names: Vec<String> =
        cast_entries.iter().map(|e| e.name.clone()).collect();
    let collections = build_collections(
        &config.collections,
        film,
        details,
        &resolved_cast_names,
        director_names,
    );

    MetadataBundle {
        title: film.title.clone(),
        studio: film.studio.clone(),
        originally_available,
        year: originally_available.map(|d| d.year()).or(film.year),
        summary: details.synopsis.clone(),
        genres: details.genres.clone(),
        countries: details.countries.clone(),
        rating: details.rating,
        cast: cast_entries,
        directors: director_entries,
        collections,
        posters: details.poster.clone(),
        art: details.art.clone(),
        reviews: details.scenes.clone(),
        chapters: build_chapters(film, details),
    }
}

/// Chapter marks for the file. Explicit site timecodes win; otherwise
/// chapters are laid out cumulatively from the scene durations. For a
/// stacked release the marks are shifted by the part's position and
/// clipped to this file's duration.
pub fn build_chapters(film: &FilmRecord, details: &SiteDetails) -> Vec<Chapter> {
    let mut chapters = if !details.chapters.is_empty() {
        details.chapters.clone()
    } else {
        let mut derived = Vec::new();
        let mut cursor_ms: i64 = 0;
        for scene in &details.scenes {
            let Some(duration) = scene.duration_mins else {
                // one unknown length breaks every later offset
                return Vec::new();
            };
            let end_ms = cursor_ms + duration * 60_000;
            derived.push(Chapter {
                title: scene.heading.clone(),
                start_ms: cursor_ms,
                end_ms,
            });
            cursor_ms = end_ms;
        }
        derived
    };

    if film.stacked {
        let (Some(part), Some(file_mins)) = (film.stack_part, film.duration_mins) else {
            return chapters;
        };
        let file_ms = file_mins * 60_000;
        let offset_ms = i64::from(part - 1) * file_ms;
        chapters = chapters
            .into_iter()
            .filter_map(|chapter| {
                let start_ms = chapter.start_ms - offset_ms;
                let end_ms = chapter.end_ms - offset_ms;
                if end_ms <= 0 || start_ms >= file_ms {
                    return None;
                }
                Some(Chapter {
                    title: chapter.title,
                    start_ms: start_ms.max(0),
                    end_ms: end_ms.min(file_ms),
                })
            })
            .collect();
    }

    chapters
}
