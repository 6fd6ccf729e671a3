//! Match gates run against every site candidate.
//!
//! Each gate either passes or returns a [`MatchError`]; a miss aborts the
//! current candidate only and the pipeline moves on to the next search
//! result. Studio, title, and date are gating fields: a candidate that
//! fails any of them contributes no metadata at all.

use crate::error::MatchError;
use crate::normalize::{normalise, normalise_words, sort_alpha_chars};
use crate::soundex::soundex;
use chrono::NaiveDate;
use reel_match_config::MatchingConfig;
use reel_match_models::FilmRecord;
use tracing::{debug, warn};

pub struct Matcher<'a> {
    config: &'a MatchingConfig,
}

impl<'a> Matcher<'a> {
    pub fn new(config: &'a MatchingConfig) -> Self {
        Self { config }
    }

    /// Accept a site title when its canonical key (or its sorted-alpha
    /// form, or the key with the short title relocated to the end) is
    /// among the film's comparison variants. Falls back to episode
    /// fragments appearing verbatim in the raw site title.
    pub fn match_title(&self, site_title: &str, film: &FilmRecord) -> Result<(), MatchError> {
        let stripped = strip_studio_parenthetical(site_title, film);
        let key = normalise(&stripped);
        let sorted = sort_alpha_chars(&key);

        for accepted in &film.compare_titles {
            if accepted == &key || sort_alpha_chars(accepted) == sorted {
                return Ok(());
            }
        }

        // Sites sometimes prefix the series name differently; relocating
        // the short title to the end lines those up with the variants,
        // which all terminate in the short-title key.
        let short_key = normalise(&film.short_title);
        if !short_key.is_empty() && key.contains(&short_key) {
            let relocated = format!("{}{}", key.replacen(&short_key, "", 1), short_key);
            if film.compare_titles.contains(&relocated) {
                return Ok(());
            }
        }

        if film
            .episodes
            .iter()
            .any(|episode| site_title.contains(episode.as_str()))
        {
            return Ok(());
        }

        Err(MatchError::Title {
            site: site_title.to_string(),
            film: film.title.clone(),
        })
    }

    /// Studio names are inconsistently abbreviated across sites, so a
    /// substring containment in either direction counts the same as a
    /// full match, against both the billing and the IAFD studio name.
    pub fn match_studio(&self, site_studio: &str, film: &FilmRecord) -> Result<(), MatchError> {
        let site_key = normalise(site_studio);
        let mut film_names = vec![film.studio.as_str()];
        if let Some(iafd) = film.iafd_studio.as_deref() {
            film_names.push(iafd);
        }

        for name in film_names {
            let film_key = normalise(name);
            if site_key == film_key {
                return Ok(());
            }
            if !site_key.is_empty()
                && !film_key.is_empty()
                && (site_key.contains(&film_key) || film_key.contains(&site_key))
            {
                return Ok(());
            }
        }

        Err(MatchError::Studio {
            site: site_studio.to_string(),
            film: film.studio.clone(),
        })
    }

    /// Compare a site date against the film's current comparison date.
    /// `loose` widens the window for IAFD, whose dates legitimately drift
    /// up to ~2 years from site dates across re-releases. A pass tightens
    /// `compare_date` to the site-derived value.
    pub fn match_release_date(
        &self,
        site_date: NaiveDate,
        film: &mut FilmRecord,
        loose: bool,
    ) -> Result<(), MatchError> {
        let tolerance = if loose {
            self.config.iafd_date_tolerance_days
        } else {
            self.config.date_tolerance_days
        };

        match film.comparison_date() {
            None => {
                // No year in the filename: the site date becomes the estimate
                film.compare_date = Some(site_date);
                Ok(())
            }
            Some(current) => {
                let delta = (site_date - current).num_days().abs();
                if delta <= tolerance {
                    film.compare_date = Some(site_date);
                    Ok(())
                } else {
                    Err(MatchError::ReleaseDate {
                        site: site_date,
                        compare: current,
                        delta,
                        tolerance,
                    })
                }
            }
        }
    }

    /// Person-name gate: exact canonical key, substring containment in
    /// either direction, edit distance, then Soundex
    pub fn match_person_name(
        &self,
        site_name: &str,
        candidate_name: &str,
    ) -> Result<(), MatchError> {
        let site_key = normalise(site_name);
        let candidate_key = normalise(candidate_name);
        if !site_key.is_empty() && site_key == candidate_key {
            return Ok(());
        }
        if !site_key.is_empty()
            && !candidate_key.is_empty()
            && (site_key.contains(&candidate_key) || candidate_key.contains(&site_key))
        {
            return Ok(());
        }
        if levenshtein_name_match(site_name, candidate_name) {
            return Ok(());
        }
        if soundex_name_match(site_name, candidate_name) {
            return Ok(());
        }
        Err(MatchError::Person(site_name.to_string()))
    }

    /// Compare a site duration against the file probe (or, in IAFD mode,
    /// the IAFD-reported duration). Only fatal when the match-duration
    /// preference is enabled; otherwise a mismatch is logged and ignored.
    pub fn match_duration(
        &self,
        site_mins: i64,
        film: &FilmRecord,
        against_iafd: bool,
    ) -> Result<(), MatchError> {
        let reference = if against_iafd {
            film.iafd_duration_mins
        } else {
            film.duration_mins
        };
        let Some(reference) = reference else {
            debug!(site_mins, "no reference duration to compare against");
            return Ok(());
        };

        let tolerance = if film.stacked {
            self.config.stacked_duration_tolerance_mins
        } else {
            self.config.duration_tolerance_mins
        };
        let delta = (site_mins - reference).abs();
        if delta <= tolerance {
            return Ok(());
        }

        if self.config.match_duration {
            Err(MatchError::Duration {
                site: site_mins,
                reference,
                delta,
                tolerance,
            })
        } else {
            warn!(
                site_mins,
                reference, delta, tolerance, "duration mismatch ignored (match_duration off)"
            );
            Ok(())
        }
    }
}

/// Drop a parenthetical that embeds the studio name in the site title
/// ("Wet Heat (Titan Men)" and the like)
fn strip_studio_parenthetical(site_title: &str, film: &FilmRecord) -> String {
    let studio_key = normalise(&film.studio);
    let iafd_key = film.iafd_studio.as_deref().map(normalise);

    let mut result = String::with_capacity(site_title.len());
    let mut rest = site_title;
    while let Some(open) = rest.find('(') {
        let Some(close_rel) = rest[open..].find(')') else {
            break;
        };
        let close = open + close_rel;
        let inner_key = normalise(&rest[open + 1..close]);
        let embeds_studio = !inner_key.is_empty()
            && (contains_either(&inner_key, &studio_key)
                || iafd_key
                    .as_deref()
                    .map(|k| contains_either(&inner_key, k))
                    .unwrap_or(false));
        result.push_str(&rest[..open]);
        if !embeds_studio {
            result.push_str(&rest[open..=close]);
        }
        rest = &rest[close + 1..];
    }
    result.push_str(rest);
    result.trim().to_string()
}

fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Edit-distance gate for person names: one edit allowed per word, plus
/// one. Single-word names are additionally tried against the first-name
/// token alone.
pub fn levenshtein_name_match(site_name: &str, candidate_name: &str) -> bool {
    let site = normalise_words(site_name);
    let candidate = normalise_words(candidate_name);
    if site.is_empty() || candidate.is_empty() {
        return false;
    }
    let threshold = site_name.split_whitespace().count() + 1;
    if strsim::levenshtein(&site, &candidate) <= threshold {
        return true;
    }
    if !site.contains(' ') {
        if let Some(first) = candidate.split(' ').next() {
            return strsim::levenshtein(&site, first) <= threshold;
        }
    }
    false
}

/// Phonetic fallback when edit distance misses: Soundex equality on the
/// full name, or on the first-name token for single-word names
pub fn soundex_name_match(site_name: &str, candidate_name: &str) -> bool {
    let site = normalise_words(site_name);
    let candidate = normalise_words(candidate_name);
    if site.is_empty() || candidate.is_empty() {
        return false;
    }
    if soundex(&site) == soundex(&candidate) {
        return true;
    }
    if !site.contains(' ') {
        if let Some(first) = candidate.split(' ').next() {
            return soundex(&site) == soundex(first);
        }
    }
    false
}
