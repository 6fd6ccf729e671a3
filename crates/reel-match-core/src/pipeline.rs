//! The two host-facing phases.
//!
//! Search parses the filename, walks the enabled sites in configuration
//! order, and gates every candidate through the matcher; the first
//! confirmed candidate is serialized into the opaque identifier the host
//! stores. Update decodes that identifier (possibly in a fresh process),
//! scrapes the confirmed detail page, enriches cast and directors via
//! IAFD, and assembles the metadata bundle.
//!
//! Studio, title, and year are gating: a failed match yields no metadata
//! at all. Enrichment failures only blank their own fields.

use crate::metadata::write_bundle;
use crate::person_cache::PersonCache;
use reel_match_config::Config;
use reel_match_matching::{parse_filename, Matcher, ParseError};
use reel_match_models::{FilmRecord, MetadataBundle, PersonRecord, SearchCandidate};
use reel_match_sites::iafd::parse::{FilmCredit, FilmPage};
use reel_match_sites::{IafdResolver, PacedClient, ScraperRegistry, SiteError};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("no matching candidate on any enabled site for {0}")]
    NoMatch(String),
    #[error("search identifier could not be decoded: {0}")]
    Identifier(#[from] serde_json::Error),
    #[error("record carries no confirmed site; run the search phase first")]
    MissingSite,
    #[error("site '{0}' is not enabled")]
    UnknownSite(String),
    #[error(transparent)]
    Site(#[from] SiteError),
}

/// Result of the search phase: the confirmed record and the opaque
/// identifier handed to the host
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub film: FilmRecord,
    pub identifier: String,
}

pub struct Pipeline {
    config: Config,
    client: Arc<PacedClient>,
    registry: ScraperRegistry,
    person_cache: Option<PersonCache>,
}

impl Pipeline {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = Arc::new(PacedClient::new(&config.client)?);
        let registry = ScraperRegistry::from_config(&config, client.clone());
        Ok(Self {
            config,
            client,
            registry,
            person_cache: None,
        })
    }

    /// Reuse previously resolved IAFD people across runs
    pub fn set_person_cache(&mut self, cache: PersonCache) {
        self.person_cache = Some(cache);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Search phase: filename → confirmed site candidate → identifier.
    /// Site failures move on to the next site; only a parse failure or
    /// exhaustion of every candidate on every site is fatal.
    pub async fn search(
        &self,
        path: &Path,
        duration_mins: Option<i64>,
    ) -> Result<SearchOutcome, PipelineError> {
        let film = parse_filename(path, duration_mins)?;
        let matcher = Matcher::new(&self.config.matching);

        for scraper in self.registry.iter() {
            let candidates = match scraper.search(&film).await {
                Ok(candidates) => candidates,
                Err(error) => {
                    warn!(site = scraper.site_id(), %error, "site search failed");
                    continue;
                }
            };
            debug!(site = scraper.site_id(), count = candidates.len(), "candidates");

            for candidate in candidates {
                // gates run on a trial copy so a late miss cannot leave a
                // half-tightened record behind
                let mut trial = film.clone();
                match confirm_candidate(&matcher, &candidate, &mut trial) {
                    Ok(()) => {
                        trial.site = Some(candidate.site.clone());
                        trial.site_url = Some(candidate.url.clone());
                        info!(
                            site = %candidate.site,
                            url = %candidate.url,
                            title = %trial.title,
                            "candidate confirmed"
                        );
                        let identifier = trial.to_identifier()?;
                        return Ok(SearchOutcome {
                            film: trial,
                            identifier,
                        });
                    }
                    Err(error) => {
                        debug!(candidate = %candidate.title, %error, "candidate rejected");
                    }
                }
            }
        }

        Err(PipelineError::NoMatch(film.file_name))
    }

    /// Update phase: identifier → detail scrape → IAFD enrichment →
    /// metadata bundle
    pub async fn update(&self, identifier: &str) -> Result<MetadataBundle, PipelineError> {
        let mut film = FilmRecord::from_identifier(identifier)?;
        let site = film.site.clone().ok_or(PipelineError::MissingSite)?;
        let url = film.site_url.clone().ok_or(PipelineError::MissingSite)?;
        let scraper = self
            .registry
            .get(&site)
            .ok_or_else(|| PipelineError::UnknownSite(site.clone()))?;

        let details = scraper.details(&url).await?;
        let matcher = Matcher::new(&self.config.matching);
        if let Some(date) = details.release_date {
            if let Err(error) = matcher.match_release_date(date, &mut film, false) {
                warn!(%error, "detail page date differs from confirmed estimate");
            }
        }
        if let Some(duration) = details.duration_mins {
            if let Err(error) = matcher.match_duration(duration, &film, false) {
                warn!(%error, "detail page duration differs from file probe");
            }
        }

        let resolver = IafdResolver::new(self.client.clone(), &self.config.matching);
        let film_page = match resolver.resolve_film(&mut film).await {
            Ok(page) => page,
            Err(error) => {
                info!(%error, "film not found on IAFD; continuing without enrichment");
                FilmPage::default()
            }
        };

        // an explicit cast list in the filename preempts the site listing
        let cast_names: Vec<String> = if film.filename_cast.is_empty() {
            details.cast.clone()
        } else {
            film.filename_cast.clone()
        };
        let cast = self
            .resolve_with_cache(&resolver, &cast_names, &film, &film_page.cast)
            .await;
        let directors = self
            .resolve_with_cache(&resolver, &details.directors, &film, &film_page.directors)
            .await;

        Ok(write_bundle(
            &self.config,
            &film,
            &details,
            &cast_names,
            &cast,
            &details.directors,
            &directors,
        ))
    }

    /// Person resolution with the on-disk cache in front: cached records
    /// skip the network entirely; fresh resolutions with an established
    /// identity are written back.
    async fn resolve_with_cache(
        &self,
        resolver: &IafdResolver<'_>,
        names: &[String],
        film: &FilmRecord,
        credits: &[FilmCredit],
    ) -> BTreeMap<String, PersonRecord> {
        let mut resolved = BTreeMap::new();
        let mut misses = Vec::new();

        for name in names {
            match self.person_cache.as_ref().and_then(|c| c.load(name).ok().flatten()) {
                Some(record) => {
                    debug!(name = %name, "person served from cache");
                    resolved.insert(name.clone(), record);
                }
                None => misses.push(name.clone()),
            }
        }

        let fresh = resolver.resolve_people(&misses, film, credits).await;
        if let Some(cache) = &self.person_cache {
            for (name, record) in &fresh {
                // only established identities are worth keeping
                if record.url.is_some() {
                    if let Err(error) = cache.save(name, record) {
                        warn!(name = %name, %error, "person cache write failed");
                    }
                }
            }
        }
        resolved.extend(fresh);
        resolved
    }
}

/// Gate a search candidate: title, studio, then release date (which
/// tightens the record's date estimate on success), then duration.
pub fn confirm_candidate(
    matcher: &Matcher<'_>,
    candidate: &SearchCandidate,
    film: &mut FilmRecord,
) -> Result<(), reel_match_matching::MatchError> {
    matcher.match_title(&candidate.title, film)?;
    if let Some(studio) = &candidate.studio {
        matcher.match_studio(studio, film)?;
    }
    if let Some(date) = candidate.release_date {
        matcher.match_release_date(date, film, false)?;
    }
    if let Some(duration) = candidate.duration_mins {
        matcher.match_duration(duration, film, false)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use reel_match_config::MatchingConfig;
    use std::path::PathBuf;

    fn film() -> FilmRecord {
        parse_filename(&PathBuf::from("(Titan Men) - Wet Heat (2015).mp4"), Some(95)).unwrap()
    }

    fn candidate(title: &str, studio: Option<&str>, date: Option<NaiveDate>) -> SearchCandidate {
        SearchCandidate {
            site: "aebn".to_string(),
            title: title.to_string(),
            url: "https://gay.aebn.com/gay/movies/1".to_string(),
            studio: studio.map(String::from),
            release_date: date,
            duration_mins: None,
        }
    }

    #[test]
    fn candidate_passing_all_gates_tightens_the_date() {
        let config = MatchingConfig::default();
        let matcher = Matcher::new(&config);
        let mut record = film();
        let date = NaiveDate::from_ymd_opt(2015, 6, 12);
        confirm_candidate(&matcher, &candidate("Wet Heat", Some("Titan"), date), &mut record)
            .unwrap();
        assert_eq!(record.compare_date, date);
    }

    #[test]
    fn candidate_failing_a_gate_is_rejected() {
        let config = MatchingConfig::default();
        let matcher = Matcher::new(&config);
        let mut record = film();
        assert!(confirm_candidate(
            &matcher,
            &candidate("Dry Cold", Some("Titan Men"), None),
            &mut record
        )
        .is_err());
        assert!(confirm_candidate(
            &matcher,
            &candidate("Wet Heat", Some("Raging Stallion"), None),
            &mut record
        )
        .is_err());
        // way outside the 366-day window
        assert!(confirm_candidate(
            &matcher,
            &candidate("Wet Heat", None, NaiveDate::from_ymd_opt(2019, 6, 1)),
            &mut record
        )
        .is_err());
    }

    #[test]
    fn candidates_without_optional_fields_pass_on_title_alone() {
        let config = MatchingConfig::default();
        let matcher = Matcher::new(&config);
        let mut record = film();
        confirm_candidate(&matcher, &candidate("Wet Heat", None, None), &mut record).unwrap();
    }

    #[test]
    fn confirmed_record_round_trips_through_the_identifier() {
        let mut record = film();
        record.site = Some("aebn".to_string());
        record.site_url = Some("https://gay.aebn.com/gay/movies/1".to_string());
        record.compare_date = NaiveDate::from_ymd_opt(2015, 6, 12);
        let identifier = record.to_identifier().unwrap();
        let restored = FilmRecord::from_identifier(&identifier).unwrap();
        assert_eq!(restored, record);
    }
}
