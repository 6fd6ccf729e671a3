//! Film confirmation and staged person resolution against IAFD.
//!
//! Person lookups are ordered to minimize network calls: the film's own
//! IAFD cast table is consulted first (exact, alias, substring, then
//! edit-distance, then Soundex), and only names that miss every local
//! stage trigger a fresh search. The fallback order is deliberate and
//! matches long-standing agent behavior; do not reorder it.

use crate::client::PacedClient;
use crate::error::SiteError;
use crate::iafd::parse::{self, FilmCredit, FilmPage, PersonRow};
use crate::iafd::{film_search_url, person_search_url};
use chrono::{Datelike, NaiveDate};
use reel_match_config::MatchingConfig;
use reel_match_matching::{
    levenshtein_name_match, normalise, soundex_name_match, Matcher,
};
use reel_match_models::{FilmRecord, FilmographyEntry, PersonRecord, Role};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct IafdResolver<'a> {
    client: Arc<PacedClient>,
    config: &'a MatchingConfig,
}

impl<'a> IafdResolver<'a> {
    pub fn new(client: Arc<PacedClient>, config: &'a MatchingConfig) -> Self {
        Self { client, config }
    }

    /// Search IAFD for the film and, on the first row that passes the
    /// title/studio/date gates (list order is the implicit priority),
    /// fetch its page: duration, compilation flag, and the credit tables
    /// that seed person resolution.
    pub async fn resolve_film(&self, film: &mut FilmRecord) -> Result<FilmPage, SiteError> {
        let url = film_search_url(&film.title);
        let body = self.client.fetch_text(&url).await?;
        let rows = parse::parse_film_rows(&body);
        debug!(count = rows.len(), title = %film.title, "IAFD film candidates");

        let matcher = Matcher::new(self.config);
        for row in rows {
            if let Err(error) = matcher.match_title(&row.title, film) {
                debug!(candidate = %row.title, %error, "IAFD title gate");
                continue;
            }
            if let Some(distributor) = &row.distributor {
                if let Err(error) = matcher.match_studio(distributor, film) {
                    debug!(candidate = %row.title, %error, "IAFD studio gate");
                    continue;
                }
            }
            if let Some(year) = row.year {
                let Some(site_date) = NaiveDate::from_ymd_opt(year, 12, 31) else {
                    continue;
                };
                // year-only rows are gated with the widened window but
                // never tighten the comparison date
                let saved = film.compare_date;
                if let Err(error) = matcher.match_release_date(site_date, film, true) {
                    debug!(candidate = %row.title, %error, "IAFD date gate");
                    continue;
                }
                film.compare_date = saved;
            }

            let page_body = match self.client.fetch_text(&row.url).await {
                Ok(body) => body,
                Err(error) => {
                    warn!(url = %row.url, %error, "IAFD film page fetch failed");
                    continue;
                }
            };
            let page = parse::parse_film_page(&page_body);

            // the film page states the owning studio; one last gate
            if let Some(studio) = page.studio.as_deref().or(page.distributor.as_deref()) {
                if let Err(error) = matcher.match_studio(studio, film) {
                    debug!(candidate = %row.title, %error, "IAFD film page studio gate");
                    continue;
                }
            }

            info!(url = %row.url, "film found on IAFD");
            film.iafd_film_url = Some(row.url.clone());
            film.found_on_iafd = true;
            film.iafd_duration_mins = page.duration_mins;
            if page.compilation {
                film.compilation = true;
            }
            return Ok(page);
        }

        Err(SiteError::Enrichment(format!(
            "no IAFD film match for '{}'",
            film.title
        )))
    }

    /// Resolve each site-listed name to a person record. Individual
    /// failures never propagate: an unresolvable name is recorded with
    /// blank enrichment and not retried.
    pub async fn resolve_people(
        &self,
        names: &[String],
        film: &FilmRecord,
        credits: &[FilmCredit],
    ) -> BTreeMap<String, PersonRecord> {
        let mut resolved = BTreeMap::new();
        for name in names {
            if resolved.contains_key(name) {
                continue;
            }
            let record = self.resolve_person(name, film, credits).await;
            resolved.insert(name.clone(), record);
        }
        resolved
    }

    async fn resolve_person(
        &self,
        name: &str,
        film: &FilmRecord,
        credits: &[FilmCredit],
    ) -> PersonRecord {
        if let Some((credit, via_alias)) = find_credit(name, credits) {
            let mut record = PersonRecord::unresolved(&credit.name, &normalise(&credit.name));
            record.url = Some(credit.url.clone());
            record.role = match &credit.alias {
                Some(alias) => {
                    record.add_alias(alias, &normalise(alias));
                    Role::Aka(alias.clone())
                }
                None if via_alias => Role::Aka(name.to_string()),
                None if credit.role.is_empty() => Role::Credited(String::new()),
                None => Role::Credited(credit.role.clone()),
            };
            if via_alias {
                record.add_alias(name, &normalise(name));
            }
            self.enrich(&mut record).await;
            return record;
        }

        self.search_person(name, film).await
    }

    /// Fresh IAFD person search with career-year and filmography
    /// filtering
    async fn search_person(&self, name: &str, film: &FilmRecord) -> PersonRecord {
        let url = person_search_url(name);
        let body = match self.client.fetch_text(&url).await {
            Ok(body) => body,
            Err(error) => {
                warn!(name, %error, "IAFD person search failed");
                let mut record = PersonRecord::unresolved(name, &normalise(name));
                record.role = Role::Unresolved;
                return record;
            }
        };
        let rows = parse::parse_person_rows(&body);

        if rows.len() > self.config.cast_search_cap {
            // pathological fan-out; treat as not found rather than walk it
            warn!(name, matches = rows.len(), cap = self.config.cast_search_cap, "person search over cap");
            return PersonRecord::unresolved(name, &normalise(name));
        }

        let film_year = film.comparison_date().map(|d| d.year());
        let name_key = normalise(name);
        let matcher = Matcher::new(self.config);
        for row in rows {
            if !film.compilation {
                if let Some(year) = film_year {
                    if !career_brackets(&row, year) {
                        debug!(name, candidate = %row.name, "outside career range");
                        continue;
                    }
                }
            }

            let Some(matched_alias) = row_name_match(&matcher, name, &name_key, &row) else {
                continue;
            };

            let page_body = match self.client.fetch_text(&row.url).await {
                Ok(body) => body,
                Err(error) => {
                    warn!(name, url = %row.url, %error, "IAFD person page fetch failed");
                    let mut record = PersonRecord::unresolved(name, &name_key);
                    record.role = Role::Unresolved;
                    return record;
                }
            };
            let page = parse::parse_person_page(&page_body);

            if !has_qualifying_credits(&page.films, self.config.scene_agent) {
                debug!(name, candidate = %row.name, "no qualifying filmography credits");
                continue;
            }

            let mut record = PersonRecord::unresolved(&row.name, &normalise(&row.name));
            record.url = Some(row.url.clone());
            for alias in &row.aliases {
                record.add_alias(alias, &normalise(alias));
            }
            record.start_year = row.start_year;
            record.end_year = row.end_year;
            record.role = if matched_alias {
                record.add_alias(name, &name_key);
                Role::Aka(name.to_string())
            } else {
                Role::Credited(String::new())
            };
            apply_person_page(&mut record, page);
            return record;
        }

        debug!(name, "person not resolved on IAFD");
        PersonRecord::unresolved(name, &name_key)
    }

    /// Fetch the profile page for a person already matched through the
    /// film's credit table. Enrichment failure leaves the fields blank.
    async fn enrich(&self, record: &mut PersonRecord) {
        let Some(url) = record.url.clone() else { return };
        match self.client.fetch_text(&url).await {
            Ok(body) => apply_person_page(record, parse::parse_person_page(&body)),
            Err(error) => {
                warn!(name = %record.name, %error, "person enrichment failed");
            }
        }
    }
}

/// Stage the film-credit table lookups in the established fallback
/// order: exact name, exact alias, substring either direction,
/// edit distance, Soundex. Returns the credit and whether the match came
/// through an alias.
fn find_credit<'c>(name: &str, credits: &'c [FilmCredit]) -> Option<(&'c FilmCredit, bool)> {
    let key = normalise(name);
    if key.is_empty() {
        return None;
    }

    if let Some(credit) = credits.iter().find(|c| normalise(&c.name) == key) {
        return Some((credit, false));
    }
    if let Some(credit) = credits
        .iter()
        .find(|c| c.alias.as_deref().map(normalise).as_deref() == Some(key.as_str()))
    {
        return Some((credit, true));
    }
    if let Some(credit) = credits.iter().find(|c| {
        let credit_key = normalise(&c.name);
        !credit_key.is_empty() && (credit_key.contains(&key) || key.contains(&credit_key))
    }) {
        return Some((credit, false));
    }
    if let Some(credit) = credits
        .iter()
        .find(|c| levenshtein_name_match(name, &c.name))
    {
        return Some((credit, false));
    }
    if let Some(credit) = credits.iter().find(|c| soundex_name_match(name, &c.name)) {
        return Some((credit, false));
    }
    None
}

/// The candidate's recorded active years, widened by one on each side,
/// must bracket the film year
fn career_brackets(row: &PersonRow, film_year: i32) -> bool {
    let after_start = row.start_year.map_or(true, |start| film_year >= start - 1);
    let before_end = row.end_year.map_or(true, |end| film_year <= end + 1);
    after_start && before_end
}

/// Match a search-result row by name or alias. Returns Some(via_alias),
/// or None when neither matches.
fn row_name_match(
    matcher: &Matcher<'_>,
    name: &str,
    name_key: &str,
    row: &PersonRow,
) -> Option<bool> {
    if normalise(&row.name) == name_key {
        return Some(false);
    }
    if row.aliases.iter().any(|a| normalise(a) == name_key) {
        return Some(true);
    }
    if matcher.match_person_name(name, &row.name).is_ok() {
        return Some(false);
    }
    None
}

/// Advisory filmography filter: at least one gay or bisexual credit.
/// Scene-agent contexts also count mastonly and nonsex roles. Best
/// effort only; it gates fresh searches, not established identities.
fn has_qualifying_credits(films: &[FilmographyEntry], scene_agent: bool) -> bool {
    films.iter().any(|film| {
        film.categories.iter().any(|category| {
            let category = category.to_lowercase();
            category == "gay"
                || category == "bisexual"
                || (scene_agent && (category == "mastonly" || category == "nonsex"))
        })
    })
}

fn apply_person_page(record: &mut PersonRecord, page: parse::PersonPage) {
    record.photo = page.photo;
    record.nationality = page.nationality;
    record.bio = page.bio;
    record.awards = page.awards;
    record.films = page.films;
}
